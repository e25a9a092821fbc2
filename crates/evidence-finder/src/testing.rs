//! In-process fakes for the provider traits.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use axum::http::StatusCode;

use evidence_common::openai::Message;

use crate::error::{AppError, SEARCH_PROVIDER_DETAIL};
use crate::model::RawResult;
use crate::providers::{ChatModel, SearchProvider};

pub fn raw(title: &str, link: &str, snippet: &str) -> RawResult {
    RawResult {
        title: Some(title.to_string()),
        link: Some(link.to_string()),
        snippet: Some(snippet.to_string()),
    }
}

pub struct FakeSearch {
    outcome: Result<Vec<RawResult>, StatusCode>,
    calls: AtomicUsize,
    last_query: Mutex<Option<String>>,
}

impl FakeSearch {
    pub fn returning(results: Vec<RawResult>) -> Self {
        Self {
            outcome: Ok(results),
            calls: AtomicUsize::new(0),
            last_query: Mutex::new(None),
        }
    }

    pub fn failing(status: StatusCode) -> Self {
        Self {
            outcome: Err(status),
            calls: AtomicUsize::new(0),
            last_query: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Option<String> {
        self.last_query.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchProvider for FakeSearch {
    async fn search(&self, query: &str) -> Result<Vec<RawResult>, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some(query.to_string());
        match &self.outcome {
            Ok(results) => Ok(results.clone()),
            Err(status) => Err(AppError::Upstream {
                status: *status,
                detail: SEARCH_PROVIDER_DETAIL.to_string(),
            }),
        }
    }
}

pub struct FakeChatModel {
    reply: Option<String>,
    calls: AtomicUsize,
    last_messages: Mutex<Vec<Message>>,
}

impl FakeChatModel {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            calls: AtomicUsize::new(0),
            last_messages: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: AtomicUsize::new(0),
            last_messages: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_messages(&self) -> Vec<Message> {
        self.last_messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for FakeChatModel {
    async fn complete(&self, messages: Vec<Message>) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_messages.lock().unwrap() = messages;
        self.reply
            .clone()
            .ok_or_else(|| anyhow::anyhow!("connection refused"))
    }
}
