use std::sync::Arc;

use async_trait::async_trait;

use evidence_common::openai::{ChatCompletionRequest, Message, OpenAiClient};
use evidence_common::serper::{SerperClient, SerperSearchRequest};

use crate::error::AppError;
use crate::model::RawResult;

/// Web search used to gather candidate evidence.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Returns the provider's results for an evidence-oriented search of `query`.
    async fn search(&self, query: &str) -> Result<Vec<RawResult>, AppError>;
}

/// Text generation used to analyse search results.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, messages: Vec<Message>) -> anyhow::Result<String>;
}

#[async_trait]
impl SearchProvider for SerperClient {
    async fn search(&self, query: &str) -> Result<Vec<RawResult>, AppError> {
        let request = SerperSearchRequest::evidence(query);
        Ok(SerperClient::search(self, &request).await?)
    }
}

/// Chat completions against an OpenAI-compatible endpoint with fixed sampling settings.
pub struct OpenAiChatModel {
    client: Arc<OpenAiClient>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiChatModel {
    pub fn new(client: Arc<OpenAiClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            temperature: 0.3,
            max_tokens: 2000,
        }
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    async fn complete(&self, messages: Vec<Message>) -> anyhow::Result<String> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            temperature: Some(self.temperature),
            max_tokens: Some(self.max_tokens),
        };
        let response = self.client.chat_completions(request).await?;
        if let Some(usage) = &response.usage {
            tracing::debug!(
                model = %self.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "chat completion usage"
            );
        }
        Ok(response.into_content()?)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::Router;
    use evidence_common::openai::OpenAiClientConfig;
    use evidence_common::serper::SerperClientConfig;
    use secrecy::SecretString;

    use super::*;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn serper_answering(status: StatusCode, body: &'static str) -> SerperClient {
        let app = Router::new().route("/search", post(move || async move { (status, body) }));
        SerperClient::new(SerperClientConfig {
            api_key: Some(SecretString::from("key")),
            base_url: serve(app).await,
            timeout: Duration::from_secs(5),
            max_error_body_bytes: 64,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn serper_results_pass_through_in_order() {
        let body = r#"{"organic": [{"title": "A", "link": "https://a.org"}, {"title": "B"}]}"#;
        let client = serper_answering(StatusCode::OK, body).await;

        let results = SearchProvider::search(&client, "coffee").await.unwrap();
        let titles: Vec<_> = results.iter().map(|r| r.title.as_deref()).collect();
        assert_eq!(titles, [Some("A"), Some("B")]);
    }

    #[tokio::test]
    async fn serper_rejection_keeps_its_status() {
        let client = serper_answering(StatusCode::FORBIDDEN, "Unauthorized.").await;

        let err = SearchProvider::search(&client, "coffee").await.unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn unreadable_serper_reply_is_bad_gateway() {
        let client = serper_answering(StatusCode::OK, "<html>oops</html>").await;

        let err = SearchProvider::search(&client, "coffee").await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn chat_model_returns_first_choice_content() {
        let body = r#"{"id": "c", "choices": [{"message": {"content": "[{\"index\": 0}]"}}],
            "usage": {"prompt_tokens": 3, "completion_tokens": 2, "total_tokens": 5}}"#;
        let app = Router::new().route(
            "/chat/completions",
            post(move || async move { (StatusCode::OK, body) }),
        );
        let client = OpenAiClient::new(OpenAiClientConfig {
            api_key: None,
            base_url: serve(app).await,
            default_timeout: Duration::from_secs(5),
            max_retries: 0,
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(1),
            max_error_body_bytes: 64,
        })
        .unwrap();
        let model = OpenAiChatModel::new(Arc::new(client), "gpt-4o-mini");

        let content = model.complete(vec![Message::user("hi")]).await.unwrap();
        assert_eq!(content, r#"[{"index": 0}]"#);
    }
}
