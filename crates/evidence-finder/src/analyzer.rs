/// LLM-backed evidence analysis.
///
/// The model sees the query and up to [`MAX_PROMPT_RESULTS`] search results and answers with
/// a JSON array of per-result judgements. Any failure along the way (transport, upstream
/// status, unparseable reply) degrades to [`fallback_analysis`]; `analyze` never errors.
use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use evidence_common::openai::Message;

use crate::model::{AnalysisEntry, RawResult, DEFAULT_RELEVANCE};
use crate::providers::ChatModel;

/// Results beyond this position are left out of the prompt to bound its size.
pub const MAX_PROMPT_RESULTS: usize = 8;

/// Relation text used by the fallback analysis.
pub const FALLBACK_RELATION: &str = "Related to query";

const SYSTEM_PROMPT: &str = "You are an expert fact-checker and evidence analyst. \
Analyze search results and determine their relevance as evidence.";

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("reply is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("reply JSON is not an array")]
    NotAnArray,
}

pub struct EvidenceAnalyzer {
    model: Arc<dyn ChatModel>,
}

impl EvidenceAnalyzer {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    /// Asks the model to judge `results` as evidence for `query`.
    ///
    /// The model may omit results it finds uninteresting; those get no entry. On failure
    /// every result gets a neutral entry instead.
    pub async fn analyze(&self, query: &str, results: &[RawResult]) -> Vec<AnalysisEntry> {
        if results.is_empty() {
            return Vec::new();
        }

        let messages = vec![
            Message::system(SYSTEM_PROMPT),
            Message::user(build_prompt(query, results)),
        ];

        let reply = match self.model.complete(messages).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "evidence analysis call failed, using fallback analysis");
                return fallback_analysis(results);
            }
        };

        match parse_analysis(&reply) {
            Ok(entries) => {
                info!(
                    entries = entries.len(),
                    results = results.len(),
                    "evidence analysis parsed"
                );
                entries
            }
            Err(e) => {
                warn!(error = %e, reply_len = reply.len(), "evidence analysis reply unusable, using fallback analysis");
                fallback_analysis(results)
            }
        }
    }
}

/// Renders the analysis instructions for `query` and the leading results.
pub fn build_prompt(query: &str, results: &[RawResult]) -> String {
    let results_text = results
        .iter()
        .take(MAX_PROMPT_RESULTS)
        .map(|r| {
            format!(
                "Title: {}\nURL: {}\nSnippet: {}\n",
                r.title.as_deref().unwrap_or("N/A"),
                r.link.as_deref().unwrap_or("N/A"),
                r.snippet.as_deref().unwrap_or("N/A"),
            )
        })
        .collect::<Vec<String>>()
        .join("\n");

    format!(
        "Analyze the following search results as evidence for the claim/question: \"{query}\"\n\
\n\
For each result, provide:\n\
1. A detailed description of what the evidence says (exactly 3-4 full sentences). Do not use ellipses or placeholders.\n\
2. How it relates to the claim/question (supports, contradicts, provides context, etc.)\n\
3. A relevance score from 0.0 to 1.0\n\
\n\
Search Results:\n\
{results_text}\n\
\n\
Respond in JSON format as an array:\n\
[{{\"index\": 0, \"description\": \"Full detailed description here\", \"relation\": \"Relationship description here\", \"relevance_score\": 0.95}}, ...]\n\
Only include results that have meaningful evidence. Return valid JSON only. Do not truncate the description."
    )
}

/// Removes a surrounding Markdown code fence (```` ``` ```` or ```` ```json ````), if any.
pub fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Everything up to the next fence is the body; a missing closing fence keeps the rest.
    let body = rest.split("```").next().unwrap_or(rest);
    let body = body.strip_prefix("json").unwrap_or(body);
    body.trim()
}

/// Parses the model's reply into analysis entries.
///
/// The reply must be a JSON array. Elements that are not objects or carry no usable index
/// are dropped rather than failing the whole reply.
pub fn parse_analysis(reply: &str) -> Result<Vec<AnalysisEntry>, ParseError> {
    let value: Value = serde_json::from_str(strip_code_fence(reply))?;
    let Value::Array(items) = value else {
        return Err(ParseError::NotAnArray);
    };
    Ok(items.iter().filter_map(AnalysisEntry::from_value).collect())
}

/// Neutral analysis: one entry per result, described by its own snippet.
pub fn fallback_analysis(results: &[RawResult]) -> Vec<AnalysisEntry> {
    results
        .iter()
        .enumerate()
        .map(|(index, r)| AnalysisEntry {
            index,
            description: Some(r.snippet.clone().unwrap_or_default()),
            relation: Some(FALLBACK_RELATION.to_string()),
            relevance_score: DEFAULT_RELEVANCE,
        })
        .collect()
}
