/// The evidence search pipeline: validate, search, analyse, assemble.
///
/// Steps run strictly in sequence within the calling task. Nothing is retained between
/// requests.
use std::sync::Arc;

use tracing::info;

use evidence_common::api::{SearchRequest, SearchResponse};

use crate::analyzer::EvidenceAnalyzer;
use crate::assembler::assemble;
use crate::error::AppError;
use crate::providers::SearchProvider;

pub struct EvidenceService {
    search: Arc<dyn SearchProvider>,
    analyzer: EvidenceAnalyzer,
}

impl EvidenceService {
    pub fn new(search: Arc<dyn SearchProvider>, analyzer: EvidenceAnalyzer) -> Self {
        Self { search, analyzer }
    }

    pub async fn find_evidence(&self, request: SearchRequest) -> Result<SearchResponse, AppError> {
        validate_query(&request.query)?;

        let results = self.search.search(&request.query).await?;
        if results.is_empty() {
            info!(query_len = request.query.len(), "search returned no results");
            return Ok(SearchResponse::empty(request.query));
        }

        let analysis = self.analyzer.analyze(&request.query, &results).await;
        let filter = request.source_types.as_deref().unwrap_or_default();
        let evidence_cards = assemble(&results, &analysis, filter);

        info!(
            query_len = request.query.len(),
            results = results.len(),
            analysed = analysis.len(),
            cards = evidence_cards.len(),
            "evidence search complete"
        );

        Ok(SearchResponse {
            query: request.query,
            total_results: evidence_cards.len(),
            evidence_cards,
        })
    }
}

/// Rejects queries that are empty after trimming.
pub fn validate_query(query: &str) -> Result<(), AppError> {
    if query.trim().is_empty() {
        return Err(AppError::empty_query());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use evidence_common::api::SourceType;

    use super::*;
    use crate::testing::{raw, FakeChatModel, FakeSearch};

    fn service(search: Arc<FakeSearch>, model: Arc<FakeChatModel>) -> EvidenceService {
        EvidenceService::new(search, EvidenceAnalyzer::new(model))
    }

    fn request(query: &str, source_types: Option<Vec<SourceType>>) -> SearchRequest {
        SearchRequest {
            query: query.to_string(),
            source_types,
        }
    }

    fn mixed_results() -> Vec<crate::model::RawResult> {
        vec![
            raw("Blog post", "https://medium.com/@x/coffee", "b"),
            raw("Trial", "https://pubmed.ncbi.nlm.nih.gov/1", "t"),
            raw("Story", "https://www.reuters.com/health", "r"),
            raw("Meta-analysis", "https://www.nature.com/articles/2", "m"),
        ]
    }

    const MIXED_REPLY: &str = r#"```json
[
  {"index": 0, "description": "Opinion piece.", "relation": "provides context", "relevance_score": 0.2},
  {"index": 1, "description": "RCT with 500 subjects.", "relation": "supports", "relevance_score": 0.9},
  {"index": 2, "description": "News coverage.", "relation": "provides context", "relevance_score": 0.4},
  {"index": 3, "description": "Pooled analysis.", "relation": "supports", "relevance_score": "0.95"}
]
```"#;

    #[test]
    fn validation_rejects_blank_queries() {
        assert!(validate_query("").is_err());
        assert!(validate_query(" \t\n").is_err());
        assert!(validate_query(" coffee ").is_ok());
    }

    #[tokio::test]
    async fn empty_query_makes_no_upstream_calls() {
        let search = Arc::new(FakeSearch::returning(mixed_results()));
        let model = Arc::new(FakeChatModel::replying(MIXED_REPLY));
        let svc = service(search.clone(), model.clone());

        let err = svc.find_evidence(request("   ", None)).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(search.calls(), 0);
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn zero_results_skip_analysis() {
        let search = Arc::new(FakeSearch::returning(Vec::new()));
        let model = Arc::new(FakeChatModel::replying(MIXED_REPLY));
        let svc = service(search.clone(), model.clone());

        let response = svc.find_evidence(request("coffee", None)).await.unwrap();
        assert!(response.evidence_cards.is_empty());
        assert_eq!(response.total_results, 0);
        assert_eq!(response.query, "coffee");
        assert_eq!(search.calls(), 1);
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn ranks_cards_by_relevance() {
        let search = Arc::new(FakeSearch::returning(mixed_results()));
        let model = Arc::new(FakeChatModel::replying(MIXED_REPLY));
        let svc = service(search.clone(), model);

        let response = svc
            .find_evidence(request("coffee lowers blood pressure", None))
            .await
            .unwrap();
        assert_eq!(search.last_query().as_deref(), Some("coffee lowers blood pressure"));
        assert_eq!(response.total_results, response.evidence_cards.len());
        assert_eq!(response.total_results, 4);

        let scores: Vec<f64> = response
            .evidence_cards
            .iter()
            .map(|c| c.relevance_score)
            .collect();
        assert_eq!(scores, [0.95, 0.9, 0.4, 0.2]);
        assert!(response
            .evidence_cards
            .windows(2)
            .all(|w| w[0].relevance_score >= w[1].relevance_score));

        let types: Vec<SourceType> = response
            .evidence_cards
            .iter()
            .map(|c| c.source_type)
            .collect();
        assert_eq!(
            types,
            [
                SourceType::Academic,
                SourceType::Academic,
                SourceType::News,
                SourceType::Blog
            ]
        );
    }

    #[tokio::test]
    async fn academic_filter_returns_only_academic() {
        let search = Arc::new(FakeSearch::returning(mixed_results()));
        let model = Arc::new(FakeChatModel::replying(MIXED_REPLY));
        let svc = service(search, model);

        let response = svc
            .find_evidence(request("coffee", Some(vec![SourceType::Academic])))
            .await
            .unwrap();
        assert_eq!(response.total_results, 2);
        assert!(response
            .evidence_cards
            .iter()
            .all(|c| c.source_type == SourceType::Academic));
    }

    #[tokio::test]
    async fn empty_filter_means_no_filter() {
        let search = Arc::new(FakeSearch::returning(mixed_results()));
        let model = Arc::new(FakeChatModel::replying(MIXED_REPLY));
        let svc = service(search, model);

        let response = svc
            .find_evidence(request("coffee", Some(Vec::new())))
            .await
            .unwrap();
        assert_eq!(response.total_results, 4);
    }

    #[tokio::test]
    async fn analysis_failure_degrades_to_neutral_cards() {
        let search = Arc::new(FakeSearch::returning(mixed_results()));
        let model = Arc::new(FakeChatModel::failing());
        let svc = service(search, model);

        let response = svc.find_evidence(request("coffee", None)).await.unwrap();
        assert_eq!(response.total_results, 4);
        for card in &response.evidence_cards {
            assert_eq!(card.relevance_score, 0.5);
            assert_eq!(card.description, card.snippet);
            assert_eq!(card.relation_to_claim, "Related to query");
        }
        // Equal scores keep provider order.
        assert_eq!(response.evidence_cards[0].title, "Blog post");
    }

    #[tokio::test]
    async fn upstream_failure_is_surfaced() {
        let search = Arc::new(FakeSearch::failing(StatusCode::TOO_MANY_REQUESTS));
        let model = Arc::new(FakeChatModel::replying(MIXED_REPLY));
        let svc = service(search, model.clone());

        let err = svc.find_evidence(request("coffee", None)).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(model.calls(), 0);
    }
}
