/// Joins search results with their analysis into ranked evidence cards.
use uuid::Uuid;

use evidence_common::api::{EvidenceCard, SourceType};

use crate::classify::classify_source_type;
use crate::model::{AnalysisEntry, RawResult};

const UNTITLED: &str = "Untitled";
const DEFAULT_RELATION: &str = "Related";

/// Builds one card per result that has an analysis entry and passes the source filter,
/// ordered by descending relevance.
///
/// Results are matched to entries by position; the first entry for a position wins and
/// results with no entry are dropped. An empty `filter` keeps every source type. Ties in
/// relevance keep provider order.
pub fn assemble(
    results: &[RawResult],
    analysis: &[AnalysisEntry],
    filter: &[SourceType],
) -> Vec<EvidenceCard> {
    let mut cards: Vec<EvidenceCard> = results
        .iter()
        .enumerate()
        .filter_map(|(i, result)| {
            let entry = analysis.iter().find(|a| a.index == i)?;

            let link = result.link.clone().unwrap_or_default();
            let title = result.title.clone().unwrap_or_else(|| UNTITLED.to_string());
            let source_type = classify_source_type(&link, &title);
            if !filter.is_empty() && !filter.contains(&source_type) {
                return None;
            }

            let snippet = result.snippet.clone().unwrap_or_default();
            Some(EvidenceCard {
                id: Uuid::new_v4().to_string(),
                title,
                link,
                description: entry.description.clone().unwrap_or_else(|| snippet.clone()),
                snippet,
                relation_to_claim: entry
                    .relation
                    .clone()
                    .unwrap_or_else(|| DEFAULT_RELATION.to_string()),
                source_type,
                relevance_score: entry.relevance_score,
            })
        })
        .collect();

    // sort_by is stable.
    cards.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
    cards
}
