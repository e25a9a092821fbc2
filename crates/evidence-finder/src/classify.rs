/// Source-type classification from URL keywords.
///
/// Rule groups are checked in priority order and the first group with a matching keyword
/// wins. Academic and government markers come first because they are the most reliable
/// signals and many such sites also live under `.org` or contain "news" in the path.
use evidence_common::api::SourceType;

const ACADEMIC: &[&str] = &[
    ".edu",
    "scholar.google",
    "arxiv.org",
    "pubmed",
    "jstor",
    "sciencedirect",
    "springer",
    "wiley",
    "nature.com",
    "science.org",
    "researchgate",
    "academia.edu",
];

const GOVERNMENT: &[&str] = &[".gov", ".mil", "who.int", "un.org", "europa.eu", "parliament"];

const NEWS: &[&str] = &[
    "news",
    "reuters",
    "bbc",
    "cnn",
    "nytimes",
    "washingtonpost",
    "guardian",
    "forbes",
    "wsj",
    "bloomberg",
    "apnews",
    "npr",
    "politico",
    "axios",
    "thehill",
];

const ORGANIZATION: &[&str] = &[".org", "foundation", "institute", "association"];

const BLOG: &[&str] = &["blog", "medium.com", "substack", "wordpress", "tumblr"];

const RULES: &[(SourceType, &[&str])] = &[
    (SourceType::Academic, ACADEMIC),
    (SourceType::Government, GOVERNMENT),
    (SourceType::News, NEWS),
    (SourceType::Organization, ORGANIZATION),
    (SourceType::Blog, BLOG),
];

/// Classifies a result by its URL. Total and deterministic; unmatched URLs are `Other`.
///
/// The title is part of the signature so title-based rules can be added without touching
/// callers. No current rule reads it.
pub fn classify_source_type(url: &str, _title: &str) -> SourceType {
    let url = url.to_lowercase();
    RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| url.contains(k)))
        .map(|(source_type, _)| *source_type)
        .unwrap_or(SourceType::Other)
}
