use serde::{Deserialize, Serialize};

/// Coarse category of a result's origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    News,
    Academic,
    Government,
    Organization,
    Blog,
    Other,
}

impl SourceType {
    /// Every variant, in the order the source-types endpoint lists them.
    pub const ALL: [SourceType; 6] = [
        SourceType::News,
        SourceType::Academic,
        SourceType::Government,
        SourceType::Organization,
        SourceType::Blog,
        SourceType::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SourceType::News => "news",
            SourceType::Academic => "academic",
            SourceType::Government => "government",
            SourceType::Organization => "organization",
            SourceType::Blog => "blog",
            SourceType::Other => "other",
        }
    }

    /// Human-readable label: underscores become spaces, each word is capitalised.
    pub fn label(self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<String>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// The claim or question to find evidence for.
    pub query: String,
    /// Restrict cards to these source types. Absent or empty means no filter.
    #[serde(default)]
    pub source_types: Option<Vec<SourceType>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceCard {
    pub id: String,
    pub title: String,
    pub link: String,
    pub snippet: String,
    pub description: String,
    pub relation_to_claim: String,
    pub source_type: SourceType,
    pub relevance_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub evidence_cards: Vec<EvidenceCard>,
    pub total_results: usize,
}

impl SearchResponse {
    pub fn empty(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            evidence_cards: Vec::new(),
            total_results: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceTypeOption {
    pub value: SourceType,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceTypesResponse {
    pub source_types: Vec<SourceTypeOption>,
}

impl SourceTypesResponse {
    pub fn all() -> Self {
        Self {
            source_types: SourceType::ALL
                .iter()
                .map(|&st| SourceTypeOption {
                    value: st,
                    label: st.label(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

/// Error body, `{"detail": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}
