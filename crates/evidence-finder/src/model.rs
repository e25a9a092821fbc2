use serde_json::Value;

use evidence_common::serper::OrganicResult;

/// A search hit as returned by the provider, before analysis.
pub type RawResult = OrganicResult;

/// Score used whenever the model gives none, or gives one that is not a number.
pub const DEFAULT_RELEVANCE: f64 = 0.5;

/// The model's judgement of one search result.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisEntry {
    /// Position of the result in the provider's list.
    pub index: usize,
    pub description: Option<String>,
    pub relation: Option<String>,
    /// Nominally in [0, 1]; not clamped.
    pub relevance_score: f64,
}

impl AnalysisEntry {
    /// Reads one element of the model's JSON array.
    ///
    /// Returns `None` when the element is not an object or has no usable `index`, since such
    /// an entry can never be joined to a result. Other fields are optional; a
    /// `relevance_score` given as a numeric string is accepted.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let index = obj.get("index").and_then(index_from_value)?;

        let text = |key: &str| obj.get(key).and_then(Value::as_str).map(str::to_string);

        Some(Self {
            index,
            description: text("description"),
            relation: text("relation"),
            relevance_score: obj
                .get("relevance_score")
                .and_then(score_from_value)
                .unwrap_or(DEFAULT_RELEVANCE),
        })
    }
}

fn index_from_value(value: &Value) -> Option<usize> {
    if let Some(n) = value.as_u64() {
        return usize::try_from(n).ok();
    }
    // 2.0 is accepted as index 2; 2.5 matches nothing.
    let f = value.as_f64()?;
    if f >= 0.0 && f.fract() == 0.0 && f <= usize::MAX as f64 {
        return Some(f as usize);
    }
    None
}

fn score_from_value(value: &Value) -> Option<f64> {
    let score = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    score.is_finite().then_some(score)
}
