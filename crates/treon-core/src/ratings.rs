use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lowest score a customer can submit.
pub const MIN_SCORE: u8 = 1;
/// Highest score a customer can submit.
pub const MAX_SCORE: u8 = 5;

/// Placeholder written by older kiosk builds when a brand or shade was unset.
const UNDEFINED_SENTINEL: &str = "undefined";

/// Returns `true` for labels that carry no identity: empty, whitespace-only,
/// or the literal `"undefined"` placeholder.
#[must_use]
pub fn is_placeholder_label(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed == UNDEFINED_SENTINEL
}

/// Catalog identifier of a shade. Older sources store it as a number, newer
/// ones as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShadeId {
    Numeric(i64),
    Text(String),
}

impl ShadeId {
    /// Comparison key that treats `3` and `"3"` as the same shade.
    #[must_use]
    pub fn as_key(&self) -> String {
        match self {
            ShadeId::Numeric(n) => n.to_string(),
            ShadeId::Text(s) => s.trim().to_string(),
        }
    }
}

impl std::fmt::Display for ShadeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShadeId::Numeric(n) => write!(f, "{n}"),
            ShadeId::Text(s) => write!(f, "{s}"),
        }
    }
}

/// A score exactly as a source delivered it, before coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawScore {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl RawScore {
    /// Coerce to an integer score in `MIN_SCORE..=MAX_SCORE`.
    ///
    /// Floats are truncated toward zero; strings are parsed as an integer
    /// first, then as a float. Non-numeric and out-of-range values yield
    /// `None` rather than a zero score.
    #[must_use]
    pub fn coerce(&self) -> Option<u8> {
        match self {
            RawScore::Integer(n) => score_from_i64(*n),
            RawScore::Float(f) => score_from_f64(*f),
            RawScore::Text(s) => {
                let s = s.trim();
                match s.parse::<i64>() {
                    Ok(n) => score_from_i64(n),
                    Err(_) => s.parse::<f64>().ok().and_then(score_from_f64),
                }
            }
        }
    }
}

fn score_from_i64(value: i64) -> Option<u8> {
    u8::try_from(value)
        .ok()
        .filter(|score| (MIN_SCORE..=MAX_SCORE).contains(score))
}

fn score_from_f64(value: f64) -> Option<u8> {
    if !value.is_finite() {
        return None;
    }
    let truncated = value.trunc();
    if truncated < f64::from(MIN_SCORE) || truncated > f64::from(MAX_SCORE) {
        return None;
    }
    // Range-checked above, so the cast is exact.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Some(truncated as u8)
}

impl From<i64> for RawScore {
    fn from(value: i64) -> Self {
        RawScore::Integer(value)
    }
}

impl From<f64> for RawScore {
    fn from(value: f64) -> Self {
        RawScore::Float(value)
    }
}

impl From<&str> for RawScore {
    fn from(value: &str) -> Self {
        RawScore::Text(value.to_string())
    }
}

/// A single customer rating of a brand/shade pair, with canonical field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub brand: String,
    #[serde(default)]
    pub shade_id: Option<ShadeId>,
    pub shade_name: String,
    /// `None` when the source record had no score at all.
    #[serde(default)]
    pub score: Option<RawScore>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl Rating {
    pub fn new(
        brand: impl Into<String>,
        shade_name: impl Into<String>,
        score: impl Into<RawScore>,
    ) -> Self {
        Self {
            brand: brand.into(),
            shade_id: None,
            shade_name: shade_name.into(),
            score: Some(score.into()),
            submitted_at: None,
            user_id: None,
        }
    }

    #[must_use]
    pub fn with_shade_id(mut self, shade_id: ShadeId) -> Self {
        self.shade_id = Some(shade_id);
        self
    }

    #[must_use]
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}
