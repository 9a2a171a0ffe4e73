//! Stored record shapes and their normalization into canonical core types.
//!
//! Kiosk builds have written the same records under several field names over
//! time (`rating` vs `score`, `colorName` vs `shade_name`, `start_time` vs
//! `started_at`), and documents that went through a rename often carry two
//! spellings at once. [`parse_record`] folds every known spelling into the
//! canonical field before deserializing; nothing past this module sees the
//! aliases.

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use treon_core::{
    is_placeholder_label, Catalog, DailySessionRecord, RawScore, Rating, Session, SessionStatus,
    ShadeId,
};

// ---------------------------------------------------------------------------
// Field spellings
// ---------------------------------------------------------------------------

/// Canonical field name paired with the other spellings accepted for it.
pub type FieldSpellings = &'static [(&'static str, &'static [&'static str])];

/// A record shape read from a JSON document whose field names drifted.
pub trait StoredRecord: DeserializeOwned {
    /// Fields with more than one accepted spelling. The canonical name wins
    /// over the alternatives, which are tried in order.
    const FIELDS: FieldSpellings;
}

/// Deserialize one stored element into `T`, folding field spellings first.
///
/// For each field the first non-null spelling is kept under the canonical
/// name and every other spelling is dropped, so a document carrying both
/// `rating` and `score` still parses.
///
/// # Errors
///
/// Returns the underlying [`serde_json::Error`] if the folded value does not
/// match `T`.
pub fn parse_record<T: StoredRecord>(value: Value) -> Result<T, serde_json::Error> {
    let value = match value {
        Value::Object(map) => Value::Object(canonicalize(map, T::FIELDS)),
        other => other,
    };
    serde_json::from_value(value)
}

fn canonicalize(mut map: Map<String, Value>, fields: FieldSpellings) -> Map<String, Value> {
    for &(canonical, alternatives) in fields {
        let mut chosen = None;
        for name in std::iter::once(canonical).chain(alternatives.iter().copied()) {
            let value = map.remove(name);
            if chosen.is_none() {
                chosen = value.filter(|value| !value.is_null());
            }
        }
        if let Some(value) = chosen {
            map.insert(canonical.to_string(), value);
        }
    }
    map
}

// ---------------------------------------------------------------------------
// Lenient scalars
// ---------------------------------------------------------------------------

/// Timestamp encodings seen in stored records.
#[derive(Deserialize)]
#[serde(untagged)]
enum TimestampRepr {
    Rfc3339(DateTime<Utc>),
    EpochSeconds(i64),
    /// Exported document-store timestamps: `{"seconds": .., "nanoseconds": ..}`
    /// or the admin SDK's `{"_seconds": .., "_nanoseconds": ..}`.
    Split {
        #[serde(alias = "_seconds")]
        seconds: i64,
        #[serde(default, alias = "nanos", alias = "_nanoseconds")]
        nanoseconds: u32,
    },
}

impl TimestampRepr {
    fn into_datetime(self) -> Option<DateTime<Utc>> {
        match self {
            TimestampRepr::Rfc3339(at) => Some(at),
            TimestampRepr::EpochSeconds(seconds) => DateTime::from_timestamp(seconds, 0),
            TimestampRepr::Split {
                seconds,
                nanoseconds,
            } => DateTime::from_timestamp(seconds, nanoseconds),
        }
    }
}

/// Unparseable timestamps become `None` instead of failing the record.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|value| TimestampRepr::deserialize(value).ok())
        .and_then(TimestampRepr::into_datetime))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DurationRepr {
    Seconds(f64),
    Text(String),
}

/// Durations may be numbers or numeric strings; anything else is `None`.
fn lenient_duration<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|value| DurationRepr::deserialize(value).ok())
        .and_then(|repr| match repr {
            DurationRepr::Seconds(seconds) => Some(seconds),
            DurationRepr::Text(text) => text.trim().parse::<f64>().ok(),
        }))
}

// ---------------------------------------------------------------------------
// Ratings
// ---------------------------------------------------------------------------

/// A rating as stored on disk.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RatingRecord {
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub shade_id: Option<ShadeId>,
    #[serde(default)]
    pub shade_name: Option<String>,
    #[serde(default)]
    pub score: Option<RawScore>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl StoredRecord for RatingRecord {
    const FIELDS: FieldSpellings = &[
        ("shade_id", &["shadeId", "color_id", "colorId"]),
        ("shade_name", &["shadeName", "color_name", "colorName", "color"]),
        ("score", &["rating"]),
        (
            "submitted_at",
            &["submittedAt", "created_at", "createdAt", "timestamp"],
        ),
        ("user_id", &["userId"]),
    ];
}

impl RatingRecord {
    /// Convert to a canonical [`Rating`].
    ///
    /// A missing or placeholder shade name is looked up in `catalog` by
    /// brand and shade id. Records that still lack a name keep an empty one
    /// and are rejected later by aggregation.
    #[must_use]
    pub fn into_rating(self, catalog: Option<&Catalog>) -> Rating {
        let brand = self.brand.unwrap_or_default();
        let shade_name = self
            .shade_name
            .filter(|name| !is_placeholder_label(name))
            .or_else(|| {
                let id = self.shade_id.as_ref()?;
                catalog?.shade_name(&brand, id).map(str::to_string)
            })
            .unwrap_or_default();

        Rating {
            brand,
            shade_id: self.shade_id,
            shade_name,
            score: self.score,
            submitted_at: self.submitted_at,
            user_id: self.user_id,
        }
    }
}

/// A rating submitted through the CLI or HTTP API.
#[derive(Debug, Clone, Deserialize)]
pub struct NewRating {
    pub brand: String,
    #[serde(default)]
    pub shade_id: Option<ShadeId>,
    #[serde(default)]
    pub shade_name: Option<String>,
    pub score: RawScore,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl StoredRecord for NewRating {
    const FIELDS: FieldSpellings = &[
        ("shade_id", &["shadeId"]),
        ("shade_name", &["shadeName"]),
        ("score", &["rating"]),
        ("user_id", &["userId"]),
    ];
}

impl From<NewRating> for RatingRecord {
    fn from(new: NewRating) -> Self {
        Self {
            brand: Some(new.brand),
            shade_id: new.shade_id,
            shade_name: new.shade_name,
            score: Some(new.score),
            submitted_at: None,
            user_id: new.user_id,
        }
    }
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

/// A session as stored on disk.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub shade_id: Option<ShadeId>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub last_activity: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_duration")]
    pub duration_seconds: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl StoredRecord for SessionRecord {
    const FIELDS: FieldSpellings = &[
        ("brand", &["current_brand", "currentBrand"]),
        ("shade_id", &["current_shade_id", "currentShadeId", "shadeId"]),
        ("started_at", &["start_time", "startTime", "startedAt"]),
        ("last_activity", &["lastActivity"]),
        (
            "duration_seconds",
            &["duration_sec", "durationSec", "durationSeconds", "duration"],
        ),
        ("user_id", &["userId"]),
    ];
}

impl SessionRecord {
    #[must_use]
    pub fn into_session(self) -> Session {
        let status = match self.status.as_deref().map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("active") => SessionStatus::Active,
            _ => SessionStatus::Completed,
        };

        Session {
            id: self.id,
            brand: self.brand.filter(|b| !is_placeholder_label(b)),
            shade_id: self.shade_id,
            started_at: self.started_at,
            last_activity: self.last_activity,
            duration_seconds: self.duration_seconds,
            status,
            user_id: self
                .user_id
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub manually_added: bool,
}

impl StoredRecord for DailyRecord {
    const FIELDS: FieldSpellings = &[("manually_added", &["manuallyAdded"])];
}

impl From<DailyRecord> for DailySessionRecord {
    fn from(record: DailyRecord) -> Self {
        Self {
            date: record.date,
            count: record.count,
            manually_added: record.manually_added,
        }
    }
}
