use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::ratings::ShadeId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Customer is still in front of the mirror.
    Active,
    #[default]
    Completed,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionStatus::Active => write!(f, "active"),
            SessionStatus::Completed => write!(f, "completed"),
        }
    }
}

/// One try-on session at the kiosk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub shade_id: Option<ShadeId>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_activity: Option<DateTime<Utc>>,
    /// Wall-clock length in seconds. Active sessions usually have none yet.
    #[serde(default)]
    pub duration_seconds: Option<f64>,
    #[serde(default)]
    pub status: SessionStatus,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl Session {
    /// The most recent timestamp known for this session.
    #[must_use]
    pub fn latest_timestamp(&self) -> Option<DateTime<Utc>> {
        self.last_activity.or(self.started_at)
    }
}

/// Session count entered by hand for a day the kiosk was offline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySessionRecord {
    pub date: NaiveDate,
    pub count: u64,
    #[serde(default)]
    pub manually_added: bool,
}
