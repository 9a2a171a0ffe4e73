//! Session duration and session volume statistics.

use std::collections::HashSet;
use std::ops::RangeBounds;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use treon_core::{DailySessionRecord, Session};

/// Weeks shown per month; days 29-31 fold into week 5.
const WEEKS_PER_MONTH: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DurationStats {
    /// Mean of the counted durations, unrounded. `0.0` when none counted.
    pub average_seconds: f64,
    /// Sessions with a usable duration.
    pub counted: u64,
    pub total_sessions: u64,
    pub total_seconds: f64,
}

fn usable_duration(session: &Session) -> Option<f64> {
    session
        .duration_seconds
        .filter(|seconds| seconds.is_finite() && *seconds > 0.0)
}

/// Duration statistics over every session with a positive duration.
///
/// Sessions with no, zero, negative, or non-finite durations are excluded
/// from both the sum and the count.
pub fn session_duration_stats<'a, I>(sessions: I) -> DurationStats
where
    I: IntoIterator<Item = &'a Session>,
{
    let mut stats = DurationStats::default();

    for session in sessions {
        stats.total_sessions += 1;
        if let Some(seconds) = usable_duration(session) {
            stats.total_seconds += seconds;
            stats.counted += 1;
        }
    }

    if stats.counted > 0 {
        #[allow(clippy::cast_precision_loss)]
        let counted = stats.counted as f64;
        stats.average_seconds = stats.total_seconds / counted;
    }

    tracing::debug!(
        counted = stats.counted,
        total = stats.total_sessions,
        average_seconds = stats.average_seconds,
        "computed session durations"
    );

    stats
}

/// Mean session length in seconds, `0.0` when no session has a usable duration.
pub fn average_duration<'a, I>(sessions: I) -> f64
where
    I: IntoIterator<Item = &'a Session>,
{
    session_duration_stats(sessions).average_seconds
}

/// Duration statistics over the sessions that started inside `window`.
///
/// Sessions without a start time fall outside every window, so
/// `total_sessions` counts only the sessions in range.
#[must_use]
pub fn session_duration_stats_between<R>(sessions: &[Session], window: R) -> DurationStats
where
    R: RangeBounds<DateTime<Utc>>,
{
    session_duration_stats(
        sessions
            .iter()
            .filter(move |session| session.started_at.is_some_and(|at| window.contains(&at))),
    )
}

fn start_of_day(at: DateTime<Utc>) -> DateTime<Utc> {
    at.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Sessions started on the UTC calendar day containing `now`.
#[must_use]
pub fn daily_duration_stats(sessions: &[Session], now: DateTime<Utc>) -> DurationStats {
    let midnight = start_of_day(now);
    session_duration_stats_between(sessions, midnight..midnight + Duration::days(1))
}

/// Sessions started between midnight seven days before `now` and `now`,
/// both ends included.
#[must_use]
pub fn weekly_duration_stats(sessions: &[Session], now: DateTime<Utc>) -> DurationStats {
    session_duration_stats_between(sessions, start_of_day(now - Duration::days(7))..=now)
}

/// Distinct non-blank user ids. When no session carries one, every session
/// is assumed to be a different customer and the session count is returned.
#[must_use]
pub fn unique_users(sessions: &[Session]) -> u64 {
    let users: HashSet<&str> = sessions
        .iter()
        .filter_map(|session| session.user_id.as_deref())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .collect();

    let count = if users.is_empty() {
        sessions.len()
    } else {
        users.len()
    };
    u64::try_from(count).unwrap_or(u64::MAX)
}

/// All-time, today, and trailing-week duration statistics plus the
/// unique-user count, as shown on the sessions dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SessionOverview {
    pub overall: DurationStats,
    pub today: DurationStats,
    pub last_7_days: DurationStats,
    pub unique_users: u64,
}

#[must_use]
pub fn session_overview(sessions: &[Session], now: DateTime<Utc>) -> SessionOverview {
    SessionOverview {
        overall: session_duration_stats(sessions),
        today: daily_duration_stats(sessions, now),
        last_7_days: weekly_duration_stats(sessions, now),
        unique_users: unique_users(sessions),
    }
}

/// Session counts for one calendar month, bucketed into weeks of the month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklyBreakdown {
    pub year: i32,
    pub month: u32,
    /// `weeks[0]` covers days 1-7, `weeks[4]` covers day 29 onward.
    pub weeks: [u64; WEEKS_PER_MONTH],
    pub total: u64,
}

impl WeeklyBreakdown {
    fn add(&mut self, day: u32, count: u64) {
        let index = usize::try_from(day.saturating_sub(1) / 7)
            .unwrap_or(WEEKS_PER_MONTH - 1)
            .min(WEEKS_PER_MONTH - 1);
        self.weeks[index] += count;
        self.total += count;
    }
}

/// Count sessions started in `year`/`month` per week of the month.
///
/// Recorded sessions are counted by their start date (UTC). Manually added
/// daily records add their count on top; daily records not flagged as manual
/// duplicate recorded sessions and are ignored. Sessions without a start time
/// are skipped.
///
/// Returns `None` if `month` is not 1-12.
#[must_use]
pub fn weekly_breakdown(
    sessions: &[Session],
    daily_records: &[DailySessionRecord],
    year: i32,
    month: u32,
) -> Option<WeeklyBreakdown> {
    NaiveDate::from_ymd_opt(year, month, 1)?;

    let mut breakdown = WeeklyBreakdown {
        year,
        month,
        weeks: [0; WEEKS_PER_MONTH],
        total: 0,
    };

    let in_month = |date: NaiveDate| date.year() == year && date.month() == month;

    for session in sessions {
        let Some(started_at) = session.started_at else {
            continue;
        };
        let date = started_at.date_naive();
        if in_month(date) {
            breakdown.add(date.day(), 1);
        }
    }

    for record in daily_records.iter().filter(|r| r.manually_added) {
        if in_month(record.date) {
            breakdown.add(record.date.day(), record.count);
        }
    }

    Some(breakdown)
}

/// The `limit` most recent sessions, newest first by last activity (or start
/// time). Sessions with no timestamp sort last.
#[must_use]
pub fn recent_sessions(sessions: &[Session], limit: usize) -> Vec<&Session> {
    let mut ordered: Vec<&Session> = sessions.iter().collect();
    ordered.sort_by(|a, b| b.latest_timestamp().cmp(&a.latest_timestamp()));
    ordered.truncate(limit);
    ordered
}
