//! Rating and session analytics for the Treon kiosk.
//!
//! Every function here is a pure reduction over a borrowed collection: callers
//! hand in the current record set and get a freshly built snapshot back.
//! Nothing is cached or carried between calls, so a result can never drift
//! from the records it was computed from.

pub mod aggregate;
pub mod format;
pub mod popularity;
pub mod sessions;
pub mod types;

pub use aggregate::{aggregate, validate_rating, RejectReason, ValidRating};
pub use format::{format_duration, format_popular, format_popular_shade, format_rating};
pub use popularity::{pick_popular, pick_popular_in_order, pick_popular_shade, resolve_popular};
pub use sessions::{
    average_duration, daily_duration_stats, recent_sessions, session_duration_stats,
    session_duration_stats_between, session_overview, unique_users, weekly_breakdown,
    weekly_duration_stats, DurationStats, SessionOverview, WeeklyBreakdown,
};
pub use types::{
    AggregationResult, BrandShadeKey, BrandShadeStats, BrandStats, PopularitySelection,
    RatingRollup, ShadePopularitySelection,
};
