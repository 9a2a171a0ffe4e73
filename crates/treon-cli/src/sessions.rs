//! `sessions` command handlers.

use chrono::{Datelike, Utc};
use clap::Subcommand;
use treon_core::AppConfig;
use treon_ratings::{
    format_duration, recent_sessions, session_overview, weekly_breakdown, DurationStats,
};
use treon_store::FileStore;

/// Sub-commands available under `sessions`.
#[derive(Debug, Subcommand)]
pub enum SessionsCommands {
    /// Average session length overall, today, and over the last 7 days
    Average,
    /// Sessions per week of a month
    Weekly {
        /// Defaults to the current year
        #[arg(long)]
        year: Option<i32>,

        /// 1-12, defaults to the current month
        #[arg(long)]
        month: Option<u32>,
    },
    /// The most recent sessions
    Recent {
        /// Defaults to TREON_RECENT_SESSIONS_LIMIT
        #[arg(long)]
        limit: Option<usize>,
    },
}

/// # Errors
///
/// Returns an error if a data file cannot be read or the month is invalid.
pub(crate) fn run(
    store: &FileStore,
    config: &AppConfig,
    command: SessionsCommands,
) -> anyhow::Result<()> {
    let sessions = store.sessions()?;

    match command {
        SessionsCommands::Average => {
            let overview = session_overview(&sessions, Utc::now());
            print_average("All time", &overview.overall);
            print_average("Today", &overview.today);
            print_average("Last 7 days", &overview.last_7_days);
            println!("{:<14}{}", "Unique users", overview.unique_users);
        }
        SessionsCommands::Weekly { year, month } => {
            let today = Utc::now().date_naive();
            let year = year.unwrap_or_else(|| today.year());
            let month = month.unwrap_or_else(|| today.month());
            let daily = store.daily_records()?;
            let breakdown = weekly_breakdown(&sessions, &daily, year, month)
                .ok_or_else(|| anyhow::anyhow!("invalid month {month}; expected 1-12"))?;

            println!("Sessions for {year}-{month:02}: {}", breakdown.total);
            for (index, count) in breakdown.weeks.iter().enumerate() {
                println!("  week {}: {count}", index + 1);
            }
        }
        SessionsCommands::Recent { limit } => {
            let limit = limit.unwrap_or(config.recent_sessions_limit);
            let recent = recent_sessions(&sessions, limit);
            if recent.is_empty() {
                println!("no sessions recorded");
                return Ok(());
            }

            println!("{:<14}{:<20}{:<18}{:<10}STATUS", "ID", "BRAND", "LAST SEEN", "DURATION");
            for session in recent {
                let seen = session
                    .latest_timestamp()
                    .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "-".to_string());
                let duration = session
                    .duration_seconds
                    .map_or_else(|| "-".to_string(), format_duration);
                println!(
                    "{:<14}{:<20}{:<18}{:<10}{}",
                    session.id.as_deref().unwrap_or("-"),
                    session.brand.as_deref().unwrap_or("-"),
                    seen,
                    duration,
                    session.status
                );
            }
        }
    }

    Ok(())
}

fn print_average(label: &str, stats: &DurationStats) {
    println!(
        "{label:<14}{} ({} of {} sessions timed)",
        format_duration(stats.average_seconds),
        stats.counted,
        stats.total_sessions
    );
}
