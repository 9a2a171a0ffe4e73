//! Canonical domain types shared across the Treon workspace.
//!
//! Rating and session records arrive from several sources with drifting field
//! names; everything downstream of `treon-store` works with the types defined
//! here.

pub mod app_config;
pub mod catalog;
pub mod config;
pub mod ratings;
pub mod sessions;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use catalog::{load_catalog, parse_catalog, Catalog, CatalogProduct, CatalogShade};
pub use config::{load_app_config, load_app_config_from_env};
pub use ratings::{is_placeholder_label, RawScore, Rating, ShadeId, MAX_SCORE, MIN_SCORE};
pub use sessions::{DailySessionRecord, Session, SessionStatus};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read catalog file {path}: {source}")]
    CatalogFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog file: {0}")]
    CatalogFileParse(#[from] serde_yaml::Error),

    #[error("catalog validation failed: {0}")]
    Validation(String),
}
