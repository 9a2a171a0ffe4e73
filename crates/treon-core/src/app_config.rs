use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// JSON array of rating records.
    pub ratings_path: PathBuf,
    /// JSON array of session records.
    pub sessions_path: PathBuf,
    /// Hand-entered daily session counts; unset disables them.
    pub daily_sessions_path: Option<PathBuf>,
    /// Product catalog YAML used to resolve shade names from ids.
    pub catalog_path: Option<PathBuf>,
    pub recent_sessions_limit: usize,
}
