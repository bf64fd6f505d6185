//! Server configuration from the environment.
//!
//! Variables (a `.env` file is honoured):
//!   DATABASE_URL       Postgres connection string
//!   DATABASE_POOL_SIZE pool size (default 10)
//!   SERVER_PORT        listen port (default 5000)
//!   FONT_PATH          TrueType font embedded in reports
//!   REPORT_LAYOUT      optional YAML layout override
//!   CORS_ORIGIN        allowed origin (any when unset)

use std::path::PathBuf;

use temperament_core::{ReportLayout, Result};
use temperament_postgres::DatabaseConfig;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_FONT_PATH: &str = "./arial-unicode-ms.ttf";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub port: u16,
    pub font_path: PathBuf,
    pub layout_path: Option<PathBuf>,
    pub cors_origin: Option<String>,
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            database: DatabaseConfig::default(),
            port: env_opt("SERVER_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            font_path: env_opt("FONT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_FONT_PATH)),
            layout_path: env_opt("REPORT_LAYOUT").map(PathBuf::from),
            cors_origin: env_opt("CORS_ORIGIN"),
        }
    }

    /// The configured layout file, or the built-in defaults.
    pub fn layout(&self) -> Result<ReportLayout> {
        match &self.layout_path {
            Some(path) => ReportLayout::from_file(path),
            None => Ok(ReportLayout::default()),
        }
    }
}
