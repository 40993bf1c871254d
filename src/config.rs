//! Application constants and environment-driven configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

pub const APP_NAME: &str = "Fertilog";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_BIND: &str = "127.0.0.1:8787";
const DEFAULT_SERVICE_TIMEOUT_SECS: u64 = 30;

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "fertilog=info,tower_http=warn"
}

/// Application data directory (`~/Fertilog`), created on startup.
pub fn app_data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(APP_NAME))
}

/// Runtime configuration, read once at startup. Every knob has a
/// `FERTILOG_*` environment override and a workable default.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub db_path: PathBuf,
    pub extraction_url: String,
    pub extraction_api_key: String,
    pub reasoning_url: String,
    pub reasoning_api_key: String,
    pub identity_url: String,
    pub mail_url: String,
    pub mail_api_key: String,
    pub mail_from: String,
    pub service_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let bind_addr = var_or("FERTILOG_BIND", DEFAULT_BIND)
            .parse::<SocketAddr>()
            .map_err(|err| format!("FERTILOG_BIND is not a socket address: {err}"))?;

        let db_path = match std::env::var("FERTILOG_DB") {
            Ok(path) => PathBuf::from(path),
            Err(_) => app_data_dir()
                .ok_or_else(|| "home directory not found; set FERTILOG_DB".to_string())?
                .join("fertilog.db"),
        };

        let service_timeout_secs = var_or("FERTILOG_SERVICE_TIMEOUT_SECS", "")
            .parse::<u64>()
            .unwrap_or(DEFAULT_SERVICE_TIMEOUT_SECS);

        Ok(Self {
            bind_addr,
            db_path,
            extraction_url: var_or("FERTILOG_EXTRACTION_URL", "http://127.0.0.1:9481"),
            extraction_api_key: var_or("FERTILOG_EXTRACTION_API_KEY", ""),
            reasoning_url: var_or("FERTILOG_REASONING_URL", "http://127.0.0.1:9482"),
            reasoning_api_key: var_or("FERTILOG_REASONING_API_KEY", ""),
            identity_url: var_or("FERTILOG_IDENTITY_URL", "http://127.0.0.1:9483"),
            mail_url: var_or("FERTILOG_MAIL_URL", "http://127.0.0.1:9484"),
            mail_api_key: var_or("FERTILOG_MAIL_API_KEY", ""),
            mail_from: var_or("FERTILOG_MAIL_FROM", "summary@fertilog.local"),
            service_timeout_secs,
        })
    }
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_matches_manifest() {
        assert_eq!(APP_VERSION, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn data_dir_is_under_home() {
        if let Some(dir) = app_data_dir() {
            assert!(dir.ends_with(APP_NAME));
        }
    }
}
