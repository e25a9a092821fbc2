use std::net::SocketAddr;

use crate::error::AppError;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_CORS_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://127.0.0.1:3000"];

/// Service configuration loaded explicitly from environment variables.
///
/// Provider credentials are read by the provider client configs, not here.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server listens on.
    pub bind_addr: SocketAddr,
    /// Chat model used for evidence analysis.
    pub model: String,
    /// Browser origins allowed by the CORS layer.
    pub cors_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `BIND_ADDR` (default: "0.0.0.0:8000")
    /// - `OPENAI_MODEL` (default: "gpt-4o-mini")
    /// - `CORS_ALLOWED_ORIGINS`: comma-separated origins, at least one when set
    ///   (default: localhost:3000 on both loopback names)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let raw_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr.parse::<SocketAddr>().map_err(|e| {
            AppError::Config(format!("BIND_ADDR '{raw_addr}' is not a socket address: {e}"))
        })?;

        let model = lookup("OPENAI_MODEL")
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let cors_origins = match lookup("CORS_ALLOWED_ORIGINS") {
            Some(raw) => {
                let origins: Vec<String> = raw
                    .split(',')
                    .map(|o| o.trim().trim_end_matches('/').to_string())
                    .filter(|o| !o.is_empty())
                    .collect();
                if origins.is_empty() {
                    return Err(AppError::Config(
                        "CORS_ALLOWED_ORIGINS is set but lists no origins".to_string(),
                    ));
                }
                if let Some(bad) = origins
                    .iter()
                    .find(|o| !o.starts_with("http://") && !o.starts_with("https://"))
                {
                    return Err(AppError::Config(format!(
                        "CORS_ALLOWED_ORIGINS entry '{bad}' must be an http(s) origin"
                    )));
                }
                origins
            }
            None => DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        Ok(Self {
            bind_addr,
            model,
            cors_origins,
        })
    }
}
