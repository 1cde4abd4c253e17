use secrecy::Secret;
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::str::FromStr;
use std::time::Duration;

/// Gemini REST API base URL.
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model the frontend prompt was tuned against.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-pro-002";

/// Hard deadline for one upstream exchange.
pub const DEFAULT_UPSTREAM_TIMEOUT_MS: u64 = 15_000;

/// The only frontend allowed to call the relay cross-origin.
pub const DEFAULT_ALLOWED_ORIGINS: &str = "https://rathoreprachi05.github.io";

/// Request body limit (100 KiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 102_400;

#[derive(Debug, Clone, Deserialize)]
pub struct MedibotConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub gemini: GeminiSettings,
    pub cors: CorsConfig,
    pub server: ServerConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSettings {
    /// Not validated here: an empty key simply makes upstream calls fail.
    pub api_key: Secret<String>,
    pub api_base: String,
    pub model: String,
    pub timeout_ms: u64,
}

impl GeminiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
}

impl MedibotConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        Self::from_lookup(common, |key| std::env::var(key).ok())
    }

    /// Build the service settings from an arbitrary key lookup.
    pub fn from_lookup<F>(common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(MedibotConfig {
            common,
            gemini: GeminiSettings {
                api_key: Secret::new(get("GEMINI_API_KEY", "")),
                api_base: get("GEMINI_API_BASE", DEFAULT_GEMINI_API_BASE)
                    .trim_end_matches('/')
                    .to_string(),
                model: get("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
                timeout_ms: parse_or(
                    "UPSTREAM_TIMEOUT_MS",
                    lookup("UPSTREAM_TIMEOUT_MS"),
                    DEFAULT_UPSTREAM_TIMEOUT_MS,
                )?,
            },
            cors: CorsConfig {
                allowed_origins: parse_list(&get("ALLOWED_ORIGINS", DEFAULT_ALLOWED_ORIGINS)),
            },
            server: ServerConfig {
                max_body_bytes: parse_or(
                    "MAX_BODY_BYTES",
                    lookup("MAX_BODY_BYTES"),
                    DEFAULT_MAX_BODY_BYTES,
                )?,
            },
            observability: ObservabilityConfig {
                log_level: get("LOG_LEVEL", "info"),
                otlp_endpoint: lookup("OTLP_ENDPOINT").filter(|s| !s.trim().is_empty()),
            },
        })
    }
}

/// Split a comma-separated value, dropping blank entries.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(val) => val.trim().parse().map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!("{} has invalid value '{}': {}", key, val, e))
        }),
    }
}
