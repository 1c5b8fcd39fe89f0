use secrecy::Secret;
use service_core::config::{self as core_config, get_env, get_optional_env, parse_env};
use service_core::error::AppError;
use std::time::Duration;

const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Model calls admitted per window, across all callers.
const DEFAULT_RATE_LIMIT_MAX_REQUESTS: u32 = 15;
const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 60;

const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

/// Screenshots arrive base64-encoded at up to 1280x720, well past axum's 2MB default.
const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct ClassroomConfig {
    pub common: core_config::Config,
    pub gemini: GeminiSettings,
    pub rate_limit: RateLimitSettings,
    pub http: HttpSettings,
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    /// Absent key means demo mode.
    pub api_key: Option<Secret<String>>,
    pub model: String,
    pub api_base: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct RateLimitSettings {
    pub max_requests: u32,
    pub window_secs: u64,
}

#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub allowed_origins: Vec<String>,
    pub max_body_bytes: usize,
}

impl Default for ClassroomConfig {
    fn default() -> Self {
        Self {
            common: core_config::Config::default(),
            gemini: GeminiSettings {
                api_key: None,
                model: DEFAULT_MODEL.to_string(),
                api_base: DEFAULT_API_BASE.to_string(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            },
            rate_limit: RateLimitSettings {
                max_requests: DEFAULT_RATE_LIMIT_MAX_REQUESTS,
                window_secs: DEFAULT_RATE_LIMIT_WINDOW_SECS,
            },
            http: HttpSettings {
                allowed_origins: parse_origins(DEFAULT_ALLOWED_ORIGINS),
                max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            },
        }
    }
}

impl ClassroomConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = core_config::is_production();

        let timeout_secs = get_env(
            "GEMINI_TIMEOUT_SECS",
            Some(&DEFAULT_TIMEOUT_SECS.to_string()),
            false,
        )?;
        let max_requests = get_env(
            "RATE_LIMIT_MAX_REQUESTS",
            Some(&DEFAULT_RATE_LIMIT_MAX_REQUESTS.to_string()),
            false,
        )?;
        let window_secs = get_env(
            "RATE_LIMIT_WINDOW_SECS",
            Some(&DEFAULT_RATE_LIMIT_WINDOW_SECS.to_string()),
            false,
        )?;
        let max_body_bytes = get_env(
            "MAX_BODY_BYTES",
            Some(&DEFAULT_MAX_BODY_BYTES.to_string()),
            false,
        )?;

        let config = ClassroomConfig {
            common: common_config,
            gemini: GeminiSettings {
                api_key: get_optional_env("GEMINI_API_KEY").map(Secret::new),
                model: get_env("GEMINI_MODEL", Some(DEFAULT_MODEL), false)?,
                api_base: get_env("GEMINI_API_BASE", Some(DEFAULT_API_BASE), false)?,
                timeout_secs: parse_env("GEMINI_TIMEOUT_SECS", &timeout_secs)?,
            },
            rate_limit: RateLimitSettings {
                max_requests: parse_env("RATE_LIMIT_MAX_REQUESTS", &max_requests)?,
                window_secs: parse_env("RATE_LIMIT_WINDOW_SECS", &window_secs)?,
            },
            http: HttpSettings {
                allowed_origins: parse_origins(&get_env(
                    "CORS_ALLOWED_ORIGINS",
                    Some(DEFAULT_ALLOWED_ORIGINS),
                    is_prod,
                )?),
                max_body_bytes: parse_env("MAX_BODY_BYTES", &max_body_bytes)?,
            },
        };

        if config.rate_limit.max_requests == 0 || config.rate_limit.window_secs == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "RATE_LIMIT_MAX_REQUESTS and RATE_LIMIT_WINDOW_SECS must be positive"
            )));
        }

        Ok(config)
    }

    /// No provider credential configured: every endpoint answers with canned data.
    pub fn is_demo_mode(&self) -> bool {
        self.gemini.api_key.is_none()
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit.window_secs)
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.gemini.timeout_secs)
    }
}

/// Split a comma-separated origin list, dropping blanks and duplicates.
pub fn parse_origins(raw: &str) -> Vec<String> {
    let mut origins: Vec<String> = Vec::new();
    for origin in raw
        .split(',')
        .map(|s| s.trim().trim_end_matches('/'))
        .filter(|s| !s.is_empty())
    {
        if !origins.iter().any(|o| o.eq_ignore_ascii_case(origin)) {
            origins.push(origin.to_string());
        }
    }
    origins
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_origins_trims_and_dedups() {
        let origins = parse_origins(" http://localhost:3000/ , ,http://localhost:5173,http://LOCALHOST:5173");
        assert_eq!(origins, vec!["http://localhost:3000", "http://localhost:5173"]);
    }

    #[test]
    fn default_config_is_demo_mode_with_classroom_limits() {
        let config = ClassroomConfig::default();
        assert!(config.is_demo_mode());
        assert_eq!(config.rate_limit.max_requests, 15);
        assert_eq!(config.rate_limit_window(), Duration::from_secs(60));
        assert_eq!(config.http.allowed_origins.len(), 2);
    }
}
