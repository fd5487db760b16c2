//! Environment-driven configuration for the composition root.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::retriever::{DEFAULT_BASE_URL, DEFAULT_DAY_DELAY};
use crate::retry::{Backoff, RetryConfig};

/// Deployment profile selecting defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    /// Production keeps entries twice as long to reduce upstream traffic.
    pub const fn default_cache_timeout(self) -> Duration {
        match self {
            Self::Development => Duration::from_secs(24 * 60 * 60),
            Self::Production => Duration::from_secs(48 * 60 * 60),
        }
    }
}

/// Runtime configuration, read once at startup by the binary.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub secret_key: String,
    pub cache_dir: PathBuf,
    pub log_dir: PathBuf,
    pub cache_timeout: Duration,
    pub listen_addr: String,
    pub base_url: String,
    pub retry: RetryConfig,
    pub day_delay: Backoff,
}

impl AppConfig {
    /// Build the configuration from `COTIZA_*` environment variables,
    /// falling back to the profile's defaults. Unparseable values fall back
    /// silently; a misconfigured knob must not keep the service down.
    pub fn from_env() -> Self {
        let environment = env::var("COTIZA_ENV")
            .map(|name| Environment::from_name(&name))
            .unwrap_or(Environment::Development);

        let cache_timeout = env_u64("COTIZA_CACHE_TIMEOUT_SECS")
            .map(Duration::from_secs)
            .unwrap_or_else(|| environment.default_cache_timeout());

        let retry = RetryConfig {
            max_attempts: env_u64("COTIZA_RETRY_ATTEMPTS")
                .map(|n| n as u32)
                .unwrap_or(RetryConfig::default().max_attempts),
            ..RetryConfig::default()
        };

        let day_delay = match (
            env_u64("COTIZA_DAY_DELAY_MIN_MS"),
            env_u64("COTIZA_DAY_DELAY_MAX_MS"),
        ) {
            (Some(min), Some(max)) if min <= max => Backoff::Uniform {
                min: Duration::from_millis(min),
                max: Duration::from_millis(max),
            },
            _ => DEFAULT_DAY_DELAY,
        };

        Self {
            environment,
            secret_key: env::var("COTIZA_SECRET_KEY")
                .unwrap_or_else(|_| String::from("clave-secreta-por-defecto")),
            cache_dir: env_path("COTIZA_CACHE_DIR", "cache"),
            log_dir: env_path("COTIZA_LOG_DIR", "logs"),
            cache_timeout,
            listen_addr: env::var("COTIZA_LISTEN_ADDR")
                .unwrap_or_else(|_| String::from("0.0.0.0:8000")),
            base_url: env::var("COTIZA_BASE_URL")
                .unwrap_or_else(|_| String::from(DEFAULT_BASE_URL)),
            retry,
            day_delay,
        }
    }
}

fn env_u64(name: &str) -> Option<u64> {
    env::var(name).ok()?.trim().parse().ok()
}

fn env_path(name: &str, default: &str) -> PathBuf {
    env::var(name).map(PathBuf::from).unwrap_or_else(|_| PathBuf::from(default))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_environment_names_fall_back_to_development() {
        assert_eq!(Environment::from_name("production"), Environment::Production);
        assert_eq!(Environment::from_name("PROD"), Environment::Production);
        assert_eq!(Environment::from_name("development"), Environment::Development);
        assert_eq!(Environment::from_name("staging"), Environment::Development);
    }

    #[test]
    fn production_doubles_the_cache_timeout() {
        assert_eq!(
            Environment::Development.default_cache_timeout(),
            Duration::from_secs(24 * 60 * 60)
        );
        assert_eq!(
            Environment::Production.default_cache_timeout(),
            Duration::from_secs(48 * 60 * 60)
        );
    }
}
