use config::{Config, ConfigError, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    /// Base path of the remote proxy, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_base_url() -> String {
    "https://ifsc-proxy.ifsc-proxy.workers.dev/api".to_string()
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub log: LogSettings,
}

impl Settings {
    /// Load settings from `Config.toml` plus environment overrides.
    ///
    /// The file is optional; with no file and no environment the defaults
    /// point at the public proxy, so the SDK runs with zero setup.
    pub fn new() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name("Config").required(false))
            .build()?;

        let mut settings: Self = s.try_deserialize()?;

        if let Ok(base_url) = env::var("IFSC_API_BASE_URL") {
            let trimmed = base_url.trim();
            if !trimmed.is_empty() {
                settings.api.base_url = trimmed.trim_end_matches('/').to_string();
            }
        }
        if let Ok(raw_timeout) = env::var("IFSC_HTTP_TIMEOUT_MS") {
            if let Ok(timeout_ms) = raw_timeout.trim().parse::<u64>() {
                if timeout_ms > 0 {
                    settings.api.request_timeout_ms = timeout_ms;
                }
            }
        }
        if let Ok(level) = env::var("IFSC_LOG_LEVEL") {
            let trimmed = level.trim();
            if !trimmed.is_empty() {
                settings.log.level = trimmed.to_string();
            }
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_public_proxy() {
        let settings = Settings::default();
        assert_eq!(
            settings.api.base_url,
            "https://ifsc-proxy.ifsc-proxy.workers.dev/api"
        );
        assert_eq!(settings.api.request_timeout_ms, 10_000);
        assert_eq!(settings.log.level, "info");
    }
}
