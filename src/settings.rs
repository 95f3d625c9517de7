use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;
use crate::login::AuthMethod;

const CONFIG_FILE: &str = "portal_export";
const ENV_PREFIX: &str = "PORTAL_EXPORT";

/// Runtime knobs for the export pipeline.
///
/// Read from an optional `portal_export.toml` next to the binary's working
/// directory, then overridden by `PORTAL_EXPORT_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Applied to every request that has no tighter bound of its own.
    pub request_timeout_secs: u64,
    pub extract_timeout_secs: u64,
    /// Pause before the content fetch so the portal can finish switching sector.
    pub settle_delay_ms: u64,
    /// Retries for GET requests that failed at the transport level.
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
    pub sector_path: String,
    pub sector_field: String,
    /// Page inspected for sectors. Falls back to the login URL.
    pub sectors_url: Option<String>,
    /// Used by the interactive flow; programmatic callers set it on `LoginConfig`.
    pub auth_method: AuthMethod,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            request_timeout_secs: 30,
            extract_timeout_secs: 10,
            settle_delay_ms: 2000,
            max_retries: 2,
            retry_backoff_ms: 500,
            sector_path: "selecionar-setor".to_string(),
            sector_field: "setor_id".to_string(),
            sectors_url: None,
            auth_method: AuthMethod::PostForm,
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        let cfg = Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;
        Ok(cfg.try_deserialize()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let cfg = Config::builder()
            .add_source(File::from(path))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;
        Ok(cfg.try_deserialize()?)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn extract_timeout(&self) -> Duration {
        Duration::from_secs(self.extract_timeout_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Backoff before retry number `attempt` (1-based): base, 2x base, 4x base...
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt.saturating_sub(1));
        Duration::from_millis(self.retry_backoff_ms.saturating_mul(factor))
    }
}
