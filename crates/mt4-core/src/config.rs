//! Configuration parsing for the pump gateway.
//!
//! The runner reads its settings from a single JSON config file: logging
//! metadata at the top level and a `pump` block with the pipeline knobs.
//!
//! # Example config
//!
//! ```json
//! {
//!   "module_name": "mt4_pump",
//!   "log_path": "/var/log/mt4-pump",
//!   "pump": {
//!     "pump_count": 3,
//!     "pump_allow_mt4_account": "1000-1999, 5000-5999",
//!     "terminal": "sim"
//!   }
//! }
//! ```
//!
//! `pump_count` and `pump_allow_mt4_account` keep their historical setting
//! names. The remaining knobs default to the production values and exist so
//! staging and tests can shorten the supervision intervals.

use std::time::Duration;

use serde::Deserialize;

use crate::error::Mt4Error;

/// Top-level application config, deserialized from a JSON file.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Module name, used as the log file prefix.
    pub module_name: Option<String>,

    /// Optional directory for daily-rotating log files.
    pub log_path: Option<String>,

    /// Pump pipeline settings.
    pub pump: PumpSettings,
}

impl AppConfig {
    /// Returns the effective module name, defaulting to `"mt4_pump"`.
    pub fn module_name(&self) -> &str {
        self.module_name.as_deref().unwrap_or("mt4_pump")
    }
}

/// Settings for the pump pool and its supervisors.
#[derive(Debug, Clone, Deserialize)]
pub struct PumpSettings {
    /// Number of redundant terminal sessions. Startup fails when < 1.
    pub pump_count: u32,

    /// Allowed account ranges, comma-separated `"low-high"` tokens.
    pub pump_allow_mt4_account: String,

    /// Terminal connector to use (see the pump registry).
    #[serde(default = "default_terminal")]
    pub terminal: String,

    /// Interval between supervision cycles per pump.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Delay between connect retries within one cycle.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Grace period for in-flight cycles to observe a stop request.
    #[serde(default = "default_stop_grace_ms")]
    pub stop_grace_ms: u64,

    /// Capacity of the shared trade queue.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Optional CPU core to pin the ingestion worker to.
    #[serde(default)]
    pub cpu_affinity_worker: Option<i32>,
}

fn default_terminal() -> String {
    "sim".to_string()
}

fn default_tick_interval_ms() -> u64 {
    10_000
}

fn default_retry_delay_ms() -> u64 {
    1_000
}

fn default_stop_grace_ms() -> u64 {
    1_000
}

fn default_queue_capacity() -> usize {
    20_000
}

impl PumpSettings {
    /// Validate the settings that are fatal at startup.
    pub fn validate(&self) -> Result<(), Mt4Error> {
        if self.pump_count < 1 {
            return Err(Mt4Error::Config(
                "pump_count must be a positive number of terminal sessions".to_string(),
            ));
        }
        if self.queue_capacity == 0 {
            return Err(Mt4Error::Config(
                "queue_capacity must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Interval between supervision cycles.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Delay between connect retries within one cycle.
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Grace period granted to in-flight cycles on stop.
    pub fn stop_grace(&self) -> Duration {
        Duration::from_millis(self.stop_grace_ms)
    }
}

/// Load and parse a JSON config file.
pub fn load_config(path: &std::path::Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}
