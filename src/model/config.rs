use serde::{Deserialize, Serialize};

/// Configuration from config.toml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Fallback filter when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub timeline: TimelineConfig,
    #[serde(default)]
    pub people: PeopleConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            log_level: default_log_level(),
            storage: StorageConfig::default(),
            timeline: TimelineConfig::default(),
            people: PeopleConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Key the snapshot is stored under
    #[serde(default = "default_storage_key")]
    pub key: String,
    /// Minimum spacing between background snapshot writes
    #[serde(default = "default_flush_interval_ms")]
    pub flush_interval_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            key: default_storage_key(),
            flush_interval_ms: default_flush_interval_ms(),
        }
    }
}

/// Upper bound for `timeline.days` and `timeline.step_days`
pub const MAX_TIMELINE_DAYS: u32 = 366;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineConfig {
    /// Number of days visible at once
    #[serde(default = "default_timeline_days")]
    pub days: u32,
    /// Days moved by one previous/next step
    #[serde(default = "default_timeline_step")]
    pub step_days: u32,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        TimelineConfig {
            days: default_timeline_days(),
            step_days: default_timeline_step(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeopleConfig {
    /// Seed two sample people into an empty directory
    #[serde(default)]
    pub seed_defaults: bool,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_storage_key() -> String {
    "kanbanState".to_string()
}

fn default_flush_interval_ms() -> u64 {
    1000
}

fn default_timeline_days() -> u32 {
    21
}

fn default_timeline_step() -> u32 {
    14
}
