//! Configuration loading and management
//!
//! Every section has defaults, so a YAML file only needs the keys it
//! changes:
//!
//! ```yaml
//! api:
//!   base_url: http://localhost:8080/api/v1
//! expenses:
//!   fetch_failure: clear
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default REST endpoint of the mock API
pub const DEFAULT_BASE_URL: &str = "https://67ac71475853dfff53dab929.mockapi.io/api/v1";

/// Remote entity source settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL resource paths are appended to
    pub base_url: String,

    /// Client timeout for every request
    pub timeout_secs: u64,

    /// Query parameter carrying the owner id on scoped list requests
    pub owner_param: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
            owner_param: "userId".to_string(),
        }
    }
}

/// What a failed `fetch_all` does to the collection already loaded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchFailurePolicy {
    /// Keep the last successfully fetched collection
    #[default]
    KeepPrevious,
    /// Empty the collection
    Clear,
}

/// Settings of one list store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    /// Blob store key of the persisted bookmarks and recently viewed ids
    pub storage_key: String,

    /// Version written into the persisted envelope
    pub storage_version: u32,

    pub fetch_failure: FetchFailurePolicy,

    /// Maximum length of the recently viewed list
    pub recently_viewed_limit: usize,

    /// Ignore fetch responses overtaken by a newer fetch
    pub discard_stale_fetches: bool,
}

impl ListConfig {
    pub fn with_storage_key(key: impl Into<String>) -> Self {
        Self {
            storage_key: key.into(),
            ..Default::default()
        }
    }
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            storage_key: "list-storage".to_string(),
            storage_version: 0,
            fetch_failure: FetchFailurePolicy::default(),
            recently_viewed_limit: 10,
            discard_stale_fetches: true,
        }
    }
}

/// Blob store key and version of a standalone persisted subset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSlot {
    pub storage_key: String,
    #[serde(default)]
    pub storage_version: u32,
}

impl StorageSlot {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            storage_key: key.into(),
            storage_version: 0,
        }
    }
}

/// Event bus settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Broadcast channel capacity
    pub capacity: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self { capacity: 1024 }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub vehicles: ListConfig,
    pub expenses: ListConfig,
    pub bookings: StorageSlot,
    pub auth: StorageSlot,
    pub events: EventsConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path))?;
        Self::from_yaml_str(&content).with_context(|| format!("invalid config file {}", path))
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings no store can work with
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            anyhow::bail!("api.base_url must not be empty");
        }
        if self.events.capacity == 0 {
            anyhow::bail!("events.capacity must be at least 1");
        }
        let keys = [
            ("vehicles", &self.vehicles.storage_key),
            ("expenses", &self.expenses.storage_key),
            ("bookings", &self.bookings.storage_key),
            ("auth", &self.auth.storage_key),
        ];
        for (section, key) in keys {
            if key.is_empty() {
                anyhow::bail!("{}.storage_key must not be empty", section);
            }
        }
        for (i, (section, key)) in keys.iter().enumerate() {
            if keys[..i].iter().any(|(_, other)| other == key) {
                anyhow::bail!("{}.storage_key '{}' is used twice", section, key);
            }
        }
        Ok(())
    }

    /// Create the default configuration
    ///
    /// Storage keys match the ones the mobile apps persisted under.
    pub fn default_config() -> Self {
        Self {
            api: ApiConfig::default(),
            vehicles: ListConfig::with_storage_key("vehicle-storage"),
            expenses: ListConfig::with_storage_key("expense-storage"),
            bookings: StorageSlot::new("vehicle-bookings"),
            auth: StorageSlot::new("auth-storage"),
            events: EventsConfig::default(),
        }
    }
}
