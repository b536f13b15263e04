//! Serializable bus configuration.

use serde::{Deserialize, Serialize};

use super::BusBuilder;
use crate::envelope::{Discard, LogHandler};
use crate::error::BusError;

/// What a hook does with the envelopes it receives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookPolicy {
    /// Drop silently.
    Discard,
    /// Log as a `tracing` warning.
    #[default]
    Log,
}

/// Bus settings loadable from JSON.
///
/// ```
/// use mailbus::{BusConfig, HookPolicy};
///
/// let config = BusConfig::from_json_str(r#"{"name": "billing", "dead_letters": "discard"}"#).unwrap();
/// assert_eq!(config.name.as_deref(), Some("billing"));
/// assert_eq!(config.dead_letters, HookPolicy::Discard);
/// assert_eq!(config.failed_posts, HookPolicy::Log);
///
/// let bus = config.builder().build();
/// assert_eq!(bus.id().name(), "billing");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BusConfig {
    pub name: Option<String>,
    pub dead_letters: HookPolicy,
    pub failed_posts: HookPolicy,
}

impl BusConfig {
    pub fn from_json_str(json: &str) -> Result<Self, BusError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_slice(json: &[u8]) -> Result<Self, BusError> {
        Ok(serde_json::from_slice(json)?)
    }

    pub fn to_json(&self) -> Result<String, BusError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Builder with this configuration applied.
    pub fn builder(&self) -> BusBuilder {
        BusBuilder::from_config(self)
    }
}

impl BusBuilder {
    /// Builder with the configured name and hook policies.
    ///
    /// Hooks set afterwards replace the configured ones.
    pub fn from_config(config: &BusConfig) -> Self {
        let mut builder = BusBuilder::new();
        if let Some(name) = &config.name {
            builder = builder.name(name.clone());
        }
        builder = match config.dead_letters {
            HookPolicy::Discard => builder.on_dead_letter(Discard),
            HookPolicy::Log => builder.on_dead_letter(LogHandler),
        };
        match config.failed_posts {
            HookPolicy::Discard => builder.on_failed_post(Discard),
            HookPolicy::Log => builder.on_failed_post(LogHandler),
        }
    }
}
