// Copyright 2025 Cowboy AI, LLC.

//! Scenario configuration
//!
//! Sources, highest precedence first:
//! 1. Builder calls on [`Scenario`](crate::Scenario)
//! 2. Environment variables (`CIM_NARRATIVE_*` prefix)
//! 3. JSON configuration
//! 4. Default values
//!
//! The layer qualifier belongs to one session and is fixed once the session
//! is created. Scenarios running side by side may target different layers.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{NarrativeError, NarrativeResult};

/// Environment variable naming the target implementation layer
pub const ENV_TARGET_LAYER: &str = "CIM_NARRATIVE_TARGET_LAYER";

/// Environment variable switching narration on or off (`true`/`false`/`1`/`0`)
pub const ENV_NARRATE: &str = "CIM_NARRATIVE_NARRATE";

/// Settings a behaviour session is created with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Namespace segment substituted into persona types, e.g. `service`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_layer: Option<String>,

    /// Whether steps are narrated
    pub narrate: bool,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            target_layer: None,
            narrate: true,
        }
    }
}

impl ScenarioConfig {
    /// Configuration targeting `layer`
    pub fn for_layer(layer: impl Into<String>) -> Self {
        Self {
            target_layer: Some(layer.into()),
            ..Self::default()
        }
    }

    /// Parse a JSON document, e.g. `{"target_layer": "service"}`
    pub fn from_json(json: &str) -> NarrativeResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden from the environment
    pub fn from_env() -> NarrativeResult<Self> {
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply `CIM_NARRATIVE_*` overrides
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(ENV_TARGET_LAYER) {
            let val = val.trim();
            self.target_layer = (!val.is_empty()).then(|| val.to_string());
        }
        if let Ok(val) = std::env::var(ENV_NARRATE) {
            match val.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => self.narrate = true,
                "false" | "0" | "no" | "off" => self.narrate = false,
                other => debug!(value = other, "Ignoring unrecognised {ENV_NARRATE}"),
            }
        }
    }

    /// The layer qualifier must be a single namespace segment
    pub fn validate(&self) -> NarrativeResult<()> {
        if let Some(layer) = &self.target_layer {
            let valid = !layer.is_empty()
                && layer.chars().all(|ch| ch.is_alphanumeric() || ch == '_');
            if !valid {
                return Err(NarrativeError::Config(format!(
                    "target layer '{layer}' is not a single namespace segment"
                )));
            }
        }
        Ok(())
    }
}
