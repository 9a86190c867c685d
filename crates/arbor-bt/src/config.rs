//! Tree driver configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{BtError, Result};

pub const DEFAULT_UPDATE_PERIOD: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct TreeConfig {
    /// Seconds between root evaluations. Zero or negative evaluates the root on every
    /// call to `tick`.
    pub update_period_seconds: f32,

    /// Install a `TraceLog` in the tree's blackboard so abort and reset events are kept.
    pub trace_log: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            update_period_seconds: DEFAULT_UPDATE_PERIOD,
            trace_log: false,
        }
    }
}

impl TreeConfig {
    pub fn every_call() -> Self {
        Self {
            update_period_seconds: 0.0,
            ..Self::default()
        }
    }

    pub fn with_update_period(mut self, seconds: f32) -> Self {
        self.update_period_seconds = seconds;
        self
    }

    pub fn with_trace_log(mut self, trace_log: bool) -> Self {
        self.trace_log = trace_log;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.update_period_seconds.is_finite() {
            return Err(BtError::InvalidUpdatePeriod(self.update_period_seconds));
        }
        Ok(())
    }

    /// Parse and validate a JSON document.
    #[cfg(feature = "serde")]
    #[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| BtError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a YAML document.
    #[cfg(feature = "serde")]
    #[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| BtError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
