//! Library configuration

use serde::Deserialize;

use crate::methods::visibility::DISPLAY_VALUES;
use crate::{Result, SimpliError};

/// Fade effect timing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FadeConfig {
    /// Total duration when fadeIn/fadeOut get no timeout
    pub duration_ms: u64,
    /// Number of interval ticks per fade
    pub steps: u32,
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self {
            duration_ms: 300,
            steps: 25,
        }
    }
}

/// Simpli configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SimpliConfig {
    pub fade: FadeConfig,
    /// Display value `show()` applies when given none
    pub default_display: String,
}

impl Default for SimpliConfig {
    fn default() -> Self {
        Self {
            fade: FadeConfig::default(),
            default_display: "block".into(),
        }
    }
}

impl SimpliConfig {
    /// Load from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_fade_duration(mut self, ms: u64) -> Self {
        self.fade.duration_ms = ms;
        self
    }

    pub fn with_fade_steps(mut self, steps: u32) -> Self {
        self.fade.steps = steps;
        self
    }

    pub fn with_default_display(mut self, display: &str) -> Self {
        self.default_display = display.to_string();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.fade.steps == 0 {
            return Err(SimpliError::invalid_argument(
                "Invalid fade steps, it should be at least 1",
            ));
        }
        if self.default_display == "none" || !DISPLAY_VALUES.contains(&self.default_display.as_str()) {
            return Err(SimpliError::invalid_argument(format!(
                "Invalid default display '{}', it should be a visible display value",
                self.default_display
            )));
        }
        Ok(())
    }
}
