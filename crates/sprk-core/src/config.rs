//! Class tokens and defaults shared by the controllers.
//!
//! # Design
//! - Every field has a default matching the Spark CSS contract, so an empty
//!   JSON object is a valid override document.
//! - Overrides are validated as class tokens before any controller sees them.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Class names applied by the stepper controller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StepperClasses {
    /// Marks the active step.
    pub selected: String,
    /// Marks the first step.
    pub first: String,
    /// Marks the last step.
    pub last: String,
    /// Added to each step when a slider indicator is present.
    pub has_slider: String,
    /// Slider indicator element.
    pub slider: String,
    /// Slider indicator while tracking an active step.
    pub slider_active: String,
}

impl Default for StepperClasses {
    fn default() -> Self {
        Self {
            selected: "sprk-c-Stepper__step--selected".to_string(),
            first: "sprk-c-Stepper__step--first".to_string(),
            last: "sprk-c-Stepper__step--last".to_string(),
            has_slider: "sprk-c-Stepper__step--has-slider".to_string(),
            slider: "sprk-c-Stepper__slider".to_string(),
            slider_active: "sprk-c-Stepper__slider--active".to_string(),
        }
    }
}

/// Class names applied by the stand-alone tabs component.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TabsClasses {
    /// Marks the active tab button.
    pub active: String,
}

impl Default for TabsClasses {
    fn default() -> Self {
        Self {
            active: "sprk-c-Tabs__button--active".to_string(),
        }
    }
}

/// Behavior-layer configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SprkConfig {
    /// Stepper class names.
    pub stepper: StepperClasses,
    /// Tabs class names.
    pub tabs: TabsClasses,
    /// Utility class hiding inactive panels.
    pub hidden_panel: String,
    /// Active carousel slide.
    pub carousel_slide_active: String,
    /// `aria-label` applied to spinning hosts without a custom label.
    pub spinner_aria_label: String,
}

impl Default for SprkConfig {
    fn default() -> Self {
        Self {
            stepper: StepperClasses::default(),
            tabs: TabsClasses::default(),
            hidden_panel: "sprk-u-HideWhenJs".to_string(),
            carousel_slide_active: "sprk-c-Carousel__slide--active".to_string(),
            spinner_aria_label: "Loading".to_string(),
        }
    }
}

impl SprkConfig {
    /// Parse a JSON override document and validate its class tokens.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed input and
    /// [`ConfigError::InvalidClass`] for empty or whitespace-bearing tokens.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|source| ConfigError::Json { source })?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every class field holds exactly one token.
    ///
    /// # Errors
    ///
    /// Returns the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields: [(&'static str, &str); 9] = [
            ("stepper.selected", self.stepper.selected.as_str()),
            ("stepper.first", self.stepper.first.as_str()),
            ("stepper.last", self.stepper.last.as_str()),
            ("stepper.has_slider", self.stepper.has_slider.as_str()),
            ("stepper.slider", self.stepper.slider.as_str()),
            ("stepper.slider_active", self.stepper.slider_active.as_str()),
            ("tabs.active", self.tabs.active.as_str()),
            ("hidden_panel", self.hidden_panel.as_str()),
            ("carousel_slide_active", self.carousel_slide_active.as_str()),
        ];
        for (field, value) in fields {
            if value.is_empty() || value.chars().any(char::is_whitespace) {
                return Err(ConfigError::InvalidClass {
                    field,
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = SprkConfig::from_json("{}").unwrap();
        assert_eq!(config, SprkConfig::default());
        assert_eq!(config.stepper.selected, "sprk-c-Stepper__step--selected");
        assert_eq!(config.spinner_aria_label, "Loading");
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config =
            SprkConfig::from_json(r#"{"stepper":{"selected":"is-on"},"spinner_aria_label":"Working"}"#)
                .unwrap();
        assert_eq!(config.stepper.selected, "is-on");
        assert_eq!(config.stepper.first, "sprk-c-Stepper__step--first");
        assert_eq!(config.spinner_aria_label, "Working");
    }

    #[test]
    fn rejects_bad_tokens_and_unknown_fields() {
        let err = SprkConfig::from_json(r#"{"hidden_panel":"two words"}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidClass {
                field: "hidden_panel",
                ..
            }
        ));
        let err = SprkConfig::from_json(r#"{"nope":true}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json { .. }));
    }
}
