//! Button class composition and the spinner shown inside a spinning button.

use crate::spinner::{SpinnerOptions, SpinnerVariant};

/// Button color variant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ButtonVariant {
    /// Base `sprk-c-Button`.
    #[default]
    Primary,
    /// `sprk-c-Button--secondary`.
    Secondary,
    /// `sprk-c-Button--tertiary`.
    Tertiary,
    /// `sprk-c-Button--quaternary`.
    Quaternary,
}

impl ButtonVariant {
    /// Modifier class, `None` for the primary variant.
    #[must_use]
    pub const fn class(self) -> Option<&'static str> {
        match self {
            Self::Primary => None,
            Self::Secondary => Some("sprk-c-Button--secondary"),
            Self::Tertiary => Some("sprk-c-Button--tertiary"),
            Self::Quaternary => Some("sprk-c-Button--quaternary"),
        }
    }

    /// Spinner variant that stays visible on this button's background.
    #[must_use]
    pub const fn spinner_variant(self) -> Option<SpinnerVariant> {
        match self {
            Self::Primary => None,
            Self::Secondary => Some(SpinnerVariant::Primary),
            Self::Tertiary => Some(SpinnerVariant::Secondary),
            Self::Quaternary => Some(SpinnerVariant::Dark),
        }
    }

    /// Spinner options for a spinning button of this variant.
    #[must_use]
    pub const fn spinner_options(self) -> SpinnerOptions {
        SpinnerOptions {
            size: None,
            lightness: None,
            variant: self.spinner_variant(),
        }
    }
}

/// Class list for a button.
#[must_use]
pub fn button_classes(variant: ButtonVariant, disabled: bool) -> Vec<&'static str> {
    let mut classes = vec!["sprk-c-Button"];
    classes.extend(variant.class());
    if disabled {
        classes.push("sprk-is-Disabled");
    }
    classes
}
