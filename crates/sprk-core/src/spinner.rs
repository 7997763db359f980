//! Loading-spinner behavior for click-triggered hosts.
//!
//! # Design
//! - The `data-sprk-has-spinner` attribute is the single source of truth for
//!   [`SpinnerState`]; nothing is cached on the Rust side.
//! - Starting is idempotent: a spinning host ignores further clicks.
//! - Cancelling is a broadcast over the bus, never a per-host token.

use sprk_events::{Event, EventBus, Subscription};
use tracing::{debug, trace, warn};

use crate::config::SprkConfig;
use crate::dom::{DomElement, DomEvent, EventKind};
use crate::error::DomResult;
use crate::selector::{Selector, for_each_element};

/// Marks a host; the value `click` starts spinning on click.
pub const ATTR_SPINNER: &str = "data-sprk-spinner";
/// Original text saved while spinning.
pub const ATTR_SAVED_TEXT: &str = "data-sprk-spinner-text";
/// `"true"` while spinning.
pub const ATTR_HAS_SPINNER: &str = "data-sprk-has-spinner";
/// Optional custom `aria-label` while spinning.
pub const ATTR_ARIA_LABEL: &str = "data-sprk-spinner-aria-label";
/// Optional size option (`large`).
pub const ATTR_SIZE: &str = "data-sprk-spinner-size";
/// Optional lightness option (`dark`).
pub const ATTR_LIGHTNESS: &str = "data-sprk-spinner-lightness";
/// Optional variant option (`dark`, `primary`, `secondary`).
pub const ATTR_VARIANT: &str = "data-sprk-spinner-variant";
/// Label used when the host declares none.
pub const DEFAULT_ARIA_LABEL: &str = "Loading";

const BASE_CLASSES: [&str; 2] = ["sprk-c-Spinner", "sprk-c-Spinner--circle"];

/// Spinner size modifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpinnerSize {
    /// `sprk-c-Spinner--large`.
    Large,
}

impl SpinnerSize {
    /// Parse the markup value; unknown values yield `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        (value == "large").then_some(Self::Large)
    }
}

/// Spinner lightness modifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpinnerLightness {
    /// `sprk-c-Spinner--dark`.
    Dark,
}

impl SpinnerLightness {
    /// Parse the markup value; unknown values yield `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        (value == "dark").then_some(Self::Dark)
    }
}

/// Spinner color variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpinnerVariant {
    /// `sprk-c-Spinner--dark`.
    Dark,
    /// `sprk-c-Spinner--primary`.
    Primary,
    /// `sprk-c-Spinner--secondary`.
    Secondary,
}

impl SpinnerVariant {
    /// Parse the markup value; unknown values yield `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "dark" => Some(Self::Dark),
            "primary" => Some(Self::Primary),
            "secondary" => Some(Self::Secondary),
            _ => None,
        }
    }

    /// Modifier class for the variant.
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            Self::Dark => "sprk-c-Spinner--dark",
            Self::Primary => "sprk-c-Spinner--primary",
            Self::Secondary => "sprk-c-Spinner--secondary",
        }
    }
}

/// Visual options for a spinner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpinnerOptions {
    /// Size modifier.
    pub size: Option<SpinnerSize>,
    /// Lightness modifier.
    pub lightness: Option<SpinnerLightness>,
    /// Color variant.
    pub variant: Option<SpinnerVariant>,
}

impl SpinnerOptions {
    /// Read options from the host's `data-sprk-spinner-*` attributes.
    #[must_use]
    pub fn from_host<E: DomElement>(host: &E) -> Self {
        Self {
            size: host
                .attribute(ATTR_SIZE)
                .and_then(|value| SpinnerSize::parse(&value)),
            lightness: host
                .attribute(ATTR_LIGHTNESS)
                .and_then(|value| SpinnerLightness::parse(&value)),
            variant: host
                .attribute(ATTR_VARIANT)
                .and_then(|value| SpinnerVariant::parse(&value)),
        }
    }
}

/// Space-separated class list for a spinner with `options`.
#[must_use]
pub fn spinner_classes(options: &SpinnerOptions) -> String {
    let mut classes: Vec<&str> = BASE_CLASSES.to_vec();
    if options.size == Some(SpinnerSize::Large) {
        classes.push("sprk-c-Spinner--large");
    }
    let dark = options.lightness == Some(SpinnerLightness::Dark)
        || options.variant == Some(SpinnerVariant::Dark);
    if dark {
        classes.push(SpinnerVariant::Dark.class());
    }
    match options.variant {
        Some(variant @ (SpinnerVariant::Primary | SpinnerVariant::Secondary)) => {
            classes.push(variant.class());
        }
        Some(SpinnerVariant::Dark) | None => {}
    }
    classes.join(" ")
}

/// Whether a host is currently showing a spinner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpinnerState {
    /// Original content is showing.
    Idle,
    /// Content replaced by a spinner.
    Spinning,
}

impl SpinnerState {
    /// Read the state recorded on `host`.
    #[must_use]
    pub fn of<E: DomElement>(host: &E) -> Self {
        if host.attribute(ATTR_HAS_SPINNER).as_deref() == Some("true") {
            Self::Spinning
        } else {
            Self::Idle
        }
    }
}

/// Replace the host's content with a spinner using the default label.
///
/// Returns `Ok(false)` without touching the host when it is already spinning.
///
/// # Errors
///
/// Propagates adapter failures.
pub fn begin_spinning<E: DomElement>(host: &E, options: &SpinnerOptions) -> DomResult<bool> {
    spin(host, options, DEFAULT_ARIA_LABEL)
}

fn spin<E: DomElement>(host: &E, options: &SpinnerOptions, default_label: &str) -> DomResult<bool> {
    if SpinnerState::of(host) == SpinnerState::Spinning {
        trace!("spinner host already spinning");
        return Ok(false);
    }
    let label = host
        .attribute(ATTR_ARIA_LABEL)
        .unwrap_or_else(|| default_label.to_string());
    let width = host.geometry().width;

    host.set_attribute(ATTR_SAVED_TEXT, &host.text_content())?;
    host.set_attribute(ATTR_HAS_SPINNER, "true")?;
    host.set_attribute("style", &format!("width: {width}px"))?;
    host.set_text_content("");
    let graphic = host.create_element("div")?;
    for class in spinner_classes(options).split(' ') {
        graphic.add_class(class)?;
    }
    host.append_child(&graphic)?;
    host.set_attribute("aria-label", &label)?;
    trace!(%label, "spinner started");
    Ok(true)
}

/// Remove the spinner and restore the saved text and attributes.
///
/// # Errors
///
/// Propagates adapter failures.
pub fn end_spinning<E: DomElement>(host: &E) -> DomResult<()> {
    let text = host.attribute(ATTR_SAVED_TEXT).unwrap_or_default();
    host.set_text_content(&text);
    host.remove_attribute(ATTR_HAS_SPINNER)?;
    host.remove_attribute(ATTR_SAVED_TEXT)?;
    host.remove_attribute("style")?;
    host.remove_attribute("aria-label")?;
    trace!("spinner ended");
    Ok(())
}

/// End spinning on every spinning host under `root`; returns how many were stopped.
///
/// # Errors
///
/// Propagates adapter failures from the query.
pub fn cancel_all<E: DomElement>(root: &E) -> DomResult<usize> {
    let mut stopped = 0;
    for_each_element(root, &Selector::attr_eq(ATTR_HAS_SPINNER, "true"), |host| {
        match end_spinning(host) {
            Ok(()) => stopped += 1,
            Err(err) => warn!(error = %err, "failed to end spinner"),
        }
    })?;
    Ok(stopped)
}

/// Live spinner wiring; dropping it detaches every handler.
pub struct SpinnerBindings<E: DomElement> {
    listeners: Vec<E::Listener>,
    _cancel: Subscription,
}

impl<E: DomElement> SpinnerBindings<E> {
    /// Number of hosts with a click handler.
    #[must_use]
    pub fn host_count(&self) -> usize {
        self.listeners.len()
    }
}

/// Bind click-to-spin on every `[data-sprk-spinner="click"]` host under
/// `root` and subscribe to the cancel broadcast on `bus`.
///
/// # Errors
///
/// Propagates adapter failures from the host query.
pub fn init_spinners<E: DomElement>(
    root: &E,
    bus: &EventBus,
    config: &SprkConfig,
) -> DomResult<SpinnerBindings<E>> {
    let mut listeners = Vec::new();
    for_each_element(root, &Selector::attr_eq(ATTR_SPINNER, "click"), |host| {
        let target = host.clone();
        let label = config.spinner_aria_label.clone();
        let listener = host.listen(
            EventKind::Click,
            Box::new(move |_event: &DomEvent| {
                let options = SpinnerOptions::from_host(&target);
                if let Err(err) = spin(&target, &options, &label) {
                    warn!(error = %err, "failed to start spinner");
                }
            }),
        );
        listeners.push(listener);
    })?;

    let scope = root.clone();
    let cancel = bus.subscribe(move |envelope| {
        if envelope.event == Event::CancelSpinners {
            match cancel_all(&scope) {
                Ok(stopped) => debug!(stopped, "spinners cancelled"),
                Err(err) => warn!(error = %err, "failed to cancel spinners"),
            }
        }
    });
    debug!(hosts = listeners.len(), "spinners bound");
    Ok(SpinnerBindings {
        listeners,
        _cancel: cancel,
    })
}
