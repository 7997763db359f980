//! Page bootstrap decisions that need no browser.
//!
//! # Design
//! - Configuration overrides ride along in the page as
//!   `<script type="application/json" data-sprk-config>`; a missing or blank
//!   script means defaults.
//! - Carousel slide notifications carry `{ "index": n }` as their detail; the
//!   browser layer serializes the detail to JSON and decodes it here.
//! - Events dispatched by this crate carry the serialized [`Event`] as their
//!   detail, which the slide decoder also accepts.

use serde::Deserialize;
use sprk_core::{ConfigError, SprkConfig};
use sprk_events::Event;

/// Attribute marking the configuration script element.
pub const CONFIG_ATTR: &str = "data-sprk-config";

/// Resolve the configuration from the optional script body.
///
/// # Errors
///
/// Returns the decode or validation failure for a non-blank body.
pub fn config_from_script(text: Option<&str>) -> Result<SprkConfig, ConfigError> {
    match text.map(str::trim) {
        None | Some("") => Ok(SprkConfig::default()),
        Some(json) => SprkConfig::from_json(json),
    }
}

#[derive(Deserialize)]
struct SlideDetail {
    index: usize,
}

/// Slide index from a JSON-serialized carousel event detail.
#[must_use]
pub fn slide_index_from_detail(json: &str) -> Option<usize> {
    serde_json::from_str::<SlideDetail>(json)
        .ok()
        .map(|detail| detail.index)
}

/// JSON detail attached to a DOM event dispatched for `event`.
///
/// # Errors
///
/// Returns the serializer failure.
pub fn event_detail(event: &Event) -> Result<String, serde_json::Error> {
    serde_json::to_string(event)
}
