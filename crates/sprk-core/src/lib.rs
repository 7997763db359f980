#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]

//! Spark design-system behaviors: spinners, tabs, steppers, and the carousel
//! seam between them.
//!
//! Controllers are written against the [`dom::DomElement`] capability so the
//! same code drives the browser (through the wasm crate) and the in-memory
//! DOM used in tests. Global broadcasts such as "cancel every spinner" travel
//! over a [`sprk_events::EventBus`].

pub mod button;
pub mod carousel;
pub mod config;
pub mod dom;
pub mod error;
pub mod selector;
pub mod spinner;
pub mod stepper;
pub mod tabs;

pub use config::SprkConfig;
pub use error::{ConfigError, DomError, DomResult, SelectorError};
