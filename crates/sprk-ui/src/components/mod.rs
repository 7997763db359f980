//! Yew renditions of the Spark spinner and button.

mod button;
mod spinner;

pub use button::{SprkButton, SprkButtonProps};
pub use spinner::{SprkSpinner, SprkSpinnerProps};
