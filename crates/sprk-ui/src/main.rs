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
//! Spark behaviors wasm entry point; native builds only explain what the binary does.

#[cfg(target_arch = "wasm32")]
fn main() {
    sprk_ui::init();
}

#[cfg(not(target_arch = "wasm32"))]
fn native_hint() -> String {
    use sprk_core::carousel::ATTR_CAROUSEL;
    use sprk_core::spinner::ATTR_SPINNER;
    use sprk_core::stepper::ATTR_STEPPER;
    use sprk_core::tabs::ATTR_TABS;

    let hooks = [ATTR_SPINNER, ATTR_TABS, ATTR_STEPPER, ATTR_CAROUSEL]
        .map(|attr| format!("[{attr}]"))
        .join(", ");
    format!(
        "sprk-ui binds {hooks} in the browser and does nothing natively.\n\
         Build it with `trunk build` or `cargo build --target wasm32-unknown-unknown`.\n"
    )
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::io::Result<()> {
    use std::io::Write;

    std::io::stderr().lock().write_all(native_hint().as_bytes())
}
