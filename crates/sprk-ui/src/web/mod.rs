//! Page wiring: binds the controllers to the document and bridges DOM events onto the bus.
//!
//! # Design
//! - One [`EventBus`] per page; the window `sprk-cancel-spinners` event and
//!   each carousel's `sprk.carousel.slide` event are republished on it.
//! - Bindings live in a thread-local for the page lifetime; calling [`init`]
//!   again drops the previous set before the new one takes over.
//! - Failures are reported on the console and the affected widget is skipped.

mod element;

pub use element::WebElement;

use std::cell::RefCell;
use std::fmt::Display;

use gloo::console;
use gloo::events::EventListener;
use sprk_core::carousel::{ATTR_CAROUSEL, DomCarousel};
use sprk_core::dom::{DomElement, DomEvent, EventKind};
use sprk_core::selector::{Selector, for_each_element};
use sprk_core::spinner::{SpinnerBindings, init_spinners};
use sprk_core::stepper::{StepperBindings, init_steppers};
use sprk_core::tabs::{TabsBindings, init_tabs};
use sprk_core::{DomResult, SprkConfig};
use sprk_events::{Event, EventBus, topics};
use wasm_bindgen::JsValue;
use web_sys::{CustomEvent, CustomEventInit};

use crate::bootstrap::{CONFIG_ATTR, config_from_script, event_detail};

struct PageBindings {
    _bus: EventBus,
    _spinners: Option<SpinnerBindings<WebElement>>,
    _tabs: Vec<TabsBindings<WebElement>>,
    _steppers: Vec<StepperBindings<WebElement>>,
    _bridges: Vec<EventListener>,
}

thread_local! {
    static PAGE: RefCell<Option<PageBindings>> = const { RefCell::new(None) };
}

/// Bind every Spark behavior found in the current document.
pub fn init() {
    console_error_panic_hook::set_once();
    let Some(root) = gloo::utils::document().document_element() else {
        console::warn!("sprk init skipped: document has no root element");
        return;
    };
    let root = WebElement::from(root);
    let config = load_config(&root);
    let bus = EventBus::new();

    let spinners = reported("spinners", init_spinners(&root, &bus, &config));
    let tabs = reported("tabs", init_tabs(&root, &config)).unwrap_or_default();
    let steppers = reported(
        "steppers",
        init_steppers(&root, &bus, &config, |partner: &WebElement| {
            DomCarousel::new(partner, &bus, &config)
        }),
    )
    .unwrap_or_default();

    let mut bridges = vec![cancel_bridge(&bus)];
    bridges.extend(reported("carousel bridges", carousel_bridges(&root, &bus)).unwrap_or_default());

    console::debug!(format!(
        "sprk bound {} tab groups, {} steppers, {} bridges",
        tabs.len(),
        steppers.len(),
        bridges.len()
    ));
    let previous = PAGE.with(|page| {
        page.replace(Some(PageBindings {
            _bus: bus,
            _spinners: spinners,
            _tabs: tabs,
            _steppers: steppers,
            _bridges: bridges,
        }))
    });
    drop(previous);
}

/// Ask every spinning host on the page to stop by dispatching
/// `sprk-cancel-spinners` on the window.
pub fn cancel_all_spinners() {
    match cancel_event() {
        Ok(event) => {
            if let Err(err) = gloo::utils::window().dispatch_event(&event) {
                console::error!("sprk cancel dispatch failed", err);
            }
        }
        Err(err) => console::error!("sprk cancel event rejected", err),
    }
}

fn cancel_event() -> Result<CustomEvent, JsValue> {
    let event = Event::CancelSpinners;
    let detail = event_detail(&event).map_err(|err| JsValue::from_str(&err.to_string()))?;
    let init = CustomEventInit::new();
    init.set_detail(&js_sys::JSON::parse(&detail)?);
    CustomEvent::new_with_event_init_dict(topics::dom_event_name(&event), &init)
}

fn load_config(root: &WebElement) -> SprkConfig {
    let script = match root.query_selector(&Selector::has_attr(CONFIG_ATTR)) {
        Ok(script) => script,
        Err(err) => {
            console::warn!(format!("sprk config lookup failed: {err}"));
            None
        }
    };
    let text = script.map(|script| script.text_content());
    match config_from_script(text.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            console::warn!(format!("sprk config ignored: {err}"));
            SprkConfig::default()
        }
    }
}

fn reported<T, E: Display>(what: &str, result: Result<T, E>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            console::error!(format!("sprk {what} binding failed: {err}"));
            None
        }
    }
}

fn cancel_bridge(bus: &EventBus) -> EventListener {
    let bus = bus.clone();
    EventListener::new(
        &gloo::utils::window(),
        topics::CANCEL_SPINNERS,
        move |_| {
            let _ = bus.publish(Event::CancelSpinners);
        },
    )
}

fn carousel_bridges(root: &WebElement, bus: &EventBus) -> DomResult<Vec<EventListener>> {
    let mut listeners = Vec::new();
    for_each_element(root, &Selector::has_attr(ATTR_CAROUSEL), |container| {
        let carousel = container.attribute(ATTR_CAROUSEL).unwrap_or_default();
        let bus = bus.clone();
        listeners.push(container.listen(
            EventKind::CarouselSlide,
            Box::new(move |event: &DomEvent| {
                if let Some(index) = event.slide_index() {
                    let _ = bus.publish(Event::CarouselSlide {
                        carousel: carousel.clone(),
                        index,
                    });
                }
            }),
        ));
    })?;
    Ok(listeners)
}
