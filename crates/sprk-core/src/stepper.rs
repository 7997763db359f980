//! Stepper behavior: a sequence of steps kept in sync with tab panels and a carousel.
//!
//! # Design
//! - Exactly one step carries the selected class after any transition; the
//!   initial selection is whatever the markup declares.
//! - User-driven changes (click, keyboard) navigate the carousel; changes the
//!   carousel reports on the bus only update the steps, so the two never
//!   ping-pong.
//! - Steps without a `role="tab"` trigger are decorative and get no click handler.

use std::rc::Rc;

use sprk_events::{Event, EventBus, Subscription};
use tracing::{debug, trace, warn};

use crate::carousel::{ATTR_CAROUSEL, CarouselAdapter};
use crate::config::SprkConfig;
use crate::dom::{DomElement, DomEvent, EventKind};
use crate::error::DomResult;
use crate::selector::{Selector, for_each_element};
use crate::tabs::{TabStyle, find_active_index, handle_keydown, select_index};

/// Structural marker: `container`, `step`, `description`, or `slider`.
pub const ATTR_STEPPER: &str = "data-sprk-stepper";
/// Identifier of the partner carousel.
pub const ATTR_STEPPER_CAROUSEL: &str = "data-sprk-stepper-carousel";

/// Live wiring for one stepper; dropping it detaches every handler.
pub struct StepperBindings<E: DomElement> {
    steps: Rc<Vec<E>>,
    slider: Option<E>,
    style: Rc<TabStyle>,
    listeners: Vec<E::Listener>,
    _slides: Subscription,
}

impl<E: DomElement> StepperBindings<E> {
    /// Steps in document order.
    #[must_use]
    pub fn steps(&self) -> &[E] {
        &self.steps
    }

    /// Slider indicator, when the stepper has descriptions.
    #[must_use]
    pub const fn slider(&self) -> Option<&E> {
        self.slider.as_ref()
    }

    /// Index of the selected step.
    #[must_use]
    pub fn active_index(&self) -> Option<usize> {
        find_active_index(&self.steps, &self.style.active)
    }

    /// Number of DOM listeners attached (one click per trigger, one keydown per step).
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

fn slider_for<E: DomElement>(container: &E, config: &SprkConfig) -> DomResult<Option<E>> {
    let has_description = container
        .query_selector(&Selector::attr_eq(ATTR_STEPPER, "description"))?
        .is_some();
    if !has_description {
        return Ok(None);
    }
    if let Some(existing) = container.query_selector(&Selector::attr_eq(ATTR_STEPPER, "slider"))? {
        return Ok(Some(existing));
    }
    let slider = container.create_element("li")?;
    slider.add_class(&config.stepper.slider)?;
    slider.set_attribute(ATTR_STEPPER, "slider")?;
    container.prepend_child(&slider)?;
    Ok(Some(slider))
}

/// Wire a stepper container to `adapter`, the carousel identified by `carousel_id`.
///
/// Returns `None` when the container holds no steps.
///
/// # Errors
///
/// Propagates adapter failures raised while tagging the markup.
pub fn bind_stepper<E, C>(
    container: &E,
    carousel_id: &str,
    adapter: C,
    bus: &EventBus,
    config: &SprkConfig,
) -> DomResult<Option<StepperBindings<E>>>
where
    E: DomElement,
    C: CarouselAdapter + 'static,
{
    let steps = container.query_selector_all(&Selector::attr_eq(ATTR_STEPPER, "step"))?;
    let (Some(first), Some(last)) = (steps.first(), steps.last()) else {
        trace!("stepper without steps skipped");
        return Ok(None);
    };
    first.add_class(&config.stepper.first)?;
    last.add_class(&config.stepper.last)?;

    let steps = Rc::new(steps);
    let panels = Rc::new(container.query_selector_all(&Selector::attr_eq("role", "tabpanel"))?);
    let style = Rc::new(TabStyle::stepper(config));
    let adapter = Rc::new(adapter);
    let slider = slider_for(container, config)?;
    let trigger = Selector::attr_eq("role", "tab");
    let mut listeners = Vec::with_capacity(steps.len() * 2);

    for (index, step) in steps.iter().enumerate() {
        let Some(step_trigger) = step.query_selector(&trigger)? else {
            trace!(index, "step without trigger left unbound");
            continue;
        };
        if slider.is_some() {
            step.add_class(&config.stepper.has_slider)?;
        }
        let steps = Rc::clone(&steps);
        let panels = Rc::clone(&panels);
        let style = Rc::clone(&style);
        let adapter = Rc::clone(&adapter);
        let slider = slider.clone();
        listeners.push(step_trigger.listen(
            EventKind::Click,
            Box::new(move |event: &DomEvent| {
                event.prevent_default();
                if let Err(err) = select_index(index, &steps, &panels, &style, slider.as_ref()) {
                    warn!(error = %err, index, "failed to select step");
                    return;
                }
                adapter.slide_to(index);
            }),
        ));
    }

    for (position, step) in steps.iter().enumerate() {
        let steps = Rc::clone(&steps);
        let panels = Rc::clone(&panels);
        let style = Rc::clone(&style);
        let adapter = Rc::clone(&adapter);
        let slider = slider.clone();
        listeners.push(step.listen(
            EventKind::Keydown,
            Box::new(move |event: &DomEvent| {
                match handle_keydown(event, &steps, &panels, &style, slider.as_ref()) {
                    Ok(Some(index)) => adapter.slide_to(index),
                    Ok(None) => {}
                    Err(err) => {
                        warn!(error = %err, step = position, "failed to handle stepper keydown");
                    }
                }
            }),
        ));
    }

    let slides = {
        let steps = Rc::clone(&steps);
        let panels = Rc::clone(&panels);
        let style = Rc::clone(&style);
        let slider = slider.clone();
        let carousel_id = carousel_id.to_string();
        bus.subscribe(move |envelope| {
            let Event::CarouselSlide { carousel, index } = &envelope.event else {
                return;
            };
            if *carousel != carousel_id {
                return;
            }
            if *index >= steps.len() {
                trace!(index, steps = steps.len(), "carousel slide beyond last step ignored");
                return;
            }
            if let Err(err) = select_index(*index, &steps, &panels, &style, slider.as_ref()) {
                warn!(error = %err, index, "failed to follow carousel slide");
            }
        })
    };

    debug!(
        steps = steps.len(),
        panels = panels.len(),
        slider = slider.is_some(),
        carousel = carousel_id,
        "stepper bound"
    );
    Ok(Some(StepperBindings {
        steps,
        slider,
        style,
        listeners,
        _slides: slides,
    }))
}

/// Bind every `[data-sprk-stepper="container"]` under `root` that names a
/// partner carousel present in the document. `factory` builds the adapter from
/// the partner's container element.
///
/// Containers without a partner, or whose binding fails, are skipped.
///
/// # Errors
///
/// Propagates adapter failures from the container query.
pub fn init_steppers<E, C, F>(
    root: &E,
    bus: &EventBus,
    config: &SprkConfig,
    mut factory: F,
) -> DomResult<Vec<StepperBindings<E>>>
where
    E: DomElement,
    C: CarouselAdapter + 'static,
    F: FnMut(&E) -> DomResult<C>,
{
    let mut bound = Vec::new();
    for_each_element(root, &Selector::attr_eq(ATTR_STEPPER, "container"), |container| {
        let Some(carousel_id) = container.attribute(ATTR_STEPPER_CAROUSEL) else {
            debug!("stepper without partner carousel skipped");
            return;
        };
        let partner = match root.query_selector(&Selector::attr_eq(ATTR_CAROUSEL, &carousel_id)) {
            Ok(Some(partner)) => partner,
            Ok(None) => {
                warn!(carousel = %carousel_id, "stepper partner carousel not found");
                return;
            }
            Err(err) => {
                warn!(error = %err, carousel = %carousel_id, "stepper partner lookup failed");
                return;
            }
        };
        let result = factory(&partner)
            .and_then(|adapter| bind_stepper(container, &carousel_id, adapter, bus, config));
        match result {
            Ok(Some(bindings)) => bound.push(bindings),
            Ok(None) => {}
            Err(err) => warn!(error = %err, carousel = %carousel_id, "failed to bind stepper"),
        }
    })?;
    Ok(bound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::{ATTR_SLIDE, DomCarousel};
    use crate::dom::memory::MemoryElement;
    use crate::dom::{Geometry, NavKey};
    use std::cell::RefCell;

    const SELECTED: &str = "sprk-c-Stepper__step--selected";

    #[derive(Default)]
    struct RecordingCarousel {
        calls: RefCell<Vec<usize>>,
    }

    impl CarouselAdapter for RecordingCarousel {
        fn slide_to(&self, index: usize) {
            self.calls.borrow_mut().push(index);
        }
    }

    struct Fixture {
        root: MemoryElement,
        container: MemoryElement,
        steps: Vec<MemoryElement>,
        triggers: Vec<Option<MemoryElement>>,
        panels: Vec<MemoryElement>,
    }

    fn fixture(count: usize, with_description: bool, untriggered: &[usize]) -> Fixture {
        let root = MemoryElement::new("body");
        let container = root.append_new("ol").unwrap();
        container.set_attribute(ATTR_STEPPER, "container").unwrap();
        container.set_attribute(ATTR_STEPPER_CAROUSEL, "c1").unwrap();
        let mut steps = Vec::new();
        let mut triggers = Vec::new();
        for i in 0..count {
            let step = container.append_new("li").unwrap();
            step.set_attribute(ATTR_STEPPER, "step").unwrap();
            let geometry = Geometry {
                top: 40.0 * f64::from(u32::try_from(i).unwrap()),
                height: 40.0,
                ..Geometry::default()
            };
            step.set_geometry(geometry);
            if untriggered.contains(&i) {
                triggers.push(None);
            } else {
                let trigger = step.append_new("a").unwrap();
                trigger.set_attribute("role", "tab").unwrap();
                trigger.set_text_content(&format!("Step {i}"));
                triggers.push(Some(trigger));
            }
            if with_description {
                let desc = step.append_new("p").unwrap();
                desc.set_attribute(ATTR_STEPPER, "description").unwrap();
            }
            steps.push(step);
        }
        let panels = (0..count)
            .map(|_| {
                let panel = container.append_new("div").unwrap();
                panel.set_attribute("role", "tabpanel").unwrap();
                panel
            })
            .collect();
        Fixture {
            root,
            container,
            steps,
            triggers,
            panels,
        }
    }

    fn bind(fx: &Fixture, bus: &EventBus) -> (StepperBindings<MemoryElement>, Rc<RecordingCarousel>) {
        let carousel = Rc::new(RecordingCarousel::default());
        let bindings = bind_stepper(
            &fx.container,
            "c1",
            Rc::clone(&carousel),
            bus,
            &SprkConfig::default(),
        )
        .unwrap()
        .unwrap();
        (bindings, carousel)
    }

    fn selected(fx: &Fixture) -> Vec<usize> {
        fx.steps
            .iter()
            .enumerate()
            .filter(|(_, step)| step.has_class(SELECTED))
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn click_selects_step_and_navigates_carousel_once() {
        let fx = fixture(4, false, &[]);
        let bus = EventBus::new();
        let (bindings, carousel) = bind(&fx, &bus);

        assert!(fx.triggers[2].as_ref().unwrap().click());
        assert_eq!(selected(&fx), vec![2]);
        assert_eq!(bindings.active_index(), Some(2));
        assert_eq!(*carousel.calls.borrow(), vec![2]);
        assert!(!fx.panels[2].has_class("sprk-u-HideWhenJs"));
        for i in [0, 1, 3] {
            assert!(fx.panels[i].has_class("sprk-u-HideWhenJs"));
            assert_eq!(fx.steps[i].attribute("aria-selected").as_deref(), Some("false"));
        }
    }

    #[test]
    fn boundary_classes_tag_first_and_last() {
        let fx = fixture(3, false, &[]);
        let bus = EventBus::new();
        let _bound = bind(&fx, &bus);
        assert!(fx.steps[0].has_class("sprk-c-Stepper__step--first"));
        assert!(fx.steps[2].has_class("sprk-c-Stepper__step--last"));
        assert!(!fx.steps[1].has_class("sprk-c-Stepper__step--first"));
        assert!(!fx.steps[1].has_class("sprk-c-Stepper__step--last"));
    }

    #[test]
    fn description_creates_single_slider() {
        let fx = fixture(3, true, &[]);
        let bus = EventBus::new();
        let (bindings, _carousel) = bind(&fx, &bus);
        let slider = bindings.slider().unwrap().clone();
        assert_eq!(fx.container.children().first(), Some(&slider));
        assert!(slider.has_class("sprk-c-Stepper__slider"));
        assert_eq!(slider.attribute(ATTR_STEPPER).as_deref(), Some("slider"));
        assert!(fx.steps.iter().all(|s| s.has_class("sprk-c-Stepper__step--has-slider")));

        let _ = fx.triggers[1].as_ref().unwrap().click();
        assert_eq!(slider.style_property("top").as_deref(), Some("40px"));
        assert_eq!(slider.style_property("height").as_deref(), Some("40px"));
        assert!(slider.has_class("sprk-c-Stepper__slider--active"));

        drop(bindings);
        let (again, _carousel) = bind(&fx, &bus);
        assert_eq!(again.slider(), Some(&slider));
        let sliders = fx
            .container
            .query_selector_all(&Selector::attr_eq(ATTR_STEPPER, "slider"))
            .unwrap();
        assert_eq!(sliders.len(), 1);
    }

    #[test]
    fn no_slider_without_description() {
        let fx = fixture(2, false, &[]);
        let bus = EventBus::new();
        let (bindings, _carousel) = bind(&fx, &bus);
        assert!(bindings.slider().is_none());
        assert!(!fx.steps[0].has_class("sprk-c-Stepper__step--has-slider"));
    }

    #[test]
    fn steps_without_trigger_are_skipped() {
        let fx = fixture(3, false, &[1]);
        let bus = EventBus::new();
        let (bindings, carousel) = bind(&fx, &bus);
        assert_eq!(bindings.listener_count(), 5);
        assert!(!fx.steps[1].click());
        assert!(selected(&fx).is_empty());
        assert!(carousel.calls.borrow().is_empty());
        let _ = fx.triggers[2].as_ref().unwrap().click();
        assert_eq!(selected(&fx), vec![2]);
    }

    #[test]
    fn keyboard_navigation_wraps_and_syncs_carousel() {
        let fx = fixture(3, false, &[]);
        let bus = EventBus::new();
        let (_bindings, carousel) = bind(&fx, &bus);
        let _ = fx.triggers[2].as_ref().unwrap().click();

        let _ = fx.steps[2].press_key(NavKey::Next);
        assert_eq!(selected(&fx), vec![0]);
        let _ = fx.steps[0].press_key(NavKey::Previous);
        assert_eq!(selected(&fx), vec![2]);
        let _ = fx.steps[2].press_key(NavKey::First);
        assert_eq!(selected(&fx), vec![0]);
        assert_eq!(*carousel.calls.borrow(), vec![2, 0, 2, 0]);

        assert!(fx.steps[0].press_key(NavKey::Tab));
        assert!(fx.panels[0].is_focused());
        assert_eq!(carousel.calls.borrow().len(), 4);
    }

    #[test]
    fn tab_key_only_moves_focus_into_an_active_panel() {
        let fx = fixture(3, false, &[]);
        let bus = EventBus::new();
        let (_bindings, carousel) = bind(&fx, &bus);

        assert!(!fx.steps[0].press_key(NavKey::Tab));

        let _ = fx.triggers[1].as_ref().unwrap().click();
        let back_tab = DomEvent::keydown(Some(NavKey::Tab)).with_shift(true);
        fx.steps[1].dispatch(&back_tab);
        assert!(!back_tab.default_prevented());
        assert!(fx.steps[1].is_focused());

        let link = fx.panels[1].append_new("a").unwrap();
        link.focus().unwrap();
        assert!(!link.press_key(NavKey::Tab));
        assert!(link.is_focused());
        assert_eq!(*carousel.calls.borrow(), vec![1]);
    }

    #[test]
    fn arrow_keys_inside_a_panel_leave_the_steps_alone() {
        let fx = fixture(3, false, &[]);
        let bus = EventBus::new();
        let (_bindings, carousel) = bind(&fx, &bus);
        let _ = fx.triggers[1].as_ref().unwrap().click();

        let input = fx.panels[1].append_new("input").unwrap();
        assert!(!input.press_key(NavKey::Next));
        assert_eq!(selected(&fx), vec![1]);
        assert_eq!(*carousel.calls.borrow(), vec![1]);

        let _ = fx.triggers[1].as_ref().unwrap().press_key(NavKey::Next);
        assert_eq!(selected(&fx), vec![2]);
        assert_eq!(*carousel.calls.borrow(), vec![1, 2]);
    }

    #[test]
    fn carousel_slide_event_selects_without_navigating() {
        let fx = fixture(4, false, &[]);
        let bus = EventBus::new();
        let (_bindings, carousel) = bind(&fx, &bus);

        let _ = bus.publish(Event::CarouselSlide {
            carousel: "c1".into(),
            index: 3,
        });
        assert_eq!(selected(&fx), vec![3]);
        assert!(carousel.calls.borrow().is_empty());

        let _ = bus.publish(Event::CarouselSlide {
            carousel: "other".into(),
            index: 1,
        });
        let _ = bus.publish(Event::CarouselSlide {
            carousel: "c1".into(),
            index: 9,
        });
        assert_eq!(selected(&fx), vec![3]);
    }

    #[test]
    fn empty_container_binds_nothing() {
        let root = MemoryElement::new("body");
        let container = root.append_new("ol").unwrap();
        let bus = EventBus::new();
        let bound = bind_stepper(
            &container,
            "c1",
            RecordingCarousel::default(),
            &bus,
            &SprkConfig::default(),
        )
        .unwrap();
        assert!(bound.is_none());
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn init_pairs_steppers_with_their_carousels() {
        let fx = fixture(3, false, &[]);
        let carousel_el = fx.root.append_new("div").unwrap();
        carousel_el.set_attribute(ATTR_CAROUSEL, "c1").unwrap();
        let slides: Vec<_> = (0..3)
            .map(|_| {
                let slide = carousel_el.append_new("div").unwrap();
                slide.set_attribute(ATTR_SLIDE, "").unwrap();
                slide
            })
            .collect();

        let orphan = fx.root.append_new("ol").unwrap();
        orphan.set_attribute(ATTR_STEPPER, "container").unwrap();
        let missing = fx.root.append_new("ol").unwrap();
        missing.set_attribute(ATTR_STEPPER, "container").unwrap();
        missing.set_attribute(ATTR_STEPPER_CAROUSEL, "nowhere").unwrap();

        let bus = EventBus::new();
        let config = SprkConfig::default();
        let made = Rc::new(RefCell::new(Vec::new()));
        let bound = {
            let made = Rc::clone(&made);
            init_steppers(&fx.root, &bus, &config, |partner| {
                let carousel = Rc::new(DomCarousel::new(partner, &bus, &config)?);
                made.borrow_mut().push(Rc::clone(&carousel));
                Ok(carousel)
            })
            .unwrap()
        };
        assert_eq!(bound.len(), 1);
        assert_eq!(made.borrow().len(), 1);

        let _ = fx.triggers[1].as_ref().unwrap().click();
        assert!(slides[1].has_class("sprk-c-Carousel__slide--active"));

        let carousel = Rc::clone(&made.borrow()[0]);
        carousel.advance();
        assert_eq!(selected(&fx), vec![2]);
        assert_eq!(carousel.current(), 2);
    }
}
