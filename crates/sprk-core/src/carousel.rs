//! Carousel capability consumed by the stepper, plus a minimal DOM-backed carousel.
//!
//! The stepper only needs `slide_to`; slide changes a carousel makes on its
//! own travel back as [`Event::CarouselSlide`] on the bus.

use std::cell::Cell;
use std::rc::Rc;

use sprk_events::{Event, EventBus};
use tracing::{trace, warn};

use crate::config::SprkConfig;
use crate::dom::DomElement;
use crate::error::DomResult;
use crate::selector::Selector;

/// Carousel container identifier.
pub const ATTR_CAROUSEL: &str = "data-sprk-carousel";
/// Marks a slide inside a carousel container.
pub const ATTR_SLIDE: &str = "data-sprk-carousel-slide";

/// Indexed slide navigation.
pub trait CarouselAdapter {
    /// Show the slide at `index` without announcing it on the bus.
    fn slide_to(&self, index: usize);
}

impl<T: CarouselAdapter + ?Sized> CarouselAdapter for Rc<T> {
    fn slide_to(&self, index: usize) {
        (**self).slide_to(index);
    }
}

/// Carousel over the `[data-sprk-carousel-slide]` descendants of a container.
pub struct DomCarousel<E: DomElement> {
    id: String,
    slides: Vec<E>,
    active_class: String,
    bus: EventBus,
    current: Cell<usize>,
}

impl<E: DomElement> DomCarousel<E> {
    /// Collect the slides under `container`.
    ///
    /// # Errors
    ///
    /// Propagates adapter failures from the slide query.
    pub fn new(container: &E, bus: &EventBus, config: &SprkConfig) -> DomResult<Self> {
        let slides = container.query_selector_all(&Selector::has_attr(ATTR_SLIDE))?;
        let active_class = config.carousel_slide_active.clone();
        let current = slides
            .iter()
            .position(|slide| slide.has_class(&active_class))
            .unwrap_or(0);
        Ok(Self {
            id: container.attribute(ATTR_CAROUSEL).unwrap_or_default(),
            slides,
            active_class,
            bus: bus.clone(),
            current: Cell::new(current),
        })
    }

    /// Identifier from `data-sprk-carousel`.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Number of slides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Whether the carousel has no slides.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Index of the showing slide.
    #[must_use]
    pub fn current(&self) -> usize {
        self.current.get()
    }

    /// Advance one slide, wrapping, and announce it.
    pub fn advance(&self) {
        if !self.is_empty() {
            self.move_and_announce((self.current() + 1) % self.len());
        }
    }

    /// Go back one slide, wrapping, and announce it.
    pub fn retreat(&self) {
        if !self.is_empty() {
            let len = self.len();
            self.move_and_announce((self.current() + len - 1) % len);
        }
    }

    fn move_and_announce(&self, index: usize) {
        match self.show(index) {
            Ok(()) => {
                let _ = self.bus.publish(Event::CarouselSlide {
                    carousel: self.id.clone(),
                    index,
                });
            }
            Err(err) => {
                warn!(error = %err, carousel = %self.id, index, "failed to change slide");
            }
        }
    }

    fn show(&self, index: usize) -> DomResult<()> {
        let Some(target) = self.slides.get(index) else {
            trace!(index, len = self.len(), "slide index out of range");
            return Ok(());
        };
        for slide in &self.slides {
            slide.remove_class(&self.active_class)?;
            slide.set_attribute("aria-hidden", "true")?;
        }
        target.add_class(&self.active_class)?;
        target.set_attribute("aria-hidden", "false")?;
        self.current.set(index);
        Ok(())
    }
}

impl<E: DomElement> CarouselAdapter for DomCarousel<E> {
    fn slide_to(&self, index: usize) {
        if let Err(err) = self.show(index) {
            warn!(error = %err, carousel = %self.id, index, "failed to change slide");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::memory::MemoryElement;
    use std::cell::RefCell;

    fn carousel(count: usize) -> (MemoryElement, Vec<MemoryElement>) {
        let root = MemoryElement::new("body");
        let container = root.append_new("div").unwrap();
        container.set_attribute(ATTR_CAROUSEL, "hero").unwrap();
        let slides = (0..count)
            .map(|_| {
                let slide = container.append_new("div").unwrap();
                slide.set_attribute(ATTR_SLIDE, "").unwrap();
                slide
            })
            .collect();
        (container, slides)
    }

    #[test]
    fn slide_to_marks_slide_without_announcing() {
        let (container, slides) = carousel(3);
        let bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let _sub = {
            let seen = Rc::clone(&seen);
            bus.subscribe(move |env| seen.borrow_mut().push(env.event.clone()))
        };
        let carousel = DomCarousel::new(&container, &bus, &SprkConfig::default()).unwrap();
        assert_eq!(carousel.id(), "hero");
        assert_eq!(carousel.len(), 3);

        carousel.slide_to(2);
        assert_eq!(carousel.current(), 2);
        assert!(slides[2].has_class("sprk-c-Carousel__slide--active"));
        assert_eq!(slides[0].attribute("aria-hidden").as_deref(), Some("true"));
        assert!(seen.borrow().is_empty());

        carousel.slide_to(9);
        assert_eq!(carousel.current(), 2);
    }

    #[test]
    fn advance_and_retreat_wrap_and_announce() {
        let (container, _slides) = carousel(3);
        let bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let _sub = {
            let seen = Rc::clone(&seen);
            bus.subscribe(move |env| seen.borrow_mut().push(env.event.clone()))
        };
        let carousel = DomCarousel::new(&container, &bus, &SprkConfig::default()).unwrap();
        carousel.retreat();
        carousel.advance();
        assert_eq!(
            *seen.borrow(),
            vec![
                Event::CarouselSlide {
                    carousel: "hero".into(),
                    index: 2
                },
                Event::CarouselSlide {
                    carousel: "hero".into(),
                    index: 0
                },
            ]
        );
    }

    #[test]
    fn failed_slide_change_is_not_announced() {
        let (container, _slides) = carousel(3);
        let bus = EventBus::new();
        let config = SprkConfig {
            carousel_slide_active: "not a class".to_string(),
            ..SprkConfig::default()
        };
        let carousel = DomCarousel::new(&container, &bus, &config).unwrap();
        carousel.advance();
        carousel.retreat();
        assert_eq!(carousel.current(), 0);
        assert_eq!(bus.last_event_id(), None);
    }

    #[test]
    fn empty_carousel_is_inert() {
        let (container, _) = carousel(0);
        let bus = EventBus::new();
        let carousel = DomCarousel::new(&container, &bus, &SprkConfig::default()).unwrap();
        carousel.advance();
        carousel.slide_to(0);
        assert!(carousel.is_empty());
        assert_eq!(bus.last_event_id(), None);
    }
}
