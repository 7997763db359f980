//! DOM event names bridged onto the bus.

use crate::payloads::Event;

/// Window-level custom event that cancels every active spinner.
pub const CANCEL_SPINNERS: &str = "sprk-cancel-spinners";

/// Custom event dispatched on a carousel container when it changes slide.
pub const CAROUSEL_SLIDE: &str = "sprk.carousel.slide";

/// DOM event name that carries the given bus event.
#[must_use]
pub const fn dom_event_name(event: &Event) -> &'static str {
    match event {
        Event::CancelSpinners => CANCEL_SPINNERS,
        Event::CarouselSlide { .. } => CAROUSEL_SLIDE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dom_names_match_markup_contract() {
        assert_eq!(dom_event_name(&Event::CancelSpinners), "sprk-cancel-spinners");
        assert_eq!(
            dom_event_name(&Event::CarouselSlide {
                carousel: "c".into(),
                index: 0
            }),
            "sprk.carousel.slide"
        );
    }
}
