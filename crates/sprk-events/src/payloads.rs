//! Event payload types carried across the behavior layer.

/// Identifier assigned to each event published on a bus.
pub type EventId = u64;

/// Typed UI events broadcast between controllers.
///
/// The serialized form is what the browser layer attaches as a DOM event detail.
#[derive(Debug, Clone, serde::Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Every spinning host in the document should stop spinning.
    CancelSpinners,
    /// A carousel moved to a new slide on its own (autoplay, external controls).
    CarouselSlide {
        /// Identifier from the carousel's `data-sprk-carousel` attribute.
        carousel: String,
        /// Zero-based index of the slide now showing.
        index: usize,
    },
}

impl Event {
    /// Machine-friendly discriminator for logs and filters.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::CancelSpinners => "cancel_spinners",
            Self::CarouselSlide { .. } => "carousel_slide",
        }
    }
}

/// Metadata wrapper tracking the sequential id of a published event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventEnvelope {
    /// Sequential identifier, starting at 1 per bus.
    pub id: EventId,
    /// Event payload.
    pub event: Event,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carousel_slide_serializes_with_tag() {
        let event = Event::CarouselSlide {
            carousel: "hero".into(),
            index: 2,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "carousel_slide");
        assert_eq!(json["carousel"], "hero");
        assert_eq!(json["index"], 2);
        assert_eq!(
            serde_json::to_value(Event::CancelSpinners).unwrap(),
            serde_json::json!({ "type": "cancel_spinners" })
        );
    }

    #[test]
    fn kinds_are_distinct() {
        assert_eq!(Event::CancelSpinners.kind(), "cancel_spinners");
        assert_ne!(
            Event::CancelSpinners.kind(),
            Event::CarouselSlide {
                carousel: String::new(),
                index: 0
            }
            .kind()
        );
    }
}
