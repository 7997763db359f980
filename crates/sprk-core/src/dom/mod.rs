//! Narrow DOM capability used by the behavior controllers.
//!
//! # Design
//! - Controllers only need attributes, text, class lists, descendant queries,
//!   a few geometry reads, and listener registration; nothing else leaks in.
//! - Listeners follow `gloo::events::EventListener` semantics: dropping the
//!   handle detaches the handler.
//! - The browser adapter lives in the wasm crate; [`memory`] backs native tests.

pub mod memory;

use std::cell::Cell;

use crate::error::DomResult;
use crate::selector::Selector;
use sprk_events::topics;

/// DOM events the controllers listen for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Pointer activation.
    Click,
    /// Key press, carrying a [`NavKey`] when it is a navigation key.
    Keydown,
    /// Carousel reported a slide change; carries the slide index.
    CarouselSlide,
    /// Broadcast request to stop every spinner.
    CancelSpinners,
}

impl EventKind {
    /// DOM event type string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Keydown => "keydown",
            Self::CarouselSlide => topics::CAROUSEL_SLIDE,
            Self::CancelSpinners => topics::CANCEL_SPINNERS,
        }
    }
}

/// Keys with a meaning in the tab-widget keyboard convention.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavKey {
    /// `ArrowLeft` / `ArrowUp`.
    Previous,
    /// `ArrowRight` / `ArrowDown`.
    Next,
    /// `Home`.
    First,
    /// `End`.
    Last,
    /// `Tab`: move focus into the active panel.
    Tab,
}

impl NavKey {
    /// Map a `KeyboardEvent.key` value; other keys yield `None`.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "Left" | "ArrowUp" | "Up" => Some(Self::Previous),
            "ArrowRight" | "Right" | "ArrowDown" | "Down" => Some(Self::Next),
            "Home" => Some(Self::First),
            "End" => Some(Self::Last),
            "Tab" => Some(Self::Tab),
            _ => None,
        }
    }
}

/// Adapter-neutral view of a dispatched event.
#[derive(Debug)]
pub struct DomEvent {
    kind: EventKind,
    key: Option<NavKey>,
    shift: bool,
    slide_index: Option<usize>,
    default_prevented: Cell<bool>,
}

impl DomEvent {
    /// Event with no key or detail.
    #[must_use]
    pub const fn new(kind: EventKind) -> Self {
        Self {
            kind,
            key: None,
            shift: false,
            slide_index: None,
            default_prevented: Cell::new(false),
        }
    }

    /// Click event.
    #[must_use]
    pub const fn click() -> Self {
        Self::new(EventKind::Click)
    }

    /// Keydown event; `key` is `None` for keys outside the navigation set.
    #[must_use]
    pub const fn keydown(key: Option<NavKey>) -> Self {
        Self {
            key,
            ..Self::new(EventKind::Keydown)
        }
    }

    /// Same event with the Shift modifier set to `shift`.
    #[must_use]
    pub const fn with_shift(mut self, shift: bool) -> Self {
        self.shift = shift;
        self
    }

    /// Carousel slide notification.
    #[must_use]
    pub const fn carousel_slide(index: usize) -> Self {
        Self {
            slide_index: Some(index),
            ..Self::new(EventKind::CarouselSlide)
        }
    }

    /// Event kind.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        self.kind
    }

    /// Navigation key, if any.
    #[must_use]
    pub const fn key(&self) -> Option<NavKey> {
        self.key
    }

    /// Whether Shift was held.
    #[must_use]
    pub const fn shift(&self) -> bool {
        self.shift
    }

    /// Slide index carried by a carousel event.
    #[must_use]
    pub const fn slide_index(&self) -> Option<usize> {
        self.slide_index
    }

    /// Ask the host to cancel the default action.
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    /// Whether a handler called [`DomEvent::prevent_default`].
    #[must_use]
    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

/// Layout box of an element relative to its offset parent, in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Geometry {
    /// `offsetTop`.
    pub top: f64,
    /// `offsetLeft`.
    pub left: f64,
    /// Rendered width.
    pub width: f64,
    /// Rendered height.
    pub height: f64,
}

/// Boxed event handler accepted by [`DomElement::listen`].
pub type EventHandler = Box<dyn FnMut(&DomEvent)>;

/// Element capability required by the controllers.
///
/// Handles are cheap clones referring to the same node; equality is node identity.
pub trait DomElement: Clone + PartialEq + 'static {
    /// Listener handle; dropping it detaches the handler.
    type Listener: 'static;

    /// Lower-case tag name.
    fn tag_name(&self) -> String;

    /// Attribute value, `None` when absent.
    fn attribute(&self, name: &str) -> Option<String>;

    /// Set an attribute.
    ///
    /// # Errors
    ///
    /// Fails when the host rejects the attribute name.
    fn set_attribute(&self, name: &str, value: &str) -> DomResult<()>;

    /// Remove an attribute; absent attributes are ignored.
    ///
    /// # Errors
    ///
    /// Fails when the host rejects the attribute name.
    fn remove_attribute(&self, name: &str) -> DomResult<()>;

    /// Concatenated text of the subtree.
    fn text_content(&self) -> String;

    /// Replace every child with a single text node.
    fn set_text_content(&self, text: &str);

    /// Whether the class list contains `class`.
    fn has_class(&self, class: &str) -> bool;

    /// Add a class token.
    ///
    /// # Errors
    ///
    /// Fails when the token is rejected (empty or containing whitespace).
    fn add_class(&self, class: &str) -> DomResult<()>;

    /// Remove a class token.
    ///
    /// # Errors
    ///
    /// Fails when the token is rejected (empty or containing whitespace).
    fn remove_class(&self, class: &str) -> DomResult<()>;

    /// Matching descendants in document order.
    ///
    /// # Errors
    ///
    /// Fails when the host cannot evaluate the selector.
    fn query_selector_all(&self, selector: &Selector) -> DomResult<Vec<Self>>;

    /// First matching descendant.
    ///
    /// # Errors
    ///
    /// Fails when the host cannot evaluate the selector.
    fn query_selector(&self, selector: &Selector) -> DomResult<Option<Self>> {
        Ok(self.query_selector_all(selector)?.into_iter().next())
    }

    /// Create a detached element in this element's document.
    ///
    /// # Errors
    ///
    /// Fails when the tag name is rejected.
    fn create_element(&self, tag: &str) -> DomResult<Self>;

    /// Append `child` as the last child.
    ///
    /// # Errors
    ///
    /// Fails when the insertion would create a cycle.
    fn append_child(&self, child: &Self) -> DomResult<()>;

    /// Insert `child` as the first child.
    ///
    /// # Errors
    ///
    /// Fails when the insertion would create a cycle.
    fn prepend_child(&self, child: &Self) -> DomResult<()>;

    /// Set one inline style property.
    ///
    /// # Errors
    ///
    /// Fails when the element has no style declaration.
    fn set_style_property(&self, property: &str, value: &str) -> DomResult<()>;

    /// Current layout box.
    fn geometry(&self) -> Geometry;

    /// Move keyboard focus to the element.
    ///
    /// # Errors
    ///
    /// Fails when the element cannot take focus.
    fn focus(&self) -> DomResult<()>;

    /// Register a handler for `kind` on this element (including events bubbling from descendants).
    fn listen(&self, kind: EventKind, handler: EventHandler) -> Self::Listener;
}
