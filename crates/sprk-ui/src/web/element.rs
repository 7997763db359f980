//! `web_sys::Element` behind the [`DomElement`] capability.

use gloo::events::{EventListener, EventListenerOptions};
use sprk_core::dom::{DomElement, DomEvent, EventHandler, EventKind, Geometry, NavKey};
use sprk_core::selector::Selector;
use sprk_core::{DomError, DomResult};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CustomEvent, Element, HtmlElement, KeyboardEvent};

use crate::bootstrap::slide_index_from_detail;

/// Handle to a live DOM element.
#[derive(Clone, Debug, PartialEq)]
pub struct WebElement(Element);

impl WebElement {
    /// Wrap an element.
    #[must_use]
    pub const fn new(element: Element) -> Self {
        Self(element)
    }

    /// Underlying element.
    #[must_use]
    pub const fn as_element(&self) -> &Element {
        &self.0
    }

    fn html(&self) -> Option<&HtmlElement> {
        self.0.dyn_ref::<HtmlElement>()
    }
}

impl From<Element> for WebElement {
    fn from(element: Element) -> Self {
        Self(element)
    }
}

fn rejected(operation: &'static str, err: &JsValue) -> DomError {
    let detail = err.as_string().or_else(|| {
        err.dyn_ref::<js_sys::Error>()
            .map(|error| String::from(error.message()))
    });
    DomError::Rejected { operation, detail }
}

fn not_html(operation: &'static str, tag: &str) -> DomError {
    DomError::Rejected {
        operation,
        detail: Some(format!("<{tag}> is not an html element")),
    }
}

fn slide_index(detail: &JsValue) -> Option<usize> {
    let json = js_sys::JSON::stringify(detail).ok()?.as_string()?;
    slide_index_from_detail(&json)
}

fn translate(kind: EventKind, event: &web_sys::Event) -> DomEvent {
    match kind {
        EventKind::Keydown => event.dyn_ref::<KeyboardEvent>().map_or_else(
            || DomEvent::keydown(None),
            |keyboard| {
                DomEvent::keydown(NavKey::from_key(&keyboard.key()))
                    .with_shift(keyboard.shift_key())
            },
        ),
        EventKind::CarouselSlide => event
            .dyn_ref::<CustomEvent>()
            .and_then(|custom| slide_index(&custom.detail()))
            .map_or_else(|| DomEvent::new(kind), DomEvent::carousel_slide),
        EventKind::Click | EventKind::CancelSpinners => DomEvent::new(kind),
    }
}

impl DomElement for WebElement {
    type Listener = EventListener;

    fn tag_name(&self) -> String {
        self.0.tag_name().to_ascii_lowercase()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }

    fn set_attribute(&self, name: &str, value: &str) -> DomResult<()> {
        self.0
            .set_attribute(name, value)
            .map_err(|err| rejected("set_attribute", &err))
    }

    fn remove_attribute(&self, name: &str) -> DomResult<()> {
        self.0
            .remove_attribute(name)
            .map_err(|err| rejected("remove_attribute", &err))
    }

    fn text_content(&self) -> String {
        self.0.text_content().unwrap_or_default()
    }

    fn set_text_content(&self, text: &str) {
        self.0.set_text_content(Some(text));
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.class_list().contains(class)
    }

    fn add_class(&self, class: &str) -> DomResult<()> {
        self.0
            .class_list()
            .add_1(class)
            .map_err(|err| rejected("add_class", &err))
    }

    fn remove_class(&self, class: &str) -> DomResult<()> {
        self.0
            .class_list()
            .remove_1(class)
            .map_err(|err| rejected("remove_class", &err))
    }

    fn query_selector_all(&self, selector: &Selector) -> DomResult<Vec<Self>> {
        let source = selector.to_string();
        let nodes = self
            .0
            .query_selector_all(&source)
            .map_err(|_| DomError::Selector {
                selector: source.clone(),
            })?;
        Ok((0..nodes.length())
            .filter_map(|index| nodes.item(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(Self)
            .collect())
    }

    fn create_element(&self, tag: &str) -> DomResult<Self> {
        let document = self
            .0
            .owner_document()
            .unwrap_or_else(gloo::utils::document);
        document
            .create_element(tag)
            .map(Self)
            .map_err(|err| rejected("create_element", &err))
    }

    fn append_child(&self, child: &Self) -> DomResult<()> {
        self.0
            .append_child(&child.0)
            .map(drop)
            .map_err(|_| DomError::Hierarchy {
                operation: "append_child",
            })
    }

    fn prepend_child(&self, child: &Self) -> DomResult<()> {
        self.0
            .prepend_with_node_1(&child.0)
            .map_err(|_| DomError::Hierarchy {
                operation: "prepend_child",
            })
    }

    fn set_style_property(&self, property: &str, value: &str) -> DomResult<()> {
        let html = self
            .html()
            .ok_or_else(|| not_html("set_style_property", &self.tag_name()))?;
        html.style()
            .set_property(property, value)
            .map_err(|err| rejected("set_style_property", &err))
    }

    /// Layout-box offsets; CSS transforms are not applied.
    fn geometry(&self) -> Geometry {
        self.html().map_or_else(
            || {
                let rect = self.0.get_bounding_client_rect();
                Geometry {
                    width: rect.width(),
                    height: rect.height(),
                    ..Geometry::default()
                }
            },
            |html| Geometry {
                top: f64::from(html.offset_top()),
                left: f64::from(html.offset_left()),
                width: f64::from(html.offset_width()),
                height: f64::from(html.offset_height()),
            },
        )
    }

    fn focus(&self) -> DomResult<()> {
        let html = self
            .html()
            .ok_or_else(|| not_html("focus", &self.tag_name()))?;
        html.focus().map_err(|err| rejected("focus", &err))
    }

    fn listen(&self, kind: EventKind, mut handler: EventHandler) -> EventListener {
        EventListener::new_with_options(
            &self.0,
            kind.as_str(),
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                let translated = translate(kind, event);
                handler(&translated);
                if translated.default_prevented() {
                    event.prevent_default();
                }
            },
        )
    }
}
