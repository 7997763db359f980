//! In-memory DOM used for native tests and markup checks outside the browser.
//!
//! Nodes share a small document record that tracks focus and listener ids.
//! Classes and inline styles live in the `class` and `style` attributes, as
//! they do in serialized HTML, so attribute assertions see exactly what a
//! browser would.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use super::{DomElement, DomEvent, EventHandler, EventKind, Geometry, NavKey};
use crate::error::{DomError, DomResult};
use crate::selector::Selector;

struct DocumentState {
    focused: RefCell<Weak<Inner>>,
    next_listener: Cell<u64>,
}

enum Node {
    Text(String),
    Element(MemoryElement),
}

struct ListenerEntry {
    id: u64,
    kind: EventKind,
    handler: Rc<RefCell<EventHandler>>,
}

struct Inner {
    tag: String,
    document: Rc<DocumentState>,
    attributes: RefCell<Vec<(String, String)>>,
    children: RefCell<Vec<Node>>,
    parent: RefCell<Weak<Inner>>,
    geometry: Cell<Geometry>,
    listeners: RefCell<Vec<ListenerEntry>>,
}

/// Reference-counted handle to an in-memory element.
#[derive(Clone)]
pub struct MemoryElement {
    inner: Rc<Inner>,
}

/// Listener registration on a [`MemoryElement`]; dropping it detaches the handler.
#[derive(Debug)]
pub struct MemoryListener {
    target: Weak<Inner>,
    id: u64,
}

impl Drop for MemoryListener {
    fn drop(&mut self) {
        if let Some(target) = self.target.upgrade() {
            target
                .listeners
                .borrow_mut()
                .retain(|entry| entry.id != self.id);
        }
    }
}

fn valid_token(token: &str) -> bool {
    !token.is_empty() && !token.chars().any(char::is_whitespace)
}

fn escape(text: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}

fn parse_style(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let name = name.trim();
            (!name.is_empty()).then(|| (name.to_string(), value.trim().to_string()))
        })
        .collect()
}

impl MemoryElement {
    /// Create a detached root element in a fresh document.
    #[must_use]
    pub fn new(tag: &str) -> Self {
        let document = Rc::new(DocumentState {
            focused: RefCell::new(Weak::new()),
            next_listener: Cell::new(1),
        });
        Self::in_document(tag, document)
    }

    fn in_document(tag: &str, document: Rc<DocumentState>) -> Self {
        Self {
            inner: Rc::new(Inner {
                tag: tag.to_ascii_lowercase(),
                document,
                attributes: RefCell::new(Vec::new()),
                children: RefCell::new(Vec::new()),
                parent: RefCell::new(Weak::new()),
                geometry: Cell::new(Geometry::default()),
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Create an element in the same document and append it.
    ///
    /// # Errors
    ///
    /// Fails when the tag name is rejected.
    pub fn append_new(&self, tag: &str) -> DomResult<Self> {
        let child = self.create_element(tag)?;
        self.append_child(&child)?;
        Ok(child)
    }

    /// Parent element, if attached.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.inner
            .parent
            .borrow()
            .upgrade()
            .map(|inner| Self { inner })
    }

    /// Element children in order.
    #[must_use]
    pub fn children(&self) -> Vec<Self> {
        self.inner
            .children
            .borrow()
            .iter()
            .filter_map(|node| match node {
                Node::Element(el) => Some(el.clone()),
                Node::Text(_) => None,
            })
            .collect()
    }

    /// Append a text node.
    pub fn append_text(&self, text: &str) {
        if !text.is_empty() {
            self.inner
                .children
                .borrow_mut()
                .push(Node::Text(text.to_string()));
        }
    }

    /// Override the layout box reported by [`DomElement::geometry`].
    pub fn set_geometry(&self, geometry: Geometry) {
        self.inner.geometry.set(geometry);
    }

    /// Value of one declaration in the inline `style` attribute.
    #[must_use]
    pub fn style_property(&self, property: &str) -> Option<String> {
        parse_style(&self.attribute("style")?)
            .into_iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value)
    }

    /// Whether this element holds document focus.
    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.inner
            .document
            .focused
            .borrow()
            .upgrade()
            .is_some_and(|focused| Rc::ptr_eq(&focused, &self.inner))
    }

    /// Number of handlers currently registered on this element.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Dispatch `event` at this element, bubbling through its ancestors.
    pub fn dispatch(&self, event: &DomEvent) {
        let mut current = Some(self.clone());
        while let Some(node) = current {
            let handlers: Vec<Rc<RefCell<EventHandler>>> = node
                .inner
                .listeners
                .borrow()
                .iter()
                .filter(|entry| entry.kind == event.kind())
                .map(|entry| Rc::clone(&entry.handler))
                .collect();
            for handler in handlers {
                if let Ok(mut handler) = handler.try_borrow_mut() {
                    handler(event);
                }
            }
            current = node.parent();
        }
    }

    /// Dispatch a click; returns whether a handler prevented the default action.
    #[must_use]
    pub fn click(&self) -> bool {
        let event = DomEvent::click();
        self.dispatch(&event);
        event.default_prevented()
    }

    /// Dispatch a keydown for `key`; returns whether the default was prevented.
    #[must_use]
    pub fn press_key(&self, key: NavKey) -> bool {
        let event = DomEvent::keydown(Some(key));
        self.dispatch(&event);
        event.default_prevented()
    }

    /// Serialized children.
    #[must_use]
    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        for node in self.inner.children.borrow().iter() {
            match node {
                Node::Text(text) => out.push_str(&escape(text, false)),
                Node::Element(el) => out.push_str(&el.outer_html()),
            }
        }
        out
    }

    /// Serialized element including its own tag.
    #[must_use]
    pub fn outer_html(&self) -> String {
        let mut out = format!("<{}", self.inner.tag);
        for (name, value) in self.inner.attributes.borrow().iter() {
            out.push_str(&format!(" {name}=\"{}\"", escape(value, true)));
        }
        out.push('>');
        out.push_str(&self.inner_html());
        out.push_str(&format!("</{}>", self.inner.tag));
        out
    }

    fn is_or_descends_from(&self, other: &Self) -> bool {
        let mut current = Some(self.clone());
        while let Some(node) = current {
            if node == *other {
                return true;
            }
            current = node.parent();
        }
        false
    }

    fn detach(&self) {
        if let Some(parent) = self.parent() {
            parent.inner.children.borrow_mut().retain(|node| match node {
                Node::Element(el) => el != self,
                Node::Text(_) => true,
            });
        }
        *self.inner.parent.borrow_mut() = Weak::new();
    }

    fn insert(&self, child: &Self, at_start: bool, operation: &'static str) -> DomResult<()> {
        if self.is_or_descends_from(child) {
            return Err(DomError::Hierarchy { operation });
        }
        child.detach();
        *child.inner.parent.borrow_mut() = Rc::downgrade(&self.inner);
        let mut children = self.inner.children.borrow_mut();
        if at_start {
            children.insert(0, Node::Element(child.clone()));
        } else {
            children.push(Node::Element(child.clone()));
        }
        Ok(())
    }

    fn collect_matches(&self, selector: &Selector, out: &mut Vec<Self>) {
        for child in self.children() {
            if selector.matches(&child.inner.tag, |name| child.attribute(name)) {
                out.push(child.clone());
            }
            child.collect_matches(selector, out);
        }
    }

    fn class_tokens(&self) -> Vec<String> {
        self.attribute("class")
            .map(|classes| classes.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn write_classes(&self, tokens: &[String]) -> DomResult<()> {
        self.set_attribute("class", &tokens.join(" "))
    }
}

impl PartialEq for MemoryElement {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for MemoryElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryElement")
            .field("tag", &self.inner.tag)
            .field("attributes", &*self.inner.attributes.borrow())
            .finish_non_exhaustive()
    }
}

impl DomElement for MemoryElement {
    type Listener = MemoryListener;

    fn tag_name(&self) -> String {
        self.inner.tag.clone()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.inner
            .attributes
            .borrow()
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    }

    fn set_attribute(&self, name: &str, value: &str) -> DomResult<()> {
        if !valid_token(name) {
            return Err(DomError::Rejected {
                operation: "set_attribute",
                detail: Some(name.to_string()),
            });
        }
        let mut attributes = self.inner.attributes.borrow_mut();
        if let Some(slot) = attributes.iter_mut().find(|(key, _)| key == name) {
            slot.1 = value.to_string();
        } else {
            attributes.push((name.to_string(), value.to_string()));
        }
        Ok(())
    }

    fn remove_attribute(&self, name: &str) -> DomResult<()> {
        if !valid_token(name) {
            return Err(DomError::Rejected {
                operation: "remove_attribute",
                detail: Some(name.to_string()),
            });
        }
        self.inner
            .attributes
            .borrow_mut()
            .retain(|(key, _)| key != name);
        Ok(())
    }

    fn text_content(&self) -> String {
        let mut out = String::new();
        for node in self.inner.children.borrow().iter() {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Element(el) => out.push_str(&el.text_content()),
            }
        }
        out
    }

    fn set_text_content(&self, text: &str) {
        let old = std::mem::take(&mut *self.inner.children.borrow_mut());
        for node in old {
            if let Node::Element(el) = node {
                *el.inner.parent.borrow_mut() = Weak::new();
            }
        }
        self.append_text(text);
    }

    fn has_class(&self, class: &str) -> bool {
        self.class_tokens().iter().any(|token| token == class)
    }

    fn add_class(&self, class: &str) -> DomResult<()> {
        if !valid_token(class) {
            return Err(DomError::Rejected {
                operation: "add_class",
                detail: Some(class.to_string()),
            });
        }
        let mut tokens = self.class_tokens();
        if !tokens.iter().any(|token| token == class) {
            tokens.push(class.to_string());
            self.write_classes(&tokens)?;
        }
        Ok(())
    }

    fn remove_class(&self, class: &str) -> DomResult<()> {
        if !valid_token(class) {
            return Err(DomError::Rejected {
                operation: "remove_class",
                detail: Some(class.to_string()),
            });
        }
        let mut tokens = self.class_tokens();
        let before = tokens.len();
        tokens.retain(|token| token != class);
        if tokens.len() != before {
            self.write_classes(&tokens)?;
        }
        Ok(())
    }

    fn query_selector_all(&self, selector: &Selector) -> DomResult<Vec<Self>> {
        let mut out = Vec::new();
        self.collect_matches(selector, &mut out);
        Ok(out)
    }

    fn create_element(&self, tag: &str) -> DomResult<Self> {
        if !valid_token(tag) {
            return Err(DomError::Rejected {
                operation: "create_element",
                detail: Some(tag.to_string()),
            });
        }
        Ok(Self::in_document(tag, Rc::clone(&self.inner.document)))
    }

    fn append_child(&self, child: &Self) -> DomResult<()> {
        self.insert(child, false, "append_child")
    }

    fn prepend_child(&self, child: &Self) -> DomResult<()> {
        self.insert(child, true, "prepend_child")
    }

    fn set_style_property(&self, property: &str, value: &str) -> DomResult<()> {
        let mut declarations = self
            .attribute("style")
            .map(|style| parse_style(&style))
            .unwrap_or_default();
        if let Some(slot) = declarations.iter_mut().find(|(name, _)| name == property) {
            slot.1 = value.to_string();
        } else {
            declarations.push((property.to_string(), value.to_string()));
        }
        let serialized = declarations
            .iter()
            .map(|(name, value)| format!("{name}: {value};"))
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attribute("style", &serialized)
    }

    fn geometry(&self) -> Geometry {
        self.inner.geometry.get()
    }

    fn focus(&self) -> DomResult<()> {
        *self.inner.document.focused.borrow_mut() = Rc::downgrade(&self.inner);
        Ok(())
    }

    fn listen(&self, kind: EventKind, handler: EventHandler) -> MemoryListener {
        let id = self.inner.document.next_listener.get();
        self.inner.document.next_listener.set(id + 1);
        self.inner.listeners.borrow_mut().push(ListenerEntry {
            id,
            kind,
            handler: Rc::new(RefCell::new(handler)),
        });
        MemoryListener {
            target: Rc::downgrade(&self.inner),
            id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_content_spans_descendants() {
        let root = MemoryElement::new("div");
        root.append_text("a");
        let span = root.append_new("span").unwrap();
        span.append_text("b");
        root.append_text("c");
        assert_eq!(root.text_content(), "abc");
        assert_eq!(root.inner_html(), "a<span>b</span>c");

        root.set_text_content("fresh");
        assert_eq!(root.inner_html(), "fresh");
        assert!(span.parent().is_none());
    }

    #[test]
    fn class_list_semantics() {
        let el = MemoryElement::new("li");
        el.add_class("one").unwrap();
        el.add_class("two").unwrap();
        el.add_class("one").unwrap();
        assert_eq!(el.attribute("class").as_deref(), Some("one two"));
        el.remove_class("one").unwrap();
        assert!(!el.has_class("one"));
        assert!(el.has_class("two"));
        assert!(el.add_class("bad token").is_err());
        assert!(el.add_class("").is_err());
    }

    #[test]
    fn style_properties_merge_into_attribute() {
        let el = MemoryElement::new("li");
        el.set_style_property("top", "10px").unwrap();
        el.set_style_property("height", "20px").unwrap();
        el.set_style_property("top", "12px").unwrap();
        assert_eq!(el.attribute("style").as_deref(), Some("top: 12px; height: 20px;"));
        assert_eq!(el.style_property("top").as_deref(), Some("12px"));
        assert_eq!(el.style_property("width"), None);
    }

    #[test]
    fn prepend_and_hierarchy_checks() {
        let root = MemoryElement::new("ul");
        let second = root.append_new("li").unwrap();
        let first = root.create_element("li").unwrap();
        root.prepend_child(&first).unwrap();
        assert_eq!(root.children(), vec![first.clone(), second]);
        assert_eq!(
            first.append_child(&root),
            Err(DomError::Hierarchy {
                operation: "append_child"
            })
        );
        assert_eq!(
            root.append_child(&root),
            Err(DomError::Hierarchy {
                operation: "append_child"
            })
        );
    }

    #[test]
    fn events_bubble_and_listeners_detach_on_drop() {
        let root = MemoryElement::new("div");
        let child = root.append_new("button").unwrap();
        let hits = Rc::new(Cell::new(0));
        let listener = {
            let hits = Rc::clone(&hits);
            root.listen(
                EventKind::Click,
                Box::new(move |event: &DomEvent| {
                    hits.set(hits.get() + 1);
                    event.prevent_default();
                }),
            )
        };
        assert!(child.click());
        assert_eq!(hits.get(), 1);
        assert_eq!(root.listener_count(), 1);
        drop(listener);
        assert_eq!(root.listener_count(), 0);
        assert!(!child.click());
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn focus_is_document_wide() {
        let root = MemoryElement::new("div");
        let a = root.append_new("button").unwrap();
        let b = root.append_new("button").unwrap();
        a.focus().unwrap();
        assert!(a.is_focused());
        b.focus().unwrap();
        assert!(!a.is_focused());
        assert!(b.is_focused());
    }

    #[test]
    fn serialization_escapes_text_and_attributes() {
        let el = MemoryElement::new("p");
        el.set_attribute("title", "a \"b\" & c").unwrap();
        el.set_text_content("1 < 2");
        assert_eq!(
            el.outer_html(),
            "<p title=\"a &quot;b&quot; &amp; c\">1 &lt; 2</p>"
        );
    }
}
