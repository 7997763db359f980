//! Attribute selectors and the shared element-walking helper.
//!
//! # Design
//! - Support only the compound attribute selectors the markup contract uses:
//!   an optional tag name followed by `[attr]` / `[attr=value]` clauses.
//! - Parsed selectors render back to CSS so browser adapters can hand them to
//!   `querySelectorAll` unchanged, while the in-memory DOM matches them directly.

use std::fmt;

use crate::dom::DomElement;
use crate::error::{DomResult, SelectorError};

/// One `[name]` or `[name=value]` clause.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttrClause {
    /// Attribute name.
    pub name: String,
    /// Required value; `None` only requires presence.
    pub value: Option<String>,
}

/// Compound attribute selector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    clauses: Vec<AttrClause>,
}

impl Selector {
    /// Parse selector text such as `li[data-sprk-stepper="step"]`.
    ///
    /// # Errors
    ///
    /// Returns a [`SelectorError`] when the text falls outside the supported subset.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        Parser::new(input).parse()
    }

    /// `[name="value"]`.
    #[must_use]
    pub fn attr_eq(name: &str, value: &str) -> Self {
        Self {
            tag: None,
            clauses: vec![AttrClause {
                name: name.to_string(),
                value: Some(value.to_string()),
            }],
        }
    }

    /// `[name]`.
    #[must_use]
    pub fn has_attr(name: &str) -> Self {
        Self {
            tag: None,
            clauses: vec![AttrClause {
                name: name.to_string(),
                value: None,
            }],
        }
    }

    /// Required tag name, lower-cased.
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Attribute clauses in source order.
    #[must_use]
    pub fn clauses(&self) -> &[AttrClause] {
        &self.clauses
    }

    /// Whether an element with `tag` and the given attribute lookup matches.
    #[must_use]
    pub fn matches<F>(&self, tag: &str, attribute: F) -> bool
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(expected) = &self.tag
            && !expected.eq_ignore_ascii_case(tag)
        {
            return false;
        }
        self.clauses
            .iter()
            .all(|clause| match (&clause.value, attribute(&clause.name)) {
                (_, None) => false,
                (None, Some(_)) => true,
                (Some(expected), Some(actual)) => *expected == actual,
            })
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(tag) = &self.tag {
            f.write_str(tag)?;
        }
        for clause in &self.clauses {
            match &clause.value {
                None => write!(f, "[{}]", clause.name)?,
                Some(value) if value.contains('"') => write!(f, "[{}='{value}']", clause.name)?,
                Some(value) => write!(f, "[{}=\"{value}\"]", clause.name)?,
            }
        }
        Ok(())
    }
}

/// Invoke `callback` once for every descendant of `root` matching `selector`, in document order.
///
/// # Errors
///
/// Propagates adapter failures from the underlying query.
pub fn for_each_element<E, F>(root: &E, selector: &Selector, mut callback: F) -> DomResult<()>
where
    E: DomElement,
    F: FnMut(&E),
{
    for element in root.query_selector_all(selector)? {
        callback(&element);
    }
    Ok(())
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_spaces(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn ident(&mut self) -> String {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
        {
            self.bump();
        }
        self.input[start..self.pos].to_string()
    }

    fn parse(mut self) -> Result<Selector, SelectorError> {
        self.skip_spaces();
        if self.peek().is_none() {
            return Err(SelectorError::Empty);
        }
        let tag = self.ident();
        let tag = (!tag.is_empty()).then(|| tag.to_ascii_lowercase());
        let mut clauses = Vec::new();
        loop {
            match self.peek() {
                Some('[') => clauses.push(self.clause()?),
                Some(ch) if ch.is_whitespace() => {
                    self.skip_spaces();
                    if let Some(found) = self.peek() {
                        return Err(SelectorError::Unexpected {
                            position: self.pos,
                            found,
                        });
                    }
                }
                Some(found) => {
                    return Err(SelectorError::Unexpected {
                        position: self.pos,
                        found,
                    });
                }
                None => break,
            }
        }
        Ok(Selector { tag, clauses })
    }

    fn clause(&mut self) -> Result<AttrClause, SelectorError> {
        let start = self.pos;
        self.bump();
        self.skip_spaces();
        let name = self.ident();
        if name.is_empty() {
            return Err(SelectorError::MissingAttribute { position: start });
        }
        self.skip_spaces();
        let value = match self.bump() {
            Some(']') => return Ok(AttrClause { name, value: None }),
            Some('=') => {
                self.skip_spaces();
                self.value(start)?
            }
            Some(found) => {
                return Err(SelectorError::Unexpected {
                    position: self.pos - found.len_utf8(),
                    found,
                });
            }
            None => return Err(SelectorError::Unterminated { position: start }),
        };
        self.skip_spaces();
        match self.bump() {
            Some(']') => Ok(AttrClause {
                name,
                value: Some(value),
            }),
            Some(found) => Err(SelectorError::Unexpected {
                position: self.pos - found.len_utf8(),
                found,
            }),
            None => Err(SelectorError::Unterminated { position: start }),
        }
    }

    fn value(&mut self, start: usize) -> Result<String, SelectorError> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.bump();
                let begin = self.pos;
                loop {
                    match self.bump() {
                        Some(ch) if ch == quote => {
                            return Ok(self.input[begin..self.pos - 1].to_string());
                        }
                        Some(_) => {}
                        None => return Err(SelectorError::Unterminated { position: start }),
                    }
                }
            }
            _ => {
                let value = self.ident();
                if value.is_empty() {
                    match self.peek() {
                        Some(found) => Err(SelectorError::Unexpected {
                            position: self.pos,
                            found,
                        }),
                        None => Err(SelectorError::Unterminated { position: start }),
                    }
                } else {
                    Ok(value)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::memory::MemoryElement;

    fn lookup(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |name: &str| {
            pairs
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_string())
        }
    }

    #[test]
    fn parses_quoted_and_bare_values() {
        let quoted = Selector::parse(r#"[data-sprk-spinner="click"]"#).unwrap();
        let bare = Selector::parse("[data-sprk-spinner=click]").unwrap();
        let single = Selector::parse("[data-sprk-spinner='click']").unwrap();
        assert_eq!(quoted, bare);
        assert_eq!(quoted, single);
        assert_eq!(quoted, Selector::attr_eq("data-sprk-spinner", "click"));
        assert_eq!(quoted.to_string(), r#"[data-sprk-spinner="click"]"#);
    }

    #[test]
    fn parses_tag_and_compound_clauses() {
        let selector = Selector::parse(r#"LI[role="tab"][data-id]"#).unwrap();
        assert_eq!(selector.tag(), Some("li"));
        assert_eq!(selector.clauses().len(), 2);
        assert_eq!(selector.to_string(), r#"li[role="tab"][data-id]"#);
        assert!(selector.matches("li", lookup(&[("role", "tab"), ("data-id", "")])));
        assert!(!selector.matches("div", lookup(&[("role", "tab"), ("data-id", "")])));
        assert!(!selector.matches("li", lookup(&[("role", "tab")])));
    }

    #[test]
    fn rejects_unsupported_syntax() {
        assert_eq!(Selector::parse("   "), Err(SelectorError::Empty));
        assert_eq!(
            Selector::parse("#id"),
            Err(SelectorError::Unexpected {
                position: 0,
                found: '#'
            })
        );
        assert_eq!(
            Selector::parse("[role=\"tab"),
            Err(SelectorError::Unterminated { position: 0 })
        );
        assert_eq!(
            Selector::parse("[=x]"),
            Err(SelectorError::MissingAttribute { position: 0 })
        );
        assert!(matches!(
            Selector::parse("div span"),
            Err(SelectorError::Unexpected { found: 's', .. })
        ));
    }

    #[test]
    fn value_with_double_quote_renders_single_quoted() {
        let selector = Selector::attr_eq("title", "say \"hi\"");
        assert_eq!(selector.to_string(), "[title='say \"hi\"']");
        assert_eq!(Selector::parse(&selector.to_string()).unwrap(), selector);
    }

    #[test]
    fn for_each_element_visits_matches_in_document_order() {
        let root = MemoryElement::new("body");
        let first = root.append_new("button").unwrap();
        first.set_attribute("data-sprk-spinner", "click").unwrap();
        first.set_text_content("one");
        let nested = root.append_new("div").unwrap();
        let second = nested.append_new("button").unwrap();
        second.set_attribute("data-sprk-spinner", "click").unwrap();
        second.set_text_content("two");
        let other = root.append_new("button").unwrap();
        other.set_attribute("data-sprk-spinner", "hover").unwrap();

        let mut seen = Vec::new();
        for_each_element(
            &root,
            &Selector::attr_eq("data-sprk-spinner", "click"),
            |el| seen.push(el.text_content()),
        )
        .unwrap();
        assert_eq!(seen, vec!["one", "two"]);

        let mut calls = 0;
        for_each_element(&root, &Selector::has_attr("data-missing"), |_| calls += 1).unwrap();
        assert_eq!(calls, 0);
    }
}
