//! Selector input and string classification

use std::sync::LazyLock;

use nano_dom::Element;
use regex::Regex;

static ID_REF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#([\w-]+)$").unwrap());
static CLASS_REF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\.([\w-]+)$").unwrap());
static TAG_REF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\w+$").unwrap());

/// What a selector string asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorKind<'a> {
    /// Markup literal such as `<div class='x'>hi</div>`
    Fragment(&'a str),
    /// `#name`
    IdRef(&'a str),
    /// `.name`
    ClassRef(&'a str),
    /// Bare tag name such as `li`
    TagRef(&'a str),
    /// Anything else, handed to the CSS selector engine
    GenericCss(&'a str),
}

/// Classify a selector string. First match wins: fragment, id, class,
/// tag, generic.
pub fn classify(selector: &str) -> SelectorKind<'_> {
    if selector.starts_with('<') && selector.ends_with('>') {
        return SelectorKind::Fragment(selector);
    }
    if let Some(caps) = ID_REF.captures(selector) {
        return SelectorKind::IdRef(caps.get(1).map_or("", |m| m.as_str()));
    }
    if let Some(caps) = CLASS_REF.captures(selector) {
        return SelectorKind::ClassRef(caps.get(1).map_or("", |m| m.as_str()));
    }
    if TAG_REF.is_match(selector) {
        return SelectorKind::TagRef(selector);
    }
    SelectorKind::GenericCss(selector)
}

/// Anything a collection can be built from
#[derive(Debug, Clone, Default)]
pub enum Selector {
    #[default]
    Empty,
    Element(Element),
    List(Vec<Element>),
    Query(String),
}

impl From<&str> for Selector {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Selector::Empty
        } else {
            Selector::Query(s.to_string())
        }
    }
}

impl From<String> for Selector {
    fn from(s: String) -> Self {
        if s.is_empty() {
            Selector::Empty
        } else {
            Selector::Query(s)
        }
    }
}

impl From<&String> for Selector {
    fn from(s: &String) -> Self {
        Selector::from(s.as_str())
    }
}

impl From<Element> for Selector {
    fn from(element: Element) -> Self {
        Selector::Element(element)
    }
}

impl From<&Element> for Selector {
    fn from(element: &Element) -> Self {
        Selector::Element(element.clone())
    }
}

impl From<Vec<Element>> for Selector {
    fn from(elements: Vec<Element>) -> Self {
        Selector::List(elements)
    }
}

impl From<&[Element]> for Selector {
    fn from(elements: &[Element]) -> Self {
        Selector::List(elements.to_vec())
    }
}

impl<T: Into<Selector>> From<Option<T>> for Selector {
    fn from(value: Option<T>) -> Self {
        value.map_or(Selector::Empty, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_priority() {
        assert_eq!(classify("<p>hi</p>"), SelectorKind::Fragment("<p>hi</p>"));
        assert_eq!(classify("#main"), SelectorKind::IdRef("main"));
        assert_eq!(classify(".menu-item"), SelectorKind::ClassRef("menu-item"));
        assert_eq!(classify("li"), SelectorKind::TagRef("li"));
        assert_eq!(classify("h1"), SelectorKind::TagRef("h1"));
    }

    #[test]
    fn test_classify_generic() {
        assert_eq!(classify("ul > li"), SelectorKind::GenericCss("ul > li"));
        assert_eq!(classify("#a.b"), SelectorKind::GenericCss("#a.b"));
        assert_eq!(classify(".a .b"), SelectorKind::GenericCss(".a .b"));
        assert_eq!(classify("my-widget"), SelectorKind::GenericCss("my-widget"));
        // Needs both brackets to be a literal
        assert_eq!(classify("<p"), SelectorKind::GenericCss("<p"));
    }

    #[test]
    fn test_empty_inputs() {
        assert!(matches!(Selector::from(""), Selector::Empty));
        assert!(matches!(Selector::from(String::new()), Selector::Empty));
        assert!(matches!(Selector::from(None::<&str>), Selector::Empty));
        assert!(matches!(Selector::from(Some("li")), Selector::Query(q) if q == "li"));
    }
}
