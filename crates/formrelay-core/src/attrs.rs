//! Element attribute bags
//!
//! Well-known attributes are keyed by an ordered enum so iteration is
//! deterministic (enum order, then extension attributes by name). The
//! engine itself only reads and rewrites `Name`; the rest rides through to
//! the presentational layer.

use std::collections::BTreeMap;

/// Well-known HTML attributes of a submission element
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HtmlAttr {
    Id,
    Name,
    Type,
    Value,
    Class,
    Style,
    Title,
    Disabled,
    Href,
    Target,
    OnClick,
    OnChange,
    TabIndex,
}

impl HtmlAttr {
    /// Attribute name as written into markup
    pub fn as_str(self) -> &'static str {
        match self {
            HtmlAttr::Id => "id",
            HtmlAttr::Name => "name",
            HtmlAttr::Type => "type",
            HtmlAttr::Value => "value",
            HtmlAttr::Class => "class",
            HtmlAttr::Style => "style",
            HtmlAttr::Title => "title",
            HtmlAttr::Disabled => "disabled",
            HtmlAttr::Href => "href",
            HtmlAttr::Target => "target",
            HtmlAttr::OnClick => "onclick",
            HtmlAttr::OnChange => "onchange",
            HtmlAttr::TabIndex => "tabindex",
        }
    }
}

/// Attribute set for one element: fixed well-known keys plus arbitrary
/// extension keys, iterated in deterministic order
#[derive(Clone, Debug, Default)]
pub struct AttributeBag {
    known: BTreeMap<HtmlAttr, String>,
    extra: BTreeMap<String, String>,
}

impl AttributeBag {
    pub fn new() -> Self {
        AttributeBag::default()
    }

    /// Set a well-known attribute, replacing any previous value
    pub fn set(&mut self, attr: HtmlAttr, value: impl Into<String>) -> &mut Self {
        self.known.insert(attr, value.into());
        self
    }

    /// Get a well-known attribute
    pub fn get(&self, attr: HtmlAttr) -> Option<&str> {
        self.known.get(&attr).map(String::as_str)
    }

    /// Set an extension attribute (anything outside the well-known set)
    pub fn set_extra(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    /// Get an extension attribute
    pub fn get_extra(&self, name: &str) -> Option<&str> {
        self.extra.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.known.len() + self.extra.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty() && self.extra.is_empty()
    }

    /// Iterate all attributes: well-known keys in enum order, then
    /// extension keys in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.known
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .chain(self.extra.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get() {
        let mut attrs = AttributeBag::new();
        attrs.set(HtmlAttr::Name, "confirmBtn");
        attrs.set(HtmlAttr::Class, "primary");
        attrs.set_extra("data-step", "2");

        assert_eq!(attrs.get(HtmlAttr::Name), Some("confirmBtn"));
        assert_eq!(attrs.get(HtmlAttr::Value), None);
        assert_eq!(attrs.get_extra("data-step"), Some("2"));
        assert_eq!(attrs.len(), 3);
    }

    #[test]
    fn test_iteration_order() {
        let mut attrs = AttributeBag::new();
        attrs.set_extra("data-z", "1");
        attrs.set(HtmlAttr::OnClick, "return false;");
        attrs.set(HtmlAttr::Name, "b");
        attrs.set_extra("data-a", "2");

        let keys: Vec<&str> = attrs.iter().map(|(k, _)| k).collect();
        // Enum order first, extensions by name after
        assert_eq!(keys, vec!["name", "onclick", "data-a", "data-z"]);
    }

    #[test]
    fn test_set_replaces() {
        let mut attrs = AttributeBag::new();
        attrs.set(HtmlAttr::Name, "first");
        attrs.set(HtmlAttr::Name, "second");
        assert_eq!(attrs.get(HtmlAttr::Name), Some("second"));
        assert_eq!(attrs.len(), 1);
    }
}
