//! Inline style declarations
//!
//! Parses and serializes an element's `style` attribute.

/// Ordered list of `property: value` declarations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    declarations: Vec<(String, String)>,
}

impl InlineStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `style` attribute text; malformed declarations are skipped
    pub fn parse(css_text: &str) -> Self {
        let mut style = Self::new();
        for decl in css_text.split(';') {
            let Some((property, value)) = decl.split_once(':') else {
                continue;
            };
            let property = property.trim();
            let value = value.trim();
            if !property.is_empty() && !value.is_empty() {
                style.set_property(property, value);
            }
        }
        style
    }

    /// Property value (property names are ASCII case-insensitive)
    pub fn get_property(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(property))
            .map(|(_, value)| value.as_str())
    }

    /// Set or replace a property, keeping its original position
    pub fn set_property(&mut self, property: &str, value: &str) {
        let property = property.to_ascii_lowercase();
        match self.declarations.iter_mut().find(|(name, _)| *name == property) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.declarations.push((property, value.to_string())),
        }
    }

    /// Remove a property, returning its value
    pub fn remove_property(&mut self, property: &str) -> Option<String> {
        let index = self
            .declarations
            .iter()
            .position(|(name, _)| name.eq_ignore_ascii_case(property))?;
        Some(self.declarations.remove(index).1)
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Serialized form used for the `style` attribute
    pub fn css_text(&self) -> String {
        self.declarations
            .iter()
            .map(|(name, value)| format!("{name}: {value};"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
