//! Inline style declarations (`style.cssText`)
//!
//! Only the inline `style` attribute is modelled. There is no cascade.

/// Ordered list of `property: value` pairs parsed from `cssText`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleDeclaration {
    declarations: Vec<(String, String)>,
}

impl StyleDeclaration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `cssText`. Later declarations of the same property win.
    pub fn parse(css_text: &str) -> Self {
        let mut style = Self::new();
        for decl in css_text.split(';') {
            let Some((name, value)) = decl.split_once(':') else {
                continue;
            };
            let name = name.trim();
            let value = value.trim();
            if !name.is_empty() && !value.is_empty() {
                style.set_property(name, value);
            }
        }
        style
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Declared value, if any
    pub fn get_property_value(&self, name: &str) -> Option<&str> {
        let name = name.trim().to_ascii_lowercase();
        self.declarations
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set or replace a declaration
    pub fn set_property(&mut self, name: &str, value: &str) {
        let name = name.trim().to_ascii_lowercase();
        let value = value.trim().to_string();
        match self.declarations.iter_mut().find(|(n, _)| *n == name) {
            Some(decl) => decl.1 = value,
            None => self.declarations.push((name, value)),
        }
    }

    /// Remove a declaration, returning its value
    pub fn remove_property(&mut self, name: &str) -> Option<String> {
        let name = name.trim().to_ascii_lowercase();
        let index = self.declarations.iter().position(|(n, _)| *n == name)?;
        Some(self.declarations.remove(index).1)
    }

    /// Serialize as `cssText`
    pub fn css_text(&self) -> String {
        self.declarations
            .iter()
            .map(|(n, v)| format!("{n}:{v};"))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_serialize() {
        let style = StyleDeclaration::parse("color: red; display:block");
        assert_eq!(style.len(), 2);
        assert_eq!(style.get_property_value("color"), Some("red"));
        assert_eq!(style.css_text(), "color:red;display:block;");
    }

    #[test]
    fn test_last_declaration_wins() {
        let style = StyleDeclaration::parse("opacity:0;opacity:0.5;");
        assert_eq!(style.len(), 1);
        assert_eq!(style.get_property_value("opacity"), Some("0.5"));
    }

    #[test]
    fn test_value_with_colon() {
        let style = StyleDeclaration::parse("background:url(http://x/y.png)");
        assert_eq!(style.get_property_value("background"), Some("url(http://x/y.png)"));
    }

    #[test]
    fn test_remove() {
        let mut style = StyleDeclaration::parse("a:1;b:2");
        assert_eq!(style.remove_property("A"), Some("1".to_string()));
        assert_eq!(style.css_text(), "b:2;");
        assert_eq!(style.remove_property("a"), None);
    }
}
