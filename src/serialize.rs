use std::fmt;

use crate::element::Element;
use crate::escape::{escape_attribute, escape_text};

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag())?;
        for (name, value) in self.attributes() {
            write!(f, " {}=\"{}\"", name, escape_attribute(value))?;
        }
        if !self.has_content() {
            return write!(f, "/>");
        }
        write!(f, ">")?;
        if let Some(text) = self.text() {
            write!(f, "{}", escape_text(text))?;
        }
        for child in self.children() {
            write!(f, "{}", child)?;
        }
        write!(f, "</{}>", self.tag())
    }
}

impl Element {
    /// Serialize this element and everything below it to an XML string.
    ///
    /// Attributes appear in insertion order, children in document order,
    /// and text and attribute values are escaped with the predefined
    /// entities.
    pub fn to_xml_string(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_element() {
        assert_eq!(Element::new("doc").to_xml_string(), "<doc/>");
    }

    #[test]
    fn test_empty_text_collapses() {
        let mut el = Element::new("doc");
        el.set_text("");
        assert_eq!(el.to_xml_string(), "<doc/>");
    }

    #[test]
    fn test_text_is_escaped() {
        let mut el = Element::new("doc");
        el.set_text("a < b & c");
        assert_eq!(el.to_xml_string(), "<doc>a &lt; b &amp; c</doc>");
    }

    #[test]
    fn test_attribute_is_escaped() {
        let mut el = Element::new("doc");
        el.set_attribute("a", r#"say "hi""#);
        assert_eq!(el.to_xml_string(), r#"<doc a="say &quot;hi&quot;"/>"#);
    }
}
