use crate::node::DocumentNode;

/// A minimal owned XML element tree.
///
/// This is the convenience implementation of
/// [`DocumentNode`](crate::DocumentNode) bundled with the crate, so
/// mapped types can be read and written without pulling in a separate tree
/// library. It models exactly what the marshaling engine needs: a tag,
/// attributes in insertion order, optional text content and ordered child
/// elements. There is no namespace support and no mixed-content model
/// beyond a single text value per element.
///
/// ```rust
/// use graft::Element;
///
/// let mut el = Element::new("person");
/// el.set_attribute("name", "Henry");
/// el.append_child(Element::new("temperament"));
/// assert_eq!(el.to_xml_string(), r#"<person name="Henry"><temperament/></person>"#);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<Element>,
}

impl Element {
    /// Create an empty element with the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Element {
            tag: tag.into(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// The tag of this element.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Change the tag of this element.
    pub fn set_tag(&mut self, tag: impl Into<String>) {
        self.tag = tag.into();
    }

    /// Get an attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute. A new attribute is appended after the existing
    /// ones; setting an existing attribute replaces its value in place, so
    /// attribute order is stable.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// All attributes as `(name, value)` pairs, in insertion order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// The element's own text content.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Replace the element's text content.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    pub(crate) fn append_text(&mut self, text: &str) {
        match &mut self.text {
            Some(existing) => existing.push_str(text),
            None => self.text = Some(text.to_string()),
        }
    }

    /// The direct children, in document order.
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Append a child element.
    pub fn append_child(&mut self, child: Element) {
        self.children.push(child);
    }

    pub(crate) fn has_content(&self) -> bool {
        !self.children.is_empty() || self.text.as_deref().is_some_and(|t| !t.is_empty())
    }
}

impl DocumentNode for Element {
    fn create(tag: &str) -> Self {
        Element::new(tag)
    }

    fn tag(&self) -> &str {
        Element::tag(self)
    }

    fn set_tag(&mut self, tag: &str) {
        Element::set_tag(self, tag);
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        Element::attribute(self, name)
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        Element::set_attribute(self, name, value);
    }

    fn text(&self) -> Option<&str> {
        Element::text(self)
    }

    fn set_text(&mut self, text: &str) {
        Element::set_text(self, text);
    }

    fn children(&self) -> Vec<&Self> {
        self.children.iter().collect()
    }

    fn children_mut(&mut self) -> Vec<&mut Self> {
        self.children.iter_mut().collect()
    }

    fn append_child(&mut self, child: Self) {
        Element::append_child(self, child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_attribute_keeps_order() {
        let mut el = Element::new("doc");
        el.set_attribute("a", "1");
        el.set_attribute("b", "2");
        el.set_attribute("a", "3");
        let pairs: Vec<_> = el.attributes().collect();
        assert_eq!(pairs, [("a", "3"), ("b", "2")]);
    }

    #[test]
    fn test_find_children_filters_by_tag() {
        let mut el = Element::new("doc");
        el.append_child(Element::new("a"));
        el.append_child(Element::new("b"));
        el.append_child(Element::new("a"));
        assert_eq!(DocumentNode::find_children(&el, "a").len(), 2);
        assert!(DocumentNode::find_child(&el, "c").is_none());
    }
}
