/// The node capability the marshaling engine is written against.
///
/// The engine never touches a concrete tree type directly; any tree whose
/// nodes can get and set attributes, text and a tag, and enumerate and
/// append children in order can be mapped. The bundled
/// [`Element`](crate::Element) implements this trait, but the engine
/// works just as well against an adapter for another tree library.
pub trait DocumentNode: Sized {
    /// Create a fresh, empty node with the given tag.
    fn create(tag: &str) -> Self;

    /// The tag of this node.
    fn tag(&self) -> &str;

    /// Change the tag of this node.
    fn set_tag(&mut self, tag: &str);

    /// Get an attribute by name.
    fn attribute(&self, name: &str) -> Option<&str>;

    /// Set an attribute, replacing any previous value.
    fn set_attribute(&mut self, name: &str, value: &str);

    /// The node's own text content, if any.
    fn text(&self) -> Option<&str>;

    /// Replace the node's own text content.
    fn set_text(&mut self, text: &str);

    /// All direct children, in document order.
    fn children(&self) -> Vec<&Self>;

    /// All direct children, mutably, in document order.
    fn children_mut(&mut self) -> Vec<&mut Self>;

    /// Append a child node after any existing children.
    fn append_child(&mut self, child: Self);

    /// All direct children with the given tag, in document order.
    fn find_children(&self, tag: &str) -> Vec<&Self> {
        self.children()
            .into_iter()
            .filter(|child| child.tag() == tag)
            .collect()
    }

    /// The first direct child with the given tag.
    fn find_child(&self, tag: &str) -> Option<&Self> {
        self.children().into_iter().find(|child| child.tag() == tag)
    }

    /// The first direct child with the given tag, mutably.
    fn find_child_mut(&mut self, tag: &str) -> Option<&mut Self> {
        self.children_mut()
            .into_iter()
            .find(|child| child.tag() == tag)
    }
}
