use xmlparser::{ElementEnd, Token, Tokenizer};

use crate::element::Element;
use crate::error::Error;
use crate::escape::unescape;

struct TreeBuilder {
    stack: Vec<Element>,
    root: Option<Element>,
}

impl TreeBuilder {
    fn new() -> Self {
        TreeBuilder {
            stack: Vec::new(),
            root: None,
        }
    }

    fn open(&mut self, tag: &str) -> Result<(), Error> {
        if self.stack.is_empty() && self.root.is_some() {
            return Err(Error::ExtraDocumentElement);
        }
        self.stack.push(Element::new(tag));
        Ok(())
    }

    fn attribute(&mut self, name: &str, value: &str) -> Result<(), Error> {
        let value = unescape(value)?;
        if let Some(element) = self.stack.last_mut() {
            element.set_attribute(name, value);
        }
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<(), Error> {
        let element = match self.stack.last_mut() {
            Some(element) => element,
            // Whitespace between top-level constructs.
            None => return Ok(()),
        };
        // Text after a child would be tail text in a mixed-content model;
        // we only keep it when it isn't formatting whitespace.
        if !element.children().is_empty() && text.trim().is_empty() {
            return Ok(());
        }
        element.append_text(&unescape(text)?);
        Ok(())
    }

    fn close(&mut self, expected_tag: Option<&str>) -> Result<(), Error> {
        // The tokenizer guarantees an open element for every close, so the
        // stack is never empty here.
        if let Some(element) = self.stack.pop() {
            if let Some(expected) = expected_tag {
                if element.tag() != expected {
                    return Err(Error::MismatchedCloseTag {
                        expected: element.tag().to_string(),
                        found: expected.to_string(),
                    });
                }
            }
            match self.stack.last_mut() {
                Some(parent) => parent.append_child(element),
                None => self.root = Some(element),
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<Element, Error> {
        self.root.ok_or(Error::NoDocumentElement)
    }
}

fn qualified(prefix: &str, local: &str) -> String {
    if prefix.is_empty() {
        local.to_string()
    } else {
        format!("{}:{}", prefix, local)
    }
}

impl Element {
    /// Parse an XML document into an element tree.
    ///
    /// This covers what the mapping engine needs from a document: elements,
    /// attributes, text content and predefined entities. Comments,
    /// processing instructions and the XML declaration are skipped.
    /// Namespace declarations are not interpreted; prefixed names are kept
    /// verbatim as tags. Formatting whitespace between child elements is
    /// dropped.
    ///
    /// ```rust
    /// use graft::Element;
    ///
    /// let el = Element::parse("<person name='Henry'><temperament>bold</temperament></person>")?;
    /// assert_eq!(el.attribute("name"), Some("Henry"));
    /// assert_eq!(el.children()[0].text(), Some("bold"));
    /// # Ok::<(), graft::Error>(())
    /// ```
    pub fn parse(xml: &str) -> Result<Element, Error> {
        let mut builder = TreeBuilder::new();

        for token in Tokenizer::from(xml) {
            match token? {
                Token::ElementStart { prefix, local, .. } => {
                    builder.open(&qualified(prefix.as_str(), local.as_str()))?;
                }
                Token::Attribute {
                    prefix,
                    local,
                    value,
                    ..
                } => {
                    builder.attribute(&qualified(prefix.as_str(), local.as_str()), value.as_str())?;
                }
                Token::ElementEnd { end, .. } => match end {
                    ElementEnd::Open => {}
                    ElementEnd::Close(prefix, local) => {
                        builder.close(Some(&qualified(prefix.as_str(), local.as_str())))?;
                    }
                    ElementEnd::Empty => {
                        builder.close(None)?;
                    }
                },
                Token::Text { text } => {
                    builder.text(text.as_str())?;
                }
                Token::Cdata { text, .. } => {
                    if let Some(element) = builder.stack.last_mut() {
                        element.append_text(text.as_str());
                    }
                }
                _ => {}
            }
        }

        builder.finish()
    }
}
