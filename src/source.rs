use crate::descriptor::{DefaultValue, FieldSpec, FieldType};
use crate::engine::Engine;
use crate::error::Error;
use crate::node::DocumentNode;
use crate::record::Record;
use crate::typedef::{TypeDef, TypeLink, TypeRef};
use crate::value::{Converter, Renderer, Value};

/// A source strategy: the pluggable unit that reads one field from a node
/// and writes it back.
///
/// One source instance is constructed per content descriptor, at table
/// build time, by the factory registered for its kind; it owns whatever it
/// captured from the field specification and carries no other state.
///
/// `read` must set the field on the record (or return an error, which
/// aborts the whole conversion); `write` must render the field into the
/// node. Both get the engine back so nested mapped types can recurse, and
/// the owning type's tag for error context. `create_default` seeds the
/// field on a freshly constructed instance, if the source has a default to
/// offer.
pub trait Source<N: DocumentNode> {
    /// Read the field from `node` into `record`.
    fn read(
        &self,
        engine: &Engine<N>,
        mapped_type: &str,
        field: &str,
        record: &mut Record,
        node: &N,
    ) -> Result<(), Error>;

    /// Write the field from `record` into `node`.
    fn write(
        &self,
        engine: &Engine<N>,
        mapped_type: &str,
        field: &str,
        record: &Record,
        node: &mut N,
    ) -> Result<(), Error>;

    /// Seed the field's default on a new instance, if there is one.
    fn create_default(&self, _field: &str, _record: &mut Record) {}
}

/// What every scalar source captures from a field specification: the
/// converter, the optional renderer override, the default policy and the
/// permitted options.
struct ScalarBinding {
    converter: Converter,
    renderer: Option<Renderer>,
    default: Option<DefaultValue>,
    optional: bool,
    options: Option<Vec<Value>>,
}

impl ScalarBinding {
    fn from_spec<N: DocumentNode>(
        kind: &str,
        field: &str,
        spec: FieldSpec<N>,
    ) -> Result<(Self, Option<String>), Error> {
        let FieldSpec {
            field_type,
            tag,
            default,
            optional,
            renderer,
            options,
            ..
        } = spec;
        match field_type {
            FieldType::Scalar(converter) => Ok((
                ScalarBinding {
                    converter,
                    renderer,
                    default,
                    optional,
                    options,
                },
                tag,
            )),
            FieldType::Mapped(_) => Err(Error::Descriptor(format!(
                "field \"{}\" uses source \"{}\", which needs a scalar converter, not a mapped type",
                field, kind
            ))),
        }
    }

    fn convert(&self, mapped_type: &str, field: &str, raw: &str) -> Result<Value, Error> {
        let value = (self.converter)(raw).map_err(|message| Error::Conversion {
            mapped_type: mapped_type.to_string(),
            field: field.to_string(),
            message,
        })?;
        if let Some(options) = &self.options {
            if !options.contains(&value) {
                return Err(Error::Conversion {
                    mapped_type: mapped_type.to_string(),
                    field: field.to_string(),
                    message: format!("value {:?} is not one of the permitted options", value),
                });
            }
        }
        Ok(value)
    }

    fn render(&self, mapped_type: &str, field: &str, value: &Value) -> Result<String, Error> {
        let rendered = match &self.renderer {
            Some(renderer) => renderer(value),
            None => value.render(),
        };
        rendered.map_err(|message| Error::Write {
            mapped_type: mapped_type.to_string(),
            field: field.to_string(),
            message,
        })
    }

    /// The value a write reads from the record, or an error if the field
    /// is unset and not optional. `Ok(None)` means skip the field.
    fn value_for_write<'a>(
        &self,
        mapped_type: &str,
        field: &str,
        record: &'a Record,
    ) -> Result<Option<&'a Value>, Error> {
        match record.get(field) {
            Some(value) => Ok(Some(value)),
            None if self.optional => Ok(None),
            None => Err(Error::Write {
                mapped_type: mapped_type.to_string(),
                field: field.to_string(),
                message: "record has no value for this field".to_string(),
            }),
        }
    }

    fn apply_default(&self, field: &str, record: &mut Record) {
        if let Some(default) = &self.default {
            record.set(field, default.produce());
        }
    }
}

/// `attr`: the field lives in an attribute of the node itself. The
/// attribute name is the field name unless overridden with `tag`.
pub struct AttrSource {
    attribute: Option<String>,
    binding: ScalarBinding,
}

impl AttrSource {
    /// The factory registered under the `attr` kind.
    pub fn factory<N: DocumentNode>(
        field: &str,
        spec: FieldSpec<N>,
    ) -> Result<Box<dyn Source<N>>, Error> {
        let (binding, attribute) = ScalarBinding::from_spec("attr", field, spec)?;
        Ok(Box::new(AttrSource { attribute, binding }))
    }
}

impl<N: DocumentNode> Source<N> for AttrSource {
    fn read(
        &self,
        _engine: &Engine<N>,
        mapped_type: &str,
        field: &str,
        record: &mut Record,
        node: &N,
    ) -> Result<(), Error> {
        let name = self.attribute.as_deref().unwrap_or(field);
        match node.attribute(name) {
            Some(raw) => {
                let value = self.binding.convert(mapped_type, field, raw)?;
                record.set(field, value);
                Ok(())
            }
            None => {
                if let Some(default) = &self.binding.default {
                    record.set(field, default.produce());
                    Ok(())
                } else if self.binding.optional {
                    Ok(())
                } else {
                    Err(Error::MissingAttribute {
                        mapped_type: mapped_type.to_string(),
                        field: field.to_string(),
                        attribute: name.to_string(),
                    })
                }
            }
        }
    }

    fn write(
        &self,
        _engine: &Engine<N>,
        mapped_type: &str,
        field: &str,
        record: &Record,
        node: &mut N,
    ) -> Result<(), Error> {
        if let Some(value) = self.binding.value_for_write(mapped_type, field, record)? {
            let rendered = self.binding.render(mapped_type, field, value)?;
            let name = self.attribute.as_deref().unwrap_or(field);
            node.set_attribute(name, &rendered);
        }
        Ok(())
    }

    fn create_default(&self, field: &str, record: &mut Record) {
        self.binding.apply_default(field, record);
    }
}

/// `text`: the field lives in the node's own text content.
pub struct TextSource {
    binding: ScalarBinding,
}

impl TextSource {
    /// The factory registered under the `text` kind.
    pub fn factory<N: DocumentNode>(
        field: &str,
        spec: FieldSpec<N>,
    ) -> Result<Box<dyn Source<N>>, Error> {
        let (binding, _) = ScalarBinding::from_spec("text", field, spec)?;
        Ok(Box::new(TextSource { binding }))
    }
}

impl<N: DocumentNode> Source<N> for TextSource {
    fn read(
        &self,
        _engine: &Engine<N>,
        mapped_type: &str,
        field: &str,
        record: &mut Record,
        node: &N,
    ) -> Result<(), Error> {
        match node.text() {
            Some(raw) => {
                let value = self.binding.convert(mapped_type, field, raw)?;
                record.set(field, value);
                Ok(())
            }
            None => {
                if let Some(default) = &self.binding.default {
                    record.set(field, default.produce());
                    Ok(())
                } else if self.binding.optional {
                    Ok(())
                } else {
                    Err(Error::MissingText {
                        mapped_type: mapped_type.to_string(),
                        field: field.to_string(),
                    })
                }
            }
        }
    }

    fn write(
        &self,
        _engine: &Engine<N>,
        mapped_type: &str,
        field: &str,
        record: &Record,
        node: &mut N,
    ) -> Result<(), Error> {
        if let Some(value) = self.binding.value_for_write(mapped_type, field, record)? {
            let rendered = self.binding.render(mapped_type, field, value)?;
            node.set_text(&rendered);
        }
        Ok(())
    }

    fn create_default(&self, field: &str, record: &mut Record) {
        self.binding.apply_default(field, record);
    }
}

/// `child.text`: the field lives in the text of a single child element.
/// The child tag defaults to the field name.
pub struct ChildTextSource {
    tag: Option<String>,
    binding: ScalarBinding,
}

impl ChildTextSource {
    /// The factory registered under the `child.text` kind.
    pub fn factory<N: DocumentNode>(
        field: &str,
        spec: FieldSpec<N>,
    ) -> Result<Box<dyn Source<N>>, Error> {
        let (binding, tag) = ScalarBinding::from_spec("child.text", field, spec)?;
        Ok(Box::new(ChildTextSource { tag, binding }))
    }
}

impl<N: DocumentNode> Source<N> for ChildTextSource {
    fn read(
        &self,
        _engine: &Engine<N>,
        mapped_type: &str,
        field: &str,
        record: &mut Record,
        node: &N,
    ) -> Result<(), Error> {
        let tag = self.tag.as_deref().unwrap_or(field);
        match node.find_child(tag) {
            Some(child) => {
                // An empty child element reads as the empty string.
                let raw = child.text().unwrap_or("");
                let value = self.binding.convert(mapped_type, field, raw)?;
                record.set(field, value);
                Ok(())
            }
            None => {
                if let Some(default) = &self.binding.default {
                    record.set(field, default.produce());
                    Ok(())
                } else if self.binding.optional {
                    Ok(())
                } else {
                    Err(Error::MissingChild {
                        mapped_type: mapped_type.to_string(),
                        field: field.to_string(),
                        tag: tag.to_string(),
                    })
                }
            }
        }
    }

    fn write(
        &self,
        _engine: &Engine<N>,
        mapped_type: &str,
        field: &str,
        record: &Record,
        node: &mut N,
    ) -> Result<(), Error> {
        if let Some(value) = self.binding.value_for_write(mapped_type, field, record)? {
            let rendered = self.binding.render(mapped_type, field, value)?;
            let tag = self.tag.as_deref().unwrap_or(field);
            match node.find_child_mut(tag) {
                Some(child) => child.set_text(&rendered),
                None => {
                    let mut child = N::create(tag);
                    child.set_text(&rendered);
                    node.append_child(child);
                }
            }
        }
        Ok(())
    }

    fn create_default(&self, field: &str, record: &mut Record) {
        self.binding.apply_default(field, record);
    }
}

fn mapped_link<N: DocumentNode>(
    kind: &str,
    field: &str,
    field_type: FieldType<N>,
) -> Result<TypeLink<N>, Error> {
    match field_type {
        FieldType::Mapped(link) => Ok(link),
        FieldType::Scalar(_) => Err(Error::Descriptor(format!(
            "field \"{}\" uses source \"{}\", which needs a mapped type, not a scalar converter",
            field, kind
        ))),
    }
}

fn resolve_link<N: DocumentNode>(
    link: &TypeLink<N>,
    mapped_type: &str,
    field: &str,
) -> Result<TypeRef<N>, Error> {
    link.resolve().ok_or_else(|| Error::UnresolvedType {
        mapped_type: mapped_type.to_string(),
        field: field.to_string(),
    })
}

/// `child`: the field is an instance of another mapped type, stored as a
/// single child element. The child tag defaults to the nested type's tag.
pub struct ChildSource<N: DocumentNode> {
    tag: Option<String>,
    link: TypeLink<N>,
    default: Option<DefaultValue>,
    optional: bool,
}

impl<N: DocumentNode + 'static> ChildSource<N> {
    /// The factory registered under the `child` kind.
    pub fn factory(field: &str, spec: FieldSpec<N>) -> Result<Box<dyn Source<N>>, Error> {
        let FieldSpec {
            field_type,
            tag,
            default,
            optional,
            ..
        } = spec;
        let link = mapped_link("child", field, field_type)?;
        Ok(Box::new(ChildSource {
            tag,
            link,
            default,
            optional,
        }))
    }

    fn child_tag<'a>(&'a self, nested: &'a TypeDef<N>) -> &'a str {
        self.tag.as_deref().unwrap_or(nested.tag())
    }
}

impl<N: DocumentNode + 'static> Source<N> for ChildSource<N> {
    fn read(
        &self,
        engine: &Engine<N>,
        mapped_type: &str,
        field: &str,
        record: &mut Record,
        node: &N,
    ) -> Result<(), Error> {
        let nested = resolve_link(&self.link, mapped_type, field)?;
        let tag = self.child_tag(&nested);
        match node.find_child(tag) {
            Some(child) => {
                let value = engine.read(&nested, child)?;
                record.set(field, Value::Record(value));
                Ok(())
            }
            None => {
                if let Some(default) = &self.default {
                    record.set(field, default.produce());
                    Ok(())
                } else if self.optional {
                    Ok(())
                } else {
                    Err(Error::MissingChild {
                        mapped_type: mapped_type.to_string(),
                        field: field.to_string(),
                        tag: tag.to_string(),
                    })
                }
            }
        }
    }

    fn write(
        &self,
        engine: &Engine<N>,
        mapped_type: &str,
        field: &str,
        record: &Record,
        node: &mut N,
    ) -> Result<(), Error> {
        match record.get(field) {
            Some(Value::Record(nested_record)) => {
                let nested = resolve_link(&self.link, mapped_type, field)?;
                let mut child = engine.write(&nested, nested_record)?;
                if let Some(tag) = &self.tag {
                    child.set_tag(tag);
                }
                node.append_child(child);
                Ok(())
            }
            Some(other) => Err(Error::Write {
                mapped_type: mapped_type.to_string(),
                field: field.to_string(),
                message: format!("expected a record value, found a {}", other.kind()),
            }),
            None if self.optional => Ok(()),
            None => Err(Error::Write {
                mapped_type: mapped_type.to_string(),
                field: field.to_string(),
                message: "record has no value for this field".to_string(),
            }),
        }
    }

    fn create_default(&self, field: &str, record: &mut Record) {
        if let Some(default) = &self.default {
            record.set(field, default.produce());
        }
    }
}

/// `children`: the field is a sequence of instances of another mapped
/// type, stored as all matching child elements in document order.
pub struct ChildrenSource<N: DocumentNode> {
    tag: Option<String>,
    link: TypeLink<N>,
    default: Option<DefaultValue>,
}

impl<N: DocumentNode + 'static> ChildrenSource<N> {
    /// The factory registered under the `children` kind.
    pub fn factory(field: &str, spec: FieldSpec<N>) -> Result<Box<dyn Source<N>>, Error> {
        let FieldSpec {
            field_type,
            tag,
            default,
            ..
        } = spec;
        let link = mapped_link("children", field, field_type)?;
        Ok(Box::new(ChildrenSource { tag, link, default }))
    }
}

impl<N: DocumentNode + 'static> Source<N> for ChildrenSource<N> {
    fn read(
        &self,
        engine: &Engine<N>,
        mapped_type: &str,
        field: &str,
        record: &mut Record,
        node: &N,
    ) -> Result<(), Error> {
        let nested = resolve_link(&self.link, mapped_type, field)?;
        let tag = self.tag.as_deref().unwrap_or(nested.tag());
        let mut items = Vec::new();
        for child in node.find_children(tag) {
            items.push(Value::Record(engine.read(&nested, child)?));
        }
        record.set(field, Value::Sequence(items));
        Ok(())
    }

    fn write(
        &self,
        engine: &Engine<N>,
        mapped_type: &str,
        field: &str,
        record: &Record,
        node: &mut N,
    ) -> Result<(), Error> {
        let items = match record.get(field) {
            Some(Value::Sequence(items)) => items,
            Some(other) => {
                return Err(Error::Write {
                    mapped_type: mapped_type.to_string(),
                    field: field.to_string(),
                    message: format!("expected a sequence value, found a {}", other.kind()),
                })
            }
            // An unset children field writes nothing, like an empty one.
            None => return Ok(()),
        };
        let nested = resolve_link(&self.link, mapped_type, field)?;
        for item in items {
            match item {
                Value::Record(nested_record) => {
                    let mut child = engine.write(&nested, nested_record)?;
                    if let Some(tag) = &self.tag {
                        child.set_tag(tag);
                    }
                    node.append_child(child);
                }
                other => {
                    return Err(Error::Write {
                        mapped_type: mapped_type.to_string(),
                        field: field.to_string(),
                        message: format!(
                            "sequence elements must be records, found a {}",
                            other.kind()
                        ),
                    })
                }
            }
        }
        Ok(())
    }

    fn create_default(&self, field: &str, record: &mut Record) {
        match &self.default {
            Some(default) => record.set(field, default.produce()),
            None => record.set(field, Value::Sequence(Vec::new())),
        }
    }
}
