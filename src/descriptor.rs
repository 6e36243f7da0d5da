use std::fmt;
use std::rc::{Rc, Weak};

use crate::node::DocumentNode;
use crate::source::Source;
use crate::typedef::{TypeDef, TypeLink, TypeRef};
use crate::value::{Converter, Renderer, Value};

/// What a field holds: either a scalar produced by a converter, or a
/// nested mapped type the engine recurses into.
pub enum FieldType<N: DocumentNode> {
    /// A scalar field; the converter turns the raw document string into a
    /// typed [`Value`].
    Scalar(Converter),
    /// A nested mapped type, used by the `child` and `children` sources.
    Mapped(TypeLink<N>),
}

/// A default for a field whose data is absent from the document: either a
/// ready value or a producer called once per application.
pub enum DefaultValue {
    /// A fixed value, cloned on every use.
    Value(Value),
    /// A callable producing a fresh value on every use.
    Producer(Rc<dyn Fn() -> Value>),
}

impl DefaultValue {
    /// Produce the default value.
    pub fn produce(&self) -> Value {
        match self {
            DefaultValue::Value(value) => value.clone(),
            DefaultValue::Producer(producer) => producer(),
        }
    }
}

/// The raw specification of one field, before it is bound to a source.
///
/// Only the field type is mandatory; everything else is a source-specific
/// default. The source kind defaults to `attr`, and for instance the
/// `child.text` source defaults its child tag to the field name.
///
/// ```rust
/// use graft::{convert, Element, FieldSpec, Value};
///
/// let spec: FieldSpec<Element> = FieldSpec::scalar(convert::string())
///     .source("child.text")
///     .tag("temperament")
///     .default_value(Value::String("mild".to_string()));
/// ```
pub struct FieldSpec<N: DocumentNode> {
    pub(crate) field_type: FieldType<N>,
    pub(crate) kind: Option<String>,
    pub(crate) tag: Option<String>,
    pub(crate) default: Option<DefaultValue>,
    pub(crate) optional: bool,
    pub(crate) renderer: Option<Renderer>,
    pub(crate) options: Option<Vec<Value>>,
}

impl<N: DocumentNode> FieldSpec<N> {
    fn new(field_type: FieldType<N>) -> Self {
        FieldSpec {
            field_type,
            kind: None,
            tag: None,
            default: None,
            optional: false,
            renderer: None,
            options: None,
        }
    }

    /// A scalar field using the given converter.
    pub fn scalar(converter: Converter) -> Self {
        Self::new(FieldType::Scalar(converter))
    }

    /// A field holding an instance of another mapped type.
    pub fn mapped(type_ref: &TypeRef<N>) -> Self {
        Self::new(FieldType::Mapped(TypeLink::Strong(type_ref.clone())))
    }

    /// A field holding an instance of a type that is still under
    /// construction, from [`TypeDef::new_cyclic`].
    pub fn mapped_cyclic(weak: Weak<TypeDef<N>>) -> Self {
        Self::new(FieldType::Mapped(TypeLink::Weak(weak)))
    }

    /// Override the source kind (the default is `attr`).
    pub fn source(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Override the attribute name or child tag the source looks at.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Use this value when the document lacks the field's data.
    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(DefaultValue::Value(value));
        self
    }

    /// Call this producer for a fresh default when the document lacks the
    /// field's data.
    pub fn default_with(mut self, producer: impl Fn() -> Value + 'static) -> Self {
        self.default = Some(DefaultValue::Producer(Rc::new(producer)));
        self
    }

    /// Mark the field as optional: absent data leaves the field unset
    /// instead of failing the read.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Override how the field's value is rendered back into a string on
    /// write.
    pub fn renderer(mut self, renderer: impl Fn(&Value) -> Result<String, String> + 'static) -> Self {
        self.renderer = Some(Rc::new(renderer));
        self
    }

    /// Restrict the converted value to one of the given options; anything
    /// else fails the read as a conversion error.
    pub fn options(mut self, options: Vec<Value>) -> Self {
        self.options = Some(options);
        self
    }

    /// The field type declared for this field.
    pub fn field_type(&self) -> &FieldType<N> {
        &self.field_type
    }

    /// The tag or attribute-name override, if any.
    pub fn tag_override(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// The configured default, if any.
    pub fn configured_default(&self) -> Option<&DefaultValue> {
        self.default.as_ref()
    }

    /// Whether the field is optional.
    pub fn is_optional(&self) -> bool {
        self.optional
    }
}

/// One field bound to its source: the unit the engine iterates over.
pub struct ContentDescriptor<N: DocumentNode> {
    pub(crate) name: String,
    pub(crate) kind: String,
    pub(crate) source: Box<dyn Source<N>>,
}

impl<N: DocumentNode> ContentDescriptor<N> {
    /// The field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The source kind this field was bound to.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub(crate) fn source(&self) -> &dyn Source<N> {
        self.source.as_ref()
    }
}

impl<N: DocumentNode> fmt::Debug for ContentDescriptor<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

/// An immutable, ordered table of content descriptors, one per field.
///
/// Built once through
/// [`SourceRegistry::build_table`](crate::SourceRegistry::build_table)
/// and validated at build time; declaration order defines both read and
/// write order.
pub struct ContentTable<N: DocumentNode> {
    descriptors: Vec<ContentDescriptor<N>>,
}

impl<N: DocumentNode> ContentTable<N> {
    pub(crate) fn new(descriptors: Vec<ContentDescriptor<N>>) -> Self {
        ContentTable { descriptors }
    }

    /// A table with no fields.
    pub fn empty() -> Self {
        ContentTable {
            descriptors: Vec::new(),
        }
    }

    /// The descriptors, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ContentDescriptor<N>> {
        self.descriptors.iter()
    }

    /// Look up a descriptor by field name.
    pub fn get(&self, name: &str) -> Option<&ContentDescriptor<N>> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    /// The number of fields.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// True if the table has no fields.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl<N: DocumentNode> fmt::Debug for ContentTable<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentTable")
            .field("descriptors", &self.descriptors)
            .finish()
    }
}

/// Ordered field-name → specification list handed to
/// [`SourceRegistry::build_table`](crate::SourceRegistry::build_table).
pub struct Fields<N: DocumentNode> {
    pub(crate) entries: Vec<(String, FieldSpec<N>)>,
}

impl<N: DocumentNode> Fields<N> {
    /// Start an empty field list.
    pub fn new() -> Self {
        Fields {
            entries: Vec::new(),
        }
    }

    /// Append a field. Declaration order is preserved all the way into the
    /// built table.
    pub fn field(mut self, name: impl Into<String>, spec: FieldSpec<N>) -> Self {
        self.entries.push((name.into(), spec));
        self
    }
}

impl<N: DocumentNode> Default for Fields<N> {
    fn default() -> Self {
        Self::new()
    }
}
