use std::rc::{Rc, Weak};

use crate::descriptor::ContentTable;
use crate::error::Error;
use crate::node::DocumentNode;
use crate::record::Record;

/// A mapped type: a node tag plus the content table describing how each
/// field maps onto a document node.
///
/// Mapped types are shared as [`TypeRef`] values; the hook registry and
/// nested `child`/`children` fields identify a type by that shared
/// reference.
pub struct TypeDef<N: DocumentNode> {
    tag: String,
    table: ContentTable<N>,
}

/// Shared reference to a [`TypeDef`].
pub type TypeRef<N> = Rc<TypeDef<N>>;

impl<N: DocumentNode> TypeDef<N> {
    /// Create a mapped type from a tag and a built content table.
    pub fn new(tag: impl Into<String>, table: ContentTable<N>) -> TypeRef<N> {
        Rc::new(TypeDef {
            tag: tag.into(),
            table,
        })
    }

    /// Create a self-referential mapped type.
    ///
    /// The closure receives a weak reference to the type under
    /// construction, which can be embedded into its own table through
    /// [`FieldSpec::mapped_cyclic`](crate::FieldSpec::mapped_cyclic):
    ///
    /// ```rust
    /// use graft::{convert, Element, Engine, Fields, FieldSpec, TypeDef};
    ///
    /// let engine = Engine::<Element>::new();
    /// let branch = TypeDef::new_cyclic("branch", |weak| {
    ///     engine.build_table(
    ///         Fields::new()
    ///             .field("label", FieldSpec::scalar(convert::string()))
    ///             .field("branches", FieldSpec::mapped_cyclic(weak).source("children")),
    ///     )
    /// })?;
    ///
    /// let node = Element::parse("<branch label='a'><branch label='b'/></branch>")?;
    /// let tree = engine.read(&branch, &node)?;
    /// assert_eq!(tree.sequence("branches").unwrap().len(), 1);
    /// # Ok::<(), graft::Error>(())
    /// ```
    pub fn new_cyclic<F>(tag: impl Into<String>, build: F) -> Result<TypeRef<N>, Error>
    where
        F: FnOnce(Weak<TypeDef<N>>) -> Result<ContentTable<N>, Error>,
    {
        let tag = tag.into();
        let mut failure = None;
        let type_ref = Rc::new_cyclic(|weak| {
            let table = match build(weak.clone()) {
                Ok(table) => table,
                Err(e) => {
                    failure = Some(e);
                    ContentTable::empty()
                }
            };
            TypeDef { tag, table }
        });
        match failure {
            Some(e) => Err(e),
            None => Ok(type_ref),
        }
    }

    /// The tag used when this type is serialized as a standalone node.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The content descriptor table of this type.
    pub fn table(&self) -> &ContentTable<N> {
        &self.table
    }

    /// Create a fresh instance with every configured default applied:
    /// fields with a `default` get it, `children` fields get an empty
    /// sequence, everything else is left unset.
    pub fn new_instance(&self) -> Record {
        let mut record = Record::new(&self.tag);
        for descriptor in self.table.iter() {
            descriptor.source().create_default(descriptor.name(), &mut record);
        }
        record
    }
}

/// A reference from one mapped type's descriptor to another mapped type.
///
/// Usually strong; the weak variant exists so a type can embed itself (or
/// take part in a reference cycle) without leaking the cycle.
pub enum TypeLink<N: DocumentNode> {
    /// An ordinary reference to another type.
    Strong(TypeRef<N>),
    /// A cycle-breaking reference, created via [`TypeDef::new_cyclic`].
    Weak(Weak<TypeDef<N>>),
}

impl<N: DocumentNode> TypeLink<N> {
    /// Resolve the link to a shared reference. Only a weak link whose
    /// target was dropped fails to resolve.
    pub fn resolve(&self) -> Option<TypeRef<N>> {
        match self {
            TypeLink::Strong(type_ref) => Some(type_ref.clone()),
            TypeLink::Weak(weak) => weak.upgrade(),
        }
    }
}

impl<N: DocumentNode> Clone for TypeLink<N> {
    fn clone(&self) -> Self {
        match self {
            TypeLink::Strong(type_ref) => TypeLink::Strong(type_ref.clone()),
            TypeLink::Weak(weak) => TypeLink::Weak(weak.clone()),
        }
    }
}
