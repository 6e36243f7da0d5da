use std::rc::Rc;

use ahash::AHashMap;

use crate::descriptor::{ContentDescriptor, ContentTable, FieldSpec, Fields};
use crate::error::Error;
use crate::node::DocumentNode;
use crate::source::{
    AttrSource, ChildSource, ChildTextSource, ChildrenSource, Source, TextSource,
};

/// A constructor for a source: called once per field at table build time
/// with the field name and its specification.
pub type SourceFactory<N> = Rc<dyn Fn(&str, FieldSpec<N>) -> Result<Box<dyn Source<N>>, Error>>;

const DEFAULT_KIND: &str = "attr";

/// The mapping from source-kind names to source factories.
///
/// A registry starts out with the five built-in kinds (`attr`, `text`,
/// `child.text`, `child`, `children`); registering a kind under an
/// existing name silently replaces it, which is the supported way to
/// override a built-in. The registry is not thread-safe: register
/// everything up front, then build tables and convert.
pub struct SourceRegistry<N: DocumentNode> {
    factories: AHashMap<String, SourceFactory<N>>,
}

impl<N: DocumentNode + 'static> SourceRegistry<N> {
    /// A registry with the built-in kinds installed.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register("attr", AttrSource::factory::<N>);
        registry.register("text", TextSource::factory::<N>);
        registry.register("child.text", ChildTextSource::factory::<N>);
        registry.register("child", ChildSource::<N>::factory);
        registry.register("children", ChildrenSource::<N>::factory);
        registry
    }

    /// A registry with no kinds at all, for callers that want full control
    /// over the available sources.
    pub fn empty() -> Self {
        SourceRegistry {
            factories: AHashMap::new(),
        }
    }

    /// Register a source factory under a kind name. If the name is taken,
    /// the previous factory is replaced.
    pub fn register<F>(&mut self, kind: impl Into<String>, factory: F)
    where
        F: Fn(&str, FieldSpec<N>) -> Result<Box<dyn Source<N>>, Error> + 'static,
    {
        self.factories.insert(kind.into(), Rc::new(factory));
    }

    /// Remove a kind. Unknown names are ignored.
    pub fn unregister(&mut self, kind: &str) {
        self.factories.remove(kind);
    }

    /// Look up the factory for a kind name.
    pub fn resolve(&self, kind: &str) -> Result<&SourceFactory<N>, Error> {
        self.factories
            .get(kind)
            .ok_or_else(|| Error::UnknownSource(kind.to_string()))
    }

    /// True if a kind with this name is registered.
    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// Build a content table from an ordered field list.
    ///
    /// Each field is bound to a freshly constructed source instance of its
    /// kind (`attr` when unspecified). All validation happens here, never
    /// during conversion: a duplicate field name or a specification the
    /// source rejects fails with [`Error::Descriptor`], an unregistered
    /// kind with [`Error::UnknownSource`].
    pub fn build_table(&self, fields: Fields<N>) -> Result<ContentTable<N>, Error> {
        let mut descriptors: Vec<ContentDescriptor<N>> = Vec::with_capacity(fields.entries.len());
        for (name, spec) in fields.entries {
            if descriptors.iter().any(|d| d.name == name) {
                return Err(Error::Descriptor(format!(
                    "duplicate field \"{}\"",
                    name
                )));
            }
            let kind = spec
                .kind
                .clone()
                .unwrap_or_else(|| DEFAULT_KIND.to_string());
            let factory = self.resolve(&kind)?;
            let source = factory(&name, spec)?;
            descriptors.push(ContentDescriptor { name, kind, source });
        }
        Ok(ContentTable::new(descriptors))
    }
}

impl<N: DocumentNode + 'static> Default for SourceRegistry<N> {
    fn default() -> Self {
        Self::new()
    }
}
