use crate::descriptor::{ContentTable, Fields};
use crate::error::Error;
use crate::hooks::{Event, Hook, HookRegistry};
use crate::node::DocumentNode;
use crate::record::Record;
use crate::registry::{SourceFactory, SourceRegistry};
use crate::typedef::TypeRef;

/// The marshaling engine: owns the source and hook registries and
/// orchestrates conversions between records and document nodes.
///
/// For every conversion the engine walks the mapped type's content table
/// in declaration order, dispatches each descriptor to its bound source,
/// and fires the type's hooks once the whole pass is done. `child` and
/// `children` sources call back into the engine for their nested types, so
/// the recursion is bounded by the depth of the document (reading) or of
/// the object graph (writing); there is no artificial depth limit.
///
/// The engine is synchronous and single-threaded. Any failure aborts the
/// conversion immediately; no partial record or node is ever returned.
pub struct Engine<N: DocumentNode> {
    sources: SourceRegistry<N>,
    hooks: HookRegistry<N>,
}

impl<N: DocumentNode + 'static> Engine<N> {
    /// An engine with the built-in source kinds and no hooks.
    pub fn new() -> Self {
        Engine {
            sources: SourceRegistry::new(),
            hooks: HookRegistry::new(),
        }
    }

    /// An engine built from explicitly constructed registries.
    pub fn with_registries(sources: SourceRegistry<N>, hooks: HookRegistry<N>) -> Self {
        Engine { sources, hooks }
    }

    /// The source registry.
    pub fn sources(&self) -> &SourceRegistry<N> {
        &self.sources
    }

    /// The source registry, mutably, for registering custom kinds.
    pub fn sources_mut(&mut self) -> &mut SourceRegistry<N> {
        &mut self.sources
    }

    /// The hook registry.
    pub fn hooks(&self) -> &HookRegistry<N> {
        &self.hooks
    }

    /// The hook registry, mutably.
    pub fn hooks_mut(&mut self) -> &mut HookRegistry<N> {
        &mut self.hooks
    }

    /// Register a source factory under a kind name; shorthand for
    /// [`SourceRegistry::register`].
    pub fn register_source(&mut self, kind: impl Into<String>, factory: SourceFactory<N>) {
        let kind = kind.into();
        self.sources
            .register(kind, move |field, spec| factory(field, spec));
    }

    /// Build a content table against this engine's source registry;
    /// shorthand for [`SourceRegistry::build_table`].
    pub fn build_table(&self, fields: Fields<N>) -> Result<ContentTable<N>, Error> {
        self.sources.build_table(fields)
    }

    /// Register a hook; shorthand for [`HookRegistry::add`].
    pub fn add_hook(&mut self, mapped_type: &TypeRef<N>, event: Event, hook: Hook<N>) {
        self.hooks.add(mapped_type, event, hook);
    }

    /// Remove a hook; shorthand for [`HookRegistry::remove`].
    pub fn remove_hook(&mut self, mapped_type: &TypeRef<N>, event: Event, hook: &Hook<N>) {
        self.hooks.remove(mapped_type, event, hook);
    }

    /// Read a node into a fresh instance of a mapped type.
    ///
    /// Every descriptor in the type's table is read in declaration order;
    /// then the type's read hooks fire in registration order, each free to
    /// mutate the instance.
    ///
    /// ```rust
    /// use graft::{convert, Element, Engine, Fields, FieldSpec, TypeDef};
    ///
    /// let engine = Engine::<Element>::new();
    /// let person = TypeDef::new(
    ///     "person",
    ///     engine.build_table(
    ///         Fields::new()
    ///             .field("name", FieldSpec::scalar(convert::string()))
    ///             .field("age", FieldSpec::scalar(convert::integer())),
    ///     )?,
    /// );
    ///
    /// let node = Element::parse("<person name='Henry' age='30'/>")?;
    /// let henry = engine.read(&person, &node)?;
    /// assert_eq!(henry.str("name"), Some("Henry"));
    /// assert_eq!(henry.integer("age"), Some(30));
    /// # Ok::<(), graft::Error>(())
    /// ```
    pub fn read(&self, mapped_type: &TypeRef<N>, node: &N) -> Result<Record, Error> {
        let mut record = Record::new(mapped_type.tag());
        for descriptor in mapped_type.table().iter() {
            descriptor.source().read(
                self,
                mapped_type.tag(),
                descriptor.name(),
                &mut record,
                node,
            )?;
        }
        self.hooks.fire_read(mapped_type, &mut record)?;
        Ok(record)
    }

    /// Write an instance of a mapped type into a fresh node labeled with
    /// the type's tag.
    ///
    /// Every descriptor is written in declaration order, which makes
    /// attribute and child emission deterministic; then the type's write
    /// hooks fire in registration order, each free to mutate the node.
    pub fn write(&self, mapped_type: &TypeRef<N>, record: &Record) -> Result<N, Error> {
        let mut node = N::create(mapped_type.tag());
        for descriptor in mapped_type.table().iter() {
            descriptor.source().write(
                self,
                mapped_type.tag(),
                descriptor.name(),
                record,
                &mut node,
            )?;
        }
        self.hooks.fire_write(mapped_type, &mut node)?;
        Ok(node)
    }
}

impl<N: DocumentNode + 'static> Default for Engine<N> {
    fn default() -> Self {
        Self::new()
    }
}
