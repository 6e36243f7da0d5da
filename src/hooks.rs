use std::fmt;
use std::rc::Rc;

use ahash::AHashMap;

use crate::error::Error;
use crate::node::DocumentNode;
use crate::record::Record;
use crate::typedef::TypeRef;

/// The conversion events a hook can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    /// Fired after a full read, before the instance is returned.
    Read,
    /// Fired after a full write, before the node is returned.
    Write,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Read => write!(f, "read"),
            Event::Write => write!(f, "write"),
        }
    }
}

/// What a hook receives: the subject of the event. Read hooks get the
/// constructed instance, write hooks get the produced node; the same
/// callback shape serves both events.
pub enum Subject<'a, N: DocumentNode> {
    /// The instance a read just produced. The hook may mutate it.
    Record(&'a mut Record),
    /// The node a write just produced. The hook may mutate it.
    Node(&'a mut N),
}

impl<'a, N: DocumentNode> Subject<'a, N> {
    /// The record, if this is a read event.
    pub fn record(self) -> Option<&'a mut Record> {
        match self {
            Subject::Record(record) => Some(record),
            Subject::Node(_) => None,
        }
    }

    /// The node, if this is a write event.
    pub fn node(self) -> Option<&'a mut N> {
        match self {
            Subject::Node(node) => Some(node),
            Subject::Record(_) => None,
        }
    }
}

/// A hook callback. It receives the event, the mapped type the conversion
/// ran for, and the event's subject. An error aborts the conversion that
/// fired the hook.
pub type Hook<N> = Rc<dyn Fn(Event, &TypeRef<N>, Subject<'_, N>) -> Result<(), Error>>;

/// Per-type, per-event hook registrations.
///
/// Hooks key on the exact mapped type, identified by its shared
/// [`TypeRef`]: a hook registered for one type never fires for another,
/// however similar their tables are; there is no inheritance. The same
/// callback `Rc` can be attached under several types to share behavior.
/// Like the source registry, this is single-threaded mutable state with no
/// automatic cleanup; registrations live until they are removed.
pub struct HookRegistry<N: DocumentNode> {
    hooks: AHashMap<(usize, Event), Vec<Hook<N>>>,
}

fn key<N: DocumentNode>(mapped_type: &TypeRef<N>, event: Event) -> (usize, Event) {
    (Rc::as_ptr(mapped_type) as *const () as usize, event)
}

impl<N: DocumentNode> HookRegistry<N> {
    /// An empty registry.
    pub fn new() -> Self {
        HookRegistry {
            hooks: AHashMap::new(),
        }
    }

    /// Register a hook for an event on a mapped type. Hooks fire in
    /// registration order; adding the same callback `Rc` twice for the
    /// same type and event is a no-op.
    pub fn add(&mut self, mapped_type: &TypeRef<N>, event: Event, hook: Hook<N>) {
        let list = self.hooks.entry(key(mapped_type, event)).or_default();
        if !list.iter().any(|existing| Rc::ptr_eq(existing, &hook)) {
            list.push(hook);
        }
    }

    /// Remove a previously registered hook, identified by the same
    /// callback `Rc`. Removing a hook that was never added is a no-op.
    pub fn remove(&mut self, mapped_type: &TypeRef<N>, event: Event, hook: &Hook<N>) {
        if let Some(list) = self.hooks.get_mut(&key(mapped_type, event)) {
            list.retain(|existing| !Rc::ptr_eq(existing, hook));
        }
    }

    /// The number of hooks registered for an event on a mapped type.
    pub fn count(&self, mapped_type: &TypeRef<N>, event: Event) -> usize {
        self.hooks
            .get(&key(mapped_type, event))
            .map_or(0, |list| list.len())
    }

    pub(crate) fn fire_read(
        &self,
        mapped_type: &TypeRef<N>,
        record: &mut Record,
    ) -> Result<(), Error> {
        if let Some(list) = self.hooks.get(&key(mapped_type, Event::Read)) {
            for hook in list {
                hook(Event::Read, mapped_type, Subject::Record(record))?;
            }
        }
        Ok(())
    }

    pub(crate) fn fire_write(&self, mapped_type: &TypeRef<N>, node: &mut N) -> Result<(), Error> {
        if let Some(list) = self.hooks.get(&key(mapped_type, Event::Write)) {
            for hook in list {
                hook(Event::Write, mapped_type, Subject::Node(node))?;
            }
        }
        Ok(())
    }
}

impl<N: DocumentNode> Default for HookRegistry<N> {
    fn default() -> Self {
        Self::new()
    }
}
