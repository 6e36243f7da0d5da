#![forbid(unsafe_code)]

//! Declarative mapping between records and XML-shaped document trees.
//!
//! A *mapped type* declares, once, how each of its fields maps onto a
//! document node: an attribute, the node's text, a child's text, or a
//! nested mapped type stored as one or many child elements. The engine
//! derives both conversion directions from that declaration.
//!
//! ```rust
//! use graft::{convert, Element, Engine, Fields, FieldSpec, TypeDef};
//!
//! let engine = Engine::<Element>::new();
//!
//! let person = TypeDef::new(
//!     "person",
//!     engine.build_table(
//!         Fields::new()
//!             .field("name", FieldSpec::scalar(convert::string()))
//!             .field("age", FieldSpec::scalar(convert::integer()))
//!             .field("temperament", FieldSpec::scalar(convert::string()).source("child.text")),
//!     )?,
//! );
//!
//! let node = Element::parse(
//!     "<person name='Henry' age='30'><temperament>bold</temperament></person>",
//! )?;
//! let henry = engine.read(&person, &node)?;
//! assert_eq!(henry.str("name"), Some("Henry"));
//! assert_eq!(henry.integer("age"), Some(30));
//! assert_eq!(henry.str("temperament"), Some("bold"));
//!
//! let out = engine.write(&person, &henry)?;
//! assert_eq!(
//!     out.to_xml_string(),
//!     r#"<person name="Henry" age="30"><temperament>bold</temperament></person>"#
//! );
//! # Ok::<(), graft::Error>(())
//! ```
//!
//! The moving parts:
//!
//! - [`DocumentNode`] is the abstract node capability the engine is
//!   written against; [`Element`] is the bundled implementation, with a
//!   small parser and serializer.
//! - A [`FieldSpec`] declares one field; [`SourceRegistry::build_table`]
//!   turns an ordered [`Fields`] list into an immutable [`ContentTable`],
//!   binding each field to a source instance of its kind. New kinds can be
//!   registered; registering over an existing name replaces it.
//! - [`TypeDef`] pairs a tag with a table; nested types are referenced
//!   through `FieldSpec::mapped`, recursively.
//! - [`HookRegistry`] holds per-type callbacks fired after a full read
//!   (with the new instance) or write (with the new node). Hooks attach to
//!   the exact type only; they are not inherited.
//! - [`Engine`] owns both registries and runs the conversions.

pub mod convert;
mod descriptor;
mod element;
mod engine;
mod error;
mod escape;
mod hooks;
mod node;
mod parse;
mod record;
mod registry;
mod serialize;
mod source;
mod typedef;
mod value;

pub use descriptor::{ContentDescriptor, ContentTable, DefaultValue, FieldSpec, FieldType, Fields};
pub use element::Element;
pub use engine::Engine;
pub use error::Error;
pub use hooks::{Event, Hook, HookRegistry, Subject};
pub use node::DocumentNode;
pub use record::Record;
pub use registry::{SourceFactory, SourceRegistry};
pub use source::{AttrSource, ChildSource, ChildTextSource, ChildrenSource, Source, TextSource};
pub use typedef::{TypeDef, TypeLink, TypeRef};
pub use value::{Converter, Renderer, Value};
