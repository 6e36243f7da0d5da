use std::fmt;

/// The error type for everything that can go wrong in this crate: building
/// content tables, converting between records and document nodes, and
/// parsing XML with the bundled element tree.
#[derive(Debug)]
pub enum Error {
    /// A field specification is malformed.
    Descriptor(String),
    /// No source kind with this name is registered.
    UnknownSource(String),
    /// An expected attribute is absent from the node and no default is
    /// configured.
    MissingAttribute {
        /// Tag of the mapped type being read.
        mapped_type: String,
        /// Field the descriptor belongs to.
        field: String,
        /// Name of the absent attribute.
        attribute: String,
    },
    /// The node has no text content and no default is configured.
    MissingText {
        /// Tag of the mapped type being read.
        mapped_type: String,
        /// Field the descriptor belongs to.
        field: String,
    },
    /// An expected child element is absent and no default is configured.
    MissingChild {
        /// Tag of the mapped type being read.
        mapped_type: String,
        /// Field the descriptor belongs to.
        field: String,
        /// Tag of the absent child element.
        tag: String,
    },
    /// A converter rejected a raw value during a read.
    Conversion {
        /// Tag of the mapped type being read.
        mapped_type: String,
        /// Field the descriptor belongs to.
        field: String,
        /// What the converter reported.
        message: String,
    },
    /// A value could not be rendered back into the node during a write.
    Write {
        /// Tag of the mapped type being written.
        mapped_type: String,
        /// Field the descriptor belongs to.
        field: String,
        /// What went wrong.
        message: String,
    },
    /// A hook callback failed; the conversion that fired it is aborted.
    Hook(String),
    /// A mapped type referenced through a weak link is no longer alive.
    UnresolvedType {
        /// Tag of the mapped type holding the reference.
        mapped_type: String,
        /// Field the descriptor belongs to.
        field: String,
    },
    /// Entity without a closing `;`.
    UnclosedEntity(String),
    /// Entity that is not one of the predefined XML entities.
    InvalidEntity(String),
    /// A close tag does not match the element it closes.
    MismatchedCloseTag {
        /// The element that was open.
        expected: String,
        /// The tag the document closed instead.
        found: String,
    },
    /// The parsed document contains no element at all.
    NoDocumentElement,
    /// The parsed document contains more than one top-level element.
    ExtraDocumentElement,
    /// Low-level tokenizer error.
    Parser(xmlparser::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Descriptor(message) => {
                write!(f, "malformed field specification: {}", message)
            }
            Error::UnknownSource(kind) => {
                write!(f, "no source named \"{}\" is registered", kind)
            }
            Error::MissingAttribute {
                mapped_type,
                field,
                attribute,
            } => write!(
                f,
                "no attribute \"{}\" on <{}> for field \"{}\" and no default given",
                attribute, mapped_type, field
            ),
            Error::MissingText { mapped_type, field } => write!(
                f,
                "no text content on <{}> for field \"{}\" and no default given",
                mapped_type, field
            ),
            Error::MissingChild {
                mapped_type,
                field,
                tag,
            } => write!(
                f,
                "no child <{}> under <{}> for field \"{}\" and no default given",
                tag, mapped_type, field
            ),
            Error::Conversion {
                mapped_type,
                field,
                message,
            } => write!(
                f,
                "cannot convert field \"{}\" of <{}>: {}",
                field, mapped_type, message
            ),
            Error::Write {
                mapped_type,
                field,
                message,
            } => write!(
                f,
                "cannot write field \"{}\" of <{}>: {}",
                field, mapped_type, message
            ),
            Error::Hook(message) => write!(f, "hook failed: {}", message),
            Error::UnresolvedType { mapped_type, field } => write!(
                f,
                "mapped type for field \"{}\" of <{}> is no longer alive",
                field, mapped_type
            ),
            Error::UnclosedEntity(entity) => {
                write!(f, "entity without closing \";\": &{}", entity)
            }
            Error::InvalidEntity(entity) => write!(f, "unknown entity: &{};", entity),
            Error::MismatchedCloseTag { expected, found } => write!(
                f,
                "expected </{}>, found </{}>",
                expected, found
            ),
            Error::NoDocumentElement => write!(f, "document has no element"),
            Error::ExtraDocumentElement => {
                write!(f, "document has more than one top-level element")
            }
            Error::Parser(e) => write!(f, "parse error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parser(e) => Some(e),
            _ => None,
        }
    }
}

impl From<xmlparser::Error> for Error {
    #[inline]
    fn from(e: xmlparser::Error) -> Self {
        Error::Parser(e)
    }
}
