use std::rc::Rc;

use crate::record::Record;

/// A field value carried by a [`Record`].
///
/// Scalar variants come out of converters applied to raw document strings;
/// `Record` and `Sequence` come out of the `child` and `children` sources
/// for nested mapped types.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A string scalar.
    String(String),
    /// An integer scalar.
    Integer(i64),
    /// A floating-point scalar.
    Float(f64),
    /// A boolean scalar.
    Boolean(bool),
    /// A nested mapped-type instance.
    Record(Record),
    /// An ordered sequence of values, used for `children` fields.
    Sequence(Vec<Value>),
}

impl Value {
    /// A short name for the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Boolean(_) => "boolean",
            Value::Record(_) => "record",
            Value::Sequence(_) => "sequence",
        }
    }

    /// Render a scalar into its canonical document string.
    ///
    /// Records and sequences have no string form; sources serialize them
    /// by recursing into the engine instead.
    pub fn render(&self) -> Result<String, String> {
        match self {
            Value::String(s) => Ok(s.clone()),
            Value::Integer(i) => Ok(i.to_string()),
            Value::Float(x) => Ok(x.to_string()),
            Value::Boolean(b) => Ok(b.to_string()),
            Value::Record(_) | Value::Sequence(_) => {
                Err(format!("a {} has no string form", self.kind()))
            }
        }
    }

    /// If this is a string, return it.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// If this is an integer, return it.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// If this is a float, return it.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// If this is a boolean, return it.
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// If this is a record, return it.
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    /// If this is a sequence, return it.
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }
}

/// A caller-supplied callable turning a raw document string into a typed
/// [`Value`]. The error string is wrapped by the engine into
/// [`Error::Conversion`](crate::Error::Conversion) together with the
/// field and mapped-type context.
pub type Converter = Rc<dyn Fn(&str) -> Result<Value, String>>;

/// The write-direction counterpart of [`Converter`]: renders a [`Value`]
/// into the string stored in the document. Fields without an explicit
/// renderer use [`Value::render`].
pub type Renderer = Rc<dyn Fn(&Value) -> Result<String, String>>;
