use crate::value::Value;

/// An instance of a mapped type: an ordered collection of named field
/// values, labeled with the type's tag.
///
/// Field order is the order in which fields were first set. Records built
/// by the engine follow the content table's declaration order, which is
/// what makes a read/write round trip deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    type_tag: String,
    fields: Vec<(String, Value)>,
}

impl Record {
    /// Create an empty record for the mapped type with the given tag.
    pub fn new(type_tag: impl Into<String>) -> Self {
        Record {
            type_tag: type_tag.into(),
            fields: Vec::new(),
        }
    }

    /// The tag of the mapped type this record belongs to.
    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }

    /// Get a field value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Get a field value by name, mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.fields
            .iter_mut()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    /// Set a field value. Setting an existing field replaces its value in
    /// place; a new field is appended after the existing ones.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Remove a field, returning its value if it was set.
    pub fn unset(&mut self, name: &str) -> Option<Value> {
        let index = self.fields.iter().position(|(n, _)| n == name)?;
        Some(self.fields.remove(index).1)
    }

    /// All fields as `(name, value)` pairs, in field order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// The number of fields set on this record.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if no field is set.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Get a string field.
    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Get an integer field.
    pub fn integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_integer)
    }

    /// Get a float field.
    pub fn float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_float)
    }

    /// Get a boolean field.
    pub fn boolean(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_boolean)
    }

    /// Get a nested record field.
    pub fn record(&self, name: &str) -> Option<&Record> {
        self.get(name).and_then(Value::as_record)
    }

    /// Get a sequence field.
    pub fn sequence(&self, name: &str) -> Option<&[Value]> {
        self.get(name).and_then(Value::as_sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_keeps_order() {
        let mut record = Record::new("person");
        record.set("name", Value::String("Henry".to_string()));
        record.set("age", Value::Integer(30));
        record.set("name", Value::String("Anne".to_string()));
        let names: Vec<_> = record.fields().map(|(n, _)| n).collect();
        assert_eq!(names, ["name", "age"]);
        assert_eq!(record.str("name"), Some("Anne"));
    }

    #[test]
    fn test_typed_accessors() {
        let mut record = Record::new("person");
        record.set("age", Value::Integer(30));
        assert_eq!(record.integer("age"), Some(30));
        assert_eq!(record.str("age"), None);
        assert_eq!(record.integer("missing"), None);
    }

    #[test]
    fn test_unset() {
        let mut record = Record::new("person");
        record.set("age", Value::Integer(30));
        assert_eq!(record.unset("age"), Some(Value::Integer(30)));
        assert_eq!(record.unset("age"), None);
        assert!(record.is_empty());
    }
}
