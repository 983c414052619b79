//! Field-equality filters and partial updates for document stores

use serde_json::{Map, Value};

/// Field name under which a store exposes its assigned identifier
pub const ID_FIELD: &str = "id";

/// Schemaless field map persisted for a record
pub type Fields = Map<String, Value>;

/// A record as returned by a document store
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    /// Identifier assigned by the store on insert
    pub id: String,
    /// Persisted fields, never containing the identifier itself
    pub fields: Fields,
}

impl StoredDocument {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Get a string field
    pub fn get_str(&self, field: &str) -> Option<&str> {
        if field == ID_FIELD {
            return Some(&self.id);
        }

        self.fields.get(field).and_then(Value::as_str)
    }
}

/// Ordered mapping from field name to the value it must equal
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    entries: Vec<(String, Value)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality condition, replacing any earlier one on the same field
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(field, value);
        self
    }

    pub fn push(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        let field = field.into();
        let value = value.into();

        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((field, value)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(field, value)| (field.as_str(), value))
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// The identifier condition, if the filter has one
    pub fn id(&self) -> Option<&Value> {
        self.get(ID_FIELD)
    }

    /// Conditions on persisted fields, excluding the identifier
    pub fn field_conditions(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.iter().filter(|(field, _)| *field != ID_FIELD)
    }

    /// Conditions on persisted fields as a field map
    pub fn field_map(&self) -> Fields {
        self.field_conditions()
            .map(|(field, value)| (field.to_string(), value.clone()))
            .collect()
    }

    /// Whether a stored document satisfies every condition
    pub fn matches(&self, document: &StoredDocument) -> bool {
        self.iter().all(|(field, expected)| {
            if field == ID_FIELD {
                return expected.as_str() == Some(document.id.as_str());
            }

            document.fields.get(field) == Some(expected)
        })
    }
}

/// Build a filter containing only the fields the caller supplied
///
/// Fields are visited in the given order; absent values are skipped, never
/// turned into a condition on an empty or sentinel value.
pub fn build_filter<'a, I>(fields: I) -> Filter
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
{
    let mut filter = Filter::new();

    for (field, value) in fields {
        if let Some(value) = value {
            filter.push(field, value);
        }
    }

    filter
}

/// Fields to overwrite on a matched record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
    set: Vec<(String, Value)>,
}

impl Update {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set.push((field.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.set.iter().map(|(field, value)| (field.as_str(), value))
    }

    /// Fields to overwrite as a field map
    pub fn field_map(&self) -> Fields {
        self.iter()
            .map(|(field, value)| (field.to_string(), value.clone()))
            .collect()
    }

    /// Apply the update to a field map in place
    pub fn apply(&self, fields: &mut Fields) {
        for (field, value) in self.iter() {
            fields.insert(field.to_string(), value.clone());
        }
    }
}
