//! Structured-output schema descriptors.
//!
//! Generators that support schema-constrained output receive the expected
//! shape as data. The descriptor here is deliberately narrow: an array of
//! objects whose fields are strings, which is all the flashcard contract
//! needs. Validation happens once, when a schema is attached to a request.

use serde_json::{Value, json};

use crate::{Error, Result};

/// Kind of a single schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A JSON string field.
    String,
}

impl FieldKind {
    /// Wire name of the kind, matching the generator API's casing.
    fn wire_name(self) -> &'static str {
        match self {
            Self::String => "STRING",
        }
    }
}

/// A named field of the expected object shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaField {
    /// Field name as it must appear in the output objects.
    pub name: String,
    /// Value kind of the field.
    pub kind: FieldKind,
    /// Whether the generator must always emit the field.
    pub required: bool,
}

impl SchemaField {
    /// Creates a required string field.
    pub fn required_string<T: Into<String>>(name: T) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::String,
            required: true,
        }
    }
}

/// Expected shape of a schema-constrained response: an array of objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSchema {
    fields: Vec<SchemaField>,
}

impl ResponseSchema {
    /// Creates a schema over the given object fields.
    pub fn array_of_objects(fields: Vec<SchemaField>) -> Self {
        Self { fields }
    }

    /// The flashcard contract: objects with required `question` and `answer` strings.
    pub fn flashcards() -> Self {
        Self::array_of_objects(vec![
            SchemaField::required_string("question"),
            SchemaField::required_string("answer"),
        ])
    }

    /// Checks the descriptor for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSchema`] if the schema has no fields or a
    /// field name is empty or duplicated.
    pub fn validate(&self) -> Result<()> {
        if self.fields.is_empty() {
            return Err(Error::InvalidSchema("schema has no fields".to_owned()));
        }

        for (index, field) in self.fields.iter().enumerate() {
            if field.name.is_empty() {
                return Err(Error::InvalidSchema(format!("field {index} has an empty name")));
            }
            if self.fields[..index].iter().any(|prior| prior.name == field.name) {
                return Err(Error::InvalidSchema(format!(
                    "duplicate field name: {}",
                    field.name
                )));
            }
        }

        Ok(())
    }

    /// Renders the descriptor as the generator API's JSON schema value.
    pub fn to_value(&self) -> Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for field in &self.fields {
            properties.insert(field.name.clone(), json!({ "type": field.kind.wire_name() }));
            if field.required {
                required.push(Value::String(field.name.clone()));
            }
        }

        json!({
            "type": "ARRAY",
            "items": {
                "type": "OBJECT",
                "properties": Value::Object(properties),
                "required": Value::Array(required),
            }
        })
    }
}
