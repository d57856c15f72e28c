//! Record types stored in the characters table

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the primary key attribute
pub const ID_FIELD: &str = "id";

/// A free-form character record.
///
/// The only reserved key is `id`; every other field is stored as given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Character(Map<String, Value>);

impl Character {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// The record's id, if it has a string one
    pub fn id(&self) -> Option<&str> {
        self.0.get(ID_FIELD).and_then(Value::as_str)
    }

    /// Overwrite the `id` field
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.0.insert(ID_FIELD.to_string(), Value::String(id.into()));
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Character {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

impl TryFrom<Value> for Character {
    type Error = Value;

    /// Only JSON objects are records; anything else is handed back.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(other),
        }
    }
}

impl From<Character> for Value {
    fn from(character: Character) -> Self {
        Value::Object(character.0)
    }
}
