//! Record type for units of work flowing through the pipeline.
//!
//! A record is a JSON object delivered by the queue. The enricher requires
//! an `ip_address` field; every other field is opaque and passes through
//! unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::geolocation::Geolocation;
use crate::{Error, Result};

/// Field the enricher requires on every record.
pub const IP_ADDRESS_FIELD: &str = "ip_address";

/// Field the enricher attaches to every record it returns.
pub const GEOLOCATION_FIELD: &str = "geolocation";

/// One unit of work: a JSON object with an `ip_address` field plus
/// arbitrary passthrough fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Builds a record from any JSON value, rejecting non-objects.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(Error::internal(format!(
                "record must be a JSON object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Returns the record's IP address, if present as a string field.
    pub fn ip_address(&self) -> Option<&str> {
        self.0.get(IP_ADDRESS_FIELD).and_then(Value::as_str)
    }

    /// Attaches a geolocation outcome, replacing any previous one.
    pub fn set_geolocation(&mut self, geo: &Geolocation) -> Result<()> {
        let value = serde_json::to_value(geo)?;
        self.0.insert(GEOLOCATION_FIELD.to_string(), value);
        Ok(())
    }

    /// Returns the attached geolocation outcome, if any.
    pub fn geolocation(&self) -> Option<Geolocation> {
        let value = self.0.get(GEOLOCATION_FIELD)?;
        serde_json::from_value(value.clone()).ok()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
