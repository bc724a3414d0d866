use crate::context::Context;
use crate::error::{Error, Result};
use crate::shape::Mappable;
use crate::value::{Record, Value};

/// Wire codec: `bytes ↔ Value`.
///
/// The engine only touches a codec at the outermost edge of
/// `marshal` / `unmarshal`; everything in between is value trees.
pub trait WireCodec: Send + Sync {
    fn encode(&self, value: &Value) -> Result<Vec<u8>>;
    fn decode(&self, bytes: &[u8]) -> Result<Value>;
}

/// JSON over `serde_json`, the reference wire format.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec {
    pub pretty: bool,
}

impl JsonCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl WireCodec for JsonCodec {
    fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        let json = serde_json::Value::try_from(value)?;
        if self.pretty {
            Ok(serde_json::to_vec_pretty(&json)?)
        } else {
            Ok(serde_json::to_vec(&json)?)
        }
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value> {
        let json: serde_json::Value = serde_json::from_slice(bytes)?;
        Ok(Value::from(json))
    }
}

// ---------------------------------------------------------------------------
// Value ↔ serde_json::Value
// ---------------------------------------------------------------------------

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(v) = n.as_i64() {
                    Value::Int(v)
                } else if let Some(v) = n.as_u64() {
                    Value::UInt(v)
                } else {
                    n.as_f64().map_or(Value::Null, Value::Float)
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(fields) => Value::Record(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect::<Record>(),
            ),
        }
    }
}

impl TryFrom<&Value> for serde_json::Value {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self> {
        Ok(match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(v) => serde_json::Value::from(*v),
            Value::UInt(v) => serde_json::Value::from(*v),
            Value::Float(v) => serde_json::Number::from_f64(*v)
                .map(serde_json::Value::Number)
                .ok_or_else(|| Error::codec(format!("{v} has no JSON representation")))?,
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Sequence(items) => {
                let mut out = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    out.push(serde_json::Value::try_from(item).map_err(|e| e.at_index(index))?);
                }
                serde_json::Value::Array(out)
            }
            Value::Record(fields) => {
                let mut out = serde_json::Map::with_capacity(fields.len());
                for (key, item) in fields {
                    let json = serde_json::Value::try_from(item).map_err(|e| e.at_field(key.as_str()))?;
                    out.insert(key.clone(), json);
                }
                serde_json::Value::Object(out)
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Top-level entry points
// ---------------------------------------------------------------------------

impl Context {
    /// Flatten `value` and encode it as JSON (pretty if `Options::pretty`).
    pub fn marshal<T: Mappable>(&self, value: &T) -> Result<Vec<u8>> {
        self.marshal_with(&self.json_codec(), value)
    }

    /// Decode JSON and unflatten it into a `T`.
    pub fn unmarshal<T: Mappable>(&self, bytes: &[u8]) -> Result<T> {
        self.unmarshal_with(&self.json_codec(), bytes)
    }

    pub fn marshal_with<T: Mappable>(&self, codec: &dyn WireCodec, value: &T) -> Result<Vec<u8>> {
        let tree = self.flatten(value)?;
        codec.encode(&tree)
    }

    pub fn unmarshal_with<T: Mappable>(&self, codec: &dyn WireCodec, bytes: &[u8]) -> Result<T> {
        let tree = codec.decode(bytes)?;
        self.unflatten(&tree)
    }

    fn json_codec(&self) -> JsonCodec {
        JsonCodec {
            pretty: self.options().pretty,
        }
    }
}
