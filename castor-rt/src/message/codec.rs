//! Wire envelope: JSON text with reserved tags for addresses and binaries.
//!
//! Every cast encodes the outgoing value to JSON text and decodes it again
//! on delivery, also for same-process messages. The round trip is the
//! isolation boundary: the receiver gets a structurally fresh tree and can
//! never alias a container still owned by the sender.
//!
//! Two value kinds need custom wire forms:
//!
//! - an address encodes as `{"_pyact_address": "<actor_id>"}`
//! - a binary encodes as `{"_pyact_binary": "<base64>"}`
//!
//! On decode, any JSON object consisting of exactly one of these reserved
//! keys is reconstituted; all other objects pass through as plain mappings.
//! Tuples and sets flatten to JSON arrays and come back as sequences.

// Layer 1: Standard library imports
use std::collections::BTreeMap;

// Layer 2: Third-party crate imports
use serde_json::{Map as JsonMap, Number, Value as JsonValue};

// Layer 3: Internal module imports
use super::value::{Binary, Value};
use crate::actor::address::{ActorId, Address};
use crate::actor::error::{ActorError, RtResult};
use crate::actor::registry;

/// Reserved key tagging an encoded address.
pub const ADDRESS_KEY: &str = "_pyact_address";
/// Reserved key tagging an encoded binary.
pub const BINARY_KEY: &str = "_pyact_binary";

/// Encode a value to its wire text.
///
/// Fails with [`ActorError::DeadActor`] if the value embeds an address
/// whose actor has terminated, and with [`ActorError::BadEnvelope`] for
/// non-finite floats, which JSON cannot carry.
pub fn encode(value: &Value) -> RtResult<String> {
    Ok(to_json(value)?.to_string())
}

/// Decode wire text back into a value.
///
/// An embedded address naming an unknown actor id decodes to a terminated
/// address; the failure surfaces as `DeadActor` on first use.
pub fn decode(text: &str) -> RtResult<Value> {
    let json: JsonValue =
        serde_json::from_str(text).map_err(|error| ActorError::BadEnvelope(error.to_string()))?;
    Ok(from_json(json))
}

fn to_json(value: &Value) -> RtResult<JsonValue> {
    match value {
        Value::Null => Ok(JsonValue::Null),
        Value::Bool(flag) => Ok(JsonValue::Bool(*flag)),
        Value::Int(number) => Ok(JsonValue::Number(Number::from(*number))),
        Value::Float(number) => Number::from_f64(*number)
            .map(JsonValue::Number)
            .ok_or_else(|| ActorError::BadEnvelope("non-finite float in message".to_owned())),
        Value::Str(text) => Ok(JsonValue::String(text.clone())),
        Value::List(items) | Value::Tuple(items) | Value::Set(items) => {
            let mut encoded = Vec::with_capacity(items.len());
            for item in items {
                encoded.push(to_json(item)?);
            }
            Ok(JsonValue::Array(encoded))
        }
        Value::Map(entries) => {
            let mut object = JsonMap::with_capacity(entries.len());
            for (key, entry) in entries {
                object.insert(key.clone(), to_json(entry)?);
            }
            Ok(JsonValue::Object(object))
        }
        Value::Address(address) => {
            let id = address.actor_id()?;
            let mut object = JsonMap::with_capacity(1);
            object.insert(ADDRESS_KEY.to_owned(), JsonValue::String(id.to_string()));
            Ok(JsonValue::Object(object))
        }
        Value::Binary(binary) => {
            let mut object = JsonMap::with_capacity(1);
            object.insert(BINARY_KEY.to_owned(), JsonValue::String(binary.to_base64()));
            Ok(JsonValue::Object(object))
        }
    }
}

fn from_json(json: JsonValue) -> Value {
    match json {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(flag) => Value::Bool(flag),
        JsonValue::Number(number) => number
            .as_i64()
            .map(Value::Int)
            .or_else(|| number.as_f64().map(Value::Float))
            .unwrap_or(Value::Null),
        JsonValue::String(text) => Value::Str(text),
        JsonValue::Array(items) => Value::List(items.into_iter().map(from_json).collect()),
        JsonValue::Object(object) => from_json_object(object),
    }
}

fn from_json_object(object: JsonMap<String, JsonValue>) -> Value {
    if object.len() == 1 {
        if let Some(id) = object.get(ADDRESS_KEY).and_then(JsonValue::as_str) {
            let address = registry::lookup(&ActorId::from(id)).unwrap_or_else(|_| Address::terminated());
            return Value::Address(address);
        }
        if let Some(text) = object.get(BINARY_KEY).and_then(JsonValue::as_str) {
            if let Some(binary) = Binary::from_base64(text) {
                return Value::Binary(binary);
            }
        }
    }
    let entries: BTreeMap<String, Value> = object
        .into_iter()
        .map(|(key, entry)| (key, from_json(entry)))
        .collect();
    Value::Map(entries)
}
