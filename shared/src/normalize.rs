//! Response normalization.
//!
//! The content API answers in two shapes depending on its version:
//!
//! - flat entities: `{ "id": 1, "documentId": "abc", "title": "..." }`
//! - wrapped entities: `{ "id": 1, "attributes": { "title": "..." } }`, with
//!   relations nested as `{ "data": { "id": 2, "attributes": {...} } }`
//!
//! Bodies may additionally be wrapped in a `{ data, meta }` envelope. The
//! functions here fold all of that into the flat shape the model types in
//! this crate deserialize from.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::{Envelope, Meta, Pagination};

/// Failure to map a normalized body onto a model type.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// The flattened JSON did not match the target type.
    #[error("unexpected response shape: {0}")]
    Shape(#[from] serde_json::Error),
}

/// Split a body into its payload and optional metadata.
///
/// A body counts as an envelope when it is an object carrying a `data`
/// field; anything else is returned as a bare payload.
pub fn split_envelope(body: Value) -> (Value, Option<Meta>) {
    match body {
        Value::Object(mut fields) if fields.contains_key("data") => {
            let data = fields.remove("data").unwrap_or(Value::Null);
            let meta = fields.remove("meta").and_then(|meta| {
                serde_json::from_value::<Meta>(meta)
                    .map_err(|err| tracing::debug!("ignoring unreadable response meta: {err}"))
                    .ok()
            });
            (data, meta)
        },
        other => (other, None),
    }
}

/// Flatten wrapped entities and `{ data }` relations, recursively.
pub fn flatten(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.into_iter().map(flatten).collect()),
        Value::Object(fields) => Value::Object(flatten_entity(fields)),
        other => other,
    }
}

fn flatten_entity(mut fields: Map<String, Value>) -> Map<String, Value> {
    if let Some(Value::Object(attributes)) = fields.remove("attributes") {
        for (key, value) in attributes {
            fields.entry(key).or_insert(value);
        }
    }

    let mut flat = Map::with_capacity(fields.len());
    for (key, value) in fields {
        flat.insert(key, flatten(unwrap_relation(value)));
    }

    if !flat.contains_key("documentId") {
        let backfill = match flat.get("id") {
            Some(Value::Number(id)) => Some(id.to_string()),
            Some(Value::String(id)) => Some(id.clone()),
            _ => None,
        };
        if let Some(id) = backfill {
            flat.insert("documentId".to_string(), Value::String(id));
        }
    }
    flat
}

// `{ "data": X }` (optionally with `meta`) is a relation wrapper.
fn unwrap_relation(value: Value) -> Value {
    match value {
        Value::Object(mut fields)
            if fields.contains_key("data")
                && fields.keys().all(|key| key == "data" || key == "meta") =>
        {
            fields.remove("data").unwrap_or(Value::Null)
        },
        other => other,
    }
}

/// Decode any entity (or list of entities) from either schema shape.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, NormalizeError> {
    Ok(serde_json::from_value(flatten(value))?)
}

/// Decode a possibly-enveloped body into its canonical envelope.
pub fn decode_envelope<T: DeserializeOwned>(body: Value) -> Result<Envelope<T>, NormalizeError> {
    let (data, meta) = split_envelope(body);
    Ok(Envelope {
        data: decode(data)?,
        meta,
    })
}

/// Decode a list body; a null or missing payload is an empty list.
pub fn decode_list<T: DeserializeOwned>(
    body: Value,
) -> Result<(Vec<T>, Option<Pagination>), NormalizeError> {
    let (data, meta) = split_envelope(body);
    let items = match data {
        Value::Null => Vec::new(),
        Value::Array(_) => decode(data)?,
        other => vec![decode(other)?],
    };
    Ok((items, meta.and_then(|meta| meta.pagination)))
}

/// Best-effort server-side error text: `error.message`, then `message`.
pub fn server_message(body: &Value) -> Option<String> {
    body.pointer("/error/message")
        .and_then(Value::as_str)
        .or_else(|| body.get("message").and_then(Value::as_str))
        .filter(|message| !message.trim().is_empty())
        .map(str::to_string)
}
