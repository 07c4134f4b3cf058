// 🏷️ Registration records - typed-attribute envelope + decoder
// Every value coming out of the store is tagged with its type ({"S": ...},
// {"L": [...]}, ...). This module keeps the tag and knows how to flatten
// it into plain text for the aggregator and the CSV export.

use aws_sdk_dynamodb::types::AttributeValue as SdkAttributeValue;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

/// One registration: field name → tagged value, iterated in field-name order.
pub type Record = BTreeMap<String, AttributeValue>;

// ============================================================================
// ENVELOPE
// ============================================================================

/// AttributeValue - the store's typed-attribute envelope
///
/// Deserializes from DynamoDB JSON (`{"S": "Ana"}`) and from bare JSON
/// values. Anything we can't make sense of lands in `Raw` instead of
/// failing the whole run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "serde_json::Value")]
pub enum AttributeValue {
    S(String),
    N(String),
    Bool(bool),
    Null,
    L(Vec<AttributeValue>),
    M(BTreeMap<String, AttributeValue>),
    Ss(Vec<String>),
    Ns(Vec<String>),
    /// Binary, carried as base64 text
    B(String),
    Bs(Vec<String>),
    /// Unknown tag or malformed payload, kept verbatim
    Raw(String),
}

/// PlainValue - output of `AttributeValue::decode()`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlainValue {
    Text(String),
    List(Vec<String>),
    Empty,
}

impl AttributeValue {
    /// Strip the type tag.
    ///
    /// Lists are flattened into a single list of strings: nested lists
    /// contribute their elements at any depth, NULL members are dropped.
    pub fn decode(&self) -> PlainValue {
        match self {
            AttributeValue::S(s)
            | AttributeValue::N(s)
            | AttributeValue::B(s)
            | AttributeValue::Raw(s) => PlainValue::Text(s.clone()),
            AttributeValue::Bool(b) => PlainValue::Text(b.to_string()),
            AttributeValue::Null => PlainValue::Empty,
            AttributeValue::Ss(items) | AttributeValue::Ns(items) | AttributeValue::Bs(items) => {
                PlainValue::List(items.clone())
            }
            AttributeValue::L(items) => {
                let mut flat = Vec::with_capacity(items.len());
                for item in items {
                    match item.decode() {
                        PlainValue::Text(text) => flat.push(text),
                        PlainValue::List(nested) => flat.extend(nested),
                        PlainValue::Empty => {}
                    }
                }
                PlainValue::List(flat)
            }
            AttributeValue::M(members) => PlainValue::Text(map_to_json(members)),
        }
    }
}

impl PlainValue {
    /// Render as a single CSV cell
    pub fn to_cell(&self) -> String {
        match self {
            PlainValue::Text(text) => text.clone(),
            PlainValue::List(items) => items.join("; "),
            PlainValue::Empty => String::new(),
        }
    }

    /// First non-blank piece of text, if any
    pub fn first_text(&self) -> Option<&str> {
        match self {
            PlainValue::Text(text) => Some(text.as_str()).filter(|t| !t.trim().is_empty()),
            PlainValue::List(items) => items
                .iter()
                .map(String::as_str)
                .find(|t| !t.trim().is_empty()),
            PlainValue::Empty => None,
        }
    }
}

/// Maps have no flat form, so they show up as compact JSON of their
/// decoded members.
fn map_to_json(members: &BTreeMap<String, AttributeValue>) -> String {
    let object: Map<String, Value> = members
        .iter()
        .map(|(key, value)| {
            let plain = match value.decode() {
                PlainValue::Text(text) => Value::String(text),
                PlainValue::List(items) => {
                    Value::Array(items.into_iter().map(Value::String).collect())
                }
                PlainValue::Empty => Value::Null,
            };
            (key.clone(), plain)
        })
        .collect();

    Value::Object(object).to_string()
}

// ============================================================================
// CONVERSIONS
// ============================================================================

impl From<Value> for AttributeValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => AttributeValue::S(s),
            Value::Number(n) => AttributeValue::N(n.to_string()),
            Value::Bool(b) => AttributeValue::Bool(b),
            Value::Null => AttributeValue::Null,
            Value::Array(items) => {
                AttributeValue::L(items.into_iter().map(AttributeValue::from).collect())
            }
            Value::Object(map) => from_tagged_object(map),
        }
    }
}

/// `{"<TAG>": payload}` → matching variant, anything else → Raw
fn from_tagged_object(map: Map<String, Value>) -> AttributeValue {
    if map.len() == 1 {
        if let Some((tag, payload)) = map.iter().next() {
            if let Some(value) = decode_tagged(tag, payload) {
                return value;
            }
        }
    }

    AttributeValue::Raw(Value::Object(map).to_string())
}

fn decode_tagged(tag: &str, payload: &Value) -> Option<AttributeValue> {
    match (tag, payload) {
        ("S", Value::String(s)) => Some(AttributeValue::S(s.clone())),
        ("N", Value::String(n)) => Some(AttributeValue::N(n.clone())),
        ("N", Value::Number(n)) => Some(AttributeValue::N(n.to_string())),
        ("BOOL", Value::Bool(b)) => Some(AttributeValue::Bool(*b)),
        ("NULL", Value::Bool(true)) => Some(AttributeValue::Null),
        ("B", Value::String(b)) => Some(AttributeValue::B(b.clone())),
        ("L", Value::Array(items)) => Some(AttributeValue::L(
            items.iter().cloned().map(AttributeValue::from).collect(),
        )),
        ("M", Value::Object(members)) => Some(AttributeValue::M(
            members
                .iter()
                .map(|(key, value)| (key.clone(), AttributeValue::from(value.clone())))
                .collect(),
        )),
        ("SS", Value::Array(items)) => string_items(items).map(AttributeValue::Ss),
        ("NS", Value::Array(items)) => string_items(items).map(AttributeValue::Ns),
        ("BS", Value::Array(items)) => string_items(items).map(AttributeValue::Bs),
        _ => None,
    }
}

/// Set payloads must be all strings (NS members may also be bare numbers)
fn string_items(items: &[Value]) -> Option<Vec<String>> {
    items
        .iter()
        .map(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect()
}

impl From<SdkAttributeValue> for AttributeValue {
    fn from(value: SdkAttributeValue) -> Self {
        match value {
            SdkAttributeValue::S(s) => AttributeValue::S(s),
            SdkAttributeValue::N(n) => AttributeValue::N(n),
            SdkAttributeValue::Bool(b) => AttributeValue::Bool(b),
            SdkAttributeValue::Null(_) => AttributeValue::Null,
            SdkAttributeValue::L(items) => {
                AttributeValue::L(items.into_iter().map(AttributeValue::from).collect())
            }
            SdkAttributeValue::M(members) => AttributeValue::M(
                members
                    .into_iter()
                    .map(|(key, value)| (key, AttributeValue::from(value)))
                    .collect(),
            ),
            SdkAttributeValue::Ss(items) => AttributeValue::Ss(items),
            SdkAttributeValue::Ns(items) => AttributeValue::Ns(items),
            SdkAttributeValue::B(blob) => AttributeValue::B(STANDARD.encode(blob.as_ref())),
            SdkAttributeValue::Bs(blobs) => AttributeValue::Bs(
                blobs
                    .iter()
                    .map(|blob| STANDARD.encode(blob.as_ref()))
                    .collect(),
            ),
            other => AttributeValue::Raw(format!("{:?}", other)),
        }
    }
}

/// Convert one scanned SDK item into a Record
pub fn record_from_item(item: HashMap<String, SdkAttributeValue>) -> Record {
    item.into_iter()
        .map(|(key, value)| (key, AttributeValue::from(value)))
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
