//! Typed attribute values and the evaluation record

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, RuleError};

/// A single attribute value: an integer or a string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Integer(i32),
    Text(String),
}

impl AttributeValue {
    /// Integer view used by ordering operators; strings read as `0`
    #[inline]
    pub fn as_integer(&self) -> i32 {
        match self {
            AttributeValue::Integer(v) => *v,
            AttributeValue::Text(_) => 0,
        }
    }

    /// String view used by equality operators; integers read as `""`
    #[inline]
    pub fn as_text(&self) -> &str {
        match self {
            AttributeValue::Integer(_) => "",
            AttributeValue::Text(s) => s,
        }
    }
}

impl From<i32> for AttributeValue {
    fn from(v: i32) -> Self {
        AttributeValue::Integer(v)
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::Text(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::Text(s)
    }
}

/// Attribute name to value mapping for one evaluation
pub type Attributes = HashMap<String, AttributeValue>;

/// Build [`Attributes`] from a JSON object.
///
/// Integers that fit in `i32` and strings are accepted; any other value is
/// rejected rather than silently coerced.
pub fn attributes_from_json(value: &Value) -> Result<Attributes> {
    let object = value.as_object().ok_or_else(|| {
        RuleError::Serialization("attributes must be a JSON object".to_string())
    })?;

    let mut attributes = Attributes::with_capacity(object.len());
    for (name, raw) in object {
        attributes.insert(name.clone(), attribute_from_json(name, raw)?);
    }
    Ok(attributes)
}

pub(crate) fn attribute_from_json(name: &str, raw: &Value) -> Result<AttributeValue> {
    match raw {
        Value::String(s) => Ok(AttributeValue::Text(s.clone())),
        Value::Number(n) => n
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .map(AttributeValue::Integer)
            .ok_or_else(|| RuleError::InvalidAttribute(name.to_string())),
        _ => Err(RuleError::InvalidAttribute(name.to_string())),
    }
}
