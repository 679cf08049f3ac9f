//! Tool call arguments
//!
//! Arguments arrive as an untyped JSON object. They are converted once into
//! an [`Arguments`] bag of [`ArgValue`]s so that every later check is an
//! explicit presence test: a key is either absent, a string, or a boolean,
//! and `Some(false)` is never confused with "unset".

use std::collections::BTreeMap;

use serde_json::Value;

use crate::tools::{ParamKind, ToolDescriptor};
use crate::{Error, Result};

/// A single argument value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    Str(String),
    Bool(bool),
}

impl ArgValue {
    pub fn kind(&self) -> ParamKind {
        match self {
            ArgValue::Str(_) => ParamKind::String,
            ArgValue::Bool(_) => ParamKind::Boolean,
        }
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::Str(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        ArgValue::Str(value)
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        ArgValue::Bool(value)
    }
}

/// Arguments of one tool invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arguments(BTreeMap<String, ArgValue>);

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert raw `tools/call` arguments.
    ///
    /// `null` (or a missing `arguments` field) yields an empty bag. Within
    /// the object, `null` values are treated as absent and numbers are kept
    /// in their decimal string form. Arrays and nested objects are rejected.
    pub fn from_value(value: Value) -> Result<Self> {
        let map = match value {
            Value::Null => return Ok(Self::new()),
            Value::Object(map) => map,
            other => {
                return Err(Error::InvalidArguments {
                    message: format!("expected an object, got {}", json_type(&other)),
                });
            }
        };

        let mut args = BTreeMap::new();
        for (key, value) in map {
            let value = match value {
                Value::Null => continue,
                Value::String(s) => ArgValue::Str(s),
                Value::Bool(b) => ArgValue::Bool(b),
                Value::Number(n) => ArgValue::Str(n.to_string()),
                other => {
                    return Err(Error::InvalidArgument(format!(
                        "'{}' must be a string or boolean, got {}",
                        key,
                        json_type(&other)
                    )));
                }
            };
            args.insert(key, value);
        }
        Ok(Self(args))
    }

    /// Add an argument (builder pattern).
    pub fn with(mut self, key: &str, value: impl Into<ArgValue>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// String value, if present (including the empty string).
    pub fn str(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(ArgValue::Str(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// String value, treating the empty string as unset.
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.str(key).filter(|s| !s.is_empty())
    }

    /// Boolean value, if present. `Some(false)` means explicitly false.
    pub fn bool(&self, key: &str) -> Option<bool> {
        match self.0.get(key) {
            Some(ArgValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn require_str(&self, key: &str) -> Result<&str> {
        self.str(key)
            .ok_or_else(|| Error::MissingArgument(key.to_string()))
    }

    pub fn require_bool(&self, key: &str) -> Result<bool> {
        self.bool(key)
            .ok_or_else(|| Error::MissingArgument(key.to_string()))
    }

    /// Check the arguments against a tool's parameter schema.
    ///
    /// Every required parameter must be present, every present parameter
    /// must have the declared type, and enumerated parameters must hold one
    /// of their allowed values. Keys the schema does not declare are ignored.
    pub fn validate(&self, tool: &ToolDescriptor) -> Result<()> {
        for param in tool.params {
            let Some(value) = self.0.get(param.name) else {
                if param.required {
                    return Err(Error::MissingArgument(param.name.to_string()));
                }
                continue;
            };

            if value.kind() != param.kind {
                return Err(Error::InvalidArgument(format!(
                    "'{}' must be a {}",
                    param.name,
                    param.kind.as_str()
                )));
            }

            if let ArgValue::Str(s) = value {
                if !param.allowed_values.is_empty() && !param.allowed_values.contains(&s.as_str()) {
                    return Err(Error::InvalidArgument(format!(
                        "'{}' must be one of: {}",
                        param.name,
                        param.allowed_values.join(", ")
                    )));
                }
            }
        }

        for key in self.0.keys() {
            if tool.param(key).is_none() {
                tracing::debug!(tool = tool.name, argument = %key, "Ignoring undeclared argument");
            }
        }
        Ok(())
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
