use crate::error::DispatchError;
use serde::Serialize;
use serde_json::{Number, Value};
use std::collections::BTreeMap;
use std::fmt;

/// A single scalar argument value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ArgValue {
    Text(String),
    Number(Number),
    Bool(bool),
}

impl ArgValue {
    /// Blank strings are treated the same as a missing argument.
    pub fn is_blank(&self) -> bool {
        matches!(self, ArgValue::Text(s) if s.trim().is_empty())
    }

    pub fn to_json(&self) -> Value {
        match self {
            ArgValue::Text(s) => Value::String(s.clone()),
            ArgValue::Number(n) => Value::Number(n.clone()),
            ArgValue::Bool(b) => Value::Bool(*b),
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Text(s) => f.write_str(s),
            ArgValue::Number(n) => write!(f, "{n}"),
            ArgValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::Text(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        ArgValue::Text(value)
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        ArgValue::Number(value.into())
    }
}

/// Arguments supplied with one invocation. Lives for a single dispatch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvocationArgs {
    values: BTreeMap<String, ArgValue>,
}

impl InvocationArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for tests and the CLI.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<ArgValue>) {
        self.values.insert(field.into(), value.into());
    }

    /// Parse the `arguments` member of a tool call.
    ///
    /// `null` members are undefined and dropped. Anything that is not an object
    /// of scalars is a caller bug.
    pub fn from_json(operation: &str, raw: Option<Value>) -> Result<Self, DispatchError> {
        let object = match raw {
            None | Some(Value::Null) => return Ok(Self::default()),
            Some(Value::Object(object)) => object,
            Some(other) => {
                return Err(DispatchError::invalid_arguments(
                    operation,
                    format!("expected an object, got {}", json_kind(&other)),
                ))
            }
        };

        let mut values = BTreeMap::new();
        for (field, value) in object {
            let value = match value {
                Value::Null => continue,
                Value::String(s) => ArgValue::Text(s),
                Value::Number(n) => ArgValue::Number(n),
                Value::Bool(b) => ArgValue::Bool(b),
                other => {
                    return Err(DispatchError::invalid_arguments(
                        operation,
                        format!("field '{field}' must be a scalar, got {}", json_kind(&other)),
                    ))
                }
            };
            values.insert(field, value);
        }
        Ok(Self { values })
    }

    /// Parse `key=value` pairs as typed on a command line.
    ///
    /// Values stay text exactly as typed; declared field kinds decide the wire
    /// type later.
    pub fn parse_pairs<I, S>(operation: &str, pairs: I) -> Result<Self, DispatchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut args = Self::default();
        for pair in pairs {
            let pair = pair.as_ref();
            let Some((key, raw)) = pair.split_once('=') else {
                return Err(DispatchError::invalid_arguments(
                    operation,
                    format!("expected key=value, got '{pair}'"),
                ));
            };
            let key = key.trim();
            if key.is_empty() {
                return Err(DispatchError::invalid_arguments(
                    operation,
                    format!("missing key in '{pair}'"),
                ));
            }
            args.values
                .insert(key.to_string(), ArgValue::Text(raw.to_string()));
        }
        Ok(args)
    }

    pub fn get(&self, field: &str) -> Option<&ArgValue> {
        self.values.get(field)
    }

    /// A field is present when supplied and not blank.
    pub fn is_present(&self, field: &str) -> bool {
        self.get(field).is_some_and(|v| !v.is_blank())
    }

    /// Present value of `field`, if any.
    pub fn present(&self, field: &str) -> Option<&ArgValue> {
        self.get(field).filter(|v| !v.is_blank())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
