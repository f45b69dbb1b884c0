//! Input fields: leaves holding a single value.

use serde::{Deserialize, Serialize};

use crate::Value;

/// The value type an input field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    /// Free text
    Text,
    /// Any number
    Number,
    /// Whole numbers only
    Integer,
    /// true / false
    Boolean,
}

impl InputType {
    /// Returns the type tag used in schemas
    pub fn name(&self) -> &'static str {
        match self {
            InputType::Text => "text",
            InputType::Number => "number",
            InputType::Integer => "integer",
            InputType::Boolean => "boolean",
        }
    }

    /// Returns true if `value` has the shape this input expects.
    ///
    /// Null is accepted by every input type.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => true,
            (InputType::Text, Value::Text(_)) => true,
            (InputType::Number, Value::Int(_) | Value::Float(_)) => true,
            (InputType::Integer, Value::Int(_)) => true,
            (InputType::Integer, Value::Float(f)) => f.fract() == 0.0,
            (InputType::Boolean, Value::Bool(_)) => true,
            _ => false,
        }
    }
}

/// State of an input field.
///
/// Values of any shape are stored as given; shape checks happen during
/// validation so a buffered value never blocks child creation.
#[derive(Debug, Clone, PartialEq)]
pub struct InputField {
    input_type: InputType,
    value: Option<Value>,
}

impl InputField {
    /// Creates an input with no value
    pub fn new(input_type: InputType) -> Self {
        Self {
            input_type,
            value: None,
        }
    }

    /// Builder method to set an initial value
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.set(value.into());
        self
    }

    /// The value type this input accepts
    pub fn input_type(&self) -> InputType {
        self.input_type
    }

    /// The current value, `None` when unset
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Stores a value; null clears the input
    pub(crate) fn set(&mut self, value: Value) {
        self.value = match value {
            Value::Null => None,
            value => Some(value),
        };
    }

    /// Returns true if the input is unset or blank
    pub fn is_empty(&self) -> bool {
        self.value.as_ref().is_none_or(Value::is_blank)
    }
}
