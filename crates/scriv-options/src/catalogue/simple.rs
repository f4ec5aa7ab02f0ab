#![forbid(unsafe_code)]

//! Generic descriptors for scalar options.
//!
//! Most of the catalogue is a flat scalar with a default and a range; these
//! four descriptor shapes cover all of them.

use serde_json::Value;

use crate::id::OptId;
use crate::registry::OptionDescriptor;
use crate::validation::{boolean_or, clamped_float, clamped_int, string_or, string_set};
use crate::value::OptionValue;

pub(crate) struct BoolOption {
    pub id: OptId,
    pub name: &'static str,
    pub default: bool,
}

impl OptionDescriptor for BoolOption {
    fn id(&self) -> OptId {
        self.id
    }
    fn name(&self) -> Option<&'static str> {
        Some(self.name)
    }
    fn validate(&self, input: Option<&Value>) -> OptionValue {
        OptionValue::Bool(boolean_or(input, self.default))
    }
}

pub(crate) struct IntOption {
    pub id: OptId,
    pub name: &'static str,
    pub default: i64,
    pub minimum: i64,
    pub maximum: i64,
}

impl OptionDescriptor for IntOption {
    fn id(&self) -> OptId {
        self.id
    }
    fn name(&self) -> Option<&'static str> {
        Some(self.name)
    }
    fn validate(&self, input: Option<&Value>) -> OptionValue {
        OptionValue::Int(clamped_int(input, self.default, self.minimum, self.maximum))
    }
}

pub(crate) struct FloatOption {
    pub id: OptId,
    pub name: &'static str,
    pub default: f64,
    pub minimum: f64,
    pub maximum: f64,
}

impl OptionDescriptor for FloatOption {
    fn id(&self) -> OptId {
        self.id
    }
    fn name(&self) -> Option<&'static str> {
        Some(self.name)
    }
    fn validate(&self, input: Option<&Value>) -> OptionValue {
        OptionValue::Float(clamped_float(
            input,
            self.default,
            self.minimum,
            self.maximum,
        ))
    }
}

pub(crate) struct StringOption {
    pub id: OptId,
    pub name: &'static str,
    pub default: &'static str,
}

impl OptionDescriptor for StringOption {
    fn id(&self) -> OptId {
        self.id
    }
    fn name(&self) -> Option<&'static str> {
        Some(self.name)
    }
    fn validate(&self, input: Option<&Value>) -> OptionValue {
        OptionValue::Str(string_or(input, self.default))
    }
}

pub(crate) struct StringSetOption {
    pub id: OptId,
    pub name: &'static str,
    pub default: &'static str,
    pub allowed: &'static [&'static str],
}

impl OptionDescriptor for StringSetOption {
    fn id(&self) -> OptId {
        self.id
    }
    fn name(&self) -> Option<&'static str> {
        Some(self.name)
    }
    fn validate(&self, input: Option<&Value>) -> OptionValue {
        OptionValue::Str(string_set(input, self.default, self.allowed, &[]))
    }
}
