//! Typed parameter map used at the string-driven construction boundary.
//!
//! Orientation generators and helical symmetry accept a handful of optional,
//! named parameters. [`Params`] carries them as a small string-keyed map of
//! [`ParamValue`]s with typed, defaulted getters. Internal code never touches
//! this map; it is converted into validated per-variant configuration at
//! parse time.
//!
//! ```
//! use cryoem_core::params::{ParamValue, Params};
//!
//! let mut params = Params::new();
//! params.set("delta", 7.5);
//! params.set("inc_mirror", true);
//!
//! assert_eq!(params.get_float_or("delta", 0.0).unwrap(), 7.5);
//! assert!(params.get_bool_or("inc_mirror", false).unwrap());
//! // Missing keys fall back to the default:
//! assert_eq!(params.get_int_or("n", 0).unwrap(), 0);
//! ```

use std::collections::HashMap;

use crate::errors::{GeomError, GeomResult};

/// A single parameter value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl ParamValue {
    /// Returns the variant name, used in type-mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
        }
    }

    fn expect_bool(&self, key: &str) -> GeomResult<bool> {
        match self {
            Self::Bool(v) => Ok(*v),
            other => Err(type_mismatch(key, "bool", other)),
        }
    }

    fn expect_int(&self, key: &str) -> GeomResult<i64> {
        match self {
            Self::Int(v) => Ok(*v),
            other => Err(type_mismatch(key, "int", other)),
        }
    }

    fn expect_float(&self, key: &str) -> GeomResult<f64> {
        match self {
            Self::Float(v) => Ok(*v),
            // An integer where a float is expected is harmless.
            Self::Int(v) => Ok(*v as f64),
            other => Err(type_mismatch(key, "float", other)),
        }
    }

    fn expect_str(&self, key: &str) -> GeomResult<&str> {
        match self {
            Self::Str(v) => Ok(v),
            other => Err(type_mismatch(key, "string", other)),
        }
    }
}

fn type_mismatch(key: &str, expected: &str, found: &ParamValue) -> GeomError {
    GeomError::invalid_parameter(
        key,
        format!("expected {}, found {}", expected, found.kind()),
    )
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

/// A string-keyed map of [`ParamValue`]s with typed, defaulted getters.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Params {
    entries: HashMap<String, ParamValue>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a parameter.
    pub fn set(&mut self, key: &str, value: impl Into<ParamValue>) -> &mut Self {
        self.entries.insert(key.to_string(), value.into());
        self
    }

    /// Returns `true` if the key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the raw value, if present.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.get(key)
    }

    /// Returns the boolean under `key`, or `default` if absent.
    pub fn get_bool_or(&self, key: &str, default: bool) -> GeomResult<bool> {
        match self.entries.get(key) {
            Some(v) => v.expect_bool(key),
            None => Ok(default),
        }
    }

    /// Returns the integer under `key`, or `default` if absent.
    pub fn get_int_or(&self, key: &str, default: i64) -> GeomResult<i64> {
        match self.entries.get(key) {
            Some(v) => v.expect_int(key),
            None => Ok(default),
        }
    }

    /// Returns the float under `key`, or `default` if absent.
    ///
    /// Integer values coerce to float.
    pub fn get_float_or(&self, key: &str, default: f64) -> GeomResult<f64> {
        match self.entries.get(key) {
            Some(v) => v.expect_float(key),
            None => Ok(default),
        }
    }

    /// Returns the string under `key`, or `default` if absent.
    pub fn get_str_or<'a>(&'a self, key: &str, default: &'a str) -> GeomResult<&'a str> {
        match self.entries.get(key) {
            Some(v) => v.expect_str(key),
            None => Ok(default),
        }
    }
}
