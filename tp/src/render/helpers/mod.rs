//! Template helper library
//!
//! Helpers are plain functions over JSON values collected in a
//! [`HelperRegistry`]. The registry is handed to the renderer when it is
//! built, so the set of helpers a template can call is always explicit.

mod collections;
mod math;
mod network;
mod strings;

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::value::kind_name;

/// Signature shared by every helper
pub type HelperFn = fn(&[Value]) -> Result<Value, HelperError>;

/// Errors a helper can report about its arguments
#[derive(Debug, Error)]
pub enum HelperError {
    #[error("expected {expected} arguments, got {got}")]
    Arity { expected: String, got: usize },

    #[error("argument {index} must be {expected}, got {got}")]
    Type {
        index: usize,
        expected: &'static str,
        got: &'static str,
    },

    #[error("{0}")]
    Invalid(String),
}

/// Name to function table of helpers available to templates
#[derive(Debug, Clone, Default)]
pub struct HelperRegistry {
    helpers: BTreeMap<&'static str, HelperFn>,
}

impl HelperRegistry {
    /// Create a registry with no helpers
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the standard string, collection, arithmetic
    /// and network helpers
    pub fn standard() -> Self {
        debug!("HelperRegistry::standard: called");
        let mut registry = Self::new();
        strings::register(&mut registry);
        collections::register(&mut registry);
        math::register(&mut registry);
        network::register(&mut registry);
        registry
    }

    /// Add or replace a helper
    pub fn register(&mut self, name: &'static str, func: HelperFn) -> &mut Self {
        self.helpers.insert(name, func);
        self
    }

    pub fn get(&self, name: &str) -> Option<HelperFn> {
        self.helpers.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.helpers.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.helpers.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.helpers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.helpers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, HelperFn)> + '_ {
        self.helpers.iter().map(|(name, func)| (*name, *func))
    }
}

// Argument accessors shared by the helper modules

pub(crate) fn exact(args: &[Value], count: usize) -> Result<(), HelperError> {
    if args.len() == count {
        Ok(())
    } else {
        Err(HelperError::Arity {
            expected: count.to_string(),
            got: args.len(),
        })
    }
}

pub(crate) fn at_least(args: &[Value], count: usize) -> Result<(), HelperError> {
    if args.len() >= count {
        Ok(())
    } else {
        Err(HelperError::Arity {
            expected: format!("at least {count}"),
            got: args.len(),
        })
    }
}

fn type_error(args: &[Value], index: usize, expected: &'static str) -> HelperError {
    HelperError::Type {
        index,
        expected,
        got: kind_name(&args[index]),
    }
}

/// Text form of a scalar argument; null reads as the empty string
pub(crate) fn text(args: &[Value], index: usize) -> Result<String, HelperError> {
    match &args[index] {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        _ => Err(type_error(args, index, "a string")),
    }
}

/// Integer argument; numeric strings are accepted
pub(crate) fn int(args: &[Value], index: usize) -> Result<i64, HelperError> {
    match &args[index] {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .ok_or_else(|| type_error(args, index, "an integer")),
        Value::String(s) => s.trim().parse().map_err(|_| type_error(args, index, "an integer")),
        _ => Err(type_error(args, index, "an integer")),
    }
}

pub(crate) fn list(args: &[Value], index: usize) -> Result<&Vec<Value>, HelperError> {
    args[index].as_array().ok_or_else(|| type_error(args, index, "a sequence"))
}

pub(crate) fn map(args: &[Value], index: usize) -> Result<&serde_json::Map<String, Value>, HelperError> {
    args[index].as_object().ok_or_else(|| type_error(args, index, "a mapping"))
}

/// Go-template emptiness: null, false, zero, and empty strings or collections
pub(crate) fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}
