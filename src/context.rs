//! Variables available to templates.
//!
//! A [`Context`] is filled from a variables file and from `-C name:value`
//! tokens on the command line, then flattened with [`Context::mapping`] for
//! rendering. Later additions overwrite earlier ones.

use std::path::Path;

use indexmap::IndexMap;
use log::{debug, warn};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::ini::parse_ini;
use crate::options::smart_cast;

/// A single named value plus free-form attributes such as `environment`.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub value: Value,
    pub attributes: IndexMap<String, Value>,
}

impl Variable {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self { name: name.into(), value, attributes: IndexMap::new() }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// The environment this variable is restricted to, if any.
    pub fn environment(&self) -> Option<&str> {
        self.attribute("environment").and_then(Value::as_str)
    }
}

/// Insertion-ordered collection of variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    variables: IndexMap<String, Variable>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a variable, replacing any variable with the same name.
    pub fn add(&mut self, variable: Variable) -> &Variable {
        let name = variable.name.clone();
        self.variables.insert(name.clone(), variable);
        &self.variables[&name]
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.variables.values()
    }

    /// Flattened name to value view used for rendering.
    pub fn mapping(&self) -> serde_json::Map<String, Value> {
        self.variables
            .iter()
            .map(|(name, variable)| (name.clone(), variable.value.clone()))
            .collect()
    }

    /// Adds a variable from a `name:value` token. A bare `name` is `true`.
    pub fn add_token(&mut self, token: &str) -> &Variable {
        match token.split_once(':') {
            Some((name, value)) => self.add(Variable::new(name.trim(), smart_cast(value))),
            None => self.add(Variable::new(token.trim(), Value::Bool(true))),
        }
    }
}

/// Loads variables from an INI file.
///
/// Each section names a variable, optionally suffixed with `:environment`.
/// The `value` key holds the value; any other key becomes an attribute.
/// When `environment` is given, variables bound to another environment are
/// skipped and environment specific variables win over unbound ones.
///
/// # Errors
/// * `Error::ConfigError` if the file exists but cannot be parsed
pub fn load_variables<P: AsRef<Path>>(path: P, environment: Option<&str>) -> Result<Context> {
    let path = path.as_ref();
    let mut context = Context::new();
    if !path.exists() {
        warn!("Variables file does not exist: {}", path.display());
        return Ok(context);
    }

    debug!("Loading variables from {}", path.display());
    let content = std::fs::read_to_string(path)?;
    let sections = parse_ini(&content).map_err(|e| {
        Error::ConfigError(format!("failed to parse variables file {}: {}", path.display(), e))
    })?;

    let mut unbound = Vec::new();
    let mut bound = Vec::new();
    for (section, entries) in sections {
        let (name, bound_to) = match section.split_once(':') {
            Some((name, env)) => (name.trim().to_string(), Some(env.trim().to_string())),
            None => (section.clone(), None),
        };

        let mut variable = Variable::new(name, Value::Null);
        if let Some(env) = &bound_to {
            variable = variable.with_attribute("environment", Value::String(env.clone()));
        }
        for (key, value) in entries {
            let value = value.map(|v| smart_cast(&v)).unwrap_or(Value::Null);
            if key == "value" {
                variable.value = value;
            } else {
                variable = variable.with_attribute(key, value);
            }
        }

        match (&bound_to, environment) {
            (Some(env), Some(wanted)) if env == wanted => bound.push(variable),
            (Some(_), Some(_)) => continue,
            (Some(_), None) | (None, _) => unbound.push(variable),
        }
    }

    for variable in unbound.into_iter().chain(bound) {
        context.add(variable);
    }
    Ok(context)
}
