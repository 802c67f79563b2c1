//! Command options shared by snippets, templates and programmatic commands.
//!
//! A step in a steps file carries a bag of keyword options. The common ones
//! (`comment`, `cd`, `sudo`, ...) are lifted into typed fields of [`Options`];
//! everything else stays in an ordered `extra` map so templates and builders
//! can still reach it through [`Options::get`].

use std::fmt;

use indexmap::IndexMap;
use serde_json::Value;

/// Privilege elevation for a single command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sudo {
    pub enabled: bool,
    pub user: String,
}

impl Sudo {
    pub fn new(enabled: bool, user: impl Into<String>) -> Self {
        Self { enabled, user: user.into() }
    }

    /// Normalizes a loosely typed `sudo` option.
    ///
    /// `true` enables sudo as root, a non-empty string enables sudo as that
    /// user, anything else leaves it disabled.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Bool(true)) => Self::from(true),
            Some(Value::String(user)) if !user.is_empty() => Self::from(user.as_str()),
            _ => Self::default(),
        }
    }
}

impl Default for Sudo {
    fn default() -> Self {
        Self::new(false, "root")
    }
}

impl From<bool> for Sudo {
    fn from(enabled: bool) -> Self {
        Self::new(enabled, "root")
    }
}

impl From<&str> for Sudo {
    fn from(user: &str) -> Self {
        Self::new(true, user)
    }
}

impl fmt::Display for Sudo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.enabled {
            write!(f, "sudo -u {}", self.user)
        } else {
            Ok(())
        }
    }
}

/// Typed view of a step's keyword options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    pub comment: Option<String>,
    pub cd: Option<String>,
    pub condition: Option<String>,
    pub prefix: Option<String>,
    pub register: Option<String>,
    pub stop: bool,
    pub sudo: Sudo,
    pub tags: Vec<String>,
    pub environments: Vec<String>,
    pub items: Option<Vec<String>>,
    /// Name of the shell function the step belongs to.
    pub function: Option<String>,
    pub extra: IndexMap<String, Value>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds options from a raw key/value map, normalizing keys and values
    /// with [`normalize`] first.
    pub fn from_map<I>(map: I) -> Self
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let mut options = Self::default();
        for (key, value) in map {
            let (key, value) = normalize(&key, value);
            options.set(&key, value);
        }
        options
    }

    /// Stores a value, routing common option names to their typed field.
    pub fn set(&mut self, key: &str, value: Value) {
        match key {
            "comment" => self.comment = optional_string(&value),
            "cd" => self.cd = optional_string(&value),
            "condition" => self.condition = optional_string(&value),
            "prefix" => self.prefix = optional_string(&value),
            "register" => self.register = optional_string(&value),
            "stop" => self.stop = is_truthy(&value),
            "sudo" => self.sudo = Sudo::from_value(Some(&value)),
            "tags" => self.tags = string_list(&value),
            "environments" => self.environments = string_list(&value),
            "items" => self.items = Some(string_list(&value)),
            "function" => self.function = optional_string(&value),
            _ => {
                self.extra.insert(key.to_string(), value);
            }
        }
    }

    /// Sets a value only when the key has no value yet.
    pub fn set_default(&mut self, key: &str, value: Value) {
        if !self.contains(key) {
            self.set(key, value);
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Looks up any option by name. Unset typed fields read as `None`.
    pub fn get(&self, key: &str) -> Option<Value> {
        let string = |s: &Option<String>| s.clone().map(Value::String);
        match key {
            "comment" => string(&self.comment),
            "cd" => string(&self.cd),
            "condition" => string(&self.condition),
            "prefix" => string(&self.prefix),
            "register" => string(&self.register),
            "stop" => self.stop.then_some(Value::Bool(true)),
            "sudo" => self.sudo.enabled.then(|| Value::String(self.sudo.user.clone())),
            "tags" => (!self.tags.is_empty()).then(|| string_array(&self.tags)),
            "environments" => {
                (!self.environments.is_empty()).then(|| string_array(&self.environments))
            }
            "items" => self.items.as_ref().map(|items| string_array(items)),
            "function" => string(&self.function),
            _ => self.extra.get(key).cloned(),
        }
    }

    pub fn get_or(&self, key: &str, default: Value) -> Value {
        self.get(key).unwrap_or(default)
    }

    /// String form of an option, if it is set and not null.
    pub fn get_str(&self, key: &str) -> Option<String> {
        self.get(key).as_ref().and_then(optional_string)
    }

    /// Truthiness of an option the way shell templates see it.
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get(key).map(|v| is_truthy(&v)).unwrap_or(default)
    }

    /// Removes an option and returns its previous value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let previous = self.get(key);
        match key {
            "comment" => self.comment = None,
            "cd" => self.cd = None,
            "condition" => self.condition = None,
            "prefix" => self.prefix = None,
            "register" => self.register = None,
            "stop" => self.stop = false,
            "sudo" => self.sudo = Sudo::default(),
            "tags" => self.tags.clear(),
            "environments" => self.environments.clear(),
            "items" => self.items = None,
            "function" => self.function = None,
            _ => {
                self.extra.shift_remove(key);
            }
        }
        previous
    }

    /// Options exposed to templates.
    ///
    /// `sudo`, `tags` and `environments` are consumed by statement assembly
    /// and filtering, so they are left out.
    pub fn to_context(&self) -> serde_json::Map<String, Value> {
        let mut context = serde_json::Map::new();
        for key in ["comment", "cd", "condition", "prefix", "register", "stop", "items", "function"]
        {
            if let Some(value) = self.get(key) {
                context.insert(key.to_string(), value);
            }
        }
        for (key, value) in &self.extra {
            context.insert(key.clone(), value.clone());
        }
        context
    }
}

/// Normalizes a key/value pair read from a steps file.
///
/// - `environments`, `environs`, `envs` and `env` become `environments`, a list
/// - `func` and `function` become `function`
/// - `groups`, `items` and `tags` become lists; strings are split on commas
/// - every other string value is smart cast
pub fn normalize(key: &str, value: Value) -> (String, Value) {
    match key {
        "environments" | "environs" | "envs" | "env" => {
            ("environments".to_string(), csv_list(value))
        }
        "func" | "function" => ("function".to_string(), value),
        "groups" | "items" | "tags" => (key.to_string(), csv_list(value)),
        _ => {
            let value = match value {
                Value::String(s) => smart_cast(&s),
                other => other,
            };
            (key.to_string(), value)
        }
    }
}

/// Converts a string into the most specific JSON value it represents.
///
/// Numbers with a leading zero (file modes such as `0755`) stay strings so
/// the zero survives rendering.
pub fn smart_cast(value: &str) -> Value {
    let trimmed = value.trim();
    match trimmed.to_lowercase().as_str() {
        "true" | "yes" | "on" => return Value::Bool(true),
        "false" | "no" | "off" => return Value::Bool(false),
        _ => {}
    }

    let leading_zero = trimmed.len() > 1 && trimmed.starts_with('0') && !trimmed.starts_with("0.");
    if !leading_zero {
        if let Ok(i) = trimmed.parse::<i64>() {
            return Value::from(i);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            if f.is_finite() {
                return Value::from(f);
            }
        }
    }

    Value::String(value.to_string())
}

/// Splits a comma separated string into trimmed, non-empty parts.
pub fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(String::from)
        .collect()
}

/// Stringifies a value without JSON quoting.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn optional_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        other => Some(stringify(other)),
    }
}

fn csv_list(value: Value) -> Value {
    match value {
        Value::String(s) => string_array(&split_csv(&s)),
        Value::Array(_) => value,
        Value::Null => Value::Array(Vec::new()),
        other => Value::Array(vec![Value::String(stringify(&other))]),
    }
}

fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(values) => values.iter().map(stringify).collect(),
        Value::String(s) => split_csv(s),
        Value::Null => Vec::new(),
        other => vec![stringify(other)],
    }
}

fn string_array(values: &[String]) -> Value {
    Value::Array(values.iter().cloned().map(Value::String).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_aliases() {
        assert_eq!(normalize("env", json!("dev, live")), ("environments".into(), json!(["dev", "live"])));
        assert_eq!(normalize("func", json!("setup")), ("function".into(), json!("setup")));
        assert_eq!(normalize("mode", json!("755")), ("mode".into(), json!(755)));
    }

    #[test]
    fn test_smart_cast_keeps_leading_zero() {
        assert_eq!(smart_cast("0755"), json!("0755"));
        assert_eq!(smart_cast("0"), json!(0));
        assert_eq!(smart_cast("0.5"), json!(0.5));
        assert_eq!(smart_cast("yes"), json!(true));
        assert_eq!(smart_cast("deploy"), json!("deploy"));
    }

    #[test]
    fn test_sudo_display() {
        assert_eq!(Sudo::from(true).to_string(), "sudo -u root");
        assert_eq!(Sudo::from("deploy").to_string(), "sudo -u deploy");
        assert_eq!(Sudo::from(false).to_string(), "");
    }
}
