use std::path::Path;

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::Result;
use crate::ini::parse_ini;

/// A titled step as written in a steps file, before resolution.
///
/// The first key of `tokens` is the command name, its value the arguments;
/// the remaining keys are options.
pub type Entry = (String, IndexMap<String, Value>);

/// Syntax of a steps file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepsFormat {
    /// `[title]` sections; `.ini`
    Ini,
    /// A list of single-key maps; `.yml` or `.yaml`
    Yaml,
}

impl std::fmt::Display for StepsFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepsFormat::Ini => f.write_str("INI"),
            StepsFormat::Yaml => f.write_str("YAML"),
        }
    }
}

impl StepsFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_lowercase().as_str() {
            "ini" => Some(StepsFormat::Ini),
            "yml" | "yaml" => Some(StepsFormat::Yaml),
            _ => None,
        }
    }

    /// Parses steps file content into titled entries, in file order.
    ///
    /// # Errors
    /// * `Error::ConfigError` if INI content is malformed
    /// * `Error::YamlError` if YAML content is malformed
    pub fn parse(&self, content: &str) -> Result<Vec<Entry>> {
        match self {
            StepsFormat::Ini => Ok(parse_ini(content)?
                .into_iter()
                .map(|(title, section)| {
                    let tokens = section
                        .into_iter()
                        .map(|(key, value)| (key, value.map(Value::String).unwrap_or(Value::Null)))
                        .collect();
                    (title, tokens)
                })
                .collect()),
            StepsFormat::Yaml => {
                let documents: Option<Vec<IndexMap<String, IndexMap<String, Value>>>> =
                    serde_yaml::from_str(content)?;
                Ok(documents.unwrap_or_default().into_iter().flatten().collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_steps_format_display() {
        assert_eq!(format!("{}", StepsFormat::Ini), "INI");
        assert_eq!(format!("{}", StepsFormat::Yaml), "YAML");
    }

    #[test]
    fn test_from_path() {
        assert_eq!(StepsFormat::from_path(Path::new("steps.ini")), Some(StepsFormat::Ini));
        assert_eq!(StepsFormat::from_path(Path::new("deploy.YML")), Some(StepsFormat::Yaml));
        assert_eq!(StepsFormat::from_path(Path::new("steps.txt")), None);
    }

    #[test]
    fn test_parse_yaml_keeps_types() {
        let content = "- create the app directory:\n    dir: /opt/app\n    mode: 755\n    items: [a, b]\n";
        let entries = StepsFormat::Yaml.parse(content).unwrap();
        assert_eq!(entries[0].0, "create the app directory");
        assert_eq!(entries[0].1["mode"], json!(755));
        assert_eq!(entries[0].1["items"], json!(["a", "b"]));
    }
}
