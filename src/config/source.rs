use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde_yaml::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileError(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),
    #[error("Config document root must be a mapping")]
    NotAMapping,
}

/// Key-value capability the parameter store reads from at startup.
///
/// A lookup never fails: a missing or malformed value yields the supplied
/// default, so a partially written configuration file still produces a
/// fully populated parameter set.
pub trait ConfigSource {
    fn get_bool(&self, key: &str, default: bool) -> bool;
    fn get_int(&self, key: &str, default: i32) -> i32;
    fn get_float(&self, key: &str, default: f32) -> f32;
}

/// Configuration backed by a YAML mapping of scalar values.
pub struct YamlConfigSource {
    root: Value,
}

impl YamlConfigSource {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        contents.parse()
    }
}

impl FromStr for YamlConfigSource {
    type Err = ConfigError;

    /// An empty document is a valid (all-defaults) configuration.
    fn from_str(contents: &str) -> Result<Self, Self::Err> {
        let root: Value = serde_yaml::from_str(contents)?;
        match root {
            Value::Mapping(_) | Value::Null => Ok(Self { root }),
            _ => Err(ConfigError::NotAMapping),
        }
    }
}

impl ConfigSource for YamlConfigSource {
    fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.root.get(key) {
            Some(Value::Bool(value)) => *value,
            Some(Value::String(value)) => value.parse().unwrap_or(default),
            _ => default,
        }
    }

    fn get_int(&self, key: &str, default: i32) -> i32 {
        self.root
            .get(key)
            .and_then(Value::as_i64)
            .and_then(|value| i32::try_from(value).ok())
            .unwrap_or(default)
    }

    fn get_float(&self, key: &str, default: f32) -> f32 {
        // Integer scalars are accepted where a float is asked for.
        self.root
            .get(key)
            .and_then(Value::as_f64)
            .map(|value| value as f32)
            .unwrap_or(default)
    }
}

/// A single scalar configuration value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigValue {
    Bool(bool),
    Int(i32),
    Float(f32),
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

impl From<i32> for ConfigValue {
    fn from(value: i32) -> Self {
        ConfigValue::Int(value)
    }
}

impl From<f32> for ConfigValue {
    fn from(value: f32) -> Self {
        ConfigValue::Float(value)
    }
}

/// In-memory configuration, for tests and for embedders that parsed their
/// configuration through some other channel.
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigSource {
    values: HashMap<String, ConfigValue>,
}

impl MemoryConfigSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) {
        self.values.insert(key.into(), value.into());
    }
}

impl ConfigSource for MemoryConfigSource {
    fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.values.get(key) {
            Some(ConfigValue::Bool(value)) => *value,
            _ => default,
        }
    }

    fn get_int(&self, key: &str, default: i32) -> i32 {
        match self.values.get(key) {
            Some(ConfigValue::Int(value)) => *value,
            _ => default,
        }
    }

    fn get_float(&self, key: &str, default: f32) -> f32 {
        match self.values.get(key) {
            Some(ConfigValue::Float(value)) => *value,
            Some(ConfigValue::Int(value)) => *value as f32,
            _ => default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_scalar_lookup() {
        let source = YamlConfigSource::from_str(
            "GPUEnabled: true\nCPUMaxThreads: 4\nPrimFriction: 0.5\n",
        )
        .unwrap();

        assert!(source.get_bool("GPUEnabled", false));
        assert_eq!(source.get_int("CPUMaxThreads", 1), 4);
        assert_eq!(source.get_float("PrimFriction", 0.2), 0.5);
    }

    #[test]
    fn test_yaml_missing_key_yields_default() {
        let source = YamlConfigSource::from_str("PrimFriction: 0.5\n").unwrap();

        assert_eq!(source.get_int("CPUMaxThreads", 1), 1);
        assert!(!source.get_bool("GPUEnabled", false));
    }

    #[test]
    fn test_yaml_malformed_value_yields_default() {
        let source = YamlConfigSource::from_str(
            "PrimFriction: not-a-number\nCPUMaxThreads: 2.5\n",
        )
        .unwrap();

        assert_eq!(source.get_float("PrimFriction", 0.2), 0.2);
        assert_eq!(source.get_int("CPUMaxThreads", 1), 1);
    }

    #[test]
    fn test_yaml_integer_accepted_as_float() {
        let source = YamlConfigSource::from_str("BuoyancyDensity: 1025\n").unwrap();

        assert_eq!(source.get_float("BuoyancyDensity", 1000.0), 1025.0);
    }

    #[test]
    fn test_yaml_empty_document() {
        let source = YamlConfigSource::from_str("").unwrap();

        assert_eq!(source.get_float("PrimFriction", 0.2), 0.2);
    }

    #[test]
    fn test_yaml_non_mapping_root_rejected() {
        assert!(matches!(
            YamlConfigSource::from_str("- 1\n- 2\n"),
            Err(ConfigError::NotAMapping)
        ));
    }

    #[test]
    fn test_memory_source_lookup() {
        let mut source = MemoryConfigSource::new();
        source.set("GPUEnabled", true);
        source.set("MaxUpdates", 4096);
        source.set("RunFactor", 1.5_f32);

        assert!(source.get_bool("GPUEnabled", false));
        assert_eq!(source.get_int("MaxUpdates", 8192), 4096);
        assert_eq!(source.get_float("RunFactor", 1.3), 1.5);
        // Integer values widen to float on request
        assert_eq!(source.get_float("MaxUpdates", 0.0), 4096.0);
    }
}
