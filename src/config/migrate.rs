//! Configuration file upgrades: detect keys missing from an older file and
//! write them back with their default values, keeping what the user set.

use super::Config;
use crate::errors::{AppError, AppResult};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

/// Keys every current configuration file carries.
fn expected_keys() -> AppResult<Mapping> {
    match serde_yaml::to_value(Config::default())? {
        Value::Mapping(m) => Ok(m),
        _ => Err(AppError::Other("default configuration is not a mapping".into())),
    }
}

fn read_mapping(content: &str) -> AppResult<Mapping> {
    match serde_yaml::from_str::<Value>(content)? {
        Value::Mapping(m) => Ok(m),
        Value::Null => Ok(Mapping::new()),
        _ => Err(AppError::Config("configuration file is not a YAML mapping".into())),
    }
}

/// Names of the keys absent from `content`, in declaration order.
pub fn missing_keys(content: &str) -> AppResult<Vec<String>> {
    let current = read_mapping(content)?;
    let expected = expected_keys()?;

    Ok(expected
        .keys()
        .filter(|k| !current.contains_key(*k))
        .filter_map(|k| k.as_str().map(str::to_string))
        .collect())
}

/// Return `content` with every missing key filled in from the defaults.
/// Keys unknown to the current version are dropped.
pub fn fill_missing(content: &str) -> AppResult<(String, Vec<String>)> {
    let current = read_mapping(content)?;
    let expected = expected_keys()?;

    let mut added = Vec::new();
    let mut merged = Mapping::new();
    for (key, default) in expected {
        match current.get(&key) {
            Some(v) => {
                merged.insert(key, v.clone());
            }
            None => {
                if let Some(name) = key.as_str() {
                    added.push(name.to_string());
                }
                merged.insert(key, default);
            }
        }
    }

    let yaml = serde_yaml::to_string(&Value::Mapping(merged))?;

    // the result must still load
    Config::from_yaml(&yaml)?;

    Ok((yaml, added))
}

/// Check the file at `path`; returns the missing keys.
pub fn check_config_file(path: &Path) -> AppResult<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|e| {
        AppError::Config(format!("cannot read {}: {}", path.display(), e))
    })?;
    missing_keys(&content)
}

/// Rewrite the file at `path` with missing keys added; returns what was added.
pub fn migrate_config_file(path: &Path) -> AppResult<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|e| {
        AppError::Config(format!("cannot read {}: {}", path.display(), e))
    })?;

    let (yaml, added) = fill_missing(&content)?;
    if !added.is_empty() {
        fs::write(path, yaml)?;
    }
    Ok(added)
}
