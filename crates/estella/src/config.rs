//! Configuration management for Estella
//!
//! Handles loading, validating, and saving the follow-up suggestion settings.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::selector::{DEFAULT_SUGGESTIONS, DEFAULT_WINDOW};
use crate::topics::DEFAULT_HISTORY_WINDOW;
use crate::{EstellaError, Result};

const CONFIG_PATHS: [&str; 3] = [".estella.json", "estella.json", ".estella/config.json"];

/// Which rule group answers first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
  /// Property-specific rules ranked deterministically, sampling only when they yield nothing
  #[default]
  PropertyFirst,
  /// Always sample from the conversation pool
  Sampled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionConfig {
  /// Number of follow-ups returned per reply
  #[serde(default = "default_max_suggestions")]
  pub max_suggestions: usize,
  /// Top-ranked candidates the sampler draws from
  #[serde(default = "default_sample_window")]
  pub sample_window: usize,
  /// Trailing turns scanned for conversation tags
  #[serde(default = "default_history_window")]
  pub history_window: usize,
  #[serde(default)]
  pub strategy: Strategy,
  /// Fixed seed for reproducible sampling
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub seed: Option<u64>,
}

fn default_max_suggestions() -> usize {
  DEFAULT_SUGGESTIONS
}
fn default_sample_window() -> usize {
  DEFAULT_WINDOW
}
fn default_history_window() -> usize {
  DEFAULT_HISTORY_WINDOW
}

impl Default for SuggestionConfig {
  fn default() -> Self {
    Self {
      max_suggestions: default_max_suggestions(),
      sample_window: default_sample_window(),
      history_window: default_history_window(),
      strategy: Strategy::default(),
      seed: None,
    }
  }
}

impl SuggestionConfig {
  /// Load configuration from a file
  pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
    let content = std::fs::read_to_string(path)?;
    let config: SuggestionConfig = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
  }

  /// Load configuration from current directory or defaults
  pub fn load() -> Result<Self> {
    for path in &CONFIG_PATHS {
      if Path::new(path).exists() {
        return Self::load_from_file(path);
      }
    }

    Ok(SuggestionConfig::default())
  }

  /// Save configuration to a file
  pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
    let content = serde_json::to_string_pretty(self)?;
    std::fs::write(path, content)?;
    Ok(())
  }

  pub fn validate(&self) -> Result<()> {
    if self.max_suggestions == 0 {
      return Err(EstellaError::invalid_config("max_suggestions must be at least 1"));
    }
    if self.sample_window == 0 {
      return Err(EstellaError::invalid_config("sample_window must be at least 1"));
    }
    if self.history_window == 0 {
      return Err(EstellaError::invalid_config("history_window must be at least 1"));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use tempfile::TempDir;

  #[test]
  fn test_config_default() {
    let config = SuggestionConfig::default();
    assert_eq!(config.max_suggestions, 3);
    assert_eq!(config.sample_window, 7);
    assert_eq!(config.history_window, 4);
    assert_eq!(config.strategy, Strategy::PropertyFirst);
    assert!(config.seed.is_none());
  }

  #[test]
  fn test_config_load_nonexistent_file() {
    let result = SuggestionConfig::load_from_file(Path::new("nonexistent.json"));
    assert!(result.is_err());
  }

  #[test]
  fn test_config_load_valid_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("estella.json");

    let config_content = r#"{
            "max_suggestions": 4,
            "sample_window": 10,
            "history_window": 6,
            "strategy": "sampled",
            "seed": 99
        }"#;

    fs::write(&config_path, config_content).unwrap();

    let config = SuggestionConfig::load_from_file(&config_path).unwrap();
    assert_eq!(config.max_suggestions, 4);
    assert_eq!(config.sample_window, 10);
    assert_eq!(config.history_window, 6);
    assert_eq!(config.strategy, Strategy::Sampled);
    assert_eq!(config.seed, Some(99));
  }

  #[test]
  fn test_config_load_partial_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("partial.json");

    fs::write(&config_path, r#"{ "sample_window": 5 }"#).unwrap();

    let config = SuggestionConfig::load_from_file(&config_path).unwrap();
    assert_eq!(config.sample_window, 5);
    // Other fields should have defaults
    assert_eq!(config.max_suggestions, 3);
    assert_eq!(config.strategy, Strategy::PropertyFirst);
  }

  #[test]
  fn test_config_load_invalid_json() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("invalid.json");

    fs::write(&config_path, "{ invalid json }").unwrap();

    let result = SuggestionConfig::load_from_file(&config_path);
    assert!(matches!(result, Err(EstellaError::Json(_))));
  }

  #[test]
  fn test_config_rejects_zero_values() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("zero.json");

    fs::write(&config_path, r#"{ "max_suggestions": 0 }"#).unwrap();

    let result = SuggestionConfig::load_from_file(&config_path);
    assert!(matches!(result, Err(EstellaError::InvalidConfig { .. })));

    let config = SuggestionConfig { history_window: 0, ..SuggestionConfig::default() };
    assert!(config.validate().is_err());
  }

  #[test]
  fn test_config_load_and_save() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("test_config.json");

    let original_config = SuggestionConfig {
      max_suggestions: 2,
      sample_window: 5,
      history_window: 8,
      strategy: Strategy::Sampled,
      seed: Some(7),
    };

    original_config.save_to_file(&config_path).unwrap();
    let loaded_config = SuggestionConfig::load_from_file(&config_path).unwrap();

    assert_eq!(original_config, loaded_config);
  }
}
