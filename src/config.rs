//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.creatorlens.toml` files. Scoring thresholds live here so they are
//! configuration, not magic numbers buried in the scoring code.

use crate::scoring::metrics::{
    DEFAULT_PIVOT_HEAVY_DEFUNCT_RATIO, DEFAULT_PIVOT_HEAVY_MIN_BUSINESSES,
    DEFAULT_RECENCY_DECAY_PER_YEAR, DEFAULT_RESILIENT_MIN_RESOLVED,
    DEFAULT_SERIAL_ENTREPRENEUR_MIN_BUSINESSES, DEFAULT_VALUES_DRIVEN_MIN_COEFFICIENT,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Model settings.
    #[serde(default)]
    pub model: ModelConfig,

    /// Scoring thresholds and weights.
    #[serde(default)]
    pub scoring: ScoringConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Path of the append-only analysis history log.
    #[serde(default = "default_history_file")]
    pub history_file: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            history_file: default_history_file(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "creator_report.md".to_string()
}

fn default_history_file() -> String {
    "creatorlens_history.jsonl".to_string()
}

/// LLM model settings for narrative synthesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Default model name.
    #[serde(default = "default_model")]
    pub name: String,

    /// Ollama API URL.
    #[serde(default = "default_ollama_url")]
    pub ollama_url: String,

    /// Temperature for generation.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout in seconds (the synthesis call is the only
    /// stage of the pipeline allowed to block).
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: default_model(),
            ollama_url: default_ollama_url(),
            temperature: default_temperature(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_model() -> String {
    "llama3.2:latest".to_string()
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_timeout() -> u64 {
    120
}

/// Scoring thresholds and decay constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Multiplicative weight decay per year since a business founded.
    #[serde(default = "default_recency_decay")]
    pub recency_decay_per_year: f64,

    /// Minimum business count for the `serial-entrepreneur` tag.
    #[serde(default = "default_serial_min")]
    pub serial_entrepreneur_min_businesses: usize,

    /// Minimum business count before `pivot-heavy` can apply.
    #[serde(default = "default_pivot_min")]
    pub pivot_heavy_min_businesses: usize,

    /// Defunct-to-total ratio that marks a profile `pivot-heavy`.
    #[serde(default = "default_pivot_ratio")]
    pub pivot_heavy_defunct_ratio: f64,

    /// Correlation coefficient floor for the `values-driven` tag.
    #[serde(default = "default_values_driven_min")]
    pub values_driven_min_coefficient: f64,

    /// Resolved-challenge count for the `resilient` tag.
    #[serde(default = "default_resilient_min")]
    pub resilient_min_resolved: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            recency_decay_per_year: default_recency_decay(),
            serial_entrepreneur_min_businesses: default_serial_min(),
            pivot_heavy_min_businesses: default_pivot_min(),
            pivot_heavy_defunct_ratio: default_pivot_ratio(),
            values_driven_min_coefficient: default_values_driven_min(),
            resilient_min_resolved: default_resilient_min(),
        }
    }
}

fn default_recency_decay() -> f64 {
    DEFAULT_RECENCY_DECAY_PER_YEAR
}

fn default_serial_min() -> usize {
    DEFAULT_SERIAL_ENTREPRENEUR_MIN_BUSINESSES
}

fn default_pivot_min() -> usize {
    DEFAULT_PIVOT_HEAVY_MIN_BUSINESSES
}

fn default_pivot_ratio() -> f64 {
    DEFAULT_PIVOT_HEAVY_DEFUNCT_RATIO
}

fn default_values_driven_min() -> f64 {
    DEFAULT_VALUES_DRIVEN_MIN_COEFFICIENT
}

fn default_resilient_min() -> usize {
    DEFAULT_RESILIENT_MIN_RESOLVED
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".creatorlens.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        // Model settings - always override since they have defaults in CLI
        self.model.name = args.model.clone();
        self.model.ollama_url = args.ollama_url.clone();
        self.model.temperature = args.temperature;

        // Timeout - only override if explicitly provided via CLI
        if let Some(timeout) = args.timeout {
            self.model.timeout_seconds = timeout;
        }

        // Paths - only override if provided
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }
        if let Some(ref history_file) = args.history_file {
            self.general.history_file = history_file.display().to_string();
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.model.name, "llama3.2:latest");
        assert_eq!(config.scoring.recency_decay_per_year, 0.9);
        assert_eq!(config.scoring.serial_entrepreneur_min_businesses, 3);
        assert_eq!(config.general.history_file, "creatorlens_history.jsonl");
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
output = "custom_report.md"
verbose = true

[model]
name = "qwen2.5:14b"
temperature = 0.3

[scoring]
recency_decay_per_year = 0.8
resilient_min_resolved = 1
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.output, "custom_report.md");
        assert!(config.general.verbose);
        assert_eq!(config.model.name, "qwen2.5:14b");
        assert_eq!(config.model.temperature, 0.3);
        assert_eq!(config.scoring.recency_decay_per_year, 0.8);
        assert_eq!(config.scoring.resilient_min_resolved, 1);
        // Unspecified thresholds fall back to the documented defaults.
        assert_eq!(config.scoring.pivot_heavy_defunct_ratio, 0.5);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[model]"));
        assert!(toml_str.contains("[scoring]"));
    }
}
