//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// CreatorLens - LLM-assisted analytical profiler for YouTube creators
///
/// Reads a structured creator profile (JSON), computes derived metrics
/// (business health, value-impact correlation, pattern tags, career
/// timeline), synthesizes a narrative via a local AI model, and writes
/// a Markdown or JSON report. Every analysis is retained in an
/// append-only history for comparison.
///
/// Examples:
///   creatorlens --input creator.json
///   creatorlens --input creator.json --model llama3.2:latest --format json
///   creatorlens --input creator.json --offline --compare 3
///   creatorlens --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to the creator profile JSON file
    ///
    /// Raw field maps as supplied by the input collaborator; validated
    /// before any analysis runs. Not required with --init-config.
    #[arg(short, long, value_name = "FILE", required_unless_present = "init_config")]
    pub input: Option<PathBuf>,

    /// Output file path for the report
    ///
    /// Defaults to the config file setting (creator_report.md).
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Ollama model to use for narrative synthesis
    ///
    /// Can also be set via CREATORLENS_MODEL env var or .creatorlens.toml.
    #[arg(short, long, default_value = "llama3.2:latest", env = "CREATORLENS_MODEL")]
    pub model: String,

    /// Ollama API endpoint URL
    #[arg(long, default_value = "http://localhost:11434", env = "OLLAMA_URL")]
    pub ollama_url: String,

    /// Temperature for model responses (0.0 - 1.0)
    ///
    /// Lower values produce more consistent/deterministic output
    #[arg(long, default_value = "0.2")]
    pub temperature: f32,

    /// Synthesis timeout in seconds
    ///
    /// Budget for the single external model call; the rest of the
    /// pipeline is computed in-process. Default: from config or 120s.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Path of the append-only analysis history log
    #[arg(long, value_name = "FILE")]
    pub history_file: Option<PathBuf>,

    /// Print the last N retained analyses for this creator after the run
    #[arg(long, value_name = "N")]
    pub compare: Option<usize>,

    /// Skip the model call and emit a deterministic metric summary
    ///
    /// Validation, scoring, report assembly, and history recording
    /// still run.
    #[arg(long)]
    pub offline: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .creatorlens.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .creatorlens.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Validate the input profile path
        match self.input {
            Some(ref input) => {
                if !input.exists() {
                    return Err(format!("Input file does not exist: {}", input.display()));
                }
                if !input.is_file() {
                    return Err(format!("Input path is not a file: {}", input.display()));
                }
            }
            None => return Err("An input profile file is required".to_string()),
        }

        // Validate Ollama URL format (not needed for offline runs)
        if !self.offline
            && !self.ollama_url.starts_with("http://")
            && !self.ollama_url.starts_with("https://")
        {
            return Err("Ollama URL must start with 'http://' or 'https://'".to_string());
        }

        // Validate temperature range
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err("Temperature must be between 0.0 and 1.0".to_string());
        }

        // Validate timeout if provided
        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        // Validate comparison depth if provided
        if let Some(n) = self.compare {
            if n == 0 {
                return Err("Comparison depth must be at least 1".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
