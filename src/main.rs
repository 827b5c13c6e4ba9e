//! CreatorLens - LLM-assisted YouTube creator profiler
//!
//! A CLI tool that validates a structured creator profile, computes
//! derived analytics (business health, value-impact correlation,
//! pattern tags, career timeline), synthesizes a narrative via Ollama,
//! and writes Markdown/JSON reports backed by an append-only history.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (validation, connection, config, I/O)

mod cli;
mod config;
mod history;
mod models;
mod profile;
mod report;
mod scoring;
mod synthesis;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::Config;
use history::HistoryStore;
use models::{Metrics, NarrativeSections};
use std::path::Path;
use synthesis::{OllamaGenerator, SynthesisError};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("CreatorLens v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    // Run the analysis
    match run_analysis(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Analysis failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .creatorlens.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(".creatorlens.toml");

    if path.exists() {
        eprintln!("⚠️  .creatorlens.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .creatorlens.toml")?;

    println!("✅ Created .creatorlens.toml with default settings.");
    println!("   Edit it to customize the model, scoring thresholds, and paths.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete analysis workflow. Returns exit code.
async fn run_analysis(args: Args) -> Result<i32> {
    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let input_path = args.input.clone().expect("validated by Args::validate");
    let analysis_date = Utc::now().date_naive();

    // Step 1: Read and validate the profile
    println!("📥 Reading profile: {}", input_path.display());
    let raw_content = std::fs::read_to_string(&input_path)
        .with_context(|| format!("Failed to read profile file: {}", input_path.display()))?;
    let raw: profile::RawProfile = serde_json::from_str(&raw_content)
        .with_context(|| format!("Failed to parse profile JSON: {}", input_path.display()))?;

    let creator = match profile::validate(raw, analysis_date) {
        Ok(creator) => creator,
        Err(e) => {
            eprintln!("\n❌ Profile validation failed:\n{}", e.describe());
            return Ok(1);
        }
    };
    info!("Validated profile for {}", creator.identity_key());

    // Step 2: Compute derived metrics (in-process, never blocks)
    println!("🔬 Computing metrics...");
    let metrics = scoring::score(&creator, &config.scoring, analysis_date);
    print_metrics(&metrics);

    // Step 3: Narrative synthesis (the only external, timeout-bound call)
    let narrative = if args.offline {
        println!("\n📴 Offline mode: skipping narrative synthesis.");
        synthesis::offline_sections(&creator, &metrics)
    } else {
        println!("\n🤖 Synthesizing narrative...");
        println!("   Model: {}", config.model.name);
        println!("   Ollama: {}", config.model.ollama_url);
        println!("   Timeout: {}s", config.model.timeout_seconds);

        let generator = OllamaGenerator::new(&config.model);
        match synthesis::synthesize(&generator, &creator, &metrics).await {
            Ok(sections) => sections,
            Err(SynthesisError::MalformedResponse { raw }) => {
                warn!("synthesis response was unmappable; preserving raw text");
                println!("   ⚠️  Response could not be mapped into sections; kept as uncategorized.");
                NarrativeSections::from_raw(raw)
            }
            Err(e) => {
                // Metrics were computed; surface them before failing retryably.
                eprintln!("\n⚠️  Narrative synthesis failed, but metrics were computed:");
                eprintln!("   Business health: {:.1}/100", metrics.business_health);
                eprintln!("   Value impact: {}", metrics.value_impact);
                return Err(e).context("Narrative synthesis failed (retry may succeed)");
            }
        }
    };

    // Step 4: Assemble the immutable analysis result
    let result = report::assemble(creator, metrics, narrative)?;

    // Step 5: Record to the append-only history
    let history_path = config.general.history_file.clone();
    let store = HistoryStore::open(Path::new(&history_path))
        .with_context(|| format!("Failed to open history store: {}", history_path))?;
    let entry = store
        .record(result.clone())
        .context("Failed to record analysis in history")?;
    info!("Recorded analysis #{} for {}", entry.sequence, entry.identity);

    // Step 6: Generate and save the report
    println!("\n📝 Generating report...");
    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&result)?,
        OutputFormat::Markdown => report::generate_markdown_report(&result),
    };

    std::fs::write(&config.general.output, &output)
        .with_context(|| format!("Failed to write report to {}", config.general.output))?;

    println!(
        "\n✅ Analysis complete! Report saved to: {}",
        config.general.output
    );

    // Optional: compare against retained analyses for this creator
    if let Some(n) = args.compare {
        print_comparison(&store, &entry.identity, n);
    }

    Ok(0)
}

/// Print the computed metric summary.
fn print_metrics(metrics: &Metrics) {
    println!("\n📊 Metrics:");
    println!("   Business health: {:.1}/100", metrics.business_health);
    println!("   Value impact: {}", metrics.value_impact);

    if metrics.pattern_tags.is_empty() {
        println!("   Pattern tags: none");
    } else {
        let tags: Vec<String> = metrics.pattern_tags.iter().map(|t| t.to_string()).collect();
        println!("   Pattern tags: {}", tags.join(", "));
    }
    println!("   Timeline events: {}", metrics.timeline.len());
}

/// Print the last `n` retained analyses for an identity.
fn print_comparison(store: &HistoryStore, identity: &str, n: usize) {
    let recent = store.compare(identity, n);
    if recent.is_empty() {
        println!("\n📂 No prior analyses recorded for {}", identity);
        return;
    }

    println!("\n📂 Last {} analyses for {} (most recent first):", recent.len(), identity);
    for entry in &recent {
        println!(
            "   #{} {} — health {:.1}/100, value impact {}",
            entry.sequence,
            entry.recorded_at.format("%Y-%m-%d %H:%M"),
            entry.result.metrics.business_health,
            entry.result.metrics.value_impact
        );
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .creatorlens.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
