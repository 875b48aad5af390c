//! Decide - daily decision helper
//!
//! CLI entry point for one-shot decisions and the interactive session.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use eyre::{Context, Result};
use tracing::info;

use decide::cli::{Cli, Command, OutputFormat, get_log_path};
use decide::config::Config;
use decide::domain::{CategoryId, CategoryRegistry, Mood};
use decide::repl;
use decide::service::create_service;
use decide::session::{DecisionOutcome, SessionController};

fn setup_logging(verbose: bool) -> Result<()> {
    let log_path = get_log_path();
    let log_dir = log_path.parent().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Write to the log file, not stdout/stderr
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!(
        "Decide loaded config: provider={}, model={}",
        config.llm.provider, config.llm.model
    );

    match cli.command {
        Some(Command::Decide {
            category,
            mood,
            options,
            format,
        }) => cmd_decide(&config, category, mood, &options, format).await,
        Some(Command::Categories { format }) => cmd_categories(format),
        Some(Command::Repl) | None => repl::run_interactive(&config).await,
    }
}

/// Make a single decision and print it
async fn cmd_decide(
    config: &Config,
    category: CategoryId,
    mood: Option<Mood>,
    options: &[String],
    format: OutputFormat,
) -> Result<()> {
    if !options.is_empty() && !category.is_editable() {
        return Err(eyre::eyre!(
            "--option only applies to the custom category, not {}",
            category
        ));
    }

    config.validate()?;
    let service = create_service(config)?;

    let mut controller = SessionController::new();
    if let Some(mood) = mood {
        controller.toggle_mood(mood);
    }
    for option in options {
        controller.add_custom_option(option);
    }

    let definition = CategoryRegistry::new().get(category);
    let result = controller.request_decision(category, service.as_ref()).await;

    match (result, format) {
        (Ok(DecisionOutcome::Decided(decision)), OutputFormat::Json) => {
            let output = serde_json::json!({
                "category": category,
                "label": definition.label,
                "icon": definition.icon,
                "mood": mood,
                "choice": decision.choice,
                "reasoning": decision.reasoning,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        (Ok(DecisionOutcome::Decided(decision)), OutputFormat::Text) => {
            println!("{} {}: {}", definition.icon, definition.label, decision.choice);
            if let Some(reasoning) = decision.reasoning {
                println!("  {}", reasoning);
            }
        }
        // Nothing else can touch a one-shot controller
        (Ok(DecisionOutcome::Stale), _) => {}
        (Err(e), format) => {
            info!(%category, error = %e, "One-shot decision failed");
            let message = e.user_message().map(str::to_string).unwrap_or_else(|| e.to_string());
            match format {
                OutputFormat::Json => {
                    let output = serde_json::json!({ "category": category, "error": message });
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                OutputFormat::Text => eprintln!("{}", message),
            }
        }
    }

    Ok(())
}

/// List the category catalog
fn cmd_categories(format: OutputFormat) -> Result<()> {
    let registry = CategoryRegistry::new();
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(registry.list_categories())?);
        }
        OutputFormat::Text => {
            for category in registry.list_categories() {
                let pool = if category.id.is_editable() {
                    "your own options".to_string()
                } else {
                    format!("{} options", category.suggestions.len())
                };
                println!("{} {:10} {:7} {}", category.icon, category.id.as_str(), category.label, pool);
            }
        }
    }
    Ok(())
}
