//! TripBot - trip planning chat bot
//!
//! CLI entry point for the webhook server and the planning tools.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser};
use colored::*;
use eyre::{Context, Result};
use tracing::{debug, info};

use tripbot::cli::{Cli, Command, OutputFormat, PlanCommand};
use tripbot::config::Config;
use tripbot::messaging::{LineMessagingClient, MessagingGateway};
use tripbot::server::{self, AppState};
use tripbot::webhook::signature;
use tripplan::{FailurePolicy, PlaceResult, PlanDraft, PlanSession, Prefecture, Region, create_client};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tripbot")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("tripbot.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());

    // Setup logging with priority: CLI > config > INFO default
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    // Dispatch command
    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Some(Command::Serve { bind }) => cmd_serve(&config, bind).await,
        Some(Command::Regions { format }) => cmd_regions(format),
        Some(Command::Search {
            keyword,
            prefecture,
            format,
        }) => cmd_search(&config, &keyword, prefecture.as_deref(), format).await,
        Some(Command::Popular { prefecture, format }) => cmd_popular(&config, &prefecture, format).await,
        Some(Command::Plan {
            command: PlanCommand::Check { file, json },
        }) => cmd_plan_check(&file, json),
        Some(Command::Push { user_id, text }) => cmd_push(&config, &user_id, &text).await,
        Some(Command::Sign { file }) => cmd_sign(&config, &file),
        None => {
            debug!("main: no command, printing help");
            Cli::command().print_help()?;
            println!();
            Ok(())
        }
    }
}

/// Run the HTTP server until shutdown
async fn cmd_serve(config: &Config, bind: Option<String>) -> Result<()> {
    debug!(?bind, "cmd_serve: called");
    config.validate().context("Configuration is incomplete")?;

    let bind = bind.unwrap_or_else(|| config.server.bind.clone());
    let state = AppState::from_config(config)?;

    println!("{} Listening on {}", "✓".green(), bind.cyan());
    server::serve(state, &bind).await
}

fn cmd_regions(format: OutputFormat) -> Result<()> {
    debug!(?format, "cmd_regions: called");
    match format {
        OutputFormat::Json => {
            let regions: Vec<_> = Region::ALL
                .iter()
                .map(|region| {
                    serde_json::json!({
                        "region": region.name(),
                        "name_ja": region.name_ja(),
                        "prefectures": region.prefectures().map(|p| p.name()).collect::<Vec<_>>(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&regions)?);
        }
        OutputFormat::Text => {
            for region in Region::ALL.iter() {
                println!("{} ({})", region.name().bold(), region.name_ja());
                for prefecture in region.prefectures() {
                    println!("  {:<12} {}", prefecture.name(), prefecture.name_ja().dimmed());
                }
            }
        }
    }
    Ok(())
}

fn parse_prefecture(name: &str) -> Result<Prefecture> {
    name.parse::<Prefecture>().map_err(|e| eyre::eyre!(e))
}

async fn cmd_search(config: &Config, keyword: &str, prefecture: Option<&str>, format: OutputFormat) -> Result<()> {
    debug!(%keyword, ?prefecture, "cmd_search: called");
    let prefecture = prefecture.map(parse_prefecture).transpose()?;
    let client = create_client(&config.places)?;

    let result = client.search_by_keyword(keyword, prefecture.as_ref()).await;
    let places = FailurePolicy::LogAndAbort
        .apply("keyword search", result)?
        .unwrap_or_default();
    print_places(&places, format)
}

async fn cmd_popular(config: &Config, prefecture: &str, format: OutputFormat) -> Result<()> {
    debug!(%prefecture, "cmd_popular: called");
    let prefecture = parse_prefecture(prefecture)?;
    let client = create_client(&config.places)?;

    let result = client.search_popular_by_area(&prefecture).await;
    let places = FailurePolicy::LogAndAbort
        .apply("area search", result)?
        .unwrap_or_default();
    print_places(&places, format)
}

fn print_places(places: &[PlaceResult], format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(places)?);
        return Ok(());
    }

    if places.is_empty() {
        println!("No places found.");
        return Ok(());
    }

    for place in places {
        let rating = place
            .rating
            .map(|r| format!("★{:.1}", r))
            .unwrap_or_default();
        println!("{} {}", place.name.bold(), rating.yellow());
        if !place.address.is_empty() {
            println!("  {}", place.address.dimmed());
        }
        println!(
            "  {:.5}, {:.5}  {}",
            place.coordinates.latitude,
            place.coordinates.longitude,
            place.id.dimmed()
        );
    }
    Ok(())
}

fn cmd_plan_check(file: &Path, json: bool) -> Result<()> {
    debug!(?file, json, "cmd_plan_check: called");
    let content = fs::read_to_string(file).context(format!("Failed to read {}", file.display()))?;
    let draft: PlanDraft = serde_yaml::from_str(&content).context("Failed to parse plan draft")?;

    match PlanSession::from_draft(draft).finalize() {
        Ok(plan) => {
            info!(plan_id = %plan.id, "cmd_plan_check: plan is valid");
            if json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                println!("{} {}", "✓".green(), plan.title.bold());
                println!(
                    "  {} day(s), {} to {}",
                    plan.duration_days, plan.start_date, plan.end_date
                );
                println!("  {} ({})", plan.prefecture, plan.region);
                println!("  {} spot(s)", plan.spots.len() + plan.custom_spots.len());
            }
            Ok(())
        }
        Err((_, failure)) => {
            for (field, message) in failure.result().errors() {
                println!("{} {}: {}", "✗".red(), field.yellow(), message);
            }
            Err(eyre::eyre!("Plan draft is invalid"))
        }
    }
}

async fn cmd_push(config: &Config, user_id: &str, text: &str) -> Result<()> {
    debug!(%user_id, "cmd_push: called");
    let client = LineMessagingClient::from_config(&config.line)?;

    let result = client.push(user_id, text).await;
    FailurePolicy::LogAndAbort.apply("push message", result)?;

    println!("{} Sent to {}", "✓".green(), user_id.cyan());
    Ok(())
}

fn cmd_sign(config: &Config, file: &Path) -> Result<()> {
    debug!(?file, "cmd_sign: called");
    let body = fs::read(file).context(format!("Failed to read {}", file.display()))?;
    let secret = config.line.get_channel_secret()?;

    println!("{}", signature::sign(&body, secret.expose()));
    Ok(())
}
