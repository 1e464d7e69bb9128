//! PantryPlan - meal plans from what is already in the pantry
//!
//! CLI entry point: interactive planner, one-shot plans and prompt dry runs.

use std::fs;
use std::path::PathBuf;

use clap::{CommandFactory, FromArgMatches};
use colored::*;
use eyre::{Context, Result};
use tracing::{debug, info};

use pantryplan::cli::{Cli, Command, FormArgs, OutputFormat, generate_after_help};
use pantryplan::config::Config;
use pantryplan::domain::{ACCEPTED_EXTENSIONS, Diet, MealTime, UserType};
use pantryplan::llm::MODEL;
use pantryplan::planner::MealGenerator;
use pantryplan::prompts::{PromptBuilder, response_schema};
use pantryplan::{render, tui};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pantryplan")
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

    let log_file = fs::File::create(log_dir.join("pantryplan.log")).context("Failed to create log file")?;

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
    // Build command with dynamic after_help that shows the file hint and log path
    let cmd = Cli::command().after_help(generate_after_help());
    let cli = Cli::from_arg_matches(&cmd.get_matches())?;

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!("PantryPlan loaded config (api-key-env: {})", config.llm.api_key_env);

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Some(Command::Plan { form, format }) => cmd_plan(&config, &form, format).await,
        Some(Command::Prompt { form }) => cmd_prompt(&form).await,
        Some(Command::Options) => cmd_options(),
        Some(Command::Tui) | None => cmd_tui(&config).await,
    }
}

/// Launch the interactive planner
async fn cmd_tui(config: &Config) -> Result<()> {
    debug!("cmd_tui: called");
    let generator = MealGenerator::from_config(&config.llm);
    tui::run(generator).await
}

/// Generate one meal plan and print it
async fn cmd_plan(config: &Config, form: &FormArgs, format: OutputFormat) -> Result<()> {
    debug!(?form, %format, "cmd_plan: called");
    let mut planner = form.to_planner();
    let generator = MealGenerator::from_config(&config.llm);

    if let Err(e) = planner.submit(&generator).await {
        debug!(?e, "cmd_plan: submission refused");
    }

    if let Some(error) = planner.error() {
        eprintln!("{} {}", "✗".red(), error);
        std::process::exit(1);
    }

    let meals = planner.meals().unwrap_or_default();
    match format {
        OutputFormat::Json => println!("{}", render::render_json(meals)?),
        OutputFormat::Text => {
            println!(
                "{} {} meal(s) for {} {}",
                "✓".green(),
                meals.len(),
                planner.form().people,
                if planner.form().people == 1 { "person" } else { "people" }
            );
            println!();
            print!("{}", render::render_text(meals));
        }
    }
    Ok(())
}

/// Print the prompt and schema a submission would send
async fn cmd_prompt(form: &FormArgs) -> Result<()> {
    debug!(?form, "cmd_prompt: called");
    let mut planner = form.to_planner();

    let submission = match planner.begin_submit() {
        Ok(submission) => submission,
        Err(e) => {
            eprintln!("{} {}", "✗".red(), e);
            std::process::exit(1);
        }
    };

    let prompt = match submission.compose_prompt(&PromptBuilder::new()).await {
        Ok(prompt) => prompt,
        Err(e) => {
            eprintln!("{} {}", "✗".red(), e);
            std::process::exit(1);
        }
    };

    println!("{} {}", "Model:".bold(), MODEL.cyan());
    println!();
    println!("{}", "Prompt:".bold());
    println!("{}", prompt);
    println!();
    println!("{}", "Response schema:".bold());
    println!(
        "{}",
        serde_json::to_string_pretty(&response_schema()).context("Failed to serialize schema")?
    );
    Ok(())
}

/// List the values each form field accepts
fn cmd_options() -> Result<()> {
    debug!("cmd_options: called");
    print_values("Diets (--diet)", Diet::ALL.iter().map(|d| d.name()));
    print_values("User types (--user-type)", UserType::ALL.iter().map(|u| u.name()));
    print_values("Meal times (--meal)", MealTime::ALL.iter().map(|m| m.name()));
    print_values("Pantry files (--pantry)", ACCEPTED_EXTENSIONS.iter().copied());
    Ok(())
}

fn print_values<'a>(title: &str, values: impl Iterator<Item = &'a str>) {
    println!("{}", title.bold());
    for value in values {
        println!("  {}", value.yellow());
    }
    println!();
}
