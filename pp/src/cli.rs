//! CLI command definitions and subcommands

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use crate::domain::{ACCEPTED_EXTENSIONS, Diet, MealTime, PantryFile, PantryOption, UserType};
use crate::planner::PlannerForm;

/// PantryPlan - meal plans from what is already in the pantry
#[derive(Parser)]
#[command(
    name = "pp",
    about = "Generate meal plans from your pantry with a generative text model",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the interactive planner (default)
    Tui,

    /// Generate a meal plan in one shot
    Plan {
        #[command(flatten)]
        form: FormArgs,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the prompt and schema that would be sent, without sending them
    Prompt {
        #[command(flatten)]
        form: FormArgs,
    },

    /// List valid diets, user types and meal times
    Options,
}

/// Form fields, as flags
#[derive(Debug, Clone, Args)]
pub struct FormArgs {
    /// Pantry/equipment file (only the first one given is used)
    #[arg(short, long = "pantry", value_name = "FILE")]
    pub pantry: Vec<PathBuf>,

    /// Dietary preference
    #[arg(short, long)]
    pub diet: Option<Diet>,

    /// Who the meals are for
    #[arg(short, long = "user-type")]
    pub user_type: Option<UserType>,

    /// Number of people
    #[arg(short = 'n', long, default_value_t = 1)]
    pub people: u32,

    /// Meal time to plan for (repeatable)
    #[arg(short, long = "meal", value_name = "MEAL")]
    pub meals: Vec<MealTime>,

    /// Allow ingredients outside the pantry (adds a shopping list)
    #[arg(short, long)]
    pub allow_new: bool,
}

impl FormArgs {
    /// Fill a planner form through its field mutators
    pub fn apply(&self, planner: &mut PlannerForm) {
        debug!(?self, "FormArgs::apply: called");
        planner.select_files(self.pantry.iter().map(PantryFile::new));
        planner.set_diet(self.diet);
        planner.set_user_type(self.user_type);
        planner.set_people(self.people);
        for meal in MealTime::ALL {
            if self.meals.contains(&meal) {
                planner.toggle_meal_time(meal);
            }
        }
        let option = if self.allow_new {
            PantryOption::AllowNew
        } else {
            PantryOption::PantryOnly
        };
        planner.set_pantry_option(option);
    }

    /// A planner form filled from these flags
    pub fn to_planner(&self) -> PlannerForm {
        let mut planner = PlannerForm::new();
        self.apply(&mut planner);
        planner
    }
}

/// Output format for the plan command
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "OutputFormat::from_str: called");
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => {
                debug!(%s, "OutputFormat::from_str: unknown format");
                Err(format!("Unknown format: {}. Use: text or json", s))
            }
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    debug!("get_log_path: called");
    let path = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pantryplan")
        .join("logs")
        .join("pantryplan.log");
    debug!(?path, "get_log_path: returning path");
    path
}

/// Generate the after_help text with the file hint and log location
pub fn generate_after_help() -> String {
    debug!("generate_after_help: called");
    let mut help = String::new();

    help.push_str("Pantry files:\n");
    help.push_str(&format!(
        "  Any text file; suggested extensions: {}\n",
        ACCEPTED_EXTENSIONS.join(" ")
    ));

    help.push('\n');
    help.push_str(&format!("Logs are written to: {}\n", get_log_path().display()));
    help
}
