//! PantryPlan - meal plans from what is already in the pantry
//!
//! The user picks a pantry/equipment file, a diet, who the meals are for,
//! how many people and which meal times. PantryPlan composes one prompt,
//! sends it to a generative text model with a structured output schema and
//! renders the recipes that come back.
//!
//! # Modules
//!
//! - [`domain`] - form fields and the meal plan response types
//! - [`planner`] - the planner form, its submit gate and generation pipeline
//! - [`prompts`] - prompt template and response schema
//! - [`llm`] - generation client trait and Gemini implementation
//! - [`render`] - meal cards as text or JSON
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface
//! - [`tui`] - interactive terminal front end

pub mod cli;
pub mod config;
pub mod domain;
pub mod llm;
pub mod planner;
pub mod prompts;
pub mod render;
pub mod tui;

// Re-export commonly used types
pub use config::{Config, LlmConfig};
pub use domain::{Diet, FormState, Meal, MealPlan, MealTime, MealTimes, PantryFile, PantryOption, UserType};
pub use llm::{GeminiClient, LlmClient, LlmError};
pub use planner::{GenerationError, MealGenerator, PlannerForm, SubmitError, Submission};
