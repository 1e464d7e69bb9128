//! Planner - the meal planner form and its generation pipeline
//!
//! `PlannerForm` owns what the user has picked and the state of the current
//! request. `MealGenerator` turns a validated `Submission` into meals.

mod error;
mod form;
mod generator;

pub use error::{GENERATION_ERROR_MESSAGE, GenerationError, SubmitError, VALIDATION_ERROR_MESSAGE};
pub use form::PlannerForm;
pub use generator::{MealGenerator, Submission};
