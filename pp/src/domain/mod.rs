//! Domain types for PantryPlan
//!
//! Form input (what the user picks) and meal plan output (what the model
//! returns). No behaviour beyond readiness and parsing lives here.

mod form;
mod meal;

pub use form::{ACCEPTED_EXTENSIONS, Diet, FormState, MealTime, MealTimes, PantryFile, PantryOption, UserType};
pub use meal::{Meal, MealPlan};
