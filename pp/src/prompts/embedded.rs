//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

/// Meal plan instruction prompt
pub const MEAL_PLAN: &str = include_str!("../../prompts/meal-plan.pmt");
