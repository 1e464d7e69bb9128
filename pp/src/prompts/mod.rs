//! Prompt Template System
//!
//! Composes the single instruction prompt sent per submission, and the
//! structured output schema that goes with it.
//!
//! The template is embedded in the binary and rendered with Handlebars.

pub mod embedded;
mod builder;
mod schema;

pub use builder::{
    ALLOW_NEW_CLAUSE, PANTRY_ONLY_CLAUSE, PromptBuilder, PromptContext, meal_time_list, pantry_policy,
};
pub use schema::response_schema;
