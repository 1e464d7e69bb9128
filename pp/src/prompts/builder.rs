//! Prompt Builder
//!
//! Renders the embedded meal plan template for one submission.

use handlebars::{Handlebars, RenderError};
use serde::Serialize;
use tracing::{debug, info};

use super::embedded;
use crate::domain::{Diet, MealTimes, PantryOption, UserType};

/// Clause used when only pantry ingredients may appear in recipes
pub const PANTRY_ONLY_CLAUSE: &str = "Use ONLY the ingredients listed in the pantry above. Do not add any ingredient \
     that is not on the list, and do not include a shopping list.";

/// Clause used when the model may suggest ingredients outside the pantry
pub const ALLOW_NEW_CLAUSE: &str = "You may suggest new ingredients that are not in the pantry. For every recipe \
     that needs ingredients not in the pantry, include a shoppingList with exactly those new ingredients.";

/// Comma-joined meal time names in canonical order
pub fn meal_time_list(meal_times: &MealTimes) -> String {
    let names: Vec<&str> = meal_times.selected().map(|m| m.name()).collect();
    debug!(?names, "meal_time_list: called");
    names.join(", ")
}

/// Policy clause for a pantry option
pub fn pantry_policy(option: PantryOption) -> &'static str {
    match option {
        PantryOption::PantryOnly => PANTRY_ONLY_CLAUSE,
        PantryOption::AllowNew => ALLOW_NEW_CLAUSE,
    }
}

/// Context for rendering the meal plan template
#[derive(Debug, Clone, Serialize)]
pub struct PromptContext {
    pub user_type: String,
    pub people: u32,
    /// Singular wording when cooking for one
    pub single_serving: bool,
    pub diet: String,
    pub meal_times: String,
    /// Pantry file contents, embedded verbatim
    pub pantry: String,
    pub pantry_policy: &'static str,
}

impl PromptContext {
    pub fn new(
        user_type: UserType,
        people: u32,
        diet: Diet,
        meal_times: &MealTimes,
        pantry_option: PantryOption,
        pantry: String,
    ) -> Self {
        debug!(%user_type, people, %diet, ?pantry_option, pantry_len = pantry.len(), "PromptContext::new: called");
        Self {
            user_type: user_type.name().replace('-', " "),
            people,
            single_serving: people == 1,
            diet: diet.name().replace('-', " "),
            meal_times: meal_time_list(meal_times),
            pantry,
            pantry_policy: pantry_policy(pantry_option),
        }
    }
}

/// Renders meal plan prompts
pub struct PromptBuilder {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptBuilder {
    pub fn new() -> Self {
        debug!("PromptBuilder::new: called");
        let mut hbs = Handlebars::new();
        // Pantry text must reach the model byte-for-byte
        hbs.register_escape_fn(handlebars::no_escape);
        Self { hbs }
    }

    /// Render the meal plan prompt
    pub fn render(&self, context: &PromptContext) -> Result<String, RenderError> {
        info!(
            "Rendering meal plan prompt (meals: {}, pantry: {} bytes)",
            context.meal_times,
            context.pantry.len()
        );
        self.hbs.render_template(embedded::MEAL_PLAN, context)
    }
}
