//! Meal card rendering
//!
//! `MealCard` is the view model both front ends draw from. The plain text
//! and JSON renderers here back the `plan` command; the TUI builds its own
//! widgets from the same cards.

use eyre::{Context, Result};
use tracing::debug;

use crate::domain::{Meal, MealPlan};

/// What one card shows, borrowed from a `Meal`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealCard<'a> {
    /// Card key; duplicates are drawn as separate cards
    pub recipe_name: &'a str,
    pub meal_type: &'a str,
    /// Only set when the model attached a non-empty list
    pub shopping_list: Option<&'a [String]>,
    pub ingredients: &'a [String],
    pub instructions: &'a str,
}

impl<'a> MealCard<'a> {
    pub fn new(meal: &'a Meal) -> Self {
        Self {
            recipe_name: &meal.recipe_name,
            meal_type: &meal.meal_type,
            shopping_list: meal.shopping_items(),
            ingredients: &meal.ingredients,
            instructions: &meal.instructions,
        }
    }

    /// Header line, e.g. "DINNER"
    pub fn header(&self) -> String {
        self.meal_type.to_uppercase()
    }
}

/// Cards in response order
pub fn cards(meals: &[Meal]) -> Vec<MealCard<'_>> {
    meals.iter().map(MealCard::new).collect()
}

/// Render meals as plain text, one card per meal
pub fn render_text(meals: &[Meal]) -> String {
    debug!(count = meals.len(), "render_text: called");
    cards(meals)
        .iter()
        .map(card_text)
        .collect::<Vec<_>>()
        .join("\n")
}

fn card_text(card: &MealCard<'_>) -> String {
    let mut out = String::new();
    out.push_str(&format!("[{}]\n", card.header()));
    out.push_str(&format!("{}\n", card.recipe_name));

    if let Some(items) = card.shopping_list {
        out.push_str("\nShopping list:\n");
        push_items(&mut out, items);
    }

    out.push_str("\nIngredients:\n");
    push_items(&mut out, card.ingredients);

    out.push_str("\nInstructions:\n");
    for line in card.instructions.lines() {
        out.push_str(&format!("  {}\n", line));
    }
    out
}

fn push_items(out: &mut String, items: &[String]) {
    for item in items {
        out.push_str(&format!("  - {}\n", item));
    }
}

/// Render meals as pretty JSON in the response shape
pub fn render_json(meals: &[Meal]) -> Result<String> {
    debug!(count = meals.len(), "render_json: called");
    let plan = MealPlan { meals: meals.to_vec() };
    serde_json::to_string_pretty(&plan).context("Failed to serialize meal plan")
}
