//! Meal plan response types
//!
//! These mirror the structured output schema sent to the model, so a
//! response that deserializes here is schema-conforming.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// One recipe returned by the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub meal_type: String,
    /// Display key; expected to be unique within one plan
    pub recipe_name: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
    /// Present only when the recipe needs ingredients outside the pantry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shopping_list: Option<Vec<String>>,
}

impl Meal {
    /// Shopping list, if the model attached a non-empty one
    pub fn shopping_items(&self) -> Option<&[String]> {
        self.shopping_list.as_deref().filter(|items| !items.is_empty())
    }
}

/// Top-level object the model is asked to produce
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealPlan {
    pub meals: Vec<Meal>,
}

impl MealPlan {
    /// Parse the raw text returned by the model
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        debug!(text_len = text.len(), "MealPlan::from_json: called");
        serde_json::from_str(text.trim())
    }
}
