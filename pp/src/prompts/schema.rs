//! Structured output schema for meal plans
//!
//! Uses the OpenAPI subset understood by the generation service. The shape
//! matches `domain::MealPlan`.

use serde_json::{Value, json};

/// Schema for the `{"meals": [...]}` response object
pub fn response_schema() -> Value {
    let string_list = json!({
        "type": "ARRAY",
        "items": { "type": "STRING" },
    });

    let mut shopping_list = string_list.clone();
    shopping_list["description"] = json!(
        "Ingredients to buy that are not in the pantry. Only present when new ingredients are needed."
    );

    json!({
        "type": "OBJECT",
        "properties": {
            "meals": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "mealType": {
                            "type": "STRING",
                            "description": "Which meal this recipe is for, e.g. breakfast or dinner.",
                        },
                        "recipeName": { "type": "STRING" },
                        "ingredients": string_list,
                        "instructions": { "type": "STRING" },
                        "shoppingList": shopping_list,
                    },
                    "required": ["mealType", "recipeName", "ingredients", "instructions"],
                    "propertyOrdering": ["mealType", "recipeName", "ingredients", "instructions", "shoppingList"],
                },
            },
        },
        "required": ["meals"],
    })
}
