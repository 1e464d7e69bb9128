//! End-to-end planner tests against a stub generation client

use std::io::Write;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pantryplan::llm::{GenerationRequest, GenerationResponse, LlmClient, LlmError, TokenUsage};
use pantryplan::planner::{GENERATION_ERROR_MESSAGE, MealGenerator, PlannerForm};
use pantryplan::prompts::{ALLOW_NEW_CLAUSE, PANTRY_ONLY_CLAUSE};
use pantryplan::render;
use pantryplan::{Diet, MealTime, PantryFile, PantryOption, UserType};

/// Replies with fixed text and remembers what it was asked
struct StubClient {
    reply: Result<String, String>,
    seen: Mutex<Vec<GenerationRequest>>,
}

impl StubClient {
    fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: Err("service unavailable".to_string()),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn prompts(&self) -> Vec<String> {
        self.seen.lock().unwrap().iter().map(|r| r.prompt.clone()).collect()
    }
}

#[async_trait]
impl LlmClient for StubClient {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, LlmError> {
        self.seen.lock().unwrap().push(request);
        match &self.reply {
            Ok(text) => Ok(GenerationResponse {
                text: text.clone(),
                finish_reason: Some("STOP".to_string()),
                usage: TokenUsage::default(),
            }),
            Err(message) => Err(LlmError::ApiError {
                status: 503,
                message: message.clone(),
            }),
        }
    }

    fn model(&self) -> &str {
        "stub"
    }
}

const TWO_MEALS: &str = r#"{"meals":[
  {"mealType":"breakfast","recipeName":"Spinach Omelette","ingredients":["eggs","spinach"],"instructions":"Whisk and fry."},
  {"mealType":"dinner","recipeName":"Egg Fried Rice","ingredients":["rice","eggs"],"instructions":"Fry rice.\nAdd eggs.","shoppingList":["spring onions"]}
]}"#;

fn pantry_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".md").tempfile().unwrap();
    write!(file, "# Pantry\n- rice\n- eggs\n- spinach\n\n<wok> & pan").unwrap();
    file
}

fn ready_planner(file: &tempfile::NamedTempFile) -> PlannerForm {
    let mut planner = PlannerForm::new();
    planner.select_files([PantryFile::new(file.path())]);
    planner.set_diet(Some(Diet::Pescatarian));
    planner.set_user_type(Some(UserType::BusyProfessional));
    planner.set_people(2);
    planner.toggle_meal_time(MealTime::Dinner);
    planner.toggle_meal_time(MealTime::Breakfast);
    planner
}

#[tokio::test]
async fn test_full_submission_renders_cards() {
    let file = pantry_file();
    let stub = StubClient::replying(TWO_MEALS);
    let generator = MealGenerator::with_client(stub.clone());
    let mut planner = ready_planner(&file);
    planner.set_pantry_option(PantryOption::AllowNew);

    planner.submit(&generator).await.unwrap();

    let meals = planner.meals().unwrap();
    assert_eq!(meals.len(), 2);
    assert_eq!(meals[1].shopping_list, Some(vec!["spring onions".to_string()]));

    let text = render::render_text(meals);
    assert!(text.find("Spinach Omelette").unwrap() < text.find("Egg Fried Rice").unwrap());
    assert!(text.contains("spring onions"));

    let prompts = stub.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("busy professional"));
    assert!(prompts[0].contains("pescatarian"));
    assert!(prompts[0].contains("breakfast, dinner"));
    assert!(prompts[0].contains("<wok> & pan"));
    assert!(prompts[0].contains(ALLOW_NEW_CLAUSE));
    assert!(!prompts[0].contains(PANTRY_ONLY_CLAUSE));
}

#[tokio::test]
async fn test_pantry_only_prompt() {
    let file = pantry_file();
    let stub = StubClient::replying(TWO_MEALS);
    let generator = MealGenerator::with_client(stub.clone());
    let mut planner = ready_planner(&file);

    planner.submit(&generator).await.unwrap();

    let prompt = &stub.prompts()[0];
    assert!(prompt.contains(PANTRY_ONLY_CLAUSE));
    assert!(!prompt.contains(ALLOW_NEW_CLAUSE));
}

#[tokio::test]
async fn test_service_failure_then_recovery() {
    let file = pantry_file();
    let mut planner = ready_planner(&file);

    planner
        .submit(&MealGenerator::with_client(StubClient::failing()))
        .await
        .unwrap();
    assert_eq!(planner.error(), Some(GENERATION_ERROR_MESSAGE));
    assert!(planner.meals().is_none());
    assert!(planner.can_submit());

    planner
        .submit(&MealGenerator::with_client(StubClient::replying(TWO_MEALS)))
        .await
        .unwrap();
    assert!(planner.error().is_none());
    assert_eq!(planner.meals().map(|m| m.len()), Some(2));
}

#[tokio::test]
async fn test_schema_mismatch_is_generation_error() {
    let file = pantry_file();
    let mut planner = ready_planner(&file);
    let generator = MealGenerator::with_client(StubClient::replying(r#"{"meals":[{"recipeName":"Toast"}]}"#));

    planner.submit(&generator).await.unwrap();
    assert_eq!(planner.error(), Some(GENERATION_ERROR_MESSAGE));
    assert!(!planner.is_loading());
}
