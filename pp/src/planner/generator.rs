//! Meal plan generation pipeline
//!
//! read pantry file -> compose prompt -> one generation call -> parse.
//! Each step runs strictly after the previous one completes.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::error::GenerationError;
use crate::config::LlmConfig;
use crate::domain::{Diet, Meal, MealPlan, MealTimes, PantryFile, PantryOption, UserType};
use crate::llm::{GenerationRequest, LlmClient, LlmError, create_client};
use crate::prompts::{PromptBuilder, PromptContext, response_schema};

/// Snapshot of a ready form, taken when a submission starts
///
/// `PlannerForm::begin_submit` only hands one out after validation passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub file: PantryFile,
    pub diet: Diet,
    pub user_type: UserType,
    pub people: u32,
    pub meal_times: MealTimes,
    pub pantry_option: PantryOption,
}

impl Submission {
    /// Prompt context for this submission and the given pantry text
    pub fn prompt_context(&self, pantry: String) -> PromptContext {
        PromptContext::new(
            self.user_type,
            self.people,
            self.diet,
            &self.meal_times,
            self.pantry_option,
            pantry,
        )
    }

    /// Read the pantry file as text
    ///
    /// Contents are opaque: bytes that are not valid UTF-8 are replaced, not
    /// rejected. Only an I/O failure is an error.
    pub async fn read_pantry(&self) -> Result<String, GenerationError> {
        let path = self.file.path();
        debug!(?path, "Submission::read_pantry: called");
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| GenerationError::FileRead {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Read the pantry file and render the full prompt
    pub async fn compose_prompt(&self, prompts: &PromptBuilder) -> Result<String, GenerationError> {
        let pantry = self.read_pantry().await?;
        Ok(prompts.render(&self.prompt_context(pantry))?)
    }
}

/// Runs submissions against the generation service
///
/// Cheap to clone, so a host can move one into a spawned task.
#[derive(Clone)]
pub struct MealGenerator {
    client: Option<Arc<dyn LlmClient>>,
    credential_env: String,
    prompts: Arc<PromptBuilder>,
}

impl MealGenerator {
    /// Build from config, reading the API credential once
    ///
    /// A missing credential is not fatal here: the generator is still built
    /// and every generation fails with `GenerationError::MissingCredential`.
    pub fn from_config(config: &LlmConfig) -> Self {
        debug!(api_key_env = %config.api_key_env, "MealGenerator::from_config: called");
        match create_client(config) {
            Ok(client) => {
                info!("Generation client ready (model: {})", client.model());
                Self::with_client(client)
            }
            Err(e) => Self::from(e),
        }
    }

    /// Build around an existing client
    pub fn with_client(client: Arc<dyn LlmClient>) -> Self {
        debug!("MealGenerator::with_client: called");
        Self {
            client: Some(client),
            credential_env: String::new(),
            prompts: Arc::new(PromptBuilder::new()),
        }
    }

    /// Whether a credential was found at startup
    pub fn has_client(&self) -> bool {
        self.client.is_some()
    }

    /// Run one submission through the whole pipeline
    pub async fn generate(&self, submission: &Submission) -> Result<Vec<Meal>, GenerationError> {
        debug!(file = ?submission.file.path(), "MealGenerator::generate: called");

        let prompt = submission.compose_prompt(&self.prompts).await?;

        let client = self.client.as_ref().ok_or_else(|| GenerationError::MissingCredential {
            env: self.credential_env.clone(),
        })?;

        let request = GenerationRequest::new(prompt, response_schema());
        info!("Requesting meal plan from {}", client.model());
        let response = client.generate(request).await?;

        let plan = MealPlan::from_json(&response.text)?;
        info!("Meal plan received: {} meal(s)", plan.meals.len());
        Ok(plan.meals)
    }
}

impl From<LlmError> for MealGenerator {
    /// Generator whose client could not be created
    fn from(err: LlmError) -> Self {
        let credential_env = match &err {
            LlmError::MissingCredential { env } => env.clone(),
            _ => String::new(),
        };
        warn!("Generation client unavailable: {}", err);
        Self {
            client: None,
            credential_env,
            prompts: Arc::new(PromptBuilder::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MealTime;
    use crate::llm::client::mock::MockLlmClient;
    use crate::prompts::{ALLOW_NEW_CLAUSE, PANTRY_ONLY_CLAUSE};
    use std::io::Write;

    const STIR_FRY: &str = r#"{"meals":[{"mealType":"dinner","recipeName":"Stir Fry","ingredients":["rice","egg"],"instructions":"Cook rice, fry egg, mix."}]}"#;

    fn pantry_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        write!(file, "{}", contents).unwrap();
        file
    }

    fn submission(file: &tempfile::NamedTempFile, option: PantryOption) -> Submission {
        Submission {
            file: PantryFile::new(file.path()),
            diet: Diet::Omnivore,
            user_type: UserType::Family,
            people: 4,
            meal_times: [MealTime::Dinner, MealTime::Breakfast].into_iter().collect(),
            pantry_option: option,
        }
    }

    #[tokio::test]
    async fn test_generate_success() {
        let file = pantry_file("rice\negg\nfrying pan");
        let mock = Arc::new(MockLlmClient::new(vec![STIR_FRY]));
        let generator = MealGenerator::with_client(mock.clone());

        let meals = generator
            .generate(&submission(&file, PantryOption::PantryOnly))
            .await
            .unwrap();

        assert_eq!(meals.len(), 1);
        assert_eq!(meals[0].recipe_name, "Stir Fry");
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_request_carries_prompt_and_schema() {
        let file = pantry_file("oats, milk, saucepan");
        let mock = Arc::new(MockLlmClient::new(vec![STIR_FRY]));
        let generator = MealGenerator::with_client(mock.clone());

        generator
            .generate(&submission(&file, PantryOption::AllowNew))
            .await
            .unwrap();

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        let prompt = &requests[0].prompt;
        assert!(prompt.contains("oats, milk, saucepan"));
        assert!(prompt.contains("breakfast, dinner"));
        assert!(prompt.contains("family"));
        assert!(prompt.contains(ALLOW_NEW_CLAUSE));
        assert!(!prompt.contains(PANTRY_ONLY_CLAUSE));
        assert_eq!(requests[0].schema, response_schema());
    }

    #[tokio::test]
    async fn test_missing_file_never_calls_service() {
        let file = pantry_file("rice");
        let mut sub = submission(&file, PantryOption::PantryOnly);
        sub.file = PantryFile::new("/nonexistent/pantry.txt");

        let mock = Arc::new(MockLlmClient::new(vec![STIR_FRY]));
        let generator = MealGenerator::with_client(mock.clone());

        let err = generator.generate(&sub).await.unwrap_err();
        assert_eq!(err.kind(), "file-read");
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_non_utf8_pantry_still_prompts() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(b"caf\xe9 beans\nrice").unwrap();

        let mock = Arc::new(MockLlmClient::new(vec![STIR_FRY]));
        let generator = MealGenerator::with_client(mock.clone());

        let meals = generator
            .generate(&submission(&file, PantryOption::PantryOnly))
            .await
            .unwrap();

        assert_eq!(meals.len(), 1);
        assert_eq!(mock.call_count(), 1);
        let requests = mock.requests();
        assert!(requests[0].prompt.contains("caf\u{FFFD} beans\nrice"));
    }

    #[tokio::test]
    async fn test_missing_credential() {
        let file = pantry_file("rice");
        let generator = MealGenerator::from(LlmError::MissingCredential {
            env: "GEMINI_API_KEY".to_string(),
        });
        assert!(!generator.has_client());

        let err = generator
            .generate(&submission(&file, PantryOption::PantryOnly))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::MissingCredential { ref env } if env == "GEMINI_API_KEY"));
    }

    #[tokio::test]
    async fn test_malformed_response_is_parse_error() {
        let file = pantry_file("rice");
        let generator = MealGenerator::with_client(Arc::new(MockLlmClient::new(vec!["{\"meals\": [{\"mealType\""])));

        let err = generator
            .generate(&submission(&file, PantryOption::PantryOnly))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "parse");
    }

    #[tokio::test]
    async fn test_service_failure_is_llm_error() {
        let file = pantry_file("rice");
        let generator = MealGenerator::with_client(Arc::new(MockLlmClient::failing("overloaded")));

        let err = generator
            .generate(&submission(&file, PantryOption::PantryOnly))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "llm");
    }
}
