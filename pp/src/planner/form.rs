//! PlannerForm - form state, submit gate and request lifecycle
//!
//! Submission is split into `begin_submit` / `finish_submit` so an
//! event-driven host can run the generation in between without holding a
//! borrow on the form. `submit` chains the three steps for hosts that can
//! simply await.

use tracing::{debug, info, warn};

use super::error::{GenerationError, SubmitError, VALIDATION_ERROR_MESSAGE};
use super::generator::{MealGenerator, Submission};
use crate::domain::{Diet, FormState, Meal, MealTime, PantryFile, PantryOption, UserType};

/// The planner form and the state of its one outstanding request
#[derive(Debug, Clone, Default)]
pub struct PlannerForm {
    form: FormState,
    in_flight: bool,
    meals: Option<Vec<Meal>>,
    error: Option<String>,
}

impl PlannerForm {
    pub fn new() -> Self {
        debug!("PlannerForm::new: called");
        Self::default()
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    // === Field mutators ===

    /// Select a pantry file; only the first of the provided set is kept
    ///
    /// An empty set clears the selection.
    pub fn select_files<I>(&mut self, files: I)
    where
        I: IntoIterator<Item = PantryFile>,
    {
        self.form.file = files.into_iter().next();
        debug!(file = ?self.form.file, "PlannerForm::select_files: called");
        if let Some(file) = &self.form.file
            && !file.has_suggested_extension()
        {
            debug!("PlannerForm::select_files: file outside the extension hint, accepting anyway");
        }
    }

    pub fn set_diet(&mut self, diet: Option<Diet>) {
        debug!(?diet, "PlannerForm::set_diet: called");
        self.form.diet = diet;
    }

    pub fn set_user_type(&mut self, user_type: Option<UserType>) {
        debug!(?user_type, "PlannerForm::set_user_type: called");
        self.form.user_type = user_type;
    }

    /// Set the number of people; anything below one becomes one
    pub fn set_people(&mut self, people: u32) {
        debug!(people, "PlannerForm::set_people: called");
        self.form.people = people.max(1);
    }

    pub fn toggle_meal_time(&mut self, meal: MealTime) {
        debug!(?meal, "PlannerForm::toggle_meal_time: called");
        self.form.meal_times.toggle(meal);
    }

    pub fn set_pantry_option(&mut self, option: PantryOption) {
        debug!(?option, "PlannerForm::set_pantry_option: called");
        self.form.pantry_option = option;
    }

    // === Derived state ===

    /// All required fields are filled in
    pub fn is_ready(&self) -> bool {
        self.form.is_ready()
    }

    /// Submit control is enabled
    pub fn can_submit(&self) -> bool {
        self.is_ready() && !self.in_flight
    }

    /// A request is in flight
    pub fn is_loading(&self) -> bool {
        self.in_flight
    }

    /// Meals from the last successful submission
    pub fn meals(&self) -> Option<&[Meal]> {
        self.meals.as_deref()
    }

    /// User-facing error message, if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    // === Submission lifecycle ===

    /// Validate and start a submission
    ///
    /// On success the previous result and error are cleared, the in-flight
    /// flag is set and the returned `Submission` must be completed with
    /// `finish_submit`.
    pub fn begin_submit(&mut self) -> Result<Submission, SubmitError> {
        debug!(in_flight = self.in_flight, "PlannerForm::begin_submit: called");
        if self.in_flight {
            debug!("PlannerForm::begin_submit: already in flight, ignoring");
            return Err(SubmitError::InFlight);
        }

        let (Some(file), Some(diet), Some(user_type)) =
            (self.form.file.clone(), self.form.diet, self.form.user_type)
        else {
            return Err(self.reject_incomplete());
        };
        if !self.form.meal_times.any() {
            return Err(self.reject_incomplete());
        }

        self.error = None;
        self.meals = None;
        self.in_flight = true;
        info!(
            "Submitting meal plan request ({} / {} / {} people)",
            diet, user_type, self.form.people
        );

        Ok(Submission {
            file,
            diet,
            user_type,
            people: self.form.people,
            meal_times: self.form.meal_times,
            pantry_option: self.form.pantry_option,
        })
    }

    fn reject_incomplete(&mut self) -> SubmitError {
        debug!("PlannerForm::reject_incomplete: required field missing");
        self.error = Some(VALIDATION_ERROR_MESSAGE.to_string());
        SubmitError::Incomplete
    }

    /// Record the outcome of a submission started with `begin_submit`
    ///
    /// Clears the in-flight flag as its last step, whatever the outcome.
    pub fn finish_submit(&mut self, result: Result<Vec<Meal>, GenerationError>) {
        debug!(ok = result.is_ok(), "PlannerForm::finish_submit: called");
        match result {
            Ok(meals) => {
                info!("Meal plan ready: {} meal(s)", meals.len());
                self.meals = Some(meals);
                self.error = None;
            }
            Err(e) => {
                warn!(kind = e.kind(), status = ?e.status(), "Meal plan generation failed: {}", e);
                self.meals = None;
                self.error = Some(e.user_message().to_string());
            }
        }
        self.in_flight = false;
    }

    /// Validate, generate and record the outcome in one go
    pub async fn submit(&mut self, generator: &MealGenerator) -> Result<(), SubmitError> {
        debug!("PlannerForm::submit: called");
        let submission = self.begin_submit()?;
        let result = generator.generate(&submission).await;
        self.finish_submit(result);
        Ok(())
    }
}
