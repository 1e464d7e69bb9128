//! TUI application - event handling and state management
//!
//! The App struct owns the AppState and handles all keyboard events.
//! It does not do any rendering - that's delegated to the views module.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, info, trace};

use super::state::{AppState, FormRow, InteractionMode};
use crate::domain::{Diet, Meal, PantryFile, UserType};
use crate::planner::{GenerationError, SubmitError};

/// Lines moved per PageUp/PageDown in the results pane
const RESULTS_PAGE: u16 = 10;

/// TUI application
#[derive(Debug, Default)]
pub struct App {
    /// Application state
    state: AppState,
}

impl App {
    /// Create a new application instance
    pub fn new() -> Self {
        debug!("App::new: called");
        Self { state: AppState::new() }
    }

    /// Get reference to state
    pub fn state(&self) -> &AppState {
        trace!("App::state: called");
        &self.state
    }

    /// Get mutable reference to state
    pub fn state_mut(&mut self) -> &mut AppState {
        trace!("App::state_mut: called");
        &mut self.state
    }

    /// Handle a key event
    ///
    /// Returns true if the application should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        debug!(?key, "App::handle_key: called");
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            debug!("App::handle_key: Ctrl+C force quit");
            return true;
        }

        match &self.state.interaction_mode {
            InteractionMode::Normal => self.handle_normal_key(key),
            InteractionMode::FileInput(_) => self.handle_file_input_key(key),
            InteractionMode::Help => self.handle_help_key(key),
        }
        false
    }

    /// Handle key in normal mode
    fn handle_normal_key(&mut self, key: KeyEvent) {
        debug!(?key, "App::handle_normal_key: called");
        match key.code {
            // === Quit / help ===
            KeyCode::Char('q') | KeyCode::Esc => {
                debug!("App::handle_normal_key: quit requested");
                self.state.should_quit = true;
            }
            KeyCode::Char('?') | KeyCode::F(1) => {
                self.state.interaction_mode = InteractionMode::Help;
            }

            // === Navigation ===
            KeyCode::Up | KeyCode::Char('k') => self.state.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.state.select_next(),
            KeyCode::PageUp => self.state.scroll_results_up(RESULTS_PAGE),
            KeyCode::PageDown => self.state.scroll_results_down(RESULTS_PAGE),

            // === Submit ===
            KeyCode::Char('g') => self.request_submit(),

            // === Editing ===
            _ if self.state.planner.is_loading() => {
                debug!("App::handle_normal_key: request in flight, form is read-only");
            }
            KeyCode::Left | KeyCode::Char('h') => self.adjust_row(false),
            KeyCode::Right | KeyCode::Char('l') => self.adjust_row(true),
            KeyCode::Char(' ') => self.toggle_row(),
            KeyCode::Enter => self.activate_row(),
            _ => {
                trace!("App::handle_normal_key: unhandled key");
            }
        }
    }

    /// Handle key while typing a file path
    fn handle_file_input_key(&mut self, key: KeyEvent) {
        debug!(?key, "App::handle_file_input_key: called");
        match key.code {
            KeyCode::Esc => {
                debug!("App::handle_file_input_key: cancelled");
                self.state.interaction_mode = InteractionMode::Normal;
            }
            KeyCode::Enter => {
                let path = self
                    .state
                    .interaction_mode
                    .input_buffer()
                    .map(|s| s.trim().to_string())
                    .unwrap_or_default();
                if path.is_empty() {
                    self.state.planner.select_files(std::iter::empty());
                } else {
                    info!("Pantry file selected: {}", path);
                    self.state.planner.select_files([PantryFile::new(path)]);
                }
                self.state.interaction_mode = InteractionMode::Normal;
            }
            KeyCode::Backspace => {
                if let Some(buf) = self.state.interaction_mode.input_buffer_mut() {
                    buf.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(buf) = self.state.interaction_mode.input_buffer_mut() {
                    buf.push(c);
                }
            }
            _ => {}
        }
    }

    /// Handle key in help mode
    fn handle_help_key(&mut self, key: KeyEvent) {
        debug!(?key, "App::handle_help_key: called");
        if matches!(
            key.code,
            KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Esc | KeyCode::F(1)
        ) {
            self.state.interaction_mode = InteractionMode::Normal;
        }
    }

    /// Left/Right on the current row
    fn adjust_row(&mut self, forward: bool) {
        let row = self.state.current_row();
        debug!(?row, forward, "App::adjust_row: called");
        let planner = &mut self.state.planner;
        match row {
            FormRow::Diet => {
                let next = cycle(&Diet::ALL, planner.form().diet, forward);
                planner.set_diet(next);
            }
            FormRow::UserType => {
                let next = cycle(&UserType::ALL, planner.form().user_type, forward);
                planner.set_user_type(next);
            }
            FormRow::People => {
                let people = planner.form().people;
                let next = if forward {
                    people.saturating_add(1)
                } else {
                    people.saturating_sub(1)
                };
                planner.set_people(next);
            }
            FormRow::Meal(_) | FormRow::PantryOption => self.toggle_row(),
            FormRow::File | FormRow::Generate => {}
        }
    }

    /// Space on the current row
    fn toggle_row(&mut self) {
        let row = self.state.current_row();
        debug!(?row, "App::toggle_row: called");
        let planner = &mut self.state.planner;
        match row {
            FormRow::Meal(meal) => planner.toggle_meal_time(meal),
            FormRow::PantryOption => {
                let next = planner.form().pantry_option.toggled();
                planner.set_pantry_option(next);
            }
            _ => {}
        }
    }

    /// Enter on the current row
    fn activate_row(&mut self) {
        let row = self.state.current_row();
        debug!(?row, "App::activate_row: called");
        match row {
            FormRow::File => {
                let current = self
                    .state
                    .planner
                    .form()
                    .file
                    .as_ref()
                    .map(|f| f.path().display().to_string())
                    .unwrap_or_default();
                self.state.interaction_mode = InteractionMode::FileInput(current);
            }
            FormRow::Generate => self.request_submit(),
            FormRow::Diet | FormRow::UserType | FormRow::People => self.adjust_row(true),
            FormRow::Meal(_) | FormRow::PantryOption => self.toggle_row(),
        }
    }

    /// Start a submission and park it for the runner
    fn request_submit(&mut self) {
        debug!("App::request_submit: called");
        match self.state.planner.begin_submit() {
            Ok(submission) => {
                self.state.pending_submission = Some(submission);
                self.state.start_loading();
            }
            Err(SubmitError::InFlight) => {
                debug!("App::request_submit: already in flight, ignoring");
            }
            Err(SubmitError::Incomplete) => {
                debug!("App::request_submit: form incomplete");
            }
        }
    }

    /// Record the result of a submission the runner completed
    pub fn complete_submission(&mut self, result: Result<Vec<Meal>, GenerationError>) {
        debug!(ok = result.is_ok(), "App::complete_submission: called");
        self.state.planner.finish_submit(result);
        self.state.stop_loading();
    }
}

/// Step through an optional enum value; unset sits between the last and first values
fn cycle<T: Copy + PartialEq>(all: &[T], current: Option<T>, forward: bool) -> Option<T> {
    let pos = current.and_then(|c| all.iter().position(|v| *v == c));
    match (pos, forward) {
        (None, true) => all.first().copied(),
        (None, false) => all.last().copied(),
        (Some(i), true) => all.get(i + 1).copied(),
        (Some(0), false) => None,
        (Some(i), false) => all.get(i - 1).copied(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MealTime, PantryOption};
    use crate::planner::{GENERATION_ERROR_MESSAGE, VALIDATION_ERROR_MESSAGE};

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::from(code))
    }

    fn goto(app: &mut App, row: FormRow) {
        let index = FormRow::ALL.iter().position(|r| *r == row).unwrap();
        app.state_mut().selected_row = index;
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn fill_form(app: &mut App) {
        goto(app, FormRow::File);
        press(app, KeyCode::Enter);
        type_str(app, "pantry.txt");
        press(app, KeyCode::Enter);

        goto(app, FormRow::Diet);
        press(app, KeyCode::Right);
        goto(app, FormRow::UserType);
        press(app, KeyCode::Right);
        goto(app, FormRow::Meal(MealTime::Lunch));
        press(app, KeyCode::Char(' '));
    }

    #[test]
    fn test_app_new() {
        let app = App::new();
        assert!(matches!(app.state().interaction_mode, InteractionMode::Normal));
        assert!(!app.state().planner.is_ready());
    }

    #[test]
    fn test_app_quit_keys() {
        let mut app = App::new();
        assert!(app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));

        assert!(!press(&mut app, KeyCode::Char('q')));
        assert!(app.state().should_quit);
    }

    #[test]
    fn test_app_help_toggle() {
        let mut app = App::new();
        press(&mut app, KeyCode::Char('?'));
        assert!(matches!(app.state().interaction_mode, InteractionMode::Help));

        press(&mut app, KeyCode::Char('?'));
        assert!(matches!(app.state().interaction_mode, InteractionMode::Normal));
    }

    #[test]
    fn test_navigation_keys() {
        let mut app = App::new();
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.state().current_row(), FormRow::Diet);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.state().current_row(), FormRow::UserType);
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.state().current_row(), FormRow::Diet);
    }

    #[test]
    fn test_file_input() {
        let mut app = App::new();
        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.state().interaction_mode, InteractionMode::FileInput(_)));

        type_str(&mut app, "pantry.csvx");
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Enter);

        assert!(matches!(app.state().interaction_mode, InteractionMode::Normal));
        assert_eq!(app.state().planner.form().file, Some(PantryFile::new("pantry.csv")));
    }

    #[test]
    fn test_file_input_escape_keeps_selection() {
        let mut app = App::new();
        app.state_mut().planner.select_files([PantryFile::new("a.txt")]);

        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "b");
        press(&mut app, KeyCode::Esc);

        assert_eq!(app.state().planner.form().file, Some(PantryFile::new("a.txt")));
        assert!(!app.state().should_quit);
    }

    #[test]
    fn test_file_input_empty_clears() {
        let mut app = App::new();
        app.state_mut().planner.select_files([PantryFile::new("a.txt")]);

        press(&mut app, KeyCode::Enter);
        for _ in 0.."a.txt".len() {
            press(&mut app, KeyCode::Backspace);
        }
        press(&mut app, KeyCode::Enter);
        assert!(app.state().planner.form().file.is_none());
    }

    #[test]
    fn test_diet_cycles_through_unset() {
        let mut app = App::new();
        goto(&mut app, FormRow::Diet);

        press(&mut app, KeyCode::Right);
        assert_eq!(app.state().planner.form().diet, Some(Diet::Omnivore));
        press(&mut app, KeyCode::Left);
        assert_eq!(app.state().planner.form().diet, None);
        press(&mut app, KeyCode::Char('h'));
        assert_eq!(app.state().planner.form().diet, Some(Diet::DairyFree));
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.state().planner.form().diet, None);
    }

    #[test]
    fn test_people_never_below_one() {
        let mut app = App::new();
        goto(&mut app, FormRow::People);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.state().planner.form().people, 1);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.state().planner.form().people, 3);
    }

    #[test]
    fn test_meal_and_pantry_toggles() {
        let mut app = App::new();
        goto(&mut app, FormRow::Meal(MealTime::Snack));
        press(&mut app, KeyCode::Char(' '));
        goto(&mut app, FormRow::Meal(MealTime::Brunch));
        press(&mut app, KeyCode::Enter);
        assert_eq!(
            app.state().planner.form().meal_times.selected().collect::<Vec<_>>(),
            vec![MealTime::Brunch, MealTime::Snack]
        );

        goto(&mut app, FormRow::PantryOption);
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.state().planner.form().pantry_option, PantryOption::AllowNew);
    }

    #[test]
    fn test_submit_incomplete_shows_validation_message() {
        let mut app = App::new();
        press(&mut app, KeyCode::Char('g'));

        assert!(app.state().pending_submission.is_none());
        assert!(!app.state().planner.is_loading());
        assert_eq!(app.state().planner.error(), Some(VALIDATION_ERROR_MESSAGE));
    }

    #[test]
    fn test_submit_parks_submission() {
        let mut app = App::new();
        fill_form(&mut app);
        goto(&mut app, FormRow::Generate);
        press(&mut app, KeyCode::Enter);

        let submission = app.state().pending_submission.as_ref().unwrap();
        assert_eq!(submission.file, PantryFile::new("pantry.txt"));
        assert_eq!(submission.diet, Diet::Omnivore);
        assert_eq!(submission.user_type, UserType::Student);
        assert!(app.state().planner.is_loading());
        assert!(app.state().loading_start.is_some());
    }

    #[test]
    fn test_submit_ignored_while_in_flight() {
        let mut app = App::new();
        fill_form(&mut app);
        press(&mut app, KeyCode::Char('g'));
        app.state_mut().pending_submission.take();

        press(&mut app, KeyCode::Char('g'));
        assert!(app.state().pending_submission.is_none());
        assert!(app.state().planner.error().is_none());
    }

    #[test]
    fn test_form_read_only_while_in_flight() {
        let mut app = App::new();
        fill_form(&mut app);
        press(&mut app, KeyCode::Char('g'));

        goto(&mut app, FormRow::Diet);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.state().planner.form().diet, Some(Diet::Omnivore));
    }

    #[test]
    fn test_complete_submission() {
        let mut app = App::new();
        fill_form(&mut app);
        press(&mut app, KeyCode::Char('g'));

        app.complete_submission(Err(GenerationError::MissingCredential {
            env: "GEMINI_API_KEY".to_string(),
        }));
        assert!(!app.state().planner.is_loading());
        assert!(app.state().loading_start.is_none());
        assert_eq!(app.state().planner.error(), Some(GENERATION_ERROR_MESSAGE));
        assert!(app.state().planner.can_submit());
    }

    #[test]
    fn test_cycle_helper() {
        let all = [1, 2, 3];
        assert_eq!(cycle(&all, None, true), Some(1));
        assert_eq!(cycle(&all, Some(3), true), None);
        assert_eq!(cycle(&all, Some(1), false), None);
        assert_eq!(cycle(&all, Some(2), false), Some(1));
        assert_eq!(cycle(&all, None, false), Some(3));
    }
}
