//! TUI application state
//!
//! Pure data structures for the TUI. No rendering logic here.

use std::time::Instant;

use rand::seq::IndexedRandom;
use tracing::debug;

use crate::domain::MealTime;
use crate::planner::{PlannerForm, Submission};

/// Words for the loading indicator
pub const LOADING_WORDS: &[&str] = &[
    "Simmering",
    "Chopping",
    "Whisking",
    "Seasoning",
    "Marinating",
    "Stirring",
    "Tasting",
    "Plating",
    "Kneading",
    "Braising",
];

/// One selectable row of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormRow {
    File,
    Diet,
    UserType,
    People,
    Meal(MealTime),
    PantryOption,
    Generate,
}

impl FormRow {
    /// Rows in display order
    pub const ALL: [FormRow; 11] = [
        Self::File,
        Self::Diet,
        Self::UserType,
        Self::People,
        Self::Meal(MealTime::Breakfast),
        Self::Meal(MealTime::Brunch),
        Self::Meal(MealTime::Lunch),
        Self::Meal(MealTime::Snack),
        Self::Meal(MealTime::Dinner),
        Self::PantryOption,
        Self::Generate,
    ];

    /// Label shown to the left of the value
    pub fn label(&self) -> &'static str {
        match self {
            Self::File => "Pantry file",
            Self::Diet => "Diet",
            Self::UserType => "User type",
            Self::People => "People",
            Self::Meal(MealTime::Breakfast) => "Meal times",
            Self::Meal(_) => "",
            Self::PantryOption => "Ingredients",
            Self::Generate => "Generate",
        }
    }
}

/// Interaction mode (modal)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InteractionMode {
    /// Form navigation
    #[default]
    Normal,
    /// Typing a pantry file path
    FileInput(String),
    /// Help overlay
    Help,
}

impl InteractionMode {
    /// Get the input buffer if in an input mode
    pub fn input_buffer(&self) -> Option<&str> {
        match self {
            Self::FileInput(s) => Some(s),
            _ => None,
        }
    }

    /// Get mutable input buffer
    pub fn input_buffer_mut(&mut self) -> Option<&mut String> {
        match self {
            Self::FileInput(s) => Some(s),
            _ => None,
        }
    }
}

/// Main application state
#[derive(Debug, Default)]
pub struct AppState {
    /// The planner form being edited
    pub planner: PlannerForm,
    /// Index into `FormRow::ALL`
    pub selected_row: usize,
    pub interaction_mode: InteractionMode,
    pub should_quit: bool,

    /// Submission waiting for the runner to pick up
    pub pending_submission: Option<Submission>,

    /// Word for the loading indicator
    pub loading_word: String,
    /// When the current request started (for elapsed time display)
    pub loading_start: Option<Instant>,

    /// Results pane scroll offset in lines
    pub results_scroll: u16,
}

impl AppState {
    pub fn new() -> Self {
        debug!("AppState::new: called");
        Self::default()
    }

    /// Currently highlighted form row
    pub fn current_row(&self) -> FormRow {
        FormRow::ALL[self.selected_row.min(FormRow::ALL.len() - 1)]
    }

    pub fn select_next(&mut self) {
        if self.selected_row + 1 < FormRow::ALL.len() {
            self.selected_row += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected_row = self.selected_row.saturating_sub(1);
    }

    /// Start the loading indicator for a new request
    pub fn start_loading(&mut self) {
        debug!("AppState::start_loading: called");
        let mut rng = rand::rng();
        self.loading_word = LOADING_WORDS.choose(&mut rng).unwrap_or(&"Simmering").to_string();
        self.loading_start = Some(Instant::now());
        self.results_scroll = 0;
    }

    pub fn stop_loading(&mut self) {
        debug!("AppState::stop_loading: called");
        self.loading_start = None;
    }

    /// Whole seconds since the current request started
    pub fn loading_elapsed_secs(&self) -> u64 {
        self.loading_start.map(|start| start.elapsed().as_secs()).unwrap_or(0)
    }

    pub fn scroll_results_up(&mut self, lines: u16) {
        self.results_scroll = self.results_scroll.saturating_sub(lines);
    }

    pub fn scroll_results_down(&mut self, lines: u16) {
        self.results_scroll = self.results_scroll.saturating_add(lines);
    }
}
