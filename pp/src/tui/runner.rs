//! TUI Runner - main loop that owns the terminal
//!
//! The TuiRunner is responsible for:
//! - Dispatching events to App for handling
//! - Spawning the generation task for a parked submission
//! - Feeding the result back to App when it arrives
//! - Rendering at ~30 FPS

use std::time::Duration;

use eyre::Result;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::Tui;
use super::app::App;
use super::events::{Event, EventHandler};
use super::views;
use crate::domain::Meal;
use crate::planner::{GenerationError, MealGenerator, Submission};

type GenerationResult = Result<Vec<Meal>, GenerationError>;

/// TUI Runner that manages the terminal and event loop
pub struct TuiRunner {
    /// Application state
    app: App,
    /// Terminal handle
    terminal: Tui,
    /// Event handler
    event_handler: EventHandler,
    /// Runs submissions
    generator: MealGenerator,
    /// Handle to the background generation task
    generation_task: Option<JoinHandle<GenerationResult>>,
}

impl TuiRunner {
    pub fn new(terminal: Tui, generator: MealGenerator) -> Self {
        debug!(has_client = generator.has_client(), "TuiRunner::new: called");
        Self {
            app: App::new(),
            terminal,
            event_handler: EventHandler::new(Duration::from_millis(33)), // ~30 FPS
            generator,
            generation_task: None,
        }
    }

    /// Run the TUI main loop
    pub async fn run(&mut self) -> Result<()> {
        debug!("TuiRunner::run: entering main loop");
        loop {
            self.terminal.draw(|frame| views::render(self.app.state(), frame))?;

            let generating = self.generation_task.is_some();
            tokio::select! {
                event = self.event_handler.next() => {
                    match event? {
                        Event::Tick => {}
                        Event::Key(key) => {
                            if self.app.handle_key(key) {
                                break;
                            }
                        }
                        Event::Resize(width, height) => {
                            debug!(width, height, "TuiRunner::run: resize");
                        }
                    }
                }
                result = join_generation(&mut self.generation_task), if generating => {
                    self.handle_result(result);
                }
            }

            if let Some(submission) = self.app.state_mut().pending_submission.take() {
                self.start_generation(submission);
            }

            if self.app.state().should_quit {
                debug!("TuiRunner::run: should_quit is true, breaking");
                break;
            }
        }

        if let Some(task) = self.generation_task.take() {
            debug!("TuiRunner::run: dropping in-flight generation");
            task.abort();
        }
        debug!("TuiRunner::run: exiting");
        Ok(())
    }

    /// Spawn the generation pipeline for a submission
    fn start_generation(&mut self, submission: Submission) {
        debug!(?submission, "TuiRunner::start_generation: called");
        info!("Starting meal plan generation");
        let generator = self.generator.clone();

        self.generation_task = Some(tokio::spawn(async move { generator.generate(&submission).await }));
    }

    fn handle_result(&mut self, result: GenerationResult) {
        debug!(ok = result.is_ok(), "TuiRunner::handle_result: called");
        self.app.complete_submission(result);
    }
}

/// Wait for the generation task and take its result
///
/// A task that panicked or was cancelled still yields an error, so the form
/// always leaves the loading state. Dropping this future leaves the handle in
/// place for the next loop iteration.
async fn join_generation(task: &mut Option<JoinHandle<GenerationResult>>) -> GenerationResult {
    let Some(handle) = task.as_mut() else {
        return std::future::pending().await;
    };
    let result = match handle.await {
        Ok(result) => result,
        Err(e) => {
            warn!("Generation task ended without a result: {}", e);
            Err(GenerationError::Task(e.to_string()))
        }
    };
    *task = None;
    result
}
