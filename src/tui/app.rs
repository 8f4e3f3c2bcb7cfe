//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation
//! - Input event handling
//! - Synchronous evaluation of the submitted form

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::{LogisticClassifier, StandardScaler};
use crate::application::{Evaluation, RiskEvaluator};

use super::ui::{
    form::{render_feature_form, FeatureFormState},
    render_disclaimer,
    result::render_result,
};

/// Evaluator over the JSON artifacts shipped with the application.
pub type ArtifactEvaluator = RiskEvaluator<StandardScaler, LogisticClassifier>;

/// Current screen/view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Form,
    Result,
}

/// Main application state
pub struct App {
    /// Current screen
    screen: Screen,

    /// Whether the app should quit
    should_quit: bool,

    evaluator: ArtifactEvaluator,

    /// Feature form state
    form_state: FeatureFormState,

    /// Outcome of the last prediction
    last_evaluation: Option<Evaluation>,
}

impl App {
    /// Create the application around a loaded evaluator.
    #[must_use]
    pub fn new(evaluator: ArtifactEvaluator) -> Self {
        Self {
            screen: Screen::Form,
            should_quit: false,
            evaluator,
            form_state: FeatureFormState::default(),
            last_evaluation: None,
        }
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    #[must_use]
    pub fn last_evaluation(&self) -> Option<&Evaluation> {
        self.last_evaluation.as_ref()
    }

    #[must_use]
    pub fn form_state(&self) -> &FeatureFormState {
        &self.form_state
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Main loop
        let result = self.main_loop(&mut terminal);

        // Wipe inputs before handing the terminal back.
        self.form_state.clear_sensitive();
        self.last_evaluation = None;

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| {
                let area = f.area();
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(area);

                let content_area = chunks[0];
                let disclaimer_area = chunks[1];

                match (self.screen, &self.last_evaluation) {
                    (Screen::Result, Some(evaluation)) => render_result(
                        f,
                        content_area,
                        evaluation,
                        self.evaluator.feature_order(),
                    ),
                    _ => render_feature_form(f, content_area, &self.form_state),
                }

                render_disclaimer(f, disclaimer_area);
            })?;

            // Handle input (short poll to stay responsive)
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Form => self.handle_form_key(key),
            Screen::Result => self.handle_result_key(key),
        }
    }

    fn handle_form_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Up | KeyCode::BackTab => {
                self.form_state.prev_field();
            }
            KeyCode::Down | KeyCode::Tab => {
                self.form_state.next_field();
            }
            KeyCode::Left => {
                self.form_state.decrement();
            }
            KeyCode::Right => {
                self.form_state.increment();
            }
            KeyCode::Char('d') | KeyCode::Char('D') => {
                self.form_state.reset_defaults();
            }
            KeyCode::Char(c) => {
                self.form_state.input_char(c);
            }
            KeyCode::Backspace => {
                self.form_state.delete_char();
            }
            KeyCode::Delete => {
                self.form_state.clear_field();
            }
            KeyCode::Enter => {
                self.submit_form();
            }
            _ => {}
        }
    }

    fn handle_result_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter | KeyCode::Esc => {
                self.screen = Screen::Form;
            }
            KeyCode::Char('n') | KeyCode::Char('N') => {
                self.form_state.reset_defaults();
                self.last_evaluation = None;
                self.screen = Screen::Form;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    fn submit_form(&mut self) {
        let features = match self.form_state.to_clinical_features() {
            Ok(features) => features,
            Err(e) => {
                self.form_state.error_message = Some(e);
                return;
            }
        };

        match self.evaluator.evaluate(&features.to_record()) {
            Ok(evaluation) => {
                self.form_state.error_message = None;
                self.last_evaluation = Some(evaluation);
                self.screen = Screen::Result;
            }
            Err(e) => {
                tracing::error!("Prediction failed: {}", e);
                self.form_state.error_message = Some(format!("Prediction failed: {e}"));
            }
        }
    }
}
