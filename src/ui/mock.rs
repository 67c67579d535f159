//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion. It can be configured with
//! pre-determined prompt responses.
//!
//! # Example
//!
//! ```
//! use platkit::ui::{MockUI, Prompt, PromptType, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.set_prompt_response("deploy_key", "abc123");
//!
//! let answer = ui.prompt(&Prompt::new("Deploy key", PromptType::Password)).unwrap();
//! assert_eq!(answer.as_string(), "abc123");
//! assert_eq!(ui.prompts_shown(), &["deploy_key"]);
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::Result;

use super::{parse_bool_answer, Prompt, PromptResult, PromptType, SpinnerHandle, UserInterface};

/// Final state of a spinner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinnerStatus {
    /// Still spinning.
    Running,
    /// Finished successfully.
    Success,
    /// Finished with error.
    Error,
}

/// One spinner started through a [`MockUI`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpinnerRecord {
    /// Message the spinner was started with.
    pub message: String,
    /// Current status.
    pub status: SpinnerStatus,
    /// Message passed to the finish call.
    pub finish_message: Option<String>,
}

/// Mock UI implementation for testing.
#[derive(Debug, Default)]
pub struct MockUI {
    interactive: bool,
    output: Vec<String>,
    errors: Vec<String>,
    spinners: Rc<RefCell<Vec<SpinnerRecord>>>,
    prompt_responses: HashMap<String, String>,
    prompts_shown: Vec<String>,
}

impl MockUI {
    /// Create a new MockUI.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a response for a prompt key.
    pub fn set_prompt_response(&mut self, key: &str, response: &str) {
        self.prompt_responses
            .insert(key.to_string(), response.to_string());
    }

    /// Set whether this UI reports itself as interactive.
    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    /// Lines printed to stdout.
    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// Everything printed to stdout, joined by newlines.
    pub fn output_text(&self) -> String {
        self.output.join("\n")
    }

    /// Error messages.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Keys of the prompts that were shown, in order.
    pub fn prompts_shown(&self) -> &[String] {
        &self.prompts_shown
    }

    /// Snapshot of every spinner started so far.
    pub fn spinners(&self) -> Vec<SpinnerRecord> {
        self.spinners.borrow().clone()
    }
}

impl UserInterface for MockUI {
    fn print(&mut self, text: &str) {
        self.output.push(text.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        self.prompts_shown.push(prompt.key.clone());

        let answer = self
            .prompt_responses
            .get(&prompt.key)
            .or(prompt.default.as_ref())
            .cloned()
            .unwrap_or_default();

        Ok(match prompt.prompt_type {
            PromptType::Confirm => PromptResult::Bool(parse_bool_answer(&answer)),
            PromptType::Input | PromptType::Password => PromptResult::String(answer),
        })
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        let mut spinners = self.spinners.borrow_mut();
        spinners.push(SpinnerRecord {
            message: message.to_string(),
            status: SpinnerStatus::Running,
            finish_message: None,
        });
        Box::new(MockSpinner {
            index: spinners.len() - 1,
            log: Rc::clone(&self.spinners),
        })
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

/// Mock spinner that writes its state back to the owning [`MockUI`].
#[derive(Debug)]
pub struct MockSpinner {
    index: usize,
    log: Rc<RefCell<Vec<SpinnerRecord>>>,
}

impl MockSpinner {
    fn finish(&mut self, status: SpinnerStatus, msg: &str) {
        if let Some(record) = self.log.borrow_mut().get_mut(self.index) {
            record.status = status;
            record.finish_message = Some(msg.to_string());
        }
    }
}

impl SpinnerHandle for MockSpinner {
    fn set_message(&mut self, msg: &str) {
        if let Some(record) = self.log.borrow_mut().get_mut(self.index) {
            record.message = msg.to_string();
        }
    }

    fn finish_success(&mut self, msg: &str) {
        self.finish(SpinnerStatus::Success, msg);
    }

    fn finish_error(&mut self, msg: &str) {
        self.finish(SpinnerStatus::Error, msg);
    }
}
