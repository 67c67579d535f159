//! Interactive terminal UI.

use console::Term;
use std::io::Write;

use crate::error::Result;

use super::{
    prompt_user, NonInteractiveUI, PlatkitTheme, ProgressSpinner, Prompt, PromptResult,
    SpinnerHandle, UserInterface,
};

/// Interactive terminal UI implementation.
pub struct TerminalUI {
    out: Term,
    err: Term,
    theme: PlatkitTheme,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new() -> Self {
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            theme: PlatkitTheme::detect(),
        }
    }
}

impl Default for TerminalUI {
    fn default() -> Self {
        Self::new()
    }
}

impl UserInterface for TerminalUI {
    fn print(&mut self, text: &str) {
        writeln!(self.out, "{}", text).ok();
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_error(msg)).ok();
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        prompt_user(prompt, &self.err)
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.err.is_term() {
            Box::new(ProgressSpinner::new(message))
        } else {
            Box::new(ProgressSpinner::hidden())
        }
    }

    fn is_interactive(&self) -> bool {
        self.err.is_term()
    }
}

/// Create the appropriate UI based on interactivity.
pub fn create_ui(interactive: bool) -> Box<dyn UserInterface> {
    if interactive && Term::stderr().is_term() {
        Box::new(TerminalUI::new())
    } else {
        Box::new(NonInteractiveUI::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_ui_non_interactive() {
        let ui = create_ui(false);
        assert!(!ui.is_interactive());
    }
}
