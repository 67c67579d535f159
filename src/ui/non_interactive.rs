//! Non-interactive UI for CI/headless environments.

use std::collections::HashMap;

use crate::error::{PlatkitError, Result};

use super::{
    parse_bool_answer, Prompt, PromptResult, PromptType, SpinnerHandle, UserInterface,
};

const PROMPT_ENV_PREFIX: &str = "PLATKIT_PROMPT_";

/// UI implementation for non-interactive mode.
///
/// Prompts are answered from `PLATKIT_PROMPT_<KEY>` environment variables,
/// then from the prompt's default. A prompt with neither is an error.
pub struct NonInteractiveUI {
    env_overrides: HashMap<String, String>,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI reading overrides from the environment.
    pub fn new() -> Self {
        let env_overrides: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with(PROMPT_ENV_PREFIX))
            .collect();

        Self { env_overrides }
    }

    /// Create with explicit overrides (for testing).
    pub fn with_overrides(overrides: HashMap<String, String>) -> Self {
        Self {
            env_overrides: overrides,
        }
    }
}

impl Default for NonInteractiveUI {
    fn default() -> Self {
        Self::new()
    }
}

impl UserInterface for NonInteractiveUI {
    fn print(&mut self, text: &str) {
        println!("{}", text);
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        let env_key = format!("{}{}", PROMPT_ENV_PREFIX, prompt.key.to_uppercase());
        let answer = self
            .env_overrides
            .get(&env_key)
            .or(prompt.default.as_ref())
            .ok_or_else(|| PlatkitError::Usage {
                message: format!(
                    "Cannot ask \"{}\" in non-interactive mode; set {}",
                    prompt.question, env_key
                ),
            })?;

        Ok(match prompt.prompt_type {
            PromptType::Confirm => PromptResult::Bool(parse_bool_answer(answer)),
            PromptType::Input | PromptType::Password => PromptResult::String(answer.clone()),
        })
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        eprintln!("{}", message);
        Box::new(LineSpinner)
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Spinner stand-in that reports only the final status line.
struct LineSpinner;

impl SpinnerHandle for LineSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        eprintln!("✓ {}", msg);
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }
}
