//! Interactive prompts.

use console::{style, Term};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Password};

use crate::error::{PlatkitError, Result};

use super::{parse_bool_answer, Prompt, PromptResult, PromptType};

/// Convert dialoguer errors to PlatkitError.
fn map_dialoguer_err(e: dialoguer::Error) -> PlatkitError {
    PlatkitError::Io(e.into())
}

/// Dialoguer theme without the default yellow `?` prefix.
fn prompt_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style("".to_string()),
        ..ColorfulTheme::default()
    }
}

/// Prompt the user for input.
///
/// Every question type goes through here; the [`PromptType`] decides how
/// the answer is read.
pub fn prompt_user(prompt: &Prompt, term: &Term) -> Result<PromptResult> {
    match prompt.prompt_type {
        PromptType::Input => prompt_input(prompt, term),
        PromptType::Password => prompt_password(prompt, term),
        PromptType::Confirm => prompt_confirm(prompt, term),
    }
}

fn prompt_input(prompt: &Prompt, term: &Term) -> Result<PromptResult> {
    let theme = prompt_theme();
    let input = Input::<String>::with_theme(&theme).with_prompt(&prompt.question);

    let result: String = if let Some(default) = &prompt.default {
        input
            .default(default.clone())
            .interact_on(term)
            .map_err(map_dialoguer_err)?
    } else {
        input.interact_on(term).map_err(map_dialoguer_err)?
    };

    Ok(PromptResult::String(result))
}

fn prompt_password(prompt: &Prompt, term: &Term) -> Result<PromptResult> {
    let theme = prompt_theme();
    let result = Password::with_theme(&theme)
        .with_prompt(&prompt.question)
        .interact_on(term)
        .map_err(map_dialoguer_err)?;

    Ok(PromptResult::String(result))
}

fn prompt_confirm(prompt: &Prompt, term: &Term) -> Result<PromptResult> {
    let default = prompt
        .default
        .as_deref()
        .map(parse_bool_answer)
        .unwrap_or(false);

    let theme = prompt_theme();
    let result = Confirm::with_theme(&theme)
        .with_prompt(&prompt.question)
        .default(default)
        .interact_on(term)
        .map_err(map_dialoguer_err)?;

    Ok(PromptResult::Bool(result))
}
