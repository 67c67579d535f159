//! Per-invocation state and the output helpers every command shares.
//!
//! [`Invocation`] is what was typed: the command id, its flags, and its
//! positional arguments. [`CommandContext`] wraps an invocation together
//! with the UI and gives commands one place to print, prompt, and spin.
//!
//! All human-readable prose goes through [`CommandContext::log`], which is
//! silent while a strict-data format (`json`, `raw`) is selected.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use clap::ArgMatches;
use serde::Serialize;
use serde_json::Value;

use crate::error::{PlatkitError, Result};
use crate::ui::{is_strict_data, Formatter, Prompt, PromptType, SpinnerHandle, UserInterface};

/// Parsed flags for one command run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flags {
    /// Selected output format, if the command declares one.
    pub format: Option<String>,
    /// Whether `--debug` was given.
    pub debug: bool,
    /// Every named flag's raw value, keyed by flag id.
    pub values: BTreeMap<String, String>,
}

impl Flags {
    /// Raw value of a named flag.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

/// The parsed flags and positional arguments of one command run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    /// Command identity (`login`, `link`, ...).
    pub id: String,
    /// Named flags.
    pub flags: Flags,
    /// Positional arguments in declaration order.
    pub args: Vec<String>,
}

impl Invocation {
    /// Build an invocation with no flags or arguments.
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Default::default()
        }
    }

    /// Set the output format.
    pub fn with_format(mut self, format: &str) -> Self {
        self.flags.format = Some(format.to_string());
        self.flags
            .values
            .insert("format".to_string(), format.to_string());
        self
    }

    /// Set the debug flag.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.flags.debug = debug;
        self
    }

    /// Collect flags and arguments for subcommand `id` from clap matches.
    ///
    /// `schema` is the subcommand's definition; it tells positionals apart
    /// from flags. `debug` is the global flag, which lives on the root.
    pub fn from_matches(
        id: &str,
        schema: &clap::Command,
        matches: &ArgMatches,
        debug: bool,
    ) -> Self {
        let mut invocation = Self::new(id).with_debug(debug);

        for arg in schema.get_arguments() {
            let name = arg.get_id().as_str();
            let values: Vec<String> = match matches.try_get_raw(name) {
                Ok(Some(raw)) => raw.map(|v| v.to_string_lossy().into_owned()).collect(),
                _ => continue,
            };
            if values.is_empty() {
                continue;
            }
            if arg.is_positional() {
                invocation.args.extend(values);
            } else {
                invocation.flags.values.insert(name.to_string(), values.join(","));
            }
        }

        invocation.flags.format = invocation.flags.values.get("format").cloned();
        invocation
    }
}

/// A running spinner and the label it was started with.
struct ActiveSpinner {
    label: String,
    handle: Box<dyn SpinnerHandle>,
}

/// Everything a command's `perform` step can use.
pub struct CommandContext<'a> {
    invocation: Invocation,
    ui: &'a mut dyn UserInterface,
    cwd: PathBuf,
    home: Option<PathBuf>,
    spinner: Option<ActiveSpinner>,
}

impl<'a> CommandContext<'a> {
    /// Create a context for `invocation` running in `cwd`.
    pub fn new(invocation: Invocation, ui: &'a mut dyn UserInterface, cwd: PathBuf) -> Self {
        Self {
            invocation,
            ui,
            cwd,
            home: dirs::home_dir(),
            spinner: None,
        }
    }

    /// Override the home directory (credential files live there).
    pub fn with_home(mut self, home: PathBuf) -> Self {
        self.home = Some(home);
        self
    }

    /// The parsed invocation.
    pub fn invocation(&self) -> &Invocation {
        &self.invocation
    }

    /// Parsed flags.
    pub fn flags(&self) -> &Flags {
        &self.invocation.flags
    }

    /// Positional arguments.
    pub fn args(&self) -> &[String] {
        &self.invocation.args
    }

    /// Directory the command runs against.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// The user's home directory.
    pub fn home(&self) -> Result<&Path> {
        self.home.as_deref().ok_or_else(|| PlatkitError::Usage {
            message: "Could not determine your home directory".to_string(),
        })
    }

    /// Whether human-readable prose should be printed.
    pub fn prints_prose(&self) -> bool {
        !is_strict_data(self.invocation.flags.format.as_deref())
    }

    /// Print a human-readable message. Silent in strict-data formats.
    pub fn log(&mut self, message: &str) {
        if self.prints_prose() {
            self.ui.print(message);
        }
    }

    /// Print a value regardless of format: strings verbatim, anything else
    /// as indented JSON.
    pub fn log_json<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        let text = match serde_json::to_value(value)? {
            Value::String(s) => s,
            other => serde_json::to_string_pretty(&other)?,
        };
        self.ui.print(&text);
        Ok(())
    }

    /// Print records using the selected format.
    ///
    /// `headers` are `(label, key)` pairs. With `row_based` the row
    /// formatter is used whatever the format. With no rows, human formats
    /// print `empty_message`; strict-data formats still print (e.g. `[]`).
    pub fn log_table(
        &mut self,
        rows: &[Value],
        headers: &[(&str, &str)],
        empty_message: &str,
        row_based: bool,
    ) -> Result<()> {
        let format = self.invocation.flags.format.clone().unwrap_or_default();
        let formatter = if row_based {
            Some(Formatter::Row)
        } else {
            Formatter::by_name(&format)
        };
        let Some(formatter) = formatter else {
            return Err(PlatkitError::InvalidFormat { format });
        };

        if rows.is_empty() && self.prints_prose() {
            self.log(empty_message);
        } else {
            let rendered = formatter.render(rows, headers)?;
            self.ui.print(&rendered);
        }
        Ok(())
    }

    /// Ask a free-text question.
    pub fn prompt(&mut self, question: &str) -> Result<String> {
        let prompt = Prompt::new(question, PromptType::Input);
        Ok(self.ui.prompt(&prompt)?.as_string())
    }

    /// Ask a question whose answer is masked.
    pub fn prompt_hidden(&mut self, question: &str) -> Result<String> {
        let prompt = Prompt::new(question, PromptType::Password);
        Ok(self.ui.prompt(&prompt)?.as_string())
    }

    /// Ask a yes/no question.
    pub fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        let prompt = Prompt::new(question, PromptType::Confirm).with_default(default.to_string());
        let answer = self.ui.prompt(&prompt)?;
        Ok(answer.as_bool().unwrap_or(default))
    }

    /// Start a spinner, finishing any spinner already running.
    pub fn start_spinner(&mut self, message: &str) {
        self.stop_spinner(true, None);
        let handle = self.ui.start_spinner(message);
        self.spinner = Some(ActiveSpinner {
            label: message.to_string(),
            handle,
        });
    }

    /// Stop the running spinner, if any.
    ///
    /// The final line is the spinner's label followed by `message`, or by
    /// `done`/`failed` when no message is given.
    pub fn stop_spinner(&mut self, success: bool, message: Option<&str>) {
        let Some(mut spinner) = self.spinner.take() else {
            return;
        };
        let tail = message.unwrap_or(if success { "done" } else { "failed" });
        let line = format!("{} {}", spinner.label, tail);
        if success {
            spinner.handle.finish_success(&line);
        } else {
            spinner.handle.finish_error(&line);
        }
    }

    /// Whether a spinner is running.
    pub fn spinner_active(&self) -> bool {
        self.spinner.is_some()
    }

    /// The UI, for output the helpers above don't cover.
    pub fn ui(&mut self) -> &mut dyn UserInterface {
        &mut *self.ui
    }
}
