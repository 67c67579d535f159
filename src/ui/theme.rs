//! Visual theme and styling.

use console::Style;

/// Terminal styles used by platkit output.
#[derive(Debug, Clone)]
pub struct PlatkitTheme {
    /// Style for success messages (green).
    pub success: Style,
    /// Style for error messages (red bold).
    pub error: Style,
    /// Style for dim/secondary text, such as the `--debug` hint.
    pub dim: Style,
}

impl Default for PlatkitTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatkitTheme {
    /// Create the default theme.
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            error: Style::new().red().bold(),
            dim: Style::new().dim(),
        }
    }

    /// Create a theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            error: Style::new(),
            dim: Style::new(),
        }
    }

    /// Pick [`PlatkitTheme::new`] or [`PlatkitTheme::plain`] for the terminal.
    pub fn detect() -> Self {
        if should_use_colors() {
            Self::new()
        } else {
            Self::plain()
        }
    }

    /// Format a success message (icon + text in green).
    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    /// Format an error message (icon + text in red bold).
    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }

    /// Format secondary text.
    pub fn format_dim(&self, msg: &str) -> String {
        format!("{}", self.dim.apply_to(msg))
    }
}

/// Check if colors should be used.
pub fn should_use_colors() -> bool {
    // https://no-color.org/
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    console::Term::stdout().is_term()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_formats_success() {
        let theme = PlatkitTheme::plain();
        assert_eq!(theme.format_success("Logged in"), "✓ Logged in");
    }

    #[test]
    fn theme_formats_error() {
        let theme = PlatkitTheme::plain();
        assert_eq!(theme.format_error("Failed"), "✗ Failed");
    }

    #[test]
    fn plain_theme_dim_is_verbatim() {
        let theme = PlatkitTheme::plain();
        assert_eq!(theme.format_dim("hint"), "hint");
    }
}
