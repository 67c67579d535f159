//! Configuration validation rules.
//!
//! Collects every problem instead of stopping at the first one, so a bad
//! file can be fixed in one pass.

use crate::config::schema::SmokeConfig;
use crate::error::{PlatkitError, Result};

/// Validation error with context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Field the rule applies to
    pub field: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Validate a configuration and return all errors.
pub fn validate_config(config: &SmokeConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let required = [
        ("package_name", &config.package_name),
        ("cli_name", &config.cli_name),
        ("package_manager", &config.package_manager),
        ("archive_url", &config.archive_url),
        ("examples_prefix", &config.examples_prefix),
        ("registry_url", &config.registry_url),
        ("skip_install_env", &config.skip_install_env),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            errors.push(ValidationError::new(field, format!("'{}' must not be empty", field)));
        }
    }

    if config.pack_command.first().map_or(true, |p| p.trim().is_empty()) {
        errors.push(ValidationError::new(
            "pack_command",
            "'pack_command' must name a program",
        ));
    }

    if !(0.0..1.0).contains(&config.size_tolerance) {
        errors.push(ValidationError::new(
            "size_tolerance",
            format!(
                "'size_tolerance' must be at least 0 and below 1, got {}",
                config.size_tolerance
            ),
        ));
    }

    if config.examples.is_empty() {
        errors.push(ValidationError::new(
            "examples",
            "'examples' must list at least one example project",
        ));
    }
    for name in &config.examples {
        if name.is_empty() || name.contains('/') || name.contains('\\') || name == ".." {
            errors.push(ValidationError::new(
                "examples",
                format!("'{}' is not a valid example project name", name),
            ));
        }
    }

    errors
}

/// Validate a configuration, failing with every problem found.
pub fn validate(config: &SmokeConfig) -> Result<()> {
    let errors = validate_config(config);

    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<_> = errors.iter().map(|e| e.message.clone()).collect();
        Err(PlatkitError::ConfigValidationError {
            message: messages.join("; "),
        })
    }
}
