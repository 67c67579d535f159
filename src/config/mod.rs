//! Configuration loading, parsing, and validation for the smoke test.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use platkit::config::load_smoke_config_from;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::create_dir_all(temp.path().join(".platkit")).unwrap();
//! fs::write(temp.path().join(".platkit/smoke.yml"), "examples: [trigger]").unwrap();
//!
//! let config = load_smoke_config_from(temp.path(), None).unwrap();
//! assert_eq!(config.examples, vec!["trigger"]);
//! ```
//!
//! # Configuration File Locations
//!
//! 1. The file named by `PLATKIT_SMOKE_CONFIG`, if set
//! 2. Project config (`.platkit/smoke.yml`)
//! 3. Built-in defaults

pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::{
    load_config_file, load_smoke_config, load_smoke_config_from, parse_config,
    project_config_path, CONFIG_ENV,
};
pub use schema::SmokeConfig;
pub use validator::{validate, validate_config, ValidationError};
