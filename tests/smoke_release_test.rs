//! The release gate: packs this checkout for real, downloads the example
//! projects, and runs them against the package registry.
//!
//! Needs network access, the package manager on `PATH`, and a project
//! directory to pack (`PLATKIT_SMOKE_PROJECT`, defaulting to the current
//! directory). Run with `cargo test --test smoke_release_test -- --ignored`.

use std::path::PathBuf;

use platkit::config::load_smoke_config;
use platkit::smoke::SmokeTest;

#[test]
#[ignore = "packs and installs real packages; run as a release gate"]
fn release_smoke_test() {
    platkit::diagnostics::init(false);

    let project = std::env::var_os("PLATKIT_SMOKE_PROJECT")
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::current_dir().unwrap());
    let config = load_smoke_config(&project).unwrap();

    let report = SmokeTest::new(config, project).unwrap().run().unwrap();
    println!("{}", report);

    if let Err(e) = report.into_result() {
        panic!("{}", e);
    }
}
