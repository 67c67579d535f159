//! End-to-end smoke-test runs against a mock registry and archive host,
//! with child processes answered by a scripted runner.

use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use std::rc::Rc;

use httpmock::prelude::*;
use platkit::config::SmokeConfig;
use platkit::smoke::{CheckOutcome, ProcessSpec, ScriptedRunner, SmokeEnv, SmokeTest};
use platkit::PlatkitError;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

const ARTIFACT: &str = "platkit-core-1.4.0.tgz";
const ARTIFACT_SIZE: usize = 1_000_000;

fn snapshot() -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    writer.add_directory("platkit-main/", options).unwrap();
    writer
        .start_file("platkit-main/README.md", options)
        .unwrap();
    writer.write_all(b"# platkit").unwrap();
    for app in ["basic-auth", "create", "trigger"] {
        writer
            .start_file(format!("platkit-main/example-apps/{app}/package.json"), options)
            .unwrap();
        writer.write_all(br#"{"dependencies":{}}"#).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

struct Fixture {
    server: MockServer,
    project: TempDir,
    home: TempDir,
    temp_base: TempDir,
}

impl Fixture {
    fn new(baseline_size: usize) -> Self {
        let server = MockServer::start();
        let body = snapshot();
        server.mock(|when, then| {
            when.method(GET).path("/archive/main.zip");
            then.status(200).body(body.clone());
        });
        server.mock(|when, then| {
            when.method(GET).path("/platkit-core");
            then.status(200)
                .body(r#"{"dist-tags":{"latest":"1.3.0"}}"#);
        });
        server.mock(|when, then| {
            when.method(httpmock::Method::HEAD).path("/platkit-core/-/platkit-core-1.3.0.tgz");
            then.status(200)
                .header("content-length", baseline_size.to_string())
                .body(vec![0u8; baseline_size]);
        });

        Self {
            server,
            project: TempDir::new().unwrap(),
            home: TempDir::new().unwrap(),
            temp_base: TempDir::new().unwrap(),
        }
    }

    fn config(&self) -> SmokeConfig {
        SmokeConfig {
            archive_url: self.server.url("/archive/main.zip"),
            registry_url: self.server.base_url(),
            ..Default::default()
        }
    }

    fn smoke_test(&self, env: SmokeEnv, runner: Rc<ScriptedRunner>) -> SmokeTest {
        SmokeTest::new(self.config(), self.project.path().to_path_buf())
            .unwrap()
            .with_runner(Box::new(runner))
            .with_env(env)
            .with_home(self.home.path().to_path_buf())
            .with_temp_base(self.temp_base.path().to_path_buf())
    }

    fn artifact_path(&self) -> std::path::PathBuf {
        self.project.path().join(ARTIFACT)
    }

    fn workspace_count(&self) -> usize {
        fs::read_dir(self.temp_base.path()).unwrap().count()
    }
}

/// Packs a fixed-size artifact; every other process exits with
/// `exit_for(spec)`.
fn runner(exit_for: impl Fn(&ProcessSpec) -> i32 + 'static) -> Rc<ScriptedRunner> {
    Rc::new(ScriptedRunner::new(move |spec| {
        if spec.args == ["pack"] {
            let dir = spec.cwd.clone().unwrap();
            fs::write(dir.join(ARTIFACT), vec![7u8; ARTIFACT_SIZE]).unwrap();
            return Ok(ScriptedRunner::exit(0, &format!("npm notice\n{ARTIFACT}\n")));
        }
        Ok(ScriptedRunner::exit(exit_for(spec), ""))
    }))
}

fn example_of(spec: &ProcessSpec) -> Option<String> {
    spec.cwd
        .as_deref()
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().into_owned())
}

#[test]
fn equal_size_passes_and_cleans_up() {
    let fixture = Fixture::new(1_000_000);
    let runner = runner(|_| 0);

    let report = fixture
        .smoke_test(SmokeEnv::default(), Rc::clone(&runner))
        .run()
        .unwrap();

    assert_eq!(report.size, 1_000_000);
    assert_eq!(report.baseline_version, "1.3.0");
    assert_eq!(report.artifact.version, "1.4.0");
    let names: Vec<&str> = report.examples.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["basic-auth", "create", "trigger"]);
    assert!(report.clone().into_result().is_ok());

    assert!(!fixture.artifact_path().exists());
    assert_eq!(fixture.workspace_count(), 0);
}

#[test]
fn half_size_fails_before_examples() {
    let fixture = Fixture::new(2_000_000);
    let runner = runner(|_| 0);

    let err = fixture
        .smoke_test(SmokeEnv::default(), Rc::clone(&runner))
        .run()
        .unwrap_err();

    assert!(matches!(err, PlatkitError::SizeRegression { .. }));
    assert_eq!(runner.calls().len(), 1);
    assert!(!fixture.artifact_path().exists());
    assert_eq!(fixture.workspace_count(), 0);
}

#[test]
fn failing_trigger_does_not_stop_other_examples() {
    let fixture = Fixture::new(1_000_000);
    let runner = runner(|spec| {
        if spec.args == ["test"] && example_of(spec).as_deref() == Some("trigger") {
            1
        } else {
            0
        }
    });

    let report = fixture
        .smoke_test(SmokeEnv::default(), Rc::clone(&runner))
        .run()
        .unwrap();

    assert_eq!(report.failed_examples(), vec!["trigger"]);
    let tested: Vec<String> = runner
        .calls()
        .iter()
        .filter(|c| c.args == ["test"])
        .filter_map(example_of)
        .collect();
    assert_eq!(tested, vec!["basic-auth", "create", "trigger"]);

    let err = report.into_result().unwrap_err();
    assert_eq!(err.to_string(), "Example projects failed: trigger");
}

#[test]
fn build_is_skipped_without_app_credentials() {
    let fixture = Fixture::new(1_000_000);
    let runner = runner(|_| 0);

    let report = fixture
        .smoke_test(SmokeEnv::default(), Rc::clone(&runner))
        .run()
        .unwrap();

    for example in &report.examples {
        assert!(matches!(example.build, CheckOutcome::Skipped { .. }));
        assert!(example.passed());
    }
    assert!(runner.calls().iter().all(|c| c.args != ["build"]));
}

#[test]
fn build_runs_with_app_credentials() {
    let fixture = Fixture::new(1_000_000);
    let runner = runner(|_| 0);
    let env = SmokeEnv {
        app_id: Some(7),
        app_key: Some("app-key".to_string()),
        path: Some("/usr/bin".to_string()),
        ..Default::default()
    };

    let report = fixture.smoke_test(env, Rc::clone(&runner)).run().unwrap();

    assert!(report.examples.iter().all(|e| e.build == CheckOutcome::Passed));
    let builds: Vec<ProcessSpec> = runner
        .calls()
        .into_iter()
        .filter(|c| c.args == ["build"])
        .collect();
    assert_eq!(builds.len(), 3);
    assert!(builds.iter().all(|b| b.clear_env && b.env["SKIP_NPM_INSTALL"] == "1"));
}

#[test]
fn user_credentials_written_by_run_are_removed() {
    let fixture = Fixture::new(1_000_000);
    let rc = fixture.home.path().join(".platkitrc");
    let seen = Rc::new(std::cell::Cell::new(false));
    let seen_in_runner = Rc::clone(&seen);
    let rc_in_runner = rc.clone();
    let runner = runner(move |_| {
        if rc_in_runner.exists() {
            seen_in_runner.set(true);
        }
        0
    });
    let env = SmokeEnv {
        deploy_key: Some("deploy".to_string()),
        ..Default::default()
    };

    fixture.smoke_test(env, runner).run().unwrap();

    assert!(seen.get());
    assert!(!rc.exists());
}

#[test]
fn existing_user_credentials_are_never_touched() {
    let fixture = Fixture::new(1_000_000);
    let rc = fixture.home.path().join(".platkitrc");
    fs::write(&rc, r#"{"deployKey":"mine"}"#).unwrap();
    let env = SmokeEnv {
        deploy_key: Some("deploy".to_string()),
        ..Default::default()
    };

    fixture.smoke_test(env, runner(|_| 0)).run().unwrap();

    assert_eq!(fs::read_to_string(&rc).unwrap(), r#"{"deployKey":"mine"}"#);
}

#[test]
fn failed_download_aborts_and_cleans_up() {
    let fixture = Fixture::new(1_000_000);
    let config = SmokeConfig {
        archive_url: fixture.server.url("/archive/missing.zip"),
        ..fixture.config()
    };
    let runner = runner(|_| 0);

    let err = SmokeTest::new(config, fixture.project.path().to_path_buf())
        .unwrap()
        .with_runner(Box::new(Rc::clone(&runner)))
        .with_env(SmokeEnv::default())
        .with_home(fixture.home.path().to_path_buf())
        .with_temp_base(fixture.temp_base.path().to_path_buf())
        .run()
        .unwrap_err();

    assert!(matches!(err, PlatkitError::Http(_)));
    assert_eq!(runner.calls().len(), 1);
    assert!(!fixture.artifact_path().exists());
    assert_eq!(fixture.workspace_count(), 0);
}

#[test]
fn unversioned_artifact_is_removed_when_packing_fails() {
    let fixture = Fixture::new(1_000_000);
    let runner = Rc::new(ScriptedRunner::new(|spec| {
        let dir = spec.cwd.clone().unwrap();
        fs::write(dir.join("platkit-core.tgz"), b"tarball").unwrap();
        Ok(ScriptedRunner::exit(0, "platkit-core.tgz\n"))
    }));

    let err = fixture
        .smoke_test(SmokeEnv::default(), Rc::clone(&runner))
        .run()
        .unwrap_err();

    assert!(matches!(err, PlatkitError::VersionNotFound { .. }));
    assert!(!fixture.project.path().join("platkit-core.tgz").exists());
    assert_eq!(runner.calls().len(), 1);
    assert_eq!(fixture.workspace_count(), 0);
}
