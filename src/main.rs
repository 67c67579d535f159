//! platkit CLI entry point.

use std::process::ExitCode;

use platkit::cli::{parse_from, CommandDispatcher};
use platkit::diagnostics;
use platkit::shell::is_ci;
use platkit::ui::create_ui;

fn main() -> ExitCode {
    let (cli, invocation) = match parse_from(std::env::args_os()) {
        Ok(parsed) => parsed,
        Err(e) => e.exit(),
    };

    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
    }
    diagnostics::init(cli.debug);

    tracing::debug!("platkit starting with args: {:?}", cli);

    let mut ui = create_ui(!is_ci());

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            ui.error(&format!("Could not read the current directory: {}", e));
            return ExitCode::from(1);
        }
    };

    match CommandDispatcher::new(cwd).dispatch(&cli, invocation, ui.as_mut()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ui.error(&e.to_string());
            ExitCode::from(e.exit_code())
        }
    }
}
