use clap::Parser;
use std::process::ExitCode;
use tracing::error;
use vizzy::cli::{Cli, normalize_args};
use vizzy::{Plan, Terminal, execute, logging};

fn main() -> ExitCode {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));
    if let Err(err) = logging::init_logging(cli.log_format) {
        eprintln!("failed to initialize logging: {err}");
        return ExitCode::FAILURE;
    }

    let plan = Plan::from(cli);
    let mut terminal = Terminal::stdout();
    match execute(&plan, &mut terminal) {
        Ok(outcome) => outcome.exit_code(),
        Err(err) => {
            error!(error = %err, "output failed");
            ExitCode::FAILURE
        }
    }
}
