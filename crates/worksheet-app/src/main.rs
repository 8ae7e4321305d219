//! Worksheet host entry point.

use clap::Parser;
use std::io::Write;
use std::process::ExitCode;
use worksheet_app::CliArgs;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Starting worksheet host");

    let args = CliArgs::parse();
    match worksheet_app::run(&args) {
        Ok(json) => {
            if args.output.is_none() {
                let mut stdout = std::io::stdout().lock();
                if let Err(e) = writeln!(stdout, "{json}") {
                    log::error!("Failed to write snapshot: {}", e);
                    return ExitCode::FAILURE;
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            eprintln!("worksheet: {e}");
            ExitCode::FAILURE
        }
    }
}
