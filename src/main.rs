//! program-options: print the options resolved from the command line and a config file

use std::process::ExitCode;

use program_options::cli;

fn main() -> ExitCode {
    match cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("[Error]: {err:#}");
            ExitCode::FAILURE
        }
    }
}
