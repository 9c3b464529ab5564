use std::process::ExitCode;

use outbreak::runner::run_with_args;

fn main() -> ExitCode {
    match run_with_args() {
        Ok(outcome) => {
            println!("{outcome}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
