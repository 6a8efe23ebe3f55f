#![forbid(unsafe_code)]

use std::process::ExitCode;

fn main() -> ExitCode {
    match lockstep::run() {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("lockstep: {e}");
            ExitCode::from(2)
        }
    }
}
