//! pessoas entry point
//!
//! Parses arguments and dispatches through `cli::run`. Errors go to stderr
//! and turn into a non-zero exit code.

use pessoas::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
