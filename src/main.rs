//! formcapture CLI entry point
//!
//! Parses arguments and dispatches through `cli::run`. Errors not already
//! written by the command are printed to stderr; the process exits non-zero.

use formcapture::cli;

fn main() {
    if let Err(e) = cli::run() {
        if !e.is_reported() {
            eprintln!("{}", e);
        }
        std::process::exit(1);
    }
}
