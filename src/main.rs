//! Binary entrypoint for the Oriento API server.

use std::process::ExitCode;

use oriento_api::start_oriento_api;

/// Start the API server with environment-driven configuration.
fn main() -> ExitCode {
    start_oriento_api::run()
}
