use tierbatch_core::logging;

mod cli;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    // Initialize logging as early as possible; a missing state dir is not fatal.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    // Parse CLI and dispatch.
    match Cli::run_from_args().await {
        Ok(status) => std::process::exit(status.code()),
        Err(err) => {
            eprintln!("tierbatch error: {:#}", err);
            std::process::exit(1);
        }
    }
}
