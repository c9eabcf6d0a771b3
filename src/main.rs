//! jira-fetch - fetch and aggregate JIRA REST API results from the terminal.

use std::process::ExitCode;

use clap::Parser;

use jira_api_fetcher::cli::{self, Cli};
use jira_api_fetcher::logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.global.verbose) {
        eprintln!("warning: file logging disabled: {}", e);
    }

    match cli::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("error: {}", e.user_message());
            if let Some(action) = e.suggested_action() {
                eprintln!("hint: {}", action);
            }
            ExitCode::FAILURE
        }
    }
}
