use std::process::ExitCode;

use serde_json::json;
use tracing_subscriber::EnvFilter;
use wallet_core::WalletConfig;

mod cli;

use cli::{CliError, Output};

fn main() -> ExitCode {
    // Logs go to stderr so stdout carries exactly one JSON document.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args(std::env::args().skip(1));

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => return fail(&format!("Failed to create Tokio runtime: {e}")),
    };

    let outcome = runtime.block_on(async {
        let config = WalletConfig::from_env().map_err(CliError::from)?;
        cli::run(&args, &config).await
    });

    match outcome {
        Ok(Output::Text(text)) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Ok(Output::Json(value)) => match serde_json::to_string_pretty(&value) {
            Ok(rendered) => {
                println!("{rendered}");
                ExitCode::SUCCESS
            }
            Err(e) => fail(&e.to_string()),
        },
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            fail(&e.to_string())
        }
    }
}

/// Prints `{"error": message}` on stderr.
fn fail(message: &str) -> ExitCode {
    eprintln!("{}", json!({ "error": message }));
    ExitCode::FAILURE
}
