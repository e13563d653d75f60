use std::{env, fs::File};

use anyhow::{Context, Result};
use multicurrency_account::{
    bin_utils::Service, manager::InverseRounding, processor::OperationProcessError,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("multicurrency_account=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let filename = env::args()
        .nth(1)
        .context("Expected a file name as the first argument")?;
    let rounding = match env::var("ACCOUNT_ROUNDING") {
        Ok(value) => value
            .parse::<InverseRounding>()
            .context("Invalid ACCOUNT_ROUNDING")?,
        Err(_) => InverseRounding::default(),
    };
    let file = File::open(&filename).with_context(|| format!("Failed to open `{filename}`"))?;

    let service = Service {
        input: file,
        output: &mut std::io::stdout(),
        rounding,
        error_printer: Box::new(|line, err| {
            match err {
                OperationProcessError::CommandErr(err) => {
                    eprintln!("Error at line {line}: {err}")
                }
                OperationProcessError::AccountErr(_) | OperationProcessError::RateErr(_) => {
                    // rejected by business rules, already logged by the processor
                }
            }
        }),
    };
    service.run()
}
