use std::process::ExitCode;

use clap::Parser;
use fruit_prices::{ViewCsvInput, domain::view_state::LoadStatus, view_csv};
use tracing_subscriber::EnvFilter;

pub fn main() -> anyhow::Result<ExitCode> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let status = view_csv(&ViewCsvInput::parse())?;

    Ok(match status {
        LoadStatus::Failed => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    })
}
