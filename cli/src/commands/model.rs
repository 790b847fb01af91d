use crate::output::json;
use anyhow::Result;
use std::io::{self, Write};
use std::process::ExitCode;

pub fn run(path: &str, pretty: bool) -> Result<ExitCode> {
    let package = super::open_package(path)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    json::write_json_value(&mut handle, &package.model, pretty)?;
    handle.flush()?;

    Ok(ExitCode::SUCCESS)
}
