use anyhow::Result;
use std::io::{self, Write};
use std::process::ExitCode;

pub fn run(path: &str) -> Result<ExitCode> {
    let package = super::open_package(path)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    for name in package.extractor.table_names() {
        writeln!(handle, "{}", name)?;
    }

    Ok(ExitCode::SUCCESS)
}
