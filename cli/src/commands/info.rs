use anyhow::Result;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

pub fn run(path: &str) -> Result<ExitCode> {
    let package = super::open_package(path)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    let filename = Path::new(path)
        .file_name()
        .map(|s| s.to_string_lossy())
        .unwrap_or_else(|| path.into());

    writeln!(handle, "File: {}", filename)?;
    writeln!(handle, "Model: {}", package.model.name)?;
    writeln!(handle, "Source format: {}", package.model.source_format)?;
    if !package.model.culture.is_empty() {
        writeln!(handle, "Culture: {}", package.model.culture)?;
    }

    let column_count: usize = package.model.tables.iter().map(|t| t.columns.len()).sum();
    let measure_count: usize = package.model.tables.iter().map(|t| t.measures.len()).sum();
    writeln!(handle, "Tables: {}", package.model.tables.len())?;
    writeln!(handle, "Columns: {}", column_count)?;
    writeln!(handle, "Measures: {}", measure_count)?;
    writeln!(handle, "Relationships: {}", package.model.relationships.len())?;
    writeln!(handle, "Roles: {}", package.model.roles.len())?;

    for table in &package.model.tables {
        writeln!(
            handle,
            "  {} ({}, {} columns, {} measures)",
            table.name,
            table.table_type.as_str(),
            table.columns.len(),
            table.measures.len()
        )?;
    }

    Ok(ExitCode::SUCCESS)
}
