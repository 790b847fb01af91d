use crate::output::json;
use anyhow::{bail, Result};
use pbix_extract::ExtractError;
use std::io::{self, Write};
use std::process::ExitCode;

pub fn run(path: &str, name: &str, limit: Option<usize>, pretty: bool) -> Result<ExitCode> {
    let package = super::open_package(path)?;

    let mut table = match package.extractor.get_table(name) {
        Ok(table) => table,
        Err(ExtractError::UnknownTable(_)) => {
            bail!(
                "table {:?} not found; available tables: {}",
                name,
                package.extractor.table_names().join(", ")
            );
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(limit) = limit {
        table.row_count = table.row_count.min(limit);
        for column in &mut table.column_data {
            column.truncate(limit);
        }
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    json::write_json_value(&mut handle, &table, pretty)?;
    handle.flush()?;

    Ok(ExitCode::SUCCESS)
}
