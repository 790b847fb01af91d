use anyhow::Result;
use serde::Serialize;
use std::io::Write;

pub fn write_json_value<W: Write, T: Serialize>(w: &mut W, value: &T, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *w, value)?;
    } else {
        serde_json::to_writer(&mut *w, value)?;
    }
    writeln!(w)?;
    Ok(())
}
