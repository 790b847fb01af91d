pub mod info;
pub mod model;
pub mod table;
pub mod tables;

use anyhow::{Context, Result};
use pbix_extract::{PbixPackage, StoredCodec};
use std::fs::File;

/// Opens and decodes a `.pbix` file with the built-in stored-block codec.
/// Archives compressed with a real XPress9 codec need one supplied through
/// the library API.
pub fn open_package(path: &str) -> Result<PbixPackage> {
    let file = File::open(path).with_context(|| format!("Failed to open file: {}", path))?;
    let mut codec = StoredCodec;
    PbixPackage::open(file, &mut codec)
        .with_context(|| format!("Failed to parse data model: {}", path))
}
