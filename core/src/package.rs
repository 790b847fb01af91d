//! Top-level assembly of the DataModel decode pipeline.
//!
//! `parse_pbix_data_model` runs the full chain (XPress9 decompression, ABF
//! parse, SQLite metadata read, schema builders, file-cache pre-copy) and
//! hands back the semantic model plus a [`TableExtractor`]. The large
//! decompressed buffer lives only inside this function; once the cache is
//! built it is dropped, and all later reads hit the cache.

use crate::abf::{AbfError, AbfIndex};
use crate::column_schema::build_column_schema;
use crate::container::{ContainerError, PbixContainer};
use crate::extractor::TableExtractor;
use crate::metadata::{MetadataStore, SchemaError};
use crate::model::SemanticModel;
use crate::semantic::build_semantic_model;
use crate::sqlite::{SqliteDb, SqliteError};
use crate::xpress9::{decompress_data_model, Xpress9Codec, Xpress9Error};
use std::io::{Read, Seek};
use thiserror::Error;

const METADATA_FILE: &str = "metadata.sqlitedb";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PbixError {
    #[error("container error: {0}")]
    Container(#[from] ContainerError),
    #[error("XPress9 error: {0}")]
    Xpress9(#[from] Xpress9Error),
    #[error("ABF error: {0}")]
    Abf(#[from] AbfError),
    #[error("SQLite error: {0}")]
    Sqlite(#[from] SqliteError),
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),
}

/// A parsed `.pbix` data model: the normalized semantic description plus
/// on-demand access to the stored table data.
pub struct PbixPackage {
    pub model: SemanticModel,
    pub extractor: TableExtractor,
}

impl PbixPackage {
    /// Opens a `.pbix` container and decodes its `DataModel` entry.
    pub fn open<R: Read + Seek>(
        reader: R,
        codec: &mut dyn Xpress9Codec,
    ) -> Result<PbixPackage, PbixError> {
        let mut container = PbixContainer::open(reader)?;
        let data_model = container.read_data_model()?;
        parse_pbix_data_model(&data_model, codec)
    }
}

/// Decodes a raw `DataModel` byte stream (the single entry the core
/// consumes from a `.pbix` ZIP).
pub fn parse_pbix_data_model(
    data_model: &[u8],
    codec: &mut dyn Xpress9Codec,
) -> Result<PbixPackage, PbixError> {
    let abf_stream = decompress_data_model(data_model, codec)?;
    let abf = AbfIndex::parse(abf_stream)?;

    let db = SqliteDb::open(abf.get_data_slice(METADATA_FILE)?)?;
    let store = MetadataStore::load(&db)?;

    let model = build_semantic_model(&store)?;
    let schema = build_column_schema(&store);
    let extractor = TableExtractor::new(schema, &abf);

    Ok(PbixPackage { model, extractor })
}
