//! Pbix Extract: decode Power BI `.pbix` data models.
//!
//! This crate provides functionality for:
//! - Opening `.pbix` containers and locating the compressed `DataModel` stream
//! - Decompressing the XPress9-framed stream through a host-supplied codec
//! - Parsing the ABF container and its embedded SQLite metadata
//! - Building the normalized semantic model (tables, columns, measures,
//!   relationships, roles)
//! - Reconstructing column data from VertiPaq storage (IDF indices,
//!   dictionaries, Huffman-compressed string pages)
//!
//! # Quick Start
//!
//! ```ignore
//! use pbix_extract::{PbixPackage, StoredCodec};
//!
//! let file = std::fs::File::open("report.pbix")?;
//! let mut codec = StoredCodec; // or a host-supplied XPress9 codec
//! let package = PbixPackage::open(file, &mut codec)?;
//!
//! println!("{}", serde_json::to_string_pretty(&package.model)?);
//! for name in package.extractor.table_names() {
//!     let table = package.extractor.get_table(&name)?;
//!     println!("{name}: {} rows", table.row_count);
//! }
//! ```

mod abf;
mod column_schema;
mod container;
mod cursor;
mod dictionary;
mod extractor;
mod huffman;
mod idf;
mod idfmeta;
mod metadata;
mod model;
mod package;
mod semantic;
mod sqlite;
mod value;
mod xpress8;
mod xpress9;

pub use abf::{AbfEntry, AbfError, AbfIndex};
pub use column_schema::{ColumnDescriptor, TableSchema};
pub use container::{ContainerError, PbixContainer};
pub use extractor::{
    ExtractEpoch, ExtractError, ExtractProgress, NoProgress, TableData, TableExtractor,
};
pub use idf::{decode_column_indices, IdfError};
pub use idfmeta::{parse_idfmeta, IdfMeta, IdfMetaError};
pub use metadata::SchemaError;
pub use model::{
    data_type_label, CrossFilterDirection, ModelColumn, ModelMeasure, ModelRelationship,
    ModelRole, ModelTable, RelationshipCardinality, SemanticModel, TablePermission, TableType,
};
pub use package::{parse_pbix_data_model, PbixError, PbixPackage};
pub use sqlite::{SqlRow, SqlValue, SqliteDb, SqliteError};
pub use value::DataValue;
pub use xpress8::{decompress as decompress_xpress8, Xpress8Error};
pub use xpress9::{decompress_data_model, StoredCodec, Xpress9Codec, Xpress9Error};
