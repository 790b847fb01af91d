//! Lazy table extraction over the pre-copied file cache.
//!
//! After schema assembly the large decompressed stream is gone; every read
//! goes through the cache of independently owned file slices. Decoding is
//! single-threaded and cooperative: the streaming variant reports progress
//! before each column, and that callback is the host's chance to run, or
//! to cancel by bumping the extraction epoch.

use crate::abf::AbfIndex;
use crate::column_schema::{ColumnDescriptor, TableSchema};
use crate::dictionary::{parse_dictionary, DictionaryError};
use crate::idf::{decode_column_indices, IdfError};
use crate::idfmeta::{parse_idfmeta, IdfMetaError};
use crate::value::{convert_dictionary_value, convert_direct_value, DataValue};
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExtractError {
    #[error("unknown table: {0}")]
    UnknownTable(String),
    #[error("extraction cancelled")]
    Cancelled,
}

/// Per-column failure. Never escapes a table extraction: the column is
/// omitted and the rest of the table is returned.
#[derive(Debug, Error)]
pub(crate) enum ColumnDecodeError {
    #[error("column file {0} is not in the cache")]
    MissingFile(String),
    #[error("column spans {0} segments")]
    MultiSegment(usize),
    #[error(transparent)]
    IdfMeta(#[from] IdfMetaError),
    #[error(transparent)]
    Idf(#[from] IdfError),
    #[error(transparent)]
    Dictionary(#[from] DictionaryError),
}

/// Columnar table payload: `column_data[i]` is aligned with `columns[i]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableData {
    pub columns: Vec<String>,
    pub column_data: Vec<Vec<Option<DataValue>>>,
    pub row_count: usize,
}

/// Monotonic cancellation epoch shared between a host and an in-progress
/// streaming extraction. Bumping it invalidates extractions started under
/// the previous value.
#[derive(Debug, Clone, Default)]
pub struct ExtractEpoch {
    inner: Arc<AtomicU64>,
}

impl ExtractEpoch {
    pub fn new() -> ExtractEpoch {
        ExtractEpoch::default()
    }

    pub fn bump(&self) {
        self.inner.fetch_add(1, Ordering::Relaxed);
    }

    pub fn current(&self) -> u64 {
        self.inner.load(Ordering::Relaxed)
    }
}

/// Observer for streaming extraction; called once before each column is
/// decoded. The callback is the cooperative yield point.
pub trait ExtractProgress {
    fn on_column(&mut self, index: usize, total: usize, name: &str);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ExtractProgress for NoProgress {
    fn on_column(&mut self, _index: usize, _total: usize, _name: &str) {}
}

impl<F: FnMut(usize, usize, &str)> ExtractProgress for F {
    fn on_column(&mut self, index: usize, total: usize, name: &str) {
        self(index, total, name)
    }
}

pub struct TableExtractor {
    tables: Vec<TableSchema>,
    files: FxHashMap<String, Vec<u8>>,
}

impl TableExtractor {
    /// Copies every file slice any column depends on out of the ABF
    /// stream. Files that fail to extract are simply absent from the
    /// cache; their columns are skipped at decode time.
    pub(crate) fn new(tables: Vec<TableSchema>, abf: &AbfIndex) -> TableExtractor {
        let mut files = FxHashMap::default();
        for table in &tables {
            for column in &table.columns {
                for name in column.file_dependencies() {
                    if files.contains_key(name) {
                        continue;
                    }
                    if let Ok(bytes) = abf.get_data_slice(name) {
                        files.insert(name.to_string(), bytes);
                    }
                }
            }
        }
        TableExtractor { tables, files }
    }

    #[cfg(test)]
    pub(crate) fn from_cache(
        tables: Vec<TableSchema>,
        files: FxHashMap<String, Vec<u8>>,
    ) -> TableExtractor {
        TableExtractor { tables, files }
    }

    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.iter().map(|t| t.name.clone()).collect();
        names.sort();
        names
    }

    pub fn schema(&self) -> &[TableSchema] {
        &self.tables
    }

    pub fn get_table(&self, name: &str) -> Result<TableData, ExtractError> {
        self.get_table_streaming(name, &ExtractEpoch::default(), &mut NoProgress)
    }

    /// Decodes a table column by column. `progress` runs before every
    /// column; if `epoch` has been bumped since the call started, the
    /// extraction stops with [`ExtractError::Cancelled`] and no further
    /// columns are decoded.
    pub fn get_table_streaming(
        &self,
        name: &str,
        epoch: &ExtractEpoch,
        progress: &mut dyn ExtractProgress,
    ) -> Result<TableData, ExtractError> {
        let schema = self
            .tables
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| ExtractError::UnknownTable(name.to_string()))?;
        let started_at = epoch.current();
        let total = schema.columns.len();

        let mut columns = Vec::new();
        let mut column_data = Vec::new();
        for (index, descriptor) in schema.columns.iter().enumerate() {
            progress.on_column(index, total, &descriptor.name);
            if epoch.current() != started_at {
                return Err(ExtractError::Cancelled);
            }
            match self.decode_column(descriptor) {
                Ok(values) => {
                    columns.push(descriptor.name.clone());
                    column_data.push(values);
                }
                Err(_) => {
                    // The column is dropped; the table survives.
                }
            }
        }

        let row_count = column_data.iter().map(Vec::len).max().unwrap_or(0);
        Ok(TableData {
            columns,
            column_data,
            row_count,
        })
    }

    fn file(&self, name: &str) -> Result<&[u8], ColumnDecodeError> {
        self.files
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| ColumnDecodeError::MissingFile(name.to_string()))
    }

    fn decode_column(
        &self,
        descriptor: &ColumnDescriptor,
    ) -> Result<Vec<Option<DataValue>>, ColumnDecodeError> {
        if descriptor.segment_count > 1 {
            return Err(ColumnDecodeError::MultiSegment(descriptor.segment_count));
        }

        let meta = parse_idfmeta(self.file(&descriptor.idfmeta)?)?;
        let indices = decode_column_indices(self.file(&descriptor.idf)?, &meta)?;

        let values = match &descriptor.dictionary {
            Some(dictionary_file) => {
                let dictionary =
                    parse_dictionary(self.file(dictionary_file)?, meta.min_data_id)?;
                indices
                    .iter()
                    .map(|&id| {
                        dictionary
                            .get(id)
                            .map(|v| convert_dictionary_value(v, descriptor.data_type))
                    })
                    .collect()
            }
            None => indices
                .iter()
                .map(|&id| {
                    Some(convert_direct_value(
                        id,
                        descriptor.base_id,
                        descriptor.magnitude,
                        descriptor.data_type,
                    ))
                })
                .collect(),
        };
        Ok(values)
    }
}
