//! Resolves the VertiPaq storage files backing every user column.
//!
//! The chain runs `Column` → `ColumnStorage` → `ColumnPartitionStorage` →
//! `StorageFile` for the IDF, plus `DictionaryStorage` for the value
//! dictionary and `AttributeHierarchy(Storage)` for the HIDX. A column
//! without an IDF has nothing to decode and is omitted; a column with more
//! than one partition row is multi-segment and flagged so the extractor
//! skips it instead of producing wrong data.

use crate::metadata::{
    AttributeHierarchyRecord, AttributeHierarchyStorageRecord, ColumnPartitionStorageRecord,
    ColumnRecord, ColumnStorageRecord, DictionaryStorageRecord, MetadataStore, StorageFileRecord,
    TableRecord, COLUMN_TYPE_CALCULATED, COLUMN_TYPE_DATA,
};
use crate::semantic::is_internal_table;
use rustc_hash::FxHashMap;

/// Storage description of one physical user column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDescriptor {
    pub table_name: String,
    pub name: String,
    /// Column index file; `idfmeta` is always `idf + "meta"`.
    pub idf: String,
    pub idfmeta: String,
    pub dictionary: Option<String>,
    pub hidx: Option<String>,
    pub data_type: i64,
    pub base_id: f64,
    pub magnitude: f64,
    pub is_nullable: bool,
    pub cardinality: u64,
    pub segment_count: usize,
}

impl ColumnDescriptor {
    /// Every file the extractor may need for this column.
    pub fn file_dependencies(&self) -> impl Iterator<Item = &str> {
        [
            Some(self.idf.as_str()),
            Some(self.idfmeta.as_str()),
            self.dictionary.as_deref(),
            self.hidx.as_deref(),
        ]
        .into_iter()
        .flatten()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnDescriptor>,
}

/// Per-table column descriptors, in metadata row order.
pub(crate) fn build_column_schema(store: &MetadataStore) -> Vec<TableSchema> {
    let storage_files: FxHashMap<i64, &str> = store
        .storage_files
        .iter()
        .map(StorageFileRecord)
        .filter_map(|f| Some((f.id(), f.file_name()?)))
        .collect();

    let column_storages: FxHashMap<i64, ColumnStorageRecord<'_>> = store
        .column_storages
        .iter()
        .map(ColumnStorageRecord)
        .map(|s| (s.id(), s))
        .collect();

    let dictionary_storages: FxHashMap<i64, DictionaryStorageRecord<'_>> = store
        .dictionary_storages
        .iter()
        .map(DictionaryStorageRecord)
        .map(|s| (s.id(), s))
        .collect();

    // Partition rows grouped by column storage id, preserving order.
    let mut partitions_by_storage: FxHashMap<i64, Vec<ColumnPartitionStorageRecord<'_>>> =
        FxHashMap::default();
    for row in &store.column_partition_storages {
        let record = ColumnPartitionStorageRecord(row);
        if let Some(storage_id) = record.column_storage_id() {
            partitions_by_storage.entry(storage_id).or_default().push(record);
        }
    }

    // HIDX file by column id via the attribute-hierarchy chain.
    let hierarchy_storages: FxHashMap<i64, AttributeHierarchyStorageRecord<'_>> = store
        .attribute_hierarchy_storages
        .iter()
        .map(AttributeHierarchyStorageRecord)
        .map(|s| (s.id(), s))
        .collect();
    let mut hidx_by_column: FxHashMap<i64, &str> = FxHashMap::default();
    for row in &store.attribute_hierarchies {
        let record = AttributeHierarchyRecord(row);
        let Some((column_id, storage_id)) = record.column_id().zip(record.storage_id()) else {
            continue;
        };
        let file = hierarchy_storages
            .get(&storage_id)
            .and_then(|s| s.storage_file_id())
            .and_then(|id| storage_files.get(&id));
        if let Some(&file) = file {
            hidx_by_column.insert(column_id, file);
        }
    }

    let mut tables = Vec::new();
    for row in &store.tables {
        let table = TableRecord(row);
        let Some(table_name) = table.name() else {
            continue;
        };
        if is_internal_table(table_name) {
            continue;
        }

        let columns = store
            .columns
            .iter()
            .map(ColumnRecord)
            .filter(|c| c.table_id() == Some(table.id()))
            .filter_map(|c| {
                build_descriptor(
                    c,
                    table_name,
                    &column_storages,
                    &dictionary_storages,
                    &partitions_by_storage,
                    &storage_files,
                    &hidx_by_column,
                )
            })
            .collect();

        tables.push(TableSchema {
            name: table_name.to_string(),
            columns,
        });
    }
    tables
}

fn build_descriptor(
    column: ColumnRecord<'_>,
    table_name: &str,
    column_storages: &FxHashMap<i64, ColumnStorageRecord<'_>>,
    dictionary_storages: &FxHashMap<i64, DictionaryStorageRecord<'_>>,
    partitions_by_storage: &FxHashMap<i64, Vec<ColumnPartitionStorageRecord<'_>>>,
    storage_files: &FxHashMap<i64, &str>,
    hidx_by_column: &FxHashMap<i64, &str>,
) -> Option<ColumnDescriptor> {
    let column_type = column.column_type()?;
    if column_type != COLUMN_TYPE_DATA && column_type != COLUMN_TYPE_CALCULATED {
        return None;
    }
    let name = column.explicit_name()?;

    let storage = column_storages.get(&column.column_storage_id()?)?;
    let partitions = partitions_by_storage.get(&storage.id())?;
    let idf = partitions
        .first()
        .and_then(|p| p.storage_file_id())
        .and_then(|id| storage_files.get(&id))?
        .to_string();

    let dictionary_storage = storage
        .dictionary_storage_id()
        .and_then(|id| dictionary_storages.get(&id));
    let dictionary = dictionary_storage
        .and_then(|d| d.storage_file_id())
        .and_then(|id| storage_files.get(&id))
        .map(|s| s.to_string());

    Some(ColumnDescriptor {
        table_name: table_name.to_string(),
        name: name.to_string(),
        idfmeta: format!("{idf}meta"),
        idf,
        dictionary,
        hidx: hidx_by_column.get(&column.id()).map(|s| s.to_string()),
        data_type: column.explicit_data_type().unwrap_or(0),
        base_id: dictionary_storage.and_then(|d| d.base_id()).unwrap_or(0.0),
        magnitude: dictionary_storage
            .and_then(|d| d.magnitude())
            .filter(|&m| m != 0.0)
            .unwrap_or(1.0),
        is_nullable: dictionary_storage.is_some_and(|d| d.is_nullable()),
        cardinality: storage.distinct_states().unwrap_or(0).max(0) as u64,
        segment_count: partitions.len(),
    })
}
