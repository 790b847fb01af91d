//! Fixed-position access to the `metadata.sqlitedb` tables.
//!
//! The Power BI metadata schema is addressed by column position, not by
//! SQL. Every positional index lives here, behind named getters on thin
//! record wrappers, so the rest of the crate never touches a bare index.
//! Row ids are the surrogate `ID` of each table (an INTEGER PRIMARY KEY
//! alias, stored as NULL in the record and surfaced through the rowid).

use crate::sqlite::{SqlRow, SqliteDb, SqliteError};
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SchemaError {
    #[error("metadata table {0} is missing or empty")]
    IncompleteMetadata(&'static str),
}

/// All metadata rows needed by the semantic and column-schema builders,
/// loaded once. Optional tables that are absent load as empty row sets.
#[derive(Debug, Default)]
pub(crate) struct MetadataStore {
    pub model: Vec<SqlRow>,
    pub tables: Vec<SqlRow>,
    pub columns: Vec<SqlRow>,
    pub measures: Vec<SqlRow>,
    pub relationships: Vec<SqlRow>,
    pub roles: Vec<SqlRow>,
    pub table_permissions: Vec<SqlRow>,
    pub partitions: Vec<SqlRow>,
    pub hierarchies: Vec<SqlRow>,
    pub column_storages: Vec<SqlRow>,
    pub column_partition_storages: Vec<SqlRow>,
    pub dictionary_storages: Vec<SqlRow>,
    pub storage_files: Vec<SqlRow>,
    pub attribute_hierarchies: Vec<SqlRow>,
    pub attribute_hierarchy_storages: Vec<SqlRow>,
}

impl MetadataStore {
    pub(crate) fn load(db: &SqliteDb) -> Result<MetadataStore, SchemaError> {
        let tables = required(db, "Table")?;
        if tables.is_empty() {
            return Err(SchemaError::IncompleteMetadata("Table"));
        }
        let columns = required(db, "Column")?;

        Ok(MetadataStore {
            model: optional(db, "Model"),
            tables,
            columns,
            measures: optional(db, "Measure"),
            relationships: optional(db, "Relationship"),
            roles: optional(db, "Role"),
            table_permissions: optional(db, "TablePermission"),
            partitions: optional(db, "Partition"),
            hierarchies: optional(db, "Hierarchy"),
            column_storages: optional(db, "ColumnStorage"),
            column_partition_storages: optional(db, "ColumnPartitionStorage"),
            dictionary_storages: optional(db, "DictionaryStorage"),
            storage_files: optional(db, "StorageFile"),
            attribute_hierarchies: optional(db, "AttributeHierarchy"),
            attribute_hierarchy_storages: optional(db, "AttributeHierarchyStorage"),
        })
    }
}

fn required(db: &SqliteDb, name: &'static str) -> Result<Vec<SqlRow>, SchemaError> {
    db.get_table_rows(name)
        .map_err(|_: SqliteError| SchemaError::IncompleteMetadata(name))
}

fn optional(db: &SqliteDb, name: &str) -> Vec<SqlRow> {
    db.get_table_rows(name).unwrap_or_default()
}

macro_rules! record_wrapper {
    ($name:ident) => {
        #[derive(Clone, Copy)]
        pub(crate) struct $name<'a>(pub &'a SqlRow);

        impl $name<'_> {
            #[allow(dead_code)]
            pub(crate) fn id(&self) -> i64 {
                self.0.rowid
            }
        }
    };
}

record_wrapper!(ModelRecord);
record_wrapper!(TableRecord);
record_wrapper!(ColumnRecord);
record_wrapper!(MeasureRecord);
record_wrapper!(RelationshipRecord);
record_wrapper!(RoleRecord);
record_wrapper!(TablePermissionRecord);
record_wrapper!(PartitionRecord);
record_wrapper!(HierarchyRecord);
record_wrapper!(ColumnStorageRecord);
record_wrapper!(ColumnPartitionStorageRecord);
record_wrapper!(DictionaryStorageRecord);
record_wrapper!(StorageFileRecord);
record_wrapper!(AttributeHierarchyRecord);
record_wrapper!(AttributeHierarchyStorageRecord);

impl<'a> ModelRecord<'a> {
    pub(crate) fn name(&self) -> Option<&'a str> {
        self.0.text(1)
    }

    pub(crate) fn culture(&self) -> Option<&'a str> {
        self.0.text(6)
    }
}

impl<'a> TableRecord<'a> {
    pub(crate) fn name(&self) -> Option<&'a str> {
        self.0.text(2)
    }

    pub(crate) fn description(&self) -> Option<&'a str> {
        self.0.text(4)
    }

    pub(crate) fn is_hidden(&self) -> bool {
        self.0.flag(5)
    }
}

/// `Type` values of `Column` rows; 3 marks the internal rowNumber column,
/// which never surfaces.
pub(crate) const COLUMN_TYPE_DATA: i64 = 1;
pub(crate) const COLUMN_TYPE_CALCULATED: i64 = 2;

impl<'a> ColumnRecord<'a> {
    pub(crate) fn table_id(&self) -> Option<i64> {
        self.0.int(1)
    }

    pub(crate) fn explicit_name(&self) -> Option<&'a str> {
        self.0.text(2)
    }

    pub(crate) fn explicit_data_type(&self) -> Option<i64> {
        self.0.int(4)
    }

    pub(crate) fn description(&self) -> Option<&'a str> {
        self.0.text(7)
    }

    pub(crate) fn is_hidden(&self) -> bool {
        self.0.flag(8)
    }

    pub(crate) fn column_storage_id(&self) -> Option<i64> {
        self.0.int(18)
    }

    pub(crate) fn column_type(&self) -> Option<i64> {
        self.0.int(19)
    }

    pub(crate) fn expression(&self) -> Option<&'a str> {
        self.0.text(22)
    }
}

impl<'a> MeasureRecord<'a> {
    pub(crate) fn table_id(&self) -> Option<i64> {
        self.0.int(1)
    }

    pub(crate) fn name(&self) -> Option<&'a str> {
        self.0.text(2)
    }

    pub(crate) fn description(&self) -> Option<&'a str> {
        self.0.text(3)
    }

    pub(crate) fn expression(&self) -> Option<&'a str> {
        self.0.text(5)
    }

    pub(crate) fn format_string(&self) -> Option<&'a str> {
        self.0.text(6)
    }

    pub(crate) fn is_hidden(&self) -> bool {
        self.0.flag(7)
    }
}

/// `CrossFilteringBehavior` value selecting bidirectional filtering.
pub(crate) const CROSS_FILTER_BOTH: i64 = 2;
/// Endpoint cardinality value meaning "many".
pub(crate) const CARDINALITY_MANY: i64 = 2;

impl RelationshipRecord<'_> {
    pub(crate) fn is_active(&self) -> bool {
        self.0.flag(3)
    }

    pub(crate) fn cross_filtering_behavior(&self) -> Option<i64> {
        self.0.int(5)
    }

    pub(crate) fn from_table_id(&self) -> Option<i64> {
        self.0.int(8)
    }

    pub(crate) fn from_column_id(&self) -> Option<i64> {
        self.0.int(9)
    }

    pub(crate) fn from_cardinality(&self) -> Option<i64> {
        self.0.int(10)
    }

    pub(crate) fn to_table_id(&self) -> Option<i64> {
        self.0.int(11)
    }

    pub(crate) fn to_column_id(&self) -> Option<i64> {
        self.0.int(12)
    }

    pub(crate) fn to_cardinality(&self) -> Option<i64> {
        self.0.int(13)
    }
}

impl<'a> RoleRecord<'a> {
    pub(crate) fn name(&self) -> Option<&'a str> {
        self.0.text(2)
    }
}

impl<'a> TablePermissionRecord<'a> {
    pub(crate) fn role_id(&self) -> Option<i64> {
        self.0.int(1)
    }

    pub(crate) fn table_id(&self) -> Option<i64> {
        self.0.int(2)
    }

    pub(crate) fn filter_expression(&self) -> Option<&'a str> {
        self.0.text(3)
    }
}

/// `Partition.Type` value marking a calculated-table partition.
pub(crate) const PARTITION_TYPE_CALCULATED: i64 = 2;
/// `Partition.Mode` values for non-import storage.
pub(crate) const PARTITION_MODE_DIRECT_QUERY: i64 = 1;
pub(crate) const PARTITION_MODE_DUAL: i64 = 5;

impl<'a> PartitionRecord<'a> {
    pub(crate) fn table_id(&self) -> Option<i64> {
        self.0.int(1)
    }

    pub(crate) fn name(&self) -> Option<&'a str> {
        self.0.text(2)
    }

    pub(crate) fn partition_type(&self) -> Option<i64> {
        self.0.int(7)
    }

    pub(crate) fn mode(&self) -> Option<i64> {
        self.0.int(9)
    }
}

impl<'a> HierarchyRecord<'a> {
    pub(crate) fn table_id(&self) -> Option<i64> {
        self.0.int(1)
    }

    pub(crate) fn name(&self) -> Option<&'a str> {
        self.0.text(2)
    }
}

impl ColumnStorageRecord<'_> {
    pub(crate) fn dictionary_storage_id(&self) -> Option<i64> {
        self.0.int(4)
    }

    pub(crate) fn distinct_states(&self) -> Option<i64> {
        self.0.int(11)
    }
}

impl ColumnPartitionStorageRecord<'_> {
    pub(crate) fn column_storage_id(&self) -> Option<i64> {
        self.0.int(1)
    }

    pub(crate) fn storage_file_id(&self) -> Option<i64> {
        self.0.int(6)
    }
}

impl DictionaryStorageRecord<'_> {
    pub(crate) fn base_id(&self) -> Option<f64> {
        self.0.real(5)
    }

    pub(crate) fn magnitude(&self) -> Option<f64> {
        self.0.real(6)
    }

    pub(crate) fn is_nullable(&self) -> bool {
        self.0.flag(8)
    }

    pub(crate) fn storage_file_id(&self) -> Option<i64> {
        self.0.int(12)
    }
}

impl<'a> StorageFileRecord<'a> {
    pub(crate) fn file_name(&self) -> Option<&'a str> {
        self.0.text(4)
    }
}

impl AttributeHierarchyRecord<'_> {
    pub(crate) fn column_id(&self) -> Option<i64> {
        self.0.int(1)
    }

    pub(crate) fn storage_id(&self) -> Option<i64> {
        self.0.int(3)
    }
}

impl AttributeHierarchyStorageRecord<'_> {
    pub(crate) fn storage_file_id(&self) -> Option<i64> {
        self.0.int(9)
    }
}
