//! Builds the normalized [`SemanticModel`] from the metadata tables.
//!
//! Joins run over the row sets loaded by [`MetadataStore`]; table identity
//! is the surrogate rowid throughout. Internal helper tables (auto date
//! tables, hierarchy/relationship/user-storage scratch tables) are filtered
//! out before emission, together with every relationship touching them.

use crate::metadata::{
    ColumnRecord, HierarchyRecord, MeasureRecord, MetadataStore, ModelRecord, PartitionRecord,
    RelationshipRecord, RoleRecord, SchemaError, TablePermissionRecord, TableRecord,
    CARDINALITY_MANY, COLUMN_TYPE_CALCULATED, COLUMN_TYPE_DATA, CROSS_FILTER_BOTH,
    PARTITION_MODE_DIRECT_QUERY, PARTITION_MODE_DUAL, PARTITION_TYPE_CALCULATED,
};
use crate::model::{
    data_type_label, CrossFilterDirection, ModelColumn, ModelMeasure, ModelRelationship,
    ModelRole, ModelTable, RelationshipCardinality, SemanticModel, TablePermission, TableType,
};
use rustc_hash::FxHashMap;

const INTERNAL_TABLE_PREFIXES: [&str; 5] = [
    "LocalDateTable_",
    "DateTableTemplate_",
    "H$",
    "R$",
    "U$",
];

/// Compatibility level reported for `.pbix` sources; the SQLite metadata
/// does not store one, and Power BI Desktop emits level 1500+ models.
const DEFAULT_COMPATIBILITY_LEVEL: u32 = 1550;

pub(crate) fn is_internal_table(name: &str) -> bool {
    INTERNAL_TABLE_PREFIXES
        .iter()
        .any(|prefix| name.starts_with(prefix))
}

pub(crate) fn build_semantic_model(store: &MetadataStore) -> Result<SemanticModel, SchemaError> {
    // Surviving tables, in metadata row order.
    let mut table_names: FxHashMap<i64, &str> = FxHashMap::default();
    let mut tables = Vec::new();
    for row in &store.tables {
        let record = TableRecord(row);
        let Some(name) = record.name() else {
            continue;
        };
        if is_internal_table(name) {
            continue;
        }
        table_names.insert(record.id(), name);
        tables.push(record);
    }

    // Column names by id, across all tables; relationships reference
    // columns of internal tables too, which resolve and then get dropped
    // with their table.
    let mut column_names: FxHashMap<i64, &str> = FxHashMap::default();
    for row in &store.columns {
        let record = ColumnRecord(row);
        if let Some(name) = record.explicit_name() {
            column_names.insert(record.id(), name);
        }
    }

    let model_tables = tables
        .iter()
        .map(|table| build_table(store, *table))
        .collect();

    let relationships = store
        .relationships
        .iter()
        .filter_map(|row| build_relationship(RelationshipRecord(row), &table_names, &column_names))
        .collect();

    let roles = build_roles(store, &table_names);

    let (name, culture) = store
        .model
        .first()
        .map(|row| {
            let record = ModelRecord(row);
            (
                record.name().unwrap_or("Model").to_string(),
                record.culture().unwrap_or("").to_string(),
            )
        })
        .unwrap_or_else(|| ("Model".to_string(), String::new()));

    Ok(SemanticModel {
        name,
        compatibility_level: DEFAULT_COMPATIBILITY_LEVEL,
        culture,
        source_format: "pbix".to_string(),
        tables: model_tables,
        relationships,
        roles,
    })
}

fn build_table(store: &MetadataStore, table: TableRecord<'_>) -> ModelTable {
    let table_id = table.id();

    let columns = store
        .columns
        .iter()
        .map(ColumnRecord)
        .filter(|c| c.table_id() == Some(table_id))
        .filter_map(build_column)
        .collect();

    let measures = store
        .measures
        .iter()
        .map(MeasureRecord)
        .filter(|m| m.table_id() == Some(table_id))
        .map(|m| ModelMeasure {
            name: m.name().unwrap_or_default().to_string(),
            description: m.description().unwrap_or_default().to_string(),
            expression: m.expression().unwrap_or_default().to_string(),
            format_string: m.format_string().unwrap_or_default().to_string(),
            is_hidden: m.is_hidden(),
        })
        .collect();

    let hierarchies = store
        .hierarchies
        .iter()
        .map(HierarchyRecord)
        .filter(|h| h.table_id() == Some(table_id))
        .filter_map(|h| h.name().map(str::to_string))
        .collect();

    let partitions: Vec<PartitionRecord<'_>> = store
        .partitions
        .iter()
        .map(PartitionRecord)
        .filter(|p| p.table_id() == Some(table_id))
        .collect();

    ModelTable {
        name: table.name().unwrap_or_default().to_string(),
        table_type: derive_table_type(&partitions),
        is_hidden: table.is_hidden(),
        description: table.description().unwrap_or_default().to_string(),
        columns,
        measures,
        hierarchies,
        partitions: partitions
            .iter()
            .filter_map(|p| p.name().map(str::to_string))
            .collect(),
        calculation_items: Vec::new(),
    }
}

fn derive_table_type(partitions: &[PartitionRecord<'_>]) -> TableType {
    if partitions
        .iter()
        .any(|p| p.partition_type() == Some(PARTITION_TYPE_CALCULATED))
    {
        return TableType::Calculated;
    }
    match partitions.first().and_then(PartitionRecord::mode) {
        Some(PARTITION_MODE_DIRECT_QUERY) => TableType::DirectQuery,
        Some(PARTITION_MODE_DUAL) => TableType::Dual,
        _ => TableType::Import,
    }
}

fn build_column(column: ColumnRecord<'_>) -> Option<ModelColumn> {
    let column_type = column.column_type()?;
    if column_type != COLUMN_TYPE_DATA && column_type != COLUMN_TYPE_CALCULATED {
        return None;
    }
    let expression = if column_type == COLUMN_TYPE_CALCULATED {
        column.expression().map(str::to_string)
    } else {
        None
    };
    Some(ModelColumn {
        name: column.explicit_name()?.to_string(),
        data_type: data_type_label(column.explicit_data_type().unwrap_or(0)).to_string(),
        is_hidden: column.is_hidden(),
        description: column.description().unwrap_or_default().to_string(),
        expression,
    })
}

fn build_relationship(
    rel: RelationshipRecord<'_>,
    table_names: &FxHashMap<i64, &str>,
    column_names: &FxHashMap<i64, &str>,
) -> Option<ModelRelationship> {
    let from_table = table_names.get(&rel.from_table_id()?)?;
    let to_table = table_names.get(&rel.to_table_id()?)?;
    let from_column = column_names.get(&rel.from_column_id()?)?;
    let to_column = column_names.get(&rel.to_column_id()?)?;

    let from_many = rel.from_cardinality() == Some(CARDINALITY_MANY);
    let to_many = rel.to_cardinality() == Some(CARDINALITY_MANY);
    let cardinality = match (from_many, to_many) {
        (true, false) => RelationshipCardinality::ManyToOne,
        (false, true) => RelationshipCardinality::OneToMany,
        (true, true) => RelationshipCardinality::ManyToMany,
        (false, false) => {
            if rel.from_cardinality().is_none() && rel.to_cardinality().is_none() {
                RelationshipCardinality::ManyToOne
            } else {
                RelationshipCardinality::OneToOne
            }
        }
    };

    let cross_filter_direction = if rel.cross_filtering_behavior() == Some(CROSS_FILTER_BOTH) {
        CrossFilterDirection::Both
    } else {
        CrossFilterDirection::Single
    };

    Some(ModelRelationship {
        from_table: from_table.to_string(),
        from_column: from_column.to_string(),
        to_table: to_table.to_string(),
        to_column: to_column.to_string(),
        cardinality,
        cross_filter_direction,
        is_active: rel.is_active(),
    })
}

fn build_roles(store: &MetadataStore, table_names: &FxHashMap<i64, &str>) -> Vec<ModelRole> {
    store
        .roles
        .iter()
        .map(RoleRecord)
        .filter_map(|role| {
            let role_id = role.id();
            let name = role.name()?.to_string();
            let table_permissions = store
                .table_permissions
                .iter()
                .map(TablePermissionRecord)
                .filter(|p| p.role_id() == Some(role_id))
                .filter_map(|p| {
                    let table = table_names.get(&p.table_id()?)?;
                    Some(TablePermission {
                        table: table.to_string(),
                        filter_expression: p.filter_expression().unwrap_or_default().to_string(),
                    })
                })
                .collect();
            Some(ModelRole {
                name,
                table_permissions,
            })
        })
        .collect()
}
