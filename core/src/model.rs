//! Normalized semantic-model shape surfaced to callers.
//!
//! This is the common description every Power BI source format reduces to;
//! for `.pbix` it is assembled from the embedded SQLite metadata.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TableType {
    Import,
    DirectQuery,
    Dual,
    Calculated,
}

impl TableType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Import => "import",
            Self::DirectQuery => "directQuery",
            Self::Dual => "dual",
            Self::Calculated => "calculated",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationshipCardinality {
    ManyToOne,
    OneToMany,
    OneToOne,
    ManyToMany,
}

impl RelationshipCardinality {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ManyToOne => "manyToOne",
            Self::OneToMany => "oneToMany",
            Self::OneToOne => "oneToOne",
            Self::ManyToMany => "manyToMany",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CrossFilterDirection {
    Single,
    Both,
}

impl CrossFilterDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Both => "both",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticModel {
    pub name: String,
    pub compatibility_level: u32,
    pub culture: String,
    pub source_format: String,
    pub tables: Vec<ModelTable>,
    pub relationships: Vec<ModelRelationship>,
    pub roles: Vec<ModelRole>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelTable {
    pub name: String,
    #[serde(rename = "type")]
    pub table_type: TableType,
    pub is_hidden: bool,
    pub description: String,
    pub columns: Vec<ModelColumn>,
    pub measures: Vec<ModelMeasure>,
    pub hierarchies: Vec<String>,
    pub partitions: Vec<String>,
    pub calculation_items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelColumn {
    pub name: String,
    pub data_type: String,
    pub is_hidden: bool,
    pub description: String,
    /// DAX expression, present only on calculated columns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelMeasure {
    pub name: String,
    pub description: String,
    pub expression: String,
    pub format_string: String,
    pub is_hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelRelationship {
    pub from_table: String,
    pub from_column: String,
    pub to_table: String,
    pub to_column: String,
    pub cardinality: RelationshipCardinality,
    pub cross_filter_direction: CrossFilterDirection,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelRole {
    pub name: String,
    pub table_permissions: Vec<TablePermission>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TablePermission {
    pub table: String,
    pub filter_expression: String,
}

/// Textual label for an AMO data-type code.
pub fn data_type_label(code: i64) -> &'static str {
    match code {
        2 => "string",
        6 => "int64",
        8 => "double",
        9 => "dateTime",
        10 => "decimal",
        11 => "boolean",
        17 => "binary",
        _ => "unknown",
    }
}
