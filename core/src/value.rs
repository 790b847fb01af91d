//! Final value materialization.
//!
//! Raw dictionary entries (or affine-mapped indices for dictionary-less
//! columns) become typed values according to the column's AMO data type:
//! OLE-date shifting for datetimes, the fixed 1/10000 scale for decimals,
//! boolean coercion, and pass-through for the rest.

use crate::dictionary::DictionaryValue;
use serde::{Deserialize, Serialize};

/// Days between the OLE epoch (1899-12-30) and the Unix epoch.
const OLE_UNIX_EPOCH_DAYS: f64 = 25_569.0;
const MS_PER_DAY: f64 = 86_400_000.0;
const DECIMAL_SCALE: f64 = 10_000.0;

const AMO_INT64: i64 = 6;
const AMO_DATETIME: i64 = 9;
const AMO_DECIMAL: i64 = 10;
const AMO_BOOLEAN: i64 = 11;
const AMO_BINARY: i64 = 17;

/// One decoded cell value. Absent values (nulls) are `Option::None` at the
/// column level, mirroring how absent cells are handled elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataValue {
    Text(String),
    Int(i64),
    Number(f64),
    Bool(bool),
    /// Milliseconds since the Unix epoch.
    DateTime(i64),
    Blob(Vec<u8>),
}

/// Converts a dictionary entry to the column's surface type.
pub(crate) fn convert_dictionary_value(value: &DictionaryValue, data_type: i64) -> DataValue {
    match value {
        DictionaryValue::Text(s) => match data_type {
            // Huffman output is ISO-8859-1: one code point per stored byte.
            AMO_BINARY => DataValue::Blob(s.chars().map(|c| c as u8).collect()),
            _ => DataValue::Text(s.clone()),
        },
        DictionaryValue::Int(v) => convert_number(*v as f64, data_type),
        DictionaryValue::Real(v) => convert_number(*v, data_type),
    }
}

/// Converts an index of a dictionary-less column through the affine map
/// `(index + baseId) / magnitude`, then applies the type conversion.
pub(crate) fn convert_direct_value(
    index: u32,
    base_id: f64,
    magnitude: f64,
    data_type: i64,
) -> DataValue {
    let magnitude = if magnitude == 0.0 { 1.0 } else { magnitude };
    convert_number((index as f64 + base_id) / magnitude, data_type)
}

fn convert_number(value: f64, data_type: i64) -> DataValue {
    match data_type {
        AMO_DATETIME => DataValue::DateTime(ole_date_to_unix_ms(value)),
        AMO_DECIMAL => DataValue::Number(value / DECIMAL_SCALE),
        AMO_INT64 => DataValue::Int(value as i64),
        AMO_BOOLEAN => DataValue::Bool(value != 0.0),
        _ => DataValue::Number(value),
    }
}

fn ole_date_to_unix_ms(days: f64) -> i64 {
    ((days - OLE_UNIX_EPOCH_DAYS) * MS_PER_DAY).round() as i64
}
