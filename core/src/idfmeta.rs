//! `.idfmeta` header reader.
//!
//! The file is a fixed little-endian layout of tagged sections: a column
//! preamble (`<1:CP`), a compression-state section (`<1:CS`), the segment
//! statistics (`<1:SS`), and a trailing sub-segment count. Only a handful
//! of fields drive decoding; the rest are parsed for position and retained
//! uninterpreted.

use crate::cursor::Cursor;
use thiserror::Error;

const TAG_COLUMN_PREAMBLE: &[u8; 6] = b"<1:CP\0";
const TAG_COMPRESSION_STATE: &[u8; 6] = b"<1:CS\0";
const TAG_SEGMENT_STATS: &[u8; 6] = b"<1:SS\0";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IdfMetaError {
    #[error("idfmeta header is truncated or missing a section tag")]
    Malformed,
    #[error("idfmeta bit width {0} is out of range")]
    BitWidthOutOfRange(i64),
}

/// Parsed `.idfmeta` header. Fields with no decoding role are kept as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct IdfMeta {
    pub version: u64,
    pub min_data_id: u32,
    pub max_data_id: u32,
    pub original_min_segment_data_id: u32,
    pub count_bit_packed: u64,
    pub bit_width: u32,
    pub row_count: u64,
    pub distinct_states: u64,
    pub has_nulls: bool,
    pub rle_sort_order: i64,
    pub rle_runs: u64,
    pub others_rle_runs: u64,
    pub bookmark_bits: u64,
    pub storage_alloc_size: u64,
    pub storage_used_size: u64,
    pub segment_needs_resizing: bool,
    pub compression_info: u32,
}

pub fn parse_idfmeta(data: &[u8]) -> Result<IdfMeta, IdfMetaError> {
    let mut cur = Cursor::new(data);
    let malformed = || IdfMetaError::Malformed;

    cur.expect_tag(TAG_COLUMN_PREAMBLE).ok_or_else(malformed)?;
    let version = cur.u64().ok_or_else(malformed)?;

    cur.expect_tag(TAG_COMPRESSION_STATE).ok_or_else(malformed)?;
    let _records = cur.u64().ok_or_else(malformed)?;
    let _one = cur.u64().ok_or_else(malformed)?;
    let aba5a = cur.u32().ok_or_else(malformed)?;
    let iterator = cur.u32().ok_or_else(malformed)?;
    let bookmark_bits = cur.u64().ok_or_else(malformed)?;
    let storage_alloc_size = cur.u64().ok_or_else(malformed)?;
    let storage_used_size = cur.u64().ok_or_else(malformed)?;
    let segment_needs_resizing = cur.u8().ok_or_else(malformed)? != 0;
    let compression_info = cur.u32().ok_or_else(malformed)?;

    cur.expect_tag(TAG_SEGMENT_STATS).ok_or_else(malformed)?;
    let distinct_states = cur.u64().ok_or_else(malformed)?;
    let min_data_id = cur.u32().ok_or_else(malformed)?;
    let max_data_id = cur.u32().ok_or_else(malformed)?;
    let original_min_segment_data_id = cur.u32().ok_or_else(malformed)?;
    let rle_sort_order = cur.i64().ok_or_else(malformed)?;
    let row_count = cur.u64().ok_or_else(malformed)?;
    let has_nulls = cur.u8().ok_or_else(malformed)? != 0;
    let rle_runs = cur.u64().ok_or_else(malformed)?;
    let others_rle_runs = cur.u64().ok_or_else(malformed)?;
    cur.skip(6).ok_or_else(malformed)?;

    let _has_bit_packed_sub_seg = cur.u8().ok_or_else(malformed)?;
    cur.expect_tag(TAG_COMPRESSION_STATE).ok_or_else(malformed)?;
    let count_bit_packed = cur.u64().ok_or_else(malformed)?;

    let bit_width = (36 - aba5a as i64) + iterator as i64;
    if !(0..=64).contains(&bit_width) {
        return Err(IdfMetaError::BitWidthOutOfRange(bit_width));
    }

    Ok(IdfMeta {
        version,
        min_data_id,
        max_data_id,
        original_min_segment_data_id,
        count_bit_packed,
        bit_width: bit_width as u32,
        row_count,
        distinct_states,
        has_nulls,
        rle_sort_order,
        rle_runs,
        others_rle_runs,
        bookmark_bits,
        storage_alloc_size,
        storage_used_size,
        segment_needs_resizing,
        compression_info,
    })
}
