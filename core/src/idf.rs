//! `.idf` index decoder.
//!
//! An IDF file holds the column's dictionary-index sequence in two parts: a
//! primary segment of `{dataValue, repeatValue}` RLE entries and an
//! optional bit-packed sub-segment of `u64` words. Primary entries whose
//! `dataValue` wraps to `0xFFFFFFFF` against the current bit-pack offset
//! are markers that splice in `repeatValue` bit-packed values.

use crate::cursor::Cursor;
use crate::idfmeta::IdfMeta;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IdfError {
    #[error("idf file is truncated")]
    Truncated,
    #[error("bit-pack marker spans past the sub-segment")]
    BitPackOverrun,
    #[error("decoded {got} values, idfmeta declares {expected} rows")]
    RowCountMismatch { got: usize, expected: u64 },
}

/// Reconstructs the length-`rowCount` dictionary-index sequence for one
/// column segment.
pub fn decode_column_indices(data: &[u8], meta: &IdfMeta) -> Result<Vec<u32>, IdfError> {
    let mut cur = Cursor::new(data);

    let primary_count = cur.u64().ok_or(IdfError::Truncated)? as usize;
    let mut primary = Vec::with_capacity(primary_count.min(data.len() / 8));
    for _ in 0..primary_count {
        let data_value = cur.u32().ok_or(IdfError::Truncated)?;
        let repeat_value = cur.u32().ok_or(IdfError::Truncated)?;
        primary.push((data_value, repeat_value));
    }

    let sub_count = cur.u64().ok_or(IdfError::Truncated)? as usize;
    let mut sub_segment = Vec::with_capacity(sub_count.min(data.len() / 8));
    for _ in 0..sub_count {
        sub_segment.push(cur.u64().ok_or(IdfError::Truncated)?);
    }

    let bit_packed = expand_bit_packed(&sub_segment, meta);

    let mut out = Vec::with_capacity(meta.row_count as usize);
    let mut bp_offset = 0usize;
    for (data_value, repeat_value) in primary {
        let repeat = repeat_value as usize;
        if data_value.wrapping_add(bp_offset as u32) == u32::MAX {
            let end = bp_offset.checked_add(repeat).ok_or(IdfError::BitPackOverrun)?;
            let run = bit_packed.get(bp_offset..end).ok_or(IdfError::BitPackOverrun)?;
            out.extend_from_slice(run);
            bp_offset = end;
        } else {
            out.extend(std::iter::repeat(data_value).take(repeat));
        }
    }

    if out.len() as u64 != meta.row_count {
        return Err(IdfError::RowCountMismatch {
            got: out.len(),
            expected: meta.row_count,
        });
    }
    Ok(out)
}

/// Expands the sub-segment words into dictionary indices, `bitWidth` bits
/// per value from the low end of each word, offset by `minDataId`.
fn expand_bit_packed(sub_segment: &[u64], meta: &IdfMeta) -> Vec<u32> {
    if meta.count_bit_packed == 0 || sub_segment.is_empty() {
        return Vec::new();
    }

    let count = meta.count_bit_packed as usize;

    // A single all-zero word collapses to "every value is minDataId".
    if sub_segment == [0] {
        return vec![meta.min_data_id; count];
    }
    if meta.bit_width == 0 {
        return vec![meta.min_data_id; count];
    }

    let bit_width = meta.bit_width.min(64);
    let mask = if bit_width == 64 {
        u64::MAX
    } else {
        (1u64 << bit_width) - 1
    };
    let per_word = (64 / bit_width) as usize;

    let mut values = Vec::with_capacity(sub_segment.len() * per_word);
    for &word in sub_segment {
        let mut word = word;
        for _ in 0..per_word {
            values.push((word & mask) as u32 + meta.min_data_id);
            word = if bit_width == 64 { 0 } else { word >> bit_width };
        }
    }
    values
}
