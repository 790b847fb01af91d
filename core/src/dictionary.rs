//! Column value dictionaries.
//!
//! A dictionary maps the small integer indices produced by the IDF decoder
//! to actual values. Three variants exist: long, real, and string. String
//! dictionaries are paged; a page is either raw UTF-16LE text with NUL
//! separators or a Huffman-compressed byte stream addressed through the
//! record-handle vector.

use crate::cursor::Cursor;
use crate::huffman::{expand_encode_array, HuffmanTree};
use rustc_hash::FxHashMap;
use thiserror::Error;

const DICT_TYPE_LONG: i32 = 0;
const DICT_TYPE_REAL: i32 = 1;
const DICT_TYPE_STRING: i32 = 2;

const PAGE_BEGIN_MARKER: u32 = 0xDDCC_BBAA;
const PAGE_END_MARKER: u32 = 0xCDAB_CDAB;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DictionaryError {
    #[error("dictionary file is truncated")]
    Truncated,
    #[error("unknown dictionary type {0}")]
    UnsupportedType(i32),
    #[error("unsupported element size {0}")]
    BadElementSize(u32),
    #[error("page marker mismatch")]
    BadMarker,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DictionaryValue {
    Text(String),
    Int(i64),
    Real(f64),
}

/// Decoded dictionary: values are keyed by consecutive data ids starting at
/// `minDataId`.
#[derive(Debug)]
pub(crate) struct Dictionary {
    min_data_id: u32,
    values: Vec<DictionaryValue>,
}

impl Dictionary {
    pub(crate) fn get(&self, data_id: u32) -> Option<&DictionaryValue> {
        let index = data_id.checked_sub(self.min_data_id)? as usize;
        self.values.get(index)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }
}

pub(crate) fn parse_dictionary(
    data: &[u8],
    min_data_id: u32,
) -> Result<Dictionary, DictionaryError> {
    let mut cur = Cursor::new(data);
    let dictionary_type = cur.i32().ok_or(DictionaryError::Truncated)?;
    // Hash information block: six reserved i32 values, not interpreted.
    cur.skip(6 * 4).ok_or(DictionaryError::Truncated)?;

    let values = match dictionary_type {
        DICT_TYPE_LONG => parse_numeric(&mut cur, false)?,
        DICT_TYPE_REAL => parse_numeric(&mut cur, true)?,
        DICT_TYPE_STRING => parse_string(&mut cur)?,
        other => return Err(DictionaryError::UnsupportedType(other)),
    };

    Ok(Dictionary {
        min_data_id,
        values,
    })
}

fn parse_numeric(
    cur: &mut Cursor<'_>,
    is_real: bool,
) -> Result<Vec<DictionaryValue>, DictionaryError> {
    let count = cur.u64().ok_or(DictionaryError::Truncated)?;
    let element_size = cur.u32().ok_or(DictionaryError::Truncated)?;

    let mut values = Vec::with_capacity(count.min(u32::MAX as u64) as usize);
    for _ in 0..count {
        let value = match (is_real, element_size) {
            (false, 4) => DictionaryValue::Int(cur.i32().ok_or(DictionaryError::Truncated)? as i64),
            (false, 8) => DictionaryValue::Int(cur.i64().ok_or(DictionaryError::Truncated)?),
            (true, 4) => {
                DictionaryValue::Real(cur.i32().ok_or(DictionaryError::Truncated)? as f64)
            }
            (true, 8) => DictionaryValue::Real(cur.f64().ok_or(DictionaryError::Truncated)?),
            _ => return Err(DictionaryError::BadElementSize(element_size)),
        };
        values.push(value);
    }
    Ok(values)
}

enum PageData {
    Uncompressed {
        text: Vec<u8>,
    },
    Compressed {
        total_bits: u32,
        encode_array: [u8; 128],
        payload: Vec<u8>,
    },
}

fn parse_string(cur: &mut Cursor<'_>) -> Result<Vec<DictionaryValue>, DictionaryError> {
    let _store_string_count = cur.i64().ok_or(DictionaryError::Truncated)?;
    let _f_store_compressed = cur.i8().ok_or(DictionaryError::Truncated)?;
    let _store_longest_string = cur.i64().ok_or(DictionaryError::Truncated)?;
    let store_page_count = cur.i64().ok_or(DictionaryError::Truncated)?;

    let mut pages = Vec::new();
    for _ in 0..store_page_count.max(0) {
        pages.push(parse_page(cur)?);
    }

    // DictionaryRecordHandlesVector: (offset, pageId) pairs grouped by
    // page, preserving order.
    let handle_count = cur.u64().ok_or(DictionaryError::Truncated)?;
    let element_size = cur.u32().ok_or(DictionaryError::Truncated)?;
    if element_size != 8 {
        return Err(DictionaryError::BadElementSize(element_size));
    }
    let mut handles_by_page: FxHashMap<u32, Vec<u32>> = FxHashMap::default();
    for _ in 0..handle_count {
        let offset = cur.u32().ok_or(DictionaryError::Truncated)?;
        let page_id = cur.u32().ok_or(DictionaryError::Truncated)?;
        handles_by_page.entry(page_id).or_default().push(offset);
    }

    let mut values = Vec::new();
    for (page_id, page) in pages.iter().enumerate() {
        match page {
            PageData::Uncompressed { text } => {
                let decoded = decode_utf16le(text);
                let mut strings: Vec<&str> = decoded.split('\0').collect();
                if strings.last() == Some(&"") {
                    strings.pop();
                }
                values.extend(strings.into_iter().map(|s| DictionaryValue::Text(s.to_string())));
            }
            PageData::Compressed {
                total_bits,
                encode_array,
                payload,
            } => {
                let tree = HuffmanTree::from_lengths(&expand_encode_array(encode_array));
                let offsets = handles_by_page
                    .get(&(page_id as u32))
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                for (i, &start) in offsets.iter().enumerate() {
                    let end = offsets
                        .get(i + 1)
                        .copied()
                        .unwrap_or(*total_bits);
                    let text = tree.decode_bits(payload, start as u64, end as u64);
                    values.push(DictionaryValue::Text(text));
                }
            }
        }
    }
    Ok(values)
}

fn parse_page(cur: &mut Cursor<'_>) -> Result<PageData, DictionaryError> {
    let _page_mask = cur.u64().ok_or(DictionaryError::Truncated)?;
    let _page_contains_nulls = cur.u8().ok_or(DictionaryError::Truncated)?;
    let _page_start_index = cur.u64().ok_or(DictionaryError::Truncated)?;
    let _page_string_count = cur.u64().ok_or(DictionaryError::Truncated)?;
    let page_compressed = cur.u8().ok_or(DictionaryError::Truncated)?;
    if cur.u32().ok_or(DictionaryError::Truncated)? != PAGE_BEGIN_MARKER {
        return Err(DictionaryError::BadMarker);
    }

    let page = if page_compressed != 0 {
        let total_bits = cur.u32().ok_or(DictionaryError::Truncated)?;
        let _char_set_id = cur.u32().ok_or(DictionaryError::Truncated)?;
        let alloc_size = cur.u64().ok_or(DictionaryError::Truncated)?;
        let _char_set_used = cur.u8().ok_or(DictionaryError::Truncated)?;
        let _ui_decode_bits = cur.u32().ok_or(DictionaryError::Truncated)?;
        let encode_array: [u8; 128] = cur
            .take(128)
            .and_then(|b| b.try_into().ok())
            .ok_or(DictionaryError::Truncated)?;
        let _buffer_size = cur.u64().ok_or(DictionaryError::Truncated)?;
        let payload = cur
            .take(alloc_size as usize)
            .ok_or(DictionaryError::Truncated)?
            .to_vec();
        PageData::Compressed {
            total_bits,
            encode_array,
            payload,
        }
    } else {
        let _remaining = cur.u64().ok_or(DictionaryError::Truncated)?;
        let _used = cur.u64().ok_or(DictionaryError::Truncated)?;
        let alloc_size = cur.u64().ok_or(DictionaryError::Truncated)?;
        let text = cur
            .take(alloc_size as usize)
            .ok_or(DictionaryError::Truncated)?
            .to_vec();
        PageData::Uncompressed { text }
    };

    if cur.u32().ok_or(DictionaryError::Truncated)? != PAGE_END_MARKER {
        return Err(DictionaryError::BadMarker);
    }
    Ok(page)
}

fn decode_utf16le(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}
