//! Read-only SQLite reader for the embedded `metadata.sqlitedb`.
//!
//! Covers exactly what the metadata tables need: the 100-byte header, table
//! B-trees (leaf `0x0D`, interior `0x05`), the record format, and payload
//! overflow chains. Writes, indices, and freelists are out of scope.
//!
//! Cells that fail to parse are skipped silently; the metadata files seen
//! in the wild occasionally carry truncated trailing cells.

use rustc_hash::FxHashMap;
use thiserror::Error;

const MAGIC: &[u8; 16] = b"SQLite format 3\0";
const FILE_HEADER_SIZE: usize = 100;
const MAX_BTREE_DEPTH: usize = 64;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SqliteError {
    #[error("not a SQLite database (bad magic)")]
    InvalidMagic,
    #[error("database file is truncated")]
    Truncated,
    #[error("unknown table: {0}")]
    UnknownTable(String),
}

/// One decoded column value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Int(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl SqlValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Int(v) => Some(*v),
            SqlValue::Real(v) => Some(*v as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SqlValue::Int(v) => Some(*v as f64),
            SqlValue::Real(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// One table row: the surrogate rowid plus the ordered record values.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlRow {
    pub rowid: i64,
    pub values: Vec<SqlValue>,
}

impl SqlRow {
    pub fn int(&self, index: usize) -> Option<i64> {
        self.values.get(index).and_then(SqlValue::as_i64)
    }

    pub fn real(&self, index: usize) -> Option<f64> {
        self.values.get(index).and_then(SqlValue::as_f64)
    }

    pub fn text(&self, index: usize) -> Option<&str> {
        self.values.get(index).and_then(SqlValue::as_str)
    }

    pub fn flag(&self, index: usize) -> bool {
        self.int(index).is_some_and(|v| v != 0)
    }
}

#[derive(Debug)]
pub struct SqliteDb {
    data: Vec<u8>,
    page_size: usize,
    usable_size: usize,
    tables: FxHashMap<String, u32>,
}

impl SqliteDb {
    pub fn open(data: Vec<u8>) -> Result<SqliteDb, SqliteError> {
        if data.len() < FILE_HEADER_SIZE {
            return Err(SqliteError::Truncated);
        }
        if &data[..MAGIC.len()] != MAGIC {
            return Err(SqliteError::InvalidMagic);
        }

        let raw_page_size = u16::from_be_bytes([data[16], data[17]]);
        let page_size = match raw_page_size {
            0 | 1 => 65_536,
            n => n as usize,
        };
        let reserved = data[20] as usize;
        let usable_size = page_size.saturating_sub(reserved);
        if usable_size < 64 || data.len() < page_size {
            return Err(SqliteError::Truncated);
        }

        let mut db = SqliteDb {
            data,
            page_size,
            usable_size,
            tables: FxHashMap::default(),
        };
        db.load_master();
        Ok(db)
    }

    /// Names of all ordinary tables found in `sqlite_master`.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn get_table_rows(&self, name: &str) -> Result<Vec<SqlRow>, SqliteError> {
        let root = *self
            .tables
            .get(name)
            .ok_or_else(|| SqliteError::UnknownTable(name.to_string()))?;
        let mut rows = Vec::new();
        self.walk_table(root, 0, &mut rows);
        Ok(rows)
    }

    /// `sqlite_master` is rooted on page 1; record layout is
    /// `(type, name, tbl_name, rootpage, sql)`.
    fn load_master(&mut self) {
        let mut rows = Vec::new();
        self.walk_table(1, 0, &mut rows);
        for row in rows {
            let is_table = row.values.first().and_then(SqlValue::as_str) == Some("table");
            if !is_table {
                continue;
            }
            let (Some(name), Some(root)) = (row.text(1), row.int(3)) else {
                continue;
            };
            if root > 0 {
                self.tables.insert(name.to_string(), root as u32);
            }
        }
    }

    fn page(&self, page_no: u32) -> Option<&[u8]> {
        let start = (page_no as usize).checked_sub(1)?.checked_mul(self.page_size)?;
        self.data.get(start..start + self.page_size)
    }

    fn walk_table(&self, page_no: u32, depth: usize, out: &mut Vec<SqlRow>) {
        if depth > MAX_BTREE_DEPTH {
            return;
        }
        let Some(page) = self.page(page_no) else {
            return;
        };
        let header_offset = if page_no == 1 { FILE_HEADER_SIZE } else { 0 };
        let Some(&page_type) = page.get(header_offset) else {
            return;
        };
        let Some(cell_count) = read_u16_at(page, header_offset + 3).map(usize::from) else {
            return;
        };

        match page_type {
            0x05 => {
                let pointers = header_offset + 12;
                for i in 0..cell_count {
                    let Some(cell_offset) = read_u16_at(page, pointers + i * 2) else {
                        continue;
                    };
                    if let Some(child) = read_u32_at(page, cell_offset as usize) {
                        self.walk_table(child, depth + 1, out);
                    }
                }
                if let Some(right_most) = read_u32_at(page, header_offset + 8) {
                    if right_most != 0 {
                        self.walk_table(right_most, depth + 1, out);
                    }
                }
            }
            0x0D => {
                let pointers = header_offset + 8;
                for i in 0..cell_count {
                    let Some(cell_offset) = read_u16_at(page, pointers + i * 2) else {
                        continue;
                    };
                    if let Some(row) = self.read_leaf_cell(page, cell_offset as usize) {
                        out.push(row);
                    }
                }
            }
            _ => {}
        }
    }

    fn read_leaf_cell(&self, page: &[u8], cell_offset: usize) -> Option<SqlRow> {
        let (payload_len, pos) = read_varint(page, cell_offset)?;
        let (rowid, pos) = read_varint(page, pos)?;
        let payload = self.assemble_payload(page, pos, payload_len as usize)?;
        let values = parse_record(&payload)?;
        Some(SqlRow {
            rowid: rowid as i64,
            values,
        })
    }

    /// Collects a cell payload, following the overflow chain when the local
    /// portion (per SQLite's maxLocal/minLocal derivation) is short.
    fn assemble_payload(&self, page: &[u8], start: usize, payload_len: usize) -> Option<Vec<u8>> {
        let usable = self.usable_size;
        let max_local = usable.checked_sub(35)?;
        let min_local = ((usable.checked_sub(12)? * 32) / 255).saturating_sub(23);

        let local = if payload_len <= max_local {
            payload_len
        } else {
            let k = min_local + (payload_len - min_local) % (usable - 4);
            if k <= max_local {
                k
            } else {
                min_local
            }
        };

        let local_bytes = page.get(start..start + local)?;
        if local == payload_len {
            return Some(local_bytes.to_vec());
        }

        let mut payload = Vec::with_capacity(payload_len);
        payload.extend_from_slice(local_bytes);
        let mut next = read_u32_at(page, start + local)?;
        let mut hops = 0usize;
        while payload.len() < payload_len && next != 0 {
            hops += 1;
            if hops > self.data.len() / self.page_size + 1 {
                return None;
            }
            let overflow = self.page(next)?;
            next = read_u32_at(overflow, 0)?;
            let want = payload_len - payload.len();
            let chunk = overflow.get(4..4 + (usable - 4).min(want))?;
            payload.extend_from_slice(chunk);
        }
        if payload.len() == payload_len {
            Some(payload)
        } else {
            None
        }
    }
}

/// SQLite varint: up to eight 7-bit continuation bytes, then a ninth byte
/// contributing all 8 bits.
pub(crate) fn read_varint(buf: &[u8], pos: usize) -> Option<(u64, usize)> {
    let mut value: u64 = 0;
    for i in 0..8 {
        let byte = *buf.get(pos + i)?;
        value = (value << 7) | (byte & 0x7F) as u64;
        if byte & 0x80 == 0 {
            return Some((value, pos + i + 1));
        }
    }
    let byte = *buf.get(pos + 8)?;
    Some(((value << 8) | byte as u64, pos + 9))
}

fn serial_type_size(serial: u64) -> usize {
    match serial {
        0 | 8 | 9 => 0,
        1 => 1,
        2 => 2,
        3 => 3,
        4 => 4,
        5 => 6,
        6 | 7 => 8,
        n if n >= 12 => ((n - 12) / 2) as usize,
        _ => 0,
    }
}

/// Big-endian two's-complement integer of 1/2/3/4/6/8 bytes.
fn read_signed_be(bytes: &[u8]) -> i64 {
    let mut value: i64 = 0;
    for &b in bytes {
        value = (value << 8) | b as i64;
    }
    let shift = (8 - bytes.len()) * 8;
    (value << shift) >> shift
}

fn parse_record(payload: &[u8]) -> Option<Vec<SqlValue>> {
    let (header_size, mut pos) = read_varint(payload, 0)?;
    let header_end = header_size as usize;
    // The header length counts its own varint, so it can never be shorter
    // than the bytes read so far.
    if header_end < pos || header_end > payload.len() {
        return None;
    }

    let mut serials = Vec::new();
    while pos < header_end {
        let (serial, next) = read_varint(payload, pos)?;
        serials.push(serial);
        pos = next;
    }

    let mut values = Vec::with_capacity(serials.len());
    let mut body = header_end;
    for serial in serials {
        let size = serial_type_size(serial);
        let bytes = payload.get(body..body + size)?;
        body += size;
        let value = match serial {
            0 => SqlValue::Null,
            1..=6 => SqlValue::Int(read_signed_be(bytes)),
            7 => {
                let array: [u8; 8] = bytes.try_into().ok()?;
                SqlValue::Real(f64::from_be_bytes(array))
            }
            8 => SqlValue::Int(0),
            9 => SqlValue::Int(1),
            n if n >= 12 && n % 2 == 0 => SqlValue::Blob(bytes.to_vec()),
            n if n >= 13 => SqlValue::Text(String::from_utf8_lossy(bytes).into_owned()),
            _ => SqlValue::Null,
        };
        values.push(value);
    }
    Some(values)
}

fn read_u16_at(buf: &[u8], pos: usize) -> Option<u16> {
    let bytes = buf.get(pos..pos + 2)?;
    Some(u16::from_be_bytes([bytes[0], bytes[1]]))
}

fn read_u32_at(buf: &[u8], pos: usize) -> Option<u32> {
    let bytes = buf.get(pos..pos + 4)?;
    Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}
