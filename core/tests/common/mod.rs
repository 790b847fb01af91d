//! Common test utilities shared across integration tests.
//!
//! Everything here builds synthetic DataModel streams from scratch: a
//! minimal SQLite database writer, IDF/idfmeta/dictionary blob builders,
//! ABF assembly, and stored-block XPress9 framing — so the full pipeline
//! runs without the proprietary codec.

#![allow(dead_code)]

use pbix_extract::SqlValue;

pub const PAGE_SIZE: usize = 2048;

// ---------------------------------------------------------------------------
// SQLite database writer
// ---------------------------------------------------------------------------

/// Builds a database with one leaf page per table; `sqlite_master` lives on
/// page 1 and overflow pages are appended at the end.
pub fn build_sqlite_db(tables: &[(&str, Vec<(i64, Vec<SqlValue>)>)]) -> Vec<u8> {
    let mut overflow: Vec<Vec<u8>> = Vec::new();
    let first_overflow_page = 2 + tables.len() as u32;

    let mut master_rows = Vec::new();
    let mut table_pages = Vec::new();
    for (i, (name, rows)) in tables.iter().enumerate() {
        let root = 2 + i as u32;
        master_rows.push((
            (i + 1) as i64,
            vec![
                SqlValue::Text("table".into()),
                SqlValue::Text((*name).into()),
                SqlValue::Text((*name).into()),
                SqlValue::Int(root as i64),
                SqlValue::Text(format!("CREATE TABLE [{name}] (...)")),
            ],
        ));
        table_pages.push(build_leaf_page(rows, 0, first_overflow_page, &mut overflow));
    }

    let page1 = build_leaf_page(&master_rows, 100, first_overflow_page, &mut overflow);

    let mut db = Vec::new();
    let mut first = vec![0u8; 100];
    first[..16].copy_from_slice(b"SQLite format 3\0");
    first[16..18].copy_from_slice(&(PAGE_SIZE as u16).to_be_bytes());
    first[18] = 1;
    first[19] = 1;
    first.extend_from_slice(&page1);
    assert!(first.len() <= PAGE_SIZE, "sqlite_master page overflowed");
    first.resize(PAGE_SIZE, 0);
    db.extend_from_slice(&first);
    for page in table_pages {
        db.extend_from_slice(&page);
    }
    for page in overflow {
        db.extend_from_slice(&page);
    }
    db
}

fn build_leaf_page(
    rows: &[(i64, Vec<SqlValue>)],
    header_offset: usize,
    first_overflow_page: u32,
    overflow: &mut Vec<Vec<u8>>,
) -> Vec<u8> {
    let mut page = vec![0u8; PAGE_SIZE - header_offset];
    page[0] = 0x0D;
    page[3..5].copy_from_slice(&(rows.len() as u16).to_be_bytes());

    let cells: Vec<Vec<u8>> = rows
        .iter()
        .map(|(rowid, values)| build_cell(*rowid, values, first_overflow_page, overflow))
        .collect();

    let mut content_end = page.len();
    let mut pointer = 8usize;
    for cell in &cells {
        content_end = content_end
            .checked_sub(cell.len())
            .expect("leaf page overflowed; grow PAGE_SIZE or split the fixture");
        page[content_end..content_end + cell.len()].copy_from_slice(cell);
        let absolute = (content_end + header_offset) as u16;
        page[pointer..pointer + 2].copy_from_slice(&absolute.to_be_bytes());
        pointer += 2;
    }
    page[5..7].copy_from_slice(&((content_end + header_offset) as u16).to_be_bytes());
    page
}

fn build_cell(
    rowid: i64,
    values: &[SqlValue],
    first_overflow_page: u32,
    overflow: &mut Vec<Vec<u8>>,
) -> Vec<u8> {
    let payload = build_record(values);
    let usable = PAGE_SIZE;
    let max_local = usable - 35;
    let min_local = (usable - 12) * 32 / 255 - 23;

    let mut cell = Vec::new();
    encode_varint(payload.len() as u64, &mut cell);
    encode_varint(rowid as u64, &mut cell);

    if payload.len() <= max_local {
        cell.extend_from_slice(&payload);
        return cell;
    }

    let k = min_local + (payload.len() - min_local) % (usable - 4);
    let local = if k <= max_local { k } else { min_local };
    cell.extend_from_slice(&payload[..local]);

    let mut rest = &payload[local..];
    let mut page_no = first_overflow_page + overflow.len() as u32;
    cell.extend_from_slice(&page_no.to_be_bytes());
    while !rest.is_empty() {
        let take = rest.len().min(usable - 4);
        let (chunk, remainder) = rest.split_at(take);
        rest = remainder;
        let next = if rest.is_empty() { 0 } else { page_no + 1 };
        let mut page = vec![0u8; PAGE_SIZE];
        page[..4].copy_from_slice(&next.to_be_bytes());
        page[4..4 + chunk.len()].copy_from_slice(chunk);
        overflow.push(page);
        page_no += 1;
    }
    cell
}

fn build_record(values: &[SqlValue]) -> Vec<u8> {
    let mut serials = Vec::new();
    let mut body = Vec::new();
    for value in values {
        match value {
            SqlValue::Null => serials.push(0u64),
            SqlValue::Int(v) => {
                serials.push(6);
                body.extend_from_slice(&v.to_be_bytes());
            }
            SqlValue::Real(v) => {
                serials.push(7);
                body.extend_from_slice(&v.to_be_bytes());
            }
            SqlValue::Text(s) => {
                serials.push(13 + 2 * s.len() as u64);
                body.extend_from_slice(s.as_bytes());
            }
            SqlValue::Blob(b) => {
                serials.push(12 + 2 * b.len() as u64);
                body.extend_from_slice(b);
            }
        }
    }

    let mut serial_bytes = Vec::new();
    for serial in &serials {
        encode_varint(*serial, &mut serial_bytes);
    }
    let mut header_len = serial_bytes.len() + 1;
    if header_len >= 128 {
        header_len += 1;
    }
    let mut record = Vec::new();
    encode_varint(header_len as u64, &mut record);
    record.extend_from_slice(&serial_bytes);
    record.extend_from_slice(&body);
    record
}

fn encode_varint(mut value: u64, out: &mut Vec<u8>) {
    if value >> 56 != 0 {
        for i in (0..8).rev() {
            out.push((((value >> (8 + 7 * i)) & 0x7F) as u8) | 0x80);
        }
        out.push(value as u8);
        return;
    }
    let mut stack = vec![(value & 0x7F) as u8];
    value >>= 7;
    while value != 0 {
        stack.push((value & 0x7F) as u8 | 0x80);
        value >>= 7;
    }
    stack.reverse();
    out.extend_from_slice(&stack);
}

// ---------------------------------------------------------------------------
// Column storage blobs
// ---------------------------------------------------------------------------

pub fn build_idfmeta(
    min_data_id: u32,
    row_count: u64,
    count_bit_packed: u64,
    bit_width: u32,
) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"<1:CP\0");
    out.extend_from_slice(&1u64.to_le_bytes());
    out.extend_from_slice(b"<1:CS\0");
    out.extend_from_slice(&row_count.to_le_bytes());
    out.extend_from_slice(&1u64.to_le_bytes());
    out.extend_from_slice(&36u32.to_le_bytes()); // keeps bitWidth = iterator
    out.extend_from_slice(&bit_width.to_le_bytes());
    out.extend_from_slice(&0u64.to_le_bytes());
    out.extend_from_slice(&0u64.to_le_bytes());
    out.extend_from_slice(&0u64.to_le_bytes());
    out.push(0);
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(b"<1:SS\0");
    out.extend_from_slice(&0u64.to_le_bytes());
    out.extend_from_slice(&min_data_id.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&min_data_id.to_le_bytes());
    out.extend_from_slice(&(-1i64).to_le_bytes());
    out.extend_from_slice(&row_count.to_le_bytes());
    out.push(0);
    out.extend_from_slice(&0u64.to_le_bytes());
    out.extend_from_slice(&0u64.to_le_bytes());
    out.extend_from_slice(b"1:SS>\0");
    out.push(u8::from(count_bit_packed > 0));
    out.extend_from_slice(b"<1:CS\0");
    out.extend_from_slice(&count_bit_packed.to_le_bytes());
    out
}

pub fn build_idf(primary: &[(u32, u32)], sub: &[u64]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&(primary.len() as u64).to_le_bytes());
    for (data_value, repeat_value) in primary {
        out.extend_from_slice(&data_value.to_le_bytes());
        out.extend_from_slice(&repeat_value.to_le_bytes());
    }
    out.extend_from_slice(&(sub.len() as u64).to_le_bytes());
    for word in sub {
        out.extend_from_slice(&word.to_le_bytes());
    }
    out
}

pub fn build_long_dictionary(values: &[i64]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&0i32.to_le_bytes());
    out.extend_from_slice(&[0u8; 24]);
    out.extend_from_slice(&(values.len() as u64).to_le_bytes());
    out.extend_from_slice(&8u32.to_le_bytes());
    for v in values {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out
}

pub fn build_real_dictionary(values: &[f64]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&1i32.to_le_bytes());
    out.extend_from_slice(&[0u8; 24]);
    out.extend_from_slice(&(values.len() as u64).to_le_bytes());
    out.extend_from_slice(&8u32.to_le_bytes());
    for v in values {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out
}

/// String dictionary with a single uncompressed UTF-16LE page.
pub fn build_string_dictionary(strings: &[&str]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&2i32.to_le_bytes());
    out.extend_from_slice(&[0u8; 24]);
    out.extend_from_slice(&(strings.len() as i64).to_le_bytes());
    out.push(0); // fStoreCompressed
    out.extend_from_slice(&32i64.to_le_bytes());
    out.extend_from_slice(&1i64.to_le_bytes()); // storePageCount

    out.extend_from_slice(&0u64.to_le_bytes()); // pageMask
    out.push(0); // pageContainsNulls
    out.extend_from_slice(&0u64.to_le_bytes()); // pageStartIndex
    out.extend_from_slice(&(strings.len() as u64).to_le_bytes());
    out.push(0); // pageCompressed
    out.extend_from_slice(&0xDDCC_BBAAu32.to_le_bytes());
    let mut text = Vec::new();
    for s in strings {
        for unit in s.encode_utf16() {
            text.extend_from_slice(&unit.to_le_bytes());
        }
        text.extend_from_slice(&[0, 0]);
    }
    out.extend_from_slice(&0u64.to_le_bytes()); // remaining
    out.extend_from_slice(&(text.len() as u64).to_le_bytes()); // used
    out.extend_from_slice(&(text.len() as u64).to_le_bytes()); // allocSize
    out.extend_from_slice(&text);
    out.extend_from_slice(&0xCDAB_CDABu32.to_le_bytes());

    // One handle per string so the record-handle vector stays faithful to
    // real files even though uncompressed assembly ignores it.
    out.extend_from_slice(&(strings.len() as u64).to_le_bytes());
    out.extend_from_slice(&8u32.to_le_bytes());
    for (i, _) in strings.iter().enumerate() {
        out.extend_from_slice(&(i as u32).to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
    }
    out
}

/// String dictionary with a single Huffman-compressed page.
pub fn build_compressed_string_dictionary(
    total_bits: u32,
    encode_array: &[u8; 128],
    payload: &[u8],
    handle_offsets: &[u32],
) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&2i32.to_le_bytes());
    out.extend_from_slice(&[0u8; 24]);
    out.extend_from_slice(&(handle_offsets.len() as i64).to_le_bytes());
    out.push(1); // fStoreCompressed
    out.extend_from_slice(&32i64.to_le_bytes());
    out.extend_from_slice(&1i64.to_le_bytes());

    out.extend_from_slice(&0u64.to_le_bytes());
    out.push(0);
    out.extend_from_slice(&0u64.to_le_bytes());
    out.extend_from_slice(&(handle_offsets.len() as u64).to_le_bytes());
    out.push(1); // pageCompressed
    out.extend_from_slice(&0xDDCC_BBAAu32.to_le_bytes());
    out.extend_from_slice(&total_bits.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes()); // charSetId
    out.extend_from_slice(&(payload.len() as u64).to_le_bytes()); // allocSize
    out.push(1); // charSetUsed
    out.extend_from_slice(&0u32.to_le_bytes()); // uiDecodeBits
    out.extend_from_slice(encode_array);
    out.extend_from_slice(&(payload.len() as u64).to_le_bytes()); // bufferSize
    out.extend_from_slice(payload);
    out.extend_from_slice(&0xCDAB_CDABu32.to_le_bytes());

    out.extend_from_slice(&(handle_offsets.len() as u64).to_le_bytes());
    out.extend_from_slice(&8u32.to_le_bytes());
    for &offset in handle_offsets {
        out.extend_from_slice(&offset.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
    }
    out
}

// ---------------------------------------------------------------------------
// ABF + XPress9 assembly
// ---------------------------------------------------------------------------

fn utf16le(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(|u| u.to_le_bytes()).collect()
}

/// Lays out an ABF stream: filler, the UTF-16LE BackupLogHeader at offset
/// 72, file payloads, the BackupLog document, and the VirtualDirectory.
pub fn build_abf(files: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let data_start = 4096usize;
    let mut body = Vec::new();
    let mut spans = Vec::new();

    for (name, payload) in files {
        spans.push((name.to_string(), data_start + body.len(), payload.len()));
        body.extend_from_slice(payload);
    }

    let mut log = String::from("<BackupLog>");
    for (name, offset, size) in &spans {
        log.push_str(&format!(
            "<BackupFile><Path>Model\\{name}</Path><StoragePath>{offset}</StoragePath><Size>{size}</Size></BackupFile>"
        ));
    }
    log.push_str("</BackupLog>");
    let mut log_bytes = vec![0xFF, 0xFE];
    log_bytes.extend_from_slice(&utf16le(&log));
    let log_offset = data_start + body.len();
    let log_size = log_bytes.len();
    body.extend_from_slice(&log_bytes);

    let mut vd = String::from("<VirtualDirectory>");
    for (_, offset, size) in &spans {
        vd.push_str(&format!(
            "<BackupFile><Path>{offset}</Path><Size>{size}</Size><m_cbOffsetHeader>{offset}</m_cbOffsetHeader></BackupFile>"
        ));
    }
    vd.push_str(&format!(
        "<BackupFile><Path>{log_offset}</Path><Size>{log_size}</Size><m_cbOffsetHeader>{log_offset}</m_cbOffsetHeader></BackupFile>"
    ));
    vd.push_str("</VirtualDirectory>");
    let vd_offset = data_start + body.len();
    body.extend_from_slice(vd.as_bytes());

    let header = format!(
        "<BackupLog><m_cbOffsetHeader>{vd_offset}</m_cbOffsetHeader><DataSize>{}</DataSize><ErrorCode>false</ErrorCode><ApplyCompression>false</ApplyCompression></BackupLog>",
        vd.len()
    );

    let mut stream = vec![0u8; 72];
    stream.extend_from_slice(&utf16le(&header));
    stream.extend_from_slice(&[0, 0]);
    assert!(stream.len() <= data_start, "ABF header must fit the filler area");
    stream.resize(data_start, 0);
    stream.extend_from_slice(&body);
    stream
}

/// Wraps a decompressed ABF stream in single-threaded XPress9 framing with
/// stored (verbatim) blocks, decodable by `StoredCodec`.
pub fn wrap_xpress9_stored(abf: &[u8]) -> Vec<u8> {
    let mut stream = vec![0u8; 102];
    let signature = "This backup was created using XPress9 compression.";
    for (i, unit) in signature.encode_utf16().enumerate() {
        stream[i * 2..i * 2 + 2].copy_from_slice(&unit.to_le_bytes());
    }
    for chunk in abf.chunks(0x10000) {
        stream.extend_from_slice(&(chunk.len() as u32).to_le_bytes());
        stream.extend_from_slice(&(chunk.len() as u32).to_le_bytes());
        stream.extend_from_slice(chunk);
    }
    stream
}

// ---------------------------------------------------------------------------
// Complete synthetic data model
// ---------------------------------------------------------------------------

fn null() -> SqlValue {
    SqlValue::Null
}

fn int(v: i64) -> SqlValue {
    SqlValue::Int(v)
}

fn real(v: f64) -> SqlValue {
    SqlValue::Real(v)
}

fn text(s: &str) -> SqlValue {
    SqlValue::Text(s.to_string())
}

/// Builds a row whose `values[index]` equals the paired value, Null-padded.
pub fn sparse_row(rowid: i64, pairs: &[(usize, SqlValue)]) -> (i64, Vec<SqlValue>) {
    let len = pairs.iter().map(|(i, _)| i + 1).max().unwrap_or(0);
    let mut values = vec![null(); len];
    for (index, value) in pairs {
        values[*index] = value.clone();
    }
    (rowid, values)
}

/// A complete raw `DataModel` stream for a small model:
///
/// - `Sales` with columns `Product` (string dictionary), `Qty` (index-only
///   int with a bit-packed IDF), `When` (datetime), `Price` (decimal), and
///   `Code` (Huffman-compressed string dictionary);
/// - `Product` with the index-only column `Key`;
/// - internal tables `LocalDateTable_abc` and `H$Sales`;
/// - one measure, two relationships (one referencing the internal date
///   table), one role with a table permission.
pub fn build_sample_data_model() -> Vec<u8> {
    let metadata = build_sample_metadata();

    // 'a' = 0, 'b' = 1, both length 1; logical bits 0,1,1,0 spell the
    // strings "ab" and "ba" across the two handles.
    let mut encode_array = [0u8; 128];
    encode_array[b'a' as usize / 2] |= 1 << 4;
    encode_array[b'b' as usize / 2] |= 1;
    let code_dictionary =
        build_compressed_string_dictionary(4, &encode_array, &[0x00, 0x60], &[0, 2]);

    let qty_word = 2u64 | (2u64 << 32);

    let files: Vec<(&str, Vec<u8>)> = vec![
        ("metadata.sqlitedb", metadata),
        ("Sales_Product.col.idf", build_idf(&[(0, 1), (1, 1), (2, 1), (0, 1)], &[])),
        ("Sales_Product.col.idfmeta", build_idfmeta(0, 4, 0, 1)),
        (
            "Sales_Product.dictionary",
            build_string_dictionary(&["alpha", "bravo", "charlie"]),
        ),
        (
            "Sales_Qty.col.idf",
            build_idf(&[(0xFFFF_FFFF, 2), (2, 2)], &[qty_word]),
        ),
        ("Sales_Qty.col.idfmeta", build_idfmeta(0, 4, 2, 32)),
        ("Sales_Qty.hidx", vec![0u8; 16]),
        ("Sales_When.col.idf", build_idf(&[(0, 4)], &[])),
        ("Sales_When.col.idfmeta", build_idfmeta(0, 4, 0, 1)),
        ("Sales_When.dictionary", build_long_dictionary(&[44_562])),
        ("Sales_Price.col.idf", build_idf(&[(0, 4)], &[])),
        ("Sales_Price.col.idfmeta", build_idfmeta(0, 4, 0, 1)),
        ("Sales_Price.dictionary", build_long_dictionary(&[12_345])),
        ("Sales_Code.col.idf", build_idf(&[(0, 2), (1, 2)], &[])),
        ("Sales_Code.col.idfmeta", build_idfmeta(0, 4, 0, 1)),
        ("Sales_Code.dictionary", code_dictionary),
        ("Product_Key.col.idf", build_idf(&[(7, 2)], &[])),
        ("Product_Key.col.idfmeta", build_idfmeta(0, 2, 0, 1)),
    ];

    wrap_xpress9_stored(&build_abf(&files))
}

fn build_sample_metadata() -> Vec<u8> {
    let tables = vec![
        (
            "Model",
            vec![sparse_row(1, &[(1, text("AdventureWorks")), (6, text("en-US"))])],
        ),
        (
            "Table",
            vec![
                sparse_row(1, &[(2, text("Sales")), (4, text("Fact table")), (5, int(0))]),
                sparse_row(2, &[(2, text("LocalDateTable_abc"))]),
                sparse_row(3, &[(2, text("H$Sales"))]),
                sparse_row(4, &[(2, text("Product"))]),
            ],
        ),
        (
            "Column",
            vec![
                sparse_row(
                    10,
                    &[(1, int(1)), (2, text("Product")), (4, int(2)), (18, int(100)), (19, int(1))],
                ),
                sparse_row(
                    11,
                    &[(1, int(1)), (2, text("Qty")), (4, int(6)), (18, int(101)), (19, int(1))],
                ),
                sparse_row(
                    12,
                    &[(1, int(1)), (2, text("When")), (4, int(9)), (18, int(102)), (19, int(1))],
                ),
                sparse_row(
                    13,
                    &[(1, int(1)), (2, text("Price")), (4, int(10)), (18, int(103)), (19, int(1))],
                ),
                sparse_row(
                    14,
                    &[(1, int(1)), (2, text("RowNumber-2662979B")), (4, int(6)), (19, int(3))],
                ),
                sparse_row(
                    15,
                    &[(1, int(4)), (2, text("Key")), (4, int(6)), (18, int(104)), (19, int(1))],
                ),
                sparse_row(
                    16,
                    &[(1, int(1)), (2, text("Code")), (4, int(2)), (18, int(105)), (19, int(1))],
                ),
                sparse_row(17, &[(1, int(2)), (2, text("Date")), (4, int(9)), (19, int(1))]),
            ],
        ),
        (
            "Measure",
            vec![sparse_row(
                30,
                &[
                    (1, int(1)),
                    (2, text("Total Qty")),
                    (3, text("Sum of quantity")),
                    (5, text("SUM(Sales[Qty])")),
                    (6, text("0")),
                    (7, int(0)),
                ],
            )],
        ),
        (
            "Relationship",
            vec![
                sparse_row(
                    40,
                    &[
                        (3, int(1)),
                        (5, int(2)),
                        (8, int(1)),
                        (9, int(10)),
                        (10, int(2)),
                        (11, int(4)),
                        (12, int(15)),
                        (13, int(1)),
                    ],
                ),
                // Relationship into the auto date table: dropped by the
                // internal-table filter.
                sparse_row(
                    41,
                    &[
                        (3, int(1)),
                        (8, int(1)),
                        (9, int(12)),
                        (10, int(2)),
                        (11, int(2)),
                        (12, int(17)),
                    ],
                ),
            ],
        ),
        ("Role", vec![sparse_row(70, &[(2, text("Reader"))])]),
        (
            "TablePermission",
            vec![sparse_row(
                80,
                &[(1, int(70)), (2, int(1)), (3, text("[Qty] > 0"))],
            )],
        ),
        (
            "Partition",
            vec![sparse_row(
                90,
                &[(1, int(1)), (2, text("Sales-Partition")), (7, int(4)), (9, int(0))],
            )],
        ),
        (
            "Hierarchy",
            vec![sparse_row(95, &[(1, int(1)), (2, text("Product Hierarchy"))])],
        ),
        (
            "ColumnStorage",
            vec![
                sparse_row(100, &[(4, int(200)), (11, int(3))]),
                sparse_row(101, &[(11, int(1))]),
                sparse_row(102, &[(4, int(202)), (11, int(1))]),
                sparse_row(103, &[(4, int(203)), (11, int(1))]),
                sparse_row(104, &[(11, int(1))]),
                sparse_row(105, &[(4, int(205)), (11, int(2))]),
            ],
        ),
        (
            "ColumnPartitionStorage",
            vec![
                sparse_row(1000, &[(1, int(100)), (6, int(300))]),
                sparse_row(1001, &[(1, int(101)), (6, int(302))]),
                sparse_row(1002, &[(1, int(102)), (6, int(303))]),
                sparse_row(1003, &[(1, int(103)), (6, int(305))]),
                sparse_row(1004, &[(1, int(104)), (6, int(307))]),
                sparse_row(1005, &[(1, int(105)), (6, int(308))]),
            ],
        ),
        (
            "DictionaryStorage",
            vec![
                sparse_row(200, &[(5, real(0.0)), (6, real(1.0)), (8, int(0)), (12, int(301))]),
                sparse_row(202, &[(5, real(0.0)), (6, real(1.0)), (8, int(0)), (12, int(304))]),
                sparse_row(203, &[(5, real(0.0)), (6, real(1.0)), (8, int(0)), (12, int(306))]),
                sparse_row(205, &[(5, real(0.0)), (6, real(1.0)), (8, int(0)), (12, int(309))]),
            ],
        ),
        (
            "StorageFile",
            vec![
                sparse_row(300, &[(4, text("Sales_Product.col.idf"))]),
                sparse_row(301, &[(4, text("Sales_Product.dictionary"))]),
                sparse_row(302, &[(4, text("Sales_Qty.col.idf"))]),
                sparse_row(303, &[(4, text("Sales_When.col.idf"))]),
                sparse_row(304, &[(4, text("Sales_When.dictionary"))]),
                sparse_row(305, &[(4, text("Sales_Price.col.idf"))]),
                sparse_row(306, &[(4, text("Sales_Price.dictionary"))]),
                sparse_row(307, &[(4, text("Product_Key.col.idf"))]),
                sparse_row(308, &[(4, text("Sales_Code.col.idf"))]),
                sparse_row(309, &[(4, text("Sales_Code.dictionary"))]),
                sparse_row(310, &[(4, text("Sales_Qty.hidx"))]),
            ],
        ),
        (
            "AttributeHierarchy",
            vec![sparse_row(50, &[(1, int(11)), (3, int(60))])],
        ),
        (
            "AttributeHierarchyStorage",
            vec![sparse_row(60, &[(9, int(310))])],
        ),
    ];

    build_sqlite_db(&tables)
}
