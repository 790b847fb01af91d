//! ABF (Analysis-services Backup File) container parsing.
//!
//! The decompressed DataModel stream is one ABF: a `BackupLogHeader` at a
//! fixed offset points at a `VirtualDirectory` XML document, whose last
//! entry is the `BackupLog` XML document, which in turn names every logical
//! file and its span inside the stream.

use crate::xpress8::{self, Xpress8Error};
use quick_xml::events::Event;
use quick_xml::Reader;
use rustc_hash::FxHashMap;
use thiserror::Error;

const HEADER_OFFSET: usize = 72;
const HEADER_SCAN_LIMIT: usize = 4096;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AbfError {
    #[error("BackupLogHeader missing required fields")]
    InvalidHeader,
    #[error("XML parse error: {0}")]
    XmlError(String),
    #[error("file not found in backup log: {0}")]
    FileNotFound(String),
    #[error("file {0} lies outside the decompressed stream")]
    SliceOutOfBounds(String),
    #[error(transparent)]
    Xpress8(#[from] Xpress8Error),
}

/// Span of one logical file inside the decompressed stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbfEntry {
    pub offset: usize,
    pub size: usize,
    pub size_from_log: Option<u64>,
}

/// Parsed file index over an owned decompressed ABF stream.
#[derive(Debug)]
pub struct AbfIndex {
    buffer: Vec<u8>,
    file_log: FxHashMap<String, AbfEntry>,
    error_code: bool,
    apply_compression: bool,
}

impl AbfIndex {
    pub fn parse(buffer: Vec<u8>) -> Result<AbfIndex, AbfError> {
        let header = parse_backup_log_header(&buffer)?;

        let vd_end = header
            .vd_offset
            .checked_add(header.vd_size)
            .filter(|&end| end <= buffer.len())
            .ok_or(AbfError::InvalidHeader)?;
        let vd_xml = std::str::from_utf8(&buffer[header.vd_offset..vd_end])
            .map_err(|e| AbfError::XmlError(e.to_string()))?;
        let directory = parse_backup_files(vd_xml)?;

        let mut storage_map: FxHashMap<&str, AbfEntry> = FxHashMap::default();
        let mut backup_log_path: Option<&str> = None;
        for file in &directory {
            let (Some(path), Some(size), Some(offset)) = (&file.path, file.size, file.offset)
            else {
                continue;
            };
            storage_map.insert(
                path.as_str(),
                AbfEntry {
                    offset: offset as usize,
                    size: size as usize,
                    size_from_log: None,
                },
            );
            backup_log_path = Some(path.as_str());
        }

        let log_entry = backup_log_path
            .and_then(|path| storage_map.get(path))
            .copied()
            .ok_or(AbfError::InvalidHeader)?;
        let log_xml = decode_backup_log(&buffer, log_entry, header.error_code)?;
        let log_files = parse_backup_files(&log_xml)?;

        let mut file_log = FxHashMap::default();
        for file in log_files {
            let (Some(path), Some(storage_path)) = (file.path, file.storage_path) else {
                continue;
            };
            let Some(entry) = storage_map.get(storage_path.as_str()) else {
                continue;
            };
            let basename = path.rsplit('\\').next().unwrap_or(path.as_str()).to_string();
            file_log.insert(
                basename,
                AbfEntry {
                    size_from_log: file.size,
                    ..*entry
                },
            );
        }

        Ok(AbfIndex {
            buffer,
            file_log,
            error_code: header.error_code,
            apply_compression: header.apply_compression,
        })
    }

    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.file_log.keys().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.file_log.contains_key(name)
    }

    pub fn entry(&self, name: &str) -> Option<&AbfEntry> {
        self.file_log.get(name)
    }

    /// Copies one logical file out of the stream, applying the error-code
    /// trim and the per-file XPress8 wrapper when the header requests them.
    pub fn get_data_slice(&self, name: &str) -> Result<Vec<u8>, AbfError> {
        let entry = self
            .file_log
            .get(name)
            .ok_or_else(|| AbfError::FileNotFound(name.to_string()))?;
        let end = entry
            .offset
            .checked_add(entry.size)
            .filter(|&end| end <= self.buffer.len())
            .ok_or_else(|| AbfError::SliceOutOfBounds(name.to_string()))?;

        let mut bytes = self.buffer[entry.offset..end].to_vec();
        if self.error_code {
            bytes.truncate(bytes.len().saturating_sub(4));
        }
        if self.apply_compression {
            bytes = xpress8::decompress(&bytes)?;
        }
        Ok(bytes)
    }
}

struct BackupLogHeader {
    vd_offset: usize,
    vd_size: usize,
    error_code: bool,
    apply_compression: bool,
}

/// Reads the UTF-16LE header XML at offset 72 (NUL-terminated, within the
/// first 4 KiB) and pulls out the virtual-directory span and flags.
fn parse_backup_log_header(buffer: &[u8]) -> Result<BackupLogHeader, AbfError> {
    if buffer.len() <= HEADER_OFFSET + 2 {
        return Err(AbfError::InvalidHeader);
    }
    let scan = &buffer[HEADER_OFFSET..buffer.len().min(HEADER_SCAN_LIMIT)];
    let mut units = Vec::with_capacity(scan.len() / 2);
    for pair in scan.chunks_exact(2) {
        let unit = u16::from_le_bytes([pair[0], pair[1]]);
        if unit == 0 {
            break;
        }
        units.push(unit);
    }
    let xml = String::from_utf16(&units).map_err(|e| AbfError::XmlError(e.to_string()))?;

    let mut vd_offset: Option<u64> = None;
    let mut vd_size: Option<u64> = None;
    let mut error_code = false;
    let mut apply_compression = false;

    let mut reader = Reader::from_str(&xml);
    reader.config_mut().trim_text(true);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e))
                if matches!(
                    e.name().as_ref(),
                    b"m_cbOffsetHeader" | b"DataSize" | b"ErrorCode" | b"ApplyCompression"
                ) =>
            {
                let name = e.name().as_ref().to_vec();
                let text = reader
                    .read_text(quick_xml::name::QName(&name))
                    .map_err(|e| AbfError::XmlError(e.to_string()))?;
                match name.as_slice() {
                    b"m_cbOffsetHeader" => vd_offset = text.trim().parse().ok(),
                    b"DataSize" => vd_size = text.trim().parse().ok(),
                    b"ErrorCode" => error_code = parse_xml_bool(&text),
                    b"ApplyCompression" => apply_compression = parse_xml_bool(&text),
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(AbfError::XmlError(e.to_string())),
            _ => {}
        }
    }

    match (vd_offset, vd_size) {
        (Some(offset), Some(size)) if offset > 0 && size > 0 => Ok(BackupLogHeader {
            vd_offset: offset as usize,
            vd_size: size as usize,
            error_code,
            apply_compression,
        }),
        _ => Err(AbfError::InvalidHeader),
    }
}

fn parse_xml_bool(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.eq_ignore_ascii_case("true") || trimmed == "1"
}

#[derive(Debug, Default)]
struct BackupFileRecord {
    path: Option<String>,
    storage_path: Option<String>,
    size: Option<u64>,
    offset: Option<u64>,
}

/// Collects every `<BackupFile>` element with its `Path`, `StoragePath`,
/// `Size`, and `m_cbOffsetHeader` children. Shared by the VirtualDirectory
/// and BackupLog documents, which use the same record shape.
fn parse_backup_files(xml: &str) -> Result<Vec<BackupFileRecord>, AbfError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut files = Vec::new();
    let mut current: Option<BackupFileRecord> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"BackupFile" => {
                current = Some(BackupFileRecord::default());
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"BackupFile" => {
                if let Some(record) = current.take() {
                    files.push(record);
                }
            }
            Ok(Event::Start(e)) if current.is_some() => {
                let name = e.name().as_ref().to_vec();
                let text = reader
                    .read_text(quick_xml::name::QName(&name))
                    .map_err(|e| AbfError::XmlError(e.to_string()))?;
                let record = current.as_mut().ok_or(AbfError::InvalidHeader)?;
                match name.as_slice() {
                    b"Path" => record.path = Some(text.trim().to_string()),
                    b"StoragePath" => record.storage_path = Some(text.trim().to_string()),
                    b"Size" => record.size = text.trim().parse().ok(),
                    b"m_cbOffsetHeader" => record.offset = text.trim().parse().ok(),
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(AbfError::XmlError(e.to_string())),
            _ => {}
        }
    }

    Ok(files)
}

/// Decodes the BackupLog document with BOM sniffing: an explicit UTF-16LE
/// BOM or any leading ASCII byte followed by a zero byte selects UTF-16LE,
/// everything else is treated as UTF-8.
fn decode_backup_log(
    buffer: &[u8],
    entry: AbfEntry,
    error_code: bool,
) -> Result<String, AbfError> {
    let end = entry
        .offset
        .checked_add(entry.size)
        .filter(|&end| end <= buffer.len())
        .ok_or(AbfError::InvalidHeader)?;
    let mut bytes = &buffer[entry.offset..end];
    if error_code {
        bytes = &bytes[..bytes.len().saturating_sub(4)];
    }

    if bytes.starts_with(&[0xFF, 0xFE]) {
        Ok(decode_utf16le(&bytes[2..]))
    } else if bytes.len() >= 2 && bytes[1] == 0 {
        Ok(decode_utf16le(bytes))
    } else {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

fn decode_utf16le(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}
