//! XPress9 stream handling.
//!
//! The DataModel blob opens with a 102-byte UTF-16LE signature followed by
//! length-framed blocks. The entropy codec itself is proprietary and
//! supplied by the host at run time ([`Xpress9Codec`]); this module owns
//! everything around it: signature sniffing, the single-threaded and
//! multithreaded block walks, and the per-thread-group codec lifecycle.

use crate::cursor::Cursor;
use thiserror::Error;

const SIGNATURE_LEN: usize = 102;
const MULTITHREADED_MARKER: &str = "multithreaded";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Xpress9Error {
    #[error("XPress9 codec refused initialization")]
    DecompressInit,
    #[error("missing or malformed XPress9 signature")]
    MalformedHeader,
}

/// The three-operation contract of a host-supplied XPress9 codec.
///
/// `decompress` writes into `dst` and returns the number of bytes emitted;
/// a non-positive return marks the block as undecodable and the stream walk
/// skips it.
pub trait Xpress9Codec {
    fn init(&mut self) -> bool;
    fn decompress(&mut self, src: &[u8], dst: &mut [u8]) -> i32;
    fn free(&mut self);
}

/// Codec for streams whose blocks are stored verbatim
/// (`compSize == uncompSize`), as produced by tooling and test fixtures.
/// Genuinely compressed blocks are reported undecodable.
#[derive(Debug, Default, Clone, Copy)]
pub struct StoredCodec;

impl Xpress9Codec for StoredCodec {
    fn init(&mut self) -> bool {
        true
    }

    fn decompress(&mut self, src: &[u8], dst: &mut [u8]) -> i32 {
        if src.len() != dst.len() {
            return -1;
        }
        dst.copy_from_slice(src);
        src.len() as i32
    }

    fn free(&mut self) {}
}

/// Decompresses a raw DataModel blob into the contiguous ABF byte stream.
pub fn decompress_data_model(
    data: &[u8],
    codec: &mut dyn Xpress9Codec,
) -> Result<Vec<u8>, Xpress9Error> {
    let signature = read_signature(data)?;

    let mut cur = Cursor::new(data);
    cur.skip(SIGNATURE_LEN).ok_or(Xpress9Error::MalformedHeader)?;

    if signature.contains(MULTITHREADED_MARKER) {
        decompress_multithreaded(cur, codec)
    } else {
        decompress_single(cur, codec)
    }
}

/// Decodes the UTF-16LE NUL-terminated ASCII signature in the first 102
/// bytes of the blob.
fn read_signature(data: &[u8]) -> Result<String, Xpress9Error> {
    let header = data
        .get(..SIGNATURE_LEN)
        .ok_or(Xpress9Error::MalformedHeader)?;
    let mut signature = String::new();
    for pair in header.chunks_exact(2) {
        let unit = u16::from_le_bytes([pair[0], pair[1]]);
        if unit == 0 {
            break;
        }
        signature.push(char::from_u32(unit as u32).unwrap_or('\u{FFFD}'));
    }
    Ok(signature)
}

fn decompress_single(
    mut cur: Cursor<'_>,
    codec: &mut dyn Xpress9Codec,
) -> Result<Vec<u8>, Xpress9Error> {
    if !codec.init() {
        return Err(Xpress9Error::DecompressInit);
    }
    let mut out = Vec::new();
    while decompress_block(&mut cur, codec, &mut out) {}
    codec.free();
    Ok(out)
}

fn decompress_multithreaded(
    mut cur: Cursor<'_>,
    codec: &mut dyn Xpress9Codec,
) -> Result<Vec<u8>, Xpress9Error> {
    let main_chunks = cur.u64().ok_or(Xpress9Error::MalformedHeader)?;
    let prefix_chunks = cur.u64().ok_or(Xpress9Error::MalformedHeader)?;
    let prefix_threads = cur.u64().ok_or(Xpress9Error::MalformedHeader)?;
    let main_threads = cur.u64().ok_or(Xpress9Error::MalformedHeader)?;
    // Chunk size is part of the header but plays no role in decoding.
    let _chunk_size = cur.u64().ok_or(Xpress9Error::MalformedHeader)?;

    // Thread counts beyond any real encoder output mean the header is not
    // what it claims to be.
    if prefix_threads.saturating_add(main_threads) > 4096 {
        return Err(Xpress9Error::MalformedHeader);
    }

    let mut groups = Vec::new();
    groups.extend(std::iter::repeat(prefix_chunks).take(prefix_threads as usize));
    groups.extend(std::iter::repeat(main_chunks).take(main_threads as usize));

    let mut out = Vec::new();
    'groups: for group in groups {
        // Codec state is per thread group: recycle it before each group.
        codec.free();
        if !codec.init() {
            return Err(Xpress9Error::DecompressInit);
        }
        for _ in 0..group {
            if !decompress_block(&mut cur, codec, &mut out) {
                break 'groups;
            }
        }
    }
    codec.free();
    Ok(out)
}

/// Reads and decodes one `{uncompSize, compSize, data}` block. Returns
/// false when the stream is exhausted or a terminating frame is seen; a
/// block the codec cannot decode is skipped, not fatal.
fn decompress_block(cur: &mut Cursor<'_>, codec: &mut dyn Xpress9Codec, out: &mut Vec<u8>) -> bool {
    let Some(uncomp_size) = cur.u32() else {
        return false;
    };
    let Some(comp_size) = cur.u32() else {
        return false;
    };
    if uncomp_size == 0 || comp_size == 0 {
        return false;
    }
    let Some(src) = cur.take(comp_size as usize) else {
        return false;
    };

    let mut dst = vec![0u8; uncomp_size as usize];
    let written = codec.decompress(src, &mut dst);
    if written > 0 {
        dst.truncate(written as usize);
        out.append(&mut dst);
    }
    true
}
