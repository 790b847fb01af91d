//! XPress8 decompressor.
//!
//! Older DataModel streams wrap individual ABF files in a chunked LZ77
//! variant: repeated `{uncompSize: u32le, compSize: u32le, data}` frames.
//! A frame whose sizes match is stored raw; otherwise each flag byte
//! announces eight items (LSB first), literals or back-references into the
//! bytes already produced for the current frame.

use crate::cursor::Cursor;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Xpress8Error {
    #[error("truncated XPress8 frame header")]
    TruncatedFrame,
}

/// Decompresses a chunked XPress8 stream. Decoding stops quietly when the
/// input or a frame's output budget is exhausted mid-item, matching the
/// tolerance of the files observed in the wild.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, Xpress8Error> {
    let mut cur = Cursor::new(data);
    let mut out = Vec::new();

    while cur.remaining() > 0 {
        if cur.remaining() < 8 {
            return Err(Xpress8Error::TruncatedFrame);
        }
        let uncomp_size = cur.u32().ok_or(Xpress8Error::TruncatedFrame)? as usize;
        let comp_size = cur.u32().ok_or(Xpress8Error::TruncatedFrame)? as usize;
        let frame = cur
            .take(comp_size.min(cur.remaining()))
            .ok_or(Xpress8Error::TruncatedFrame)?;

        if comp_size == uncomp_size {
            out.extend_from_slice(frame);
        } else {
            decode_frame(frame, uncomp_size, &mut out);
        }
    }

    Ok(out)
}

fn decode_frame(input: &[u8], uncomp_size: usize, out: &mut Vec<u8>) {
    let mut block = Vec::with_capacity(uncomp_size);
    let mut si = 0usize;

    'frame: while si < input.len() && block.len() < uncomp_size {
        let flags = input[si];
        si += 1;

        for bit in 0..8 {
            if si >= input.len() || block.len() >= uncomp_size {
                break 'frame;
            }
            if flags & (1 << bit) == 0 {
                block.push(input[si]);
                si += 1;
                continue;
            }

            if si + 2 > input.len() {
                break 'frame;
            }
            let b0 = input[si] as usize;
            let b1 = input[si + 1] as usize;
            si += 2;

            let match_offset = ((b1 & 0xF8) << 5) | b0 | 1;
            let mut match_len = (b1 & 0x07) + 3;
            if match_len == 10 {
                if si >= input.len() {
                    break 'frame;
                }
                match_len = input[si] as usize + 10;
                si += 1;
                if match_len == 265 {
                    if si + 2 > input.len() {
                        break 'frame;
                    }
                    match_len = u16::from_le_bytes([input[si], input[si + 1]]) as usize;
                    si += 2;
                }
            }

            if match_offset > block.len() {
                break 'frame;
            }
            // Overlapping copies are legal: the source window may extend
            // into bytes written by this same match.
            for _ in 0..match_len {
                if block.len() >= uncomp_size {
                    break;
                }
                let byte = block[block.len() - match_offset];
                block.push(byte);
            }
        }
    }

    out.append(&mut block);
}
