//! Compression of the point-data block.
//!
//! The header's `compressed` flag decides how the block is stored: raw rows,
//! or the same rows as a single zlib stream. [`PointBlock`] carries that
//! decision so record encoding and decoding only ever see raw rows.

use std::borrow::Cow;
use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};

use crate::util::{Error, Result};

/// Default zlib level used by the writer.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Upper bound on how much deflate can expand its input.
pub const MAX_INFLATE_RATIO: usize = 1032;

/// Smallest step the output buffer grows by while inflating.
const MIN_INFLATE_STEP: usize = 64 * 1024;

/// Point block as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointBlock<'a> {
    /// Raw row bytes.
    Raw(Cow<'a, [u8]>),
    /// One zlib stream inflating to raw row bytes.
    Compressed(Cow<'a, [u8]>),
}

impl<'a> PointBlock<'a> {
    /// Wrap raw rows for storage, compressing them if requested.
    pub fn seal(raw: Vec<u8>, compressed: bool, level: u32) -> Result<PointBlock<'static>> {
        if compressed {
            let packed = compress(&raw, level)?;
            tracing::debug!(raw = raw.len(), packed = packed.len(), "deflated point block");
            Ok(PointBlock::Compressed(Cow::Owned(packed)))
        } else {
            Ok(PointBlock::Raw(Cow::Owned(raw)))
        }
    }

    /// Wrap stored bytes according to the header's flag.
    pub fn stored(bytes: &'a [u8], compressed: bool) -> Self {
        if compressed {
            PointBlock::Compressed(Cow::Borrowed(bytes))
        } else {
            PointBlock::Raw(Cow::Borrowed(bytes))
        }
    }

    #[inline]
    pub fn is_compressed(&self) -> bool {
        matches!(self, PointBlock::Compressed(_))
    }

    /// Bytes as written to disk.
    pub fn stored_bytes(&self) -> &[u8] {
        match self {
            PointBlock::Raw(bytes) | PointBlock::Compressed(bytes) => bytes,
        }
    }

    /// Resolve to raw rows, which must be exactly `expected_len` bytes.
    ///
    /// Raw blocks are returned without copying.
    pub fn into_raw(self, expected_len: usize) -> Result<Cow<'a, [u8]>> {
        let raw = match self {
            PointBlock::Raw(bytes) => bytes,
            PointBlock::Compressed(bytes) => {
                let raw = decompress(&bytes, expected_len)?;
                tracing::debug!(packed = bytes.len(), raw = raw.len(), "inflated point block");
                Cow::Owned(raw)
            }
        };
        if raw.len() != expected_len {
            return Err(Error::corrupt(format!(
                "point block holds {} bytes, header implies {}",
                raw.len(),
                expected_len
            )));
        }
        Ok(raw)
    }
}

/// Compress `data` into a zlib stream.
///
/// `level` is clamped to 0..=9; 0 still produces a valid (stored) stream.
pub fn compress(data: &[u8], level: u32) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(level.min(9)));
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Inflate a zlib stream expected to hold `expected_len` bytes.
///
/// A truncated or invalid stream is an [`Error::Decompression`]. A stream
/// that ends cleanly but holds more data than expected, or that is
/// followed by trailing bytes, is [`Error::CorruptData`]. So is an
/// `expected_len` that `data` could not inflate to at any ratio deflate
/// permits, which is rejected before anything is allocated.
///
/// The output buffer grows with what the stream actually produces, never
/// with `expected_len` alone.
pub fn decompress(data: &[u8], expected_len: usize) -> Result<Vec<u8>> {
    if expected_len > data.len().saturating_mul(MAX_INFLATE_RATIO) {
        return Err(Error::corrupt(format!(
            "{} compressed bytes cannot inflate to the {} bytes the header implies",
            data.len(),
            expected_len
        )));
    }

    let mut inflater = Decompress::new(true);
    let mut out = Vec::with_capacity(expected_len.min(data.len().saturating_mul(4)));

    loop {
        if out.len() > expected_len {
            return Err(Error::corrupt(format!(
                "compressed block inflates past the {} bytes the header implies",
                expected_len
            )));
        }
        if out.len() == out.capacity() {
            // at most one byte past expected_len, to detect overlong streams
            let room = expected_len - out.len() + 1;
            out.reserve_exact(room.min(out.len().max(MIN_INFLATE_STEP)));
        }

        let consumed = inflater.total_in() as usize;
        let produced = inflater.total_out();
        let status = inflater
            .decompress_vec(&data[consumed..], &mut out, FlushDecompress::None)
            .map_err(|e| Error::Decompression(e.to_string()))?;

        if matches!(status, Status::StreamEnd) {
            break;
        }
        if inflater.total_in() as usize == consumed && inflater.total_out() == produced {
            return Err(Error::Decompression(format!(
                "truncated zlib stream ({} bytes consumed, {} inflated)",
                consumed,
                out.len()
            )));
        }
    }

    let consumed = inflater.total_in() as usize;
    if consumed != data.len() {
        return Err(Error::corrupt(format!(
            "{} trailing bytes after compressed block",
            data.len() - consumed
        )));
    }
    if out.len() != expected_len {
        return Err(Error::corrupt(format!(
            "compressed block inflated to {} bytes, header implies {}",
            out.len(),
            expected_len
        )));
    }
    Ok(out)
}
