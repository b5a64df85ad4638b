//! SPOC file reader.
//!
//! A read is one bounded operation: the file is opened, mapped (or read into
//! memory without the `mmap` feature), decoded, and released before
//! returning.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::header::decode_header;
use super::points::{decode_points, expected_block_len};
use crate::core::{Header, PointBlock, SpocFile, MINOR_VERSION, SUPPORTED_MAJOR_VERSION};
use crate::util::{ByteReader, Error, Result};

/// Read a whole SPOC file.
pub fn read_file(path: impl AsRef<Path>) -> Result<SpocFile> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::from_open(e, path))?;
    let size = file.metadata()?.len();

    let spoc = map_and_decode(&file, size)?;
    tracing::debug!(
        path = %path.display(),
        bytes = size,
        points = spoc.len(),
        compressed = spoc.compressed(),
        "read SPOC file"
    );
    Ok(spoc)
}

#[cfg(feature = "mmap")]
fn map_and_decode(file: &File, size: u64) -> Result<SpocFile> {
    if size == 0 {
        return decode_file(&[]);
    }
    // Safety: the map is read-only and dropped before returning.
    let mmap = unsafe { memmap2::Mmap::map(file) }?;
    decode_file(&mmap)
}

#[cfg(not(feature = "mmap"))]
fn map_and_decode(mut file: &File, size: u64) -> Result<SpocFile> {
    let mut buf = Vec::with_capacity(size as usize);
    file.read_to_end(&mut buf)?;
    decode_file(&buf)
}

/// Read a SPOC file from a stream, consuming it to the end.
pub fn read_from<R: Read>(r: &mut R) -> Result<SpocFile> {
    let mut buf = Vec::new();
    r.read_to_end(&mut buf)?;
    decode_file(&buf)
}

/// Reject files written by a newer major version.
pub fn check_version(header: &Header) -> Result<()> {
    if header.major_version > SUPPORTED_MAJOR_VERSION {
        return Err(Error::UnsupportedVersion {
            major: header.major_version,
            minor: header.minor_version,
            supported: SUPPORTED_MAJOR_VERSION,
        });
    }
    if header.minor_version != MINOR_VERSION {
        tracing::warn!(
            major = header.major_version,
            minor = header.minor_version,
            library_minor = MINOR_VERSION,
            "file minor version differs from library"
        );
    }
    Ok(())
}

/// Decode a complete in-memory SPOC file.
pub fn decode_file(data: &[u8]) -> Result<SpocFile> {
    let (header, header_len) = decode_header(data)?;
    check_version(&header)?;
    tracing::debug!(
        header_bytes = header_len,
        total_points = header.total_points,
        extra_fields = header.extra_fields,
        compressed = header.compressed,
        "decoded header"
    );

    let mut r = ByteReader::new(&data[header_len..]);
    let stored = r.read_block().map_err(|_| {
        if header.compressed {
            Error::Decompression("compressed point block is truncated".into())
        } else {
            Error::corrupt("point block is truncated")
        }
    })?;
    if r.remaining() > 0 {
        tracing::warn!(trailing = r.remaining(), "ignoring bytes after the point block");
    }

    let expected = expected_block_len(header.total_points, header.extra_fields)?;
    let raw = PointBlock::stored(stored, header.compressed).into_raw(expected)?;
    // exactly total_points records or CorruptData
    let records = decode_points(&raw, header.total_points, header.extra_fields)?;
    SpocFile::from_parts(header, records)
}
