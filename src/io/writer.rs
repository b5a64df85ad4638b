//! SPOC file writer.
//!
//! Files are written next to their destination under a temporary name and
//! renamed into place once fully flushed, so a reader never sees a
//! half-written file under the final path.

use std::io::{BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use super::header::write_header;
use super::points::encode_points;
use crate::core::{PointBlock, SpocFile, DEFAULT_COMPRESSION_LEVEL};
use crate::util::{write_block, Error, Result};

/// Options controlling how a file is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// zlib level 0-9, used when the file is compressed.
    pub compression_level: u32,
    /// fsync the temporary file before renaming it into place.
    pub sync: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            sync: true,
        }
    }
}

impl WriteOptions {
    pub fn compression_level(mut self, level: u32) -> Self {
        self.compression_level = level.min(9);
        self
    }

    pub fn sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }
}

/// Encode `file` into a new buffer.
///
/// The header is built from the current record set and stamped with the
/// library version.
pub fn encode_file(file: &SpocFile, options: &WriteOptions) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_to(&mut buf, file, options)?;
    Ok(buf)
}

/// Write `file` to a stream.
pub fn write_to<W: Write>(w: &mut W, file: &SpocFile, options: &WriteOptions) -> Result<()> {
    let header = file.header();
    let raw = encode_points(file.point_records(), header.extra_fields)?;
    let block = PointBlock::seal(raw, header.compressed, options.compression_level)?;

    write_header(w, &header)?;
    write_block(w, block.stored_bytes())?;
    tracing::trace!(
        block_bytes = block.stored_bytes().len(),
        compressed = block.is_compressed(),
        "wrote point block"
    );
    Ok(())
}

/// Write `file` to `path` with default options.
pub fn write_file(path: impl AsRef<Path>, file: &SpocFile) -> Result<()> {
    write_file_with(path, file, &WriteOptions::default())
}

/// Write `file` to `path`, replacing it atomically.
pub fn write_file_with(path: impl AsRef<Path>, file: &SpocFile, options: &WriteOptions) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| Error::from_open(e, dir))?;
    {
        // 2MB buffer
        let mut writer = BufWriter::with_capacity(2 * 1024 * 1024, tmp.as_file_mut());
        write_to(&mut writer, file, options)?;
        writer.flush()?;
    }
    if options.sync {
        tmp.as_file().sync_all()?;
    }
    tmp.persist(path)
        .map_err(|e| Error::WriteFailed(format!("{}: {}", path.display(), e.error)))?;

    tracing::debug!(
        path = %path.display(),
        points = file.len(),
        compressed = file.compressed(),
        "wrote SPOC file"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PointRecord;
    use crate::io::{decode_header, FIXED_HEADER_SIZE};

    #[test]
    fn test_encode_empty_file() {
        let f = SpocFile::new("", false);
        let bytes = encode_file(&f, &WriteOptions::default()).unwrap();
        // header + zero-length block prefix
        assert_eq!(bytes.len(), FIXED_HEADER_SIZE + 8);
        let (h, _) = decode_header(&bytes).unwrap();
        assert_eq!(h.total_points, 0);
    }

    #[test]
    fn test_total_points_from_records() {
        let mut f = SpocFile::new("x", true);
        f.resize(12);
        let bytes = encode_file(&f, &WriteOptions::default()).unwrap();
        let (h, _) = decode_header(&bytes).unwrap();
        assert_eq!(h.total_points, 12);
        assert!(h.compressed);
    }

    #[test]
    fn test_compression_shrinks_repetitive_points() {
        let mut raw = SpocFile::new("", false);
        raw.set_point_records(vec![PointRecord::new(1.0, 2.0, 3.0); 2000]).unwrap();
        let mut packed = raw.clone();
        packed.set_compressed(true);

        let options = WriteOptions::default();
        let raw_len = encode_file(&raw, &options).unwrap().len();
        let packed_len = encode_file(&packed, &options).unwrap().len();
        assert!(packed_len < raw_len / 10);
    }

    #[test]
    fn test_options_builder() {
        let o = WriteOptions::default().compression_level(42).sync(false);
        assert_eq!(o.compression_level, 9);
        assert!(!o.sync);
    }
}
