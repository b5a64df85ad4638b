//! Core layer - the in-memory point cloud model.
//!
//! This module provides:
//! - [`Header`] - File metadata preamble
//! - [`PointRecord`] - Per-point attributes
//! - [`SpocFile`] - Header metadata plus the row store
//! - [`PointColumns`] and the columnar accessors on [`SpocFile`]
//! - [`PointBlock`] - Raw/compressed representation of the point block
//! - Library version constants

mod columns;
mod compression;
mod header;
mod point_record;
mod spoc_file;
mod version;

pub use columns::PointColumns;
pub use compression::{compress, decompress, PointBlock, DEFAULT_COMPRESSION_LEVEL};
pub use header::{Header, MAX_EXTRA_FIELDS};
pub use point_record::PointRecord;
pub use spoc_file::SpocFile;
pub use version::{
    library_major_version, library_minor_version,
    MAJOR_VERSION, MINOR_VERSION, SUPPORTED_MAJOR_VERSION,
};
