//! File header - the metadata preamble of a SPOC file.
//!
//! The on-disk encoding lives in [`crate::io`]; this is the in-memory form.

use std::fmt;

use super::version::{MAJOR_VERSION, MINOR_VERSION};

/// Largest extra field count a header can carry.
pub const MAX_EXTRA_FIELDS: usize = u8::MAX as usize;

/// Header information for a SPOC file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Header {
    /// Format major version of the library that wrote the file.
    pub major_version: u8,
    /// Format minor version of the library that wrote the file.
    pub minor_version: u8,
    /// Opaque coordinate-reference text, passed through verbatim.
    pub wkt: String,
    /// Number of extra values carried by every point record.
    pub extra_fields: usize,
    /// Number of point records in the file.
    pub total_points: u64,
    /// Whether the point block is zlib-compressed.
    pub compressed: bool,
}

impl Header {
    /// Create a header stamped with the library's current version.
    pub fn new(wkt: impl Into<String>, extra_fields: usize, total_points: u64, compressed: bool) -> Self {
        Self {
            major_version: MAJOR_VERSION,
            minor_version: MINOR_VERSION,
            wkt: wkt.into(),
            extra_fields,
            total_points,
            compressed,
        }
    }
}

impl Default for Header {
    fn default() -> Self {
        Self::new(String::new(), 0, 0, false)
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SPOC")?;
        writeln!(f, "{}.{}", self.major_version, self.minor_version)?;
        writeln!(f, "{}", self.wkt)?;
        writeln!(f, "extra_fields {}", self.extra_fields)?;
        writeln!(f, "total_points {}", self.total_points)?;
        write!(f, "compressed {}", self.compressed)
    }
}
