//! SPOC format constants and layout helpers.

use std::path::Path;

/// Signature bytes at the start of a SPOC file.
pub const SPOC_SIGNATURE: &[u8; 4] = b"SPOC";

/// Size of the header excluding the WKT bytes.
///
/// signature(4) + major(1) + minor(1) + wkt_len(4) + extra_fields(1)
/// + total_points(8) + compressed(1)
pub const FIXED_HEADER_SIZE: usize = 20;

/// Bytes needed before the WKT length is known.
pub const HEADER_PREFIX_SIZE: usize = 10;

/// Header bytes following the WKT.
pub const HEADER_SUFFIX_SIZE: usize = FIXED_HEADER_SIZE - HEADER_PREFIX_SIZE;

/// Size of the fixed part of a raw point record.
///
/// x, y, z: f64; c, p: u32; i, r, g, b: u16
pub const RECORD_BASE_SIZE: usize = 3 * 8 + 2 * 4 + 4 * 2;

/// Size of one extra field value (u64).
pub const EXTRA_FIELD_SIZE: usize = 8;

pub use crate::core::MAX_EXTRA_FIELDS;

/// Conventional extension for files written uncompressed.
pub const SPOC_EXTENSION: &str = "spoc";

/// Conventional extension for files written compressed.
pub const ZPOC_EXTENSION: &str = "zpoc";

/// Size of one raw point record with `extra_fields` extras.
#[inline]
pub const fn record_size(extra_fields: usize) -> usize {
    RECORD_BASE_SIZE + extra_fields * EXTRA_FIELD_SIZE
}

/// Whether `path` carries one of the conventional SPOC extensions.
///
/// Naming only: the codec never looks at file names.
pub fn is_spoc_path(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            ext.eq_ignore_ascii_case(SPOC_EXTENSION) || ext.eq_ignore_ascii_case(ZPOC_EXTENSION)
        })
        .unwrap_or(false)
}
