//! # SPOC
//!
//! Reader and writer for the SPOC simple point cloud format, and the
//! in-memory point cloud model it produces and consumes.
//!
//! A SPOC file is a small header (version, opaque WKT coordinate-reference
//! text, extra field count, point count, compression flag) followed by a
//! length-prefixed block of fixed-width point records, optionally
//! zlib-compressed. Files conventionally named `.zpoc` are compressed,
//! but only the header flag matters to this library.
//!
//! ## Modules
//!
//! - [`util`] - Errors and binary primitives
//! - [`core`] - Header, point records, [`SpocFile`], columns, compression
//! - [`io`] - Header codec, point block encoding, file reader and writer
//!
//! ## Example
//!
//! ```no_run
//! use spoc::prelude::*;
//!
//! let mut f = SpocFile::new("EPSG:32613", true);
//! f.set_point_records(vec![PointRecord::new(1.0, 2.0, 3.0)])?;
//! spoc::write_file("cloud.zpoc", &f)?;
//!
//! let header = spoc::read_header("cloud.zpoc")?;
//! assert_eq!(header.total_points, 1);
//!
//! let g = spoc::read_file("cloud.zpoc")?;
//! assert_eq!(g.x(), vec![1.0]);
//! # Ok::<(), spoc::Error>(())
//! ```

pub mod util;
pub mod core;
pub mod io;

// Re-export commonly used types
pub use crate::core::{
    library_major_version, library_minor_version, Header, PointColumns, PointRecord, SpocFile,
};
pub use crate::io::{read_file, read_header, write_file, write_file_with, WriteOptions};
pub use crate::util::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{Header, PointColumns, PointRecord, SpocFile};
    pub use crate::io::{read_file, read_header, write_file, write_file_with, WriteOptions};
    pub use crate::util::{Error, Result};
}
