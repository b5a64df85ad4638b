//! On-disk SPOC format: header codec, point block encoding, reader, writer.
//!
//! ## File Structure
//!
//! ```text
//! +----------------------+
//! | Header               |  20 bytes + WKT
//! +----------------------+
//! | Point block length   |  u64 LE
//! +----------------------+
//! | Point block          |  raw rows, or one zlib stream of raw rows
//! +----------------------+
//! ```
//!
//! Whether the block is compressed is decided by the header's flag alone;
//! `.spoc` / `.zpoc` extensions are a naming convention for callers.

mod format;
mod header;
mod points;
mod reader;
mod writer;

pub use format::*;
pub use header::*;
pub use points::*;
pub use reader::*;
pub use writer::*;
