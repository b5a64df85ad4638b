//! Library version constants.
//!
//! These are compile-time constants: every file this library writes carries
//! them in its header, and the reader gates on [`SUPPORTED_MAJOR_VERSION`].

/// Major version of the format written by this library.
pub const MAJOR_VERSION: u8 = 0;

/// Minor version of the format written by this library.
pub const MINOR_VERSION: u8 = 1;

/// Newest major version this library can read.
pub const SUPPORTED_MAJOR_VERSION: u8 = MAJOR_VERSION;

/// Major version of the library.
#[inline]
pub const fn library_major_version() -> u8 {
    MAJOR_VERSION
}

/// Minor version of the library.
#[inline]
pub const fn library_minor_version() -> u8 {
    MINOR_VERSION
}
