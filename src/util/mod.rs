//! Utility types and functions for SPOC.
//!
//! This module contains the leaf layer everything else builds on:
//! - [`Error`] / [`Result`] - Error handling
//! - [`ByteReader`] and the length-prefixed writers - binary primitives

mod binary;
mod error;

pub use binary::*;
pub use error::*;
