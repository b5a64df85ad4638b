//! Point record - the per-point attribute schema.

use std::fmt;
use std::str::FromStr;

use crate::util::{Error, Result};

/// A single point.
///
/// The fixed attributes are always present; `extra` carries the file's
/// additional numeric attributes and must have the same length for every
/// record in one [`SpocFile`](super::SpocFile).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointRecord {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Classification code
    pub c: u32,
    /// Point source / point id
    pub p: u32,
    /// Intensity (or NIR)
    pub i: u16,
    pub r: u16,
    pub g: u16,
    pub b: u16,
    pub extra: Vec<u64>,
}

impl PointRecord {
    /// Create a record at the given coordinates with every other field zero.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z, ..Default::default() }
    }

    /// Create a zeroed record carrying `extra_fields` zeroed extra values.
    pub fn with_extra_fields(extra_fields: usize) -> Self {
        Self { extra: vec![0; extra_fields], ..Default::default() }
    }

    /// Create a record from all fixed fields.
    #[allow(clippy::too_many_arguments)]
    pub fn with_fields(
        x: f64,
        y: f64,
        z: f64,
        c: u32,
        p: u32,
        i: u16,
        r: u16,
        g: u16,
        b: u16,
    ) -> Self {
        Self { x, y, z, c, p, i, r, g, b, extra: Vec::new() }
    }

    /// Number of extra values carried by this record.
    #[inline]
    pub fn extra_fields(&self) -> usize {
        self.extra.len()
    }
}

/// Tab-separated row: `x y z c p i r g b extra...`
impl fmt::Display for PointRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.x, self.y, self.z, self.c, self.p, self.i, self.r, self.g, self.b
        )?;
        for e in &self.extra {
            write!(f, "\t{}", e)?;
        }
        Ok(())
    }
}

/// Parse a row in the [`Display`](fmt::Display) format. Columns may be
/// separated by any whitespace; everything after `b` is an extra value.
impl FromStr for PointRecord {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut fields = s.split_whitespace();
        let mut next = |name: &str| {
            fields
                .next()
                .ok_or_else(|| Error::InvalidRecordText(format!("missing column '{}' in '{}'", name, s)))
        };

        fn parse<T: FromStr>(text: &str, name: &str) -> Result<T> {
            text.parse()
                .map_err(|_| Error::InvalidRecordText(format!("bad value '{}' for column '{}'", text, name)))
        }

        let x = parse(next("x")?, "x")?;
        let y = parse(next("y")?, "y")?;
        let z = parse(next("z")?, "z")?;
        let c = parse(next("c")?, "c")?;
        let p = parse(next("p")?, "p")?;
        let i = parse(next("i")?, "i")?;
        let r = parse(next("r")?, "r")?;
        let g = parse(next("g")?, "g")?;
        let b = parse(next("b")?, "b")?;
        let extra = fields
            .map(|text| parse(text, "extra"))
            .collect::<Result<Vec<u64>>>()?;
        Ok(Self { x, y, z, c, p, i, r, g, b, extra })
    }
}
