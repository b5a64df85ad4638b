//! Columnar accessors.
//!
//! Columns are projections of the row store, recomputed on every call, so
//! they always reflect the current records. Projection runs on the rayon
//! pool and preserves record order.

use rayon::prelude::*;

use super::point_record::PointRecord;
use super::spoc_file::SpocFile;
use crate::util::{Error, Result};

/// Every attribute of a record set as contiguous arrays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointColumns {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
    pub c: Vec<u32>,
    pub p: Vec<u32>,
    pub i: Vec<u16>,
    pub r: Vec<u16>,
    pub g: Vec<u16>,
    pub b: Vec<u16>,
    /// One column per extra field index.
    pub extra: Vec<Vec<u64>>,
}

fn project<T, F>(records: &[PointRecord], f: F) -> Vec<T>
where
    T: Send,
    F: Fn(&PointRecord) -> T + Sync + Send,
{
    records.par_iter().map(f).collect()
}

fn project_extra(records: &[PointRecord], k: usize) -> Vec<u64> {
    project(records, |r| r.extra[k])
}

impl PointColumns {
    /// Project `records` (which must all carry `extra_fields` extras).
    pub fn from_records(records: &[PointRecord], extra_fields: usize) -> Self {
        let ((x, y, z), ((c, p), ((i, r), (g, b)))) = rayon::join(
            || {
                let (x, (y, z)) = rayon::join(
                    || project(records, |r| r.x),
                    || rayon::join(|| project(records, |r| r.y), || project(records, |r| r.z)),
                );
                (x, y, z)
            },
            || {
                rayon::join(
                    || rayon::join(|| project(records, |r| r.c), || project(records, |r| r.p)),
                    || {
                        rayon::join(
                            || rayon::join(|| project(records, |r| r.i), || project(records, |r| r.r)),
                            || rayon::join(|| project(records, |r| r.g), || project(records, |r| r.b)),
                        )
                    },
                )
            },
        );
        let extra = (0..extra_fields)
            .into_par_iter()
            .map(|k| project_extra(records, k))
            .collect();
        Self { x, y, z, c, p, i, r, g, b, extra }
    }

    /// Number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Check that every column has the same length as `x`.
    pub fn validate(&self) -> Result<()> {
        let expected = self.x.len();
        let fixed = [
            ("y", self.y.len()),
            ("z", self.z.len()),
            ("c", self.c.len()),
            ("p", self.p.len()),
            ("i", self.i.len()),
            ("r", self.r.len()),
            ("g", self.g.len()),
            ("b", self.b.len()),
        ];
        let extra = self
            .extra
            .iter()
            .enumerate()
            .map(|(k, col)| (format!("extra[{}]", k), col.len()));
        for (column, actual) in fixed
            .iter()
            .map(|(n, len)| (n.to_string(), *len))
            .chain(extra)
        {
            if actual != expected {
                return Err(Error::ColumnLengthMismatch { column, expected, actual });
            }
        }
        Ok(())
    }

    /// Rebuild rows from the columns.
    pub fn into_records(self) -> Result<Vec<PointRecord>> {
        self.validate()?;
        let records = (0..self.len())
            .into_par_iter()
            .map(|n| PointRecord {
                x: self.x[n],
                y: self.y[n],
                z: self.z[n],
                c: self.c[n],
                p: self.p[n],
                i: self.i[n],
                r: self.r[n],
                g: self.g[n],
                b: self.b[n],
                extra: self.extra.iter().map(|col| col[n]).collect(),
            })
            .collect();
        Ok(records)
    }
}

impl SpocFile {
    pub fn x(&self) -> Vec<f64> {
        project(self.point_records(), |r| r.x)
    }

    pub fn y(&self) -> Vec<f64> {
        project(self.point_records(), |r| r.y)
    }

    pub fn z(&self) -> Vec<f64> {
        project(self.point_records(), |r| r.z)
    }

    pub fn c(&self) -> Vec<u32> {
        project(self.point_records(), |r| r.c)
    }

    pub fn p(&self) -> Vec<u32> {
        project(self.point_records(), |r| r.p)
    }

    pub fn i(&self) -> Vec<u16> {
        project(self.point_records(), |r| r.i)
    }

    pub fn r(&self) -> Vec<u16> {
        project(self.point_records(), |r| r.r)
    }

    pub fn g(&self) -> Vec<u16> {
        project(self.point_records(), |r| r.g)
    }

    pub fn b(&self) -> Vec<u16> {
        project(self.point_records(), |r| r.b)
    }

    /// Column of extra field `k`.
    pub fn extra(&self, k: usize) -> Result<Vec<u64>> {
        if k >= self.extra_fields() {
            return Err(Error::IndexOutOfRange {
                what: "Extra field",
                index: k,
                count: self.extra_fields(),
            });
        }
        Ok(project_extra(self.point_records(), k))
    }

    /// All columns at once.
    pub fn columns(&self) -> PointColumns {
        PointColumns::from_records(self.point_records(), self.extra_fields())
    }

    /// Replace the record set with rows built from `columns`.
    ///
    /// The number of extra columns must equal the file's extra field count.
    pub fn set_columns(&mut self, columns: PointColumns) -> Result<()> {
        let records = columns.into_records()?;
        self.set_point_records(records)
    }
}
