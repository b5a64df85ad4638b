//! In-memory SPOC file: one header's worth of metadata plus the row store.

use super::header::{Header, MAX_EXTRA_FIELDS};
use super::point_record::PointRecord;
use super::version::{MAJOR_VERSION, MINOR_VERSION};
use crate::util::{Error, Result};

/// A point cloud with its file-level metadata.
///
/// The record vector is the only source of truth for point data. The point
/// count is derived from it, and every record's `extra` length equals
/// [`extra_fields`](Self::extra_fields); mutations that would break that are
/// rejected before anything changes.
#[derive(Debug, Clone, PartialEq)]
pub struct SpocFile {
    major_version: u8,
    minor_version: u8,
    wkt: String,
    compressed: bool,
    extra_fields: usize,
    records: Vec<PointRecord>,
}

impl SpocFile {
    /// Create an empty file with no extra fields.
    pub fn new(wkt: impl Into<String>, compressed: bool) -> Self {
        Self {
            major_version: MAJOR_VERSION,
            minor_version: MINOR_VERSION,
            wkt: wkt.into(),
            compressed,
            extra_fields: 0,
            records: Vec::new(),
        }
    }

    /// Assemble a file from a decoded header and its records.
    pub(crate) fn from_parts(header: Header, records: Vec<PointRecord>) -> Result<Self> {
        check_extra_fields(&records, header.extra_fields)?;
        Ok(Self {
            major_version: header.major_version,
            minor_version: header.minor_version,
            wkt: header.wkt,
            compressed: header.compressed,
            extra_fields: header.extra_fields,
            records,
        })
    }

    /// Major version recorded for this file.
    #[inline]
    pub fn major_version(&self) -> u8 {
        self.major_version
    }

    /// Minor version recorded for this file.
    #[inline]
    pub fn minor_version(&self) -> u8 {
        self.minor_version
    }

    #[inline]
    pub fn wkt(&self) -> &str {
        &self.wkt
    }

    pub fn set_wkt(&mut self, wkt: impl Into<String>) {
        self.wkt = wkt.into();
    }

    #[inline]
    pub fn compressed(&self) -> bool {
        self.compressed
    }

    pub fn set_compressed(&mut self, compressed: bool) {
        self.compressed = compressed;
    }

    /// Number of extra values every record carries.
    #[inline]
    pub fn extra_fields(&self) -> usize {
        self.extra_fields
    }

    /// Change the extra field count, truncating or zero-padding every
    /// record's `extra`.
    pub fn set_extra_fields(&mut self, extra_fields: usize) -> Result<()> {
        if extra_fields > MAX_EXTRA_FIELDS {
            return Err(Error::TooManyExtraFields(extra_fields));
        }
        for record in &mut self.records {
            record.extra.resize(extra_fields, 0);
        }
        self.extra_fields = extra_fields;
        Ok(())
    }

    /// Number of point records.
    #[inline]
    pub fn total_points(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Get a point record by index.
    pub fn point_record(&self, index: usize) -> Result<&PointRecord> {
        self.records.get(index).ok_or(Error::IndexOutOfRange {
            what: "Point record",
            index,
            count: self.records.len(),
        })
    }

    #[inline]
    pub fn point_records(&self) -> &[PointRecord] {
        &self.records
    }

    /// Replace the record set.
    ///
    /// Fails with [`Error::InconsistentExtraFields`] if any record's `extra`
    /// length differs from [`extra_fields`](Self::extra_fields); the
    /// previous records are kept in that case.
    pub fn set_point_records(&mut self, records: Vec<PointRecord>) -> Result<()> {
        check_extra_fields(&records, self.extra_fields)?;
        self.records = records;
        Ok(())
    }

    /// Take the record set out, leaving the file empty.
    pub fn take_point_records(&mut self) -> Vec<PointRecord> {
        std::mem::take(&mut self.records)
    }

    /// Append one record.
    pub fn push(&mut self, record: PointRecord) -> Result<()> {
        if record.extra.len() != self.extra_fields {
            return Err(Error::InconsistentExtraFields {
                index: self.records.len(),
                expected: self.extra_fields,
                actual: record.extra.len(),
            });
        }
        self.records.push(record);
        Ok(())
    }

    /// Truncate, or pad with zeroed records carrying the file's extra fields.
    pub fn resize(&mut self, len: usize) {
        self.records.resize(len, PointRecord::with_extra_fields(self.extra_fields));
    }

    /// Header as it would be written: current library version and a point
    /// count taken from the record set.
    pub fn header(&self) -> Header {
        Header::new(
            self.wkt.clone(),
            self.extra_fields,
            self.records.len() as u64,
            self.compressed,
        )
    }
}

fn check_extra_fields(records: &[PointRecord], expected: usize) -> Result<()> {
    match records
        .iter()
        .position(|record| record.extra.len() != expected)
    {
        Some(index) => Err(Error::InconsistentExtraFields {
            index,
            expected,
            actual: records[index].extra.len(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_records(n: usize, extra: usize) -> Vec<PointRecord> {
        (0..n)
            .map(|k| {
                let mut pr = PointRecord::new(k as f64, k as f64 * 2.0, k as f64 * 3.0);
                pr.extra = vec![k as u64; extra];
                pr
            })
            .collect()
    }

    #[test]
    fn test_new_file() {
        let f = SpocFile::new("test wkt", true);
        assert_eq!(f.wkt(), "test wkt");
        assert!(f.compressed());
        assert_eq!(f.major_version(), MAJOR_VERSION);
        assert_eq!(f.minor_version(), MINOR_VERSION);
        assert!(f.is_empty());
        assert_eq!(f.extra_fields(), 0);
    }

    #[test]
    fn test_metadata_setters_keep_points() {
        let mut f = SpocFile::new("a", false);
        f.set_point_records(sample_records(3, 0)).unwrap();
        f.set_wkt("b");
        f.set_compressed(true);
        assert_eq!(f.wkt(), "b");
        assert!(f.compressed());
        assert_eq!(f.len(), 3);
    }

    #[test]
    fn test_point_record_bounds() {
        let mut f = SpocFile::new("", false);
        f.set_point_records(sample_records(11, 0)).unwrap();
        assert_eq!(f.point_record(10).unwrap().x, 10.0);
        assert_eq!(f.point_record(10).unwrap(), &f.point_records()[10]);
        assert!(matches!(
            f.point_record(11),
            Err(Error::IndexOutOfRange { index: 11, count: 11, .. })
        ));
    }

    #[test]
    fn test_inconsistent_extra_fields_keeps_previous() {
        let mut f = SpocFile::new("", false);
        f.set_extra_fields(2).unwrap();
        f.set_point_records(sample_records(4, 2)).unwrap();

        let mut bad = sample_records(5, 2);
        bad[3].extra.push(1);
        let err = f.set_point_records(bad).unwrap_err();
        assert!(matches!(
            err,
            Error::InconsistentExtraFields { index: 3, expected: 2, actual: 3 }
        ));
        assert_eq!(f.len(), 4);
        assert_eq!(f.point_records(), sample_records(4, 2).as_slice());
    }

    #[test]
    fn test_push_checks_extra() {
        let mut f = SpocFile::new("", false);
        f.push(PointRecord::new(1.0, 2.0, 3.0)).unwrap();
        assert!(f.push(PointRecord::with_extra_fields(1)).is_err());
        assert_eq!(f.len(), 1);
    }

    #[test]
    fn test_set_extra_fields_resizes_records() {
        let mut f = SpocFile::new("", false);
        f.set_point_records(sample_records(3, 0)).unwrap();
        f.set_extra_fields(3).unwrap();
        assert!(f.point_records().iter().all(|r| r.extra == vec![0, 0, 0]));
        f.set_extra_fields(1).unwrap();
        assert!(f.point_records().iter().all(|r| r.extra.len() == 1));
        assert!(matches!(f.set_extra_fields(256), Err(Error::TooManyExtraFields(256))));
        assert_eq!(f.extra_fields(), 1);
    }

    #[test]
    fn test_resize() {
        let mut f = SpocFile::new("", false);
        f.set_extra_fields(2).unwrap();
        f.resize(5);
        assert_eq!(f.len(), 5);
        assert_eq!(f.point_record(4).unwrap().extra, vec![0, 0]);
        f.resize(1);
        assert_eq!(f.total_points(), 1);
    }

    #[test]
    fn test_header_tracks_records() {
        let mut f = SpocFile::new("wkt", true);
        f.set_extra_fields(1).unwrap();
        f.set_point_records(sample_records(7, 1)).unwrap();
        let h = f.header();
        assert_eq!(h.wkt, "wkt");
        assert_eq!(h.extra_fields, 1);
        assert_eq!(h.total_points, 7);
        assert!(h.compressed);
        assert_eq!(h.major_version, MAJOR_VERSION);
    }

    #[test]
    fn test_from_parts_rejects_mismatch() {
        let header = Header::new("", 1, 2, false);
        assert!(SpocFile::from_parts(header, sample_records(2, 0)).is_err());
    }
}
