//! Integration tests for header-only reads and the read error taxonomy.

use std::fs;
use std::path::Path;

use spoc::core::SUPPORTED_MAJOR_VERSION;
use spoc::io::{encode_header, FIXED_HEADER_SIZE};
use spoc::prelude::*;

use tempfile::TempDir;

fn scratch() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

fn write_sample(path: &Path, points: usize, extra_fields: usize, compressed: bool) -> SpocFile {
    let mut f = SpocFile::new("GEOGCS[\"WGS 84\"]", compressed);
    f.set_extra_fields(extra_fields).unwrap();
    let records = (0..points)
        .map(|k| PointRecord {
            x: k as f64,
            y: k as f64 * 0.5,
            z: 1.0,
            c: 2,
            extra: vec![k as u64; extra_fields],
            ..Default::default()
        })
        .collect();
    f.set_point_records(records).unwrap();
    write_file(path, &f).expect("Failed to write sample");
    f
}

#[test]
fn test_missing_file() {
    let dir = scratch();
    let missing = dir.path().join("doesnt_exist.spoc");
    assert!(matches!(read_header(&missing), Err(Error::FileNotFound(p)) if p == missing));
    assert!(matches!(read_file(&missing), Err(Error::FileNotFound(p)) if p == missing));
}

#[test]
fn test_header_matches_full_read() {
    let dir = scratch();
    for compressed in [false, true] {
        let path = dir.path().join("h.spoc");
        write_sample(&path, 500, 1, compressed);

        let h = read_header(&path).unwrap();
        let f = read_file(&path).unwrap();
        assert_eq!(h.major_version, f.major_version());
        assert_eq!(h.minor_version, f.minor_version());
        assert_eq!(h.wkt, f.wkt());
        assert_eq!(h.extra_fields, f.extra_fields());
        assert_eq!(h.total_points, f.len() as u64);
        assert_eq!(h.compressed, f.compressed());
        assert_eq!(h, f.header());
    }
}

#[test]
fn test_header_only_ignores_point_block() {
    let dir = scratch();
    let path = dir.path().join("cut.zpoc");
    write_sample(&path, 10_000, 2, true);

    // keep only the header: a full read must fail, the header read must not
    let header_len = FIXED_HEADER_SIZE + "GEOGCS[\"WGS 84\"]".len();
    let bytes = fs::read(&path).unwrap();
    fs::write(&path, &bytes[..header_len]).unwrap();

    let h = read_header(&path).unwrap();
    assert_eq!(h.total_points, 10_000);
    assert_eq!(h.extra_fields, 2);
    assert!(read_file(&path).is_err());
}

#[test]
fn test_malformed_header() {
    let dir = scratch();
    let path = dir.path().join("bad.spoc");

    fs::write(&path, b"").unwrap();
    assert!(matches!(read_header(&path), Err(Error::MalformedHeader(_))));
    assert!(matches!(read_file(&path), Err(Error::MalformedHeader(_))));

    fs::write(&path, b"LASF this is not a spoc file at all").unwrap();
    assert!(matches!(read_header(&path), Err(Error::MalformedHeader(_))));
    assert!(matches!(read_file(&path), Err(Error::MalformedHeader(_))));
}

#[test]
fn test_unsupported_version() {
    let dir = scratch();
    let path = dir.path().join("future.spoc");
    write_sample(&path, 3, 0, false);

    let mut bytes = fs::read(&path).unwrap();
    bytes[4] = SUPPORTED_MAJOR_VERSION + 1;
    fs::write(&path, &bytes).unwrap();

    assert!(matches!(
        read_file(&path),
        Err(Error::UnsupportedVersion { major, .. }) if major == SUPPORTED_MAJOR_VERSION + 1
    ));
    // header-only reads still report it for cataloging
    assert_eq!(read_header(&path).unwrap().major_version, SUPPORTED_MAJOR_VERSION + 1);
}

#[test]
fn test_corrupt_compressed_block() {
    let dir = scratch();
    let path = dir.path().join("corrupt.zpoc");
    write_sample(&path, 1000, 1, true);

    let mut bytes = fs::read(&path).unwrap();
    let header_len = FIXED_HEADER_SIZE + "GEOGCS[\"WGS 84\"]".len();
    // first bytes of the zlib stream, after the u64 block length
    let start = header_len + 8;
    for b in &mut bytes[start..start + 4] {
        *b ^= 0xFF;
    }
    fs::write(&path, &bytes).unwrap();
    assert!(matches!(read_file(&path), Err(Error::Decompression(_))));
}

#[test]
fn test_truncated_compressed_file() {
    let dir = scratch();
    let path = dir.path().join("short.zpoc");
    write_sample(&path, 1000, 0, true);

    let bytes = fs::read(&path).unwrap();
    fs::write(&path, &bytes[..bytes.len() - 10]).unwrap();
    assert!(matches!(read_file(&path), Err(Error::Decompression(_))));
}

#[test]
fn test_record_count_mismatch() {
    let dir = scratch();
    let path = dir.path().join("count.spoc");
    let f = write_sample(&path, 20, 0, false);

    // rewrite the header declaring one extra point
    let mut header = f.header();
    header.total_points += 1;
    let new_header = encode_header(&header).unwrap();
    let mut bytes = fs::read(&path).unwrap();
    bytes[..new_header.len()].copy_from_slice(&new_header);
    fs::write(&path, &bytes).unwrap();

    assert!(matches!(read_file(&path), Err(Error::CorruptData(_))));
}

#[test]
fn test_compressed_record_count_too_large() {
    let dir = scratch();
    let path = dir.path().join("count.zpoc");
    let f = write_sample(&path, 20, 1, true);
    let original = fs::read(&path).unwrap();

    for total_points in [21, 20_000, 1 << 50, u64::MAX / 64] {
        let mut header = f.header();
        header.total_points = total_points;
        let new_header = encode_header(&header).unwrap();
        let mut bytes = original.clone();
        bytes[..new_header.len()].copy_from_slice(&new_header);
        fs::write(&path, &bytes).unwrap();

        assert!(
            matches!(
                read_file(&path),
                Err(Error::CorruptData(_) | Error::Decompression(_))
            ),
            "total_points {}",
            total_points
        );
        assert_eq!(read_header(&path).unwrap().total_points, total_points);
    }
}

#[test]
fn test_compressed_block_length_past_end() {
    let dir = scratch();
    let path = dir.path().join("len.zpoc");
    write_sample(&path, 100, 0, true);

    // block length prefix claims far more bytes than the file holds
    let mut bytes = fs::read(&path).unwrap();
    let at = FIXED_HEADER_SIZE + "GEOGCS[\"WGS 84\"]".len();
    bytes[at..at + 8].copy_from_slice(&(1u64 << 40).to_le_bytes());
    fs::write(&path, &bytes).unwrap();
    assert!(matches!(read_file(&path), Err(Error::Decompression(_))));
}

#[test]
fn test_inconsistent_extra_fields_on_assignment() {
    let mut f = SpocFile::new("", false);
    f.set_point_records(vec![PointRecord::default(); 3]).unwrap();

    let mut bad = vec![PointRecord::default(); 4];
    bad[2].extra = vec![1];
    assert!(matches!(
        f.set_point_records(bad),
        Err(Error::InconsistentExtraFields { index: 2, expected: 0, actual: 1 })
    ));
    assert_eq!(f.len(), 3);
}

#[test]
fn test_index_out_of_range() {
    let f = SpocFile::new("", false);
    assert!(matches!(f.point_record(0), Err(Error::IndexOutOfRange { .. })));
    assert!(matches!(f.extra(0), Err(Error::IndexOutOfRange { .. })));
}
