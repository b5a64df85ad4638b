//! Row encoding of the point block.
//!
//! Each record is `record_size(extra_fields)` bytes:
//! `x y z` (f64), `c p` (u32), `i r g b` (u16), then the extras (u64),
//! all little-endian. Rows are fixed width, so both directions split the
//! buffer into rows and work on them in parallel.

use byteorder::{ByteOrder, LittleEndian};
use rayon::prelude::*;

use super::format::{record_size, EXTRA_FIELD_SIZE, RECORD_BASE_SIZE};
use crate::core::PointRecord;
use crate::util::{Error, Result};

fn encode_record(record: &PointRecord, out: &mut [u8]) {
    LittleEndian::write_f64(&mut out[0..8], record.x);
    LittleEndian::write_f64(&mut out[8..16], record.y);
    LittleEndian::write_f64(&mut out[16..24], record.z);
    LittleEndian::write_u32(&mut out[24..28], record.c);
    LittleEndian::write_u32(&mut out[28..32], record.p);
    LittleEndian::write_u16(&mut out[32..34], record.i);
    LittleEndian::write_u16(&mut out[34..36], record.r);
    LittleEndian::write_u16(&mut out[36..38], record.g);
    LittleEndian::write_u16(&mut out[38..40], record.b);
    for (value, chunk) in record
        .extra
        .iter()
        .zip(out[RECORD_BASE_SIZE..].chunks_exact_mut(EXTRA_FIELD_SIZE))
    {
        LittleEndian::write_u64(chunk, *value);
    }
}

fn decode_record(row: &[u8]) -> PointRecord {
    PointRecord {
        x: LittleEndian::read_f64(&row[0..8]),
        y: LittleEndian::read_f64(&row[8..16]),
        z: LittleEndian::read_f64(&row[16..24]),
        c: LittleEndian::read_u32(&row[24..28]),
        p: LittleEndian::read_u32(&row[28..32]),
        i: LittleEndian::read_u16(&row[32..34]),
        r: LittleEndian::read_u16(&row[34..36]),
        g: LittleEndian::read_u16(&row[36..38]),
        b: LittleEndian::read_u16(&row[38..40]),
        extra: row[RECORD_BASE_SIZE..]
            .chunks_exact(EXTRA_FIELD_SIZE)
            .map(LittleEndian::read_u64)
            .collect(),
    }
}

/// Encode `records` as raw rows.
///
/// Every record must carry exactly `extra_fields` extras.
pub fn encode_points(records: &[PointRecord], extra_fields: usize) -> Result<Vec<u8>> {
    if let Some(index) = records.iter().position(|r| r.extra.len() != extra_fields) {
        return Err(Error::InconsistentExtraFields {
            index,
            expected: extra_fields,
            actual: records[index].extra.len(),
        });
    }

    let width = record_size(extra_fields);
    let mut buf = vec![0u8; records.len() * width];
    buf.par_chunks_exact_mut(width)
        .zip(records.par_iter())
        .for_each(|(row, record)| encode_record(record, row));
    Ok(buf)
}

/// Decode raw rows into exactly `total_points` records.
pub fn decode_points(data: &[u8], total_points: u64, extra_fields: usize) -> Result<Vec<PointRecord>> {
    let width = record_size(extra_fields);
    let expected = expected_block_len(total_points, extra_fields)?;
    if data.len() != expected {
        return Err(Error::corrupt(format!(
            "point block holds {} bytes ({} whole records), header declares {} records",
            data.len(),
            data.len() / width,
            total_points
        )));
    }
    Ok(data.par_chunks_exact(width).map(decode_record).collect())
}

/// Raw block length implied by a header.
pub fn expected_block_len(total_points: u64, extra_fields: usize) -> Result<usize> {
    usize::try_from(total_points)
        .ok()
        .and_then(|n| n.checked_mul(record_size(extra_fields)))
        .ok_or_else(|| {
            Error::corrupt(format!(
                "{} records of {} bytes does not fit in memory",
                total_points,
                record_size(extra_fields)
            ))
        })
}
