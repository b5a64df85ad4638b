//! Text form used by `dump` and `from-text`: the WKT on the first line,
//! then one tab-separated point record per line.

use std::io::{BufRead, Write};

use spoc::{Error, PointRecord, Result, SpocFile};

/// Write `file` as text, stopping after `limit` records if given.
pub fn write_text<W: Write>(w: &mut W, file: &SpocFile, limit: Option<usize>) -> Result<usize> {
    let shown = limit.unwrap_or(file.len()).min(file.len());
    writeln!(w, "{}", file.wkt())?;
    for record in &file.point_records()[..shown] {
        writeln!(w, "{}", record)?;
    }
    Ok(shown)
}

/// Parse text back into a file. Blank lines are skipped; the extra field
/// count is taken from the first record.
pub fn read_text<R: BufRead>(r: R, compressed: bool) -> Result<SpocFile> {
    let mut lines = r.lines();
    let wkt = lines.next().transpose()?.unwrap_or_default();

    let mut records = Vec::new();
    for (n, line) in lines.enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: PointRecord = line.parse().map_err(|e| match e {
            // wkt is line 1
            Error::InvalidRecordText(msg) => Error::InvalidRecordText(format!("line {}: {}", n + 2, msg)),
            other => other,
        })?;
        records.push(record);
    }

    let mut file = SpocFile::new(wkt, compressed);
    file.set_extra_fields(records.first().map_or(0, PointRecord::extra_fields))?;
    file.set_point_records(records)?;
    Ok(file)
}
