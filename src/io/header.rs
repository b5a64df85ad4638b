//! Header codec.
//!
//! ```text
//! +---------------------+
//! | Signature: "SPOC"   |  4 bytes
//! | Major version       |  u8
//! | Minor version       |  u8
//! | WKT length          |  u32 LE
//! | WKT                 |  n bytes (UTF-8)
//! | Extra fields        |  u8
//! | Total points        |  u64 LE
//! | Compressed flag     |  u8 (0 or 1)
//! +---------------------+
//! ```

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};

use super::format::*;
use crate::core::Header;
use crate::util::{write_prefixed_bytes, ByteReader, Error, Result};

/// Write `header` to `w`.
pub fn write_header<W: Write>(w: &mut W, header: &Header) -> Result<()> {
    let extra_fields = u8::try_from(header.extra_fields)
        .map_err(|_| Error::TooManyExtraFields(header.extra_fields))?;

    w.write_all(SPOC_SIGNATURE)?;
    w.write_u8(header.major_version)?;
    w.write_u8(header.minor_version)?;
    write_prefixed_bytes(w, header.wkt.as_bytes())?;
    w.write_u8(extra_fields)?;
    w.write_u64::<LittleEndian>(header.total_points)?;
    w.write_u8(u8::from(header.compressed))?;
    Ok(())
}

/// Encode `header` into a new buffer.
pub fn encode_header(header: &Header) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(FIXED_HEADER_SIZE + header.wkt.len());
    write_header(&mut buf, header)?;
    Ok(buf)
}

/// Decode a header from the start of `data`.
///
/// Returns the header and the number of bytes it occupies, so the caller
/// can go straight to the point block. Version compatibility is not
/// checked here.
pub fn decode_header(data: &[u8]) -> Result<(Header, usize)> {
    let mut r = ByteReader::new(data);
    let truncated = |field: &str| Error::malformed(format!("truncated before {}", field));

    let signature = r.take(SPOC_SIGNATURE.len()).map_err(|_| truncated("signature"))?;
    if signature != SPOC_SIGNATURE {
        return Err(Error::malformed("invalid signature, expected SPOC"));
    }
    let major_version = r.read_u8().map_err(|_| truncated("major version"))?;
    let minor_version = r.read_u8().map_err(|_| truncated("minor version"))?;
    let wkt_len = r.read_u32().map_err(|_| truncated("WKT length"))?;
    let wkt = r.take(wkt_len as usize).map_err(|_| {
        Error::malformed(format!(
            "WKT length {} exceeds the {} bytes available",
            wkt_len,
            r.remaining()
        ))
    })?;
    let wkt = String::from_utf8(wkt.to_vec())
        .map_err(|e| Error::malformed(format!("WKT is not valid UTF-8: {}", e)))?;
    let extra_fields = r.read_u8().map_err(|_| truncated("extra fields"))? as usize;
    let total_points = r.read_u64().map_err(|_| truncated("total points"))?;
    let compressed = match r.read_u8().map_err(|_| truncated("compressed flag"))? {
        0 => false,
        1 => true,
        other => {
            return Err(Error::malformed(format!("invalid compressed flag {}", other)));
        }
    };

    let header = Header {
        major_version,
        minor_version,
        wkt,
        extra_fields,
        total_points,
        compressed,
    };
    Ok((header, r.position()))
}

/// Read just the header from a stream.
///
/// Consumes exactly the header bytes; the stream is left at the point
/// block's length prefix.
pub fn read_header_from<R: Read>(r: &mut R) -> Result<(Header, usize)> {
    let mut buf = vec![0u8; HEADER_PREFIX_SIZE];
    r.read_exact(&mut buf).map_err(|e| match e.kind() {
        std::io::ErrorKind::UnexpectedEof => Error::malformed("file too short for a SPOC header"),
        _ => Error::Io(e),
    })?;
    if &buf[..SPOC_SIGNATURE.len()] != SPOC_SIGNATURE {
        return Err(Error::malformed("invalid signature, expected SPOC"));
    }

    let wkt_len = u32::from_le_bytes([buf[6], buf[7], buf[8], buf[9]]) as u64;
    let rest = wkt_len + HEADER_SUFFIX_SIZE as u64;
    // bounded by what the stream holds, not by the declared length
    let read = r.by_ref().take(rest).read_to_end(&mut buf)?;
    if (read as u64) < rest {
        return Err(Error::malformed(format!(
            "header declares {} more bytes, only {} available",
            rest, read
        )));
    }
    decode_header(&buf)
}

/// Read the header of the file at `path` without touching the point block.
pub fn read_header(path: impl AsRef<Path>) -> Result<Header> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::from_open(e, path))?;
    // header-sized buffer: the point block is never pulled in
    let mut reader = BufReader::with_capacity(4096, file);
    let (header, len) = read_header_from(&mut reader)?;
    tracing::debug!(
        path = %path.display(),
        header_bytes = len,
        total_points = header.total_points,
        "read header"
    );
    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header() -> Header {
        Header::new("PROJCS[\"test\"]", 3, 123_456, true)
    }

    #[test]
    fn test_header_roundtrip() {
        let h = sample_header();
        let bytes = encode_header(&h).unwrap();
        assert_eq!(bytes.len(), FIXED_HEADER_SIZE + h.wkt.len());

        let (decoded, len) = decode_header(&bytes).unwrap();
        assert_eq!(decoded, h);
        assert_eq!(len, bytes.len());
    }

    #[test]
    fn test_header_layout() {
        let h = Header {
            major_version: 0,
            minor_version: 1,
            wkt: "ab".into(),
            extra_fields: 2,
            total_points: 5,
            compressed: false,
        };
        let bytes = encode_header(&h).unwrap();
        assert_eq!(&bytes[0..4], b"SPOC");
        assert_eq!(bytes[4], 0);
        assert_eq!(bytes[5], 1);
        assert_eq!(&bytes[6..10], &[2, 0, 0, 0]);
        assert_eq!(&bytes[10..12], b"ab");
        assert_eq!(bytes[12], 2);
        assert_eq!(&bytes[13..21], &5u64.to_le_bytes());
        assert_eq!(bytes[21], 0);
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        let h = Header::new("", 0, 0, false);
        let mut bytes = encode_header(&h).unwrap();
        bytes.extend_from_slice(&[0xAA; 32]);
        let (_, len) = decode_header(&bytes).unwrap();
        assert_eq!(len, FIXED_HEADER_SIZE);
    }

    #[test]
    fn test_invalid_signature() {
        let mut bytes = encode_header(&sample_header()).unwrap();
        bytes[0] = b'X';
        assert!(matches!(decode_header(&bytes), Err(Error::MalformedHeader(_))));
        assert!(matches!(
            read_header_from(&mut bytes.as_slice()),
            Err(Error::MalformedHeader(_))
        ));
    }

    #[test]
    fn test_truncated_header() {
        let bytes = encode_header(&sample_header()).unwrap();
        for cut in [0, 3, 9, 12, bytes.len() - 1] {
            assert!(
                matches!(decode_header(&bytes[..cut]), Err(Error::MalformedHeader(_))),
                "cut at {}",
                cut
            );
        }
    }

    #[test]
    fn test_oversized_wkt_length() {
        let mut bytes = encode_header(&sample_header()).unwrap();
        bytes[6..10].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(decode_header(&bytes), Err(Error::MalformedHeader(_))));
        assert!(matches!(
            read_header_from(&mut bytes.as_slice()),
            Err(Error::MalformedHeader(_))
        ));
    }

    #[test]
    fn test_invalid_compressed_flag() {
        let mut bytes = encode_header(&sample_header()).unwrap();
        let last = bytes.len() - 1;
        bytes[last] = 2;
        assert!(matches!(decode_header(&bytes), Err(Error::MalformedHeader(_))));
    }

    #[test]
    fn test_too_many_extra_fields() {
        let h = Header::new("", 300, 0, false);
        assert!(matches!(encode_header(&h), Err(Error::TooManyExtraFields(300))));

        // the model's limit is exactly what the codec can encode
        let h = Header::new("", crate::core::MAX_EXTRA_FIELDS, 0, false);
        let (decoded, _) = decode_header(&encode_header(&h).unwrap()).unwrap();
        assert_eq!(decoded.extra_fields, MAX_EXTRA_FIELDS);
        let h = Header::new("", MAX_EXTRA_FIELDS + 1, 0, false);
        assert!(encode_header(&h).is_err());
    }

    #[test]
    fn test_read_header_from_stops_at_header() {
        let h = sample_header();
        let mut bytes = encode_header(&h).unwrap();
        let header_len = bytes.len();
        bytes.extend_from_slice(&[1, 2, 3]);

        let mut cursor = std::io::Cursor::new(bytes);
        let (decoded, len) = read_header_from(&mut cursor).unwrap();
        assert_eq!(decoded, h);
        assert_eq!(len, header_len);
        assert_eq!(cursor.position() as usize, header_len);
    }

    #[test]
    fn test_empty_wkt() {
        let h = Header::new("", 0, 0, false);
        let (decoded, _) = decode_header(&encode_header(&h).unwrap()).unwrap();
        assert!(decoded.wkt.is_empty());
    }
}
