//! Header constants and read/write helpers.
//!
//! ```text
//! [key_count: u32 LE][name: 30 bytes] × K [byte_size: u32 LE] × K
//! ```

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use record::Schema;
use std::io::{Read, Result as IoResult, Write};

use crate::error::{CdbError, Result};

/// Size of the leading key count.
pub const KEY_COUNT_BYTES: u64 = 4;

/// Width of one stored field name.
pub const KEY_NAME_BYTES: usize = 30;

/// Width of one stored field size.
pub const KEY_SIZE_BYTES: u64 = 4;

/// Header bytes contributed by each key: name + size.
pub const KEY_ENTRY_BYTES: u64 = KEY_NAME_BYTES as u64 + KEY_SIZE_BYTES;

/// Total header length for `key_count` keys: `4 + 34 * key_count`.
pub fn header_len(key_count: u32) -> u64 {
    KEY_COUNT_BYTES + u64::from(key_count) * KEY_ENTRY_BYTES
}

/// Exact size of a file holding `records` records of `record_size` bytes
/// under a `key_count`-key header.
pub fn file_len(key_count: u32, records: u64, record_size: u64) -> u64 {
    header_len(key_count) + records * record_size
}

/// `name` as stored: cut to 30 bytes, NUL padded.
pub fn padded_name(name: &str) -> [u8; KEY_NAME_BYTES] {
    let mut out = [0u8; KEY_NAME_BYTES];
    let len = name.len().min(KEY_NAME_BYTES);
    out[..len].copy_from_slice(&name.as_bytes()[..len]);
    out
}

/// One decoded header key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderKey {
    /// Name bytes up to the first NUL.
    pub name: Vec<u8>,
    pub byte_size: u32,
}

impl HeaderKey {
    pub fn name_lossy(&self) -> String {
        String::from_utf8_lossy(&self.name).into_owned()
    }
}

/// A fully decoded header.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileHeader {
    pub keys: Vec<HeaderKey>,
}

impl FileHeader {
    /// The header [`write_header`] produces for `schema`.
    pub fn from_schema(schema: &Schema) -> Self {
        let keys = schema
            .iter()
            .map(|f| {
                let raw = padded_name(f.name);
                let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
                HeaderKey {
                    name: raw[..end].to_vec(),
                    byte_size: f.byte_size() as u32,
                }
            })
            .collect();
        Self { keys }
    }

    pub fn key_count(&self) -> u32 {
        self.keys.len() as u32
    }

    /// Encoded length of this header.
    pub fn encoded_len(&self) -> u64 {
        header_len(self.key_count())
    }

    /// Record width implied by the stored sizes.
    pub fn record_size(&self) -> u64 {
        self.keys.iter().map(|k| u64::from(k.byte_size)).sum()
    }

    /// Checks that this header describes `schema`, key by key.
    pub fn check_against(&self, schema: &Schema) -> Result<()> {
        let expected = FileHeader::from_schema(schema);
        if self.keys.len() != expected.keys.len() {
            return Err(CdbError::SchemaMismatch(format!(
                "file declares {} keys, schema has {}",
                self.keys.len(),
                expected.keys.len()
            )));
        }
        for (i, (stored, live)) in self.keys.iter().zip(&expected.keys).enumerate() {
            if stored.name != live.name {
                return Err(CdbError::SchemaMismatch(format!(
                    "key {i} is named {:?}, schema expects {:?}",
                    stored.name_lossy(),
                    live.name_lossy()
                )));
            }
            if stored.byte_size != live.byte_size {
                return Err(CdbError::SchemaMismatch(format!(
                    "key {:?} is {} bytes, schema expects {}",
                    live.name_lossy(),
                    stored.byte_size,
                    live.byte_size
                )));
            }
        }
        Ok(())
    }
}

/// Writes the header for `schema`: key count, all names, then all sizes.
pub fn write_header<W: Write>(w: &mut W, schema: &Schema) -> IoResult<()> {
    w.write_u32::<LittleEndian>(schema.len() as u32)?;
    for field in schema.iter() {
        w.write_all(&padded_name(field.name))?;
    }
    for field in schema.iter() {
        w.write_u32::<LittleEndian>(field.byte_size() as u32)?;
    }
    Ok(())
}

/// Reads only the leading key count.
pub fn read_key_count<R: Read>(r: &mut R) -> IoResult<u32> {
    r.read_u32::<LittleEndian>()
}

/// Reads and decodes a whole header. The reader must be at offset 0; on
/// success it is left at the first record.
pub fn read_header<R: Read>(r: &mut R) -> IoResult<FileHeader> {
    let key_count = read_key_count(r)?;
    let mut names = Vec::new();
    for _ in 0..key_count {
        let mut raw = [0u8; KEY_NAME_BYTES];
        r.read_exact(&mut raw)?;
        let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
        names.push(raw[..end].to_vec());
    }
    let mut keys = Vec::with_capacity(names.len());
    for name in names {
        let byte_size = r.read_u32::<LittleEndian>()?;
        keys.push(HeaderKey { name, byte_size });
    }
    Ok(FileHeader { keys })
}

#[cfg(test)]
mod tests {
    use super::*;
    use record::{record, FixedStr};

    record! {
        #[derive(Debug, Clone, Default)]
        struct Item {
            sku: FixedStr<12>,
            qty: u16,
            a_field_name_that_is_much_longer_than_thirty: u8,
        }
    }

    #[test]
    fn header_len_matches_layout() {
        assert_eq!(header_len(0), 4);
        assert_eq!(header_len(1), 38);
        assert_eq!(header_len(3), 4 + 3 * 34);
        assert_eq!(file_len(2, 10, 16), 4 + 68 + 160);
    }

    #[test]
    fn padded_name_pads_and_truncates() {
        let short = padded_name("qty");
        assert_eq!(&short[..4], b"qty\0");
        assert!(short[3..].iter().all(|&b| b == 0));

        let long = padded_name("a_field_name_that_is_much_longer_than_thirty");
        assert_eq!(&long[..], b"a_field_name_that_is_much_long");
    }

    #[test]
    fn write_header_bytes() {
        let schema = Schema::of::<Item>();
        let mut buf = Vec::new();
        write_header(&mut buf, &schema).unwrap();

        assert_eq!(buf.len() as u64, header_len(3));
        assert_eq!(&buf[..4], &3u32.to_le_bytes());
        assert_eq!(&buf[4..7], b"sku");
        assert_eq!(&buf[34..37], b"qty");
        // sizes follow all names
        let sizes = &buf[4 + 90..];
        assert_eq!(&sizes[..4], &12u32.to_le_bytes());
        assert_eq!(&sizes[4..8], &2u32.to_le_bytes());
        assert_eq!(&sizes[8..12], &1u32.to_le_bytes());
    }

    #[test]
    fn read_header_decodes_written_header() {
        let schema = Schema::of::<Item>();
        let mut buf = Vec::new();
        write_header(&mut buf, &schema).unwrap();

        let header = read_header(&mut buf.as_slice()).unwrap();
        assert_eq!(header, FileHeader::from_schema(&schema));
        assert_eq!(header.key_count(), 3);
        assert_eq!(header.record_size(), 15);
        assert_eq!(header.keys[2].name_lossy(), "a_field_name_that_is_much_long");
        header.check_against(&schema).unwrap();
    }

    #[test]
    fn check_against_reports_differences() {
        let schema = Schema::of::<Item>();
        let mut header = FileHeader::from_schema(&schema);
        header.keys[1].byte_size = 4;
        assert!(matches!(
            header.check_against(&schema),
            Err(CdbError::SchemaMismatch(_))
        ));

        let mut header = FileHeader::from_schema(&schema);
        header.keys.pop();
        assert!(header.check_against(&schema).is_err());
    }

    #[test]
    fn read_header_fails_on_truncation() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&2u32.to_le_bytes());
        buf.extend_from_slice(&[b'x'; 40]);
        assert!(read_header(&mut buf.as_slice()).is_err());
    }
}
