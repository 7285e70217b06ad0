//! Per-field record encoding.
//!
//! A record is the concatenation of its fields in schema order, each in its
//! own fixed-width little-endian form. Nothing depends on the in-memory
//! layout of the record type.

use record::Record;
use std::io::{self, Read};

/// Appends the encoded form of `record` to `out`.
pub fn encode_record<T: Record>(record: &T, out: &mut Vec<u8>) -> io::Result<()> {
    let mut result = Ok(());
    record.for_each_field(&mut |_, field| {
        if result.is_ok() {
            result = field.encode(&mut *out);
        }
    });
    result
}

/// Decodes one record from `bytes`, which must hold at least one full
/// record.
pub fn decode_record<T: Record>(mut bytes: &[u8]) -> io::Result<T> {
    let mut record = T::default();
    let mut result = Ok(());
    record.for_each_field_mut(&mut |_, field| {
        if result.is_ok() {
            result = field.decode(&mut bytes);
        }
    });
    result.map(|()| record)
}

/// Fills `buf` from `r` as far as the stream allows and returns how many
/// bytes were read. Less than `buf.len()` means the stream ended.
pub fn read_block<R: Read + ?Sized>(r: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
