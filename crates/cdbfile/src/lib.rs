//! # cdbfile: fixed-schema record files
//!
//! On-disk format for a record store. A file is a header describing the
//! record type's fields followed by the records themselves, each encoded at
//! the same fixed width.
//!
//! ## File layout
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │ HEADER                                        │
//! │                                               │
//! │ key_count K (u32)                             │
//! │ K × name (30 bytes, NUL padded / truncated)   │
//! │ K × byte_size (u32)                           │
//! ├───────────────────────────────────────────────┤
//! │ RECORDS (N × R bytes)                         │
//! │                                               │
//! │ field 0 | field 1 | ... | field K-1           │
//! │                                               │
//! │ ... repeated, back to back, N from file size  │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! All integers are little-endian. Each field is written at its own width
//! with no padding between fields, so `R` is the sum of the field sizes.
//! There is no magic number, version, checksum or stored record count: the
//! number of records is `(file_len - 4 - 34K) / R`.
//!
//! Loading is lenient by default: the header is skipped without being
//! checked, and a partial record at the end of the file is dropped. Both
//! behaviours can be tightened through [`LoadOptions`].

mod codec;
mod error;
mod format;
mod options;
mod reader;
mod writer;

pub use codec::{decode_record, encode_record, read_block};
pub use error::{CdbError, Result};
pub use format::{
    file_len, header_len, padded_name, read_header, read_key_count, write_header, FileHeader,
    HeaderKey, KEY_COUNT_BYTES, KEY_ENTRY_BYTES, KEY_NAME_BYTES, KEY_SIZE_BYTES,
};
pub use options::{HeaderPolicy, LoadOptions, TailPolicy};
pub use reader::CdbReader;
pub use writer::CdbWriter;
