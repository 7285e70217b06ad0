use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading or writing a record file.
#[derive(Debug, Error)]
pub enum CdbError {
    /// The file could not be opened or created.
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    /// Trailing bytes too few for one record. Only raised under
    /// [`TailPolicy::Reject`](crate::TailPolicy::Reject).
    #[error("short record at offset {offset}: expected {expected} bytes, found {found}")]
    ShortRecord {
        offset: u64,
        expected: usize,
        found: usize,
    },
    /// The file ends inside the header it declares.
    #[error("truncated header: {key_count} keys need {needed} bytes, file has {available}")]
    TruncatedHeader {
        key_count: u32,
        needed: u64,
        available: u64,
    },
    /// The stored header disagrees with the live schema.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),
    /// A record encoded to a different width than its schema declares.
    #[error("record encoded to {found} bytes, schema expects {expected}")]
    RecordSize { expected: usize, found: usize },
}

impl CdbError {
    /// `true` when the file to load does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CdbError::Open { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

pub type Result<T> = std::result::Result<T, CdbError>;
