use record::{Record, Schema};
use std::fs::File;
use std::io::{BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::codec::{decode_record, read_block};
use crate::error::{CdbError, Result};
use crate::format::{header_len, read_header, read_key_count, KEY_COUNT_BYTES};
use crate::options::{HeaderPolicy, LoadOptions, TailPolicy};

/// Loads the records of a record file.
///
/// [`open`](CdbReader::open) opens the file and reads the leading key count;
/// [`read_records`](CdbReader::read_records) then skips (or, in strict mode,
/// validates) the header and decodes fixed-width records until the file
/// ends. The file handle is released when the reader is dropped, including
/// on every error path.
pub struct CdbReader {
    path: PathBuf,
    reader: BufReader<File>,
    file_len: u64,
    /// `None` when the file is too short to hold a key count.
    key_count: Option<u32>,
    options: LoadOptions,
}

impl CdbReader {
    /// Opens a record file.
    ///
    /// # Errors
    ///
    /// Returns [`CdbError::Open`] if the file cannot be opened (check
    /// [`CdbError::is_not_found`] for a missing file), or an I/O error if
    /// its key count cannot be read.
    pub fn open<P: AsRef<Path>>(path: P, options: LoadOptions) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| CdbError::Open {
            path: path.clone(),
            source,
        })?;
        let file_len = file.metadata()?.len();
        let mut reader = BufReader::new(file);

        let key_count = if file_len >= KEY_COUNT_BYTES {
            Some(read_key_count(&mut reader)?)
        } else {
            None
        };

        Ok(Self {
            path,
            reader,
            file_len,
            key_count,
            options,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_len(&self) -> u64 {
        self.file_len
    }

    /// Key count stored in the file, if the file is long enough to have one.
    pub fn key_count(&self) -> Option<u32> {
        self.key_count
    }

    /// Decodes every whole record after the header.
    ///
    /// Records are returned in file order. An empty file yields no records.
    ///
    /// # Validation
    ///
    /// - [`HeaderPolicy::Ignore`]: the header is skipped by length
    ///   (`4 + 34 * key_count`) without looking at names or sizes. A file
    ///   ending inside the header yields no records.
    /// - [`HeaderPolicy::Strict`]: the header is decoded and must match
    ///   `schema`; a file ending inside it is [`CdbError::TruncatedHeader`].
    /// - [`TailPolicy::Drop`]: a final partial record is discarded.
    /// - [`TailPolicy::Reject`]: a final partial record is
    ///   [`CdbError::ShortRecord`].
    ///
    /// # Errors
    ///
    /// Returns an error per the policies above, or on any I/O failure.
    pub fn read_records<T: Record>(mut self, schema: &Schema) -> Result<Vec<T>> {
        if self.file_len == 0 {
            debug!(path = %self.path.display(), "empty record file");
            return Ok(Vec::new());
        }

        let key_count = self.key_count.unwrap_or(0);
        let data_start = header_len(key_count);
        if self.key_count.is_none() || self.file_len < data_start {
            if self.options.header == HeaderPolicy::Strict {
                return Err(CdbError::TruncatedHeader {
                    key_count,
                    needed: data_start,
                    available: self.file_len,
                });
            }
            warn!(
                path = %self.path.display(),
                key_count,
                file_len = self.file_len,
                "record file ends inside its header, loading nothing"
            );
            return Ok(Vec::new());
        }

        match self.options.header {
            HeaderPolicy::Strict => {
                self.reader.seek(SeekFrom::Start(0))?;
                let header = read_header(&mut self.reader)?;
                header.check_against(schema)?;
            }
            HeaderPolicy::Ignore => {
                if key_count as usize != schema.len() {
                    debug!(
                        path = %self.path.display(),
                        stored = key_count,
                        live = schema.len(),
                        "key count differs from schema, ignored"
                    );
                }
                self.reader.seek(SeekFrom::Start(data_start))?;
            }
        }

        let record_size = schema.record_size();
        if record_size == 0 {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        let mut buf = vec![0u8; record_size];
        let mut offset = data_start;
        loop {
            let filled = read_block(&mut self.reader, &mut buf)?;
            if filled == 0 {
                break;
            }
            if filled < record_size {
                match self.options.tail {
                    TailPolicy::Drop => {
                        warn!(
                            path = %self.path.display(),
                            offset,
                            dropped = filled,
                            "dropping partial trailing record"
                        );
                        break;
                    }
                    TailPolicy::Reject => {
                        return Err(CdbError::ShortRecord {
                            offset,
                            expected: record_size,
                            found: filled,
                        });
                    }
                }
            }
            records.push(decode_record(&buf)?);
            offset += record_size as u64;
        }

        debug!(
            path = %self.path.display(),
            records = records.len(),
            record_size,
            "loaded record file"
        );
        Ok(records)
    }
}
