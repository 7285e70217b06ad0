use record::{Record, Schema};
use std::ffi::OsString;
use std::fs::{remove_file, rename, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::codec::encode_record;
use crate::error::{CdbError, Result};
use crate::format::{header_len, write_header};

/// Writes a complete record file.
///
/// The writer is stateless; all work happens inside the single static method
/// [`publish`](CdbWriter::publish). Data is written to a temporary file next
/// to the target, flushed (and optionally fsynced), then atomically renamed
/// over the target, so readers never see a half-written file.
pub struct CdbWriter {}

/// `<path>.tmp`, next to the target.
fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("records"));
    name.push(".tmp");
    path.with_file_name(name)
}

impl CdbWriter {
    /// Writes the header for `schema` followed by every record from
    /// `records`, in iteration order. Returns the number of bytes written,
    /// which is always `4 + 34 * K + N * R`.
    ///
    /// # Crash Safety
    ///
    /// Writes to `<file>.tmp`, optionally calls `sync_all()`, then renames.
    ///
    /// # Errors
    ///
    /// Returns [`CdbError::Open`] if the temporary file cannot be created,
    /// [`CdbError::RecordSize`] if a record encodes to a width other than
    /// `schema.record_size()`, or an I/O error. On error the target file is
    /// left untouched and the temporary file is removed.
    pub fn publish<'a, T, I>(path: &Path, schema: &Schema, records: I, sync: bool) -> Result<u64>
    where
        T: Record + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let tmp_path = tmp_path_for(path);
        let result = Self::write_tmp(&tmp_path, schema, records, sync);
        let written = match result {
            Ok(written) => written,
            Err(e) => {
                let _ = remove_file(&tmp_path);
                return Err(e);
            }
        };

        if let Err(e) = rename(&tmp_path, path) {
            let _ = remove_file(&tmp_path);
            return Err(e.into());
        }
        debug!(path = %path.display(), bytes = written, "published record file");
        Ok(written)
    }

    fn write_tmp<'a, T, I>(tmp_path: &Path, schema: &Schema, records: I, sync: bool) -> Result<u64>
    where
        T: Record + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(tmp_path)
            .map_err(|source| CdbError::Open {
                path: tmp_path.to_path_buf(),
                source,
            })?;
        let mut out = BufWriter::new(file);

        write_header(&mut out, schema)?;
        let mut written = header_len(schema.len() as u32);

        let record_size = schema.record_size();
        let mut buf = Vec::with_capacity(record_size);
        for record in records {
            buf.clear();
            encode_record(record, &mut buf)?;
            if buf.len() != record_size {
                return Err(CdbError::RecordSize {
                    expected: record_size,
                    found: buf.len(),
                });
            }
            out.write_all(&buf)?;
            written += record_size as u64;
        }

        out.flush()?;
        let file = out.into_inner().map_err(|e| e.into_error())?;
        if sync {
            file.sync_all()?;
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{file_len, read_header, FileHeader};
    use anyhow::Result;
    use record::{record, Field, FixedStr};
    use tempfile::tempdir;

    record! {
        #[derive(Debug, Clone, Default, PartialEq)]
        struct Book {
            title: FixedStr<20>,
            pages: u16,
            rating: f32,
        }
    }

    fn books(n: u16) -> Vec<Book> {
        (0..n)
            .map(|i| Book {
                title: FixedStr::new(&format!("book {i}")),
                pages: 100 + i,
                rating: 4.5,
            })
            .collect()
    }

    #[test]
    fn file_size_is_header_plus_records() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("books.cdb");
        let schema = Schema::of::<Book>();

        let written = CdbWriter::publish(&path, &schema, &books(7), true)?;
        let expected = file_len(3, 7, 26);
        assert_eq!(written, expected);
        assert_eq!(std::fs::metadata(&path)?.len(), expected);
        Ok(())
    }

    #[test]
    fn header_describes_schema() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("books.cdb");
        let schema = Schema::of::<Book>();
        CdbWriter::publish(&path, &schema, &books(1), false)?;

        let mut f = std::fs::File::open(&path)?;
        let header = read_header(&mut f)?;
        assert_eq!(header, FileHeader::from_schema(&schema));
        let names: Vec<_> = header.keys.iter().map(|k| k.name_lossy()).collect();
        assert_eq!(names, vec!["title", "pages", "rating"]);
        Ok(())
    }

    #[test]
    fn publish_replaces_existing_file_and_leaves_no_tmp() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("books.cdb");
        let schema = Schema::of::<Book>();
        CdbWriter::publish(&path, &schema, &books(10), false)?;
        CdbWriter::publish(&path, &schema, &books(2), false)?;

        assert_eq!(std::fs::metadata(&path)?.len(), file_len(3, 2, 26));
        assert!(!tmp_path_for(&path).exists());
        Ok(())
    }

    #[test]
    fn tmp_path_sits_next_to_target() {
        let p = Path::new("/data/store/people.cdb");
        assert_eq!(tmp_path_for(p), Path::new("/data/store/people.cdb.tmp"));
    }

    #[test]
    fn failed_rename_removes_tmp() -> Result<()> {
        let dir = tempdir()?;
        // a non-empty directory cannot be replaced by a file
        let path = dir.path().join("books.cdb");
        std::fs::create_dir(&path)?;
        std::fs::write(path.join("keep"), b"x")?;

        let err = CdbWriter::publish(&path, &Schema::of::<Book>(), &books(2), false).unwrap_err();
        assert!(matches!(err, CdbError::Io(_)));
        assert!(!tmp_path_for(&path).exists());
        assert!(path.join("keep").exists());
        Ok(())
    }

    // A field whose encoder writes one byte too few.
    #[derive(Debug, Clone, Default)]
    struct Lying(u32);

    impl Field for Lying {
        fn kind(&self) -> record::FieldKind {
            record::FieldKind::Scalar(record::NumericKind::U32)
        }
        fn value(&self) -> record::Value<'_> {
            record::Value::from(self.0)
        }
        fn assign(&mut self, _value: &record::Value<'_>) -> bool {
            false
        }
        fn encode(&self, out: &mut dyn std::io::Write) -> std::io::Result<()> {
            out.write_all(&self.0.to_le_bytes()[..3])
        }
        fn decode(&mut self, _input: &mut dyn std::io::Read) -> std::io::Result<()> {
            Ok(())
        }
    }

    record! {
        #[derive(Debug, Clone, Default)]
        struct Broken {
            v: Lying,
        }
    }

    #[test]
    fn wrong_encoded_width_is_rejected_and_target_untouched() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("broken.cdb");
        let schema = Schema::of::<Broken>();

        let err = CdbWriter::publish(&path, &schema, &vec![Broken::default()], false).unwrap_err();
        assert!(matches!(
            err,
            CdbError::RecordSize {
                expected: 4,
                found: 3
            }
        ));
        assert!(!path.exists());
        assert!(!tmp_path_for(&path).exists());
        Ok(())
    }
}
