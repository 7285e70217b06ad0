use anyhow::{bail, Context, Result};
use cdbfile::{read_block, read_header, FileHeader};
use std::fs::File;
use std::io::{BufReader, Seek, SeekFrom, Write};
use std::path::Path;
use tracing::debug;

/// What a record file holds, worked out from its header and length alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    pub header: FileHeader,
    pub file_len: u64,
    /// Sum of the stored field sizes.
    pub record_size: u64,
    /// Whole records after the header.
    pub records: u64,
    /// Bytes after the last whole record.
    pub trailing: u64,
}

pub fn summarize(path: &Path) -> Result<FileSummary> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let file_len = file.metadata()?.len();
    let header = read_header(&mut BufReader::new(&file))
        .with_context(|| format!("reading header of {}", path.display()))?;

    let data_len = file_len.saturating_sub(header.encoded_len());
    let record_size = header.record_size();
    let (records, trailing) = match record_size {
        0 => (0, data_len),
        r => (data_len / r, data_len % r),
    };
    debug!(path = %path.display(), file_len, record_size, records, "summarized");

    Ok(FileSummary {
        header,
        file_len,
        record_size,
        records,
        trailing,
    })
}

pub fn write_header<W: Write>(summary: &FileSummary, out: &mut W) -> Result<()> {
    writeln!(out, "keys: {}", summary.header.key_count())?;
    for key in &summary.header.keys {
        writeln!(out, "  {} ({} bytes)", key.name_lossy(), key.byte_size)?;
    }
    Ok(())
}

pub fn write_summary<W: Write>(summary: &FileSummary, out: &mut W) -> Result<()> {
    write_header(summary, out)?;
    writeln!(out, "file size: {} bytes", summary.file_len)?;
    writeln!(out, "record size: {} bytes", summary.record_size)?;
    writeln!(out, "records: {}", summary.records)?;
    writeln!(out, "trailing bytes: {}", summary.trailing)?;
    Ok(())
}

/// Prints each whole record as `name = <hex>` lines, one block per record.
pub fn dump<W: Write>(path: &Path, limit: Option<u64>, out: &mut W) -> Result<()> {
    let summary = summarize(path)?;
    if summary.record_size == 0 {
        bail!("{} declares no record bytes", path.display());
    }
    let count = limit.map_or(summary.records, |n| n.min(summary.records));
    if count == 0 {
        return Ok(());
    }
    // At least one whole record is on disk, so the buffer never outgrows the file.
    let record_size = usize::try_from(summary.record_size)
        .with_context(|| format!("{} declares oversized records", path.display()))?;

    let mut file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    file.seek(SeekFrom::Start(summary.header.encoded_len()))?;
    let mut reader = BufReader::new(file);

    let mut buf = vec![0u8; record_size];
    for id in 0..count {
        if read_block(&mut reader, &mut buf)? < buf.len() {
            break;
        }
        writeln!(out, "[Entry {id}]")?;
        let mut at = 0usize;
        for key in &summary.header.keys {
            let end = at + key.byte_size as usize;
            writeln!(out, "  {} = {}", key.name_lossy(), hex::encode(&buf[at..end]))?;
            at = end;
        }
        writeln!(out)?;
    }
    Ok(())
}
