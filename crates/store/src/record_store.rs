//! Record store that ties together the schema, entry table and file layers.

use cdbfile::{CdbReader, CdbWriter, LoadOptions, Result};
use entries::{EntryId, EntryTable};
use record::{Record, Schema, Value};
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, info};

/// Store configuration, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreOptions {
    /// Leniency of [`RecordStore::parse`].
    pub load: LoadOptions,
    /// If `true`, [`RecordStore::publish`] calls `fsync` before the final
    /// rename.
    pub sync: bool,
}

/// A typed collection of `T` records backed by one binary file.
///
/// # Lifecycle
///
/// 1. Construction derives the [`Schema`] from `T::default()`.
/// 2. Records arrive through [`add_entry`](Self::add_entry) /
///    [`add_entries`](Self::add_entries) or by loading a file with
///    [`parse`](Self::parse).
/// 3. Queries and [`replace_value`](Self::replace_value) run in memory, in
///    any order.
/// 4. [`publish`](Self::publish) writes the whole table back out.
///
/// # Identifiers
///
/// Entry identifiers are positions: the `n`-th record added (or read from
/// the file) has id `n - 1`. Iteration, "first match" and the record order
/// of a published file all follow identifier order, so loading a file and
/// publishing it again reproduces it byte for byte.
///
/// The store is single-owner; share it across threads behind a lock or hand
/// out [`get_entries`](Self::get_entries) snapshots.
#[derive(Debug, Clone)]
pub struct RecordStore<T: Record> {
    schema: Schema,
    entries: EntryTable<T>,
    options: StoreOptions,
}

impl<T: Record> RecordStore<T> {
    /// Creates an empty store with default options.
    pub fn new() -> Self {
        Self::with_options(StoreOptions::default())
    }

    /// Creates an empty store.
    pub fn with_options(options: StoreOptions) -> Self {
        Self {
            schema: Schema::of::<T>(),
            entries: EntryTable::new(),
            options,
        }
    }

    /// Creates a store and loads `directory/file_name` into it.
    ///
    /// # Errors
    ///
    /// See [`parse`](Self::parse).
    pub fn open<P: AsRef<Path>>(directory: P, file_name: &str) -> Result<Self> {
        Self::open_with_options(directory, file_name, StoreOptions::default())
    }

    pub fn open_with_options<P: AsRef<Path>>(
        directory: P,
        file_name: &str,
        options: StoreOptions,
    ) -> Result<Self> {
        let mut store = Self::with_options(options);
        store.parse(directory, file_name)?;
        Ok(store)
    }

    /// Replaces the entry table with the records of `directory/file_name`
    /// and returns how many were loaded. Identifiers restart at 0.
    ///
    /// # Errors
    ///
    /// - [`CdbError::Open`](cdbfile::CdbError::Open) if the file is missing
    ///   or unreadable. An existing empty file is not an error.
    /// - Format errors according to [`StoreOptions::load`].
    ///
    /// On error the current entries are kept unchanged.
    pub fn parse<P: AsRef<Path>>(&mut self, directory: P, file_name: &str) -> Result<usize> {
        let path = directory.as_ref().join(file_name);
        let reader = CdbReader::open(&path, self.options.load)?;
        let records = reader.read_records::<T>(&self.schema)?;
        let loaded = records.len();
        self.entries.replace_all(records);
        info!(path = %path.display(), entries = loaded, "parsed record file");
        Ok(loaded)
    }

    /// Writes the schema header and every entry, in identifier order, to
    /// `directory/file_name`, replacing any existing file.
    ///
    /// The file is exactly `4 + 34 * K + N * R` bytes for `K` schema fields,
    /// `N` entries and record size `R`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn publish<P: AsRef<Path>>(&self, directory: P, file_name: &str) -> Result<()> {
        let path = directory.as_ref().join(file_name);
        let written = CdbWriter::publish(
            &path,
            &self.schema,
            self.entries.records(),
            self.options.sync,
        )?;
        info!(
            path = %path.display(),
            entries = self.entries.len(),
            bytes = written,
            "published record file"
        );
        Ok(())
    }

    /// Appends one record and returns its identifier.
    pub fn add_entry(&mut self, record: T) -> EntryId {
        self.entries.insert(record)
    }

    /// Appends every record from `records`, in order.
    pub fn add_entries<I: IntoIterator<Item = T>>(&mut self, records: I) {
        self.entries.extend(records);
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Returns `true` if any entry has a field named `field` equal to `value`.
    pub fn contains<'v>(&self, field: &str, value: impl Into<Value<'v>>) -> bool {
        self.entries.contains(field, &value.into())
    }

    /// Counts every field named `field` equal to `value`, across all entries.
    ///
    /// Text fields match text probes by content and numeric fields match
    /// numeric probes by value; a probe of the other kind counts as no match.
    pub fn count_matches<'v>(&self, field: &str, value: impl Into<Value<'v>>) -> usize {
        self.entries.count_matches(field, &value.into())
    }

    /// Returns a copy of the entry with identifier `id`.
    pub fn get_entry(&self, id: EntryId) -> Option<T> {
        self.entries.get(id).cloned()
    }

    /// Returns a copy of the lowest-id entry whose field `field` equals
    /// `value`.
    pub fn get_entry_by<'v>(&self, field: &str, value: impl Into<Value<'v>>) -> Option<T> {
        self.entries
            .find_first(field, &value.into())
            .map(|(_, record)| record.clone())
    }

    /// Returns a copy of every entry, in identifier order.
    pub fn get_entries(&self) -> Vec<T> {
        self.entries.snapshot()
    }

    pub fn total_entries(&self) -> usize {
        self.entries.len()
    }

    /// Writes every entry as an `[Entry <id>]` line followed by one
    /// `name = value` line per field, in schema order, and a blank line.
    pub fn print_entries<W: Write>(&self, sink: &mut W) -> io::Result<()> {
        self.entries.write_dump(sink)
    }

    /// In every entry, overwrites each field named `field` that equals
    /// `old_value` with `new_value`.
    ///
    /// Text longer than a field's capacity is truncated to `capacity - 1`
    /// bytes and stays NUL-terminated. A float written into an integer field
    /// is truncated toward zero. A value the field cannot hold (text into a
    /// number, a number out of range) leaves that field unchanged.
    /// Nothing happens when no field matches.
    pub fn replace_value<'a, 'b>(
        &mut self,
        field: &str,
        old_value: impl Into<Value<'a>>,
        new_value: impl Into<Value<'b>>,
    ) {
        let old_value = old_value.into();
        let new_value = new_value.into();
        let replaced = self.entries.replace_value(field, &old_value, &new_value);
        debug!(field, %old_value, %new_value, replaced, "replace_value");
    }
}

impl<T: Record> Default for RecordStore<T> {
    fn default() -> Self {
        Self::new()
    }
}
