//! # Entries
//!
//! The in-memory entry table of a record store.
//!
//! Records are kept in an append-only `Vec`. An entry's identifier is its
//! position, so identifiers are dense (`0..len`) and iteration always runs
//! in insertion order. Queries and updates are full scans that address
//! fields by name through [`record::Record`] traversal.
//!
//! ## Key properties
//! - **Ordered**: `iter()` yields entries by ascending identifier; "first
//!   match" means lowest identifier.
//! - **Owned**: the table owns every record; readers get references or
//!   clones, never aliases that outlive a mutation.
//! - **Type-directed matching**: a field matches a probe only when both are
//!   text with equal content or both are numbers with equal value.
//!
//! ## Example
//! ```rust
//! use entries::EntryTable;
//! use record::{record, FixedStr, Value};
//!
//! record! {
//!     #[derive(Debug, Clone, Default, PartialEq)]
//!     struct Pet {
//!         name: FixedStr<8>,
//!         legs: u8,
//!     }
//! }
//!
//! let mut t = EntryTable::new();
//! t.insert(Pet { name: FixedStr::new("rex"), legs: 4 });
//! t.insert(Pet { name: FixedStr::new("tweety"), legs: 2 });
//! assert_eq!(t.count_matches("legs", &Value::from(4)), 1);
//! assert!(!t.contains("name", &Value::from("nemo")));
//! ```

use std::io::{self, Write};

use record::{Record, Value};

/// Identifier of an entry: its position in the table.
pub type EntryId = usize;

/// An ordered, append-only table of records.
#[derive(Debug, Clone)]
pub struct EntryTable<T> {
    entries: Vec<T>,
}

impl<T> EntryTable<T> {
    /// Creates a new, empty table.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends a record and returns its identifier.
    pub fn insert(&mut self, record: T) -> EntryId {
        self.entries.push(record);
        self.entries.len() - 1
    }

    /// Appends every record from `records`, in order.
    pub fn extend<I: IntoIterator<Item = T>>(&mut self, records: I) {
        self.entries.extend(records);
    }

    /// Drops the current contents and takes `records` as the new table.
    ///
    /// Identifiers restart at 0.
    pub fn replace_all(&mut self, records: Vec<T>) {
        self.entries = records;
    }

    pub fn get(&self, id: EntryId) -> Option<&T> {
        self.entries.get(id)
    }

    /// Returns `(id, record)` pairs in ascending identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (EntryId, &T)> {
        self.entries.iter().enumerate()
    }

    /// Returns the records alone, in identifier order.
    pub fn records(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes all entries, keeping the allocation.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<T: Clone> EntryTable<T> {
    /// Copies every record, in identifier order.
    pub fn snapshot(&self) -> Vec<T> {
        self.entries.clone()
    }
}

impl<T> Default for EntryTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Counts the fields of `record` called `field` that match `value`.
fn field_matches<T: Record>(record: &T, field: &str, value: &Value<'_>) -> usize {
    let mut hits = 0;
    record.for_each_field(&mut |name, f| {
        if name == field && f.value().matches(value) {
            hits += 1;
        }
    });
    hits
}

impl<T: Record> EntryTable<T> {
    /// Counts, over all records, every field named `field` equal to `value`.
    ///
    /// Duplicate field names each contribute. A probe of the wrong kind (text
    /// against a number or the reverse) matches nothing.
    pub fn count_matches(&self, field: &str, value: &Value<'_>) -> usize {
        self.entries
            .iter()
            .map(|r| field_matches(r, field, value))
            .sum()
    }

    /// Returns `true` if any record has a field named `field` equal to `value`.
    pub fn contains(&self, field: &str, value: &Value<'_>) -> bool {
        self.entries
            .iter()
            .any(|r| field_matches(r, field, value) > 0)
    }

    /// Returns the lowest-id record with a field named `field` equal to `value`.
    pub fn find_first(&self, field: &str, value: &Value<'_>) -> Option<(EntryId, &T)> {
        self.iter()
            .find(|(_, r)| field_matches(*r, field, value) > 0)
    }

    /// Overwrites every field named `field` whose value equals `old` with `new`.
    ///
    /// Text is truncated to the field's capacity minus one byte and stays
    /// NUL-terminated. Fields that cannot hold `new` are left as they are.
    /// Returns the number of fields overwritten.
    pub fn replace_value(&mut self, field: &str, old: &Value<'_>, new: &Value<'_>) -> usize {
        let mut replaced = 0;
        for record in &mut self.entries {
            record.for_each_field_mut(&mut |name, f| {
                if name != field {
                    return;
                }
                let hit = f.value().matches(old);
                if hit && f.assign(new) {
                    replaced += 1;
                }
            });
        }
        replaced
    }

    /// Writes a human-readable dump: an `[Entry <id>]` header per record,
    /// one `name = value` line per field in schema order, then a blank line.
    pub fn write_dump<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for (id, record) in self.iter() {
            writeln!(out, "[Entry {id}]")?;
            let mut result = Ok(());
            record.for_each_field(&mut |name, f| {
                if result.is_ok() {
                    result = writeln!(out, "  {name} = {}", f.value());
                }
            });
            result?;
            writeln!(out)?;
        }
        Ok(())
    }
}
