//! # Store
//!
//! A typed, fixed-schema record store persisted to a single binary file.
//!
//! [`RecordStore<T>`] ties together the three lower layers:
//!
//! - [`record`]: the schema of `T`, discovered once from `T::default()`;
//! - [`entries`]: the ordered in-memory entry table and its field scans;
//! - [`cdbfile`]: the on-disk header + fixed-width record format.
//!
//! ## Example
//! ```rust
//! use store::{record, FixedStr, RecordStore};
//!
//! record! {
//!     #[derive(Debug, Clone, Default, PartialEq)]
//!     pub struct Person {
//!         pub name: FixedStr<16>,
//!         pub age: u32,
//!     }
//! }
//!
//! let dir = tempfile::tempdir().unwrap();
//! let mut people = RecordStore::<Person>::new();
//! people.add_entry(Person { name: FixedStr::new("ada"), age: 36 });
//! people.publish(dir.path(), "people.cdb").unwrap();
//!
//! let loaded = RecordStore::<Person>::open(dir.path(), "people.cdb").unwrap();
//! assert!(loaded.contains("name", "ada"));
//! assert_eq!(loaded.get_entry(0).unwrap().age, 36);
//! ```

mod record_store;

pub use cdbfile::{CdbError, HeaderPolicy, LoadOptions, Result, TailPolicy};
pub use entries::EntryId;
pub use record::{record, Field, FieldKind, FixedStr, NumericKind, Record, Schema, Value};
pub use record_store::{RecordStore, StoreOptions};
