//! # Record
//!
//! Field reflection for fixed-layout record types.
//!
//! A record is a plain struct whose fields are either fixed-width numbers
//! (`i8`..`u64`, `f32`, `f64`) or fixed-capacity text buffers
//! ([`FixedStr<N>`]). The [`Record`] trait walks those fields in declaration
//! order, yielding each field's name and a [`Field`] handle, read-only or
//! mutable. Everything above this crate (schema discovery, the binary codec,
//! name-based queries and updates) is built on that one traversal.
//!
//! ## Key properties
//! - **Declaration order**: traversal order is the order fields are written
//!   in the struct, and never changes for a given type.
//! - **Kind-tagged**: every field reports a [`FieldKind`], either
//!   `Text { capacity }` or `Scalar(NumericKind)`, with a static byte size.
//! - **Type-directed equality**: [`Value`] compares text with text and
//!   numbers with numbers; mixed comparisons are simply unequal.
//!
//! ## Example
//! ```rust
//! use record::{record, FixedStr, Record, Schema, Value};
//!
//! record! {
//!     #[derive(Debug, Clone, Default, PartialEq)]
//!     pub struct Person {
//!         pub name: FixedStr<16>,
//!         pub age: u32,
//!     }
//! }
//!
//! let schema = Schema::of::<Person>();
//! assert_eq!(schema.names().collect::<Vec<_>>(), vec!["name", "age"]);
//! assert_eq!(schema.record_size(), 20);
//!
//! let p = Person { name: FixedStr::new("alice"), age: 30 };
//! let mut ages = Vec::new();
//! p.for_each_field(&mut |name, field| {
//!     if name == "age" {
//!         ages.push(field.value() == Value::from(30));
//!     }
//! });
//! assert_eq!(ages, vec![true]);
//! ```

mod field;
mod schema;
mod text;
mod value;

pub use field::{Field, FieldKind, FieldType, NumericKind};
pub use schema::{FieldDescriptor, Schema};
pub use text::FixedStr;
pub use value::{Scalar, Value};

/// A fixed-layout record whose named fields can be enumerated.
///
/// Both traversals must visit the same fields, with the same names, in the
/// same order, every time. [`Schema::of`] relies on this to describe the
/// type once from `T::default()`.
///
/// Implement it with the [`record!`] macro, or by hand for types that need
/// custom field naming.
pub trait Record: Default + Clone {
    /// Visits every field in declaration order.
    fn for_each_field(&self, visit: &mut dyn FnMut(&'static str, &dyn Field));

    /// Visits every field in declaration order with mutable access.
    fn for_each_field_mut(&mut self, visit: &mut dyn FnMut(&'static str, &mut dyn Field));
}

/// Declares a struct and implements [`Record`] for it.
///
/// Every field type must implement [`Field`]. Attributes on the struct and
/// on individual fields are passed through unchanged.
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $(#[$fmeta:meta])* $fvis:vis $field:ident : $ty:ty ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $( $(#[$fmeta])* $fvis $field: $ty, )*
        }

        impl $crate::Record for $name {
            #[allow(unused_variables)]
            fn for_each_field(
                &self,
                visit: &mut dyn FnMut(&'static str, &dyn $crate::Field),
            ) {
                $( visit(stringify!($field), &self.$field); )*
            }

            #[allow(unused_variables)]
            fn for_each_field_mut(
                &mut self,
                visit: &mut dyn FnMut(&'static str, &mut dyn $crate::Field),
            ) {
                $( visit(stringify!($field), &mut self.$field); )*
            }
        }
    };
}
