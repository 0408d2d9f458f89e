//! Record introspection.
//!
//! Turns a [`Target`](crate::record::Target) into one [`ModelDescriptor`] per
//! record, each carrying lowercased field names, role flags and bindings back
//! into the caller's memory. [`Models`] owns the destination for the length of
//! one operation and walks it with an index cursor.

mod cursor;
mod descriptor;
mod field;

pub use cursor::Models;
pub use descriptor::{ModelDescriptor, Slot, introspect};
pub use field::{FieldDescriptor, FieldFlags};
