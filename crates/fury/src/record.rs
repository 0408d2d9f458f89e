//! Record trait and destination shapes.
//!
//! A record is an application struct that maps to one table row. The
//! `#[derive(Record)]` macro emits a static field table plus typed accessors,
//! so introspection never needs runtime reflection.

use crate::error::OrmResult;
use crate::value::Value;

/// Static, per-attribute metadata emitted by `#[derive(Record)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMeta {
    /// Lowercased attribute name; doubles as the column name.
    pub name: &'static str,
    /// Raw comma-separated flag string from `#[orm(flags = "...")]`.
    pub flags: &'static str,
    /// Set by `#[orm(ignore)]`.
    pub ignored: bool,
}

impl FieldMeta {
    pub const fn new(name: &'static str, flags: &'static str, ignored: bool) -> Self {
        Self {
            name,
            flags,
            ignored,
        }
    }
}

/// A struct that maps to a table row.
///
/// This trait should typically be derived using `#[derive(Record)]`.
///
/// # Example
///
/// ```ignore
/// use fury::Record;
///
/// #[derive(Debug, Default, Record)]
/// struct Account {
///     #[orm(flags = "primary_key,auto_increment")]
///     user_id: i32,
///     name: String,
///     #[orm(ignore)]
///     session: Option<String>,
/// }
/// ```
///
/// Field indices below refer to positions in [`Record::fields`].
pub trait Record: Default + Send + Sync {
    /// Lowercased type name, used as the table name.
    const NAME: &'static str;

    /// Declared attributes in declaration order.
    fn fields() -> &'static [FieldMeta];

    /// Read the field at `index`.
    fn value(&self, index: usize) -> Value;

    /// Whether the field at `index` equals its type's default.
    fn is_zero(&self, index: usize) -> bool;

    /// Write `value` into the field at `index`.
    fn set_value(&mut self, index: usize, value: Value) -> OrmResult<()>;
}

/// The caller-owned memory a query reads from and writes into.
#[derive(Debug)]
pub enum Target<'a, R> {
    /// A single record.
    One(&'a mut R),
    /// A growable list of records.
    Many(&'a mut Vec<R>),
}

impl<R> Target<'_, R> {
    pub fn is_many(&self) -> bool {
        matches!(self, Target::Many(_))
    }
}

/// Conversion into a [`Target`], implemented for `&mut R` and `&mut Vec<R>`.
pub trait IntoTarget<'a> {
    type Record: Record;

    fn into_target(self) -> Target<'a, Self::Record>;
}

impl<'a, R: Record> IntoTarget<'a> for &'a mut R {
    type Record = R;

    fn into_target(self) -> Target<'a, R> {
        Target::One(self)
    }
}

impl<'a, R: Record> IntoTarget<'a> for &'a mut Vec<R> {
    type Record = R;

    fn into_target(self) -> Target<'a, R> {
        Target::Many(self)
    }
}

impl<'a, R: Record> IntoTarget<'a> for Target<'a, R> {
    type Record = R;

    fn into_target(self) -> Target<'a, R> {
        self
    }
}
