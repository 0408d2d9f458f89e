use crate::error::OrmResult;
use crate::record::{FieldMeta, Record};
use crate::value::Value;

/// Role flags of one record attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldFlags {
    pub primary_key: bool,
    pub auto_increment: bool,
    pub ignored: bool,
}

impl FieldFlags {
    /// Parse a comma-separated flag string such as `"primary_key,auto_increment"`.
    ///
    /// Matching is case-insensitive; unknown flags are ignored.
    pub fn parse(flags: &str) -> Self {
        let mut parsed = Self::default();
        for flag in flags.split(',').map(str::trim) {
            if flag.eq_ignore_ascii_case("primary_key") {
                parsed.primary_key = true;
            } else if flag.eq_ignore_ascii_case("auto_increment") {
                parsed.auto_increment = true;
            }
        }
        parsed
    }
}

/// Metadata plus binding for one attribute of an introspected record.
///
/// The binding is the attribute's position in [`Record::fields`]; reads and
/// writes go through the record the owning descriptor points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: String,
    index: usize,
    flags: FieldFlags,
}

impl FieldDescriptor {
    /// Build a descriptor from declared metadata. Flags are fixed from here on.
    pub fn describe(meta: &FieldMeta, index: usize) -> Self {
        let mut flags = FieldFlags::parse(meta.flags);
        flags.ignored = meta.ignored;
        Self {
            name: meta.name.to_lowercase(),
            index,
            flags,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn flags(&self) -> FieldFlags {
        self.flags
    }

    pub fn is_primary_key(&self) -> bool {
        self.flags.primary_key
    }

    pub fn is_auto_increment(&self) -> bool {
        self.flags.auto_increment
    }

    pub fn is_ignored(&self) -> bool {
        self.flags.ignored
    }

    /// Whether the bound value equals its type's default.
    pub fn is_zero<R: Record>(&self, record: &R) -> bool {
        record.is_zero(self.index)
    }

    pub fn value<R: Record>(&self, record: &R) -> Value {
        record.value(self.index)
    }

    pub fn set<R: Record>(&self, record: &mut R, value: Value) -> OrmResult<()> {
        record.set_value(self.index, value)
    }
}
