use super::field::FieldDescriptor;
use crate::error::{OrmError, OrmResult};
use crate::expr::{LogicalExpression, LogicalOp, is_equals_to};
use crate::record::{Record, Target};
use crate::value::Value;
use std::collections::HashMap;

/// Where a descriptor's record lives inside the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// The single record of a [`Target::One`].
    One,
    /// Element `i` of a [`Target::Many`].
    Element(usize),
    /// A zero-value record standing in for an empty list.
    Template,
}

/// Metadata and bindings for one introspected record instance.
#[derive(Debug, Clone)]
pub struct ModelDescriptor {
    name: &'static str,
    fields: Vec<FieldDescriptor>,
    by_name: HashMap<String, usize>,
    primary_keys: Vec<usize>,
    origin: &'static str,
    slot: Slot,
}

impl ModelDescriptor {
    /// Describe a record of type `R` living at `slot`.
    pub fn new<R: Record>(slot: Slot) -> OrmResult<Self> {
        let origin = std::any::type_name::<R>();
        let declared = R::fields();
        if declared.is_empty() {
            return Err(OrmError::InvalidShape(format!(
                "record type '{origin}' declares no fields"
            )));
        }

        let mut fields = Vec::with_capacity(declared.len());
        let mut by_name = HashMap::with_capacity(declared.len());
        let mut primary_keys = Vec::new();

        for (index, meta) in declared.iter().enumerate() {
            let field = FieldDescriptor::describe(meta, index);
            if by_name.contains_key(field.name()) {
                continue;
            }
            by_name.insert(field.name().to_string(), fields.len());
            if field.is_primary_key() {
                primary_keys.push(fields.len());
            }
            fields.push(field);
        }

        Ok(Self {
            name: R::NAME,
            fields,
            by_name,
            primary_keys,
            origin,
            slot,
        })
    }

    /// Lowercased type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Rust type the descriptor was derived from.
    pub fn origin(&self) -> &'static str {
        self.origin
    }

    pub fn slot(&self) -> Slot {
        self.slot
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Look up a field by name, case-insensitively.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.by_name
            .get(&name.to_lowercase())
            .map(|&pos| &self.fields[pos])
    }

    /// Primary-key fields in declaration order.
    pub fn primary_keys(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.primary_keys.iter().map(|&pos| &self.fields[pos])
    }

    /// Column names and values to write for `record`.
    ///
    /// Skips ignored fields and zero-valued primary keys; auto-increment
    /// fields are skipped unless `include_auto_increment` is set.
    pub fn column_values<R: Record>(
        &self,
        record: &R,
        include_auto_increment: bool,
    ) -> (Vec<&str>, Vec<Value>) {
        let mut columns = Vec::new();
        let mut values = Vec::new();

        for field in &self.fields {
            if field.is_ignored()
                || (field.is_primary_key() && field.is_zero(record))
                || (field.is_auto_increment() && !include_auto_increment)
            {
                continue;
            }
            columns.push(field.name());
            values.push(field.value(record));
        }

        (columns, values)
    }

    /// `<model>.<pk> = ?` for every non-zero primary key, joined with AND.
    ///
    /// Renders to nothing when every primary key is zero-valued.
    pub fn primary_key_condition<R: Record>(&self, record: &R) -> LogicalExpression {
        let equalities = self
            .primary_keys()
            .filter(|field| !field.is_zero(record))
            .map(|field| {
                is_equals_to(format!("{}.{}", self.name, field.name()), field.value(record))
            });
        LogicalExpression::new(LogicalOp::And, equalities)
    }

    /// Map result column names onto fields.
    ///
    /// Returns `(column position, field)` pairs in column order. Unmapped and
    /// ignored columns are left out.
    pub fn bindings<S: AsRef<str>>(&self, columns: &[S]) -> Vec<(usize, &FieldDescriptor)> {
        columns
            .iter()
            .enumerate()
            .filter_map(|(pos, column)| {
                self.field(column.as_ref())
                    .filter(|field| !field.is_ignored())
                    .map(|field| (pos, field))
            })
            .collect()
    }
}

/// Build descriptors for every record in `target`.
///
/// Returns the descriptor list plus the primary descriptor: the first element
/// for a non-empty list, or a synthetic zero-value descriptor when the list is
/// empty (the list itself then stays empty).
pub fn introspect<R: Record>(
    target: &Target<'_, R>,
) -> OrmResult<(Vec<ModelDescriptor>, ModelDescriptor)> {
    match target {
        Target::One(_) => {
            let model = ModelDescriptor::new::<R>(Slot::One)?;
            Ok((vec![model.clone()], model))
        }
        Target::Many(records) if records.is_empty() => {
            let model = ModelDescriptor::new::<R>(Slot::Template)?;
            Ok((Vec::new(), model))
        }
        Target::Many(records) => {
            let models = (0..records.len())
                .map(|i| ModelDescriptor::new::<R>(Slot::Element(i)))
                .collect::<OrmResult<Vec<_>>>()?;
            let primary = models[0].clone();
            Ok((models, primary))
        }
    }
}
