//! Query builder and SQL synthesis.
//!
//! A [`Query`] pairs the record-independent [`Clauses`] with the [`Models`]
//! introspected from the caller's destination. Statements are synthesized per
//! model for writes and once per query for reads; every builder returns a
//! fresh [`Statement`] with `?` placeholders already rewritten to `$k`.
//!
//! # Example
//! ```ignore
//! use fury::query::{Query, filter, limit};
//! use fury::is_greater_than;
//!
//! let mut users: Vec<User> = Vec::new();
//! let query = Query::new(&mut users)?
//!     .apply([filter(is_greater_than("user.counter", 1)), limit(10)])?;
//! let stmt = query.build_select()?;
//! assert_eq!(stmt.sql, "SELECT user.* FROM user WHERE user.counter > $1 LIMIT 10;");
//! ```

mod clauses;
mod placeholder;
mod synth;

pub use clauses::{
    Clauses, QueryOption, filter, group_by, limit, offset, order_by, select, table,
};
pub use placeholder::rewrite_placeholders;

use crate::error::{OrmError, OrmResult};
use crate::expr::{Condition, LogicalExpression, LogicalOp};
use crate::model::{ModelDescriptor, Models};
use crate::record::{IntoTarget, Record};
use crate::value::Value;

/// Type of SQL statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

/// Synthesized SQL with positional placeholders and its ordered arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    pub sql: String,
    pub args: Vec<Value>,
}

impl Statement {
    /// Rewrite `?` placeholders in `sql` and pair it with `args`.
    pub fn new(kind: StatementKind, sql: impl AsRef<str>, args: Vec<Value>) -> OrmResult<Self> {
        let sql = rewrite_placeholders(sql.as_ref(), args.len())?;
        Ok(Self { kind, sql, args })
    }
}

impl std::fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.sql)
    }
}

/// One logical operation: clauses plus the destination's models.
#[derive(Debug)]
pub struct Query<'a, R: Record> {
    clauses: Clauses,
    models: Models<'a, R>,
}

impl<'a, R: Record> Query<'a, R> {
    /// Introspect `target` and start with empty clauses.
    pub fn new<T>(target: T) -> OrmResult<Self>
    where
        T: IntoTarget<'a, Record = R>,
    {
        Ok(Self {
            clauses: Clauses::default(),
            models: Models::new(target.into_target())?,
        })
    }

    /// Replace the clauses wholesale.
    pub fn with_clauses(mut self, clauses: Clauses) -> Self {
        self.clauses = clauses;
        self
    }

    /// Apply options in order, stopping at the first failure.
    pub fn apply<I>(mut self, options: I) -> OrmResult<Self>
    where
        I: IntoIterator<Item = QueryOption>,
    {
        self.clauses = self.clauses.apply(options)?;
        Ok(self)
    }

    pub fn clauses(&self) -> &Clauses {
        &self.clauses
    }

    pub fn models(&self) -> &Models<'a, R> {
        &self.models
    }

    pub fn models_mut(&mut self) -> &mut Models<'a, R> {
        &mut self.models
    }

    /// Explicit table if set, otherwise the primary model's name.
    pub fn table_name(&self) -> OrmResult<&str> {
        self.clauses
            .table_name()
            .or_else(|| Some(self.models.primary().name()).filter(|name| !name.is_empty()))
            .ok_or(OrmError::UnspecifiedTable)
    }

    fn model(&self, index: usize) -> OrmResult<(&ModelDescriptor, &R)> {
        let model = self
            .models
            .get(index)
            .ok_or_else(|| OrmError::mismatch(format!("no model at index {index}")))?;
        let record = self
            .models
            .record(model)
            .ok_or_else(|| OrmError::mismatch(format!("model at index {index} has no record")))?;
        Ok((model, record))
    }

    /// OR over every model's primary-key conjunction.
    fn models_condition(&self) -> Option<Condition> {
        if !self.clauses.uses_model_conditions() {
            return None;
        }
        let groups = self.models.descriptors().iter().filter_map(|model| {
            self.models
                .record(model)
                .map(|record| model.primary_key_condition(record))
        });
        let condition = LogicalExpression::new(LogicalOp::Or, groups);
        (!condition.is_empty()).then(|| condition.into())
    }

    /// Primary-key conjunction of one model.
    fn model_condition(&self, model: &ModelDescriptor, record: &R) -> Option<Condition> {
        self.clauses
            .uses_model_conditions()
            .then(|| model.primary_key_condition(record).into())
    }

    /// `SELECT` for the whole destination.
    pub fn build_select(&self) -> OrmResult<Statement> {
        synth::select(
            &self.clauses,
            self.table_name()?,
            self.models_condition().as_ref(),
        )
    }

    /// `SELECT COUNT(*)` honoring the same conditions as [`build_select`](Self::build_select).
    pub fn build_count(&self) -> OrmResult<Statement> {
        synth::count(
            &self.clauses,
            self.table_name()?,
            self.models_condition().as_ref(),
        )
    }

    /// `INSERT` for the model at `index`.
    pub fn build_insert(&self, index: usize) -> OrmResult<Statement> {
        let (model, record) = self.model(index)?;
        let (columns, values) = model.column_values(record, false);
        synth::insert(self.table_name()?, model.name(), &columns, values)
    }

    /// `UPDATE` for the model at `index`.
    pub fn build_update(&self, index: usize) -> OrmResult<Statement> {
        let (model, record) = self.model(index)?;
        let (columns, values) = model.column_values(record, true);
        let derived = self.model_condition(model, record);
        synth::update(
            &self.clauses,
            self.table_name()?,
            model.name(),
            &columns,
            values,
            derived.as_ref(),
        )
    }

    /// `DELETE` for the model at `index`.
    pub fn build_delete(&self, index: usize) -> OrmResult<Statement> {
        let (model, record) = self.model(index)?;
        let derived = self.model_condition(model, record);
        synth::delete(&self.clauses, self.table_name()?, derived.as_ref())
    }
}
