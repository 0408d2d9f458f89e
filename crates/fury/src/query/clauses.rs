use super::synth;
use super::Statement;
use crate::error::{OrmError, OrmResult};
use crate::expr::Condition;

/// Accumulated, record-independent parts of a statement.
///
/// Immutable builder: every method consumes `self` and returns the updated
/// value, so a partially built set of clauses can be cloned and reused.
#[derive(Debug, Clone, PartialEq)]
pub struct Clauses {
    table: Option<String>,
    columns: Vec<String>,
    filters: Vec<Condition>,
    limit: Option<i64>,
    offset: Option<i64>,
    groups: Vec<String>,
    orders: Vec<String>,
    model_conditions: bool,
}

impl Default for Clauses {
    fn default() -> Self {
        Self {
            table: None,
            columns: Vec::new(),
            filters: Vec::new(),
            limit: None,
            offset: None,
            groups: Vec::new(),
            orders: Vec::new(),
            model_conditions: true,
        }
    }
}

impl Clauses {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the table explicitly.
    ///
    /// Also switches off the conditions derived from record primary keys.
    pub fn table(mut self, name: impl Into<String>) -> Self {
        self.table = Some(name.into());
        self.model_conditions = false;
        self
    }

    /// Add a WHERE condition. Conditions are joined with `AND`.
    pub fn filter(mut self, condition: impl Into<Condition>) -> OrmResult<Self> {
        let condition = condition.into();
        if let Condition::Raw(sql) = &condition {
            if sql.trim().is_empty() {
                return Err(OrmError::UnsupportedCondition(format!("{sql:?}")));
            }
        }
        self.filters.push(condition);
        Ok(self)
    }

    /// Add projected columns. Defaults to `<table>.*` when none are given.
    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    /// `0` clears the limit.
    pub fn limit(mut self, limit: i64) -> OrmResult<Self> {
        self.limit = non_negative("LIMIT", limit)?;
        Ok(self)
    }

    /// `0` clears the offset.
    pub fn offset(mut self, offset: i64) -> OrmResult<Self> {
        self.offset = non_negative("OFFSET", offset)?;
        Ok(self)
    }

    pub fn group_by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups.extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn order_by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.orders.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Apply options in order, stopping at the first failure.
    pub fn apply<I>(self, options: I) -> OrmResult<Self>
    where
        I: IntoIterator<Item = QueryOption>,
    {
        options
            .into_iter()
            .try_fold(self, |clauses, option| option.apply(clauses))
    }

    /// Explicit, non-empty table name.
    pub fn table_name(&self) -> Option<&str> {
        self.table.as_deref().filter(|name| !name.is_empty())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn filters(&self) -> &[Condition] {
        &self.filters
    }

    pub fn limit_value(&self) -> Option<i64> {
        self.limit
    }

    pub fn offset_value(&self) -> Option<i64> {
        self.offset
    }

    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    pub fn orders(&self) -> &[String] {
        &self.orders
    }

    /// Whether record primary keys are turned into WHERE conditions.
    pub fn uses_model_conditions(&self) -> bool {
        self.model_conditions
    }

    /// Build a SELECT against the explicit table only.
    ///
    /// Fails with `UnspecifiedTable` unless [`table`](Self::table) was set.
    pub fn to_select(&self) -> OrmResult<Statement> {
        let table = self.table_name().ok_or(OrmError::UnspecifiedTable)?;
        synth::select(self, table, None)
    }
}

fn non_negative(clause: &'static str, value: i64) -> OrmResult<Option<i64>> {
    match value {
        v if v < 0 => Err(OrmError::NegativeLimitOrOffset { clause, value }),
        0 => Ok(None),
        v => Ok(Some(v)),
    }
}

/// A deferred change to [`Clauses`], applied in call order.
pub struct QueryOption(Box<dyn FnOnce(Clauses) -> OrmResult<Clauses> + Send>);

impl QueryOption {
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce(Clauses) -> OrmResult<Clauses> + Send + 'static,
    {
        Self(Box::new(f))
    }

    pub fn apply(self, clauses: Clauses) -> OrmResult<Clauses> {
        (self.0)(clauses)
    }
}

impl std::fmt::Debug for QueryOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("QueryOption")
    }
}

/// Query against `name` instead of the record's type name.
pub fn table(name: impl Into<String>) -> QueryOption {
    let name = name.into();
    QueryOption::new(move |clauses| Ok(clauses.table(name)))
}

/// Add a WHERE condition: an expression, a logical group or a raw fragment.
pub fn filter(condition: impl Into<Condition>) -> QueryOption {
    let condition = condition.into();
    QueryOption::new(move |clauses| clauses.filter(condition))
}

pub fn select<I, S>(columns: I) -> QueryOption
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
    QueryOption::new(move |clauses| Ok(clauses.select(columns)))
}

pub fn limit(limit: i64) -> QueryOption {
    QueryOption::new(move |clauses| clauses.limit(limit))
}

pub fn offset(offset: i64) -> QueryOption {
    QueryOption::new(move |clauses| clauses.offset(offset))
}

pub fn group_by<I, S>(columns: I) -> QueryOption
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
    QueryOption::new(move |clauses| Ok(clauses.group_by(columns)))
}

pub fn order_by<I, S>(columns: I) -> QueryOption
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
    QueryOption::new(move |clauses| Ok(clauses.order_by(columns)))
}
