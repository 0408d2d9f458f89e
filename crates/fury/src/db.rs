//! Statement executor.
//!
//! [`Db`] drives a [`Query`] against a [`ConnectionPool`]: one statement per
//! record for writes, one SELECT with row-by-row materialization for reads.
//! Records are processed strictly in order and the first failure aborts the
//! rest of the batch; nothing is retried or rolled back here.

use crate::client::{ConnectionPool, RowSet};
use crate::error::{OrmError, OrmResult};
use crate::query::{Query, QueryOption, Statement};
use crate::record::{IntoTarget, Record};
use crate::value::FromValue;

/// Record-level CRUD on top of a connection pool.
///
/// # Example
///
/// ```ignore
/// use fury::{Db, Record, filter, is_greater_than, limit};
///
/// #[derive(Debug, Default, Record)]
/// struct User {
///     #[orm(flags = "primary_key")]
///     user_id: i32,
///     counter: i32,
/// }
///
/// let db = Db::new(pool);
/// let mut users: Vec<User> = Vec::new();
/// db.find(&mut users, [filter(is_greater_than("user.counter", 1)), limit(10)]).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Db<P> {
    pool: P,
}

impl<P: ConnectionPool> Db<P> {
    pub fn new(pool: P) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &P {
        &self.pool
    }

    pub fn into_inner(self) -> P {
        self.pool
    }

    /// Insert every record of `target`; returns the total affected rows.
    pub async fn insert<'a, T>(
        &self,
        target: T,
        options: impl IntoIterator<Item = QueryOption>,
    ) -> OrmResult<u64>
    where
        T: IntoTarget<'a>,
        T::Record: 'a,
    {
        let mut query = Query::new(target)?.apply(options)?;
        let mut affected = 0;
        while let Some(index) = query.models_mut().advance() {
            let stmt = query.build_insert(index)?;
            affected += self.execute(&stmt).await?;
        }
        Ok(affected)
    }

    /// Update every record of `target`, keyed by its non-zero primary keys.
    pub async fn update<'a, T>(
        &self,
        target: T,
        options: impl IntoIterator<Item = QueryOption>,
    ) -> OrmResult<u64>
    where
        T: IntoTarget<'a>,
        T::Record: 'a,
    {
        let mut query = Query::new(target)?.apply(options)?;
        let mut affected = 0;
        while let Some(index) = query.models_mut().advance() {
            let stmt = query.build_update(index)?;
            affected += self.execute(&stmt).await?;
        }
        Ok(affected)
    }

    /// Delete every record of `target`.
    ///
    /// A record with no usable condition fails with `UnfilteredDelete`
    /// before anything is sent for it.
    pub async fn delete<'a, T>(
        &self,
        target: T,
        options: impl IntoIterator<Item = QueryOption>,
    ) -> OrmResult<u64>
    where
        T: IntoTarget<'a>,
        T::Record: 'a,
    {
        let mut query = Query::new(target)?.apply(options)?;
        let mut affected = 0;
        while let Some(index) = query.models_mut().advance() {
            let stmt = query.build_delete(index)?;
            affected += self.execute(&stmt).await?;
        }
        Ok(affected)
    }

    /// Run one SELECT and write the rows into `target`.
    ///
    /// A list destination is overwritten from the front, grown as needed and
    /// truncated to the rows returned; a single record receives the first row
    /// only. Returns the number of rows written.
    ///
    /// If a row fails to decode, rows written before it stay in place and any
    /// element grown for the failing row is removed again.
    pub async fn find<'a, T>(
        &self,
        target: T,
        options: impl IntoIterator<Item = QueryOption>,
    ) -> OrmResult<usize>
    where
        T: IntoTarget<'a>,
        T::Record: 'a,
    {
        let query = Query::new(target)?.apply(options)?;
        self.load(query).await
    }

    /// Load the first matching row into `record`, ordered by primary key
    /// unless an explicit order was given.
    ///
    /// Fails with `NotFound` when nothing matches.
    pub async fn first<R: Record>(
        &self,
        record: &mut R,
        options: impl IntoIterator<Item = QueryOption>,
    ) -> OrmResult<()> {
        let query = Query::new(record)?.apply(options)?;
        let table = query.table_name()?.to_string();

        let mut clauses = query.clauses().clone();
        if clauses.orders().is_empty() {
            let keys: Vec<String> = query
                .models()
                .primary()
                .primary_keys()
                .map(|field| format!("{table}.{}", field.name()))
                .collect();
            clauses = clauses.order_by(keys);
        }
        let query = query.with_clauses(clauses.limit(1)?);

        match self.load(query).await? {
            0 => Err(OrmError::not_found(format!("no row in '{table}'"))),
            _ => Ok(()),
        }
    }

    /// Number of `R` rows matching `options`.
    pub async fn count<R: Record>(
        &self,
        options: impl IntoIterator<Item = QueryOption>,
    ) -> OrmResult<i64> {
        let mut template: Vec<R> = Vec::new();
        let query = Query::new(&mut template)?.apply(options)?;
        let stmt = query.build_count()?;

        log_statement(&stmt);
        let row = self
            .pool
            .query_row(&stmt.sql, &stmt.args)
            .await?
            .ok_or_else(|| OrmError::not_found("COUNT returned no row"))?;
        let value = row
            .into_iter()
            .next()
            .ok_or_else(|| OrmError::decode("count", "empty row"))?;
        i64::from_value(value).map_err(|e| OrmError::decode("count", e.to_string()))
    }

    pub async fn ping(&self) -> OrmResult<()> {
        self.pool.ping().await
    }

    pub async fn close(&self) -> OrmResult<()> {
        self.pool.close().await
    }

    async fn load<R: Record>(&self, mut query: Query<'_, R>) -> OrmResult<usize> {
        let stmt = query.build_select()?;
        log_statement(&stmt);
        let RowSet { columns, rows } = self.pool.query(&stmt.sql, &stmt.args).await?;

        let models = query.models_mut();
        models.reset();
        let existing = models.len();
        let mut written = 0;
        for row in rows {
            let Some(index) = models.advance_or_grow()? else {
                break;
            };
            if let Err(err) = models.materialize(index, &columns, row) {
                models.truncate(existing.max(written));
                return Err(err);
            }
            written += 1;
        }
        models.truncate(written);
        Ok(written)
    }

    async fn execute(&self, stmt: &Statement) -> OrmResult<u64> {
        log_statement(stmt);
        self.pool.execute(&stmt.sql, &stmt.args).await
    }
}

fn log_statement(stmt: &Statement) {
    tracing::debug!(
        target: "fury.sql",
        query_type = ?stmt.kind,
        param_count = stmt.args.len(),
        sql = %stmt.sql,
    );
}
