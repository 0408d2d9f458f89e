//! Connection pool abstraction consumed by the executor.
//!
//! The executor only ever hands over fully rendered SQL with `$k`
//! placeholders and the matching ordered [`Value`] arguments; everything
//! else about connections belongs to the implementor.

use crate::error::OrmResult;
use crate::value::Value;
use std::future::Future;
use tokio_postgres::types::ToSql;

/// Rows returned by [`ConnectionPool::query`], already decoded into [`Value`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
    /// Result column names in server order.
    pub columns: Vec<String>,
    /// One entry per row, parallel to `columns`.
    pub rows: Vec<Vec<Value>>,
}

impl RowSet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Anything that can run statements: a single client, a pool, or a test double.
pub trait ConnectionPool: Send + Sync {
    /// Execute a statement and return the number of affected rows.
    fn execute(&self, sql: &str, args: &[Value]) -> impl Future<Output = OrmResult<u64>> + Send;

    /// Execute a query and return every row.
    fn query(&self, sql: &str, args: &[Value]) -> impl Future<Output = OrmResult<RowSet>> + Send;

    /// Execute a query and return the first row, if any.
    ///
    /// The default implementation calls [`ConnectionPool::query`] and drops
    /// the remaining rows.
    fn query_row(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl Future<Output = OrmResult<Option<Vec<Value>>>> + Send {
        async move {
            let set = self.query(sql, args).await?;
            Ok(set.rows.into_iter().next())
        }
    }

    /// Check that the database is reachable.
    fn ping(&self) -> impl Future<Output = OrmResult<()>> + Send;

    /// Release the underlying connections.
    fn close(&self) -> impl Future<Output = OrmResult<()>> + Send;
}

fn params(args: &[Value]) -> Vec<&(dyn ToSql + Sync)> {
    args.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
}

impl ConnectionPool for tokio_postgres::Client {
    async fn execute(&self, sql: &str, args: &[Value]) -> OrmResult<u64> {
        let params = params(args);
        Ok(tokio_postgres::Client::execute(self, sql, &params).await?)
    }

    async fn query(&self, sql: &str, args: &[Value]) -> OrmResult<RowSet> {
        let params = params(args);
        // Prepared first so column names are known even for empty results.
        let statement = self.prepare(sql).await?;
        let columns = statement
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        let rows = tokio_postgres::Client::query(self, &statement, &params)
            .await?
            .iter()
            .map(Value::decode_row)
            .collect::<OrmResult<Vec<_>>>()?;
        Ok(RowSet::new(columns, rows))
    }

    async fn ping(&self) -> OrmResult<()> {
        self.simple_query("SELECT 1").await?;
        Ok(())
    }

    async fn close(&self) -> OrmResult<()> {
        // The connection task ends once the client is dropped.
        Ok(())
    }
}

// ===== deadpool-postgres support =====

#[cfg(feature = "pool")]
impl ConnectionPool for deadpool_postgres::Pool {
    async fn execute(&self, sql: &str, args: &[Value]) -> OrmResult<u64> {
        let client = self.get().await?;
        let client: &tokio_postgres::Client = &client;
        ConnectionPool::execute(client, sql, args).await
    }

    async fn query(&self, sql: &str, args: &[Value]) -> OrmResult<RowSet> {
        let client = self.get().await?;
        let client: &tokio_postgres::Client = &client;
        ConnectionPool::query(client, sql, args).await
    }

    async fn ping(&self) -> OrmResult<()> {
        let client = self.get().await?;
        let client: &tokio_postgres::Client = &client;
        ConnectionPool::ping(client).await
    }

    async fn close(&self) -> OrmResult<()> {
        deadpool_postgres::Pool::close(self);
        Ok(())
    }
}

impl<P: ConnectionPool> ConnectionPool for &P {
    async fn execute(&self, sql: &str, args: &[Value]) -> OrmResult<u64> {
        (**self).execute(sql, args).await
    }

    async fn query(&self, sql: &str, args: &[Value]) -> OrmResult<RowSet> {
        (**self).query(sql, args).await
    }

    async fn query_row(&self, sql: &str, args: &[Value]) -> OrmResult<Option<Vec<Value>>> {
        (**self).query_row(sql, args).await
    }

    async fn ping(&self) -> OrmResult<()> {
        (**self).ping().await
    }

    async fn close(&self) -> OrmResult<()> {
        (**self).close().await
    }
}
