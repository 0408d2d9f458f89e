//! # fury
//!
//! A record-first PostgreSQL query builder and ORM core.
//!
//! ## Features
//!
//! - **Records, not strings**: `#[derive(Record)]` emits a static field table,
//!   so table and column names come from your types
//! - **Composable conditions**: comparisons and `AND`/`OR` groups render to
//!   parameterized SQL with ordered arguments
//! - **Primary keys as filters**: non-zero primary keys become `WHERE`
//!   conditions for `SELECT`, `UPDATE` and `DELETE`
//! - **Safe defaults**: a `DELETE` without any condition is refused
//! - **Growable destinations**: `find` fills a `Vec<R>` row by row
//!
//! ## Example
//!
//! ```ignore
//! use fury::prelude::*;
//!
//! #[derive(Debug, Default, Record)]
//! struct User {
//!     #[orm(flags = "primary_key,auto_increment")]
//!     user_id: i64,
//!     counter: i32,
//! }
//!
//! let db = Db::new(fury::pool::connect(&config).await?);
//!
//! // INSERT INTO user(counter) VALUES($1);
//! db.insert(&mut User { user_id: 0, counter: 1 }, []).await?;
//!
//! // SELECT user.* FROM user WHERE user.counter > $1 ORDER BY user.counter DESC LIMIT 10;
//! let mut users: Vec<User> = Vec::new();
//! db.find(
//!     &mut users,
//!     [
//!         filter(is_greater_than("user.counter", 0)),
//!         order_by(["user.counter DESC"]),
//!         limit(10),
//!     ],
//! )
//! .await?;
//!
//! // DELETE FROM user WHERE user.user_id = $1;
//! db.delete(&mut users[0], []).await?;
//! ```

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod expr;
pub mod model;
pub mod prelude;
pub mod query;
pub mod record;
pub mod value;

pub use client::{ConnectionPool, RowSet};
pub use config::Config;
pub use db::Db;
pub use error::{OrmError, OrmResult};
pub use expr::{
    CompareOp, Condition, Expression, IntoOperand, LogicalExpression, LogicalOp, and,
    is_equals_to, is_greater_than, is_greater_than_or_equals_to, is_less_than,
    is_less_than_or_equals_to, is_not_equals_to, or,
};
pub use model::{FieldDescriptor, FieldFlags, ModelDescriptor, Models};
pub use query::{
    Clauses, Query, QueryOption, Statement, StatementKind, filter, group_by, limit, offset,
    order_by, select, table,
};
pub use record::{FieldMeta, IntoTarget, Record, Target};
pub use value::{FromValue, Value, ValueError};

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{connect, create_pool, create_pool_with_tls};

#[cfg(feature = "derive")]
pub use fury_derive::Record;

#[cfg(test)]
mod test_records;
