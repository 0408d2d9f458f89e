//! Convenient imports for typical `fury` usage.
//!
//! ```ignore
//! use fury::prelude::*;
//! ```

pub use crate::{
    Condition, ConnectionPool, Db, Expression, LogicalExpression, OrmError, OrmResult, Query,
    QueryOption, Record, Value, and, filter, group_by, is_equals_to, is_greater_than,
    is_greater_than_or_equals_to, is_less_than, is_less_than_or_equals_to, is_not_equals_to,
    limit, offset, or, order_by, select, table,
};

#[cfg(feature = "pool")]
pub use crate::{connect, create_pool};
