//! SQL text synthesis.
//!
//! Builders here are pure: they read the clauses and descriptors they are
//! given and return a fresh [`Statement`], so the same state can be rendered
//! any number of times.

use super::clauses::Clauses;
use super::{Statement, StatementKind};
use crate::error::{OrmError, OrmResult};
use crate::expr::Condition;
use crate::value::Value;

/// Render user filters plus an optional derived condition, joined with `AND`.
///
/// Filters that render to nothing are skipped. Raw fragments are
/// parenthesized when anything else contributes, so a top-level `OR` inside
/// one cannot widen the derived key condition. Returns an empty fragment
/// when no filter contributed.
fn where_clause(
    filters: &[Condition],
    derived: Option<&Condition>,
) -> OrmResult<(String, Vec<Value>)> {
    let mut parts = Vec::with_capacity(filters.len() + 1);
    let mut args = Vec::new();

    for condition in filters.iter().chain(derived) {
        let (sql, condition_args) = condition.render()?;
        if sql.is_empty() {
            continue;
        }
        parts.push((sql, matches!(condition, Condition::Raw(_))));
        args.extend(condition_args);
    }

    let grouped = parts.len() > 1;
    let parts: Vec<String> = parts
        .into_iter()
        .map(|(sql, raw)| {
            if raw && grouped {
                format!("({sql})")
            } else {
                sql
            }
        })
        .collect();
    Ok((parts.join(" AND "), args))
}

fn push_where(sql: &mut String, fragment: &str) {
    if !fragment.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(fragment);
    }
}

fn push_list(sql: &mut String, keyword: &str, items: &[String]) {
    if !items.is_empty() {
        sql.push(' ');
        sql.push_str(keyword);
        sql.push(' ');
        sql.push_str(&items.join(", "));
    }
}

fn push_number(sql: &mut String, keyword: &str, value: Option<i64>) {
    if let Some(n) = value {
        sql.push_str(&format!(" {keyword} {n}"));
    }
}

fn push_tail(sql: &mut String, clauses: &Clauses) {
    push_list(sql, "GROUP BY", clauses.groups());
    push_list(sql, "ORDER BY", clauses.orders());
    push_number(sql, "LIMIT", clauses.limit_value());
    push_number(sql, "OFFSET", clauses.offset_value());
}

/// `SELECT <cols> FROM <table> [WHERE] [GROUP BY] [ORDER BY] [LIMIT] [OFFSET];`
pub(crate) fn select(
    clauses: &Clauses,
    table: &str,
    derived: Option<&Condition>,
) -> OrmResult<Statement> {
    let projection = if clauses.columns().is_empty() {
        format!("{table}.*")
    } else {
        clauses.columns().join(", ")
    };

    let (fragment, args) = where_clause(clauses.filters(), derived)?;
    let mut sql = format!("SELECT {projection} FROM {table}");
    push_where(&mut sql, &fragment);
    push_tail(&mut sql, clauses);
    sql.push(';');

    Statement::new(StatementKind::Select, sql, args)
}

/// `SELECT COUNT(*) FROM <table> [WHERE] [GROUP BY];`
pub(crate) fn count(
    clauses: &Clauses,
    table: &str,
    derived: Option<&Condition>,
) -> OrmResult<Statement> {
    let (fragment, args) = where_clause(clauses.filters(), derived)?;
    let mut sql = format!("SELECT COUNT(*) FROM {table}");
    push_where(&mut sql, &fragment);
    push_list(&mut sql, "GROUP BY", clauses.groups());
    sql.push(';');

    Statement::new(StatementKind::Select, sql, args)
}

fn check_columns(model: &str, columns: &[&str], values: &[Value]) -> OrmResult<()> {
    if columns.is_empty() {
        return Err(OrmError::EmptyColumnSet(model.to_string()));
    }
    if columns.len() != values.len() {
        return Err(OrmError::mismatch(format!(
            "{} columns with {} values for model '{model}'",
            columns.len(),
            values.len()
        )));
    }
    Ok(())
}

/// `INSERT INTO <table>(c1,c2) VALUES(?,?);`
pub(crate) fn insert(
    table: &str,
    model: &str,
    columns: &[&str],
    values: Vec<Value>,
) -> OrmResult<Statement> {
    check_columns(model, columns, &values)?;
    let placeholders = vec!["?"; columns.len()].join(",");
    let sql = format!(
        "INSERT INTO {table}({}) VALUES({placeholders});",
        columns.join(",")
    );
    Statement::new(StatementKind::Insert, sql, values)
}

/// `UPDATE <table> SET c = ?` or `SET (c1,c2) = (?,?)`, then `[WHERE];`
pub(crate) fn update(
    clauses: &Clauses,
    table: &str,
    model: &str,
    columns: &[&str],
    values: Vec<Value>,
    derived: Option<&Condition>,
) -> OrmResult<Statement> {
    check_columns(model, columns, &values)?;

    let assignment = if columns.len() == 1 {
        format!("{} = ?", columns[0])
    } else {
        format!(
            "({}) = ({})",
            columns.join(","),
            vec!["?"; columns.len()].join(",")
        )
    };

    let (fragment, where_args) = where_clause(clauses.filters(), derived)?;
    if fragment.is_empty() {
        tracing::warn!(
            target: "fury.sql",
            table = %table,
            "UPDATE without WHERE clause will touch every row"
        );
    }

    let mut sql = format!("UPDATE {table} SET {assignment}");
    push_where(&mut sql, &fragment);
    sql.push(';');

    let mut args = values;
    args.extend(where_args);
    Statement::new(StatementKind::Update, sql, args)
}

/// `DELETE FROM <table> WHERE ...;`
pub(crate) fn delete(
    clauses: &Clauses,
    table: &str,
    derived: Option<&Condition>,
) -> OrmResult<Statement> {
    let (fragment, args) = where_clause(clauses.filters(), derived)?;
    if fragment.is_empty() {
        return Err(OrmError::UnfilteredDelete(table.to_string()));
    }

    let mut sql = format!("DELETE FROM {table}");
    push_where(&mut sql, &fragment);
    sql.push(';');

    Statement::new(StatementKind::Delete, sql, args)
}
