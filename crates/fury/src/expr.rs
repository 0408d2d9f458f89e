//! Comparison and boolean condition trees.
//!
//! Every node renders to a SQL fragment using the dialect-neutral `?`
//! placeholder plus the ordered list of arguments it binds. Placeholders are
//! numbered later, once the whole statement is assembled.
//!
//! # Example
//! ```ignore
//! use fury::{and, or, is_equals_to, is_greater_than};
//!
//! let cond = or![
//!     is_equals_to("status", "active"),
//!     and![is_greater_than("age", 18), "verified"],
//! ];
//! let (sql, args) = cond.render()?;
//! assert_eq!(sql, "(status = ? OR (age > ? AND verified))");
//! ```

use crate::error::{OrmError, OrmResult};
use crate::value::Value;
use std::fmt;

/// Comparison operator of an [`Expression`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `>`
    Gt,
    /// `>=`
    Gte,
    /// `<`
    Lt,
    /// `<=`
    Lte,
    /// `=`
    Eq,
    /// `<>`
    Ne,
}

impl CompareOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
            CompareOp::Eq => "=",
            CompareOp::Ne => "<>",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single comparison: `<left> <op> <right>`.
///
/// `left` is a column path such as `user.counter`; `right` is always bound
/// as a parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    op: CompareOp,
    left: String,
    right: Value,
}

impl Expression {
    pub fn new(op: CompareOp, left: impl Into<String>, right: impl Into<Value>) -> Self {
        Self {
            op,
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn op(&self) -> CompareOp {
        self.op
    }

    pub fn left(&self) -> &str {
        &self.left
    }

    pub fn right(&self) -> &Value {
        &self.right
    }

    /// Render as `"<left> <op> ?"` with the right operand as the only argument.
    pub fn render(&self) -> OrmResult<(String, Vec<Value>)> {
        if self.left.trim().is_empty() || self.right.is_blank() {
            return Err(OrmError::MissingOperand(format!(
                "'{}' {} {:?}",
                self.left, self.op, self.right
            )));
        }
        Ok((
            format!("{} {} ?", self.left, self.op),
            vec![self.right.clone()],
        ))
    }
}

/// `left > right`
pub fn is_greater_than(left: impl Into<String>, right: impl Into<Value>) -> Expression {
    Expression::new(CompareOp::Gt, left, right)
}

/// `left >= right`
pub fn is_greater_than_or_equals_to(
    left: impl Into<String>,
    right: impl Into<Value>,
) -> Expression {
    Expression::new(CompareOp::Gte, left, right)
}

/// `left < right`
pub fn is_less_than(left: impl Into<String>, right: impl Into<Value>) -> Expression {
    Expression::new(CompareOp::Lt, left, right)
}

/// `left <= right`
pub fn is_less_than_or_equals_to(left: impl Into<String>, right: impl Into<Value>) -> Expression {
    Expression::new(CompareOp::Lte, left, right)
}

/// `left = right`
pub fn is_equals_to(left: impl Into<String>, right: impl Into<Value>) -> Expression {
    Expression::new(CompareOp::Eq, left, right)
}

/// `left <> right`
pub fn is_not_equals_to(left: impl Into<String>, right: impl Into<Value>) -> Expression {
    Expression::new(CompareOp::Ne, left, right)
}

/// Boolean operator of a [`LogicalExpression`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOp::And => "AND",
            LogicalOp::Or => "OR",
        }
    }
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A condition usable in a WHERE clause or as a logical operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// A single comparison.
    Expr(Expression),
    /// A nested AND/OR group.
    Logical(LogicalExpression),
    /// A pre-rendered SQL fragment, inlined verbatim.
    ///
    /// # Safety
    /// Be careful with SQL injection when using raw conditions.
    Raw(String),
}

impl Condition {
    /// Create a raw SQL condition.
    pub fn raw(sql: impl Into<String>) -> Self {
        Condition::Raw(sql.into())
    }

    pub fn render(&self) -> OrmResult<(String, Vec<Value>)> {
        match self {
            Condition::Expr(expr) => expr.render(),
            Condition::Logical(logical) => logical.render(),
            Condition::Raw(sql) => Ok((sql.clone(), Vec::new())),
        }
    }
}

impl From<Expression> for Condition {
    fn from(expr: Expression) -> Self {
        Condition::Expr(expr)
    }
}

impl From<LogicalExpression> for Condition {
    fn from(logical: LogicalExpression) -> Self {
        Condition::Logical(logical)
    }
}

impl From<&str> for Condition {
    fn from(sql: &str) -> Self {
        Condition::Raw(sql.to_string())
    }
}

impl From<String> for Condition {
    fn from(sql: String) -> Self {
        Condition::Raw(sql)
    }
}

/// Anything that can be placed in a [`LogicalExpression`]; `None` is skipped.
pub trait IntoOperand {
    fn into_operand(self) -> Option<Condition>;
}

impl IntoOperand for Condition {
    fn into_operand(self) -> Option<Condition> {
        Some(self)
    }
}

impl IntoOperand for Expression {
    fn into_operand(self) -> Option<Condition> {
        Some(Condition::Expr(self))
    }
}

impl IntoOperand for LogicalExpression {
    fn into_operand(self) -> Option<Condition> {
        Some(Condition::Logical(self))
    }
}

impl IntoOperand for &str {
    fn into_operand(self) -> Option<Condition> {
        Some(Condition::Raw(self.to_string()))
    }
}

impl IntoOperand for String {
    fn into_operand(self) -> Option<Condition> {
        Some(Condition::Raw(self))
    }
}

impl<T: IntoOperand> IntoOperand for Option<T> {
    fn into_operand(self) -> Option<Condition> {
        self.and_then(IntoOperand::into_operand)
    }
}

/// An ordered AND/OR group of conditions.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalExpression {
    op: LogicalOp,
    operands: Vec<Option<Condition>>,
}

impl LogicalExpression {
    pub fn new<I>(op: LogicalOp, operands: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoOperand,
    {
        Self {
            op,
            operands: operands.into_iter().map(IntoOperand::into_operand).collect(),
        }
    }

    /// Used by the `and!` / `or!` macros, whose operands may differ in type.
    #[doc(hidden)]
    pub fn from_operands(op: LogicalOp, operands: Vec<Option<Condition>>) -> Self {
        Self { op, operands }
    }

    /// Append one operand.
    pub fn push(mut self, operand: impl IntoOperand) -> Self {
        self.operands.push(operand.into_operand());
        self
    }

    pub fn op(&self) -> LogicalOp {
        self.op
    }

    pub fn operands(&self) -> impl Iterator<Item = &Condition> {
        self.operands.iter().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.operands.iter().all(Option::is_none)
    }

    /// Render the group.
    ///
    /// Operands that render to an empty fragment contribute nothing. The
    /// result is parenthesized only when two or more operands contributed.
    pub fn render(&self) -> OrmResult<(String, Vec<Value>)> {
        let mut parts: Vec<String> = Vec::new();
        let mut args = Vec::new();

        for operand in self.operands.iter().flatten() {
            if matches!(operand, Condition::Raw(sql) if sql.trim().is_empty()) {
                return Err(OrmError::UnsupportedOperand(format!(
                    "blank raw fragment in {} group",
                    self.op
                )));
            }

            let (sql, operand_args) = operand.render()?;
            if sql.is_empty() {
                continue;
            }
            parts.push(sql);
            args.extend(operand_args);
        }

        let sql = match parts.len() {
            0 => String::new(),
            1 => parts.swap_remove(0),
            _ => format!("({})", parts.join(&format!(" {} ", self.op))),
        };
        Ok((sql, args))
    }
}

/// `operands[0] AND operands[1] AND ...`
pub fn and<I>(operands: I) -> LogicalExpression
where
    I: IntoIterator,
    I::Item: IntoOperand,
{
    LogicalExpression::new(LogicalOp::And, operands)
}

/// `operands[0] OR operands[1] OR ...`
pub fn or<I>(operands: I) -> LogicalExpression
where
    I: IntoIterator,
    I::Item: IntoOperand,
{
    LogicalExpression::new(LogicalOp::Or, operands)
}

/// Build an AND group from operands of mixed types.
///
/// ```ignore
/// let cond = fury::and![fury::is_equals_to("a", 1), "b IS NULL", None::<&str>];
/// ```
#[macro_export]
macro_rules! and {
    ($($operand:expr),* $(,)?) => {
        $crate::expr::LogicalExpression::from_operands(
            $crate::expr::LogicalOp::And,
            vec![$($crate::expr::IntoOperand::into_operand($operand)),*],
        )
    };
}

/// Build an OR group from operands of mixed types.
#[macro_export]
macro_rules! or {
    ($($operand:expr),* $(,)?) => {
        $crate::expr::LogicalExpression::from_operands(
            $crate::expr::LogicalOp::Or,
            vec![$($crate::expr::IntoOperand::into_operand($operand)),*],
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expression_renders_placeholder() {
        let cases = [
            (is_greater_than("key", 2), "key > ?"),
            (is_greater_than_or_equals_to("key", 2), "key >= ?"),
            (is_less_than("key", 2), "key < ?"),
            (is_less_than_or_equals_to("key", 2), "key <= ?"),
            (is_equals_to("key", 2), "key = ?"),
            (is_not_equals_to("key", 2), "key <> ?"),
        ];
        for (expr, want) in cases {
            let (sql, args) = expr.render().unwrap();
            assert_eq!(sql, want);
            assert_eq!(args, vec![Value::Int4(2)]);
        }
    }

    #[test]
    fn expression_missing_operand() {
        let missing = [
            is_greater_than("", "val"),
            is_greater_than("key", None::<i32>),
            is_greater_than("key", ""),
        ];
        for expr in missing {
            assert!(matches!(expr.render(), Err(OrmError::MissingOperand(_))));
        }
    }

    #[test]
    fn empty_logical_expression_renders_nothing() {
        let (sql, args) = and(Vec::<Expression>::new()).render().unwrap();
        assert_eq!(sql, "");
        assert!(args.is_empty());
    }

    #[test]
    fn logical_expression_parenthesization() {
        let cases: Vec<(LogicalExpression, &str, Vec<Value>)> = vec![
            (or![is_equals_to("key", 1), None::<Expression>], "key = ?", vec![1.into()]),
            (or!["key = 1", None::<&str>], "key = 1", vec![]),
            (
                or![is_equals_to("key", 1), is_equals_to("key", 2)],
                "(key = ? OR key = ?)",
                vec![1.into(), 2.into()],
            ),
            (
                or![is_equals_to("key", 1), "key = 2"],
                "(key = ? OR key = 2)",
                vec![1.into()],
            ),
            (
                or![is_equals_to("key", 1), and![is_equals_to("key", "2")]],
                "(key = ? OR key = ?)",
                vec![1.into(), "2".into()],
            ),
            (
                or![
                    is_equals_to("key", 1),
                    and![is_equals_to("key", 2), is_equals_to("key", true)]
                ],
                "(key = ? OR (key = ? AND key = ?))",
                vec![1.into(), 2.into(), true.into()],
            ),
        ];

        for (expr, want_sql, want_args) in cases {
            let (sql, args) = expr.render().unwrap();
            assert_eq!(sql, want_sql);
            assert_eq!(args, want_args);
        }
    }

    #[test]
    fn empty_nested_group_does_not_contribute() {
        let expr = or![is_equals_to("a", 1), and(Vec::<Expression>::new())];
        assert_eq!(expr.render().unwrap().0, "a = ?");
    }

    #[test]
    fn blank_raw_operand_is_unsupported() {
        let expr = and![is_equals_to("a", 1), "  "];
        assert!(matches!(expr.render(), Err(OrmError::UnsupportedOperand(_))));
    }

    #[test]
    fn nested_error_propagates() {
        let expr = and![is_equals_to("a", 1), or![is_equals_to("", 2)]];
        assert!(matches!(expr.render(), Err(OrmError::MissingOperand(_))));
    }

    #[test]
    fn push_appends_in_order() {
        let expr = and(vec![is_equals_to("a", 1)]).push(is_less_than("b", 2));
        let (sql, args) = expr.render().unwrap();
        assert_eq!(sql, "(a = ? AND b < ?)");
        assert_eq!(args, vec![Value::Int4(1), Value::Int4(2)]);
    }
}
