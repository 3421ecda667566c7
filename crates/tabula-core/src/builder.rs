//! Free functions for building expressions and clauses.
//!
//! # Example
//!
//! ```rust
//! use tabula_core::builder::{col, lit, limit_offset, order_by, where_};
//!
//! struct Employee;
//!
//! let filter = where_(col::<Employee>("age").gt(30).and(col::<Employee>("name").like("A%")));
//! let sort = order_by([col::<Employee>("salary").desc()]);
//! let page = limit_offset(10, 20);
//! # let _ = (filter, sort, page, lit(5));
//! ```

use crate::ast::{
    BuiltinFunction, Clause, Expr, FunctionCall, IntoExpr, Limit, OrderTerm, Select, TableKey,
};
use crate::value::ToSqlValue;

/// Creates a reference to column `name` of the mapped type `T`.
#[must_use]
pub fn col<T: 'static>(name: &str) -> Expr {
    Expr::column::<T>(name)
}

/// Creates a literal.
#[must_use]
pub fn lit<T: ToSqlValue>(value: T) -> Expr {
    Expr::literal(value)
}

/// `*`
#[must_use]
pub const fn wildcard() -> Expr {
    Expr::Wildcard
}

/// Creates a SELECT of the given result columns.
#[must_use]
pub fn select(columns: impl IntoIterator<Item = Expr>) -> Select {
    Select::new(columns.into_iter().collect())
}

/// `FROM "t"` for the mapped type `T`.
#[must_use]
pub fn from<T: 'static>() -> Clause {
    Clause::From(vec![TableKey::of::<T>()])
}

/// `WHERE expr`
#[must_use]
pub fn where_(expr: impl IntoExpr) -> Clause {
    Clause::Where(expr.into_expr())
}

/// `GROUP BY a, b`
#[must_use]
pub fn group_by(exprs: impl IntoIterator<Item = Expr>) -> Clause {
    Clause::GroupBy(exprs.into_iter().collect())
}

/// `HAVING expr`
#[must_use]
pub fn having(expr: impl IntoExpr) -> Clause {
    Clause::Having(expr.into_expr())
}

/// `ORDER BY ...`
#[must_use]
pub fn order_by<O: Into<OrderTerm>>(terms: impl IntoIterator<Item = O>) -> Clause {
    Clause::OrderBy(terms.into_iter().map(Into::into).collect())
}

/// `LIMIT n`
#[must_use]
pub fn limit(count: impl IntoExpr) -> Clause {
    Clause::Limit(Limit::Count(count.into_expr()))
}

/// `LIMIT n OFFSET m`
#[must_use]
pub fn limit_offset(count: impl IntoExpr, offset: impl IntoExpr) -> Clause {
    Clause::Limit(Limit::WithOffset {
        limit: count.into_expr(),
        offset: offset.into_expr(),
    })
}

/// `LIMIT a, b`
#[must_use]
pub fn limit_comma(first: impl IntoExpr, second: impl IntoExpr) -> Clause {
    Clause::Limit(Limit::Comma {
        first: first.into_expr(),
        second: second.into_expr(),
    })
}

/// Builds the assignment list of an UPDATE from `column.assign(value)`
/// expressions.
#[must_use]
pub fn set(assignments: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::Assignments(assignments.into_iter().collect())
}

impl Expr {
    /// Sorts ascending by this expression.
    #[must_use]
    pub fn asc(self) -> OrderTerm {
        OrderTerm::new(self).asc()
    }

    /// Sorts descending by this expression.
    #[must_use]
    pub fn desc(self) -> OrderTerm {
        OrderTerm::new(self).desc()
    }
}

fn call(function: BuiltinFunction, args: Vec<Expr>) -> Expr {
    Expr::Function(FunctionCall {
        function,
        args,
        distinct: false,
    })
}

fn call_distinct(function: BuiltinFunction, arg: Expr) -> Expr {
    Expr::Function(FunctionCall {
        function,
        args: vec![arg],
        distinct: true,
    })
}

/// `COUNT(*)`
#[must_use]
pub fn count_all() -> Expr {
    call(BuiltinFunction::Count, vec![Expr::Wildcard])
}

/// `COUNT(x)`
#[must_use]
pub fn count(expr: impl IntoExpr) -> Expr {
    call(BuiltinFunction::Count, vec![expr.into_expr()])
}

/// `COUNT(DISTINCT x)`
#[must_use]
pub fn count_distinct(expr: impl IntoExpr) -> Expr {
    call_distinct(BuiltinFunction::Count, expr.into_expr())
}

/// `SUM(x)`
#[must_use]
pub fn sum(expr: impl IntoExpr) -> Expr {
    call(BuiltinFunction::Sum, vec![expr.into_expr()])
}

/// `AVG(x)`
#[must_use]
pub fn avg(expr: impl IntoExpr) -> Expr {
    call(BuiltinFunction::Avg, vec![expr.into_expr()])
}

/// `MIN(x)`
#[must_use]
pub fn min(expr: impl IntoExpr) -> Expr {
    call(BuiltinFunction::Min, vec![expr.into_expr()])
}

/// `MAX(x)`
#[must_use]
pub fn max(expr: impl IntoExpr) -> Expr {
    call(BuiltinFunction::Max, vec![expr.into_expr()])
}

/// `TOTAL(x)`
#[must_use]
pub fn total(expr: impl IntoExpr) -> Expr {
    call(BuiltinFunction::Total, vec![expr.into_expr()])
}

/// `GROUP_CONCAT(x)`
#[must_use]
pub fn group_concat(expr: impl IntoExpr) -> Expr {
    call(BuiltinFunction::GroupConcat, vec![expr.into_expr()])
}

/// `GROUP_CONCAT(x, separator)`
#[must_use]
pub fn group_concat_with(expr: impl IntoExpr, separator: &str) -> Expr {
    call(
        BuiltinFunction::GroupConcat,
        vec![expr.into_expr(), lit(separator)],
    )
}

/// `ABS(x)`
#[must_use]
pub fn abs(expr: impl IntoExpr) -> Expr {
    call(BuiltinFunction::Abs, vec![expr.into_expr()])
}

/// `LENGTH(x)`
#[must_use]
pub fn length(expr: impl IntoExpr) -> Expr {
    call(BuiltinFunction::Length, vec![expr.into_expr()])
}

/// `LOWER(x)`
#[must_use]
pub fn lower(expr: impl IntoExpr) -> Expr {
    call(BuiltinFunction::Lower, vec![expr.into_expr()])
}

/// `UPPER(x)`
#[must_use]
pub fn upper(expr: impl IntoExpr) -> Expr {
    call(BuiltinFunction::Upper, vec![expr.into_expr()])
}

/// `TRIM(x)`
#[must_use]
pub fn trim(expr: impl IntoExpr) -> Expr {
    call(BuiltinFunction::Trim, vec![expr.into_expr()])
}

/// `LTRIM(x)`
#[must_use]
pub fn ltrim(expr: impl IntoExpr) -> Expr {
    call(BuiltinFunction::Ltrim, vec![expr.into_expr()])
}

/// `RTRIM(x)`
#[must_use]
pub fn rtrim(expr: impl IntoExpr) -> Expr {
    call(BuiltinFunction::Rtrim, vec![expr.into_expr()])
}

/// `ROUND(x, digits)`
#[must_use]
pub fn round(expr: impl IntoExpr, digits: i64) -> Expr {
    call(BuiltinFunction::Round, vec![expr.into_expr(), lit(digits)])
}

/// `COALESCE(a, b, ...)`
#[must_use]
pub fn coalesce(exprs: impl IntoIterator<Item = Expr>) -> Expr {
    call(BuiltinFunction::Coalesce, exprs.into_iter().collect())
}

/// `IFNULL(x, fallback)`
#[must_use]
pub fn ifnull(expr: impl IntoExpr, fallback: impl IntoExpr) -> Expr {
    call(
        BuiltinFunction::Ifnull,
        vec![expr.into_expr(), fallback.into_expr()],
    )
}

/// `NULLIF(a, b)`
#[must_use]
pub fn nullif(a: impl IntoExpr, b: impl IntoExpr) -> Expr {
    call(BuiltinFunction::Nullif, vec![a.into_expr(), b.into_expr()])
}

/// `RANDOM()`
#[must_use]
pub fn random() -> Expr {
    call(BuiltinFunction::Random, vec![])
}

/// `TYPEOF(x)`
#[must_use]
pub fn type_of(expr: impl IntoExpr) -> Expr {
    call(BuiltinFunction::Typeof, vec![expr.into_expr()])
}

/// `SUBSTR(x, start, len)`
#[must_use]
pub fn substr(expr: impl IntoExpr, start: i64, len: i64) -> Expr {
    call(
        BuiltinFunction::Substr,
        vec![expr.into_expr(), lit(start), lit(len)],
    )
}

/// `REPLACE(x, from, to)`
#[must_use]
pub fn replace(expr: impl IntoExpr, from: impl IntoExpr, to: impl IntoExpr) -> Expr {
    call(
        BuiltinFunction::Replace,
        vec![expr.into_expr(), from.into_expr(), to.into_expr()],
    )
}

/// `INSTR(haystack, needle)`
#[must_use]
pub fn instr(haystack: impl IntoExpr, needle: impl IntoExpr) -> Expr {
    call(
        BuiltinFunction::Instr,
        vec![haystack.into_expr(), needle.into_expr()],
    )
}

/// `DATE(x, modifiers...)`
#[must_use]
pub fn date(args: impl IntoIterator<Item = Expr>) -> Expr {
    call(BuiltinFunction::Date, args.into_iter().collect())
}

/// `TIME(x, modifiers...)`
#[must_use]
pub fn time(args: impl IntoIterator<Item = Expr>) -> Expr {
    call(BuiltinFunction::Time, args.into_iter().collect())
}

/// `DATETIME(x, modifiers...)`
#[must_use]
pub fn datetime(args: impl IntoIterator<Item = Expr>) -> Expr {
    call(BuiltinFunction::Datetime, args.into_iter().collect())
}

/// `JULIANDAY(x, modifiers...)`
#[must_use]
pub fn julianday(args: impl IntoIterator<Item = Expr>) -> Expr {
    call(BuiltinFunction::Julianday, args.into_iter().collect())
}
