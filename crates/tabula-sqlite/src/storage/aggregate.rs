//! Single-value aggregate queries.
//!
//! Each aggregate builds `SELECT AGG(...) FROM ... <clauses>` and converts
//! the one resulting value. An aggregate over no rows yields NULL, which is
//! returned as `None`.

use tabula_core::ast::{Clause, IntoExpr, TableKey};
use tabula_core::builder;
use tabula_core::{Expr, FromSqlValue, Select, SqlValue};

use super::Storage;
use crate::error::Result;

impl Storage {
    fn aggregate(&self, function: Expr, clauses: &[Clause]) -> Result<SqlValue> {
        let select = Select::new(vec![function]).clauses(clauses.iter().cloned());
        let row: Option<(SqlValue,)> = self.select(&select)?.into_iter().next();
        Ok(row.map_or(SqlValue::Null, |(value,)| value))
    }

    fn aggregate_as<V: FromSqlValue>(
        &self,
        function: Expr,
        clauses: &[Clause],
    ) -> Result<Option<V>> {
        Ok(Option::<V>::from_sql_value(self.aggregate(function, clauses)?)?)
    }

    /// `SELECT COUNT(*) FROM "t" <clauses>`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Core`](crate::Error::Core) if `T` is not mapped or a
    /// clause references an unknown column.
    pub fn count<T: 'static>(&self, clauses: &[Clause]) -> Result<i64> {
        let mut all = vec![Clause::From(vec![TableKey::of::<T>()])];
        all.extend(clauses.iter().cloned());
        Ok(self
            .aggregate_as::<i64>(builder::count_all(), &all)?
            .unwrap_or(0))
    }

    /// `COUNT(x)`: rows where `x` is not NULL.
    ///
    /// # Errors
    ///
    /// See [`count`](Self::count).
    pub fn count_column(&self, expr: impl IntoExpr, clauses: &[Clause]) -> Result<i64> {
        Ok(self
            .aggregate_as::<i64>(builder::count(expr), clauses)?
            .unwrap_or(0))
    }

    /// `COUNT(DISTINCT x)`
    ///
    /// # Errors
    ///
    /// See [`count`](Self::count).
    pub fn count_distinct(&self, expr: impl IntoExpr, clauses: &[Clause]) -> Result<i64> {
        Ok(self
            .aggregate_as::<i64>(builder::count_distinct(expr), clauses)?
            .unwrap_or(0))
    }

    /// `SUM(x)`, `None` when no row matched.
    ///
    /// # Errors
    ///
    /// See [`count`](Self::count).
    pub fn sum(&self, expr: impl IntoExpr, clauses: &[Clause]) -> Result<Option<f64>> {
        self.aggregate_as(builder::sum(expr), clauses)
    }

    /// `AVG(x)`, `None` when no row matched.
    ///
    /// # Errors
    ///
    /// See [`count`](Self::count).
    pub fn avg(&self, expr: impl IntoExpr, clauses: &[Clause]) -> Result<Option<f64>> {
        self.aggregate_as(builder::avg(expr), clauses)
    }

    /// `TOTAL(x)`: like SUM but `0.0` over no rows.
    ///
    /// # Errors
    ///
    /// See [`count`](Self::count).
    pub fn total(&self, expr: impl IntoExpr, clauses: &[Clause]) -> Result<f64> {
        Ok(self
            .aggregate_as::<f64>(builder::total(expr), clauses)?
            .unwrap_or(0.0))
    }

    /// `MIN(x)` converted to `V`.
    ///
    /// # Errors
    ///
    /// See [`count`](Self::count); also fails when the value does not fit `V`.
    pub fn min<V: FromSqlValue>(
        &self,
        expr: impl IntoExpr,
        clauses: &[Clause],
    ) -> Result<Option<V>> {
        self.aggregate_as(builder::min(expr), clauses)
    }

    /// `MAX(x)` converted to `V`.
    ///
    /// # Errors
    ///
    /// See [`min`](Self::min).
    pub fn max<V: FromSqlValue>(
        &self,
        expr: impl IntoExpr,
        clauses: &[Clause],
    ) -> Result<Option<V>> {
        self.aggregate_as(builder::max(expr), clauses)
    }

    /// `GROUP_CONCAT(x)` with the engine's default `,` separator.
    ///
    /// # Errors
    ///
    /// See [`count`](Self::count).
    pub fn group_concat(&self, expr: impl IntoExpr, clauses: &[Clause]) -> Result<Option<String>> {
        self.aggregate_as(builder::group_concat(expr), clauses)
    }

    /// `GROUP_CONCAT(x, separator)`
    ///
    /// # Errors
    ///
    /// See [`count`](Self::count).
    pub fn group_concat_with(
        &self,
        expr: impl IntoExpr,
        separator: &str,
        clauses: &[Clause],
    ) -> Result<Option<String>> {
        self.aggregate_as(builder::group_concat_with(expr, separator), clauses)
    }
}
