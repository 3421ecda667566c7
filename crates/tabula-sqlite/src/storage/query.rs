//! Bulk operations with caller-supplied clauses, and ad-hoc SELECTs.

use tabula_core::ast::Clause;
use tabula_core::schema::{Column, TableSchema};
use tabula_core::serializer::{serialize, serialize_clauses};
use tabula_core::{Error as CoreError, Expr, FromRow, FromSqlValue, Select};

use super::Storage;
use crate::error::Result;
use crate::statement::{execute, query_each};

impl Storage {
    fn select_all_sql<T: 'static>(&self, clauses: &[Clause]) -> Result<String> {
        let table = self.table::<T>()?;
        let columns: Vec<&str> = table.columns().iter().map(Column::name).collect();
        let mut sql = self.dialect().select_sql(table.name(), &columns);
        sql.push_str(&serialize_clauses(clauses, self.context())?);
        Ok(sql)
    }

    /// Returns every row of `T` matching `clauses`, appended verbatim after
    /// `SELECT ... FROM "t"`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Core`](crate::Error::Core) for unresolved columns in
    /// the clauses or values that do not fit their fields.
    pub fn get_all<T: Default + 'static>(&self, clauses: &[Clause]) -> Result<Vec<T>> {
        let mut objects = Vec::new();
        self.iterate::<T, _>(clauses, |object| {
            objects.push(object);
            Ok(())
        })?;
        Ok(objects)
    }

    /// Hands each row of `T` matching `clauses` to `f` as it is read.
    ///
    /// `f` may call back into the storage.
    ///
    /// # Errors
    ///
    /// See [`get_all`](Self::get_all); an error returned by `f` stops the
    /// iteration and is returned as is.
    pub fn iterate<T, F>(&self, clauses: &[Clause], mut f: F) -> Result<()>
    where
        T: Default + 'static,
        F: FnMut(T) -> Result<()>,
    {
        let sql = self.select_all_sql::<T>(clauses)?;
        let table = self.table::<T>()?;
        self.with_connection(|conn| {
            query_each(conn, &sql, &[], |values| f(table.object_from_row(values)?))
        })
    }

    /// Deletes every row of `T` matching `clauses` and returns the number
    /// of deleted rows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Core`](crate::Error::Core) for unresolved columns.
    pub fn delete_all<T: 'static>(&self, clauses: &[Clause]) -> Result<usize> {
        let table = self.table::<T>()?;
        let mut sql = format!(
            "DELETE FROM {}",
            self.dialect().quote_identifier(table.name())
        );
        sql.push_str(&serialize_clauses(clauses, self.context())?);
        self.with_connection(|conn| execute(conn, &sql, &[]))
    }

    /// Runs `UPDATE "t" SET <set> <clauses>` and returns the number of
    /// changed rows.
    ///
    /// `set` is an assignment list built with
    /// [`builder::set`](tabula_core::builder::set); the target table is the
    /// one table its columns belong to.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Core`](crate::Error::Core) wrapping
    /// `InvalidConstraintBuilder` when `set` is not an assignment list or
    /// references no table or several tables.
    pub fn update_all(&self, set: &Expr, clauses: &[Clause]) -> Result<usize> {
        if !matches!(set, Expr::Assignments(items) if !items.is_empty()) {
            return Err(CoreError::InvalidConstraintBuilder(
                "update_all expects a non-empty assignment list".into(),
            )
            .into());
        }
        let tables = set.referenced_tables();
        let [key] = tables.as_slice() else {
            return Err(CoreError::InvalidConstraintBuilder(format!(
                "update_all assignments must target exactly one table, found {}",
                tables.len()
            ))
            .into());
        };
        let table = self
            .schema()
            .find(*key)
            .ok_or(CoreError::TypeNotMapped(key.type_name()))?;

        let ctx = self.context();
        let mut sql = format!(
            "UPDATE {} SET {}",
            self.dialect().quote_identifier(table.name()),
            serialize(set, ctx)?
        );
        sql.push_str(&serialize_clauses(clauses, ctx)?);
        self.with_connection(|conn| execute(conn, &sql, &[]))
    }

    /// Runs an ad-hoc SELECT and converts each row with [`FromRow`].
    ///
    /// When `select` has no FROM clause, one listing the tables its columns
    /// and clauses reference is placed before the other clauses.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Core`](crate::Error::Core) for unresolved columns or
    /// rows that do not fit `R`.
    pub fn select<R: FromRow>(&self, select: &Select) -> Result<Vec<R>> {
        let sql = serialize(&select.with_deduced_from(), self.context())?;
        self.with_connection(|conn| {
            let mut rows = Vec::new();
            query_each(conn, &sql, &[], |values| {
                rows.push(R::from_row(values)?);
                Ok(())
            })?;
            Ok(rows)
        })
    }

    /// Runs a one-column SELECT and converts each value.
    ///
    /// # Errors
    ///
    /// See [`select`](Self::select); a SELECT with more than one result
    /// column fails with `ColumnCountMismatch`.
    pub fn select_values<V: FromSqlValue>(&self, select: &Select) -> Result<Vec<V>> {
        Ok(self
            .select::<(V,)>(select)?
            .into_iter()
            .map(|(value,)| value)
            .collect())
    }
}
