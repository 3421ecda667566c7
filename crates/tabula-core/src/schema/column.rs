//! Column descriptors.
//!
//! [`ColumnInfo`] is the type-erased part of a column (name, type,
//! constraints) that schema synchronization and DDL generation work with.
//! [`Column<T>`] adds the bind/extract closures that move a field of `T`
//! across the engine boundary.

use std::fmt;

use crate::ast::OrderDirection;
use crate::error::Result;
use crate::value::{FieldType, SqlType, SqlValue, ToSqlValue};

/// Conflict resolution algorithm for a constraint (`ON CONFLICT ...`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conflict {
    /// `ROLLBACK`
    Rollback,
    /// `ABORT`
    Abort,
    /// `FAIL`
    Fail,
    /// `IGNORE`
    Ignore,
    /// `REPLACE`
    Replace,
}

impl Conflict {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rollback => "ROLLBACK",
            Self::Abort => "ABORT",
            Self::Fail => "FAIL",
            Self::Ignore => "IGNORE",
            Self::Replace => "REPLACE",
        }
    }
}

/// Column-level PRIMARY KEY constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PrimaryKey {
    /// Optional `ASC` / `DESC`.
    pub order: Option<OrderDirection>,
    /// Optional `ON CONFLICT` clause.
    pub conflict: Option<Conflict>,
    /// Whether `AUTOINCREMENT` is emitted.
    pub autoincrement: bool,
}

/// Column-level UNIQUE constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Unique {
    /// Optional `ON CONFLICT` clause.
    pub conflict: Option<Conflict>,
}

/// The type-erased description of a column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    /// Column name.
    pub name: String,
    /// Declared type.
    pub sql_type: SqlType,
    /// Whether the column is declared NOT NULL.
    pub not_null: bool,
    /// Optional `ON CONFLICT` clause of the NOT NULL constraint.
    pub not_null_conflict: Option<Conflict>,
    /// Column-level primary key.
    pub primary_key: Option<PrimaryKey>,
    /// UNIQUE constraint.
    pub unique: Option<Unique>,
    /// DEFAULT value.
    pub default: Option<SqlValue>,
}

impl ColumnInfo {
    /// Creates a nullable column of the given type with no constraints.
    #[must_use]
    pub fn new(name: impl Into<String>, sql_type: SqlType) -> Self {
        Self {
            name: name.into(),
            sql_type,
            not_null: false,
            not_null_conflict: None,
            primary_key: None,
            unique: None,
            default: None,
        }
    }

    /// Returns `true` if a DEFAULT value is declared.
    #[must_use]
    pub const fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Returns `true` if the column carries a column-level PRIMARY KEY.
    #[must_use]
    pub const fn is_primary_key(&self) -> bool {
        self.primary_key.is_some()
    }

    /// Returns `true` if the column is declared AUTOINCREMENT.
    #[must_use]
    pub fn is_autoincrement(&self) -> bool {
        self.primary_key.is_some_and(|pk| pk.autoincrement)
    }
}

type BindFn<T> = Box<dyn Fn(&T) -> SqlValue>;
type ExtractFn<T> = Box<dyn Fn(&mut T, SqlValue) -> Result<()>>;

/// A column of the mapped type `T`.
///
/// Built from an explicit getter/setter pair; nullability and the declared
/// type follow the field type (`Option<_>` fields are nullable, all others
/// are NOT NULL).
///
/// ```rust
/// use tabula_core::schema::Column;
///
/// #[derive(Default)]
/// struct User {
///     id: i64,
///     email: Option<String>,
/// }
///
/// let id = Column::new("id", |u: &User| &u.id, |u, v| u.id = v)
///     .primary_key()
///     .autoincrement();
/// let email = Column::new("email", |u: &User| &u.email, |u, v| u.email = v).unique();
///
/// assert!(id.info().not_null);
/// assert!(!email.info().not_null);
/// ```
pub struct Column<T> {
    info: ColumnInfo,
    bind: BindFn<T>,
    extract: ExtractFn<T>,
}

impl<T: 'static> Column<T> {
    /// Declares a column backed by the field reached through `get` and
    /// written through `set`.
    #[must_use]
    pub fn new<V: FieldType>(name: &str, get: fn(&T) -> &V, set: fn(&mut T, V)) -> Self {
        let mut info = ColumnInfo::new(name, V::SQL_TYPE);
        info.not_null = !V::NULLABLE;
        Self {
            info,
            bind: Box::new(move |object| get(object).clone().to_sql_value()),
            extract: Box::new(move |object, value| {
                set(object, V::from_sql_value(value)?);
                Ok(())
            }),
        }
    }
}

impl<T> Column<T> {
    /// Marks the column as PRIMARY KEY.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.info.primary_key.get_or_insert_with(PrimaryKey::default);
        self
    }

    /// Sets the PRIMARY KEY ordering hint (`ASC` / `DESC`).
    #[must_use]
    pub fn primary_key_order(mut self, order: OrderDirection) -> Self {
        self.info
            .primary_key
            .get_or_insert_with(PrimaryKey::default)
            .order = Some(order);
        self
    }

    /// Sets the PRIMARY KEY conflict clause.
    #[must_use]
    pub fn primary_key_on_conflict(mut self, conflict: Conflict) -> Self {
        self.info
            .primary_key
            .get_or_insert_with(PrimaryKey::default)
            .conflict = Some(conflict);
        self
    }

    /// Marks the column AUTOINCREMENT (implies PRIMARY KEY).
    #[must_use]
    pub fn autoincrement(mut self) -> Self {
        self.info
            .primary_key
            .get_or_insert_with(PrimaryKey::default)
            .autoincrement = true;
        self
    }

    /// Adds a UNIQUE constraint.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.info.unique.get_or_insert_with(Unique::default);
        self
    }

    /// Adds a UNIQUE constraint with a conflict clause.
    #[must_use]
    pub fn unique_on_conflict(mut self, conflict: Conflict) -> Self {
        self.info.unique = Some(Unique {
            conflict: Some(conflict),
        });
        self
    }

    /// Sets the conflict clause of the NOT NULL constraint.
    #[must_use]
    pub fn not_null_on_conflict(mut self, conflict: Conflict) -> Self {
        self.info.not_null_conflict = Some(conflict);
        self
    }

    /// Sets a DEFAULT value.
    #[must_use]
    pub fn default_value(mut self, value: impl ToSqlValue) -> Self {
        self.info.default = Some(value.to_sql_value());
        self
    }

    /// Returns the type-erased description.
    #[must_use]
    pub const fn info(&self) -> &ColumnInfo {
        &self.info
    }

    /// Returns the column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// Reads the field from `object` as a bindable value.
    #[must_use]
    pub fn bind(&self, object: &T) -> SqlValue {
        (self.bind)(object)
    }

    /// Writes `value` into the field of `object`.
    ///
    /// # Errors
    ///
    /// Returns a conversion error when `value` does not fit the field type.
    pub fn extract(&self, object: &mut T, value: SqlValue) -> Result<()> {
        (self.extract)(object, value)
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column").field("info", &self.info).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[derive(Default)]
    struct Item {
        id: i64,
        label: String,
        weight: Option<f64>,
    }

    #[test]
    fn test_nullability_follows_field_type() {
        let label = Column::new("label", |i: &Item| &i.label, |i, v| i.label = v);
        let weight = Column::new("weight", |i: &Item| &i.weight, |i, v| i.weight = v);

        assert!(label.info().not_null);
        assert_eq!(label.info().sql_type, SqlType::Text);
        assert!(!weight.info().not_null);
        assert_eq!(weight.info().sql_type, SqlType::Real);
    }

    #[test]
    fn test_bind_and_extract() {
        let id = Column::new("id", |i: &Item| &i.id, |i, v| i.id = v);
        let mut item = Item {
            id: 7,
            ..Item::default()
        };

        assert_eq!(id.bind(&item), SqlValue::Int(7));
        id.extract(&mut item, SqlValue::Int(9)).unwrap();
        assert_eq!(item.id, 9);
        assert_eq!(id.extract(&mut item, SqlValue::Null), Err(Error::ValueIsNull));
    }

    #[test]
    fn test_autoincrement_implies_primary_key() {
        let id = Column::new("id", |i: &Item| &i.id, |i, v| i.id = v).autoincrement();
        assert!(id.info().is_primary_key());
        assert!(id.info().is_autoincrement());
    }
}
