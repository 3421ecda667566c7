//! SQL values and the capability traits typed fields implement.
//!
//! [`SqlValue`] is the closed set of values that cross the engine boundary.
//! A field type participates in a table mapping by implementing
//! [`ToSqlValue`] (bind side), [`FromSqlValue`] (extract side) and
//! [`FieldType`] (declared column type and nullability).

use crate::error::{Error, Result};

/// A SQL value that can be bound as a parameter or read from a row.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// NULL value.
    Null,
    /// Boolean value, stored as an integer.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Binary blob value.
    Blob(Vec<u8>),
}

impl SqlValue {
    /// Returns the SQL representation for inline use.
    ///
    /// Text has embedded single quotes doubled. Prefer bound parameters for
    /// anything that did not originate in the program itself.
    #[must_use]
    pub fn to_sql_inline(&self) -> String {
        match self {
            Self::Null => String::from("NULL"),
            Self::Bool(b) => String::from(if *b { "1" } else { "0" }),
            Self::Int(n) => format!("{n}"),
            Self::Float(f) if f.is_finite() => format!("{f:?}"),
            Self::Float(_) => String::from("NULL"),
            Self::Text(s) => {
                let escaped = s.replace('\'', "''");
                format!("'{escaped}'")
            }
            Self::Blob(b) => {
                let hex: String = b.iter().map(|byte| format!("{byte:02X}")).collect();
                format!("X'{hex}'")
            }
        }
    }

    /// Returns a short name for the kind of value, used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::Bool(_) => "BOOLEAN",
            Self::Int(_) => "INTEGER",
            Self::Float(_) => "REAL",
            Self::Text(_) => "TEXT",
            Self::Blob(_) => "BLOB",
        }
    }

    /// Returns `true` for [`SqlValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Declared storage class of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    /// `INTEGER`
    Integer,
    /// `REAL`
    Real,
    /// `TEXT`
    Text,
    /// `BLOB`
    Blob,
}

impl SqlType {
    /// Returns the type name used in `CREATE TABLE`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Real => "REAL",
            Self::Text => "TEXT",
            Self::Blob => "BLOB",
        }
    }
}

/// Trait for types that can be converted to SQL values.
pub trait ToSqlValue {
    /// Converts the value to a `SqlValue`.
    fn to_sql_value(self) -> SqlValue;
}

/// Trait for types that can be rebuilt from a SQL value read from a row.
pub trait FromSqlValue: Sized {
    /// Converts a `SqlValue` into `Self`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValueIsNull`] for a NULL into a non-optional type and
    /// [`Error::UnknownFieldType`] when the value has an incompatible kind.
    fn from_sql_value(value: SqlValue) -> Result<Self>;
}

/// A type that can back a mapped column.
pub trait FieldType: ToSqlValue + FromSqlValue + Clone + 'static {
    /// Declared column type.
    const SQL_TYPE: SqlType;

    /// Whether the column accepts NULL.
    const NULLABLE: bool = false;
}

fn mismatch<T>(expected: &'static str, value: &SqlValue) -> Result<T> {
    match value {
        SqlValue::Null => Err(Error::ValueIsNull),
        other => Err(Error::UnknownFieldType {
            expected,
            found: other.kind(),
        }),
    }
}

impl ToSqlValue for SqlValue {
    fn to_sql_value(self) -> SqlValue {
        self
    }
}

impl FromSqlValue for SqlValue {
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        Ok(value)
    }
}

impl ToSqlValue for bool {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Bool(self)
    }
}

impl FromSqlValue for bool {
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        match value {
            SqlValue::Bool(b) => Ok(b),
            SqlValue::Int(n) => Ok(n != 0),
            other => mismatch("BOOLEAN", &other),
        }
    }
}

impl FieldType for bool {
    const SQL_TYPE: SqlType = SqlType::Integer;
}

impl ToSqlValue for i64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(self)
    }
}

impl FromSqlValue for i64 {
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        match value {
            SqlValue::Int(n) => Ok(n),
            SqlValue::Bool(b) => Ok(Self::from(b)),
            other => mismatch("INTEGER", &other),
        }
    }
}

impl FieldType for i64 {
    const SQL_TYPE: SqlType = SqlType::Integer;
}

macro_rules! impl_narrow_integer {
    ($($ty:ty),+) => {
        $(
            impl ToSqlValue for $ty {
                fn to_sql_value(self) -> SqlValue {
                    SqlValue::Int(i64::from(self))
                }
            }

            impl FromSqlValue for $ty {
                fn from_sql_value(value: SqlValue) -> Result<Self> {
                    let wide = i64::from_sql_value(value)?;
                    <$ty>::try_from(wide).map_err(|_| Error::UnknownFieldType {
                        expected: stringify!($ty),
                        found: "out-of-range INTEGER",
                    })
                }
            }

            impl FieldType for $ty {
                const SQL_TYPE: SqlType = SqlType::Integer;
            }
        )+
    };
}

impl_narrow_integer!(i32, i16, i8, u32, u16, u8);

impl ToSqlValue for f64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(self)
    }
}

impl FromSqlValue for f64 {
    #[allow(clippy::cast_precision_loss)]
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        match value {
            SqlValue::Float(f) => Ok(f),
            SqlValue::Int(n) => Ok(n as Self),
            other => mismatch("REAL", &other),
        }
    }
}

impl FieldType for f64 {
    const SQL_TYPE: SqlType = SqlType::Real;
}

impl ToSqlValue for f32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(f64::from(self))
    }
}

impl FromSqlValue for f32 {
    #[allow(clippy::cast_possible_truncation)]
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        f64::from_sql_value(value).map(|f| f as Self)
    }
}

impl FieldType for f32 {
    const SQL_TYPE: SqlType = SqlType::Real;
}

impl ToSqlValue for String {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(self)
    }
}

impl ToSqlValue for &str {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(String::from(self))
    }
}

impl FromSqlValue for String {
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        match value {
            SqlValue::Text(s) => Ok(s),
            other => mismatch("TEXT", &other),
        }
    }
}

impl FieldType for String {
    const SQL_TYPE: SqlType = SqlType::Text;
}

impl ToSqlValue for Vec<u8> {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Blob(self)
    }
}

impl ToSqlValue for &[u8] {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Blob(self.to_vec())
    }
}

impl FromSqlValue for Vec<u8> {
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        match value {
            SqlValue::Blob(b) => Ok(b),
            SqlValue::Text(s) => Ok(s.into_bytes()),
            other => mismatch("BLOB", &other),
        }
    }
}

impl FieldType for Vec<u8> {
    const SQL_TYPE: SqlType = SqlType::Blob;
}

impl<T: ToSqlValue> ToSqlValue for Option<T> {
    fn to_sql_value(self) -> SqlValue {
        match self {
            Some(v) => v.to_sql_value(),
            None => SqlValue::Null,
        }
    }
}

impl<T: FromSqlValue> FromSqlValue for Option<T> {
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        match value {
            SqlValue::Null => Ok(None),
            other => T::from_sql_value(other).map(Some),
        }
    }
}

impl<T: FieldType> FieldType for Option<T> {
    const SQL_TYPE: SqlType = T::SQL_TYPE;
    const NULLABLE: bool = true;
}

#[cfg(feature = "chrono")]
mod temporal {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

    use super::{mismatch, FieldType, FromSqlValue, SqlType, SqlValue, ToSqlValue};
    use crate::error::{Error, Result};

    const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
    const DATE_FORMAT: &str = "%Y-%m-%d";

    fn unparsable(expected: &'static str) -> Error {
        Error::UnknownFieldType {
            expected,
            found: "unparsable TEXT",
        }
    }

    impl ToSqlValue for NaiveDateTime {
        fn to_sql_value(self) -> SqlValue {
            SqlValue::Text(self.format(DATETIME_FORMAT).to_string())
        }
    }

    impl FromSqlValue for NaiveDateTime {
        fn from_sql_value(value: SqlValue) -> Result<Self> {
            match value {
                SqlValue::Text(s) => Self::parse_from_str(&s, DATETIME_FORMAT)
                    .map_err(|_| unparsable("DATETIME")),
                other => mismatch("DATETIME", &other),
            }
        }
    }

    impl FieldType for NaiveDateTime {
        const SQL_TYPE: SqlType = SqlType::Text;
    }

    impl ToSqlValue for NaiveDate {
        fn to_sql_value(self) -> SqlValue {
            SqlValue::Text(self.format(DATE_FORMAT).to_string())
        }
    }

    impl FromSqlValue for NaiveDate {
        fn from_sql_value(value: SqlValue) -> Result<Self> {
            match value {
                SqlValue::Text(s) => {
                    Self::parse_from_str(&s, DATE_FORMAT).map_err(|_| unparsable("DATE"))
                }
                other => mismatch("DATE", &other),
            }
        }
    }

    impl FieldType for NaiveDate {
        const SQL_TYPE: SqlType = SqlType::Text;
    }

    impl ToSqlValue for DateTime<Utc> {
        fn to_sql_value(self) -> SqlValue {
            SqlValue::Text(self.to_rfc3339())
        }
    }

    impl FromSqlValue for DateTime<Utc> {
        fn from_sql_value(value: SqlValue) -> Result<Self> {
            match value {
                SqlValue::Text(s) => DateTime::parse_from_rfc3339(&s)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|_| unparsable("TIMESTAMP")),
                other => mismatch("TIMESTAMP", &other),
            }
        }
    }

    impl FieldType for DateTime<Utc> {
        const SQL_TYPE: SqlType = SqlType::Text;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_value_inline_null() {
        assert_eq!(SqlValue::Null.to_sql_inline(), "NULL");
    }

    #[test]
    fn test_sql_value_inline_bool() {
        assert_eq!(SqlValue::Bool(true).to_sql_inline(), "1");
        assert_eq!(SqlValue::Bool(false).to_sql_inline(), "0");
    }

    #[test]
    fn test_sql_value_inline_numbers() {
        assert_eq!(SqlValue::Int(-100).to_sql_inline(), "-100");
        assert_eq!(SqlValue::Float(20000.0).to_sql_inline(), "20000.0");
        assert_eq!(SqlValue::Float(0.5).to_sql_inline(), "0.5");
        assert_eq!(SqlValue::Float(f64::NAN).to_sql_inline(), "NULL");
    }

    #[test]
    fn test_sql_value_inline_text_escaping() {
        assert_eq!(
            SqlValue::Text(String::from("O'Brien")).to_sql_inline(),
            "'O''Brien'"
        );
    }

    #[test]
    fn test_sql_value_inline_blob() {
        assert_eq!(
            SqlValue::Blob(vec![0x48, 0x45, 0x4C, 0x4C, 0x4F]).to_sql_inline(),
            "X'48454C4C4F'"
        );
    }

    #[test]
    fn test_null_into_required_field() {
        assert_eq!(i64::from_sql_value(SqlValue::Null), Err(Error::ValueIsNull));
        assert_eq!(String::from_sql_value(SqlValue::Null), Err(Error::ValueIsNull));
        assert_eq!(Option::<i64>::from_sql_value(SqlValue::Null), Ok(None));
    }

    #[test]
    fn test_incompatible_kind() {
        assert_eq!(
            i64::from_sql_value(SqlValue::Text(String::from("x"))),
            Err(Error::UnknownFieldType {
                expected: "INTEGER",
                found: "TEXT",
            })
        );
    }

    #[test]
    fn test_narrow_integer_out_of_range() {
        assert!(matches!(
            u8::from_sql_value(SqlValue::Int(300)),
            Err(Error::UnknownFieldType { expected: "u8", .. })
        ));
        assert_eq!(i32::from_sql_value(SqlValue::Int(-7)), Ok(-7));
    }

    #[test]
    fn test_float_accepts_integer_storage() {
        assert_eq!(f64::from_sql_value(SqlValue::Int(3)), Ok(3.0));
    }

    #[test]
    fn test_field_type_nullability() {
        assert!(!<i64 as FieldType>::NULLABLE);
        assert!(<Option<String> as FieldType>::NULLABLE);
        assert_eq!(<Option<String> as FieldType>::SQL_TYPE, SqlType::Text);
        assert_eq!(<bool as FieldType>::SQL_TYPE, SqlType::Integer);
    }

    #[test]
    fn test_to_sql_value_conversions() {
        assert_eq!(true.to_sql_value(), SqlValue::Bool(true));
        assert_eq!(42_i32.to_sql_value(), SqlValue::Int(42));
        assert_eq!("hello".to_sql_value(), SqlValue::Text(String::from("hello")));
        assert_eq!(None::<i32>.to_sql_value(), SqlValue::Null);
    }

    #[cfg(feature = "chrono")]
    #[test]
    fn test_naive_datetime_text_form() {
        use chrono::NaiveDate;

        let dt = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap();
        let value = dt.to_sql_value();
        assert_eq!(value, SqlValue::Text(String::from("2024-03-01 12:30:00")));
        assert_eq!(chrono::NaiveDateTime::from_sql_value(value), Ok(dt));
    }
}
