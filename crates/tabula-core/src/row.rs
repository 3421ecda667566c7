//! Conversion of ad-hoc result rows.

use crate::error::{Error, Result};
use crate::value::{FromSqlValue, SqlValue};

/// A value that can be built from one row of an ad-hoc SELECT.
///
/// Implemented for tuples of up to six [`FromSqlValue`] elements and for
/// `Vec<SqlValue>` (any width).
pub trait FromRow: Sized {
    /// Builds `Self` from the row's values, in column order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ColumnCountMismatch`] when the row width does not
    /// match, or the conversion error of the first failing element.
    fn from_row(values: Vec<SqlValue>) -> Result<Self>;
}

impl FromRow for Vec<SqlValue> {
    fn from_row(values: Vec<SqlValue>) -> Result<Self> {
        Ok(values)
    }
}

macro_rules! impl_from_row_tuple {
    ($len:expr; $($name:ident),+) => {
        impl<$($name: FromSqlValue),+> FromRow for ($($name,)+) {
            fn from_row(values: Vec<SqlValue>) -> Result<Self> {
                if values.len() != $len {
                    return Err(Error::ColumnCountMismatch {
                        expected: $len,
                        actual: values.len(),
                    });
                }
                let mut values = values.into_iter();
                Ok(($(
                    $name::from_sql_value(values.next().unwrap_or(SqlValue::Null))?,
                )+))
            }
        }
    };
}

impl_from_row_tuple!(1; A);
impl_from_row_tuple!(2; A, B);
impl_from_row_tuple!(3; A, B, C);
impl_from_row_tuple!(4; A, B, C, D);
impl_from_row_tuple!(5; A, B, C, D, E);
impl_from_row_tuple!(6; A, B, C, D, E, F);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tuple_from_row() {
        let row = vec![SqlValue::Text("Paul".into()), SqlValue::Float(20000.0)];
        let (name, salary) = <(String, f64)>::from_row(row).unwrap();
        assert_eq!(name, "Paul");
        assert!((salary - 20000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tuple_width_mismatch() {
        let err = <(i64, i64)>::from_row(vec![SqlValue::Int(1)]).unwrap_err();
        assert_eq!(
            err,
            Error::ColumnCountMismatch {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_nullable_element() {
        let (value,) = <(Option<String>,)>::from_row(vec![SqlValue::Null]).unwrap();
        assert_eq!(value, None);
    }
}
