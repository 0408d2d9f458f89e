//! Scalar values carried as statement arguments and result cells.
//!
//! [`Value`] is the one type that flows between records, expressions and the
//! connection pool: field bindings read into it, expressions carry it as their
//! right operand, and result rows are decoded into it before being written
//! back through [`FromValue`].

use crate::error::{OrmError, OrmResult};
use bytes::BytesMut;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::error::Error;
use thiserror::Error;
use tokio_postgres::Row;
use tokio_postgres::types::{FromSql, IsNull, ToSql, Type};
use uuid::Uuid;

/// A dynamically typed SQL scalar.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// SQL NULL
    #[default]
    Null,
    Bool(bool),
    Int2(i16),
    Int4(i32),
    Int8(i64),
    Float4(f32),
    Float8(f64),
    Text(String),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
    TimestampTz(DateTime<Utc>),
    Uuid(Uuid),
    Json(serde_json::Value),
}

impl Value {
    /// Short name of the variant, used in conversion errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int2(_) => "int2",
            Value::Int4(_) => "int4",
            Value::Int8(_) => "int8",
            Value::Float4(_) => "float4",
            Value::Float8(_) => "float8",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytea",
            Value::Date(_) => "date",
            Value::Timestamp(_) => "timestamp",
            Value::TimestampTz(_) => "timestamptz",
            Value::Uuid(_) => "uuid",
            Value::Json(_) => "json",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// `NULL` or the empty string: neither can stand as a comparison operand.
    pub(crate) fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Decode column `idx` of a `tokio_postgres` row based on its Postgres type.
    pub fn decode(row: &Row, idx: usize) -> OrmResult<Self> {
        let column = row
            .columns()
            .get(idx)
            .ok_or_else(|| OrmError::decode(idx.to_string(), "column index out of range"))?;
        let name = column.name();
        let value = match *column.type_() {
            Type::BOOL => get::<bool>(row, idx, name)?.map(Value::Bool),
            Type::INT2 => get::<i16>(row, idx, name)?.map(Value::Int2),
            Type::INT4 => get::<i32>(row, idx, name)?.map(Value::Int4),
            Type::INT8 => get::<i64>(row, idx, name)?.map(Value::Int8),
            Type::FLOAT4 => get::<f32>(row, idx, name)?.map(Value::Float4),
            Type::FLOAT8 => get::<f64>(row, idx, name)?.map(Value::Float8),
            Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME => {
                get::<String>(row, idx, name)?.map(Value::Text)
            }
            Type::BYTEA => get::<Vec<u8>>(row, idx, name)?.map(Value::Bytes),
            Type::DATE => get::<NaiveDate>(row, idx, name)?.map(Value::Date),
            Type::TIMESTAMP => get::<NaiveDateTime>(row, idx, name)?.map(Value::Timestamp),
            Type::TIMESTAMPTZ => get::<DateTime<Utc>>(row, idx, name)?.map(Value::TimestampTz),
            Type::UUID => get::<Uuid>(row, idx, name)?.map(Value::Uuid),
            Type::JSON | Type::JSONB => get::<serde_json::Value>(row, idx, name)?.map(Value::Json),
            ref other => {
                return Err(OrmError::decode(
                    name,
                    format!("unsupported column type '{other}'"),
                ));
            }
        };
        Ok(value.unwrap_or(Value::Null))
    }

    /// Decode every column of a row, in column order.
    pub fn decode_row(row: &Row) -> OrmResult<Vec<Self>> {
        (0..row.len()).map(|idx| Value::decode(row, idx)).collect()
    }
}

fn get<T>(row: &Row, idx: usize, name: &str) -> OrmResult<Option<T>>
where
    T: for<'a> FromSql<'a>,
{
    row.try_get::<_, Option<T>>(idx)
        .map_err(|e| OrmError::decode(name, e.to_string()))
}

impl ToSql for Value {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(v) => v.to_sql_checked(ty, out),
            Value::Int2(v) => encode_int(i64::from(*v), ty, out),
            Value::Int4(v) => encode_int(i64::from(*v), ty, out),
            Value::Int8(v) => encode_int(*v, ty, out),
            Value::Float4(v) => encode_float(f64::from(*v), ty, out),
            Value::Float8(v) => encode_float(*v, ty, out),
            Value::Text(v) => v.to_sql_checked(ty, out),
            Value::Bytes(v) => v.to_sql_checked(ty, out),
            Value::Date(v) => v.to_sql_checked(ty, out),
            Value::Timestamp(v) => v.to_sql_checked(ty, out),
            Value::TimestampTz(v) => v.to_sql_checked(ty, out),
            Value::Uuid(v) => v.to_sql_checked(ty, out),
            Value::Json(v) => v.to_sql_checked(ty, out),
        }
    }

    // The inner scalar performs the real type check in `to_sql_checked`.
    fn accepts(_ty: &Type) -> bool {
        true
    }

    tokio_postgres::types::to_sql_checked!();
}

/// Integers bind to whichever integer width Postgres inferred for the parameter.
fn encode_int(
    v: i64,
    ty: &Type,
    out: &mut BytesMut,
) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
    match *ty {
        Type::INT2 => i16::try_from(v)?.to_sql(ty, out),
        Type::INT4 => i32::try_from(v)?.to_sql(ty, out),
        Type::INT8 => v.to_sql(ty, out),
        _ => v.to_sql_checked(ty, out),
    }
}

fn encode_float(
    v: f64,
    ty: &Type,
    out: &mut BytesMut,
) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
    match *ty {
        Type::FLOAT4 => (v as f32).to_sql(ty, out),
        _ => v.to_sql_checked(ty, out),
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_scalar! {
    bool => Bool,
    i16 => Int2,
    i32 => Int4,
    i64 => Int8,
    f32 => Float4,
    f64 => Float8,
    String => Text,
    Vec<u8> => Bytes,
    NaiveDate => Date,
    NaiveDateTime => Timestamp,
    DateTime<Utc> => TimestampTz,
    Uuid => Uuid,
    serde_json::Value => Json,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// A [`Value`] could not be converted into the requested Rust type.
#[derive(Debug, Clone, Error)]
#[error("cannot convert {found} value into {expected}")]
pub struct ValueError {
    pub expected: &'static str,
    pub found: &'static str,
}

impl ValueError {
    fn new(expected: &'static str, found: &Value) -> Self {
        Self {
            expected,
            found: found.kind(),
        }
    }
}

/// Conversion from a [`Value`] into a record field type.
///
/// Implemented for every scalar `Value` can hold and for `Option<T>`, which
/// maps `NULL` to `None`. Derived records call this when a result row is
/// written back into a field.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, ValueError>;
}

macro_rules! impl_from_value {
    ($($ty:ty => $variant:ident as $name:literal),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self, ValueError> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(ValueError::new($name, &other)),
                    }
                }
            }
        )*
    };
}

impl_from_value! {
    bool => Bool as "bool",
    String => Text as "String",
    Vec<u8> => Bytes as "Vec<u8>",
    NaiveDate => Date as "NaiveDate",
    NaiveDateTime => Timestamp as "NaiveDateTime",
    DateTime<Utc> => TimestampTz as "DateTime<Utc>",
    Uuid => Uuid as "Uuid",
}

macro_rules! impl_from_value_int {
    ($($ty:ty as $name:literal),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self, ValueError> {
                    let wide = match value {
                        Value::Int2(v) => i64::from(v),
                        Value::Int4(v) => i64::from(v),
                        Value::Int8(v) => v,
                        ref other => return Err(ValueError::new($name, other)),
                    };
                    <$ty>::try_from(wide).map_err(|_| ValueError::new($name, &value))
                }
            }
        )*
    };
}

impl_from_value_int! {
    i16 as "i16",
    i32 as "i32",
    i64 as "i64",
}

impl FromValue for f32 {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Float4(v) => Ok(v),
            Value::Float8(v) if !v.is_finite() || v.abs() <= f64::from(f32::MAX) => Ok(v as f32),
            other => Err(ValueError::new("f32", &other)),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Float4(v) => Ok(f64::from(v)),
            Value::Float8(v) => Ok(v),
            other => Err(ValueError::new("f64", &other)),
        }
    }
}

impl FromValue for serde_json::Value {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Json(v) => Ok(v),
            Value::Null => Ok(serde_json::Value::Null),
            other => Err(ValueError::new("serde_json::Value", &other)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_maps_to_null() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some("a")), Value::Text("a".into()));
    }

    #[test]
    fn integers_widen_and_narrow() {
        assert_eq!(i64::from_value(Value::Int4(7)).unwrap(), 7);
        assert_eq!(i32::from_value(Value::Int8(7)).unwrap(), 7);
        assert!(i16::from_value(Value::Int8(i64::from(i32::MAX))).is_err());
    }

    #[test]
    fn floats_widen_and_narrow() {
        assert_eq!(f64::from_value(Value::Float4(0.5)).unwrap(), 0.5);
        assert_eq!(f32::from_value(Value::Float8(1.5)).unwrap(), 1.5);
        assert!(f32::from_value(Value::Float8(f64::MAX)).is_err());
        assert!(f32::from_value(Value::Float8(f64::INFINITY)).unwrap().is_infinite());
    }

    #[test]
    fn null_into_plain_field_is_rejected() {
        let err = i32::from_value(Value::Null).unwrap_err();
        assert_eq!(err.to_string(), "cannot convert null value into i32");
        assert_eq!(Option::<i32>::from_value(Value::Null).unwrap(), None);
    }

    #[test]
    fn blank_values() {
        assert!(Value::Null.is_blank());
        assert!(Value::Text(String::new()).is_blank());
        assert!(!Value::Int4(0).is_blank());
        assert!(!Value::Bool(false).is_blank());
    }

    #[test]
    fn int_encodes_to_inferred_width() {
        let mut out = BytesMut::new();
        Value::Int4(5).to_sql_checked(&Type::INT8, &mut out).unwrap();
        assert_eq!(&out[..], &5i64.to_be_bytes());

        let mut out = BytesMut::new();
        assert!(Value::Int8(i64::MAX).to_sql_checked(&Type::INT4, &mut out).is_err());
    }

    #[test]
    fn text_rejects_integer_parameter() {
        let mut out = BytesMut::new();
        assert!(Value::Text("x".into()).to_sql_checked(&Type::INT4, &mut out).is_err());
    }
}
