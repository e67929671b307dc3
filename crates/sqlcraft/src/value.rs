//! Owned argument values.
//!
//! Built statements carry their arguments as [`Value`]s in placeholder order.
//! With the `postgres` feature, `Value` implements `tokio_postgres`'s `ToSql`
//! so [`BuiltQuery::params_ref`](crate::BuiltQuery::params_ref) can be handed
//! to a client as-is.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A bound parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
    /// JSON object (other JSON shapes convert to the matching scalar variant).
    Json(serde_json::Value),
    /// List argument, e.g. the right-hand side of `IN`.
    Array(Vec<Value>),
}

impl Value {
    /// Raw byte payload.
    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Value::Bytes(bytes.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Int(i64::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u16, u32);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map_or(Value::Null, Value::Float),
            },
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            obj @ serde_json::Value::Object(_) => Value::Json(obj),
        }
    }
}

#[cfg(feature = "postgres")]
mod pg {
    use super::Value;
    use bytes::BytesMut;
    use std::error::Error;
    use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};

    impl ToSql for Value {
        fn to_sql(
            &self,
            ty: &Type,
            out: &mut BytesMut,
        ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
            // Each arm checks `ty` against its own Rust type, so a mismatch is
            // reported as `WrongType` instead of being encoded.
            match self {
                Value::Null => Ok(IsNull::Yes),
                Value::Bool(v) => v.to_sql_checked(ty, out),
                Value::Int(v) => {
                    if *ty == Type::INT2 {
                        i16::try_from(*v)?.to_sql_checked(ty, out)
                    } else if *ty == Type::INT4 {
                        i32::try_from(*v)?.to_sql_checked(ty, out)
                    } else {
                        v.to_sql_checked(ty, out)
                    }
                }
                Value::Float(v) => {
                    if *ty == Type::FLOAT4 {
                        narrow_f32(*v)?.to_sql_checked(ty, out)
                    } else {
                        v.to_sql_checked(ty, out)
                    }
                }
                Value::Text(v) => v.to_sql_checked(ty, out),
                Value::Bytes(v) => v.to_sql_checked(ty, out),
                Value::Uuid(v) => v.to_sql_checked(ty, out),
                Value::Timestamp(v) => v.to_sql_checked(ty, out),
                Value::Json(v) => v.to_sql_checked(ty, out),
                // Only array types pass; elements are checked against the member type.
                Value::Array(items) => items.to_sql_checked(ty, out),
            }
        }

        fn accepts(_ty: &Type) -> bool {
            true
        }

        to_sql_checked!();
    }

    fn narrow_f32(v: f64) -> Result<f32, Box<dyn Error + Sync + Send>> {
        let narrowed = v as f32;
        if v.is_finite() && !narrowed.is_finite() {
            return Err(format!("value {v} out of range for FLOAT4").into());
        }
        Ok(narrowed)
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_scalars() {
        assert_eq!(Value::from(42_i32), Value::Int(42));
        assert_eq!(Value::from(7_u16), Value::Int(7));
        assert_eq!(Value::from(1.5_f64), Value::Float(1.5));
        assert_eq!(Value::from("a"), Value::Text("a".into()));
        assert_eq!(Value::from(true), Value::Bool(true));
    }

    #[test]
    fn from_option() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Text("x".into()));
        assert!(Value::from(None::<String>).is_null());
    }

    #[test]
    fn from_vec_is_array() {
        assert_eq!(
            Value::from(vec![1_i64, 2, 3]),
            Value::Array(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
        );
    }

    #[test]
    fn from_json() {
        let v = serde_json::json!({ "a": 1 });
        assert_eq!(Value::from(v.clone()), Value::Json(v));
        assert_eq!(Value::from(serde_json::json!(42)), Value::Int(42));
        assert_eq!(Value::from(serde_json::json!(2.5)), Value::Float(2.5));
        assert_eq!(Value::from(serde_json::json!("x")), Value::Text("x".into()));
        assert_eq!(
            Value::from(serde_json::json!([1, null])),
            Value::Array(vec![Value::Int(1), Value::Null])
        );
    }

    #[test]
    fn bytes_constructor() {
        assert_eq!(Value::bytes(&b"ab"[..]), Value::Bytes(vec![b'a', b'b']));
    }
}
