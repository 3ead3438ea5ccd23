use crate::{Error, Fault, Result};
use std::{
    any::{Any, type_name},
    fmt::{self, Display},
};

/// A column value.
///
/// With `None` inside, a variant is the prototype describing a column type: `Value::Int32(None)`
/// is "an INTEGER column". `Value::Null` as a prototype means the declared Rust type is not
/// one the binder and the hydrator know how to move.
#[derive(Default, Debug, Clone)]
pub enum Value {
    #[default]
    Null,
    Boolean(Option<bool>),
    Int8(Option<i8>),
    Int16(Option<i16>),
    Int32(Option<i32>),
    Int64(Option<i64>),
    Float32(Option<f32>),
    Float64(Option<f64>),
    Varchar(Option<String>),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Boolean(l), Self::Boolean(r)) => l == r,
            (Self::Int8(l), Self::Int8(r)) => l == r,
            (Self::Int16(l), Self::Int16(r)) => l == r,
            (Self::Int32(l), Self::Int32(r)) => l == r,
            (Self::Int64(l), Self::Int64(r)) => l == r,
            (Self::Float32(l), Self::Float32(r)) => l == r,
            (Self::Float64(l), Self::Float64(r)) => l == r,
            (Self::Varchar(l), Self::Varchar(r)) => l == r,
            _ => core::mem::discriminant(self) == core::mem::discriminant(other),
        }
    }
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(
            self,
            Value::Null
                | Value::Boolean(None)
                | Value::Int8(None)
                | Value::Int16(None)
                | Value::Int32(None)
                | Value::Int64(None)
                | Value::Float32(None)
                | Value::Float64(None)
                | Value::Varchar(None)
        )
    }

    /// Whether this prototype names one of the supported column types.
    pub fn is_supported(&self) -> bool {
        !matches!(self, Value::Null)
    }

    pub fn same_type(&self, other: &Self) -> bool {
        core::mem::discriminant(self) == core::mem::discriminant(other)
    }

    /// SQL name of the type this value belongs to.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Boolean(..) => "BOOLEAN",
            Value::Int8(..) => "TINYINT",
            Value::Int16(..) => "SMALLINT",
            Value::Int32(..) => "INTEGER",
            Value::Int64(..) => "BIGINT",
            Value::Float32(..) => "FLOAT",
            Value::Float64(..) => "DOUBLE",
            Value::Varchar(..) => "VARCHAR",
        }
    }

    /// Same type, no value.
    pub fn as_null(&self) -> Value {
        match self {
            Value::Null => Value::Null,
            Value::Boolean(..) => Value::Boolean(None),
            Value::Int8(..) => Value::Int8(None),
            Value::Int16(..) => Value::Int16(None),
            Value::Int32(..) => Value::Int32(None),
            Value::Int64(..) => Value::Int64(None),
            Value::Float32(..) => Value::Float32(None),
            Value::Float64(..) => Value::Float64(None),
            Value::Varchar(..) => Value::Varchar(None),
        }
    }

    /// The canonical zero of the type: `0`, `0.0`, `false` or the empty string.
    pub fn zero(&self) -> Value {
        match self {
            Value::Null => Value::Null,
            Value::Boolean(..) => Value::Boolean(Some(false)),
            Value::Int8(..) => Value::Int8(Some(0)),
            Value::Int16(..) => Value::Int16(Some(0)),
            Value::Int32(..) => Value::Int32(Some(0)),
            Value::Int64(..) => Value::Int64(Some(0)),
            Value::Float32(..) => Value::Float32(Some(0.0)),
            Value::Float64(..) => Value::Float64(Some(0.0)),
            Value::Varchar(..) => Value::Varchar(Some(String::new())),
        }
    }

    fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Boolean(Some(v)) => Some(*v as i64),
            Value::Int8(Some(v)) => Some(*v as i64),
            Value::Int16(Some(v)) => Some(*v as i64),
            Value::Int32(Some(v)) => Some(*v as i64),
            Value::Int64(Some(v)) => Some(*v),
            Value::Float32(Some(v)) if v.fract() == 0.0 && v.is_finite() => Some(*v as i64),
            Value::Float64(Some(v)) if v.fract() == 0.0 && v.is_finite() => Some(*v as i64),
            Value::Varchar(Some(v)) => v.trim().parse().ok(),
            _ => None,
        }
    }

    fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float32(Some(v)) => Some(*v as f64),
            Value::Float64(Some(v)) => Some(*v),
            Value::Varchar(Some(v)) => v.trim().parse().ok(),
            _ => self.as_integer().map(|v| v as f64),
        }
    }

    fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(Some(v)) => Some(*v),
            Value::Varchar(Some(v)) => match v.trim() {
                "true" | "TRUE" | "t" | "1" => Some(true),
                "false" | "FALSE" | "f" | "0" => Some(false),
                _ => None,
            },
            _ => self.as_integer().map(|v| v != 0),
        }
    }

    /// Converts into the type of `prototype`.
    ///
    /// Nulls stay null. Integers move between widths only when in range.
    pub fn coerce(self, prototype: &Value) -> Result<Value> {
        if self.is_null() {
            return Ok(prototype.as_null());
        }
        if self.same_type(prototype) {
            return Ok(self);
        }
        let error = || -> Error {
            Fault::ValueConversion {
                from: format!("{:?}", self),
                to: prototype.type_name(),
            }
            .into()
        };
        macro_rules! integer {
            ($variant:path, $ty:ty) => {
                $variant(Some(
                    self.as_integer()
                        .and_then(|v| <$ty>::try_from(v).ok())
                        .ok_or_else(error)?,
                ))
            };
        }
        Ok(match prototype {
            Value::Null => return Err(error()),
            Value::Boolean(..) => Value::Boolean(Some(self.as_boolean().ok_or_else(error)?)),
            Value::Int8(..) => integer!(Value::Int8, i8),
            Value::Int16(..) => integer!(Value::Int16, i16),
            Value::Int32(..) => integer!(Value::Int32, i32),
            Value::Int64(..) => integer!(Value::Int64, i64),
            Value::Float32(..) => Value::Float32(Some(self.as_float().ok_or_else(error)? as f32)),
            Value::Float64(..) => Value::Float64(Some(self.as_float().ok_or_else(error)?)),
            Value::Varchar(..) => Value::Varchar(Some(match &self {
                Value::Boolean(Some(v)) => v.to_string(),
                Value::Int8(Some(v)) => v.to_string(),
                Value::Int16(Some(v)) => v.to_string(),
                Value::Int32(Some(v)) => v.to_string(),
                Value::Int64(Some(v)) => v.to_string(),
                Value::Float32(Some(v)) => v.to_string(),
                Value::Float64(Some(v)) => v.to_string(),
                _ => return Err(error()),
            })),
        })
    }

    /// Builds a value out of an accessor result, the `Box` holding either `T` or `Option<T>`.
    ///
    /// An absent `Option<T>` becomes the zero of the type, never a null.
    pub fn from_erased(prototype: &Value, nullable: bool, value: Box<dyn Any>) -> Result<Value> {
        fn unbox<T: Any + Default>(value: Box<dyn Any>, nullable: bool) -> Result<T> {
            let unboxed = if nullable {
                value
                    .downcast::<Option<T>>()
                    .map(|v| (*v).unwrap_or_default())
            } else {
                value.downcast::<T>().map(|v| *v)
            };
            unboxed.map_err(|_| {
                Fault::ValueConversion {
                    from: "the accessor result".into(),
                    to: type_name::<T>(),
                }
                .into()
            })
        }
        Ok(match prototype {
            Value::Null => {
                return Err(Error::msg(
                    "Cannot build a value for a column without a supported type",
                ));
            }
            Value::Boolean(..) => Value::Boolean(Some(unbox(value, nullable)?)),
            Value::Int8(..) => Value::Int8(Some(unbox(value, nullable)?)),
            Value::Int16(..) => Value::Int16(Some(unbox(value, nullable)?)),
            Value::Int32(..) => Value::Int32(Some(unbox(value, nullable)?)),
            Value::Int64(..) => Value::Int64(Some(unbox(value, nullable)?)),
            Value::Float32(..) => Value::Float32(Some(unbox(value, nullable)?)),
            Value::Float64(..) => Value::Float64(Some(unbox(value, nullable)?)),
            Value::Varchar(..) => Value::Varchar(Some(unbox(value, nullable)?)),
        })
    }

    /// Turns this value into something a writer accessor accepts: `T`, or `Option<T>` when nullable.
    ///
    /// A null fills a non nullable field with the zero of its type.
    pub fn into_erased(self, prototype: &Value, nullable: bool) -> Result<Box<dyn Any>> {
        fn wrap<T: Any + Default>(value: Option<T>, nullable: bool) -> Box<dyn Any> {
            if nullable {
                Box::new(value)
            } else {
                Box::new(value.unwrap_or_default())
            }
        }
        Ok(match self.coerce(prototype)? {
            Value::Null => {
                return Err(Error::msg(
                    "Cannot read a value for a column without a supported type",
                ));
            }
            Value::Boolean(v) => wrap(v, nullable),
            Value::Int8(v) => wrap(v, nullable),
            Value::Int16(v) => wrap(v, nullable),
            Value::Int32(v) => wrap(v, nullable),
            Value::Int64(v) => wrap(v, nullable),
            Value::Float32(v) => wrap(v, nullable),
            Value::Float64(v) => wrap(v, nullable),
            Value::Varchar(v) => wrap(v, nullable),
        })
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            v if v.is_null() => f.write_str("NULL"),
            Value::Boolean(Some(v)) => write!(f, "{}", v),
            Value::Int8(Some(v)) => write!(f, "{}", v),
            Value::Int16(Some(v)) => write!(f, "{}", v),
            Value::Int32(Some(v)) => write!(f, "{}", v),
            Value::Int64(Some(v)) => write!(f, "{}", v),
            Value::Float32(Some(v)) => write!(f, "{}", v),
            Value::Float64(Some(v)) => write!(f, "{}", v),
            Value::Varchar(Some(v)) => write!(f, "'{}'", v.replace('\'', "''")),
            _ => f.write_str("NULL"),
        }
    }
}

macro_rules! impl_from {
    ($source:ty, $into:path) => {
        impl From<$source> for Value {
            fn from(value: $source) -> Self {
                $into(Some(value.into()))
            }
        }
        impl From<Option<$source>> for Value {
            fn from(value: Option<$source>) -> Self {
                $into(value.map(Into::into))
            }
        }
    };
}

impl_from!(bool, Value::Boolean);
impl_from!(i8, Value::Int8);
impl_from!(i16, Value::Int16);
impl_from!(i32, Value::Int32);
impl_from!(i64, Value::Int64);
impl_from!(f32, Value::Float32);
impl_from!(f64, Value::Float64);
impl_from!(String, Value::Varchar);
impl_from!(&str, Value::Varchar);
