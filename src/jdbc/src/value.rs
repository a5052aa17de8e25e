// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::error::Error;

use bytes::BytesMut;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use postgres_types::{FromSql, IsNull, Kind, ToSql, Type};
use rust_decimal::Decimal;

pub mod array;

pub use array::{Elements, NativeArray, PgArray};

/// A value as read from or written to the PostgreSQL driver.
///
/// SQL NULL is represented by `None` wherever an `Option<Value>` appears.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A boolean value.
    Bool(bool),
    /// A 2-byte signed integer.
    Int2(i16),
    /// A 4-byte signed integer.
    Int4(i32),
    /// An 8-byte signed integer.
    Int8(i64),
    /// A 4-byte floating point number.
    Float4(f32),
    /// An 8-byte floating point number.
    Float8(f64),
    /// An arbitrary precision number.
    Numeric(Decimal),
    /// An integer too wide for `Int8`, as produced for unsigned 64-bit
    /// columns.
    BigInteger(i128),
    /// A variable-length string.
    Text(String),
    /// A byte array, i.e., a variable-length binary string.
    Bytea(Vec<u8>),
    /// A date.
    Date(NaiveDate),
    /// A time.
    Time(NaiveTime),
    /// A date and time, without a timezone.
    Timestamp(NaiveDateTime),
    /// A date and time, with a timezone.
    TimestampTz(DateTime<Utc>),
    /// An array read from the driver.
    Array(PgArray),
    /// A primitive array to be sent to the driver.
    NativeArray(NativeArray),
}

impl Value {
    /// The name of this value's kind, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int2(_) => "int2",
            Value::Int4(_) => "int4",
            Value::Int8(_) => "int8",
            Value::Float4(_) => "float4",
            Value::Float8(_) => "float8",
            Value::Numeric(_) => "numeric",
            Value::BigInteger(_) => "biginteger",
            Value::Text(_) => "text",
            Value::Bytea(_) => "bytea",
            Value::Date(_) => "date",
            Value::Time(_) => "time",
            Value::Timestamp(_) => "timestamp",
            Value::TimestampTz(_) => "timestamptz",
            Value::Array(_) => "array",
            Value::NativeArray(_) => "native array",
        }
    }
}

/// Evaluates `$call` with `$inner` bound to a reference to the
/// driver-native representation of `$value`.
macro_rules! with_native {
    ($value:expr, $inner:ident => $call:expr) => {
        match $value {
            Value::Bool($inner) => $call,
            Value::Int2($inner) => $call,
            Value::Int4($inner) => $call,
            Value::Int8($inner) => $call,
            Value::Float4($inner) => $call,
            Value::Float8($inner) => $call,
            Value::Numeric($inner) => $call,
            Value::Text($inner) => $call,
            Value::Bytea($inner) => $call,
            Value::Date($inner) => $call,
            Value::Time($inner) => $call,
            Value::Timestamp($inner) => $call,
            Value::TimestampTz($inner) => $call,
            Value::NativeArray($inner) => $call,
            Value::BigInteger(i) => {
                let $inner = &Decimal::try_from_i128_with_scale(*i, 0)?;
                $call
            }
            Value::Array(array) => {
                let $inner = &array.get_array();
                $call
            }
        }
    };
}

impl ToSql for Value {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + 'static + Send + Sync>> {
        with_native!(self, v => v.to_sql(ty, out))
    }

    // Whether a type is accepted depends on the variant, which
    // `to_sql_checked` asks the native representation about.
    fn accepts(_: &Type) -> bool {
        true
    }

    fn to_sql_checked(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + 'static + Send + Sync>> {
        with_native!(self, v => v.to_sql_checked(ty, out))
    }
}

impl<'a> FromSql<'a> for Value {
    fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<Value, Box<dyn Error + Sync + Send>> {
        if let Kind::Array(_) = ty.kind() {
            return PgArray::from_sql(ty, raw).map(Value::Array);
        }
        match *ty {
            Type::BOOL => bool::from_sql(ty, raw).map(Value::Bool),
            Type::INT2 => i16::from_sql(ty, raw).map(Value::Int2),
            Type::INT4 => i32::from_sql(ty, raw).map(Value::Int4),
            Type::INT8 => i64::from_sql(ty, raw).map(Value::Int8),
            Type::FLOAT4 => f32::from_sql(ty, raw).map(Value::Float4),
            Type::FLOAT8 => f64::from_sql(ty, raw).map(Value::Float8),
            Type::NUMERIC => Decimal::from_sql(ty, raw).map(Value::Numeric),
            Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME => {
                String::from_sql(ty, raw).map(Value::Text)
            }
            Type::BYTEA => Vec::<u8>::from_sql(ty, raw).map(Value::Bytea),
            Type::DATE => NaiveDate::from_sql(ty, raw).map(Value::Date),
            Type::TIME => NaiveTime::from_sql(ty, raw).map(Value::Time),
            Type::TIMESTAMP => NaiveDateTime::from_sql(ty, raw).map(Value::Timestamp),
            Type::TIMESTAMPTZ => DateTime::<Utc>::from_sql(ty, raw).map(Value::TimestampTz),
            _ => Err(format!("reading values of type {} is not supported", ty).into()),
        }
    }

    fn accepts(ty: &Type) -> bool {
        match ty.kind() {
            Kind::Array(member) => <Value as FromSql>::accepts(member),
            _ => matches!(
                *ty,
                Type::BOOL
                    | Type::INT2
                    | Type::INT4
                    | Type::INT8
                    | Type::FLOAT4
                    | Type::FLOAT8
                    | Type::NUMERIC
                    | Type::TEXT
                    | Type::VARCHAR
                    | Type::BPCHAR
                    | Type::NAME
                    | Type::BYTEA
                    | Type::DATE
                    | Type::TIME
                    | Type::TIMESTAMP
                    | Type::TIMESTAMPTZ
            ),
        }
    }
}
