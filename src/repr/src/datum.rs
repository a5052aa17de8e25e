// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::{ArrayData, DecimalData, InternalClass, RowData, TimestampData};

/// A single value in the internal row format.
///
/// Several logical types share a representation: `DATE` is an [`Datum::Int`]
/// counting days since 1970-01-01, `TIME` is an [`Datum::Int`] counting
/// milliseconds since midnight, `INTERVAL YEAR TO MONTH` is an
/// [`Datum::Int`] counting months, and `INTERVAL DAY TO SECOND` is a
/// [`Datum::BigInt`] counting milliseconds.
#[derive(Clone, Debug, PartialEq)]
pub enum Datum {
    /// An unknown value.
    Null,
    Boolean(bool),
    TinyInt(i8),
    SmallInt(i16),
    Int(i32),
    BigInt(i64),
    Float(f32),
    Double(f64),
    Decimal(DecimalData),
    String(String),
    Binary(Vec<u8>),
    Timestamp(TimestampData),
    Array(ArrayData),
    Row(RowData),
}

impl Datum {
    /// Reports whether this datum is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Datum::Null)
    }

    /// Returns the class of this datum, or `None` for [`Datum::Null`], which
    /// belongs to every class.
    pub fn class(&self) -> Option<InternalClass> {
        let class = match self {
            Datum::Null => return None,
            Datum::Boolean(_) => InternalClass::Boolean,
            Datum::TinyInt(_) => InternalClass::Byte,
            Datum::SmallInt(_) => InternalClass::Short,
            Datum::Int(_) => InternalClass::Int,
            Datum::BigInt(_) => InternalClass::Long,
            Datum::Float(_) => InternalClass::Float,
            Datum::Double(_) => InternalClass::Double,
            Datum::Decimal(_) => InternalClass::Decimal,
            Datum::String(_) => InternalClass::String,
            Datum::Binary(_) => InternalClass::Binary,
            Datum::Timestamp(_) => InternalClass::Timestamp,
            Datum::Array(_) => InternalClass::Array,
            Datum::Row(_) => InternalClass::Row,
        };
        Some(class)
    }

    /// A short name for the kind of this datum, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Datum::Null => "null",
            Datum::Boolean(_) => "boolean",
            Datum::TinyInt(_) => "tinyint",
            Datum::SmallInt(_) => "smallint",
            Datum::Int(_) => "int",
            Datum::BigInt(_) => "bigint",
            Datum::Float(_) => "float",
            Datum::Double(_) => "double",
            Datum::Decimal(_) => "decimal",
            Datum::String(_) => "string",
            Datum::Binary(_) => "binary",
            Datum::Timestamp(_) => "timestamp",
            Datum::Array(_) => "array",
            Datum::Row(_) => "row",
        }
    }
}

impl From<bool> for Datum {
    fn from(b: bool) -> Datum {
        Datum::Boolean(b)
    }
}

impl From<i8> for Datum {
    fn from(i: i8) -> Datum {
        Datum::TinyInt(i)
    }
}

impl From<i16> for Datum {
    fn from(i: i16) -> Datum {
        Datum::SmallInt(i)
    }
}

impl From<i32> for Datum {
    fn from(i: i32) -> Datum {
        Datum::Int(i)
    }
}

impl From<i64> for Datum {
    fn from(i: i64) -> Datum {
        Datum::BigInt(i)
    }
}

impl From<f32> for Datum {
    fn from(f: f32) -> Datum {
        Datum::Float(f)
    }
}

impl From<f64> for Datum {
    fn from(f: f64) -> Datum {
        Datum::Double(f)
    }
}

impl From<&str> for Datum {
    fn from(s: &str) -> Datum {
        Datum::String(s.to_owned())
    }
}

impl From<String> for Datum {
    fn from(s: String) -> Datum {
        Datum::String(s)
    }
}

impl From<DecimalData> for Datum {
    fn from(d: DecimalData) -> Datum {
        Datum::Decimal(d)
    }
}

impl From<TimestampData> for Datum {
    fn from(ts: TimestampData) -> Datum {
        Datum::Timestamp(ts)
    }
}

impl From<ArrayData> for Datum {
    fn from(array: ArrayData) -> Datum {
        Datum::Array(array)
    }
}

impl<T> From<Option<T>> for Datum
where
    Datum: From<T>,
{
    fn from(o: Option<T>) -> Datum {
        match o {
            Some(d) => d.into(),
            None => Datum::Null,
        }
    }
}
