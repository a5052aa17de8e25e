// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Logical types of the internal row format.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The root tag of a [`LogicalType`].
///
/// Every logical type has exactly one root. Codec tables dispatch on the root
/// and consult the full [`LogicalType`] only for parameters such as decimal
/// precision or an array's element type.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum LogicalTypeRoot {
    Null,
    Boolean,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Float,
    Double,
    Decimal,
    Char,
    VarChar,
    Binary,
    VarBinary,
    Date,
    TimeWithoutTimeZone,
    TimestampWithoutTimeZone,
    TimestampWithTimeZone,
    TimestampWithLocalTimeZone,
    IntervalYearMonth,
    IntervalDayTime,
    Array,
    Multiset,
    Map,
    Row,
    Raw,
}

/// The semantic type of a column in the internal row format.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalType {
    /// The type of a column that only ever holds NULL.
    Null,
    Boolean,
    /// A 1-byte signed integer.
    TinyInt,
    /// A 2-byte signed integer.
    SmallInt,
    /// A 4-byte signed integer.
    Integer,
    /// An 8-byte signed integer.
    BigInt,
    /// A 4-byte floating point number.
    Float,
    /// An 8-byte floating point number.
    Double,
    /// An exact decimal number with `precision` total digits, `scale` of
    /// which follow the decimal point.
    Decimal { precision: u8, scale: u8 },
    /// A fixed-length string.
    Char { length: u32 },
    /// A variable-length string.
    VarChar { length: u32 },
    /// A fixed-length byte string.
    Binary { length: u32 },
    /// A variable-length byte string.
    VarBinary { length: u32 },
    Date,
    /// A time of day with fractional seconds `precision`.
    Time { precision: u8 },
    /// A date and time, without a time zone.
    Timestamp { precision: u8 },
    /// A date and time, with a time zone.
    TimestampTz { precision: u8 },
    /// A date and time interpreted in the session time zone.
    TimestampLtz { precision: u8 },
    /// An interval measured in months.
    IntervalYearMonth,
    /// An interval measured in milliseconds.
    IntervalDayTime,
    /// A sequence of values of the element type.
    Array(Box<LogicalType>),
    /// A bag of values of the element type.
    Multiset(Box<LogicalType>),
    Map {
        key: Box<LogicalType>,
        value: Box<LogicalType>,
    },
    /// A nested row.
    Row(Vec<RowField>),
    /// An opaque, serialized value.
    Raw,
}

impl LogicalType {
    /// The maximum length of a `VARCHAR` or `VARBINARY`. Types with this
    /// length render as `STRING` and `BYTES`.
    pub const MAX_LENGTH: u32 = i32::MAX.unsigned_abs();

    /// Returns the root tag of this type.
    pub fn root(&self) -> LogicalTypeRoot {
        match self {
            LogicalType::Null => LogicalTypeRoot::Null,
            LogicalType::Boolean => LogicalTypeRoot::Boolean,
            LogicalType::TinyInt => LogicalTypeRoot::TinyInt,
            LogicalType::SmallInt => LogicalTypeRoot::SmallInt,
            LogicalType::Integer => LogicalTypeRoot::Integer,
            LogicalType::BigInt => LogicalTypeRoot::BigInt,
            LogicalType::Float => LogicalTypeRoot::Float,
            LogicalType::Double => LogicalTypeRoot::Double,
            LogicalType::Decimal { .. } => LogicalTypeRoot::Decimal,
            LogicalType::Char { .. } => LogicalTypeRoot::Char,
            LogicalType::VarChar { .. } => LogicalTypeRoot::VarChar,
            LogicalType::Binary { .. } => LogicalTypeRoot::Binary,
            LogicalType::VarBinary { .. } => LogicalTypeRoot::VarBinary,
            LogicalType::Date => LogicalTypeRoot::Date,
            LogicalType::Time { .. } => LogicalTypeRoot::TimeWithoutTimeZone,
            LogicalType::Timestamp { .. } => LogicalTypeRoot::TimestampWithoutTimeZone,
            LogicalType::TimestampTz { .. } => LogicalTypeRoot::TimestampWithTimeZone,
            LogicalType::TimestampLtz { .. } => LogicalTypeRoot::TimestampWithLocalTimeZone,
            LogicalType::IntervalYearMonth => LogicalTypeRoot::IntervalYearMonth,
            LogicalType::IntervalDayTime => LogicalTypeRoot::IntervalDayTime,
            LogicalType::Array(_) => LogicalTypeRoot::Array,
            LogicalType::Multiset(_) => LogicalTypeRoot::Multiset,
            LogicalType::Map { .. } => LogicalTypeRoot::Map,
            LogicalType::Row(_) => LogicalTypeRoot::Row,
            LogicalType::Raw => LogicalTypeRoot::Raw,
        }
    }

    /// Returns the element type of an `ARRAY` or `MULTISET`.
    pub fn element_type(&self) -> Option<&LogicalType> {
        match self {
            LogicalType::Array(element) | LogicalType::Multiset(element) => Some(element),
            _ => None,
        }
    }

    /// Returns the class of [`Datum`](crate::Datum) that stores values of
    /// this type in the internal row format.
    pub fn internal_class(&self) -> InternalClass {
        match self {
            LogicalType::Char { .. } | LogicalType::VarChar { .. } => InternalClass::String,
            LogicalType::Boolean => InternalClass::Boolean,
            LogicalType::Binary { .. } | LogicalType::VarBinary { .. } => InternalClass::Binary,
            LogicalType::Decimal { .. } => InternalClass::Decimal,
            LogicalType::TinyInt => InternalClass::Byte,
            LogicalType::SmallInt => InternalClass::Short,
            LogicalType::Integer
            | LogicalType::Date
            | LogicalType::Time { .. }
            | LogicalType::IntervalYearMonth => InternalClass::Int,
            LogicalType::BigInt | LogicalType::IntervalDayTime => InternalClass::Long,
            LogicalType::Float => InternalClass::Float,
            LogicalType::Double => InternalClass::Double,
            LogicalType::Timestamp { .. }
            | LogicalType::TimestampTz { .. }
            | LogicalType::TimestampLtz { .. } => InternalClass::Timestamp,
            LogicalType::Array(_) => InternalClass::Array,
            LogicalType::Multiset(_) | LogicalType::Map { .. } => InternalClass::Map,
            LogicalType::Row(_) => InternalClass::Row,
            LogicalType::Raw => InternalClass::Raw,
            LogicalType::Null => InternalClass::Object,
        }
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LogicalType::Null => f.write_str("NULL"),
            LogicalType::Boolean => f.write_str("BOOLEAN"),
            LogicalType::TinyInt => f.write_str("TINYINT"),
            LogicalType::SmallInt => f.write_str("SMALLINT"),
            LogicalType::Integer => f.write_str("INT"),
            LogicalType::BigInt => f.write_str("BIGINT"),
            LogicalType::Float => f.write_str("FLOAT"),
            LogicalType::Double => f.write_str("DOUBLE"),
            LogicalType::Decimal { precision, scale } => {
                write!(f, "DECIMAL({}, {})", precision, scale)
            }
            LogicalType::Char { length } => write!(f, "CHAR({})", length),
            LogicalType::VarChar { length } if *length == Self::MAX_LENGTH => {
                f.write_str("STRING")
            }
            LogicalType::VarChar { length } => write!(f, "VARCHAR({})", length),
            LogicalType::Binary { length } => write!(f, "BINARY({})", length),
            LogicalType::VarBinary { length } if *length == Self::MAX_LENGTH => {
                f.write_str("BYTES")
            }
            LogicalType::VarBinary { length } => write!(f, "VARBINARY({})", length),
            LogicalType::Date => f.write_str("DATE"),
            LogicalType::Time { precision } => write!(f, "TIME({})", precision),
            LogicalType::Timestamp { precision } => write!(f, "TIMESTAMP({})", precision),
            LogicalType::TimestampTz { precision } => {
                write!(f, "TIMESTAMP({}) WITH TIME ZONE", precision)
            }
            LogicalType::TimestampLtz { precision } => {
                write!(f, "TIMESTAMP_LTZ({})", precision)
            }
            LogicalType::IntervalYearMonth => f.write_str("INTERVAL YEAR TO MONTH"),
            LogicalType::IntervalDayTime => f.write_str("INTERVAL DAY TO SECOND(3)"),
            LogicalType::Array(element) => write!(f, "ARRAY<{}>", element),
            LogicalType::Multiset(element) => write!(f, "MULTISET<{}>", element),
            LogicalType::Map { key, value } => write!(f, "MAP<{}, {}>", key, value),
            LogicalType::Row(fields) => {
                f.write_str("ROW<")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "`{}` {}", field.name, field.typ)?;
                }
                f.write_str(">")
            }
            LogicalType::Raw => f.write_str("RAW"),
        }
    }
}

/// The class of value that stores a [`LogicalType`] in the internal row
/// format.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum InternalClass {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Decimal,
    String,
    Binary,
    Timestamp,
    Array,
    Map,
    Row,
    Raw,
    /// Any value. Only used for the `NULL` type.
    Object,
}

impl fmt::Display for InternalClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            InternalClass::Boolean => "boolean",
            InternalClass::Byte => "byte",
            InternalClass::Short => "short",
            InternalClass::Int => "int",
            InternalClass::Long => "long",
            InternalClass::Float => "float",
            InternalClass::Double => "double",
            InternalClass::Decimal => "decimal",
            InternalClass::String => "string",
            InternalClass::Binary => "binary",
            InternalClass::Timestamp => "timestamp",
            InternalClass::Array => "array",
            InternalClass::Map => "map",
            InternalClass::Row => "row",
            InternalClass::Raw => "raw",
            InternalClass::Object => "object",
        };
        f.write_str(name)
    }
}

/// A named field of a [`RowType`] or of a nested [`LogicalType::Row`].
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct RowField {
    pub name: String,
    #[serde(rename = "type")]
    pub typ: LogicalType,
}

impl RowField {
    pub fn new(name: impl Into<String>, typ: LogicalType) -> RowField {
        RowField {
            name: name.into(),
            typ,
        }
    }
}

/// The type of a row: an ordered list of named fields.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct RowType {
    pub fields: Vec<RowField>,
}

impl RowType {
    pub fn new(fields: Vec<RowField>) -> RowType {
        RowType { fields }
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Returns the type of the field at position `i`.
    pub fn type_at(&self, i: usize) -> Option<&LogicalType> {
        self.fields.get(i).map(|field| &field.typ)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }
}
