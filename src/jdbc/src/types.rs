// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use postgres_types::{Kind, Type};
use rowconv_repr::LogicalType;

/// Returns the PostgreSQL type that a column of type `ty` binds as.
///
/// Typed NULL parameters use this mapping. Types without a PostgreSQL
/// counterpart map to `unknown`.
pub fn pg_type(ty: &LogicalType) -> Type {
    match ty {
        LogicalType::Boolean => Type::BOOL,
        LogicalType::TinyInt | LogicalType::SmallInt => Type::INT2,
        LogicalType::Integer | LogicalType::IntervalYearMonth => Type::INT4,
        LogicalType::BigInt | LogicalType::IntervalDayTime => Type::INT8,
        LogicalType::Float => Type::FLOAT4,
        LogicalType::Double => Type::FLOAT8,
        LogicalType::Decimal { .. } => Type::NUMERIC,
        LogicalType::Char { .. } => Type::BPCHAR,
        LogicalType::VarChar { .. } => Type::VARCHAR,
        LogicalType::Binary { .. } | LogicalType::VarBinary { .. } => Type::BYTEA,
        LogicalType::Date => Type::DATE,
        LogicalType::Time { .. } => Type::TIME,
        LogicalType::Timestamp { .. } => Type::TIMESTAMP,
        LogicalType::TimestampTz { .. } | LogicalType::TimestampLtz { .. } => Type::TIMESTAMPTZ,
        // PostgreSQL arrays are multidimensional under a single type, so
        // nested arrays share their innermost element's array type.
        LogicalType::Array(element) => match pg_type(element) {
            Type::BOOL => Type::BOOL_ARRAY,
            Type::INT2 => Type::INT2_ARRAY,
            Type::INT4 => Type::INT4_ARRAY,
            Type::INT8 => Type::INT8_ARRAY,
            Type::FLOAT4 => Type::FLOAT4_ARRAY,
            Type::FLOAT8 => Type::FLOAT8_ARRAY,
            Type::NUMERIC => Type::NUMERIC_ARRAY,
            Type::BPCHAR => Type::BPCHAR_ARRAY,
            Type::VARCHAR => Type::VARCHAR_ARRAY,
            Type::BYTEA => Type::BYTEA_ARRAY,
            Type::DATE => Type::DATE_ARRAY,
            Type::TIME => Type::TIME_ARRAY,
            Type::TIMESTAMP => Type::TIMESTAMP_ARRAY,
            Type::TIMESTAMPTZ => Type::TIMESTAMPTZ_ARRAY,
            array if matches!(array.kind(), Kind::Array(_)) => array,
            _ => Type::UNKNOWN,
        },
        LogicalType::Null
        | LogicalType::Multiset(_)
        | LogicalType::Map { .. }
        | LogicalType::Row(_)
        | LogicalType::Raw => Type::UNKNOWN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pg_type() {
        assert_eq!(pg_type(&LogicalType::TinyInt), Type::INT2);
        assert_eq!(pg_type(&LogicalType::VarChar { length: 3 }), Type::VARCHAR);
        assert_eq!(
            pg_type(&LogicalType::Array(Box::new(LogicalType::Integer))),
            Type::INT4_ARRAY
        );
        assert_eq!(
            pg_type(&LogicalType::Array(Box::new(LogicalType::Array(Box::new(
                LogicalType::Double
            ))))),
            Type::FLOAT8_ARRAY
        );
        assert_eq!(
            pg_type(&LogicalType::Array(Box::new(LogicalType::Raw))),
            Type::UNKNOWN
        );
        assert_eq!(pg_type(&LogicalType::Null), Type::UNKNOWN);
    }
}
