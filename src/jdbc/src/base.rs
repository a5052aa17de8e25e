// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Codecs for the scalar types every JDBC-style driver supports.

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use postgres_types::Type;
use rowconv_repr::{Datum, DecimalData, LogicalType, TimestampData};

use crate::codec::{write_with, CodecTable, Decoder, Encoder};
use crate::{ConvertError, Value};

/// The number of days from 0001-01-01 to 1970-01-01 in the proleptic
/// Gregorian calendar.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

const MILLIS_PER_SECOND: u32 = 1_000;
const NANOS_PER_MILLI: u32 = 1_000_000;

/// The scalar codec table.
///
/// Composite types (`ARRAY`, `MULTISET`, `MAP`, `ROW`, `RAW`) and
/// `TIMESTAMP WITH LOCAL TIME ZONE` are not supported; asking for a codec
/// for one of them fails with [`ConvertError::UnsupportedType`]. Driver
/// specific tables wrap this one to add support for them.
#[derive(Clone, Copy, Debug, Default)]
pub struct JdbcCodecs;

impl CodecTable for JdbcCodecs {
    fn converter_name(&self) -> &'static str {
        "JDBC"
    }

    fn internal_converter(&self, ty: &LogicalType) -> Result<Decoder, ConvertError> {
        let decoder = match ty {
            LogicalType::Null => Decoder::new(|_| Ok(Datum::Null)),
            LogicalType::Boolean => Decoder::new(|value| match value {
                Value::Bool(b) => Ok(Datum::Boolean(*b)),
                value => Err(ConvertError::value_mismatch("bool", value)),
            }),
            LogicalType::TinyInt => Decoder::new(|value| {
                let i = match value {
                    Value::Int2(i) => i32::from(*i),
                    Value::Int4(i) => *i,
                    value => return Err(ConvertError::value_mismatch("int4", value)),
                };
                i8::try_from(i)
                    .map(Datum::TinyInt)
                    .map_err(|_| out_of_range(i, LogicalType::TinyInt))
            }),
            // Drivers following JDBC 1.0 report small integers as 4-byte
            // integers.
            LogicalType::SmallInt => Decoder::new(|value| match value {
                Value::Int2(i) => Ok(Datum::SmallInt(*i)),
                Value::Int4(i) => i16::try_from(*i)
                    .map(Datum::SmallInt)
                    .map_err(|_| out_of_range(i, LogicalType::SmallInt)),
                value => Err(ConvertError::value_mismatch("int2", value)),
            }),
            LogicalType::Integer | LogicalType::IntervalYearMonth => {
                Decoder::new(|value| match value {
                    Value::Int4(i) => Ok(Datum::Int(*i)),
                    value => Err(ConvertError::value_mismatch("int4", value)),
                })
            }
            LogicalType::BigInt | LogicalType::IntervalDayTime => {
                Decoder::new(|value| match value {
                    Value::Int8(i) => Ok(Datum::BigInt(*i)),
                    value => Err(ConvertError::value_mismatch("int8", value)),
                })
            }
            LogicalType::Float => Decoder::new(|value| match value {
                Value::Float4(f) => Ok(Datum::Float(*f)),
                value => Err(ConvertError::value_mismatch("float4", value)),
            }),
            LogicalType::Double => Decoder::new(|value| match value {
                Value::Float8(f) => Ok(Datum::Double(*f)),
                value => Err(ConvertError::value_mismatch("float8", value)),
            }),
            LogicalType::Decimal { precision, scale } => {
                let (precision, scale) = (*precision, *scale);
                // Values that do not fit the declared precision decode as
                // NULL.
                Decoder::new(move |value| {
                    let decimal = match value {
                        Value::Numeric(d) => DecimalData::from_decimal(*d, precision, scale),
                        // Unsigned 64-bit columns are read into DECIMAL(20, 0).
                        Value::BigInteger(i) => DecimalData::from_parts(*i, 0, precision, scale),
                        value => return Err(ConvertError::value_mismatch("numeric", value)),
                    };
                    Ok(decimal.map_or(Datum::Null, Datum::Decimal))
                })
            }
            LogicalType::Date => Decoder::new(|value| match value {
                Value::Date(d) => Ok(Datum::Int(d.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE)),
                value => Err(ConvertError::value_mismatch("date", value)),
            }),
            LogicalType::Time { .. } => {
                let typ = ty.clone();
                Decoder::new(move |value| match value {
                    Value::Time(t) => {
                        let millis = t.num_seconds_from_midnight() * MILLIS_PER_SECOND
                            + t.nanosecond() / NANOS_PER_MILLI;
                        i32::try_from(millis)
                            .map(Datum::Int)
                            .map_err(|_| out_of_range(t, typ.clone()))
                    }
                    value => Err(ConvertError::value_mismatch("time", value)),
                })
            }
            LogicalType::Timestamp { .. } | LogicalType::TimestampTz { .. } => {
                Decoder::new(|value| match value {
                    Value::Timestamp(ts) => {
                        Ok(Datum::Timestamp(TimestampData::from_naive_datetime(*ts)))
                    }
                    Value::TimestampTz(ts) => Ok(Datum::Timestamp(
                        TimestampData::from_naive_datetime(ts.naive_utc()),
                    )),
                    value => Err(ConvertError::value_mismatch("timestamp", value)),
                })
            }
            LogicalType::Char { .. } | LogicalType::VarChar { .. } => {
                Decoder::new(|value| match value {
                    Value::Text(s) => Ok(Datum::String(s.clone())),
                    value => Err(ConvertError::value_mismatch("text", value)),
                })
            }
            LogicalType::Binary { .. } | LogicalType::VarBinary { .. } => {
                Decoder::new(|value| match value {
                    Value::Bytea(b) => Ok(Datum::Binary(b.clone())),
                    value => Err(ConvertError::value_mismatch("bytea", value)),
                })
            }
            LogicalType::TimestampLtz { .. }
            | LogicalType::Array(_)
            | LogicalType::Multiset(_)
            | LogicalType::Map { .. }
            | LogicalType::Row(_)
            | LogicalType::Raw => return Err(ConvertError::UnsupportedType(ty.clone())),
        };
        Ok(decoder)
    }

    fn external_converter(&self, ty: &LogicalType) -> Result<Encoder, ConvertError> {
        let encoder = match ty {
            LogicalType::Null => {
                Encoder::new(|_, index, sink| sink.set_null(index, &Type::UNKNOWN))
            }
            LogicalType::Boolean => write_with(|datum| match datum {
                Datum::Boolean(b) => Ok(Value::Bool(*b)),
                datum => Err(ConvertError::datum_mismatch("boolean", datum)),
            }),
            LogicalType::TinyInt => write_with(|datum| match datum {
                Datum::TinyInt(i) => Ok(Value::Int2(i16::from(*i))),
                datum => Err(ConvertError::datum_mismatch("tinyint", datum)),
            }),
            LogicalType::SmallInt => write_with(|datum| match datum {
                Datum::SmallInt(i) => Ok(Value::Int2(*i)),
                datum => Err(ConvertError::datum_mismatch("smallint", datum)),
            }),
            LogicalType::Integer | LogicalType::IntervalYearMonth => {
                write_with(|datum| match datum {
                    Datum::Int(i) => Ok(Value::Int4(*i)),
                    datum => Err(ConvertError::datum_mismatch("int", datum)),
                })
            }
            LogicalType::BigInt | LogicalType::IntervalDayTime => {
                write_with(|datum| match datum {
                    Datum::BigInt(i) => Ok(Value::Int8(*i)),
                    datum => Err(ConvertError::datum_mismatch("bigint", datum)),
                })
            }
            LogicalType::Float => write_with(|datum| match datum {
                Datum::Float(f) => Ok(Value::Float4(*f)),
                datum => Err(ConvertError::datum_mismatch("float", datum)),
            }),
            LogicalType::Double => write_with(|datum| match datum {
                Datum::Double(f) => Ok(Value::Float8(*f)),
                datum => Err(ConvertError::datum_mismatch("double", datum)),
            }),
            LogicalType::Char { .. } | LogicalType::VarChar { .. } => {
                write_with(|datum| match datum {
                    Datum::String(s) => Ok(Value::Text(s.clone())),
                    datum => Err(ConvertError::datum_mismatch("string", datum)),
                })
            }
            LogicalType::Binary { .. } | LogicalType::VarBinary { .. } => {
                write_with(|datum| match datum {
                    Datum::Binary(b) => Ok(Value::Bytea(b.clone())),
                    datum => Err(ConvertError::datum_mismatch("binary", datum)),
                })
            }
            LogicalType::Date => write_with(|datum| match datum {
                Datum::Int(days) => days
                    .checked_add(UNIX_EPOCH_DAYS_FROM_CE)
                    .and_then(NaiveDate::from_num_days_from_ce_opt)
                    .map(Value::Date)
                    .ok_or_else(|| out_of_range(days, LogicalType::Date)),
                datum => Err(ConvertError::datum_mismatch("int", datum)),
            }),
            LogicalType::Time { .. } => {
                let typ = ty.clone();
                write_with(move |datum| match datum {
                    Datum::Int(millis) => u32::try_from(*millis)
                        .ok()
                        .and_then(|millis| {
                            NaiveTime::from_num_seconds_from_midnight_opt(
                                millis / MILLIS_PER_SECOND,
                                (millis % MILLIS_PER_SECOND) * NANOS_PER_MILLI,
                            )
                        })
                        .map(Value::Time)
                        .ok_or_else(|| out_of_range(millis, typ.clone())),
                    datum => Err(ConvertError::datum_mismatch("int", datum)),
                })
            }
            LogicalType::Timestamp { .. } => {
                let typ = ty.clone();
                write_with(move |datum| match datum {
                    Datum::Timestamp(ts) => ts
                        .to_naive_datetime()
                        .map(Value::Timestamp)
                        .ok_or_else(|| out_of_range(ts.millisecond(), typ.clone())),
                    datum => Err(ConvertError::datum_mismatch("timestamp", datum)),
                })
            }
            LogicalType::TimestampTz { .. } => {
                let typ = ty.clone();
                write_with(move |datum| match datum {
                    Datum::Timestamp(ts) => ts
                        .to_naive_datetime()
                        .map(|ts| Value::TimestampTz(ts.and_utc()))
                        .ok_or_else(|| out_of_range(ts.millisecond(), typ.clone())),
                    datum => Err(ConvertError::datum_mismatch("timestamp", datum)),
                })
            }
            LogicalType::Decimal { .. } => {
                let typ = ty.clone();
                write_with(move |datum| match datum {
                    Datum::Decimal(d) => d
                        .to_decimal()
                        .map(Value::Numeric)
                        .ok_or_else(|| out_of_range(d, typ.clone())),
                    datum => Err(ConvertError::datum_mismatch("decimal", datum)),
                })
            }
            LogicalType::TimestampLtz { .. }
            | LogicalType::Array(_)
            | LogicalType::Multiset(_)
            | LogicalType::Map { .. }
            | LogicalType::Row(_)
            | LogicalType::Raw => return Err(ConvertError::UnsupportedType(ty.clone())),
        };
        Ok(encoder)
    }
}

fn out_of_range(value: impl ToString, typ: LogicalType) -> ConvertError {
    ConvertError::OutOfRange {
        value: value.to_string(),
        typ,
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::{DateTime, NaiveDateTime, Utc};
    use proptest::prelude::*;
    use rowconv_repr::RowData;
    use rust_decimal::Decimal;

    use crate::{Param, StatementParams};

    use super::*;

    fn decode(ty: &LogicalType, value: Value) -> Result<Datum, ConvertError> {
        JdbcCodecs
            .nullable_internal_converter(ty)
            .unwrap()
            .decode(Some(&value))
    }

    /// Encodes `datum` as a single-field row and returns what was bound.
    fn encode(ty: &LogicalType, datum: Datum) -> Result<Param, ConvertError> {
        let encoder = JdbcCodecs.nullable_external_converter(ty).unwrap();
        let mut params = StatementParams::new(1);
        encoder.encode(&RowData::from(vec![datum]), 0, &mut params)?;
        Ok(params.get(0).cloned().unwrap())
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_decode_scalars() {
        assert_eq!(
            decode(&LogicalType::Boolean, Value::Bool(true)).unwrap(),
            Datum::Boolean(true)
        );
        assert_eq!(
            decode(&LogicalType::Integer, Value::Int4(-3)).unwrap(),
            Datum::Int(-3)
        );
        assert_eq!(
            decode(&LogicalType::IntervalDayTime, Value::Int8(86_400_000)).unwrap(),
            Datum::BigInt(86_400_000)
        );
        assert_eq!(
            decode(&LogicalType::VarChar { length: 8 }, Value::Text("abc".into())).unwrap(),
            Datum::String("abc".into())
        );
        assert_eq!(
            decode(&LogicalType::VarBinary { length: 8 }, Value::Bytea(vec![7])).unwrap(),
            Datum::Binary(vec![7])
        );
        assert_eq!(
            decode(&LogicalType::Date, Value::Date(date(1970, 1, 2))).unwrap(),
            Datum::Int(1)
        );
        assert_eq!(
            decode(&LogicalType::Date, Value::Date(date(1969, 12, 31))).unwrap(),
            Datum::Int(-1)
        );
        assert_eq!(
            decode(
                &LogicalType::Time { precision: 3 },
                Value::Time(NaiveTime::from_hms_milli_opt(1, 0, 0, 250).unwrap())
            )
            .unwrap(),
            Datum::Int(3_600_250)
        );
        assert_eq!(
            decode(&LogicalType::Null, Value::Int4(1)).unwrap(),
            Datum::Null
        );
    }

    #[test]
    fn test_decode_time_of_any_precision() {
        let t = NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).unwrap();
        for precision in [0, 3, 6, 9] {
            let ty = LogicalType::Time { precision };
            assert_eq!(decode(&ty, Value::Time(t)).unwrap(), Datum::Int(86_399_999));
            let err = decode(&ty, Value::Text("23:59".into())).unwrap_err();
            assert_eq!(err.to_string(), "type mismatch: expected time, found text");
        }
    }

    #[test]
    fn test_decode_small_integers() {
        assert_eq!(
            decode(&LogicalType::SmallInt, Value::Int2(12)).unwrap(),
            Datum::SmallInt(12)
        );
        assert_eq!(
            decode(&LogicalType::SmallInt, Value::Int4(-12)).unwrap(),
            Datum::SmallInt(-12)
        );
        assert!(matches!(
            decode(&LogicalType::SmallInt, Value::Int4(40_000)),
            Err(ConvertError::OutOfRange { .. })
        ));
        assert_eq!(
            decode(&LogicalType::TinyInt, Value::Int4(127)).unwrap(),
            Datum::TinyInt(127)
        );
        let err = decode(&LogicalType::TinyInt, Value::Int4(128)).unwrap_err();
        assert_eq!(err.to_string(), "value 128 is out of range for type TINYINT");
    }

    #[test]
    fn test_decode_timestamps() {
        let naive = date(2001, 9, 9).and_hms_milli_opt(1, 46, 40, 5).unwrap();
        let expected = Datum::Timestamp(TimestampData::new(1_000_000_000_005, 0).unwrap());
        assert_eq!(
            decode(&LogicalType::Timestamp { precision: 3 }, Value::Timestamp(naive)).unwrap(),
            expected
        );
        let aware: DateTime<Utc> = naive.and_utc();
        assert_eq!(
            decode(
                &LogicalType::TimestampTz { precision: 3 },
                Value::TimestampTz(aware)
            )
            .unwrap(),
            expected
        );
    }

    #[test]
    fn test_decode_decimal() {
        let ty = LogicalType::Decimal {
            precision: 5,
            scale: 2,
        };
        let value = Value::Numeric(Decimal::from_str("123.456").unwrap());
        let Datum::Decimal(d) = decode(&ty, value).unwrap() else {
            panic!("expected decimal");
        };
        assert_eq!(d.to_string(), "123.46");

        // Too many digits for the declared precision.
        let value = Value::Numeric(Decimal::from_str("12345.6").unwrap());
        assert_eq!(decode(&ty, value).unwrap(), Datum::Null);

        let unsigned = LogicalType::Decimal {
            precision: 20,
            scale: 0,
        };
        let Datum::Decimal(d) = decode(&unsigned, Value::BigInteger(i128::from(u64::MAX))).unwrap()
        else {
            panic!("expected decimal");
        };
        assert_eq!(d.to_string(), u64::MAX.to_string());
    }

    #[test]
    fn test_decode_type_mismatch() {
        let err = decode(&LogicalType::Integer, Value::Text("1".into())).unwrap_err();
        assert_eq!(
            err.to_string(),
            "type mismatch: expected int4, found text"
        );
        assert!(matches!(
            decode(&LogicalType::Boolean, Value::Int4(1)),
            Err(ConvertError::TypeMismatch {
                expected: "bool",
                found: "int4"
            })
        ));
    }

    #[test]
    fn test_unsupported_types() {
        let unsupported = [
            LogicalType::Array(Box::new(LogicalType::Integer)),
            LogicalType::Multiset(Box::new(LogicalType::Integer)),
            LogicalType::Map {
                key: Box::new(LogicalType::VarChar { length: 1 }),
                value: Box::new(LogicalType::Integer),
            },
            LogicalType::Row(vec![]),
            LogicalType::Raw,
            LogicalType::TimestampLtz { precision: 6 },
        ];
        for ty in unsupported {
            let err = JdbcCodecs.nullable_internal_converter(&ty).unwrap_err();
            assert_eq!(err.to_string(), format!("Unsupported type: {}", ty));
            assert!(matches!(
                JdbcCodecs.nullable_external_converter(&ty),
                Err(ConvertError::UnsupportedType(_))
            ));
        }
    }

    #[test]
    fn test_encode_scalars() {
        assert_eq!(
            encode(&LogicalType::TinyInt, Datum::TinyInt(-5)).unwrap(),
            Param::Value(Value::Int2(-5))
        );
        assert_eq!(
            encode(&LogicalType::Date, Datum::Int(1)).unwrap(),
            Param::Value(Value::Date(date(1970, 1, 2)))
        );
        assert_eq!(
            encode(&LogicalType::Time { precision: 0 }, Datum::Int(3_600_250)).unwrap(),
            Param::Value(Value::Time(
                NaiveTime::from_hms_milli_opt(1, 0, 0, 250).unwrap()
            ))
        );
        assert!(matches!(
            encode(&LogicalType::Time { precision: 0 }, Datum::Int(-1)),
            Err(ConvertError::OutOfRange { .. })
        ));
        let ts = TimestampData::from_epoch_millis(1_000);
        assert_eq!(
            encode(&LogicalType::TimestampTz { precision: 3 }, Datum::Timestamp(ts)).unwrap(),
            Param::Value(Value::TimestampTz(
                DateTime::from_timestamp(1, 0).unwrap()
            ))
        );
        let d = DecimalData::from_decimal(Decimal::from_str("9.99").unwrap(), 3, 2).unwrap();
        assert_eq!(
            encode(
                &LogicalType::Decimal {
                    precision: 3,
                    scale: 2
                },
                Datum::Decimal(d)
            )
            .unwrap(),
            Param::Value(Value::Numeric(Decimal::from_str("9.99").unwrap()))
        );
    }

    #[test]
    fn test_encode_nulls() {
        assert_eq!(
            encode(&LogicalType::VarChar { length: 3 }, Datum::Null).unwrap(),
            Param::Null(Type::VARCHAR)
        );
        assert_eq!(
            encode(&LogicalType::Null, Datum::Null).unwrap(),
            Param::Null(Type::UNKNOWN)
        );
    }

    #[test]
    fn test_encode_type_mismatch() {
        let err = encode(&LogicalType::BigInt, Datum::Int(1)).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::TypeMismatch {
                expected: "bigint",
                found: "int"
            }
        ));
    }

    /// Decodes `value` as `ty`, encodes the result, and returns what was bound.
    fn roundtrip(ty: &LogicalType, value: Value) -> Value {
        let datum = decode(ty, value).unwrap();
        match encode(ty, datum).unwrap() {
            Param::Value(value) => value,
            param => panic!("expected a value, found {:?}", param),
        }
    }

    proptest! {
        #[test]
        fn integers_roundtrip(i in any::<i32>(), l in any::<i64>(), s in any::<i16>()) {
            prop_assert_eq!(roundtrip(&LogicalType::Integer, Value::Int4(i)), Value::Int4(i));
            prop_assert_eq!(roundtrip(&LogicalType::BigInt, Value::Int8(l)), Value::Int8(l));
            prop_assert_eq!(roundtrip(&LogicalType::SmallInt, Value::Int2(s)), Value::Int2(s));
        }

        #[test]
        fn floats_roundtrip(f in any::<f32>(), d in any::<f64>()) {
            let Value::Float4(f2) = roundtrip(&LogicalType::Float, Value::Float4(f)) else {
                panic!("expected float4");
            };
            prop_assert_eq!(f.to_bits(), f2.to_bits());
            let Value::Float8(d2) = roundtrip(&LogicalType::Double, Value::Float8(d)) else {
                panic!("expected float8");
            };
            prop_assert_eq!(d.to_bits(), d2.to_bits());
        }

        #[test]
        fn strings_roundtrip(s in ".*", b in prop::collection::vec(any::<u8>(), 0..64)) {
            let varchar = LogicalType::VarChar { length: LogicalType::MAX_LENGTH };
            prop_assert_eq!(roundtrip(&varchar, Value::Text(s.clone())), Value::Text(s));
            let bytes = LogicalType::VarBinary { length: LogicalType::MAX_LENGTH };
            prop_assert_eq!(roundtrip(&bytes, Value::Bytea(b.clone())), Value::Bytea(b));
        }

        #[test]
        fn temporal_roundtrip(
            days in -700_000i32..2_900_000,
            millis in 0u32..86_400_000,
            secs in -50_000_000_000i64..50_000_000_000,
            nanos in 0u32..1_000_000_000,
        ) {
            let d = NaiveDate::from_num_days_from_ce_opt(days).unwrap();
            prop_assert_eq!(roundtrip(&LogicalType::Date, Value::Date(d)), Value::Date(d));

            let t = NaiveTime::from_num_seconds_from_midnight_opt(
                millis / 1_000,
                (millis % 1_000) * 1_000_000,
            )
            .unwrap();
            prop_assert_eq!(
                roundtrip(&LogicalType::Time { precision: 3 }, Value::Time(t)),
                Value::Time(t)
            );

            let ts: NaiveDateTime = DateTime::from_timestamp(secs, nanos).unwrap().naive_utc();
            prop_assert_eq!(
                roundtrip(&LogicalType::Timestamp { precision: 9 }, Value::Timestamp(ts)),
                Value::Timestamp(ts)
            );
        }
    }
}
