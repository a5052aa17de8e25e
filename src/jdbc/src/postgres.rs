// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The PostgreSQL codec table.
//!
//! PostgreSQL adds array support on top of the scalar codecs. Arrays of any
//! supported element type can be read, including nested arrays. Only arrays
//! of `INTEGER`, `BOOLEAN`, `BIGINT`, `FLOAT`, `DOUBLE` and `SMALLINT` can be
//! written, as a [`NativeArray`]. Other array columns get an encoder that
//! fails each time it is used, so a row type may contain them as long as
//! they are only ever read.

use rowconv_repr::{ArrayData, ArrayError, Datum, LogicalType, LogicalTypeRoot};
use tracing::debug;

use crate::base::JdbcCodecs;
use crate::codec::{write_with, CodecTable, Decoder, Encoder};
use crate::{ConvertError, NativeArray, Value};

/// Codecs for PostgreSQL columns.
///
/// Non-array types are handled by the wrapped table `B`.
#[derive(Clone, Debug, Default)]
pub struct PostgresCodecs<B = JdbcCodecs> {
    base: B,
}

impl PostgresCodecs {
    pub fn new() -> PostgresCodecs {
        PostgresCodecs::default()
    }
}

impl<B: CodecTable> PostgresCodecs<B> {
    /// Constructs a table that delegates non-array types to `base`.
    pub fn with_base(base: B) -> PostgresCodecs<B> {
        PostgresCodecs { base }
    }

    pub fn base(&self) -> &B {
        &self.base
    }

    fn array_decoder(&self, element: &LogicalType) -> Result<Decoder, ConvertError> {
        let class = element.internal_class();
        let element_decoder = self.nullable_internal_converter(element)?;
        Ok(Decoder::new(move |value| match value {
            Value::Array(array) => {
                let elements = array
                    .elements()
                    .map(|element| element_decoder.decode(element.as_deref()))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Datum::Array(ArrayData::new(class, elements)?))
            }
            value => Err(ConvertError::value_mismatch("array", value)),
        }))
    }

    fn array_encoder(&self, element: &LogicalType) -> Encoder {
        match element.root() {
            LogicalTypeRoot::Integer => {
                native_array_writer(ArrayData::to_int_array, NativeArray::Int4)
            }
            LogicalTypeRoot::Boolean => {
                native_array_writer(ArrayData::to_boolean_array, NativeArray::Bool)
            }
            LogicalTypeRoot::BigInt => {
                native_array_writer(ArrayData::to_long_array, NativeArray::Int8)
            }
            LogicalTypeRoot::Float => {
                native_array_writer(ArrayData::to_float_array, NativeArray::Float4)
            }
            LogicalTypeRoot::Double => {
                native_array_writer(ArrayData::to_double_array, NativeArray::Float8)
            }
            LogicalTypeRoot::SmallInt => {
                native_array_writer(ArrayData::to_short_array, NativeArray::Int2)
            }
            _ => {
                debug!(
                    converter = self.converter_name(),
                    %element,
                    "array columns of this element type cannot be written"
                );
                Encoder::UnsupportedArray {
                    converter: self.converter_name(),
                }
            }
        }
    }
}

impl<B: CodecTable> CodecTable for PostgresCodecs<B> {
    fn converter_name(&self) -> &'static str {
        "PostgreSQL"
    }

    fn internal_converter(&self, ty: &LogicalType) -> Result<Decoder, ConvertError> {
        match ty {
            LogicalType::Array(element) => self.array_decoder(element),
            _ => self.base.internal_converter(ty),
        }
    }

    fn external_converter(&self, ty: &LogicalType) -> Result<Encoder, ConvertError> {
        match ty {
            LogicalType::Array(element) => Ok(self.array_encoder(element)),
            _ => self.base.external_converter(ty),
        }
    }
}

/// Builds an encoder that binds an array field as a [`NativeArray`].
fn native_array_writer<T, F, G>(to_native: F, wrap: G) -> Encoder
where
    F: Fn(&ArrayData) -> Result<Vec<T>, ArrayError> + Send + Sync + 'static,
    G: Fn(Vec<T>) -> NativeArray + Send + Sync + 'static,
{
    write_with(move |datum| match datum {
        Datum::Array(array) => Ok(Value::NativeArray(wrap(to_native(array)?))),
        datum => Err(ConvertError::datum_mismatch("array", datum)),
    })
}
