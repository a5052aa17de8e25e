// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Per-column codecs and the tables that build them.
//!
//! A [`CodecTable`] turns a [`LogicalType`] into a [`Decoder`], which converts
//! driver values into datums, and an [`Encoder`], which binds a row's field as
//! a statement parameter. Codecs are built once per column and then reused for
//! every row; they hold no mutable state and may be shared across threads.

use std::fmt;

use postgres_types::Type;
use rowconv_repr::{Datum, LogicalType, RowData};

use crate::types::pg_type;
use crate::{ConvertError, ParameterSink, Value};

type DecodeFn = dyn Fn(&Value) -> Result<Datum, ConvertError> + Send + Sync;

type EncodeFn =
    dyn Fn(&RowData, usize, &mut dyn ParameterSink) -> Result<(), ConvertError> + Send + Sync;

/// Converts driver values of one logical type into datums.
pub struct Decoder {
    decode: Box<DecodeFn>,
    nullable: bool,
}

impl Decoder {
    /// Constructs a decoder from a conversion of non-null values. The decoder
    /// rejects NULL until [`Decoder::into_nullable`] is called.
    pub fn new<F>(decode: F) -> Decoder
    where
        F: Fn(&Value) -> Result<Datum, ConvertError> + Send + Sync + 'static,
    {
        Decoder {
            decode: Box::new(decode),
            nullable: false,
        }
    }

    /// Makes this decoder map NULL to [`Datum::Null`].
    pub fn into_nullable(mut self) -> Decoder {
        self.nullable = true;
        self
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Decodes `value`, where `None` is SQL NULL.
    pub fn decode(&self, value: Option<&Value>) -> Result<Datum, ConvertError> {
        match value {
            Some(value) => (self.decode)(value),
            None if self.nullable => Ok(Datum::Null),
            None => Err(ConvertError::TypeMismatch {
                expected: "non-null value",
                found: "null",
            }),
        }
    }
}

impl fmt::Debug for Decoder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Decoder")
            .field("nullable", &self.nullable)
            .finish_non_exhaustive()
    }
}

/// Binds one field of a row as a statement parameter.
pub enum Encoder {
    /// Binds the field with the contained function.
    Write(Box<EncodeFn>),
    /// Fails every time it is invoked, because the named converter cannot
    /// write the column's array type.
    ///
    /// A column of such a type may still appear in a row type as long as it
    /// is never written.
    UnsupportedArray { converter: &'static str },
}

impl Encoder {
    pub fn new<F>(encode: F) -> Encoder
    where
        F: Fn(&RowData, usize, &mut dyn ParameterSink) -> Result<(), ConvertError>
            + Send
            + Sync
            + 'static,
    {
        Encoder::Write(Box::new(encode))
    }

    /// Makes this encoder bind a NULL of `null_type` when the field is null.
    ///
    /// [`Encoder::UnsupportedArray`] is returned unchanged and keeps failing
    /// for null fields too.
    pub fn into_nullable(self, null_type: Type) -> Encoder {
        match self {
            Encoder::Write(encode) => Encoder::new(move |row, index, sink| {
                if row.is_null_at(index) {
                    sink.set_null(index, &null_type)
                } else {
                    encode(row, index, sink)
                }
            }),
            unsupported @ Encoder::UnsupportedArray { .. } => unsupported,
        }
    }

    /// Binds field `index` of `row` as parameter `index` of `sink`.
    pub fn encode(
        &self,
        row: &RowData,
        index: usize,
        sink: &mut dyn ParameterSink,
    ) -> Result<(), ConvertError> {
        match self {
            Encoder::Write(encode) => encode(row, index, sink),
            Encoder::UnsupportedArray { converter } => {
                Err(ConvertError::UnsupportedArrayWrite {
                    converter: *converter,
                })
            }
        }
    }
}

impl fmt::Debug for Encoder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Encoder::Write(_) => f.write_str("Encoder::Write(..)"),
            Encoder::UnsupportedArray { converter } => f
                .debug_struct("Encoder::UnsupportedArray")
                .field("converter", converter)
                .finish(),
        }
    }
}

/// A table of codecs for the logical types a driver supports.
///
/// Implementations override [`CodecTable::internal_converter`] and
/// [`CodecTable::external_converter`] for the types they handle and delegate
/// the rest to a wrapped table.
pub trait CodecTable: Send + Sync {
    /// The name of the database this table converts for, used in error
    /// messages.
    fn converter_name(&self) -> &'static str;

    /// Builds a decoder for non-null values of `ty`.
    fn internal_converter(&self, ty: &LogicalType) -> Result<Decoder, ConvertError>;

    /// Builds an encoder for non-null fields of `ty`.
    fn external_converter(&self, ty: &LogicalType) -> Result<Encoder, ConvertError>;

    /// Builds a decoder for values of `ty` that maps NULL to NULL.
    fn nullable_internal_converter(&self, ty: &LogicalType) -> Result<Decoder, ConvertError> {
        Ok(self.internal_converter(ty)?.into_nullable())
    }

    /// Builds an encoder for fields of `ty` that binds null fields as typed
    /// NULLs.
    fn nullable_external_converter(&self, ty: &LogicalType) -> Result<Encoder, ConvertError> {
        Ok(self.external_converter(ty)?.into_nullable(pg_type(ty)))
    }
}

/// Returns field `index` of `row`.
pub(crate) fn row_field(row: &RowData, index: usize) -> Result<&Datum, ConvertError> {
    row.field(index).ok_or(ConvertError::FieldIndex {
        index,
        arity: row.arity(),
    })
}

/// Builds an encoder that converts the field with `to_value` and binds the
/// result.
pub(crate) fn write_with<F>(to_value: F) -> Encoder
where
    F: Fn(&Datum) -> Result<Value, ConvertError> + Send + Sync + 'static,
{
    Encoder::new(move |row, index, sink| {
        let value = to_value(row_field(row, index)?)?;
        sink.set_value(index, value)
    })
}
