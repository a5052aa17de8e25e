// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Whole-row conversion.

use rowconv_repr::{RowData, RowType};
use tracing::debug;

use crate::codec::{CodecTable, Decoder, Encoder};
use crate::postgres::PostgresCodecs;
use crate::{ConvertError, ParameterSink, Value};

/// A row of driver values, addressed by zero-based column index.
pub trait ResultRow {
    /// The number of columns in the row.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the value of column `index`, or `None` if it is NULL.
    fn get_object(&self, index: usize) -> Result<Option<Value>, ConvertError>;
}

impl ResultRow for tokio_postgres::Row {
    fn len(&self) -> usize {
        tokio_postgres::Row::len(self)
    }

    fn get_object(&self, index: usize) -> Result<Option<Value>, ConvertError> {
        Ok(self.try_get::<_, Option<Value>>(index)?)
    }
}

impl ResultRow for [Option<Value>] {
    fn len(&self) -> usize {
        <[Option<Value>]>::len(self)
    }

    fn get_object(&self, index: usize) -> Result<Option<Value>, ConvertError> {
        self.get(index).cloned().ok_or(ConvertError::FieldIndex {
            index,
            arity: <[Option<Value>]>::len(self),
        })
    }
}

/// Converts rows of one [`RowType`] between the driver and the internal row
/// format.
///
/// The codecs for every field are built up front, so a converter for a row
/// type with an unsupported field type cannot be constructed. Array fields
/// that cannot be written are the exception: the converter is built, and
/// [`RowConverter::to_external`] fails for any row that reaches them.
#[derive(Debug)]
pub struct RowConverter<C> {
    row_type: RowType,
    codecs: C,
    decoders: Vec<Decoder>,
    encoders: Vec<Encoder>,
}

impl<C: CodecTable> RowConverter<C> {
    pub fn new(row_type: RowType, codecs: C) -> Result<RowConverter<C>, ConvertError> {
        let mut decoders = Vec::with_capacity(row_type.field_count());
        let mut encoders = Vec::with_capacity(row_type.field_count());
        for field in &row_type.fields {
            decoders.push(codecs.nullable_internal_converter(&field.typ)?);
            encoders.push(codecs.nullable_external_converter(&field.typ)?);
        }
        debug!(
            converter = codecs.converter_name(),
            fields = row_type.field_count(),
            "built row converter"
        );
        Ok(RowConverter {
            row_type,
            codecs,
            decoders,
            encoders,
        })
    }

    pub fn row_type(&self) -> &RowType {
        &self.row_type
    }

    pub fn codecs(&self) -> &C {
        &self.codecs
    }

    pub fn converter_name(&self) -> &'static str {
        self.codecs.converter_name()
    }

    /// Converts a row read from the driver into the internal row format.
    ///
    /// Columns are matched to fields by position.
    pub fn to_internal<R>(&self, row: &R) -> Result<RowData, ConvertError>
    where
        R: ResultRow + ?Sized,
    {
        if row.len() != self.decoders.len() {
            return Err(ConvertError::ArityMismatch {
                expected: self.decoders.len(),
                found: row.len(),
            });
        }
        self.decoders
            .iter()
            .enumerate()
            .map(|(index, decoder)| decoder.decode(row.get_object(index)?.as_ref()))
            .collect()
    }

    /// Binds the fields of `row` as parameters `0..arity` of `sink`.
    pub fn to_external(
        &self,
        row: &RowData,
        sink: &mut dyn ParameterSink,
    ) -> Result<(), ConvertError> {
        if row.arity() != self.encoders.len() {
            return Err(ConvertError::ArityMismatch {
                expected: self.encoders.len(),
                found: row.arity(),
            });
        }
        for (index, encoder) in self.encoders.iter().enumerate() {
            encoder.encode(row, index, sink)?;
        }
        Ok(())
    }
}

/// A row converter for PostgreSQL.
pub type PostgresRowConverter = RowConverter<PostgresCodecs>;

impl PostgresRowConverter {
    /// Constructs a converter for `row_type` with the default PostgreSQL
    /// codecs.
    pub fn postgres(row_type: RowType) -> Result<PostgresRowConverter, ConvertError> {
        RowConverter::new(row_type, PostgresCodecs::new())
    }
}
