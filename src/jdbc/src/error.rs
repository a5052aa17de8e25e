// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use rowconv_repr::{ArrayError, Datum, LogicalType};

use crate::Value;

/// An error converting between driver values and the internal row format.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// A value did not have the runtime shape its logical type requires.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("value {value} is out of range for type {typ}")]
    OutOfRange { value: String, typ: LogicalType },
    /// No converter exists for the type. Raised when the converter is built.
    #[error("Unsupported type: {0}")]
    UnsupportedType(LogicalType),
    /// The driver cannot write arrays of this element type. Raised every time
    /// such a column is written.
    #[error("Writing ARRAY type is not yet supported in JDBC:{converter}.")]
    UnsupportedArrayWrite { converter: &'static str },
    #[error("row has {found} fields, but the converter expects {expected}")]
    ArityMismatch { expected: usize, found: usize },
    #[error("field {index} is out of bounds for a row of {arity} fields")]
    FieldIndex { index: usize, arity: usize },
    #[error("parameter {index} is out of bounds for a statement with {count} parameters")]
    ParameterIndex { index: usize, count: usize },
    #[error(transparent)]
    Array(#[from] ArrayError),
    /// An error reported by the driver while reading a column.
    #[error(transparent)]
    Driver(#[from] tokio_postgres::Error),
}

impl ConvertError {
    /// Reports that `found` was read where a driver value of kind `expected`
    /// was required.
    pub(crate) fn value_mismatch(expected: &'static str, found: &Value) -> ConvertError {
        ConvertError::TypeMismatch {
            expected,
            found: found.type_name(),
        }
    }

    /// Reports that `found` was stored where a datum of kind `expected` was
    /// required.
    pub(crate) fn datum_mismatch(expected: &'static str, found: &Datum) -> ConvertError {
        ConvertError::TypeMismatch {
            expected,
            found: found.kind_name(),
        }
    }
}
