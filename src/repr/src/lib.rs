// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The internal row representation.
//!
//! Rows ([`RowData`]) are sequences of [`Datum`]s whose meaning is given by
//! a [`RowType`]. Each column has a [`LogicalType`], and
//! [`LogicalType::internal_class`] names the class of datum that stores it.

#![warn(missing_debug_implementations)]

mod array;
mod datum;
mod decimal;
mod row;
mod timestamp;
mod types;

pub use array::{ArrayData, ArrayError};
pub use datum::Datum;
pub use decimal::{DecimalData, DECIMAL_MAX_PRECISION};
pub use row::RowData;
pub use timestamp::TimestampData;
pub use types::{InternalClass, LogicalType, LogicalTypeRoot, RowField, RowType};
