// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Conversion between PostgreSQL driver values and the internal row format.
//!
//! A [`CodecTable`] builds, for each column's [`LogicalType`], a [`Decoder`]
//! that turns a driver [`Value`] into a [`Datum`] and an [`Encoder`] that
//! binds a [`Datum`] as a statement parameter. [`JdbcCodecs`] covers the
//! scalar types; [`PostgresCodecs`] adds arrays on top of it. A
//! [`RowConverter`] applies the codecs of a [`RowType`] to whole rows.
//!
//! ```ignore
//! let converter = PostgresRowConverter::postgres(row_type)?;
//! let row = converter.to_internal(&pg_row)?;
//! let mut params = StatementParams::new(row.arity());
//! converter.to_external(&row, &mut params)?;
//! client.execute(&statement, &params.params()).await?;
//! ```
//!
//! [`LogicalType`]: rowconv_repr::LogicalType
//! [`Datum`]: rowconv_repr::Datum
//! [`RowType`]: rowconv_repr::RowType

#![warn(missing_debug_implementations)]

mod base;
mod codec;
mod converter;
mod error;
mod postgres;
mod sink;
mod types;
mod value;

pub use crate::base::JdbcCodecs;
pub use crate::codec::{CodecTable, Decoder, Encoder};
pub use crate::converter::{PostgresRowConverter, ResultRow, RowConverter};
pub use crate::error::ConvertError;
pub use crate::postgres::PostgresCodecs;
pub use crate::sink::{Param, ParameterSink, StatementParams};
pub use crate::types::pg_type;
pub use crate::value::{Elements, NativeArray, PgArray, Value};
