// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Outgoing statement parameters.

use std::error::Error;

use bytes::BytesMut;
use postgres_types::{IsNull, ToSql, Type};

use crate::{ConvertError, Value};

/// A positional carrier for the parameters of a prepared statement.
///
/// Indexes are zero-based.
pub trait ParameterSink {
    /// Binds a NULL of type `ty` at `index`.
    fn set_null(&mut self, index: usize, ty: &Type) -> Result<(), ConvertError>;

    /// Binds `value` at `index`.
    fn set_value(&mut self, index: usize, value: Value) -> Result<(), ConvertError>;
}

/// A parameter slot of [`StatementParams`].
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Param {
    /// Nothing has been bound yet. Sent as NULL.
    #[default]
    Unset,
    /// A NULL of the given type.
    Null(Type),
    Value(Value),
}

impl Param {
    /// Returns the bound value, if any.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Param::Value(value) => Some(value),
            Param::Unset | Param::Null(_) => None,
        }
    }
}

impl ToSql for Param {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + 'static + Send + Sync>> {
        match self {
            Param::Value(value) => value.to_sql(ty, out),
            Param::Unset | Param::Null(_) => Ok(IsNull::Yes),
        }
    }

    fn accepts(_: &Type) -> bool {
        true
    }

    fn to_sql_checked(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + 'static + Send + Sync>> {
        match self {
            Param::Value(value) => value.to_sql_checked(ty, out),
            Param::Unset | Param::Null(_) => Ok(IsNull::Yes),
        }
    }
}

/// A fixed number of statement parameters, ready to hand to
/// [`tokio_postgres`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatementParams {
    slots: Vec<Param>,
}

impl StatementParams {
    /// Constructs `count` unset parameters.
    pub fn new(count: usize) -> StatementParams {
        StatementParams {
            slots: vec![Param::Unset; count],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Param> {
        self.slots.get(index)
    }

    /// Unsets every parameter so the carrier can be reused for the next row.
    pub fn clear(&mut self) {
        self.slots.fill(Param::Unset);
    }

    /// Returns the parameters in the form `tokio_postgres::Client::execute`
    /// expects. Unset and NULL parameters are sent as NULL.
    pub fn params(&self) -> Vec<&(dyn ToSql + Sync)> {
        let mut params: Vec<&(dyn ToSql + Sync)> = Vec::with_capacity(self.slots.len());
        for param in &self.slots {
            params.push(param);
        }
        params
    }

    fn check_index(&self, index: usize) -> Result<(), ConvertError> {
        if index < self.slots.len() {
            Ok(())
        } else {
            Err(ConvertError::ParameterIndex {
                index,
                count: self.slots.len(),
            })
        }
    }
}

impl ParameterSink for StatementParams {
    fn set_null(&mut self, index: usize, ty: &Type) -> Result<(), ConvertError> {
        self.check_index(index)?;
        self.slots[index] = Param::Null(ty.clone());
        Ok(())
    }

    fn set_value(&mut self, index: usize, value: Value) -> Result<(), ConvertError> {
        self.check_index(index)?;
        self.slots[index] = Param::Value(value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_params() {
        let mut params = StatementParams::new(3);
        params.set_value(0, Value::Int4(1)).unwrap();
        params.set_null(2, &Type::TEXT).unwrap();
        assert_eq!(params.get(0).and_then(Param::value), Some(&Value::Int4(1)));
        assert_eq!(params.get(1), Some(&Param::Unset));
        assert_eq!(params.get(2), Some(&Param::Null(Type::TEXT)));
        assert_eq!(params.params().len(), 3);

        let err = params.set_value(3, Value::Bool(true)).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::ParameterIndex { index: 3, count: 3 }
        ));

        params.clear();
        assert_eq!(params.get(0), Some(&Param::Unset));
    }
}
