// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::Datum;

/// A row in the internal row format: a fixed number of positional fields.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RowData {
    fields: Vec<Datum>,
}

impl RowData {
    /// Constructs a row of `arity` null fields.
    pub fn new(arity: usize) -> RowData {
        RowData {
            fields: vec![Datum::Null; arity],
        }
    }

    pub fn arity(&self) -> usize {
        self.fields.len()
    }

    /// Returns the field at `pos`, or `None` if `pos` is out of bounds.
    pub fn field(&self, pos: usize) -> Option<&Datum> {
        self.fields.get(pos)
    }

    /// Reports whether the field at `pos` is null. Out of bounds positions
    /// are null.
    pub fn is_null_at(&self, pos: usize) -> bool {
        self.fields.get(pos).map_or(true, Datum::is_null)
    }

    /// Sets the field at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is not less than the arity of the row.
    pub fn set_field(&mut self, pos: usize, datum: Datum) {
        self.fields[pos] = datum;
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Datum> {
        self.fields.iter()
    }

    pub fn into_fields(self) -> Vec<Datum> {
        self.fields
    }
}

impl From<Vec<Datum>> for RowData {
    fn from(fields: Vec<Datum>) -> RowData {
        RowData { fields }
    }
}

impl FromIterator<Datum> for RowData {
    fn from_iter<I: IntoIterator<Item = Datum>>(iter: I) -> RowData {
        RowData {
            fields: iter.into_iter().collect(),
        }
    }
}
