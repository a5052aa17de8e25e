// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Arrays in the internal row format.

use crate::{Datum, InternalClass};

/// An error constructing or converting an [`ArrayData`].
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ArrayError {
    #[error("array of {expected} cannot hold a {found} element at position {index}")]
    ElementClass {
        expected: InternalClass,
        found: &'static str,
        index: usize,
    },
    #[error("array of {actual} cannot be converted to a primitive {requested} array")]
    NotPrimitive {
        requested: InternalClass,
        actual: InternalClass,
    },
    #[error("primitive array must not contain a null value at position {index}")]
    NullElement { index: usize },
}

/// A fixed-length array whose elements all belong to one
/// [`InternalClass`]. Any element may be null.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayData {
    element_class: InternalClass,
    elements: Vec<Datum>,
}

impl ArrayData {
    /// Constructs an array of `element_class` holding `elements` in order.
    ///
    /// Fails if a non-null element does not belong to `element_class`.
    pub fn new(element_class: InternalClass, elements: Vec<Datum>) -> Result<Self, ArrayError> {
        if element_class != InternalClass::Object {
            for (index, element) in elements.iter().enumerate() {
                match element.class() {
                    None => (),
                    Some(class) if class == element_class => (),
                    Some(_) => {
                        return Err(ArrayError::ElementClass {
                            expected: element_class,
                            found: element.kind_name(),
                            index,
                        })
                    }
                }
            }
        }
        Ok(ArrayData {
            element_class,
            elements,
        })
    }

    pub fn element_class(&self) -> InternalClass {
        self.element_class
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&Datum> {
        self.elements.get(i)
    }

    pub fn is_null_at(&self, i: usize) -> bool {
        self.elements.get(i).map_or(true, Datum::is_null)
    }

    pub fn elements(&self) -> &[Datum] {
        &self.elements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Datum> {
        self.elements.iter()
    }

    pub fn into_elements(self) -> Vec<Datum> {
        self.elements
    }

    pub fn to_boolean_array(&self) -> Result<Vec<bool>, ArrayError> {
        self.to_primitive(InternalClass::Boolean, |d| match d {
            Datum::Boolean(b) => Some(*b),
            _ => None,
        })
    }

    pub fn to_short_array(&self) -> Result<Vec<i16>, ArrayError> {
        self.to_primitive(InternalClass::Short, |d| match d {
            Datum::SmallInt(i) => Some(*i),
            _ => None,
        })
    }

    pub fn to_int_array(&self) -> Result<Vec<i32>, ArrayError> {
        self.to_primitive(InternalClass::Int, |d| match d {
            Datum::Int(i) => Some(*i),
            _ => None,
        })
    }

    pub fn to_long_array(&self) -> Result<Vec<i64>, ArrayError> {
        self.to_primitive(InternalClass::Long, |d| match d {
            Datum::BigInt(i) => Some(*i),
            _ => None,
        })
    }

    pub fn to_float_array(&self) -> Result<Vec<f32>, ArrayError> {
        self.to_primitive(InternalClass::Float, |d| match d {
            Datum::Float(f) => Some(*f),
            _ => None,
        })
    }

    pub fn to_double_array(&self) -> Result<Vec<f64>, ArrayError> {
        self.to_primitive(InternalClass::Double, |d| match d {
            Datum::Double(f) => Some(*f),
            _ => None,
        })
    }

    fn to_primitive<T>(
        &self,
        requested: InternalClass,
        unwrap: impl Fn(&Datum) -> Option<T>,
    ) -> Result<Vec<T>, ArrayError> {
        if self.element_class != requested {
            return Err(ArrayError::NotPrimitive {
                requested,
                actual: self.element_class,
            });
        }
        self.elements
            .iter()
            .enumerate()
            .map(|(index, element)| match element {
                Datum::Null => Err(ArrayError::NullElement { index }),
                element => unwrap(element).ok_or(ArrayError::ElementClass {
                    expected: requested,
                    found: element.kind_name(),
                    index,
                }),
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a ArrayData {
    type Item = &'a Datum;
    type IntoIter = std::slice::Iter<'a, Datum>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}
