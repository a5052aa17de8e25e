// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Driver-side arrays.
//!
//! Arrays read from the driver arrive as a [`PgArray`] handle. Arrays written
//! to the driver are sent as a [`NativeArray`], which exists only for the
//! primitive element types the driver can bind directly.

use std::borrow::Cow;
use std::error::Error;
use std::slice;

use bytes::BytesMut;
use fallible_iterator::FallibleIterator;
use postgres_protocol::types;
use postgres_types::{FromSql, IsNull, Kind, ToSql, Type};

use crate::Value;

/// A handle to an array value read from the driver.
#[derive(Clone, Debug, PartialEq)]
pub struct PgArray {
    element_type: Type,
    elements: ArrayElements,
}

/// The driver exposes `bytea[]` as a sequence of primitive byte arrays
/// rather than boxed values. Both shapes materialize into the same
/// elements.
#[derive(Clone, Debug, PartialEq)]
enum ArrayElements {
    Values(Vec<Option<Value>>),
    ByteArrays(Vec<Option<Vec<u8>>>),
}

impl PgArray {
    /// Constructs an array of `element_type` from boxed values.
    pub fn new(element_type: Type, elements: Vec<Option<Value>>) -> PgArray {
        PgArray {
            element_type,
            elements: ArrayElements::Values(elements),
        }
    }

    /// Constructs a `bytea[]` from primitive byte arrays.
    pub fn from_byte_arrays(elements: Vec<Option<Vec<u8>>>) -> PgArray {
        PgArray {
            element_type: Type::BYTEA,
            elements: ArrayElements::ByteArrays(elements),
        }
    }

    pub fn element_type(&self) -> &Type {
        &self.element_type
    }

    pub fn len(&self) -> usize {
        match &self.elements {
            ArrayElements::Values(values) => values.len(),
            ArrayElements::ByteArrays(bytes) => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over the elements of the array in order, whichever
    /// representation the driver used.
    pub fn elements(&self) -> Elements<'_> {
        let inner = match &self.elements {
            ArrayElements::Values(values) => ElementsInner::Values(values.iter()),
            ArrayElements::ByteArrays(bytes) => ElementsInner::ByteArrays(bytes.iter()),
        };
        Elements { inner }
    }

    /// Materializes the elements of the array.
    pub fn get_array(&self) -> Vec<Option<Value>> {
        self.elements()
            .map(|element| element.map(Cow::into_owned))
            .collect()
    }

    /// Builds the array whose dimensions have the given `lengths` from the
    /// flattened, row-major `values`.
    fn from_slices<'a>(
        array_type: &Type,
        element_type: &Type,
        lengths: &[usize],
        values: &mut impl Iterator<Item = Option<&'a [u8]>>,
    ) -> Result<PgArray, Box<dyn Error + Sync + Send>> {
        let (len, inner) = match lengths.split_first() {
            Some((len, inner)) => (*len, inner),
            None => (0, lengths),
        };
        if !inner.is_empty() {
            let mut slices = Vec::with_capacity(len);
            for _ in 0..len {
                let slice = PgArray::from_slices(array_type, element_type, inner, &mut *values)?;
                slices.push(Some(Value::Array(slice)));
            }
            return Ok(PgArray::new(array_type.clone(), slices));
        }
        let mut raws = Vec::with_capacity(len);
        for _ in 0..len {
            raws.push(
                values
                    .next()
                    .ok_or("array has fewer elements than its dimensions")?,
            );
        }
        if *element_type == Type::BYTEA {
            let elements = raws.into_iter().map(|raw| raw.map(<[u8]>::to_vec));
            return Ok(PgArray::from_byte_arrays(elements.collect()));
        }
        let elements = raws
            .into_iter()
            .map(|raw| raw.map(|raw| Value::from_sql(element_type, raw)).transpose())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PgArray::new(element_type.clone(), elements))
    }
}

impl<'a> FromSql<'a> for PgArray {
    /// Reads an array of any number of dimensions. Each dimension beyond the
    /// first becomes a level of nested arrays whose elements are arrays of
    /// the same type.
    fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<PgArray, Box<dyn Error + Sync + Send>> {
        let element_type = match ty.kind() {
            Kind::Array(member) => member,
            _ => return Err(format!("{} is not an array type", ty).into()),
        };
        let array = types::array_from_sql(raw)?;
        let lengths = array
            .dimensions()
            .map(|dimension| Ok(dimension.len))
            .collect::<Vec<i32>>()?
            .into_iter()
            .map(usize::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let values = array.values().collect::<Vec<_>>()?;
        let mut values = values.into_iter();
        let array = PgArray::from_slices(ty, element_type, &lengths, &mut values)?;
        if values.next().is_some() {
            return Err("array has more elements than its dimensions".into());
        }
        Ok(array)
    }

    fn accepts(ty: &Type) -> bool {
        match ty.kind() {
            Kind::Array(member) => <Value as FromSql>::accepts(member),
            _ => false,
        }
    }
}

/// An iterator over the elements of a [`PgArray`].
#[derive(Debug)]
pub struct Elements<'a> {
    inner: ElementsInner<'a>,
}

#[derive(Debug)]
enum ElementsInner<'a> {
    Values(slice::Iter<'a, Option<Value>>),
    ByteArrays(slice::Iter<'a, Option<Vec<u8>>>),
}

impl<'a> Iterator for Elements<'a> {
    type Item = Option<Cow<'a, Value>>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            ElementsInner::Values(values) => {
                values.next().map(|value| value.as_ref().map(Cow::Borrowed))
            }
            ElementsInner::ByteArrays(bytes) => bytes.next().map(|bytes| {
                bytes
                    .as_ref()
                    .map(|bytes| Cow::Owned(Value::Bytea(bytes.clone())))
            }),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            ElementsInner::Values(values) => values.size_hint(),
            ElementsInner::ByteArrays(bytes) => bytes.size_hint(),
        }
    }
}

impl ExactSizeIterator for Elements<'_> {}

/// A primitive array bound as a single statement parameter.
#[derive(Clone, Debug, PartialEq)]
pub enum NativeArray {
    Bool(Vec<bool>),
    Int2(Vec<i16>),
    Int4(Vec<i32>),
    Int8(Vec<i64>),
    Float4(Vec<f32>),
    Float8(Vec<f64>),
}

impl NativeArray {
    pub fn len(&self) -> usize {
        match self {
            NativeArray::Bool(v) => v.len(),
            NativeArray::Int2(v) => v.len(),
            NativeArray::Int4(v) => v.len(),
            NativeArray::Int8(v) => v.len(),
            NativeArray::Float4(v) => v.len(),
            NativeArray::Float8(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The PostgreSQL array type this array binds as.
    pub fn pg_type(&self) -> Type {
        match self {
            NativeArray::Bool(_) => Type::BOOL_ARRAY,
            NativeArray::Int2(_) => Type::INT2_ARRAY,
            NativeArray::Int4(_) => Type::INT4_ARRAY,
            NativeArray::Int8(_) => Type::INT8_ARRAY,
            NativeArray::Float4(_) => Type::FLOAT4_ARRAY,
            NativeArray::Float8(_) => Type::FLOAT8_ARRAY,
        }
    }
}

impl ToSql for NativeArray {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + 'static + Send + Sync>> {
        match self {
            NativeArray::Bool(v) => v.to_sql(ty, out),
            NativeArray::Int2(v) => v.to_sql(ty, out),
            NativeArray::Int4(v) => v.to_sql(ty, out),
            NativeArray::Int8(v) => v.to_sql(ty, out),
            NativeArray::Float4(v) => v.to_sql(ty, out),
            NativeArray::Float8(v) => v.to_sql(ty, out),
        }
    }

    fn accepts(ty: &Type) -> bool {
        matches!(ty.kind(), Kind::Array(_))
    }

    fn to_sql_checked(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + 'static + Send + Sync>> {
        match self {
            NativeArray::Bool(v) => v.to_sql_checked(ty, out),
            NativeArray::Int2(v) => v.to_sql_checked(ty, out),
            NativeArray::Int4(v) => v.to_sql_checked(ty, out),
            NativeArray::Int8(v) => v.to_sql_checked(ty, out),
            NativeArray::Float4(v) => v.to_sql_checked(ty, out),
            NativeArray::Float8(v) => v.to_sql_checked(ty, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use bytes::BufMut;

    use super::*;

    /// Encodes an `int4` array in the binary format, with the given lengths
    /// for its dimensions and its elements in row-major order.
    fn int4_array(lengths: &[i32], elements: &[Option<i32>]) -> BytesMut {
        let mut buf = BytesMut::new();
        buf.put_i32(i32::try_from(lengths.len()).unwrap());
        buf.put_i32(i32::from(elements.iter().any(Option::is_none)));
        buf.put_u32(Type::INT4.oid());
        for len in lengths {
            buf.put_i32(*len);
            buf.put_i32(1);
        }
        for element in elements {
            match element {
                Some(i) => {
                    buf.put_i32(4);
                    buf.put_i32(*i);
                }
                None => buf.put_i32(-1),
            }
        }
        buf
    }

    fn int4s(elements: &[Option<i32>]) -> Option<Value> {
        let elements = elements.iter().map(|e| e.map(Value::Int4)).collect();
        Some(Value::Array(PgArray::new(Type::INT4, elements)))
    }

    #[test]
    fn test_read_two_dimensional() {
        let buf = int4_array(&[2, 2], &[Some(1), Some(2), None, Some(4)]);
        let value = Value::from_sql(&Type::INT4_ARRAY, &buf).unwrap();
        let expected = PgArray::new(
            Type::INT4_ARRAY,
            vec![int4s(&[Some(1), Some(2)]), int4s(&[None, Some(4)])],
        );
        assert_eq!(value, Value::Array(expected));
    }

    #[test]
    fn test_read_three_dimensional() {
        let elements: Vec<_> = (0..12).map(Some).collect();
        let buf = int4_array(&[2, 3, 2], &elements);
        let array = PgArray::from_sql(&Type::INT4_ARRAY, &buf).unwrap();
        assert_eq!(array.len(), 2);
        let Some(Value::Array(plane)) = array.get_array().pop().flatten() else {
            panic!("expected nested array");
        };
        assert_eq!(plane.len(), 3);
        assert_eq!(
            plane.get_array().pop().flatten(),
            int4s(&[Some(10), Some(11)])
        );
    }

    #[test]
    fn test_read_one_and_zero_dimensional() {
        let buf = int4_array(&[3], &[Some(7), None, Some(9)]);
        let array = PgArray::from_sql(&Type::INT4_ARRAY, &buf).unwrap();
        assert_eq!(Some(Value::Array(array)), int4s(&[Some(7), None, Some(9)]));

        let buf = int4_array(&[], &[]);
        let array = PgArray::from_sql(&Type::INT4_ARRAY, &buf).unwrap();
        assert!(array.is_empty());
        assert_eq!(array.element_type(), &Type::INT4);
    }

    #[test]
    fn test_representations_materialize_identically() {
        let boxed = PgArray::new(
            Type::BYTEA,
            vec![Some(Value::Bytea(vec![0xde, 0xad])), None],
        );
        let primitive = PgArray::from_byte_arrays(vec![Some(vec![0xde, 0xad]), None]);
        assert_eq!(boxed.len(), 2);
        assert_eq!(primitive.len(), 2);
        assert_eq!(boxed.get_array(), primitive.get_array());
        assert_eq!(primitive.elements().len(), 2);
    }

    #[test]
    fn test_not_an_array() {
        let err = PgArray::from_sql(&Type::INT4, &[0, 0, 0, 1]).unwrap_err();
        assert_eq!(err.to_string(), "int4 is not an array type");
    }

    #[test]
    fn test_native_array_binds_as_array() {
        let array = NativeArray::Int2(vec![1, -2, 3]);
        assert_eq!(array.len(), 3);
        let mut buf = BytesMut::new();
        array.to_sql_checked(&array.pg_type(), &mut buf).unwrap();
        let read = Vec::<i16>::from_sql(&Type::INT2_ARRAY, &buf).unwrap();
        assert_eq!(read, vec![1, -2, 3]);
    }
}
