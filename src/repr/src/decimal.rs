// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Fixed-precision decimals.

use std::fmt;

use rust_decimal::Decimal;

/// The maximum number of digits a [`DecimalData`] can hold.
pub const DECIMAL_MAX_PRECISION: u8 = 38;

/// An exact decimal number in the internal row format.
///
/// The value is `unscaled * 10^-scale` and never has more than `precision`
/// digits.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct DecimalData {
    unscaled: i128,
    precision: u8,
    scale: u8,
}

impl DecimalData {
    /// Converts `value` to a decimal with the given precision and scale.
    ///
    /// The value is rounded half-up to `scale` digits after the decimal
    /// point. Returns `None` if the rounded value does not fit in `precision`
    /// digits.
    pub fn from_decimal(value: Decimal, precision: u8, scale: u8) -> Option<DecimalData> {
        DecimalData::from_parts(value.mantissa(), value.scale(), precision, scale)
    }

    /// Like [`DecimalData::from_decimal`], but for the value
    /// `mantissa * 10^-value_scale`.
    pub fn from_parts(
        mantissa: i128,
        value_scale: u32,
        precision: u8,
        scale: u8,
    ) -> Option<DecimalData> {
        if precision == 0 || precision > DECIMAL_MAX_PRECISION || scale > precision {
            return None;
        }
        let unscaled = rescale(mantissa, value_scale, u32::from(scale))?;
        if unscaled.unsigned_abs() >= 10u128.pow(u32::from(precision)) {
            return None;
        }
        Some(DecimalData {
            unscaled,
            precision,
            scale,
        })
    }

    pub fn unscaled(&self) -> i128 {
        self.unscaled
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    pub fn scale(&self) -> u8 {
        self.scale
    }

    /// Converts this decimal to a [`Decimal`], which holds at most 28 digits
    /// after the decimal point and 96 bits of mantissa.
    pub fn to_decimal(&self) -> Option<Decimal> {
        Decimal::try_from_i128_with_scale(self.unscaled, u32::from(self.scale)).ok()
    }
}

impl fmt::Display for DecimalData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let digits = self.unscaled.unsigned_abs().to_string();
        let scale = usize::from(self.scale);
        if self.unscaled < 0 {
            f.write_str("-")?;
        }
        if scale == 0 {
            return f.write_str(&digits);
        }
        if digits.len() <= scale {
            write!(f, "0.{:0>width$}", digits, width = scale)
        } else {
            let (int, frac) = digits.split_at(digits.len() - scale);
            write!(f, "{}.{}", int, frac)
        }
    }
}

/// Moves `mantissa` from scale `from` to scale `to`, rounding half away from
/// zero when digits are dropped.
fn rescale(mantissa: i128, from: u32, to: u32) -> Option<i128> {
    if from <= to {
        return mantissa.checked_mul(10i128.checked_pow(to - from)?);
    }
    let divisor = match 10i128.checked_pow(from - to) {
        Some(divisor) => divisor,
        // |mantissa| < 10^39 / 2, so it rounds to zero.
        None => return Some(0),
    };
    let quotient = mantissa / divisor;
    let remainder = mantissa % divisor;
    if remainder.unsigned_abs() * 2 >= divisor.unsigned_abs() {
        Some(quotient + mantissa.signum())
    } else {
        Some(quotient)
    }
}
