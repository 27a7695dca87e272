// Copyright (c) 2016-2021 Fabian Schuiki

//! Representation of constant values
//!
//! Integral values are arbitrary precision integers that are kept truncated
//! to the width of their type. Signed types hold their two's complement
//! interpretation, unsigned types a nonnegative number.

use crate::ty::ValueType;
use num::{BigInt, FromPrimitive, Integer, One, Signed, ToPrimitive, Zero};
use std::fmt::{self, Display, Formatter};

/// A constant value.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstValue {
    /// The type of the value.
    pub ty: ValueType,
    /// The actual value.
    pub kind: ValueKind,
}

/// The different forms a value can assume.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueKind {
    /// An arbitrary precision integer.
    Int(BigInt),
    /// A floating point number.
    Real(f64),
}

/// Compute `2^width`.
pub fn modulus(width: usize) -> BigInt {
    BigInt::one() << width
}

/// Truncate a value to the lower `width` bits, yielding a nonnegative number.
pub fn mask(value: &BigInt, width: usize) -> BigInt {
    value.mod_floor(&modulus(width))
}

/// Truncate a value to `width` bits and interpret them with a sign.
pub fn truncate(value: &BigInt, width: usize, signed: bool) -> BigInt {
    let masked = mask(value, width);
    if signed && width > 0 && masked >= modulus(width - 1) {
        masked - modulus(width)
    } else {
        masked
    }
}

/// Create a new integer value.
///
/// Panics if `ty` is real. Truncates the value to `ty`.
pub fn make_int(ty: ValueType, value: BigInt) -> ConstValue {
    if ty.is_real() {
        bug!("create int value `{}` with real type", value);
    }
    let value = truncate(&value, ty.bit_width(), ty.is_signed());
    ConstValue {
        ty,
        kind: ValueKind::Int(value),
    }
}

/// Create a new real value.
pub fn make_real(value: f64) -> ConstValue {
    ConstValue {
        ty: ValueType::REAL,
        kind: ValueKind::Real(value),
    }
}

impl ConstValue {
    /// Return the integer value, if this is an integral constant.
    pub fn get_int(&self) -> Option<&BigInt> {
        match self.kind {
            ValueKind::Int(ref v) => Some(v),
            _ => None,
        }
    }

    /// Check whether the value is nonzero.
    pub fn is_true(&self) -> bool {
        match self.kind {
            ValueKind::Int(ref v) => !v.is_zero(),
            ValueKind::Real(v) => v != 0.0,
        }
    }

    /// Convert the value to a floating point number.
    pub fn to_f64(&self) -> f64 {
        match self.kind {
            ValueKind::Int(ref v) => v.to_f64().unwrap_or(std::f64::NAN),
            ValueKind::Real(v) => v,
        }
    }

    /// Convert the value to an integer, rounding real numbers to the nearest
    /// integer away from zero.
    ///
    /// Returns `None` for infinite and NaN reals.
    pub fn to_bigint(&self) -> Option<BigInt> {
        match self.kind {
            ValueKind::Int(ref v) => Some(v.clone()),
            ValueKind::Real(v) => BigInt::from_f64(v.round()),
        }
    }

    /// Convert the value to a machine integer, if it fits.
    pub fn to_isize(&self) -> Option<isize> {
        match self.kind {
            ValueKind::Int(ref v) => v.to_isize(),
            ValueKind::Real(_) => None,
        }
    }
}

impl Display for ConstValue {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.kind {
            ValueKind::Real(v) => write!(f, "{}", v),
            ValueKind::Int(ref v) if self.ty.is_sized() => {
                if v.is_negative() {
                    write!(f, "-")?;
                }
                write!(
                    f,
                    "{}'{}d{}",
                    self.ty.bit_width(),
                    if self.ty.is_signed() { "s" } else { "" },
                    v.abs()
                )
            }
            ValueKind::Int(ref v) => write!(f, "{}", v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ty::Sign;

    #[test]
    fn truncate_to_width() {
        let ty = ValueType::bit_vector(Sign::Unsigned, 4);
        assert_eq!(make_int(ty, BigInt::from(16)).get_int(), Some(&BigInt::from(0)));
        assert_eq!(make_int(ty, BigInt::from(-1)).get_int(), Some(&BigInt::from(15)));
    }

    #[test]
    fn signed_wraps_around() {
        let ty = ValueType::bit_vector(Sign::Signed, 4);
        assert_eq!(make_int(ty, BigInt::from(7)).get_int(), Some(&BigInt::from(7)));
        assert_eq!(make_int(ty, BigInt::from(8)).get_int(), Some(&BigInt::from(-8)));
        assert_eq!(make_int(ty, BigInt::from(15)).get_int(), Some(&BigInt::from(-1)));
        assert_eq!(
            make_int(ValueType::INTEGER, BigInt::from(1u64 << 31)).get_int(),
            Some(&BigInt::from(-(1i64 << 31)))
        );
    }

    #[test]
    #[should_panic(expected = "with real type")]
    fn int_with_real_type() {
        let _ = make_int(ValueType::REAL, BigInt::from(1));
    }

    #[test]
    fn display() {
        let u = make_int(ValueType::bit_vector(Sign::Unsigned, 8), BigInt::from(200));
        let s = make_int(ValueType::bit_vector(Sign::Signed, 8), BigInt::from(200));
        assert_eq!(format!("{}", u), "8'd200");
        assert_eq!(format!("{}", s), "-8'sd56");
        assert_eq!(format!("{}", make_int(ValueType::INTEGER, BigInt::from(42))), "42");
        assert_eq!(format!("{}", make_real(1.5)), "1.5");
    }

    #[test]
    fn conversions() {
        let v = make_real(-2.5);
        assert_eq!(v.to_bigint(), Some(BigInt::from(-3)));
        assert!(v.is_true());
        assert!(!make_int(ValueType::BIT, BigInt::from(2)).is_true());
    }

    #[test]
    fn huge_reals_keep_their_magnitude() {
        let big = make_real(1e40).to_bigint().unwrap();
        assert_eq!(big.to_string().len(), 41);
        assert!(big > BigInt::from(u128::MAX));
        assert_eq!(make_real(-1e40).to_bigint(), Some(-big));
        assert_eq!(make_real(std::f64::INFINITY).to_bigint(), None);
        assert_eq!(make_real(std::f64::NAN).to_bigint(), None);
    }
}
