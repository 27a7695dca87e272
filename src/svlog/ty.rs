// Copyright (c) 2016-2021 Fabian Schuiki

//! An implementation of the verilog expression value types.
//!
//! Every expression has a `ValueType` describing its sign, whether it has an
//! explicit size, and its bit width. The free functions at the end of this
//! module combine the types of operands into the type an operator works on.

use std::fmt::{self, Display, Formatter};

/// The width of the `integer` domain.
pub const INTEGER_WIDTH: usize = 32;

/// The width of the `time` domain.
pub const TIME_WIDTH: usize = 64;

/// The width of the `real` domain.
pub const REAL_WIDTH: usize = 64;

/// The type of an expression's value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// A bit vector.
    ///
    /// `sized` is false for unsized based literals such as `'hff`, which are
    /// 32 bits wide but carry no explicit size.
    BitVector {
        sign: Sign,
        sized: bool,
        width: usize,
    },
    /// The `integer` domain.
    Integer,
    /// The `time` domain.
    Time,
    /// The `real` domain.
    Real,
}

/// Whether a type is signed or unsigned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Sign {
    Signed,
    Unsigned,
}

impl ValueType {
    /// The single bit produced by comparisons, reductions, and logic ops.
    pub const BIT: ValueType = ValueType::BitVector {
        sign: Sign::Unsigned,
        sized: true,
        width: 1,
    };

    /// The `integer` type.
    pub const INTEGER: ValueType = ValueType::Integer;

    /// The `time` type.
    pub const TIME: ValueType = ValueType::Time;

    /// The `real` type.
    pub const REAL: ValueType = ValueType::Real;

    /// Create a bit vector type from its sign, sizedness, and width.
    pub fn new(is_signed: bool, is_sized: bool, width: usize) -> ValueType {
        ValueType::BitVector {
            sign: if is_signed {
                Sign::Signed
            } else {
                Sign::Unsigned
            },
            sized: is_sized,
            width,
        }
    }

    /// Create a sized bit vector type.
    pub fn bit_vector(sign: Sign, width: usize) -> ValueType {
        ValueType::BitVector {
            sign,
            sized: true,
            width,
        }
    }

    /// Create an unsized bit vector type, as produced by `'h1f` literals.
    pub fn unsized_vector(sign: Sign) -> ValueType {
        ValueType::BitVector {
            sign,
            sized: false,
            width: INTEGER_WIDTH,
        }
    }

    /// Return the sign of the type.
    pub fn sign(&self) -> Sign {
        match *self {
            ValueType::BitVector { sign, .. } => sign,
            ValueType::Integer | ValueType::Real => Sign::Signed,
            ValueType::Time => Sign::Unsigned,
        }
    }

    /// Check whether the type is signed.
    pub fn is_signed(&self) -> bool {
        self.sign().is_signed()
    }

    /// Check whether the type has an explicit size.
    ///
    /// Only bit vectors declared or written with a size are sized. The
    /// integer, time, and real domains are not.
    pub fn is_sized(&self) -> bool {
        match *self {
            ValueType::BitVector { sized, .. } => sized,
            _ => false,
        }
    }

    /// Return the width of the type in bits.
    pub fn bit_width(&self) -> usize {
        match *self {
            ValueType::BitVector { width, .. } => width,
            ValueType::Integer => INTEGER_WIDTH,
            ValueType::Time => TIME_WIDTH,
            ValueType::Real => REAL_WIDTH,
        }
    }

    /// Check if this is the real domain.
    pub fn is_real(&self) -> bool {
        *self == ValueType::Real
    }

    /// Check if this is the integer domain.
    pub fn is_integer(&self) -> bool {
        *self == ValueType::Integer
    }

    /// Check if this is the time domain.
    pub fn is_time(&self) -> bool {
        *self == ValueType::Time
    }

    /// Check whether values of this type are bit vectors.
    ///
    /// This includes the integer and time domains.
    pub fn is_bit_vector(&self) -> bool {
        !self.is_real()
    }

    /// Change the width of a bit vector, keeping its sign and sizedness.
    ///
    /// The integer and time domains become bit vectors of the new width.
    /// Panics for the real domain.
    pub fn with_width(&self, width: usize) -> ValueType {
        match *self {
            ValueType::Real => bug!("real type has no adjustable width"),
            _ => ValueType::BitVector {
                sign: self.sign(),
                sized: self.is_sized(),
                width,
            },
        }
    }
}

impl Sign {
    /// Check whether the sign is unsigned.
    pub fn is_unsigned(&self) -> bool {
        *self == Sign::Unsigned
    }

    /// Check whether the sign is signed.
    pub fn is_signed(&self) -> bool {
        *self == Sign::Signed
    }
}

impl Display for Sign {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Sign::Signed => write!(f, "signed"),
            Sign::Unsigned => write!(f, "unsigned"),
        }
    }
}

impl Display for ValueType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            ValueType::Integer => write!(f, "integer"),
            ValueType::Time => write!(f, "time"),
            ValueType::Real => write!(f, "real"),
            ValueType::BitVector { sign, sized, width } => {
                if !sized {
                    write!(f, "unsized ")?;
                }
                write!(f, "logic")?;
                if sign == Sign::Signed {
                    write!(f, " {}", sign)?;
                }
                if width != 1 || !sized {
                    write!(f, " [{}:0]", width as isize - 1)?;
                }
                Ok(())
            }
        }
    }
}

/// Determine the common type of the two operands of an operator.
///
/// The result is as wide as the wider operand. It is signed only if both
/// operands are signed; a single unsigned operand makes the whole operation
/// unsigned. Panics if either operand is real.
pub fn combine(a: ValueType, b: ValueType) -> ValueType {
    if a.is_real() || b.is_real() {
        bug!("cannot combine real operand types `{}` and `{}`", a, b);
    }
    let sign = if a.is_signed() && b.is_signed() {
        Sign::Signed
    } else {
        Sign::Unsigned
    };
    ValueType::bit_vector(sign, std::cmp::max(a.bit_width(), b.bit_width()))
}

/// Determine the type of a power operator `a ** b`.
///
/// Only two unsigned sized bit vectors yield an unsigned bit vector as wide
/// as the wider operand. Everything else is real: the real and integer
/// domains, signed operands, and also the time domain and unsized literals
/// such as `'h3`, which carry no explicit size.
pub fn combine_with_real_promotion(a: ValueType, b: ValueType) -> ValueType {
    let keeps_bits = |t: ValueType| t.is_sized() && !t.is_signed();
    if keeps_bits(a) && keeps_bits(b) {
        ValueType::bit_vector(
            Sign::Unsigned,
            std::cmp::max(a.bit_width(), b.bit_width()),
        )
    } else {
        ValueType::Real
    }
}

/// Widen a type to satisfy the type required by the surrounding context.
///
/// The context can only grow the width. Sign and sizedness are kept from
/// `current`. A real `current` type is returned unchanged, and a real
/// `required` type imposes no width.
pub fn merge_with_required(current: ValueType, required: ValueType) -> ValueType {
    if current.is_real() || required.is_real() {
        return current;
    }
    if required.bit_width() <= current.bit_width() {
        return current;
    }
    current.with_width(required.bit_width())
}
