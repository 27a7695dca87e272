// Copyright (c) 2016-2021 Fabian Schuiki

//! Constant evaluation of expressions.
//!
//! Every expression is evaluated at its current type, which includes any
//! widening imposed by its context. Before an operator works on the value of
//! an operand, the operand's bits are reinterpreted with the operator's sign
//! and extended to the operator's width. This makes the result depend on the
//! context the same way it would in simulation:
//!
//! ```text
//! 4'hF + 4'h1            // 4'h0
//! wire [7:0] x = 4'hF + 4'h1;  // 8'h10
//! ```
//!
//! Values are two-state.

use crate::crate_prelude::*;
use crate::{
    expr::{ExprArena, ExprId, ExprKind, Index, OpCategory, PartSelect},
    range::PartSelectMode,
    ty::{combine, ValueType},
    value::{make_int, make_real, mask, modulus, truncate, ConstValue, ValueKind},
};
use itertools::Itertools;
use num::{BigInt, One, ToPrimitive, Zero};

/// Determine the constant value of an expression.
///
/// Emits a diagnostic and returns `Err(())` if the expression is not
/// constant or its evaluation fails.
pub fn const_value(
    arena: &ExprArena,
    id: ExprId,
    emitter: &impl DiagEmitter,
) -> Result<ConstValue> {
    Evaluator { arena, emitter }.eval(id)
}

/// Convert a value to a different type.
///
/// Integral values keep their bits, which are reinterpreted with the sign of
/// the target type and then extended or truncated to its width. Reals are
/// rounded. Returns `None` if an infinite or NaN real is converted to an
/// integral type.
pub fn convert(value: &ConstValue, ty: ValueType) -> Option<ConstValue> {
    if ty.is_real() {
        return Some(make_real(value.to_f64()));
    }
    Some(match value.kind {
        ValueKind::Real(_) => make_int(ty, value.to_bigint()?),
        ValueKind::Int(ref v) => {
            let bits = truncate(v, value.ty.bit_width(), ty.is_signed());
            make_int(ty, bits)
        }
    })
}

struct Evaluator<'a, 't, E> {
    arena: &'a ExprArena<'t>,
    emitter: &'a E,
}

impl<'a, 't, E: DiagEmitter> Evaluator<'a, 't, E> {
    fn eval(&self, id: ExprId) -> Result<ConstValue> {
        let value = self.eval_inner(id)?;
        trace!("{} evaluates to {}", id, value);
        Ok(value)
    }

    /// Evaluate an operand and convert it to the type of its parent.
    fn eval_as(&self, id: ExprId, ty: ValueType) -> Result<ConstValue> {
        let value = self.eval(id)?;
        self.convert(&value, ty)
    }

    /// Evaluate an operand as an unsigned number at its own width.
    fn eval_unsigned(&self, id: ExprId) -> Result<BigInt> {
        let v = self.eval(id)?;
        Ok(mask(&self.integral(&v)?, v.ty.bit_width()))
    }

    fn convert(&self, value: &ConstValue, ty: ValueType) -> Result<ConstValue> {
        match convert(value, ty) {
            Some(v) => Ok(v),
            None => self.error(format!("{} cannot be converted to {}", value, ty)),
        }
    }

    /// The integer value of a constant. Reals are rounded.
    fn integral(&self, value: &ConstValue) -> Result<BigInt> {
        match value.to_bigint() {
            Some(v) => Ok(v),
            None => self.error(format!("{} has no integer value", value)),
        }
    }

    fn error<T>(&self, msg: String) -> Result<T> {
        self.emitter.emit(DiagBuilder2::error(msg));
        Err(())
    }

    fn eval_inner(&self, id: ExprId) -> Result<ConstValue> {
        let expr = &self.arena[id];
        let ty = expr.value_type();
        match expr.kind {
            ExprKind::Const(ref v) => self.convert(v, ty),
            ExprKind::Primary(decl) => {
                if !decl.is_constant() {
                    return self.error(format!("{} is not constant", decl.desc_full()));
                }
                match decl.value {
                    Some(ref v) => self.convert(v, ty),
                    None => self.error(format!("{} has no value", decl.desc_full())),
                }
            }
            ExprKind::BitSelect { decl, index } => {
                let index = match index {
                    Index::Const(i) => Some(i),
                    Index::Var(i) => self.eval(i)?.to_isize(),
                };
                let (bits, offset) = self.select(decl, index, index)?;
                Ok(make_int(ty, (bits >> offset) & BigInt::one()))
            }
            ExprKind::PartSelect { decl, mode } => {
                let (left, right) = match mode {
                    PartSelect::Const { left, right } => (Some(left), Some(right)),
                    PartSelect::Plus { base, width } | PartSelect::Minus { base, width } => {
                        let mode = match mode {
                            PartSelect::Minus { .. } => PartSelectMode::Down,
                            _ => PartSelectMode::Up,
                        };
                        match self.eval(base)?.to_isize() {
                            Some(base) => {
                                let (l, r) =
                                    decl.bit_range().indexed_part_select(base, width, mode);
                                (Some(l), Some(r))
                            }
                            None => (None, None),
                        }
                    }
                };
                let (bits, offset) = self.select(decl, left, right)?;
                Ok(make_int(ty, bits >> offset))
            }
            ExprKind::ArrayElem { decl, ref indices } => self.array_elem(ty, decl, indices),
            ExprKind::Unary { op, arg } => self.eval_unary(ty, op, arg),
            ExprKind::Binary { op, lhs, rhs } => self.eval_binary(ty, op, lhs, rhs),
            ExprKind::Ternary { op, args } => match op {
                TernaryOp::Condition => {
                    let cond = self.eval(args[0])?;
                    let chosen = if cond.is_true() { args[1] } else { args[2] };
                    self.eval_as(chosen, ty)
                }
                TernaryOp::MinTypMax => self.eval_as(args[1], ty),
            },
            ExprKind::Concat(ref args) => Ok(make_int(ty, self.concat(args)?)),
            ExprKind::MultiConcat { count, ref args } => {
                let chunk = self.concat(args)?;
                let chunk_width = ty.bit_width() / count;
                let mut acc = BigInt::zero();
                for _ in 0..count {
                    acc = (acc << chunk_width) | &chunk;
                }
                Ok(make_int(ty, acc))
            }
        }
    }

    /// Fetch the bits of a declaration and the offset of a selection.
    ///
    /// Both indices must lie within the declared range.
    fn select(
        &self,
        decl: &Decl,
        left: Option<isize>,
        right: Option<isize>,
    ) -> Result<(BigInt, usize)> {
        let value = match decl.value {
            Some(ref v) if decl.is_constant() => v,
            _ => return self.error(format!("{} is not constant", decl.desc_full())),
        };
        let range = decl.bit_range();
        let (left, right) = match (left, right) {
            (Some(l), Some(r)) if range.contains(l) && range.contains(r) => (l, r),
            _ => {
                return self.error(format!(
                    "select outside of the range {} of {}",
                    range,
                    decl.desc_full()
                ));
            }
        };
        let offset = match range.offset_from_lsb(right) {
            Some(o) if range.offset_from_lsb(left).is_some() => o,
            _ => bug!("select [{}:{}] not within {}", left, right, range),
        };
        let bits = mask(&self.integral(value)?, range.size());
        Ok((bits, offset))
    }

    /// Fetch an element of a constant array.
    fn array_elem(&self, ty: ValueType, decl: &Decl, indices: &[ExprId]) -> Result<ConstValue> {
        let mut at = Vec::with_capacity(indices.len());
        for &index in indices {
            match self.eval(index)?.to_isize() {
                Some(i) => at.push(i),
                None => {
                    return self.error(format!("index of {} is not an integer", decl.desc_full()))
                }
            }
        }
        let array = match decl.array {
            Some(ref a) => a,
            None => bug!("element of {} which is not an array", decl.desc_full()),
        };
        if !decl.is_constant() {
            return self.error(format!("{} is not constant", decl.desc_full()));
        }
        let offset = match array.offset_of(&at) {
            Some(o) => o,
            None => {
                return self.error(format!(
                    "element [{}] outside of the dimensions {} of {}",
                    at.iter().format("]["),
                    array,
                    decl.desc_full()
                ));
            }
        };
        match decl.elems.get(offset) {
            Some(v) => self.convert(v, ty),
            None => self.error(format!(
                "element [{}] of {} has no value",
                at.iter().format("]["),
                decl.desc_full()
            )),
        }
    }

    fn concat(&self, args: &[ExprId]) -> Result<BigInt> {
        let mut acc = BigInt::zero();
        for &arg in args {
            let v = self.eval(arg)?;
            let width = v.ty.bit_width();
            acc = (acc << width) | mask(&self.integral(&v)?, width);
        }
        Ok(acc)
    }

    fn eval_unary(&self, ty: ValueType, op: UnaryOp, arg: ExprId) -> Result<ConstValue> {
        if op.is_sink() {
            let v = self.eval(arg)?;
            let bit = match op {
                UnaryOp::LogicNot => !v.is_true(),
                _ => {
                    let width = v.ty.bit_width();
                    let bits = mask(&self.integral(&v)?, width);
                    let ones = count_ones(&bits);
                    match op {
                        UnaryOp::RedAnd => ones == width,
                        UnaryOp::RedNand => ones != width,
                        UnaryOp::RedOr => ones != 0,
                        UnaryOp::RedNor => ones == 0,
                        UnaryOp::RedXor => ones % 2 == 1,
                        _ => ones % 2 == 0,
                    }
                }
            };
            return Ok(make_int(ty, BigInt::from(bit as u8)));
        }
        let v = self.eval_as(arg, ty)?;
        Ok(match (op, v.kind) {
            (UnaryOp::Minus, ValueKind::Real(x)) => make_real(-x),
            (UnaryOp::Minus, ValueKind::Int(x)) => make_int(ty, -x),
            (UnaryOp::BitNeg, ValueKind::Int(x)) => make_int(ty, -x - 1),
            (_, kind) => ConstValue { ty, kind },
        })
    }

    fn eval_binary(
        &self,
        ty: ValueType,
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
    ) -> Result<ConstValue> {
        match op.category() {
            OpCategory::BitOp | OpCategory::ArithOp => {
                let a = self.eval_as(lhs, ty)?;
                let b = self.eval_as(rhs, ty)?;
                if ty.is_real() {
                    return self.real_arith(op, a.to_f64(), b.to_f64());
                }
                self.int_arith(ty, op, self.integral(&a)?, self.integral(&b)?)
            }
            OpCategory::PowerOp => {
                if ty.is_real() {
                    let a = self.eval(lhs)?.to_f64();
                    let b = self.eval(rhs)?.to_f64();
                    return Ok(make_real(a.powf(b)));
                }
                let base = self.integral(&self.eval_as(lhs, ty)?)?;
                let base = mask(&base, ty.bit_width());
                let exp = self.eval_unsigned(rhs)?;
                Ok(make_int(ty, base.modpow(&exp, &modulus(ty.bit_width()))))
            }
            OpCategory::ShiftOp => {
                let width = ty.bit_width();
                let value = self.integral(&self.eval_as(lhs, ty)?)?;
                let amount = self
                    .eval_unsigned(rhs)?
                    .to_usize()
                    .map(|a| a.min(width))
                    .unwrap_or(width);
                let result = match op {
                    BinaryOp::Shl | BinaryOp::AShl => value << amount,
                    BinaryOp::AShr if ty.is_signed() => value >> amount,
                    _ => mask(&value, width) >> amount,
                };
                Ok(make_int(ty, result))
            }
            OpCategory::CompareOp => {
                let common = combine(
                    self.arena.value_type(lhs),
                    self.arena.value_type(rhs),
                );
                let a = self.integral(&self.eval_as(lhs, common)?)?;
                let b = self.integral(&self.eval_as(rhs, common)?)?;
                let bit = match op {
                    BinaryOp::Eq | BinaryOp::CaseEq => a == b,
                    BinaryOp::Neq | BinaryOp::CaseNeq => a != b,
                    BinaryOp::Lt => a < b,
                    BinaryOp::Leq => a <= b,
                    BinaryOp::Gt => a > b,
                    _ => a >= b,
                };
                Ok(make_int(ty, BigInt::from(bit as u8)))
            }
            OpCategory::LogOp => {
                let a = self.eval(lhs)?.is_true();
                let b = self.eval(rhs)?.is_true();
                let bit = match op {
                    BinaryOp::LogicAnd => a && b,
                    _ => a || b,
                };
                Ok(make_int(ty, BigInt::from(bit as u8)))
            }
        }
    }

    fn int_arith(&self, ty: ValueType, op: BinaryOp, a: BigInt, b: BigInt) -> Result<ConstValue> {
        let width = ty.bit_width();
        let result = match op {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            BinaryOp::Div | BinaryOp::Mod if b.is_zero() => {
                return self.error(format!("{} by zero", op.desc_full()));
            }
            BinaryOp::Div => a / b,
            BinaryOp::Mod => a % b,
            BinaryOp::BitAnd => mask(&a, width) & mask(&b, width),
            BinaryOp::BitOr => mask(&a, width) | mask(&b, width),
            BinaryOp::BitXor => mask(&a, width) ^ mask(&b, width),
            BinaryOp::BitXnor => (mask(&a, width) ^ mask(&b, width)) ^ (modulus(width) - 1),
            _ => bug!("{} is not arithmetic", op.desc_full()),
        };
        Ok(make_int(ty, result))
    }

    fn real_arith(&self, op: BinaryOp, a: f64, b: f64) -> Result<ConstValue> {
        Ok(make_real(match op {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            BinaryOp::Div if b == 0.0 => {
                return self.error(format!("{} by zero", op.desc_full()));
            }
            BinaryOp::Div => a / b,
            _ => bug!("{} applied to real operands", op.desc_full()),
        }))
    }
}

/// Count the set bits of a nonnegative number.
fn count_ones(value: &BigInt) -> usize {
    let (_, bytes) = value.to_bytes_le();
    bytes.iter().map(|b| b.count_ones() as usize).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ty::Sign;

    #[test]
    fn convert_reinterprets_sign() {
        let minus_one = make_int(ValueType::bit_vector(Sign::Signed, 4), BigInt::from(-1));
        let wide_unsigned = convert(&minus_one, ValueType::bit_vector(Sign::Unsigned, 8)).unwrap();
        assert_eq!(wide_unsigned.get_int(), Some(&BigInt::from(15)));
        let wide_signed = convert(&minus_one, ValueType::bit_vector(Sign::Signed, 8)).unwrap();
        assert_eq!(wide_signed.get_int(), Some(&BigInt::from(-1)));
        assert_eq!(convert(&minus_one, ValueType::REAL).unwrap().to_f64(), -1.0);
    }

    #[test]
    fn convert_rounds_reals() {
        let v = convert(&make_real(2.5), ValueType::INTEGER).unwrap();
        assert_eq!(v.get_int(), Some(&BigInt::from(3)));
        let v = convert(&make_real(1e40), ValueType::bit_vector(Sign::Unsigned, 8)).unwrap();
        assert_eq!(v.get_int(), Some(&BigInt::from(0)));
        assert_eq!(convert(&make_real(std::f64::INFINITY), ValueType::INTEGER), None);
        assert_eq!(convert(&make_real(std::f64::NAN), ValueType::BIT), None);
    }

    #[test]
    fn ones() {
        assert_eq!(count_ones(&BigInt::from(0)), 0);
        assert_eq!(count_ones(&BigInt::from(0b1011_0000_0001u32)), 4);
    }
}
