// Copyright (c) 2016-2021 Fabian Schuiki

//! Construction of expressions.
//!
//! Each constructor determines the self-determined type of the new node from
//! its operands, and fixes the width of operands that the operator evaluates
//! in a self-determined context.

use super::*;
use crate::ty::{self, Sign};
use velab_common::util::HasDesc;

impl<'t> ExprArena<'t> {
    /// Add a constant literal.
    pub fn add_const(&mut self, value: ConstValue) -> ExprId {
        let ty = value.ty;
        self.push(ExprKind::Const(value), ty)
    }

    /// Add a reference to a declaration.
    pub fn add_primary(&mut self, decl: &'t Decl) -> ExprId {
        self.push(ExprKind::Primary(decl), decl.value_type())
    }

    /// Add a bit select `decl[index]`.
    ///
    /// A variable index is evaluated at its own width.
    pub fn add_bit_select(&mut self, decl: &'t Decl, index: Index) -> ExprId {
        if decl.is_real() {
            bug!("bit select of real {}", decl.name);
        }
        if let Index::Var(id) = index {
            self.check_operand(id);
            self.set_self_size(id);
        }
        self.push(ExprKind::BitSelect { decl, index }, ValueType::BIT)
    }

    /// Add a part select of a declaration.
    ///
    /// The base of an indexed part select is evaluated at its own width.
    pub fn add_part_select(&mut self, decl: &'t Decl, mode: PartSelect) -> ExprId {
        if decl.is_real() {
            bug!("part select of real {}", decl.name);
        }
        let width = match mode {
            PartSelect::Const { left, right } => ((left - right).abs() + 1) as usize,
            PartSelect::Plus { base, width } | PartSelect::Minus { base, width } => {
                if width == 0 {
                    bug!("part select of {} with zero width", decl.name);
                }
                self.check_operand(base);
                self.set_self_size(base);
                width
            }
        };
        self.push(
            ExprKind::PartSelect { decl, mode },
            ValueType::bit_vector(Sign::Unsigned, width),
        )
    }

    /// Add an element of an array `decl[i][j]...`.
    ///
    /// There must be one index per dimension of the array. The indices are
    /// evaluated at their own width.
    pub fn add_array_elem(&mut self, decl: &'t Decl, indices: Vec<ExprId>) -> ExprId {
        let dims = match decl.array {
            Some(ref array) => array.dim_count(),
            None => bug!("element of {} which is not an array", decl.name),
        };
        if indices.len() != dims {
            bug!(
                "{} indices into array {} of {} dimensions",
                indices.len(),
                decl.name,
                dims
            );
        }
        for &index in &indices {
            self.check_operand(index);
            if self.value_type(index).is_real() {
                bug!("real index {} into array {}", index, decl.name);
            }
            self.set_self_size(index);
        }
        self.push(ExprKind::ArrayElem { decl, indices }, decl.value_type())
    }

    /// Add a unary operator.
    pub fn add_unary(&mut self, op: UnaryOp, arg: ExprId) -> ExprId {
        self.check_operand(arg);
        let arg_ty = self.value_type(arg);
        if op.rejects_real() && arg_ty.is_real() {
            bug!("real operand of {}", op.desc_full());
        }
        let ty = if op.is_sink() {
            self.set_self_size(arg);
            ValueType::BIT
        } else {
            arg_ty
        };
        self.push(ExprKind::Unary { op, arg }, ty)
    }

    /// Add a binary operator.
    ///
    /// | Category   | Operands              | Type                       |
    /// |------------|-----------------------|----------------------------|
    /// | bitwise    | untouched             | `combine`                  |
    /// | arithmetic | untouched             | `combine`, or real         |
    /// | power      | exponent self-sized   | `combine_with_real_promotion` |
    /// | shift      | amount self-sized     | left operand               |
    /// | comparison | both sized to `combine` | one bit                  |
    /// | logical    | both self-sized       | one bit                    |
    pub fn add_binary(&mut self, op: BinaryOp, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.check_operand(lhs);
        self.check_operand(rhs);
        let lhs_ty = self.value_type(lhs);
        let rhs_ty = self.value_type(rhs);
        let ty = match op.category() {
            OpCategory::BitOp => ty::combine(lhs_ty, rhs_ty),
            OpCategory::ArithOp => {
                if !lhs_ty.is_real() && !rhs_ty.is_real() {
                    ty::combine(lhs_ty, rhs_ty)
                } else if op.rejects_real() {
                    bug!("real operand of {}", op.desc_full());
                } else {
                    ValueType::REAL
                }
            }
            OpCategory::PowerOp => {
                self.set_self_size(rhs);
                ty::combine_with_real_promotion(lhs_ty, rhs_ty)
            }
            OpCategory::ShiftOp => {
                if lhs_ty.is_real() {
                    bug!("real left operand of {}", op.desc_full());
                }
                self.set_self_size(rhs);
                lhs_ty
            }
            OpCategory::CompareOp => {
                let common = ty::combine(lhs_ty, rhs_ty);
                self.propagate_required_type(lhs, common);
                self.propagate_required_type(rhs, common);
                ValueType::BIT
            }
            OpCategory::LogOp => {
                self.set_self_size(lhs);
                self.set_self_size(rhs);
                ValueType::BIT
            }
        };
        self.push(ExprKind::Binary { op, lhs, rhs }, ty)
    }

    /// Add a ternary operator.
    ///
    /// The arguments are given in source order, i.e. `cond ? a : b` and
    /// `min : typ : max`.
    pub fn add_ternary(&mut self, op: TernaryOp, args: [ExprId; 3]) -> ExprId {
        for &arg in &args {
            self.check_operand(arg);
        }
        let ty = match op {
            TernaryOp::Condition => {
                self.set_self_size(args[0]);
                let a = self.value_type(args[1]);
                let b = self.value_type(args[2]);
                if a.is_real() || b.is_real() {
                    ValueType::REAL
                } else {
                    ty::combine(a, b)
                }
            }
            TernaryOp::MinTypMax => self.value_type(args[1]),
        };
        self.push(ExprKind::Ternary { op, args }, ty)
    }

    /// Add a concatenation `{args...}`.
    pub fn add_concat(&mut self, args: Vec<ExprId>) -> ExprId {
        let width = self.concat_operands(&args);
        self.push(
            ExprKind::Concat(args),
            ValueType::bit_vector(Sign::Unsigned, width),
        )
    }

    /// Add a replication `{count{args...}}`.
    pub fn add_multi_concat(&mut self, count: usize, args: Vec<ExprId>) -> ExprId {
        if count == 0 {
            bug!("replication with zero count");
        }
        let width = self.concat_operands(&args) * count;
        self.push(
            ExprKind::MultiConcat { count, args },
            ValueType::bit_vector(Sign::Unsigned, width),
        )
    }

    /// Size the operands of a concatenation and return their total width.
    fn concat_operands(&mut self, args: &[ExprId]) -> usize {
        if args.is_empty() {
            bug!("concatenation without operands");
        }
        let mut width = 0;
        for &arg in args {
            self.check_operand(arg);
            let arg_ty = self.value_type(arg);
            if arg_ty.is_real() {
                bug!("real operand {} in concatenation", arg);
            }
            self.set_self_size(arg);
            width += arg_ty.bit_width();
        }
        width
    }

    /// Ensure that an operand has been constructed in this arena.
    fn check_operand(&self, id: ExprId) {
        if id.as_usize() >= self.len() {
            bug!("operand {} has not been constructed in this arena", id);
        }
    }
}
