// Copyright (c) 2016-2021 Fabian Schuiki

//! The elaboration driver for expressions.
//!
//! The `Elaborator` checks the operands handed to it for problems in the
//! user's input before it builds expressions in its arena, and reports such
//! problems as diagnostics. It also applies the contexts in which
//! expressions appear, such as assignments and port connections.

use crate::crate_prelude::*;
use crate::{
    eval,
    expr::{print::decompile, ExprArena, ExprId, Index, OpCategory, PartSelect},
    range::PartSelectMode,
    ty::{Sign, ValueType},
    value::{make_int, make_real, ConstValue},
};
use num::BigInt;
use std::fmt::Display;

/// Elaborates the expressions of one unit.
pub struct Elaborator<'a, 't> {
    sess: &'a Session,
    arena: ExprArena<'t>,
}

impl<'a, 't> Elaborator<'a, 't> {
    /// Create a new elaborator with an empty arena.
    pub fn new(sess: &'a Session) -> Self {
        Elaborator {
            sess,
            arena: ExprArena::new(),
        }
    }

    /// The arena holding the elaborated expressions.
    pub fn arena(&self) -> &ExprArena<'t> {
        &self.arena
    }

    /// Consume the elaborator and return its arena.
    pub fn into_arena(self) -> ExprArena<'t> {
        self.arena
    }

    /// Add a plain decimal literal such as `42`, which has `integer` type.
    pub fn int_const(&mut self, value: impl Into<BigInt>) -> ExprId {
        let id = self
            .arena
            .add_const(make_int(ValueType::INTEGER, value.into()));
        self.report_type(id)
    }

    /// Add a based literal such as `8'shff` or `'h3`.
    ///
    /// Literals without a size are 32 bits wide.
    pub fn based_const(
        &mut self,
        sign: Sign,
        size: Option<usize>,
        value: impl Into<BigInt>,
    ) -> Result<ExprId> {
        let ty = match size {
            Some(0) => {
                self.emit(DiagBuilder2::error("size of a literal must be positive"));
                return Err(());
            }
            Some(width) => ValueType::bit_vector(sign, width),
            None => ValueType::unsized_vector(sign),
        };
        let id = self.arena.add_const(make_int(ty, value.into()));
        Ok(self.report_type(id))
    }

    /// Add a real literal such as `1.5`.
    pub fn real_const(&mut self, value: f64) -> ExprId {
        let id = self.arena.add_const(make_real(value));
        self.report_type(id)
    }

    /// Add a reference to a declaration.
    pub fn primary(&mut self, decl: &'t Decl) -> ExprId {
        let id = self.arena.add_primary(decl);
        self.report_type(id)
    }

    /// Add a unary operator.
    pub fn unary(&mut self, op: UnaryOp, arg: ExprId) -> Result<ExprId> {
        if op.rejects_real() {
            self.reject_real(arg, &op.desc_full())?;
        }
        let id = self.arena.add_unary(op, arg);
        Ok(self.report_type(id))
    }

    /// Add a binary operator.
    pub fn binary(&mut self, op: BinaryOp, lhs: ExprId, rhs: ExprId) -> Result<ExprId> {
        if op.rejects_real() || op.category() == OpCategory::CompareOp {
            let what = op.desc_full();
            let l = self.reject_real(lhs, &what);
            let r = self.reject_real(rhs, &what);
            l.and(r)?;
        }
        let id = self.arena.add_binary(op, lhs, rhs);
        Ok(self.report_type(id))
    }

    /// Add a ternary operator, with arguments in source order.
    pub fn ternary(&mut self, op: TernaryOp, args: [ExprId; 3]) -> Result<ExprId> {
        let id = self.arena.add_ternary(op, args);
        Ok(self.report_type(id))
    }

    /// Add a concatenation `{args...}`.
    pub fn concat(&mut self, args: Vec<ExprId>) -> Result<ExprId> {
        self.check_concat(&args)?;
        let id = self.arena.add_concat(args);
        Ok(self.report_type(id))
    }

    /// Add a replication `{count{args...}}`.
    ///
    /// The count must be a positive constant.
    pub fn multi_concat(&mut self, count: ExprId, args: Vec<ExprId>) -> Result<ExprId> {
        let n = self.constant_int(count, "replication count")?;
        if n <= 0 {
            self.emit(
                DiagBuilder2::error(format!(
                    "replication count `{}` must be positive",
                    decompile(&self.arena, count)
                ))
                .add_note(format!("count evaluates to {}", n)),
            );
            return Err(());
        }
        self.check_concat(&args)?;
        let id = self.arena.add_multi_concat(n as usize, args);
        Ok(self.report_type(id))
    }

    /// Add a bit select `decl[index]`.
    ///
    /// Constant indices are folded into the expression.
    pub fn bit_select(&mut self, decl: &'t Decl, index: ExprId) -> Result<ExprId> {
        self.check_selectable(decl)?;
        self.reject_real(index, "bit select index")?;
        let index = if self.arena.is_constant(index) {
            let i = self.constant_int(index, "bit select index")?;
            self.check_select_range(decl, &[i]);
            Index::Const(i)
        } else {
            Index::Var(index)
        };
        let id = self.arena.add_bit_select(decl, index);
        Ok(self.report_type(id))
    }

    /// Add a part select `decl[left:right]`.
    ///
    /// Both bounds must be constant, and must run in the same direction as
    /// the declared range.
    pub fn part_select(&mut self, decl: &'t Decl, left: ExprId, right: ExprId) -> Result<ExprId> {
        self.check_selectable(decl)?;
        let l = self.constant_int(left, "part select bound");
        let r = self.constant_int(right, "part select bound");
        let (l, r) = (l?, r?);
        let range = decl.bit_range();
        if !range.is_same_order(l, r) {
            self.emit(
                DiagBuilder2::error(format!(
                    "part select [{}:{}] runs opposite to the range of {}",
                    l,
                    r,
                    decl.desc_full()
                ))
                .add_note(format!("{} is declared as {}", decl.name, range)),
            );
            return Err(());
        }
        self.check_select_range(decl, &[l, r]);
        let id = self
            .arena
            .add_part_select(decl, PartSelect::Const { left: l, right: r });
        Ok(self.report_type(id))
    }

    /// Add an indexed part select `decl[base +: width]` or `decl[base -: width]`.
    ///
    /// The width must be a positive constant. A constant base is folded into
    /// the expression.
    pub fn indexed_part_select(
        &mut self,
        decl: &'t Decl,
        base: ExprId,
        mode: PartSelectMode,
        width: ExprId,
    ) -> Result<ExprId> {
        self.check_selectable(decl)?;
        self.reject_real(base, "part select base")?;
        let w = self.constant_int(width, "part select width")?;
        if w <= 0 {
            self.emit(DiagBuilder2::error(format!(
                "part select width `{}` must be positive",
                decompile(&self.arena, width)
            )));
            return Err(());
        }
        let w = w as usize;
        let select = if self.arena.is_constant(base) {
            let b = self.constant_int(base, "part select base")?;
            let (left, right) = decl.bit_range().indexed_part_select(b, w, mode);
            self.check_select_range(decl, &[left, right]);
            PartSelect::Const { left, right }
        } else {
            match mode {
                PartSelectMode::Up => PartSelect::Plus { base, width: w },
                PartSelectMode::Down => PartSelect::Minus { base, width: w },
            }
        };
        let id = self.arena.add_part_select(decl, select);
        Ok(self.report_type(id))
    }

    /// Add an element of an array `decl[i][j]...`.
    ///
    /// Takes one index per dimension. Constant indices outside their
    /// dimension produce a warning.
    pub fn array_elem(&mut self, decl: &'t Decl, indices: Vec<ExprId>) -> Result<ExprId> {
        let array = match decl.array {
            Some(ref array) => array,
            None => {
                self.emit(DiagBuilder2::error(format!(
                    "{} is not an array",
                    decl.desc_full()
                )));
                return Err(());
            }
        };
        if indices.len() != array.dim_count() {
            self.emit(
                DiagBuilder2::error(format!(
                    "{} has {} dimensions, but {} indices were given",
                    decl.desc_full(),
                    array.dim_count(),
                    indices.len()
                ))
                .add_note(format!("{} is declared as {}", decl.name, array)),
            );
            return Err(());
        }
        let mut result = Ok(());
        for &index in &indices {
            result = result.and(self.reject_real(index, "array index"));
        }
        result?;
        for (dim, &index) in array.dims().iter().zip(&indices) {
            if !self.arena.is_constant(index) {
                continue;
            }
            let i = self.constant_int(index, "array index")?;
            if !dim.contains(i) {
                self.warn_outside(decl, i, array);
            }
        }
        let id = self.arena.add_array_elem(decl, indices);
        Ok(self.report_type(id))
    }

    /// Apply the context of an assignment to its right-hand side.
    pub fn assign(&mut self, lhs: ValueType, rhs: ExprId) {
        self.propagate(rhs, lhs)
    }

    /// Apply the context of a port of the given width to a connected
    /// expression.
    pub fn connect_port(&mut self, expr: ExprId, width: usize) {
        self.propagate(expr, ValueType::bit_vector(Sign::Unsigned, width))
    }

    /// Evaluate an expression at its own width.
    pub fn self_determined(&mut self, expr: ExprId) {
        let ty = self.arena.value_type(expr);
        self.propagate(expr, ty)
    }

    /// Impose a required type onto an expression.
    pub fn propagate(&mut self, expr: ExprId, required: ValueType) {
        if self.has_verbosity(Verbosity::TYPE_CONTEXTS) {
            self.emit(DiagBuilder2::note(format!(
                "`{}` appears in context {}",
                decompile(&self.arena, expr),
                required
            )));
        }
        self.arena.propagate_required_type(expr, required);
    }

    /// Determine the constant value of an expression.
    pub fn evaluate(&self, expr: ExprId) -> Result<ConstValue> {
        let value = eval::const_value(&self.arena, expr, self)?;
        if self.has_verbosity(Verbosity::CONSTS) {
            self.emit(DiagBuilder2::note(format!(
                "`{}` = {}",
                decompile(&self.arena, expr),
                value
            )));
        }
        Ok(value)
    }

    /// Determine the constant value of an expression as a machine integer.
    pub fn evaluate_int(&self, expr: ExprId) -> Result<isize> {
        let value = self.evaluate(expr)?;
        match value.to_isize() {
            Some(v) => Ok(v),
            None => {
                self.emit(DiagBuilder2::error(format!(
                    "`{}` is not an integer",
                    decompile(&self.arena, expr)
                )));
                Err(())
            }
        }
    }

    /// Evaluate an expression that must be constant.
    fn constant_int(&self, expr: ExprId, what: &str) -> Result<isize> {
        if !self.arena.is_constant(expr) {
            self.emit(DiagBuilder2::error(format!(
                "{} `{}` is not constant",
                what,
                decompile(&self.arena, expr)
            )));
            return Err(());
        }
        self.evaluate_int(expr)
    }

    fn reject_real(&self, expr: ExprId, what: &str) -> Result<()> {
        if self.arena.value_type(expr).is_real() {
            self.emit(
                DiagBuilder2::error(format!("illegal real type in operand of {}", what))
                    .add_note(format!("`{}` is real", decompile(&self.arena, expr))),
            );
            return Err(());
        }
        Ok(())
    }

    fn check_concat(&self, args: &[ExprId]) -> Result<()> {
        if args.is_empty() {
            self.emit(DiagBuilder2::error("concatenation must not be empty"));
            return Err(());
        }
        let mut result = Ok(());
        for &arg in args {
            result = result.and(self.reject_real(arg, "concatenation"));
        }
        result
    }

    fn check_selectable(&self, decl: &Decl) -> Result<()> {
        if decl.is_real() {
            self.emit(DiagBuilder2::error(format!(
                "cannot select bits of {}",
                decl.desc_full()
            )));
            return Err(());
        }
        Ok(())
    }

    fn check_select_range(&self, decl: &Decl, indices: &[isize]) {
        let range = decl.bit_range();
        if let Some(&i) = indices.iter().find(|&&i| !range.contains(i)) {
            self.warn_outside(decl, i, &range);
        }
    }

    fn warn_outside(&self, decl: &Decl, index: isize, declared: &dyn Display) {
        if !self.sess.opts.warn_select_range {
            return;
        }
        self.emit(
            DiagBuilder2::warning(format!(
                "index {} is outside the range of {}",
                index,
                decl.desc_full()
            ))
            .add_note(format!("{} is declared as {}", decl.name, declared)),
        );
    }

    fn report_type(&self, id: ExprId) -> ExprId {
        if self.has_verbosity(Verbosity::EXPR_TYPES) {
            self.emit(DiagBuilder2::note(format!(
                "type of `{}` is {}",
                decompile(&self.arena, id),
                self.arena.value_type(id)
            )));
        }
        id
    }
}

impl DiagEmitter for Elaborator<'_, '_> {
    fn emit(&self, diag: DiagBuilder2) {
        self.sess.emit(diag)
    }
}

impl SessionContext for Elaborator<'_, '_> {
    fn sess(&self) -> &Session {
        self.sess
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use velab_common::SessionOptions;

    #[test]
    fn unsized_literal() {
        let sess = Session::new();
        let mut elab = Elaborator::new(&sess);
        let e = elab.based_const(Sign::Unsigned, None, 3).unwrap();
        let ty = elab.arena().value_type(e);
        assert!(!ty.is_sized());
        assert_eq!(ty.bit_width(), 32);
        assert!(elab.based_const(Sign::Unsigned, Some(0), 3).is_err());
        assert!(sess.failed());
    }

    #[test]
    fn verbose_types() {
        let mut opts = SessionOptions::default();
        opts.verbosity = Verbosity::EXPR_TYPES;
        let sess = Session::with_options(opts);
        let mut elab = Elaborator::new(&sess);
        elab.int_const(1);
        assert_eq!(sess.count(Severity::Note), 1);
        let diags = sess.take_diagnostics();
        assert_eq!(diags[0].get_message(), "type of `1` is integer");
        assert!(!sess.failed());
    }
}
