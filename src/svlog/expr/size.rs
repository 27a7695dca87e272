// Copyright (c) 2016-2021 Fabian Schuiki

//! Propagation of context-determined types.

use super::*;
use crate::ty::merge_with_required;

impl<'t> ExprArena<'t> {
    /// Impose the type required by the context onto an expression.
    ///
    /// Records `required` on the expression. Operators whose result depends
    /// on the context widen their type to the required width and forward the
    /// widened type to the operands that are evaluated in the same context.
    /// Comparisons, logical operators, reductions, and concatenations keep
    /// their type and stop the propagation.
    ///
    /// Panics if a context has already been imposed onto the expression.
    pub fn propagate_required_type(&mut self, id: ExprId, required: ValueType) {
        let expr = self.get(id);
        if let Some(prev) = expr.required {
            bug!(
                "context `{}` imposed onto {} which already has context `{}`",
                required,
                id,
                prev
            );
        }
        let current = expr.ty;
        let merged = merge_with_required(current, required);
        let (ty, forward) = match expr.kind {
            ExprKind::Const(_)
            | ExprKind::Primary(_)
            | ExprKind::BitSelect { .. }
            | ExprKind::PartSelect { .. }
            | ExprKind::ArrayElem { .. } => (current, vec![]),
            ExprKind::Unary { op, .. } if op.is_sink() => (current, vec![]),
            ExprKind::Unary { arg, .. } => (merged, vec![arg]),
            ExprKind::Binary { op, lhs, rhs } => match op.category() {
                OpCategory::BitOp | OpCategory::ArithOp => (merged, vec![lhs, rhs]),
                OpCategory::PowerOp | OpCategory::ShiftOp => (merged, vec![lhs]),
                OpCategory::CompareOp | OpCategory::LogOp => (current, vec![]),
            },
            ExprKind::Ternary {
                op: TernaryOp::Condition,
                args,
            } => (merged, vec![args[1], args[2]]),
            ExprKind::Ternary {
                op: TernaryOp::MinTypMax,
                args,
            } => (merged, args.to_vec()),
            ExprKind::Concat(_) | ExprKind::MultiConcat { .. } => (current, vec![]),
        };
        trace!("{} : {} in context `{}` -> {}", id, current, required, ty);
        let expr = self.get_mut(id);
        expr.ty = ty;
        expr.required = Some(required);
        for arg in forward {
            self.propagate_required_type(arg, ty);
        }
    }

    /// Evaluate an expression at its own width.
    pub fn set_self_size(&mut self, id: ExprId) {
        let ty = self.value_type(id);
        self.propagate_required_type(id, ty);
    }
}
