// Copyright (c) 2016-2021 Fabian Schuiki

//! Elaborated expressions and their sizing.
//!
//! Expressions are built bottom-up into an `ExprArena`, which owns all nodes
//! of one elaboration unit and hands out `ExprId`s to refer to them. Sizing
//! happens in two phases:
//!
//! 1. Construction determines the self-determined type of a node from the
//!    types of its operands. Some operators also fix the width of some of
//!    their operands at this point.
//! 2. Once the surrounding context is known, `propagate_required_type`
//!    imposes the width required by that context onto the node. Depending on
//!    the operator, the node widens and forwards the context to its
//!    operands. This happens at most once per node.

mod build;
pub mod op;
pub mod print;
mod size;

pub use self::op::{BinaryOp, OpCategory, TernaryOp, UnaryOp};

use crate::{decl::Decl, ty::ValueType, value::ConstValue};
use itertools::Itertools;

/// A handle to an expression in an `ExprArena`.
#[derive(Clone, Copy, PartialEq, PartialOrd, Eq, Ord, Hash, Debug)]
pub struct ExprId(u32);

impl ExprId {
    /// Create a new id from an arena index.
    pub fn new(x: usize) -> ExprId {
        use std::u32;
        assert!(x < (u32::MAX as usize));
        ExprId(x as u32)
    }

    /// Return the arena index of the id.
    pub fn as_usize(&self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for ExprId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// An elaborated expression.
#[derive(Debug, Clone)]
pub struct Expr<'t> {
    /// The handle of this expression.
    pub id: ExprId,
    /// The expression data.
    pub kind: ExprKind<'t>,
    /// The type of the expression, possibly widened by its context.
    ty: ValueType,
    /// The type imposed by the context, once it is known.
    required: Option<ValueType>,
}

/// The different forms an expression can take.
#[derive(Debug, Clone)]
pub enum ExprKind<'t> {
    /// A constant literal.
    Const(ConstValue),
    /// A reference to a declaration.
    Primary(&'t Decl),
    /// A single bit select `x[i]`.
    BitSelect { decl: &'t Decl, index: Index },
    /// A part select `x[a:b]`, `x[a+:b]`, or `x[a-:b]`.
    PartSelect { decl: &'t Decl, mode: PartSelect },
    /// An element of an array `x[i][j]`, with one index per dimension.
    ArrayElem {
        decl: &'t Decl,
        indices: Vec<ExprId>,
    },
    /// A unary operator.
    Unary { op: UnaryOp, arg: ExprId },
    /// A binary operator.
    Binary {
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
    },
    /// A ternary operator. The arguments are in source order.
    Ternary { op: TernaryOp, args: [ExprId; 3] },
    /// A concatenation `{a, b, c}`.
    Concat(Vec<ExprId>),
    /// A replication `{n{a, b, c}}`.
    MultiConcat { count: usize, args: Vec<ExprId> },
}

/// The index of a bit select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Index {
    /// A constant index.
    Const(isize),
    /// An index computed by an expression.
    Var(ExprId),
}

/// The bounds of a part select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartSelect {
    /// `[left:right]`
    Const { left: isize, right: isize },
    /// `[base +: width]`
    Plus { base: ExprId, width: usize },
    /// `[base -: width]`
    Minus { base: ExprId, width: usize },
}

/// Where an expression stands in the sizing protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeState {
    /// The expression has been constructed and carries its self-determined
    /// type.
    Constructed,
    /// The context has imposed a required type onto the expression.
    Finalized,
}

impl<'t> Expr<'t> {
    /// The current type of the expression.
    pub fn value_type(&self) -> ValueType {
        self.ty
    }

    /// The type imposed by the context, if any.
    pub fn required_type(&self) -> Option<ValueType> {
        self.required
    }

    /// Where the expression stands in the sizing protocol.
    pub fn state(&self) -> SizeState {
        match self.required {
            Some(_) => SizeState::Finalized,
            None => SizeState::Constructed,
        }
    }

    /// The width at which the expression is evaluated by its parent.
    ///
    /// A real context carries no width, so the expression keeps its own.
    pub fn bit_size(&self) -> usize {
        match self.required {
            Some(req) if !req.is_real() => req.bit_width(),
            _ => self.ty.bit_width(),
        }
    }
}

impl<'t> ExprKind<'t> {
    /// The subexpressions of this expression, in source order.
    pub fn operands(&self) -> Vec<ExprId> {
        match *self {
            ExprKind::Const(_) | ExprKind::Primary(_) => vec![],
            ExprKind::BitSelect { index, .. } => match index {
                Index::Const(_) => vec![],
                Index::Var(id) => vec![id],
            },
            ExprKind::PartSelect { mode, .. } => match mode {
                PartSelect::Const { .. } => vec![],
                PartSelect::Plus { base, .. } | PartSelect::Minus { base, .. } => vec![base],
            },
            ExprKind::Unary { arg, .. } => vec![arg],
            ExprKind::Binary { lhs, rhs, .. } => vec![lhs, rhs],
            ExprKind::Ternary { args, .. } => args.to_vec(),
            ExprKind::Concat(ref args) | ExprKind::MultiConcat { ref args, .. } => args.clone(),
            ExprKind::ArrayElem { ref indices, .. } => indices.clone(),
        }
    }

    /// The declaration this expression refers to, if any.
    pub fn decl(&self) -> Option<&'t Decl> {
        match *self {
            ExprKind::Primary(decl)
            | ExprKind::BitSelect { decl, .. }
            | ExprKind::PartSelect { decl, .. }
            | ExprKind::ArrayElem { decl, .. } => Some(decl),
            _ => None,
        }
    }
}

/// The arena that owns the expressions of one elaboration unit.
#[derive(Debug, Default)]
pub struct ExprArena<'t> {
    nodes: Vec<Expr<'t>>,
}

impl<'t> ExprArena<'t> {
    /// Create an empty arena.
    pub fn new() -> ExprArena<'t> {
        ExprArena { nodes: Vec::new() }
    }

    /// The number of expressions in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check whether the arena is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all expressions in construction order.
    pub fn iter(&self) -> impl Iterator<Item = &Expr<'t>> {
        self.nodes.iter()
    }

    /// Look up an expression.
    ///
    /// Panics if the id does not refer to an expression of this arena.
    pub fn get(&self, id: ExprId) -> &Expr<'t> {
        match self.nodes.get(id.as_usize()) {
            Some(e) => e,
            None => bug!("{} is not an expression of this arena", id),
        }
    }

    fn get_mut(&mut self, id: ExprId) -> &mut Expr<'t> {
        match self.nodes.get_mut(id.as_usize()) {
            Some(e) => e,
            None => bug!("{} is not an expression of this arena", id),
        }
    }

    /// The current type of an expression.
    pub fn value_type(&self, id: ExprId) -> ValueType {
        self.get(id).value_type()
    }

    /// The type imposed onto an expression by its context, if any.
    pub fn required_type(&self, id: ExprId) -> Option<ValueType> {
        self.get(id).required_type()
    }

    /// The width at which an expression is evaluated by its parent.
    pub fn bit_size(&self, id: ExprId) -> usize {
        self.get(id).bit_size()
    }

    /// Where an expression stands in the sizing protocol.
    pub fn state(&self, id: ExprId) -> SizeState {
        self.get(id).state()
    }

    /// Check whether an expression has a constant value.
    ///
    /// Literals and references to parameters and genvars are constant.
    /// Everything else is constant if all its operands are.
    pub fn is_constant(&self, id: ExprId) -> bool {
        let expr = self.get(id);
        match expr.kind {
            ExprKind::Const(_) => true,
            ExprKind::Primary(decl) => decl.is_constant(),
            ExprKind::BitSelect { decl, .. }
            | ExprKind::PartSelect { decl, .. }
            | ExprKind::ArrayElem { decl, .. } => {
                decl.is_constant()
                    && expr.kind.operands().into_iter().all(|id| self.is_constant(id))
            }
            _ => expr.kind.operands().into_iter().all(|id| self.is_constant(id)),
        }
    }

    fn push(&mut self, kind: ExprKind<'t>, ty: ValueType) -> ExprId {
        let id = ExprId::new(self.nodes.len());
        debug!("{} = {} : {}", id, self.describe(&kind), ty);
        self.nodes.push(Expr {
            id,
            kind,
            ty,
            required: None,
        });
        id
    }

    fn describe(&self, kind: &ExprKind<'t>) -> String {
        match *kind {
            ExprKind::Const(ref v) => format!("const {}", v),
            ExprKind::Primary(decl) => format!("primary {}", decl.name),
            ExprKind::BitSelect { decl, .. } => format!("bit select of {}", decl.name),
            ExprKind::PartSelect { decl, .. } => format!("part select of {}", decl.name),
            ExprKind::ArrayElem { decl, ref indices } => {
                format!("element of {} at [{}]", decl.name, indices.iter().format("]["))
            }
            ExprKind::Unary { op, arg } => format!("{}{}", op, arg),
            ExprKind::Binary { op, lhs, rhs } => format!("{} {} {}", lhs, op, rhs),
            ExprKind::Ternary { op, args } => match op {
                TernaryOp::Condition => format!("{} ? {} : {}", args[0], args[1], args[2]),
                TernaryOp::MinTypMax => format!("{} : {} : {}", args[0], args[1], args[2]),
            },
            ExprKind::Concat(ref args) => format!("concat of {} operands", args.len()),
            ExprKind::MultiConcat { count, ref args } => {
                format!("{} times concat of {} operands", count, args.len())
            }
        }
    }
}

impl<'t> std::ops::Index<ExprId> for ExprArena<'t> {
    type Output = Expr<'t>;

    fn index(&self, id: ExprId) -> &Expr<'t> {
        self.get(id)
    }
}
