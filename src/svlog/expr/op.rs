// Copyright (c) 2016-2021 Fabian Schuiki

//! Operators of expressions.

use std::fmt;
use velab_common::util::HasDesc;

/// The unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum UnaryOp {
    Plus,
    Minus,
    BitNeg,
    RedAnd,
    RedNand,
    RedOr,
    RedNor,
    RedXor,
    RedXnor,
    LogicNot,
}

/// The binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum BinaryOp {
    BitAnd,
    BitOr,
    BitXor,
    BitXnor,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Shl,
    Shr,
    AShl,
    AShr,
    Eq,
    Neq,
    Lt,
    Leq,
    Gt,
    Geq,
    CaseEq,
    CaseNeq,
    LogicAnd,
    LogicOr,
}

/// The ternary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TernaryOp {
    /// `a ? b : c`
    Condition,
    /// `a : b : c`
    MinTypMax,
}

/// The sizing rule a binary operator follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCategory {
    /// `&`, `|`, `^`, `~^`
    BitOp,
    /// `+`, `-`, `*`, `/`, `%`
    ArithOp,
    /// `**`
    PowerOp,
    /// `<<`, `>>`, `<<<`, `>>>`
    ShiftOp,
    /// `==`, `!=`, `<`, `<=`, `>`, `>=`, `===`, `!==`
    CompareOp,
    /// `&&`, `||`
    LogOp,
}

impl UnaryOp {
    /// Check whether this is one of the reduction operators.
    pub fn is_reduction(self) -> bool {
        match self {
            UnaryOp::RedAnd
            | UnaryOp::RedNand
            | UnaryOp::RedOr
            | UnaryOp::RedNor
            | UnaryOp::RedXor
            | UnaryOp::RedXnor => true,
            _ => false,
        }
    }

    /// Check whether the result is a single bit regardless of the operand.
    pub fn is_sink(self) -> bool {
        self.is_reduction() || self == UnaryOp::LogicNot
    }

    /// Check whether the operator only applies to bit vectors.
    pub fn rejects_real(self) -> bool {
        self.is_reduction() || self == UnaryOp::BitNeg
    }

    /// The operator as written in source text.
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
            UnaryOp::BitNeg => "~",
            UnaryOp::RedAnd => "&",
            UnaryOp::RedNand => "~&",
            UnaryOp::RedOr => "|",
            UnaryOp::RedNor => "~|",
            UnaryOp::RedXor => "^",
            UnaryOp::RedXnor => "~^",
            UnaryOp::LogicNot => "!",
        }
    }
}

impl BinaryOp {
    /// Determine the sizing rule of the operator.
    pub fn category(self) -> OpCategory {
        use BinaryOp::*;
        match self {
            BitAnd | BitOr | BitXor | BitXnor => OpCategory::BitOp,
            Add | Sub | Mul | Div | Mod => OpCategory::ArithOp,
            Pow => OpCategory::PowerOp,
            Shl | Shr | AShl | AShr => OpCategory::ShiftOp,
            Eq | Neq | Lt | Leq | Gt | Geq | CaseEq | CaseNeq => OpCategory::CompareOp,
            LogicAnd | LogicOr => OpCategory::LogOp,
        }
    }

    /// Check whether the operator only applies to bit vectors.
    pub fn rejects_real(self) -> bool {
        match self.category() {
            OpCategory::BitOp | OpCategory::ShiftOp => true,
            _ => self == BinaryOp::Mod,
        }
    }

    /// The operator as written in source text.
    pub fn as_str(self) -> &'static str {
        use BinaryOp::*;
        match self {
            BitAnd => "&",
            BitOr => "|",
            BitXor => "^",
            BitXnor => "~^",
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Mod => "%",
            Pow => "**",
            Shl => "<<",
            Shr => ">>",
            AShl => "<<<",
            AShr => ">>>",
            Eq => "==",
            Neq => "!=",
            Lt => "<",
            Leq => "<=",
            Gt => ">",
            Geq => ">=",
            CaseEq => "===",
            CaseNeq => "!==",
            LogicAnd => "&&",
            LogicOr => "||",
        }
    }
}

impl OpCategory {
    /// Check whether context propagation stops at this operator.
    pub fn is_sink(self) -> bool {
        match self {
            OpCategory::CompareOp | OpCategory::LogOp => true,
            _ => false,
        }
    }
}

impl HasDesc for UnaryOp {
    fn desc(&self) -> &'static str {
        match *self {
            UnaryOp::Plus => "unary plus",
            UnaryOp::Minus => "negation",
            UnaryOp::BitNeg => "bitwise negation",
            UnaryOp::LogicNot => "logical negation",
            _ => "reduction",
        }
    }

    fn desc_full(&self) -> String {
        format!("{} `{}`", self.desc(), self.as_str())
    }
}

impl HasDesc for BinaryOp {
    fn desc(&self) -> &'static str {
        match self.category() {
            OpCategory::BitOp => "bitwise operator",
            OpCategory::ArithOp => "arithmetic operator",
            OpCategory::PowerOp => "power operator",
            OpCategory::ShiftOp => "shift operator",
            OpCategory::CompareOp => "comparison",
            OpCategory::LogOp => "logical operator",
        }
    }

    fn desc_full(&self) -> String {
        format!("{} `{}`", self.desc(), self.as_str())
    }
}

impl HasDesc for TernaryOp {
    fn desc(&self) -> &'static str {
        match *self {
            TernaryOp::Condition => "conditional operator",
            TernaryOp::MinTypMax => "min:typ:max expression",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
