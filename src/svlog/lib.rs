// Copyright (c) 2016-2021 Fabian Schuiki

//! This crate implements the sizing of Verilog expressions for the velab
//! elaborator.
//!
//! Expressions are built bottom-up from already resolved declarations and
//! operands. Each expression knows its self-determined type once it is
//! built; the width imposed by the surrounding context is applied in a second
//! step. See the `expr` module for the details of the protocol, and `elab`
//! for the driver that checks user input before building expressions.

#[macro_use]
extern crate log;
#[macro_use]
extern crate velab_common;

/// The result of an operation that reports its failure as a diagnostic.
pub type Result<T> = std::result::Result<T, ()>;

mod crate_prelude {
    pub use crate::decl::Decl;
    pub use crate::expr::{BinaryOp, TernaryOp, UnaryOp};
    pub use crate::Result;
    pub use velab_common::{
        errors::*, util::HasDesc, Session, SessionContext, Verbosity,
    };
}

pub mod decl;
pub mod elab;
pub mod eval;
pub mod expr;
pub mod range;
pub mod ty;
pub mod value;

pub use crate::{
    decl::{Decl, DeclArenas, DeclKind},
    elab::Elaborator,
    expr::{ExprArena, ExprId, SizeState},
    range::{PartSelectMode, RangeArray, RangeDir, RangeView},
    ty::{Sign, ValueType},
    value::ConstValue,
};
