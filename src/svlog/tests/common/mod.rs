// Copyright (c) 2016-2021 Fabian Schuiki
#![allow(dead_code, unused_imports)]

//! Utilities for expression tests.

pub extern crate num;
pub extern crate pretty_env_logger;
pub extern crate velab_common;
pub extern crate velab_svlog as svlog;
pub use self::svlog::expr::*;
pub use self::svlog::*;
pub use self::velab_common::{errors::Severity, Session, SessionOptions, Verbosity};
pub use self::num::BigInt;

pub fn init_logger() {
    let _ = pretty_env_logger::try_init();
}

pub fn unsigned(width: usize) -> ValueType {
    ValueType::bit_vector(Sign::Unsigned, width)
}

pub fn signed(width: usize) -> ValueType {
    ValueType::bit_vector(Sign::Signed, width)
}

/// Add a constant of the given type to an arena.
pub fn konst(arena: &mut ExprArena, ty: ValueType, value: i64) -> ExprId {
    arena.add_const(value::make_int(ty, BigInt::from(value)))
}

/// Collect the messages of all diagnostics of a severity.
pub fn messages(sess: &Session, severity: Severity) -> Vec<String> {
    sess.take_diagnostics()
        .into_iter()
        .filter(|d| d.get_severity() == severity)
        .map(|d| d.get_message().clone())
        .collect()
}
