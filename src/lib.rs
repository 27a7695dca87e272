// Copyright (c) 2016-2021 Fabian Schuiki

//! The expression sizing core of a Verilog elaborator.

// Re-export everything from the common crate.
#[macro_use]
pub extern crate velab_common as common;
pub use crate::common::*;

pub extern crate velab_svlog as svlog;
