// Copyright (c) 2016-2021 Fabian Schuiki

//! This crate contains the fundamental utilities used by the rest of the
//! velab elaborator.

#[macro_use]
extern crate bitflags;
pub extern crate typed_arena;

#[macro_use]
pub mod errors;
#[macro_use]
pub mod arenas;
pub mod util;

use crate::errors::{DiagBuilder2, DiagEmitter, Severity};
use std::cell::{Cell, RefCell};

pub struct Session {
    pub opts: SessionOptions,
    /// Whether any error diagnostics were produced.
    failed: Cell<bool>,
    /// All diagnostics emitted so far.
    diags: RefCell<Vec<DiagBuilder2>>,
}

impl Session {
    /// Create a new session with the default options.
    pub fn new() -> Session {
        Session::with_options(Default::default())
    }

    /// Create a new session.
    pub fn with_options(opts: SessionOptions) -> Session {
        Session {
            opts,
            failed: Cell::new(false),
            diags: RefCell::new(Vec::new()),
        }
    }

    /// Check whether an error was emitted during the session.
    pub fn failed(&self) -> bool {
        self.failed.get()
    }

    /// Take all diagnostics emitted so far.
    pub fn take_diagnostics(&self) -> Vec<DiagBuilder2> {
        std::mem::replace(&mut *self.diags.borrow_mut(), Vec::new())
    }

    /// Count the emitted diagnostics of a given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.diags
            .borrow()
            .iter()
            .filter(|d| d.get_severity() == severity)
            .count()
    }
}

impl Default for Session {
    fn default() -> Session {
        Session::new()
    }
}

impl DiagEmitter for Session {
    fn emit(&self, diag: DiagBuilder2) {
        if diag.severity >= Severity::Error {
            self.failed.set(true);
        }
        eprintln!("{}", diag);
        self.diags.borrow_mut().push(diag);
    }
}

/// Access to the session options and the diagnostic sink.
pub trait SessionContext: DiagEmitter {
    /// Get the session.
    fn sess(&self) -> &Session;

    /// Check whether a verbosity option is enabled.
    fn has_verbosity(&self, verb: Verbosity) -> bool {
        self.sess().opts.verbosity.contains(verb)
    }
}

#[derive(Debug)]
pub struct SessionOptions {
    pub verbosity: Verbosity,
    /// Warn about constant selects outside the declared range.
    pub warn_select_range: bool,
}

impl Default for SessionOptions {
    fn default() -> SessionOptions {
        SessionOptions {
            verbosity: Verbosity::empty(),
            warn_select_range: true,
        }
    }
}

bitflags! {
    /// A set of verbosity options for a session.
    ///
    /// These flags control how much information the elaborator emits.
    #[derive(Default)]
    pub struct Verbosity: u16 {
        /// Report the type of every constructed expression.
        const EXPR_TYPES    = 1 << 0;
        /// Report every context imposed onto an expression.
        const TYPE_CONTEXTS = 1 << 1;
        /// Report the result of constant evaluation.
        const CONSTS        = 1 << 2;
    }
}
