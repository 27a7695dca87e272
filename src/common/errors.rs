// Copyright (c) 2016-2021 Fabian Schuiki

//! Utilities to implement diagnostics and error reporting facilities.

use std::fmt;

/// Abort with a compiler bug.
///
/// Used for violated internal invariants. These indicate a defect in the
/// caller rather than a problem in the user's input, and elaboration cannot
/// meaningfully continue.
#[macro_export]
macro_rules! bug {
    ($($arg:tt)*) => {
        panic!("{}", $crate::errors::DiagBuilder2::bug(format!($($arg)*)))
    };
}

/// Emits diagnostic messages.
pub trait DiagEmitter {
    /// Emit a diagnostic message.
    fn emit(&self, diag: DiagBuilder2);
}

impl<'a, T> DiagEmitter for &'a T
where
    T: DiagEmitter + ?Sized,
{
    fn emit(&self, diag: DiagBuilder2) {
        (*self).emit(diag)
    }
}

#[must_use]
#[derive(Clone, Debug)]
pub struct DiagBuilder2 {
    pub severity: Severity,
    pub message: String,
    pub segments: Vec<DiagSegment>,
}

#[derive(Clone, Debug)]
pub enum DiagSegment {
    Note(String),
}

impl DiagBuilder2 {
    pub fn new<S: Into<String>>(severity: Severity, message: S) -> DiagBuilder2 {
        DiagBuilder2 {
            severity: severity,
            message: message.into(),
            segments: Vec::new(),
        }
    }

    pub fn bug<S: Into<String>>(message: S) -> DiagBuilder2 {
        DiagBuilder2::new(Severity::Bug, message)
    }

    pub fn error<S: Into<String>>(message: S) -> DiagBuilder2 {
        DiagBuilder2::new(Severity::Error, message)
    }

    pub fn warning<S: Into<String>>(message: S) -> DiagBuilder2 {
        DiagBuilder2::new(Severity::Warning, message)
    }

    pub fn note<S: Into<String>>(message: S) -> DiagBuilder2 {
        DiagBuilder2::new(Severity::Note, message)
    }

    pub fn segment(self, segment: DiagSegment) -> DiagBuilder2 {
        let mut segments = self.segments;
        segments.push(segment);
        DiagBuilder2 {
            segments: segments,
            ..self
        }
    }

    pub fn add_note<S: Into<String>>(self, message: S) -> DiagBuilder2 {
        self.segment(DiagSegment::Note(message.into()))
    }

    pub fn get_severity(&self) -> Severity {
        self.severity
    }

    pub fn get_message(&self) -> &String {
        &self.message
    }

    pub fn get_segments(&self) -> &[DiagSegment] {
        &self.segments
    }
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Severity {
    Note,
    Warning,
    Error,
    Bug,
}

impl Severity {
    pub fn to_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
            Severity::Bug => "compiler bug",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl fmt::Display for DiagBuilder2 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let colorcode = match self.get_severity() {
            Severity::Bug | Severity::Error => "\x1B[31;1m",
            Severity::Warning => "\x1B[33;1m",
            Severity::Note => "\x1B[36;1m",
        };
        write!(
            f,
            "{}{}:\x1B[m\x1B[1m {}\x1B[m\n",
            colorcode,
            self.get_severity(),
            self.get_message()
        )?;

        for segment in &self.segments {
            match *segment {
                DiagSegment::Note(ref message) => {
                    write!(f, "   = \x1B[1mnote:\x1B[m {}\n", message)?
                }
            }
        }

        if self.get_severity() == Severity::Bug {
            write!(f, "\nYou have encountered a compiler bug. Sorry about that! We would appreciate if you open an issue and describe how you triggered the bug, together with a minimal snippet of code to reproduce it. Thanks!\n")?;
        }

        Ok(())
    }
}
