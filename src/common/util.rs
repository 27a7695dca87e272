// Copyright (c) 2016-2021 Fabian Schuiki

//! A collection of utility traits and functions.

#![deny(missing_docs)]

/// Describes semantic nodes.
pub trait HasDesc {
    /// Obtain a human-readable descriptive name for this node.
    fn desc(&self) -> &'static str;

    /// Obtain a human-readable description for this node, possibly containing
    /// the node's name.
    fn desc_full(&self) -> String {
        self.desc().into()
    }
}

impl<'a, T> HasDesc for &'a T
where
    T: HasDesc + ?Sized,
{
    fn desc(&self) -> &'static str {
        (*self).desc()
    }

    fn desc_full(&self) -> String {
        (*self).desc_full()
    }
}
