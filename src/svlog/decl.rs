// Copyright (c) 2016-2021 Fabian Schuiki

//! Declarations referenced by expressions.
//!
//! Resolving names to declarations happens before expressions are
//! elaborated. Expressions only borrow the resolved declarations, which live
//! in a `DeclArenas` that outlives the expression arena.

use crate::{
    range::{RangeArray, RangeView},
    ty::{Sign, ValueType},
    value::ConstValue,
};
use std::fmt;
use velab_common::util::HasDesc;

make_arenas!(
    /// The arenas that own declarations.
    pub struct DeclArenas {
        decls: Decl,
    }
);

/// A declaration of a net, variable, or parameter.
#[derive(Debug, Clone)]
pub struct Decl {
    /// The declared name.
    pub name: String,
    /// What kind of declaration this is.
    pub kind: DeclKind,
    /// Whether the declaration carries the `signed` keyword.
    pub sign: Sign,
    /// The packed range, as in `wire [7:0] x`.
    pub range: Option<RangeView>,
    /// The unpacked dimensions, as in `reg x [0:3]`.
    pub array: Option<RangeArray>,
    /// The value of a parameter.
    pub value: Option<ConstValue>,
    /// The element values of a constant array, in row-major order.
    pub elems: Vec<ConstValue>,
}

/// The different kinds of declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum DeclKind {
    Net,
    Reg,
    Integer,
    Real,
    Time,
    Parameter,
    Localparam,
    Genvar,
}

impl Decl {
    /// Create a declaration of the given kind.
    pub fn new(name: impl Into<String>, kind: DeclKind) -> Decl {
        Decl {
            name: name.into(),
            kind,
            sign: match kind {
                DeclKind::Integer | DeclKind::Real | DeclKind::Genvar => Sign::Signed,
                _ => Sign::Unsigned,
            },
            range: None,
            array: None,
            value: None,
            elems: Vec::new(),
        }
    }

    /// Create a net declaration such as `wire [left:right] name`.
    pub fn net(name: impl Into<String>, left: isize, right: isize) -> Decl {
        Decl::new(name, DeclKind::Net).with_range(RangeView::new(left, right))
    }

    /// Create a register declaration such as `reg [left:right] name`.
    pub fn reg(name: impl Into<String>, left: isize, right: isize) -> Decl {
        Decl::new(name, DeclKind::Reg).with_range(RangeView::new(left, right))
    }

    /// Create a parameter with a value.
    pub fn parameter(name: impl Into<String>, value: ConstValue) -> Decl {
        Decl::new(name, DeclKind::Parameter).with_value(value)
    }

    /// Attach a packed range.
    pub fn with_range(mut self, range: RangeView) -> Decl {
        self.range = Some(range);
        self
    }

    /// Attach unpacked dimensions.
    pub fn with_array(mut self, dims: Vec<RangeView>) -> Decl {
        self.array = Some(RangeArray::new(dims));
        self
    }

    /// Attach the element values of a constant array.
    pub fn with_elems(mut self, elems: Vec<ConstValue>) -> Decl {
        self.elems = elems;
        self
    }

    /// Check whether the declaration has unpacked dimensions.
    pub fn is_array(&self) -> bool {
        self.array.is_some()
    }

    /// Mark the declaration as signed.
    pub fn signed(mut self) -> Decl {
        self.sign = Sign::Signed;
        self
    }

    /// Attach a value.
    pub fn with_value(mut self, value: ConstValue) -> Decl {
        self.value = Some(value);
        self
    }

    /// Check whether references to this declaration are constant.
    pub fn is_constant(&self) -> bool {
        match self.kind {
            DeclKind::Parameter | DeclKind::Localparam | DeclKind::Genvar => true,
            _ => false,
        }
    }

    /// Check whether the declaration has real type.
    pub fn is_real(&self) -> bool {
        self.value_type().is_real()
    }

    /// Return the packed range of the declaration.
    ///
    /// Unranged vector declarations are treated as `[0:0]`. The integer and
    /// time domains behave as `[31:0]` and `[63:0]` respectively.
    pub fn bit_range(&self) -> RangeView {
        match self.range {
            Some(r) => r,
            None => RangeView::with_size(self.value_type().bit_width()),
        }
    }

    /// Return the type of a reference to this declaration.
    ///
    /// For arrays this is the type of one element. An unranged parameter
    /// takes the type of its value, made signed by the `signed` keyword.
    pub fn value_type(&self) -> ValueType {
        match self.kind {
            DeclKind::Integer => ValueType::INTEGER,
            DeclKind::Real => ValueType::REAL,
            DeclKind::Time => ValueType::TIME,
            DeclKind::Genvar => ValueType::INTEGER,
            DeclKind::Net | DeclKind::Reg => self.vector_type(),
            DeclKind::Parameter | DeclKind::Localparam => {
                match (self.range, self.value.as_ref().or_else(|| self.elems.first())) {
                    (None, Some(v)) if self.sign.is_signed() && !v.ty.is_signed() => {
                        ValueType::new(true, v.ty.is_sized(), v.ty.bit_width())
                    }
                    (None, Some(v)) => v.ty,
                    _ => self.vector_type(),
                }
            }
        }
    }

    fn vector_type(&self) -> ValueType {
        ValueType::bit_vector(self.sign, self.range.map(|r| r.size()).unwrap_or(1))
    }
}

impl HasDesc for Decl {
    fn desc(&self) -> &'static str {
        match self.kind {
            DeclKind::Net => "net",
            DeclKind::Reg => "reg",
            DeclKind::Integer => "integer",
            DeclKind::Real => "real",
            DeclKind::Time => "time",
            DeclKind::Parameter => "parameter",
            DeclKind::Localparam => "localparam",
            DeclKind::Genvar => "genvar",
        }
    }

    fn desc_full(&self) -> String {
        format!("{} `{}`", self.desc(), self.name)
    }
}

impl fmt::Display for Decl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::make_int;
    use num::BigInt;
    use velab_common::arenas::Alloc;

    #[test]
    fn vector_types() {
        assert_eq!(
            Decl::net("a", 7, 0).value_type(),
            ValueType::bit_vector(Sign::Unsigned, 8)
        );
        assert_eq!(
            Decl::reg("b", 0, 15).signed().value_type(),
            ValueType::bit_vector(Sign::Signed, 16)
        );
        assert_eq!(Decl::new("c", DeclKind::Net).value_type(), ValueType::BIT);
        assert_eq!(Decl::new("i", DeclKind::Integer).value_type(), ValueType::INTEGER);
        assert!(Decl::new("r", DeclKind::Real).is_real());
    }

    #[test]
    fn parameter_types() {
        let v = make_int(ValueType::INTEGER, BigInt::from(5));
        let p = Decl::parameter("P", v.clone());
        assert_eq!(p.value_type(), ValueType::INTEGER);
        assert!(p.is_constant());
        let q = Decl::parameter("Q", v).with_range(RangeView::new(3, 0));
        assert_eq!(q.value_type(), ValueType::bit_vector(Sign::Unsigned, 4));
    }

    #[test]
    fn signed_parameter_keeps_value_width() {
        let p = Decl::parameter("P", make_int(ValueType::INTEGER, BigInt::from(5))).signed();
        assert_eq!(p.value_type(), ValueType::INTEGER);
        assert_eq!(p.bit_range(), RangeView::new(31, 0));

        let byte = make_int(ValueType::bit_vector(Sign::Unsigned, 8), BigInt::from(200));
        let q = Decl::parameter("Q", byte).signed();
        assert_eq!(q.value_type(), ValueType::bit_vector(Sign::Signed, 8));

        let ranged = Decl::parameter("R", make_int(ValueType::INTEGER, BigInt::from(5)))
            .signed()
            .with_range(RangeView::new(3, 0));
        assert_eq!(ranged.value_type(), ValueType::bit_vector(Sign::Signed, 4));
    }

    #[test]
    fn array_element_type() {
        let mem = Decl::reg("mem", 7, 0).with_array(vec![RangeView::new(0, 3)]);
        assert!(mem.is_array());
        assert_eq!(mem.value_type(), ValueType::bit_vector(Sign::Unsigned, 8));
        assert_eq!(mem.array.as_ref().map(|a| a.elem_count()), Some(4));

        let elems = (0..2)
            .map(|i| make_int(ValueType::bit_vector(Sign::Unsigned, 3), BigInt::from(i)))
            .collect();
        let table = Decl::new("T", DeclKind::Localparam)
            .with_array(vec![RangeView::new(1, 0)])
            .with_elems(elems);
        assert_eq!(table.value_type(), ValueType::bit_vector(Sign::Unsigned, 3));
        assert!(table.is_constant());
    }

    #[test]
    fn implicit_bit_range() {
        assert_eq!(Decl::new("i", DeclKind::Integer).bit_range(), RangeView::new(31, 0));
        assert_eq!(Decl::net("a", 0, 3).bit_range(), RangeView::new(0, 3));
    }

    #[test]
    fn arena_allocation() {
        let arenas = DeclArenas::new();
        let d: &Decl = arenas.alloc(Decl::net("a", 3, 0));
        assert_eq!(d.desc_full(), "net `a`");
    }
}
