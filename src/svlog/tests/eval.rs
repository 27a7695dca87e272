// Copyright (c) 2016-2021 Fabian Schuiki

mod common;
use common::*;

fn int_of(elab: &Elaborator, id: ExprId) -> BigInt {
    elab.evaluate(id)
        .expect("constant")
        .get_int()
        .cloned()
        .expect("integral")
}

#[test]
fn self_determined_addition_overflows() {
    init_logger();
    let sess = Session::new();
    let mut elab = Elaborator::new(&sess);
    let a = elab.based_const(Sign::Unsigned, Some(4), 0xf).unwrap();
    let b = elab.based_const(Sign::Unsigned, Some(4), 0x1).unwrap();
    let e = elab.binary(BinaryOp::Add, a, b).unwrap();
    elab.self_determined(e);
    assert_eq!(int_of(&elab, e), BigInt::from(0));
}

#[test]
fn context_keeps_carry() {
    init_logger();
    let sess = Session::new();
    let mut elab = Elaborator::new(&sess);
    let a = elab.based_const(Sign::Unsigned, Some(4), 0xf).unwrap();
    let b = elab.based_const(Sign::Unsigned, Some(4), 0x1).unwrap();
    let e = elab.binary(BinaryOp::Add, a, b).unwrap();
    elab.assign(unsigned(8), e);
    assert_eq!(int_of(&elab, e), BigInt::from(16));
}

#[test]
fn signed_operand_zero_extended_in_unsigned_context() {
    let sess = Session::new();
    let mut elab = Elaborator::new(&sess);
    // 4'sb1111 + 8'd0: unsigned, so the signed operand is zero-extended
    let a = elab.based_const(Sign::Signed, Some(4), -1).unwrap();
    let b = elab.based_const(Sign::Unsigned, Some(8), 0).unwrap();
    let e = elab.binary(BinaryOp::Add, a, b).unwrap();
    assert_eq!(int_of(&elab, e), BigInt::from(15));

    // 4'sb1111 + 8'sd0: signed, so the operand is sign-extended
    let c = elab.based_const(Sign::Signed, Some(4), -1).unwrap();
    let d = elab.based_const(Sign::Signed, Some(8), 0).unwrap();
    let f = elab.binary(BinaryOp::Add, c, d).unwrap();
    assert_eq!(int_of(&elab, f), BigInt::from(-1));
}

#[test]
fn comparison_uses_common_width() {
    let sess = Session::new();
    let mut elab = Elaborator::new(&sess);
    let a = elab.based_const(Sign::Signed, Some(4), -1).unwrap();
    let b = elab.based_const(Sign::Unsigned, Some(8), 15).unwrap();
    let e = elab.binary(BinaryOp::Eq, a, b).unwrap();
    assert_eq!(int_of(&elab, e), BigInt::from(1));

    let c = elab.based_const(Sign::Signed, Some(4), -1).unwrap();
    let d = elab.based_const(Sign::Signed, Some(8), 0).unwrap();
    let f = elab.binary(BinaryOp::Lt, c, d).unwrap();
    assert_eq!(int_of(&elab, f), BigInt::from(1));
}

#[test]
fn shifts() {
    let sess = Session::new();
    let mut elab = Elaborator::new(&sess);
    let x = elab.based_const(Sign::Signed, Some(8), -16).unwrap();
    let n = elab.based_const(Sign::Unsigned, Some(3), 2).unwrap();
    let e = elab.binary(BinaryOp::AShr, x, n).unwrap();
    assert_eq!(int_of(&elab, e), BigInt::from(-4));

    let y = elab.based_const(Sign::Signed, Some(8), -16).unwrap();
    let m = elab.based_const(Sign::Unsigned, Some(3), 2).unwrap();
    let f = elab.binary(BinaryOp::Shr, y, m).unwrap();
    assert_eq!(int_of(&elab, f), BigInt::from(0x3c));

    let z = elab.based_const(Sign::Unsigned, Some(4), 0b0011).unwrap();
    let k = elab.based_const(Sign::Unsigned, Some(3), 3).unwrap();
    let g = elab.binary(BinaryOp::Shl, z, k).unwrap();
    elab.assign(unsigned(8), g);
    assert_eq!(int_of(&elab, g), BigInt::from(0x18));
}

#[test]
fn power_wraps() {
    let sess = Session::new();
    let mut elab = Elaborator::new(&sess);
    let x = elab.based_const(Sign::Unsigned, Some(4), 3).unwrap();
    let n = elab.based_const(Sign::Unsigned, Some(2), 3).unwrap();
    let e = elab.binary(BinaryOp::Pow, x, n).unwrap();
    assert_eq!(int_of(&elab, e), BigInt::from(27 % 16));
}

#[test]
fn real_arithmetic() {
    let sess = Session::new();
    let mut elab = Elaborator::new(&sess);
    let a = elab.real_const(1.5);
    let b = elab.int_const(2);
    let e = elab.binary(BinaryOp::Mul, a, b).unwrap();
    assert_eq!(elab.evaluate(e).unwrap().to_f64(), 3.0);
}

#[test]
fn reductions_and_concat() {
    let sess = Session::new();
    let mut elab = Elaborator::new(&sess);
    let a = elab.based_const(Sign::Unsigned, Some(4), 0b1011).unwrap();
    let x = elab.unary(UnaryOp::RedXor, a).unwrap();
    assert_eq!(int_of(&elab, x), BigInt::from(1));

    let b = elab.based_const(Sign::Unsigned, Some(2), 0b10).unwrap();
    let c = elab.based_const(Sign::Unsigned, Some(3), 0b001).unwrap();
    let cat = elab.concat(vec![b, c]).unwrap();
    assert_eq!(int_of(&elab, cat), BigInt::from(0b10001));

    let n = elab.int_const(3);
    let d = elab.based_const(Sign::Unsigned, Some(2), 0b01).unwrap();
    let rep = elab.multi_concat(n, vec![d]).unwrap();
    assert_eq!(elab.arena().value_type(rep), unsigned(6));
    assert_eq!(int_of(&elab, rep), BigInt::from(0b010101));
}

#[test]
fn parameter_selects() {
    let arenas = DeclArenas::new();
    let p: &Decl = arenas.decls.alloc(
        Decl::parameter(
            "P",
            value::make_int(unsigned(8), BigInt::from(0b1010_0110)),
        )
        .with_range(RangeView::new(7, 0)),
    );
    let sess = Session::new();
    let mut elab = Elaborator::new(&sess);
    let i = elab.int_const(1);
    let bit = elab.bit_select(p, i).unwrap();
    assert_eq!(int_of(&elab, bit), BigInt::from(1));
    let l = elab.int_const(7);
    let r = elab.int_const(4);
    let part = elab.part_select(p, l, r).unwrap();
    assert_eq!(int_of(&elab, part), BigInt::from(0b1010));
    let base = elab.int_const(2);
    let w = elab.int_const(3);
    let ip = elab
        .indexed_part_select(p, base, PartSelectMode::Up, w)
        .unwrap();
    assert_eq!(int_of(&elab, ip), BigInt::from(0b001));
    assert!(!sess.failed());
}

#[test]
fn division_by_zero() {
    let sess = Session::new();
    let mut elab = Elaborator::new(&sess);
    let a = elab.int_const(4);
    let b = elab.int_const(0);
    let e = elab.binary(BinaryOp::Div, a, b).unwrap();
    assert!(elab.evaluate(e).is_err());
    assert!(sess.failed());
}

#[test]
fn not_constant() {
    let arenas = DeclArenas::new();
    let w: &Decl = arenas.decls.alloc(Decl::net("w", 3, 0));
    let sess = Session::new();
    let mut elab = Elaborator::new(&sess);
    let e = elab.primary(w);
    assert!(elab.evaluate(e).is_err());
    assert_eq!(
        messages(&sess, Severity::Error),
        vec!["net `w` is not constant".to_string()]
    );
}

#[test]
fn signed_parameter_value() {
    let arenas = DeclArenas::new();
    let p: &Decl = arenas.decls.alloc(
        Decl::parameter("P", value::make_int(ValueType::INTEGER, BigInt::from(5))).signed(),
    );
    let q: &Decl = arenas.decls.alloc(
        Decl::parameter("Q", value::make_int(unsigned(8), BigInt::from(200))).signed(),
    );
    let sess = Session::new();
    let mut elab = Elaborator::new(&sess);
    let ep = elab.primary(p);
    assert_eq!(elab.arena().value_type(ep), ValueType::INTEGER);
    assert_eq!(int_of(&elab, ep), BigInt::from(5));
    let eq = elab.primary(q);
    assert_eq!(elab.arena().value_type(eq), signed(8));
    assert_eq!(int_of(&elab, eq), BigInt::from(-56));
}

#[test]
fn huge_real_parameter() {
    let arenas = DeclArenas::new();
    let big: &Decl = arenas.decls.alloc(
        Decl::parameter("BIG", value::make_real(1e40)).with_range(RangeView::new(7, 0)),
    );
    let inf: &Decl = arenas.decls.alloc(
        Decl::parameter("INF", value::make_real(std::f64::INFINITY))
            .with_range(RangeView::new(7, 0)),
    );
    let sess = Session::new();
    let mut elab = Elaborator::new(&sess);
    let e = elab.primary(big);
    assert_eq!(int_of(&elab, e), BigInt::from(0));
    let i = elab.int_const(3);
    let bit = elab.bit_select(big, i).unwrap();
    assert_eq!(int_of(&elab, bit), BigInt::from(0));
    assert!(!sess.failed());

    let e = elab.primary(inf);
    assert!(elab.evaluate(e).is_err());
    assert_eq!(
        messages(&sess, Severity::Error),
        vec!["inf cannot be converted to logic [7:0]".to_string()]
    );
}

fn table(arenas: &DeclArenas) -> &Decl {
    let elems = (0..6)
        .map(|i| value::make_int(unsigned(4), BigInt::from(i * 2)))
        .collect();
    arenas.decls.alloc(
        Decl::new("T", DeclKind::Localparam)
            .with_range(RangeView::new(3, 0))
            .with_array(vec![RangeView::new(0, 2), RangeView::new(1, 0)])
            .with_elems(elems),
    )
}

#[test]
fn array_element_lookup() {
    let arenas = DeclArenas::new();
    let t = table(&arenas);
    let sess = Session::new();
    let mut elab = Elaborator::new(&sess);
    // [0][1] is the first element, [2][0] the last
    let i = elab.int_const(0);
    let j = elab.int_const(1);
    let first = elab.array_elem(t, vec![i, j]).unwrap();
    assert_eq!(int_of(&elab, first), BigInt::from(0));
    let i = elab.int_const(2);
    let j = elab.int_const(0);
    let last = elab.array_elem(t, vec![i, j]).unwrap();
    assert!(elab.arena().is_constant(last));
    assert_eq!(elab.arena().value_type(last), unsigned(4));
    assert_eq!(int_of(&elab, last), BigInt::from(10));
    let i = elab.int_const(1);
    let j = elab.int_const(0);
    let mid = elab.array_elem(t, vec![i, j]).unwrap();
    assert_eq!(int_of(&elab, mid), BigInt::from(6));
    assert!(!sess.failed());
}

#[test]
fn array_element_outside_dimensions() {
    let arenas = DeclArenas::new();
    let t = table(&arenas);
    let sess = Session::new();
    let mut elab = Elaborator::new(&sess);
    let i = elab.int_const(3);
    let j = elab.int_const(0);
    let e = elab.array_elem(t, vec![i, j]).unwrap();
    assert_eq!(
        messages(&sess, Severity::Warning),
        vec!["index 3 is outside the range of localparam `T`".to_string()]
    );
    assert!(elab.evaluate(e).is_err());
    assert_eq!(
        messages(&sess, Severity::Error),
        vec!["element [3][0] outside of the dimensions [0:2][1:0] of localparam `T`".to_string()]
    );
}
