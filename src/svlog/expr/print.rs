// Copyright (c) 2016-2021 Fabian Schuiki

//! A printer for expressions.

use super::*;
use itertools::Itertools;
use std::collections::HashSet;
use std::fmt::Write;

/// Render an expression as source text.
pub fn decompile(arena: &ExprArena, id: ExprId) -> String {
    let mut s = String::new();
    write_expr(arena, id, &mut s).unwrap();
    s
}

fn write_expr(arena: &ExprArena, id: ExprId, f: &mut impl Write) -> std::fmt::Result {
    match arena[id].kind {
        ExprKind::Const(ref v) => write!(f, "{}", v),
        ExprKind::Primary(decl) => write!(f, "{}", decl.name),
        ExprKind::BitSelect { decl, index } => match index {
            Index::Const(i) => write!(f, "{}[{}]", decl.name, i),
            Index::Var(i) => write!(f, "{}[{}]", decl.name, decompile(arena, i)),
        },
        ExprKind::PartSelect { decl, mode } => match mode {
            PartSelect::Const { left, right } => write!(f, "{}[{}:{}]", decl.name, left, right),
            PartSelect::Plus { base, width } => {
                write!(f, "{}[{} +: {}]", decl.name, decompile(arena, base), width)
            }
            PartSelect::Minus { base, width } => {
                write!(f, "{}[{} -: {}]", decl.name, decompile(arena, base), width)
            }
        },
        ExprKind::ArrayElem { decl, ref indices } => {
            write!(f, "{}", decl.name)?;
            for &index in indices {
                write!(f, "[{}]", decompile(arena, index))?;
            }
            Ok(())
        }
        ExprKind::Unary { op, arg } => write!(f, "{}{}", op, operand(arena, arg)),
        ExprKind::Binary { op, lhs, rhs } => write!(
            f,
            "{} {} {}",
            operand(arena, lhs),
            op,
            operand(arena, rhs)
        ),
        ExprKind::Ternary { op, args } => {
            let sep = match op {
                TernaryOp::Condition => ["?", ":"],
                TernaryOp::MinTypMax => [":", ":"],
            };
            write!(
                f,
                "{} {} {} {} {}",
                operand(arena, args[0]),
                sep[0],
                operand(arena, args[1]),
                sep[1],
                operand(arena, args[2])
            )
        }
        ExprKind::Concat(ref args) => write!(
            f,
            "{{{}}}",
            args.iter().map(|&a| decompile(arena, a)).format(", ")
        ),
        ExprKind::MultiConcat { count, ref args } => write!(
            f,
            "{{{}{{{}}}}}",
            count,
            args.iter().map(|&a| decompile(arena, a)).format(", ")
        ),
    }
}

/// Render an operand, parenthesized if it is itself an operator.
fn operand(arena: &ExprArena, id: ExprId) -> String {
    match arena[id].kind {
        ExprKind::Unary { .. } | ExprKind::Binary { .. } | ExprKind::Ternary { .. } => {
            format!("({})", decompile(arena, id))
        }
        _ => decompile(arena, id),
    }
}

/// Dump an expression tree with the types of all nodes.
///
/// Operands are listed before the nodes that use them, one per line:
///
/// ```text
/// e0 = const 4'd3 : logic [3:0] in logic [7:0]
/// e1 = primary a : logic [7:0] in logic [7:0]
/// e2 = binary + e0, e1 : logic [7:0] in logic [7:0]
/// ```
pub fn dump(arena: &ExprArena, id: ExprId) -> String {
    let mut out = String::new();
    let mut printed = HashSet::new();
    dump_node(arena, id, &mut out, &mut printed).unwrap();
    out
}

fn dump_node(
    arena: &ExprArena,
    id: ExprId,
    out: &mut impl Write,
    printed: &mut HashSet<ExprId>,
) -> std::fmt::Result {
    if !printed.insert(id) {
        return Ok(());
    }
    let expr = &arena[id];
    let operands = expr.kind.operands();
    for &arg in &operands {
        dump_node(arena, arg, out, printed)?;
    }
    write!(out, "{} = ", id)?;
    match expr.kind {
        ExprKind::Const(ref v) => write!(out, "const {}", v)?,
        ExprKind::Primary(decl) => write!(out, "primary {}", decl.name)?,
        ExprKind::BitSelect { decl, .. } => write!(out, "bit select {}", decl.name)?,
        ExprKind::PartSelect { decl, .. } => write!(out, "part select {}", decl.name)?,
        ExprKind::ArrayElem { decl, .. } => write!(out, "array element {}", decl.name)?,
        ExprKind::Unary { op, .. } => write!(out, "unary {}", op)?,
        ExprKind::Binary { op, .. } => write!(out, "binary {}", op)?,
        ExprKind::Ternary { op, .. } => match op {
            TernaryOp::Condition => write!(out, "condition")?,
            TernaryOp::MinTypMax => write!(out, "mintypmax")?,
        },
        ExprKind::Concat(_) => write!(out, "concat")?,
        ExprKind::MultiConcat { count, .. } => write!(out, "replicate {}", count)?,
    }
    if !operands.is_empty() {
        write!(out, " {}", operands.iter().format(", "))?;
    }
    write!(out, " : {}", expr.value_type())?;
    if let Some(req) = expr.required_type() {
        write!(out, " in {}", req)?;
    }
    writeln!(out)
}
