//! Pseudo-C rendering of high-level IL, for logs and dumps

use super::expr::{ExprId, ExprKind};
use super::function::IlFunction;
use std::fmt::Write;

const INVALID: &str = "<invalid>";

/// Render a single expression tree
pub fn render_expr<F: IlFunction + ?Sized>(function: &F, id: ExprId) -> String {
    let mut out = String::new();
    write_expr(function, id, &mut out);
    out
}

/// Render every top-level instruction, one per line, prefixed by its index
pub fn render_function<F: IlFunction + ?Sized>(function: &F) -> String {
    let mut out = String::new();
    for index in 0..function.instruction_count() {
        let line = match function.instruction(index) {
            Some(instr) => render_statement(function, instr.expr),
            None => INVALID.to_string(),
        };
        let _ = writeln!(out, "{:>4}: {}", index, line);
    }
    out
}

/// Loops render as their header only; the body is a separate instruction
fn render_statement<F: IlFunction + ?Sized>(function: &F, id: ExprId) -> String {
    match function.kind(id) {
        Some(ExprKind::While { condition, .. }) => {
            format!("while ({})", render_expr(function, *condition))
        }
        _ => render_expr(function, id),
    }
}

fn write_hex(value: i64, out: &mut String) {
    if value < 0 {
        let _ = write!(out, "-0x{:x}", value.unsigned_abs());
    } else {
        let _ = write!(out, "0x{:x}", value);
    }
}

fn write_expr<F: IlFunction + ?Sized>(function: &F, id: ExprId, out: &mut String) {
    let Some(kind) = function.kind(id) else {
        out.push_str(INVALID);
        return;
    };

    match kind {
        ExprKind::Nop => out.push_str("nop"),
        ExprKind::Const(value) => write_hex(*value, out),
        ExprKind::ConstPtr(address) => {
            let _ = write!(out, "0x{:x}", address);
        }
        ExprKind::Var(var) => out.push_str(&function.variable_name(*var)),
        ExprKind::Add { left, right } => {
            write_expr(function, *left, out);
            out.push_str(" + ");
            write_expr(function, *right, out);
        }
        ExprKind::Sub { left, right } => {
            write_expr(function, *left, out);
            out.push_str(" - ");
            write_expr(function, *right, out);
        }
        ExprKind::Deref { src } => {
            out.push_str("*(");
            write_expr(function, *src, out);
            out.push(')');
        }
        ExprKind::ArrayIndex { src, index } => {
            write_expr(function, *src, out);
            out.push('[');
            write_expr(function, *index, out);
            out.push(']');
        }
        ExprKind::Cmp { op, left, right } => {
            write_expr(function, *left, out);
            let _ = write!(out, " {} ", op.symbol());
            write_expr(function, *right, out);
        }
        ExprKind::Assign { dest, src } => {
            write_expr(function, *dest, out);
            out.push_str(" = ");
            write_expr(function, *src, out);
        }
        ExprKind::While { condition, body } => {
            out.push_str("while (");
            write_expr(function, *condition, out);
            out.push_str(") { ");
            write_expr(function, *body, out);
            out.push_str(" }");
        }
        ExprKind::Call { dest, params } => {
            write_expr(function, *dest, out);
            out.push('(');
            match function.operand_list(*params) {
                Some(params) => {
                    for (i, param) in params.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        write_expr(function, *param, out);
                    }
                }
                None => out.push_str(INVALID),
            }
            out.push(')');
        }
        ExprKind::Ret { src } => {
            out.push_str("return");
            if let Some(src) = src {
                out.push(' ');
                write_expr(function, *src, out);
            }
        }
    }
}
