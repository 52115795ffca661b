//! # Copy Loop Rewriter
//!
//! Replaces each matched loop with a call to the bulk-copy primitive:
//!
//! ```text
//! while (i s< 0x10)        ->   memcpy(dst, src, 0x10)
//! dst[i] = src[i]          ->   nop
//! ```
//!
//! Both instructions keep their slots, so the instruction count and every
//! other instruction index are unchanged. The function is finalized after
//! each rewrite. A record whose primitive cannot be resolved, or whose
//! replacement the host refuses, is skipped; the remaining records proceed.
//! Head and body are replaced together or not at all: if the body is
//! refused after the head landed, the head gets its old node back.

use crate::il::{BinaryView, Expr, ExprId, ExprKind, IlFunctionMut};
use crate::matcher::MatchRecord;
use crate::{Error, Result};

/// A rewrite that was applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    /// Index of the loop header, now a call
    pub head_index: usize,
    /// Index of the loop body, now a nop
    pub body_index: usize,
    /// Address of the copy primitive called
    pub target: u64,
    /// Call expression allocated for the rewrite
    pub call: ExprId,
}

/// A record the rewriter had to leave alone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRewrite {
    /// The record
    pub record: MatchRecord,
    /// Why it was skipped
    pub error: Error,
}

/// Outcome of rewriting a batch of records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteReport {
    /// Applied rewrites, in record order
    pub applied: Vec<Rewrite>,
    /// Skipped records, in record order
    pub skipped: Vec<SkippedRewrite>,
}

/// Rewrites matched copy loops into calls
#[derive(Debug, Clone)]
pub struct Rewriter {
    copy_symbol: String,
}

impl Rewriter {
    /// Create a rewriter targeting the named copy primitive
    pub fn new(copy_symbol: impl Into<String>) -> Self {
        Self {
            copy_symbol: copy_symbol.into(),
        }
    }

    /// Name of the copy primitive
    pub fn copy_symbol(&self) -> &str {
        &self.copy_symbol
    }

    /// Apply every record to `function`, finalizing after each one
    pub fn apply<F, V>(&self, function: &mut F, view: &V, records: &[MatchRecord]) -> RewriteReport
    where
        F: IlFunctionMut + ?Sized,
        V: BinaryView + ?Sized,
    {
        let mut report = RewriteReport::default();

        for record in records {
            match self.rewrite(function, view, record) {
                Ok(rewrite) => {
                    function.finalize();
                    report.applied.push(rewrite);
                }
                Err(error) => {
                    tracing::error!(
                        head = record.head.index,
                        body = record.body.index,
                        "Cannot rewrite copy loop: {}",
                        error
                    );
                    // Commit the rollback of a refused replacement
                    if function.has_pending_changes() {
                        function.finalize();
                    }
                    report.skipped.push(SkippedRewrite {
                        record: record.clone(),
                        error,
                    });
                }
            }
        }

        report
    }

    /// Address of the copy primitive, first definition wins
    pub fn resolve<V: BinaryView + ?Sized>(&self, view: &V) -> Result<u64> {
        view.symbols_by_name(&self.copy_symbol)
            .first()
            .map(|symbol| symbol.address)
            .ok_or_else(|| Error::SymbolNotFound {
                name: self.copy_symbol.clone(),
            })
    }

    fn rewrite<F, V>(&self, function: &mut F, view: &V, record: &MatchRecord) -> Result<Rewrite>
    where
        F: IlFunctionMut + ?Sized,
        V: BinaryView + ?Sized,
    {
        // Everything that can fail is checked before allocating, so a
        // skipped record leaves the arena alone
        let target = self.resolve(view)?;
        let length =
            i64::try_from(record.length).map_err(|_| Error::LengthOverflow(record.length))?;
        let saved_head = function
            .expr(record.head.expr)
            .cloned()
            .ok_or(Error::InvalidExpr(record.head.expr))?;
        function
            .expr(record.body.expr)
            .ok_or(Error::InvalidExpr(record.body.expr))?;

        let width = function.address_size();
        let dst = function.add_expr(ExprKind::Var(record.destination), width);
        let src = function.add_expr(ExprKind::Var(record.source), width);
        let len = function.add_expr(ExprKind::Const(length), width);
        let params = function.add_operand_list(&[dst, src, len]);
        let callee = function.add_expr(ExprKind::ConstPtr(target), width);
        let call = function.add_expr(
            ExprKind::Call {
                dest: callee,
                params,
            },
            width,
        );
        let nop = function.add_expr(ExprKind::Nop, 0);

        function.replace_expr(record.head.expr, call)?;
        if let Err(error) = function.replace_expr(record.body.expr, nop) {
            restore(function, record.head.expr, saved_head);
            return Err(error);
        }

        tracing::info!(
            "Found {}({}, {}, 0x{:x})",
            self.copy_symbol,
            function.variable_name(record.destination),
            function.variable_name(record.source),
            record.length
        );

        Ok(Rewrite {
            head_index: record.head.index,
            body_index: record.body.index,
            target,
            call,
        })
    }
}

/// Put `saved` back into `target` after a half-applied rewrite
fn restore<F: IlFunctionMut + ?Sized>(function: &mut F, target: ExprId, saved: Expr) {
    let copy = function.add_expr(saved.kind, saved.size);
    if let Err(error) = function.replace_expr(target, copy) {
        tracing::error!(%target, "Cannot restore loop header: {}", error);
    }
}

impl Default for Rewriter {
    fn default() -> Self {
        Self::new("memcpy")
    }
}
