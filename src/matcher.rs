//! # Copy Loop Matcher
//!
//! Scans the flat instruction list of a function for constant-trip-count
//! copy loops:
//!
//! ```text
//! while (i s< N)              while (i s< N)
//!     dst[i] = src[i]             *(dst + i) = *(src + i)
//! ```
//!
//! The loop condition must be a signed less-than against a non-negative
//! constant, and the instruction right after the loop header must be an
//! assignment in one of the two shapes. The index expression is not
//! inspected. Every shape check is a pure function returning `Option`, so a
//! wrong tag, a dangling handle and a missing body instruction all come out
//! as "no match here" and the scan moves on.

use crate::config::IdiomSet;
use crate::il::{CmpOp, ExprId, ExprKind, IlFunction, Instruction, Variable};

/// Recognized copy loop shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CopyIdiom {
    /// `dst[i] = src[i]`
    Indexed,
    /// `*(dst + i) = *(src + i)`
    DerefOffset,
}

/// A copy loop found by the matcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    /// Loop header instruction
    pub head: Instruction,
    /// Per-iteration copy, the instruction right after `head`
    pub body: Instruction,
    /// Shape of the copy
    pub idiom: CopyIdiom,
    /// Variable copied from
    pub source: Variable,
    /// Variable copied to
    pub destination: Variable,
    /// Constant trip count
    pub length: u64,
}

/// Finds copy loops in a function's IL
#[derive(Debug, Clone, Default)]
pub struct LoopIdiomMatcher {
    idioms: IdiomSet,
}

impl LoopIdiomMatcher {
    /// Create a matcher recognizing the given idioms
    pub fn new(idioms: IdiomSet) -> Self {
        Self { idioms }
    }

    /// Scan every instruction and return matches in discovery order.
    ///
    /// A match consumes its body, so the scan resumes at `head + 2` and
    /// matches never overlap. Anything else advances by one, which means the
    /// instruction after a rejected loop is still tried as a loop header.
    pub fn scan<F: IlFunction + ?Sized>(&self, function: &F) -> Vec<MatchRecord> {
        let count = function.instruction_count();
        let mut records = Vec::new();
        let mut index = 0;

        while index < count {
            match self.match_at(function, index) {
                Some(record) => {
                    records.push(record);
                    index += 2;
                }
                None => index += 1,
            }
        }

        tracing::debug!(
            instructions = count,
            matches = records.len(),
            "copy loop scan finished"
        );
        records
    }

    /// Try to match a copy loop headed at `index`
    pub fn match_at<F: IlFunction + ?Sized>(
        &self,
        function: &F,
        index: usize,
    ) -> Option<MatchRecord> {
        let head = function.instruction(index)?;
        let ExprKind::While { condition, .. } = function.kind(head.expr)? else {
            return None;
        };
        let Some(length) = loop_bound(function, *condition) else {
            tracing::debug!(index, "loop condition is not a signed constant bound");
            return None;
        };

        let found = self.match_body(function, head, length);
        if found.is_none() {
            tracing::debug!(index, length, "loop body is not a copy");
        }
        found
    }

    fn match_body<F: IlFunction + ?Sized>(
        &self,
        function: &F,
        head: Instruction,
        length: u64,
    ) -> Option<MatchRecord> {
        let body = function.instruction(head.index + 1)?;
        let ExprKind::Assign { dest, src } = function.kind(body.expr)? else {
            return None;
        };
        let (idiom, destination, source) = self.classify(function, *dest, *src)?;

        Some(MatchRecord {
            head,
            body,
            idiom,
            source,
            destination,
            length,
        })
    }

    /// Indexed shape first, then dereference-of-offset; both sides must
    /// agree on the shape
    fn classify<F: IlFunction + ?Sized>(
        &self,
        function: &F,
        dest: ExprId,
        src: ExprId,
    ) -> Option<(CopyIdiom, Variable, Variable)> {
        if self.idioms.indexed {
            if let (Some(d), Some(s)) = (indexed_base(function, dest), indexed_base(function, src))
            {
                return Some((CopyIdiom::Indexed, d, s));
            }
        }

        if self.idioms.deref_offset {
            if let (Some(d), Some(s)) = (offset_base(function, dest), offset_base(function, src)) {
                return Some((CopyIdiom::DerefOffset, d, s));
            }
        }

        None
    }
}

/// `x s< N` with `N` a non-negative constant
fn loop_bound<F: IlFunction + ?Sized>(function: &F, condition: ExprId) -> Option<u64> {
    let ExprKind::Cmp {
        op: CmpOp::Slt,
        right,
        ..
    } = function.kind(condition)?
    else {
        return None;
    };
    let ExprKind::Const(bound) = function.kind(*right)? else {
        return None;
    };
    u64::try_from(*bound).ok()
}

/// Base variable of `var[...]`
fn indexed_base<F: IlFunction + ?Sized>(function: &F, id: ExprId) -> Option<Variable> {
    match function.kind(id)? {
        ExprKind::ArrayIndex { src, .. } => var_of(function, *src),
        _ => None,
    }
}

/// Base variable of `*(var + ...)`
fn offset_base<F: IlFunction + ?Sized>(function: &F, id: ExprId) -> Option<Variable> {
    let ExprKind::Deref { src } = function.kind(id)? else {
        return None;
    };
    match function.kind(*src)? {
        ExprKind::Add { left, .. } => var_of(function, *left),
        _ => None,
    }
}

fn var_of<F: IlFunction + ?Sized>(function: &F, id: ExprId) -> Option<Variable> {
    match function.kind(id)? {
        ExprKind::Var(var) => Some(*var),
        _ => None,
    }
}
