//! # Memcpy Lifting Pass
//!
//! Runs the matcher and the rewriter over one function and hands the pass to
//! an analysis workflow.
//!
//! ## Usage
//!
//! ```rust
//! use memcpy_lift::il::{CmpOp, FunctionBuilder, SymbolTable};
//! use memcpy_lift::{MemcpyPass, PassOptions};
//!
//! let mut b = FunctionBuilder::new("sub_401000");
//! let (i, dst, src) = (b.var("i"), b.var("dst"), b.var("src"));
//! let bound = b.constant(0x10);
//! let cond = b.cmp(CmpOp::Slt, i, bound);
//! let lhs = b.array_index(dst, i, 1);
//! let rhs = b.array_index(src, i, 1);
//! let assign = b.assign(lhs, rhs);
//! b.while_loop(cond, assign);
//! b.instruction(assign);
//! let mut function = b.build();
//!
//! let view = SymbolTable::new().with_symbol("memcpy", 0x402000);
//! let report = MemcpyPass::new(PassOptions::default()).run(&mut function, &view);
//!
//! assert_eq!(report.rewrites.len(), 1);
//! assert_eq!(report.instruction_count, 2);
//! ```

use crate::config::PassOptions;
use crate::il::{BinaryView, IlFunctionMut};
use crate::matcher::{LoopIdiomMatcher, MatchRecord};
use crate::rewriter::{Rewrite, Rewriter, SkippedRewrite};
use crate::Result;

/// Pass description handed to a workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    /// Stable name of the activity
    pub name: String,
    /// Existing step the activity runs right before
    pub insert_before: String,
}

/// Analysis workflow accepting activities
///
/// Scheduling is the host's business; implementations only record where the
/// activity goes and call [`MemcpyPass::run`] for each analyzed function.
pub trait Workflow {
    /// Register an activity, failing with [`crate::Error::Registration`] if refused
    fn register_activity(&mut self, activity: Activity) -> Result<()>;
}

/// Per-function outcome of the pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Copy loops the matcher found
    pub matches: Vec<MatchRecord>,
    /// Rewrites applied
    pub rewrites: Vec<Rewrite>,
    /// Matches that could not be rewritten
    pub skipped: Vec<SkippedRewrite>,
    /// Instruction count after the pass
    pub instruction_count: usize,
}

impl PassReport {
    /// True if the function was left untouched
    pub fn is_noop(&self) -> bool {
        self.rewrites.is_empty()
    }
}

/// Lifts constant-trip-count copy loops into calls to the copy primitive
#[derive(Debug, Clone)]
pub struct MemcpyPass {
    options: PassOptions,
    matcher: LoopIdiomMatcher,
    rewriter: Rewriter,
}

impl MemcpyPass {
    /// Create the pass from options
    pub fn new(options: PassOptions) -> Self {
        let matcher = LoopIdiomMatcher::new(options.idioms);
        let rewriter = Rewriter::new(options.copy_symbol.clone());
        Self {
            options,
            matcher,
            rewriter,
        }
    }

    /// Options the pass was built with
    pub fn options(&self) -> &PassOptions {
        &self.options
    }

    /// Activity describing this pass
    pub fn activity(&self) -> Activity {
        Activity {
            name: self.options.activity_name.clone(),
            insert_before: self.options.insert_before.clone(),
        }
    }

    /// Register the pass with a workflow
    pub fn register<W: Workflow + ?Sized>(&self, workflow: &mut W) -> Result<()> {
        let activity = self.activity();
        tracing::debug!(
            activity = %activity.name,
            insert_before = %activity.insert_before,
            "registering copy loop lifting"
        );
        workflow.register_activity(activity)
    }

    /// Run the pass over one function; the function is left finalized
    pub fn run<F, V>(&self, function: &mut F, view: &V) -> PassReport
    where
        F: IlFunctionMut + ?Sized,
        V: BinaryView + ?Sized,
    {
        let matches = self.matcher.scan(&*function);
        let rewrite = self.rewriter.apply(function, view, &matches);

        if function.has_pending_changes() {
            function.finalize();
        }

        PassReport {
            matches,
            rewrites: rewrite.applied,
            skipped: rewrite.skipped,
            instruction_count: function.instruction_count(),
        }
    }
}

impl Default for MemcpyPass {
    fn default() -> Self {
        Self::new(PassOptions::default())
    }
}
