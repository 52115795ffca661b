//! # memcpy-lift - Copy Loop Lifting for Decompiler IL
//!
//! A decompiler pass that finds element-by-element copy loops with a
//! constant trip count in a function's high-level IL and replaces each one
//! with a single call to the bulk-copy primitive (`memcpy` by default).
//!
//! ```text
//! while (i s< 0x20)                 0x401000(dst, src, 0x20)
//!     dst[i] = src[i]        →      nop
//! ```
//!
//! ## Architecture
//!
//! ```text
//! HLIL function → LoopIdiomMatcher → MatchRecords → Rewriter → finalized HLIL
//! ```
//!
//! ### Main Components
//!
//! - [`LoopIdiomMatcher`] - Finds copy loops, pure and side-effect free
//! - [`Rewriter`] - Replaces matched loops with a call plus a nop, in place
//! - [`MemcpyPass`] - Runs both over one function and registers with a [`Workflow`]
//! - [`il`] - IL surfaces the pass works through, with an in-memory implementation
//! - [`PassOptions`] - Copy primitive name, workflow placement, enabled idioms
//!
//! ## Quick Start
//!
//! ```rust
//! use memcpy_lift::il::{render_function, CmpOp, FunctionBuilder, SymbolTable};
//! use memcpy_lift::MemcpyPass;
//!
//! // while (i s< 0x20) *(dst + i) = *(src + i)
//! let mut b = FunctionBuilder::new("sub_401000");
//! let (i, dst, src) = (b.var("i"), b.var("dst"), b.var("src"));
//! let bound = b.constant(0x20);
//! let cond = b.cmp(CmpOp::Slt, i, bound);
//! let to = b.add(dst, i);
//! let from = b.add(src, i);
//! let lhs = b.deref(to, 1);
//! let rhs = b.deref(from, 1);
//! let assign = b.assign(lhs, rhs);
//! b.while_loop(cond, assign);
//! b.instruction(assign);
//! let mut function = b.build();
//!
//! let view = SymbolTable::new().with_symbol("memcpy", 0x401000);
//! let report = MemcpyPass::default().run(&mut function, &view);
//!
//! assert_eq!(report.rewrites.len(), 1);
//! assert_eq!(
//!     render_function(&function),
//!     "   0: 0x401000(dst, src, 0x20)\n   1: nop\n"
//! );
//! ```
//!
//! ## Error Handling
//!
//! Nothing aborts the pass. Shapes that do not match are skipped silently;
//! a missing copy primitive skips the affected rewrite and logs an error
//! through `tracing`. The crate installs no subscriber.

pub mod config;
pub mod error;
pub mod il;
pub mod matcher;
pub mod pass;
pub mod rewriter;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Re-export main types
pub use config::{IdiomSet, PassOptions};
pub use error::{Error, ErrorSeverity, Result};
pub use matcher::{CopyIdiom, LoopIdiomMatcher, MatchRecord};
pub use pass::{Activity, MemcpyPass, PassReport, Workflow};
pub use rewriter::{Rewrite, RewriteReport, Rewriter, SkippedRewrite};
