//! # High-Level IL Surface
//!
//! The pass reads and rewrites a function's high-level IL through two traits,
//! so it runs against any host that can expose its IL this way:
//!
//! - [`IlFunction`] - read surface (instructions, expressions, variable names)
//! - [`IlFunctionMut`] - write surface (allocate, replace in place, finalize)
//! - [`BinaryView`] - symbol lookups in the binary owning the function
//!
//! ## Module Structure
//!
//! ```text
//! il/
//! ├── mod.rs       # This file - re-exports
//! ├── expr.rs      # ExprId, Variable, Instruction, ExprKind, CmpOp
//! ├── function.rs  # IlFunction / IlFunctionMut traits, HlilFunction arena
//! ├── builder.rs   # FunctionBuilder
//! ├── render.rs    # Pseudo-C rendering
//! └── view.rs      # Symbol, BinaryView, SymbolTable
//! ```
//!
//! [`HlilFunction`] and [`SymbolTable`] are in-memory implementations of the
//! surfaces. Instructions form a flat list; a `while` instruction is followed
//! by the instructions of its body.

mod builder;
mod expr;
mod function;
mod render;
mod view;

pub use builder::FunctionBuilder;
pub use expr::{CmpOp, Expr, ExprId, ExprKind, Instruction, OperandListId, Operation, Variable};
pub use function::{HlilFunction, IlFunction, IlFunctionMut, DEFAULT_ADDRESS_SIZE};
pub use render::{render_expr, render_function};
pub use view::{BinaryView, Symbol, SymbolTable};
