//! Builder for high-level IL functions
//!
//! Sizes follow the function's pointer width for variables, pointers and
//! comparisons, and are explicit for memory accesses.
//!
//! ```rust
//! use memcpy_lift::il::{CmpOp, FunctionBuilder};
//!
//! let mut b = FunctionBuilder::new("copy_header");
//! let (i, dst, src) = (b.var("i"), b.var("dst"), b.var("src"));
//!
//! // while (i s< 0x10) dst[i] = src[i]
//! let bound = b.constant(0x10);
//! let cond = b.cmp(CmpOp::Slt, i, bound);
//! let lhs = b.array_index(dst, i, 1);
//! let rhs = b.array_index(src, i, 1);
//! let assign = b.assign(lhs, rhs);
//! b.while_loop(cond, assign);
//! b.instruction(assign);
//!
//! let function = b.build();
//! assert_eq!(function.instructions().count(), 2);
//! ```

use super::expr::{CmpOp, ExprId, ExprKind, Instruction, Variable};
use super::function::{HlilFunction, IlFunction, IlFunctionMut};

/// Incrementally constructs an [`HlilFunction`]
pub struct FunctionBuilder {
    function: HlilFunction,
}

impl FunctionBuilder {
    /// Start a function with the default pointer width
    pub fn new(name: &str) -> Self {
        Self {
            function: HlilFunction::new(name),
        }
    }

    /// Start a function for a target with the given pointer width
    pub fn with_address_size(name: &str, address_size: usize) -> Self {
        Self {
            function: HlilFunction::with_address_size(name, address_size),
        }
    }

    fn ptr_size(&self) -> usize {
        self.function.address_size()
    }

    /// Register a variable and return a reference expression to it
    pub fn var(&mut self, name: &str) -> ExprId {
        let var = self.function.add_variable(name);
        self.var_ref(var)
    }

    /// Register a variable without referencing it
    pub fn variable(&mut self, name: &str) -> Variable {
        self.function.add_variable(name)
    }

    /// Fresh reference expression to an existing variable
    pub fn var_ref(&mut self, var: Variable) -> ExprId {
        let size = self.ptr_size();
        self.function.add_expr(ExprKind::Var(var), size)
    }

    /// Integer constant of pointer width
    pub fn constant(&mut self, value: i64) -> ExprId {
        let size = self.ptr_size();
        self.function.add_expr(ExprKind::Const(value), size)
    }

    /// Pointer constant
    pub fn const_ptr(&mut self, address: u64) -> ExprId {
        let size = self.ptr_size();
        self.function.add_expr(ExprKind::ConstPtr(address), size)
    }

    /// left + right
    pub fn add(&mut self, left: ExprId, right: ExprId) -> ExprId {
        let size = self.ptr_size();
        self.function.add_expr(ExprKind::Add { left, right }, size)
    }

    /// left - right
    pub fn sub(&mut self, left: ExprId, right: ExprId) -> ExprId {
        let size = self.ptr_size();
        self.function.add_expr(ExprKind::Sub { left, right }, size)
    }

    /// *src, reading `size` bytes
    pub fn deref(&mut self, src: ExprId, size: usize) -> ExprId {
        self.function.add_expr(ExprKind::Deref { src }, size)
    }

    /// src[index], element of `size` bytes
    pub fn array_index(&mut self, src: ExprId, index: ExprId, size: usize) -> ExprId {
        self.function
            .add_expr(ExprKind::ArrayIndex { src, index }, size)
    }

    /// left op right
    pub fn cmp(&mut self, op: CmpOp, left: ExprId, right: ExprId) -> ExprId {
        self.function.add_expr(ExprKind::Cmp { op, left, right }, 1)
    }

    /// dest = src
    pub fn assign(&mut self, dest: ExprId, src: ExprId) -> ExprId {
        let size = self.function.expr(dest).map(|e| e.size).unwrap_or(0);
        self.function.add_expr(ExprKind::Assign { dest, src }, size)
    }

    /// dest(params...)
    pub fn call(&mut self, dest: ExprId, params: &[ExprId]) -> ExprId {
        let size = self.ptr_size();
        let params = self.function.add_operand_list(params);
        self.function.add_expr(ExprKind::Call { dest, params }, size)
    }

    /// return src
    pub fn ret(&mut self, src: Option<ExprId>) -> Instruction {
        let ret = self.function.add_expr(ExprKind::Ret { src }, 0);
        self.function.push_instruction(ret)
    }

    /// Nop statement
    pub fn nop(&mut self) -> Instruction {
        let nop = self.function.add_expr(ExprKind::Nop, 0);
        self.function.push_instruction(nop)
    }

    /// while (condition) body, pushed as a top-level instruction
    pub fn while_loop(&mut self, condition: ExprId, body: ExprId) -> Instruction {
        let head = self
            .function
            .add_expr(ExprKind::While { condition, body }, 0);
        self.function.push_instruction(head)
    }

    /// Push an existing expression as a top-level instruction
    pub fn instruction(&mut self, expr: ExprId) -> Instruction {
        self.function.push_instruction(expr)
    }

    /// Function built so far
    pub fn function(&self) -> &HlilFunction {
        &self.function
    }

    /// Finish building
    pub fn build(self) -> HlilFunction {
        self.function
    }
}
