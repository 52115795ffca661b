//! Function-level IL surfaces and the in-memory arena implementation

use super::expr::{Expr, ExprId, ExprKind, Instruction, OperandListId, Variable};
use crate::{Error, Result};
use std::collections::HashMap;

/// Default pointer width in bytes
pub const DEFAULT_ADDRESS_SIZE: usize = 8;

/// Read surface of a function's high-level IL
pub trait IlFunction {
    /// Number of top-level instructions
    fn instruction_count(&self) -> usize;

    /// Instruction at `index`, if it exists
    fn instruction(&self, index: usize) -> Option<Instruction>;

    /// Expression behind a handle, if it exists
    fn expr(&self, id: ExprId) -> Option<&Expr>;

    /// Expressions of an operand list, if it exists
    fn operand_list(&self, id: OperandListId) -> Option<&[ExprId]>;

    /// Display name of a variable
    fn variable_name(&self, var: Variable) -> String;

    /// Pointer width of the target in bytes
    fn address_size(&self) -> usize;

    /// Node behind a handle
    fn kind(&self, id: ExprId) -> Option<&ExprKind> {
        self.expr(id).map(|e| &e.kind)
    }
}

/// Write surface of a function's high-level IL
pub trait IlFunctionMut: IlFunction {
    /// Allocate a new expression in the arena
    fn add_expr(&mut self, kind: ExprKind, size: usize) -> ExprId;

    /// Allocate an operand list
    fn add_operand_list(&mut self, operands: &[ExprId]) -> OperandListId;

    /// Overwrite `target` in place with the contents of `replacement`
    fn replace_expr(&mut self, target: ExprId, replacement: ExprId) -> Result<()>;

    /// Commit pending mutations
    fn finalize(&mut self);

    /// Whether mutations happened since the last finalize
    fn has_pending_changes(&self) -> bool;
}

/// In-memory high-level IL function
#[derive(Debug, Clone)]
pub struct HlilFunction {
    /// Function name
    pub name: String,
    exprs: Vec<Expr>,
    operand_lists: Vec<Vec<ExprId>>,
    instructions: Vec<ExprId>,
    variables: HashMap<Variable, String>,
    next_variable: u32,
    address_size: usize,
    pending: bool,
    generation: u64,
}

impl HlilFunction {
    /// Create an empty function with the default pointer width
    pub fn new(name: &str) -> Self {
        Self::with_address_size(name, DEFAULT_ADDRESS_SIZE)
    }

    /// Create an empty function for a target with the given pointer width
    pub fn with_address_size(name: &str, address_size: usize) -> Self {
        Self {
            name: name.to_string(),
            exprs: Vec::new(),
            operand_lists: Vec::new(),
            instructions: Vec::new(),
            variables: HashMap::new(),
            next_variable: 0,
            address_size,
            pending: false,
            generation: 0,
        }
    }

    /// Register a named variable
    pub fn add_variable(&mut self, name: &str) -> Variable {
        let var = Variable::new(self.next_variable);
        self.next_variable += 1;
        self.variables.insert(var, name.to_string());
        var
    }

    /// Append a top-level instruction rooted at `expr`
    pub fn push_instruction(&mut self, expr: ExprId) -> Instruction {
        let index = self.instructions.len();
        self.instructions.push(expr);
        Instruction { index, expr }
    }

    /// Number of allocated expressions
    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    /// Number of finalize calls so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// All top-level instructions in order
    pub fn instructions(&self) -> impl Iterator<Item = Instruction> + '_ {
        self.instructions
            .iter()
            .enumerate()
            .map(|(index, &expr)| Instruction { index, expr })
    }

    /// Check that every instruction root, operand and operand list resolves
    pub fn validate(&self) -> Result<()> {
        for &root in &self.instructions {
            self.expr(root).ok_or(Error::InvalidExpr(root))?;
        }

        for expr in &self.exprs {
            for operand in expr.kind.operands() {
                self.expr(operand).ok_or(Error::InvalidExpr(operand))?;
            }
            if let ExprKind::Call { params, .. } = &expr.kind {
                let list = self
                    .operand_list(*params)
                    .ok_or(Error::InvalidOperandList(params.0))?;
                if let Some(&missing) = list.iter().find(|id| self.expr(**id).is_none()) {
                    return Err(Error::InvalidExpr(missing));
                }
            }
        }

        Ok(())
    }
}

impl IlFunction for HlilFunction {
    fn instruction_count(&self) -> usize {
        self.instructions.len()
    }

    fn instruction(&self, index: usize) -> Option<Instruction> {
        self.instructions
            .get(index)
            .map(|&expr| Instruction { index, expr })
    }

    fn expr(&self, id: ExprId) -> Option<&Expr> {
        self.exprs.get(id.0)
    }

    fn operand_list(&self, id: OperandListId) -> Option<&[ExprId]> {
        self.operand_lists.get(id.0).map(|list| list.as_slice())
    }

    fn variable_name(&self, var: Variable) -> String {
        self.variables
            .get(&var)
            .cloned()
            .unwrap_or_else(|| format!("var_{}", var.0))
    }

    fn address_size(&self) -> usize {
        self.address_size
    }
}

impl IlFunctionMut for HlilFunction {
    fn add_expr(&mut self, kind: ExprKind, size: usize) -> ExprId {
        let id = ExprId(self.exprs.len());
        self.exprs.push(Expr::new(kind, size));
        id
    }

    fn add_operand_list(&mut self, operands: &[ExprId]) -> OperandListId {
        let id = OperandListId(self.operand_lists.len());
        self.operand_lists.push(operands.to_vec());
        id
    }

    fn replace_expr(&mut self, target: ExprId, replacement: ExprId) -> Result<()> {
        let new = self
            .exprs
            .get(replacement.0)
            .cloned()
            .ok_or(Error::InvalidExpr(replacement))?;
        let slot = self
            .exprs
            .get_mut(target.0)
            .ok_or(Error::InvalidExpr(target))?;
        *slot = new;
        self.pending = true;
        Ok(())
    }

    fn finalize(&mut self) {
        self.pending = false;
        self.generation += 1;
    }

    fn has_pending_changes(&self) -> bool {
        self.pending
    }
}
