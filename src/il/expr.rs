//! High-level IL expression definitions

use std::fmt;

/// Handle of an expression in a function's expression arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(pub usize);

impl fmt::Display for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expr#{}", self.0)
    }
}

/// Handle of an operand list (call parameters)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperandListId(pub usize);

/// Opaque storage location (register, stack slot, ...) of a function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable(pub u32);

impl Variable {
    /// Creates a variable handle with the given ID
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Top-level instruction: a stable index into the function's instruction
/// list plus the root expression stored there
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction {
    /// Position in the instruction list
    pub index: usize,
    /// Root expression of the instruction
    pub expr: ExprId,
}

/// Comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CmpOp {
    /// Equal
    E,
    /// Not equal
    Ne,
    /// Signed less than
    Slt,
    /// Unsigned less than
    Ult,
    /// Signed less than or equal
    Sle,
    /// Unsigned less than or equal
    Ule,
    /// Signed greater than
    Sgt,
    /// Unsigned greater than
    Ugt,
    /// Signed greater than or equal
    Sge,
    /// Unsigned greater than or equal
    Uge,
}

impl CmpOp {
    /// Infix symbol used when rendering
    pub fn symbol(self) -> &'static str {
        match self {
            CmpOp::E => "==",
            CmpOp::Ne => "!=",
            CmpOp::Slt => "s<",
            CmpOp::Ult => "u<",
            CmpOp::Sle => "s<=",
            CmpOp::Ule => "u<=",
            CmpOp::Sgt => "s>",
            CmpOp::Ugt => "u>",
            CmpOp::Sge => "s>=",
            CmpOp::Uge => "u>=",
        }
    }
}

/// Operation tag of an expression, without operands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// No operation
    Nop,
    /// Integer constant
    Const,
    /// Constant pointer
    ConstPtr,
    /// Variable read
    Var,
    /// Addition
    Add,
    /// Subtraction
    Sub,
    /// Memory load
    Deref,
    /// Array element access
    ArrayIndex,
    /// Comparison
    Cmp,
    /// Assignment
    Assign,
    /// While loop
    While,
    /// Function call
    Call,
    /// Return
    Ret,
}

/// Expression node (operands refer to other arena slots)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprKind {
    // No-op
    /// Inert placeholder
    Nop,

    // Leaves
    /// Integer constant
    Const(i64),
    /// Pointer constant (absolute address)
    ConstPtr(u64),
    /// Variable reference
    Var(Variable),

    // Arithmetic
    /// left + right
    Add { left: ExprId, right: ExprId },
    /// left - right
    Sub { left: ExprId, right: ExprId },

    // Memory
    /// *src
    Deref { src: ExprId },
    /// src[index]
    ArrayIndex { src: ExprId, index: ExprId },

    // Comparison
    /// left op right
    Cmp { op: CmpOp, left: ExprId, right: ExprId },

    // Statements
    /// dest = src
    Assign { dest: ExprId, src: ExprId },
    /// while (condition) body
    While { condition: ExprId, body: ExprId },
    /// dest(params...)
    Call { dest: ExprId, params: OperandListId },
    /// return src
    Ret { src: Option<ExprId> },
}

impl ExprKind {
    /// Operation tag of this node
    pub fn operation(&self) -> Operation {
        match self {
            ExprKind::Nop => Operation::Nop,
            ExprKind::Const(_) => Operation::Const,
            ExprKind::ConstPtr(_) => Operation::ConstPtr,
            ExprKind::Var(_) => Operation::Var,
            ExprKind::Add { .. } => Operation::Add,
            ExprKind::Sub { .. } => Operation::Sub,
            ExprKind::Deref { .. } => Operation::Deref,
            ExprKind::ArrayIndex { .. } => Operation::ArrayIndex,
            ExprKind::Cmp { .. } => Operation::Cmp,
            ExprKind::Assign { .. } => Operation::Assign,
            ExprKind::While { .. } => Operation::While,
            ExprKind::Call { .. } => Operation::Call,
            ExprKind::Ret { .. } => Operation::Ret,
        }
    }

    /// Expression operands, in evaluation order (call parameters excluded)
    pub fn operands(&self) -> Vec<ExprId> {
        match self {
            ExprKind::Nop | ExprKind::Const(_) | ExprKind::ConstPtr(_) | ExprKind::Var(_) => {
                Vec::new()
            }
            ExprKind::Add { left, right }
            | ExprKind::Sub { left, right }
            | ExprKind::Cmp { left, right, .. } => vec![*left, *right],
            ExprKind::Deref { src } => vec![*src],
            ExprKind::ArrayIndex { src, index } => vec![*src, *index],
            ExprKind::Assign { dest, src } => vec![*dest, *src],
            ExprKind::While { condition, body } => vec![*condition, *body],
            ExprKind::Call { dest, .. } => vec![*dest],
            ExprKind::Ret { src } => src.iter().copied().collect(),
        }
    }
}

/// Expression with its width in bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expr {
    /// Node
    pub kind: ExprKind,
    /// Width in bytes (0 for statements)
    pub size: usize,
}

impl Expr {
    /// Create an expression
    pub fn new(kind: ExprKind, size: usize) -> Self {
        Self { kind, size }
    }

    /// Operation tag
    pub fn operation(&self) -> Operation {
        self.kind.operation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_tags() {
        let e = Expr::new(
            ExprKind::ArrayIndex {
                src: ExprId(0),
                index: ExprId(1),
            },
            1,
        );
        assert_eq!(e.operation(), Operation::ArrayIndex);
        assert_eq!(e.kind.operands(), vec![ExprId(0), ExprId(1)]);
        assert!(ExprKind::Const(4).operands().is_empty());
    }

    #[test]
    fn test_expr_id_display() {
        assert_eq!(ExprId(7).to_string(), "expr#7");
    }
}
