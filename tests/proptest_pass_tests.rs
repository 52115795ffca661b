//! Property-based tests for the memcpy lifting pass
//!
//! These tests use proptest to generate random functions and verify that:
//! 1. Functions without copy loops are never changed
//! 2. Every qualifying loop is found with its exact bound
//! 3. Matches never overlap and rewrites keep every instruction slot

use memcpy_lift::il::{
    render_function, CmpOp, FunctionBuilder, HlilFunction, IlFunction, IlFunctionMut,
    SymbolTable,
};
use memcpy_lift::{LoopIdiomMatcher, MemcpyPass};
use proptest::prelude::*;

// =============================================================================
// STRATEGY GENERATORS
// =============================================================================

/// Statements that are never a copy loop
#[derive(Debug, Clone)]
enum Filler {
    /// x = c
    Store(i64),
    /// x = y + z
    Sum,
    /// while (i <op> c) x = x - 1, with a bound the matcher must reject
    CountDown(CmpOp, i64),
    /// while (i s< c) dst[i] = 0
    Fill(i64),
    /// return
    Ret,
}

/// A qualifying copy loop
#[derive(Debug, Clone)]
struct CopyLoop {
    deref: bool,
    bound: i64,
}

fn filler() -> impl Strategy<Value = Filler> {
    prop_oneof![
        any::<i64>().prop_map(Filler::Store),
        Just(Filler::Sum),
        (
            prop_oneof![
                Just(CmpOp::Ult),
                Just(CmpOp::Sle),
                Just(CmpOp::Ne),
                Just(CmpOp::Sgt),
            ],
            0i64..1000
        )
            .prop_map(|(op, c)| Filler::CountDown(op, c)),
        (0i64..1000).prop_map(Filler::Fill),
        Just(Filler::Ret),
    ]
}

fn copy_loop() -> impl Strategy<Value = CopyLoop> {
    (any::<bool>(), 0i64..=i64::MAX).prop_map(|(deref, bound)| CopyLoop { deref, bound })
}

/// Either filler or a copy loop
#[derive(Debug, Clone)]
enum Stmt {
    Filler(Filler),
    Copy(CopyLoop),
}

fn stmt() -> impl Strategy<Value = Stmt> {
    prop_oneof![
        3 => filler().prop_map(Stmt::Filler),
        1 => copy_loop().prop_map(Stmt::Copy),
    ]
}

// =============================================================================
// FUNCTION CONSTRUCTION
// =============================================================================

fn push_filler(b: &mut FunctionBuilder, filler: &Filler) {
    match filler {
        Filler::Store(c) => {
            let x = b.var("x");
            let c = b.constant(*c);
            let assign = b.assign(x, c);
            b.instruction(assign);
        }
        Filler::Sum => {
            let (x, y, z) = (b.var("x"), b.var("y"), b.var("z"));
            let sum = b.add(y, z);
            let assign = b.assign(x, sum);
            b.instruction(assign);
        }
        Filler::CountDown(op, c) => {
            let i = b.var("i");
            let x = b.var("x");
            let bound = b.constant(*c);
            let cond = b.cmp(*op, i, bound);
            let one = b.constant(1);
            let dec = b.sub(x, one);
            let assign = b.assign(x, dec);
            b.while_loop(cond, assign);
            b.instruction(assign);
        }
        Filler::Fill(c) => {
            let i = b.var("i");
            let dst = b.var("dst");
            let bound = b.constant(*c);
            let cond = b.cmp(CmpOp::Slt, i, bound);
            let lhs = b.array_index(dst, i, 1);
            let zero = b.constant(0);
            let assign = b.assign(lhs, zero);
            b.while_loop(cond, assign);
            b.instruction(assign);
        }
        Filler::Ret => {
            b.ret(None);
        }
    }
}

fn push_copy(b: &mut FunctionBuilder, copy: &CopyLoop) {
    let i = b.var("i");
    let dst = b.var("dst");
    let src = b.var("src");
    let bound = b.constant(copy.bound);
    let cond = b.cmp(CmpOp::Slt, i, bound);
    let (lhs, rhs) = if copy.deref {
        let to = b.add(dst, i);
        let from = b.add(src, i);
        (b.deref(to, 1), b.deref(from, 1))
    } else {
        (b.array_index(dst, i, 1), b.array_index(src, i, 1))
    };
    let assign = b.assign(lhs, rhs);
    b.while_loop(cond, assign);
    b.instruction(assign);
}

fn build(stmts: &[Stmt]) -> HlilFunction {
    let mut b = FunctionBuilder::new("f");
    for stmt in stmts {
        match stmt {
            Stmt::Filler(filler) => push_filler(&mut b, filler),
            Stmt::Copy(copy) => push_copy(&mut b, copy),
        }
    }
    b.build()
}

fn view() -> SymbolTable {
    SymbolTable::new().with_symbol("memcpy", 0x401000)
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    /// Functions without copy loops come out of the pass unchanged
    #[test]
    fn prop_no_copy_loops_no_change(fillers in prop::collection::vec(filler(), 0..40)) {
        let stmts: Vec<Stmt> = fillers.into_iter().map(Stmt::Filler).collect();
        let mut f = build(&stmts);
        let before = render_function(&f);
        let exprs = f.expr_count();

        let report = MemcpyPass::default().run(&mut f, &view());

        prop_assert!(report.matches.is_empty());
        prop_assert!(report.is_noop());
        prop_assert_eq!(render_function(&f), before);
        prop_assert_eq!(f.expr_count(), exprs);
        prop_assert!(!f.has_pending_changes());
    }

    /// Every copy loop is found, in order, with its exact bound
    #[test]
    fn prop_all_copy_loops_found(stmts in prop::collection::vec(stmt(), 0..40)) {
        let f = build(&stmts);
        let expected: Vec<u64> = stmts
            .iter()
            .filter_map(|s| match s {
                Stmt::Copy(copy) => Some(copy.bound as u64),
                Stmt::Filler(_) => None,
            })
            .collect();

        let records = LoopIdiomMatcher::default().scan(&f);
        let lengths: Vec<u64> = records.iter().map(|r| r.length).collect();

        prop_assert_eq!(lengths, expected);
        for r in &records {
            prop_assert_eq!(f.variable_name(r.destination), "dst");
            prop_assert_eq!(f.variable_name(r.source), "src");
        }
    }

    /// Matches are disjoint and strictly ordered
    #[test]
    fn prop_matches_disjoint(stmts in prop::collection::vec(stmt(), 0..40)) {
        let f = build(&stmts);
        let records = LoopIdiomMatcher::default().scan(&f);

        for r in &records {
            prop_assert_eq!(r.body.index, r.head.index + 1);
        }
        for pair in records.windows(2) {
            prop_assert!(pair[0].body.index < pair[1].head.index);
        }
    }

    /// Rewriting never adds or removes instruction slots
    #[test]
    fn prop_rewrite_keeps_instruction_count(stmts in prop::collection::vec(stmt(), 0..40)) {
        let mut f = build(&stmts);
        let count = f.instruction_count();

        let report = MemcpyPass::default().run(&mut f, &view());

        prop_assert_eq!(report.instruction_count, count);
        prop_assert_eq!(f.instruction_count(), count);
        prop_assert_eq!(report.rewrites.len(), report.matches.len());
        prop_assert_eq!(f.generation(), report.rewrites.len() as u64);
        prop_assert!(f.validate().is_ok());
    }

    /// Without the copy primitive the function is left as it was
    #[test]
    fn prop_missing_symbol_no_change(stmts in prop::collection::vec(stmt(), 0..40)) {
        let mut f = build(&stmts);
        let before = render_function(&f);

        let report = MemcpyPass::default().run(&mut f, &SymbolTable::new());

        prop_assert!(report.rewrites.is_empty());
        prop_assert_eq!(report.skipped.len(), report.matches.len());
        prop_assert_eq!(render_function(&f), before);
        prop_assert!(!f.has_pending_changes());
    }
}
