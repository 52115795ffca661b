//! # Logging Tests
//!
//! Captures the pass's `tracing` events and checks the per-rewrite info
//! line and the error line for skipped records.

use memcpy_lift::il::{CmpOp, FunctionBuilder, HlilFunction, SymbolTable};
use memcpy_lift::MemcpyPass;
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Level, Metadata, Subscriber};

/// Subscriber keeping every event's level and message
#[derive(Clone, Default)]
struct Capture {
    events: Arc<Mutex<Vec<(Level, String)>>>,
}

impl Capture {
    fn messages(&self, level: Level) -> Vec<String> {
        self.events
            .lock()
            .map(|events| {
                events
                    .iter()
                    .filter(|(l, _)| *l == level)
                    .map(|(_, m)| m.clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{:?}", value);
        }
    }
}

impl Subscriber for Capture {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn new_span(&self, _span: &Attributes<'_>) -> Id {
        Id::from_u64(1)
    }

    fn record(&self, _span: &Id, _values: &Record<'_>) {}

    fn record_follows_from(&self, _span: &Id, _follows: &Id) {}

    fn event(&self, event: &Event<'_>) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        if let Ok(mut events) = self.events.lock() {
            events.push((*event.metadata().level(), visitor.0));
        }
    }

    fn enter(&self, _span: &Id) {}

    fn exit(&self, _span: &Id) {}
}

fn copy_loop(dst: &str, src: &str, n: i64) -> HlilFunction {
    let mut b = FunctionBuilder::new("sub_401000");
    let i = b.var("i");
    let d = b.var(dst);
    let s = b.var(src);
    let bound = b.constant(n);
    let cond = b.cmp(CmpOp::Slt, i, bound);
    let lhs = b.array_index(d, i, 1);
    let rhs = b.array_index(s, i, 1);
    let assign = b.assign(lhs, rhs);
    b.while_loop(cond, assign);
    b.instruction(assign);
    b.build()
}

#[test]
fn test_logs_found_copy_and_skipped_record() {
    let capture = Capture::default();

    tracing::subscriber::with_default(capture.clone(), || {
        let mut f = copy_loop("buf", "packet", 0x1c);
        let view = SymbolTable::new().with_symbol("memcpy", 0x401000);
        MemcpyPass::default().run(&mut f, &view);

        let mut g = copy_loop("dst", "src", 4);
        MemcpyPass::default().run(&mut g, &SymbolTable::new());
    });

    assert_eq!(
        capture.messages(Level::INFO),
        vec!["Found memcpy(buf, packet, 0x1c)".to_string()]
    );
    let errors = capture.messages(Level::ERROR);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("Symbol not found: memcpy"));
}
