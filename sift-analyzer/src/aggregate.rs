//! Merges the per-pass diagnostic streams into the final report order.

use std::collections::HashSet;

use crate::ast::SourceSpan;
use crate::diagnostics::{Diagnostic, DiagnosticCode, Diagnostics};

#[derive(Debug, Default)]
pub struct Aggregator {
    seen: HashSet<(SourceSpan, DiagnosticCode)>,
    entries: Vec<Diagnostic>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts a pass's diagnostics in emission order. A repeat of an already
    /// collected `(span, code)` pair is ignored; the first message is kept.
    pub fn collect(&mut self, diagnostics: Diagnostics) {
        for diagnostic in diagnostics.into_entries() {
            if self.seen.insert((diagnostic.span, diagnostic.code)) {
                self.entries.push(diagnostic);
            }
        }
    }

    pub fn finish(mut self) -> Vec<Diagnostic> {
        self.entries.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));
        self.entries
    }
}

fn sort_key(diagnostic: &Diagnostic) -> (usize, usize, u8, usize, usize, DiagnosticCode, &str) {
    let span = &diagnostic.span;
    (
        span.line,
        span.column,
        diagnostic.code.priority(),
        span.end_line,
        span.end_column,
        diagnostic.code,
        diagnostic.message.as_str(),
    )
}

/// Convenience for callers holding several finished streams.
pub fn aggregate(streams: impl IntoIterator<Item = Diagnostics>) -> Vec<Diagnostic> {
    let mut aggregator = Aggregator::new();
    for stream in streams {
        aggregator.collect(stream);
    }
    aggregator.finish()
}
