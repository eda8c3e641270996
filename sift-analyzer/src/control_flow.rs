use std::collections::{HashMap, VecDeque};

use tracing::trace;

use crate::ast::{
    Expression, ExpressionKind, FunctionDef, Literal, Module, SourceSpan, Statement,
    StatementKind,
};
use crate::binder::{for_each_block, BoundModule};
use crate::diagnostics::{DiagnosticCode, Diagnostics};
use crate::options::AnalyzerOptions;

pub type BlockId = usize;

#[derive(Debug, Default)]
struct BasicBlock {
    statements: Vec<SourceSpan>,
    successors: Vec<BlockId>,
}

/// Basic blocks of one body. `exit` is reached by falling off the end;
/// `returned` and `raised` collect the abrupt terminations.
#[derive(Debug)]
pub struct ControlFlowGraph {
    blocks: Vec<BasicBlock>,
    entry: BlockId,
    exit: BlockId,
    returned: BlockId,
    raised: BlockId,
}

#[derive(Clone, Copy)]
struct LoopTargets {
    header: BlockId,
    after: BlockId,
}

impl ControlFlowGraph {
    pub fn build(body: &[Statement]) -> Self {
        let mut graph = ControlFlowGraph {
            blocks: Vec::new(),
            entry: 0,
            exit: 0,
            returned: 0,
            raised: 0,
        };
        graph.entry = graph.new_block();
        graph.exit = graph.new_block();
        graph.returned = graph.new_block();
        graph.raised = graph.new_block();

        let mut loops = Vec::new();
        let end = graph.lower(body, graph.entry, &mut loops);
        graph.edge(end, graph.exit);
        graph
    }

    /// Whether some path from entry falls off the end of the body.
    pub fn exit_reachable(&self) -> bool {
        self.reachable_blocks()[self.exit]
    }

    /// Statement spans mapped to whether any copy of the statement is reachable.
    pub fn statement_reachability(&self) -> HashMap<SourceSpan, bool> {
        let reachable = self.reachable_blocks();
        let mut statements = HashMap::new();
        for (index, block) in self.blocks.iter().enumerate() {
            for span in &block.statements {
                *statements.entry(*span).or_insert(false) |= reachable[index];
            }
        }
        statements
    }

    fn reachable_blocks(&self) -> Vec<bool> {
        let mut reachable = vec![false; self.blocks.len()];
        let mut queue = VecDeque::from([self.entry]);
        reachable[self.entry] = true;
        while let Some(block) = queue.pop_front() {
            for &successor in &self.blocks[block].successors {
                if !reachable[successor] {
                    reachable[successor] = true;
                    queue.push_back(successor);
                }
            }
        }
        reachable
    }

    fn new_block(&mut self) -> BlockId {
        self.blocks.push(BasicBlock::default());
        self.blocks.len() - 1
    }

    fn edge(&mut self, from: BlockId, to: BlockId) {
        if !self.blocks[from].successors.contains(&to) {
            self.blocks[from].successors.push(to);
        }
    }

    /// Lowers `statements` starting in `current`; returns the block that
    /// control reaches after the last statement.
    fn lower(
        &mut self,
        statements: &[Statement],
        mut current: BlockId,
        loops: &mut Vec<LoopTargets>,
    ) -> BlockId {
        for statement in statements {
            self.blocks[current].statements.push(statement.span);
            current = match &statement.kind {
                StatementKind::Return(_) => {
                    self.edge(current, self.returned);
                    self.new_block()
                }
                StatementKind::Raise(_) => {
                    self.edge(current, self.raised);
                    self.new_block()
                }
                StatementKind::Break => {
                    if let Some(targets) = loops.last() {
                        self.edge(current, targets.after);
                    }
                    self.new_block()
                }
                StatementKind::Continue => {
                    if let Some(targets) = loops.last() {
                        self.edge(current, targets.header);
                    }
                    self.new_block()
                }
                StatementKind::If(if_stmt) => {
                    let after = self.new_block();
                    for branch in [&if_stmt.body, &if_stmt.orelse] {
                        let start = self.new_block();
                        self.edge(current, start);
                        let end = self.lower(branch, start, loops);
                        self.edge(end, after);
                    }
                    after
                }
                StatementKind::While(while_stmt) => {
                    let runs_forever = is_always_true(&while_stmt.condition);
                    self.lower_loop(
                        current,
                        &while_stmt.body,
                        &while_stmt.orelse,
                        runs_forever,
                        loops,
                    )
                }
                StatementKind::For(for_stmt) => {
                    self.lower_loop(current, &for_stmt.body, &for_stmt.orelse, false, loops)
                }
                StatementKind::Try(try_stmt) => {
                    let body_start = self.new_block();
                    self.edge(current, body_start);
                    let body_end = self.lower(&try_stmt.body, body_start, loops);

                    let join = self.new_block();
                    for handler in &try_stmt.handlers {
                        let start = self.new_block();
                        self.edge(body_start, start);
                        let end = self.lower(&handler.body, start, loops);
                        self.edge(end, join);
                    }
                    let else_start = self.new_block();
                    self.edge(body_end, else_start);
                    let else_end = self.lower(&try_stmt.orelse, else_start, loops);
                    self.edge(else_end, join);

                    if try_stmt.finalbody.is_empty() {
                        join
                    } else {
                        // Once for the normal path, once for an exception or
                        // return leaving the body early.
                        let abrupt = self.new_block();
                        self.edge(body_start, abrupt);
                        let abrupt_end = self.lower(&try_stmt.finalbody, abrupt, loops);
                        self.edge(abrupt_end, self.raised);
                        self.lower(&try_stmt.finalbody, join, loops)
                    }
                }
                StatementKind::With(with_stmt) => {
                    let start = self.new_block();
                    self.edge(current, start);
                    self.lower(&with_stmt.body, start, loops)
                }
                _ => current,
            };
        }
        current
    }

    fn lower_loop(
        &mut self,
        current: BlockId,
        body: &[Statement],
        orelse: &[Statement],
        runs_forever: bool,
        loops: &mut Vec<LoopTargets>,
    ) -> BlockId {
        let header = self.new_block();
        let after = self.new_block();
        self.edge(current, header);

        let body_start = self.new_block();
        self.edge(header, body_start);
        loops.push(LoopTargets { header, after });
        let body_end = self.lower(body, body_start, loops);
        loops.pop();
        self.edge(body_end, header);

        let else_start = self.new_block();
        if !runs_forever {
            self.edge(header, else_start);
        }
        let else_end = self.lower(orelse, else_start, loops);
        self.edge(else_end, after);
        after
    }
}

fn is_always_true(condition: &Expression) -> bool {
    match &condition.kind {
        ExpressionKind::Literal(literal) => match &literal.value {
            Literal::Bool(value) => *value,
            Literal::Int(value) => !value.is_zero(),
            _ => false,
        },
        _ => false,
    }
}

/// Reports functions that can fall off their end despite a declared return
/// type, and code that no path reaches.
pub struct ControlFlowAnalyzer<'a> {
    bound: &'a BoundModule,
    report_unreachable_code: bool,
    diagnostics: Diagnostics,
    functions: usize,
}

impl<'a> ControlFlowAnalyzer<'a> {
    pub fn new(bound: &'a BoundModule, options: &AnalyzerOptions) -> Self {
        Self {
            bound,
            report_unreachable_code: options.report_unreachable_code,
            diagnostics: Diagnostics::new(),
            functions: 0,
        }
    }

    pub fn analyze_module(mut self, module: &Module) -> Diagnostics {
        if self.report_unreachable_code {
            let graph = ControlFlowGraph::build(&module.body);
            self.report_unreachable(&module.body, &graph.statement_reachability());
        }
        self.visit_statements(&module.body);
        trace!(functions = self.functions, "control flow finished");
        self.diagnostics
    }

    fn visit_statements(&mut self, statements: &[Statement]) {
        for statement in statements {
            match &statement.kind {
                StatementKind::FunctionDef(function) => {
                    self.analyze_function(function);
                    self.visit_statements(&function.body);
                }
                StatementKind::ClassDef(class) => self.visit_statements(&class.body),
                _ => for_each_block(statement, |block| self.visit_statements(block)),
            }
        }
    }

    fn analyze_function(&mut self, function: &FunctionDef) {
        self.functions += 1;
        let graph = ControlFlowGraph::build(&function.body);

        if self.report_unreachable_code {
            self.report_unreachable(&function.body, &graph.statement_reachability());
        }

        let Some(returns) = &function.returns else {
            return;
        };
        let declared = self.bound.annotation_type(returns);
        if declared.is_unknown() || declared.is_none() || is_stub(function) {
            return;
        }
        if graph.exit_reachable() {
            self.diagnostics.push(
                DiagnosticCode::MissingReturn,
                function.signature_span,
                format!(
                    "function '{}' may exit without returning a value of type {}",
                    function.name,
                    declared.describe()
                ),
            );
        }
    }

    fn report_unreachable(
        &mut self,
        statements: &[Statement],
        reachability: &HashMap<SourceSpan, bool>,
    ) {
        for statement in statements {
            if !reachability.get(&statement.span).copied().unwrap_or(true) {
                self.diagnostics.push(
                    DiagnosticCode::UnreachableCode,
                    statement.span,
                    "code is unreachable",
                );
                return;
            }
            for_each_block(statement, |block| self.report_unreachable(block, reachability));
        }
    }
}

/// Bodies that only declare an interface: `...`, a docstring, or an
/// abstract/overload marker.
fn is_stub(function: &FunctionDef) -> bool {
    if function.has_decorator("abstractmethod") || function.has_decorator("overload") {
        return true;
    }
    let mut saw_ellipsis = false;
    for statement in &function.body {
        let StatementKind::Expression(expression) = &statement.kind else {
            return false;
        };
        match &expression.expression.kind {
            ExpressionKind::Literal(literal) => match literal.value {
                Literal::Ellipsis => saw_ellipsis = true,
                Literal::Str(_) => {}
                _ => return false,
            },
            _ => return false,
        }
    }
    saw_ellipsis
}
