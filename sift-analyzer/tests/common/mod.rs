//! Builders for syntax trees. Leaf helpers take the 1-based line and column
//! of their first character; composite helpers derive spans from children.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use sift_analyzer::{
    AnalysisReport, Analyzer, AnalyzerOptions, AnnAssignStatement, ArgumentUnpack,
    AssignStatement, AttributeExpression, BinaryExpression, BinaryOperator, CallArgument,
    CallExpression, ClassDef, Comprehension, ComprehensionExpression, Diagnostic, DiagnosticCode,
    DictEntry, DictExpression, Expression, ExpressionKind, ExpressionStatement, FunctionDef,
    IfStatement, ImportAlias, ImportFromStatement, ImportStatement, Literal, LiteralExpression,
    Module, ModuleIndex, NameExpression, OperandExpression, Parameter, ParameterKind,
    ReturnStatement, SequenceExpression, SliceExpression, SourceSpan, Statement, StatementKind,
    SubscriptExpression, TypeAnnotation,
};

pub fn span(line: usize, column: usize, end_column: usize) -> SourceSpan {
    SourceSpan::new(line, column, line, end_column)
}

fn between(start: &SourceSpan, end: &SourceSpan, extra: usize) -> SourceSpan {
    SourceSpan::new(start.line, start.column, end.end_line, end.end_column + extra)
}

pub fn name(line: usize, column: usize, id: &str) -> Expression {
    Expression::new(
        span(line, column, column + id.len()),
        ExpressionKind::Name(NameExpression { id: id.to_string() }),
    )
}

fn literal(line: usize, column: usize, width: usize, value: Literal) -> Expression {
    Expression::new(
        span(line, column, column + width),
        ExpressionKind::Literal(LiteralExpression { value }),
    )
}

pub fn int(line: usize, column: usize, value: i64) -> Expression {
    literal(line, column, value.to_string().len(), Literal::Int(value.into()))
}

pub fn float(line: usize, column: usize, value: f64) -> Expression {
    literal(line, column, value.to_string().len(), Literal::Float(value))
}

pub fn string(line: usize, column: usize, value: &str) -> Expression {
    literal(line, column, value.len() + 2, Literal::Str(value.to_string()))
}

pub fn boolean(line: usize, column: usize, value: bool) -> Expression {
    literal(line, column, if value { 4 } else { 5 }, Literal::Bool(value))
}

pub fn none(line: usize, column: usize) -> Expression {
    literal(line, column, 4, Literal::None)
}

pub fn ellipsis(line: usize, column: usize) -> Expression {
    literal(line, column, 3, Literal::Ellipsis)
}

pub fn binary(operator: BinaryOperator, left: Expression, right: Expression) -> Expression {
    Expression::new(
        between(&left.span, &right.span, 0),
        ExpressionKind::Binary(BinaryExpression {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }),
    )
}

pub fn positional(value: Expression) -> CallArgument {
    CallArgument {
        name: None,
        value,
        unpack: ArgumentUnpack::None,
    }
}

pub fn keyword(keyword: &str, value: Expression) -> CallArgument {
    CallArgument {
        name: Some(keyword.to_string()),
        value,
        unpack: ArgumentUnpack::None,
    }
}

pub fn call(callee: Expression, arguments: Vec<Expression>) -> Expression {
    call_with(callee, arguments.into_iter().map(positional).collect())
}

pub fn call_with(callee: Expression, arguments: Vec<CallArgument>) -> Expression {
    let end = arguments
        .last()
        .map(|argument| argument.value.span)
        .unwrap_or(callee.span);
    let extra = if arguments.is_empty() { 2 } else { 1 };
    Expression::new(
        between(&callee.span, &end, extra),
        ExpressionKind::Call(CallExpression {
            callee: Box::new(callee),
            arguments,
        }),
    )
}

pub fn attribute(value: Expression, attr: &str) -> Expression {
    let attr_column = value.span.end_column + 1;
    let attr_span = SourceSpan::new(
        value.span.end_line,
        attr_column,
        value.span.end_line,
        attr_column + attr.len(),
    );
    Expression::new(
        between(&value.span, &attr_span, 0),
        ExpressionKind::Attribute(AttributeExpression {
            value: Box::new(value),
            attr: attr.to_string(),
            attr_span,
        }),
    )
}

pub fn subscript(value: Expression, index: Expression) -> Expression {
    Expression::new(
        between(&value.span, &index.span, 1),
        ExpressionKind::Subscript(SubscriptExpression {
            value: Box::new(value),
            index: Box::new(index),
        }),
    )
}

pub fn list(line: usize, column: usize, elements: Vec<Expression>) -> Expression {
    let end = elements
        .last()
        .map(|element| element.span.end_column + 1)
        .unwrap_or(column + 2);
    Expression::new(
        span(line, column, end),
        ExpressionKind::List(SequenceExpression { elements }),
    )
}

pub fn tuple(line: usize, column: usize, elements: Vec<Expression>) -> Expression {
    let end = elements
        .last()
        .map(|element| element.span.end_column + 1)
        .unwrap_or(column + 2);
    Expression::new(
        span(line, column, end),
        ExpressionKind::Tuple(SequenceExpression { elements }),
    )
}

pub fn dict(line: usize, column: usize, entries: Vec<(Expression, Expression)>) -> Expression {
    let end = entries
        .last()
        .map(|(_, value)| value.span.end_column + 1)
        .unwrap_or(column + 2);
    Expression::new(
        span(line, column, end),
        ExpressionKind::Dict(DictExpression {
            entries: entries
                .into_iter()
                .map(|(key, value)| DictEntry {
                    key: Some(key),
                    value,
                })
                .collect(),
        }),
    )
}

/// `[element for target in iter]`, spanning from `[` at `column` to the iterable.
pub fn list_comp(
    line: usize,
    column: usize,
    element: Expression,
    target: Expression,
    iter: Expression,
) -> Expression {
    Expression::new(
        span(line, column, iter.span.end_column + 1),
        ExpressionKind::ListComp(ComprehensionExpression {
            element: Box::new(element),
            value: None,
            generators: vec![Comprehension {
                target,
                iter,
                ifs: Vec::new(),
                is_async: false,
            }],
        }),
    )
}

/// `lower:upper`; missing bounds collapse the span onto the colon.
pub fn slice(line: usize, column: usize, lower: Option<Expression>, upper: Option<Expression>) -> Expression {
    let end = upper
        .as_ref()
        .map(|upper| upper.span.end_column)
        .unwrap_or(column + 1);
    Expression::new(
        span(line, column, end),
        ExpressionKind::Slice(SliceExpression {
            lower: lower.map(Box::new),
            upper: upper.map(Box::new),
            step: None,
        }),
    )
}

pub fn starred(line: usize, column: usize, value: Expression) -> Expression {
    Expression::new(
        span(line, column, value.span.end_column),
        ExpressionKind::Starred(OperandExpression {
            value: Box::new(value),
        }),
    )
}

pub fn annotation(line: usize, column: usize, name: &str) -> TypeAnnotation {
    TypeAnnotation {
        name: name.to_string(),
        arguments: Vec::new(),
        span: span(line, column, column + name.len()),
    }
}

pub fn generic(line: usize, column: usize, name: &str, arguments: Vec<TypeAnnotation>) -> TypeAnnotation {
    let end = arguments
        .last()
        .map(|argument| argument.span.end_column + 1)
        .unwrap_or(column + name.len());
    TypeAnnotation {
        name: name.to_string(),
        arguments,
        span: span(line, column, end),
    }
}

pub fn statement(kind: StatementKind, span: SourceSpan) -> Statement {
    Statement::new(span, kind)
}

pub fn expr_stmt(expression: Expression) -> Statement {
    let span = expression.span;
    Statement::new(span, StatementKind::Expression(ExpressionStatement { expression }))
}

pub fn assign(target: Expression, value: Expression) -> Statement {
    let span = between(&target.span, &value.span, 0);
    Statement::new(
        span,
        StatementKind::Assign(AssignStatement {
            targets: vec![target],
            value,
        }),
    )
}

pub fn ann_assign(target: Expression, annotation: TypeAnnotation, value: Option<Expression>) -> Statement {
    let end = value
        .as_ref()
        .map(|value| value.span)
        .unwrap_or(annotation.span);
    Statement::new(
        between(&target.span, &end, 0),
        StatementKind::AnnAssign(AnnAssignStatement {
            target,
            annotation,
            value,
        }),
    )
}

pub fn ret(line: usize, column: usize, value: Option<Expression>) -> Statement {
    let end = value
        .as_ref()
        .map(|value| value.span.end_column)
        .unwrap_or(column + 6);
    Statement::new(
        span(line, column, end),
        StatementKind::Return(ReturnStatement { value }),
    )
}

pub fn pass(line: usize, column: usize) -> Statement {
    Statement::new(span(line, column, column + 4), StatementKind::Pass)
}

pub fn if_else(
    line: usize,
    column: usize,
    condition: Expression,
    body: Vec<Statement>,
    orelse: Vec<Statement>,
) -> Statement {
    let end_line = orelse
        .last()
        .or(body.last())
        .map(|statement| statement.span.end_line)
        .unwrap_or(line);
    Statement::new(
        SourceSpan::new(line, column, end_line, 80),
        StatementKind::If(IfStatement {
            condition,
            body,
            orelse,
        }),
    )
}

/// `import a, b` with every module on `line`, separated by single spaces.
pub fn import(line: usize, modules: &[&str]) -> Statement {
    let mut column = 8;
    let names = modules
        .iter()
        .map(|module| {
            let alias = ImportAlias {
                name: module.to_string(),
                asname: None,
                span: span(line, column, column + module.len()),
            };
            column += module.len() + 2;
            alias
        })
        .collect();
    Statement::new(
        span(line, 1, column),
        StatementKind::Import(ImportStatement { names }),
    )
}

/// `from module import a, b`.
pub fn from_import(line: usize, module: &str, names: &[&str]) -> Statement {
    let module_span = span(line, 6, 6 + module.len());
    let mut column = module_span.end_column + 8;
    let names = names
        .iter()
        .map(|name| {
            let alias = ImportAlias {
                name: name.to_string(),
                asname: None,
                span: span(line, column, column + name.len()),
            };
            column += name.len() + 2;
            alias
        })
        .collect();
    Statement::new(
        span(line, 1, column),
        StatementKind::ImportFrom(ImportFromStatement {
            module: module.to_string(),
            module_span,
            names,
            level: 0,
        }),
    )
}

pub fn param(line: usize, column: usize, name: &str, annotation_name: Option<&str>) -> Parameter {
    Parameter {
        name: name.to_string(),
        span: span(line, column, column + name.len()),
        annotation: annotation_name
            .map(|annotation_name| annotation(line, column + name.len() + 2, annotation_name)),
        default: None,
        kind: ParameterKind::Regular,
    }
}

pub fn with_default(mut parameter: Parameter, default: Expression) -> Parameter {
    parameter.default = Some(default);
    parameter
}

/// `def name(params) -> returns:` starting at `column` on `line`, with the body
/// on the following lines.
pub fn function(
    line: usize,
    column: usize,
    name: &str,
    parameters: Vec<Parameter>,
    returns: Option<&str>,
    body: Vec<Statement>,
) -> Statement {
    let name_span = span(line, column + 4, column + 4 + name.len());
    let returns = returns.map(|returns| annotation(line, 60, returns));
    let signature_span = span(line, column, 60 + returns.as_ref().map_or(0, |r| r.name.len()) + 1);
    let end_line = body
        .last()
        .map(|statement| statement.span.end_line)
        .unwrap_or(line);
    Statement::new(
        SourceSpan::new(line, column, end_line, 80),
        StatementKind::FunctionDef(FunctionDef {
            name: name.to_string(),
            name_span,
            signature_span,
            decorators: Vec::new(),
            parameters,
            returns,
            body,
            is_async: false,
        }),
    )
}

pub fn decorated(mut definition: Statement, decorator: Expression) -> Statement {
    if let StatementKind::FunctionDef(function) = &mut definition.kind {
        function.decorators.push(decorator);
    }
    definition
}

pub fn class(line: usize, name: &str, bases: Vec<Expression>, body: Vec<Statement>) -> Statement {
    let end_line = body
        .last()
        .map(|statement| statement.span.end_line)
        .unwrap_or(line);
    Statement::new(
        SourceSpan::new(line, 1, end_line, 80),
        StatementKind::ClassDef(ClassDef {
            name: name.to_string(),
            name_span: span(line, 7, 7 + name.len()),
            bases,
            decorators: Vec::new(),
            body,
        }),
    )
}

pub fn module(body: Vec<Statement>) -> Module {
    Module::new(body)
}

pub fn analyze(module: &Module) -> AnalysisReport {
    analyze_with(module, AnalyzerOptions::default(), ModuleIndex::with_standard_stubs())
}

pub fn analyze_with(module: &Module, options: AnalyzerOptions, index: ModuleIndex) -> AnalysisReport {
    Analyzer::new(options, Arc::new(index)).analyze_module(Path::new("test.py"), module)
}

pub fn codes(report: &AnalysisReport) -> Vec<DiagnosticCode> {
    report
        .diagnostics
        .iter()
        .map(|diagnostic| diagnostic.code)
        .collect()
}

pub fn messages(report: &AnalysisReport) -> Vec<String> {
    report
        .diagnostics
        .iter()
        .map(|diagnostic| diagnostic.message.clone())
        .collect()
}

pub fn with_code(report: &AnalysisReport, code: DiagnosticCode) -> Vec<&Diagnostic> {
    report
        .diagnostics
        .iter()
        .filter(|diagnostic| diagnostic.code == code)
        .collect()
}
