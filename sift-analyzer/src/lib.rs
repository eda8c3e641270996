mod aggregate;
mod analyzer;
mod ast;
mod binder;
mod builtins;
mod capabilities;
mod checker;
mod control_flow;
mod diagnostics;
mod error;
mod modules;
mod operators;
mod options;
mod scope;
mod source;
mod types;

pub use crate::aggregate::{aggregate, Aggregator};
pub use crate::analyzer::{AnalysisReport, Analyzer, CancellationFlag};
pub use crate::ast::{
    AnnAssignStatement, ArgumentUnpack, AssertStatement, AssignStatement, AttributeExpression,
    AugAssignStatement, BinaryExpression, BinaryOperator, CallArgument, CallExpression, ClassDef,
    Comprehension, ComprehensionExpression, ConditionalExpression, DeleteStatement, DictEntry,
    DictExpression, ExceptHandler, Expression, ExpressionKind, ExpressionStatement,
    FStringExpression, ForStatement, FunctionDef, Identifier, IfStatement, ImportAlias,
    ImportFromStatement, ImportStatement, IntLiteral, LambdaExpression, Literal, LiteralExpression,
    Module, NameExpression, NameListStatement, OperandExpression, Parameter, ParameterKind,
    RaiseStatement, ReturnStatement, SequenceExpression, SliceExpression, SourceSpan, Statement,
    StatementKind, SubscriptExpression, TryStatement, TypeAnnotation, UnaryExpression,
    UnaryOperator, UnsupportedNode, WhileStatement, WithItem, WithStatement, YieldExpression,
};
pub use crate::binder::{Binder, BindingOutput, BoundModule};
pub use crate::builtins::stubs::{standard_modules, StubModule, STANDARD_MODULES};
pub use crate::builtins::{
    builtin_symbols, find_function as find_builtin_function, StubFunction,
    StubType, BUILTIN_CLASSES, BUILTIN_FUNCTIONS,
};
pub use crate::capabilities::{container_attribute, primitive_attribute};
pub use crate::checker::{CheckOutput, TypeChecker};
pub use crate::control_flow::{ControlFlowAnalyzer, ControlFlowGraph};
pub use crate::diagnostics::{
    Diagnostic, DiagnosticCode, DiagnosticLevel, DiagnosticRecord, Diagnostics,
};
pub use crate::error::AnalysisError;
pub use crate::modules::{ModuleDescriptor, ModuleIndex, ModuleResolver};
pub use crate::operators::{binary_result, unary_result};
pub use crate::options::AnalyzerOptions;
pub use crate::scope::{
    RedeclarationError, Scope, ScopeId, ScopeKind, ScopeTree, Symbol, SymbolId, SymbolKind,
};
pub use crate::source::{SourceFile, SourceId};
pub use crate::types::{
    class_display_name, is_assignable, join, join_all, resolve_annotation, Arity, ClassHierarchy,
    ContainerKind, FunctionType, ParamType, Primitive, ResolvedAnnotation, Type,
};
