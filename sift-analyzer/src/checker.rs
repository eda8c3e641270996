use std::collections::{HashMap, HashSet, VecDeque};

use tracing::trace;

use crate::ast::{
    ArgumentUnpack, AttributeExpression, CallArgument, CallExpression, ClassDef,
    ComprehensionExpression, Expression, ExpressionKind, FunctionDef, LambdaExpression, Literal,
    Module, ParameterKind, SourceSpan, Statement, StatementKind, SubscriptExpression,
    TypeAnnotation, UnaryOperator,
};
use crate::binder::{for_each_block, BoundModule};
use crate::capabilities;
use crate::diagnostics::{DiagnosticCode, Diagnostics};
use crate::modules::ModuleResolver;
use crate::operators::{binary_result, unary_result};
use crate::options::AnalyzerOptions;
use crate::scope::{ScopeId, ScopeKind, SymbolId};
use crate::types::{
    class_display_name, is_assignable, join, join_all, Arity, ClassHierarchy, ContainerKind,
    FunctionType, ParamType, Primitive, Type,
};

/// Attributes every object carries regardless of its class body.
const OBJECT_DUNDERS: &[&str] = &[
    "__class__",
    "__dict__",
    "__doc__",
    "__module__",
    "__init__",
    "__new__",
    "__repr__",
    "__str__",
    "__eq__",
    "__ne__",
    "__hash__",
    "__name__",
    "__qualname__",
    "__annotations__",
    "__setattr__",
    "__getattribute__",
    "__delattr__",
    "__dir__",
    "__format__",
    "__sizeof__",
    "__reduce__",
    "__init_subclass__",
    "__subclasshook__",
    "__slots__",
    "__weakref__",
    "__mro__",
    "__bases__",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MethodKind {
    Instance,
    Static,
    Class,
    Property,
}

#[derive(Debug, Clone, PartialEq)]
struct MethodInfo {
    signature: FunctionType,
    kind: MethodKind,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct AttributeInfo {
    declared: Option<Type>,
    inferred: Option<Type>,
}

impl AttributeInfo {
    fn inferred() -> Self {
        Self::default()
    }

    fn declared(ty: Type) -> Self {
        Self {
            declared: Some(ty),
            inferred: None,
        }
    }

    fn ty(&self) -> Type {
        self.declared
            .clone()
            .or_else(|| self.inferred.clone())
            .unwrap_or(Type::Unknown)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ClassShape {
    bases: Vec<String>,
    /// Members may exist that the class body does not show.
    open: bool,
    methods: HashMap<String, MethodInfo>,
    attributes: HashMap<String, AttributeInfo>,
}

enum MemberLookup<'a> {
    Method(&'a MethodInfo),
    Attribute(&'a AttributeInfo),
    Open,
    Missing,
}

enum AttributeSlot {
    Declared(Type),
    Inferred(String),
    Open,
    Missing,
}

/// Shapes of every class defined in the module, keyed by the binder's class key.
#[derive(Debug, Default)]
struct ClassTable {
    shapes: HashMap<String, ClassShape>,
    /// Inferred attribute types no longer change.
    frozen: bool,
}

impl ClassTable {
    fn collect(module: &Module, bound: &BoundModule) -> Self {
        let mut table = ClassTable::default();
        table.collect_statements(&module.body, bound);
        table
    }

    fn collect_statements(&mut self, statements: &[Statement], bound: &BoundModule) {
        for statement in statements {
            match &statement.kind {
                StatementKind::ClassDef(class) => {
                    let key = class_key(class, bound);
                    self.shapes.insert(key, build_shape(class, bound));
                    self.collect_statements(&class.body, bound);
                }
                StatementKind::FunctionDef(function) => {
                    self.collect_statements(&function.body, bound)
                }
                _ => for_each_block(statement, |block| self.collect_statements(block, bound)),
            }
        }
    }

    /// Depth-first, left-to-right walk over the class and its bases.
    fn find_member(&self, class: &str, member: &str) -> MemberLookup<'_> {
        let mut stack = vec![class];
        let mut visited = HashSet::new();
        let mut open = false;
        while let Some(name) = stack.pop() {
            if !visited.insert(name) {
                continue;
            }
            let Some(shape) = self.shapes.get(name) else {
                open = true;
                continue;
            };
            if let Some(method) = shape.methods.get(member) {
                return MemberLookup::Method(method);
            }
            if let Some(attribute) = shape.attributes.get(member) {
                return MemberLookup::Attribute(attribute);
            }
            open |= shape.open;
            for base in shape.bases.iter().rev() {
                stack.push(base.as_str());
            }
        }
        if open {
            MemberLookup::Open
        } else {
            MemberLookup::Missing
        }
    }

    fn owner_of(&self, class: &str, member: &str) -> Option<String> {
        let mut stack = vec![class];
        let mut visited = HashSet::new();
        while let Some(name) = stack.pop() {
            if !visited.insert(name) {
                continue;
            }
            let shape = self.shapes.get(name)?;
            if shape.attributes.contains_key(member) {
                return Some(name.to_string());
            }
            for base in shape.bases.iter().rev() {
                stack.push(base.as_str());
            }
        }
        None
    }

    fn attribute_slot(&self, class: &str, member: &str) -> AttributeSlot {
        match self.find_member(class, member) {
            MemberLookup::Attribute(attribute) => match &attribute.declared {
                Some(ty) => AttributeSlot::Declared(ty.clone()),
                None => self
                    .owner_of(class, member)
                    .map(AttributeSlot::Inferred)
                    .unwrap_or(AttributeSlot::Open),
            },
            MemberLookup::Method(_) | MemberLookup::Open => AttributeSlot::Open,
            MemberLookup::Missing => AttributeSlot::Missing,
        }
    }

    fn record_inferred(&mut self, owner: &str, member: &str, value: &Type) {
        if self.frozen {
            return;
        }
        if let Some(attribute) = self
            .shapes
            .get_mut(owner)
            .and_then(|shape| shape.attributes.get_mut(member))
        {
            attribute.inferred = Some(match attribute.inferred.take() {
                None => value.clone(),
                Some(previous) => join(&previous, value),
            });
        }
    }

    /// The `__init__` signature callers must satisfy; `None` when it cannot be known.
    fn constructor(&self, class: &str) -> Option<FunctionType> {
        match self.find_member(class, "__init__") {
            MemberLookup::Method(method) => Some(method.signature.without_receiver()),
            MemberLookup::Missing => Some(FunctionType::new(Vec::new(), Type::NONE)),
            MemberLookup::Attribute(_) | MemberLookup::Open => None,
        }
    }
}

impl ClassHierarchy for ClassTable {
    fn inherits_from(&self, class: &str, ancestor: &str) -> bool {
        if class == ancestor || ancestor == "object" {
            return true;
        }
        let mut stack = vec![class];
        let mut visited = HashSet::new();
        let mut open = false;
        while let Some(name) = stack.pop() {
            if name == ancestor {
                return true;
            }
            if !visited.insert(name) {
                continue;
            }
            match self.shapes.get(name) {
                Some(shape) => {
                    open |= shape.open;
                    stack.extend(shape.bases.iter().map(String::as_str));
                }
                None => open = true,
            }
        }
        open
    }
}

fn class_key(class: &ClassDef, bound: &BoundModule) -> String {
    bound
        .class_key(&class.name_span)
        .unwrap_or(&class.name)
        .to_string()
}

fn build_shape(class: &ClassDef, bound: &BoundModule) -> ClassShape {
    let mut shape = ClassShape {
        bases: Vec::new(),
        // Decorators such as `dataclass` synthesize members.
        open: !class.decorators.is_empty(),
        methods: HashMap::new(),
        attributes: HashMap::new(),
    };

    for base in &class.bases {
        let base_class = bound
            .reference(&base.span)
            .map(|id| &bound.scopes.symbol(id).ty);
        match base_class {
            Some(Type::Class(name)) if name == "object" => {}
            Some(Type::Class(name)) => shape.bases.push(name.clone()),
            _ => shape.open = true,
        }
    }

    collect_members(&mut shape, &class.body, bound);
    shape
}

fn collect_members(shape: &mut ClassShape, body: &[Statement], bound: &BoundModule) {
    for statement in body {
        match &statement.kind {
            StatementKind::FunctionDef(function) => {
                if function.has_decorator("setter") || function.has_decorator("deleter") {
                    continue;
                }
                if matches!(function.name.as_str(), "__getattr__" | "__getattribute__") {
                    shape.open = true;
                }
                let kind = if function.has_decorator("staticmethod") {
                    MethodKind::Static
                } else if function.has_decorator("classmethod") {
                    MethodKind::Class
                } else if function.has_decorator("property") {
                    MethodKind::Property
                } else {
                    MethodKind::Instance
                };
                if kind != MethodKind::Static {
                    let receiver = function
                        .parameters
                        .first()
                        .filter(|parameter| parameter.kind == ParameterKind::Regular);
                    if let Some(receiver) = receiver {
                        collect_instance_attributes(shape, &function.body, &receiver.name, bound);
                    }
                }
                let signature = bound
                    .declaration(&function.name_span)
                    .and_then(|id| match &bound.scopes.symbol(id).ty {
                        Type::Function(signature) => Some(signature.clone()),
                        _ => None,
                    })
                    .unwrap_or_else(|| FunctionType::variadic(Type::Unknown));
                shape
                    .methods
                    .insert(function.name.clone(), MethodInfo { signature, kind });
            }
            StatementKind::ClassDef(nested) => {
                shape.attributes.insert(
                    nested.name.clone(),
                    AttributeInfo::declared(Type::Class(class_key(nested, bound))),
                );
            }
            StatementKind::Assign(assign) => {
                for target in &assign.targets {
                    if let Some(name) = target.as_name() {
                        shape
                            .attributes
                            .entry(name.to_string())
                            .or_insert_with(AttributeInfo::inferred);
                    }
                }
            }
            StatementKind::AnnAssign(assign) => {
                if let Some(name) = assign.target.as_name() {
                    shape.attributes.insert(
                        name.to_string(),
                        AttributeInfo::declared(bound.annotation_type(&assign.annotation)),
                    );
                }
            }
            _ => for_each_block(statement, |block| collect_members(shape, block, bound)),
        }
    }
}

fn collect_instance_attributes(
    shape: &mut ClassShape,
    body: &[Statement],
    receiver: &str,
    bound: &BoundModule,
) {
    for statement in body {
        match &statement.kind {
            StatementKind::Assign(assign) => {
                for target in &assign.targets {
                    note_receiver_target(shape, target, receiver);
                }
            }
            StatementKind::AugAssign(assign) => note_receiver_target(shape, &assign.target, receiver),
            StatementKind::AnnAssign(assign) => {
                if let ExpressionKind::Attribute(attribute) = &assign.target.kind {
                    if attribute.value.as_name() == Some(receiver) {
                        shape.attributes.insert(
                            attribute.attr.clone(),
                            AttributeInfo::declared(bound.annotation_type(&assign.annotation)),
                        );
                    }
                }
            }
            StatementKind::For(for_stmt) => {
                note_receiver_target(shape, &for_stmt.target, receiver);
                collect_instance_attributes(shape, &for_stmt.body, receiver, bound);
                collect_instance_attributes(shape, &for_stmt.orelse, receiver, bound);
            }
            StatementKind::With(with_stmt) => {
                for item in &with_stmt.items {
                    if let Some(target) = &item.target {
                        note_receiver_target(shape, target, receiver);
                    }
                }
                collect_instance_attributes(shape, &with_stmt.body, receiver, bound);
            }
            StatementKind::FunctionDef(_) | StatementKind::ClassDef(_) => {}
            _ => for_each_block(statement, |block| {
                collect_instance_attributes(shape, block, receiver, bound)
            }),
        }
    }
}

fn note_receiver_target(shape: &mut ClassShape, target: &Expression, receiver: &str) {
    match &target.kind {
        ExpressionKind::Attribute(attribute) if attribute.value.as_name() == Some(receiver) => {
            shape
                .attributes
                .entry(attribute.attr.clone())
                .or_insert_with(AttributeInfo::inferred);
        }
        ExpressionKind::Tuple(sequence) | ExpressionKind::List(sequence) => {
            for element in &sequence.elements {
                note_receiver_target(shape, element, receiver);
            }
        }
        _ => {}
    }
}

struct FunctionContext {
    return_type: Type,
}

struct PendingFunction<'m> {
    function: &'m FunctionDef,
}

pub struct CheckOutput {
    pub diagnostics: Diagnostics,
}

/// Passes over the module before inferred attribute types are frozen.
const MAX_ATTRIBUTE_PASSES: usize = 4;

pub struct TypeChecker<'a> {
    bound: &'a BoundModule,
    resolver: &'a dyn ModuleResolver,
    report_missing_type_parameters: bool,
    diagnostics: Diagnostics,
    classes: ClassTable,
    inferred: HashMap<SymbolId, Type>,
    contexts: Vec<FunctionContext>,
    class_body: Option<String>,
}

impl<'a> TypeChecker<'a> {
    pub fn new(
        bound: &'a BoundModule,
        resolver: &'a dyn ModuleResolver,
        options: &AnalyzerOptions,
    ) -> Self {
        Self {
            bound,
            resolver,
            report_missing_type_parameters: options.report_missing_type_parameters,
            diagnostics: Diagnostics::new(),
            classes: ClassTable::default(),
            inferred: HashMap::new(),
            contexts: Vec::new(),
            class_body: None,
        }
    }

    /// Repeats the check until inferred attribute types settle, so a read of
    /// `self.x` sees every write to it wherever the writing method sits. Only
    /// the last pass's diagnostics are kept.
    pub fn check_module(mut self, module: &Module) -> CheckOutput {
        self.classes = ClassTable::collect(module, self.bound);

        let mut passes = 0;
        loop {
            passes += 1;
            let before = self.classes.shapes.clone();
            self.check_pass(module);
            if self.classes.shapes == before {
                break;
            }
            if passes == MAX_ATTRIBUTE_PASSES {
                self.classes.frozen = true;
                self.check_pass(module);
                break;
            }
        }

        trace!(
            classes = self.classes.shapes.len(),
            passes,
            "type check finished"
        );

        CheckOutput {
            diagnostics: self.diagnostics,
        }
    }

    /// Checks the module body in order, then every function body. Bodies run
    /// after the code that defines them, so they see the module's final bindings.
    fn check_pass(&mut self, module: &Module) {
        self.diagnostics = Diagnostics::new();
        self.inferred.clear();

        let mut pending = VecDeque::new();
        self.check_statements(&module.body, &mut pending);
        while let Some(next) = pending.pop_front() {
            self.check_function_body(next.function, &mut pending);
        }
    }

    fn check_statements<'m>(
        &mut self,
        statements: &'m [Statement],
        pending: &mut VecDeque<PendingFunction<'m>>,
    ) {
        for statement in statements {
            self.check_statement(statement, pending);
        }
    }

    fn check_statement<'m>(
        &mut self,
        statement: &'m Statement,
        pending: &mut VecDeque<PendingFunction<'m>>,
    ) {
        match &statement.kind {
            StatementKind::Import(_)
            | StatementKind::ImportFrom(_)
            | StatementKind::Global(_)
            | StatementKind::Nonlocal(_)
            | StatementKind::Pass
            | StatementKind::Break
            | StatementKind::Continue
            | StatementKind::Unsupported(_) => {}
            StatementKind::Expression(expression) => {
                self.infer_expression(&expression.expression);
            }
            StatementKind::FunctionDef(function) => {
                self.check_function_header(function);
                pending.push_back(PendingFunction { function });
            }
            StatementKind::ClassDef(class) => self.check_class(class, pending),
            StatementKind::Assign(assign) => {
                let value = self.infer_expression(&assign.value);
                for target in &assign.targets {
                    self.assign_target(target, &value, assign.value.span);
                }
            }
            StatementKind::AnnAssign(assign) => {
                self.report_annotation(&assign.annotation);
                let declared = self.bound.annotation_type(&assign.annotation);
                let value = assign
                    .value
                    .as_ref()
                    .map(|value| (self.infer_expression(value), value.span));
                match &assign.target.kind {
                    ExpressionKind::Name(name) => {
                        if let Some((actual, span)) = &value {
                            self.ensure_compatible(
                                &declared,
                                actual,
                                DiagnosticCode::TypeMismatch,
                                &format!("assignment to '{}'", name.id),
                                *span,
                            );
                        }
                    }
                    _ => {
                        if let Some((actual, span)) = &value {
                            self.assign_target(&assign.target, actual, *span);
                        }
                    }
                }
            }
            StatementKind::AugAssign(assign) => {
                let current = self.infer_expression(&assign.target);
                let operand = self.infer_expression(&assign.value);
                let result = match binary_result(assign.operator, &current, &operand) {
                    Some(result) => result,
                    None => {
                        self.diagnostics.push(
                            DiagnosticCode::TypeMismatch,
                            statement.span,
                            format!(
                                "unsupported operand types for {}=: '{}' and '{}'",
                                assign.operator.symbol(),
                                current.describe(),
                                operand.describe()
                            ),
                        );
                        Type::Unknown
                    }
                };
                match &assign.target.kind {
                    ExpressionKind::Name(name) => {
                        if let Some(id) = self.bound.reference(&assign.target.span) {
                            self.store_name(id, &name.id, &result, assign.value.span);
                        }
                    }
                    _ => self.assign_target(&assign.target, &result, assign.value.span),
                }
            }
            StatementKind::Return(ret) => self.check_return(ret.value.as_ref(), statement.span),
            StatementKind::If(if_stmt) => {
                self.infer_expression(&if_stmt.condition);
                self.check_statements(&if_stmt.body, pending);
                self.check_statements(&if_stmt.orelse, pending);
            }
            StatementKind::While(while_stmt) => {
                self.infer_expression(&while_stmt.condition);
                self.check_statements(&while_stmt.body, pending);
                self.check_statements(&while_stmt.orelse, pending);
            }
            StatementKind::For(for_stmt) => {
                let iterable = self.infer_expression(&for_stmt.iter);
                let element = self.iteration_type(&iterable, for_stmt.iter.span);
                self.assign_target(&for_stmt.target, &element, for_stmt.iter.span);
                self.check_statements(&for_stmt.body, pending);
                self.check_statements(&for_stmt.orelse, pending);
            }
            StatementKind::Try(try_stmt) => {
                self.check_statements(&try_stmt.body, pending);
                for handler in &try_stmt.handlers {
                    let caught = match &handler.exception {
                        Some(exception) => match self.infer_expression(exception) {
                            Type::Class(class) => Type::ClassInstance(class),
                            _ => Type::Unknown,
                        },
                        None => Type::Unknown,
                    };
                    if let Some(name) = &handler.name {
                        if let Some(id) = self.bound.declaration(&name.span) {
                            self.store_name(id, &name.name, &caught, name.span);
                        }
                    }
                    self.check_statements(&handler.body, pending);
                }
                self.check_statements(&try_stmt.orelse, pending);
                self.check_statements(&try_stmt.finalbody, pending);
            }
            StatementKind::With(with_stmt) => {
                for item in &with_stmt.items {
                    self.infer_expression(&item.context);
                    if let Some(target) = &item.target {
                        self.assign_target(target, &Type::Unknown, item.context.span);
                    }
                }
                self.check_statements(&with_stmt.body, pending);
            }
            StatementKind::Raise(raise) => {
                if let Some(exception) = &raise.exception {
                    self.infer_expression(exception);
                }
                if let Some(cause) = &raise.cause {
                    self.infer_expression(cause);
                }
            }
            StatementKind::Assert(assert) => {
                self.infer_expression(&assert.test);
                if let Some(message) = &assert.message {
                    self.infer_expression(message);
                }
            }
            StatementKind::Delete(delete) => {
                for target in &delete.targets {
                    self.infer_expression(target);
                }
            }
        }
    }

    fn check_function_header(&mut self, function: &FunctionDef) {
        for decorator in &function.decorators {
            self.infer_expression(decorator);
        }
        for parameter in &function.parameters {
            if let Some(annotation) = &parameter.annotation {
                self.report_annotation(annotation);
            }
            if let Some(default) = &parameter.default {
                let actual = self.infer_expression(default);
                if let Some(annotation) = &parameter.annotation {
                    let expected = self.bound.annotation_type(annotation);
                    self.ensure_compatible(
                        &expected,
                        &actual,
                        DiagnosticCode::TypeMismatch,
                        &format!(
                            "default value for parameter '{}' in function '{}'",
                            parameter.name, function.name
                        ),
                        default.span,
                    );
                }
            }
        }
        if let Some(returns) = &function.returns {
            self.report_annotation(returns);
        }
    }

    fn check_function_body<'m>(
        &mut self,
        function: &'m FunctionDef,
        pending: &mut VecDeque<PendingFunction<'m>>,
    ) {
        let return_type = self
            .signature_of(function)
            .map(|signature| *signature.return_type)
            .unwrap_or(Type::Unknown);

        self.contexts.push(FunctionContext { return_type });
        let enclosing_class = self.class_body.take();
        self.check_statements(&function.body, pending);
        self.class_body = enclosing_class;
        self.contexts.pop();
    }

    fn check_class<'m>(&mut self, class: &'m ClassDef, pending: &mut VecDeque<PendingFunction<'m>>) {
        for decorator in &class.decorators {
            self.infer_expression(decorator);
        }
        for base in &class.bases {
            self.infer_expression(base);
        }

        let enclosing = self.class_body.replace(class_key(class, self.bound));
        self.check_statements(&class.body, pending);
        self.class_body = enclosing;
    }

    fn check_return(&mut self, value: Option<&Expression>, span: SourceSpan) {
        let Some(expected) = self.contexts.last().map(|context| context.return_type.clone()) else {
            if let Some(value) = value {
                self.infer_expression(value);
            }
            return;
        };

        match value {
            Some(value) => {
                let actual = self.infer_expression(value);
                self.ensure_compatible(
                    &expected,
                    &actual,
                    DiagnosticCode::ReturnTypeMismatch,
                    "return expression",
                    span,
                );
            }
            None => {
                if !is_assignable(&expected, &Type::NONE, &self.classes) {
                    self.diagnostics.push(
                        DiagnosticCode::ReturnTypeMismatch,
                        span,
                        format!(
                            "return type mismatch: expected {}, found None",
                            expected.describe()
                        ),
                    );
                }
            }
        }
    }

    fn report_annotation(&mut self, annotation: &TypeAnnotation) {
        if !self.report_missing_type_parameters {
            return;
        }
        let bound = self.bound;
        let Some(resolved) = bound.annotations.get(&annotation.span) else {
            return;
        };
        for (span, name) in &resolved.missing_parameters {
            self.diagnostics.push(
                DiagnosticCode::MissingTypeParameters,
                *span,
                format!("missing type parameters for generic type '{name}'"),
            );
        }
    }

    fn assign_target(&mut self, target: &Expression, value: &Type, value_span: SourceSpan) {
        match &target.kind {
            ExpressionKind::Name(name) => {
                if let Some(id) = self.bound.declaration(&target.span) {
                    self.store_name(id, &name.id, value, value_span);
                }
            }
            ExpressionKind::Tuple(sequence) | ExpressionKind::List(sequence) => {
                let starred = sequence
                    .elements
                    .iter()
                    .any(|element| matches!(element.kind, ExpressionKind::Starred(_)));
                let elements = match value {
                    Type::Container(ContainerKind::Tuple, elements)
                        if !starred && elements.len() == sequence.elements.len() =>
                    {
                        elements.clone()
                    }
                    Type::Container(
                        ContainerKind::List | ContainerKind::Set | ContainerKind::VariadicTuple,
                        elements,
                    ) => {
                        let element = elements.first().cloned().unwrap_or(Type::Unknown);
                        vec![element; sequence.elements.len()]
                    }
                    _ => vec![Type::Unknown; sequence.elements.len()],
                };
                for (element, ty) in sequence.elements.iter().zip(elements.iter()) {
                    self.assign_target(element, ty, value_span);
                }
            }
            ExpressionKind::Starred(starred) => {
                self.assign_target(&starred.value, &Type::list(value.clone()), value_span)
            }
            ExpressionKind::Attribute(attribute) => {
                self.assign_attribute(attribute, value, value_span)
            }
            ExpressionKind::Subscript(subscript) => {
                self.assign_subscript(subscript, value, value_span)
            }
            _ => {
                self.infer_expression(target);
            }
        }
    }

    fn store_name(&mut self, id: SymbolId, name: &str, value: &Type, value_span: SourceSpan) {
        if let Some(declared) = self.declared_type(id.scope(), name) {
            self.ensure_compatible(
                &declared,
                value,
                DiagnosticCode::TypeMismatch,
                &format!("assignment to '{name}'"),
                value_span,
            );
            return;
        }

        let latest = self.bound.scopes.lookup_local(id.scope(), name).unwrap_or(id);
        self.inferred.insert(latest, value.clone());

        if let Some(class) = &self.class_body {
            if self.bound.scopes.scope(id.scope()).kind == ScopeKind::Class {
                let class = class.clone();
                self.classes.record_inferred(&class, name, value);
            }
        }
    }

    fn assign_attribute(
        &mut self,
        attribute: &AttributeExpression,
        value: &Type,
        value_span: SourceSpan,
    ) {
        let receiver = self.infer_expression(&attribute.value);
        match &receiver {
            Type::ClassInstance(class) | Type::Class(class) => {
                match self.classes.attribute_slot(class, &attribute.attr) {
                    AttributeSlot::Declared(declared) => {
                        self.ensure_compatible(
                            &declared,
                            value,
                            DiagnosticCode::TypeMismatch,
                            &format!("assignment to attribute '{}'", attribute.attr),
                            value_span,
                        );
                    }
                    AttributeSlot::Inferred(owner) => {
                        self.classes.record_inferred(&owner, &attribute.attr, value)
                    }
                    AttributeSlot::Open => {}
                    AttributeSlot::Missing => {
                        if !OBJECT_DUNDERS.contains(&attribute.attr.as_str()) {
                            self.report_missing_attribute(&receiver, &attribute.attr, attribute.attr_span);
                        }
                    }
                }
            }
            Type::Unknown | Type::Function(_) | Type::Module { .. } => {}
            _ => {
                self.attribute_type(&receiver, &attribute.attr, attribute.attr_span);
            }
        }
    }

    fn assign_subscript(
        &mut self,
        subscript: &SubscriptExpression,
        value: &Type,
        value_span: SourceSpan,
    ) {
        let container = self.infer_expression(&subscript.value);
        let index = self.infer_expression(&subscript.index);
        if matches!(subscript.index.kind, ExpressionKind::Slice(_)) {
            return;
        }
        match &container {
            Type::Container(ContainerKind::List, elements) => {
                if self.check_integer_index("list", &index, subscript.index.span) {
                    let element = elements.first().cloned().unwrap_or(Type::Unknown);
                    self.ensure_compatible(
                        &element,
                        value,
                        DiagnosticCode::TypeMismatch,
                        "item assignment",
                        value_span,
                    );
                }
            }
            Type::Container(ContainerKind::Dict, elements) => {
                let key = elements.first().cloned().unwrap_or(Type::Unknown);
                let item = elements.get(1).cloned().unwrap_or(Type::Unknown);
                if self.ensure_compatible(
                    &key,
                    &index,
                    DiagnosticCode::TypeMismatch,
                    "dict key",
                    subscript.index.span,
                ) {
                    self.ensure_compatible(
                        &item,
                        value,
                        DiagnosticCode::TypeMismatch,
                        "item assignment",
                        value_span,
                    );
                }
            }
            Type::Container(kind, _) => self.diagnostics.push(
                DiagnosticCode::TypeMismatch,
                subscript.value.span,
                format!("'{}' object does not support item assignment", kind.name()),
            ),
            Type::Primitive(primitive) => self.diagnostics.push(
                DiagnosticCode::TypeMismatch,
                subscript.value.span,
                format!(
                    "'{}' object does not support item assignment",
                    primitive.name()
                ),
            ),
            _ => {}
        }
    }

    fn declared_type(&self, scope: ScopeId, name: &str) -> Option<Type> {
        self.bound
            .scopes
            .scope(scope)
            .symbols()
            .find(|symbol| symbol.name == name && symbol.declared)
            .map(|symbol| symbol.ty.clone())
    }

    fn name_type(&self, id: SymbolId) -> Type {
        let symbol = self.bound.scopes.symbol(id);
        if let Some(declared) = self.declared_type(id.scope(), &symbol.name) {
            return declared;
        }
        self.inferred
            .get(&id)
            .cloned()
            .unwrap_or_else(|| symbol.ty.clone())
    }

    fn signature_of(&self, function: &FunctionDef) -> Option<FunctionType> {
        let id = self.bound.declaration(&function.name_span)?;
        match &self.bound.scopes.symbol(id).ty {
            Type::Function(signature) => Some(signature.clone()),
            _ => None,
        }
    }

    fn infer_expression(&mut self, expression: &Expression) -> Type {
        match &expression.kind {
            ExpressionKind::Name(_) => self
                .bound
                .reference(&expression.span)
                .map(|id| self.name_type(id))
                .unwrap_or(Type::Unknown),
            ExpressionKind::Literal(literal) => literal_type(&literal.value),
            ExpressionKind::FString(fstring) => {
                for value in &fstring.values {
                    self.infer_expression(value);
                }
                Type::STR
            }
            ExpressionKind::List(sequence) => {
                let element = self.infer_elements(&sequence.elements);
                Type::list(element)
            }
            ExpressionKind::Set(sequence) => {
                let element = self.infer_elements(&sequence.elements);
                Type::set(element)
            }
            ExpressionKind::Tuple(sequence) => Type::tuple(
                sequence
                    .elements
                    .iter()
                    .map(|element| self.infer_expression(element))
                    .collect(),
            ),
            ExpressionKind::Dict(dict) => {
                let mut keys = Vec::new();
                let mut values = Vec::new();
                for entry in &dict.entries {
                    let value = self.infer_expression(&entry.value);
                    match &entry.key {
                        Some(key) => {
                            keys.push(self.infer_expression(key));
                            values.push(value);
                        }
                        None => match value {
                            Type::Container(ContainerKind::Dict, elements) => {
                                keys.push(elements.first().cloned().unwrap_or(Type::Unknown));
                                values.push(elements.get(1).cloned().unwrap_or(Type::Unknown));
                            }
                            _ => {
                                keys.push(Type::Unknown);
                                values.push(Type::Unknown);
                            }
                        },
                    }
                }
                Type::dict(
                    join_all(keys.iter()).unwrap_or(Type::Unknown),
                    join_all(values.iter()).unwrap_or(Type::Unknown),
                )
            }
            ExpressionKind::Binary(binary) => {
                let left = self.infer_expression(&binary.left);
                let right = self.infer_expression(&binary.right);
                match binary_result(binary.operator, &left, &right) {
                    Some(result) => result,
                    None => {
                        self.diagnostics.push(
                            DiagnosticCode::TypeMismatch,
                            expression.span,
                            format!(
                                "unsupported operand types for {}: '{}' and '{}'",
                                binary.operator.symbol(),
                                left.describe(),
                                right.describe()
                            ),
                        );
                        Type::Unknown
                    }
                }
            }
            ExpressionKind::Unary(unary) => {
                let operand = self.infer_expression(&unary.operand);
                match unary_result(unary.operator, &operand) {
                    Some(result) => result,
                    None => {
                        self.diagnostics.push(
                            DiagnosticCode::TypeMismatch,
                            expression.span,
                            format!(
                                "bad operand type for unary {}: '{}'",
                                unary_symbol(unary.operator),
                                operand.describe()
                            ),
                        );
                        Type::Unknown
                    }
                }
            }
            ExpressionKind::Call(call) => self.check_call(call, expression.span),
            ExpressionKind::Attribute(attribute) => {
                let receiver = self.infer_expression(&attribute.value);
                self.attribute_type(&receiver, &attribute.attr, attribute.attr_span)
            }
            ExpressionKind::Subscript(subscript) => self.subscript_type(subscript),
            ExpressionKind::Lambda(lambda) => self.lambda_type(lambda),
            ExpressionKind::Conditional(conditional) => {
                self.infer_expression(&conditional.condition);
                let body = self.infer_expression(&conditional.body);
                let orelse = self.infer_expression(&conditional.orelse);
                join(&body, &orelse)
            }
            ExpressionKind::ListComp(comprehension) => {
                Type::list(self.comprehension_element(comprehension))
            }
            ExpressionKind::SetComp(comprehension) => {
                Type::set(self.comprehension_element(comprehension))
            }
            ExpressionKind::DictComp(comprehension) => {
                let key = self.comprehension_element(comprehension);
                let value = comprehension
                    .value
                    .as_ref()
                    .map_or(Type::Unknown, |value| self.infer_expression(value));
                Type::dict(key, value)
            }
            ExpressionKind::Generator(comprehension) => {
                self.comprehension_element(comprehension);
                Type::Unknown
            }
            ExpressionKind::Slice(slice) => {
                for bound in slice.bounds() {
                    self.infer_expression(bound);
                }
                Type::Unknown
            }
            ExpressionKind::Starred(operand)
            | ExpressionKind::Await(operand)
            | ExpressionKind::YieldFrom(operand) => {
                self.infer_expression(&operand.value);
                Type::Unknown
            }
            ExpressionKind::Yield(yield_expr) => {
                if let Some(value) = &yield_expr.value {
                    self.infer_expression(value);
                }
                Type::Unknown
            }
            ExpressionKind::Unsupported(_) => Type::Unknown,
        }
    }

    /// Binds each generator's target to the element type of its iterable and
    /// returns the type of the produced element (the key for dicts).
    fn comprehension_element(&mut self, comprehension: &ComprehensionExpression) -> Type {
        for generator in &comprehension.generators {
            let iterable = self.infer_expression(&generator.iter);
            let element = if generator.is_async {
                Type::Unknown
            } else {
                self.iteration_type(&iterable, generator.iter.span)
            };
            self.assign_target(&generator.target, &element, generator.iter.span);
            for condition in &generator.ifs {
                self.infer_expression(condition);
            }
        }
        self.infer_expression(&comprehension.element)
    }

    fn infer_elements(&mut self, elements: &[Expression]) -> Type {
        let types = elements
            .iter()
            .map(|element| self.infer_expression(element))
            .collect::<Vec<_>>();
        join_all(types.iter()).unwrap_or(Type::Unknown)
    }

    fn lambda_type(&mut self, lambda: &LambdaExpression) -> Type {
        let mut params = Vec::new();
        let mut variadic = false;
        let mut keywords = false;
        for parameter in &lambda.parameters {
            if let Some(default) = &parameter.default {
                self.infer_expression(default);
            }
            match parameter.kind {
                ParameterKind::Regular | ParameterKind::KeywordOnly => params.push(ParamType {
                    name: parameter.name.clone(),
                    ty: Type::Unknown,
                    positional: parameter.kind == ParameterKind::Regular,
                    required: parameter.default.is_none(),
                }),
                ParameterKind::VarPositional => variadic = true,
                ParameterKind::VarKeyword => keywords = true,
            }
        }
        let return_type = self.infer_expression(&lambda.body);
        let mut signature = FunctionType::new(params, return_type);
        signature.variadic = variadic;
        signature.keywords = keywords;
        Type::Function(signature)
    }

    fn check_call(&mut self, call: &CallExpression, span: SourceSpan) -> Type {
        let callee = self.infer_expression(&call.callee);
        let arguments = call
            .arguments
            .iter()
            .map(|argument| self.infer_expression(&argument.value))
            .collect::<Vec<_>>();
        let name = callee_name(&call.callee);

        match callee {
            Type::Unknown => Type::Unknown,
            Type::Function(signature) => {
                self.verify_call_arguments(&signature, &call.arguments, &arguments, name, span);
                *signature.return_type
            }
            Type::Class(class) => {
                if let Some(constructor) = self.classes.constructor(&class) {
                    self.verify_call_arguments(
                        &constructor,
                        &call.arguments,
                        &arguments,
                        Some(class_display_name(&class)),
                        span,
                    );
                }
                Type::ClassInstance(class)
            }
            Type::ClassInstance(class) => match self.instance_member(&class, "__call__") {
                Some(Type::Function(signature)) => {
                    self.verify_call_arguments(&signature, &call.arguments, &arguments, name, span);
                    *signature.return_type
                }
                Some(_) => Type::Unknown,
                None => {
                    self.diagnostics.push(
                        DiagnosticCode::TypeMismatch,
                        call.callee.span,
                        format!("'{}' object is not callable", class_display_name(&class)),
                    );
                    Type::Unknown
                }
            },
            other => {
                let described = match &other {
                    Type::Container(kind, _) => kind.name().to_string(),
                    Type::Module { .. } => "module".to_string(),
                    _ => other.describe(),
                };
                self.diagnostics.push(
                    DiagnosticCode::TypeMismatch,
                    call.callee.span,
                    format!("'{described}' object is not callable"),
                );
                Type::Unknown
            }
        }
    }

    fn verify_call_arguments(
        &mut self,
        signature: &FunctionType,
        arguments: &[CallArgument],
        actual: &[Type],
        name: Option<&str>,
        call_span: SourceSpan,
    ) {
        if arguments
            .iter()
            .any(|argument| argument.unpack != ArgumentUnpack::None)
        {
            return;
        }

        let context = name
            .map(|function| format!("function '{}'", function))
            .unwrap_or_else(|| "function value".to_string());
        let positional_params = signature
            .params
            .iter()
            .enumerate()
            .filter(|(_, param)| param.positional)
            .map(|(index, _)| index)
            .collect::<Vec<_>>();
        let positional_count = arguments
            .iter()
            .filter(|argument| argument.name.is_none())
            .count();
        let mut filled = vec![false; signature.params.len()];
        let mut next_positional = 0;

        for (argument, ty) in arguments.iter().zip(actual.iter()) {
            if argument.name.is_some() {
                continue;
            }
            match positional_params.get(next_positional) {
                Some(&index) => {
                    next_positional += 1;
                    filled[index] = true;
                    self.check_argument(signature, index, ty, name, argument.value.span);
                }
                None if signature.variadic => {}
                None => {
                    self.diagnostics.push(
                        DiagnosticCode::ArgumentCountMismatch,
                        argument.value.span,
                        arity_message(&context, signature.arity(), positional_count),
                    );
                    return;
                }
            }
        }

        let mut used_keywords = false;
        for (argument, ty) in arguments.iter().zip(actual.iter()) {
            let Some(keyword) = &argument.name else {
                continue;
            };
            used_keywords = true;
            match signature.params.iter().position(|param| &param.name == keyword) {
                Some(index) if filled[index] => {
                    self.diagnostics.push(
                        DiagnosticCode::ArgumentCountMismatch,
                        argument.value.span,
                        format!("{context} got multiple values for argument '{keyword}'"),
                    );
                }
                Some(index) => {
                    filled[index] = true;
                    self.check_argument(signature, index, ty, name, argument.value.span);
                }
                None if signature.keywords => {}
                None => {
                    self.diagnostics.push(
                        DiagnosticCode::ArgumentCountMismatch,
                        argument.value.span,
                        format!("{context} got an unexpected keyword argument '{keyword}'"),
                    );
                }
            }
        }

        let missing = signature
            .params
            .iter()
            .zip(filled.iter())
            .find(|(param, filled)| param.required && !**filled)
            .map(|(param, _)| param);
        if let Some(param) = missing {
            let message = if used_keywords || !param.positional {
                format!("{context} missing required argument '{}'", param.name)
            } else {
                arity_message(&context, signature.arity(), positional_count)
            };
            self.diagnostics
                .push(DiagnosticCode::ArgumentCountMismatch, call_span, message);
        }
    }

    fn check_argument(
        &mut self,
        signature: &FunctionType,
        index: usize,
        actual: &Type,
        name: Option<&str>,
        span: SourceSpan,
    ) {
        let expected = &signature.params[index].ty;
        let context = match name {
            Some(function) => format!("argument {} to '{}'", index + 1, function),
            None => format!("argument {} to function value", index + 1),
        };
        self.ensure_compatible(
            expected,
            actual,
            DiagnosticCode::ArgumentTypeMismatch,
            &context,
            span,
        );
    }

    fn attribute_type(&mut self, receiver: &Type, name: &str, span: SourceSpan) -> Type {
        let found = match receiver {
            Type::Unknown | Type::Function(_) => Some(Type::Unknown),
            Type::Primitive(primitive) => capabilities::primitive_attribute(*primitive, name),
            Type::Container(kind, elements) => {
                capabilities::container_attribute(*kind, elements, name)
            }
            Type::ClassInstance(class) => self.instance_member(class, name),
            Type::Class(class) => self.class_member(class, name),
            Type::Module {
                name: module,
                resolved,
            } => self.module_member(module, *resolved, name),
        };

        match found {
            Some(ty) => ty,
            None => {
                self.report_missing_attribute(receiver, name, span);
                Type::Unknown
            }
        }
    }

    fn report_missing_attribute(&mut self, receiver: &Type, name: &str, span: SourceSpan) {
        let message = match receiver {
            Type::Module { name: module, .. } => {
                format!("module '{module}' has no attribute '{name}'")
            }
            other => format!("'{}' has no attribute '{name}'", other.describe()),
        };
        self.diagnostics
            .push(DiagnosticCode::AttributeError, span, message);
    }

    fn instance_member(&self, class: &str, name: &str) -> Option<Type> {
        if OBJECT_DUNDERS.contains(&name) {
            return Some(Type::Unknown);
        }
        match self.classes.find_member(class, name) {
            MemberLookup::Method(method) => Some(match method.kind {
                MethodKind::Instance | MethodKind::Class => {
                    Type::Function(method.signature.without_receiver())
                }
                MethodKind::Static => Type::Function(method.signature.clone()),
                MethodKind::Property => (*method.signature.return_type).clone(),
            }),
            MemberLookup::Attribute(attribute) => Some(attribute.ty()),
            MemberLookup::Open => Some(Type::Unknown),
            MemberLookup::Missing => None,
        }
    }

    fn class_member(&self, class: &str, name: &str) -> Option<Type> {
        if OBJECT_DUNDERS.contains(&name) {
            return Some(Type::Unknown);
        }
        match self.classes.find_member(class, name) {
            MemberLookup::Method(method) => Some(match method.kind {
                MethodKind::Instance | MethodKind::Static => Type::Function(method.signature.clone()),
                MethodKind::Class => Type::Function(method.signature.without_receiver()),
                MethodKind::Property => Type::Unknown,
            }),
            MemberLookup::Attribute(attribute) => Some(attribute.ty()),
            MemberLookup::Open => Some(Type::Unknown),
            MemberLookup::Missing => None,
        }
    }

    fn module_member(&self, module: &str, resolved: bool, name: &str) -> Option<Type> {
        let submodule = format!("{module}.{name}");
        if resolved {
            if let Some(descriptor) = self.resolver.resolve(module) {
                if let Some(ty) = descriptor.export(name) {
                    return Some(ty.clone());
                }
                if self.resolver.resolve(&submodule).is_some() {
                    return Some(Type::Module {
                        name: submodule,
                        resolved: true,
                    });
                }
                if name.starts_with("__") {
                    return Some(Type::Unknown);
                }
                return None;
            }
        }
        if self.resolver.resolve(&submodule).is_some() {
            return Some(Type::Module {
                name: submodule,
                resolved: true,
            });
        }
        Some(Type::Unknown)
    }

    fn subscript_type(&mut self, subscript: &SubscriptExpression) -> Type {
        let container = self.infer_expression(&subscript.value);
        let index = self.infer_expression(&subscript.index);
        let index_span = subscript.index.span;
        if matches!(subscript.index.kind, ExpressionKind::Slice(_)) {
            return sliced_type(&container);
        }
        if index.is_unknown() {
            return Type::Unknown;
        }

        match &container {
            // Generic aliases such as `list[int]` evaluated at runtime.
            Type::Unknown | Type::Class(_) | Type::Function(_) => Type::Unknown,
            Type::Container(ContainerKind::List, elements) => {
                if self.check_integer_index("list", &index, index_span) {
                    elements.first().cloned().unwrap_or(Type::Unknown)
                } else {
                    Type::Unknown
                }
            }
            Type::Container(ContainerKind::VariadicTuple, elements) => {
                if self.check_integer_index("tuple", &index, index_span) {
                    elements.first().cloned().unwrap_or(Type::Unknown)
                } else {
                    Type::Unknown
                }
            }
            Type::Container(ContainerKind::Tuple, elements) => {
                if !self.check_integer_index("tuple", &index, index_span) {
                    return Type::Unknown;
                }
                let position = integer_literal(&subscript.index).and_then(|value| {
                    let len = elements.len() as i64;
                    let normalized = if value < 0 { value + len } else { value };
                    (0..len).contains(&normalized).then_some(normalized as usize)
                });
                match position {
                    Some(position) => elements[position].clone(),
                    None => join_all(elements.iter()).unwrap_or(Type::Unknown),
                }
            }
            Type::Container(ContainerKind::Dict, elements) => {
                let key = elements.first().cloned().unwrap_or(Type::Unknown);
                if self.ensure_compatible(
                    &key,
                    &index,
                    DiagnosticCode::TypeMismatch,
                    "dict key",
                    index_span,
                ) {
                    elements.get(1).cloned().unwrap_or(Type::Unknown)
                } else {
                    Type::Unknown
                }
            }
            Type::Container(ContainerKind::Set, _) => {
                self.not_subscriptable("set", subscript.value.span)
            }
            Type::Primitive(Primitive::Str) => {
                if self.check_integer_index("str", &index, index_span) {
                    Type::STR
                } else {
                    Type::Unknown
                }
            }
            Type::Primitive(Primitive::Bytes) => {
                if self.check_integer_index("bytes", &index, index_span) {
                    Type::INT
                } else {
                    Type::Unknown
                }
            }
            Type::Primitive(primitive) => {
                self.not_subscriptable(primitive.name(), subscript.value.span)
            }
            Type::ClassInstance(class) => match self.instance_member(class, "__getitem__") {
                Some(Type::Function(signature)) => *signature.return_type,
                Some(_) => Type::Unknown,
                None => self.not_subscriptable(class_display_name(class), subscript.value.span),
            },
            Type::Module { .. } => self.not_subscriptable("module", subscript.value.span),
        }
    }

    fn check_integer_index(&mut self, container: &str, index: &Type, span: SourceSpan) -> bool {
        if matches!(
            index,
            Type::Unknown | Type::Primitive(Primitive::Int | Primitive::Bool) | Type::ClassInstance(_)
        ) {
            return true;
        }
        self.diagnostics.push(
            DiagnosticCode::TypeMismatch,
            span,
            format!(
                "{container} indices must be integers, not '{}'",
                index.describe()
            ),
        );
        false
    }

    fn not_subscriptable(&mut self, described: &str, span: SourceSpan) -> Type {
        self.diagnostics.push(
            DiagnosticCode::TypeMismatch,
            span,
            format!("'{described}' object is not subscriptable"),
        );
        Type::Unknown
    }

    fn iteration_type(&mut self, iterable: &Type, span: SourceSpan) -> Type {
        match iterable {
            Type::Container(ContainerKind::Tuple, elements) => {
                join_all(elements.iter()).unwrap_or(Type::Unknown)
            }
            Type::Container(_, elements) => elements.first().cloned().unwrap_or(Type::Unknown),
            Type::Primitive(Primitive::Str) => Type::STR,
            Type::Primitive(Primitive::Bytes) => Type::INT,
            Type::Primitive(primitive) => {
                self.diagnostics.push(
                    DiagnosticCode::TypeMismatch,
                    span,
                    format!("'{}' object is not iterable", primitive.name()),
                );
                Type::Unknown
            }
            _ => Type::Unknown,
        }
    }

    fn ensure_compatible(
        &mut self,
        expected: &Type,
        actual: &Type,
        code: DiagnosticCode,
        context: &str,
        span: SourceSpan,
    ) -> bool {
        if is_assignable(expected, actual, &self.classes) {
            return true;
        }
        self.diagnostics.push(
            code,
            span,
            format!(
                "{}: expected {}, found {}",
                context,
                expected.describe(),
                actual.describe()
            ),
        );
        false
    }
}

fn sliced_type(container: &Type) -> Type {
    match container {
        Type::Container(ContainerKind::List | ContainerKind::VariadicTuple, _)
        | Type::Primitive(Primitive::Str | Primitive::Bytes) => container.clone(),
        Type::Container(ContainerKind::Tuple, elements) => {
            Type::variadic_tuple(join_all(elements.iter()).unwrap_or(Type::Unknown))
        }
        _ => Type::Unknown,
    }
}

fn literal_type(literal: &Literal) -> Type {
    match literal {
        Literal::Int(_) => Type::INT,
        Literal::Float(_) => Type::FLOAT,
        Literal::Str(_) => Type::STR,
        Literal::Bytes(_) => Type::BYTES,
        Literal::Bool(_) => Type::BOOL,
        Literal::None => Type::NONE,
        Literal::Ellipsis => Type::Unknown,
    }
}

fn integer_literal(expression: &Expression) -> Option<i64> {
    match &expression.kind {
        ExpressionKind::Literal(literal) => match &literal.value {
            Literal::Int(value) => value.as_i64(),
            _ => None,
        },
        ExpressionKind::Unary(unary) if unary.operator == UnaryOperator::Negative => {
            integer_literal(&unary.operand).and_then(i64::checked_neg)
        }
        _ => None,
    }
}

fn unary_symbol(operator: UnaryOperator) -> &'static str {
    match operator {
        UnaryOperator::Positive => "+",
        UnaryOperator::Negative => "-",
        UnaryOperator::Not => "not",
        UnaryOperator::Invert => "~",
    }
}

fn callee_name(callee: &Expression) -> Option<&str> {
    match &callee.kind {
        ExpressionKind::Name(name) => Some(name.id.as_str()),
        ExpressionKind::Attribute(attribute) => Some(attribute.attr.as_str()),
        _ => None,
    }
}

fn arity_message(context: &str, arity: Arity, given: usize) -> String {
    match arity {
        Arity::Exact(count) => format!("{context} expected {count} arguments but got {given}"),
        Arity::Range { min, max } => match max {
            Some(limit) if min == limit => {
                format!("{context} expected {min} arguments but got {given}")
            }
            Some(limit) => format!(
                "{context} expected between {min} and {limit} arguments but got {given}"
            ),
            None => format!("{context} expected at least {min} arguments but got {given}"),
        },
    }
}
