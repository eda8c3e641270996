use std::collections::{HashMap, HashSet};

use tracing::trace;

use crate::ast::{
    ClassDef, ComprehensionExpression, Expression, ExpressionKind, FunctionDef,
    ImportFromStatement, ImportStatement, LambdaExpression, Module, NameListStatement, Parameter,
    ParameterKind, SourceSpan, Statement, StatementKind, TypeAnnotation,
};
use crate::builtins::{self, stubs};
use crate::diagnostics::{DiagnosticCode, Diagnostics};
use crate::modules::ModuleResolver;
use crate::options::AnalyzerOptions;
use crate::scope::{ScopeId, ScopeKind, ScopeTree, SymbolId, SymbolKind};
use crate::types::{resolve_annotation, FunctionType, ParamType, ResolvedAnnotation, Type};

/// The scope tree plus the side tables that tie syntax nodes to it.
#[derive(Debug, Clone)]
pub struct BoundModule {
    pub scopes: ScopeTree,
    pub builtins_scope: ScopeId,
    pub module_scope: ScopeId,
    /// Scope opened by each def, class and lambda, keyed by the node's span.
    pub definition_scopes: HashMap<SourceSpan, ScopeId>,
    /// Symbol version created at each binding site.
    pub declarations: HashMap<SourceSpan, SymbolId>,
    /// Symbol each name expression resolved to.
    pub references: HashMap<SourceSpan, SymbolId>,
    pub annotations: HashMap<SourceSpan, ResolvedAnnotation>,
    /// Key of the class declared at each class name span. Keys follow
    /// `__qualname__` (`outer.<locals>.Node`) and are unique per module.
    pub class_keys: HashMap<SourceSpan, String>,
}

impl BoundModule {
    pub fn reference(&self, span: &SourceSpan) -> Option<SymbolId> {
        self.references.get(span).copied()
    }

    pub fn declaration(&self, span: &SourceSpan) -> Option<SymbolId> {
        self.declarations.get(span).copied()
    }

    pub fn scope_of(&self, span: &SourceSpan) -> Option<ScopeId> {
        self.definition_scopes.get(span).copied()
    }

    pub fn class_key(&self, name_span: &SourceSpan) -> Option<&str> {
        self.class_keys.get(name_span).map(String::as_str)
    }

    pub fn annotation_type(&self, annotation: &TypeAnnotation) -> Type {
        self.annotations
            .get(&annotation.span)
            .map(|resolved| resolved.ty.clone())
            .unwrap_or(Type::Unknown)
    }
}

pub struct BindingOutput {
    pub module: BoundModule,
    pub diagnostics: Diagnostics,
}

struct ImportBinding {
    scope: ScopeId,
    name: String,
    span: SourceSpan,
}

pub struct Binder<'a> {
    resolver: &'a dyn ModuleResolver,
    report_unused_imports: bool,
    scopes: ScopeTree,
    builtins_scope: ScopeId,
    diagnostics: Diagnostics,
    definition_scopes: HashMap<SourceSpan, ScopeId>,
    declarations: HashMap<SourceSpan, SymbolId>,
    references: HashMap<SourceSpan, SymbolId>,
    annotations: HashMap<SourceSpan, ResolvedAnnotation>,
    class_keys: HashMap<SourceSpan, String>,
    taken_class_keys: HashSet<String>,
    imports: Vec<ImportBinding>,
    used: HashSet<(ScopeId, String)>,
}

impl<'a> Binder<'a> {
    pub fn new(resolver: &'a dyn ModuleResolver, options: &AnalyzerOptions) -> Self {
        let mut scopes = ScopeTree::new();
        let builtins_scope = scopes.open_scope(ScopeKind::Builtins, None, None);
        for (name, kind, ty) in builtins::builtin_symbols() {
            // Builtin names are unique, so this never hits the parameter check.
            let _ = scopes.declare(builtins_scope, name, kind, ty, SourceSpan::default());
        }

        Self {
            resolver,
            report_unused_imports: options.report_unused_imports,
            scopes,
            builtins_scope,
            diagnostics: Diagnostics::new(),
            definition_scopes: HashMap::new(),
            declarations: HashMap::new(),
            references: HashMap::new(),
            annotations: HashMap::new(),
            class_keys: HashMap::new(),
            taken_class_keys: HashSet::new(),
            imports: Vec::new(),
            used: HashSet::new(),
        }
    }

    pub fn bind_module(mut self, module: &Module) -> BindingOutput {
        let module_scope =
            self.scopes
                .open_scope(ScopeKind::Module, Some(self.builtins_scope), None);
        self.bind_body(&module.body, module_scope);

        if self.report_unused_imports {
            self.report_unused_imports();
        }

        trace!(
            scopes = self.scopes.scopes().count(),
            references = self.references.len(),
            "binding finished"
        );

        BindingOutput {
            module: BoundModule {
                scopes: self.scopes,
                builtins_scope: self.builtins_scope,
                module_scope,
                definition_scopes: self.definition_scopes,
                declarations: self.declarations,
                references: self.references,
                annotations: self.annotations,
                class_keys: self.class_keys,
            },
            diagnostics: self.diagnostics,
        }
    }

    /// Binds one scope body: directives first, then every name the body binds,
    /// then references in statement order.
    ///
    /// Hoisting applies to module bodies too, so `print(x)` followed by
    /// `x = 1` resolves `x` without a diagnostic. Symbols are scope-level,
    /// not flow-sensitive, and use-before-definition is not reported.
    fn bind_body(&mut self, body: &[Statement], scope: ScopeId) {
        self.apply_directives(body, scope);
        self.hoist_classes(body, scope);
        self.hoist_statements(body, scope);
        self.resolve_statements(body, scope);
    }

    fn apply_directives(&mut self, body: &[Statement], scope: ScopeId) {
        for statement in body {
            match &statement.kind {
                StatementKind::Global(names) => self.apply_global(names, scope),
                StatementKind::Nonlocal(names) => self.apply_nonlocal(names, scope),
                _ => for_each_block(statement, |block| self.apply_directives(block, scope)),
            }
        }
    }

    fn apply_global(&mut self, names: &NameListStatement, scope: ScopeId) {
        let Some(module_scope) = self.scopes.enclosing(scope, ScopeKind::Module) else {
            return;
        };
        if module_scope == scope {
            return;
        }
        for identifier in &names.names {
            self.scopes.redirect(scope, &identifier.name, module_scope);
        }
    }

    fn apply_nonlocal(&mut self, names: &NameListStatement, scope: ScopeId) {
        for identifier in &names.names {
            let mut current = self.scopes.scope(scope).parent;
            let mut target = None;
            while let Some(id) = current {
                let entry = self.scopes.scope(id);
                if matches!(entry.kind, ScopeKind::Module | ScopeKind::Builtins) {
                    break;
                }
                if matches!(entry.kind, ScopeKind::Function | ScopeKind::Lambda)
                    && self.scopes.lookup_local(id, &identifier.name).is_some()
                {
                    target = Some(id);
                    break;
                }
                current = entry.parent;
            }

            match target {
                Some(target) => self.scopes.redirect(scope, &identifier.name, target),
                None => self.diagnostics.push(
                    DiagnosticCode::UndefinedName,
                    identifier.span,
                    format!("no binding for nonlocal '{}' found", identifier.name),
                ),
            }
        }
    }

    fn hoist_classes(&mut self, body: &[Statement], scope: ScopeId) {
        for statement in body {
            if let StatementKind::ClassDef(class) = &statement.kind {
                let key = self.class_key(class, scope);
                self.declare(
                    scope,
                    &class.name,
                    SymbolKind::Class,
                    Type::Class(key),
                    class.name_span,
                );
            } else {
                for_each_block(statement, |block| self.hoist_classes(block, scope));
            }
        }
    }

    /// Assigns the class its key. A second class with the same qualified name
    /// is told apart by its position.
    fn class_key(&mut self, class: &ClassDef, scope: ScopeId) -> String {
        let qualified = self.qualified_name(scope, &class.name);
        let key = if self.taken_class_keys.contains(&qualified) {
            let at = class.name_span;
            format!("{qualified}@{}:{}", at.line, at.column)
        } else {
            qualified
        };
        self.taken_class_keys.insert(key.clone());
        self.class_keys.insert(class.name_span, key.clone());
        key
    }

    fn qualified_name(&self, scope: ScopeId, name: &str) -> String {
        let entry = self.scopes.scope(scope);
        match (entry.kind, entry.name.as_deref(), entry.parent) {
            // Class scopes are named by their key, which is already qualified.
            (ScopeKind::Class, Some(class), _) => format!("{class}.{name}"),
            (ScopeKind::Function, Some(function), Some(parent)) => {
                format!("{}.<locals>.{name}", self.qualified_name(parent, function))
            }
            _ => name.to_string(),
        }
    }

    fn hoist_statements(&mut self, body: &[Statement], scope: ScopeId) {
        for statement in body {
            self.hoist_statement(statement, scope);
        }
    }

    fn hoist_statement(&mut self, statement: &Statement, scope: ScopeId) {
        match &statement.kind {
            StatementKind::Import(import) => self.bind_import(import, scope),
            StatementKind::ImportFrom(import) => self.bind_import_from(import, scope),
            StatementKind::FunctionDef(function) => {
                let signature = self.function_signature(function, scope);
                self.declare(
                    scope,
                    &function.name,
                    SymbolKind::Function,
                    Type::Function(signature),
                    function.name_span,
                );
            }
            StatementKind::Assign(assign) => {
                for target in &assign.targets {
                    self.bind_target(target, scope);
                }
            }
            StatementKind::AnnAssign(assign) => {
                if let ExpressionKind::Name(name) = &assign.target.kind {
                    let ty = self.annotation(&assign.annotation, scope);
                    if let Some(id) = self.declare(
                        scope,
                        &name.id,
                        SymbolKind::Variable,
                        ty,
                        assign.target.span,
                    ) {
                        self.scopes.mark_declared(id);
                    }
                }
            }
            StatementKind::For(for_stmt) => {
                self.bind_target(&for_stmt.target, scope);
                self.hoist_statements(&for_stmt.body, scope);
                self.hoist_statements(&for_stmt.orelse, scope);
            }
            StatementKind::With(with_stmt) => {
                for item in &with_stmt.items {
                    if let Some(target) = &item.target {
                        self.bind_target(target, scope);
                    }
                }
                self.hoist_statements(&with_stmt.body, scope);
            }
            StatementKind::Try(try_stmt) => {
                self.hoist_statements(&try_stmt.body, scope);
                for handler in &try_stmt.handlers {
                    if let Some(name) = &handler.name {
                        self.declare(
                            scope,
                            &name.name,
                            SymbolKind::Variable,
                            Type::Unknown,
                            name.span,
                        );
                    }
                    self.hoist_statements(&handler.body, scope);
                }
                self.hoist_statements(&try_stmt.orelse, scope);
                self.hoist_statements(&try_stmt.finalbody, scope);
            }
            StatementKind::If(_) | StatementKind::While(_) => {
                for_each_block(statement, |block| self.hoist_statements(block, scope));
            }
            _ => {}
        }
    }

    fn bind_target(&mut self, target: &Expression, scope: ScopeId) {
        match &target.kind {
            ExpressionKind::Name(name) => {
                self.declare(scope, &name.id, SymbolKind::Variable, Type::Unknown, target.span);
            }
            ExpressionKind::Tuple(sequence) | ExpressionKind::List(sequence) => {
                for element in &sequence.elements {
                    self.bind_target(element, scope);
                }
            }
            ExpressionKind::Starred(starred) => self.bind_target(&starred.value, scope),
            _ => {}
        }
    }

    fn bind_import(&mut self, import: &ImportStatement, scope: ScopeId) {
        for alias in &import.names {
            let descriptor = self.resolver.resolve(&alias.name);
            let resolved = descriptor.is_some() || stubs::is_future_module(&alias.name);
            if !resolved {
                self.diagnostics.push(
                    DiagnosticCode::UnresolvedImport,
                    alias.span,
                    format!("unresolved import '{}'", alias.name),
                );
            }

            let (bound_name, ty) = match &alias.asname {
                Some(asname) => {
                    let ty = if resolved {
                        Type::Module {
                            name: alias.name.clone(),
                            resolved: true,
                        }
                    } else {
                        Type::Unknown
                    };
                    (asname.clone(), ty)
                }
                None => {
                    // `import a.b.c` binds `a`.
                    let root = alias.name.split('.').next().unwrap_or(&alias.name).to_string();
                    let ty = if !resolved {
                        Type::Unknown
                    } else {
                        let root_indexed = root == alias.name || self.resolver.resolve(&root).is_some();
                        Type::Module {
                            name: root.clone(),
                            resolved: root_indexed,
                        }
                    };
                    (root, ty)
                }
            };

            self.declare_import(scope, &bound_name, ty, alias.span);
        }
    }

    fn bind_import_from(&mut self, import: &ImportFromStatement, scope: ScopeId) {
        let module_name = format!("{}{}", ".".repeat(import.level), import.module);

        if stubs::is_future_module(&module_name) {
            for alias in &import.names {
                let name = alias.asname.as_deref().unwrap_or(&alias.name);
                self.declare(scope, name, SymbolKind::Import, Type::Unknown, alias.span);
            }
            return;
        }

        let Some(descriptor) = self.resolver.resolve(&module_name) else {
            self.diagnostics.push(
                DiagnosticCode::UnresolvedImport,
                import.module_span,
                format!("unresolved import '{module_name}'"),
            );
            for alias in &import.names {
                if alias.is_wildcard() {
                    self.scopes.mark_opaque(scope);
                } else {
                    let name = alias.asname.as_deref().unwrap_or(&alias.name);
                    self.declare_import(scope, name, Type::Unknown, alias.span);
                }
            }
            return;
        };

        for alias in &import.names {
            if alias.is_wildcard() {
                for (name, ty) in &descriptor.exports {
                    if !name.starts_with('_') {
                        let _ = self
                            .scopes
                            .declare(scope, name, SymbolKind::Import, ty.clone(), alias.span);
                    }
                }
                continue;
            }

            let submodule = format!("{module_name}.{}", alias.name);
            let ty = match descriptor.export(&alias.name) {
                Some(ty) => ty.clone(),
                None if self.resolver.resolve(&submodule).is_some() => Type::Module {
                    name: submodule,
                    resolved: true,
                },
                None => {
                    self.diagnostics.push(
                        DiagnosticCode::UnresolvedImport,
                        alias.span,
                        format!("module '{module_name}' has no export '{}'", alias.name),
                    );
                    Type::Unknown
                }
            };
            let name = alias.asname.as_deref().unwrap_or(&alias.name);
            self.declare_import(scope, name, ty, alias.span);
        }
    }

    fn declare_import(&mut self, scope: ScopeId, name: &str, ty: Type, span: SourceSpan) {
        if let Some(id) = self.declare(scope, name, SymbolKind::Import, ty, span) {
            self.imports.push(ImportBinding {
                scope: id.scope(),
                name: name.to_string(),
                span,
            });
        }
    }

    fn declare(
        &mut self,
        scope: ScopeId,
        name: &str,
        kind: SymbolKind,
        ty: Type,
        span: SourceSpan,
    ) -> Option<SymbolId> {
        match self.scopes.declare(scope, name, kind, ty, span) {
            Ok(id) => {
                self.declarations.insert(span, id);
                Some(id)
            }
            Err(error) => {
                self.diagnostics
                    .push(DiagnosticCode::Redeclaration, span, error.to_string());
                None
            }
        }
    }

    fn resolve_statements(&mut self, statements: &[Statement], scope: ScopeId) {
        for statement in statements {
            self.resolve_statement(statement, scope);
        }
    }

    fn resolve_statement(&mut self, statement: &Statement, scope: ScopeId) {
        match &statement.kind {
            StatementKind::Import(_)
            | StatementKind::ImportFrom(_)
            | StatementKind::Global(_)
            | StatementKind::Nonlocal(_)
            | StatementKind::Pass
            | StatementKind::Break
            | StatementKind::Continue => {}
            StatementKind::FunctionDef(function) => {
                self.resolve_function(function, statement.span, scope)
            }
            StatementKind::ClassDef(class) => self.resolve_class(class, statement.span, scope),
            StatementKind::Assign(assign) => {
                self.resolve_expression(&assign.value, scope);
                for target in &assign.targets {
                    self.resolve_target(target, scope);
                }
            }
            StatementKind::AnnAssign(assign) => {
                self.annotation(&assign.annotation, scope);
                self.resolve_annotation_names(&assign.annotation, scope);
                if let Some(value) = &assign.value {
                    self.resolve_expression(value, scope);
                }
                self.resolve_target(&assign.target, scope);
            }
            StatementKind::AugAssign(assign) => {
                self.resolve_expression(&assign.value, scope);
                self.resolve_expression(&assign.target, scope);
            }
            StatementKind::Return(ret) => {
                if let Some(value) = &ret.value {
                    self.resolve_expression(value, scope);
                }
            }
            StatementKind::If(if_stmt) => {
                self.resolve_expression(&if_stmt.condition, scope);
                self.resolve_statements(&if_stmt.body, scope);
                self.resolve_statements(&if_stmt.orelse, scope);
            }
            StatementKind::While(while_stmt) => {
                self.resolve_expression(&while_stmt.condition, scope);
                self.resolve_statements(&while_stmt.body, scope);
                self.resolve_statements(&while_stmt.orelse, scope);
            }
            StatementKind::For(for_stmt) => {
                self.resolve_expression(&for_stmt.iter, scope);
                self.resolve_target(&for_stmt.target, scope);
                self.resolve_statements(&for_stmt.body, scope);
                self.resolve_statements(&for_stmt.orelse, scope);
            }
            StatementKind::Try(try_stmt) => {
                self.resolve_statements(&try_stmt.body, scope);
                for handler in &try_stmt.handlers {
                    if let Some(exception) = &handler.exception {
                        self.resolve_expression(exception, scope);
                    }
                    self.resolve_statements(&handler.body, scope);
                }
                self.resolve_statements(&try_stmt.orelse, scope);
                self.resolve_statements(&try_stmt.finalbody, scope);
            }
            StatementKind::With(with_stmt) => {
                for item in &with_stmt.items {
                    self.resolve_expression(&item.context, scope);
                    if let Some(target) = &item.target {
                        self.resolve_target(target, scope);
                    }
                }
                self.resolve_statements(&with_stmt.body, scope);
            }
            StatementKind::Raise(raise) => {
                if let Some(exception) = &raise.exception {
                    self.resolve_expression(exception, scope);
                }
                if let Some(cause) = &raise.cause {
                    self.resolve_expression(cause, scope);
                }
            }
            StatementKind::Expression(expression) => {
                self.resolve_expression(&expression.expression, scope)
            }
            StatementKind::Assert(assert) => {
                self.resolve_expression(&assert.test, scope);
                if let Some(message) = &assert.message {
                    self.resolve_expression(message, scope);
                }
            }
            StatementKind::Delete(delete) => {
                for target in &delete.targets {
                    self.resolve_expression(target, scope);
                }
            }
            StatementKind::Unsupported(node) => self.report_gap(&node.node, statement.span),
        }
    }

    fn resolve_function(&mut self, function: &FunctionDef, span: SourceSpan, scope: ScopeId) {
        for decorator in &function.decorators {
            self.resolve_expression(decorator, scope);
        }
        for parameter in &function.parameters {
            if let Some(annotation) = &parameter.annotation {
                self.resolve_annotation_names(annotation, scope);
            }
            if let Some(default) = &parameter.default {
                self.resolve_expression(default, scope);
            }
        }
        if let Some(returns) = &function.returns {
            self.resolve_annotation_names(returns, scope);
        }

        let function_scope =
            self.scopes
                .open_scope(ScopeKind::Function, Some(scope), Some(function.name.clone()));
        self.definition_scopes.insert(span, function_scope);

        let signature = self.function_signature(function, scope);
        for (parameter, ty) in function
            .parameters
            .iter()
            .zip(parameter_types(&function.parameters, &signature))
        {
            self.declare(
                function_scope,
                &parameter.name,
                SymbolKind::Parameter,
                ty,
                parameter.span,
            );
        }

        self.bind_body(&function.body, function_scope);
    }

    fn resolve_class(&mut self, class: &ClassDef, span: SourceSpan, scope: ScopeId) {
        for decorator in &class.decorators {
            self.resolve_expression(decorator, scope);
        }
        for base in &class.bases {
            self.resolve_expression(base, scope);
        }

        let key = self
            .class_keys
            .get(&class.name_span)
            .cloned()
            .unwrap_or_else(|| class.name.clone());
        let class_scope = self
            .scopes
            .open_scope(ScopeKind::Class, Some(scope), Some(key));
        self.definition_scopes.insert(span, class_scope);
        self.bind_body(&class.body, class_scope);
    }

    fn resolve_lambda(&mut self, lambda: &LambdaExpression, span: SourceSpan, scope: ScopeId) {
        for parameter in &lambda.parameters {
            if let Some(default) = &parameter.default {
                self.resolve_expression(default, scope);
            }
        }
        let lambda_scope = self.scopes.open_scope(ScopeKind::Lambda, Some(scope), None);
        self.definition_scopes.insert(span, lambda_scope);
        for parameter in &lambda.parameters {
            self.declare(
                lambda_scope,
                &parameter.name,
                SymbolKind::Parameter,
                Type::Unknown,
                parameter.span,
            );
        }
        self.resolve_expression(&lambda.body, lambda_scope);
    }

    /// Resolves the reference parts of an assignment target; plain names were bound while hoisting.
    fn resolve_target(&mut self, target: &Expression, scope: ScopeId) {
        match &target.kind {
            ExpressionKind::Name(_) => {}
            ExpressionKind::Tuple(sequence) | ExpressionKind::List(sequence) => {
                for element in &sequence.elements {
                    self.resolve_target(element, scope);
                }
            }
            ExpressionKind::Starred(starred) => self.resolve_target(&starred.value, scope),
            _ => self.resolve_expression(target, scope),
        }
    }

    fn resolve_expression(&mut self, expression: &Expression, scope: ScopeId) {
        match &expression.kind {
            ExpressionKind::Name(name) => self.resolve_name(&name.id, expression.span, scope),
            ExpressionKind::Literal(_) => {}
            ExpressionKind::FString(fstring) => {
                for value in &fstring.values {
                    self.resolve_expression(value, scope);
                }
            }
            ExpressionKind::List(sequence)
            | ExpressionKind::Tuple(sequence)
            | ExpressionKind::Set(sequence) => {
                for element in &sequence.elements {
                    self.resolve_expression(element, scope);
                }
            }
            ExpressionKind::Dict(dict) => {
                for entry in &dict.entries {
                    if let Some(key) = &entry.key {
                        self.resolve_expression(key, scope);
                    }
                    self.resolve_expression(&entry.value, scope);
                }
            }
            ExpressionKind::Binary(binary) => {
                self.resolve_expression(&binary.left, scope);
                self.resolve_expression(&binary.right, scope);
            }
            ExpressionKind::Unary(unary) => self.resolve_expression(&unary.operand, scope),
            ExpressionKind::Call(call) => {
                self.resolve_expression(&call.callee, scope);
                for argument in &call.arguments {
                    self.resolve_expression(&argument.value, scope);
                }
            }
            ExpressionKind::Attribute(attribute) => {
                self.resolve_expression(&attribute.value, scope)
            }
            ExpressionKind::Subscript(subscript) => {
                self.resolve_expression(&subscript.value, scope);
                self.resolve_expression(&subscript.index, scope);
            }
            ExpressionKind::Lambda(lambda) => self.resolve_lambda(lambda, expression.span, scope),
            ExpressionKind::Conditional(conditional) => {
                self.resolve_expression(&conditional.condition, scope);
                self.resolve_expression(&conditional.body, scope);
                self.resolve_expression(&conditional.orelse, scope);
            }
            ExpressionKind::ListComp(comprehension)
            | ExpressionKind::SetComp(comprehension)
            | ExpressionKind::DictComp(comprehension)
            | ExpressionKind::Generator(comprehension) => {
                self.resolve_comprehension(comprehension, expression.span, scope)
            }
            ExpressionKind::Slice(slice) => {
                for bound in slice.bounds() {
                    self.resolve_expression(bound, scope);
                }
            }
            ExpressionKind::Starred(operand)
            | ExpressionKind::Await(operand)
            | ExpressionKind::YieldFrom(operand) => self.resolve_expression(&operand.value, scope),
            ExpressionKind::Yield(yield_expr) => {
                if let Some(value) = &yield_expr.value {
                    self.resolve_expression(value, scope);
                }
            }
            ExpressionKind::Unsupported(node) => self.report_gap(&node.node, expression.span),
        }
    }

    /// The first iterable is evaluated in the enclosing scope; targets,
    /// conditions and the element live in the comprehension's own scope.
    fn resolve_comprehension(
        &mut self,
        comprehension: &ComprehensionExpression,
        span: SourceSpan,
        scope: ScopeId,
    ) {
        if let Some(first) = comprehension.generators.first() {
            self.resolve_expression(&first.iter, scope);
        }
        let inner = self
            .scopes
            .open_scope(ScopeKind::Comprehension, Some(scope), None);
        self.definition_scopes.insert(span, inner);

        for (index, generator) in comprehension.generators.iter().enumerate() {
            if index > 0 {
                self.resolve_expression(&generator.iter, inner);
            }
            self.bind_target(&generator.target, inner);
            self.resolve_target(&generator.target, inner);
            for condition in &generator.ifs {
                self.resolve_expression(condition, inner);
            }
        }
        self.resolve_expression(&comprehension.element, inner);
        if let Some(value) = &comprehension.value {
            self.resolve_expression(value, inner);
        }
    }

    fn resolve_name(&mut self, name: &str, span: SourceSpan, scope: ScopeId) {
        if let Some(id) = self.scopes.resolve(scope, name) {
            self.references.insert(span, id);
            self.used.insert((id.scope(), name.to_string()));
            return;
        }
        if self.scopes.is_opaque(scope) {
            return;
        }
        self.diagnostics.push(
            DiagnosticCode::UndefinedName,
            span,
            format!("use of undefined name '{name}'"),
        );
    }

    /// Checks that the names an annotation mentions exist. Quoted forward
    /// references are left alone.
    fn resolve_annotation_names(&mut self, annotation: &TypeAnnotation, scope: ScopeId) {
        let quoted = annotation.name.starts_with('"') || annotation.name.starts_with('\'');
        let root = annotation.root_name();
        if quoted || root == "None" || root == "..." {
            return;
        }
        self.resolve_name(root, annotation.span, scope);
        // `Literal[...]` arguments are values, not types.
        if annotation.leaf_name() != "Literal" {
            for argument in &annotation.arguments {
                self.resolve_annotation_names(argument, scope);
            }
        }
    }

    fn annotation(&mut self, annotation: &TypeAnnotation, scope: ScopeId) -> Type {
        if let Some(resolved) = self.annotations.get(&annotation.span) {
            return resolved.ty.clone();
        }
        let scopes = &self.scopes;
        let lookup = |name: &str| class_named(scopes, scope, name);
        let resolved = resolve_annotation(annotation, &lookup);
        let ty = resolved.ty.clone();
        self.annotations.insert(annotation.span, resolved);
        ty
    }

    fn function_signature(&mut self, function: &FunctionDef, scope: ScopeId) -> FunctionType {
        let class_name = match self.scopes.scope(scope).kind {
            ScopeKind::Class => self.scopes.scope(scope).name.clone(),
            _ => None,
        };
        let is_static = function.has_decorator("staticmethod");
        let is_classmethod = function.has_decorator("classmethod");

        let mut params = Vec::new();
        let mut variadic = false;
        let mut keywords = false;
        for (index, parameter) in function.parameters.iter().enumerate() {
            let ty = match &parameter.annotation {
                Some(annotation) => self.annotation(annotation, scope),
                None => match (&class_name, index) {
                    (Some(class), 0) if !is_static && parameter.kind == ParameterKind::Regular => {
                        if is_classmethod {
                            Type::Class(class.clone())
                        } else {
                            Type::ClassInstance(class.clone())
                        }
                    }
                    _ => Type::Unknown,
                },
            };
            match parameter.kind {
                ParameterKind::Regular | ParameterKind::KeywordOnly => params.push(ParamType {
                    name: parameter.name.clone(),
                    ty,
                    positional: parameter.kind == ParameterKind::Regular,
                    required: parameter.default.is_none(),
                }),
                ParameterKind::VarPositional => variadic = true,
                ParameterKind::VarKeyword => keywords = true,
            }
        }

        let return_type = match &function.returns {
            Some(annotation) => self.annotation(annotation, scope),
            None => Type::Unknown,
        };

        let mut signature = FunctionType::new(params, return_type);
        signature.variadic = variadic;
        signature.keywords = keywords;
        signature
    }

    fn report_gap(&mut self, node: &str, span: SourceSpan) {
        self.diagnostics.push(
            DiagnosticCode::InternalAnalysisGap,
            span,
            format!("unsupported syntax node '{node}' skipped"),
        );
    }

    fn report_unused_imports(&mut self) {
        for import in &self.imports {
            if !self.used.contains(&(import.scope, import.name.clone())) {
                self.diagnostics.push(
                    DiagnosticCode::UnusedImport,
                    import.span,
                    format!("unused import '{}'", import.name),
                );
            }
        }
    }
}

/// Types for each parameter as bound inside the function body.
fn parameter_types(parameters: &[Parameter], signature: &FunctionType) -> Vec<Type> {
    let mut declared = signature.params.iter();
    parameters
        .iter()
        .map(|parameter| match parameter.kind {
            ParameterKind::Regular | ParameterKind::KeywordOnly => declared
                .next()
                .map(|param| param.ty.clone())
                .unwrap_or(Type::Unknown),
            ParameterKind::VarPositional => Type::variadic_tuple(Type::Unknown),
            ParameterKind::VarKeyword => Type::dict(Type::STR, Type::Unknown),
        })
        .collect()
}

/// The class a name denotes when used as an annotation, if any.
pub(crate) fn class_named(scopes: &ScopeTree, scope: ScopeId, name: &str) -> Option<String> {
    if name == "object" || name.contains('.') {
        return None;
    }
    match &scopes.resolve_symbol(scope, name)?.ty {
        Type::Class(class) => Some(class.clone()),
        _ => None,
    }
}

/// Calls `visit` with every nested statement block that shares the statement's scope.
pub(crate) fn for_each_block(statement: &Statement, mut visit: impl FnMut(&[Statement])) {
    match &statement.kind {
        StatementKind::If(if_stmt) => {
            visit(&if_stmt.body);
            visit(&if_stmt.orelse);
        }
        StatementKind::While(while_stmt) => {
            visit(&while_stmt.body);
            visit(&while_stmt.orelse);
        }
        StatementKind::For(for_stmt) => {
            visit(&for_stmt.body);
            visit(&for_stmt.orelse);
        }
        StatementKind::Try(try_stmt) => {
            visit(&try_stmt.body);
            for handler in &try_stmt.handlers {
                visit(&handler.body);
            }
            visit(&try_stmt.orelse);
            visit(&try_stmt.finalbody);
        }
        StatementKind::With(with_stmt) => visit(&with_stmt.body),
        _ => {}
    }
}
