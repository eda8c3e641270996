//! Hierarchical symbol environment.
//!
//! Scopes live in an arena owned by [`ScopeTree`]; children refer to their parent
//! by [`ScopeId`]. Symbols are append-only: redeclaring a name pushes a new
//! version and the name's entry points at the newest one.

use std::collections::HashMap;

use thiserror::Error;

use crate::ast::SourceSpan;
use crate::types::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(u32);

impl ScopeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId {
    scope: ScopeId,
    version: u32,
}

impl SymbolId {
    pub fn scope(self) -> ScopeId {
        self.scope
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Builtins,
    Module,
    Class,
    Function,
    Lambda,
    Comprehension,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Variable,
    Function,
    Class,
    Parameter,
    Import,
}

impl SymbolKind {
    pub fn describe(self) -> &'static str {
        match self {
            SymbolKind::Variable => "variable",
            SymbolKind::Function => "function",
            SymbolKind::Class => "class",
            SymbolKind::Parameter => "parameter",
            SymbolKind::Import => "import",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub ty: Type,
    pub span: SourceSpan,
    /// The type came from an explicit annotation rather than being left for inference.
    pub declared: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("duplicate parameter '{name}' (first declared at line {}, column {})", first.line, first.column)]
pub struct RedeclarationError {
    pub name: String,
    pub first: SourceSpan,
}

#[derive(Debug, Clone)]
pub struct Scope {
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    pub name: Option<String>,
    versions: Vec<Symbol>,
    names: HashMap<String, u32>,
    redirects: HashMap<String, ScopeId>,
    opaque: bool,
}

impl Scope {
    fn new(kind: ScopeKind, parent: Option<ScopeId>, name: Option<String>) -> Self {
        Self {
            kind,
            parent,
            name,
            versions: Vec::new(),
            names: HashMap::new(),
            redirects: HashMap::new(),
            opaque: false,
        }
    }

    /// Every symbol version in declaration order.
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.versions.iter()
    }

    pub fn is_opaque(&self) -> bool {
        self.opaque
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl ScopeTree {
    pub fn new() -> Self {
        Self { scopes: Vec::new() }
    }

    pub fn open_scope(
        &mut self,
        kind: ScopeKind,
        parent: Option<ScopeId>,
        name: Option<String>,
    ) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(kind, parent, name));
        id
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub fn scopes(&self) -> impl Iterator<Item = (ScopeId, &Scope)> {
        self.scopes
            .iter()
            .enumerate()
            .map(|(index, scope)| (ScopeId(index as u32), scope))
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.scope(id.scope).versions[id.version as usize]
    }

    /// Declares `name` in `scope`. Rebinding a name is allowed and the newest
    /// declaration wins; only a repeated parameter is refused.
    pub fn declare(
        &mut self,
        scope: ScopeId,
        name: &str,
        kind: SymbolKind,
        ty: Type,
        span: SourceSpan,
    ) -> Result<SymbolId, RedeclarationError> {
        let target = self.scope(scope).redirects.get(name).copied().unwrap_or(scope);
        let entry = &mut self.scopes[target.index()];

        if kind == SymbolKind::Parameter {
            if let Some(&existing) = entry.names.get(name) {
                let previous = &entry.versions[existing as usize];
                if previous.kind == SymbolKind::Parameter {
                    return Err(RedeclarationError {
                        name: name.to_string(),
                        first: previous.span,
                    });
                }
            }
        }

        let declared = kind == SymbolKind::Parameter && !ty.is_unknown();
        let version = entry.versions.len() as u32;
        entry.versions.push(Symbol {
            name: name.to_string(),
            kind,
            ty,
            span,
            declared,
        });
        entry.names.insert(name.to_string(), version);
        Ok(SymbolId {
            scope: target,
            version,
        })
    }

    /// Marks the newest version of `id`'s name as carrying an explicit annotation.
    pub(crate) fn mark_declared(&mut self, id: SymbolId) {
        self.scopes[id.scope.index()].versions[id.version as usize].declared = true;
    }

    /// Routes later declarations and lookups of `name` in `scope` to `target`
    /// (`global` and `nonlocal`).
    pub fn redirect(&mut self, scope: ScopeId, name: &str, target: ScopeId) {
        self.scopes[scope.index()]
            .redirects
            .insert(name.to_string(), target);
    }

    pub fn mark_opaque(&mut self, scope: ScopeId) {
        self.scopes[scope.index()].opaque = true;
    }

    pub fn lookup_local(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        self.scope(scope)
            .names
            .get(name)
            .map(|&version| SymbolId { scope, version })
    }

    /// Walks outward from `scope`. Class bodies are only visible from the class
    /// scope itself, never from functions nested in it.
    pub fn resolve(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let entry = self.scope(id);
            if let Some(&target) = entry.redirects.get(name) {
                return self.lookup_local(target, name);
            }
            let visible = id == scope || entry.kind != ScopeKind::Class;
            if visible {
                if let Some(symbol) = self.lookup_local(id, name) {
                    return Some(symbol);
                }
            }
            current = entry.parent;
        }
        None
    }

    pub fn resolve_symbol(&self, scope: ScopeId, name: &str) -> Option<&Symbol> {
        self.resolve(scope, name).map(|id| self.symbol(id))
    }

    /// Whether an unresolved name in `scope` may have come from an unresolvable wildcard import.
    pub fn is_opaque(&self, scope: ScopeId) -> bool {
        let mut current = Some(scope);
        while let Some(id) = current {
            let entry = self.scope(id);
            if entry.opaque {
                return true;
            }
            current = entry.parent;
        }
        false
    }

    pub fn enclosing(&self, scope: ScopeId, kind: ScopeKind) -> Option<ScopeId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if self.scope(id).kind == kind {
                return Some(id);
            }
            current = self.scope(id).parent;
        }
        None
    }
}
