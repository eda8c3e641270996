use serde::{Deserialize, Serialize};

use crate::ast::SourceSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DiagnosticCode {
    Redeclaration,
    UndefinedName,
    UnresolvedImport,
    TypeMismatch,
    ArgumentTypeMismatch,
    ArgumentCountMismatch,
    ReturnTypeMismatch,
    AttributeError,
    MissingReturn,
    MissingTypeParameters,
    UnreachableCode,
    UnusedImport,
    InternalAnalysisGap,
}

impl DiagnosticCode {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticCode::Redeclaration => "Redeclaration",
            DiagnosticCode::UndefinedName => "UndefinedName",
            DiagnosticCode::UnresolvedImport => "UnresolvedImport",
            DiagnosticCode::TypeMismatch => "TypeMismatch",
            DiagnosticCode::ArgumentTypeMismatch => "ArgumentTypeMismatch",
            DiagnosticCode::ArgumentCountMismatch => "ArgumentCountMismatch",
            DiagnosticCode::ReturnTypeMismatch => "ReturnTypeMismatch",
            DiagnosticCode::AttributeError => "AttributeError",
            DiagnosticCode::MissingReturn => "MissingReturn",
            DiagnosticCode::MissingTypeParameters => "MissingTypeParameters",
            DiagnosticCode::UnreachableCode => "UnreachableCode",
            DiagnosticCode::UnusedImport => "UnusedImport",
            DiagnosticCode::InternalAnalysisGap => "InternalAnalysisGap",
        }
    }

    /// Tie-breaker at equal positions: structural, resolution, type, flow, warnings, gaps.
    pub fn priority(self) -> u8 {
        match self {
            DiagnosticCode::Redeclaration => 0,
            DiagnosticCode::UndefinedName | DiagnosticCode::UnresolvedImport => 1,
            DiagnosticCode::TypeMismatch
            | DiagnosticCode::ArgumentTypeMismatch
            | DiagnosticCode::ArgumentCountMismatch
            | DiagnosticCode::ReturnTypeMismatch
            | DiagnosticCode::AttributeError => 2,
            DiagnosticCode::MissingReturn => 3,
            DiagnosticCode::MissingTypeParameters
            | DiagnosticCode::UnreachableCode
            | DiagnosticCode::UnusedImport => 4,
            DiagnosticCode::InternalAnalysisGap => 5,
        }
    }

    pub fn default_level(self) -> DiagnosticLevel {
        match self {
            DiagnosticCode::MissingTypeParameters
            | DiagnosticCode::UnreachableCode
            | DiagnosticCode::UnusedImport
            | DiagnosticCode::InternalAnalysisGap => DiagnosticLevel::Warning,
            _ => DiagnosticLevel::Error,
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    Error,
    Warning,
}

impl DiagnosticLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticLevel::Error => "error",
            DiagnosticLevel::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub level: DiagnosticLevel,
    pub span: SourceSpan,
    pub message: String,
}

impl Diagnostic {
    pub fn to_record(&self) -> DiagnosticRecord {
        DiagnosticRecord {
            code: self.code,
            severity: self.level,
            line: self.span.line,
            column: self.span.column,
            end_line: self.span.end_line,
            end_column: self.span.end_column,
            message: self.message.clone(),
        }
    }
}

/// Flat serialized form handed to reporters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DiagnosticRecord {
    pub code: DiagnosticCode,
    pub severity: DiagnosticLevel,
    pub line: usize,
    pub column: usize,
    pub end_line: usize,
    pub end_column: usize,
    pub message: String,
}

#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends a diagnostic at the code's default severity.
    pub fn push<S: Into<String>>(&mut self, code: DiagnosticCode, span: SourceSpan, message: S) {
        self.entries.push(Diagnostic {
            code,
            level: code.default_level(),
            span,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<Diagnostic> {
        self.entries
    }
}
