use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ast::{Module, SourceSpan};
use crate::error::AnalysisError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(pub u32);

/// The on-disk form of a parsed file handed over by a front end.
#[derive(Debug, Serialize, Deserialize)]
struct TreeDocument {
    #[serde(default)]
    path: Option<PathBuf>,
    #[serde(default)]
    source: Option<String>,
    module: Module,
}

#[derive(Debug, Clone)]
pub struct SourceFile {
    pub id: SourceId,
    pub path: PathBuf,
    /// Original program text, when the front end embedded it.
    pub contents: Option<String>,
    pub module: Module,
}

impl SourceFile {
    pub fn new(id: SourceId, path: PathBuf, module: Module) -> Self {
        Self {
            id,
            path,
            contents: None,
            module,
        }
    }

    pub fn with_contents(mut self, contents: impl Into<String>) -> Self {
        self.contents = Some(contents.into());
        self
    }

    /// Decodes a tree document. A `path` recorded in the document wins over
    /// the path the document was read from.
    pub fn from_json_str(id: SourceId, path: &Path, json: &str) -> Result<Self, AnalysisError> {
        let document: TreeDocument =
            serde_json::from_str(json).map_err(|source| AnalysisError::Decode {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            id,
            path: document.path.unwrap_or_else(|| path.to_path_buf()),
            contents: document.source,
            module: document.module,
        })
    }

    pub fn load(id: SourceId, path: &Path) -> Result<Self, AnalysisError> {
        let json = fs::read_to_string(path).map_err(|source| AnalysisError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(id, path, &json)
    }

    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&TreeDocument {
            path: Some(self.path.clone()),
            source: self.contents.clone(),
            module: self.module.clone(),
        })
    }

    /// The text of a 1-based line, if the source was embedded.
    pub fn line(&self, line: usize) -> Option<&str> {
        let contents = self.contents.as_deref()?;
        contents.lines().nth(line.checked_sub(1)?)
    }

    /// The source text covered by a span on a single line.
    pub fn snippet(&self, span: &SourceSpan) -> Option<&str> {
        if span.line != span.end_line {
            return None;
        }
        let text = self.line(span.line)?;
        let start = span.column.checked_sub(1)?;
        let end = span.end_column.checked_sub(1)?;
        text.get(start..end)
    }
}
