use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::builtins::stubs;
use crate::types::Type;

/// Answers import questions for the binder and checker.
///
/// Implementations are shared read-only across a batch run, so they must be
/// safe to query from several threads at once.
pub trait ModuleResolver: Send + Sync {
    fn resolve(&self, module: &str) -> Option<ModuleDescriptor>;
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    pub name: String,
    #[serde(default)]
    pub exports: BTreeMap<String, Type>,
}

impl ModuleDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            exports: BTreeMap::new(),
        }
    }

    pub fn with_export(mut self, name: impl Into<String>, ty: Type) -> Self {
        self.exports.insert(name.into(), ty);
        self
    }

    pub fn export(&self, name: &str) -> Option<&Type> {
        self.exports.get(name)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct IndexDocument {
    #[serde(default)]
    modules: Vec<ModuleDescriptor>,
}

/// An in-memory module table, loadable from a JSON document of the form
/// `{"modules": [{"name": "pkg.mod", "exports": {"fn": <type>}}]}`.
#[derive(Debug, Clone, Default)]
pub struct ModuleIndex {
    modules: BTreeMap<String, ModuleDescriptor>,
}

impl ModuleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// An index preloaded with descriptors for the commonly imported standard modules.
    pub fn with_standard_stubs() -> Self {
        let mut index = Self::new();
        for descriptor in stubs::standard_modules() {
            index.insert(descriptor);
        }
        index
    }

    pub fn insert(&mut self, descriptor: ModuleDescriptor) {
        match self.modules.get_mut(&descriptor.name) {
            Some(existing) => existing.exports.extend(descriptor.exports),
            None => {
                self.modules.insert(descriptor.name.clone(), descriptor);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    pub fn from_json_str(source: &str) -> Result<Self> {
        let document: IndexDocument =
            serde_json::from_str(source).context("invalid module index document")?;
        let mut index = Self::new();
        for descriptor in document.modules {
            index.insert(descriptor);
        }
        Ok(index)
    }

    /// Merges the modules listed in a JSON index file into this index.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read module index {}", path.display()))?;
        let loaded = Self::from_json_str(&contents)
            .with_context(|| format!("failed to parse module index {}", path.display()))?;
        for descriptor in loaded.modules.into_values() {
            self.insert(descriptor);
        }
        Ok(())
    }

    pub fn to_json_string(&self) -> Result<String> {
        let document = IndexDocument {
            modules: self.modules.values().cloned().collect(),
        };
        serde_json::to_string_pretty(&document).context("failed to serialize module index")
    }
}

impl ModuleResolver for ModuleIndex {
    fn resolve(&self, module: &str) -> Option<ModuleDescriptor> {
        self.modules.get(module).cloned()
    }
}
