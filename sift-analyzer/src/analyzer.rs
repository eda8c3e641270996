use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info_span};

use crate::aggregate::Aggregator;
use crate::ast::Module;
use crate::binder::Binder;
use crate::checker::TypeChecker;
use crate::control_flow::ControlFlowAnalyzer;
use crate::diagnostics::{Diagnostic, DiagnosticLevel, DiagnosticRecord};
use crate::error::AnalysisError;
use crate::modules::{ModuleIndex, ModuleResolver};
use crate::options::AnalyzerOptions;
use crate::source::SourceFile;

/// Shared switch a caller flips to abandon in-flight analyses. Checked
/// between passes; a pass that has started runs to completion.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn check(&self, stage: &'static str) -> Result<(), AnalysisError> {
        if self.is_cancelled() {
            return Err(AnalysisError::Cancelled { stage });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisReport {
    pub path: PathBuf,
    /// Deduplicated and ordered by position, then kind priority.
    pub diagnostics: Vec<Diagnostic>,
}

impl AnalysisReport {
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn error_count(&self) -> usize {
        self.count(DiagnosticLevel::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(DiagnosticLevel::Warning)
    }

    pub fn records(&self) -> Vec<DiagnosticRecord> {
        self.diagnostics.iter().map(Diagnostic::to_record).collect()
    }

    fn count(&self, level: DiagnosticLevel) -> usize {
        self.diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.level == level)
            .count()
    }
}

/// Runs bind, type check, control flow and aggregation over one tree at a time.
/// Holds no per-file state, so one analyzer serves any number of threads.
pub struct Analyzer {
    options: AnalyzerOptions,
    resolver: Arc<dyn ModuleResolver>,
}

impl Analyzer {
    pub fn new(options: AnalyzerOptions, resolver: Arc<dyn ModuleResolver>) -> Self {
        Self { options, resolver }
    }

    pub fn with_standard_stubs(options: AnalyzerOptions) -> Self {
        Self::new(options, Arc::new(ModuleIndex::with_standard_stubs()))
    }

    pub fn options(&self) -> &AnalyzerOptions {
        &self.options
    }

    pub fn analyze(&self, file: &SourceFile) -> AnalysisReport {
        self.analyze_module(&file.path, &file.module)
    }

    pub fn analyze_module(&self, path: &Path, module: &Module) -> AnalysisReport {
        match self.run(path, module, None) {
            Ok(report) => report,
            // Without a flag there is no stage at which the run can stop.
            Err(_) => AnalysisReport {
                path: path.to_path_buf(),
                diagnostics: Vec::new(),
            },
        }
    }

    pub fn analyze_with_cancellation(
        &self,
        file: &SourceFile,
        cancellation: &CancellationFlag,
    ) -> Result<AnalysisReport, AnalysisError> {
        self.run(&file.path, &file.module, Some(cancellation))
    }

    /// Analyses every file in parallel. Results come back in input order.
    pub fn analyze_batch(
        &self,
        files: &[SourceFile],
        cancellation: &CancellationFlag,
    ) -> Vec<Result<AnalysisReport, AnalysisError>> {
        files
            .par_iter()
            .map(|file| self.analyze_with_cancellation(file, cancellation))
            .collect()
    }

    fn run(
        &self,
        path: &Path,
        module: &Module,
        cancellation: Option<&CancellationFlag>,
    ) -> Result<AnalysisReport, AnalysisError> {
        let span = info_span!("analyze", path = %path.display());
        let _entered = span.enter();
        let checkpoint = |stage: &'static str| match cancellation {
            Some(flag) => flag.check(stage),
            None => Ok(()),
        };
        let resolver = self.resolver.as_ref();
        let mut aggregator = Aggregator::new();

        checkpoint("binding")?;
        let binding = Binder::new(resolver, &self.options).bind_module(module);
        debug!(diagnostics = binding.diagnostics.len(), "bound module");
        aggregator.collect(binding.diagnostics);
        let bound = binding.module;

        checkpoint("type checking")?;
        let checked = TypeChecker::new(&bound, resolver, &self.options).check_module(module);
        debug!(diagnostics = checked.diagnostics.len(), "checked types");
        aggregator.collect(checked.diagnostics);

        checkpoint("control flow analysis")?;
        let flow = ControlFlowAnalyzer::new(&bound, &self.options).analyze_module(module);
        debug!(diagnostics = flow.len(), "analysed control flow");
        aggregator.collect(flow);

        checkpoint("aggregation")?;
        let mut diagnostics = aggregator.finish();
        if let Some(limit) = self.options.max_diagnostics_per_file {
            diagnostics.truncate(limit);
        }
        debug!(diagnostics = diagnostics.len(), "analysis finished");

        Ok(AnalysisReport {
            path: path.to_path_buf(),
            diagnostics,
        })
    }
}
