use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use serde_json::json;
use sift_analyzer::{
    AnalysisReport, Analyzer, AnalyzerOptions, CancellationFlag, Diagnostic, DiagnosticLevel,
    ModuleIndex, SourceFile, SourceId,
};
use tracing::{debug, info, Level};

const AFTER_HELP: &str = "\
Trees are JSON documents of the form {\"path\": ..., \"source\": ..., \"module\": {\"body\": [...]}}.
Directories are searched recursively for *.json files.";

#[derive(Parser)]
#[command(
    name = "sift",
    version,
    about = "Static name and type checking over serialized syntax trees.",
    after_help = AFTER_HELP
)]
struct Cli {
    /// Increase log output on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyse syntax trees and report diagnostics.
    Check(CheckArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Human,
    Json,
}

#[derive(Args)]
struct CheckArgs {
    /// Tree files or directories containing them.
    #[arg(value_name = "TREE", required = true)]
    inputs: Vec<PathBuf>,

    /// Module index describing importable project modules (repeatable).
    #[arg(long, value_name = "FILE")]
    modules: Vec<PathBuf>,

    /// YAML analyzer configuration.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Format::Human)]
    format: Format,

    /// Warn about imports that are never referenced.
    #[arg(long)]
    unused_imports: bool,

    /// Do not report unreachable statements.
    #[arg(long)]
    no_unreachable: bool,

    /// Do not warn about generic containers written without type parameters.
    #[arg(long)]
    no_missing_type_parameters: bool,

    /// Keep at most N diagnostics per file.
    #[arg(long, value_name = "N")]
    max_diagnostics: Option<usize>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.command {
        Command::Check(args) => run_check(&args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn run_check(args: &CheckArgs) -> Result<()> {
    let options = load_options(args)?;
    let index = load_index(&args.modules)?;

    let mut targets = BTreeSet::new();
    for input in &args.inputs {
        collect_tree_files(input, true, &mut targets)?;
    }
    if targets.is_empty() {
        bail!("no syntax trees found");
    }

    let files = targets
        .iter()
        .enumerate()
        .map(|(index, path)| {
            let id = u32::try_from(index).context("too many input files")?;
            SourceFile::load(SourceId(id), path).map_err(|error| {
                anyhow!(sift_support::load_error(&path.display().to_string(), error))
            })
        })
        .collect::<Result<Vec<_>>>()?;
    info!(files = files.len(), modules = index.len(), "analysing trees");

    let analyzer = Analyzer::new(options, Arc::new(index));
    let cancellation = CancellationFlag::new();
    let reports = analyzer
        .analyze_batch(&files, &cancellation)
        .into_iter()
        .zip(&files)
        .map(|(result, file)| {
            result.map_err(|error| {
                anyhow!(sift_support::analyze_error(&file.path.display().to_string(), error))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    match args.format {
        Format::Human => render_human(&files, &reports),
        Format::Json => render_json(&reports)?,
    }

    let errors: usize = reports.iter().map(AnalysisReport::error_count).sum();
    if errors > 0 {
        bail!("{} error(s) found", errors);
    }
    Ok(())
}

fn load_options(args: &CheckArgs) -> Result<AnalyzerOptions> {
    let mut options = match &args.config {
        Some(path) => AnalyzerOptions::load(path).map_err(|error| {
            anyhow!(sift_support::config_error(
                &path.display().to_string(),
                format!("{error:#}")
            ))
        })?,
        None => AnalyzerOptions::default(),
    };
    if args.unused_imports {
        options.report_unused_imports = true;
    }
    if args.no_unreachable {
        options.report_unreachable_code = false;
    }
    if args.no_missing_type_parameters {
        options.report_missing_type_parameters = false;
    }
    if args.max_diagnostics.is_some() {
        options.max_diagnostics_per_file = args.max_diagnostics;
    }
    debug!(?options, "analyzer configuration");
    Ok(options)
}

fn load_index(paths: &[PathBuf]) -> Result<ModuleIndex> {
    let mut index = ModuleIndex::with_standard_stubs();
    for path in paths {
        index.load(path).map_err(|error| {
            anyhow!(sift_support::index_error(
                &path.display().to_string(),
                format!("{error:#}")
            ))
        })?;
    }
    Ok(index)
}

/// Explicit files are taken as given; directories contribute their `*.json` files.
fn collect_tree_files(path: &Path, explicit: bool, targets: &mut BTreeSet<PathBuf>) -> Result<()> {
    let metadata = fs::metadata(path).with_context(|| format!("Failed to access {:?}", path))?;

    if metadata.is_dir() {
        let mut child_paths = Vec::new();
        for entry in
            fs::read_dir(path).with_context(|| format!("Failed to read directory {:?}", path))?
        {
            let entry =
                entry.with_context(|| format!("Failed to access entry within {:?}", path))?;
            child_paths.push(entry.path());
        }
        child_paths.sort();
        for child in child_paths {
            collect_tree_files(&child, false, targets)?;
        }
    } else if metadata.is_file()
        && (explicit || path.extension().and_then(|ext| ext.to_str()) == Some("json"))
    {
        targets.insert(path.to_path_buf());
    }

    Ok(())
}

fn render_human(files: &[SourceFile], reports: &[AnalysisReport]) {
    let mut errors = 0;
    let mut warnings = 0;
    for (file, report) in files.iter().zip(reports) {
        for diagnostic in &report.diagnostics {
            print_diagnostic(file, diagnostic);
        }
        errors += report.error_count();
        warnings += report.warning_count();
    }
    eprintln!(
        "checked {} file(s): {} error(s), {} warning(s)",
        files.len(),
        errors,
        warnings
    );
}

fn print_diagnostic(source: &SourceFile, diagnostic: &Diagnostic) {
    let (level_label, level_marker) = match diagnostic.level {
        DiagnosticLevel::Error => ("error", "  -"),
        DiagnosticLevel::Warning => ("warning", "  ~"),
    };
    eprintln!(
        "{} {}[{}]: {}",
        level_marker, level_label, diagnostic.code, diagnostic.message
    );
    let span = diagnostic.span;
    eprintln!("     --> {}:{}:{}", source.path.display(), span.line, span.column);

    let Some(raw_line) = source.line(span.line) else {
        return;
    };
    let display_line = raw_line.replace('\t', "    ");
    eprintln!("      {}", display_line);

    let mut caret_line = String::from("      ");
    for (index, ch) in raw_line.chars().enumerate() {
        if index + 1 >= span.column {
            break;
        }
        match ch {
            '\t' => caret_line.push_str("    "),
            _ => caret_line.push(' '),
        }
    }

    let highlight_len = if span.end_line == span.line {
        span.end_column.saturating_sub(span.column)
    } else {
        display_line
            .chars()
            .count()
            .saturating_sub(span.column.saturating_sub(1))
    };
    caret_line.push_str(&"^".repeat(highlight_len.max(1)));
    eprintln!("{}", caret_line);
}

fn render_json(reports: &[AnalysisReport]) -> Result<()> {
    let files: Vec<_> = reports
        .iter()
        .map(|report| {
            json!({
                "path": report.path.display().to_string(),
                "diagnostics": report.records(),
            })
        })
        .collect();
    let rendered = serde_json::to_string_pretty(&json!({ "files": files }))
        .map_err(|error| anyhow!(sift_support::render_error(error)))?;
    println!("{rendered}");
    Ok(())
}
