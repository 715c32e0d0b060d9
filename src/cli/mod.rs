//! CLI module for FeatureLens.
//!
//! Commands:
//! - analyze: build a feature subgraph from flags
//! - payload: build one from a JSON payload file
//! - stats: project file and import-edge counts

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::FeatureLensConfig;
use crate::feature::{FeaturePayload, FeatureRun, FeatureSummary, Stamp};
use crate::graph::{analyze_project, AnalysisReport, DependencyGraph};
use crate::parser::TreeSitterAnalyzer;
use crate::render::{JsonFileRender, NullRender, RenderTarget};

#[derive(Parser)]
#[command(name = "featurelens")]
#[command(about = "Feature-scoped dependency subgraphs for code exploration")]
pub struct Cli {
    /// Project root directory (default: current directory)
    #[arg(short, long, default_value = ".")]
    pub root: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score the project against seed files and keywords
    Analyze(AnalyzeArgs),

    /// Run a FeaturePayload read from a JSON file
    Payload {
        /// Path to payload JSON file
        file: PathBuf,

        /// Do not write the rendered graph under the output dir
        #[arg(long)]
        no_write: bool,
    },

    /// Show project statistics
    Stats,
}

#[derive(Args, Debug, Clone, Default)]
pub struct AnalyzeArgs {
    /// Feature identifier, also the output file name
    #[arg(long)]
    pub feature_id: String,

    /// Human-readable feature name
    #[arg(long)]
    pub feature_name: Option<String>,

    /// Seed file (root-relative), repeatable
    #[arg(short, long = "seed", required = true)]
    pub seeds: Vec<String>,

    /// Keyword, repeatable
    #[arg(short, long = "keyword")]
    pub keywords: Vec<String>,

    /// Maximum hop distance from the seeds
    #[arg(long)]
    pub max_hops: Option<usize>,

    /// Minimum score for a file to be kept
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Only analyze files matching this glob, repeatable
    #[arg(long)]
    pub include: Vec<String>,

    /// Skip files matching this glob, repeatable
    #[arg(long)]
    pub exclude: Vec<String>,

    /// Print a readable summary instead of the graph JSON
    #[arg(long)]
    pub summary: bool,

    /// Do not write the rendered graph under the output dir
    #[arg(long)]
    pub no_write: bool,
}

impl AnalyzeArgs {
    pub fn to_payload(&self) -> FeaturePayload {
        FeaturePayload {
            feature_id: self.feature_id.clone(),
            feature_name: self.feature_name.clone(),
            seeds: self.seeds.clone(),
            keywords: self.keywords.clone(),
            include_globs: self.include.clone(),
            exclude_globs: self.exclude.clone(),
            max_hops: self.max_hops,
            relevance_threshold: self.threshold,
            return_graph: !self.summary,
        }
    }
}

/// Execute a parsed command line, writing results to `out`.
pub fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    let root = cli.root.canonicalize().unwrap_or(cli.root);
    let config = FeatureLensConfig::try_load(&root)?;

    match cli.command {
        Commands::Analyze(args) => {
            let payload = args.to_payload();
            let run = run_payload(&root, &config, &payload, !args.no_write)?;
            match (&run.graph, args.summary) {
                (Some(graph), false) => print_json(out, graph)?,
                _ => print_summary(out, &run.summary)?,
            }
        }

        Commands::Payload { file, no_write } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let payload: FeaturePayload = serde_json::from_str(&text)
                .with_context(|| format!("parsing {}", file.display()))?;
            let run = run_payload(&root, &config, &payload, !no_write)?;
            match &run.graph {
                Some(graph) => print_json(out, graph)?,
                None => print_json(out, &run.summary)?,
            }
        }

        Commands::Stats => {
            let report = analyze(&root, &config, &[], &[])?;
            let stats = DependencyGraph::build(&report.files).stats();
            writeln!(out, "FeatureLens - Project Stats")?;
            writeln!(out, "═══════════════════════════")?;
            writeln!(out, "Files:    {}", stats.file_count)?;
            writeln!(out, "Imports:  {}", stats.edge_count)?;
            writeln!(out, "Isolated: {}", stats.isolated_files)?;
            if !report.warnings.is_empty() {
                writeln!(out)?;
                writeln!(out, "Skipped:")?;
                for w in &report.warnings {
                    writeln!(out, "  {} ({})", w.path, w.message)?;
                }
            }
        }
    }

    Ok(())
}

fn analyze(
    root: &Path,
    config: &FeatureLensConfig,
    include: &[String],
    exclude: &[String],
) -> Result<AnalysisReport> {
    let (include, exclude) = config.collect_globs(include, exclude);
    let report = analyze_project(root, &TreeSitterAnalyzer::new(), &include, &exclude)?;
    Ok(report)
}

fn run_payload(
    root: &Path,
    config: &FeatureLensConfig,
    payload: &FeaturePayload,
    write: bool,
) -> Result<FeatureRun> {
    let engine = config.engine();
    engine.request(payload)?;

    let report = analyze(root, config, &payload.include_globs, &payload.exclude_globs)?;
    if report.files.is_empty() {
        bail!("no supported source files under {}", root.display());
    }

    let json_render;
    let render: &dyn RenderTarget = if write {
        json_render = JsonFileRender::new(config.resolve_output_dir(root));
        &json_render
    } else {
        &NullRender
    };

    let run = engine.run(&report.files, payload, &Stamp::for_project(root), render)?;
    if let Some(e) = &run.render_error {
        eprintln!("Warning: {}", e);
    }
    Ok(run)
}

fn print_json<T: serde::Serialize>(out: &mut impl Write, value: &T) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}

fn print_summary(out: &mut impl Write, summary: &FeatureSummary) -> Result<()> {
    writeln!(out, "Feature: {} ({})", summary.feature_name, summary.feature_id)?;
    writeln!(
        out,
        "Files: {}  Edges: {}  Bridges: {}  Seeds present: {}/{}",
        summary.file_count,
        summary.edge_count,
        summary.bridge_count,
        summary.seeds_present,
        summary.seeds.len()
    )?;
    writeln!(out)?;
    for file in &summary.files {
        let hops = file.hops.map_or_else(|| "-".to_string(), |h| h.to_string());
        let bridge = if file.is_bridge { " [bridge]" } else { "" };
        writeln!(
            out,
            "  {:>7.1}  hop {:>2}  {}{}",
            file.score, hops, file.path, bridge
        )?;
        for reason in &file.top_reasons {
            writeln!(out, "             {} (+{})", reason.detail, reason.weight)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(
            dir.path().join("src/login.ts"),
            "import { session } from './session';\nexport function login() {}\n",
        )
        .unwrap();
        fs::write(dir.path().join("src/session.ts"), "export const session = 1;\n").unwrap();
        fs::write(dir.path().join("src/other.ts"), "export const other = 2;\n").unwrap();
        dir
    }

    fn run_args(args: &[&str]) -> String {
        let cli = Cli::try_parse_from(args).unwrap();
        let mut out = Vec::new();
        run(cli, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_analyze_args_to_payload() {
        let cli = Cli::try_parse_from([
            "featurelens", "analyze", "--feature-id", "auth", "-s", "a.ts", "-s", "b.ts",
            "-k", "login", "--threshold", "5", "--summary",
        ])
        .unwrap();
        let Commands::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        let payload = args.to_payload();
        assert_eq!(payload.seeds, vec!["a.ts", "b.ts"]);
        assert_eq!(payload.keywords, vec!["login"]);
        assert_eq!(payload.relevance_threshold, Some(5.0));
        assert_eq!(payload.max_hops, None);
        assert!(!payload.return_graph);
    }

    #[test]
    fn test_analyze_requires_seed() {
        assert!(Cli::try_parse_from(["featurelens", "analyze", "--feature-id", "auth"]).is_err());
    }

    #[test]
    fn test_analyze_prints_graph_and_writes_output() {
        let dir = project();
        let root = dir.path().to_str().unwrap();
        let text = run_args(&[
            "featurelens", "--root", root, "analyze", "--feature-id", "login",
            "--seed", "src/login.ts", "--threshold", "3",
        ]);
        let graph: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(graph["files"].as_array().unwrap().len(), 2);
        assert_eq!(graph["files"][0]["path"], "src/login.ts");
        assert!(dir.path().join(".featurelens/features/login.json").exists());
    }

    #[test]
    fn test_analyze_summary_text() {
        let dir = project();
        let root = dir.path().to_str().unwrap();
        let text = run_args(&[
            "featurelens", "--root", root, "analyze", "--feature-id", "login",
            "--seed", "src/login.ts", "--threshold", "3", "--summary", "--no-write",
        ]);
        assert!(text.contains("Feature: login (login)"));
        assert!(text.contains("src/session.ts"));
        assert!(!text.contains("src/other.ts"));
        assert!(!dir.path().join(".featurelens").exists());
    }

    #[test]
    fn test_payload_file() {
        let dir = project();
        let payload = dir.path().join("payload.json");
        fs::write(
            &payload,
            r#"{"featureId":"login","seeds":["src/login.ts"],"relevanceThreshold":3}"#,
        )
        .unwrap();
        let root = dir.path().to_str().unwrap();
        let text = run_args(&[
            "featurelens", "--root", root, "payload", payload.to_str().unwrap(), "--no-write",
        ]);
        let summary: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(summary["fileCount"], 2);
    }

    #[test]
    fn test_stats() {
        let dir = project();
        let text = run_args(&["featurelens", "--root", dir.path().to_str().unwrap(), "stats"]);
        assert!(text.contains("Files:    3"));
        assert!(text.contains("Imports:  1"));
    }

    #[test]
    fn test_invalid_payload_is_error() {
        let dir = project();
        let cli = Cli::try_parse_from([
            "featurelens", "--root", dir.path().to_str().unwrap(), "analyze",
            "--feature-id", " ", "--seed", "src/login.ts",
        ])
        .unwrap();
        let err = run(cli, &mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("featureId"));
    }
}
