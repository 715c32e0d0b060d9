//! MCP tool implementations: maps tool calls to feature analysis.

use serde::Serialize;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::types::{ToolDefinition, ToolsCallResult};
use crate::config::FeatureLensConfig;
use crate::feature::{FeaturePayload, Stamp};
use crate::graph::{analyze_project, AnalysisReport, AnalysisWarning, DependencyGraph};
use crate::parser::{SourceAnalyzer, TreeSitterAnalyzer};
use crate::render::{JsonFileRender, NullRender, RenderTarget};

/// What every tool call runs against.
pub struct ToolContext {
    pub root: PathBuf,
    pub config: FeatureLensConfig,
    pub analyzer: Box<dyn SourceAnalyzer>,
    /// Write rendered graphs under the configured output dir.
    pub write_output: bool,
}

impl ToolContext {
    pub fn new(root: PathBuf, config: FeatureLensConfig) -> Self {
        Self {
            root,
            config,
            analyzer: Box::new(TreeSitterAnalyzer::new()),
            write_output: true,
        }
    }

    fn analyze(&self, include: &[String], exclude: &[String]) -> crate::Result<AnalysisReport> {
        let (include, exclude) = self.config.collect_globs(include, exclude);
        analyze_project(&self.root, self.analyzer.as_ref(), &include, &exclude)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectStats<'a> {
    root: &'a Path,
    file_count: usize,
    edge_count: usize,
    isolated_files: usize,
    warnings: &'a [AnalysisWarning],
}

/// Return the list of all available tools with their JSON schemas.
pub fn list_tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "feature_graph".to_string(),
            description: "Build the dependency subgraph for one feature. Starting from seed \
                files and optional keywords, every source file is scored for relevance, \
                annotated with its hop distance from the seeds, and kept when it clears the \
                threshold. Returns a summary by default, or the full graph with returnGraph."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "featureId": {
                        "type": "string",
                        "description": "Stable identifier of the feature (e.g., 'auth-login')"
                    },
                    "featureName": {
                        "type": "string",
                        "description": "Optional: human-readable name, defaults to featureId"
                    },
                    "seeds": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Root-relative paths of files known to implement the feature"
                    },
                    "keywords": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Optional: terms matched case-insensitively against file names, contents and exports"
                    },
                    "includeGlobs": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Optional: only analyze files matching these globs"
                    },
                    "excludeGlobs": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Optional: skip files matching these globs"
                    },
                    "maxHops": {
                        "type": "integer",
                        "description": "Maximum hop distance annotated from the seeds (default: 3)"
                    },
                    "relevanceThreshold": {
                        "type": "number",
                        "description": "Minimum score for a file to be kept (default: 30)"
                    },
                    "returnGraph": {
                        "type": "boolean",
                        "description": "Return the full graph instead of a summary (default: false)",
                        "default": false
                    }
                },
                "required": ["featureId", "seeds"]
            }),
        },
        ToolDefinition {
            name: "project_stats".to_string(),
            description: "Analyze the project and report file and import-edge counts, \
                isolated files, and files that could not be analyzed."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {}
            }),
        },
    ]
}

/// Dispatch a tool call to the appropriate handler.
pub fn call_tool(ctx: &ToolContext, name: &str, arguments: &Value) -> ToolsCallResult {
    match name {
        "feature_graph" => handle_feature_graph(ctx, arguments),
        "project_stats" => handle_project_stats(ctx),
        _ => ToolsCallResult::error(format!("Unknown tool: {}", name)),
    }
}

fn handle_feature_graph(ctx: &ToolContext, args: &Value) -> ToolsCallResult {
    let payload: FeaturePayload = match serde_json::from_value(args.clone()) {
        Ok(p) => p,
        Err(e) => return ToolsCallResult::error(format!("Invalid arguments: {}", e)),
    };

    let engine = ctx.config.engine();
    // Reject bad payloads before walking the project.
    if let Err(e) = engine.request(&payload) {
        return ToolsCallResult::error(e.to_string());
    }

    let report = match ctx.analyze(&payload.include_globs, &payload.exclude_globs) {
        Ok(r) => r,
        Err(e) => return ToolsCallResult::error(format!("Analysis failed: {}", e)),
    };
    if !report.warnings.is_empty() {
        warn!(skipped = report.warnings.len(), "some files could not be analyzed");
    }

    let stamp = Stamp::for_project(&ctx.root);
    let json_render;
    let render: &dyn RenderTarget = if ctx.write_output {
        json_render = JsonFileRender::new(ctx.config.resolve_output_dir(&ctx.root));
        &json_render
    } else {
        &NullRender
    };

    let run = match engine.run(&report.files, &payload, &stamp, render) {
        Ok(run) => run,
        Err(e) => return ToolsCallResult::error(e.to_string()),
    };
    info!(
        feature = %run.summary.feature_id,
        files = run.summary.file_count,
        "feature_graph complete"
    );

    let result = match &run.graph {
        Some(graph) => ToolsCallResult::json(graph),
        None => ToolsCallResult::json(&run.summary),
    };
    match run.render_error {
        Some(e) => result.with_note(format!("Graph built but not written: {}", e)),
        None => result,
    }
}

fn handle_project_stats(ctx: &ToolContext) -> ToolsCallResult {
    let report = match ctx.analyze(&[], &[]) {
        Ok(r) => r,
        Err(e) => return ToolsCallResult::error(format!("Analysis failed: {}", e)),
    };
    let stats = DependencyGraph::build(&report.files).stats();
    ToolsCallResult::json(&ProjectStats {
        root: &ctx.root,
        file_count: stats.file_count,
        edge_count: stats.edge_count,
        isolated_files: stats.isolated_files,
        warnings: &report.warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("login.ts"), "import { open } from './session';\n").unwrap();
        fs::write(src.join("session.ts"), "export function open() {}\n").unwrap();
        fs::write(src.join("unrelated.ts"), "export const x = 1;\n").unwrap();
        dir
    }

    fn context(dir: &TempDir) -> ToolContext {
        ToolContext::new(dir.path().to_path_buf(), FeatureLensConfig::default())
    }

    #[test]
    fn test_list_tools() {
        let names: Vec<String> = list_tools().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["feature_graph", "project_stats"]);
    }

    #[test]
    fn test_feature_graph_summary_and_output_file() {
        let dir = project();
        let ctx = context(&dir);
        let result = call_tool(
            &ctx,
            "feature_graph",
            &json!({"featureId": "login", "seeds": ["src/login.ts"], "relevanceThreshold": 3}),
        );
        assert!(!result.is_error(), "{:?}", result);
        assert_eq!(result.content.len(), 1);

        let summary: Value = serde_json::from_str(&result.content[0].text).unwrap();
        assert_eq!(summary["fileCount"], 2);
        assert_eq!(summary["edgeCount"], 1);
        assert_eq!(summary["seedsPresent"], 1);
        assert!(dir.path().join(".featurelens/features/login.json").exists());
    }

    #[test]
    fn test_feature_graph_full_graph() {
        let dir = project();
        let mut ctx = context(&dir);
        ctx.write_output = false;
        let result = call_tool(
            &ctx,
            "feature_graph",
            &json!({
                "featureId": "login",
                "seeds": ["src/login.ts"],
                "relevanceThreshold": 3,
                "returnGraph": true
            }),
        );
        let graph: Value = serde_json::from_str(&result.content[0].text).unwrap();
        assert_eq!(graph["edges"]["src/login.ts"][0], "src/session.ts");
        assert_eq!(graph["edgeTypes"]["src/login.ts->src/session.ts"], "import");
        assert!(!dir.path().join(".featurelens").exists());
    }

    #[test]
    fn test_feature_graph_rejects_missing_seeds() {
        let dir = project();
        let result = call_tool(&context(&dir), "feature_graph", &json!({"featureId": "login"}));
        assert!(result.is_error());
        assert!(result.content[0].text.contains("seed"));
    }

    #[test]
    fn test_project_stats() {
        let dir = project();
        let result = call_tool(&context(&dir), "project_stats", &json!({}));
        let stats: Value = serde_json::from_str(&result.content[0].text).unwrap();
        assert_eq!(stats["fileCount"], 3);
        assert_eq!(stats["edgeCount"], 1);
        assert_eq!(stats["isolatedFiles"], 1);
    }

    #[test]
    fn test_unknown_tool() {
        let dir = project();
        assert!(call_tool(&context(&dir), "nope", &json!({})).is_error());
    }
}
