//! # FeatureLens
//!
//! Feature-scoped dependency subgraphs for code exploration and AI agents.
//!
//! Given a handful of seed files (and optionally keywords) that implement a
//! feature, FeatureLens scores every source file in a project for relevance,
//! annotates its hop distance from the seeds, keeps the files that clear a
//! threshold, and flags the bridge files connecting the rest.
//!
//! ## Key Features
//!
//! - **Explainable**: every score is the sum of listed, weighted reasons
//! - **Deterministic**: identical inputs give identical subgraphs
//! - **Multi-language**: Rust, Python, JavaScript, TypeScript
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use featurelens::{analyze_project, FeatureEngine, FeaturePayload, Stamp, TreeSitterAnalyzer};
//! use std::path::Path;
//!
//! let root = Path::new(".");
//! let report = analyze_project(root, &TreeSitterAnalyzer::new(), &[], &[]).unwrap();
//!
//! let mut payload = FeaturePayload::new("auth", vec!["src/login.ts".to_string()]);
//! payload.keywords = vec!["session".to_string()];
//!
//! let graph = FeatureEngine::default()
//!     .analyze(&report.files, &payload, &Stamp::for_project(root))
//!     .unwrap();
//! for file in &graph.files {
//!     println!("{:>6.1} {}", file.score, file.path);
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod feature;
pub mod graph;
pub mod mcp;
pub mod parser;
pub mod render;

pub use error::{FeatureLensError, Result};

pub use config::FeatureLensConfig;
pub use feature::{
    CancelFlag, EvidenceProvider, FeatureEngine, FeaturePayload, FeatureRun, FeatureSubGraph,
    FeatureSummary, FileKind, FileScore, ReasonKind, RelevanceReason, ScoringWeights, Stamp,
};
pub use graph::{analyze_project, analyze_sources, AnalyzedFile, DependencyGraph, EdgeKind};
pub use parser::{SourceAnalyzer, SupportedLanguage, TreeSitterAnalyzer};
pub use render::{JsonFileRender, NullRender, RenderTarget};

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn analyze(root: &Path, payload: &FeaturePayload) -> FeatureSubGraph {
        let report = analyze_project(root, &TreeSitterAnalyzer::new(), &[], &[]).unwrap();
        FeatureEngine::default()
            .analyze(&report.files, payload, &Stamp::for_project(root))
            .unwrap()
    }

    #[test]
    fn test_typescript_project_end_to_end() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(
            root,
            "src/auth/login.ts",
            "import { createSession } from './session';\n\
             import { hash } from '../util';\n\
             import React from 'react';\n\
             export function login(user: string) { return createSession(user); }\n",
        );
        write(
            root,
            "src/auth/session.ts",
            "import { hash } from '../util';\nexport function createSession(u: string) { return hash(u); }\n",
        );
        write(root, "src/util/index.ts", "export function hash(s: string) { return s; }\n");
        write(
            root,
            "src/pages/LoginPage.tsx",
            "import { login } from '../auth/login';\nexport default function LoginPage() { return <form />; }\n",
        );
        write(root, "src/billing/invoice.ts", "export const total = 0;\n");

        let mut payload = FeaturePayload::new("auth-login", vec!["src/auth/login.ts".into()]);
        payload.keywords = vec!["session".into()];
        payload.relevance_threshold = Some(3.0);
        let graph = analyze(root, &payload);

        let paths: Vec<&str> = graph.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths[0], "src/auth/login.ts");
        assert!(paths.contains(&"src/auth/session.ts"));
        assert!(paths.contains(&"src/util/index.ts"));
        assert!(paths.contains(&"src/pages/LoginPage.tsx"));
        assert!(!paths.contains(&"src/billing/invoice.ts"));

        let page = graph.file("src/pages/LoginPage.tsx").unwrap();
        assert!(page.has_reason(ReasonKind::Import));
        assert_eq!(page.hops, Some(1));

        let session = graph.file("src/auth/session.ts").unwrap();
        assert!(session.has_reason(ReasonKind::ImportedBy));
        assert!(session.has_reason(ReasonKind::KeywordName));

        assert_eq!(
            graph.edges["src/auth/login.ts"],
            vec!["src/auth/session.ts", "src/util/index.ts"]
        );
        assert_eq!(
            graph.edge_types["src/pages/LoginPage.tsx->src/auth/login.ts"],
            EdgeKind::Import
        );
        assert!(graph.commit_hash.is_none());
    }

    #[test]
    fn test_python_project_end_to_end() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "app/__init__.py", "");
        write(
            root,
            "app/views.py",
            "from .auth import login\nimport os\n\ndef index():\n    return login()\n",
        );
        write(
            root,
            "app/auth.py",
            "from app.models import User\n\ndef login():\n    return User()\n",
        );
        write(root, "app/models.py", "class User:\n    pass\n\n_cache = {}\n");
        write(root, "scripts/cleanup.py", "def run():\n    pass\n");

        let mut payload = FeaturePayload::new("py-auth", vec!["app/auth.py".into()]);
        payload.relevance_threshold = Some(3.0);
        let graph = analyze(root, &payload);

        let paths: Vec<&str> = graph.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["app/auth.py", "app/models.py", "app/views.py"]);
        assert_eq!(graph.edges["app/views.py"], vec!["app/auth.py"]);
        assert_eq!(graph.edges["app/auth.py"], vec!["app/models.py"]);
    }

    #[test]
    fn test_rust_project_end_to_end() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "src/lib.rs", "pub mod auth;\nmod util;\n");
        write(root, "src/auth/mod.rs", "pub mod token;\npub fn login() {}\n");
        write(root, "src/auth/token.rs", "pub struct Token;\n");
        write(root, "src/util.rs", "pub fn helper() {}\n");

        let mut payload = FeaturePayload::new("rs-auth", vec!["src/auth/mod.rs".into()]);
        payload.keywords = vec!["token".into()];
        payload.relevance_threshold = Some(1.0);
        let graph = analyze(root, &payload);

        let token = graph.file("src/auth/token.rs").unwrap();
        assert!(token.has_reason(ReasonKind::ImportedBy));
        assert!(token.has_reason(ReasonKind::KeywordSymbol));
        assert_eq!(graph.file("src/lib.rs").unwrap().hops, Some(1));
        assert!(graph.file("src/util.rs").is_none());
    }

    #[test]
    fn test_unparsable_file_is_skipped_not_fatal() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "a.ts", "import './b';\n");
        write(root, "b.ts", "export const b = 1;\n");
        fs::write(root.join("c.ts"), [0xffu8, 0xfe, 0x00, 0x80]).unwrap();

        let report = analyze_project(root, &TreeSitterAnalyzer::new(), &[], &[]).unwrap();
        assert_eq!(report.files.len(), 2);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].path, "c.ts");

        let mut payload = FeaturePayload::new("f", vec!["a.ts".into()]);
        payload.relevance_threshold = Some(3.0);
        let graph = FeatureEngine::default()
            .analyze(&report.files, &payload, &Stamp::now(None))
            .unwrap();
        assert_eq!(graph.files.len(), 2);
    }

    #[test]
    fn test_config_drives_engine_and_render() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "a.ts", "import './b';\n");
        write(root, "b.ts", "");
        write(
            root,
            ".featurelens/config.toml",
            "[weights]\nimported_by = 7.5\n\n[defaults]\nrelevance_threshold = 5.0\n\n[output]\ndir = \"out\"\n",
        );

        let config = FeatureLensConfig::try_load(root).unwrap();
        let report = analyze_project(root, &TreeSitterAnalyzer::new(), &[], &[]).unwrap();
        let payload = FeaturePayload::new("cfg", vec!["a.ts".into()]);
        let render = JsonFileRender::new(config.resolve_output_dir(root));
        let run = config
            .engine()
            .run(&report.files, &payload, &Stamp::now(None), &render)
            .unwrap();

        assert!(run.rendered());
        assert!(run.graph.is_none());
        assert_eq!(run.summary.file_count, 2);
        let b = run.summary.files.iter().find(|f| f.path == "b.ts").unwrap();
        assert_eq!(b.score, 7.5);
        assert!(root.join("out/cfg.json").exists());
    }
}
