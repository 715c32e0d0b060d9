//! Best-effort file role classification from path conventions.

use super::types::FileKind;
use crate::graph::base_name;

const CONFIG_EXTENSIONS: &[&str] = &["json", "yaml", "yml", "toml", "ini", "env"];

/// Classify a root-relative path. First matching rule wins:
/// test, config, route, hook, component, service, model, util, then plain file.
pub fn infer_kind(path: &str) -> FileKind {
    let lower = path.to_lowercase();
    let base_original = base_name(path);
    let base = base_name(&lower);
    let dirs: Vec<&str> = lower.split('/').rev().skip(1).collect();
    let in_dir = |names: &[&str]| dirs.iter().any(|d| names.contains(d));
    let ext = base.rsplit_once('.').map(|(_, e)| e).unwrap_or("");
    let stem = base.split('.').next().unwrap_or(base);

    if base.contains(".test.")
        || base.contains(".spec.")
        || stem.starts_with("test_")
        || stem.ends_with("_test")
        || in_dir(&["tests", "test", "__tests__", "spec"])
    {
        return FileKind::Test;
    }
    if CONFIG_EXTENSIONS.contains(&ext) || stem.contains("config") || stem.starts_with("settings") {
        return FileKind::Config;
    }
    if stem.contains("route")
        || stem.contains("controller")
        || stem == "urls"
        || in_dir(&["routes", "routers", "controllers", "api", "pages", "endpoints"])
    {
        return FileKind::Route;
    }
    if is_hook_name(base_original) || in_dir(&["hooks"]) {
        return FileKind::Hook;
    }
    if ext == "tsx" || ext == "jsx" || in_dir(&["components", "views", "widgets"]) {
        return FileKind::Component;
    }
    if stem.contains("service") || stem.contains("client") || in_dir(&["services"]) {
        return FileKind::Service;
    }
    if stem.contains("model")
        || stem.contains("schema")
        || stem.contains("entity")
        || in_dir(&["models", "entities", "schemas"])
    {
        return FileKind::Model;
    }
    if stem.contains("util") || stem.contains("helper") || in_dir(&["utils", "helpers"]) {
        return FileKind::Util;
    }
    FileKind::File
}

/// React-style hook module: `useAuth.ts`, `use-session.js`.
fn is_hook_name(base: &str) -> bool {
    let Some(rest) = base.strip_prefix("use") else {
        return false;
    };
    rest.starts_with('-') || rest.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}
