//! Resolution of raw import specifiers to in-scope file paths.
//!
//! All paths are root-relative with `/` separators. A specifier that does not
//! land on a file of the analyzed set resolves to `None` and is dropped.

use std::collections::HashSet;

use super::language::SupportedLanguage;

const SCRIPT_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "mjs", "cjs", "mts", "cts"];

/// Resolve `spec`, written in `importer`, against the set of known files.
pub fn resolve_import(importer: &str, spec: &str, known: &HashSet<String>) -> Option<String> {
    let lang = SupportedLanguage::from_extension(importer.rsplit('.').next()?)?;
    let resolved = match lang {
        SupportedLanguage::Python => resolve_python(importer, spec, known),
        SupportedLanguage::Rust => resolve_rust_mod(importer, spec, known),
        _ => resolve_script(importer, spec, known),
    }?;
    (resolved != importer).then_some(resolved)
}

/// Relative JS/TS specifiers: exact file, extension probing, `index.*`, and
/// the ESM convention of importing `./x.js` for a `x.ts` source.
fn resolve_script(importer: &str, spec: &str, known: &HashSet<String>) -> Option<String> {
    if !(spec.starts_with("./") || spec.starts_with("../") || spec == "." || spec == "..") {
        return None;
    }
    let joined = join(parent_dir(importer), spec)?;

    if known.contains(&joined) {
        return Some(joined);
    }
    for ext in SCRIPT_EXTENSIONS {
        let candidate = format!("{}.{}", joined, ext);
        if known.contains(&candidate) {
            return Some(candidate);
        }
    }
    if let Some(stem) = joined
        .strip_suffix(".js")
        .or_else(|| joined.strip_suffix(".jsx"))
        .or_else(|| joined.strip_suffix(".mjs"))
    {
        for ext in ["ts", "tsx", "mts"] {
            let candidate = format!("{}.{}", stem, ext);
            if known.contains(&candidate) {
                return Some(candidate);
            }
        }
    }
    for ext in SCRIPT_EXTENSIONS {
        let candidate = prefixed(&joined, &format!("index.{}", ext));
        if known.contains(&candidate) {
            return Some(candidate);
        }
    }
    None
}

/// Python modules: leading dots are relative to the importer's package,
/// dotted absolute names are tried from the root and then from each ancestor
/// directory of the importer (covers `src/` layouts).
fn resolve_python(importer: &str, spec: &str, known: &HashSet<String>) -> Option<String> {
    let dots = spec.chars().take_while(|&c| c == '.').count();
    let rest = spec[dots..].replace('.', "/");

    if dots > 0 {
        let mut base = parent_dir(importer).to_string();
        for _ in 1..dots {
            base = parent_dir_owned(&base)?;
        }
        return python_candidates(&base, &rest, known);
    }

    if rest.is_empty() {
        return None;
    }
    if let Some(found) = python_candidates("", &rest, known) {
        return Some(found);
    }
    let mut dir = parent_dir(importer);
    while !dir.is_empty() {
        if let Some(found) = python_candidates(dir, &rest, known) {
            return Some(found);
        }
        dir = parent_dir(dir);
    }
    None
}

fn python_candidates(base: &str, rest: &str, known: &HashSet<String>) -> Option<String> {
    let module = if rest.is_empty() {
        base.to_string()
    } else {
        prefixed(base, rest)
    };
    let file = format!("{}.py", module);
    if !rest.is_empty() && known.contains(&file) {
        return Some(file);
    }
    let init = prefixed(&module, "__init__.py");
    known.contains(&init).then_some(init)
}

/// `mod name;` lives next to `lib.rs`/`main.rs`/`mod.rs`, or in a directory
/// named after any other file's stem.
fn resolve_rust_mod(importer: &str, name: &str, known: &HashSet<String>) -> Option<String> {
    let dir = parent_dir(importer);
    let file_name = importer.rsplit('/').next()?;
    let module_dir = match file_name {
        "lib.rs" | "main.rs" | "mod.rs" => dir.to_string(),
        other => prefixed(dir, other.strip_suffix(".rs")?),
    };
    let flat = prefixed(&module_dir, &format!("{}.rs", name));
    if known.contains(&flat) {
        return Some(flat);
    }
    let nested = prefixed(&module_dir, &format!("{}/mod.rs", name));
    known.contains(&nested).then_some(nested)
}

/// Directory part of a root-relative path; `""` for files at the root.
fn parent_dir(path: &str) -> &str {
    path.rfind('/').map(|i| &path[..i]).unwrap_or("")
}

fn parent_dir_owned(path: &str) -> Option<String> {
    if path.is_empty() {
        return None;
    }
    Some(parent_dir(path).to_string())
}

fn prefixed(dir: &str, rest: &str) -> String {
    if dir.is_empty() {
        rest.to_string()
    } else {
        format!("{}/{}", dir, rest)
    }
}

/// Join a relative specifier onto `dir`, collapsing `.` and `..`.
/// Returns `None` when the path escapes the root.
fn join(dir: &str, spec: &str) -> Option<String> {
    let mut parts: Vec<&str> = dir.split('/').filter(|p| !p.is_empty()).collect();
    for segment in spec.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            other => parts.push(other),
        }
    }
    Some(parts.join("/"))
}

/// Normalise a user-supplied path: backslashes to `/`, no leading `./` or `/`.
pub fn normalize_path(path: &str) -> String {
    let unified = path.trim().replace('\\', "/");
    let mut rest = unified.as_str();
    loop {
        if let Some(stripped) = rest.strip_prefix("./") {
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix('/') {
            rest = stripped;
        } else {
            break;
        }
    }
    rest.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known(paths: &[&str]) -> HashSet<String> {
        paths.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_script_relative_with_extension_probe() {
        let k = known(&["src/login.ts", "src/session.ts", "src/lib/index.tsx"]);
        assert_eq!(
            resolve_import("src/login.ts", "./session", &k),
            Some("src/session.ts".to_string())
        );
        assert_eq!(
            resolve_import("src/login.ts", "./lib", &k),
            Some("src/lib/index.tsx".to_string())
        );
        assert_eq!(
            resolve_import("src/lib/index.tsx", "../session", &k),
            Some("src/session.ts".to_string())
        );
    }

    #[test]
    fn test_script_js_suffix_maps_to_ts_source() {
        let k = known(&["a.ts", "b.ts"]);
        assert_eq!(resolve_import("a.ts", "./b.js", &k), Some("b.ts".to_string()));
    }

    #[test]
    fn test_script_bare_and_escaping_specifiers_dropped() {
        let k = known(&["a.ts", "react.ts"]);
        assert_eq!(resolve_import("a.ts", "react", &k), None);
        assert_eq!(resolve_import("a.ts", "../../outside", &k), None);
        assert_eq!(resolve_import("a.ts", "./a", &k), None);
    }

    #[test]
    fn test_python_relative_and_absolute() {
        let k = known(&[
            "app/__init__.py",
            "app/auth/login.py",
            "app/auth/session.py",
            "app/db.py",
        ]);
        assert_eq!(
            resolve_import("app/auth/login.py", ".session", &k),
            Some("app/auth/session.py".to_string())
        );
        assert_eq!(
            resolve_import("app/auth/login.py", "..db", &k),
            Some("app/db.py".to_string())
        );
        assert_eq!(
            resolve_import("app/auth/login.py", "app.db", &k),
            Some("app/db.py".to_string())
        );
        assert_eq!(
            resolve_import("app/auth/login.py", "..", &k),
            Some("app/__init__.py".to_string())
        );
        assert_eq!(resolve_import("app/auth/login.py", "os.path", &k), None);
    }

    #[test]
    fn test_python_src_layout() {
        let k = known(&["src/pkg/a.py", "src/pkg/b.py"]);
        assert_eq!(
            resolve_import("src/pkg/a.py", "pkg.b", &k),
            Some("src/pkg/b.py".to_string())
        );
    }

    #[test]
    fn test_rust_mod_declarations() {
        let k = known(&["src/lib.rs", "src/graph/mod.rs", "src/graph/engine.rs", "src/error.rs"]);
        assert_eq!(
            resolve_import("src/lib.rs", "error", &k),
            Some("src/error.rs".to_string())
        );
        assert_eq!(
            resolve_import("src/lib.rs", "graph", &k),
            Some("src/graph/mod.rs".to_string())
        );
        assert_eq!(
            resolve_import("src/graph/mod.rs", "engine", &k),
            Some("src/graph/engine.rs".to_string())
        );
        assert_eq!(resolve_import("src/error.rs", "tests", &k), None);
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("./src/login.ts"), "src/login.ts");
        assert_eq!(normalize_path("src\\auth\\login.ts"), "src/auth/login.ts");
        assert_eq!(normalize_path(" /a.ts "), "a.ts");
    }
}
