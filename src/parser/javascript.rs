//! Import/export extraction for JavaScript, TypeScript and TSX via AST traversal.
//!
//! Imports:
//!   import { a } from './x'      import './side-effect'
//!   export * from './y'          const z = require('./z')
//!   await import('./lazy')       import fs = require('fs')
//!
//! Exports: exported declarations, export clauses (alias wins),
//! `export * as ns from` and `export default` (recorded as `default`).

use tree_sitter::Node;

use super::FileExtraction;

/// Walk the whole tree and collect import specifiers and exported names.
pub fn extract(root: &Node, source: &[u8], out: &mut FileExtraction) {
    // Explicit stack: nesting depth is unbounded in real-world files.
    let mut stack = vec![*root];
    while let Some(node) = stack.pop() {
        visit(&node, source, out);
        let mut cursor = node.walk();
        let children: Vec<Node> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
}

fn visit(node: &Node, source: &[u8], out: &mut FileExtraction) {
    match node.kind() {
        "import_statement" => {
            if let Some(spec) = import_source(node, source) {
                out.imports.push(spec);
            }
        }
        "export_statement" => {
            if let Some(spec) = node
                .child_by_field_name("source")
                .and_then(|s| string_value(&s, source))
            {
                out.imports.push(spec);
            }
            collect_exports(node, source, &mut out.exports);
        }
        "call_expression" => {
            if let Some(spec) = require_or_dynamic_import(node, source) {
                out.imports.push(spec);
            }
        }
        _ => {}
    }
}

/// `from '<x>'`, or the `require('<x>')` of a TypeScript `import x = require(...)`.
fn import_source(node: &Node, source: &[u8]) -> Option<String> {
    if let Some(s) = node.child_by_field_name("source") {
        return string_value(&s, source);
    }
    let count = node.named_child_count();
    (0..count)
        .filter_map(|i| node.named_child(i))
        .find(|c| c.kind() == "import_require_clause")
        .and_then(|clause| clause.child_by_field_name("source"))
        .and_then(|s| string_value(&s, source))
}

/// `require('x')` or `import('x')` with a plain string argument.
fn require_or_dynamic_import(node: &Node, source: &[u8]) -> Option<String> {
    let function = node.child_by_field_name("function")?;
    let is_loader = match function.kind() {
        "import" => true,
        "identifier" => function.utf8_text(source).ok()? == "require",
        _ => false,
    };
    if !is_loader {
        return None;
    }
    let args = node.child_by_field_name("arguments")?;
    let first = args.named_child(0)?;
    if first.kind() != "string" {
        return None;
    }
    string_value(&first, source)
}

fn collect_exports(node: &Node, source: &[u8], exports: &mut Vec<String>) {
    if let Some(decl) = node.child_by_field_name("declaration") {
        declaration_names(&decl, source, exports);
    }

    let count = node.child_count();
    for i in 0..count {
        let Some(child) = node.child(i) else { continue };
        match child.kind() {
            "default" => push_unique(exports, "default".to_string()),
            "export_clause" => {
                let n = child.named_child_count();
                for j in 0..n {
                    let Some(spec) = child.named_child(j) else { continue };
                    if spec.kind() != "export_specifier" {
                        continue;
                    }
                    let name = spec
                        .child_by_field_name("alias")
                        .or_else(|| spec.child_by_field_name("name"))
                        .and_then(|n| n.utf8_text(source).ok());
                    if let Some(name) = name {
                        push_unique(exports, name.to_string());
                    }
                }
            }
            "namespace_export" => {
                let n = child.named_child_count();
                for j in 0..n {
                    if let Some(id) = child.named_child(j) {
                        if let Ok(name) = id.utf8_text(source) {
                            push_unique(exports, name.to_string());
                        }
                    }
                }
            }
            _ => {}
        }
    }
}

fn declaration_names(decl: &Node, source: &[u8], exports: &mut Vec<String>) {
    match decl.kind() {
        "function_declaration"
        | "generator_function_declaration"
        | "function_signature"
        | "class_declaration"
        | "abstract_class_declaration"
        | "interface_declaration"
        | "type_alias_declaration"
        | "enum_declaration"
        | "internal_module"
        | "module" => {
            if let Some(name) = decl
                .child_by_field_name("name")
                .and_then(|n| n.utf8_text(source).ok())
            {
                push_unique(exports, name.to_string());
            }
        }
        "lexical_declaration" | "variable_declaration" => {
            let n = decl.named_child_count();
            for j in 0..n {
                let Some(declarator) = decl.named_child(j) else { continue };
                if declarator.kind() != "variable_declarator" {
                    continue;
                }
                if let Some(name) = declarator.child_by_field_name("name") {
                    // Destructuring patterns are not single names.
                    if name.kind() == "identifier" {
                        if let Ok(text) = name.utf8_text(source) {
                            push_unique(exports, text.to_string());
                        }
                    }
                }
            }
        }
        _ => {}
    }
}

/// Text of a string literal without its quotes.
fn string_value(node: &Node, source: &[u8]) -> Option<String> {
    let raw = node.utf8_text(source).ok()?;
    let trimmed = raw
        .trim_matches(|c| c == '"' || c == '\'' || c == '`')
        .trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn push_unique(list: &mut Vec<String>, name: String) {
    if !list.contains(&name) {
        list.push(name);
    }
}
