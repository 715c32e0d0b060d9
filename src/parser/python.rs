//! Python import/export extraction via AST traversal.
//!
//! Detects:
//!   import pkg.module
//!   from .sibling import thing
//!   from . import sibling
//!
//! Imported names of a `from` import are also emitted as candidate
//! submodules (`.pkg.name`); resolution drops the ones that are not files.

use tree_sitter::Node;

use super::FileExtraction;

/// Extract imports from anywhere in the module and exports from its top level.
pub fn extract(root: &Node, source: &[u8], out: &mut FileExtraction) {
    walk_imports(root, source, &mut out.imports);
    top_level_exports(root, source, &mut out.exports);
}

fn walk_imports(root: &Node, source: &[u8], imports: &mut Vec<String>) {
    let mut stack = vec![*root];
    while let Some(node) = stack.pop() {
        match node.kind() {
            "import_statement" => {
                let n = node.named_child_count();
                for i in 0..n {
                    if let Some(child) = node.named_child(i) {
                        if let Some(module) = module_name(&child, source) {
                            imports.push(module);
                        }
                    }
                }
            }
            "import_from_statement" => {
                let Some(module) = node
                    .child_by_field_name("module_name")
                    .and_then(|m| m.utf8_text(source).ok())
                else {
                    continue;
                };
                let module = module.to_string();
                imports.push(module.clone());

                let names = imported_names(&node, source);
                let sep = if module.ends_with('.') { "" } else { "." };
                for name in names {
                    imports.push(format!("{}{}{}", module, sep, name));
                }
            }
            _ => {
                let mut cursor = node.walk();
                let children: Vec<Node> = node.children(&mut cursor).collect();
                stack.extend(children.into_iter().rev());
            }
        }
    }
}

/// `dotted_name` or the `name` of an `aliased_import`.
fn module_name(node: &Node, source: &[u8]) -> Option<String> {
    match node.kind() {
        "dotted_name" => node.utf8_text(source).ok().map(String::from),
        "aliased_import" => node
            .child_by_field_name("name")
            .and_then(|n| n.utf8_text(source).ok())
            .map(String::from),
        _ => None,
    }
}

fn imported_names(node: &Node, source: &[u8]) -> Vec<String> {
    let module = node.child_by_field_name("module_name");
    let mut names = Vec::new();
    let n = node.named_child_count();
    for i in 0..n {
        let Some(child) = node.named_child(i) else { continue };
        if module.is_some_and(|m| m.id() == child.id()) {
            continue;
        }
        if let Some(name) = module_name(&child, source) {
            names.push(name);
        }
    }
    names
}

fn top_level_exports(root: &Node, source: &[u8], exports: &mut Vec<String>) {
    let n = root.named_child_count();
    for i in 0..n {
        let Some(child) = root.named_child(i) else { continue };
        let name = match child.kind() {
            "function_definition" | "class_definition" => definition_name(&child, source),
            "decorated_definition" => child
                .child_by_field_name("definition")
                .and_then(|d| definition_name(&d, source)),
            "expression_statement" => assignment_target(&child, source),
            _ => None,
        };
        if let Some(name) = name {
            if !name.starts_with('_') && !exports.contains(&name) {
                exports.push(name);
            }
        }
    }
}

fn definition_name(node: &Node, source: &[u8]) -> Option<String> {
    node.child_by_field_name("name")
        .and_then(|n| n.utf8_text(source).ok())
        .map(String::from)
}

/// `NAME = ...` at module level.
fn assignment_target(stmt: &Node, source: &[u8]) -> Option<String> {
    let assignment = stmt.named_child(0)?;
    if assignment.kind() != "assignment" {
        return None;
    }
    let left = assignment.child_by_field_name("left")?;
    if left.kind() != "identifier" {
        return None;
    }
    left.utf8_text(source).ok().map(String::from)
}
