//! Rust module-declaration and public-item extraction.

use tree_sitter::Node;

use super::FileExtraction;

const PUBLIC_ITEMS: &[&str] = &[
    "function_item",
    "struct_item",
    "enum_item",
    "union_item",
    "trait_item",
    "const_item",
    "static_item",
    "type_item",
    "mod_item",
];

/// `mod name;` declarations become imports; top-level `pub` items become exports.
pub fn extract(root: &Node, source: &[u8], out: &mut FileExtraction) {
    let n = root.named_child_count();
    for i in 0..n {
        let Some(item) = root.named_child(i) else { continue };
        let name = item
            .child_by_field_name("name")
            .and_then(|id| id.utf8_text(source).ok())
            .map(String::from);

        if item.kind() == "mod_item" && item.child_by_field_name("body").is_none() {
            if let Some(name) = &name {
                out.imports.push(name.clone());
            }
        }

        if PUBLIC_ITEMS.contains(&item.kind()) && is_public(&item) {
            if let Some(name) = name {
                if !out.exports.contains(&name) {
                    out.exports.push(name);
                }
            }
        }
    }
}

fn is_public(item: &Node) -> bool {
    let count = item.child_count();
    (0..count)
        .filter_map(|i| item.child(i))
        .any(|c| c.kind() == "visibility_modifier")
}
