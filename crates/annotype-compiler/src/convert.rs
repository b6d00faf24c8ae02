//! Projection of type trees into the signature syntax.
//!
//! The target syntax spells collections `TArray<...>`, mappings `THash`,
//! unions `Any(...)` and optional values `Nilable(...)`; any name the
//! translation table does not know passes through unchanged.

use annotype_common::Result;

use crate::parser::parse;
use crate::tree::TypeNode;

/// Canonical signature-syntax name for an absent value. A multi-entry type
/// list containing it folds to `Nilable(...)` instead of `Any(...)`.
pub const NIL_MARKER: &str = "Nil";

/// Signature-syntax name for a value with no type constraint. The converter
/// never emits it; callers fall back to it when an annotation is malformed.
pub const UNTYPED: &str = "Untyped";

/// Translate a documented type name to its signature-syntax spelling.
///
/// The table is fixed and case-sensitive. Unrecognized names pass through
/// unchanged, assumed already valid in the signature syntax.
pub fn translate_name(name: &str) -> &str {
    match name {
        "Array" => "TArray",
        "Hash" => "THash",
        "Boolean" => "TBoolean",
        "nil" => NIL_MARKER,
        other => other,
    }
}

/// Render one type tree in the signature syntax.
///
/// Collections render their children recursively, dropping any child whose
/// translated name is the nil marker: `Array<String, nil>` collapses to
/// `TArray<String>` rather than a nilable element type. Mappings are a leaf
/// for this projection and render as their translated name alone.
pub fn convert_node(node: &TypeNode) -> String {
    match node {
        TypeNode::Collection { name, elements }
        | TypeNode::FixedCollection { name, elements } => {
            let children: Vec<String> = elements
                .iter()
                .filter(|child| !is_nil_marker(child))
                .map(convert_node)
                .collect();
            format!("{}<{}>", translate_name(name), children.join(", "))
        }
        TypeNode::Simple { name } | TypeNode::Mapping { name, .. } => {
            translate_name(name).to_string()
        }
    }
}

fn is_nil_marker(node: &TypeNode) -> bool {
    translate_name(node.name()) == NIL_MARKER
}

/// Convert a list of annotation strings into one signature expression.
///
/// Every string is parsed and its top-level nodes are converted in order,
/// preserving duplicates. More than one result folds into `Nilable(...)`
/// when the nil marker is among them (removed exactly once) or `Any(...)`
/// otherwise; a single result is returned unwrapped and an empty input
/// yields an empty string. The first malformed string aborts the whole
/// conversion with its [`annotype_common::SyntaxError`].
pub fn convert_type_list<S: AsRef<str>>(annotations: &[S]) -> Result<String> {
    let mut converted = Vec::new();
    for raw in annotations {
        for node in parse(raw.as_ref())? {
            converted.push(convert_node(&node));
        }
    }

    if converted.len() > 1 {
        if let Some(at) = converted.iter().position(|t| t == NIL_MARKER) {
            converted.remove(at);
            Ok(format!("Nilable({})", converted.join(", ")))
        } else {
            Ok(format!("Any({})", converted.join(", ")))
        }
    } else {
        Ok(converted.join(", "))
    }
}
