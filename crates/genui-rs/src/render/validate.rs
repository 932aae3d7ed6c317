//! Shape-checking of opaque trees against a [`Registry`].

use serde_json::{Map, Value};

use super::{Node, Registry};
use crate::ValidationIssue;

/// Trees nested deeper than this are rejected.
pub const MAX_TREE_DEPTH: usize = 64;

/// Root segment of every issue path.
pub const ROOT_PATH: &str = "root";

/// Check `tree` and convert it to a [`Node`].
///
/// Every problem is collected; on failure the issues are returned in
/// depth-first document order. Paths are dotted, e.g.
/// `root.children[1].props`.
pub fn validate_tree(tree: &Value, registry: &Registry) -> Result<Node, Vec<ValidationIssue>> {
    let mut issues = Vec::new();
    let node = validate_node(tree, ROOT_PATH, 0, registry, &mut issues);
    match node {
        Some(node) if issues.is_empty() => Ok(node),
        _ => Err(issues),
    }
}

fn validate_node(
    value: &Value,
    path: &str,
    depth: usize,
    registry: &Registry,
    issues: &mut Vec<ValidationIssue>,
) -> Option<Node> {
    if depth >= MAX_TREE_DEPTH {
        issues.push(ValidationIssue::new(
            path,
            format!("tree exceeds maximum depth of {MAX_TREE_DEPTH}"),
        ));
        return None;
    }

    let Some(obj) = value.as_object() else {
        issues.push(ValidationIssue::new(path, "expected an object node"));
        return None;
    };

    let kind = match obj.get("type") {
        Some(Value::String(t)) if registry.contains(t) => Some(t.clone()),
        Some(Value::String(_)) => {
            issues.push(ValidationIssue::new(path, "unknown type"));
            None
        }
        Some(_) => {
            issues.push(ValidationIssue::new(
                format!("{path}.type"),
                "expected a string",
            ));
            None
        }
        None => {
            issues.push(ValidationIssue::new(path, "missing type"));
            None
        }
    };

    let props = match obj.get("props") {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(props)) => props.clone(),
        Some(_) => {
            issues.push(ValidationIssue::new(
                format!("{path}.props"),
                "expected an object",
            ));
            Map::new()
        }
    };

    let mut children = Vec::new();
    match obj.get("children") {
        None | Some(Value::Null) => {}
        Some(Value::Array(items)) => {
            for (i, item) in items.iter().enumerate() {
                let child_path = format!("{path}.children[{i}]");
                if let Some(child) = validate_node(item, &child_path, depth + 1, registry, issues) {
                    children.push(child);
                }
            }
        }
        Some(_) => issues.push(ValidationIssue::new(
            format!("{path}.children"),
            "expected an array",
        )),
    }

    kind.map(|kind| Node {
        kind,
        props,
        children,
    })
}
