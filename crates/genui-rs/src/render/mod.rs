//! Registry-based rendering of generated trees.
//!
//! The controller treats the tree as an opaque [`serde_json::Value`]. This
//! module owns its shape: [`validate_tree`] checks it against a
//! [`Registry`] of known component types, and [`ValidatedRenderer`] turns a
//! valid tree into [`RenderedLine`]s that any frontend can draw (the TUI
//! styles them, the CLI prints them with [`render_plain`]).
//!
//! A node looks like:
//!
//! ```json
//! { "type": "card", "props": { "title": "Welcome" }, "children": [ ... ] }
//! ```

mod registry;
mod validate;

pub use registry::{FnRenderer, NodeRenderer, Registry};
pub use validate::{MAX_TREE_DEPTH, ROOT_PATH, validate_tree};

use serde_json::{Map, Value};

use crate::ValidationIssue;

/// A validated tree node.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    /// Component type, guaranteed to be registered.
    pub kind: String,
    pub props: Map<String, Value>,
    pub children: Vec<Node>,
}

impl Node {
    /// A string prop, if present and a string.
    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.props.get(key).and_then(|v| v.as_str())
    }
}

/// One rendered node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedLine {
    /// Nesting depth; the root is 0.
    pub depth: usize,
    /// Component type that produced the line.
    pub kind: String,
    pub text: String,
}

/// Result of rendering an opaque tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderOutcome {
    /// One line per node, depth-first.
    Rendered(Vec<RenderedLine>),
    /// The tree failed validation; nothing was rendered.
    Invalid(Vec<ValidationIssue>),
}

/// Validates a tree, then renders it through a [`Registry`].
pub struct ValidatedRenderer<'a> {
    registry: &'a Registry,
}

impl<'a> ValidatedRenderer<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    pub fn render(&self, tree: &Value) -> RenderOutcome {
        match validate_tree(tree, self.registry) {
            Ok(root) => {
                let mut lines = Vec::new();
                self.walk(&root, 0, &mut lines);
                RenderOutcome::Rendered(lines)
            }
            Err(issues) => RenderOutcome::Invalid(issues),
        }
    }

    fn walk(&self, node: &Node, depth: usize, out: &mut Vec<RenderedLine>) {
        // Validation guarantees the type is registered.
        if let Some(renderer) = self.registry.get(&node.kind) {
            out.push(RenderedLine {
                depth,
                kind: node.kind.clone(),
                text: renderer.render(node),
            });
        }
        for child in &node.children {
            self.walk(child, depth + 1, out);
        }
    }
}

/// Join rendered lines with two-space indentation per depth level.
pub fn render_plain(lines: &[RenderedLine]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(&"  ".repeat(line.depth));
        out.push_str(&line.text);
        out.push('\n');
    }
    out
}
