//! Component registry: node-type identifier → [`NodeRenderer`].

use std::collections::HashMap;
use std::fmt;

use super::Node;

/// Renders a single node of one component type to a line of text.
///
/// Children are walked by [`ValidatedRenderer`](super::ValidatedRenderer);
/// a node renderer only describes its own node.
pub trait NodeRenderer: Send + Sync {
    fn render(&self, node: &Node) -> String;
}

/// A closure-based [`NodeRenderer`].
pub struct FnRenderer<F>(F);

impl<F> FnRenderer<F>
where
    F: Fn(&Node) -> String + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> NodeRenderer for FnRenderer<F>
where
    F: Fn(&Node) -> String + Send + Sync,
{
    fn render(&self, node: &Node) -> String {
        (self.0)(node)
    }
}

/// Mapping from node type to the renderer that draws it.
///
/// # Example
///
/// ```
/// use genui_rs::render::{FnRenderer, Node, Registry};
///
/// let registry = Registry::builtin()
///     .with("chart", FnRenderer::new(|node: &Node| {
///         format!("[chart: {}]", node.prop_str("title").unwrap_or("untitled"))
///     }));
/// assert!(registry.contains("chart"));
/// assert!(registry.contains("button"));
/// ```
#[derive(Default)]
pub struct Registry {
    renderers: HashMap<String, Box<dyn NodeRenderer>>,
}

impl Registry {
    /// An empty registry. Every tree is invalid against it.
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard component catalog.
    pub fn builtin() -> Self {
        Self::new()
            .with("stack", FnRenderer::new(render_stack))
            .with("card", FnRenderer::new(render_card))
            .with("heading", FnRenderer::new(render_heading))
            .with("text", FnRenderer::new(render_text))
            .with("form", FnRenderer::new(render_form))
            .with("input", FnRenderer::new(render_input))
            .with("button", FnRenderer::new(render_button))
            .with("list", FnRenderer::new(render_list))
            .with("badge", FnRenderer::new(render_badge))
            .with("divider", FnRenderer::new(|_: &Node| "\u{2500}".repeat(24)))
    }

    /// Register a renderer (builder pattern). Replaces any existing entry.
    pub fn with(mut self, kind: impl Into<String>, renderer: impl NodeRenderer + 'static) -> Self {
        self.register(kind, renderer);
        self
    }

    /// Register a renderer. Replaces any existing entry.
    pub fn register(&mut self, kind: impl Into<String>, renderer: impl NodeRenderer + 'static) {
        self.renderers.insert(kind.into(), Box::new(renderer));
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.renderers.contains_key(kind)
    }

    pub fn get(&self, kind: &str) -> Option<&dyn NodeRenderer> {
        self.renderers.get(kind).map(|r| r.as_ref())
    }

    /// Registered type names, sorted.
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.renderers.keys().map(|k| k.as_str()).collect();
        kinds.sort_unstable();
        kinds
    }

    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

// ── Built-in components ──────────────────────────────────────────────

fn render_stack(node: &Node) -> String {
    let direction = node.prop_str("direction").unwrap_or("column");
    format!("[stack {direction}]")
}

fn render_card(node: &Node) -> String {
    match node.prop_str("title") {
        Some(title) => format!("[card] {title}"),
        None => "[card]".to_string(),
    }
}

fn render_heading(node: &Node) -> String {
    let level = node
        .props
        .get("level")
        .and_then(|v| v.as_u64())
        .unwrap_or(1)
        .clamp(1, 6) as usize;
    format!("{} {}", "#".repeat(level), node.prop_str("text").unwrap_or(""))
}

fn render_text(node: &Node) -> String {
    node.prop_str("text").unwrap_or("").to_string()
}

fn render_form(node: &Node) -> String {
    match node.prop_str("title") {
        Some(title) => format!("[form] {title}"),
        None => "[form]".to_string(),
    }
}

fn render_input(node: &Node) -> String {
    let label = node
        .prop_str("label")
        .or_else(|| node.prop_str("name"))
        .unwrap_or("input");
    let placeholder = node.prop_str("placeholder").unwrap_or("");
    let masked = node.prop_str("type") == Some("password");
    let field = if masked {
        "\u{2022}".repeat(8)
    } else if placeholder.is_empty() {
        "_".repeat(12)
    } else {
        placeholder.to_string()
    };
    format!("{label}: [{field}]")
}

fn render_button(node: &Node) -> String {
    format!("[ {} ]", node.prop_str("label").unwrap_or("Button"))
}

fn render_list(node: &Node) -> String {
    let items: Vec<String> = node
        .props
        .get("items")
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .map(|i| match i.as_str() {
                    Some(s) => format!("\u{2022} {s}"),
                    None => format!("\u{2022} {i}"),
                })
                .collect()
        })
        .unwrap_or_default();
    if items.is_empty() {
        "[list]".to_string()
    } else {
        items.join("  ")
    }
}

fn render_badge(node: &Node) -> String {
    format!("({})", node.prop_str("label").unwrap_or(""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(kind: &str, props: serde_json::Value) -> Node {
        Node {
            kind: kind.into(),
            props: props.as_object().cloned().unwrap_or_default(),
            children: vec![],
        }
    }

    #[test]
    fn builtin_catalog_is_registered() {
        let registry = Registry::builtin();
        for kind in ["stack", "card", "heading", "text", "form", "input", "button"] {
            assert!(registry.contains(kind), "missing {kind}");
        }
        assert!(!registry.contains("carousel"));
        assert_eq!(registry.kinds().first(), Some(&"badge"));
    }

    #[test]
    fn register_replaces_existing_entry() {
        let mut registry = Registry::builtin();
        let before = registry.len();
        registry.register("button", FnRenderer::new(|_: &Node| "custom".to_string()));
        assert_eq!(registry.len(), before);
        let out = registry
            .get("button")
            .unwrap()
            .render(&node("button", json!({})));
        assert_eq!(out, "custom");
    }

    #[test]
    fn input_masks_passwords() {
        let registry = Registry::builtin();
        let out = registry.get("input").unwrap().render(&node(
            "input",
            json!({"label": "Password", "type": "password"}),
        ));
        assert!(out.starts_with("Password: ["));
        assert!(out.contains('\u{2022}'));
    }

    #[test]
    fn heading_level_is_clamped() {
        let registry = Registry::builtin();
        let out = registry
            .get("heading")
            .unwrap()
            .render(&node("heading", json!({"text": "Hi", "level": 9})));
        assert_eq!(out, "###### Hi");
    }

    #[test]
    fn list_renders_items_inline() {
        let registry = Registry::builtin();
        let out = registry
            .get("list")
            .unwrap()
            .render(&node("list", json!({"items": ["a", 2]})));
        assert_eq!(out, "\u{2022} a  \u{2022} 2");
    }

    #[test]
    fn empty_registry_reports_empty() {
        let registry = Registry::new();
        assert!(registry.is_empty());
        assert!(registry.get("text").is_none());
    }
}
