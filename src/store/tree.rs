//! Parent→children index over the layer store
//!
//! A "child" of layer X is any layer whose manifest's last line equals X.
//! The index is built from one scan over all manifests, so tree-wide
//! operations (list, cascading delete) don't re-read every manifest per node.

use crate::error::LaminaResult;
use crate::store::LayerStore;
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Forest structure derived from manifest last lines
#[derive(Debug, Default)]
pub struct LayerTree {
    children: HashMap<String, Vec<String>>,
    roots: Vec<String>,
    orphans: Vec<(String, String)>,
}

impl LayerTree {
    /// Build the index with one manifest scan. Layer order is name-sorted,
    /// so listing and cascades are deterministic.
    ///
    /// A layer whose parent no longer exists (out-of-band deletion) is
    /// recorded as an orphan; it still counts as a child of the missing
    /// name, but is surfaced separately so listing never hides it.
    pub async fn build(store: &LayerStore) -> LaminaResult<Self> {
        let names = store.layer_names().await?;
        let known: HashSet<&str> = names.iter().map(String::as_str).collect();

        let mut children: HashMap<String, Vec<String>> = HashMap::new();
        let mut roots = Vec::new();
        let mut orphans = Vec::new();

        for name in &names {
            let manifest = store.read_manifest(name).await?;
            match manifest.parent() {
                Some(parent) => {
                    if !known.contains(parent) {
                        warn!("Layer {} references missing parent {}", name, parent);
                        orphans.push((name.clone(), parent.to_string()));
                    }
                    children
                        .entry(parent.to_string())
                        .or_default()
                        .push(name.clone());
                }
                None => roots.push(name.clone()),
            }
        }

        Ok(Self {
            children,
            roots,
            orphans,
        })
    }

    /// Direct children of a layer (layers whose manifest ends with `name`)
    pub fn children(&self, name: &str) -> &[String] {
        self.children.get(name).map_or(&[], Vec::as_slice)
    }

    /// Root layers (empty manifests), name-sorted
    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    /// Layers whose manifest names a parent that no longer exists, as
    /// (layer, missing parent) pairs in name order
    pub fn orphans(&self) -> &[(String, String)] {
        &self.orphans
    }

    /// Whether the store holds no layers at all
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty() && self.orphans.is_empty() && self.children.is_empty()
    }

    /// Render the forest as indented text, two spaces per depth level.
    /// Orphans appear at top level, annotated with their missing parent.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for root in &self.roots {
            self.render_node(root, 0, &mut out);
        }
        for (name, parent) in &self.orphans {
            out.push_str(&format!("{name} (missing parent: {parent})\n"));
            for child in self.children(name) {
                self.render_node(child, 1, &mut out);
            }
        }
        out
    }

    fn render_node(&self, name: &str, depth: usize, out: &mut String) {
        out.push_str(&"  ".repeat(depth));
        out.push_str(name);
        out.push('\n');
        for child in self.children(name) {
            self.render_node(child, depth + 1, out);
        }
    }
}
