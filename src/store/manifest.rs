//! Layer manifest parsing
//!
//! Each layer `<name>` has a `<name>.parents` manifest next to its content
//! directory: one ancestor name per line, ordered root-first with the
//! immediate parent last. An empty manifest marks a root layer. Manifests are
//! written once at creation and only ever removed whole, never edited.

/// File name suffix for manifest files
pub const MANIFEST_SUFFIX: &str = ".parents";

/// A layer's ancestor lineage, root-first and parent-last
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    ancestors: Vec<String>,
}

impl Manifest {
    /// Manifest for a root layer (no ancestors)
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a manifest from its on-disk text
    pub fn parse(content: &str) -> Self {
        let ancestors = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self { ancestors }
    }

    /// Serialize to on-disk text, one ancestor per line
    pub fn serialize(&self) -> String {
        self.ancestors
            .iter()
            .map(|name| format!("{name}\n"))
            .collect()
    }

    /// Full lineage, root-first
    pub fn ancestors(&self) -> &[String] {
        &self.ancestors
    }

    /// The immediate parent (last manifest line), if any
    pub fn parent(&self) -> Option<&str> {
        self.ancestors.last().map(String::as_str)
    }

    /// Whether this layer is a root (empty manifest)
    pub fn is_root(&self) -> bool {
        self.ancestors.is_empty()
    }

    /// Derive the manifest of a child layer: this lineage with the parent's
    /// own name appended as the new last line
    pub fn child(&self, parent_name: &str) -> Self {
        let mut ancestors = self.ancestors.clone();
        ancestors.push(parent_name.to_string());
        Self { ancestors }
    }
}
