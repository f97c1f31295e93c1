//! Layer store - authoritative CRUD over layers on disk
//!
//! A layer `<name>` is a content directory `<layers_dir>/<name>/` plus a
//! manifest `<layers_dir>/<name>.parents` recording its lineage. Existence of
//! both is the only notion of "committed"; there is no staging state.

pub mod manifest;
pub mod tree;

pub use manifest::Manifest;
pub use tree::LayerTree;

use crate::config::Config;
use crate::error::{LaminaError, LaminaResult};
use async_trait::async_trait;
use futures_util::future::{BoxFuture, FutureExt};
use manifest::MANIFEST_SUFFIX;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Injected confirmation for cascading deletes
///
/// Called once per layer that still has direct children before the cascade
/// descends into them. Substituting a fixed-answer implementation makes
/// deletion deterministic in tests.
#[async_trait]
pub trait CascadeConfirmation: Send + Sync {
    /// Ask whether `layer` and its `child_count` direct children may go
    async fn confirm(&self, layer: &str, child_count: usize) -> LaminaResult<bool>;
}

/// On-disk layer store rooted at a configurable directory
pub struct LayerStore {
    layers_dir: PathBuf,
}

impl LayerStore {
    /// Create a store over the configured layers directory
    pub fn new(config: &Config) -> Self {
        Self {
            layers_dir: config.storage.layers_dir.clone(),
        }
    }

    /// Create a store over an explicit directory
    pub fn at(layers_dir: impl Into<PathBuf>) -> Self {
        Self {
            layers_dir: layers_dir.into(),
        }
    }

    /// The store's root directory
    pub fn layers_dir(&self) -> &Path {
        &self.layers_dir
    }

    /// Content directory of a layer
    pub fn layer_dir(&self, name: &str) -> PathBuf {
        self.layers_dir.join(name)
    }

    /// Manifest file of a layer
    pub fn manifest_path(&self, name: &str) -> PathBuf {
        self.layers_dir.join(format!("{name}{MANIFEST_SUFFIX}"))
    }

    /// Read and parse a layer's manifest
    ///
    /// A content directory without a manifest (interrupted create) does not
    /// count as an existing layer here.
    pub async fn read_manifest(&self, name: &str) -> LaminaResult<Manifest> {
        let path = self.manifest_path(name);
        if !path.exists() {
            return Err(LaminaError::NotFound(name.to_string()));
        }
        let content = fs::read_to_string(&path)
            .await
            .map_err(|e| LaminaError::io(format!("reading manifest {}", path.display()), e))?;
        Ok(Manifest::parse(&content))
    }

    /// Create a new layer, optionally as a child of `parent`
    ///
    /// The content directory is created before the manifest is written; an
    /// interruption between the two steps leaves an orphaned directory that
    /// later operations treat as nonexistent.
    pub async fn create(&self, name: &str, parent: Option<&str>) -> LaminaResult<()> {
        let layer_dir = self.layer_dir(name);
        if layer_dir.exists() {
            return Err(LaminaError::AlreadyExists(name.to_string()));
        }

        let manifest = match parent {
            Some(parent) => {
                if !self.manifest_path(parent).exists() {
                    return Err(LaminaError::ParentMissing(parent.to_string()));
                }
                self.read_manifest(parent).await?.child(parent)
            }
            None => Manifest::root(),
        };

        fs::create_dir_all(&layer_dir)
            .await
            .map_err(|e| LaminaError::io(format!("creating layer dir {}", layer_dir.display()), e))?;

        let manifest_path = self.manifest_path(name);
        fs::write(&manifest_path, manifest.serialize())
            .await
            .map_err(|e| {
                LaminaError::io(format!("writing manifest {}", manifest_path.display()), e)
            })?;

        info!("Created layer {} (parent: {})", name, parent.unwrap_or("none"));
        Ok(())
    }

    /// Delete a layer and, after confirmation, all of its descendants
    ///
    /// Descendants are removed post-order, before the layer itself. A
    /// declined confirmation aborts with `UserAborted`; when that happens
    /// below the top level the parent's deletion halts with
    /// `ChildDeletionAborted`. Siblings deleted before the decline stay
    /// deleted; there is no rollback.
    pub async fn delete(
        &self,
        name: &str,
        confirm: &dyn CascadeConfirmation,
    ) -> LaminaResult<()> {
        if !self.layer_dir(name).exists() {
            return Err(LaminaError::NotFound(name.to_string()));
        }

        // one index for the whole cascade instead of a scan per node
        let tree = LayerTree::build(self).await?;
        self.delete_subtree(name, &tree, confirm).await
    }

    fn delete_subtree<'a>(
        &'a self,
        name: &'a str,
        tree: &'a LayerTree,
        confirm: &'a dyn CascadeConfirmation,
    ) -> BoxFuture<'a, LaminaResult<()>> {
        async move {
            let children = tree.children(name);
            if !children.is_empty() {
                if !confirm.confirm(name, children.len()).await? {
                    return Err(LaminaError::UserAborted(name.to_string()));
                }
                for child in children {
                    self.delete_subtree(child, tree, confirm)
                        .await
                        .map_err(|e| match e {
                            LaminaError::UserAborted(_)
                            | LaminaError::ChildDeletionAborted { .. } => {
                                LaminaError::ChildDeletionAborted {
                                    parent: name.to_string(),
                                    child: child.clone(),
                                }
                            }
                            other => other,
                        })?;
                }
            }
            self.remove_layer(name).await
        }
        .boxed()
    }

    async fn remove_layer(&self, name: &str) -> LaminaResult<()> {
        let layer_dir = self.layer_dir(name);
        fs::remove_dir_all(&layer_dir)
            .await
            .map_err(|e| LaminaError::io(format!("removing layer dir {}", layer_dir.display()), e))?;

        // orphaned directories (interrupted create) have no manifest
        let manifest_path = self.manifest_path(name);
        match fs::remove_file(&manifest_path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No manifest to remove for {}", name);
            }
            Err(e) => {
                return Err(LaminaError::io(
                    format!("removing manifest {}", manifest_path.display()),
                    e,
                ));
            }
        }

        info!("Deleted layer {}", name);
        Ok(())
    }

    /// Names of all layers in the store, sorted
    ///
    /// A layer is counted by its manifest file; content directories without
    /// one are ignored.
    pub async fn layer_names(&self) -> LaminaResult<Vec<String>> {
        let mut entries = match fs::read_dir(&self.layers_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(LaminaError::io(
                    format!("reading layers dir {}", self.layers_dir.display()),
                    e,
                ));
            }
        };

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| LaminaError::io("scanning layers dir", e))?
        {
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if let Some(name) = file_name.strip_suffix(MANIFEST_SUFFIX) {
                if !name.is_empty() {
                    names.push(name.to_string());
                }
            }
        }

        names.sort();
        Ok(names)
    }

    /// Build the parent→children forest over the current store contents
    pub async fn forest(&self) -> LaminaResult<LayerTree> {
        LayerTree::build(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::prompts::FixedAnswer;
    use std::collections::HashMap;

    /// Scripted confirmation: per-layer answers with a default
    struct AnswerByLayer {
        answers: HashMap<String, bool>,
        default: bool,
    }

    impl AnswerByLayer {
        fn new(default: bool, answers: &[(&str, bool)]) -> Self {
            Self {
                answers: answers
                    .iter()
                    .map(|(k, v)| (k.to_string(), *v))
                    .collect(),
                default,
            }
        }
    }

    #[async_trait]
    impl CascadeConfirmation for AnswerByLayer {
        async fn confirm(&self, layer: &str, _child_count: usize) -> LaminaResult<bool> {
            Ok(*self.answers.get(layer).unwrap_or(&self.default))
        }
    }

    fn temp_store() -> (tempfile::TempDir, LayerStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LayerStore::at(dir.path());
        (dir, store)
    }

    #[tokio::test]
    async fn create_root_writes_empty_manifest() {
        let (_dir, store) = temp_store();
        store.create("base", None).await.unwrap();

        assert!(store.layer_dir("base").is_dir());
        let manifest = store.read_manifest("base").await.unwrap();
        assert!(manifest.is_root());
        assert_eq!(
            std::fs::read_to_string(store.manifest_path("base")).unwrap(),
            ""
        );
    }

    #[tokio::test]
    async fn create_child_copies_parent_lineage_and_appends() {
        let (_dir, store) = temp_store();
        store.create("base", None).await.unwrap();
        store.create("app", Some("base")).await.unwrap();
        store.create("app-v2", Some("app")).await.unwrap();

        let app = store.read_manifest("app").await.unwrap();
        assert_eq!(app.ancestors(), ["base"]);

        let app_v2 = store.read_manifest("app-v2").await.unwrap();
        assert_eq!(app_v2.ancestors(), ["base", "app"]);
        assert_eq!(app_v2.ancestors().len(), app.ancestors().len() + 1);

        // child manifest is the parent's file plus one appended line
        let parent_text = std::fs::read_to_string(store.manifest_path("app")).unwrap();
        let child_text = std::fs::read_to_string(store.manifest_path("app-v2")).unwrap();
        assert_eq!(child_text, format!("{parent_text}app\n"));
    }

    #[tokio::test]
    async fn create_existing_fails_and_leaves_manifest_untouched() {
        let (_dir, store) = temp_store();
        store.create("base", None).await.unwrap();
        store.create("app", Some("base")).await.unwrap();
        let before = std::fs::read_to_string(store.manifest_path("app")).unwrap();

        let err = store.create("app", None).await.unwrap_err();
        assert!(matches!(err, LaminaError::AlreadyExists(name) if name == "app"));

        let after = std::fs::read_to_string(store.manifest_path("app")).unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn create_with_missing_parent_creates_nothing() {
        let (_dir, store) = temp_store();
        let err = store.create("app", Some("ghost")).await.unwrap_err();
        assert!(matches!(err, LaminaError::ParentMissing(name) if name == "ghost"));
        assert!(!store.layer_dir("app").exists());
        assert!(!store.manifest_path("app").exists());
    }

    #[tokio::test]
    async fn orphan_dir_is_not_a_valid_parent() {
        // a crash between dir creation and manifest write leaves this state
        let (_dir, store) = temp_store();
        std::fs::create_dir_all(store.layer_dir("broken")).unwrap();

        let err = store.create("app", Some("broken")).await.unwrap_err();
        assert!(matches!(err, LaminaError::ParentMissing(_)));
        assert!(!store.layer_names().await.unwrap().contains(&"broken".to_string()));
    }

    #[tokio::test]
    async fn delete_leaf_removes_dir_and_manifest() {
        let (_dir, store) = temp_store();
        store.create("base", None).await.unwrap();
        store.create("app", Some("base")).await.unwrap();

        store.delete("app", &FixedAnswer::no()).await.unwrap();

        assert!(!store.layer_dir("app").exists());
        assert!(!store.manifest_path("app").exists());
        assert_eq!(store.layer_names().await.unwrap(), ["base"]);
    }

    #[tokio::test]
    async fn delete_missing_layer_fails() {
        let (_dir, store) = temp_store();
        let err = store.delete("ghost", &FixedAnswer::yes()).await.unwrap_err();
        assert!(matches!(err, LaminaError::NotFound(name) if name == "ghost"));
    }

    #[tokio::test]
    async fn delete_cascade_removes_whole_subtree() {
        let (_dir, store) = temp_store();
        store.create("base", None).await.unwrap();
        store.create("app", Some("base")).await.unwrap();
        store.create("app-v2", Some("app")).await.unwrap();
        store.create("keep", None).await.unwrap();

        store.delete("base", &FixedAnswer::yes()).await.unwrap();

        assert_eq!(store.layer_names().await.unwrap(), ["keep"]);
        assert!(!store.layer_dir("base").exists());
        assert!(!store.layer_dir("app").exists());
        assert!(!store.layer_dir("app-v2").exists());
    }

    #[tokio::test]
    async fn delete_declined_at_top_removes_nothing() {
        let (_dir, store) = temp_store();
        store.create("base", None).await.unwrap();
        store.create("app", Some("base")).await.unwrap();

        let err = store.delete("base", &FixedAnswer::no()).await.unwrap_err();
        assert!(matches!(err, LaminaError::UserAborted(name) if name == "base"));
        assert_eq!(store.layer_names().await.unwrap(), ["app", "base"]);
    }

    #[tokio::test]
    async fn decline_mid_cascade_leaves_partial_tree() {
        // cascade order is name-sorted: alpha's subtree goes first, then the
        // decline on beta halts everything above it with no rollback
        let (_dir, store) = temp_store();
        store.create("base", None).await.unwrap();
        store.create("alpha", Some("base")).await.unwrap();
        store.create("alpha-v2", Some("alpha")).await.unwrap();
        store.create("beta", Some("base")).await.unwrap();
        store.create("beta-v2", Some("beta")).await.unwrap();

        let confirm = AnswerByLayer::new(true, &[("beta", false)]);
        let err = store.delete("base", &confirm).await.unwrap_err();
        assert!(matches!(
            err,
            LaminaError::ChildDeletionAborted { parent, child }
                if parent == "base" && child == "beta"
        ));

        // alpha's subtree is gone, base and beta's subtree remain
        assert_eq!(
            store.layer_names().await.unwrap(),
            ["base", "beta", "beta-v2"]
        );
    }

    #[tokio::test]
    async fn confirmation_not_asked_for_leaves() {
        struct Panics;

        #[async_trait]
        impl CascadeConfirmation for Panics {
            async fn confirm(&self, _layer: &str, _count: usize) -> LaminaResult<bool> {
                panic!("leaf deletion must not prompt");
            }
        }

        let (_dir, store) = temp_store();
        store.create("base", None).await.unwrap();
        store.delete("base", &Panics).await.unwrap();
    }

    #[tokio::test]
    async fn layer_names_empty_when_store_dir_missing() {
        let store = LayerStore::at("/nonexistent/lamina-layers");
        assert!(store.layer_names().await.unwrap().is_empty());
    }
}
