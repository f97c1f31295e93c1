//! Union-mount composition
//!
//! Translates a layer's lineage into an ordered aufs branch list and drives
//! the external `mount`/`umount` tools. Mount state is not tracked anywhere;
//! the OS mount table is the only record.

pub mod chroot;

pub use chroot::ChrootSession;

use crate::config::Config;
use crate::error::{LaminaError, LaminaResult};
use crate::store::LayerStore;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::fs;
use tokio::process::Command;
use tracing::{debug, info};

/// Prefix for mount labels, keeping lamina mounts apart in the mount table
pub const MOUNT_LABEL_PREFIX: &str = "lamina-aufs-";

/// Access mode of a union-mount branch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchMode {
    /// Writable top branch
    ReadWrite,
    /// Read-only branch; deletions are captured as whiteouts above it
    ReadOnlyWhiteout,
}

impl BranchMode {
    /// The aufs permission flag for this mode
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReadWrite => "rw",
            Self::ReadOnlyWhiteout => "ro+wh",
        }
    }
}

impl fmt::Display for BranchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One branch of a union mount: a directory plus its access mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    /// Layer content directory backing this branch
    pub dir: PathBuf,
    /// Access mode
    pub mode: BranchMode,
}

impl Branch {
    /// The `dir=mode` fragment used in the aufs branch option
    pub fn spec(&self) -> String {
        format!("{}={}", self.dir.display(), self.mode)
    }
}

/// Composes and performs union mounts for layers in a store
pub struct MountComposer<'a> {
    store: &'a LayerStore,
    mounts_dir: PathBuf,
}

impl<'a> MountComposer<'a> {
    /// Create a composer over a store, with the configured mounts directory
    pub fn new(store: &'a LayerStore, config: &Config) -> Self {
        Self {
            store,
            mounts_dir: config.storage.mounts_dir.clone(),
        }
    }

    /// Create a composer with an explicit mounts directory
    pub fn at(store: &'a LayerStore, mounts_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            mounts_dir: mounts_dir.into(),
        }
    }

    /// Mount label for a layer; unique system-wide per layer name
    pub fn mount_label(name: &str) -> String {
        format!("{MOUNT_LABEL_PREFIX}{name}")
    }

    /// Mount point directory for a layer
    pub fn mount_point(&self, name: &str) -> PathBuf {
        self.mounts_dir.join(name)
    }

    /// Branch list for a layer in final mount order: the layer's own
    /// directory writable on top, then its ancestors nearest-first, each
    /// read-only with whiteouts.
    pub async fn branches(&self, name: &str) -> LaminaResult<Vec<Branch>> {
        let manifest = self.store.read_manifest(name).await?;

        let mut branches: Vec<Branch> = manifest
            .ancestors()
            .iter()
            .map(|ancestor| Branch {
                dir: self.store.layer_dir(ancestor),
                mode: BranchMode::ReadOnlyWhiteout,
            })
            .collect();
        branches.push(Branch {
            dir: self.store.layer_dir(name),
            mode: BranchMode::ReadWrite,
        });

        // manifests are root-first; aufs wants highest-priority branch first
        branches.reverse();
        Ok(branches)
    }

    /// The aufs `-o` option string for a branch list
    pub fn branch_option(branches: &[Branch]) -> String {
        let specs: Vec<String> = branches.iter().map(Branch::spec).collect();
        format!("br:{}", specs.join(":"))
    }

    /// Mount a layer's composed filesystem and return the mount point
    pub async fn mount(&self, name: &str) -> LaminaResult<PathBuf> {
        let branches = self.branches(name).await?;
        ensure_root()?;

        let mount_point = self.mount_point(name);
        fs::create_dir_all(&mount_point).await.map_err(|e| {
            LaminaError::io(format!("creating mount point {}", mount_point.display()), e)
        })?;

        let option = Self::branch_option(&branches);
        let label = Self::mount_label(name);
        debug!("mount -t aufs -o {} {} {}", option, label, mount_point.display());

        let output = Command::new("mount")
            .args(["-t", "aufs", "-o", &option, &label])
            .arg(&mount_point)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| LaminaError::command_failed("mount", e))?;

        if !output.status.success() {
            return Err(LaminaError::MountFailure {
                name: name.to_string(),
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        info!("Mounted layer {} at {}", name, mount_point.display());
        Ok(mount_point)
    }

    /// Unmount a layer by its label
    ///
    /// Unmounting something that is not mounted is left to the OS to
    /// reject. No privilege check here: teardown paths call this after
    /// privileged work has already happened, the CLI gates on root itself.
    pub async fn unmount(&self, name: &str) -> LaminaResult<()> {
        let label = Self::mount_label(name);
        debug!("umount {}", label);

        let output = Command::new("umount")
            .arg(&label)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| LaminaError::command_failed("umount", e))?;

        if !output.status.success() {
            return Err(LaminaError::UnmountFailure {
                name: name.to_string(),
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        info!("Unmounted layer {}", name);
        Ok(())
    }
}

/// Detach a mount by target path, used for bind-mounted pseudo-filesystems
pub(crate) async fn unmount_path(target: &Path) -> LaminaResult<()> {
    let output = Command::new("umount")
        .arg(target)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| LaminaError::command_failed("umount", e))?;

    if !output.status.success() {
        return Err(LaminaError::UnmountFailure {
            name: target.display().to_string(),
            reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}

/// Mount operations need CAP_SYS_ADMIN; require a root effective uid
pub(crate) fn ensure_root() -> LaminaResult<()> {
    // SAFETY: geteuid is always safe to call
    if unsafe { libc::geteuid() } != 0 {
        return Err(LaminaError::RootRequired);
    }
    Ok(())
}
