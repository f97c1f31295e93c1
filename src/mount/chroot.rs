//! Chroot sessions on top of mounted layers
//!
//! Builds the execution environment for `lamina run`: union mount, bind the
//! host pseudo-filesystems into it, chroot-execute one command, tear down.

use crate::error::{LaminaError, LaminaResult};
use crate::mount::{unmount_path, MountComposer};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

/// Host pseudo-filesystems bind-mounted into every chroot environment
pub const BIND_DIRS: [&str; 3] = ["proc", "sys", "dev"];

/// One-shot chroot execution environment over a mounted layer
///
/// Per-layer mount lifecycle is strictly unmounted → mounted → unmounted;
/// nothing guards against concurrent sessions on the same layer.
pub struct ChrootSession<'a> {
    composer: &'a MountComposer<'a>,
}

impl<'a> ChrootSession<'a> {
    /// Create a session over a mount composer
    pub fn new(composer: &'a MountComposer<'a>) -> Self {
        Self { composer }
    }

    /// Mount the layer and bind /proc, /sys and /dev into it
    ///
    /// A failure while binding rolls the environment back (binds made so
    /// far detached, layer unmounted) before the error surfaces, so a
    /// half-prepared session never stays in the mount table.
    pub async fn prepare(&self, name: &str) -> LaminaResult<PathBuf> {
        let mount_point = self.composer.mount(name).await?;
        self.bind_pseudo_filesystems(name, &mount_point).await?;
        Ok(mount_point)
    }

    async fn bind_pseudo_filesystems(
        &self,
        name: &str,
        mount_point: &Path,
    ) -> LaminaResult<()> {
        let mut bound: Vec<PathBuf> = Vec::new();

        for dir in BIND_DIRS {
            let target = mount_point.join(dir);
            debug!("mount --bind /{} {}", dir, target.display());

            let result = Command::new("mount")
                .arg("--bind")
                .arg(format!("/{dir}"))
                .arg(&target)
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .output()
                .await;

            let failure = match result {
                Ok(output) if output.status.success() => None,
                Ok(output) => Some(LaminaError::MountFailure {
                    name: name.to_string(),
                    reason: format!(
                        "bind-mounting /{dir}: {}",
                        String::from_utf8_lossy(&output.stderr).trim()
                    ),
                }),
                Err(e) => Some(LaminaError::command_failed("mount --bind", e)),
            };

            if let Some(err) = failure {
                self.rollback(name, &bound).await;
                return Err(err);
            }
            bound.push(target);
        }

        Ok(())
    }

    /// Undo a partial prepare: detach the binds made so far, then unmount
    /// the layer. Best-effort; failures are logged, the original error wins.
    async fn rollback(&self, name: &str, bound: &[PathBuf]) {
        self.detach(bound).await;
        if let Err(e) = self.composer.unmount(name).await {
            warn!("Failed to unmount layer {} during rollback: {}", name, e);
        }
    }

    /// Detach bind targets in reverse bind order, logging failures
    async fn detach(&self, targets: &[PathBuf]) {
        for target in targets.iter().rev() {
            if let Err(e) = unmount_path(target).await {
                warn!("Failed to detach {}: {}", target.display(), e);
            }
        }
    }

    /// Prepare the environment, run one command inside it, then clean up
    ///
    /// The command's exit status is logged but not interpreted; it is
    /// returned as-is to the caller.
    pub async fn run(&self, name: &str, command: &str, args: &[String]) -> LaminaResult<i32> {
        let mount_point = self.prepare(name).await?;

        debug!(
            "chroot {} {} {:?}",
            mount_point.display(),
            command,
            args
        );

        let status = Command::new("chroot")
            .arg(&mount_point)
            .arg(command)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await;

        let status = match status {
            Ok(status) => status,
            Err(e) => {
                // tear the environment down even when the command never ran
                if let Err(cleanup_err) = self.cleanup(name).await {
                    warn!("Cleanup after failed chroot also failed: {}", cleanup_err);
                }
                return Err(LaminaError::command_failed(format!("chroot {command}"), e));
            }
        };

        debug!("chroot command exited with {}", status);
        self.cleanup(name).await?;
        Ok(status.code().unwrap_or(-1))
    }

    /// Detach the bind mounts, then unmount the layer
    ///
    /// The pseudo-filesystems are unmounted individually (reverse bind
    /// order) rather than left to the top-level teardown, so a failure
    /// there cannot leak a lingering /proc, /sys or /dev bind. Individual
    /// failures are logged and do not stop the top-level unmount.
    pub async fn cleanup(&self, name: &str) -> LaminaResult<()> {
        let mount_point = self.composer.mount_point(name);
        let targets: Vec<PathBuf> = BIND_DIRS
            .iter()
            .map(|dir| mount_point.join(dir))
            .collect();

        self.detach(&targets).await;
        self.composer.unmount(name).await
    }
}
