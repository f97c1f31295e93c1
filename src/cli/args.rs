//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Lamina - layered copy-on-write filesystems for bare metal
///
/// Creates and deploys overlaid filesystems to bare metal devices, similar
/// to how Docker images work for containers.
#[derive(Parser, Debug)]
#[command(name = "lamina")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "LAMINA_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new layer, optionally on top of a parent layer
    Create(CreateArgs),

    /// Delete a layer and, with confirmation, all of its descendants
    Delete(DeleteArgs),

    /// List all layers as a forest
    List,

    /// Mount a layer's composed filesystem and print the mount point
    Mount(MountArgs),

    /// Unmount a layer's composed filesystem
    Unmount(UnmountArgs),

    /// Run a command inside a chroot of a mounted layer
    Run(RunArgs),
}

/// Arguments for the create command
#[derive(Parser, Debug)]
pub struct CreateArgs {
    /// Layer name to create
    pub name: String,

    /// Parent layer to build on (omit for a new root layer)
    #[arg(short, long)]
    pub parent: Option<String>,
}

/// Arguments for the delete command
#[derive(Parser, Debug)]
pub struct DeleteArgs {
    /// Layer name to delete
    pub name: String,

    /// Auto-approve cascading deletion of child layers
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the mount command
#[derive(Parser, Debug)]
pub struct MountArgs {
    /// Layer name to mount
    pub name: String,
}

/// Arguments for the unmount command
#[derive(Parser, Debug)]
pub struct UnmountArgs {
    /// Layer name to unmount
    pub name: String,
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Layer name to run inside
    pub name: String,

    /// Command and arguments to run inside the chroot
    #[arg(last = true, required = true)]
    pub command: Vec<String>,
}
