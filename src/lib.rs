//! Lamina - layered copy-on-write filesystems for bare metal
//!
//! Manages named, parent-linked filesystem layers and composes a layer's
//! lineage into one aufs union mount, with an optional chroot session on top.

pub mod cli;
pub mod config;
pub mod error;
pub mod mount;
pub mod store;
pub mod ui;

pub use error::{LaminaError, LaminaResult};
