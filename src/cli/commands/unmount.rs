//! Unmount command - unmount a layer's composed filesystem

use crate::cli::args::UnmountArgs;
use crate::config::Config;
use crate::error::LaminaResult;
use crate::mount::{ensure_root, MountComposer};
use crate::store::LayerStore;
use console::style;

/// Execute the unmount command
pub async fn execute(args: UnmountArgs, config: &Config) -> LaminaResult<()> {
    ensure_root()?;

    let store = LayerStore::new(config);
    let composer = MountComposer::new(&store, config);

    composer.unmount(&args.name).await?;

    println!(
        "{} Unmounted layer {}",
        style("✓").green(),
        style(&args.name).cyan()
    );

    Ok(())
}
