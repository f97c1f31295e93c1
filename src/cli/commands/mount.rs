//! Mount command - mount a layer's composed filesystem

use crate::cli::args::MountArgs;
use crate::config::Config;
use crate::error::LaminaResult;
use crate::mount::MountComposer;
use crate::store::LayerStore;

/// Execute the mount command
pub async fn execute(args: MountArgs, config: &Config) -> LaminaResult<()> {
    let store = LayerStore::new(config);
    let composer = MountComposer::new(&store, config);

    let mount_point = composer.mount(&args.name).await?;
    println!("{}", mount_point.display());

    Ok(())
}
