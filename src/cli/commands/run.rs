//! Run command - execute a command inside a chroot of a mounted layer

use crate::cli::args::RunArgs;
use crate::config::Config;
use crate::error::{LaminaError, LaminaResult};
use crate::mount::{ChrootSession, MountComposer};
use crate::store::LayerStore;
use tracing::info;

/// Execute the run command
pub async fn execute(args: RunArgs, config: &Config) -> LaminaResult<()> {
    let (command, command_args) = args
        .command
        .split_first()
        .ok_or_else(|| LaminaError::User("No command given".to_string()))?;

    let store = LayerStore::new(config);
    let composer = MountComposer::new(&store, config);
    let session = ChrootSession::new(&composer);

    let code = session.run(&args.name, command, command_args).await?;
    info!("Command in layer {} exited with code {}", args.name, code);

    Ok(())
}
