//! Create command - create a new layer

use crate::cli::args::CreateArgs;
use crate::config::Config;
use crate::error::LaminaResult;
use crate::store::LayerStore;
use console::style;

/// Execute the create command
pub async fn execute(args: CreateArgs, config: &Config) -> LaminaResult<()> {
    let store = LayerStore::new(config);
    store.create(&args.name, args.parent.as_deref()).await?;

    match args.parent {
        Some(parent) => println!(
            "{} Created layer {} on top of {}",
            style("✓").green(),
            style(&args.name).cyan(),
            style(parent).cyan()
        ),
        None => println!(
            "{} Created root layer {}",
            style("✓").green(),
            style(&args.name).cyan()
        ),
    }

    Ok(())
}
