//! List command - show the layer forest

use crate::config::Config;
use crate::error::LaminaResult;
use crate::store::LayerStore;
use console::style;

/// Execute the list command
pub async fn execute(config: &Config) -> LaminaResult<()> {
    let store = LayerStore::new(config);
    let tree = store.forest().await?;

    if tree.is_empty() {
        println!("{}", style("No layers").dim());
        return Ok(());
    }

    print!("{}", tree.render());
    Ok(())
}
