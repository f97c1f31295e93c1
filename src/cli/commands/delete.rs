//! Delete command - delete a layer and its descendants

use crate::cli::args::DeleteArgs;
use crate::config::Config;
use crate::error::LaminaResult;
use crate::store::LayerStore;
use crate::ui::{PromptConfirmation, UiContext};
use console::style;

/// Execute the delete command
pub async fn execute(args: DeleteArgs, config: &Config) -> LaminaResult<()> {
    let store = LayerStore::new(config);
    let confirm = PromptConfirmation::new(UiContext::detect().with_auto_yes(args.yes));

    store.delete(&args.name, &confirm).await?;

    println!(
        "{} Deleted layer {}",
        style("✓").green(),
        style(&args.name).cyan()
    );

    Ok(())
}
