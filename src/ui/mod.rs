//! Interactive prompts with CI/non-interactive fallback
//!
//! Uses `cliclack` for confirmation prompts and falls back to fixed answers
//! when stdin/stdout are not terminals, so cascading deletes never hang in
//! scripts or CI.

pub mod context;
pub mod prompts;

pub use context::UiContext;
pub use prompts::{confirm, FixedAnswer, PromptConfirmation};
