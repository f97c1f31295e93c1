//! Confirmation prompts and `CascadeConfirmation` implementations

use crate::error::{LaminaError, LaminaResult};
use crate::store::CascadeConfirmation;
use crate::ui::context::UiContext;
use async_trait::async_trait;

/// Prompt for confirmation, returns default if non-interactive or auto-yes
pub async fn confirm(ctx: &UiContext, message: &str, default: bool) -> LaminaResult<bool> {
    // Auto-yes mode bypasses prompts
    if ctx.auto_yes() {
        println!("  {} (auto-approved)", message);
        return Ok(true);
    }

    // Non-interactive mode returns default
    if !ctx.is_interactive() {
        return Ok(default);
    }

    // Run blocking cliclack prompt in spawn_blocking
    let message = message.to_string();
    let result = tokio::task::spawn_blocking(move || {
        cliclack::confirm(&message)
            .initial_value(default)
            .interact()
    })
    .await
    .map_err(|e| LaminaError::User(format!("Prompt task failed: {}", e)))?;

    result.map_err(|e| LaminaError::User(format!("Prompt failed: {}", e)))
}

/// Cascade confirmation backed by an interactive prompt
///
/// Declines by default when no terminal is attached, so scripted deletes of
/// layers with children require an explicit --yes.
pub struct PromptConfirmation {
    ctx: UiContext,
}

impl PromptConfirmation {
    /// Create a prompt-backed confirmation over a UI context
    pub fn new(ctx: UiContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl CascadeConfirmation for PromptConfirmation {
    async fn confirm(&self, layer: &str, child_count: usize) -> LaminaResult<bool> {
        let message = format!(
            "Layer {layer} has {child_count} child layer(s). Delete them all?"
        );
        confirm(&self.ctx, &message, false).await
    }
}

/// Fixed-answer cascade confirmation for deterministic, prompt-free use
pub struct FixedAnswer {
    answer: bool,
}

impl FixedAnswer {
    /// Approve every cascade
    pub fn yes() -> Self {
        Self { answer: true }
    }

    /// Decline every cascade
    pub fn no() -> Self {
        Self { answer: false }
    }
}

#[async_trait]
impl CascadeConfirmation for FixedAnswer {
    async fn confirm(&self, _layer: &str, _child_count: usize) -> LaminaResult<bool> {
        Ok(self.answer)
    }
}
