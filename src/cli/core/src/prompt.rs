/* src/cli/core/src/prompt.rs */

use anyhow::{Context, Result};
use dialoguer::Confirm;
use dialoguer::theme::ColorfulTheme;

/// Ask a yes/no question. An empty answer takes `default_yes`.
pub fn confirm(question: &str, default_yes: bool) -> Result<bool> {
  Confirm::with_theme(&ColorfulTheme::default())
    .with_prompt(question)
    .default(default_yes)
    .show_default(true)
    .interact()
    .context("failed to read answer from terminal")
}
