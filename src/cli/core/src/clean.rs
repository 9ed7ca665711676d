/* src/cli/core/src/clean.rs */

// `assemble clean` command: removes the assembled package directory.

use std::path::Path;

use anyhow::Result;

use crate::files::{is_empty_dir, remove_dir};
use crate::paths::ProjectPaths;
use crate::ui;

#[derive(Debug, PartialEq, Eq)]
pub enum CleanOutcome {
  Removed,
  NothingToClean,
  Declined,
}

/// Delete the package directory once `confirm` agrees. `confirm` receives
/// the question to ask; `--yes` passes a closure that always agrees.
pub fn run_clean(
  paths: &ProjectPaths,
  confirm: impl FnOnce(&str) -> Result<bool>,
) -> Result<CleanOutcome> {
  let package = &paths.package;
  if is_missing_or_empty(package)? {
    ui::ok("nothing to clean");
    return Ok(CleanOutcome::NothingToClean);
  }

  if !confirm(&format!("Remove {}?", package.display()))? {
    return Ok(CleanOutcome::Declined);
  }

  remove_dir(package)?;
  ui::detail(&format!("deleted {}", package.display()));
  ui::ok("clean complete");
  Ok(CleanOutcome::Removed)
}

fn is_missing_or_empty(path: &Path) -> Result<bool> {
  if !path.exists() {
    return Ok(true);
  }
  is_empty_dir(path)
}
