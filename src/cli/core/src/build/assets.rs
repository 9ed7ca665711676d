/* src/cli/core/src/build/assets.rs */

use anyhow::Result;

use super::BuildContext;
use crate::files::{copy_tree, ensure_empty_dir};
use crate::progress::with_progress;

/// Copy the server data folder (with a fresh, empty `config/`) and the
/// production entry point into the package.
pub(super) fn copy_assets(ctx: &BuildContext<'_>) -> Result<()> {
  with_progress("Copying data folder", || {
    let data = ctx.paths.package_relative("data");
    copy_tree(&ctx.paths.server_relative(&ctx.config.server.data), &data)?;
    // deployment-specific settings are never shipped
    ensure_empty_dir(&data.join("config"))?;
    copy_tree(
      &ctx.paths.project_relative(&ctx.config.paths.entry_point),
      &ctx.paths.package_relative("index.js"),
    )
  })
}
