/* src/cli/core/src/build/client.rs */

use anyhow::Result;

use super::BuildContext;
use crate::files::{copy_tree, remove_files_with_suffix};
use crate::progress::with_progress;
use crate::shell::{CommandSpec, RunOptions, run_command};

pub const MAP_FILE_SUFFIX: &str = ".map";

/// Run the client's own build, then copy its output into `package/client`.
pub(super) fn build_client(ctx: &BuildContext<'_>) -> Result<()> {
  let spec = CommandSpec::shell(&ctx.config.client.build_command, &ctx.paths.client);
  run_command(ctx.runner.as_ref(), &spec, &RunOptions::titled("Build client"))?;

  with_progress("Copying assets", || {
    let dest = ctx.paths.package_relative("client");
    copy_tree(&ctx.paths.client_relative(&ctx.config.client.build), &dest)?;
    if ctx.config.build.remove_map_files {
      let removed = remove_files_with_suffix(&dest, MAP_FILE_SUFFIX)?;
      tracing::debug!(removed, "stripped source maps");
    }
    Ok(())
  })
}
