/* src/cli/core/src/build/launch.rs */

// Optional post-build stages: install production dependencies and start
// the assembled package in the foreground.

use anyhow::Result;

use super::BuildContext;
use crate::shell::{CommandSpec, RunOptions, run_command};

pub(super) fn install_dependencies(ctx: &BuildContext<'_>) -> Result<()> {
  let spec = CommandSpec::new("npm", &["install"], &ctx.paths.package);
  run_command(ctx.runner.as_ref(), &spec, &RunOptions::titled("Installing app dependencies"))?;
  Ok(())
}

/// Blocks until the server exits; a non-zero exit fails the build.
pub(super) fn start_server(ctx: &BuildContext<'_>) -> Result<()> {
  let spec = CommandSpec::new("node", &["index.js"], &ctx.paths.package);
  run_command(ctx.runner.as_ref(), &spec, &RunOptions::default().streaming())?;
  Ok(())
}
