/* src/cli/core/src/build/server.rs */

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use serde_json::{Value, json};

use super::BuildContext;
use crate::files::{copy_tree, read_json_file, write_json_file};
use crate::paths::ProjectPaths;
use crate::progress::{with_progress, with_progress_async};
use crate::shell::{CommandSpec, RunOptions, program_of, run_command};

/// Absolute path of the module the bundler should start from.
pub const ENTRY_ENV: &str = "ASSEMBLE_SERVER_ENTRY";
/// Absolute path the bundler is expected to write its output to.
pub const BUNDLE_ENV: &str = "ASSEMBLE_SERVER_BUNDLE";

/// Compile (TypeScript only), bundle, then copy the bundle and a
/// dependencies-only package.json into the package directory.
pub(super) async fn build_server(ctx: &BuildContext<'_>) -> Result<()> {
  let server = &ctx.config.server;

  if server.lang.needs_compile() {
    let program = program_of(&server.compile_command);
    if !ctx.runner.exists(program) {
      bail!("`{program}` not found on PATH -- install it or set server.compile_command");
    }
    let spec = CommandSpec::shell(&server.compile_command, &ctx.paths.server);
    run_command(ctx.runner.as_ref(), &spec, &RunOptions::titled("Compiling TypeScript"))?;
  }

  let entry = server_entry(ctx);
  let bundle = ctx.paths.server_relative(&server.bundle);
  let spec = CommandSpec::shell(&server.bundler_command, &ctx.paths.server)
    .env(ENTRY_ENV, &entry.to_string_lossy())
    .env(BUNDLE_ENV, &bundle.to_string_lossy());
  let runner = Arc::clone(&ctx.runner);
  with_progress_async("Transpiling JavaScript", async move {
    let outcome = tokio::task::spawn_blocking(move || {
      runner.execute(&spec, false).and_then(|outcome| outcome.check(&spec))
    })
    .await
    .context("bundler task panicked")??;
    tracing::debug!(status = ?outcome.status, "bundler finished");
    anyhow::Ok(())
  })
  .await?;

  with_progress("Copying assets", || {
    copy_tree(&bundle, &ctx.paths.package_relative("server/server.js"))?;
    write_package_manifest(ctx.paths)
  })
}

/// Compiled TypeScript lands under `server.build`; plain JavaScript is bundled in place.
fn server_entry(ctx: &BuildContext<'_>) -> PathBuf {
  let server = &ctx.config.server;
  let module = format!("{}.js", server.entry);
  if server.lang.needs_compile() {
    ctx.paths.server_relative(&server.build).join(module)
  } else {
    ctx.paths.server_relative(module)
  }
}

/// The deployed package only needs to know what to install.
fn write_package_manifest(paths: &ProjectPaths) -> Result<()> {
  let server_manifest = read_json_file(&paths.server_relative("package.json"))?;
  let dependencies = server_manifest.get("dependencies").cloned().unwrap_or_else(|| json!({}));
  let manifest: Value = json!({ "dependencies": dependencies });
  write_json_file(&paths.package_relative("package.json"), &manifest)
}
