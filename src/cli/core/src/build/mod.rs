/* src/cli/core/src/build/mod.rs */

// Build orchestrator: empties the package dir, builds server and client,
// copies assets, then optionally installs and starts the package.

mod assets;
mod client;
mod launch;
mod server;
pub mod stage;


use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::config::AssembleConfig;
use crate::files::ensure_empty_dir;
use crate::paths::ProjectPaths;
use crate::progress::format_interval;
use crate::shell::CommandRunner;
use crate::ui::{self, CYAN, GREEN, RESET};
use stage::{Stage, Steps, run_stages};

pub const BUILD_DONE: &str = "Build package was crated!";

/// Everything a stage needs. Shared by reference across the whole run.
pub struct BuildContext<'a> {
  pub config: &'a AssembleConfig,
  pub paths: &'a ProjectPaths,
  pub runner: Arc<dyn CommandRunner>,
}

#[derive(Debug)]
pub struct BuildReport {
  /// Titles of the stages that ran, in order.
  pub stages: Vec<&'static str>,
  /// Time from start until the package was assembled (excludes install/run).
  pub elapsed: Duration,
}

pub async fn run_build(ctx: &BuildContext<'_>) -> Result<BuildReport> {
  let started = Instant::now();
  ui::log(&format!("Build project in {CYAN}{}{RESET}.", ctx.paths.root.display()), None);
  ui::blank();

  let stages = vec![
    Stage::blocking("Preparing package directory", || ensure_empty_dir(&ctx.paths.package)),
    Stage::deferred("Server build", server::build_server(ctx)),
    Stage::blocking("Client build", || client::build_client(ctx)),
    Stage::blocking("Post build", || assets::copy_assets(ctx)),
  ];
  let mut after = Vec::new();
  if ctx.config.needs_install() {
    after.push(Stage::blocking("Installing dependencies", || launch::install_dependencies(ctx)));
  }
  if ctx.config.build.run {
    after.push(Stage::blocking("Starting server", || launch::start_server(ctx)));
  }

  let mut steps = Steps::new(stages.len() + after.len());
  let mut completed = run_stages(stages, &mut steps).await?;

  let elapsed = started.elapsed();
  for line in completion_lines(elapsed) {
    ui::log(&line, None);
  }

  if !after.is_empty() {
    ui::blank();
    completed.extend(run_stages(after, &mut steps).await?);
  }

  Ok(BuildReport { stages: completed, elapsed })
}

/// Printed once the package directory is complete.
fn completion_lines(elapsed: Duration) -> [String; 2] {
  [
    format!("{GREEN}{BUILD_DONE}{RESET}"),
    format!("Compilation time: {CYAN}{}{RESET}.", format_interval(elapsed)),
  ]
}
