/* src/cli/core/src/main.rs */

mod build;
mod clean;
mod config;
mod files;
mod pack;
mod paths;
mod progress;
mod prompt;
mod shell;
mod ui;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use build::BuildContext;
use clean::CleanOutcome;
use config::{AssembleConfig, find_assemble_config, load_assemble_config};
use paths::ProjectPaths;
use shell::SystemRunner;
use ui::{RED, RESET};

#[derive(Parser)]
#[command(name = "assemble", about = "Assemble a deployable Node server + client package")]
struct Cli {
  /// Log diagnostic detail to stderr (RUST_LOG takes precedence)
  #[arg(short, long, global = true)]
  verbose: bool,
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Build server and client, then assemble the package directory
  Build {
    /// Path to assemble.toml (auto-detected if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Install dependencies and start the package after building
    #[arg(long, conflicts_with = "no_run")]
    run: bool,
    /// Only build, even if build.run is set
    #[arg(long)]
    no_run: bool,
    /// Clear the terminal before starting
    #[arg(long)]
    clear: bool,
  },
  /// Zip the assembled package directory
  Pack {
    /// Path to assemble.toml (auto-detected if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Archive path (defaults to <package dir>.zip)
    #[arg(short, long)]
    out: Option<PathBuf>,
  },
  /// Remove the assembled package directory
  Clean {
    /// Path to assemble.toml (auto-detected if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Do not ask for confirmation
    #[arg(short, long)]
    yes: bool,
  },
}

fn init_tracing(verbose: bool) {
  let default_level = if verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
    )
    .with_writer(std::io::stderr)
    .with_target(false)
    .init();
}

/// Resolve config path (explicit or auto-detected) and parse it
fn resolve_config(explicit: Option<PathBuf>) -> Result<(PathBuf, AssembleConfig)> {
  let path = match explicit {
    Some(p) => p.canonicalize().with_context(|| format!("failed to resolve {}", p.display()))?,
    None => {
      let cwd = std::env::current_dir().context("failed to get cwd")?;
      find_assemble_config(&cwd)?
    }
  };
  let config = load_assemble_config(&path)?;
  tracing::debug!(config = %path.display(), "loaded config");
  Ok((path, config))
}

/// The project root is wherever assemble.toml lives.
fn project_root(config_path: &Path) -> &Path {
  config_path.parent().unwrap_or_else(|| Path::new("."))
}

/// Only `main` ends the process; everything below it returns errors.
fn exit_code<T>(result: &Result<T>) -> i32 {
  i32::from(result.is_err())
}

async fn run(command: Command) -> Result<()> {
  match command {
    Command::Build { config, run, no_run, clear } => {
      let (config_path, mut assemble_config) = resolve_config(config)?;
      if run {
        assemble_config.build.run = true;
      } else if no_run {
        assemble_config.build.run = false;
      }
      if clear {
        ui::clear_console();
      }
      ui::banner("build", &assemble_config.project.name);
      let paths = ProjectPaths::new(project_root(&config_path), &assemble_config);
      let ctx = BuildContext { config: &assemble_config, paths: &paths, runner: Arc::new(SystemRunner) };
      let report = build::run_build(&ctx).await?;
      tracing::debug!(stages = report.stages.len(), elapsed = ?report.elapsed, "build finished");
    }
    Command::Pack { config, out } => {
      let (config_path, assemble_config) = resolve_config(config)?;
      ui::banner("pack", &assemble_config.project.name);
      let paths = ProjectPaths::new(project_root(&config_path), &assemble_config);
      let out = match out {
        Some(p) if p.is_relative() => Some(std::env::current_dir().context("failed to get cwd")?.join(p)),
        other => other,
      };
      pack::run_pack(&paths, out.as_deref())?;
    }
    Command::Clean { config, yes } => {
      let (config_path, assemble_config) = resolve_config(config)?;
      ui::banner("clean", &assemble_config.project.name);
      let paths = ProjectPaths::new(project_root(&config_path), &assemble_config);
      let outcome =
        clean::run_clean(&paths, |question| if yes { Ok(true) } else { prompt::confirm(question, false) })?;
      if outcome == CleanOutcome::Declined {
        ui::log("Aborted.", None);
      }
    }
  }
  Ok(())
}

#[tokio::main]
async fn main() {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let result = run(cli.command).await;
  if let Err(e) = &result {
    eprintln!("{RED}error{RESET}: {e:#}");
  }
  std::process::exit(exit_code(&result));
}

#[cfg(test)]
mod tests {
  use clap::CommandFactory;

  use super::*;

  #[test]
  fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
  }

  #[test]
  fn build_flags_parse() {
    let cli = Cli::try_parse_from(["assemble", "build", "--run", "-c", "app/assemble.toml"]).unwrap();
    match cli.command {
      Command::Build { config, run, no_run, clear } => {
        assert_eq!(config, Some(PathBuf::from("app/assemble.toml")));
        assert!(run);
        assert!(!no_run);
        assert!(!clear);
      }
      _ => panic!("expected build"),
    }
  }

  #[test]
  fn run_and_no_run_conflict() {
    assert!(Cli::try_parse_from(["assemble", "build", "--run", "--no-run"]).is_err());
  }

  #[test]
  fn verbose_is_global() {
    let cli = Cli::try_parse_from(["assemble", "clean", "--yes", "-v"]).unwrap();
    assert!(cli.verbose);
    assert!(matches!(cli.command, Command::Clean { yes: true, .. }));
  }

  #[test]
  fn failures_map_to_exit_code_one() {
    assert_eq!(exit_code(&Ok(())), 0);
    let failed: Result<()> = Err(anyhow::anyhow!("server build failed"));
    assert_eq!(exit_code(&failed), 1);
  }

  #[test]
  fn project_root_is_config_directory() {
    assert_eq!(project_root(Path::new("/work/app/assemble.toml")), Path::new("/work/app"));
  }
}
