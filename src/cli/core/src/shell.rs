/* src/cli/core/src/shell.rs */

// Subprocess invocation shared by every build stage.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Instant;

use anyhow::{Context, Result};

use crate::progress::{report_done, report_failed};
use crate::ui::{self, DIM, RESET};

/// Runtime-mode variable blanked for every child so tools pick their own mode.
const RUNTIME_MODE_VAR: &str = "NODE_ENV";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
  pub program: String,
  pub args: Vec<String>,
  pub cwd: PathBuf,
  pub env: Vec<(String, String)>,
}

impl CommandSpec {
  /// Spawn `program` directly, resolved through PATH.
  pub fn new(program: &str, args: &[&str], cwd: &Path) -> Self {
    Self {
      program: program.to_string(),
      args: args.iter().map(|a| (*a).to_string()).collect(),
      cwd: cwd.to_path_buf(),
      env: Vec::new(),
    }
  }

  /// Run a user-configured command line through `sh -c`.
  pub fn shell(command: &str, cwd: &Path) -> Self {
    Self::new("sh", &["-c", command], cwd)
  }

  pub fn env(mut self, key: &str, value: &str) -> Self {
    self.env.push((key.to_string(), value.to_string()));
    self
  }

  /// Human-readable command line; `sh -c` wrappers show only the inner command.
  pub fn display(&self) -> String {
    match self.args.as_slice() {
      [flag, inner] if self.program == "sh" && flag == "-c" => inner.clone(),
      _ if self.args.is_empty() => self.program.clone(),
      _ => format!("{} {}", self.program, self.args.join(" ")),
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
  pub title: Option<String>,
  pub ignore_failure: bool,
  pub stream_output: bool,
}

impl RunOptions {
  pub fn titled(title: &str) -> Self {
    Self { title: Some(title.to_string()), ..Self::default() }
  }

  pub fn streaming(mut self) -> Self {
    self.stream_output = true;
    self
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
  /// `None` when the child was terminated by a signal.
  pub status: Option<i32>,
  pub stderr: String,
}

impl CommandOutcome {
  pub fn success(&self) -> bool {
    self.status == Some(0)
  }

  /// Turn a non-zero exit into a `CommandFailed` error.
  pub fn check(self, spec: &CommandSpec) -> Result<Self> {
    if self.success() {
      return Ok(self);
    }
    Err(CommandFailed { command: spec.display(), status: self.status, stderr: self.stderr }.into())
  }
}

#[derive(Debug, thiserror::Error)]
#[error("`{command}` exited with {}", describe_status(.status))]
pub struct CommandFailed {
  pub command: String,
  pub status: Option<i32>,
  pub stderr: String,
}

fn describe_status(status: &Option<i32>) -> String {
  match status {
    Some(code) => format!("status {code}"),
    None => "a signal".to_string(),
  }
}

/// Executes a fully described command and reports how it ended.
/// Spawn errors are `Err`; a non-zero exit is a normal `CommandOutcome`.
pub trait CommandRunner: Send + Sync {
  fn execute(&self, spec: &CommandSpec, stream_output: bool) -> Result<CommandOutcome>;

  fn exists(&self, program: &str) -> bool {
    which_exists(program)
  }
}

/// Runs real processes, blocking until they exit.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
  fn execute(&self, spec: &CommandSpec, stream_output: bool) -> Result<CommandOutcome> {
    tracing::debug!(command = %spec.display(), cwd = %spec.cwd.display(), stream_output, "spawning");
    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args);
    cmd.current_dir(&spec.cwd);
    cmd.env(RUNTIME_MODE_VAR, "");
    for (k, v) in &spec.env {
      cmd.env(k, v);
    }
    cmd.stdin(Stdio::null());
    if stream_output {
      cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
    } else {
      cmd.stdout(Stdio::null()).stderr(Stdio::piped());
    }

    let output =
      cmd.output().with_context(|| format!("failed to run {}", spec.display()))?;
    tracing::debug!(command = %spec.display(), status = ?output.status.code(), "exited");
    Ok(CommandOutcome {
      status: output.status.code(),
      stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
  }
}

/// Run a command, printing "<title>... done in ..." when titled.
/// A non-zero exit becomes a `CommandFailed` error unless `ignore_failure` is set.
pub fn run_command(
  runner: &dyn CommandRunner,
  spec: &CommandSpec,
  options: &RunOptions,
) -> Result<CommandOutcome> {
  let streaming = options.stream_output;
  if let Some(title) = &options.title {
    if streaming {
      println!("{title}... ");
    } else {
      ui::inline(&format!("{title}... "));
    }
  } else {
    ui::detail(&format!("{DIM}{}{RESET}", spec.display()));
  }

  let started = Instant::now();
  let outcome = runner.execute(spec, streaming);
  let outcome = match outcome {
    Ok(o) => o,
    Err(e) => {
      if options.title.is_some() {
        report_failed(streaming);
      }
      return Err(e);
    }
  };

  if outcome.success() {
    if options.title.is_some() {
      report_done(started.elapsed(), streaming);
    }
    return Ok(outcome);
  }

  if options.title.is_some() {
    report_failed(streaming);
    if !streaming && !outcome.stderr.is_empty() {
      println!("{}", outcome.stderr);
    }
  }
  if options.ignore_failure {
    tracing::debug!(command = %spec.display(), status = ?outcome.status, "failure ignored");
    return Ok(outcome);
  }
  outcome.check(spec)
}

/// First word of a shell command line, used for PATH checks.
pub fn program_of(command: &str) -> &str {
  command.split_whitespace().next().unwrap_or(command)
}

/// Check if a command exists on PATH.
pub fn which_exists(cmd: &str) -> bool {
  Command::new("which")
    .arg(cmd)
    .stdout(Stdio::null())
    .stderr(Stdio::null())
    .status()
    .map(|s| s.success())
    .unwrap_or(false)
}
