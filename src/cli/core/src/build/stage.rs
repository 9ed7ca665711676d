/* src/cli/core/src/build/stage.rs */

// Sequential stage driver: runs named stages one at a time and stops at the
// first failure. Adding a stage never touches this control flow.

use std::future::Future;

use anyhow::{Context, Result};
use futures_util::future::BoxFuture;

use crate::ui;

pub type BlockingAction<'a> = Box<dyn FnOnce() -> Result<()> + Send + 'a>;

pub enum StageAction<'a> {
  /// Runs on the driver's thread; the driver waits for it to return.
  Blocking(BlockingAction<'a>),
  /// Awaited to completion before the next stage starts.
  Deferred(BoxFuture<'a, Result<()>>),
}

pub struct Stage<'a> {
  pub title: &'static str,
  pub action: StageAction<'a>,
}

impl<'a> Stage<'a> {
  pub fn blocking(title: &'static str, action: impl FnOnce() -> Result<()> + Send + 'a) -> Self {
    Self { title, action: StageAction::Blocking(Box::new(action)) }
  }

  pub fn deferred(title: &'static str, action: impl Future<Output = Result<()>> + Send + 'a) -> Self {
    Self { title, action: StageAction::Deferred(Box::pin(action)) }
  }
}

/// `[n/total]` numbering shared by every batch of stages in one run.
#[derive(Debug)]
pub struct Steps {
  started: usize,
  total: usize,
}

impl Steps {
  pub fn new(total: usize) -> Self {
    Self { started: 0, total }
  }

  #[cfg(test)]
  pub fn started(&self) -> usize {
    self.started
  }

  fn next(&mut self) -> usize {
    self.started += 1;
    self.started
  }
}

/// Run `stages` in order. Returns the titles of every stage that completed;
/// the first error aborts the rest and is returned with the stage title attached.
pub async fn run_stages(stages: Vec<Stage<'_>>, steps: &mut Steps) -> Result<Vec<&'static str>> {
  let mut completed = Vec::with_capacity(stages.len());
  for stage in stages {
    let n = steps.next();
    ui::step(n, steps.total, stage.title);
    tracing::debug!(stage = stage.title, n, "stage started");
    let result = match stage.action {
      StageAction::Blocking(action) => action(),
      StageAction::Deferred(action) => action.await,
    };
    result.with_context(|| format!("{} failed", stage.title.to_lowercase()))?;
    tracing::debug!(stage = stage.title, "stage finished");
    completed.push(stage.title);
    ui::blank();
  }
  Ok(completed)
}
