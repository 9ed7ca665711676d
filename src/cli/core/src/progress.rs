/* src/cli/core/src/progress.rs */

// "Title... done in 00.42 seconds." reporting around a unit of work.

use std::future::Future;
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::shell::CommandFailed;
use crate::ui::{self, CYAN, GREEN, RED, RESET};

/// What `format_interval` yields for work that finished in under 10ms.
const INSTANT: &str = "00.00 seconds";

/// `HH:MM:SS` once a whole minute has elapsed, `SS.ss seconds` below that.
pub fn format_interval(elapsed: Duration) -> String {
  let total = elapsed.as_secs();
  if total >= 60 {
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
  } else {
    let hundredths = elapsed.as_millis() / 10;
    format!("{:02}.{:02} seconds", hundredths / 100, hundredths % 100)
  }
}

/// Success line. `streaming` commands had their own output in between,
/// so they get a full sentence instead of a trailing "done".
pub fn done_message(elapsed: Duration, streaming: bool) -> String {
  let msg = if streaming { "Operation completed" } else { "done" };
  let run_time = format_interval(elapsed);
  if run_time == INSTANT {
    format!("{GREEN}{msg}{RESET}")
  } else {
    format!("{GREEN}{msg}{RESET} in {CYAN}{run_time}{RESET}.")
  }
}

pub fn failed_message(streaming: bool) -> String {
  let msg = if streaming { "Operation failed." } else { "operation failed." };
  format!("{RED}{msg}{RESET}")
}

pub fn report_done(elapsed: Duration, streaming: bool) {
  ui::log(&done_message(elapsed, streaming), None);
}

pub fn report_failed(streaming: bool) {
  ui::log(&failed_message(streaming), None);
}

/// Run a blocking operation between a title and its outcome line.
pub fn with_progress<T>(title: &str, operation: impl FnOnce() -> Result<T>) -> Result<T> {
  ui::inline(&format!("{title}... "));
  let started = Instant::now();
  match operation() {
    Ok(value) => {
      report_done(started.elapsed(), false);
      Ok(value)
    }
    Err(e) => {
      report_failed(false);
      Err(e)
    }
  }
}

/// Deferred form of [`with_progress`]: the title is printed immediately and
/// the outcome once `operation` settles. Failures also print the fault detail:
/// the tool's stderr for a failed command, the error chain otherwise.
pub async fn with_progress_async<T, F>(title: &str, operation: F) -> Result<T>
where
  F: Future<Output = Result<T>>,
{
  ui::inline(&format!("{title}... "));
  let started = Instant::now();
  match operation.await {
    Ok(value) => {
      report_done(started.elapsed(), false);
      Ok(value)
    }
    Err(e) => {
      report_failed(false);
      match e.downcast_ref::<CommandFailed>() {
        Some(failed) if !failed.stderr.is_empty() => println!("{}", failed.stderr),
        _ => println!("{e:#}"),
      }
      Err(e)
    }
  }
}
