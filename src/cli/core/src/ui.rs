/* src/cli/core/src/ui.rs */

// Console output helpers. Colors are advisory; nothing parses this output.

use std::io::Write;

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const CYAN: &str = "\x1b[36m";

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn ok(msg: &str) {
  println!("  {GREEN}\u{2713}{RESET} {msg}");
}

pub fn step(n: usize, total: usize, msg: &str) {
  println!("  {BOLD}[{n}/{total}]{RESET} {msg}");
}

pub fn detail(msg: &str) {
  println!("        {msg}");
}

/// Print `msg` wrapped in `color`, or plain when `color` is `None`.
pub fn log(msg: &str, color: Option<&str>) {
  match color {
    Some(c) => println!("{c}{msg}{RESET}"),
    None => println!("{msg}"),
  }
}

/// Write without a trailing newline, so a later "done" lands on the same line.
pub fn inline(msg: &str) {
  print!("{msg}");
  let _ = std::io::stdout().flush();
}

pub fn banner(cmd: &str, project: &str) {
  println!();
  println!("  {BOLD}assemble{RESET} {cmd} {DIM}{project} \u{00b7} v{VERSION}{RESET}");
  println!();
}

pub fn clear_console() {
  let seq = if cfg!(windows) { "\x1bc" } else { "\x1b[2J\x1b[3J\x1b[H" };
  inline(seq);
}

pub fn blank() {
  println!();
}
