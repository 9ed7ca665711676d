/* src/cli/core/src/pack.rs */

// `assemble pack`: zip the assembled package for upload.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::files::{archive_dir, is_empty_dir};
use crate::paths::ProjectPaths;
use crate::progress::with_progress;
use crate::ui;

/// Archive the package directory to `out` (default: `<package>.zip` beside it).
pub fn run_pack(paths: &ProjectPaths, out: Option<&Path>) -> Result<PathBuf> {
  let package = &paths.package;
  if !package.is_dir() || is_empty_dir(package)? {
    bail!("nothing to pack in {} -- run `assemble build` first", package.display());
  }
  let dest = match out {
    Some(p) if p.is_absolute() => p.to_path_buf(),
    Some(p) => paths.project_relative(p),
    None => default_archive_path(package),
  };
  if dest.starts_with(package) {
    bail!("archive {} must not be written inside the package directory", dest.display());
  }

  if let Some(parent) = dest.parent() {
    fs::create_dir_all(parent).with_context(|| format!("failed to create {}", parent.display()))?;
  }

  let count = with_progress("Archiving package", || archive_dir(package, &dest))?;
  ui::ok(&format!("{} ({count} files)", dest.display()));
  Ok(dest)
}

fn default_archive_path(package: &Path) -> PathBuf {
  let name = package.file_name().map_or_else(|| "package".into(), |n| n.to_string_lossy());
  package.with_file_name(format!("{name}.zip"))
}
