/* src/cli/core/src/files.rs */

// Filesystem helpers used while assembling the package directory.
// Each call is a standalone operation with no shared state.

use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::Value;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Leave `path` existing and empty, creating it (and its parents) if needed.
pub fn ensure_empty_dir(path: &Path) -> Result<()> {
  match fs::read_dir(path) {
    Ok(entries) => {
      for entry in entries {
        let entry = entry.with_context(|| format!("failed to list {}", path.display()))?;
        remove_entry(&entry.path())?;
      }
    }
    Err(e) if e.kind() == ErrorKind::NotFound => {}
    Err(e) => return Err(e).with_context(|| format!("failed to list {}", path.display())),
  }
  fs::create_dir_all(path).with_context(|| format!("failed to create {}", path.display()))?;
  tracing::debug!(path = %path.display(), "emptied directory");
  Ok(())
}

/// Delete a file or directory tree; already-missing entries are not an error.
fn remove_entry(path: &Path) -> Result<()> {
  let meta = match fs::symlink_metadata(path) {
    Ok(m) => m,
    Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
    Err(e) => return Err(e).with_context(|| format!("failed to stat {}", path.display())),
  };
  let result = if meta.is_dir() { fs::remove_dir_all(path) } else { fs::remove_file(path) };
  match result {
    Ok(()) => Ok(()),
    Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
    Err(e) => Err(e).with_context(|| format!("failed to remove {}", path.display())),
  }
}

/// True when nothing at all (files or nested directories) lives under `path`.
pub fn is_empty_dir(path: &Path) -> Result<bool> {
  let mut entries =
    fs::read_dir(path).with_context(|| format!("failed to read {}", path.display()))?;
  Ok(entries.next().is_none())
}

pub fn remove_dir(path: &Path) -> Result<()> {
  remove_entry(path)?;
  tracing::debug!(path = %path.display(), "removed");
  Ok(())
}

/// Copy a file or a whole directory tree onto `to`, overwriting what is there.
pub fn copy_tree(from: &Path, to: &Path) -> Result<()> {
  let meta = fs::metadata(from).with_context(|| format!("failed to read {}", from.display()))?;
  if meta.is_dir() {
    copy_dir(from, to)?;
  } else {
    if let Some(parent) = to.parent() {
      fs::create_dir_all(parent)
        .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::copy(from, to)
      .with_context(|| format!("failed to copy {} to {}", from.display(), to.display()))?;
  }
  tracing::debug!(from = %from.display(), to = %to.display(), "copied");
  Ok(())
}

fn copy_dir(from: &Path, to: &Path) -> Result<()> {
  fs::create_dir_all(to).with_context(|| format!("failed to create {}", to.display()))?;
  for entry in fs::read_dir(from).with_context(|| format!("failed to read {}", from.display()))? {
    let entry = entry.with_context(|| format!("failed to read {}", from.display()))?;
    let src = entry.path();
    let dest = to.join(entry.file_name());
    // follow symlinks so a linked directory is copied as its contents
    let meta = fs::metadata(&src).with_context(|| format!("failed to read {}", src.display()))?;
    if meta.is_dir() {
      copy_dir(&src, &dest)?;
    } else {
      fs::copy(&src, &dest)
        .with_context(|| format!("failed to copy {} to {}", src.display(), dest.display()))?;
    }
  }
  Ok(())
}

/// Delete every file under `root` whose name ends with `suffix`. Returns the count.
pub fn remove_files_with_suffix(root: &Path, suffix: &str) -> Result<usize> {
  let mut removed = 0;
  for entry in fs::read_dir(root).with_context(|| format!("failed to read {}", root.display()))? {
    let entry = entry.with_context(|| format!("failed to read {}", root.display()))?;
    let path = entry.path();
    if entry.file_type()?.is_dir() {
      removed += remove_files_with_suffix(&path, suffix)?;
    } else if entry.file_name().to_string_lossy().ends_with(suffix) {
      fs::remove_file(&path).with_context(|| format!("failed to remove {}", path.display()))?;
      removed += 1;
    }
  }
  Ok(removed)
}

/// Zip the contents of `source` (not the folder itself) into `destination`.
/// Returns once the archive is finished and flushed to disk.
pub fn archive_dir(source: &Path, destination: &Path) -> Result<usize> {
  if !source.is_dir() {
    bail!("{} is not a directory", source.display());
  }
  let file = File::create(destination)
    .with_context(|| format!("failed to create {}", destination.display()))?;
  let mut zip = ZipWriter::new(BufWriter::new(file));
  let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

  let mut count = 0;
  add_dir_to_zip(&mut zip, source, "", options, &mut count)?;

  let mut writer = zip.finish().context("failed to finish zip archive")?;
  writer.flush().with_context(|| format!("failed to flush {}", destination.display()))?;
  tracing::debug!(source = %source.display(), archive = %destination.display(), files = count, "archived");
  Ok(count)
}

fn add_dir_to_zip<W: Write + std::io::Seek>(
  zip: &mut ZipWriter<W>,
  dir: &Path,
  prefix: &str,
  options: SimpleFileOptions,
  count: &mut usize,
) -> Result<()> {
  let mut entries = fs::read_dir(dir)
    .with_context(|| format!("failed to read {}", dir.display()))?
    .collect::<std::io::Result<Vec<_>>>()
    .with_context(|| format!("failed to read {}", dir.display()))?;
  entries.sort_by_key(fs::DirEntry::file_name);

  for entry in entries {
    let path = entry.path();
    let name = format!("{prefix}{}", entry.file_name().to_string_lossy());
    if entry.file_type()?.is_dir() {
      add_dir_to_zip(zip, &path, &format!("{name}/"), options, count)?;
    } else {
      zip.start_file(name.as_str(), options).with_context(|| format!("failed to add {name}"))?;
      let mut input =
        File::open(&path).with_context(|| format!("failed to open {}", path.display()))?;
      std::io::copy(&mut input, zip).with_context(|| format!("failed to write {name}"))?;
      *count += 1;
    }
  }
  Ok(())
}

pub fn read_json_file(path: &Path) -> Result<Value> {
  let content =
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
  serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

/// Pretty-print `value` to `path`, creating parent directories.
pub fn write_json_file(path: &Path, value: &Value) -> Result<()> {
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).with_context(|| format!("failed to create {}", parent.display()))?;
  }
  let json = serde_json::to_string_pretty(value)?;
  fs::write(path, json + "\n").with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
  use std::collections::BTreeSet;

  use super::*;

  fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
  }

  #[test]
  fn ensure_empty_dir_clears_existing_contents() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("build");
    write(&dir.join("index.js"), "x");
    write(&dir.join("client/app.js"), "y");
    write(&dir.join(".hidden"), "z");

    ensure_empty_dir(&dir).unwrap();
    assert!(dir.is_dir());
    assert!(is_empty_dir(&dir).unwrap());
  }

  #[test]
  fn ensure_empty_dir_is_idempotent() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("nested/build");
    ensure_empty_dir(&dir).unwrap();
    assert!(is_empty_dir(&dir).unwrap());
    ensure_empty_dir(&dir).unwrap();
    assert!(is_empty_dir(&dir).unwrap());
  }

  #[test]
  fn is_empty_dir_sees_new_files_and_nested_dirs() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("pkg");
    ensure_empty_dir(&dir).unwrap();
    fs::create_dir(dir.join("config")).unwrap();
    assert!(!is_empty_dir(&dir).unwrap());

    ensure_empty_dir(&dir).unwrap();
    fs::write(dir.join("a.txt"), "a").unwrap();
    assert!(!is_empty_dir(&dir).unwrap());
  }

  #[test]
  fn remove_dir_tolerates_missing_path() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("gone");
    remove_dir(&dir).unwrap();
    write(&dir.join("sub/file.txt"), "x");
    remove_dir(&dir).unwrap();
    assert!(!dir.exists());
  }

  #[test]
  fn copy_tree_copies_files_and_directories() {
    let tmp = tempfile::tempdir().unwrap();
    let src = tmp.path().join("src");
    write(&src.join("a.txt"), "a");
    write(&src.join("deep/er/b.txt"), "b");

    let dest = tmp.path().join("out/copy");
    copy_tree(&src, &dest).unwrap();
    assert_eq!(fs::read_to_string(dest.join("a.txt")).unwrap(), "a");
    assert_eq!(fs::read_to_string(dest.join("deep/er/b.txt")).unwrap(), "b");

    let single = tmp.path().join("pkg/server/server.js");
    copy_tree(&src.join("a.txt"), &single).unwrap();
    assert_eq!(fs::read_to_string(single).unwrap(), "a");
  }

  #[test]
  fn copy_tree_overwrites_destination_files() {
    let tmp = tempfile::tempdir().unwrap();
    let src = tmp.path().join("src");
    write(&src.join("a.txt"), "new");
    let dest = tmp.path().join("dest");
    write(&dest.join("a.txt"), "old");
    copy_tree(&src, &dest).unwrap();
    assert_eq!(fs::read_to_string(dest.join("a.txt")).unwrap(), "new");
  }

  #[cfg(unix)]
  #[test]
  fn copy_tree_follows_symlinked_directories() {
    let tmp = tempfile::tempdir().unwrap();
    write(&tmp.path().join("shared/fonts/inter.woff2"), "font");
    let src = tmp.path().join("build");
    write(&src.join("index.html"), "<html></html>");
    std::os::unix::fs::symlink(tmp.path().join("shared/fonts"), src.join("fonts")).unwrap();
    std::os::unix::fs::symlink(src.join("index.html"), src.join("home.html")).unwrap();

    let dest = tmp.path().join("package/client");
    copy_tree(&src, &dest).unwrap();
    assert!(dest.join("fonts").is_dir());
    assert!(!fs::symlink_metadata(dest.join("fonts")).unwrap().file_type().is_symlink());
    assert_eq!(fs::read_to_string(dest.join("fonts/inter.woff2")).unwrap(), "font");
    assert_eq!(fs::read_to_string(dest.join("home.html")).unwrap(), "<html></html>");
  }

  #[test]
  fn copy_tree_fails_on_missing_source() {
    let tmp = tempfile::tempdir().unwrap();
    let err = copy_tree(&tmp.path().join("missing"), &tmp.path().join("x")).unwrap_err();
    assert!(err.to_string().starts_with("failed to read"));
  }

  #[test]
  fn remove_files_with_suffix_only_touches_matches() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    write(&root.join("main.js"), "");
    write(&root.join("main.js.map"), "");
    write(&root.join("static/css/app.css.map"), "");
    write(&root.join("static/css/app.css"), "");
    write(&root.join("sitemap.xml"), "");

    assert_eq!(remove_files_with_suffix(root, ".map").unwrap(), 2);
    assert!(root.join("main.js").exists());
    assert!(!root.join("main.js.map").exists());
    assert!(!root.join("static/css/app.css.map").exists());
    assert!(root.join("sitemap.xml").exists());
  }

  #[test]
  fn archive_dir_puts_contents_at_root() {
    let tmp = tempfile::tempdir().unwrap();
    let src = tmp.path().join("package");
    write(&src.join("a.txt"), "alpha");
    write(&src.join("sub/b.txt"), "beta");
    let dest = tmp.path().join("package.zip");

    assert_eq!(archive_dir(&src, &dest).unwrap(), 2);

    let archive = zip::ZipArchive::new(File::open(&dest).unwrap()).unwrap();
    let names: BTreeSet<&str> = archive.file_names().collect();
    assert_eq!(names, BTreeSet::from(["a.txt", "sub/b.txt"]));
  }

  #[test]
  fn archive_dir_contents_round_trip() {
    use std::io::Read;

    let tmp = tempfile::tempdir().unwrap();
    let src = tmp.path().join("package");
    write(&src.join("sub/b.txt"), "beta");
    let dest = tmp.path().join("out.zip");
    archive_dir(&src, &dest).unwrap();

    let mut archive = zip::ZipArchive::new(File::open(&dest).unwrap()).unwrap();
    let mut content = String::new();
    archive.by_name("sub/b.txt").unwrap().read_to_string(&mut content).unwrap();
    assert_eq!(content, "beta");
  }

  #[test]
  fn archive_dir_rejects_non_directory() {
    let tmp = tempfile::tempdir().unwrap();
    let err = archive_dir(&tmp.path().join("nope"), &tmp.path().join("a.zip")).unwrap_err();
    assert!(err.to_string().ends_with("is not a directory"));
  }

  #[test]
  fn read_json_file_reports_missing_and_malformed() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("package.json");
    assert!(read_json_file(&path).unwrap_err().to_string().starts_with("failed to read"));
    fs::write(&path, "{ not json").unwrap();
    assert!(read_json_file(&path).unwrap_err().to_string().starts_with("failed to parse"));
  }

  #[test]
  fn write_then_read_json_file() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("pkg/package.json");
    let value = serde_json::json!({ "dependencies": { "express": "^4.18.0" } });
    write_json_file(&path, &value).unwrap();
    assert_eq!(read_json_file(&path).unwrap(), value);
  }
}
