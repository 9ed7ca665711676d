/* src/cli/core/src/config/tests/loading.rs */

use super::*;

const MINIMAL: &str = r#"
[project]
name = "found"

[server]
bundler_command = "webpack"
"#;

#[test]
fn find_config_walks_upward() {
  let tmp = tempfile::tempdir().unwrap();
  std::fs::write(tmp.path().join(CONFIG_FILE), MINIMAL).unwrap();
  let nested = tmp.path().join("server/src/routes");
  std::fs::create_dir_all(&nested).unwrap();

  let found = find_assemble_config(&nested).unwrap();
  assert_eq!(found, tmp.path().canonicalize().unwrap().join(CONFIG_FILE));

  let config = load_assemble_config(&found).unwrap();
  assert_eq!(config.project.name, "found");
}

#[test]
fn load_reports_parse_errors_with_path() {
  let tmp = tempfile::tempdir().unwrap();
  let path = tmp.path().join(CONFIG_FILE);
  std::fs::write(&path, "[project\nname=").unwrap();
  let err = load_assemble_config(&path).unwrap_err();
  assert!(err.to_string().starts_with("failed to parse"));
}

#[test]
fn load_runs_validation() {
  let tmp = tempfile::tempdir().unwrap();
  let path = tmp.path().join(CONFIG_FILE);
  std::fs::write(&path, format!("{MINIMAL}\n[paths]\npackage = \".\"\n")).unwrap();
  let err = load_assemble_config(&path).unwrap_err();
  assert!(err.to_string().starts_with("invalid"));
}
