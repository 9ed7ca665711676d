/* src/cli/core/src/paths.rs */

use std::path::{Path, PathBuf};

use crate::config::AssembleConfig;

/// Resolved project directories. The root is always the directory holding
/// `assemble.toml`; everything else hangs off it.
#[derive(Debug, Clone)]
pub struct ProjectPaths {
  pub root: PathBuf,
  pub server: PathBuf,
  pub client: PathBuf,
  pub package: PathBuf,
}

impl ProjectPaths {
  pub fn new(root: &Path, config: &AssembleConfig) -> Self {
    Self {
      root: root.to_path_buf(),
      server: root.join(&config.paths.server),
      client: root.join(&config.paths.client),
      package: root.join(&config.paths.package),
    }
  }

  pub fn project_relative(&self, rel: impl AsRef<Path>) -> PathBuf {
    self.root.join(rel)
  }

  pub fn server_relative(&self, rel: impl AsRef<Path>) -> PathBuf {
    self.server.join(rel)
  }

  pub fn client_relative(&self, rel: impl AsRef<Path>) -> PathBuf {
    self.client.join(rel)
  }

  pub fn package_relative(&self, rel: impl AsRef<Path>) -> PathBuf {
    self.package.join(rel)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn resolvers_join_onto_configured_dirs() {
    let config: AssembleConfig = toml::from_str(
      r#"
[project]
name = "app"

[paths]
package = "dist/package"
server = "backend"

[server]
bundler_command = "webpack"
"#,
    )
    .unwrap();
    let paths = ProjectPaths::new(Path::new("/work/app"), &config);
    assert_eq!(paths.server_relative("package.json"), Path::new("/work/app/backend/package.json"));
    assert_eq!(paths.client_relative("build"), Path::new("/work/app/client/build"));
    assert_eq!(paths.package_relative("index.js"), Path::new("/work/app/dist/package/index.js"));
    assert_eq!(paths.project_relative("assets/a.js"), Path::new("/work/app/assets/a.js"));
  }
}
