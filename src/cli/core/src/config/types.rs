/* src/cli/core/src/config/types.rs */

use std::path::{Component, Path};

use anyhow::{Result, bail};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AssembleConfig {
  pub project: ProjectConfig,
  #[serde(default)]
  pub paths: PathsSection,
  pub server: ServerConfig,
  #[serde(default)]
  pub client: ClientConfig,
  #[serde(default)]
  pub build: BuildSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
  pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PathsSection {
  #[serde(default = "default_package")]
  pub package: String,
  #[serde(default = "default_server")]
  pub server: String,
  #[serde(default = "default_client")]
  pub client: String,
  #[serde(default = "default_entry_point")]
  pub entry_point: String,
}

impl Default for PathsSection {
  fn default() -> Self {
    Self {
      package: default_package(),
      server: default_server(),
      client: default_client(),
      entry_point: default_entry_point(),
    }
  }
}

fn default_package() -> String {
  "build".to_string()
}

fn default_server() -> String {
  "server".to_string()
}

fn default_client() -> String {
  "client".to_string()
}

fn default_entry_point() -> String {
  "assets/serverIndex.js".to_string()
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceLang {
  #[default]
  Ts,
  Js,
}

impl SourceLang {
  /// TypeScript sources go through `compile_command` before bundling.
  pub fn needs_compile(self) -> bool {
    matches!(self, Self::Ts)
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default)]
  pub lang: SourceLang,
  #[serde(default = "default_compile_command")]
  pub compile_command: String,
  pub bundler_command: String,
  #[serde(default = "default_server_build")]
  pub build: String,
  #[serde(default = "default_server_entry")]
  pub entry: String,
  #[serde(default = "default_server_bundle")]
  pub bundle: String,
  #[serde(default = "default_server_data")]
  pub data: String,
}

fn default_compile_command() -> String {
  "tsc".to_string()
}

fn default_server_build() -> String {
  "build".to_string()
}

fn default_server_entry() -> String {
  "index".to_string()
}

fn default_server_bundle() -> String {
  "dist/server.js".to_string()
}

fn default_server_data() -> String {
  "data".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
  #[serde(default = "default_client_build_command")]
  pub build_command: String,
  #[serde(default = "default_client_build")]
  pub build: String,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self { build_command: default_client_build_command(), build: default_client_build() }
  }
}

fn default_client_build_command() -> String {
  "npm run build".to_string()
}

fn default_client_build() -> String {
  "build".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildSection {
  #[serde(default)]
  pub bundle_node_modules: bool,
  #[serde(default)]
  pub remove_map_files: bool,
  #[serde(default)]
  pub run: bool,
}

impl AssembleConfig {
  /// The package directory is emptied on every build, so it must never be
  /// the project root, leave it, or overlap a source directory.
  pub fn validate(&self) -> Result<()> {
    let raw = &self.paths.package;
    let package = match project_components(raw) {
      Some(parts) if !parts.is_empty() && !has_parent_dir(raw) => parts,
      _ => bail!("paths.package must be a subdirectory of the project, got \"{raw}\""),
    };
    for (key, dir) in [("paths.server", &self.paths.server), ("paths.client", &self.paths.client)] {
      if let Some(parts) = project_components(dir)
        && parts.starts_with(&package)
      {
        bail!("{key} \"{dir}\" lies inside paths.package \"{raw}\"");
      }
    }
    if self.server.bundler_command.trim().is_empty() {
      bail!("server.bundler_command must not be empty");
    }
    Ok(())
  }

  /// Install happens only ahead of a run, and only when the bundle does not
  /// already carry node_modules.
  pub fn needs_install(&self) -> bool {
    self.build.run && !self.build.bundle_node_modules
  }
}

/// Lexically resolve a project-relative path into its normal components.
/// `None` for absolute paths and paths that climb above the project root.
fn project_components(raw: &str) -> Option<Vec<&str>> {
  let mut parts = Vec::new();
  for component in Path::new(raw).components() {
    match component {
      Component::CurDir => {}
      Component::Normal(part) => parts.push(part.to_str()?),
      Component::ParentDir => {
        parts.pop()?;
      }
      Component::RootDir | Component::Prefix(_) => return None,
    }
  }
  Some(parts)
}

fn has_parent_dir(raw: &str) -> bool {
  Path::new(raw).components().any(|c| c == Component::ParentDir)
}
