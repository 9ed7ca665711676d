/* src/cli/core/src/config/mod.rs */

mod loader;
mod types;

#[cfg(test)]
mod tests;

pub use loader::{find_assemble_config, load_assemble_config};
pub use types::AssembleConfig;
