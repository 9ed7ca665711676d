/* src/cli/core/src/config/tests/mod.rs */

use super::*;
use super::loader::CONFIG_FILE;
use super::types::SourceLang;

mod loading;
