//! Configuration management for repoglance
//!
//! Hierarchical configuration with discovery and precedence:
//! CLI > file > defaults. The TOML file supports `[defaults]`, `[selection]`,
//! `[chunking]`, `[source]` and `[llm]` sections.

mod builder;
mod cli_args;
mod discovery;
mod model;
mod sources;
mod validation;

pub use builder::ConfigBuilder;
pub use cli_args::CliArgs;
pub use model::*;
pub use repoglance_utils::types::ConfigSource;

/// Directory holding the configuration file, relative to a project root.
pub const CONFIG_DIR: &str = ".repoglance";

/// Configuration file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.toml";
