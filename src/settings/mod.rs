//! TOML settings loaded through `config`, with the path taken from the CLI.

mod cli;
pub use clap::Parser;
pub use cli::*;

mod settings;
pub use settings::*;
