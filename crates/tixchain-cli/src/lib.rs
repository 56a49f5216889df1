pub mod cli;
pub mod demo;
pub mod logging;
pub mod settings;

pub use cli::{run, Cli, Commands};
pub use settings::{ServerSettings, Settings};
