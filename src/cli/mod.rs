pub mod commands;
pub mod handlers;

pub use commands::{CliArgs, Commands, RunArgs, SectionsArgs};
pub use handlers::{handle_run, handle_sections};
