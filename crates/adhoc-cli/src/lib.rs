pub mod commands;
pub mod config;
pub mod errors;

pub use config::{load_filters, PanelConfig, PanelTimeRange};
pub use errors::CliError;
