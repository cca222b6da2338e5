//! CLI command implementations.

mod config;
mod context;
mod import;
mod search;
mod serve;
mod status;

pub use config::run_config;
pub use context::run_context;
pub use import::run_import;
pub use search::run_search;
pub use serve::{router, run_serve};
pub use status::run_status;
