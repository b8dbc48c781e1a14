//! Request handler module.
//!
//! Routing dispatch plus the static asset view and the shared state handed
//! to every connection.

pub mod router;
pub mod static_files;

use std::io;

use crate::config::Config;
use static_files::StaticView;

// Re-export main entry point
pub use router::handle_request;

/// Shared per-process state.
pub struct AppState {
    pub config: Config,
    pub view: StaticView,
}

impl AppState {
    pub fn new(config: Config) -> io::Result<Self> {
        let view = StaticView::from_config(&config.assets)?;
        Ok(Self { config, view })
    }
}
