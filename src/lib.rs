//! TUI card field (workspace facade crate).
//!
//! Re-exports the workspace crates as `tui_ccfield::{config,core,input,term,types}`
//! and holds the logging setup shared by the binaries.

pub mod logging;

pub use tui_ccfield_config as config;
pub use tui_ccfield_core as core;
pub use tui_ccfield_input as input;
pub use tui_ccfield_term as term;
pub use tui_ccfield_types as types;
