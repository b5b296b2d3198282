//! Terminal input module.
//!
//! This module is intentionally independent of any UI framework beyond
//! `crossterm`'s event types. It maps key events into
//! [`crate::types::EditAction`]s for the card field and decides when the
//! application should quit.

pub mod map;

pub use tui_ccfield_types as types;

pub use map::{handle_key_event, should_quit};
