//! Terminal rendering module.
//!
//! A small rendering layer for a single-field terminal form. It renders into
//! a plain framebuffer that is then flushed to the terminal backend, so the
//! view itself stays pure and unit-testable.

pub mod fb;
pub mod field_view;
pub mod renderer;

pub use tui_ccfield_core as core;
pub use tui_ccfield_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use field_view::{network_icons, AnchorY, FieldView, NetworkIcon, RenderedField, Viewport};
pub use renderer::{changed_runs, encode_diff_into, encode_full_into, Run, TerminalRenderer};
