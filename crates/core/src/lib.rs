//! Card number formatting logic - pure, deterministic, and testable
//!
//! This crate contains the network rule table, prefix detection, digit
//! grouping, and the keystroke-level edit transition for a card number field.
//! It has **no terminal or I/O dependencies**:
//!
//! - **Deterministic**: the same rule table and input always give the same output
//! - **State-passing**: edits take an [`InputState`] and return a new one
//! - **Portable**: the same logic drives the terminal field and scripted input
//!
//! # Module Structure
//!
//! - [`rules`]: ordered network table with longest-prefix detection
//! - [`format`]: separator stripping and digit regrouping
//! - [`field`]: caret/selection-aware edits and network change notification
//! - [`summary`]: masked display, checksum and completeness
//!
//! # Example
//!
//! ```
//! use tui_ccfield_core::{CardFormatter, RuleTable};
//! use tui_ccfield_types::EditAction;
//!
//! let formatter = CardFormatter::new(RuleTable::builtin());
//! let mut state = formatter.empty();
//! let mut notifications = Vec::new();
//!
//! for ch in "371449635398431".chars() {
//!     let out = formatter.on_edit(&state, EditAction::Insert(ch));
//!     notifications.extend(out.network_changed);
//!     state = out.state;
//! }
//!
//! assert_eq!(state.text, "3714 496353 98431");
//! assert_eq!(notifications, vec!["amex".to_string()]);
//! ```

pub mod field;
pub mod format;
pub mod rules;
pub mod summary;

pub use tui_ccfield_types as types;

// Re-export commonly used types for convenience
pub use field::{CardFormatter, EditOutcome, InputState};
pub use format::{digits_only, display_len, reformat, strip_separators};
pub use rules::{RuleError, RuleTable};
pub use summary::{is_complete, last_four, luhn_valid, masked};
