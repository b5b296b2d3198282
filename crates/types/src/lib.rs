//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (formatter logic, terminal rendering, scripted input).
//!
//! # Card network rules
//!
//! A [`CardTypeRule`] describes one card network: its display grouping and the
//! IIN prefixes that identify it. A rule with an empty prefix set is the
//! fallback ("unknown") rule and is only chosen when nothing else matches.
//!
//! | Network | Groups | Prefixes |
//! |---------|--------|----------|
//! | visa | 4-4-4-4 | 4 |
//! | mastercard | 4-4-4-4 | 51-55 |
//! | discover | 4-4-4-4 | 6011 |
//! | amex | 4-6-5 | 34, 37 |
//! | unknown | 4-4-4-4 | - |
//!
//! # Examples
//!
//! ```
//! use tui_ccfield_types::{CardTypeRule, EditAction, Selection};
//!
//! let amex = CardTypeRule::new("amex", &[4, 6, 5], &["34", "37"]);
//! assert_eq!(amex.max_digits(), Some(15));
//! assert_eq!(amex.matching_prefix_len("371449635398431"), Some(2));
//!
//! let action = EditAction::from_str("backspace").unwrap();
//! assert_eq!(action, EditAction::Backspace);
//!
//! let sel = Selection::new(7, 2);
//! assert_eq!((sel.start(), sel.end()), (2, 7));
//! ```

/// Separator inserted between digit groups in the display string.
pub const SEPARATOR: char = ' ';

/// Name of the fallback rule used when no prefix matches.
pub const UNKNOWN_NETWORK: &str = "unknown";

/// Grouping used by the fallback rule and by most networks.
pub const DEFAULT_GROUPS: [usize; 4] = [4, 4, 4, 4];

/// Digits shown in clear by masked output.
pub const VISIBLE_TAIL_DIGITS: usize = 4;

/// Glyph replacing hidden digits in masked output.
pub const MASK_CHAR: char = '•';

/// One card network: display grouping plus identifying IIN prefixes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CardTypeRule {
    pub name: String,
    pub digit_groups: Vec<usize>,
    pub prefixes: Vec<String>,
}

impl CardTypeRule {
    pub fn new(name: &str, digit_groups: &[usize], prefixes: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            digit_groups: digit_groups.to_vec(),
            prefixes: prefixes.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// The fallback rule: default grouping, no prefixes.
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_NETWORK, &DEFAULT_GROUPS, &[])
    }

    /// A rule without prefixes can never be detected and acts as the fallback.
    pub fn is_fallback(&self) -> bool {
        self.prefixes.is_empty()
    }

    /// Sum of all group lengths.
    pub fn grouped_digits(&self) -> usize {
        self.digit_groups.iter().sum()
    }

    /// Maximum number of digits accepted.
    ///
    /// Named rules stop at the sum of their groups; the fallback rule is
    /// unbounded and returns `None`.
    pub fn max_digits(&self) -> Option<usize> {
        if self.is_fallback() {
            None
        } else {
            Some(self.grouped_digits())
        }
    }

    /// Length of the longest prefix of this rule that `digits` starts with.
    pub fn matching_prefix_len(&self, digits: &str) -> Option<usize> {
        self.prefixes
            .iter()
            .filter(|p| !p.is_empty() && digits.starts_with(p.as_str()))
            .map(|p| p.len())
            .max()
    }
}

/// Caret/selection inside the display string.
///
/// `anchor` is where the selection started, `head` is where the caret is.
/// Both are byte offsets into an ASCII display string. A collapsed selection
/// (`anchor == head`) is a plain caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub anchor: usize,
    pub head: usize,
}

impl Selection {
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    /// Collapsed selection at `pos`.
    pub fn caret(pos: usize) -> Self {
        Self {
            anchor: pos,
            head: pos,
        }
    }

    pub fn start(&self) -> usize {
        self.anchor.min(self.head)
    }

    pub fn end(&self) -> usize {
        self.anchor.max(self.head)
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    /// Clamp both ends to `len`.
    pub fn clamped(self, len: usize) -> Self {
        Self {
            anchor: self.anchor.min(len),
            head: self.head.min(len),
        }
    }
}

/// Edits and caret movements a text-entry surface can deliver.
///
/// Key bindings produce these, and `format-card --keys` parses them from
/// whitespace-separated names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    /// Type one character at the caret (non-digits are filtered by the formatter)
    Insert(char),
    /// Delete backwards
    Backspace,
    /// Delete forwards
    Delete,
    MoveLeft,
    MoveRight,
    /// Extend the selection one position left
    SelectLeft,
    /// Extend the selection one position right
    SelectRight,
    Home,
    End,
    SelectAll,
    /// Empty the field
    Clear,
}

impl EditAction {
    /// Parse action from string
    ///
    /// A single character parses as `Insert`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_ccfield_types::EditAction;
    ///
    /// assert_eq!(EditAction::from_str("moveLeft"), Some(EditAction::MoveLeft));
    /// assert_eq!(EditAction::from_str("7"), Some(EditAction::Insert('7')));
    /// assert_eq!(EditAction::from_str("selectall"), Some(EditAction::SelectAll));
    /// assert_eq!(EditAction::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Some(EditAction::Insert(c));
        }
        match s.to_lowercase().as_str() {
            "backspace" => Some(EditAction::Backspace),
            "delete" => Some(EditAction::Delete),
            "moveleft" => Some(EditAction::MoveLeft),
            "moveright" => Some(EditAction::MoveRight),
            "selectleft" => Some(EditAction::SelectLeft),
            "selectright" => Some(EditAction::SelectRight),
            "home" => Some(EditAction::Home),
            "end" => Some(EditAction::End),
            "selectall" => Some(EditAction::SelectAll),
            "clear" => Some(EditAction::Clear),
            _ => None,
        }
    }

    /// Convert to camelCase string (used in log fields)
    pub fn as_str(&self) -> &'static str {
        match self {
            EditAction::Insert(_) => "insert",
            EditAction::Backspace => "backspace",
            EditAction::Delete => "delete",
            EditAction::MoveLeft => "moveLeft",
            EditAction::MoveRight => "moveRight",
            EditAction::SelectLeft => "selectLeft",
            EditAction::SelectRight => "selectRight",
            EditAction::Home => "home",
            EditAction::End => "end",
            EditAction::SelectAll => "selectAll",
            EditAction::Clear => "clear",
        }
    }

    /// Whether this action can change the text (as opposed to only the caret).
    pub fn edits_text(&self) -> bool {
        matches!(
            self,
            EditAction::Insert(_) | EditAction::Backspace | EditAction::Delete | EditAction::Clear
        )
    }
}
