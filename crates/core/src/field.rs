//! Card number field state and the per-keystroke edit transition.
//!
//! [`CardFormatter::on_edit`] is a pure function of `(InputState, EditAction)`:
//! the caller owns the state, passes it in, and stores what comes back. The
//! only side effect a UI needs to react to is `EditOutcome::network_changed`.

use tracing::{debug, trace};

use crate::format::{reformat, strip_separators};
use crate::rules::RuleTable;
use crate::types::{CardTypeRule, EditAction, Selection, SEPARATOR};

/// Current text, caret/selection and last detected network of a card field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputState {
    /// Formatted display string (ASCII digits and single separators).
    pub text: String,
    pub selection: Selection,
    /// Network detected after the previous edit.
    pub network: String,
}

impl InputState {
    pub fn cursor(&self) -> usize {
        self.selection.head
    }

    /// Digits without separators.
    pub fn digits(&self) -> String {
        strip_separators(&self.text)
    }

    pub fn digit_count(&self) -> usize {
        self.text.bytes().filter(|b| b.is_ascii_digit()).count()
    }

    pub fn has_selection(&self) -> bool {
        !self.selection.is_empty()
    }

    /// The currently selected slice of the display string.
    pub fn selected_text(&self) -> &str {
        let len = self.text.len();
        let sel = self.selection.clamped(len);
        &self.text[sel.start()..sel.end()]
    }
}

/// Result of one edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    pub state: InputState,
    /// Set to the new network name when the detected network changed.
    pub network_changed: Option<String>,
    /// The input was filtered out (non-digit or over the length limit).
    pub rejected: bool,
}

impl EditOutcome {
    fn unchanged(state: &InputState) -> Self {
        Self {
            state: state.clone(),
            network_changed: None,
            rejected: false,
        }
    }

    fn rejected(state: &InputState) -> Self {
        Self {
            rejected: true,
            ..Self::unchanged(state)
        }
    }
}

/// Formats a card number field as the user edits it.
///
/// Holds only immutable configuration: the rule table and the optional digit
/// limit for numbers that match no known network.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CardFormatter {
    table: RuleTable,
    max_unknown_digits: Option<usize>,
}

impl CardFormatter {
    pub fn new(table: RuleTable) -> Self {
        Self {
            table,
            max_unknown_digits: None,
        }
    }

    /// Cap the number of digits accepted while no network is detected.
    ///
    /// `None` (the default) leaves the fallback rule unbounded.
    pub fn with_max_unknown_digits(mut self, max: Option<usize>) -> Self {
        self.max_unknown_digits = max;
        self
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    pub fn max_unknown_digits(&self) -> Option<usize> {
        self.max_unknown_digits
    }

    pub fn detect_type(&self, number: &str) -> &CardTypeRule {
        self.table.detect_type(number)
    }

    /// Rule that was active after the last edit of `state`.
    pub fn active_rule(&self, state: &InputState) -> &CardTypeRule {
        self.table
            .get(&state.network)
            .unwrap_or_else(|| self.table.fallback())
    }

    /// Digit limit for `rule`, taking the configured fallback cap into account.
    pub fn digit_limit(&self, rule: &CardTypeRule) -> Option<usize> {
        match rule.max_digits() {
            Some(max) => Some(max),
            None => self.max_unknown_digits,
        }
    }

    /// Reformat under `rule`, applying the fallback cap when it is set.
    pub fn format(&self, number: &str, rule: &CardTypeRule) -> String {
        match (rule.is_fallback(), self.max_unknown_digits) {
            (true, Some(max)) => {
                let digits: String = strip_separators(number).chars().take(max).collect();
                reformat(&digits, rule)
            }
            _ => reformat(number, rule),
        }
    }

    /// Build a state from a pre-filled value.
    ///
    /// Non-digits are dropped, the caret goes to the end, and the detected
    /// network is always reported so the UI can highlight it on first paint.
    pub fn init(&self, value: &str) -> EditOutcome {
        let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
        let rule = self.detect_type(&digits);
        let text = self.format(&digits, rule);
        debug!(network = %rule.name, digits = digits.len(), "card field initialised");
        EditOutcome {
            state: InputState {
                selection: Selection::caret(text.len()),
                text,
                network: rule.name.clone(),
            },
            network_changed: Some(rule.name.clone()),
            rejected: false,
        }
    }

    /// An empty field.
    pub fn empty(&self) -> InputState {
        self.init("").state
    }

    /// Apply one edit to `state`.
    pub fn on_edit(&self, state: &InputState, action: EditAction) -> EditOutcome {
        let len = state.text.len();
        let sel = state.selection.clamped(len);
        let rule = self.active_rule(state);

        let (text, caret) = match action {
            EditAction::Insert(ch) => {
                if !ch.is_ascii_digit() {
                    trace!(ch = ?ch, "ignored non-digit input");
                    return EditOutcome::rejected(state);
                }
                if sel.is_empty() {
                    if let Some(limit) = self.digit_limit(rule) {
                        if state.digit_count() >= limit {
                            trace!(limit, "ignored digit past length limit");
                            return EditOutcome::rejected(state);
                        }
                    }
                }
                let pos = sel.start();
                let mut spliced = String::with_capacity(len + 1);
                spliced.push_str(&state.text[..pos]);
                spliced.push(ch);
                spliced.push_str(&state.text[sel.end()..]);
                let text = self.format(&spliced, rule);
                let skip = if text.as_bytes().get(pos) == Some(&(SEPARATOR as u8)) {
                    2
                } else {
                    1
                };
                (text, pos + skip)
            }
            EditAction::Backspace | EditAction::Delete if !sel.is_empty() => {
                let spliced = format!("{}{}", &state.text[..sel.start()], &state.text[sel.end()..]);
                (self.format(&spliced, rule), sel.start())
            }
            EditAction::Backspace => {
                let pos = sel.head;
                if pos == 0 {
                    return EditOutcome::unchanged(state);
                }
                let back = if state.text.as_bytes()[pos - 1] == SEPARATOR as u8 {
                    2
                } else {
                    1
                };
                let cut = pos.saturating_sub(back);
                let spliced = format!("{}{}", &state.text[..cut], &state.text[pos..]);
                (self.format(&spliced, rule), cut)
            }
            EditAction::Delete => {
                let pos = sel.head;
                if pos >= len {
                    return EditOutcome::unchanged(state);
                }
                let forward = if state.text.as_bytes()[pos] == SEPARATOR as u8 {
                    2
                } else {
                    1
                };
                let cut = (pos + forward).min(len);
                let spliced = format!("{}{}", &state.text[..pos], &state.text[cut..]);
                (self.format(&spliced, rule), pos)
            }
            EditAction::Clear => (String::new(), 0),
            movement => {
                return EditOutcome {
                    state: InputState {
                        selection: move_selection(sel, movement, len),
                        ..state.clone()
                    },
                    network_changed: None,
                    rejected: false,
                };
            }
        };

        let caret = caret.min(text.len());
        let mut next = InputState {
            text,
            selection: Selection::caret(caret),
            network: state.network.clone(),
        };
        let network_changed = self.resegment_if_changed(&mut next);
        EditOutcome {
            state: next,
            network_changed,
            rejected: false,
        }
    }

    /// Re-detect the network; on change, regroup the whole text under the new
    /// rule and return its name.
    ///
    /// The caret stays behind the same digit it followed before regrouping.
    fn resegment_if_changed(&self, state: &mut InputState) -> Option<String> {
        let rule = self.detect_type(&state.text);
        if rule.name == state.network {
            return None;
        }

        debug!(from = %state.network, to = %rule.name, "card network changed");
        let caret = state.cursor().min(state.text.len());
        let digits_before = state.text[..caret]
            .bytes()
            .filter(|b| b.is_ascii_digit())
            .count();
        state.text = self.format(&state.text, rule);
        state.network = rule.name.clone();
        state.selection = Selection::caret(caret_after_digits(&state.text, digits_before));
        Some(rule.name.clone())
    }
}

/// Offset just past the `n`th digit of `text` (0 for `n == 0`, the end of the
/// text when it holds fewer digits).
fn caret_after_digits(text: &str, n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    text.bytes()
        .enumerate()
        .filter(|(_, b)| b.is_ascii_digit())
        .nth(n - 1)
        .map_or(text.len(), |(i, _)| i + 1)
}

fn move_selection(sel: Selection, action: EditAction, len: usize) -> Selection {
    match action {
        EditAction::MoveLeft if !sel.is_empty() => Selection::caret(sel.start()),
        EditAction::MoveRight if !sel.is_empty() => Selection::caret(sel.end()),
        EditAction::MoveLeft => Selection::caret(sel.head.saturating_sub(1)),
        EditAction::MoveRight => Selection::caret((sel.head + 1).min(len)),
        EditAction::SelectLeft => Selection::new(sel.anchor, sel.head.saturating_sub(1)),
        EditAction::SelectRight => Selection::new(sel.anchor, (sel.head + 1).min(len)),
        EditAction::Home => Selection::caret(0),
        EditAction::End => Selection::caret(len),
        EditAction::SelectAll => Selection::new(0, len),
        _ => sel,
    }
}
