//! Digit grouping for the display string.

use crate::types::{CardTypeRule, SEPARATOR};

/// Remove every whitespace character.
pub fn strip_separators(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Keep only ASCII digits (used for pasted or pre-filled values).
pub fn digits_only(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Re-segment `number` into the grouping defined by `rule`.
///
/// Existing separators are stripped first, then a single space is inserted at
/// each group boundary, consuming groups left to right. Named rules truncate
/// at the sum of their groups. The fallback rule keeps any digits beyond its
/// groups attached to the last group.
///
/// ```
/// use tui_ccfield_core::{reformat, RuleTable};
///
/// let table = RuleTable::builtin();
/// let amex = table.get("amex").unwrap();
/// assert_eq!(reformat("370000000000002", amex), "3700 000000 00002");
/// ```
pub fn reformat(number: &str, rule: &CardTypeRule) -> String {
    let digits: Vec<char> = number.chars().filter(|c| !c.is_whitespace()).collect();
    let mut rest = digits.as_slice();
    if let Some(max) = rule.max_digits() {
        rest = &rest[..rest.len().min(max)];
    }

    let mut out = String::with_capacity(rest.len() + rule.digit_groups.len());
    for &group in &rule.digit_groups {
        if rest.is_empty() {
            break;
        }
        let (head, tail) = rest.split_at(group.min(rest.len()));
        if !out.is_empty() {
            out.push(SEPARATOR);
        }
        out.extend(head);
        rest = tail;
    }
    out.extend(rest);
    out
}

/// Length of the display string for `digits` digits under `rule`.
pub fn display_len(digits: usize, rule: &CardTypeRule) -> usize {
    let digits = match rule.max_digits() {
        Some(max) => digits.min(max),
        None => digits,
    };
    let mut remaining = digits;
    let mut separators: usize = 0;
    for &group in &rule.digit_groups {
        if remaining == 0 {
            break;
        }
        remaining = remaining.saturating_sub(group);
        separators += 1;
    }
    digits + separators.saturating_sub(1)
}
