//! Read-only facts about an entered card number, shown next to the field.

use crate::format::{digits_only, reformat};
use crate::types::{CardTypeRule, DEFAULT_GROUPS, MASK_CHAR, VISIBLE_TAIL_DIGITS};

/// Last four digits, or fewer if the number is shorter.
pub fn last_four(number: &str) -> String {
    let digits = digits_only(number);
    let skip = digits.len().saturating_sub(VISIBLE_TAIL_DIGITS);
    digits[skip..].to_string()
}

/// Number grouped under `rule` with all but the last four digits hidden.
pub fn masked(number: &str, rule: &CardTypeRule) -> String {
    let grouped = reformat(&digits_only(number), rule);
    let total = grouped.bytes().filter(|b| b.is_ascii_digit()).count();
    let hidden = total.saturating_sub(VISIBLE_TAIL_DIGITS);

    let mut seen = 0;
    grouped
        .chars()
        .map(|c| {
            if c.is_ascii_digit() {
                seen += 1;
                if seen <= hidden {
                    return MASK_CHAR;
                }
            }
            c
        })
        .collect()
}

/// Mod-10 (Luhn) checksum over the digits of `number`.
///
/// Returns false for empty input.
pub fn luhn_valid(number: &str) -> bool {
    let digits = digits_only(number);
    if digits.is_empty() {
        return false;
    }
    let sum: u32 = digits
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, b)| {
            let d = (b - b'0') as u32;
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}

/// Whether enough digits were entered for `rule`.
///
/// Named rules need exactly their full length. The fallback rule needs at
/// least the default grouping length.
pub fn is_complete(number: &str, rule: &CardTypeRule) -> bool {
    let count = digits_only(number).len();
    match rule.max_digits() {
        Some(max) => count == max,
        None => count >= DEFAULT_GROUPS.iter().sum::<usize>(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleTable;

    #[test]
    fn last_four_handles_short_input() {
        assert_eq!(last_four("4111 1111 1111 1234"), "1234");
        assert_eq!(last_four("41"), "41");
        assert_eq!(last_four(""), "");
    }

    #[test]
    fn masked_hides_all_but_tail() {
        let table = RuleTable::builtin();
        assert_eq!(
            masked("4111111111111234", table.get("visa").unwrap()),
            "•••• •••• •••• 1234"
        );
        assert_eq!(
            masked("378282246310005", table.get("amex").unwrap()),
            "•••• •••••• •0005"
        );
        assert_eq!(masked("411", table.get("visa").unwrap()), "411");
    }

    #[test]
    fn luhn_accepts_test_numbers() {
        assert!(luhn_valid("4111 1111 1111 1111"));
        assert!(luhn_valid("6011111111111117"));
        assert!(luhn_valid("378282246310005"));
        assert!(luhn_valid("370000000000002"));
        assert!(!luhn_valid("4111111111111112"));
        assert!(!luhn_valid(""));
    }

    #[test]
    fn completeness_follows_rule_length() {
        let table = RuleTable::builtin();
        let amex = table.get("amex").unwrap();
        assert!(is_complete("370000000000002", amex));
        assert!(!is_complete("37000000000000", amex));
        assert!(is_complete("9999999999999999", table.fallback()));
        assert!(!is_complete("999", table.fallback()));
    }
}
