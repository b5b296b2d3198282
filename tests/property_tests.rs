//! Property tests for detection, grouping and edits.

use proptest::prelude::*;

use tui_ccfield::core::{reformat, strip_separators, CardFormatter, RuleTable};
use tui_ccfield::types::{CardTypeRule, EditAction, SEPARATOR};

fn action() -> impl Strategy<Value = EditAction> {
    prop_oneof![
        4 => proptest::char::range('0', '9').prop_map(EditAction::Insert),
        1 => proptest::char::range(' ', '~').prop_map(EditAction::Insert),
        1 => Just(EditAction::Backspace),
        1 => Just(EditAction::Delete),
        1 => Just(EditAction::MoveLeft),
        1 => Just(EditAction::MoveRight),
        1 => Just(EditAction::SelectLeft),
        1 => Just(EditAction::SelectRight),
        1 => Just(EditAction::Home),
        1 => Just(EditAction::End),
        1 => Just(EditAction::SelectAll),
    ]
}

fn table_with_short_rule() -> RuleTable {
    let mut table = RuleTable::builtin();
    table
        .push(CardTypeRule::new("short", &[2, 4, 4], &["123"]))
        .unwrap();
    table
}

fn well_formed(text: &str) -> bool {
    !text.starts_with(SEPARATOR)
        && !text.ends_with(SEPARATOR)
        && !text.contains("  ")
        && text.chars().all(|c| c.is_ascii_digit() || c == SEPARATOR)
}

proptest! {
    #[test]
    fn detect_is_deterministic(digits in "[0-9]{0,20}") {
        let table = RuleTable::builtin();
        prop_assert_eq!(&table.detect_type(&digits).name, &table.detect_type(&digits).name);
        let other = RuleTable::builtin();
        prop_assert_eq!(&table.detect_type(&digits).name, &other.detect_type(&digits).name);
    }

    #[test]
    fn reformat_is_idempotent(digits in "[0-9]{0,24}") {
        let table = RuleTable::builtin();
        let rule = table.detect_type(&digits);
        let once = reformat(&digits, rule);
        prop_assert_eq!(&reformat(&strip_separators(&once), rule), &once);
        prop_assert_eq!(&reformat(&once, rule), &once);
        prop_assert!(well_formed(&once));
    }

    #[test]
    fn reformat_never_reorders_digits(digits in "[0-9]{0,24}") {
        let table = RuleTable::builtin();
        let rule = table.detect_type(&digits);
        let out = strip_separators(&reformat(&digits, rule));
        prop_assert!(digits.starts_with(&out));
        if let Some(max) = rule.max_digits() {
            prop_assert_eq!(out.len(), digits.len().min(max));
        } else {
            prop_assert_eq!(out.len(), digits.len());
        }
    }

    #[test]
    fn edits_keep_field_consistent(actions in proptest::collection::vec(action(), 0..60)) {
        let f = CardFormatter::new(RuleTable::builtin());
        let mut state = f.empty();
        for a in actions {
            let out = f.on_edit(&state, a);
            state = out.state;
            prop_assert!(well_formed(&state.text), "bad text {:?}", state.text);
            prop_assert!(state.selection.anchor <= state.text.len());
            prop_assert!(state.selection.head <= state.text.len());
            prop_assert_eq!(&state.network, &f.detect_type(&state.text).name);
            prop_assert_eq!(&state.text, &f.format(&state.text, f.active_rule(&state)));
        }
    }

    #[test]
    fn typed_digit_sits_just_before_caret(actions in proptest::collection::vec(action(), 0..60)) {
        let f = CardFormatter::new(table_with_short_rule());
        let mut state = f.empty();
        for a in actions {
            let out = f.on_edit(&state, a);
            state = out.state;
            if let (EditAction::Insert(ch), false) = (a, out.rejected) {
                let before = &state.text[..state.cursor()];
                prop_assert!(
                    before.ends_with(ch),
                    "typed {:?}, text {:?}, caret {}",
                    ch,
                    state.text,
                    state.cursor()
                );
            }
            prop_assert_eq!(&state.network, &f.detect_type(&state.text).name);
        }
    }

    #[test]
    fn rejected_edits_change_nothing(prefix in "[0-9]{0,12}", ch in "[a-zA-Z ./-]") {
        let f = CardFormatter::new(RuleTable::builtin());
        let state = f.init(&prefix).state;
        let c = ch.chars().next().unwrap();
        let out = f.on_edit(&state, EditAction::Insert(c));
        prop_assert!(out.rejected);
        prop_assert_eq!(out.state, state);
        prop_assert!(out.network_changed.is_none());
    }
}
