use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tui_ccfield::core::{reformat, CardFormatter, RuleTable};
use tui_ccfield::types::EditAction;

fn bench_detect(c: &mut Criterion) {
    let table = RuleTable::builtin();

    c.bench_function("detect_type", |b| {
        b.iter(|| table.detect_type(black_box("6011111111111117")))
    });
}

fn bench_reformat(c: &mut Criterion) {
    let table = RuleTable::builtin();
    let amex = table.get("amex").unwrap().clone();

    c.bench_function("reformat_amex", |b| {
        b.iter(|| reformat(black_box("3700 0000 0000 002"), &amex))
    });
}

fn bench_type_full_number(c: &mut Criterion) {
    let formatter = CardFormatter::new(RuleTable::builtin());

    c.bench_function("type_16_digits", |b| {
        b.iter(|| {
            let mut state = formatter.empty();
            for ch in black_box("4111111111111111").chars() {
                state = formatter.on_edit(&state, EditAction::Insert(ch)).state;
            }
            state
        })
    });
}

criterion_group!(benches, bench_detect, bench_reformat, bench_type_full_number);
criterion_main!(benches);
