use proptest::prelude::*;
use rust_decimal::Decimal;
use statera_core::{aggregate, Engine, LineItemId, LineItemPatch, LineItemStore, SectionKey};
use statera_io::{
    export_snapshot, export_tabular_string, import_snapshot, import_tabular_str, ImportOptions,
    TabularOptions,
};

fn section_strategy() -> impl Strategy<Value = SectionKey> {
    (0..SectionKey::COUNT).prop_map(|i| SectionKey::ALL[i])
}

fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (-1_000_000_000i64..1_000_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn name_strategy() -> impl Strategy<Value = String> {
    " {0,2}[A-Za-zñé][A-Za-z0-9ñé ,;\"\n]{0,12}[A-Za-z0-9] {0,2}"
}

fn items_strategy() -> impl Strategy<Value = Vec<(SectionKey, String, Decimal)>> {
    prop::collection::vec((section_strategy(), name_strategy(), amount_strategy()), 0..40)
}

/// One edit against the engine; indexes pick among the live items
#[derive(Debug, Clone)]
enum Op {
    Add(SectionKey, Decimal),
    Update(usize, Decimal),
    Remove(usize),
    Move(usize, SectionKey),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (section_strategy(), amount_strategy()).prop_map(|(s, a)| Op::Add(s, a)),
        (any::<usize>(), amount_strategy()).prop_map(|(i, a)| Op::Update(i, a)),
        any::<usize>().prop_map(Op::Remove),
        (any::<usize>(), section_strategy()).prop_map(|(i, s)| Op::Move(i, s)),
    ]
}

fn model_sum(model: &[(LineItemId, SectionKey, Decimal)], keys: &[SectionKey]) -> Decimal {
    model
        .iter()
        .filter(|(_, section, _)| keys.contains(section))
        .map(|(_, _, amount)| *amount)
        .sum()
}

fn engine_with(items: &[(SectionKey, String, Decimal)]) -> Engine {
    let mut engine = Engine::default();
    for (section, name, amount) in items {
        engine.add_line_item(*section, Some(name.as_str()), Some(*amount));
    }
    engine
}

fn section_sum(store: &LineItemStore, section: SectionKey) -> Decimal {
    store.section(section).iter().map(|i| i.amount).sum()
}

proptest! {
    #[test]
    fn totals_are_sums_of_subtotals(items in items_strategy()) {
        let engine = engine_with(&items);
        let totals = aggregate(engine.store());
        let s = &totals.sections;

        prop_assert_eq!(totals.total_assets, s.assets_current + s.assets_non_current);
        prop_assert_eq!(totals.total_liabilities, s.liabilities_current + s.liabilities_non_current);
        prop_assert_eq!(totals.total_equity, s.equity);
        for key in SectionKey::ALL {
            prop_assert_eq!(s.get(key), section_sum(engine.store(), key));
        }
    }

    #[test]
    fn net_result_matches_revenue_less_expenses(items in items_strategy()) {
        let result = engine_with(&items).compute();
        let is = &result.income_statement;
        prop_assert_eq!(is.net_result, is.total_revenue - is.total_expenses);
        prop_assert_eq!(result.imbalance, result.balance_sheet.total_assets - result.balance_sheet.liabilities_plus_equity);
    }

    #[test]
    fn totals_follow_every_edit(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut engine = Engine::default();
        let mut model: Vec<(LineItemId, SectionKey, Decimal)> = Vec::new();

        for op in ops {
            match op {
                Op::Add(section, amount) => {
                    let id = engine.add_line_item(section, None, Some(amount));
                    model.push((id, section, amount));
                }
                Op::Update(i, amount) if !model.is_empty() => {
                    let len = model.len();
                    let slot = &mut model[i % len];
                    engine.update_line_item(&slot.0, &LineItemPatch::amount(amount));
                    slot.2 = amount;
                }
                Op::Remove(i) if !model.is_empty() => {
                    let len = model.len();
                    let (id, _, _) = model.remove(i % len);
                    prop_assert!(engine.remove_line_item(&id));
                }
                Op::Move(i, section) if !model.is_empty() => {
                    let len = model.len();
                    let slot = &mut model[i % len];
                    engine.move_line_item(&slot.0, section);
                    slot.1 = section;
                }
                _ => {}
            }

            prop_assert_eq!(engine.store().len(), model.len());
            let result = engine.recompute().clone();
            prop_assert_eq!(
                result.balance_sheet.total_assets,
                model_sum(&model, &[SectionKey::AssetsCurrent, SectionKey::AssetsNonCurrent])
            );
            for key in SectionKey::ALL {
                prop_assert_eq!(result.totals.sections.get(key), model_sum(&model, &[key]));
            }
        }
    }

    #[test]
    fn recompute_twice_is_equal(items in items_strategy()) {
        let mut engine = engine_with(&items);
        let first = engine.recompute().clone();
        let second = engine.recompute().clone();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn snapshot_round_trip(items in items_strategy()) {
        let source = engine_with(&items);
        let json = export_snapshot(&source).unwrap();

        let mut target = Engine::default();
        import_snapshot(&mut target, &json, ImportOptions::default()).unwrap();
        prop_assert_eq!(target.store(), source.store());
    }

    #[test]
    fn tabular_round_trip_preserves_section_sums(items in items_strategy()) {
        let source = engine_with(&items);
        let text = export_tabular_string(&source, b',').unwrap();

        let mut target = Engine::default();
        let report = import_tabular_str(&mut target, &text, TabularOptions::default()).unwrap();
        prop_assert_eq!(report.imported, items.len());
        prop_assert!(report.rejected.is_empty());
        prop_assert!(report.flagged.is_empty());

        for key in SectionKey::ALL {
            prop_assert_eq!(section_sum(target.store(), key), section_sum(source.store(), key));
            let names: Vec<_> = target.store().section(key).iter().map(|i| i.name.clone()).collect();
            let expected: Vec<_> = source.store().section(key).iter().map(|i| i.name.clone()).collect();
            prop_assert_eq!(names, expected);
        }
    }
}
