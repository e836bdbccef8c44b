//! Invariants that must hold after any sequence of bag operations.

use std::collections::HashSet;

use proptest::prelude::*;
use ritual_bag::prelude::*;

const PRODUCTS: [&str; 3] = ["prod-1", "prod-2", "prod-3"];
const VARIANTS: [Option<&str>; 3] = [None, Some("50ml"), Some("100ml")];

#[derive(Debug, Clone)]
enum Op {
    Add { product: usize, variant: usize, cents: i64 },
    Remove { product: usize, variant: usize },
    Update { product: usize, variant: usize, quantity: i64 },
    Clear,
    Open,
    Close,
}

fn key(product: usize, variant: usize) -> ItemKey {
    ItemKey::new(PRODUCTS[product], VARIANTS[variant])
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..3usize, 0..3usize, 0..100_000i64)
            .prop_map(|(product, variant, cents)| Op::Add { product, variant, cents }),
        1 => (0..3usize, 0..3usize).prop_map(|(product, variant)| Op::Remove { product, variant }),
        2 => (0..3usize, 0..3usize, -10..50i64)
            .prop_map(|(product, variant, quantity)| Op::Update { product, variant, quantity }),
        1 => Just(Op::Clear),
        1 => Just(Op::Open),
        1 => Just(Op::Close),
    ]
}

fn apply(bag: &mut RitualBag, op: &Op) {
    match *op {
        Op::Add { product, variant, cents } => {
            bag.add_item(
                PRODUCTS[product],
                VARIANTS[variant],
                "Item",
                Money::new(cents, Currency::USD),
                "",
            )
            .unwrap();
        }
        Op::Remove { product, variant } => {
            bag.remove_item(&key(product, variant));
        }
        Op::Update { product, variant, quantity } => {
            bag.update_quantity(&key(product, variant), quantity).unwrap();
        }
        Op::Clear => bag.clear(),
        Op::Open => bag.open_drawer(),
        Op::Close => bag.close_drawer(),
    }
}

proptest! {
    #[test]
    fn keys_stay_unique(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut bag = RitualBag::new(Currency::USD);
        for op in &ops {
            apply(&mut bag, op);
            let keys: HashSet<_> = bag.lines().iter().map(|l| l.key.clone()).collect();
            prop_assert_eq!(keys.len(), bag.lines().len());
        }
    }

    #[test]
    fn quantities_stay_positive(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut bag = RitualBag::new(Currency::USD);
        for op in &ops {
            apply(&mut bag, op);
            prop_assert!(bag.lines().iter().all(|l| l.quantity >= 1));
        }
    }

    #[test]
    fn totals_match_lines(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut bag = RitualBag::new(Currency::USD);
        for op in &ops {
            apply(&mut bag, op);
            let items: i64 = bag.lines().iter().map(|l| l.quantity).sum();
            let cents: i64 = bag
                .lines()
                .iter()
                .map(|l| l.quantity * l.unit_price.amount_cents)
                .sum();
            prop_assert_eq!(bag.total_items(), items);
            prop_assert_eq!(bag.total_price().unwrap(), Money::new(cents, Currency::USD));
        }
    }

    #[test]
    fn add_always_opens_and_close_sticks(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut bag = RitualBag::new(Currency::USD);
        for op in &ops {
            let before = bag.is_open();
            apply(&mut bag, op);
            match op {
                Op::Add { .. } | Op::Open => prop_assert!(bag.is_open()),
                Op::Close => prop_assert!(!bag.is_open()),
                _ => prop_assert_eq!(bag.is_open(), before),
            }
        }
    }

    #[test]
    fn removing_absent_key_changes_nothing(ops in prop::collection::vec(op_strategy(), 0..30)) {
        let mut bag = RitualBag::new(Currency::USD);
        for op in &ops {
            apply(&mut bag, op);
        }
        let absent = ItemKey::product("prod-absent");
        let before = bag.clone();
        prop_assert!(!bag.remove_item(&absent));
        prop_assert_eq!(bag, before);
    }
}
