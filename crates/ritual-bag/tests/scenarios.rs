//! End-to-end bag scenarios, each continuing from the state the previous one left.

use ritual_bag::prelude::*;

fn usd(amount: f64) -> Money {
    Money::from_decimal(amount, Currency::USD).unwrap()
}

fn add_rose_oil(bag: &mut RitualBag) {
    bag.add_item("prod-1", None, "Rose Oil", usd(42.00), "img.jpg")
        .unwrap();
}

#[test]
fn test_rose_oil_lifecycle() {
    let rose = ItemKey::product("prod-1");

    // 1. first add
    let mut bag = RitualBag::new(Currency::USD);
    assert!(bag.lines().is_empty());
    assert!(!bag.is_open());

    add_rose_oil(&mut bag);
    assert_eq!(bag.lines().len(), 1);
    let line = &bag.lines()[0];
    assert_eq!(line.key, rose);
    assert_eq!(line.quantity, 1);
    assert_eq!(line.unit_price, usd(42.00));
    assert_eq!(bag.total_items(), 1);
    assert_eq!(bag.total_price().unwrap(), usd(42.00));
    assert!(bag.is_open());

    // 2. same add merges
    add_rose_oil(&mut bag);
    assert_eq!(bag.lines().len(), 1);
    assert_eq!(bag.lines()[0].quantity, 2);
    assert_eq!(bag.total_price().unwrap(), usd(84.00));

    // 3. exact quantity
    bag.update_quantity(&rose, 5).unwrap();
    assert_eq!(bag.lines()[0].quantity, 5);
    assert_eq!(bag.total_price().unwrap(), usd(210.00));

    // 4. zero removes
    bag.update_quantity(&rose, 0).unwrap();
    assert!(bag.lines().is_empty());
    assert_eq!(bag.total_items(), 0);
    assert_eq!(bag.total_price().unwrap(), usd(0.0));
}

#[test]
fn test_variants_are_separate_lines() {
    let mut bag = RitualBag::new(Currency::USD);
    bag.add_item("prod-2", Some("50ml"), "Oud Elixir", usd(60.0), "oud.jpg")
        .unwrap();
    bag.add_item("prod-2", Some("100ml"), "Oud Elixir", usd(95.0), "oud.jpg")
        .unwrap();

    assert_eq!(bag.lines().len(), 2);
    assert_eq!(bag.lines()[0].key, ItemKey::variant("prod-2", "50ml"));
    assert_eq!(bag.lines()[1].key, ItemKey::variant("prod-2", "100ml"));
    assert_eq!(bag.total_items(), 2);
    assert_eq!(bag.total_price().unwrap(), usd(155.0));
}

#[test]
fn test_clear_leaves_drawer_unchanged() {
    let mut bag = RitualBag::new(Currency::USD);
    add_rose_oil(&mut bag);
    bag.add_item("prod-2", Some("50ml"), "Oud Elixir", usd(60.0), "oud.jpg")
        .unwrap();
    assert!(bag.is_open());

    bag.clear();
    assert!(bag.lines().is_empty());
    assert!(bag.is_open());

    add_rose_oil(&mut bag);
    bag.close_drawer();
    bag.clear();
    assert!(bag.lines().is_empty());
    assert!(!bag.is_open());
}

#[test]
fn test_totals_follow_checkout_snapshot() {
    let mut bag = RitualBag::new(Currency::USD);
    add_rose_oil(&mut bag);
    add_rose_oil(&mut bag);
    bag.add_item("prod-2", Some("100ml"), "Oud Elixir", usd(95.0), "oud.jpg")
        .unwrap();

    let snapshot = bag.checkout_snapshot().unwrap();
    assert_eq!(snapshot.totals, bag.totals().unwrap());
    assert_eq!(snapshot.totals.total_items, 3);
    assert_eq!(snapshot.totals.total_price, usd(179.0));
    assert_eq!(snapshot.totals.line_count, 2);
}
