//! Property-based and deterministic invariant tests.
//!
//! Replays generated order streams through the public API against a plain
//! ordered-map model and asserts, after every market order and at the end:
//! quantity conservation, no empty levels at rest, best-price correctness,
//! depth ordering, match price monotonicity, and the match sum bound.

use hp_orderbook::market_data_gen::{replay_into_book, Generator, GeneratorConfig};
use hp_orderbook::{OrderBook, OrderType, Side};
use ordered_float::OrderedFloat;
use proptest::prelude::*;
use std::collections::BTreeMap;

/// Reference model of one side: price -> (total_quantity, order_count).
type SideModel = BTreeMap<OrderedFloat<f64>, (u64, u32)>;

fn model_available(model: &SideModel) -> u64 {
    model.values().map(|(quantity, _)| quantity).sum()
}

/// Asserts the book's full depth snapshot equals the model, best-first.
fn assert_depth_matches_model(book: &OrderBook, side: Side, model: &SideModel) {
    let depth = book.get_depth(side, usize::MAX);
    assert_eq!(depth.len(), model.len(), "level count mismatch on {side:?}");

    let expected: Vec<(f64, u64, u32)> = match side {
        Side::Buy => model
            .iter()
            .rev()
            .map(|(p, (q, c))| (p.into_inner(), *q, *c))
            .collect(),
        Side::Sell => model
            .iter()
            .map(|(p, (q, c))| (p.into_inner(), *q, *c))
            .collect(),
    };
    for (level, (price, quantity, count)) in depth.iter().zip(expected) {
        assert_eq!(level.price, price);
        assert_eq!(u64::from(level.total_quantity), quantity, "at price {price}");
        assert_eq!(level.order_count, count, "at price {price}");
        assert!(level.total_quantity > 0, "empty level at rest: {price}");
    }

    let best = book.get_best_prices();
    let best_on_side = match side {
        Side::Buy => best.0,
        Side::Sell => best.1,
    };
    let model_best = match side {
        Side::Buy => model.last_key_value(),
        Side::Sell => model.first_key_value(),
    };
    assert_eq!(
        best_on_side,
        model_best.map(|(p, _)| p.into_inner()).unwrap_or(0.0)
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// Replaying any generated stream preserves the book invariants and every
    /// market order's fills are best-first, bounded, and conserved.
    #[test]
    fn prop_invariants_hold_after_replay(seed in 0u64..100_000u64, num_orders in 10usize..200usize) {
        let orders = Generator::new(GeneratorConfig {
            seed,
            num_orders,
            limit_ratio: 0.8,
            ..Default::default()
        })
        .all_orders();

        let book = OrderBook::with_ring_capacity(1024);
        let mut bids: SideModel = BTreeMap::new();
        let mut asks: SideModel = BTreeMap::new();

        for order in orders {
            match order.order_type {
                OrderType::Limit => {
                    prop_assert!(book.add_limit_order(
                        order.side,
                        order.price,
                        order.quantity,
                        order.id.as_str()
                    ));
                    let model = match order.side {
                        Side::Buy => &mut bids,
                        Side::Sell => &mut asks,
                    };
                    let entry = model.entry(OrderedFloat(order.price)).or_insert((0, 0));
                    entry.0 += u64::from(order.quantity);
                    entry.1 += 1;
                }
                _ => {
                    let opposing = match order.side {
                        Side::Buy => &mut asks,
                        Side::Sell => &mut bids,
                    };
                    let available = model_available(opposing);
                    let matches =
                        book.process_market_order(order.side, order.quantity, order.id.as_str());

                    // Match sum bound: exactly min(requested, available).
                    let matched: u64 = matches.iter().map(|m| u64::from(m.quantity)).sum();
                    prop_assert_eq!(matched, available.min(u64::from(order.quantity)));

                    // Price monotonicity: buys sweep upward, sells downward.
                    for pair in matches.windows(2) {
                        match order.side {
                            Side::Buy => prop_assert!(pair[0].price <= pair[1].price),
                            Side::Sell => prop_assert!(pair[0].price >= pair[1].price),
                        }
                    }

                    for m in &matches {
                        prop_assert!(m.quantity > 0);
                        prop_assert_eq!(m.counterparty_id, order.id);
                        let entry = opposing
                            .get_mut(&OrderedFloat(m.price))
                            .expect("fill at unknown level");
                        entry.0 -= u64::from(m.quantity);
                        if entry.0 == 0 {
                            opposing.remove(&OrderedFloat(m.price));
                        }
                    }
                }
            }
        }

        assert_depth_matches_model(&book, Side::Buy, &bids);
        assert_depth_matches_model(&book, Side::Sell, &asks);
    }
}

/// Deterministic replay: same config, same outcome.
#[test]
fn deterministic_replay_same_seed_same_outcome() {
    let config = GeneratorConfig {
        seed: 999,
        num_orders: 150,
        ..Default::default()
    };

    let book1 = OrderBook::with_ring_capacity(1024);
    let stats1 = replay_into_book(&book1, Generator::new(config.clone()).all_orders());

    let book2 = OrderBook::with_ring_capacity(1024);
    let stats2 = replay_into_book(&book2, Generator::new(config).all_orders());

    assert_eq!(stats1, stats2);
    assert_eq!(book1.get_best_prices(), book2.get_best_prices());
    assert_eq!(
        book1.get_depth(Side::Buy, usize::MAX).len(),
        book2.get_depth(Side::Buy, usize::MAX).len()
    );
}
