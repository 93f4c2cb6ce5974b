//! Synthetic order streams.
//!
//! Deterministic, configurable generator for replay tests, benchmarks, and
//! the stress driver. Same seed, same stream.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::{Order, OrderId, OrderType, Side};
use crate::OrderBook;

/// Configuration for the synthetic order generator. Ranges are inclusive;
/// same config + seed produces the same stream.
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    /// RNG seed.
    pub seed: u64,
    /// Number of orders produced by [`Generator::all_orders`].
    pub num_orders: usize,
    /// Probability of Buy (0.0..=1.0). Sell otherwise.
    pub buy_ratio: f64,
    /// Probability of a limit order (0.0..=1.0). Market otherwise.
    pub limit_ratio: f64,
    /// Price range for limit orders. Ignored for market orders.
    pub price_min: f64,
    pub price_max: f64,
    /// Quantity range, whole units.
    pub quantity_min: u32,
    pub quantity_max: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            num_orders: 1000,
            buy_ratio: 0.5,
            limit_ratio: 0.9,
            price_min: 90.0,
            price_max: 110.0,
            quantity_min: 100,
            quantity_max: 1000,
        }
    }
}

/// Deterministic order stream. Ids are `gen-<n>` with `n` counting from 1.
pub struct Generator {
    rng: StdRng,
    config: GeneratorConfig,
    next_seq: u64,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            rng,
            config,
            next_seq: 1,
        }
    }

    /// Generates the next order, advancing the RNG and sequence counter.
    pub fn next_order(&mut self) -> Order {
        let id = OrderId::new(&format!("gen-{}", self.next_seq));
        self.next_seq += 1;
        let side = if self.rng.gen::<f64>() < self.config.buy_ratio {
            Side::Buy
        } else {
            Side::Sell
        };
        let quantity = self
            .rng
            .gen_range(self.config.quantity_min..=self.config.quantity_max);
        if self.rng.gen::<f64>() < self.config.limit_ratio {
            let price = self
                .rng
                .gen_range(self.config.price_min..=self.config.price_max);
            Order::limit(side, price, quantity, id)
        } else {
            Order::market(side, quantity, id)
        }
    }

    /// Exactly `n` orders, advancing the generator state.
    pub fn take_orders(&mut self, n: usize) -> Vec<Order> {
        (0..n).map(|_| self.next_order()).collect()
    }

    /// The full stream, as sized by `config.num_orders`.
    pub fn all_orders(&mut self) -> Vec<Order> {
        self.take_orders(self.config.num_orders)
    }
}

/// Totals from replaying a stream through the public API.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub limit_orders: usize,
    pub market_orders: usize,
    pub fills: usize,
    pub matched_quantity: u64,
}

/// Replays `orders` into `book` through the synchronous API, routing by
/// order type.
pub fn replay_into_book(book: &OrderBook, orders: impl IntoIterator<Item = Order>) -> ReplayStats {
    let mut stats = ReplayStats::default();
    for order in orders {
        match order.order_type {
            OrderType::Market => {
                let matches =
                    book.process_market_order(order.side, order.quantity, order.id.as_str());
                stats.market_orders += 1;
                stats.fills += matches.len();
                stats.matched_quantity += matches
                    .iter()
                    .map(|m| u64::from(m.quantity))
                    .sum::<u64>();
            }
            OrderType::Limit => {
                if book.add_limit_order(order.side, order.price, order.quantity, order.id.as_str())
                {
                    stats.limit_orders += 1;
                }
            }
            OrderType::Ioc => {
                log::debug!("skipping unsupported IOC order {} in replay", order.id);
            }
        }
    }
    stats
}
