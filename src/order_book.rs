//! The matching engine: both side books behind one readers/writer lock.
//!
//! Writers (`add_limit_order`, `process_market_order`, the ingress drain)
//! take the lock exclusively; observers (`get_best_prices`, `get_depth`)
//! share it and see a consistent snapshot from a single point between
//! writers. The ingress ring is the only concurrent structure outside the
//! lock.
//!
//! Limit orders only add liquidity here; they are matched exclusively by
//! market orders from the other side. A market order's unfilled remainder is
//! dropped, never rested.

use crate::batch::{apply_quantity_updates, QuantityUpdate};
use crate::book::BookSide;
use crate::ring::{IngressRing, DEFAULT_RING_CAPACITY};
use crate::types::{MatchResult, Order, OrderId, OrderType, PriceLevel, Side};
use parking_lot::RwLock;
use std::time::Instant;

struct Books {
    bids: BookSide,
    asks: BookSide,
}

/// In-memory limit-order-book matching engine.
///
/// All submission paths stamp a monotonic nanosecond timestamp at admission.
/// The synchronous API routes under the book lock directly; producers that
/// must not contend on it enqueue via [`OrderBook::try_submit`] and a drain
/// loop applies the backlog in admission order.
pub struct OrderBook {
    books: RwLock<Books>,
    ingress: IngressRing<Order>,
    epoch: Instant,
}

impl OrderBook {
    /// Engine with the reference ingress capacity
    /// ([`DEFAULT_RING_CAPACITY`]).
    pub fn new() -> Self {
        Self::with_ring_capacity(DEFAULT_RING_CAPACITY)
    }

    /// Engine with an ingress ring of `capacity` slots (nonzero power of
    /// two).
    pub fn with_ring_capacity(capacity: usize) -> Self {
        Self {
            books: RwLock::new(Books {
                bids: BookSide::new(Side::Buy),
                asks: BookSide::new(Side::Sell),
            }),
            ingress: IngressRing::with_capacity(capacity),
            epoch: Instant::now(),
        }
    }

    fn now_nanos(&self) -> u64 {
        self.epoch.elapsed().as_nanos() as u64
    }

    /// Adds a resting limit order: locate-or-create the level at `price` on
    /// `side` and fold `quantity` into its aggregate.
    ///
    /// Returns `false` only when validation rejects the order (zero
    /// quantity, non-finite or non-positive price, embedded NUL in `id`).
    pub fn add_limit_order(&self, side: Side, price: f64, quantity: u32, id: &str) -> bool {
        let id = match OrderId::try_new(id) {
            Ok(id) => id,
            Err(reason) => {
                log::debug!("rejecting limit order {id:?}: {reason}");
                return false;
            }
        };
        let mut order = Order::limit(side, price, quantity, id);
        if let Err(reason) = order.validate() {
            log::debug!("rejecting limit order {id}: {reason}");
            return false;
        }
        order.timestamp = self.now_nanos();
        let mut books = self.books.write();
        Self::apply_limit(&mut books, &order);
        true
    }

    /// Adds a slice of limit orders in one critical section, stamping each
    /// at admission. Invalid orders are skipped. Returns how many were
    /// applied.
    pub fn add_limit_orders(&self, orders: &[Order]) -> usize {
        let admitted = self.now_nanos();
        let mut books = self.books.write();
        let mut applied = 0;
        for order in orders {
            let mut order = *order;
            if order.order_type != OrderType::Limit {
                log::debug!("skipping non-limit order {} in batch add", order.id);
                continue;
            }
            if let Err(reason) = order.validate() {
                log::debug!("skipping limit order {}: {reason}", order.id);
                continue;
            }
            order.timestamp = admitted;
            Self::apply_limit(&mut books, &order);
            applied += 1;
        }
        applied
    }

    /// Executes a market order against the opposing side, best price first:
    /// a buy consumes asks cheapest-first, a sell consumes bids
    /// highest-first. Levels drained to zero are erased before the lock is
    /// released. Partial fills are returned as-is; the remainder is dropped.
    pub fn process_market_order(&self, side: Side, quantity: u32, id: &str) -> Vec<MatchResult> {
        let mut order = Order::market(side, quantity, OrderId::new(id));
        order.timestamp = self.now_nanos();
        let mut books = self.books.write();
        Self::apply_market(&mut books, &order)
    }

    /// Best bid and best ask under a shared lock. `0.0` means that side is
    /// empty; it is never a valid resting price.
    pub fn get_best_prices(&self) -> (f64, f64) {
        let books = self.books.read();
        (
            books.bids.best_price().unwrap_or(0.0),
            books.asks.best_price().unwrap_or(0.0),
        )
    }

    /// Up to `levels` aggregates from `side`, best-first (bids descending,
    /// asks ascending), snapshotted by value.
    pub fn get_depth(&self, side: Side, levels: usize) -> Vec<PriceLevel> {
        let books = self.books.read();
        match side {
            Side::Buy => books.bids.depth(levels),
            Side::Sell => books.asks.depth(levels),
        }
    }

    /// Stamps `order` at admission and enqueues it on the ingress ring
    /// without touching the book lock. Returns `false` when the order fails
    /// validation or the ring is full (backpressure).
    pub fn try_submit(&self, mut order: Order) -> bool {
        if let Err(reason) = order.validate() {
            log::debug!("rejecting submitted order {}: {reason}", order.id);
            return false;
        }
        order.timestamp = self.now_nanos();
        self.ingress.try_enqueue(order)
    }

    /// Applies up to `max` enqueued orders under one writer critical
    /// section, in ring order. Market fills produced here are discarded;
    /// callers that need them use [`OrderBook::process_market_order`].
    /// Returns how many records were drained.
    pub fn drain_ingress(&self, max: usize) -> usize {
        if max == 0 {
            return 0;
        }
        let mut books = self.books.write();
        let mut processed = 0;
        while processed < max {
            let Some(order) = self.ingress.try_dequeue() else {
                break;
            };
            match order.order_type {
                OrderType::Limit => Self::apply_limit(&mut books, &order),
                OrderType::Market => {
                    let _ = Self::apply_market(&mut books, &order);
                }
                OrderType::Ioc => {
                    log::warn!("dropping order {}: IOC is not supported", order.id);
                }
            }
            processed += 1;
        }
        processed
    }

    /// Committed-but-undrained ingress records.
    pub fn pending_ingress(&self) -> usize {
        self.ingress.len()
    }

    fn apply_limit(books: &mut Books, order: &Order) {
        let book = match order.side {
            Side::Buy => &mut books.bids,
            Side::Sell => &mut books.asks,
        };
        let level = book.level_mut(order.price);
        let mut batch = [QuantityUpdate {
            level: Some(level),
            delta: order.quantity as i32,
        }];
        apply_quantity_updates(&mut batch);
    }

    fn apply_market(books: &mut Books, order: &Order) -> Vec<MatchResult> {
        let opposing = match order.side {
            Side::Buy => &mut books.asks,
            Side::Sell => &mut books.bids,
        };
        opposing.consume(order.quantity, order.id)
    }
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}
