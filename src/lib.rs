//! # hp-orderbook
//!
//! High-performance in-memory limit order book: price-level aggregation,
//! price-priority market matching, and a lock-free multi-producer ingress
//! ring.
//!
//! ## Entry point
//!
//! Use [`OrderBook`] as the single entry point: limit orders add liquidity,
//! market orders consume it from the opposite side, and observers read best
//! prices and depth snapshots under a shared lock.
//!
//! ## Example
//!
//! ```rust
//! use hp_orderbook::{OrderBook, Side};
//!
//! let book = OrderBook::with_ring_capacity(1024);
//! assert!(book.add_limit_order(Side::Sell, 101.0, 500, "S1"));
//! assert!(book.add_limit_order(Side::Buy, 100.0, 500, "B1"));
//! assert_eq!(book.get_best_prices(), (100.0, 101.0));
//!
//! let fills = book.process_market_order(Side::Buy, 200, "M1");
//! assert_eq!(fills.len(), 1);
//! assert_eq!(fills[0].price, 101.0);
//! assert_eq!(fills[0].quantity, 200);
//! ```
//!
//! ## Lower-level pieces
//!
//! [`IngressRing`] and [`BookSide`] are usable directly if you manage the
//! locking and drain loop yourself.

pub mod batch;
pub mod book;
pub mod error;
pub mod market_data_gen;
pub mod order_book;
pub mod ring;
pub mod types;

pub use batch::{apply_quantity_updates, QuantityUpdate, BATCH_WIDTH};
pub use book::BookSide;
pub use error::RejectReason;
pub use order_book::OrderBook;
pub use ring::{IngressRing, DEFAULT_RING_CAPACITY};
pub use types::{MatchResult, Order, OrderId, OrderType, PriceLevel, Side};
