//! Stress driver: multi-producer limit-order ingestion through the ingress
//! ring, drained into the book on the main thread.
//!
//! Configure via env vars: `ORDERS`, `THREADS`, `PRICE_MIN`, `PRICE_MAX`,
//! `QTY_MIN`, `QTY_MAX`, `RING_CAPACITY`. Prints throughput, final best
//! prices, top-5 depth per side, and one JSON summary line.

use hp_orderbook::market_data_gen::{Generator, GeneratorConfig};
use hp_orderbook::{OrderBook, Side};
use std::time::Instant;

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn main() {
    let num_orders: usize = env_or("ORDERS", 1_000_000);
    let num_threads: usize = env_or("THREADS", 8);
    let price_min: f64 = env_or("PRICE_MIN", 90.0);
    let price_max: f64 = env_or("PRICE_MAX", 110.0);
    let qty_min: u32 = env_or("QTY_MIN", 100);
    let qty_max: u32 = env_or("QTY_MAX", 1000);
    let ring_capacity: usize = env_or("RING_CAPACITY", hp_orderbook::DEFAULT_RING_CAPACITY);

    eprintln!(
        "orderbook stress: {num_orders} orders, {num_threads} producers, \
         prices {price_min}..{price_max}, quantities {qty_min}..{qty_max}, \
         ring {ring_capacity}"
    );

    let book = OrderBook::with_ring_capacity(ring_capacity);
    let orders_per_thread = num_orders / num_threads.max(1);
    let start = Instant::now();
    let mut drained_total = 0usize;

    std::thread::scope(|scope| {
        for thread_id in 0..num_threads {
            let book = &book;
            scope.spawn(move || {
                let mut generator = Generator::new(GeneratorConfig {
                    seed: 0xD1CE ^ thread_id as u64,
                    num_orders: orders_per_thread,
                    buy_ratio: 0.5,
                    limit_ratio: 1.0,
                    price_min,
                    price_max,
                    quantity_min: qty_min,
                    quantity_max: qty_max,
                });
                for _ in 0..orders_per_thread {
                    let order = generator.next_order();
                    while !book.try_submit(order) {
                        // Ring full: let the drain loop catch up.
                        std::thread::yield_now();
                    }
                }
            });
        }

        let target = orders_per_thread * num_threads;
        let mut last_report = 0usize;
        while drained_total < target {
            let drained = book.drain_ingress(4096);
            if drained == 0 {
                std::thread::yield_now();
                continue;
            }
            drained_total += drained;
            if drained_total - last_report >= 100_000 {
                last_report = drained_total;
                let elapsed = start.elapsed().as_secs_f64();
                eprintln!(
                    "drained {drained_total} orders ({:.0} orders/sec)",
                    drained_total as f64 / elapsed
                );
            }
        }
    });

    let elapsed = start.elapsed();
    let rate = drained_total as f64 / elapsed.as_secs_f64();
    println!("\nprocessed {drained_total} orders in {:.1} ms ({rate:.0} orders/sec)", elapsed.as_secs_f64() * 1e3);

    let (bid, ask) = book.get_best_prices();
    println!("best bid: {bid}");
    println!("best ask: {ask}");

    for (label, side) in [("bid", Side::Buy), ("ask", Side::Sell)] {
        println!("\ntop 5 {label} levels:");
        for level in book.get_depth(side, 5) {
            println!(
                "  price {:.4}  quantity {}  orders {}",
                level.price, level.total_quantity, level.order_count
            );
        }
    }

    let summary = serde_json::json!({
        "orders": drained_total,
        "elapsed_ms": elapsed.as_secs_f64() * 1e3,
        "orders_per_sec": rate,
        "best_bid": bid,
        "best_ask": ask,
        "bid_levels": book.get_depth(Side::Buy, usize::MAX).len(),
        "ask_levels": book.get_depth(Side::Sell, usize::MAX).len(),
    });
    println!("\n{summary}");
}
