//! Core value types: orders, price-level aggregates, and fill records.
//!
//! Everything here is `Copy` with a fixed `repr(C)` layout so records can
//! traverse the lock-free ingress ring by value, without pointer indirection.
//! [`Order`] is 16-byte aligned; [`PriceLevel`] alignment permits four-wide
//! batch updates (see [`crate::batch`]).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Order side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[repr(u8)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// The side whose resting liquidity an aggressor on `self` consumes.
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// Order type. `Ioc` is accepted on the wire but carries no semantics yet;
/// the drain path rejects it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[repr(u8)]
pub enum OrderType {
    Limit,
    Market,
    Ioc,
}

/// Fixed-width order identifier: up to 15 bytes of payload plus a NUL
/// terminator in 16 bytes of inline storage. Longer inputs are truncated at a
/// character boundary, never rejected.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct OrderId([u8; 16]);

impl OrderId {
    /// Inline storage width, terminator included.
    pub const STORAGE: usize = 16;
    /// Longest payload that survives untruncated.
    pub const MAX_LEN: usize = Self::STORAGE - 1;

    /// Builds an id from `id`, truncating to [`OrderId::MAX_LEN`] bytes.
    pub fn new(id: &str) -> Self {
        let mut end = id.len().min(Self::MAX_LEN);
        while !id.is_char_boundary(end) {
            end -= 1;
        }
        let mut bytes = [0u8; Self::STORAGE];
        bytes[..end].copy_from_slice(&id.as_bytes()[..end]);
        Self(bytes)
    }

    /// Like [`OrderId::new`], but rejects inputs that would smuggle a NUL
    /// into the stored payload.
    pub fn try_new(id: &str) -> Result<Self, crate::error::RejectReason> {
        if id.bytes().take(Self::MAX_LEN).any(|b| b == 0) {
            return Err(crate::error::RejectReason::EmbeddedNul);
        }
        Ok(Self::new(id))
    }

    /// The payload up to the first NUL.
    pub fn as_str(&self) -> &str {
        let end = self.0.iter().position(|&b| b == 0).unwrap_or(Self::STORAGE);
        std::str::from_utf8(&self.0[..end]).unwrap_or("")
    }

    /// Raw 16-byte storage, terminator and trailing zeros included.
    pub fn as_bytes(&self) -> &[u8; Self::STORAGE] {
        &self.0
    }
}

impl fmt::Debug for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OrderId({:?})", self.as_str())
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for OrderId {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OrderId {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        String::deserialize(d).map(|s| OrderId::new(&s))
    }
}

/// An inbound order. Self-contained and trivially copyable so it can ride
/// the ingress ring by value.
///
/// `price` is ignored for market orders. `timestamp` is monotonic
/// nanoseconds, stamped by the engine at admission time.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
#[repr(C, align(16))]
pub struct Order {
    pub id: OrderId,
    pub price: f64,
    pub quantity: u32,
    pub side: Side,
    pub order_type: OrderType,
    pub timestamp: u64,
}

impl Order {
    /// A resting intent to trade at `price` or better. Timestamp is stamped
    /// at admission, not here.
    pub fn limit(side: Side, price: f64, quantity: u32, id: OrderId) -> Self {
        Self {
            id,
            price,
            quantity,
            side,
            order_type: OrderType::Limit,
            timestamp: 0,
        }
    }

    /// An immediately-executable intent at any available price.
    pub fn market(side: Side, quantity: u32, id: OrderId) -> Self {
        Self {
            id,
            price: 0.0,
            quantity,
            side,
            order_type: OrderType::Market,
            timestamp: 0,
        }
    }

    /// Admission checks: quantity must be positive; for price-bearing orders
    /// the price must be finite and positive (0 is the empty-side sentinel
    /// and never a valid resting price).
    pub fn validate(&self) -> Result<(), crate::error::RejectReason> {
        if self.quantity == 0 {
            return Err(crate::error::RejectReason::ZeroQuantity);
        }
        if self.order_type != OrderType::Market && !(self.price.is_finite() && self.price > 0.0) {
            return Err(crate::error::RejectReason::NonFinitePrice);
        }
        Ok(())
    }
}

/// Aggregate of all resting quantity at one (side, price).
///
/// `order_count` counts limit orders that have ever contributed to the level;
/// matching decrements `total_quantity` but leaves the count untouched.
/// A level with `total_quantity == 0` is erased in the same critical section
/// that drained it, so it is never observable at rest.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[repr(C, align(16))]
pub struct PriceLevel {
    pub price: f64,
    pub total_quantity: u32,
    pub order_count: u32,
}

impl PriceLevel {
    pub fn new(price: f64) -> Self {
        Self {
            price,
            total_quantity: 0,
            order_count: 0,
        }
    }
}

/// One fill produced by a market order: `quantity` at `price`, attributed to
/// the aggressing order's id.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
#[repr(C)]
pub struct MatchResult {
    pub quantity: u32,
    pub price: f64,
    pub counterparty_id: OrderId,
}
