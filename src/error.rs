//! Admission errors.
//!
//! The fast path is total: matching cannot fail post-validation, a full ring
//! and an empty opposing book are ordinary return values. The only error
//! taxonomy the core needs is why an order was refused admission.

/// Why an order failed validation. Surfaced as a `false` return from the
/// submission APIs; the reason itself is logged at debug level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    #[error("quantity must be greater than zero")]
    ZeroQuantity,
    #[error("price must be finite and positive")]
    NonFinitePrice,
    #[error("order id contains an embedded NUL byte")]
    EmbeddedNul,
}
