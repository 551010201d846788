//! Pure booking-engine logic: availability, pricing and refunds
//!
//! Nothing in this module performs I/O. Every function is deterministic in
//! its inputs and safe to call concurrently; results are stale-tolerant and
//! final correctness is enforced by the conversion pipeline's transaction.

pub mod availability;
pub mod pricing;
pub mod refund;

pub use availability::{available_dates, available_slots, has_conflict};
pub use pricing::{booking_total, deposit_amount, estimated_completion};
pub use refund::{compute_refund, RefundResult, RefundTier};
