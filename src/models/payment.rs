//! Payment model
//!
//! A payment references either the draft it was taken against or, after
//! conversion, the confirmed booking - never both. The refund policy
//! snapshot is stored here so cancellation math is reproducible after
//! policy edits.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::enums::{PaymentMethod, PaymentStatus};
use super::policy::PolicySnapshot;

/// A payment record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Payment {
    pub id: i32,
    #[schema(value_type = String)]
    pub amount: Decimal,
    pub status: PaymentStatus,
    pub method: PaymentMethod,
    /// Payment-processor transaction id, unique when present
    pub external_reference: Option<String>,
    #[schema(value_type = Object)]
    pub refund_policy_snapshot: Json<PolicySnapshot>,
    #[schema(value_type = String)]
    pub refunded_amount: Decimal,
    /// Set by conversion; mutually exclusive with `draft_token`
    pub booking_id: Option<i32>,
    pub draft_token: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Record a payment taken against a draft
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePayment {
    #[schema(value_type = String)]
    pub amount: Decimal,
    pub status: PaymentStatus,
    pub method: PaymentMethod,
    /// Processor transaction id from the external checkout flow
    pub external_reference: Option<String>,
}
