//! Confirmed booking model
//!
//! Created exactly once per draft by the conversion pipeline; identity is
//! immutable afterwards except for status transitions.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::ToSchema;

use super::draft::AddOn;
use super::enums::{BookingStatus, PaymentMethod, PaymentStatus};

/// A permanent, payment-reconciled booking
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Booking {
    pub id: i32,
    /// Unique opaque reference, generated at creation, never reused
    pub reference_code: String,
    pub resource_id: i32,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<PaymentMethod>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
    #[schema(value_type = Vec<AddOn>)]
    pub add_ons: Json<Vec<AddOn>>,
    #[schema(value_type = String)]
    pub amount_total: Decimal,
    #[schema(value_type = String)]
    pub amount_paid: Decimal,
    #[schema(value_type = String)]
    pub deposit_amount: Decimal,
    pub estimated_completion: Option<NaiveDate>,
    pub terms_version: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Booking {
    pub fn start_datetime(&self) -> chrono::NaiveDateTime {
        self.booking_date.and_time(self.booking_time)
    }
}

/// Conversion pipeline input: payment facts resolved by the external
/// checkout flow
#[derive(Debug, Deserialize, ToSchema)]
pub struct ConvertDraft {
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    #[schema(value_type = String)]
    pub amount_paid: Decimal,
    /// Overrides the draft's calculated total when the processor settled
    /// a different amount
    #[schema(value_type = Option<String>)]
    pub calculated_total: Option<Decimal>,
    /// Processor transaction id
    pub external_payment_reference: Option<String>,
    /// Pre-existing payment to re-link to the confirmed booking
    pub payment_id: Option<i32>,
}

/// Cancel booking request
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CancelBooking {
    /// Charge the international card fee schedule when deducting fees
    #[serde(default)]
    pub international_card: bool,
}

/// Insert payload for the conversion pipeline, assembled from a draft
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub reference_code: String,
    pub resource_id: i32,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<PaymentMethod>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
    pub add_ons: Vec<AddOn>,
    pub amount_total: Decimal,
    pub amount_paid: Decimal,
    pub deposit_amount: Decimal,
    pub estimated_completion: Option<NaiveDate>,
    pub terms_version: Option<String>,
}
