//! Draft booking model and step-mutation requests
//!
//! A draft accumulates customer selections over the multi-step booking
//! flow. It is keyed by an opaque session token, has a TTL, and is only
//! made durable by the conversion pipeline.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::enums::PaymentMethod;

/// A priced add-on attached to a draft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AddOn {
    /// Catalogue code ("valet", "warranty-12m")
    pub code: String,
    pub label: String,
    #[schema(value_type = String)]
    pub price: Decimal,
}

/// Draft booking, mutated field-by-field across the flow steps
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct DraftBooking {
    /// Opaque session token
    pub token: Uuid,
    pub resource_id: i32,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub selected_date: Option<NaiveDate>,
    pub selected_time: Option<NaiveTime>,
    #[schema(value_type = Vec<AddOn>)]
    pub add_ons: Json<Vec<AddOn>>,
    #[schema(value_type = String)]
    pub calculated_total: Decimal,
    #[schema(value_type = String)]
    pub calculated_deposit: Decimal,
    pub estimated_completion: Option<NaiveDate>,
    pub payment_method: Option<PaymentMethod>,
    pub terms_version: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl DraftBooking {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Start a new draft for a resource
#[derive(Debug, Deserialize, ToSchema)]
pub struct StartDraft {
    pub resource_id: i32,
}

/// Date/time selection step
#[derive(Debug, Deserialize, ToSchema)]
pub struct ScheduleStep {
    /// Selected date (YYYY-MM-DD)
    pub date: String,
    /// Selected time (HH:MM)
    pub time: String,
}

/// Customer details step
#[derive(Debug, Deserialize, ToSchema)]
pub struct DetailsStep {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
}

/// Add-on selection step
#[derive(Debug, Deserialize, ToSchema)]
pub struct AddOnsStep {
    pub add_ons: Vec<AddOn>,
}

/// Payment method and terms acceptance step
#[derive(Debug, Deserialize, ToSchema)]
pub struct PaymentStep {
    pub payment_method: PaymentMethod,
    /// Version string of the accepted terms document
    pub terms_version: String,
}
