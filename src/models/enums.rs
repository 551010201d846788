//! Shared domain enums (status codes stored as SMALLINT)

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// BookingKind
// ---------------------------------------------------------------------------

/// What a booking occupies: a service bay, a sales appointment slot,
/// or a vehicle hire period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[repr(i16)]
pub enum BookingKind {
    Service = 0,
    Sales = 1,
    Hire = 2,
}

impl From<i16> for BookingKind {
    fn from(v: i16) -> Self {
        match v {
            1 => BookingKind::Sales,
            2 => BookingKind::Hire,
            _ => BookingKind::Service,
        }
    }
}

impl From<BookingKind> for i16 {
    fn from(k: BookingKind) -> Self {
        k as i16
    }
}

impl std::fmt::Display for BookingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            BookingKind::Service => "Service",
            BookingKind::Sales => "Sales",
            BookingKind::Hire => "Hire",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// BookingStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of a confirmed booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[repr(i16)]
pub enum BookingStatus {
    Pending = 0,
    Confirmed = 1,
    InProgress = 2,
    Completed = 3,
    Cancelled = 4,
    NoShow = 5,
}

impl BookingStatus {
    /// Statuses that occupy a slot for availability purposes
    pub fn is_blocking(self) -> bool {
        matches!(
            self,
            BookingStatus::Pending | BookingStatus::Confirmed | BookingStatus::InProgress
        )
    }
}

impl From<i16> for BookingStatus {
    fn from(v: i16) -> Self {
        match v {
            1 => BookingStatus::Confirmed,
            2 => BookingStatus::InProgress,
            3 => BookingStatus::Completed,
            4 => BookingStatus::Cancelled,
            5 => BookingStatus::NoShow,
            _ => BookingStatus::Pending,
        }
    }
}

impl From<BookingStatus> for i16 {
    fn from(s: BookingStatus) -> Self {
        s as i16
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::InProgress => "In progress",
            BookingStatus::Completed => "Completed",
            BookingStatus::Cancelled => "Cancelled",
            BookingStatus::NoShow => "No show",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// PaymentStatus
// ---------------------------------------------------------------------------

/// Payment reconciliation status of a booking or payment record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[repr(i16)]
pub enum PaymentStatus {
    Unpaid = 0,
    DepositPaid = 1,
    Paid = 2,
    Refunded = 3,
    PartiallyRefunded = 4,
}

impl From<i16> for PaymentStatus {
    fn from(v: i16) -> Self {
        match v {
            1 => PaymentStatus::DepositPaid,
            2 => PaymentStatus::Paid,
            3 => PaymentStatus::Refunded,
            4 => PaymentStatus::PartiallyRefunded,
            _ => PaymentStatus::Unpaid,
        }
    }
}

impl From<PaymentStatus> for i16 {
    fn from(s: PaymentStatus) -> Self {
        s as i16
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PaymentStatus::Unpaid => "Unpaid",
            PaymentStatus::DepositPaid => "Deposit paid",
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Refunded => "Refunded",
            PaymentStatus::PartiallyRefunded => "Partially refunded",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// PaymentMethod
// ---------------------------------------------------------------------------

/// How the customer chose to pay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[repr(i16)]
pub enum PaymentMethod {
    Card = 0,
    BankTransfer = 1,
    OnSite = 2,
}

impl From<i16> for PaymentMethod {
    fn from(v: i16) -> Self {
        match v {
            1 => PaymentMethod::BankTransfer,
            2 => PaymentMethod::OnSite,
            _ => PaymentMethod::Card,
        }
    }
}

impl From<PaymentMethod> for i16 {
    fn from(m: PaymentMethod) -> Self {
        m as i16
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PaymentMethod::Card => "Card",
            PaymentMethod::BankTransfer => "Bank transfer",
            PaymentMethod::OnSite => "On site",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// DepositMode
// ---------------------------------------------------------------------------

/// How the deposit for a booking is derived from its total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[repr(i16)]
pub enum DepositMode {
    Disabled = 0,
    Flat = 1,
    Percentage = 2,
}

impl From<i16> for DepositMode {
    fn from(v: i16) -> Self {
        match v {
            1 => DepositMode::Flat,
            2 => DepositMode::Percentage,
            _ => DepositMode::Disabled,
        }
    }
}

impl From<DepositMode> for i16 {
    fn from(m: DepositMode) -> Self {
        m as i16
    }
}
