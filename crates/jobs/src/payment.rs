//! Payment records attached to jobs.
//!
//! A payment is a promised or settled amount; only settled ones (`is_paid`)
//! count toward a job's paid total and the receivable figures built on it.

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use fieldserve_core::{DomainError, DomainResult, Entity, JobId, JobPaymentId, Money};

/// How a payment is made, wire-encoded as the backend's integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentType {
    Cash,
    Installment,
    BankTransfer,
    CreditCard,
    Deferred,
}

impl PaymentType {
    pub const ALL: [PaymentType; 5] = [
        PaymentType::Cash,
        PaymentType::Installment,
        PaymentType::BankTransfer,
        PaymentType::CreditCard,
        PaymentType::Deferred,
    ];

    pub fn code(self) -> u8 {
        match self {
            PaymentType::Cash => 1,
            PaymentType::Installment => 2,
            PaymentType::BankTransfer => 3,
            PaymentType::CreditCard => 4,
            PaymentType::Deferred => 5,
        }
    }

    pub fn from_code(code: u8) -> DomainResult<Self> {
        match code {
            1 => Ok(PaymentType::Cash),
            2 => Ok(PaymentType::Installment),
            3 => Ok(PaymentType::BankTransfer),
            4 => Ok(PaymentType::CreditCard),
            5 => Ok(PaymentType::Deferred),
            other => Err(DomainError::validation(format!(
                "unknown payment type code: {other}"
            ))),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PaymentType::Cash => "cash",
            PaymentType::Installment => "installment",
            PaymentType::BankTransfer => "bank transfer",
            PaymentType::CreditCard => "credit card",
            PaymentType::Deferred => "deferred",
        }
    }
}

impl core::fmt::Display for PaymentType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for PaymentType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for PaymentType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code = u8::deserialize(deserializer)?;
        PaymentType::from_code(code).map_err(de::Error::custom)
    }
}

/// Payment record as served by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPayment {
    pub id: JobPaymentId,
    pub job_id: JobId,
    pub amount: Money,
    pub payment_type: PaymentType,
    pub payment_date: DateTime<Utc>,
    #[serde(default)]
    pub installment_count: Option<u32>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    pub is_paid: bool,
    #[serde(default)]
    pub paid_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub receipt_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Entity for JobPayment {
    type Id = JobPaymentId;

    fn id(&self) -> JobPaymentId {
        self.id
    }
}

/// Sum of every recorded payment, settled or not.
pub fn total_amount(payments: &[JobPayment]) -> Money {
    payments.iter().map(|p| p.amount).sum()
}

/// Sum of settled payments only.
pub fn total_paid(payments: &[JobPayment]) -> Money {
    payments
        .iter()
        .filter(|p| p.is_paid)
        .map(|p| p.amount)
        .sum()
}

/// Caller-controlled fields when recording a payment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDraft {
    pub amount: Money,
    pub payment_type: PaymentType,
    pub payment_date: DateTime<Utc>,
    pub installment_count: Option<u32>,
    pub due_date: Option<DateTime<Utc>>,
    pub is_paid: bool,
    pub paid_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub receipt_number: Option<String>,
}

impl PaymentDraft {
    pub fn new(amount: Money, payment_type: PaymentType, payment_date: DateTime<Utc>) -> Self {
        Self {
            amount,
            payment_type,
            payment_date,
            installment_count: None,
            due_date: None,
            is_paid: false,
            paid_date: None,
            notes: None,
            receipt_number: None,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.amount.is_zero() || self.amount.is_negative() {
            return Err(DomainError::validation("payment amount must be positive"));
        }

        if self.payment_type == PaymentType::Installment {
            match self.installment_count {
                Some(count) if count >= 2 => {}
                _ => {
                    return Err(DomainError::validation(
                        "installment payments need an installment count of at least 2",
                    ));
                }
            }
        }

        if self.payment_type == PaymentType::Deferred && self.due_date.is_none() {
            return Err(DomainError::validation("deferred payments need a due date"));
        }

        Ok(())
    }
}
