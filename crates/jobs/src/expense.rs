//! Operational expenses booked against a job (fuel, meals, crew costs).
//!
//! Expenses reduce a job's net profit but never touch its billing or
//! receivable figures.

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use fieldserve_core::{DomainError, DomainResult, Entity, JobExpenseId, JobId, Money};

/// Expense category, wire-encoded as the backend's integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpenseType {
    Fuel,
    Meal,
    Accommodation,
    Transportation,
    Personnel,
    Other,
}

impl ExpenseType {
    pub const ALL: [ExpenseType; 6] = [
        ExpenseType::Fuel,
        ExpenseType::Meal,
        ExpenseType::Accommodation,
        ExpenseType::Transportation,
        ExpenseType::Personnel,
        ExpenseType::Other,
    ];

    pub fn code(self) -> u8 {
        match self {
            ExpenseType::Fuel => 1,
            ExpenseType::Meal => 2,
            ExpenseType::Accommodation => 3,
            ExpenseType::Transportation => 4,
            ExpenseType::Personnel => 5,
            ExpenseType::Other => 6,
        }
    }

    pub fn from_code(code: u8) -> DomainResult<Self> {
        match code {
            1 => Ok(ExpenseType::Fuel),
            2 => Ok(ExpenseType::Meal),
            3 => Ok(ExpenseType::Accommodation),
            4 => Ok(ExpenseType::Transportation),
            5 => Ok(ExpenseType::Personnel),
            6 => Ok(ExpenseType::Other),
            other => Err(DomainError::validation(format!(
                "unknown expense type code: {other}"
            ))),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExpenseType::Fuel => "fuel",
            ExpenseType::Meal => "meal",
            ExpenseType::Accommodation => "accommodation",
            ExpenseType::Transportation => "transportation",
            ExpenseType::Personnel => "personnel",
            ExpenseType::Other => "other",
        }
    }
}

impl core::fmt::Display for ExpenseType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for ExpenseType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for ExpenseType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code = u8::deserialize(deserializer)?;
        ExpenseType::from_code(code).map_err(de::Error::custom)
    }
}

/// Expense record as served by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobExpense {
    pub id: JobExpenseId,
    pub job_id: JobId,
    pub expense_type: ExpenseType,
    pub description: String,
    pub amount: Money,
    pub expense_date: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub receipt_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Entity for JobExpense {
    type Id = JobExpenseId;

    fn id(&self) -> JobExpenseId {
        self.id
    }
}

/// Sum of all expenses on a job.
pub fn total_amount(expenses: &[JobExpense]) -> Money {
    expenses.iter().map(|e| e.amount).sum()
}

/// Caller-controlled fields when booking an expense.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseDraft {
    pub expense_type: ExpenseType,
    pub description: String,
    pub amount: Money,
    pub expense_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub receipt_number: Option<String>,
}

impl ExpenseDraft {
    pub fn new(
        expense_type: ExpenseType,
        description: impl Into<String>,
        amount: Money,
        expense_date: DateTime<Utc>,
    ) -> Self {
        Self {
            expense_type,
            description: description.into(),
            amount,
            expense_date,
            notes: None,
            receipt_number: None,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.description.trim().is_empty() {
            return Err(DomainError::validation("expense description is required"));
        }
        if self.amount.is_zero() || self.amount.is_negative() {
            return Err(DomainError::validation("expense amount must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_expense(id: i64, expense_type: ExpenseType, amount: Money) -> JobExpense {
        JobExpense {
            id: JobExpenseId::new(id),
            job_id: JobId::new(1),
            expense_type,
            description: "site visit".to_string(),
            amount,
            expense_date: Utc::now(),
            notes: None,
            receipt_number: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn type_codes_round_trip_and_reject_unknowns() {
        for expense_type in ExpenseType::ALL {
            assert_eq!(
                ExpenseType::from_code(expense_type.code()).unwrap(),
                expense_type
            );
        }

        match ExpenseType::from_code(7).unwrap_err() {
            DomainError::Validation(msg) if msg.contains("unknown expense type code") => {}
            _ => panic!("Expected Validation error for unknown expense type"),
        }
    }

    #[test]
    fn total_amount_sums_every_expense() {
        let expenses = vec![
            test_expense(1, ExpenseType::Fuel, Money::from_major(300)),
            test_expense(2, ExpenseType::Meal, Money::from_major(150)),
            test_expense(3, ExpenseType::Personnel, Money::from_major(1550)),
        ];

        assert_eq!(total_amount(&expenses), Money::from_major(2000));
        assert_eq!(total_amount(&[]), Money::ZERO);
    }

    #[test]
    fn draft_requires_description_and_positive_amount() {
        let draft = ExpenseDraft::new(ExpenseType::Fuel, "  ", Money::from_major(50), Utc::now());
        match draft.validate().unwrap_err() {
            DomainError::Validation(msg) if msg.contains("description") => {}
            _ => panic!("Expected Validation error for blank description"),
        }

        let draft = ExpenseDraft::new(ExpenseType::Fuel, "diesel", Money::ZERO, Utc::now());
        match draft.validate().unwrap_err() {
            DomainError::Validation(msg) if msg.contains("must be positive") => {}
            _ => panic!("Expected Validation error for zero amount"),
        }

        let draft = ExpenseDraft::new(ExpenseType::Fuel, "diesel", Money::from_major(50), Utc::now());
        draft.validate().unwrap();
    }

    #[test]
    fn wire_shape_uses_camel_case_and_integer_type_codes() {
        let json = r#"{
            "id": 12,
            "jobId": 7,
            "expenseType": 5,
            "description": "two installers, full day",
            "amount": 2400,
            "expenseDate": "2026-02-03T08:00:00Z",
            "createdAt": "2026-02-03T18:12:45Z"
        }"#;

        let expense: JobExpense = serde_json::from_str(json).unwrap();
        assert_eq!(expense.expense_type, ExpenseType::Personnel);
        assert_eq!(expense.amount, Money::from_major(2400));
        assert_eq!(expense.notes, None);
    }
}
