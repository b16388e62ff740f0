//! Material lines on a job.
//!
//! A line carries both the planned quantity (quoted) and the used quantity
//! (entered on site). The used figure is locked at zero until the job
//! reaches `InstallationCompleted`; entering it is what later drives the
//! stock deduction for the product.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fieldserve_core::{
    DomainError, DomainResult, Entity, JobId, JobMaterialId, Money, ProductId, Quantity,
};
use fieldserve_products::Product;

use crate::status::JobStatus;

/// Material line as served by the backend. `product` is embedded on detail
/// endpoints and absent on list endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMaterial {
    pub id: JobMaterialId,
    pub job_id: JobId,
    pub product_id: ProductId,
    #[serde(default)]
    pub product: Option<Product>,
    pub planned_quantity: Quantity,
    pub used_quantity: Quantity,
    pub unit_price: Money,
    pub total_price: Money,
    pub is_extra: bool,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl JobMaterial {
    /// Line total as the server computes it: actual usage once the job
    /// has reached installation completion, planned figures before that.
    pub fn computed_total_price(&self, status: JobStatus) -> Money {
        let quantity = if status.uses_actual_quantities() {
            self.used_quantity
        } else {
            self.planned_quantity
        };
        self.unit_price * quantity
    }
}

impl Entity for JobMaterial {
    type Id = JobMaterialId;

    fn id(&self) -> JobMaterialId {
        self.id
    }
}

/// Lines added after the job is completed are billable extras.
pub fn flags_as_extra(status: JobStatus) -> bool {
    status == JobStatus::Completed
}

/// Caller-controlled fields when adding a material line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialDraft {
    pub product_id: ProductId,
    pub planned_quantity: Quantity,
    pub used_quantity: Quantity,
    pub unit_price: Money,
    pub is_extra: bool,
    pub notes: Option<String>,
}

impl MaterialDraft {
    pub fn new(product_id: ProductId, planned_quantity: Quantity, unit_price: Money) -> Self {
        Self {
            product_id,
            planned_quantity,
            used_quantity: Quantity::ZERO,
            unit_price,
            is_extra: false,
            notes: None,
        }
    }

    /// Validate against the parent job's current status.
    pub fn validate(&self, status: JobStatus) -> DomainResult<()> {
        if self.planned_quantity.is_zero() {
            return Err(DomainError::validation("planned quantity must be positive"));
        }
        if self.unit_price.is_negative() {
            return Err(DomainError::validation("unit price cannot be negative"));
        }
        ensure_used_quantity_allowed(self.used_quantity, status)?;
        Ok(())
    }
}

/// Partial update for a material line. `None` fields stay unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialUpdate {
    pub planned_quantity: Option<Quantity>,
    pub used_quantity: Option<Quantity>,
    pub unit_price: Option<Money>,
    pub notes: Option<String>,
}

impl MaterialUpdate {
    /// Validate against the parent job's current status.
    pub fn validate(&self, status: JobStatus) -> DomainResult<()> {
        if let Some(planned) = self.planned_quantity {
            if planned.is_zero() {
                return Err(DomainError::validation("planned quantity must be positive"));
            }
        }
        if let Some(price) = self.unit_price {
            if price.is_negative() {
                return Err(DomainError::validation("unit price cannot be negative"));
            }
        }
        if let Some(used) = self.used_quantity {
            ensure_used_quantity_allowed(used, status)?;
        }
        Ok(())
    }
}

fn ensure_used_quantity_allowed(used: Quantity, status: JobStatus) -> DomainResult<()> {
    if !used.is_zero() && !status.used_quantity_editable() {
        return Err(DomainError::validation(
            "used quantity can only be entered once installation is completed",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_material(planned: u32, used: u32, unit_price: Money) -> JobMaterial {
        JobMaterial {
            id: JobMaterialId::new(1),
            job_id: JobId::new(1),
            product_id: ProductId::new(5),
            product: None,
            planned_quantity: Quantity::new(planned),
            used_quantity: Quantity::new(used),
            unit_price,
            total_price: unit_price * Quantity::new(planned),
            is_extra: false,
            notes: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn line_total_switches_to_actual_usage_after_installation() {
        let material = test_material(5, 7, Money::from_major(100));

        assert_eq!(
            material.computed_total_price(JobStatus::InProgress),
            Money::from_major(500)
        );
        assert_eq!(
            material.computed_total_price(JobStatus::InstallationCompleted),
            Money::from_major(700)
        );
        assert_eq!(
            material.computed_total_price(JobStatus::Completed),
            Money::from_major(700)
        );
    }

    #[test]
    fn draft_requires_positive_planned_quantity() {
        let draft = MaterialDraft::new(ProductId::new(5), Quantity::ZERO, Money::from_major(100));
        match draft.validate(JobStatus::QuoteSent).unwrap_err() {
            DomainError::Validation(msg) if msg.contains("planned quantity") => {}
            _ => panic!("Expected Validation error for zero planned quantity"),
        }
    }

    #[test]
    fn draft_rejects_negative_unit_price() {
        let draft = MaterialDraft::new(ProductId::new(5), Quantity::new(2), Money::from_major(-1));
        assert!(draft.validate(JobStatus::QuoteSent).is_err());
    }

    #[test]
    fn used_quantity_is_locked_before_installation_completed() {
        let mut draft =
            MaterialDraft::new(ProductId::new(5), Quantity::new(4), Money::from_major(250));
        draft.used_quantity = Quantity::new(3);

        match draft.validate(JobStatus::InProgress).unwrap_err() {
            DomainError::Validation(msg) if msg.contains("installation is completed") => {}
            _ => panic!("Expected Validation error for early used quantity"),
        }

        draft.validate(JobStatus::InstallationCompleted).unwrap();
    }

    #[test]
    fn update_gate_matches_the_draft_gate() {
        let update = MaterialUpdate {
            used_quantity: Some(Quantity::new(2)),
            ..MaterialUpdate::default()
        };

        for status in JobStatus::ALL {
            let allowed = status.used_quantity_editable();
            assert_eq!(update.validate(status).is_ok(), allowed, "{status}");
        }
    }

    #[test]
    fn zeroing_used_quantity_is_always_allowed() {
        let update = MaterialUpdate {
            used_quantity: Some(Quantity::ZERO),
            ..MaterialUpdate::default()
        };

        for status in JobStatus::ALL {
            update.validate(status).unwrap();
        }
    }

    #[test]
    fn extras_flag_applies_only_to_completed_jobs() {
        for status in JobStatus::ALL {
            assert_eq!(flags_as_extra(status), status == JobStatus::Completed);
        }
    }

    #[test]
    fn wire_shape_tolerates_missing_embedded_product() {
        let json = r#"{
            "id": 3,
            "jobId": 7,
            "productId": 5,
            "plannedQuantity": 5,
            "usedQuantity": 0,
            "unitPrice": 100,
            "totalPrice": 500,
            "isExtra": false,
            "createdAt": "2026-01-05T10:00:00Z"
        }"#;

        let material: JobMaterial = serde_json::from_str(json).unwrap();
        assert_eq!(material.product, None);
        assert_eq!(material.planned_quantity, Quantity::new(5));
        assert_eq!(material.total_price, Money::from_major(500));
    }
}
