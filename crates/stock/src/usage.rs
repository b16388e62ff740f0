//! Link between job material usage and stock deduction.
//!
//! Entering a used quantity on a job is what draws the product's stock
//! down. The job side owns when that entry is allowed; this module builds
//! the outbound movement for an entry and re-checks both rules before
//! anything is sent.

use fieldserve_core::{DomainError, DomainResult, Quantity};
use fieldserve_jobs::{JobMaterial, JobStatus};

use crate::movement::{StockMovementDraft, StockMovementType};

/// Outbound movement for a material line's recorded usage.
///
/// Refused while the job status keeps used quantities locked, for lines
/// with no recorded usage, and when the draw would take the product's
/// stock below zero.
pub fn deduction_for_material(
    status: JobStatus,
    material: &JobMaterial,
    current_stock: Quantity,
) -> DomainResult<StockMovementDraft> {
    if !status.used_quantity_editable() {
        return Err(DomainError::validation(
            "used quantity can only be entered once installation is completed",
        ));
    }
    if material.used_quantity.is_zero() {
        return Err(DomainError::validation("material has no recorded usage"));
    }
    if material.used_quantity > current_stock {
        return Err(DomainError::invariant("stock cannot go negative"));
    }

    let mut draft = StockMovementDraft::new(
        material.product_id,
        StockMovementType::StockOut,
        material.used_quantity,
    );
    draft.job_id = Some(material.job_id);
    Ok(draft)
}
