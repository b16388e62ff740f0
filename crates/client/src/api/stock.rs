//! Stock movement endpoints, plus the material-usage deduction that links
//! job completion to stock draw-down.

use chrono::{DateTime, Utc};

use fieldserve_core::{ProductId, Quantity, StockMovementId};
use fieldserve_events::DataEvent;
use fieldserve_jobs::{JobMaterial, JobStatus};
use fieldserve_stock::{
    MovementFilter, StockMovement, StockMovementDraft, StockStatistics, usage,
};

use crate::client::ApiClient;
use crate::error::ClientResult;

impl ApiClient {
    pub async fn stock_movements(&self, filter: &MovementFilter) -> ClientResult<Vec<StockMovement>> {
        self.get_json_query("/stockmovement", &filter.to_query())
            .await
    }

    pub async fn movements_for_product(
        &self,
        product_id: ProductId,
    ) -> ClientResult<Vec<StockMovement>> {
        self.get_json(&format!("/stockmovement/product/{product_id}"))
            .await
    }

    pub async fn stock_statistics(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> ClientResult<StockStatistics> {
        let mut query = Vec::new();
        if let Some(start) = start {
            query.push(("startDate", start.to_rfc3339()));
        }
        if let Some(end) = end {
            query.push(("endDate", end.to_rfc3339()));
        }
        self.get_json_query("/stockmovement/statistics", &query)
            .await
    }

    /// Record a movement. `current_stock` is the product's level as the
    /// caller knows it; outbound drafts that would take it below zero are
    /// refused locally.
    pub async fn record_stock_movement(
        &self,
        draft: &StockMovementDraft,
        current_stock: Quantity,
    ) -> ClientResult<StockMovement> {
        draft.validate(current_stock)?;
        let _guard = self.begin_mutation(format!("stock.record:{}", draft.product_id))?;

        let movement: StockMovement = self
            .execute(self.post("/stockmovement").json(draft))
            .await?;
        self.publish(DataEvent::StockMovementRecorded {
            product_id: movement.product_id,
            occurred_at: Utc::now(),
        });
        Ok(movement)
    }

    /// Deduct a material line's recorded usage from stock. Builds the
    /// outbound movement for the line and records it; refused while the job
    /// status keeps used quantities locked.
    pub async fn record_material_deduction(
        &self,
        status: JobStatus,
        material: &JobMaterial,
        current_stock: Quantity,
    ) -> ClientResult<StockMovement> {
        let draft = usage::deduction_for_material(status, material, current_stock)?;
        self.record_stock_movement(&draft, current_stock).await
    }

    /// Deleting a movement reverses its effect on the product's stock, so
    /// the product id rides along for the announcement.
    pub async fn delete_stock_movement(
        &self,
        id: StockMovementId,
        product_id: ProductId,
    ) -> ClientResult<()> {
        let _guard = self.begin_mutation(format!("stock.delete:{id}"))?;

        self.execute_empty(self.delete(&format!("/stockmovement/{id}")))
            .await?;
        self.publish(DataEvent::StockMovementDeleted {
            product_id,
            occurred_at: Utc::now(),
        });
        Ok(())
    }
}
