//! Supplier endpoints.

use chrono::Utc;

use fieldserve_core::{ProductCategoryId, SupplierId};
use fieldserve_events::DataEvent;
use fieldserve_parties::{Supplier, SupplierDraft};

use crate::client::ApiClient;
use crate::error::ClientResult;

impl ApiClient {
    pub async fn suppliers(&self) -> ClientResult<Vec<Supplier>> {
        self.get_json("/supplier").await
    }

    pub async fn supplier(&self, id: SupplierId) -> ClientResult<Supplier> {
        self.get_json(&format!("/supplier/{id}")).await
    }

    pub async fn active_suppliers(&self) -> ClientResult<Vec<Supplier>> {
        self.get_json("/supplier/active").await
    }

    pub async fn suppliers_in_category(
        &self,
        category_id: ProductCategoryId,
    ) -> ClientResult<Vec<Supplier>> {
        self.get_json(&format!("/supplier/category/{category_id}"))
            .await
    }

    pub async fn search_suppliers(&self, term: &str) -> ClientResult<Vec<Supplier>> {
        self.get_json_query("/supplier/search", &[("q", term.to_string())])
            .await
    }

    pub async fn create_supplier(&self, draft: &SupplierDraft) -> ClientResult<Supplier> {
        draft.validate()?;
        let _guard = self.begin_mutation(format!("supplier.create:{}", draft.company_name))?;

        let supplier: Supplier = self.execute(self.post("/supplier").json(draft)).await?;
        self.publish(DataEvent::SupplierChanged {
            supplier_id: supplier.id,
            occurred_at: Utc::now(),
        });
        Ok(supplier)
    }

    pub async fn update_supplier(
        &self,
        id: SupplierId,
        draft: &SupplierDraft,
    ) -> ClientResult<Supplier> {
        draft.validate()?;
        let _guard = self.begin_mutation(format!("supplier.update:{id}"))?;

        let supplier: Supplier = self
            .execute(self.put(&format!("/supplier/{id}")).json(draft))
            .await?;
        self.publish(DataEvent::SupplierChanged {
            supplier_id: id,
            occurred_at: Utc::now(),
        });
        Ok(supplier)
    }

    pub async fn delete_supplier(&self, id: SupplierId) -> ClientResult<()> {
        let _guard = self.begin_mutation(format!("supplier.delete:{id}"))?;

        self.execute_empty(self.delete(&format!("/supplier/{id}")))
            .await?;
        self.publish(DataEvent::SupplierChanged {
            supplier_id: id,
            occurred_at: Utc::now(),
        });
        Ok(())
    }
}
