//! Product catalog endpoints.

use chrono::Utc;

use fieldserve_core::{ProductCategoryId, ProductId};
use fieldserve_events::DataEvent;
use fieldserve_products::{Product, ProductDraft};

use crate::client::ApiClient;
use crate::error::ClientResult;

impl ApiClient {
    pub async fn products(&self) -> ClientResult<Vec<Product>> {
        self.get_json("/product").await
    }

    pub async fn product(&self, id: ProductId) -> ClientResult<Product> {
        self.get_json(&format!("/product/{id}")).await
    }

    /// Products at or below their minimum stock level.
    pub async fn low_stock_products(&self) -> ClientResult<Vec<Product>> {
        self.get_json("/product/low-stock").await
    }

    pub async fn products_in_category(
        &self,
        category_id: ProductCategoryId,
    ) -> ClientResult<Vec<Product>> {
        self.get_json(&format!("/product/category/{category_id}"))
            .await
    }

    pub async fn create_product(&self, draft: &ProductDraft) -> ClientResult<Product> {
        draft.validate()?;
        let _guard = self.begin_mutation(format!("product.create:{}", draft.name))?;

        let product: Product = self.execute(self.post("/product").json(draft)).await?;
        self.publish(DataEvent::ProductChanged {
            product_id: product.id,
            occurred_at: Utc::now(),
        });
        Ok(product)
    }

    pub async fn update_product(
        &self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> ClientResult<Product> {
        draft.validate()?;
        let _guard = self.begin_mutation(format!("product.update:{id}"))?;

        let product: Product = self
            .execute(self.put(&format!("/product/{id}")).json(draft))
            .await?;
        self.publish(DataEvent::ProductChanged {
            product_id: id,
            occurred_at: Utc::now(),
        });
        Ok(product)
    }

    pub async fn delete_product(&self, id: ProductId) -> ClientResult<()> {
        let _guard = self.begin_mutation(format!("product.delete:{id}"))?;

        self.execute_empty(self.delete(&format!("/product/{id}")))
            .await?;
        self.publish(DataEvent::ProductChanged {
            product_id: id,
            occurred_at: Utc::now(),
        });
        Ok(())
    }
}
