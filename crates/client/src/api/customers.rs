//! Customer endpoints, including the receivable summaries the backend
//! serves per customer and across the book.

use chrono::Utc;

use fieldserve_core::CustomerId;
use fieldserve_events::DataEvent;
use fieldserve_parties::{Customer, CustomerDraft};
use fieldserve_receivables::CustomerReceivableSummary;

use crate::client::ApiClient;
use crate::error::ClientResult;

impl ApiClient {
    pub async fn customers(&self) -> ClientResult<Vec<Customer>> {
        self.get_json("/customer").await
    }

    pub async fn customer(&self, id: CustomerId) -> ClientResult<Customer> {
        self.get_json(&format!("/customer/{id}")).await
    }

    pub async fn active_customers(&self) -> ClientResult<Vec<Customer>> {
        self.get_json("/customer/active").await
    }

    pub async fn search_customers(&self, term: &str) -> ClientResult<Vec<Customer>> {
        self.get_json_query("/customer/search", &[("q", term.to_string())])
            .await
    }

    pub async fn receivable_summary(
        &self,
        id: CustomerId,
    ) -> ClientResult<CustomerReceivableSummary> {
        self.get_json(&format!("/customer/{id}/receivable-summary"))
            .await
    }

    /// Receivable positions across the whole book. `active_only` keeps the
    /// view to customers still marked active.
    pub async fn receivable_summaries(
        &self,
        active_only: bool,
    ) -> ClientResult<Vec<CustomerReceivableSummary>> {
        self.get_json_query(
            "/customer/receivable-summaries",
            &[("activeOnly", active_only.to_string())],
        )
        .await
    }

    pub async fn create_customer(&self, draft: &CustomerDraft) -> ClientResult<Customer> {
        draft.validate()?;
        let _guard = self.begin_mutation(format!("customer.create:{}", draft.phone))?;

        let customer: Customer = self.execute(self.post("/customer").json(draft)).await?;
        self.publish(DataEvent::CustomerChanged {
            customer_id: customer.id,
            occurred_at: Utc::now(),
        });
        Ok(customer)
    }

    pub async fn update_customer(
        &self,
        id: CustomerId,
        draft: &CustomerDraft,
    ) -> ClientResult<Customer> {
        draft.validate()?;
        let _guard = self.begin_mutation(format!("customer.update:{id}"))?;

        let customer: Customer = self
            .execute(self.put(&format!("/customer/{id}")).json(draft))
            .await?;
        self.publish(DataEvent::CustomerChanged {
            customer_id: id,
            occurred_at: Utc::now(),
        });
        Ok(customer)
    }

    /// The backend refuses deletion while the customer still has jobs; that
    /// surfaces here as a request rejection, not a local check.
    pub async fn delete_customer(&self, id: CustomerId) -> ClientResult<()> {
        let _guard = self.begin_mutation(format!("customer.delete:{id}"))?;

        self.execute_empty(self.delete(&format!("/customer/{id}")))
            .await?;
        self.publish(DataEvent::CustomerChanged {
            customer_id: id,
            occurred_at: Utc::now(),
        });
        Ok(())
    }
}
