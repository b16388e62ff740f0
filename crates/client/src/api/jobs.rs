//! Job endpoints: the record itself, status moves, and the three child
//! collections (materials, payments, expenses).

use chrono::{DateTime, Utc};
use serde::Serialize;

use fieldserve_core::{CustomerId, JobExpenseId, JobId, JobMaterialId, JobPaymentId};
use fieldserve_events::DataEvent;
use fieldserve_jobs::{
    ExpenseDraft, Job, JobDraft, JobExpense, JobFilter, JobMaterial, JobPayment, JobSnapshot,
    JobStatistics, JobStatus, MaterialDraft, MaterialUpdate, PaymentDraft, StatusChangeRequest,
};

use crate::client::ApiClient;
use crate::error::ClientResult;

/// Wire body for `PATCH /jobs/{id}/status`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusChangeBody<'a> {
    status: JobStatus,
    notes: Option<&'a str>,
    changed_by: Option<&'a str>,
}

impl ApiClient {
    pub async fn jobs(&self, filter: &JobFilter) -> ClientResult<Vec<Job>> {
        self.get_json_query("/jobs", &filter.to_query()).await
    }

    pub async fn job(&self, id: JobId) -> ClientResult<Job> {
        self.get_json(&format!("/jobs/{id}")).await
    }

    /// Detail fetch normalized into a snapshot. The detail endpoint embeds
    /// the child collections; absent ones become empty.
    pub async fn job_snapshot(&self, id: JobId) -> ClientResult<JobSnapshot> {
        let job = self.job(id).await?;
        Ok(JobSnapshot::from_embedded(job))
    }

    pub async fn active_jobs(&self) -> ClientResult<Vec<Job>> {
        self.get_json("/jobs/active").await
    }

    pub async fn jobs_for_customer(&self, customer_id: CustomerId) -> ClientResult<Vec<Job>> {
        self.get_json(&format!("/jobs/customer/{customer_id}")).await
    }

    pub async fn job_statistics(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> ClientResult<JobStatistics> {
        let mut query = Vec::new();
        if let Some(start) = start {
            query.push(("startDate", start.to_rfc3339()));
        }
        if let Some(end) = end {
            query.push(("endDate", end.to_rfc3339()));
        }
        self.get_json_query("/jobs/statistics", &query).await
    }

    pub async fn create_job(&self, draft: &JobDraft) -> ClientResult<Job> {
        draft.validate()?;
        let _guard = self.begin_mutation(format!("job.create:{}", draft.customer_id))?;

        let job: Job = self.execute(self.post("/jobs").json(draft)).await?;
        self.publish(DataEvent::JobCreated {
            job_id: job.id,
            customer_id: job.customer_id,
            occurred_at: Utc::now(),
        });
        Ok(job)
    }

    pub async fn update_job(&self, id: JobId, draft: &JobDraft) -> ClientResult<Job> {
        draft.validate()?;
        let _guard = self.begin_mutation(format!("job.update:{id}"))?;

        let job: Job = self
            .execute(self.put(&format!("/jobs/{id}")).json(draft))
            .await?;
        self.publish(DataEvent::JobUpdated {
            job_id: job.id,
            customer_id: job.customer_id,
            occurred_at: Utc::now(),
        });
        Ok(job)
    }

    /// The owning customer keys the receivable views the deletion
    /// invalidates, so the caller names it alongside the job.
    pub async fn delete_job(&self, id: JobId, customer_id: CustomerId) -> ClientResult<()> {
        let _guard = self.begin_mutation(format!("job.delete:{id}"))?;

        self.execute_empty(self.delete(&format!("/jobs/{id}"))).await?;
        self.publish(DataEvent::JobDeleted {
            job_id: id,
            customer_id,
            occurred_at: Utc::now(),
        });
        Ok(())
    }

    /// Move a job through its lifecycle. The transition is checked against
    /// `current` locally, so an illegal move never reaches the wire.
    pub async fn change_job_status(
        &self,
        id: JobId,
        current: JobStatus,
        request: &StatusChangeRequest,
    ) -> ClientResult<Job> {
        let change = current.transition(request)?;
        let _guard = self.begin_mutation(format!("job.status:{id}"))?;

        let body = StatusChangeBody {
            status: request.target,
            notes: request.notes.as_deref(),
            changed_by: request.changed_by.as_deref(),
        };
        let job: Job = self
            .execute(self.patch(&format!("/jobs/{id}/status")).json(&body))
            .await?;

        tracing::info!(
            job_id = %id,
            from = %change.old_status,
            to = %change.new_status,
            "job status changed"
        );
        self.publish(DataEvent::JobStatusChanged {
            job_id: id,
            customer_id: job.customer_id,
            occurred_at: Utc::now(),
        });
        Ok(job)
    }

    pub async fn job_materials(&self, id: JobId) -> ClientResult<Vec<JobMaterial>> {
        self.get_json(&format!("/jobs/{id}/materials")).await
    }

    /// `status` is the job's current status; it gates whether a used
    /// quantity may be part of the draft.
    pub async fn add_job_material(
        &self,
        id: JobId,
        status: JobStatus,
        draft: &MaterialDraft,
    ) -> ClientResult<JobMaterial> {
        draft.validate(status)?;
        let _guard = self.begin_mutation(format!("job.material.add:{id}"))?;

        let material: JobMaterial = self
            .execute(self.post(&format!("/jobs/{id}/materials")).json(draft))
            .await?;
        self.publish(DataEvent::MaterialAdded {
            job_id: id,
            occurred_at: Utc::now(),
        });
        Ok(material)
    }

    pub async fn update_job_material(
        &self,
        id: JobId,
        material_id: JobMaterialId,
        status: JobStatus,
        update: &MaterialUpdate,
    ) -> ClientResult<JobMaterial> {
        update.validate(status)?;
        let _guard = self.begin_mutation(format!("job.material.update:{material_id}"))?;

        let material: JobMaterial = self
            .execute(
                self.put(&format!("/jobs/{id}/materials/{material_id}"))
                    .json(update),
            )
            .await?;
        self.publish(DataEvent::MaterialUpdated {
            job_id: id,
            occurred_at: Utc::now(),
        });
        Ok(material)
    }

    pub async fn remove_job_material(
        &self,
        id: JobId,
        material_id: JobMaterialId,
    ) -> ClientResult<()> {
        let _guard = self.begin_mutation(format!("job.material.remove:{material_id}"))?;

        self.execute_empty(self.delete(&format!("/jobs/{id}/materials/{material_id}")))
            .await?;
        self.publish(DataEvent::MaterialRemoved {
            job_id: id,
            occurred_at: Utc::now(),
        });
        Ok(())
    }

    pub async fn job_payments(&self, id: JobId) -> ClientResult<Vec<JobPayment>> {
        self.get_json(&format!("/jobs/{id}/payments")).await
    }

    pub async fn add_job_payment(
        &self,
        id: JobId,
        customer_id: CustomerId,
        draft: &PaymentDraft,
    ) -> ClientResult<JobPayment> {
        draft.validate()?;
        let _guard = self.begin_mutation(format!("job.payment.add:{id}"))?;

        let payment: JobPayment = self
            .execute(self.post(&format!("/jobs/{id}/payments")).json(draft))
            .await?;
        self.publish(DataEvent::PaymentAdded {
            job_id: id,
            customer_id,
            occurred_at: Utc::now(),
        });
        Ok(payment)
    }

    pub async fn update_job_payment(
        &self,
        id: JobId,
        payment_id: JobPaymentId,
        customer_id: CustomerId,
        draft: &PaymentDraft,
    ) -> ClientResult<JobPayment> {
        draft.validate()?;
        let _guard = self.begin_mutation(format!("job.payment.update:{payment_id}"))?;

        let payment: JobPayment = self
            .execute(
                self.put(&format!("/jobs/{id}/payments/{payment_id}"))
                    .json(draft),
            )
            .await?;
        self.publish(DataEvent::PaymentUpdated {
            job_id: id,
            customer_id,
            occurred_at: Utc::now(),
        });
        Ok(payment)
    }

    /// Settle a recorded payment. The backend stamps the paid date.
    pub async fn mark_payment_paid(
        &self,
        id: JobId,
        payment_id: JobPaymentId,
        customer_id: CustomerId,
    ) -> ClientResult<JobPayment> {
        let _guard = self.begin_mutation(format!("job.payment.paid:{payment_id}"))?;

        let payment: JobPayment = self
            .execute(self.patch(&format!("/jobs/{id}/payments/{payment_id}/paid")))
            .await?;
        self.publish(DataEvent::PaymentMarkedPaid {
            job_id: id,
            customer_id,
            occurred_at: Utc::now(),
        });
        Ok(payment)
    }

    pub async fn remove_job_payment(
        &self,
        id: JobId,
        payment_id: JobPaymentId,
        customer_id: CustomerId,
    ) -> ClientResult<()> {
        let _guard = self.begin_mutation(format!("job.payment.remove:{payment_id}"))?;

        self.execute_empty(self.delete(&format!("/jobs/{id}/payments/{payment_id}")))
            .await?;
        self.publish(DataEvent::PaymentRemoved {
            job_id: id,
            customer_id,
            occurred_at: Utc::now(),
        });
        Ok(())
    }

    pub async fn job_expenses(&self, id: JobId) -> ClientResult<Vec<JobExpense>> {
        self.get_json(&format!("/jobs/{id}/expenses")).await
    }

    pub async fn add_job_expense(
        &self,
        id: JobId,
        draft: &ExpenseDraft,
    ) -> ClientResult<JobExpense> {
        draft.validate()?;
        let _guard = self.begin_mutation(format!("job.expense.add:{id}"))?;

        let expense: JobExpense = self
            .execute(self.post(&format!("/jobs/{id}/expenses")).json(draft))
            .await?;
        self.publish(DataEvent::ExpenseAdded {
            job_id: id,
            occurred_at: Utc::now(),
        });
        Ok(expense)
    }

    pub async fn update_job_expense(
        &self,
        id: JobId,
        expense_id: JobExpenseId,
        draft: &ExpenseDraft,
    ) -> ClientResult<JobExpense> {
        draft.validate()?;
        let _guard = self.begin_mutation(format!("job.expense.update:{expense_id}"))?;

        let expense: JobExpense = self
            .execute(
                self.put(&format!("/jobs/{id}/expenses/{expense_id}"))
                    .json(draft),
            )
            .await?;
        self.publish(DataEvent::ExpenseUpdated {
            job_id: id,
            occurred_at: Utc::now(),
        });
        Ok(expense)
    }

    pub async fn remove_job_expense(
        &self,
        id: JobId,
        expense_id: JobExpenseId,
    ) -> ClientResult<()> {
        let _guard = self.begin_mutation(format!("job.expense.remove:{expense_id}"))?;

        self.execute_empty(self.delete(&format!("/jobs/{id}/expenses/{expense_id}")))
            .await?;
        self.publish(DataEvent::ExpenseRemoved {
            job_id: id,
            occurred_at: Utc::now(),
        });
        Ok(())
    }
}
