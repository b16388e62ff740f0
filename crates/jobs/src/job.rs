//! The job record and its surrounding shapes: creation drafts, list
//! filters, the status audit trail, and the snapshot unit that cost and
//! receivable computations work over.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fieldserve_core::{
    CustomerId, DomainError, DomainResult, Entity, JobId, Money, StatusChangeId, time,
};
use fieldserve_parties::Customer;

use crate::expense::JobExpense;
use crate::material::JobMaterial;
use crate::payment::JobPayment;
use crate::status::JobStatus;

/// A customer job from quote to completion, as served by the backend.
///
/// Child collections are embedded on detail endpoints and absent on list
/// endpoints; [`JobSnapshot`] normalizes that difference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    pub customer_id: CustomerId,
    #[serde(default)]
    pub customer: Option<Customer>,
    pub job_number: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub address: String,
    pub scheduled_date: DateTime<Utc>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completion_date: Option<DateTime<Utc>>,
    pub status: JobStatus,
    pub total_amount: Money,
    #[serde(default)]
    pub discount_amount: Money,
    pub final_amount: Money,
    #[serde(default)]
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub materials: Option<Vec<JobMaterial>>,
    #[serde(default)]
    pub payments: Option<Vec<JobPayment>>,
    #[serde(default)]
    pub expenses: Option<Vec<JobExpense>>,
    #[serde(default)]
    pub status_history: Option<Vec<JobStatusHistory>>,
}

impl Job {
    /// Discounted total, floored at zero. The server sends `final_amount`;
    /// this recomputes it for previews and consistency checks.
    pub fn computed_final_amount(&self) -> Money {
        self.total_amount.sub_floored(self.discount_amount)
    }

    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }

    /// Whole days since the job was created. Jobs dated in the future
    /// clamp to zero.
    pub fn age_days(&self, now: DateTime<Utc>) -> i64 {
        time::age_days(self.created_at, now)
    }

    /// Whether payments cover the final amount. `None` when the payment
    /// rows are not embedded, since the question cannot be answered from
    /// the list shape.
    pub fn is_fully_paid(&self) -> Option<bool> {
        let payments = self.payments.as_ref()?;
        Some(crate::payment::total_paid(payments) >= self.final_amount)
    }

    /// Case-insensitive match over job number, title, address and the
    /// embedded customer name. An empty query matches everything.
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }

        let mut haystacks = vec![
            self.job_number.to_lowercase(),
            self.title.to_lowercase(),
            self.address.to_lowercase(),
        ];
        if let Some(customer) = &self.customer {
            haystacks.push(customer.display_name().to_lowercase());
        }

        haystacks.iter().any(|h| h.contains(&query))
    }
}

impl Entity for Job {
    type Id = JobId;

    fn id(&self) -> JobId {
        self.id
    }
}

/// Persisted audit row for a status change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusHistory {
    pub id: StatusChangeId,
    pub job_id: JobId,
    pub old_status: JobStatus,
    pub new_status: JobStatus,
    #[serde(default)]
    pub changed_by: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Caller-controlled fields when creating or updating a job. The job
/// number is assigned server-side.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDraft {
    pub customer_id: CustomerId,
    pub title: String,
    pub description: Option<String>,
    pub address: String,
    pub scheduled_date: DateTime<Utc>,
    pub total_amount: Money,
    pub discount_amount: Money,
    pub notes: Option<String>,
}

impl JobDraft {
    pub fn new(
        customer_id: CustomerId,
        title: impl Into<String>,
        address: impl Into<String>,
        scheduled_date: DateTime<Utc>,
    ) -> Self {
        Self {
            customer_id,
            title: title.into(),
            description: None,
            address: address.into(),
            scheduled_date,
            total_amount: Money::ZERO,
            discount_amount: Money::ZERO,
            notes: None,
        }
    }

    /// Discounted total as it will appear on the created job.
    pub fn final_amount(&self) -> Money {
        self.total_amount.sub_floored(self.discount_amount)
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.title.trim().is_empty() {
            return Err(DomainError::validation("job title is required"));
        }
        if self.address.trim().is_empty() {
            return Err(DomainError::validation("job address is required"));
        }
        if self.total_amount.is_negative() {
            return Err(DomainError::validation("total amount cannot be negative"));
        }
        if self.discount_amount.is_negative() {
            return Err(DomainError::validation(
                "discount amount cannot be negative",
            ));
        }
        Ok(())
    }
}

/// Filter over job lists. Mirrors the query parameters the list endpoint
/// accepts, so one value can drive a server query or a local pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobFilter {
    pub customer_id: Option<CustomerId>,
    pub status: Option<JobStatus>,
    pub scheduled_from: Option<DateTime<Utc>>,
    pub scheduled_to: Option<DateTime<Utc>>,
    pub search: Option<String>,
    pub is_paid: Option<bool>,
}

impl JobFilter {
    pub fn matches(&self, job: &Job) -> bool {
        if let Some(customer_id) = self.customer_id {
            if job.customer_id != customer_id {
                return false;
            }
        }
        if let Some(status) = self.status {
            if job.status != status {
                return false;
            }
        }
        if !time::in_window(job.scheduled_date, self.scheduled_from, self.scheduled_to) {
            return false;
        }
        if let Some(search) = &self.search {
            if !job.matches_search(search) {
                return false;
            }
        }
        if let Some(is_paid) = self.is_paid {
            // Only decidable when payment rows are embedded; list shapes
            // without them leave this to the server.
            if let Some(fully_paid) = job.is_fully_paid() {
                if fully_paid != is_paid {
                    return false;
                }
            }
        }
        true
    }

    /// Query-string pairs for the list endpoint.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(customer_id) = self.customer_id {
            query.push(("customerId", customer_id.to_string()));
        }
        if let Some(status) = self.status {
            query.push(("status", status.code().to_string()));
        }
        if let Some(from) = self.scheduled_from {
            query.push(("startDate", from.to_rfc3339()));
        }
        if let Some(to) = self.scheduled_to {
            query.push(("endDate", to.to_rfc3339()));
        }
        if let Some(search) = &self.search {
            query.push(("searchTerm", search.clone()));
        }
        if let Some(is_paid) = self.is_paid {
            query.push(("isPaid", is_paid.to_string()));
        }
        query
    }
}

/// One job with all of its child records. Every derived figure in the
/// workspace is computed from a snapshot, never from cached fragments.
#[derive(Debug, Clone, PartialEq)]
pub struct JobSnapshot {
    pub job: Job,
    pub materials: Vec<JobMaterial>,
    pub payments: Vec<JobPayment>,
    pub expenses: Vec<JobExpense>,
}

impl JobSnapshot {
    pub fn new(
        job: Job,
        materials: Vec<JobMaterial>,
        payments: Vec<JobPayment>,
        expenses: Vec<JobExpense>,
    ) -> Self {
        Self {
            job,
            materials,
            payments,
            expenses,
        }
    }

    /// Build from a job whose child collections were embedded by the
    /// server. Missing collections become empty.
    pub fn from_embedded(mut job: Job) -> Self {
        let materials = job.materials.take().unwrap_or_default();
        let payments = job.payments.take().unwrap_or_default();
        let expenses = job.expenses.take().unwrap_or_default();
        Self {
            job,
            materials,
            payments,
            expenses,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;

    pub(crate) fn test_job(id: i64, customer_id: i64, status: JobStatus) -> Job {
        let created = Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap();
        Job {
            id: JobId::new(id),
            customer_id: CustomerId::new(customer_id),
            customer: None,
            job_number: format!("JOB-2026-{id:04}"),
            title: "site camera installation".to_string(),
            description: None,
            address: "Kozyatağı Mah. 14, Istanbul".to_string(),
            scheduled_date: created,
            start_date: None,
            completion_date: None,
            status,
            total_amount: Money::from_major(10_000),
            discount_amount: Money::ZERO,
            final_amount: Money::from_major(10_000),
            notes: None,
            is_active: true,
            created_at: created,
            updated_at: created,
            materials: None,
            payments: None,
            expenses: None,
            status_history: None,
        }
    }

    #[test]
    fn draft_validation_requires_title_and_address() {
        let scheduled = Utc::now();
        let draft = JobDraft::new(CustomerId::new(1), " ", "Some Street 5", scheduled);
        match draft.validate().unwrap_err() {
            DomainError::Validation(msg) if msg.contains("title") => {}
            _ => panic!("Expected Validation error for blank title"),
        }

        let draft = JobDraft::new(CustomerId::new(1), "Warehouse cameras", "", scheduled);
        match draft.validate().unwrap_err() {
            DomainError::Validation(msg) if msg.contains("address") => {}
            _ => panic!("Expected Validation error for blank address"),
        }
    }

    #[test]
    fn draft_validation_rejects_negative_amounts() {
        let mut draft = JobDraft::new(
            CustomerId::new(1),
            "Warehouse cameras",
            "Some Street 5",
            Utc::now(),
        );
        draft.total_amount = Money::from_major(-1);
        assert!(draft.validate().is_err());

        draft.total_amount = Money::from_major(100);
        draft.discount_amount = Money::from_major(-1);
        assert!(draft.validate().is_err());
    }

    #[test]
    fn final_amount_is_discounted_total_floored_at_zero() {
        let mut draft = JobDraft::new(
            CustomerId::new(1),
            "Warehouse cameras",
            "Some Street 5",
            Utc::now(),
        );
        draft.total_amount = Money::from_major(10_000);
        draft.discount_amount = Money::from_major(1_500);
        assert_eq!(draft.final_amount(), Money::from_major(8_500));

        // Discount may exceed the total; the result floors at zero.
        draft.discount_amount = Money::from_major(12_000);
        assert_eq!(draft.final_amount(), Money::ZERO);
    }

    #[test]
    fn computed_final_amount_matches_the_served_figure() {
        let mut job = test_job(1, 1, JobStatus::QuoteSent);
        job.total_amount = Money::from_major(10_000);
        job.discount_amount = Money::from_major(1_500);
        job.final_amount = Money::from_major(8_500);

        assert_eq!(job.computed_final_amount(), job.final_amount);
    }

    #[test]
    fn search_covers_number_title_address_and_customer() {
        let mut job = test_job(7, 1, JobStatus::InProgress);
        assert!(job.matches_search("JOB-2026-0007"));
        assert!(job.matches_search("CAMERA"));
        assert!(job.matches_search("kozyatağı"));
        assert!(!job.matches_search("acme"));
        assert!(job.matches_search("  "));

        job.customer = Some(Customer {
            id: CustomerId::new(1),
            first_name: "Deniz".to_string(),
            last_name: "Aydin".to_string(),
            company_name: Some("Acme Depo A.S.".to_string()),
            phone: "0532 111 22 33".to_string(),
            email: None,
            address: None,
            tax_number: None,
            notes: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });
        assert!(job.matches_search("acme"));
    }

    #[test]
    fn filter_narrows_by_every_field() {
        let jobs = vec![
            test_job(1, 1, JobStatus::QuoteSent),
            test_job(2, 1, JobStatus::InProgress),
            test_job(3, 2, JobStatus::InProgress),
        ];

        let filter = JobFilter::default();
        assert_eq!(jobs.iter().filter(|j| filter.matches(j)).count(), 3);

        let filter = JobFilter {
            status: Some(JobStatus::InProgress),
            ..JobFilter::default()
        };
        assert_eq!(jobs.iter().filter(|j| filter.matches(j)).count(), 2);

        let filter = JobFilter {
            customer_id: Some(CustomerId::new(1)),
            status: Some(JobStatus::InProgress),
            ..JobFilter::default()
        };
        let matched: Vec<_> = jobs.iter().filter(|j| filter.matches(j)).collect();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, JobId::new(2));
    }

    #[test]
    fn filter_date_window_is_inclusive() {
        let job = test_job(1, 1, JobStatus::QuoteSent);

        let filter = JobFilter {
            scheduled_from: Some(job.scheduled_date),
            scheduled_to: Some(job.scheduled_date),
            ..JobFilter::default()
        };
        assert!(filter.matches(&job));

        let filter = JobFilter {
            scheduled_from: Some(job.scheduled_date + chrono::Duration::days(1)),
            ..JobFilter::default()
        };
        assert!(!filter.matches(&job));
    }

    #[test]
    fn filter_query_pairs_use_wire_names_and_codes() {
        let filter = JobFilter {
            customer_id: Some(CustomerId::new(9)),
            status: Some(JobStatus::InstallationCompleted),
            search: Some("warehouse".to_string()),
            ..JobFilter::default()
        };

        let query = filter.to_query();
        assert!(query.contains(&("customerId", "9".to_string())));
        assert!(query.contains(&("status", "8".to_string())));
        assert!(query.contains(&("searchTerm", "warehouse".to_string())));

        let filter = JobFilter {
            is_paid: Some(false),
            ..JobFilter::default()
        };
        assert_eq!(filter.to_query(), vec![("isPaid", "false".to_string())]);
    }

    #[test]
    fn paid_filter_needs_embedded_payment_rows() {
        use crate::payment::PaymentType;
        use fieldserve_core::JobPaymentId;

        let mut job = test_job(1, 1, JobStatus::Completed);
        let filter = JobFilter {
            is_paid: Some(true),
            ..JobFilter::default()
        };

        // Without payment rows the question is left to the server.
        assert_eq!(job.is_fully_paid(), None);
        assert!(filter.matches(&job));

        job.payments = Some(vec![JobPayment {
            id: JobPaymentId::new(1),
            job_id: job.id,
            amount: Money::from_major(10_000),
            payment_type: PaymentType::Cash,
            payment_date: job.created_at,
            installment_count: None,
            due_date: None,
            is_paid: false,
            paid_date: None,
            notes: None,
            receipt_number: None,
            created_at: job.created_at,
        }]);
        assert_eq!(job.is_fully_paid(), Some(false));
        assert!(!filter.matches(&job));

        job.payments.as_mut().unwrap()[0].is_paid = true;
        assert_eq!(job.is_fully_paid(), Some(true));
        assert!(filter.matches(&job));
    }

    #[test]
    fn snapshot_pulls_embedded_collections_out_of_the_job() {
        let json = r#"{
            "id": 7,
            "customerId": 2,
            "jobNumber": "JOB-2026-0007",
            "title": "Office floor cameras",
            "address": "Bahariye Cad. 12",
            "scheduledDate": "2026-02-01T09:00:00Z",
            "status": 7,
            "totalAmount": 10000,
            "discountAmount": 1500,
            "finalAmount": 8500,
            "isActive": true,
            "createdAt": "2026-01-05T09:00:00Z",
            "updatedAt": "2026-02-01T10:00:00Z",
            "materials": [],
            "payments": [{
                "id": 1,
                "jobId": 7,
                "amount": 4000,
                "paymentType": 1,
                "paymentDate": "2026-02-02T09:00:00Z",
                "isPaid": true,
                "createdAt": "2026-02-02T09:00:00Z"
            }]
        }"#;

        let job: Job = serde_json::from_str(json).unwrap();
        let snapshot = JobSnapshot::from_embedded(job);

        assert!(snapshot.materials.is_empty());
        assert_eq!(snapshot.payments.len(), 1);
        assert!(snapshot.expenses.is_empty());
        assert_eq!(snapshot.job.materials, None);
        assert_eq!(snapshot.job.final_amount, Money::from_major(8_500));
    }

    #[test]
    fn missing_discount_defaults_to_zero() {
        let json = r#"{
            "id": 1,
            "customerId": 1,
            "jobNumber": "JOB-2026-0001",
            "title": "Shop front",
            "address": "Main Street 5",
            "scheduledDate": "2026-02-01T09:00:00Z",
            "status": 1,
            "totalAmount": 500,
            "finalAmount": 500,
            "isActive": true,
            "createdAt": "2026-01-05T09:00:00Z",
            "updatedAt": "2026-01-05T09:00:00Z"
        }"#;

        let job: Job = serde_json::from_str(json).unwrap();
        assert_eq!(job.discount_amount, Money::ZERO);
        assert_eq!(job.computed_final_amount(), Money::from_major(500));
    }

    #[test]
    fn age_days_clamps_future_creation_dates_to_zero() {
        let job = test_job(1, 1, JobStatus::QuoteSent);
        let now = job.created_at + chrono::Duration::days(95);
        assert_eq!(job.age_days(now), 95);

        let before = job.created_at - chrono::Duration::days(2);
        assert_eq!(job.age_days(before), 0);
    }
}
