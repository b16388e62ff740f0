//! Mutation events and the views they invalidate.
//!
//! The mapping in [`invalidated_views`] is the single authority on which
//! derived views a mutation renders stale. Mutating code publishes the event;
//! it never reaches into a cache directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fieldserve_core::{CustomerId, JobId, ProductId, SupplierId};

use crate::event::Event;

/// A mutation the backend accepted.
///
/// Carries only the ids consumers need to key views. Payments and job-level
/// changes carry the owning customer because they move that customer's
/// receivable figures; materials and expenses stay inside the job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataEvent {
    JobCreated {
        job_id: JobId,
        customer_id: CustomerId,
        occurred_at: DateTime<Utc>,
    },
    JobUpdated {
        job_id: JobId,
        customer_id: CustomerId,
        occurred_at: DateTime<Utc>,
    },
    JobDeleted {
        job_id: JobId,
        customer_id: CustomerId,
        occurred_at: DateTime<Utc>,
    },
    JobStatusChanged {
        job_id: JobId,
        customer_id: CustomerId,
        occurred_at: DateTime<Utc>,
    },
    MaterialAdded {
        job_id: JobId,
        occurred_at: DateTime<Utc>,
    },
    /// Covers used-quantity entry, which deducts stock on the backend.
    MaterialUpdated {
        job_id: JobId,
        occurred_at: DateTime<Utc>,
    },
    MaterialRemoved {
        job_id: JobId,
        occurred_at: DateTime<Utc>,
    },
    PaymentAdded {
        job_id: JobId,
        customer_id: CustomerId,
        occurred_at: DateTime<Utc>,
    },
    PaymentUpdated {
        job_id: JobId,
        customer_id: CustomerId,
        occurred_at: DateTime<Utc>,
    },
    PaymentMarkedPaid {
        job_id: JobId,
        customer_id: CustomerId,
        occurred_at: DateTime<Utc>,
    },
    PaymentRemoved {
        job_id: JobId,
        customer_id: CustomerId,
        occurred_at: DateTime<Utc>,
    },
    ExpenseAdded {
        job_id: JobId,
        occurred_at: DateTime<Utc>,
    },
    ExpenseUpdated {
        job_id: JobId,
        occurred_at: DateTime<Utc>,
    },
    ExpenseRemoved {
        job_id: JobId,
        occurred_at: DateTime<Utc>,
    },
    CustomerChanged {
        customer_id: CustomerId,
        occurred_at: DateTime<Utc>,
    },
    SupplierChanged {
        supplier_id: SupplierId,
        occurred_at: DateTime<Utc>,
    },
    ProductChanged {
        product_id: ProductId,
        occurred_at: DateTime<Utc>,
    },
    StockMovementRecorded {
        product_id: ProductId,
        occurred_at: DateTime<Utc>,
    },
    /// Deleting a movement reverses its effect on the product's stock.
    StockMovementDeleted {
        product_id: ProductId,
        occurred_at: DateTime<Utc>,
    },
}

impl Event for DataEvent {
    fn event_type(&self) -> &'static str {
        match self {
            DataEvent::JobCreated { .. } => "job.created",
            DataEvent::JobUpdated { .. } => "job.updated",
            DataEvent::JobDeleted { .. } => "job.deleted",
            DataEvent::JobStatusChanged { .. } => "job.status_changed",
            DataEvent::MaterialAdded { .. } => "job.material.added",
            DataEvent::MaterialUpdated { .. } => "job.material.updated",
            DataEvent::MaterialRemoved { .. } => "job.material.removed",
            DataEvent::PaymentAdded { .. } => "job.payment.added",
            DataEvent::PaymentUpdated { .. } => "job.payment.updated",
            DataEvent::PaymentMarkedPaid { .. } => "job.payment.marked_paid",
            DataEvent::PaymentRemoved { .. } => "job.payment.removed",
            DataEvent::ExpenseAdded { .. } => "job.expense.added",
            DataEvent::ExpenseUpdated { .. } => "job.expense.updated",
            DataEvent::ExpenseRemoved { .. } => "job.expense.removed",
            DataEvent::CustomerChanged { .. } => "customer.changed",
            DataEvent::SupplierChanged { .. } => "supplier.changed",
            DataEvent::ProductChanged { .. } => "product.changed",
            DataEvent::StockMovementRecorded { .. } => "stock.movement_recorded",
            DataEvent::StockMovementDeleted { .. } => "stock.movement_deleted",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            DataEvent::JobCreated { occurred_at, .. }
            | DataEvent::JobUpdated { occurred_at, .. }
            | DataEvent::JobDeleted { occurred_at, .. }
            | DataEvent::JobStatusChanged { occurred_at, .. }
            | DataEvent::MaterialAdded { occurred_at, .. }
            | DataEvent::MaterialUpdated { occurred_at, .. }
            | DataEvent::MaterialRemoved { occurred_at, .. }
            | DataEvent::PaymentAdded { occurred_at, .. }
            | DataEvent::PaymentUpdated { occurred_at, .. }
            | DataEvent::PaymentMarkedPaid { occurred_at, .. }
            | DataEvent::PaymentRemoved { occurred_at, .. }
            | DataEvent::ExpenseAdded { occurred_at, .. }
            | DataEvent::ExpenseUpdated { occurred_at, .. }
            | DataEvent::ExpenseRemoved { occurred_at, .. }
            | DataEvent::CustomerChanged { occurred_at, .. }
            | DataEvent::SupplierChanged { occurred_at, .. }
            | DataEvent::ProductChanged { occurred_at, .. }
            | DataEvent::StockMovementRecorded { occurred_at, .. }
            | DataEvent::StockMovementDeleted { occurred_at, .. } => *occurred_at,
        }
    }
}

/// A derived view that can go stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewKey {
    Job(JobId),
    JobList,
    JobMaterials(JobId),
    JobPayments(JobId),
    JobExpenses(JobId),
    JobStatistics,
    Customer(CustomerId),
    CustomerList,
    ReceivableSummary(CustomerId),
    ReceivableSummaries,
    ProductList,
    LowStock,
    StockMovements,
    StockStatistics,
    SupplierList,
}

/// Views rendered stale by a mutation.
///
/// Job-level money changes reach the owning customer's receivables;
/// used-quantity entry reaches the stock views because the backend deducts
/// stock when it is recorded.
pub fn invalidated_views(event: &DataEvent) -> Vec<ViewKey> {
    use DataEvent::*;
    use ViewKey::*;

    match *event {
        JobCreated { customer_id, .. } => vec![
            JobList,
            JobStatistics,
            ReceivableSummary(customer_id),
            ReceivableSummaries,
        ],
        JobUpdated {
            job_id,
            customer_id,
            ..
        }
        | JobDeleted {
            job_id,
            customer_id,
            ..
        }
        | JobStatusChanged {
            job_id,
            customer_id,
            ..
        } => vec![
            Job(job_id),
            JobList,
            JobStatistics,
            ReceivableSummary(customer_id),
            ReceivableSummaries,
        ],
        MaterialAdded { job_id, .. } | MaterialRemoved { job_id, .. } => {
            vec![JobMaterials(job_id), Job(job_id), JobStatistics]
        }
        MaterialUpdated { job_id, .. } => vec![
            JobMaterials(job_id),
            Job(job_id),
            JobStatistics,
            ProductList,
            LowStock,
            StockMovements,
            StockStatistics,
        ],
        PaymentAdded {
            job_id,
            customer_id,
            ..
        }
        | PaymentUpdated {
            job_id,
            customer_id,
            ..
        }
        | PaymentMarkedPaid {
            job_id,
            customer_id,
            ..
        }
        | PaymentRemoved {
            job_id,
            customer_id,
            ..
        } => vec![
            JobPayments(job_id),
            Job(job_id),
            JobStatistics,
            ReceivableSummary(customer_id),
            ReceivableSummaries,
        ],
        ExpenseAdded { job_id, .. }
        | ExpenseUpdated { job_id, .. }
        | ExpenseRemoved { job_id, .. } => {
            vec![JobExpenses(job_id), Job(job_id), JobStatistics]
        }
        CustomerChanged { customer_id, .. } => {
            vec![Customer(customer_id), CustomerList, ReceivableSummaries]
        }
        SupplierChanged { .. } => vec![SupplierList],
        ProductChanged { .. } => vec![ProductList, LowStock, StockStatistics],
        StockMovementRecorded { .. } | StockMovementDeleted { .. } => {
            vec![StockMovements, StockStatistics, ProductList, LowStock]
        }
    }
}
