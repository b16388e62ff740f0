//! Job lifecycle domain: the status state machine, the financial child
//! records hanging off a job (materials, payments, expenses), pure cost
//! aggregation over those records, and fleet-wide statistics.
//!
//! Everything here is deterministic and integer-exact. The crate never
//! talks to the network; it validates drafts before they are sent and
//! recomputes server-derived figures from snapshots after they arrive.

pub mod costing;
pub mod expense;
pub mod job;
pub mod material;
pub mod payment;
pub mod statistics;
pub mod status;

pub use costing::{CostBasis, CostBreakdown};
pub use expense::{ExpenseDraft, ExpenseType, JobExpense};
pub use job::{Job, JobDraft, JobFilter, JobSnapshot, JobStatusHistory};
pub use material::{JobMaterial, MaterialDraft, MaterialUpdate};
pub use payment::{JobPayment, PaymentDraft, PaymentType};
pub use statistics::JobStatistics;
pub use status::{JobStatus, StatusChange, StatusChangeRequest};
