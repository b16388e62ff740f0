//! Job status state machine.
//!
//! The ten states form a loose pipeline, not a strict ladder: operators
//! routinely move jobs backwards (a failed payment drops a job back to
//! `PaymentPending`) or skip ahead, so any state may move to any other
//! state. The only hard rules are that a transition must actually change
//! the state, and that nothing leaves `Completed` or `Cancelled` without
//! an explicit reopen.

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use fieldserve_core::{DomainError, DomainResult};

/// Job lifecycle state, wire-encoded as the backend's integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum JobStatus {
    QuoteSent,
    QuoteApproved,
    PaymentPending,
    PaymentReceived,
    MaterialPreparing,
    InstallationScheduled,
    InProgress,
    InstallationCompleted,
    Completed,
    Cancelled,
}

impl JobStatus {
    /// Every state, in wire-code order.
    pub const ALL: [JobStatus; 10] = [
        JobStatus::QuoteSent,
        JobStatus::QuoteApproved,
        JobStatus::PaymentPending,
        JobStatus::PaymentReceived,
        JobStatus::MaterialPreparing,
        JobStatus::InstallationScheduled,
        JobStatus::InProgress,
        JobStatus::InstallationCompleted,
        JobStatus::Completed,
        JobStatus::Cancelled,
    ];

    /// Integer code used on the wire.
    pub fn code(self) -> u8 {
        match self {
            JobStatus::QuoteSent => 1,
            JobStatus::QuoteApproved => 2,
            JobStatus::PaymentPending => 3,
            JobStatus::PaymentReceived => 4,
            JobStatus::MaterialPreparing => 5,
            JobStatus::InstallationScheduled => 6,
            JobStatus::InProgress => 7,
            JobStatus::InstallationCompleted => 8,
            JobStatus::Completed => 9,
            JobStatus::Cancelled => 10,
        }
    }

    /// Decode a wire code. Unknown codes are an error, never a silent
    /// default.
    pub fn from_code(code: u8) -> DomainResult<Self> {
        match code {
            1 => Ok(JobStatus::QuoteSent),
            2 => Ok(JobStatus::QuoteApproved),
            3 => Ok(JobStatus::PaymentPending),
            4 => Ok(JobStatus::PaymentReceived),
            5 => Ok(JobStatus::MaterialPreparing),
            6 => Ok(JobStatus::InstallationScheduled),
            7 => Ok(JobStatus::InProgress),
            8 => Ok(JobStatus::InstallationCompleted),
            9 => Ok(JobStatus::Completed),
            10 => Ok(JobStatus::Cancelled),
            other => Err(DomainError::validation(format!(
                "unknown job status code: {other}"
            ))),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            JobStatus::QuoteSent => "quote sent",
            JobStatus::QuoteApproved => "quote approved",
            JobStatus::PaymentPending => "payment pending",
            JobStatus::PaymentReceived => "payment received",
            JobStatus::MaterialPreparing => "material preparing",
            JobStatus::InstallationScheduled => "installation scheduled",
            JobStatus::InProgress => "in progress",
            JobStatus::InstallationCompleted => "installation completed",
            JobStatus::Completed => "completed",
            JobStatus::Cancelled => "cancelled",
        }
    }

    /// Terminal states hold the job closed until an explicit reopen.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Cancelled)
    }

    /// Open jobs count toward active-job figures.
    pub fn is_open(self) -> bool {
        !self.is_terminal()
    }

    /// Used-quantity entry on material lines unlocks in exactly this
    /// state. Leaving it again does not wipe quantities already entered.
    pub fn used_quantity_editable(self) -> bool {
        matches!(self, JobStatus::InstallationCompleted)
    }

    /// Whether material line totals are costed from actual usage rather
    /// than the planned figures.
    pub fn uses_actual_quantities(self) -> bool {
        matches!(
            self,
            JobStatus::InstallationCompleted | JobStatus::Completed
        )
    }

    /// Validate a status change against the current state and produce its
    /// audit record. The caller persists the record; a rejected change
    /// leaves the job untouched.
    pub fn transition(self, request: &StatusChangeRequest) -> DomainResult<StatusChange> {
        if request.target == self {
            return Err(DomainError::invalid_transition(self, request.target));
        }
        if self.is_terminal() && !request.reopen {
            return Err(DomainError::invalid_transition(self, request.target));
        }

        Ok(StatusChange {
            old_status: self,
            new_status: request.target,
            changed_by: request.changed_by.clone(),
            notes: request.notes.clone(),
            changed_at: request.occurred_at,
        })
    }
}

impl core::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for JobStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for JobStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code = u8::deserialize(deserializer)?;
        JobStatus::from_code(code).map_err(de::Error::custom)
    }
}

/// Command: change a job's status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChangeRequest {
    pub target: JobStatus,
    /// Must be set to leave `Completed` or `Cancelled`.
    pub reopen: bool,
    pub changed_by: Option<String>,
    pub notes: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl StatusChangeRequest {
    pub fn to(target: JobStatus, occurred_at: DateTime<Utc>) -> Self {
        Self {
            target,
            reopen: false,
            changed_by: None,
            notes: None,
            occurred_at,
        }
    }

    pub fn reopening(target: JobStatus, occurred_at: DateTime<Utc>) -> Self {
        Self {
            reopen: true,
            ..Self::to(target, occurred_at)
        }
    }
}

/// Audit record produced by a successful transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub old_status: JobStatus,
    pub new_status: JobStatus,
    pub changed_by: Option<String>,
    pub notes: Option<String>,
    pub changed_at: DateTime<Utc>,
}
