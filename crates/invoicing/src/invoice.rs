use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use billing_core::{DomainError, InvoiceId};

/// Smallest amount an invoice may be issued for.
pub const MIN_AMOUNT: f64 = 1.0;

/// Billable service an invoice belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ServiceName {
    Dmp,
    Ssp,
}

impl ServiceName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceName::Dmp => "DMP",
            ServiceName::Ssp => "SSP",
        }
    }
}

impl core::fmt::Display for ServiceName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for ServiceName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DMP" => Ok(ServiceName::Dmp),
            "SSP" => Ok(ServiceName::Ssp),
            other => Err(DomainError::validation(format!(
                "serviceName must be one of: DMP, SSP (got {other})"
            ))),
        }
    }
}

/// Payment status of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InvoiceStatus {
    Paid,
    Unpaid,
    Pending,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Paid => "PAID",
            InvoiceStatus::Unpaid => "UNPAID",
            InvoiceStatus::Pending => "PENDING",
        }
    }
}

impl core::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for InvoiceStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PAID" => Ok(InvoiceStatus::Paid),
            "UNPAID" => Ok(InvoiceStatus::Unpaid),
            "PENDING" => Ok(InvoiceStatus::Pending),
            other => Err(DomainError::validation(format!(
                "status must be one of: PAID, UNPAID, PENDING (got {other})"
            ))),
        }
    }
}

/// An invoice as stored by the API and rendered by the dashboard.
///
/// Wire format uses camelCase field names:
/// `{ "id", "serviceName", "amount", "date", "status" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: InvoiceId,
    pub service_name: ServiceName,
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub status: InvoiceStatus,
}

impl Invoice {
    /// Overwrite the mutable fields from an update draft.
    ///
    /// The issue date is fixed at creation and is not touched by updates.
    pub fn apply_update(&mut self, draft: &InvoiceDraft) -> Result<(), DomainError> {
        draft.validate()?;
        self.service_name = draft.service_name;
        self.amount = draft.amount;
        self.status = draft.status;
        Ok(())
    }

    /// Text searched by [`crate::SearchFilter`]: `"<id> <serviceName>"`.
    pub fn search_text(&self) -> String {
        format!("{} {}", self.id, self.service_name)
    }
}

/// Caller-supplied invoice fields (create and update bodies).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDraft {
    pub service_name: ServiceName,
    pub amount: f64,
    pub status: InvoiceStatus,
    pub date: DateTime<Utc>,
}

impl InvoiceDraft {
    pub fn validate(&self) -> Result<(), DomainError> {
        // NaN fails this comparison too.
        if !(self.amount >= MIN_AMOUNT) || !self.amount.is_finite() {
            return Err(DomainError::validation(format!(
                "amount must be a number >= {MIN_AMOUNT}"
            )));
        }
        Ok(())
    }

    /// Validate and materialize a new invoice under `id`.
    pub fn into_invoice(self, id: InvoiceId) -> Result<Invoice, DomainError> {
        self.validate()?;
        Ok(Invoice {
            id,
            service_name: self.service_name,
            amount: self.amount,
            date: self.date,
            status: self.status,
        })
    }
}
