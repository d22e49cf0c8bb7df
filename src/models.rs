//! Data models for the sales dashboard.
//!
//! This module contains the records served by the dashboard backend
//! and the derived structures the aggregator and report work with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DealStatus {
    /// The deal was signed.
    #[serde(rename = "Closed Won")]
    ClosedWon,
    /// Still being negotiated.
    #[serde(rename = "In Progress")]
    InProgress,
    /// The deal fell through.
    #[serde(rename = "Closed Lost")]
    ClosedLost,
}

impl DealStatus {
    /// All statuses in display order.
    pub const ALL: [DealStatus; 3] = [
        DealStatus::ClosedWon,
        DealStatus::InProgress,
        DealStatus::ClosedLost,
    ];

    /// Returns an emoji marker for the status.
    pub fn emoji(&self) -> &'static str {
        match self {
            DealStatus::ClosedWon => "🟢",
            DealStatus::InProgress => "🟡",
            DealStatus::ClosedLost => "🔴",
        }
    }
}

impl fmt::Display for DealStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DealStatus::ClosedWon => write!(f, "Closed Won"),
            DealStatus::InProgress => write!(f, "In Progress"),
            DealStatus::ClosedLost => write!(f, "Closed Lost"),
        }
    }
}

/// A sales opportunity with a monetary value and a lifecycle status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    /// Client the deal is with.
    pub client: String,
    /// Deal amount.
    pub value: f64,
    /// Current lifecycle state.
    pub status: DealStatus,
    /// Name of the owning representative, present on flattened deal lists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales_rep: Option<String>,
}

impl Deal {
    #[cfg(test)]
    pub fn new(client: impl Into<String>, value: f64, status: DealStatus) -> Self {
        Self {
            client: client.into(),
            value,
            status,
            sales_rep: None,
        }
    }

    /// Returns true if the deal was won.
    pub fn is_won(&self) -> bool {
        self.status == DealStatus::ClosedWon
    }
}

/// Deal as it arrives on the wire, before its value has been validated.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDeal {
    pub client: String,
    pub value: serde_json::Value,
    pub status: DealStatus,
    #[serde(default)]
    pub sales_rep: Option<String>,
}

/// A client account managed by a representative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub name: String,
    pub industry: String,
    pub contact: String,
}

/// A sales representative with their deals and clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRep {
    pub id: u32,
    pub name: String,
    pub role: String,
    pub region: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub deals: Vec<Deal>,
    #[serde(default)]
    pub clients: Vec<Client>,
}

/// Representative as it arrives on the wire, deals not yet validated.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSalesRep {
    pub id: u32,
    pub name: String,
    pub role: String,
    pub region: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub deals: Vec<RawDeal>,
    #[serde(default)]
    pub clients: Vec<Client>,
}

/// Envelope of `GET /api/sales-reps` and of local dataset files.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SalesRepsResponse {
    #[serde(rename = "salesReps", default)]
    pub sales_reps: Vec<RawSalesRep>,
}

/// Envelope of `GET /api/deals`, values not yet validated.
#[derive(Debug, Clone, Deserialize)]
pub struct DealsResponse {
    #[serde(default)]
    pub deals: Vec<RawDeal>,
}

/// Body of `POST /api/ai`.
#[derive(Debug, Clone, Serialize)]
pub struct AskRequest {
    pub question: String,
}

/// Reply of `POST /api/ai`.
#[derive(Debug, Clone, Deserialize)]
pub struct AskResponse {
    pub answer: String,
}

/// Summary statistics derived from a set of deals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateMetrics {
    /// Sum of all deal values regardless of status.
    pub total_pipeline_value: f64,
    /// Sum of values of won deals.
    pub closed_won_value: f64,
    /// Share of pipeline value that was won, 0-100 with one decimal.
    /// Zero when the pipeline is empty.
    pub win_rate_percentage: f64,
}

/// Count and value of deals in one status.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusTotal {
    pub status: DealStatus,
    pub count: usize,
    pub value: f64,
}

/// Per-representative rollup shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepSummary {
    pub id: u32,
    pub name: String,
    pub role: String,
    pub region: String,
    pub skills: Vec<String>,
    pub deal_count: usize,
    pub client_count: usize,
    pub metrics: AggregateMetrics,
}

/// Where the dashboard data came from and when it was built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardMetadata {
    /// API base URL or dataset path.
    pub source: String,
    pub generated_at: DateTime<Utc>,
    pub rep_count: usize,
    pub deal_count: usize,
}

/// Everything needed to render a dashboard report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub metadata: DashboardMetadata,
    pub metrics: AggregateMetrics,
    pub status_breakdown: Vec<StatusTotal>,
    pub regions: Vec<String>,
    pub reps: Vec<RepSummary>,
    pub deals: Vec<Deal>,
}
