// ABOUTME: Admin report type definitions
// ABOUTME: Dashboard totals, completion history, matched-donation joins and request breakdowns

use serde::Serialize;
use std::collections::BTreeMap;

use givelink_core::{Category, Donation, Request, RequestStatus};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub donations: i64,
    pub requests: i64,
    pub donors: i64,
    pub receivers: i64,
    pub items_donated: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivity {
    pub days: i64,
    pub donations: i64,
    pub requests: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub totals: Totals,
    pub donation_status: BTreeMap<String, i64>,
    pub request_status: BTreeMap<String, i64>,
    pub recent: RecentActivity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct History {
    pub delivered_donations: Vec<Donation>,
    pub fulfilled_requests: Vec<Request>,
    pub total_completed: usize,
}

/// Name and contact details of either side of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub email: String,
    pub number: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSummary {
    pub id: String,
    pub description: Option<String>,
    pub status: RequestStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedDonation {
    #[serde(flatten)]
    pub donation: Donation,
    pub request: Option<RequestSummary>,
    pub requestor: Option<Contact>,
    pub donor: Option<Contact>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedOverview {
    pub donations: Vec<MatchedDonation>,
    pub status_breakdown: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestsOverview {
    pub requests: Vec<Request>,
    pub status_breakdown: BTreeMap<String, i64>,
    /// Number of listed requests with at least one item in each category
    pub category_breakdown: BTreeMap<Category, i64>,
}
