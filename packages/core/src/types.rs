// ABOUTME: Request and donation type definitions
// ABOUTME: Records, lifecycle statuses, filters and creation inputs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::Categorized;

/// Remaining quantity of an item a receiver still needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedItem {
    pub count: i64,
}

/// Quantity of an item a donor gives, with the photos of its category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonatedItem {
    pub count: i64,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    PartiallyFulfilled,
    Fulfilled,
    Rejected,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 5] = [
        RequestStatus::Pending,
        RequestStatus::Approved,
        RequestStatus::PartiallyFulfilled,
        RequestStatus::Fulfilled,
        RequestStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::PartiallyFulfilled => "partially_fulfilled",
            RequestStatus::Fulfilled => "fulfilled",
            RequestStatus::Rejected => "rejected",
        }
    }

    /// Whether a request in this status can still receive donations.
    pub fn accepts_donations(&self) -> bool {
        !matches!(self, RequestStatus::Fulfilled | RequestStatus::Rejected)
    }
}

impl Default for RequestStatus {
    fn default() -> Self {
        RequestStatus::Pending
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DonationStatus {
    Matched,
    PendingPickup,
    PickedUp,
    Delivered,
    Cancelled,
}

impl DonationStatus {
    pub const ALL: [DonationStatus; 5] = [
        DonationStatus::Matched,
        DonationStatus::PendingPickup,
        DonationStatus::PickedUp,
        DonationStatus::Delivered,
        DonationStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DonationStatus::Matched => "matched",
            DonationStatus::PendingPickup => "pending_pickup",
            DonationStatus::PickedUp => "picked_up",
            DonationStatus::Delivered => "delivered",
            DonationStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, DonationStatus::Delivered | DonationStatus::Cancelled)
    }

    /// Donations only move forward along matched → pending_pickup → picked_up → delivered,
    /// or to cancelled from any non-terminal state. Re-applying the current status is a no-op.
    pub fn can_transition_to(&self, next: DonationStatus) -> bool {
        if *self == next {
            return true;
        }
        if self.is_terminal() {
            return false;
        }
        match next {
            DonationStatus::Cancelled => true,
            _ => next.progress_rank() > self.progress_rank(),
        }
    }

    fn progress_rank(&self) -> u8 {
        match self {
            DonationStatus::Matched => 0,
            DonationStatus::PendingPickup => 1,
            DonationStatus::PickedUp => 2,
            DonationStatus::Delivered => 3,
            DonationStatus::Cancelled => u8::MAX,
        }
    }
}

impl Default for DonationStatus {
    fn default() -> Self {
        DonationStatus::Matched
    }
}

/// An itemized need posted by a receiver. Item counts are remaining quantities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub id: String,
    pub requestor_id: String,
    pub description: Option<String>,
    #[serde(flatten)]
    pub items: Categorized<RequestedItem>,
    pub status: RequestStatus,
    /// Bumped on every write; guards concurrent reconciliation.
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A donor's fulfillment of part of a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    pub id: String,
    pub donor_id: String,
    pub request_id: String,
    pub description: Option<String>,
    #[serde(flatten)]
    pub items: Categorized<DonatedItem>,
    pub total_items_count: i64,
    pub status: DonationStatus,
    pub matched_at: DateTime<Utc>,
    pub picked_up_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestCreateInput {
    pub description: Option<String>,
    pub items: Categorized<RequestedItem>,
}

/// A donation accepted by reconciliation but not yet persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDonation {
    pub donor_id: String,
    pub request_id: String,
    pub description: Option<String>,
    pub items: Categorized<DonatedItem>,
    pub total_items_count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestFilter {
    pub status: Option<RequestStatus>,
    pub requestor_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationFilter {
    pub status: Option<DonationStatus>,
    pub donor_id: Option<String>,
    pub request_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(DonationStatus::Matched, DonationStatus::PendingPickup, true)]
    #[case(DonationStatus::Matched, DonationStatus::PickedUp, true)]
    #[case(DonationStatus::PendingPickup, DonationStatus::PickedUp, true)]
    #[case(DonationStatus::PickedUp, DonationStatus::Delivered, true)]
    #[case(DonationStatus::PickedUp, DonationStatus::Cancelled, true)]
    #[case(DonationStatus::PickedUp, DonationStatus::Matched, false)]
    #[case(DonationStatus::Delivered, DonationStatus::Cancelled, false)]
    #[case(DonationStatus::Cancelled, DonationStatus::Matched, false)]
    #[case(DonationStatus::Delivered, DonationStatus::Delivered, true)]
    fn test_donation_status_transitions(
        #[case] from: DonationStatus,
        #[case] to: DonationStatus,
        #[case] allowed: bool,
    ) {
        assert_eq!(from.can_transition_to(to), allowed);
    }

    #[test]
    fn test_status_strings_match_serde() {
        for status in RequestStatus::ALL {
            let json = serde_json::to_value(status).unwrap();
            assert_eq!(json, serde_json::json!(status.as_str()));
        }
        for status in DonationStatus::ALL {
            let json = serde_json::to_value(status).unwrap();
            assert_eq!(json, serde_json::json!(status.as_str()));
        }
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        assert!(serde_json::from_str::<DonationStatus>(r#""lost""#).is_err());
        assert!(serde_json::from_str::<RequestStatus>(r#""done""#).is_err());
    }

    #[test]
    fn test_closed_requests_refuse_donations() {
        assert!(RequestStatus::Pending.accepts_donations());
        assert!(RequestStatus::PartiallyFulfilled.accepts_donations());
        assert!(!RequestStatus::Fulfilled.accepts_donations());
        assert!(!RequestStatus::Rejected.accepts_donations());
    }

    #[test]
    fn test_item_documents_deserialize_with_missing_categories() {
        let requested: Categorized<RequestedItem> =
            serde_json::from_str(r#"{"foods": {"rice": {"count": 4}}}"#).unwrap();
        assert_eq!(requested.foods["rice"], RequestedItem { count: 4 });
        assert!(requested.clothes.is_empty());

        let donated: Categorized<DonatedItem> =
            serde_json::from_str(r#"{"clothes": {"jacket": {"count": 1}}}"#).unwrap();
        assert_eq!(donated.clothes["jacket"].count, 1);
        assert!(donated.clothes["jacket"].images.is_empty());
        assert!(donated.electronics.is_empty());
    }
}
