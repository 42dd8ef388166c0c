// ABOUTME: Reconciliation error types
// ABOUTME: Caller-correctable failures carrying the offending category, item and counts

use givelink_core::{Category, RequestStatus};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("No valid donations provided")]
    EmptyDonation,

    #[error("Item \"{item}\" in category \"{category}\" is not requested")]
    ItemNotRequested { category: Category, item: String },

    #[error("Cannot donate {attempted} {item}(s). Only {requested} requested.")]
    QuantityExceedsRequest {
        category: Category,
        item: String,
        requested: i64,
        attempted: i64,
    },

    #[error("Request is {} and no longer accepts donations", .status.as_str())]
    RequestClosed { status: RequestStatus },

    #[error("Invalid donation data format")]
    InvalidItemData,
}

impl MatchError {
    /// Machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            MatchError::EmptyDonation => "EMPTY_DONATION",
            MatchError::ItemNotRequested { .. } => "ITEM_NOT_REQUESTED",
            MatchError::QuantityExceedsRequest { .. } => "QUANTITY_EXCEEDS_REQUEST",
            MatchError::RequestClosed { .. } => "REQUEST_CLOSED",
            MatchError::InvalidItemData => "INVALID_ITEM_DATA",
        }
    }

    /// Structured context for the offending line, when there is one
    pub fn details(&self) -> Vec<(&'static str, String)> {
        match self {
            MatchError::ItemNotRequested { category, item } => vec![
                ("category", category.to_string()),
                ("item", item.clone()),
            ],
            MatchError::QuantityExceedsRequest {
                category,
                item,
                requested,
                attempted,
            } => vec![
                ("category", category.to_string()),
                ("item", item.clone()),
                ("requested", requested.to_string()),
                ("attempted", attempted.to_string()),
            ],
            MatchError::RequestClosed { status } => vec![("status", status.as_str().to_string())],
            MatchError::EmptyDonation | MatchError::InvalidItemData => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_line() {
        let err = MatchError::ItemNotRequested {
            category: Category::Foods,
            item: "rice".to_string(),
        };
        assert_eq!(err.to_string(), "Item \"rice\" in category \"foods\" is not requested");

        let err = MatchError::QuantityExceedsRequest {
            category: Category::Electronics,
            item: "laptop".to_string(),
            requested: 2,
            attempted: 3,
        };
        assert_eq!(err.to_string(), "Cannot donate 3 laptop(s). Only 2 requested.");
        assert_eq!(err.details().len(), 4);
    }
}
