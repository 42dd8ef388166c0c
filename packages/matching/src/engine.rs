// ABOUTME: Pure reconciliation of a donation against a request's remaining needs
// ABOUTME: Decrements remaining counts, removes exhausted items and derives the new request status

use givelink_core::{
    Categorized, Category, DonatedItem, NewDonation, Request, RequestStatus, RequestedItem,
};
use std::collections::BTreeMap;

use crate::error::MatchError;

/// A donor's proposed donation after boundary normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DonationInput {
    pub donor_id: String,
    pub description: Option<String>,
    /// Proposed counts. Non-positive counts are ignored.
    pub items: Categorized<i64>,
    /// Photo URLs attached to every donated item of a category.
    pub images: BTreeMap<Category, Vec<String>>,
}

/// Outcome of a successful reconciliation: the donation to record and the request's new state.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub donation: NewDonation,
    pub request: Request,
}

/// Validate `input` against `request` and apply it.
///
/// The request passed in is never modified; on success the mutated copy is returned
/// alongside the donation. Lines are checked in category order and the first invalid
/// line aborts the whole donation.
pub fn validate_and_apply(
    request: &Request,
    input: &DonationInput,
) -> Result<Reconciliation, MatchError> {
    if !request.status.accepts_donations() {
        return Err(MatchError::RequestClosed {
            status: request.status,
        });
    }

    let mut accepted: Vec<(Category, &str, i64)> = Vec::new();
    for (category, item, &count) in input.items.entries() {
        if count <= 0 {
            continue;
        }

        let remaining = remaining_count(request, category, item);
        if remaining <= 0 {
            return Err(MatchError::ItemNotRequested {
                category,
                item: item.to_string(),
            });
        }
        if count > remaining {
            return Err(MatchError::QuantityExceedsRequest {
                category,
                item: item.to_string(),
                requested: remaining,
                attempted: count,
            });
        }

        accepted.push((category, item, count));
    }

    if accepted.is_empty() {
        return Err(MatchError::EmptyDonation);
    }

    let mut updated = request.clone();
    let mut donated = Categorized::new();
    let mut total_items_count: i64 = 0;

    for (category, item, count) in accepted {
        let entries = updated.items.get_mut(category);
        let left = entries.get(item).map_or(0, |e| e.count) - count;
        if left == 0 {
            entries.remove(item);
        } else {
            entries.insert(item.to_string(), RequestedItem { count: left });
        }

        let images = input.images.get(&category).cloned().unwrap_or_default();
        donated.insert(category, item, DonatedItem { count, images });
        total_items_count = total_items_count.saturating_add(count);
    }

    updated.status = if updated.items.is_empty() {
        RequestStatus::Fulfilled
    } else {
        RequestStatus::PartiallyFulfilled
    };

    Ok(Reconciliation {
        donation: NewDonation {
            donor_id: input.donor_id.clone(),
            request_id: request.id.clone(),
            description: input.description.clone(),
            items: donated,
            total_items_count,
        },
        request: updated,
    })
}

/// `Fulfilled` when every category is empty, otherwise the stored status unchanged.
pub fn compute_fulfillment_status(request: &Request) -> RequestStatus {
    if request.items.is_empty() {
        RequestStatus::Fulfilled
    } else {
        request.status
    }
}

/// True when at least one category still lists an item.
pub fn has_requirements(request: &Request) -> bool {
    !request.items.is_empty()
}

fn remaining_count(request: &Request, category: Category, item: &str) -> i64 {
    request
        .items
        .get(category)
        .get(item)
        .map_or(0, |entry| entry.count)
}
