// ABOUTME: Reconciliation engine for GiveLink
// ABOUTME: Validates donations against remaining request needs and derives request status

pub mod engine;
pub mod error;
pub mod normalize;

pub use engine::{
    compute_fulfillment_status, has_requirements, validate_and_apply, DonationInput,
    Reconciliation,
};
pub use error::MatchError;
pub use normalize::{normalize_count, normalize_images, normalize_items, normalize_requested_items};
