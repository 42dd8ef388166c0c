// ABOUTME: Donation storage and submission for GiveLink
// ABOUTME: Persists donations and applies them to requests as one atomic, versioned unit

pub mod error;
pub mod service;
pub mod storage;

// Re-export main types
pub use error::DonationError;
pub use service::{DonationService, MAX_SUBMIT_ATTEMPTS};
pub use storage::DonationStorage;
