// ABOUTME: Core types and utilities for GiveLink
// ABOUTME: Foundational package with categories, requests, donations and id helpers shared by all packages

pub mod category;
pub mod constants;
pub mod types;
pub mod utils;

// Re-export main types
pub use category::{Categorized, Category, UnknownCategory};
pub use types::{
    DonatedItem, Donation, DonationFilter, DonationStatus, NewDonation, Request,
    RequestCreateInput, RequestFilter, RequestStatus, RequestedItem,
};

// Re-export constants
pub use constants::{database_file, givelink_dir};

// Re-export utilities
pub use utils::{generate_id, IdPrefix};
