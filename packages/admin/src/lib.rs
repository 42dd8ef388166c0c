// ABOUTME: Admin reporting for GiveLink
// ABOUTME: Read-only aggregation over requests, donations and accounts

pub mod storage;
pub mod types;

// Re-export main types
pub use storage::{category_breakdown, AdminStorage, ACTIVE_DONATION_STATUSES, RECENT_DAYS};
pub use types::{
    Contact, DashboardStats, History, MatchedDonation, MatchedOverview, RecentActivity,
    RequestSummary, RequestsOverview, Totals,
};
