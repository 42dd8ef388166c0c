// ABOUTME: Request storage for GiveLink
// ABOUTME: Persists itemized receiver needs with versioned writes for reconciliation

pub mod storage;

// Re-export main types
pub use storage::{update_versioned, RequestStorage};
