use givelink_matching::MatchError;
use givelink_storage::StorageError;
use thiserror::Error;

/// Failure to submit a donation: either the donation itself is invalid or storage failed.
#[derive(Error, Debug)]
pub enum DonationError {
    #[error(transparent)]
    Match(#[from] MatchError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
