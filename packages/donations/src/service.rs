// ABOUTME: Donation submission as a single read-reconcile-write unit per request
// ABOUTME: Uses the request version for optimistic concurrency and retries on conflicts

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use givelink_core::Donation;
use givelink_matching::{validate_and_apply, DonationInput};
use givelink_requests::{update_versioned, RequestStorage};
use givelink_storage::StorageError;

use crate::error::DonationError;
use crate::storage::insert_donation;

/// How many times a submission is replayed against a fresh snapshot before giving up.
pub const MAX_SUBMIT_ATTEMPTS: u32 = 5;

pub struct DonationService {
    pool: SqlitePool,
    requests: RequestStorage,
}

impl DonationService {
    pub fn new(pool: SqlitePool) -> Self {
        let requests = RequestStorage::new(pool.clone());
        Self { pool, requests }
    }

    /// Reconcile `input` against the current state of `request_id` and persist both sides.
    ///
    /// The request update is conditional on the version that was validated, so at most one
    /// donation is accepted per remaining-count snapshot. Losing a race replays the whole
    /// cycle; validation failures are returned immediately and nothing is written.
    pub async fn submit(
        &self,
        request_id: &str,
        input: &DonationInput,
    ) -> Result<Donation, DonationError> {
        for attempt in 1..=MAX_SUBMIT_ATTEMPTS {
            let request = self.requests.get_request(request_id).await?;
            let reconciliation = validate_and_apply(&request, input)?;

            match self.commit(&reconciliation).await {
                Ok(Some(donation)) => {
                    info!(
                        donation_id = %donation.id,
                        request_id = %request_id,
                        items = donation.total_items_count,
                        request_status = reconciliation.request.status.as_str(),
                        "Donation matched"
                    );
                    return Ok(donation);
                }
                Ok(None) => {
                    debug!(
                        "Request {} changed during submission (attempt {}), retrying",
                        request_id, attempt
                    );
                }
                Err(e) if e.is_busy() => {
                    debug!(
                        "Database busy while submitting to {} (attempt {}), retrying",
                        request_id, attempt
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        warn!(
            "Giving up on donation to {} after {} attempts",
            request_id, MAX_SUBMIT_ATTEMPTS
        );
        Err(StorageError::Conflict(format!(
            "Request {} is receiving too many concurrent donations, please retry",
            request_id
        ))
        .into())
    }

    /// Write the reconciled request and the new donation in one transaction.
    ///
    /// Returns `None` when the request's version moved on since it was read.
    async fn commit(
        &self,
        reconciliation: &givelink_matching::Reconciliation,
    ) -> Result<Option<Donation>, StorageError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        if !update_versioned(&mut *tx, &reconciliation.request, now).await? {
            tx.rollback().await.map_err(StorageError::Sqlx)?;
            return Ok(None);
        }

        let donation = insert_donation(&mut *tx, &reconciliation.donation, now).await?;
        tx.commit().await.map_err(StorageError::Sqlx)?;

        Ok(Some(donation))
    }
}
