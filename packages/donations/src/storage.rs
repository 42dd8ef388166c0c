// ABOUTME: Donation storage layer using SQLite
// ABOUTME: Lookups, filtered listings and forward-only status progression with timestamps

use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::{debug, info};

use givelink_core::{generate_id, Donation, DonationFilter, DonationStatus, IdPrefix, NewDonation};
use givelink_storage::StorageError;

const SELECT_DONATION: &str = r#"
    SELECT id, donor_id, request_id, description, items, total_items_count, status,
           matched_at, picked_up_at, delivered_at, created_at, updated_at
    FROM donations
"#;

pub struct DonationStorage {
    pool: SqlitePool,
}

impl DonationStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_donation(&self, id: &str) -> Result<Donation, StorageError> {
        debug!("Fetching donation: {}", id);

        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_DONATION))
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::not_found_as("Donation"))?;

        row_to_donation(&row)
    }

    /// List donations newest first.
    pub async fn list_donations(
        &self,
        filter: &DonationFilter,
    ) -> Result<Vec<Donation>, StorageError> {
        debug!("Listing donations with filter: {:?}", filter);

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_DONATION);
        query.push(" WHERE 1 = 1");
        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status);
        }
        if let Some(donor_id) = &filter.donor_id {
            query.push(" AND donor_id = ").push_bind(donor_id.clone());
        }
        if let Some(request_id) = &filter.request_id {
            query.push(" AND request_id = ").push_bind(request_id.clone());
        }
        query.push(" ORDER BY created_at DESC, id");

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_donation).collect()
    }

    pub async fn list_by_donor(&self, donor_id: &str) -> Result<Vec<Donation>, StorageError> {
        self.list_donations(&DonationFilter {
            donor_id: Some(donor_id.to_string()),
            ..Default::default()
        })
        .await
    }

    /// Move a donation to `status`.
    ///
    /// `picked_up` stamps `picked_up_at` and `delivered` stamps `delivered_at`.
    /// Backward moves and any change out of `delivered` or `cancelled` fail with
    /// `InvalidTransition`. Setting the current status again returns the donation unchanged.
    /// The write only applies if the status read is still current; otherwise `Conflict`.
    pub async fn update_status(
        &self,
        id: &str,
        status: DonationStatus,
    ) -> Result<Donation, StorageError> {
        let current: DonationStatus =
            sqlx::query_scalar("SELECT status FROM donations WHERE id = ?")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(StorageError::not_found_as("Donation"))?;

        if !current.can_transition_to(status) {
            return Err(StorageError::InvalidTransition {
                from: current.as_str().to_string(),
                to: status.as_str().to_string(),
            });
        }

        if current != status {
            let now = Utc::now();
            debug!(
                "Donation {} status {} -> {}",
                id,
                current.as_str(),
                status.as_str()
            );

            let result = sqlx::query(
                r#"
                UPDATE donations
                SET status = ?,
                    picked_up_at = CASE WHEN ? THEN ? ELSE picked_up_at END,
                    delivered_at = CASE WHEN ? THEN ? ELSE delivered_at END,
                    updated_at = ?
                WHERE id = ? AND status = ?
                "#,
            )
            .bind(status)
            .bind(status == DonationStatus::PickedUp)
            .bind(now)
            .bind(status == DonationStatus::Delivered)
            .bind(now)
            .bind(now)
            .bind(id)
            .bind(current)
            .execute(&self.pool)
            .await
            .map_err(StorageError::conflict_on_contention(
                "Donation status is being updated, please retry",
            ))?;

            if result.rows_affected() == 0 {
                return Err(StorageError::Conflict(format!(
                    "Donation {} changed status from {} while updating",
                    id,
                    current.as_str()
                )));
            }

            info!("Donation {} is now {}", id, status.as_str());
        }

        self.get_donation(id).await
    }
}

/// Insert an accepted donation in status `matched`, returning the stored record.
pub(crate) async fn insert_donation<'e, E>(
    executor: E,
    donation: &NewDonation,
    now: DateTime<Utc>,
) -> Result<Donation, StorageError>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let id = generate_id(IdPrefix::Donation);
    let items_json = serde_json::to_string(&donation.items)?;

    debug!("Inserting donation {} for request {}", id, donation.request_id);

    let row = sqlx::query(&format!(
        r#"
        INSERT INTO donations (
            id, donor_id, request_id, description, items, total_items_count, status,
            matched_at, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING {}
        "#,
        RETURNING_COLUMNS
    ))
    .bind(&id)
    .bind(&donation.donor_id)
    .bind(&donation.request_id)
    .bind(&donation.description)
    .bind(&items_json)
    .bind(donation.total_items_count)
    .bind(DonationStatus::Matched)
    .bind(now)
    .bind(now)
    .bind(now)
    .fetch_one(executor)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            StorageError::InvalidInput(format!("Unknown donor: {}", donation.donor_id))
        }
        other => StorageError::Sqlx(other),
    })?;

    row_to_donation(&row)
}

const RETURNING_COLUMNS: &str = "id, donor_id, request_id, description, items, total_items_count, \
     status, matched_at, picked_up_at, delivered_at, created_at, updated_at";

fn row_to_donation(row: &SqliteRow) -> Result<Donation, StorageError> {
    let items: String = row.try_get("items")?;

    Ok(Donation {
        id: row.try_get("id")?,
        donor_id: row.try_get("donor_id")?,
        request_id: row.try_get("request_id")?,
        description: row.try_get("description")?,
        items: serde_json::from_str(&items)?,
        total_items_count: row.try_get("total_items_count")?,
        status: row.try_get("status")?,
        matched_at: row.try_get("matched_at")?,
        picked_up_at: row.try_get("picked_up_at")?,
        delivered_at: row.try_get("delivered_at")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
