// ABOUTME: Request storage layer using SQLite
// ABOUTME: CRUD, status overrides, optimistic versioned saves and lazy fulfillment on listing

use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::{debug, info};

use givelink_core::{
    generate_id, Categorized, IdPrefix, Request, RequestCreateInput, RequestFilter, RequestStatus,
    RequestedItem,
};
use givelink_matching::{compute_fulfillment_status, has_requirements};
use givelink_storage::StorageError;

const SELECT_REQUEST: &str = r#"
    SELECT id, requestor_id, description, items, status, version, created_at, updated_at
    FROM requests
"#;

pub struct RequestStorage {
    pool: SqlitePool,
}

impl RequestStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a pending request. Items with a count of zero or less are dropped.
    pub async fn create_request(
        &self,
        requestor_id: &str,
        input: RequestCreateInput,
    ) -> Result<Request, StorageError> {
        let items = retain_positive(input.items);
        if items.is_empty() {
            return Err(StorageError::InvalidInput(
                "A request must list at least one item".to_string(),
            ));
        }

        let id = generate_id(IdPrefix::Request);
        let now = Utc::now();
        let items_json = serde_json::to_string(&items)?;

        debug!("Creating request: {} for receiver: {}", id, requestor_id);

        sqlx::query(
            r#"
            INSERT INTO requests (id, requestor_id, description, items, status, version, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, 0, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(requestor_id)
        .bind(&input.description)
        .bind(&items_json)
        .bind(RequestStatus::Pending)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                StorageError::InvalidInput(format!("Unknown receiver: {}", requestor_id))
            }
            other => StorageError::Sqlx(other),
        })?;

        info!("Created request {} with {} item(s)", id, items.len());
        self.get_request(&id).await
    }

    pub async fn get_request(&self, id: &str) -> Result<Request, StorageError> {
        debug!("Fetching request: {}", id);

        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_REQUEST))
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::not_found_as("Request"))?;

        row_to_request(&row)
    }

    /// List requests newest first, optionally filtered by status or owner.
    pub async fn list_requests(&self, filter: &RequestFilter) -> Result<Vec<Request>, StorageError> {
        debug!("Listing requests with filter: {:?}", filter);

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_REQUEST);
        query.push(" WHERE 1 = 1");
        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status);
        }
        if let Some(requestor_id) = &filter.requestor_id {
            query.push(" AND requestor_id = ").push_bind(requestor_id.clone());
        }
        query.push(" ORDER BY created_at DESC, id");

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_request).collect()
    }

    pub async fn list_by_requestor(&self, requestor_id: &str) -> Result<Vec<Request>, StorageError> {
        self.list_requests(&RequestFilter {
            status: None,
            requestor_id: Some(requestor_id.to_string()),
        })
        .await
    }

    /// Requests that can still receive donations.
    ///
    /// Open requests found to have no remaining items are marked fulfilled on the way
    /// through and left out, as are rejected and fulfilled ones.
    pub async fn list_active_requests(&self) -> Result<Vec<Request>, StorageError> {
        let rows = sqlx::query(&format!(
            "{} WHERE status NOT IN ('fulfilled', 'rejected') ORDER BY created_at DESC, id",
            SELECT_REQUEST
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        let mut active = Vec::with_capacity(rows.len());
        for row in &rows {
            let request = row_to_request(row)?;

            let derived = compute_fulfillment_status(&request);
            if derived != request.status {
                debug!("Request {} has no remaining items, marking fulfilled", request.id);
                let mut fulfilled = request.clone();
                fulfilled.status = derived;
                // A concurrent writer already moved this request on; its state wins.
                if !update_versioned(&self.pool, &fulfilled, Utc::now()).await? {
                    debug!("Request {} changed while listing, skipping", request.id);
                }
                continue;
            }

            if has_requirements(&request) {
                active.push(request);
            }
        }

        Ok(active)
    }

    /// Overwrite items and status, failing with `Conflict` if the request changed since it was read.
    pub async fn save_request(&self, request: &Request) -> Result<Request, StorageError> {
        if update_versioned(&self.pool, request, Utc::now()).await? {
            return self.get_request(&request.id).await;
        }

        // Distinguish a stale version from a missing row
        self.get_request(&request.id).await?;
        Err(StorageError::Conflict(format!(
            "Request {} was modified concurrently",
            request.id
        )))
    }

    /// Administrative status override.
    pub async fn update_status(
        &self,
        id: &str,
        status: RequestStatus,
    ) -> Result<Request, StorageError> {
        debug!("Updating request {} status to {}", id, status.as_str());

        let result = sqlx::query(
            "UPDATE requests SET status = ?, version = version + 1, updated_at = ? WHERE id = ?",
        )
        .bind(status)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound("Request"));
        }

        self.get_request(id).await
    }

    /// Delete a request that has not received any donation.
    ///
    /// The donation check and the delete are one statement, so a donation committed
    /// concurrently either blocks the delete or arrives after the row is gone.
    pub async fn delete_request(&self, id: &str) -> Result<(), StorageError> {
        let result = sqlx::query(
            "DELETE FROM requests WHERE id = ? AND NOT EXISTS (SELECT 1 FROM donations WHERE request_id = ?)",
        )
        .bind(id)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(StorageError::conflict_on_contention(
            "Request is receiving a donation and cannot be deleted",
        ))?;

        if result.rows_affected() == 0 {
            let donations: Option<i64> = sqlx::query_scalar(
                "SELECT (SELECT COUNT(*) FROM donations WHERE request_id = requests.id) FROM requests WHERE id = ?",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

            return Err(match donations {
                None => StorageError::NotFound("Request"),
                Some(count) => StorageError::Conflict(format!(
                    "Request has {} donation(s) and cannot be deleted",
                    count
                )),
            });
        }

        info!("Deleted request {}", id);
        Ok(())
    }
}

/// Write `request`'s items and status if its stored version still equals `request.version`.
///
/// Bumps the version on success. Returns `false` when the row was missing or stale.
pub async fn update_versioned<'e, E>(
    executor: E,
    request: &Request,
    now: DateTime<Utc>,
) -> Result<bool, StorageError>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let items_json = serde_json::to_string(&request.items)?;

    let result = sqlx::query(
        r#"
        UPDATE requests
        SET items = ?, status = ?, version = version + 1, updated_at = ?
        WHERE id = ? AND version = ?
        "#,
    )
    .bind(&items_json)
    .bind(request.status)
    .bind(now)
    .bind(&request.id)
    .bind(request.version)
    .execute(executor)
    .await
    .map_err(StorageError::Sqlx)?;

    Ok(result.rows_affected() == 1)
}

fn retain_positive(items: Categorized<RequestedItem>) -> Categorized<RequestedItem> {
    let mut kept = Categorized::new();
    for (category, name, item) in items.entries() {
        if item.count > 0 {
            kept.insert(category, name, *item);
        }
    }
    kept
}

fn row_to_request(row: &SqliteRow) -> Result<Request, StorageError> {
    let items: String = row.try_get("items")?;

    Ok(Request {
        id: row.try_get("id")?,
        requestor_id: row.try_get("requestor_id")?,
        description: row.try_get("description")?,
        items: serde_json::from_str(&items)?,
        status: row.try_get("status")?,
        version: row.try_get("version")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
