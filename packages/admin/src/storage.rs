// ABOUTME: Admin aggregation queries using SQLite
// ABOUTME: Counts by status, recent activity, completion history and matched-donation joins

use chrono::{Duration, Utc};
use sqlx::{Row, SqlitePool};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use givelink_core::{
    Category, DonationFilter, DonationStatus, Request, RequestFilter, RequestStatus,
};
use givelink_donations::DonationStorage;
use givelink_requests::RequestStorage;
use givelink_storage::StorageError;

use crate::types::{
    Contact, DashboardStats, History, MatchedDonation, MatchedOverview, RecentActivity,
    RequestSummary, RequestsOverview, Totals,
};

/// Window for "recent" dashboard counts
pub const RECENT_DAYS: i64 = 7;

/// Donations still moving through pickup and delivery
pub const ACTIVE_DONATION_STATUSES: [DonationStatus; 3] = [
    DonationStatus::Matched,
    DonationStatus::PendingPickup,
    DonationStatus::PickedUp,
];

pub struct AdminStorage {
    pool: SqlitePool,
    requests: RequestStorage,
    donations: DonationStorage,
}

impl AdminStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            requests: RequestStorage::new(pool.clone()),
            donations: DonationStorage::new(pool.clone()),
            pool,
        }
    }

    pub async fn dashboard(&self) -> Result<DashboardStats, StorageError> {
        debug!("Computing admin dashboard");

        let totals = Totals {
            donations: self.count("SELECT COUNT(*) FROM donations").await?,
            requests: self.count("SELECT COUNT(*) FROM requests").await?,
            donors: self.count("SELECT COUNT(*) FROM donors").await?,
            receivers: self.count("SELECT COUNT(*) FROM receivers").await?,
            items_donated: self
                .count(
                    "SELECT COALESCE(SUM(total_items_count), 0) FROM donations WHERE status != 'cancelled'",
                )
                .await?,
        };

        let since = Utc::now() - Duration::days(RECENT_DAYS);
        let recent_donations: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM donations WHERE created_at >= ?")
                .bind(since)
                .fetch_one(&self.pool)
                .await?;
        let recent_requests: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM requests WHERE created_at >= ?")
                .bind(since)
                .fetch_one(&self.pool)
                .await?;

        Ok(DashboardStats {
            totals,
            donation_status: self
                .status_breakdown("donations", DonationStatus::ALL.map(|s| s.as_str()))
                .await?,
            request_status: self
                .status_breakdown("requests", RequestStatus::ALL.map(|s| s.as_str()))
                .await?,
            recent: RecentActivity {
                days: RECENT_DAYS,
                donations: recent_donations,
                requests: recent_requests,
            },
        })
    }

    /// Delivered donations and fulfilled requests, most recently updated first.
    pub async fn history(&self) -> Result<History, StorageError> {
        let mut delivered_donations = self
            .donations
            .list_donations(&DonationFilter {
                status: Some(DonationStatus::Delivered),
                ..Default::default()
            })
            .await?;
        delivered_donations.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        let mut fulfilled_requests = self
            .requests
            .list_requests(&RequestFilter {
                status: Some(RequestStatus::Fulfilled),
                requestor_id: None,
            })
            .await?;
        fulfilled_requests.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        let total_completed = delivered_donations.len() + fulfilled_requests.len();
        Ok(History {
            delivered_donations,
            fulfilled_requests,
            total_completed,
        })
    }

    /// Donations awaiting pickup or delivery, joined with both parties.
    pub async fn matched(&self) -> Result<MatchedOverview, StorageError> {
        let donations: Vec<_> = self
            .donations
            .list_donations(&DonationFilter::default())
            .await?
            .into_iter()
            .filter(|d| ACTIVE_DONATION_STATUSES.contains(&d.status))
            .collect();

        let mut parties = self.load_parties().await?;

        let mut status_breakdown: BTreeMap<String, i64> = ACTIVE_DONATION_STATUSES
            .iter()
            .map(|s| (s.as_str().to_string(), 0))
            .collect();

        let donations = donations
            .into_iter()
            .map(|donation| {
                *status_breakdown
                    .entry(donation.status.as_str().to_string())
                    .or_insert(0) += 1;
                let (request, requestor, donor) =
                    parties.remove(&donation.id).unwrap_or((None, None, None));
                MatchedDonation {
                    donation,
                    request,
                    requestor,
                    donor,
                }
            })
            .collect();

        Ok(MatchedOverview {
            donations,
            status_breakdown,
        })
    }

    /// Requests (optionally of one status) with status and category breakdowns.
    pub async fn requests_overview(
        &self,
        status: Option<RequestStatus>,
    ) -> Result<RequestsOverview, StorageError> {
        let requests = self
            .requests
            .list_requests(&RequestFilter {
                status,
                requestor_id: None,
            })
            .await?;

        Ok(RequestsOverview {
            category_breakdown: category_breakdown(&requests),
            status_breakdown: self
                .status_breakdown("requests", RequestStatus::ALL.map(|s| s.as_str()))
                .await?,
            requests,
        })
    }

    async fn count(&self, sql: &str) -> Result<i64, StorageError> {
        Ok(sqlx::query_scalar(sql).fetch_one(&self.pool).await?)
    }

    /// Count rows per status, listing every known status even when zero.
    async fn status_breakdown(
        &self,
        table: &'static str,
        statuses: impl IntoIterator<Item = &'static str>,
    ) -> Result<BTreeMap<String, i64>, StorageError> {
        let mut breakdown: BTreeMap<String, i64> =
            statuses.into_iter().map(|s| (s.to_string(), 0)).collect();

        let rows = sqlx::query(&format!(
            "SELECT status, COUNT(*) AS total FROM {} GROUP BY status",
            table
        ))
        .fetch_all(&self.pool)
        .await?;

        for row in rows {
            let status: String = row.try_get("status")?;
            let total: i64 = row.try_get("total")?;
            breakdown.insert(status, total);
        }

        Ok(breakdown)
    }

    #[allow(clippy::type_complexity)]
    async fn load_parties(
        &self,
    ) -> Result<
        HashMap<String, (Option<RequestSummary>, Option<Contact>, Option<Contact>)>,
        StorageError,
    > {
        let rows = sqlx::query(
            r#"
            SELECT
                d.id AS donation_id,
                r.id AS request_id,
                r.description AS request_description,
                r.status AS request_status,
                rc.id AS requestor_id,
                rc.name AS requestor_name,
                rc.email AS requestor_email,
                rc.number AS requestor_number,
                rc.address AS requestor_address,
                dn.id AS donor_id,
                dn.name AS donor_name,
                dn.email AS donor_email,
                dn.number AS donor_number,
                dn.address AS donor_address
            FROM donations d
            LEFT JOIN requests r ON r.id = d.request_id
            LEFT JOIN receivers rc ON rc.id = r.requestor_id
            LEFT JOIN donors dn ON dn.id = d.donor_id
            WHERE d.status IN ('matched', 'pending_pickup', 'picked_up')
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut parties = HashMap::with_capacity(rows.len());
        for row in rows {
            let donation_id: String = row.try_get("donation_id")?;

            let request = match row.try_get::<Option<String>, _>("request_id")? {
                Some(id) => Some(RequestSummary {
                    id,
                    description: row.try_get("request_description")?,
                    status: row.try_get("request_status")?,
                }),
                None => None,
            };

            let requestor = contact(&row, "requestor")?;
            let donor = contact(&row, "donor")?;
            parties.insert(donation_id, (request, requestor, donor));
        }

        Ok(parties)
    }
}

/// Count requests listing at least one item per category.
pub fn category_breakdown(requests: &[Request]) -> BTreeMap<Category, i64> {
    let mut breakdown: BTreeMap<Category, i64> = Category::ALL.into_iter().map(|c| (c, 0)).collect();
    for request in requests {
        for (category, items) in request.items.iter() {
            if !items.is_empty() {
                *breakdown.entry(category).or_insert(0) += 1;
            }
        }
    }
    breakdown
}

fn contact(row: &sqlx::sqlite::SqliteRow, prefix: &str) -> Result<Option<Contact>, sqlx::Error> {
    let Some(id) = row.try_get::<Option<String>, _>(format!("{}_id", prefix).as_str())? else {
        return Ok(None);
    };
    Ok(Some(Contact {
        id,
        name: row.try_get(format!("{}_name", prefix).as_str())?,
        email: row.try_get(format!("{}_email", prefix).as_str())?,
        number: row.try_get(format!("{}_number", prefix).as_str())?,
        address: row.try_get(format!("{}_address", prefix).as_str())?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use givelink_core::{Categorized, RequestedItem};

    fn request(items: &[(Category, &str)]) -> Request {
        let mut categorized = Categorized::new();
        for &(category, name) in items {
            categorized.insert(category, name, RequestedItem { count: 1 });
        }
        Request {
            id: "req".to_string(),
            requestor_id: "rcv".to_string(),
            description: None,
            items: categorized,
            status: RequestStatus::Pending,
            version: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_category_breakdown_counts_requests_not_items() {
        let requests = vec![
            request(&[(Category::Clothes, "sweater"), (Category::Clothes, "hat")]),
            request(&[(Category::Clothes, "coat"), (Category::Foods, "rice")]),
            request(&[]),
        ];

        let breakdown = category_breakdown(&requests);
        assert_eq!(breakdown[&Category::Clothes], 2);
        assert_eq!(breakdown[&Category::Foods], 1);
        assert_eq!(breakdown[&Category::Electronics], 0);
        assert_eq!(breakdown.len(), 5);
    }
}
