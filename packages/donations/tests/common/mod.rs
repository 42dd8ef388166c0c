// ABOUTME: Common test utilities for donation integration tests
// ABOUTME: Seeds accounts and requests and builds donation inputs

use givelink_core::{Categorized, Category, Request, RequestCreateInput, RequestedItem};
use givelink_matching::DonationInput;
use givelink_requests::RequestStorage;
use sqlx::SqlitePool;
use std::collections::BTreeMap;

pub const DONOR_ID: &str = "dnr-test";
pub const RECEIVER_ID: &str = "rcv-test";

/// Insert one donor and one receiver
pub async fn seed_accounts(pool: &SqlitePool) {
    sqlx::query(
        r#"
        INSERT INTO donors (id, name, email, password_hash, number, address, donor_type, created_at, updated_at)
        VALUES (?, 'Ada Donor', 'ada@example.com', 'hash', '555-0100', '1 Main St', 'individual',
                '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')
        "#,
    )
    .bind(DONOR_ID)
    .execute(pool)
    .await
    .unwrap();

    sqlx::query(
        r#"
        INSERT INTO receivers (id, name, email, password_hash, receiver_type, created_at, updated_at)
        VALUES (?, 'Hope School', 'hope@example.com', 'hash', 'school',
                '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')
        "#,
    )
    .bind(RECEIVER_ID)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn create_request(pool: &SqlitePool, items: &[(Category, &str, i64)]) -> Request {
    let mut categorized = Categorized::new();
    for &(category, name, count) in items {
        categorized.insert(category, name, RequestedItem { count });
    }
    RequestStorage::new(pool.clone())
        .create_request(
            RECEIVER_ID,
            RequestCreateInput {
                description: None,
                items: categorized,
            },
        )
        .await
        .unwrap()
}

pub fn donation(items: &[(Category, &str, i64)]) -> DonationInput {
    let mut categorized = Categorized::new();
    for &(category, name, count) in items {
        categorized.insert(category, name, count);
    }
    DonationInput {
        donor_id: DONOR_ID.to_string(),
        description: Some("Boxes by the door".to_string()),
        items: categorized,
        images: BTreeMap::new(),
    }
}
