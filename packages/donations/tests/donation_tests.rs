// ABOUTME: Integration tests for donation submission and status progression
// ABOUTME: Covers atomic reconciliation, concurrent submissions and lifecycle timestamps

mod common;

use std::sync::Arc;

use common::{create_request, donation, seed_accounts, DONOR_ID};
use givelink_core::{Category, DonationFilter, DonationStatus, RequestStatus};
use givelink_donations::{DonationError, DonationService, DonationStorage};
use givelink_matching::MatchError;
use givelink_requests::RequestStorage;
use givelink_storage::{connect, connect_in_memory, StorageError};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_submit_persists_donation_and_request_together() {
    let pool = connect_in_memory().await.unwrap();
    seed_accounts(&pool).await;
    let request = create_request(
        &pool,
        &[(Category::Clothes, "sweater", 5), (Category::Foods, "rice", 3)],
    )
    .await;

    let service = DonationService::new(pool.clone());
    let requests = RequestStorage::new(pool.clone());

    let first = service
        .submit(&request.id, &donation(&[(Category::Clothes, "sweater", 5)]))
        .await
        .unwrap();
    assert!(first.id.starts_with("don-"));
    assert_eq!(first.status, DonationStatus::Matched);
    assert_eq!(first.total_items_count, 5);
    assert_eq!(first.donor_id, DONOR_ID);

    let after_first = requests.get_request(&request.id).await.unwrap();
    assert!(after_first.items.clothes.is_empty());
    assert_eq!(after_first.items.foods["rice"].count, 3);
    assert_eq!(after_first.status, RequestStatus::PartiallyFulfilled);
    assert_eq!(after_first.version, request.version + 1);

    service
        .submit(&request.id, &donation(&[(Category::Foods, "rice", 3)]))
        .await
        .unwrap();
    let after_second = requests.get_request(&request.id).await.unwrap();
    assert!(after_second.items.is_empty());
    assert_eq!(after_second.status, RequestStatus::Fulfilled);

    let stored = DonationStorage::new(pool.clone())
        .list_donations(&DonationFilter {
            request_id: Some(request.id.clone()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(stored.len(), 2);
}

#[tokio::test]
async fn test_failed_validation_writes_nothing() {
    let pool = connect_in_memory().await.unwrap();
    seed_accounts(&pool).await;
    let request = create_request(&pool, &[(Category::Electronics, "laptop", 2)]).await;
    let service = DonationService::new(pool.clone());

    let err = service
        .submit(&request.id, &donation(&[(Category::Electronics, "laptop", 3)]))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DonationError::Match(MatchError::QuantityExceedsRequest {
            requested: 2,
            attempted: 3,
            ..
        })
    ));

    let unchanged = RequestStorage::new(pool.clone())
        .get_request(&request.id)
        .await
        .unwrap();
    assert_eq!(unchanged, request);

    let donations = DonationStorage::new(pool.clone())
        .list_by_donor(DONOR_ID)
        .await
        .unwrap();
    assert!(donations.is_empty());
}

#[tokio::test]
async fn test_submit_to_missing_request() {
    let pool = connect_in_memory().await.unwrap();
    seed_accounts(&pool).await;

    let err = DonationService::new(pool)
        .submit("req-missing", &donation(&[(Category::Foods, "rice", 1)]))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DonationError::Storage(StorageError::NotFound("Request"))
    ));
}

#[tokio::test]
async fn test_unknown_donor_rolls_back_request_update() {
    let pool = connect_in_memory().await.unwrap();
    seed_accounts(&pool).await;
    let request = create_request(&pool, &[(Category::Foods, "rice", 3)]).await;

    let mut input = donation(&[(Category::Foods, "rice", 1)]);
    input.donor_id = "dnr-ghost".to_string();

    let err = DonationService::new(pool.clone())
        .submit(&request.id, &input)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DonationError::Storage(StorageError::InvalidInput(_))
    ));

    let unchanged = RequestStorage::new(pool)
        .get_request(&request.id)
        .await
        .unwrap();
    assert_eq!(unchanged.items.foods["rice"].count, 3);
    assert_eq!(unchanged.version, request.version);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_submissions_never_over_donate() {
    let dir = tempfile::tempdir().unwrap();
    let pool = connect(&dir.path().join("givelink.db")).await.unwrap();
    seed_accounts(&pool).await;
    let request = create_request(&pool, &[(Category::Electronics, "laptop", 3)]).await;

    let service = Arc::new(DonationService::new(pool.clone()));
    let mut handles = Vec::new();
    for _ in 0..6 {
        let service = Arc::clone(&service);
        let request_id = request.id.clone();
        handles.push(tokio::spawn(async move {
            service
                .submit(&request_id, &donation(&[(Category::Electronics, "laptop", 1)]))
                .await
        }));
    }

    let mut accepted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(DonationError::Match(MatchError::ItemNotRequested { .. }))
            | Err(DonationError::Match(MatchError::RequestClosed { .. })) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(accepted, 3);

    let final_state = RequestStorage::new(pool.clone())
        .get_request(&request.id)
        .await
        .unwrap();
    assert!(final_state.items.is_empty());
    assert_eq!(final_state.status, RequestStatus::Fulfilled);

    let donated: i64 = DonationStorage::new(pool)
        .list_donations(&DonationFilter::default())
        .await
        .unwrap()
        .iter()
        .map(|d| d.total_items_count)
        .sum();
    assert_eq!(donated, 3);
}

#[tokio::test]
async fn test_status_progression_stamps_timestamps() {
    let pool = connect_in_memory().await.unwrap();
    seed_accounts(&pool).await;
    let request = create_request(&pool, &[(Category::Furniture, "desk", 1)]).await;
    let created = DonationService::new(pool.clone())
        .submit(&request.id, &donation(&[(Category::Furniture, "desk", 1)]))
        .await
        .unwrap();
    let storage = DonationStorage::new(pool);

    let pending = storage
        .update_status(&created.id, DonationStatus::PendingPickup)
        .await
        .unwrap();
    assert_eq!(pending.status, DonationStatus::PendingPickup);
    assert!(pending.picked_up_at.is_none());

    let picked = storage
        .update_status(&created.id, DonationStatus::PickedUp)
        .await
        .unwrap();
    assert!(picked.picked_up_at.is_some());
    assert!(picked.delivered_at.is_none());

    let delivered = storage
        .update_status(&created.id, DonationStatus::Delivered)
        .await
        .unwrap();
    assert!(delivered.delivered_at.is_some());
    assert_eq!(delivered.picked_up_at, picked.picked_up_at);

    // Re-applying the same status is a no-op
    let again = storage
        .update_status(&created.id, DonationStatus::Delivered)
        .await
        .unwrap();
    assert_eq!(again, delivered);

    let err = storage
        .update_status(&created.id, DonationStatus::Cancelled)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::InvalidTransition { .. }));
}

#[tokio::test]
async fn test_status_update_missing_and_backwards() {
    let pool = connect_in_memory().await.unwrap();
    seed_accounts(&pool).await;
    let request = create_request(&pool, &[(Category::Stationary, "pen", 4)]).await;
    let created = DonationService::new(pool.clone())
        .submit(&request.id, &donation(&[(Category::Stationary, "pen", 2)]))
        .await
        .unwrap();
    let storage = DonationStorage::new(pool);

    let err = storage
        .update_status("don-missing", DonationStatus::PickedUp)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::NotFound("Donation")));

    storage
        .update_status(&created.id, DonationStatus::PickedUp)
        .await
        .unwrap();
    let err = storage
        .update_status(&created.id, DonationStatus::Matched)
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Cannot change donation status from picked_up to matched"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_status_updates_settle_on_one_terminal_state() {
    let dir = tempfile::tempdir().unwrap();
    let pool = connect(&dir.path().join("givelink.db")).await.unwrap();
    seed_accounts(&pool).await;
    let request = create_request(&pool, &[(Category::Clothes, "coat", 2)]).await;
    let created = DonationService::new(pool.clone())
        .submit(&request.id, &donation(&[(Category::Clothes, "coat", 1)]))
        .await
        .unwrap();

    let storage = Arc::new(DonationStorage::new(pool));
    let mut handles = Vec::new();
    for i in 0..8 {
        let storage = Arc::clone(&storage);
        let id = created.id.clone();
        let target = if i % 2 == 0 {
            DonationStatus::Delivered
        } else {
            DonationStatus::Cancelled
        };
        handles.push(tokio::spawn(async move {
            storage.update_status(&id, target).await
        }));
    }

    for handle in handles {
        match handle.await.unwrap() {
            Ok(_)
            | Err(StorageError::Conflict(_))
            | Err(StorageError::InvalidTransition { .. }) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    let settled = storage.get_donation(&created.id).await.unwrap();
    assert!(settled.status.is_terminal());
    assert_eq!(
        settled.delivered_at.is_some(),
        settled.status == DonationStatus::Delivered
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_delete_racing_a_donation_never_fails_with_a_database_error() {
    let dir = tempfile::tempdir().unwrap();
    let pool = connect(&dir.path().join("givelink.db")).await.unwrap();
    seed_accounts(&pool).await;
    let service = Arc::new(DonationService::new(pool.clone()));
    let requests = Arc::new(RequestStorage::new(pool.clone()));

    for _ in 0..10 {
        let request = create_request(&pool, &[(Category::Foods, "rice", 5)]).await;

        let submit = {
            let service = Arc::clone(&service);
            let request_id = request.id.clone();
            tokio::spawn(async move {
                service
                    .submit(&request_id, &donation(&[(Category::Foods, "rice", 1)]))
                    .await
            })
        };
        let delete = {
            let requests = Arc::clone(&requests);
            let request_id = request.id.clone();
            tokio::spawn(async move { requests.delete_request(&request_id).await })
        };

        let submitted = submit.await.unwrap();
        let deleted = delete.await.unwrap();

        match (&submitted, &deleted) {
            (Ok(_), Err(StorageError::Conflict(_))) => {}
            (Err(DonationError::Storage(StorageError::NotFound(_))), Ok(())) => {}
            (Err(DonationError::Storage(StorageError::Conflict(_))), _) => {}
            other => panic!("unexpected outcome: {other:?}"),
        }

        let donations = DonationStorage::new(pool.clone())
            .list_donations(&DonationFilter {
                request_id: Some(request.id.clone()),
                ..Default::default()
            })
            .await
            .unwrap();
        if deleted.is_ok() {
            assert!(donations.is_empty());
        }
    }
}
