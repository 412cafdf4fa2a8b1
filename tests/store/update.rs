//! Transactional Partial Update Tests

use crate::common::*;
use jobtrack_core::constants::ApplicationStatus;
use jobtrack_core::context::OperationContext;
use jobtrack_core::error::TrackerError;
use jobtrack_core::models::ApplicationChanges;
use jobtrack_core::store::ApplicationRepository;
use std::sync::Arc;

#[tokio::test]
async fn test_empty_change_set_leaves_record_untouched() {
    let db = TestStore::new().await;
    let created = ApplicationBuilder::new("Acme", "Engineer")
        .with_notes("first call went well")
        .create(&db.store)
        .await;

    let unchanged = db
        .store
        .update(&db.ctx(), &created.id, ApplicationChanges::default())
        .await
        .unwrap()
        .expect("record should exist");

    assert_eq!(unchanged, created);
}

#[tokio::test]
async fn test_update_of_missing_id_returns_none() {
    let db = TestStore::new().await;
    let changes = ApplicationChanges {
        notes: Some("hello".to_string()),
        ..ApplicationChanges::default()
    };

    let result = db.store.update(&db.ctx(), "deadbeef", changes).await.unwrap();
    assert!(result.is_none());

    let result = db
        .store
        .update(&db.ctx(), "deadbeef", ApplicationChanges::default())
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_update_merges_only_supplied_fields() {
    let db = TestStore::new().await;
    let created = ApplicationBuilder::new("Acme", "Engineer")
        .with_location("Remote")
        .with_salary(100000, 150000)
        .with_notes("keep me")
        .create(&db.store)
        .await;

    let changes = ApplicationChanges {
        status: Some(ApplicationStatus::Interview),
        salary_max: Some(0),
        location: Some(String::new()),
        ..ApplicationChanges::default()
    };
    let updated = db
        .store
        .update(&db.ctx(), &created.id, changes)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.status, ApplicationStatus::Interview);
    assert_eq!(updated.salary_max, 0);
    assert_eq!(updated.location, "");
    assert_eq!(updated.salary_min, 100000);
    assert_eq!(updated.notes, "keep me");
    assert_eq!(updated.company, "Acme");
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);
}

#[tokio::test]
async fn test_updated_at_strictly_advances_on_back_to_back_writes() {
    let db = TestStore::new().await;
    let mut current = ApplicationBuilder::new("Acme", "Engineer")
        .create(&db.store)
        .await;

    for i in 0..10 {
        let changes = ApplicationChanges {
            notes: Some(format!("revision {i}")),
            ..ApplicationChanges::default()
        };
        let next = db
            .store
            .update(&db.ctx(), &current.id, changes)
            .await
            .unwrap()
            .unwrap();
        assert!(next.updated_at > current.updated_at);
        current = next;
    }
}

#[tokio::test]
async fn test_concurrent_disjoint_updates_all_survive() {
    let db = TestStore::new().await;
    let created = ApplicationBuilder::new("Acme", "Engineer")
        .create(&db.store)
        .await;

    let change_sets = vec![
        ApplicationChanges {
            status: Some(ApplicationStatus::Applied),
            ..ApplicationChanges::default()
        },
        ApplicationChanges {
            notes: Some("referred by a friend".to_string()),
            ..ApplicationChanges::default()
        },
        ApplicationChanges {
            location: Some("Berlin".to_string()),
            ..ApplicationChanges::default()
        },
        ApplicationChanges {
            url: Some("https://example.com/jobs/42".to_string()),
            ..ApplicationChanges::default()
        },
        ApplicationChanges {
            salary_min: Some(90000),
            ..ApplicationChanges::default()
        },
    ];

    let mut handles = Vec::new();
    for changes in change_sets {
        let store = Arc::clone(&db.store);
        let id = created.id.clone();
        handles.push(tokio::spawn(async move {
            store
                .update(&OperationContext::background(), &id, changes)
                .await
        }));
    }
    for handle in handles {
        let updated = handle.await.unwrap().unwrap();
        assert!(updated.is_some());
    }

    let final_state = db
        .store
        .get(&db.ctx(), &created.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(final_state.status, ApplicationStatus::Applied);
    assert_eq!(final_state.notes, "referred by a friend");
    assert_eq!(final_state.location, "Berlin");
    assert_eq!(final_state.url, "https://example.com/jobs/42");
    assert_eq!(final_state.salary_min, 90000);
    assert_eq!(final_state.company, "Acme");
}

#[tokio::test]
async fn test_inverted_salary_bounds_are_rejected_before_writing() {
    let db = TestStore::new().await;
    let created = ApplicationBuilder::new("Acme", "Engineer")
        .with_salary(100000, 150000)
        .create(&db.store)
        .await;

    let changes = ApplicationChanges {
        salary_min: Some(200000),
        salary_max: Some(100000),
        ..ApplicationChanges::default()
    };
    let err = db
        .store
        .update(&db.ctx(), &created.id, changes)
        .await
        .unwrap_err();
    assert!(matches!(err, TrackerError::ValidationRejected(_)));

    let current = db
        .store
        .get(&db.ctx(), &created.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current, created);
}
