//! Cancellation and Deadline Tests

use crate::common::*;
use jobtrack_core::context::OperationContext;
use jobtrack_core::error::TrackerError;
use jobtrack_core::models::{
    Application, ApplicationChanges, ApplicationFilter, ListQuery, NewApplication,
};
use jobtrack_core::store::ApplicationRepository;
use tokio::time::Instant;

fn cancelled() -> OperationContext {
    let ctx = OperationContext::background();
    ctx.cancel();
    ctx
}

fn expired() -> OperationContext {
    OperationContext::with_deadline(Instant::now())
}

#[tokio::test]
async fn test_cancelled_update_leaves_record_unchanged() {
    let db = TestStore::new().await;
    let created = ApplicationBuilder::new("Acme", "Engineer")
        .create(&db.store)
        .await;

    let changes = ApplicationChanges {
        notes: Some("should not land".to_string()),
        ..ApplicationChanges::default()
    };
    let err = db
        .store
        .update(&cancelled(), &created.id, changes)
        .await
        .unwrap_err();
    assert!(matches!(err, TrackerError::Cancelled));

    let current = db
        .store
        .get(&db.ctx(), &created.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current, created);
}

#[tokio::test]
async fn test_expired_deadline_is_reported_distinctly() {
    let db = TestStore::new().await;
    let ctx = expired();

    let err = db
        .store
        .list(&ctx, &ListQuery::default())
        .await
        .unwrap_err();
    assert!(matches!(err, TrackerError::DeadlineExceeded));

    let err = db
        .store
        .count(&ctx, &ApplicationFilter::new())
        .await
        .unwrap_err();
    assert!(matches!(err, TrackerError::DeadlineExceeded));

    let err = db.store.stats(&ctx).await.unwrap_err();
    assert!(matches!(err, TrackerError::DeadlineExceeded));
}

#[tokio::test]
async fn test_cancelled_create_and_delete_do_not_write() {
    let db = TestStore::new().await;
    let created = ApplicationBuilder::new("Acme", "Engineer")
        .create(&db.store)
        .await;

    let err = db
        .store
        .create(&cancelled(), NewApplication::new("Globex", "Engineer"))
        .await
        .unwrap_err();
    assert!(err.is_cancellation());

    let err = db
        .store
        .delete(&cancelled(), &created.id)
        .await
        .unwrap_err();
    assert!(err.is_cancellation());

    assert_eq!(
        db.store.count(&db.ctx(), &ApplicationFilter::new()).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn test_cancellation_while_waiting_for_write_lock() {
    let db = TestStore::new().await;
    let created = ApplicationBuilder::new("Acme", "Engineer")
        .create(&db.store)
        .await;

    // Hold the write lock so the update has to wait on the busy timeout.
    let blocker = db.pool().begin_with("BEGIN IMMEDIATE").await.unwrap();

    let ctx = OperationContext::with_timeout(std::time::Duration::from_millis(100));
    let changes = ApplicationChanges {
        notes: Some("blocked".to_string()),
        ..ApplicationChanges::default()
    };
    let err = db
        .store
        .update(&ctx, &created.id, changes)
        .await
        .unwrap_err();
    assert!(matches!(err, TrackerError::DeadlineExceeded));

    blocker.rollback().await.unwrap();

    let current = db
        .store
        .get(&db.ctx(), &created.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current.notes, "");
}

#[tokio::test]
async fn test_commit_is_not_interrupted_by_a_later_cancellation() {
    let db = TestStore::new().await;
    let created = ApplicationBuilder::new("Acme", "Engineer")
        .create(&db.store)
        .await;
    let ctx = OperationContext::background();
    let changes = ApplicationChanges {
        notes: Some("staged".to_string()),
        ..ApplicationChanges::default()
    };

    let staged = ctx
        .run(Application::stage_update(db.pool(), &created.id, &changes))
        .await
        .unwrap()
        .unwrap();
    assert!(staged.is_write());
    assert_eq!(staged.application().notes, "staged");

    // Other connections still read the committed row.
    let before = Application::find_by_id(db.pool(), &created.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(before.notes, "");

    ctx.cancel();
    let committed = staged.commit().await.unwrap();

    let after = db
        .store
        .get(&db.ctx(), &created.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after, committed);
    assert_eq!(after.notes, "staged");
}

#[tokio::test]
async fn test_dropped_staged_update_rolls_back() {
    let db = TestStore::new().await;
    let created = ApplicationBuilder::new("Acme", "Engineer")
        .create(&db.store)
        .await;
    let changes = ApplicationChanges {
        company: Some("Initech".to_string()),
        ..ApplicationChanges::default()
    };

    let staged = Application::stage_update(db.pool(), &created.id, &changes)
        .await
        .unwrap()
        .unwrap();
    drop(staged);

    let current = db
        .store
        .get(&db.ctx(), &created.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current, created);

    let staged = Application::stage_update(db.pool(), &created.id, &ApplicationChanges::default())
        .await
        .unwrap()
        .unwrap();
    assert!(!staged.is_write());
    assert_eq!(staged.commit().await.unwrap(), created);
}
