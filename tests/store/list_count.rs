//! List and Count Tests

use crate::common::*;
use chrono::Duration;
use jobtrack_core::constants::ApplicationStatus;
use jobtrack_core::error::TrackerError;
use jobtrack_core::models::{ApplicationChanges, ApplicationFilter, ListQuery};
use jobtrack_core::query_builder::{Sort, SortColumn};
use jobtrack_core::store::ApplicationRepository;

#[tokio::test]
async fn test_pagination_windows_over_five_records() {
    let db = TestStore::new().await;
    seed_applications(&db.store, 5).await;
    let ctx = db.ctx();
    let filter = ApplicationFilter::new();

    let page = |offset| ListQuery::new(filter.clone()).paginate(2, offset);
    assert_eq!(db.store.list(&ctx, &page(0)).await.unwrap().len(), 2);
    assert_eq!(db.store.list(&ctx, &page(2)).await.unwrap().len(), 2);
    assert_eq!(db.store.list(&ctx, &page(4)).await.unwrap().len(), 1);
    assert!(db.store.list(&ctx, &page(10)).await.unwrap().is_empty());
    assert_eq!(db.store.count(&ctx, &filter).await.unwrap(), 5);
}

#[tokio::test]
async fn test_exhaustive_pagination_matches_count() {
    let db = TestStore::new().await;
    seed_applications(&db.store, 7).await;
    ApplicationBuilder::new("Globex", "Analyst")
        .with_status(ApplicationStatus::Applied)
        .create(&db.store)
        .await;
    let ctx = db.ctx();

    for filter in [
        ApplicationFilter::new(),
        ApplicationFilter::new().with_company("company"),
        ApplicationFilter::new().with_status(ApplicationStatus::Applied),
        ApplicationFilter::new().with_role("nobody"),
    ] {
        let mut seen = Vec::new();
        let mut offset = 0;
        loop {
            let query = ListQuery::new(filter.clone()).paginate(3, offset);
            let rows = db.store.list(&ctx, &query).await.unwrap();
            if rows.is_empty() {
                break;
            }
            offset += rows.len() as u32;
            seen.extend(rows.into_iter().map(|a| a.id));
        }

        let total = db.store.count(&ctx, &filter).await.unwrap();
        assert_eq!(seen.len() as i64, total, "filter {filter:?}");
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len() as i64, total, "duplicate rows across pages");
    }
}

#[tokio::test]
async fn test_substring_filters_are_case_insensitive() {
    let db = TestStore::new().await;
    ApplicationBuilder::new("Acme Corp", "Senior Engineer")
        .with_location("New York")
        .create(&db.store)
        .await;
    ApplicationBuilder::new("Globex", "Junior Engineer")
        .with_location("Remote")
        .create(&db.store)
        .await;
    let ctx = db.ctx();

    let filter = ApplicationFilter::new().with_company("ACME");
    assert_eq!(db.store.count(&ctx, &filter).await.unwrap(), 1);

    let filter = ApplicationFilter::new().with_role("engineer");
    assert_eq!(db.store.count(&ctx, &filter).await.unwrap(), 2);

    let filter = ApplicationFilter::new().with_location("york");
    let rows = db.store.list(&ctx, &ListQuery::new(filter)).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].company, "Acme Corp");
}

#[tokio::test]
async fn test_substring_filters_fold_non_ascii_case() {
    let db = TestStore::new().await;
    let created = ApplicationBuilder::new("ÉCOLE Inc", "Ingénieur")
        .with_location("ZÜRICH")
        .create(&db.store)
        .await;
    ApplicationBuilder::new("Ecole Partners", "Engineer")
        .create(&db.store)
        .await;
    let ctx = db.ctx();

    let filter = ApplicationFilter::new().with_company("école");
    let rows = db.store.list(&ctx, &ListQuery::new(filter.clone())).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, created.id);
    assert_eq!(db.store.count(&ctx, &filter).await.unwrap(), 1);

    let filter = ApplicationFilter::new().with_role("INGÉ").with_location("zürich");
    assert_eq!(db.store.count(&ctx, &filter).await.unwrap(), 1);

    // Updated text is searchable under its new folded form only.
    let changes = ApplicationChanges {
        company: Some("Ærø Shipping".to_string()),
        ..ApplicationChanges::default()
    };
    db.store.update(&ctx, &created.id, changes).await.unwrap();
    let filter = ApplicationFilter::new().with_company("ÆRØ");
    assert_eq!(db.store.count(&ctx, &filter).await.unwrap(), 1);
    let filter = ApplicationFilter::new().with_company("école");
    assert_eq!(db.store.count(&ctx, &filter).await.unwrap(), 0);
}

#[tokio::test]
async fn test_like_wildcards_match_literally() {
    let db = TestStore::new().await;
    ApplicationBuilder::new("100% Remote", "Engineer")
        .create(&db.store)
        .await;
    ApplicationBuilder::new("Plain", "Engineer").create(&db.store).await;
    let ctx = db.ctx();

    let filter = ApplicationFilter::new().with_company("%");
    assert_eq!(db.store.count(&ctx, &filter).await.unwrap(), 1);

    let filter = ApplicationFilter::new().with_company("_");
    assert_eq!(db.store.count(&ctx, &filter).await.unwrap(), 0);
}

#[tokio::test]
async fn test_status_filter_is_exact() {
    let db = TestStore::new().await;
    ApplicationBuilder::new("A", "Engineer")
        .with_status(ApplicationStatus::Interview)
        .create(&db.store)
        .await;
    ApplicationBuilder::new("B", "Engineer")
        .with_status(ApplicationStatus::Offer)
        .create(&db.store)
        .await;
    let ctx = db.ctx();

    let filter = ApplicationFilter::new().with_status(ApplicationStatus::Offer);
    let rows = db.store.list(&ctx, &ListQuery::new(filter)).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].company, "B");
}

#[tokio::test]
async fn test_date_bounds_are_inclusive() {
    let db = TestStore::new().await;
    let created = ApplicationBuilder::new("Acme", "Engineer")
        .create(&db.store)
        .await;
    let ctx = db.ctx();

    let at = created.created_at;
    let filter = ApplicationFilter::new().created_after(at);
    assert_eq!(db.store.count(&ctx, &filter).await.unwrap(), 1);

    let filter = ApplicationFilter::new().created_before(at);
    assert_eq!(db.store.count(&ctx, &filter).await.unwrap(), 1);

    let filter = ApplicationFilter::new().created_after(at + Duration::microseconds(1));
    assert_eq!(db.store.count(&ctx, &filter).await.unwrap(), 0);

    let filter = ApplicationFilter::new().created_before(at - Duration::microseconds(1));
    assert_eq!(db.store.count(&ctx, &filter).await.unwrap(), 0);
}

#[tokio::test]
async fn test_sub_microsecond_lower_bound_excludes_earlier_row() {
    let db = TestStore::new().await;
    let created = ApplicationBuilder::new("Acme", "Engineer")
        .create(&db.store)
        .await;
    let ctx = db.ctx();

    let filter = ApplicationFilter::new().created_after(created.created_at + Duration::nanoseconds(500));
    assert_eq!(db.store.count(&ctx, &filter).await.unwrap(), 0);
    let rows = db.store.list(&ctx, &ListQuery::new(filter)).await.unwrap();
    assert!(rows.is_empty());

    // Upper bounds truncate, which keeps `<=` inclusive of the stored row.
    let filter = ApplicationFilter::new().created_before(created.created_at + Duration::nanoseconds(500));
    assert_eq!(db.store.count(&ctx, &filter).await.unwrap(), 1);
}

#[tokio::test]
async fn test_salary_filters_and_zero_sentinel() {
    let db = TestStore::new().await;
    ApplicationBuilder::new("Unspecified", "Engineer")
        .create(&db.store)
        .await;
    ApplicationBuilder::new("Mid", "Engineer")
        .with_salary(100000, 150000)
        .create(&db.store)
        .await;
    ApplicationBuilder::new("High", "Engineer")
        .with_salary(180000, 250000)
        .create(&db.store)
        .await;
    let ctx = db.ctx();

    let filter = ApplicationFilter::new().salary_min_at_least(150000);
    assert_eq!(db.store.count(&ctx, &filter).await.unwrap(), 1);

    // The unspecified row (salary_max = 0) never satisfies an upper bound.
    let filter = ApplicationFilter::new().salary_max_at_most(200000);
    let rows = db.store.list(&ctx, &ListQuery::new(filter)).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].company, "Mid");

    let filter = ApplicationFilter::new().salary_max_at_most(0);
    assert_eq!(db.store.count(&ctx, &filter).await.unwrap(), 0);
    let rows = db
        .store
        .list(&ctx, &ListQuery::new(ApplicationFilter::new().salary_max_at_most(0)))
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_all_filters_combined() {
    let db = TestStore::new().await;
    let target = ApplicationBuilder::new("Acme Corp", "Senior Engineer")
        .with_location("New York")
        .with_status(ApplicationStatus::Applied)
        .with_salary(120000, 160000)
        .create(&db.store)
        .await;
    ApplicationBuilder::new("Acme Corp", "Senior Engineer")
        .with_location("New York")
        .with_status(ApplicationStatus::Rejected)
        .with_salary(120000, 160000)
        .create(&db.store)
        .await;
    ApplicationBuilder::new("Acme Corp", "Senior Engineer")
        .with_location("Boston")
        .with_status(ApplicationStatus::Applied)
        .with_salary(120000, 160000)
        .create(&db.store)
        .await;
    let ctx = db.ctx();

    let filter = ApplicationFilter::new()
        .with_status(ApplicationStatus::Applied)
        .with_company("acme")
        .with_role("senior")
        .with_location("new york")
        .created_after(target.created_at - Duration::days(1))
        .created_before(target.created_at + Duration::days(1))
        .salary_min_at_least(100000)
        .salary_max_at_most(200000);

    let rows = db
        .store
        .list(&ctx, &ListQuery::new(filter.clone()))
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, target.id);
    assert_eq!(db.store.count(&ctx, &filter).await.unwrap(), 1);
}

#[tokio::test]
async fn test_sort_orders_and_default() {
    let db = TestStore::new().await;
    for company in ["Charlie", "alpha", "Bravo"] {
        ApplicationBuilder::new(company, "Engineer")
            .create(&db.store)
            .await;
    }
    let ctx = db.ctx();

    let query = ListQuery::default().sorted_by(Sort::asc(SortColumn::Company));
    let names: Vec<_> = db
        .store
        .list(&ctx, &query)
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.company)
        .collect();
    // SQLite's default collation is binary.
    assert_eq!(names, vec!["Bravo", "Charlie", "alpha"]);

    // Default: most recently updated first.
    let rows = db.store.list(&ctx, &ListQuery::default()).await.unwrap();
    assert!(rows
        .windows(2)
        .all(|pair| pair[0].updated_at >= pair[1].updated_at));
}

#[test]
fn test_sort_name_outside_allowlist_is_rejected() {
    let err = Sort::parse("company; DROP TABLE applications", None).unwrap_err();
    assert!(matches!(err, TrackerError::ValidationRejected(_)));
    assert_eq!(
        Sort::parse("salary_max", Some("asc")).unwrap(),
        Sort::asc(SortColumn::SalaryMax)
    );
}

#[tokio::test]
async fn test_limit_out_of_range_is_rejected() {
    let db = TestStore::new().await;
    let ctx = db.ctx();

    for limit in [0, 501] {
        let query = ListQuery::default().paginate(limit, 0);
        let err = db.store.list(&ctx, &query).await.unwrap_err();
        assert!(matches!(err, TrackerError::ValidationRejected(_)));
    }

    let query = ListQuery::default().paginate(500, 0);
    assert!(db.store.list(&ctx, &query).await.is_ok());
}

#[tokio::test]
async fn test_list_page_reports_has_more() {
    let db = TestStore::new().await;
    seed_applications(&db.store, 5).await;
    let ctx = db.ctx();

    let page = db
        .store
        .list_page(&ctx, &ListQuery::default().paginate(2, 2))
        .await
        .unwrap();
    assert_eq!(page.data.len(), 2);
    assert_eq!(page.pagination.total, 5);
    assert!(page.pagination.has_more);

    let page = db
        .store
        .list_page(&ctx, &ListQuery::default().paginate(2, 4))
        .await
        .unwrap();
    assert_eq!(page.data.len(), 1);
    assert!(!page.pagination.has_more);
}

#[tokio::test]
async fn test_list_query_uses_configured_default_limit() {
    let db = TestStore::new().await;
    let query = db.store.list_query(ApplicationFilter::new());
    assert_eq!(query.pagination.limit, 50);
    assert_eq!(query.pagination.offset, 0);
}
