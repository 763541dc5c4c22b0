//! Record access against a live database.
//!
//! Set `DATABASE_URL` to run; every test skips otherwise.

mod common;

use common::TestDb;
use jobly_db::{Decimal, Job, JobFilter, JobPatch, NewJob, TracedClient};

macro_rules! setup_or_skip {
    () => {
        match TestDb::setup().await {
            Some(db) => db,
            None => {
                eprintln!("DATABASE_URL not set; skipping");
                return;
            }
        }
    };
}

fn titles(jobs: &[Job]) -> Vec<&str> {
    jobs.iter().map(|j| j.title.as_str()).collect()
}

#[tokio::test]
async fn create_then_get_round_trips() {
    let db = setup_or_skip!();

    let new = NewJob {
        title: "new".into(),
        salary: Some(1),
        equity: Some(Decimal::new(1, 1)),
        company_handle: "c1".into(),
    };
    let created = Job::create(&db.client, &new).await.unwrap();
    assert_eq!(created.title, "new");
    assert_eq!(created.salary, Some(1));
    assert_eq!(created.equity, Some(Decimal::new(1, 1)));
    assert_eq!(created.company_handle, "c1");
    assert!(!db.job_ids.contains(&created.id));

    let fetched = Job::get(&db.client, created.id).await.unwrap();
    assert_eq!(fetched, created);

    db.teardown().await;
}

#[tokio::test]
async fn create_with_unknown_company_is_foreign_key_violation() {
    let db = setup_or_skip!();

    let new = NewJob {
        title: "orphan".into(),
        salary: None,
        equity: None,
        company_handle: "nope".into(),
    };
    let err = Job::create(&db.client, &new).await.unwrap_err();
    assert!(matches!(err, jobly_db::DbError::ForeignKeyViolation(_)));

    db.teardown().await;
}

#[tokio::test]
async fn find_all_without_filters_returns_every_job() {
    let db = setup_or_skip!();

    let jobs = Job::find_all(&db.client, &JobFilter::default()).await.unwrap();
    assert_eq!(titles(&jobs), vec!["j1", "j1b", "j3"]);
    assert_eq!(jobs[0].id, db.job_ids[0]);
    assert_eq!(jobs[0].equity, Some(Decimal::new(1, 1)));
    assert_eq!(jobs[2].equity, None);
    assert_eq!(jobs[2].company_handle, "c3");

    db.teardown().await;
}

#[tokio::test]
async fn find_all_filters() {
    let db = setup_or_skip!();

    let by_title = JobFilter {
        title: Some("j1".into()),
        ..Default::default()
    };
    let jobs = Job::find_all(&db.client, &by_title).await.unwrap();
    assert_eq!(titles(&jobs), vec!["j1", "j1b"]);

    let by_title_ci = JobFilter {
        title: Some("J1B".into()),
        ..Default::default()
    };
    let jobs = Job::find_all(&db.client, &by_title_ci).await.unwrap();
    assert_eq!(titles(&jobs), vec!["j1b"]);

    let by_salary = JobFilter {
        min_salary: Some(3),
        ..Default::default()
    };
    let jobs = Job::find_all(&db.client, &by_salary).await.unwrap();
    assert_eq!(titles(&jobs), vec!["j3"]);

    let with_equity = JobFilter {
        has_equity: Some(true),
        ..Default::default()
    };
    let jobs = Job::find_all(&db.client, &with_equity).await.unwrap();
    assert_eq!(titles(&jobs), vec!["j1", "j1b"]);

    let combined = JobFilter {
        min_salary: Some(2),
        has_equity: Some(true),
        ..Default::default()
    };
    let jobs = Job::find_all(&db.client, &combined).await.unwrap();
    assert_eq!(titles(&jobs), vec!["j1b"]);

    db.teardown().await;
}

#[tokio::test]
async fn has_equity_false_does_not_filter() {
    let db = setup_or_skip!();

    let filter = JobFilter {
        has_equity: Some(false),
        ..Default::default()
    };
    let jobs = Job::find_all(&db.client, &filter).await.unwrap();
    assert_eq!(titles(&jobs), vec!["j1", "j1b", "j3"]);

    db.teardown().await;
}

#[tokio::test]
async fn get_missing_is_not_found() {
    let db = setup_or_skip!();

    let err = Job::get(&db.client, -1).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Not found: No job with id: -1");

    db.teardown().await;
}

#[tokio::test]
async fn update_applies_present_fields_only() {
    let db = setup_or_skip!();
    let id = db.job_ids[0];

    let patch = JobPatch {
        title: Some("update".into()),
        salary: Some(Some(123)),
        equity: Some(None),
    };
    let job = Job::update(&db.client, id, &patch).await.unwrap();
    assert_eq!(
        job,
        Job {
            id,
            title: "update".into(),
            salary: Some(123),
            equity: None,
            company_handle: "c1".into(),
        }
    );
    assert_eq!(Job::get(&db.client, id).await.unwrap(), job);

    let patch = JobPatch {
        title: Some("again".into()),
        ..Default::default()
    };
    let job = Job::update(&db.client, id, &patch).await.unwrap();
    assert_eq!(job.title, "again");
    assert_eq!(job.salary, Some(123));

    db.teardown().await;
}

#[tokio::test]
async fn update_missing_is_not_found() {
    let db = setup_or_skip!();

    let patch = JobPatch {
        title: Some("x".into()),
        ..Default::default()
    };
    let err = Job::update(&db.client, -1, &patch).await.unwrap_err();
    assert!(err.is_not_found());

    db.teardown().await;
}

#[tokio::test]
async fn update_with_empty_patch_is_invalid_input() {
    let db = setup_or_skip!();

    let err = Job::update(&db.client, db.job_ids[0], &JobPatch::default())
        .await
        .unwrap_err();
    assert!(err.is_invalid_input());

    db.teardown().await;
}

#[tokio::test]
async fn update_equity_above_one_is_check_violation() {
    let db = setup_or_skip!();

    let patch = JobPatch {
        equity: Some(Some(Decimal::new(15, 1))),
        ..Default::default()
    };
    let err = Job::update(&db.client, db.job_ids[0], &patch)
        .await
        .unwrap_err();
    assert!(matches!(err, jobly_db::DbError::CheckViolation(_)));

    db.teardown().await;
}

#[tokio::test]
async fn remove_deletes_permanently() {
    let db = setup_or_skip!();
    let id = db.job_ids[0];

    Job::remove(&db.client, id).await.unwrap();
    assert!(Job::get(&db.client, id).await.unwrap_err().is_not_found());
    assert!(Job::remove(&db.client, id).await.unwrap_err().is_not_found());

    db.teardown().await;
}

#[tokio::test]
async fn remove_missing_is_not_found() {
    let db = setup_or_skip!();

    let err = Job::remove(&db.client, -1).await.unwrap_err();
    assert!(err.is_not_found());

    db.teardown().await;
}

#[tokio::test]
async fn traced_client_passes_results_through() {
    let db = setup_or_skip!();

    let traced = TracedClient::new(&db.client);
    let jobs = Job::find_all(&traced, &JobFilter::default()).await.unwrap();
    assert_eq!(jobs.len(), 3);
    assert!(Job::get(&traced, -1).await.unwrap_err().is_not_found());

    db.teardown().await;
}

#[tokio::test]
async fn fixture_schema_is_dropped_without_teardown() {
    let db = setup_or_skip!();
    let schema = db.schema_name().to_string();
    drop(db);

    let database_url = std::env::var("DATABASE_URL").unwrap();
    let (client, connection) = tokio_postgres::connect(&database_url, tokio_postgres::NoTls)
        .await
        .unwrap();
    tokio::spawn(connection);
    let row = client
        .query_one(
            "SELECT count(*) FROM information_schema.schemata WHERE schema_name = $1",
            &[&schema],
        )
        .await
        .unwrap();
    assert_eq!(row.get::<_, i64>(0), 0);
}
