use chrono::NaiveDate;

mod support;

use support::{integration_guard, seed_request, test_pool, unique_emp_id};

use benefitsdesk_backend::{
    models::request::NewRequest,
    repositories::{CreateRequestError, RequestRepository, RequestRepositoryTrait},
};

fn draft(emp_id: &str, program: &str, date: NaiveDate) -> NewRequest {
    NewRequest {
        name: Some("Test User".into()),
        email: Some("test.user@example.com".into()),
        emp_id: Some(emp_id.into()),
        program: Some(program.into()),
        request_date: Some(date),
        ..Default::default()
    }
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, day).unwrap()
}

#[tokio::test]
async fn create_assigns_id_and_forces_pending() {
    let _guard = integration_guard().await;
    let pool = test_pool().await;
    let repo = RequestRepository::new();

    let emp_id = unique_emp_id();
    let created = repo
        .create(&pool, &draft(&emp_id, "Home Loan", date(1)))
        .await
        .expect("create request");

    assert!(created.id > 0);
    assert_eq!(created.status, "Pending");
    assert_eq!(created.emp_id, emp_id);
    assert_eq!(created.document_path, None);
}

#[tokio::test]
async fn duplicate_active_one_time_request_is_refused() {
    let _guard = integration_guard().await;
    let pool = test_pool().await;
    let repo = RequestRepository::new();

    let emp_id = unique_emp_id();
    repo.create(&pool, &draft(&emp_id, "Gym Membership", date(1)))
        .await
        .expect("first create");

    let err = repo
        .create(&pool, &draft(&emp_id, "Gym Membership", date(2)))
        .await
        .unwrap_err();

    match &err {
        CreateRequestError::Duplicate { status, program } => {
            assert_eq!(status, "Pending");
            assert_eq!(program, "Gym Membership");
        }
        other => panic!("expected duplicate error, got {:?}", other),
    }
    assert_eq!(
        err.to_string(),
        "You already have a pending request for Gym Membership"
    );
}

#[tokio::test]
async fn rejected_record_does_not_block_a_new_submission() {
    let _guard = integration_guard().await;
    let pool = test_pool().await;
    let repo = RequestRepository::new();

    let emp_id = unique_emp_id();
    seed_request(&pool, &emp_id, "Gym Membership", "Rejected", date(1)).await;

    let created = repo
        .create(&pool, &draft(&emp_id, "Gym Membership", date(2)))
        .await
        .expect("rejection frees the slot");
    assert_eq!(created.status, "Pending");
}

#[tokio::test]
async fn same_employee_may_hold_different_one_time_programs() {
    let _guard = integration_guard().await;
    let pool = test_pool().await;
    let repo = RequestRepository::new();

    let emp_id = unique_emp_id();
    repo.create(&pool, &draft(&emp_id, "Gym Membership", date(1)))
        .await
        .expect("first program");
    repo.create(&pool, &draft(&emp_id, "Yoga and Meditation", date(1)))
        .await
        .expect("second program");
}

#[tokio::test]
async fn find_by_employee_matches_exactly_and_orders_by_date_desc() {
    let _guard = integration_guard().await;
    let pool = test_pool().await;
    let repo = RequestRepository::new();

    let emp_id = unique_emp_id();
    let other_emp = unique_emp_id();
    repo.create(&pool, &draft(&emp_id, "Home Loan", date(5)))
        .await
        .unwrap();
    repo.create(&pool, &draft(&emp_id, "Personal Loan", date(20)))
        .await
        .unwrap();
    repo.create(&pool, &draft(&other_emp, "Home Loan", date(10)))
        .await
        .unwrap();

    let mine = repo.find_by_employee(&pool, &emp_id).await.unwrap();
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|r| r.emp_id == emp_id));
    assert_eq!(mine[0].request_date, date(20));
    assert_eq!(mine[1].request_date, date(5));

    let all = repo.find_all(&pool).await.unwrap();
    let filtered: Vec<i32> = all
        .iter()
        .filter(|r| r.emp_id == emp_id)
        .map(|r| r.id)
        .collect();
    let listed: Vec<i32> = mine.iter().map(|r| r.id).collect();
    assert_eq!(listed, filtered);
}

#[tokio::test]
async fn update_status_returns_none_for_unknown_id() {
    let _guard = integration_guard().await;
    let pool = test_pool().await;
    let repo = RequestRepository::new();

    let updated = repo
        .update_status(&pool, 2_000_000_000, "Approved")
        .await
        .unwrap();
    assert!(updated.is_none());
}

#[tokio::test]
async fn update_status_overwrites_unconditionally() {
    let _guard = integration_guard().await;
    let pool = test_pool().await;
    let repo = RequestRepository::new();

    let emp_id = unique_emp_id();
    let created = repo
        .create(&pool, &draft(&emp_id, "Home Loan", date(1)))
        .await
        .unwrap();

    let updated = repo
        .update_status(&pool, created.id, "Needs Documents")
        .await
        .unwrap()
        .expect("row exists");
    assert_eq!(updated.status, "Needs Documents");
    assert_eq!(updated.name, created.name);
    assert_eq!(updated.request_date, created.request_date);
}

#[tokio::test]
async fn missing_required_fields_fail_at_the_store() {
    let _guard = integration_guard().await;
    let pool = test_pool().await;
    let repo = RequestRepository::new();

    let mut incomplete = draft(&unique_emp_id(), "Home Loan", date(1));
    incomplete.email = None;

    let err = repo.create(&pool, &incomplete).await.unwrap_err();
    assert!(matches!(err, CreateRequestError::Db(_)));
}
