mod common;

use pretty_assertions::assert_eq;
use uuid::Uuid;

use common::*;
use leavehub::database::models::{PageRequest, UserRole};
use leavehub::error::AppError;

async fn seed_leaves(env: &TestEnv, user: Uuid, count: usize) {
    for date in future_weekdays(count) {
        env.workflow
            .create_leave(user, leave_input(vec![date]))
            .await
            .expect("seed leave");
    }
}

#[tokio::test]
async fn my_leaves_pages_with_a_default_size_of_ten() {
    let env = TestEnv::new();
    let employee = env.add_user(UserRole::Employee, None).await;
    seed_leaves(&env, employee.id, 12).await;

    let first = env
        .queries
        .my_leaves(employee.id, &PageRequest::default())
        .await
        .expect("page 1");
    assert_eq!(first.items.len(), 10);
    assert_eq!(first.total, 12);
    assert_eq!(first.total_pages, 2);
    assert_eq!(first.page, 1);

    let second = env
        .queries
        .my_leaves(
            employee.id,
            &PageRequest {
                page: Some(2),
                ..Default::default()
            },
        )
        .await
        .expect("page 2");
    assert_eq!(second.items.len(), 2);
    assert_eq!(second.page, 2);
}

#[tokio::test]
async fn page_numbers_are_one_indexed() {
    let env = TestEnv::new();
    let employee = env.add_user(UserRole::Employee, None).await;
    seed_leaves(&env, employee.id, 7).await;

    let page = env
        .queries
        .my_leaves(
            employee.id,
            &PageRequest {
                page: Some(2),
                limit: Some(5),
                ..Default::default()
            },
        )
        .await
        .expect("page 2 of 5");

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total, 7);
    assert_eq!(page.total_pages, 2);

    // Page zero is clamped to the first page rather than erroring.
    let clamped = env
        .queries
        .my_leaves(
            employee.id,
            &PageRequest {
                page: Some(0),
                limit: Some(5),
                ..Default::default()
            },
        )
        .await
        .expect("clamped page");
    assert_eq!(clamped.page, 1);
    assert_eq!(clamped.items.len(), 5);
}

#[tokio::test]
async fn my_leaves_only_sees_the_requesters_rows() {
    let env = TestEnv::new();
    let alice = env.add_user(UserRole::Employee, None).await;
    let bob = env.add_user(UserRole::Employee, None).await;
    seed_leaves(&env, alice.id, 3).await;
    seed_leaves(&env, bob.id, 2).await;

    let page = env
        .queries
        .my_leaves(alice.id, &PageRequest::default())
        .await
        .expect("alice's leaves");
    assert_eq!(page.total, 3);
    assert!(page.items.iter().all(|l| l.user_id == alice.id));
}

#[tokio::test]
async fn all_leaves_spans_every_user() {
    let env = TestEnv::new();
    let alice = env.add_user(UserRole::Employee, None).await;
    let bob = env.add_user(UserRole::Employee, None).await;
    seed_leaves(&env, alice.id, 3).await;
    seed_leaves(&env, bob.id, 2).await;

    let page = env
        .queries
        .all_leaves(&PageRequest::default())
        .await
        .expect("all leaves");
    assert_eq!(page.total, 5);
    assert_eq!(page.items.len(), 5);
}

#[tokio::test]
async fn team_leaves_covers_exactly_the_direct_reports() {
    let env = TestEnv::new();
    let manager = env.add_user(UserRole::Manager, None).await;
    let report_a = env.add_user(UserRole::Employee, Some(manager.id)).await;
    let report_b = env.add_user(UserRole::Employee, Some(manager.id)).await;
    let outsider = env.add_user(UserRole::Employee, None).await;

    seed_leaves(&env, report_a.id, 2).await;
    seed_leaves(&env, report_b.id, 1).await;
    seed_leaves(&env, outsider.id, 4).await;

    let page = env
        .queries
        .team_leaves(manager.id, &PageRequest::default())
        .await
        .expect("team leaves");

    assert_eq!(page.total, 3);
    assert!(page
        .items
        .iter()
        .all(|l| l.user_id == report_a.id || l.user_id == report_b.id));
}

#[tokio::test]
async fn team_of_a_manager_with_no_reports_is_empty() {
    let env = TestEnv::new();
    let manager = env.add_user(UserRole::Manager, None).await;

    let page = env
        .queries
        .team_leaves(manager.id, &PageRequest::default())
        .await
        .expect("empty team");
    assert_eq!(page.total, 0);
    assert!(page.items.is_empty());
    assert_eq!(page.total_pages, 0);
}

#[tokio::test]
async fn leave_by_id_reports_not_found() {
    let env = TestEnv::new();
    let err = env.queries.leave_by_id(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
