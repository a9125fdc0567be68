//! Approval and officer grant flows.

mod common;

use crate::common::{
    create_approved_member, create_member, create_officer, new_uid, TestHarness, ROOT_ADMIN_EMAIL,
};
use axum::http::StatusCode;
use meibo_core::domains::member::models::member::Member;
use test_context::test_context;

#[test_context(TestHarness)]
#[tokio::test]
async fn allow_listed_admin_approves_as_zero(ctx: &TestHarness) {
    let member = create_member(&ctx.db_pool, &new_uid(), 0).await.unwrap();
    let admin = ctx.api().as_user(&new_uid(), Some(ROOT_ADMIN_EMAIL));

    let response = admin
        .post(&format!("/api/user/{}/approve", member.id), None)
        .await;
    assert_eq!(response.status, StatusCode::OK, "body: {}", response.body);

    let stored = Member::find_active_by_id(member.id, &ctx.db_pool)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.is_approved);
    assert_eq!(stored.approved_by, Some(0));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn officer_approval_records_officer_id(ctx: &TestHarness) {
    let officer_uid = new_uid();
    let officer = create_officer(&ctx.db_pool, &officer_uid).await.unwrap();
    let member = create_member(&ctx.db_pool, &new_uid(), officer.id).await.unwrap();

    let response = ctx
        .api()
        .as_user(&officer_uid, None)
        .post(&format!("/api/user/{}/approve", member.id), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let stored = Member::find_active_by_id(member.id, &ctx.db_pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.approved_by, Some(officer.id));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn approving_twice_gets_c4(ctx: &TestHarness) {
    let member = create_approved_member(&ctx.db_pool, &new_uid()).await.unwrap();

    let response = ctx
        .api()
        .as_user(&new_uid(), Some(ROOT_ADMIN_EMAIL))
        .post(&format!("/api/user/{}/approve", member.id), None)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.key(), "C4");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn non_admin_cannot_approve(ctx: &TestHarness) {
    let member = create_member(&ctx.db_pool, &new_uid(), 0).await.unwrap();
    let caller_uid = new_uid();
    create_approved_member(&ctx.db_pool, &caller_uid).await.unwrap();

    let response = ctx
        .api()
        .as_user(&caller_uid, None)
        .post(&format!("/api/user/{}/approve", member.id), None)
        .await;

    assert_eq!(response.key(), "A2");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn grant_and_revoke_officer(ctx: &TestHarness) {
    let uid = new_uid();
    let member = create_approved_member(&ctx.db_pool, &uid).await.unwrap();
    let admin = ctx.api().as_user(&new_uid(), Some(ROOT_ADMIN_EMAIL));
    let uri = format!("/api/user/{}/officer", member.id);

    let granted = admin.post(&uri, None).await;
    assert_eq!(granted.status, StatusCode::OK, "body: {}", granted.body);

    let again = admin.post(&uri, None).await;
    assert_eq!(again.key(), "C6");

    let as_officer = ctx.api().as_user(&uid, None).get("/api/users/detail").await;
    assert_eq!(as_officer.status, StatusCode::OK);

    let revoked = admin.delete(&uri, None).await;
    assert_eq!(revoked.status, StatusCode::OK);

    let not_officer = admin.delete(&uri, None).await;
    assert_eq!(not_officer.key(), "C7");

    let after = ctx.api().as_user(&uid, None).get("/api/users/detail").await;
    assert_eq!(after.key(), "A2");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn officers_are_listed_as_payees(ctx: &TestHarness) {
    let officer = create_officer(&ctx.db_pool, &new_uid()).await.unwrap();

    let response = ctx.api().get("/api/users/payee").await;

    let payees = response.body["payee"].as_array().unwrap();
    let entry = payees
        .iter()
        .find(|p| p["id"] == officer.id)
        .expect("officer should be a payee");
    assert_eq!(entry["name"], "Yamada Taro");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn roster_flags_officers_and_pending_members(ctx: &TestHarness) {
    let officer = create_officer(&ctx.db_pool, &new_uid()).await.unwrap();
    let pending = create_member(&ctx.db_pool, &new_uid(), officer.id).await.unwrap();

    let response = ctx
        .api()
        .as_user(&new_uid(), Some(ROOT_ADMIN_EMAIL))
        .get("/api/users/detail")
        .await;
    let users = response.body["users"].as_array().unwrap();

    let officer_row = users.iter().find(|u| u["id"] == officer.id).unwrap();
    assert_eq!(officer_row["isAdmin"], true);
    assert_eq!(officer_row["isApproved"], true);

    let pending_row = users.iter().find(|u| u["id"] == pending.id).unwrap();
    assert_eq!(pending_row["isApproved"], false);
    assert_eq!(pending_row["payeeId"], officer.id);
    assert_eq!(pending_row["isConfirmed"], false);
}
