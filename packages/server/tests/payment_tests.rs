//! Dues payment flow: record, confirm and cancel confirmation.

mod common;

use crate::common::{
    clear_payments, create_approved_member, create_officer, new_uid, TestHarness,
    ROOT_ADMIN_EMAIL,
};
use axum::http::StatusCode;
use test_context::test_context;

#[test_context(TestHarness)]
#[tokio::test]
async fn registration_payment_blocks_second_record(ctx: &TestHarness) {
    let member = create_approved_member(&ctx.db_pool, &new_uid()).await.unwrap();

    let response = ctx
        .api()
        .as_user(&new_uid(), Some(ROOT_ADMIN_EMAIL))
        .post(&format!("/api/user/{}/payment", member.id), None)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.key(), "D3");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn officer_records_then_confirms_payment(ctx: &TestHarness) {
    let officer_uid = new_uid();
    let officer = create_officer(&ctx.db_pool, &officer_uid).await.unwrap();
    let member_uid = new_uid();
    let member = create_approved_member(&ctx.db_pool, &member_uid).await.unwrap();
    clear_payments(&ctx.db_pool, &member_uid).await.unwrap();
    let api = ctx.api().as_user(&officer_uid, None);

    let not_paid = api
        .post(&format!("/api/user/{}/payment/confirm", member.id), None)
        .await;
    assert_eq!(not_paid.key(), "D6");

    let recorded = api
        .post(&format!("/api/user/{}/payment", member.id), None)
        .await;
    assert_eq!(recorded.status, StatusCode::OK, "body: {}", recorded.body);
    assert_eq!(recorded.body["payment"]["payeeId"], officer.id);
    assert_eq!(recorded.body["payment"]["isConfirmed"], false);

    let confirmed = api
        .post(&format!("/api/user/{}/payment/confirm", member.id), None)
        .await;
    assert_eq!(confirmed.status, StatusCode::OK);
    assert_eq!(confirmed.body["payment"]["isConfirmed"], true);
    assert_eq!(confirmed.body["payment"]["receiverId"], officer.id);

    let twice = api
        .post(&format!("/api/user/{}/payment/confirm", member.id), None)
        .await;
    assert_eq!(twice.key(), "D6");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn cancelling_confirmation_reopens_payment(ctx: &TestHarness) {
    let member = create_approved_member(&ctx.db_pool, &new_uid()).await.unwrap();
    let admin = ctx.api().as_user(&new_uid(), Some(ROOT_ADMIN_EMAIL));
    let confirm_uri = format!("/api/user/{}/payment/confirm", member.id);

    let nothing_confirmed = admin.delete(&confirm_uri, None).await;
    assert_eq!(nothing_confirmed.key(), "D6");

    let confirmed = admin.post(&confirm_uri, None).await;
    assert_eq!(confirmed.status, StatusCode::OK, "body: {}", confirmed.body);

    let cancelled = admin.delete(&confirm_uri, None).await;
    assert_eq!(cancelled.status, StatusCode::OK);
    assert_eq!(cancelled.body["payment"]["isConfirmed"], false);

    let reconfirmed = admin.post(&confirm_uri, None).await;
    assert_eq!(reconfirmed.status, StatusCode::OK);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn payment_routes_require_admin(ctx: &TestHarness) {
    let member_uid = new_uid();
    let member = create_approved_member(&ctx.db_pool, &member_uid).await.unwrap();

    let own = ctx
        .api()
        .as_user(&member_uid, None)
        .post(&format!("/api/user/{}/payment/confirm", member.id), None)
        .await;
    assert_eq!(own.key(), "A2");

    let anonymous = ctx
        .api()
        .post(&format!("/api/user/{}/payment", member.id), None)
        .await;
    assert_eq!(anonymous.key(), "A1");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn payment_for_unknown_member_gets_c3(ctx: &TestHarness) {
    let response = ctx
        .api()
        .as_user(&new_uid(), Some(ROOT_ADMIN_EMAIL))
        .post(&format!("/api/user/{}/payment", i64::MAX), None)
        .await;

    assert_eq!(response.key(), "C3");
}
