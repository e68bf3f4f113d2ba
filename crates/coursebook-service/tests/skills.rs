//! Skill tag integration tests.

mod common;

use axum::http::StatusCode;
use common::{assert_failed, TestHarness};
use serde_json::{json, Value};

#[tokio::test]
async fn create_list_and_delete_skill() {
    let harness = TestHarness::new();

    let skill_id = harness.create_skill("Yoga").await;

    let list: Value = harness.server.get("/skills").await.json();
    assert_eq!(list["status"], "success");
    assert_eq!(list["data"][0]["id"], skill_id);
    assert_eq!(list["data"][0]["name"], "Yoga");

    let response = harness.server.delete(&format!("/skills/{skill_id}")).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["data"].is_null());

    let list: Value = harness.server.get("/skills").await.json();
    assert!(list["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_skill_conflicts() {
    let harness = TestHarness::new();
    harness.create_skill("Yoga").await;

    let response = harness
        .server
        .post("/skills")
        .json(&json!({ "name": "Yoga" }))
        .await;

    assert_failed(&response, StatusCode::CONFLICT, "duplicate data");
}

#[tokio::test]
async fn skill_name_is_validated() {
    let harness = TestHarness::new();

    let missing = harness.server.post("/skills").json(&json!({})).await;
    assert_failed(&missing, StatusCode::BAD_REQUEST, "fields not filled correctly");

    let spaced = harness
        .server
        .post("/skills")
        .json(&json!({ "name": " Yoga" }))
        .await;
    spaced.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_unknown_skill_is_an_id_error() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .delete(&format!("/skills/{}", coursebook_core::SkillId::generate()))
        .await;

    assert_failed(&response, StatusCode::BAD_REQUEST, "ID error");
}

#[tokio::test]
async fn deleted_skill_leaves_course_listing_without_name() {
    let harness = TestHarness::new();
    let coach = harness.coach("Coach", "coach@example.com").await;
    let skill_id = harness.create_skill("Yoga").await;
    harness.create_course(&coach, &skill_id, 5).await;

    harness
        .server
        .delete(&format!("/skills/{skill_id}"))
        .await
        .assert_status_ok();

    let list: Value = harness.server.get("/courses").await.json();
    assert!(list["data"][0]["skill_name"].is_null());
}
