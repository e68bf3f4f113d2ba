//! Client tests against a mocked coursebook service.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use coursebook_client::{ClientError, CoursebookClient, SignupRequest};
use coursebook_core::{CourseId, CreditPackageId};

async fn client_for(server: &MockServer) -> CoursebookClient {
    CoursebookClient::new(server.uri()).unwrap()
}

#[tokio::test]
async fn signup_unwraps_success_envelope() {
    let server = MockServer::start().await;
    let user_id = coursebook_core::UserId::generate();

    Mock::given(method("POST"))
        .and(path("/users/signup"))
        .and(body_json(json!({
            "name": "Alice",
            "email": "alice@example.com",
            "password": "Passw0rdOk"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "status": "success",
            "data": { "user": { "id": user_id.to_string(), "name": "Alice" } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .await
        .signup(&SignupRequest {
            name: "Alice".into(),
            email: "alice@example.com".into(),
            password: "Passw0rdOk".into(),
        })
        .await
        .unwrap();

    assert_eq!(response.user.id, user_id);
    assert_eq!(response.user.name, "Alice");
}

#[tokio::test]
async fn login_then_profile_sends_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": { "token": "tok-123", "user": { "name": "Alice" } }
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/users/profile"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": { "user": { "name": "Alice", "email": "alice@example.com" } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let login = client.login("alice@example.com", "Passw0rdOk").await.unwrap();
    assert_eq!(login.user.name, "Alice");

    let profile = client.with_token(login.token).profile().await.unwrap();
    assert_eq!(profile.email, "alice@example.com");
}

#[tokio::test]
async fn booking_rejections_become_typed_errors() {
    let server = MockServer::start().await;
    let full = CourseId::generate();
    let broke = CourseId::generate();

    Mock::given(method("POST"))
        .and(path(format!("/courses/{full}")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status": "failed",
            "message": "course is full"
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/courses/{broke}")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status": "failed",
            "message": "no remaining credits"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await.with_token("tok");

    assert!(matches!(
        client.book_course(&full).await.unwrap_err(),
        ClientError::CourseFull
    ));
    assert!(matches!(
        client.book_course(&broke).await.unwrap_err(),
        ClientError::NoRemainingCredits
    ));
}

#[tokio::test]
async fn null_data_maps_to_unit() {
    let server = MockServer::start().await;
    let package_id = CreditPackageId::generate();

    Mock::given(method("POST"))
        .and(path(format!("/credit-package/{package_id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .await
        .with_token("tok")
        .purchase_package(&package_id)
        .await
        .unwrap();
}

#[tokio::test]
async fn expired_token_is_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/courses"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status": "failed",
            "message": "token expired"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .with_token("stale")
        .bookings()
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Unauthorized(m) if m == "token expired"));
}

#[tokio::test]
async fn coach_paging_is_sent_as_query() {
    let server = MockServer::start().await;
    let coach_id = coursebook_core::CoachId::generate();

    Mock::given(method("GET"))
        .and(path("/coaches"))
        .and(query_param("per", "2"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": [{ "id": coach_id.to_string(), "name": "Coach" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let coaches = client_for(&server).await.list_coaches(2, 3).await.unwrap();
    assert_eq!(coaches.len(), 1);
    assert_eq!(coaches[0].id, coach_id);
}

#[tokio::test]
async fn server_error_without_envelope_keeps_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/skills"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    match client_for(&server).await.list_skills().await.unwrap_err() {
        ClientError::Api { status, .. } => assert_eq!(status, 502),
        other => panic!("unexpected error: {other:?}"),
    }
}
