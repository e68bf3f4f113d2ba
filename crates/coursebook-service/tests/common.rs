//! Common test utilities for coursebook integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::Router;
use axum_test::TestServer;
use serde_json::{json, Value};
use tempfile::TempDir;

use coursebook_core::{Coach, UserId};
use coursebook_service::{create_router, AppState, ServiceConfig, TokenIssuer};
use coursebook_store::{RocksStore, Store};

/// Password that satisfies the password rule.
pub const PASSWORD: &str = "Passw0rdOk";

/// Secret the test server signs tokens with.
pub const JWT_SECRET: &str = "test-secret";

/// A signed-up member and their bearer token.
#[derive(Debug, Clone)]
pub struct Member {
    /// The member's user ID.
    pub id: UserId,
    /// Login email.
    pub email: String,
    /// Bearer token from `/users/login`.
    pub token: String,
}

impl Member {
    /// The `Authorization` header for this member.
    pub fn auth(&self) -> (HeaderName, HeaderValue) {
        bearer(&self.token)
    }
}

/// Build an `Authorization: Bearer` header pair.
pub fn bearer(token: &str) -> (HeaderName, HeaderValue) {
    let value = HeaderValue::from_str(&format!("Bearer {token}")).expect("valid header value");
    (AUTHORIZATION, value)
}

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Direct store access for seeding and for asserting on stored rows.
    pub store: Arc<RocksStore>,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
}

impl TestHarness {
    /// Create a new test harness with a fresh database.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = Arc::new(RocksStore::open(temp_dir.path()).expect("Failed to open store"));

        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            data_dir: temp_dir.path().to_string_lossy().to_string(),
            jwt_secret: JWT_SECRET.into(),
            jwt_expires_days: 30,
            salt_rounds: 4,
            ..ServiceConfig::default()
        };

        let state = AppState::new(store.clone(), config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            store,
            _temp_dir: temp_dir,
        }
    }

    /// A token issuer sharing the server's secret.
    pub fn issuer(&self) -> TokenIssuer {
        TokenIssuer::new(JWT_SECRET, 30)
    }

    /// Sign up through the API and return the new user's ID.
    pub async fn signup(&self, name: &str, email: &str) -> UserId {
        let response = self
            .server
            .post("/users/signup")
            .json(&json!({ "name": name, "email": email, "password": PASSWORD }))
            .await;
        response.assert_status(StatusCode::CREATED);

        let body: Value = response.json();
        body["data"]["user"]["id"]
            .as_str()
            .expect("user id in signup response")
            .parse()
            .expect("valid user id")
    }

    /// Log in through the API and return the bearer token.
    pub async fn login(&self, email: &str) -> String {
        let response = self
            .server
            .post("/users/login")
            .json(&json!({ "email": email, "password": PASSWORD }))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        body["data"]["token"]
            .as_str()
            .expect("token in login response")
            .to_string()
    }

    /// Sign up and log in a member with the `USER` role.
    pub async fn member(&self, name: &str, email: &str) -> Member {
        let id = self.signup(name, email).await;
        let token = self.login(email).await;
        Member {
            id,
            email: email.to_string(),
            token,
        }
    }

    /// Sign up a member and promote them directly in the store.
    ///
    /// The first coach cannot come from the API, which only lets coaches promote.
    pub async fn coach(&self, name: &str, email: &str) -> Member {
        let member = self.member(name, email).await;
        self.store
            .promote_to_coach(&Coach::new(member.id, 3, "Seeded coach".into(), None))
            .expect("seed coach");
        member
    }

    /// Create a skill and return its ID.
    pub async fn create_skill(&self, name: &str) -> String {
        let response = self
            .server
            .post("/skills")
            .json(&json!({ "name": name }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        body["data"]["id"].as_str().expect("skill id").to_string()
    }

    /// Create a credit package and return its ID.
    pub async fn create_package(&self, name: &str, credit_amount: u32, price: u64) -> String {
        let response = self
            .server
            .post("/credit-package")
            .json(&json!({ "name": name, "credit_amount": credit_amount, "price": price }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        body["data"]["id"].as_str().expect("package id").to_string()
    }

    /// Buy a package as `member`.
    pub async fn purchase(&self, member: &Member, package_id: &str) {
        let (name, value) = member.auth();
        self.server
            .post(&format!("/credit-package/{package_id}"))
            .add_header(name, value)
            .await
            .assert_status_ok();
    }

    /// Create a package with `credits` credits and buy it as `member`.
    pub async fn grant_credits(&self, member: &Member, package_name: &str, credits: u32) {
        let package_id = self.create_package(package_name, credits, 100).await;
        self.purchase(member, &package_id).await;
    }

    /// A valid course body.
    pub fn course_body(skill_id: &str, name: &str, max_participants: u32) -> Value {
        json!({
            "skill_id": skill_id,
            "name": name,
            "description": "A course for testing",
            "start_at": "2030-01-01T10:00:00Z",
            "end_at": "2030-01-01T11:00:00Z",
            "max_participants": max_participants,
            "meeting_url": "https://meet.example.com/room",
        })
    }

    /// Publish a course as `coach` and return its ID.
    pub async fn create_course(&self, coach: &Member, skill_id: &str, max_participants: u32) -> String {
        let (name, value) = coach.auth();
        let response = self
            .server
            .post("/admin/coaches/courses")
            .add_header(name, value)
            .json(&Self::course_body(skill_id, "Morning Yoga", max_participants))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        body["data"]["id"].as_str().expect("course id").to_string()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Assert a failure envelope with the given status and message.
pub fn assert_failed(response: &axum_test::TestResponse, status: StatusCode, message: &str) {
    response.assert_status(status);
    let body: Value = response.json();
    assert_eq!(body["status"], "failed");
    assert_eq!(body["message"], message);
}
