//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::error_handling::HandleErrorLayer;
use axum::routing::{delete, get, post, put};
use axum::{BoxError, Router};
use tower::limit::ConcurrencyLimitLayer;
use tower::timeout::error::Elapsed;
use tower::timeout::TimeoutLayer;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::handlers::{admin, coaches, courses, credit_packages, health, skills, users};
use crate::state::AppState;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
/// - `GET /coaches?per&page` - Coach directory
/// - `GET /coaches/:coach_id` - Coach profile
/// - `GET /courses` - Course catalog
/// - `GET|POST /credit-package`, `DELETE /credit-package/:credit_package_id`
/// - `GET|POST /skills`, `DELETE /skills/:skill_id`
///
/// ## Members (bearer token)
/// - `POST /users/signup`, `POST /users/login` (no token needed)
/// - `GET|PUT /users/profile`
/// - `GET /users/credit-package` - Purchase history and balance
/// - `GET /users/courses` - Booking history
/// - `POST|DELETE /courses/:course_id` - Book or cancel
/// - `POST /credit-package/:credit_package_id` - Purchase
///
/// ## Coaches (bearer token + `COACH` role)
/// - `POST /admin/coaches/courses` - Publish a course
/// - `PUT /admin/coaches/courses/:course_id` - Edit an owned course
/// - `POST /admin/coaches/:user_id` - Promote a user
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;
    let max_concurrent_requests = state.config.max_concurrent_requests;

    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    let router = Router::new()
        .route("/health", get(health::health))
        // Members
        .route("/users/signup", post(users::signup))
        .route("/users/login", post(users::login))
        .route(
            "/users/profile",
            get(users::get_profile).put(users::update_profile),
        )
        .route("/users/credit-package", get(users::list_purchases))
        .route("/users/courses", get(users::list_bookings))
        // Coach directory
        .route("/coaches", get(coaches::list_coaches))
        .route("/coaches/:coach_id", get(coaches::get_coach))
        // Coach administration
        .route("/admin/coaches/courses", post(admin::create_course))
        .route("/admin/coaches/courses/:course_id", put(admin::update_course))
        .route("/admin/coaches/:user_id", post(admin::promote_to_coach))
        // Courses
        .route("/courses", get(courses::list_courses))
        .route(
            "/courses/:course_id",
            post(courses::book_course).delete(courses::cancel_booking),
        )
        // Credit packages
        .route(
            "/credit-package",
            get(credit_packages::list_packages).post(credit_packages::create_package),
        )
        .route(
            "/credit-package/:credit_package_id",
            post(credit_packages::purchase_package).delete(credit_packages::delete_package),
        )
        // Skills
        .route(
            "/skills",
            get(skills::list_skills).post(skills::create_skill),
        )
        .route("/skills/:skill_id", delete(skills::delete_skill))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes));

    with_timeout(router, Duration::from_secs(request_timeout_seconds))
        .layer(ConcurrencyLimitLayer::new(max_concurrent_requests))
        .with_state(state)
}

/// Fail requests that run longer than `timeout` with the failure envelope.
fn with_timeout<S>(router: Router<S>, timeout: Duration) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_middleware_error))
            .layer(TimeoutLayer::new(timeout)),
    )
}

async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<Elapsed>() {
        tracing::warn!("Request timed out");
        ApiError::Timeout
    } else {
        ApiError::Internal(format!("middleware error: {err}"))
    }
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::Value;

    #[tokio::test]
    async fn slow_requests_get_the_failure_envelope() {
        let router: Router = Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        );
        let server = TestServer::new(with_timeout(router, Duration::from_millis(20))).unwrap();

        let response = server.get("/slow").await;

        response.assert_status(StatusCode::REQUEST_TIMEOUT);
        let body: Value = response.json();
        assert_eq!(body["status"], "failed");
        assert_eq!(body["message"], "request timed out");
    }

    #[tokio::test]
    async fn other_middleware_errors_are_internal() {
        let err = handle_middleware_error(Box::new(std::io::Error::other("boom"))).await;
        assert!(matches!(err, ApiError::Internal(_)));
    }
}
