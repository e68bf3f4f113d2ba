//! Coursebook HTTP client implementation.

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use coursebook_core::{CoachId, CourseId, CreditPackageId, SkillId, UserId};

use crate::error::ClientError;
use crate::types::{
    Booking, CoachDetail, CoachSummary, Course, CourseInput, CourseListing, CreatePackageRequest,
    CreditPackage, CreditSummary, FailureEnvelope, HealthResponse, LoginRequest, LoginResponse,
    NameBody, Profile, ProfileResponse, PromoteRequest, SignupRequest, SignupResponse, Skill,
    SuccessEnvelope,
};

/// Coursebook API client.
///
/// Cheap to clone. Calls that need a member session use the token set with
/// [`CoursebookClient::with_token`].
#[derive(Debug, Clone)]
pub struct CoursebookClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl CoursebookClient {
    /// Create a new client with default options.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_options(base_url, ClientOptions::default())
    }

    /// Create a new client with custom options.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] if the base URL is empty or the
    /// HTTP client cannot be built.
    pub fn with_options(
        base_url: impl Into<String>,
        options: ClientOptions,
    ) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ClientError::Configuration("base URL is empty".into()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()
            .map_err(|e| ClientError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            token: None,
        })
    }

    /// Return a copy of this client that sends `token` as a bearer token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Check service health.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let response = self.request(Method::GET, "/health").send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }
        Err(ClientError::Api {
            status: status.as_u16(),
            message: format!("HTTP {status}"),
        })
    }

    // ------------------------------------------------------------------------
    // Members
    // ------------------------------------------------------------------------

    /// Register a new member.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects the fields.
    pub async fn signup(&self, request: &SignupRequest) -> Result<SignupResponse, ClientError> {
        self.send(self.request(Method::POST, "/users/signup").json(request))
            .await
    }

    /// Log in and return the token with the member's name.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the credentials are rejected.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let body = LoginRequest { email, password };
        self.send(self.request(Method::POST, "/users/login").json(&body))
            .await
    }

    /// Fetch the caller's profile.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotLoggedIn`] without a token, or any server error.
    pub async fn profile(&self) -> Result<Profile, ClientError> {
        let response: ProfileResponse = self
            .send(self.authorized(Method::GET, "/users/profile")?)
            .await?;
        Ok(response.user)
    }

    /// Change the caller's display name and return the stored name.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotLoggedIn`] without a token, or any server error.
    pub async fn update_name(&self, name: &str) -> Result<String, ClientError> {
        let body = NameBody { name: name.into() };
        let response: NameBody = self
            .send(self.authorized(Method::PUT, "/users/profile")?.json(&body))
            .await?;
        Ok(response.name)
    }

    /// Fetch the caller's credit balance and purchase history.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotLoggedIn`] without a token, or any server error.
    pub async fn credit_summary(&self) -> Result<CreditSummary, ClientError> {
        self.send(self.authorized(Method::GET, "/users/credit-package")?)
            .await
    }

    /// Fetch the caller's bookings, cancelled ones included.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotLoggedIn`] without a token, or any server error.
    pub async fn bookings(&self) -> Result<Vec<Booking>, ClientError> {
        self.send(self.authorized(Method::GET, "/users/courses")?)
            .await
    }

    // ------------------------------------------------------------------------
    // Coaches
    // ------------------------------------------------------------------------

    /// List one page of coaches. `per` and `page` must both be positive.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the paging is rejected.
    pub async fn list_coaches(&self, per: u32, page: u32) -> Result<Vec<CoachSummary>, ClientError> {
        let query = [("per", per), ("page", page)];
        self.send(self.request(Method::GET, "/coaches").query(&query))
            .await
    }

    /// Fetch one coach.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the coach does not exist.
    pub async fn coach(&self, coach_id: &CoachId) -> Result<CoachDetail, ClientError> {
        self.send(self.request(Method::GET, &format!("/coaches/{coach_id}")))
            .await
    }

    /// Promote a user to coach. The caller must be a coach.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotLoggedIn`] without a token, or any server error.
    pub async fn promote_to_coach(
        &self,
        user_id: &UserId,
        request: &PromoteRequest,
    ) -> Result<CoachDetail, ClientError> {
        let path = format!("/admin/coaches/{user_id}");
        self.send(self.authorized(Method::POST, &path)?.json(request))
            .await
    }

    // ------------------------------------------------------------------------
    // Courses
    // ------------------------------------------------------------------------

    /// Create a course owned by the calling coach.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotLoggedIn`] without a token, or any server error.
    pub async fn create_course(&self, input: &CourseInput) -> Result<Course, ClientError> {
        self.send(
            self.authorized(Method::POST, "/admin/coaches/courses")?
                .json(input),
        )
        .await
    }

    /// Replace the fields of a course owned by the calling coach.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotLoggedIn`] without a token, or any server error.
    pub async fn update_course(
        &self,
        course_id: &CourseId,
        input: &CourseInput,
    ) -> Result<Course, ClientError> {
        let path = format!("/admin/coaches/courses/{course_id}");
        self.send(self.authorized(Method::PUT, &path)?.json(input))
            .await
    }

    /// List all courses.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_courses(&self) -> Result<Vec<CourseListing>, ClientError> {
        self.send(self.request(Method::GET, "/courses")).await
    }

    /// Book a seat on a course, spending one credit.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NoRemainingCredits`], [`ClientError::CourseFull`]
    /// or [`ClientError::AlreadyBooked`] when the booking is refused.
    pub async fn book_course(&self, course_id: &CourseId) -> Result<(), ClientError> {
        let path = format!("/courses/{course_id}");
        self.send(self.authorized(Method::POST, &path)?).await
    }

    /// Cancel the caller's active booking on a course.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotLoggedIn`] without a token, or any server error.
    pub async fn cancel_booking(&self, course_id: &CourseId) -> Result<(), ClientError> {
        let path = format!("/courses/{course_id}");
        self.send(self.authorized(Method::DELETE, &path)?).await
    }

    // ------------------------------------------------------------------------
    // Catalog
    // ------------------------------------------------------------------------

    /// List credit packages.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_packages(&self) -> Result<Vec<CreditPackage>, ClientError> {
        self.send(self.request(Method::GET, "/credit-package")).await
    }

    /// Create a credit package.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the name is taken.
    pub async fn create_package(
        &self,
        name: &str,
        credit_amount: u32,
        price: u64,
    ) -> Result<CreditPackage, ClientError> {
        let body = CreatePackageRequest {
            name,
            credit_amount,
            price,
        };
        self.send(self.request(Method::POST, "/credit-package").json(&body))
            .await
    }

    /// Buy a credit package.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotLoggedIn`] without a token, or any server error.
    pub async fn purchase_package(&self, package_id: &CreditPackageId) -> Result<(), ClientError> {
        let path = format!("/credit-package/{package_id}");
        self.send(self.authorized(Method::POST, &path)?).await
    }

    /// Delete a credit package. Past purchases are unaffected.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the package does not exist.
    pub async fn delete_package(&self, package_id: &CreditPackageId) -> Result<(), ClientError> {
        let path = format!("/credit-package/{package_id}");
        self.send(self.request(Method::DELETE, &path)).await
    }

    /// List skills.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_skills(&self) -> Result<Vec<Skill>, ClientError> {
        self.send(self.request(Method::GET, "/skills")).await
    }

    /// Create a skill.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the name is taken.
    pub async fn create_skill(&self, name: &str) -> Result<Skill, ClientError> {
        let body = NameBody { name: name.into() };
        self.send(self.request(Method::POST, "/skills").json(&body))
            .await
    }

    /// Delete a skill.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the skill does not exist.
    pub async fn delete_skill(&self, skill_id: &SkillId) -> Result<(), ClientError> {
        let path = format!("/skills/{skill_id}");
        self.send(self.request(Method::DELETE, &path)).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, format!("{}{path}", self.base_url))
    }

    fn authorized(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let token = self.token.as_deref().ok_or(ClientError::NotLoggedIn)?;
        Ok(self.request(method, path).bearer_auth(token))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        self.handle_response(response).await
    }

    /// Unwrap the success envelope or convert the failure envelope.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        let body = response.bytes().await?;

        if status.is_success() {
            let envelope: SuccessEnvelope<T> = serde_json::from_slice(&body)?;
            return Ok(envelope.data);
        }

        let message = match serde_json::from_slice::<FailureEnvelope>(&body) {
            Ok(failure) => failure.message,
            Err(_) => format!("HTTP {status}"),
        };
        debug!(status = status.as_u16(), %message, "coursebook request failed");

        Err(ClientError::from_failure(status.as_u16(), message))
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
        }
    }
}
