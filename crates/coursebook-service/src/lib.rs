//! Coursebook HTTP API Service.
//!
//! This crate provides the HTTP API for coursebook, including:
//!
//! - Member signup, login and profile
//! - Coach promotion and the coach directory
//! - Course publishing, booking and cancellation
//! - Credit packages and purchases
//! - Skill tags
//!
//! # Authentication
//!
//! Members authenticate with an HS256 bearer token issued by
//! `POST /users/login`. Coach-only endpoints additionally require the
//! `COACH` role.
//!
//! # Responses
//!
//! Every endpoint except `/health` answers with the envelope
//! `{"status":"success","data":...}` or `{"status":"failed","message":...}`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Read-only handlers are async for the router

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod state;
pub mod validate;

pub use auth::{AuthUser, CoachUser, TokenIssuer};
pub use config::ServiceConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
