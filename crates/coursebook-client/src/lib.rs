//! Coursebook Client SDK.
//!
//! A typed client for the coursebook HTTP API. Success envelopes are unwrapped
//! into the response types in this crate; failure envelopes become
//! [`ClientError`] values.
//!
//! # Example
//!
//! ```no_run
//! use coursebook_client::CoursebookClient;
//!
//! # async fn example() -> Result<(), coursebook_client::ClientError> {
//! let client = CoursebookClient::new("http://localhost:8080")?;
//!
//! let login = client.login("member@example.com", "Passw0rdOk").await?;
//! let client = client.with_token(login.token);
//!
//! let summary = client.credit_summary().await?;
//! println!("{} credits left", summary.remaining_credits);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
mod types;

pub use client::{ClientOptions, CoursebookClient};
pub use error::ClientError;
pub use types::*;
