//! HTTP client and service layer for the Belvo API.
//!
//! This module provides the main entry point [`BelvoClient`] for
//! interacting with the Belvo API.
//!
//! # Example
//!
//! ```no_run
//! use belvo_rs::BelvoClient;
//!
//! # async fn example() -> belvo_rs::Result<()> {
//! let client = BelvoClient::login(
//!     "https://sandbox.belvo.com",
//!     "your-secret-id",
//!     "your-secret-password",
//! ).await?;
//!
//! let account = client.accounts().get("some-account-id").await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod http;
pub mod paginated;

pub use config::ClientConfig;
pub use http::{BelvoClient, DeleteOutcome};
pub use paginated::PaginatedStream;
pub(crate) use http::ClientInner;
