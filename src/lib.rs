//! # belvo-rs
//!
//! A Rust client for the Belvo open finance API.
//!
//! Belvo aggregates banking and fiscal data behind a REST API: you register
//! a *link* against an end user's institution credentials, then retrieve
//! accounts, transactions, owners, invoices, and tax returns through it.
//! This crate wraps that API with a JWT-authenticated session, transparent
//! pagination over list endpoints, and one service per resource.
//!
//! ## Features
//!
//! - **Authentication**: JWT bearer tokens from the `/api/token` endpoint,
//!   or direct installation of a stored token pair
//! - **Transparent pagination**: list endpoints yield a single lazy stream
//!   of records, following the server's `next` links on demand
//! - **MFA flows**: retrievals that come back gated on a one-time token are
//!   completed with `resume` on the same service
//! - **Pass-through records**: responses are returned as untyped JSON,
//!   exactly as the API produced them
//!
//! This is deliberately a thin client: there is no retry, backoff, rate
//! limiting, or request orchestration. Every call is a single HTTP round
//! trip (or one per page).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use futures_util::StreamExt;
//! use belvo_rs::BelvoClient;
//!
//! #[tokio::main]
//! async fn main() -> belvo_rs::Result<()> {
//!     let client = BelvoClient::login(
//!         "https://sandbox.belvo.com",
//!         "your-secret-id",
//!         "your-secret-password",
//!     ).await?;
//!
//!     // Lazily walk every registered link, across pages
//!     let mut links = client.links().list()?;
//!     while let Some(link) = links.next().await {
//!         println!("{}", link?);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## MFA Example
//!
//! ```rust,no_run
//! use belvo_rs::api::LinkCreateOptions;
//!
//! # async fn example(client: belvo_rs::BelvoClient) -> belvo_rs::Result<()> {
//! let response = client.links().create(
//!     "banamex_mx_retail",
//!     "bank-username",
//!     "bank-password",
//!     LinkCreateOptions::default(),
//! ).await?;
//!
//! // The institution may answer with an MFA challenge instead of the link.
//! if let Some(session) = response.get("session").and_then(|s| s.as_str()) {
//!     let token = "123456"; // one-time token from the end user
//!     let link = client.links().resume(session, token, None).await?;
//!     println!("{}", link);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod api;
pub mod auth;
pub mod client;
pub mod error;

// Re-export primary types at crate root for convenience
pub use auth::{LoginOutcome, Session};
pub use client::{BelvoClient, ClientConfig, DeleteOutcome, PaginatedStream};
pub use error::{Error, Result};

/// Prelude module for convenient imports.
///
/// ```rust
/// use belvo_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::api::{
        AccountCreateOptions, AccountsService, InstitutionsService, InvoiceCreateOptions,
        InvoicesService, LinkCreateOptions, LinkUpdateOptions, LinksService, OwnerCreateOptions,
        OwnersService, TaxReturnCreateOptions, TaxReturnsService, TransactionCreateOptions,
        TransactionsService,
    };
    pub use crate::auth::{LoginOutcome, Session};
    pub use crate::client::{BelvoClient, ClientConfig, DeleteOutcome, PaginatedStream};
    pub use crate::error::{Error, Result};
}
