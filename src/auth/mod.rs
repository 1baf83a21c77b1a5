//! Authentication and session management for the Belvo API.
//!
//! A [`Session`] exchanges username/password for a JWT pair at the token
//! endpoint and carries it as a bearer credential on every request:
//!
//! ```no_run
//! use belvo_rs::Session;
//!
//! # async fn example() -> belvo_rs::Result<()> {
//! let session = Session::new("https://sandbox.belvo.com")?;
//! let outcome = session.login("my-secret-id", "my-secret-password").await?;
//! assert!(outcome.is_logged_in());
//! # Ok(())
//! # }
//! ```
//!
//! Tokens obtained elsewhere can be installed directly with
//! [`Session::set_tokens`] to resume a session without a login round trip.

mod session;

pub use session::{LoginOutcome, Session};
