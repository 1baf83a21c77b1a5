//! Transactions service: account movements over a date range.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use crate::client::paginated::PaginatedStream;
use crate::client::{ClientInner, DeleteOutcome};
use crate::Result;

use super::ResumeRequest;

const ENDPOINT: &str = "/api/transactions/";

/// Service for transaction retrieval operations.
///
/// # Example
///
/// ```no_run
/// use belvo_rs::api::TransactionCreateOptions;
///
/// # async fn example(client: belvo_rs::BelvoClient) -> belvo_rs::Result<()> {
/// let transactions = client.transactions().create(
///     "some-link-id",
///     "2026-01-01",
///     TransactionCreateOptions::default(),
/// ).await?;
/// # Ok(())
/// # }
/// ```
pub struct TransactionsService {
    inner: Arc<ClientInner>,
}

/// Optional fields for [`TransactionsService::create`]. Fields left as
/// `None` are omitted from the request body, except `date_to`, which
/// defaults to the current date.
#[derive(Debug, Clone)]
pub struct TransactionCreateOptions {
    /// End of the date range (ISO-8601). Defaults to today when `None`.
    pub date_to: Option<String>,
    /// Restrict retrieval to a single account id.
    pub account: Option<String>,
    /// One-time MFA token.
    pub token: Option<String>,
    /// Public key to encrypt the stored credentials with.
    pub encryption_key: Option<String>,
    /// Whether Belvo should persist the retrieved data. Defaults to `true`.
    pub save_data: bool,
}

impl Default for TransactionCreateOptions {
    fn default() -> Self {
        Self {
            date_to: None,
            account: None,
            token: None,
            encryption_key: None,
            save_data: true,
        }
    }
}

impl TransactionsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Lazily list every retrieved transaction.
    pub fn list(&self) -> Result<PaginatedStream> {
        PaginatedStream::start::<()>(self.inner.clone(), ENDPOINT, None)
    }

    /// Lazily list transactions matching the given query filters.
    pub fn list_filtered<Q: Serialize + ?Sized>(&self, filters: &Q) -> Result<PaginatedStream> {
        PaginatedStream::start(self.inner.clone(), ENDPOINT, Some(filters))
    }

    /// Get a single transaction by id.
    pub async fn get(&self, id: &str) -> Result<Value> {
        self.inner.get_record::<()>(ENDPOINT, id, None).await
    }

    /// Trigger transaction retrieval for a link over a date range.
    ///
    /// `date_from` is ISO-8601 (`YYYY-MM-DD`); the range ends at
    /// `options.date_to`, or today when omitted.
    pub async fn create(
        &self,
        link: &str,
        date_from: &str,
        options: TransactionCreateOptions,
    ) -> Result<Value> {
        #[derive(Serialize)]
        struct Request<'a> {
            link: &'a str,
            date_from: &'a str,
            date_to: String,
            save_data: bool,
            #[serde(skip_serializing_if = "Option::is_none")]
            account: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            token: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            encryption_key: Option<String>,
        }

        let date_to = options
            .date_to
            .unwrap_or_else(|| Utc::now().date_naive().to_string());

        self.inner
            .post(
                ENDPOINT,
                &Request {
                    link,
                    date_from,
                    date_to,
                    save_data: options.save_data,
                    account: options.account,
                    token: options.token,
                    encryption_key: options.encryption_key,
                },
            )
            .await
    }

    /// Continue an MFA-gated transaction retrieval with a one-time token.
    pub async fn resume(
        &self,
        session_token: &str,
        token: &str,
        link: Option<&str>,
    ) -> Result<Value> {
        self.inner
            .patch(
                ENDPOINT,
                &ResumeRequest {
                    session: session_token,
                    token,
                    link,
                },
            )
            .await
    }

    /// Delete retrieved transaction data.
    pub async fn delete(&self, id: &str) -> Result<DeleteOutcome> {
        self.inner.delete(ENDPOINT, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_to_defaults_to_today() {
        let options = TransactionCreateOptions::default();
        let date_to = options
            .date_to
            .unwrap_or_else(|| Utc::now().date_naive().to_string());

        assert_eq!(date_to, Utc::now().date_naive().to_string());
    }
}
