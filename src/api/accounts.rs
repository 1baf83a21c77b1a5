//! Accounts service: bank accounts discovered through a link.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::client::paginated::PaginatedStream;
use crate::client::{ClientInner, DeleteOutcome};
use crate::Result;

use super::ResumeRequest;

const ENDPOINT: &str = "/api/accounts/";

/// Service for account retrieval operations.
pub struct AccountsService {
    inner: Arc<ClientInner>,
}

/// Optional fields for [`AccountsService::create`]. Fields left as `None`
/// are omitted from the request body entirely.
#[derive(Debug, Clone)]
pub struct AccountCreateOptions {
    /// One-time MFA token.
    pub token: Option<String>,
    /// Public key to encrypt the stored credentials with.
    pub encryption_key: Option<String>,
    /// Whether Belvo should persist the retrieved data. Defaults to `true`.
    pub save_data: bool,
}

impl Default for AccountCreateOptions {
    fn default() -> Self {
        Self {
            token: None,
            encryption_key: None,
            save_data: true,
        }
    }
}

impl AccountsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Lazily list every retrieved account.
    pub fn list(&self) -> Result<PaginatedStream> {
        PaginatedStream::start::<()>(self.inner.clone(), ENDPOINT, None)
    }

    /// Lazily list accounts matching the given query filters.
    pub fn list_filtered<Q: Serialize + ?Sized>(&self, filters: &Q) -> Result<PaginatedStream> {
        PaginatedStream::start(self.inner.clone(), ENDPOINT, Some(filters))
    }

    /// Get a single account by id.
    pub async fn get(&self, id: &str) -> Result<Value> {
        self.inner.get_record::<()>(ENDPOINT, id, None).await
    }

    /// Trigger account retrieval for a link.
    ///
    /// Answers with either the retrieved accounts or an intermediate MFA
    /// session object, to be completed with [`resume`](Self::resume).
    pub async fn create(&self, link: &str, options: AccountCreateOptions) -> Result<Value> {
        #[derive(Serialize)]
        struct Request<'a> {
            link: &'a str,
            save_data: bool,
            #[serde(skip_serializing_if = "Option::is_none")]
            token: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            encryption_key: Option<String>,
        }

        self.inner
            .post(
                ENDPOINT,
                &Request {
                    link,
                    save_data: options.save_data,
                    token: options.token,
                    encryption_key: options.encryption_key,
                },
            )
            .await
    }

    /// Continue an MFA-gated account retrieval with a one-time token.
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

    /// Delete a retrieved account.
    pub async fn delete(&self, id: &str) -> Result<DeleteOutcome> {
        self.inner.delete(ENDPOINT, id).await
    }
}
