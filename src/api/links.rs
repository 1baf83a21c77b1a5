//! Links service: connections between Belvo and an end user's institution
//! credentials.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::client::paginated::PaginatedStream;
use crate::client::{ClientInner, DeleteOutcome};
use crate::Result;

use super::ResumeRequest;

const ENDPOINT: &str = "/api/links/";

/// Service for link registration and maintenance.
///
/// # Example
///
/// ```no_run
/// use belvo_rs::api::LinkCreateOptions;
///
/// # async fn example(client: belvo_rs::BelvoClient) -> belvo_rs::Result<()> {
/// let link = client.links().create(
///     "banamex_mx_retail",
///     "bank-username",
///     "bank-password",
///     LinkCreateOptions::default(),
/// ).await?;
/// println!("{}", link);
/// # Ok(())
/// # }
/// ```
pub struct LinksService {
    inner: Arc<ClientInner>,
}

/// Optional fields for [`LinksService::create`]. Optional fields left as
/// `None` are omitted from the request body entirely.
#[derive(Debug, Clone)]
pub struct LinkCreateOptions {
    /// One-time MFA token, when the institution demands one up front.
    pub token: Option<String>,
    /// Public key to encrypt the stored credentials with.
    pub encryption_key: Option<String>,
    /// Whether Belvo should persist the retrieved data. Defaults to `true`.
    pub save_data: bool,
}

impl Default for LinkCreateOptions {
    fn default() -> Self {
        Self {
            token: None,
            encryption_key: None,
            save_data: true,
        }
    }
}

/// Optional fields for [`LinksService::update`].
#[derive(Debug, Clone)]
pub struct LinkUpdateOptions {
    /// Secondary password, for institutions that use one.
    pub password2: Option<String>,
    /// One-time MFA token.
    pub token: Option<String>,
    /// Public key to encrypt the stored credentials with.
    pub encryption_key: Option<String>,
    /// Whether Belvo should persist the retrieved data. Defaults to `true`.
    pub save_data: bool,
}

impl Default for LinkUpdateOptions {
    fn default() -> Self {
        Self {
            password2: None,
            token: None,
            encryption_key: None,
            save_data: true,
        }
    }
}

impl LinksService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Lazily list every registered link.
    pub fn list(&self) -> Result<PaginatedStream> {
        PaginatedStream::start::<()>(self.inner.clone(), ENDPOINT, None)
    }

    /// Lazily list links matching the given query filters.
    pub fn list_filtered<Q: Serialize + ?Sized>(&self, filters: &Q) -> Result<PaginatedStream> {
        PaginatedStream::start(self.inner.clone(), ENDPOINT, Some(filters))
    }

    /// Get a single link by id.
    pub async fn get(&self, id: &str) -> Result<Value> {
        self.inner.get_record::<()>(ENDPOINT, id, None).await
    }

    /// Register a new link with an institution.
    ///
    /// The response is either the created link record or an intermediate
    /// object demanding an MFA token, to be completed with
    /// [`resume`](Self::resume).
    pub async fn create(
        &self,
        institution: &str,
        username: &str,
        password: &str,
        options: LinkCreateOptions,
    ) -> Result<Value> {
        #[derive(Serialize)]
        struct Request<'a> {
            institution: &'a str,
            username: &'a str,
            password: &'a str,
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
                    institution,
                    username,
                    password,
                    save_data: options.save_data,
                    token: options.token,
                    encryption_key: options.encryption_key,
                },
            )
            .await
    }

    /// Rotate the stored credentials of an existing link.
    pub async fn update(
        &self,
        link_id: &str,
        password: &str,
        options: LinkUpdateOptions,
    ) -> Result<Value> {
        #[derive(Serialize)]
        struct Request<'a> {
            password: &'a str,
            save_data: bool,
            #[serde(skip_serializing_if = "Option::is_none")]
            password2: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            token: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            encryption_key: Option<String>,
        }

        self.inner
            .put(
                ENDPOINT,
                link_id,
                &Request {
                    password,
                    save_data: options.save_data,
                    password2: options.password2,
                    token: options.token,
                    encryption_key: options.encryption_key,
                },
            )
            .await
    }

    /// Continue an MFA-gated link registration with a one-time token.
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

    /// Delete a link. The outcome follows the HTTP status; a non-2xx answer
    /// is reported, not raised.
    pub async fn delete(&self, id: &str) -> Result<DeleteOutcome> {
        self.inner.delete(ENDPOINT, id).await
    }
}
