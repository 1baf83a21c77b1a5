//! HTTP client implementation for the Belvo API.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::api::{
    AccountsService, InstitutionsService, InvoicesService, LinksService, OwnersService,
    TaxReturnsService, TransactionsService,
};
use crate::auth::Session;
use crate::{Error, Result};

use super::config::ClientConfig;
use super::paginated::{ListPage, PaginatedStream};

/// Outcome of a delete request.
///
/// The API reports delete failure purely through the HTTP status code, so a
/// rejected delete is an ordinary outcome rather than an error. Transport
/// failures still surface as [`crate::Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum DeleteOutcome {
    /// The API answered 2xx; the resource is gone.
    Deleted,
    /// The API answered with a non-2xx status.
    Rejected,
}

impl DeleteOutcome {
    /// Returns `true` if the resource was deleted.
    pub fn is_deleted(&self) -> bool {
        matches!(self, DeleteOutcome::Deleted)
    }
}

/// The main client for interacting with the Belvo API.
///
/// The client wraps an authenticated [`Session`] and exposes one service per
/// API resource, plus the raw HTTP verbs for endpoints this crate does not
/// model. Response bodies are passed through as untyped [`serde_json::Value`]
/// records, exactly as the API returns them.
///
/// # Example
///
/// ```no_run
/// use futures_util::StreamExt;
/// use belvo_rs::BelvoClient;
///
/// # async fn example() -> belvo_rs::Result<()> {
/// let client = BelvoClient::login(
///     "https://sandbox.belvo.com",
///     "your-secret-id",
///     "your-secret-password",
/// ).await?;
///
/// let mut links = client.links().list()?;
/// while let Some(link) = links.next().await {
///     println!("{}", link?);
/// }
/// # Ok(())
/// # }
/// ```
pub struct BelvoClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) http: reqwest::Client,
    pub(crate) session: Session,
    pub(crate) config: ClientConfig,
}

impl BelvoClient {
    /// Create a client by logging in with username/password credentials.
    ///
    /// Rejected credentials surface as [`Error::Authentication`]. To handle
    /// rejection without an error, drive a [`Session`] directly and use
    /// [`with_session`](Self::with_session).
    pub async fn login(
        base_url: impl AsRef<str>,
        username: &str,
        password: &str,
    ) -> Result<Self> {
        let session = Session::new(base_url)?;
        if !session.login(username, password).await?.is_logged_in() {
            return Err(Error::Authentication(
                "token endpoint rejected the credentials".to_string(),
            ));
        }
        Self::with_session(session, ClientConfig::default())
    }

    /// Create a client from a previously obtained token pair.
    ///
    /// No network call is made; the tokens are installed as-is.
    pub async fn with_tokens(
        base_url: impl AsRef<str>,
        access: impl Into<String>,
        refresh: impl Into<String>,
    ) -> Result<Self> {
        let session = Session::new(base_url)?;
        session.set_tokens(access, refresh).await;
        Self::with_session(session, ClientConfig::default())
    }

    /// Create a client from an existing session and custom configuration.
    pub fn with_session(session: Session, config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                session,
                config,
            }),
        })
    }

    /// Get the links service.
    pub fn links(&self) -> LinksService {
        LinksService::new(self.inner.clone())
    }

    /// Get the accounts service.
    pub fn accounts(&self) -> AccountsService {
        AccountsService::new(self.inner.clone())
    }

    /// Get the transactions service.
    pub fn transactions(&self) -> TransactionsService {
        TransactionsService::new(self.inner.clone())
    }

    /// Get the institutions service (read-only).
    pub fn institutions(&self) -> InstitutionsService {
        InstitutionsService::new(self.inner.clone())
    }

    /// Get the owners service.
    pub fn owners(&self) -> OwnersService {
        OwnersService::new(self.inner.clone())
    }

    /// Get the invoices service.
    pub fn invoices(&self) -> InvoicesService {
        InvoicesService::new(self.inner.clone())
    }

    /// Get the tax returns service.
    pub fn tax_returns(&self) -> TaxReturnsService {
        TaxReturnsService::new(self.inner.clone())
    }

    /// Get a reference to the session.
    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    /// Fetch a single record from `{base}{endpoint}{id}/`.
    pub async fn get<Q: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        id: &str,
        query: Option<&Q>,
    ) -> Result<Value> {
        self.inner.get_record(endpoint, id, query).await
    }

    /// Lazily iterate every record of a collection, following `next` links.
    pub fn list<Q: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        filters: Option<&Q>,
    ) -> Result<PaginatedStream> {
        PaginatedStream::start(self.inner.clone(), endpoint, filters)
    }

    /// POST a payload to a collection endpoint and return the decoded body.
    pub async fn post<B: Serialize + ?Sized>(&self, endpoint: &str, body: &B) -> Result<Value> {
        self.inner.post(endpoint, body).await
    }

    /// PUT a payload to `{base}{endpoint}{id}/` and return the decoded body.
    pub async fn put<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        id: &str,
        body: &B,
    ) -> Result<Value> {
        self.inner.put(endpoint, id, body).await
    }

    /// PATCH a payload to a collection endpoint and return the decoded body.
    pub async fn patch<B: Serialize + ?Sized>(&self, endpoint: &str, body: &B) -> Result<Value> {
        self.inner.patch(endpoint, body).await
    }

    /// DELETE `{base}{endpoint}{id}/`, reporting the outcome by status.
    pub async fn delete(&self, endpoint: &str, id: &str) -> Result<DeleteOutcome> {
        self.inner.delete(endpoint, id).await
    }
}

impl ClientInner {
    /// Collection URL: `{base}{endpoint}` with the endpoint's own slashes.
    pub(crate) fn collection_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.session.base_url(), endpoint)
    }

    /// Single-resource URL: `{base}{endpoint}/{id}/`. The trailing slash is
    /// significant to the API.
    pub(crate) fn resource_url(&self, endpoint: &str, id: &str) -> String {
        format!(
            "{}{}/{}/",
            self.session.base_url(),
            endpoint.trim_end_matches('/'),
            id
        )
    }

    /// Build request headers, attaching the bearer credential if logged in.
    pub(crate) async fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        if let Some(bearer) = self.session.bearer_header().await {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&bearer)
                    .map_err(|_| Error::InvalidInput("invalid token format".to_string()))?,
            );
        }

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(headers)
    }

    /// Fetch one record by id.
    ///
    /// The body is decoded and returned whatever the status; the API reports
    /// request errors inside the body.
    pub(crate) async fn get_record<Q: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        id: &str,
        query: Option<&Q>,
    ) -> Result<Value> {
        let url = self.resource_url(endpoint, id);
        let headers = self.build_headers().await?;
        tracing::debug!(%url, "GET record");

        let mut request = self.http.get(&url).headers(headers);
        if let Some(query) = query {
            request = request.query(query);
        }

        Ok(request.send().await?.json().await?)
    }

    /// Fetch one page of a listing from an absolute URL.
    pub(crate) async fn fetch_page(&self, url: String) -> Result<ListPage> {
        let headers = self.build_headers().await?;
        tracing::debug!(%url, "GET page");

        let page: ListPage = self
            .http
            .get(&url)
            .headers(headers)
            .send()
            .await?
            .json()
            .await?;
        Ok(page)
    }

    /// POST to a collection endpoint, returning the decoded body whatever
    /// its shape or status (MFA polling flows answer with either a record
    /// list or an intermediate session object).
    pub(crate) async fn post<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<Value> {
        let url = self.collection_url(endpoint);
        let headers = self.build_headers().await?;
        tracing::debug!(%url, "POST");

        Ok(self
            .http
            .post(&url)
            .headers(headers)
            .json(body)
            .send()
            .await?
            .json()
            .await?)
    }

    /// PUT to a single-resource URL, returning the decoded body.
    pub(crate) async fn put<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        id: &str,
        body: &B,
    ) -> Result<Value> {
        let url = self.resource_url(endpoint, id);
        let headers = self.build_headers().await?;
        tracing::debug!(%url, "PUT");

        Ok(self
            .http
            .put(&url)
            .headers(headers)
            .json(body)
            .send()
            .await?
            .json()
            .await?)
    }

    /// PATCH to a collection endpoint, returning the decoded body.
    pub(crate) async fn patch<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<Value> {
        let url = self.collection_url(endpoint);
        let headers = self.build_headers().await?;
        tracing::debug!(%url, "PATCH");

        Ok(self
            .http
            .patch(&url)
            .headers(headers)
            .json(body)
            .send()
            .await?
            .json()
            .await?)
    }

    /// DELETE a single resource. The outcome follows the status code; the
    /// response body is discarded either way.
    pub(crate) async fn delete(&self, endpoint: &str, id: &str) -> Result<DeleteOutcome> {
        let url = self.resource_url(endpoint, id);
        let headers = self.build_headers().await?;
        tracing::debug!(%url, "DELETE");

        let response = self.http.delete(&url).headers(headers).send().await?;

        if response.status().is_success() {
            Ok(DeleteOutcome::Deleted)
        } else {
            tracing::debug!(status = %response.status(), "delete rejected");
            Ok(DeleteOutcome::Rejected)
        }
    }
}

impl Clone for BelvoClient {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl std::fmt::Debug for BelvoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BelvoClient")
            .field("session", &self.inner.session)
            .field("config", &self.inner.config)
            .finish()
    }
}
