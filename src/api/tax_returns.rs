//! Tax returns service: yearly fiscal filings retrieved through a link.
//!
//! Tax return retrieval cannot require MFA resumption, so there is no
//! `resume` here.

use std::sync::Arc;

use chrono::{Datelike, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::client::paginated::PaginatedStream;
use crate::client::{ClientInner, DeleteOutcome};
use crate::Result;

const ENDPOINT: &str = "/api/tax-returns/";

/// Service for tax return retrieval operations.
pub struct TaxReturnsService {
    inner: Arc<ClientInner>,
}

/// Optional fields for [`TaxReturnsService::create`]. Fields left as `None`
/// are omitted from the request body, except `year_to`, which defaults to
/// the current year.
#[derive(Debug, Clone)]
pub struct TaxReturnCreateOptions {
    /// Last filing year to retrieve. Defaults to the current year.
    pub year_to: Option<i32>,
    /// Whether to attach the filing PDF to each record. Defaults to `false`.
    pub attach_pdf: bool,
    /// Public key to encrypt the stored credentials with.
    pub encryption_key: Option<String>,
    /// Whether Belvo should persist the retrieved data. Defaults to `true`.
    pub save_data: bool,
}

impl Default for TaxReturnCreateOptions {
    fn default() -> Self {
        Self {
            year_to: None,
            attach_pdf: false,
            encryption_key: None,
            save_data: true,
        }
    }
}

impl TaxReturnsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Lazily list every retrieved tax return.
    pub fn list(&self) -> Result<PaginatedStream> {
        PaginatedStream::start::<()>(self.inner.clone(), ENDPOINT, None)
    }

    /// Lazily list tax returns matching the given query filters.
    pub fn list_filtered<Q: Serialize + ?Sized>(&self, filters: &Q) -> Result<PaginatedStream> {
        PaginatedStream::start(self.inner.clone(), ENDPOINT, Some(filters))
    }

    /// Get a single tax return by id.
    pub async fn get(&self, id: &str) -> Result<Value> {
        self.inner.get_record::<()>(ENDPOINT, id, None).await
    }

    /// Trigger tax return retrieval for a link over a year range.
    ///
    /// The range ends at `options.year_to`, or the current year when
    /// omitted.
    pub async fn create(
        &self,
        link: &str,
        year_from: i32,
        options: TaxReturnCreateOptions,
    ) -> Result<Value> {
        #[derive(Serialize)]
        struct Request<'a> {
            link: &'a str,
            year_from: i32,
            year_to: i32,
            attach_pdf: bool,
            save_data: bool,
            #[serde(skip_serializing_if = "Option::is_none")]
            encryption_key: Option<String>,
        }

        let year_to = options.year_to.unwrap_or_else(|| Utc::now().year());

        self.inner
            .post(
                ENDPOINT,
                &Request {
                    link,
                    year_from,
                    year_to,
                    attach_pdf: options.attach_pdf,
                    save_data: options.save_data,
                    encryption_key: options.encryption_key,
                },
            )
            .await
    }

    /// Delete retrieved tax return data.
    pub async fn delete(&self, id: &str) -> Result<DeleteOutcome> {
        self.inner.delete(ENDPOINT, id).await
    }
}
