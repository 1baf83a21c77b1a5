//! Institutions service: the catalog of supported banks and fiscal
//! institutions.
//!
//! Institutions are a read-only resource; this service intentionally has no
//! `create`, `delete`, or `resume`.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::client::paginated::PaginatedStream;
use crate::client::ClientInner;
use crate::Result;

const ENDPOINT: &str = "/api/institutions/";

/// Service for browsing the institution catalog.
pub struct InstitutionsService {
    inner: Arc<ClientInner>,
}

impl InstitutionsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Lazily list every supported institution.
    pub fn list(&self) -> Result<PaginatedStream> {
        PaginatedStream::start::<()>(self.inner.clone(), ENDPOINT, None)
    }

    /// Lazily list institutions matching the given query filters.
    pub fn list_filtered<Q: Serialize + ?Sized>(&self, filters: &Q) -> Result<PaginatedStream> {
        PaginatedStream::start(self.inner.clone(), ENDPOINT, Some(filters))
    }

    /// Get a single institution by id.
    pub async fn get(&self, id: &str) -> Result<Value> {
        self.inner.get_record::<()>(ENDPOINT, id, None).await
    }
}
