//! Invoices service: fiscal invoices issued or received through a link.
//!
//! Invoice retrieval cannot require MFA resumption, so there is no `resume`
//! here.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::client::paginated::PaginatedStream;
use crate::client::{ClientInner, DeleteOutcome};
use crate::Result;

const ENDPOINT: &str = "/api/invoices/";

/// Service for invoice retrieval operations.
pub struct InvoicesService {
    inner: Arc<ClientInner>,
}

/// Optional fields for [`InvoicesService::create`]. Fields left as `None`
/// are omitted from the request body entirely.
#[derive(Debug, Clone)]
pub struct InvoiceCreateOptions {
    /// Public key to encrypt the stored credentials with.
    pub encryption_key: Option<String>,
    /// Whether Belvo should persist the retrieved data. Defaults to `true`.
    pub save_data: bool,
}

impl Default for InvoiceCreateOptions {
    fn default() -> Self {
        Self {
            encryption_key: None,
            save_data: true,
        }
    }
}

impl InvoicesService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Lazily list every retrieved invoice.
    pub fn list(&self) -> Result<PaginatedStream> {
        PaginatedStream::start::<()>(self.inner.clone(), ENDPOINT, None)
    }

    /// Lazily list invoices matching the given query filters.
    pub fn list_filtered<Q: Serialize + ?Sized>(&self, filters: &Q) -> Result<PaginatedStream> {
        PaginatedStream::start(self.inner.clone(), ENDPOINT, Some(filters))
    }

    /// Get a single invoice by id.
    pub async fn get(&self, id: &str) -> Result<Value> {
        self.inner.get_record::<()>(ENDPOINT, id, None).await
    }

    /// Trigger invoice retrieval for a link over a date range.
    ///
    /// `kind` is the invoice direction, `"INFLOW"` or `"OUTFLOW"`, sent as
    /// the `type` field.
    pub async fn create(
        &self,
        link: &str,
        date_from: &str,
        date_to: &str,
        kind: &str,
        options: InvoiceCreateOptions,
    ) -> Result<Value> {
        #[derive(Serialize)]
        struct Request<'a> {
            link: &'a str,
            date_from: &'a str,
            date_to: &'a str,
            #[serde(rename = "type")]
            kind: &'a str,
            save_data: bool,
            #[serde(skip_serializing_if = "Option::is_none")]
            encryption_key: Option<String>,
        }

        self.inner
            .post(
                ENDPOINT,
                &Request {
                    link,
                    date_from,
                    date_to,
                    kind,
                    save_data: options.save_data,
                    encryption_key: options.encryption_key,
                },
            )
            .await
    }

    /// Delete retrieved invoice data.
    pub async fn delete(&self, id: &str) -> Result<DeleteOutcome> {
        self.inner.delete(ENDPOINT, id).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    #[test]
    fn test_kind_serializes_as_type_field() {
        #[derive(serde::Serialize)]
        struct Probe<'a> {
            #[serde(rename = "type")]
            kind: &'a str,
        }

        let body = serde_json::to_value(Probe { kind: "INFLOW" }).unwrap();
        assert_eq!(body, json!({"type": "INFLOW"}));
    }
}
