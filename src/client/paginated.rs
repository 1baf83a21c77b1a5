//! Paginated stream for lazy iteration over listing results.
//!
//! List endpoints answer with a `{results, next, count}` envelope where
//! `next` is the absolute URL of the following page, or null on the last
//! one. [`PaginatedStream`] follows those links on demand and yields the
//! concatenation of every page's `results` in server order.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::Stream;
use serde::Serialize;
use serde_json::Value;

use super::ClientInner;
use crate::Result;

/// One page of a listing, as returned by the API.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ListPage {
    /// Records on this page, in server order.
    pub results: Vec<Value>,
    /// Absolute URL of the next page; null on the last page.
    pub next: Option<String>,
    /// Total record count across all pages.
    #[serde(default)]
    #[allow(dead_code)]
    pub count: Option<u64>,
}

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A stream that lazily fetches pages of records from a listing endpoint.
///
/// Each page is requested only once the previous one is exhausted, and
/// follow-up requests go to the **literal** `next` URL the server returned,
/// not to a URL reconstructed from parameters. The stream is finite,
/// forward-only, and consumed exactly once; it cannot be restarted. After
/// yielding an error it terminates.
///
/// # Example
///
/// ```no_run
/// use futures_util::StreamExt;
///
/// # async fn example(client: belvo_rs::BelvoClient) -> belvo_rs::Result<()> {
/// let mut transactions = client.transactions().list()?;
///
/// while let Some(record) = transactions.next().await {
///     println!("{}", record?);
/// }
/// # Ok(())
/// # }
/// ```
pub struct PaginatedStream {
    inner: Arc<ClientInner>,
    /// Records of the current page not yet yielded.
    buffered: VecDeque<Value>,
    /// URL of the next page to fetch; None once exhausted.
    next_url: Option<String>,
    /// Current in-flight page fetch.
    pending: Option<BoxFuture<'static, Result<ListPage>>>,
}

impl PaginatedStream {
    /// Start a listing over `{base}{endpoint}` with the given filters as
    /// query parameters on the first request only; later pages carry
    /// whatever the server's `next` URL says.
    pub(crate) fn start<Q: Serialize + ?Sized>(
        inner: Arc<ClientInner>,
        endpoint: &str,
        filters: Option<&Q>,
    ) -> Result<Self> {
        let mut request = inner.http.get(inner.collection_url(endpoint));
        if let Some(filters) = filters {
            request = request.query(filters);
        }
        let first_url = request.build()?.url().to_string();

        Ok(Self {
            inner,
            buffered: VecDeque::new(),
            next_url: Some(first_url),
            pending: None,
        })
    }
}

impl Stream for PaginatedStream {
    type Item = Result<Value>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;

        loop {
            // Yield from the current page first.
            if let Some(record) = this.buffered.pop_front() {
                return Poll::Ready(Some(Ok(record)));
            }

            // Page exhausted; drive the in-flight fetch if there is one.
            if let Some(fut) = this.pending.as_mut() {
                match fut.as_mut().poll(cx) {
                    Poll::Ready(Ok(page)) => {
                        this.pending = None;
                        this.buffered = page.results.into();
                        this.next_url = page.next;

                        // An empty page with a continuation still advances;
                        // the stream only ends once `next` is null.
                        if this.buffered.is_empty() && this.next_url.is_none() {
                            return Poll::Ready(None);
                        }
                        continue;
                    }
                    Poll::Ready(Err(e)) => {
                        this.pending = None;
                        this.next_url = None; // terminate on error
                        return Poll::Ready(Some(Err(e)));
                    }
                    Poll::Pending => return Poll::Pending,
                }
            }

            // No fetch in flight; start one if a continuation remains.
            match this.next_url.take() {
                Some(url) => {
                    let inner = this.inner.clone();
                    this.pending = Some(Box::pin(async move { inner.fetch_page(url).await }));
                    continue;
                }
                None => return Poll::Ready(None),
            }
        }
    }
}

impl Unpin for PaginatedStream {}

impl std::fmt::Debug for PaginatedStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginatedStream")
            .field("buffered", &self.buffered.len())
            .field("next_url", &self.next_url)
            .finish()
    }
}
