//! API service modules for Belvo resources.
//!
//! Each service binds one REST collection path and exposes the operations
//! that resource supports. Operations a resource does not support (deleting
//! an institution, resuming an invoice retrieval) simply do not exist on its
//! service type, so misuse is caught at compile time.

use serde::Serialize;

mod accounts;
mod institutions;
mod invoices;
mod links;
mod owners;
mod tax_returns;
mod transactions;

pub use accounts::{AccountCreateOptions, AccountsService};
pub use institutions::InstitutionsService;
pub use invoices::{InvoiceCreateOptions, InvoicesService};
pub use links::{LinkCreateOptions, LinkUpdateOptions, LinksService};
pub use owners::{OwnerCreateOptions, OwnersService};
pub use tax_returns::{TaxReturnCreateOptions, TaxReturnsService};
pub use transactions::{TransactionCreateOptions, TransactionsService};

/// Body for resuming an MFA-gated request. `link` is included only when the
/// caller supplies it.
#[derive(Debug, Serialize)]
pub(crate) struct ResumeRequest<'a> {
    pub session: &'a str,
    pub token: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<&'a str>,
}
