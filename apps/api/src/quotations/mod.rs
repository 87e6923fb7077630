// Quotation records: raw item lists in storage, documents derived on read.

pub mod handlers;
pub mod store;

pub use store::{PgQuotationStore, QuotationStore};
