use std::sync::Arc;

use crate::config::Config;
use crate::layout::PageGeometry;
use crate::quotations::QuotationStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable quotation storage. Default: PgQuotationStore.
    pub quotations: Arc<dyn QuotationStore>,
    #[allow(dead_code)]
    pub config: Config,
    /// Page geometry for the layout engine. Always A4.
    pub geometry: PageGeometry,
}
