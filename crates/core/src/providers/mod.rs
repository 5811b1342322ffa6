pub mod embedded;
pub mod http;
pub mod traits;

use crate::errors::CoreError;
use crate::models::detail::{DetailRequest, DetailSupplement};
use traits::DetailProvider;

/// Run the fetch for a started detail request. The result is handed back
/// to `LedgerView::complete_detail`, which drops it if a newer request
/// has been started in the meantime.
pub async fn fetch_detail(
    provider: &dyn DetailProvider,
    request: &DetailRequest,
) -> Result<DetailSupplement, CoreError> {
    log::debug!(
        "Fetching detail for {} via {} (token {})",
        request.record.id(),
        provider.name(),
        request.token.0
    );
    provider.fetch_detail(request.record.id()).await
}
