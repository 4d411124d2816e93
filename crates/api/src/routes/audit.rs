//! Route definitions for audit trail queries.

use axum::routing::get;
use axum::Router;

use crate::handlers::audit;
use crate::state::AppState;

/// ```text
/// GET /transactions                     -> list_transactions
/// GET /transactions/{tuid}              -> get_transaction
/// GET /transactions/{tuid}/operations   -> transaction_operations
/// GET /operations                       -> list_operations
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(audit::list_transactions))
        .route("/transactions/{tuid}", get(audit::get_transaction))
        .route(
            "/transactions/{tuid}/operations",
            get(audit::transaction_operations),
        )
        .route("/operations", get(audit::list_operations))
}
