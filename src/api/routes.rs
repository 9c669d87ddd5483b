//! API route configuration.

use crate::api::handlers::{
    delete_handler, list_handler, redirect_handler, shorten_handler, stats_handler,
    update_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// Mapping routes.
///
/// # Endpoints
///
/// - `POST   /shorten`               - Create a short code for a URL
/// - `GET    /shorten`               - List all mappings
/// - `GET    /shorten/{code}`        - Redirect to the mapped URL (counts an access)
/// - `PUT    /shorten/{code}`        - Replace the mapped URL
/// - `DELETE /shorten/{code}`        - Delete the mapping
/// - `GET    /shorten/{code}/stats`  - Mapping with its access count
pub fn mapping_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", get(list_handler).post(shorten_handler))
        .route(
            "/shorten/{code}",
            get(redirect_handler)
                .put(update_handler)
                .delete(delete_handler),
        )
        .route("/shorten/{code}/stats", get(stats_handler))
}
