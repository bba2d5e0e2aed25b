//! OpenAPI documentation

use axum::Json;
use utoipa::OpenApi;

use crate::api::{catalog, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Media Catalog API",
        description = "In-memory book catalog with rent/return tracking"
    ),
    paths(
        // Health
        health::index,
        health::health_check,
        health::readiness_check,
        // Catalog
        catalog::sort_items,
        catalog::search_items,
        catalog::search_items_json,
        catalog::add_item,
        catalog::delete_item,
        catalog::rent_item,
        catalog::return_item,
    ),
    components(
        schemas(
            health::HealthResponse,
            crate::models::item::MediaItem,
            crate::models::item::NewMediaItem,
            crate::models::item::BookNameRequest,
            crate::models::item::SearchQuery,
            crate::models::item::SortParams,
            crate::models::response::ActionResponse,
        )
    ),
    tags(
        (name = "health", description = "Liveness and health"),
        (name = "catalog", description = "Catalog queries and mutations")
    )
)]
pub struct ApiDoc;

/// Serve the OpenAPI document
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
