//! Catalog endpoints: sort, search, add, delete, rent and return

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::AppResult,
    models::{
        item::{BookNameRequest, SortParams},
        ActionResponse, MediaItem, NewMediaItem, SearchQuery,
    },
    AppState,
};

use super::{ApiJson, ApiQuery, OptionalJson};

/// List all items, optionally sorted
#[utoipa::path(
    get,
    path = "/sort",
    tag = "catalog",
    params(SortParams),
    responses(
        (status = 200, description = "All items", body = [MediaItem]),
        (status = 400, description = "Malformed JSON body", body = ActionResponse)
    )
)]
pub async fn sort_items(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SortParams>,
    OptionalJson(body): OptionalJson<SortParams>,
) -> AppResult<Json<Vec<MediaItem>>> {
    let by = params.by.or_else(|| body.and_then(|b| b.by));
    let items = state.services.catalog.list_items(by.as_deref())?;
    Ok(Json(items))
}

/// Search items with query-string filters
#[utoipa::path(
    get,
    path = "/search",
    tag = "catalog",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching items", body = [MediaItem])
    )
)]
pub async fn search_items(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> AppResult<Json<Vec<MediaItem>>> {
    let items = state.services.catalog.search_items(&query)?;
    Ok(Json(items))
}

/// Search items with filters sent as a JSON body
#[utoipa::path(
    post,
    path = "/search",
    tag = "catalog",
    request_body(content = SearchQuery, description = "Filters; the body may be omitted"),
    responses(
        (status = 200, description = "Matching items", body = [MediaItem]),
        (status = 400, description = "Malformed JSON body", body = ActionResponse)
    )
)]
pub async fn search_items_json(
    State(state): State<AppState>,
    OptionalJson(body): OptionalJson<SearchQuery>,
) -> AppResult<Json<Vec<MediaItem>>> {
    let query = body.unwrap_or_default();
    let items = state.services.catalog.search_items(&query)?;
    Ok(Json(items))
}

/// Add a new item
#[utoipa::path(
    post,
    path = "/media",
    tag = "catalog",
    request_body = NewMediaItem,
    responses(
        (status = 200, description = "Item added", body = ActionResponse),
        (status = 400, description = "Missing field or duplicate name", body = ActionResponse)
    )
)]
pub async fn add_item(
    State(state): State<AppState>,
    ApiJson(item): ApiJson<NewMediaItem>,
) -> AppResult<Json<ActionResponse>> {
    state.services.catalog.add_item(item)?;
    Ok(Json(ActionResponse::ok("Book added successfully!")))
}

/// Delete an item by name (case-insensitive)
#[utoipa::path(
    delete,
    path = "/media/{name}",
    tag = "catalog",
    params(
        ("name" = String, Path, description = "Item name")
    ),
    responses(
        (status = 200, description = "Item deleted", body = ActionResponse),
        (status = 404, description = "Item not found", body = ActionResponse)
    )
)]
pub async fn delete_item(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<ActionResponse>> {
    state.services.catalog.delete_item(&name)?;
    Ok(Json(ActionResponse::ok("Book deleted successfully!")))
}

/// Rent an available item
#[utoipa::path(
    post,
    path = "/rent",
    tag = "catalog",
    request_body = BookNameRequest,
    responses(
        (status = 200, description = "Item rented", body = ActionResponse),
        (status = 400, description = "Already rented or name missing", body = ActionResponse),
        (status = 404, description = "Item not found", body = ActionResponse)
    )
)]
pub async fn rent_item(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<BookNameRequest>,
) -> AppResult<Json<ActionResponse>> {
    let name = state.services.catalog.rent_item(request.book_name.as_deref())?;
    Ok(Json(ActionResponse::ok(format!("You have rented '{}'!", name))))
}

/// Return a rented item
#[utoipa::path(
    post,
    path = "/return",
    tag = "catalog",
    request_body = BookNameRequest,
    responses(
        (status = 200, description = "Item returned", body = ActionResponse),
        (status = 400, description = "Already available or name missing", body = ActionResponse),
        (status = 404, description = "Item not found", body = ActionResponse)
    )
)]
pub async fn return_item(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<BookNameRequest>,
) -> AppResult<Json<ActionResponse>> {
    let name = state.services.catalog.return_item(request.book_name.as_deref())?;
    Ok(Json(ActionResponse::ok(format!("You have returned '{}'!", name))))
}
