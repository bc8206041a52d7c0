//! Movie endpoints: ranked listings, search, detail, and reviews.

use serde_json::Value;

use crate::errors::ClientError;
use crate::models::list_page::unwrap_data;
use crate::models::pagination::Listing;
use crate::services::collector::collect;
use crate::services::transport::{ApiClient, ApiRequest};

/// Items gathered for the popular and top-rated rows.
pub const RANKED_TARGET: usize = 30;

/// Page size used while collecting ranked rows.
pub const RANKED_PAGE_SIZE: u32 = 12;

/// Size of the top-revenue strip.
pub const TOP_REVENUE_COUNT: u32 = 5;

pub const SEARCH_PAGE_SIZE: u32 = 12;
pub const REVIEWS_PAGE_SIZE: u32 = 10;

const MOST_POPULAR_PATH: &str = "/movies/most-popular";
const TOP_RATED_PATH: &str = "/movies/top-rated";
const SEARCH_PATH: &str = "/movies/search";

/// Top movies by revenue: the first page of the popular endpoint, capped at 5.
pub async fn top_revenue(api: &ApiClient) -> Result<Vec<Value>, ClientError> {
    let page = api
        .fetch_page(ApiRequest::get(MOST_POPULAR_PATH), 1, TOP_REVENUE_COUNT)
        .await?;
    let mut items = page.items;
    items.truncate(TOP_REVENUE_COUNT as usize);
    Ok(items)
}

/// Up to 30 popular movies gathered across pages.
pub async fn popular(api: &ApiClient) -> Result<Vec<Value>, ClientError> {
    ranked(api, MOST_POPULAR_PATH).await
}

/// Up to 30 top-rated movies gathered across pages.
pub async fn top_rated(api: &ApiClient) -> Result<Vec<Value>, ClientError> {
    ranked(api, TOP_RATED_PATH).await
}

async fn ranked(api: &ApiClient, path: &'static str) -> Result<Vec<Value>, ClientError> {
    let collected = collect(
        |page, size| api.fetch_page(ApiRequest::get(path), page, size),
        RANKED_TARGET,
        RANKED_PAGE_SIZE,
    )
    .await?;

    tracing::info!(
        path,
        items = collected.items.len(),
        pages = collected.pages_fetched,
        "Ranked listing collected"
    );
    Ok(collected.items)
}

/// Search movies by title.
pub async fn search(
    api: &ApiClient,
    query: &str,
    page: u32,
    limit: u32,
) -> Result<Listing, ClientError> {
    search_by(api, "title", query, page, limit).await
}

/// Search people by name. The API serves this from the movie search route
/// with a `person` parameter.
pub async fn search_people(
    api: &ApiClient,
    query: &str,
    page: u32,
    limit: u32,
) -> Result<Listing, ClientError> {
    search_by(api, "person", query, page, limit).await
}

async fn search_by(
    api: &ApiClient,
    field: &'static str,
    query: &str,
    page: u32,
    limit: u32,
) -> Result<Listing, ClientError> {
    check_paging(page, limit)?;
    let request = ApiRequest::get(SEARCH_PATH)
        .query(field, query)
        .header(field, query);
    let result = api.fetch_page(request, page, limit).await?;
    Listing::from_page(result)
}

/// Movie detail. An empty id or empty body yields `None`.
pub async fn movie(api: &ApiClient, id: &str) -> Result<Option<Value>, ClientError> {
    if id.trim().is_empty() {
        return Ok(None);
    }
    let body = api.send(ApiRequest::get("/movies").segment(id)).await?;
    Ok(unwrap_data(body))
}

/// One page of reviews for a movie. An empty id yields an empty first page.
pub async fn reviews(
    api: &ApiClient,
    id: &str,
    page: u32,
    limit: u32,
) -> Result<Listing, ClientError> {
    check_paging(page, limit)?;
    if id.trim().is_empty() {
        return Listing::empty(limit);
    }
    let result = api
        .fetch_page(ApiRequest::get("/movie").segment(id).segment("reviews"), page, limit)
        .await?;
    Listing::from_page(result)
}

fn check_paging(page: u32, limit: u32) -> Result<(), ClientError> {
    if page == 0 {
        return Err(ClientError::InvalidArgument(
            "page must be at least 1".to_string(),
        ));
    }
    if limit == 0 {
        return Err(ClientError::InvalidArgument(
            "limit must be at least 1".to_string(),
        ));
    }
    Ok(())
}
