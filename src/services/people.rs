use serde_json::Value;

use crate::errors::ClientError;
use crate::models::list_page::unwrap_data;
use crate::services::transport::{ApiClient, ApiRequest};

/// Person detail. An empty id or empty body yields `None`.
pub async fn person(api: &ApiClient, id: &str) -> Result<Option<Value>, ClientError> {
    if id.trim().is_empty() {
        return Ok(None);
    }
    let body = api.send(ApiRequest::get("/persons").segment(id)).await?;
    Ok(unwrap_data(body))
}
