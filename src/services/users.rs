//! Account endpoints: registration, login, profile, and favorites.
//!
//! Forms are validated locally first; an invalid form never reaches the
//! network.
//!
//! The favorites routes (`/users/favorites` and `/users/favorites/{id}`) are
//! assumed: the web front end imports favorites calls that its API module
//! never defines, so no route was ever observed for them.

use reqwest::Method;
use serde_json::Value;

use crate::errors::ClientError;
use crate::models::list_page::{unwrap_data, ListPage};
use crate::models::user::{check, LoginForm, LoginResponse, ProfileUpdate, RegisterForm};
use crate::services::credentials::SessionStore;
use crate::services::transport::{ApiClient, ApiRequest};

const FAVORITES_PATH: &str = "/users/favorites";

pub async fn register(api: &ApiClient, form: &RegisterForm) -> Result<Value, ClientError> {
    check(form)?;
    let body = serde_json::to_value(form)?;
    api.send(ApiRequest::new(Method::POST, "/users/register").json(body))
        .await
}

/// Log in and return the token and user the server handed back.
pub async fn login(api: &ApiClient, form: &LoginForm) -> Result<LoginResponse, ClientError> {
    check(form)?;
    let body = serde_json::to_value(form)?;
    let response = api
        .send(ApiRequest::new(Method::POST, "/users/login").json(body))
        .await?;

    let login = LoginResponse::from_body(&response);
    if login.token.is_none() {
        tracing::warn!(username = %form.username, "Login response carried no token");
    }
    Ok(login)
}

/// Log in and record the result in `session`, so the client behind it is
/// authenticated from the next request on.
pub async fn login_into(
    api: &ApiClient,
    session: &SessionStore,
    form: &LoginForm,
) -> Result<LoginResponse, ClientError> {
    let response = login(api, form).await?;
    session.login(response.user.clone(), response.token.clone());
    Ok(response)
}

pub async fn profile(api: &ApiClient) -> Result<Option<Value>, ClientError> {
    let body = api.send(ApiRequest::get("/users/profile")).await?;
    Ok(unwrap_data(body))
}

pub async fn update_profile(
    api: &ApiClient,
    update: &ProfileUpdate,
) -> Result<Option<Value>, ClientError> {
    check(update)?;
    let body = serde_json::to_value(update)?;
    let response = api
        .send(ApiRequest::new(Method::PATCH, "/users/profile").json(body))
        .await?;
    Ok(unwrap_data(response))
}

/// The signed-in user's favorite movies. Unrecognized payloads read as none.
/// The route is an assumption, see the module docs.
pub async fn favorites(api: &ApiClient) -> Result<Vec<Value>, ClientError> {
    let body = api.send(ApiRequest::get(FAVORITES_PATH)).await?;
    Ok(ListPage::decode(body, 1, 1).items)
}

pub async fn add_favorite(api: &ApiClient, movie_id: &str) -> Result<Value, ClientError> {
    favorite_request(api, Method::POST, movie_id).await
}

pub async fn remove_favorite(api: &ApiClient, movie_id: &str) -> Result<Value, ClientError> {
    favorite_request(api, Method::DELETE, movie_id).await
}

async fn favorite_request(
    api: &ApiClient,
    method: Method,
    movie_id: &str,
) -> Result<Value, ClientError> {
    if movie_id.trim().is_empty() {
        return Err(ClientError::InvalidArgument(
            "movie id is required".to_string(),
        ));
    }
    api.send(ApiRequest::new(method, FAVORITES_PATH).segment(movie_id))
        .await
}
