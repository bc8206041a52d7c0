pub mod config;
pub mod errors;
pub mod models;
pub mod services;

pub use config::ClientConfig;
pub use errors::ClientError;
pub use models::list_page::{ListPage, PaginationMeta};
pub use models::pagination::{Listing, NavIntent, PageButton, PaginationState};
pub use services::transport::{ApiClient, ApiRequest};
