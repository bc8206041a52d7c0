pub mod list_page;
pub mod pagination;
pub mod user;
