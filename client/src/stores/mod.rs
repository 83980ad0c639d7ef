//! Client-side state containers.

pub mod articles;
pub mod auth;

pub use articles::{ArticleFilters, ArticleStore, ArticlesState, FilterPatch, QueryParams};
pub use auth::AuthStore;
