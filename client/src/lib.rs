//! Newsdesk client: a typed front end for a remote content-management API.
//!
//! Layers, top-down:
//!
//! - [`hooks`] hand presentation code a view of store state plus bound actions.
//! - [`stores`] keep the client-side copy of articles, categories and the
//!   session, reconciling it with every response.
//! - [`api`] issues the HTTP calls, injecting the bearer token and handling
//!   401s globally.
//!
//! Capabilities that used to be ambient globals are injected instead: the
//! [`session::Session`] over [`storage::DurableStorage`], the
//! [`navigator::Navigator`], and the optional [`notify::Notifier`].

pub mod api;
pub mod config;
pub mod error;
pub mod hooks;
pub mod navigator;
pub mod notify;
pub mod router;
pub mod session;
pub mod storage;
pub mod stores;
pub mod utils;

pub use api::{ApiClient, RawResponse, UploadFile};
pub use config::ClientConfig;
pub use error::ApiError;
pub use newsdesk_shared as models;
pub use session::Session;
