pub mod api;
pub mod auth;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod guard;
pub mod services;
pub mod session;
pub mod types;

#[cfg(test)]
pub mod testing;

pub use api::{ApiClient, CatalogApi};
pub use catalog::{CatalogViewModel, Feedback};
pub use error::{ClientError, ClientResult};
pub use session::{Session, SessionState, SharedSession};
