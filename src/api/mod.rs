//! Client for the record-keeping API.
//!
//! Only the list endpoints are consumed; creating, updating and deleting
//! records is left to the data-entry front-end.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
