//! The user directory domain: remote API client, merge logic and the
//! cached data access service.

pub mod api_types;
pub mod client;
pub mod merge;
pub mod service;
pub mod types;
