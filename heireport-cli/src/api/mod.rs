//! Reporting API client
//!
//! Bearer-token JSON client for the HEI reporting backend: CRUD operations on
//! the record resources, paginated listing and session endpoints.

pub mod client;
pub mod error;
pub mod operations;
pub mod pagination;
pub mod resources;

pub use client::ApiClient;
pub use error::ApiError;
pub use operations::{Executor, Operation, OperationResult};
pub use pagination::{ListQuery, Page};
pub use resources::Resource;
