//! Reporting API operations
//!
//! Operations are plain values; an `Executor` sends them. The API client is
//! the production executor, tests substitute a recording one.

pub mod operation;

use async_trait::async_trait;

pub use operation::{Operation, OperationResult};

use super::ApiError;

#[async_trait]
pub trait Executor: Send + Sync {
    async fn execute(&self, operation: &Operation) -> Result<OperationResult, ApiError>;
}
