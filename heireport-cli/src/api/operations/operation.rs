//! Core Operation types for the reporting API's CRUD endpoints

use reqwest::Method;
use serde_json::Value;

use crate::api::Resource;

/// A single request against a resource collection
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Create one record: POST /{resource}
    Create {
        resource: Resource,
        /// Record data as JSON
        data: Value,
    },
    /// Create many records in one request: POST /{resource}/bulk
    BulkCreate {
        resource: Resource,
        /// One JSON object per record
        data: Vec<Value>,
    },
    /// Replace a record's fields: PUT /{resource}/{id}
    Update {
        resource: Resource,
        id: String,
        data: Value,
    },
    /// Delete a record: DELETE /{resource}/{id}
    Delete { resource: Resource, id: String },
}

/// Result of executing an Operation
#[derive(Debug, Clone)]
pub struct OperationResult {
    /// The operation that was executed
    pub operation: Operation,
    /// Response body (created/updated record, or Null for 204)
    pub data: Value,
    /// HTTP status code from the response
    pub status_code: u16,
}

impl Operation {
    pub fn create(resource: Resource, data: Value) -> Self {
        Self::Create { resource, data }
    }

    pub fn bulk_create(resource: Resource, data: Vec<Value>) -> Self {
        Self::BulkCreate { resource, data }
    }

    pub fn update(resource: Resource, id: impl Into<String>, data: Value) -> Self {
        Self::Update {
            resource,
            id: id.into(),
            data,
        }
    }

    pub fn delete(resource: Resource, id: impl Into<String>) -> Self {
        Self::Delete {
            resource,
            id: id.into(),
        }
    }

    pub fn http_method(&self) -> Method {
        match self {
            Self::Create { .. } | Self::BulkCreate { .. } => Method::POST,
            Self::Update { .. } => Method::PUT,
            Self::Delete { .. } => Method::DELETE,
        }
    }

    /// Path relative to the API base URL
    pub fn path(&self) -> String {
        match self {
            Self::Create { resource, .. } => resource.path().to_string(),
            Self::BulkCreate { resource, .. } => format!("{}/bulk", resource.path()),
            Self::Update { resource, id, .. } | Self::Delete { resource, id } => {
                format!("{}/{}", resource.path(), id)
            }
        }
    }

    /// JSON request body, if the method carries one
    pub fn body(&self) -> Option<Value> {
        match self {
            Self::Create { data, .. } | Self::Update { data, .. } => Some(data.clone()),
            Self::BulkCreate { data, .. } => Some(Value::Array(data.clone())),
            Self::Delete { .. } => None,
        }
    }

    /// Number of records this operation writes
    pub fn record_count(&self) -> usize {
        match self {
            Self::BulkCreate { data, .. } => data.len(),
            _ => 1,
        }
    }

    /// Get the operation type as a string
    pub fn operation_type(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::BulkCreate { .. } => "bulk_create",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
        }
    }
}

impl OperationResult {
    pub fn new(operation: Operation, status_code: u16, data: Value) -> Self {
        Self {
            operation,
            data,
            status_code,
        }
    }

    /// Identifier of the created/updated record.
    ///
    /// Accepts `{"id": ..}` and the wrapped `{"data": {"id": ..}}` form.
    pub fn record_id(&self) -> Option<String> {
        let id = self
            .data
            .get("id")
            .or_else(|| self.data.get("data").and_then(|d| d.get("id")))?;
        match id {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}
