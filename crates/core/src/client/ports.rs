//! Port interface for the HTTP transport
//!
//! The transport sends exactly one request per call. It does not retry, does
//! not follow authentication, and reports every received response as `Ok`,
//! whatever its status.

use std::sync::Arc;

use async_trait::async_trait;
use grabbi_domain::{ApiResponse, TransportError, TransportRequest};

#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a resolved request. `Err` means no response was received.
    async fn send(&self, request: TransportRequest) -> Result<ApiResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: TransportRequest) -> Result<ApiResponse, TransportError> {
        (**self).send(request).await
    }
}
