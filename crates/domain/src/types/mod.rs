//! Domain types and models

pub mod http;
pub mod session;
pub mod user;

pub use http::{
    ApiRequest, ApiResponse, HttpMethod, TransportError, TransportErrorKind, TransportRequest,
};
pub use session::{RefreshGrant, Session};
pub use user::{AdminUser, LoginResponse, UserRole};
