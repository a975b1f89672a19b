//! Authenticated request path

pub mod auth_service;
pub mod authenticator;
pub mod classifier;
pub mod coordinator;
pub mod ports;
pub mod service;

pub use auth_service::AuthService;
pub use authenticator::Authenticator;
pub use classifier::{classify, classify_response, classify_transport};
pub use coordinator::{RefreshCoordinator, RefreshPhase};
pub use ports::Transport;
pub use service::AuthenticatedClient;
