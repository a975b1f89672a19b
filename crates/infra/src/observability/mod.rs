//! Observability infrastructure
//!
//! Structured logging through `tracing`. Token values are never recorded;
//! fields carry only their presence (`has_refresh_token`) and counts
//! (`queued`, `released`).

pub mod logging;

pub use logging::init_tracing;
