//! Session persistence

pub mod memory;
pub mod ports;
pub mod store;

pub use memory::MemorySecretStore;
pub use ports::{SecretStore, StoreError};
pub use store::{LogoutHandler, SessionStore};
