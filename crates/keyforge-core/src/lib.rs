//! Keyforge core — on-demand RSA keypair generation persisted in the OS
//! keychain (Windows Credential Manager, macOS Keychain, Linux Secret
//! Service), keyed by a caller-supplied service name.

pub mod config;
pub mod error;
pub mod keypair;
pub mod manager;
pub mod platform;
pub mod store;

pub use error::{Error, Result};
pub use keypair::KeyPair;
pub use manager::KeyManager;
pub use platform::Platform;
pub use store::{HostStore, KeychainStore, MockStore, SecretStore, UnavailableStore};
pub use zeroize::Zeroizing;
