use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Internal error taxonomy. The documented public surface on
/// [`crate::KeyManager`] collapses all of these to `None`/`false`; the
/// variants exist so internal code and tests can tell failure kinds apart.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Service name must not be empty")]
    InvalidServiceName,

    #[error("Unsupported RSA key length: {bits} bits")]
    InvalidKeyLength { bits: u32 },

    #[error("Key generation failed: {0}")]
    Generation(String),

    #[error("Keychain error: {0}")]
    Keychain(String),

    #[error("No keychain backend is available on this platform")]
    BackendUnavailable,

    #[error("No keychain entry named '{entry}'")]
    NotFound { entry: String },
}
