//! Secret-storage backends.
//!
//! One uniform [`SecretStore`] contract over the native credential services
//! (Windows Credential Manager, macOS Keychain, Linux Secret Service — all
//! reached through the `keyring` crate) plus an explicit stub for platforms
//! with no usable backend. The backend is selected once, from
//! [`Platform::detect`], and owned by whoever drives it; there is no global
//! backend state.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::error::{Error, Result};
use crate::platform::Platform;

/// Account name under which every entry is filed. The entry name itself
/// (`<service>PublicKey` / `<service>PrivateKey`) carries the identity, so
/// the account is a fixed marker. NEVER change this value once keys are
/// stored.
pub const KEYCHAIN_ACCOUNT: &str = "key";

/// Entry name probed by availability checks. Never written.
const AVAILABILITY_PROBE: &str = "keyforge-availability-probe";

// ---------------------------------------------------------------------------
// SecretStore trait
// ---------------------------------------------------------------------------

/// Abstraction over a credential-storage backend.
///
/// `retrieve` distinguishes "no such entry" (`Ok(None)`) from backend
/// failures (`Err`); reachability of the backend itself is a separate
/// question answered by `is_available`.
pub trait SecretStore: Send + Sync {
    /// True if the native secret-storage service can be reached.
    /// Must not panic and must not block indefinitely on a missing service.
    fn is_available(&self) -> bool;

    /// Write or overwrite the named entry.
    fn store(&self, entry: &str, secret: &str) -> Result<()>;

    /// Read the named entry. `Ok(None)` means the entry does not exist.
    fn retrieve(&self, entry: &str) -> Result<Option<Zeroizing<String>>>;
}

// ---------------------------------------------------------------------------
// KeychainStore — native OS credential service via the keyring crate
// ---------------------------------------------------------------------------

/// Production backend: one codepath over the three native credential APIs,
/// courtesy of the `keyring` crate's platform features.
pub struct KeychainStore;

impl KeychainStore {
    pub fn new() -> Self {
        Self
    }

    fn entry(&self, name: &str) -> Result<keyring::Entry> {
        keyring::Entry::new(name, KEYCHAIN_ACCOUNT).map_err(|e| Error::Keychain(e.to_string()))
    }
}

impl Default for KeychainStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretStore for KeychainStore {
    fn is_available(&self) -> bool {
        // Probe with a read of an entry that is never written: NoEntry means
        // the service answered; anything else means it is unreachable.
        match keyring::Entry::new(AVAILABILITY_PROBE, KEYCHAIN_ACCOUNT) {
            Ok(entry) => match entry.get_password() {
                Ok(_) | Err(keyring::Error::NoEntry) => true,
                Err(e) => {
                    debug!(error = %e, "keychain availability probe failed");
                    false
                }
            },
            Err(e) => {
                debug!(error = %e, "keychain entry construction failed");
                false
            }
        }
    }

    fn store(&self, entry: &str, secret: &str) -> Result<()> {
        debug!(entry = %entry, "storing keychain entry");
        self.entry(entry)?.set_password(secret).map_err(|e| match e {
            keyring::Error::NoStorageAccess(_) => Error::BackendUnavailable,
            _ => Error::Keychain(e.to_string()),
        })
    }

    fn retrieve(&self, entry: &str) -> Result<Option<Zeroizing<String>>> {
        match self.entry(entry)?.get_password() {
            Ok(secret) => Ok(Some(Zeroizing::new(secret))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(keyring::Error::NoStorageAccess(_)) => Err(Error::BackendUnavailable),
            Err(e) => Err(Error::Keychain(e.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// UnavailableStore — stub for platforms without a credential service
// ---------------------------------------------------------------------------

/// Backend for [`Platform::Unknown`]: never available, never persists.
/// Key generation still runs against it; the caller just gets PEM values
/// that live only for that call.
pub struct UnavailableStore;

impl SecretStore for UnavailableStore {
    fn is_available(&self) -> bool {
        false
    }

    fn store(&self, entry: &str, _secret: &str) -> Result<()> {
        warn!(entry = %entry, "no keychain backend; entry not persisted");
        Err(Error::BackendUnavailable)
    }

    fn retrieve(&self, _entry: &str) -> Result<Option<Zeroizing<String>>> {
        Ok(None)
    }
}

// ---------------------------------------------------------------------------
// HostStore — backend selected once at startup
// ---------------------------------------------------------------------------

/// The backend for the running host, chosen from [`Platform::detect`].
pub enum HostStore {
    Keychain(KeychainStore),
    Unavailable(UnavailableStore),
}

impl HostStore {
    pub fn select() -> Self {
        Self::for_platform(Platform::detect())
    }

    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Windows | Platform::MacOs | Platform::Linux => {
                HostStore::Keychain(KeychainStore::new())
            }
            Platform::Unknown => {
                warn!("unrecognized platform; keys will not be persisted");
                HostStore::Unavailable(UnavailableStore)
            }
        }
    }
}

impl SecretStore for HostStore {
    fn is_available(&self) -> bool {
        match self {
            HostStore::Keychain(s) => s.is_available(),
            HostStore::Unavailable(s) => s.is_available(),
        }
    }

    fn store(&self, entry: &str, secret: &str) -> Result<()> {
        match self {
            HostStore::Keychain(s) => s.store(entry, secret),
            HostStore::Unavailable(s) => s.store(entry, secret),
        }
    }

    fn retrieve(&self, entry: &str) -> Result<Option<Zeroizing<String>>> {
        match self {
            HostStore::Keychain(s) => s.retrieve(entry),
            HostStore::Unavailable(s) => s.retrieve(entry),
        }
    }
}

// ---------------------------------------------------------------------------
// MockStore — in-memory implementation for testing
// ---------------------------------------------------------------------------

pub struct MockStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretStore for MockStore {
    fn is_available(&self) -> bool {
        true
    }

    fn store(&self, entry: &str, secret: &str) -> Result<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(entry.to_string(), secret.to_string());
        Ok(())
    }

    fn retrieve(&self, entry: &str) -> Result<Option<Zeroizing<String>>> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .get(entry)
            .map(|s| Zeroizing::new(s.clone())))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_store_roundtrip() {
        let s = MockStore::new();
        s.store("svcPublicKey", "pem-text").unwrap();
        let got = s.retrieve("svcPublicKey").unwrap().unwrap();
        assert_eq!(&*got, "pem-text");
    }

    #[test]
    fn test_mock_store_overwrites_in_place() {
        let s = MockStore::new();
        s.store("svcPublicKey", "first").unwrap();
        s.store("svcPublicKey", "second").unwrap();
        let got = s.retrieve("svcPublicKey").unwrap().unwrap();
        assert_eq!(&*got, "second");
    }

    #[test]
    fn test_mock_store_missing_entry_is_none() {
        let s = MockStore::new();
        assert!(s.retrieve("nothing-here").unwrap().is_none());
    }

    #[test]
    fn test_unavailable_store_never_persists() {
        let s = UnavailableStore;
        assert!(!s.is_available());
        assert!(matches!(
            s.store("svcPublicKey", "pem"),
            Err(Error::BackendUnavailable)
        ));
        assert!(s.retrieve("svcPublicKey").unwrap().is_none());
    }

    #[test]
    fn test_unknown_platform_selects_stub() {
        let s = HostStore::for_platform(Platform::Unknown);
        assert!(matches!(s, HostStore::Unavailable(_)));
        assert!(!s.is_available());
    }

    #[test]
    fn test_known_platforms_select_keychain() {
        for p in [Platform::Windows, Platform::MacOs, Platform::Linux] {
            assert!(matches!(
                HostStore::for_platform(p),
                HostStore::Keychain(_)
            ));
        }
    }
}
