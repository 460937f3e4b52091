//! Effective RSA key length resolution.
//!
//! Order: explicit call argument > `RSA_KEY_LENGTH` environment variable >
//! [`DEFAULT_KEY_BITS`]. Non-positive or unparseable values at any stage are
//! treated as absent.

/// Default RSA modulus length in bits.
pub const DEFAULT_KEY_BITS: u32 = 2048;

/// Length retried after a failed generation attempt (see
/// [`crate::KeyManager::generate_keys`]).
pub const FALLBACK_KEY_BITS: u32 = 1024;

/// Environment variable supplying a default key length.
pub const KEY_LENGTH_ENV: &str = "RSA_KEY_LENGTH";

/// Resolve the effective key length for a generation call.
pub fn resolve_bits(explicit: Option<u32>) -> u32 {
    resolve_from(explicit, std::env::var(KEY_LENGTH_ENV).ok().as_deref())
}

fn resolve_from(explicit: Option<u32>, env_value: Option<&str>) -> u32 {
    if let Some(bits) = explicit
        && bits > 0
    {
        return bits;
    }
    if let Some(raw) = env_value
        && let Ok(bits) = raw.trim().parse::<u32>()
        && bits > 0
    {
        return bits;
    }
    DEFAULT_KEY_BITS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_wins_over_env() {
        assert_eq!(resolve_from(Some(1024), Some("4096")), 1024);
    }

    #[test]
    fn test_env_used_when_no_explicit() {
        assert_eq!(resolve_from(None, Some("3072")), 3072);
        assert_eq!(resolve_from(None, Some(" 4096 ")), 4096);
    }

    #[test]
    fn test_default_when_nothing_set() {
        assert_eq!(resolve_from(None, None), DEFAULT_KEY_BITS);
    }

    #[test]
    fn test_malformed_env_treated_as_absent() {
        assert_eq!(resolve_from(None, Some("not-a-number")), DEFAULT_KEY_BITS);
        assert_eq!(resolve_from(None, Some("")), DEFAULT_KEY_BITS);
        assert_eq!(resolve_from(None, Some("-2048")), DEFAULT_KEY_BITS);
        assert_eq!(resolve_from(None, Some("0")), DEFAULT_KEY_BITS);
    }

    #[test]
    fn test_non_positive_explicit_falls_through() {
        assert_eq!(resolve_from(Some(0), None), DEFAULT_KEY_BITS);
        assert_eq!(resolve_from(Some(0), Some("3072")), 3072);
    }

    #[test]
    fn test_resolve_bits_explicit_ignores_process_env() {
        // Explicit argument short-circuits before the env var is consulted.
        assert_eq!(resolve_bits(Some(1024)), 1024);
    }
}
