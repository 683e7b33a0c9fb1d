//! Credential Resolution
//!
//! Decides which API key a capability call runs with. A key supplied with the
//! call always wins; otherwise the process-wide default captured at startup is
//! used. When neither exists the caller must not reach the network at all.

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// An opaque API key for the model service.
///
/// Blank strings never become a `Credential`, so "empty override" and
/// "no override" behave identically.
pub struct Credential(SecretString);

impl Credential {
    /// Wraps a secret with surrounding whitespace removed, returning `None`
    /// if nothing is left.
    pub fn new(secret: impl Into<String>) -> Option<Self> {
        let secret = secret.into();
        let trimmed = secret.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(SecretString::from(trimmed.to_owned())))
        }
    }

    pub(crate) fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl Clone for Credential {
    fn clone(&self) -> Self {
        Self(SecretString::from(self.0.expose_secret().to_owned()))
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

/// Chooses between a per-call override and the process-wide default.
#[derive(Debug, Clone, Default)]
pub struct CredentialResolver {
    default: Option<Credential>,
}

impl CredentialResolver {
    pub fn new(default: Option<Credential>) -> Self {
        Self { default }
    }

    /// Returns the credential a call should use, if any.
    pub fn resolve<'a>(&'a self, credential_override: Option<&'a Credential>) -> Option<&'a Credential> {
        credential_override.or(self.default.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_secret_is_not_a_credential() {
        assert!(Credential::new("").is_none());
        assert!(Credential::new("   \t").is_none());
        assert!(Credential::new("key-123").is_some());
    }

    #[test]
    fn test_secret_is_stored_trimmed() {
        let credential = Credential::new("  key-123\n").unwrap();
        assert_eq!(credential.expose(), "key-123");
    }

    #[test]
    fn test_override_wins_over_default() {
        let resolver = CredentialResolver::new(Credential::new("default-key"));
        let user_key = Credential::new("user-key").unwrap();

        let resolved = resolver.resolve(Some(&user_key)).unwrap();
        assert_eq!(resolved.expose(), "user-key");
    }

    #[test]
    fn test_falls_back_to_default() {
        let resolver = CredentialResolver::new(Credential::new("default-key"));
        let resolved = resolver.resolve(None).unwrap();
        assert_eq!(resolved.expose(), "default-key");
    }

    #[test]
    fn test_nothing_to_resolve() {
        let resolver = CredentialResolver::default();
        assert!(resolver.resolve(None).is_none());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let credential = Credential::new("super-secret").unwrap();
        let debug = format!("{:?}", credential);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_clone_keeps_secret() {
        let credential = Credential::new("cloned-key").unwrap();
        assert_eq!(credential.clone().expose(), "cloned-key");
    }
}
