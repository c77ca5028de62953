//! API key descriptors for sandbox endpoints.

use std::fmt;
use std::hash::{Hash, Hasher};

use secrecy::{ExposeSecret, SecretString};

/// Identifies one remote sandbox endpoint together with its API key.
///
/// The two base URLs are always derived from the host, never stored.
/// Equality and hashing consider only `(name, key, host)` so a key can be
/// used in sets and maps regardless of its description or worker budget.
#[derive(Debug, Clone)]
pub struct ScanKey {
    name: String,
    key: SecretString,
    host: String,
    description: String,
    max_workers: u32,
}

impl ScanKey {
    /// Creates a key descriptor for `host` (e.g. `"10.0.0.5"` or a DNS name).
    pub fn new(
        name: impl Into<String>,
        key: impl Into<String>,
        host: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            key: SecretString::from(key.into()),
            host: host.into(),
            description: String::new(),
            max_workers: 1,
        }
    }

    /// Sets a free-form description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the number of VMs the endpoint can run concurrently.
    /// Values below 1 are clamped to 1.
    pub fn with_max_workers(mut self, max_workers: u32) -> Self {
        self.max_workers = max_workers.max(1);
        self
    }

    /// Returns the key's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the endpoint host.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the description, possibly empty.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the concurrent-VM budget of the endpoint.
    pub fn max_workers(&self) -> u32 {
        self.max_workers
    }

    /// Exposes the raw API key for the `X-Api-Key` header.
    pub(crate) fn expose_key(&self) -> &str {
        self.key.expose_secret()
    }

    /// Base URL of the standard API.
    pub fn url(&self) -> String {
        format!("https://{}/api/v1", self.host)
    }

    /// Base URL of the debug API.
    pub fn debug_url(&self) -> String {
        format!("https://{}/api/debug", self.host)
    }
}

impl PartialEq for ScanKey {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.key.expose_secret() == other.key.expose_secret()
            && self.host == other.host
    }
}

impl Eq for ScanKey {}

impl Hash for ScanKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.key.expose_secret().hash(state);
        self.host.hash(state);
    }
}

impl fmt::Display for ScanKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} for {} ({})", self.name, self.host, self.max_workers)?;
        if !self.description.is_empty() {
            write!(f, " ({})", self.description)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn urls_are_derived_from_host() {
        let key = ScanKey::new("lab", "secret", "10.1.2.3");
        assert_eq!(key.url(), "https://10.1.2.3/api/v1");
        assert_eq!(key.debug_url(), "https://10.1.2.3/api/debug");
    }

    #[test]
    fn identity_ignores_description_and_workers() {
        let a = ScanKey::new("lab", "secret", "10.1.2.3").with_max_workers(4);
        let b = ScanKey::new("lab", "secret", "10.1.2.3").with_description("east rack");
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn identity_differs_on_key_material() {
        let a = ScanKey::new("lab", "secret", "10.1.2.3");
        let b = ScanKey::new("lab", "other", "10.1.2.3");
        assert_ne!(a, b);
    }

    #[test]
    fn max_workers_clamped_to_positive() {
        let key = ScanKey::new("lab", "secret", "h").with_max_workers(0);
        assert_eq!(key.max_workers(), 1);
    }

    #[test]
    fn display_mentions_host_and_description() {
        let key = ScanKey::new("lab", "secret", "10.1.2.3")
            .with_description("east rack")
            .with_max_workers(2);
        assert_eq!(key.to_string(), "lab for 10.1.2.3 (2) (east rack)");
    }
}
