//! Content hash references.
//!
//! Stored files are addressed as `algorithm:hexdigest` strings (md5, sha1
//! or sha256). [`ContentHash`] is the typed form of that handle.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::SandboxError;

/// Hash algorithm accepted in content references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// MD5, 32 hex digits.
    Md5,
    /// SHA-1, 40 hex digits.
    Sha1,
    /// SHA-256, 64 hex digits.
    Sha256,
}

impl HashAlgorithm {
    /// Returns the lowercase tag used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
        }
    }

    /// Expected hex digest length for this algorithm.
    pub fn digest_len(&self) -> usize {
        match self {
            Self::Md5 => 32,
            Self::Sha1 => 40,
            Self::Sha256 => 64,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stable handle to a file in remote storage, e.g. `sha256:ab12...`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash {
    algorithm: HashAlgorithm,
    digest: String,
}

impl ContentHash {
    /// Creates a content hash after validating the digest against the
    /// algorithm's expected length and hex alphabet.
    pub fn new(algorithm: HashAlgorithm, digest: impl Into<String>) -> Result<Self, SandboxError> {
        let digest = digest.into().to_ascii_lowercase();
        if digest.len() != algorithm.digest_len() {
            return Err(SandboxError::invalid_argument(format!(
                "{algorithm} digest must be {} hex digits, got {}",
                algorithm.digest_len(),
                digest.len()
            )));
        }
        if !digest.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(SandboxError::invalid_argument(format!(
                "digest contains non-hex characters: {digest}"
            )));
        }
        Ok(Self { algorithm, digest })
    }

    /// Creates a SHA-256 content hash.
    pub fn sha256(digest: impl Into<String>) -> Result<Self, SandboxError> {
        Self::new(HashAlgorithm::Sha256, digest)
    }

    /// Creates a SHA-1 content hash.
    pub fn sha1(digest: impl Into<String>) -> Result<Self, SandboxError> {
        Self::new(HashAlgorithm::Sha1, digest)
    }

    /// Creates an MD5 content hash.
    pub fn md5(digest: impl Into<String>) -> Result<Self, SandboxError> {
        Self::new(HashAlgorithm::Md5, digest)
    }

    /// Returns the algorithm part of the handle.
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Returns the lowercase hex digest.
    pub fn digest(&self) -> &str {
        &self.digest
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.digest)
    }
}

impl FromStr for ContentHash {
    type Err = SandboxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (tag, digest) = s.split_once(':').ok_or_else(|| {
            SandboxError::invalid_argument(format!("content hash must be algorithm:digest: {s}"))
        })?;
        let algorithm = match tag {
            "md5" => HashAlgorithm::Md5,
            "sha1" => HashAlgorithm::Sha1,
            "sha256" => HashAlgorithm::Sha256,
            other => {
                return Err(SandboxError::invalid_argument(format!(
                    "unsupported hash algorithm: {other}"
                )))
            }
        };
        Self::new(algorithm, digest)
    }
}

impl Serialize for ContentHash {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ContentHash {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHA256_HEX: &str = "275a021bbfb6489e54d471899f7db9d1663fc695ec2fe2a2c4538aabf651fd0f";

    #[test]
    fn formats_as_algorithm_colon_digest() {
        let hash = ContentHash::sha256(SHA256_HEX).unwrap();
        assert_eq!(hash.to_string(), format!("sha256:{SHA256_HEX}"));
    }

    #[test]
    fn parses_wire_form() {
        let hash: ContentHash = format!("sha256:{SHA256_HEX}").parse().unwrap();
        assert_eq!(hash.algorithm(), HashAlgorithm::Sha256);
        assert_eq!(hash.digest(), SHA256_HEX);
    }

    #[test]
    fn rejects_wrong_length_and_bad_characters() {
        assert!(ContentHash::sha256("abcd").is_err());
        assert!(ContentHash::md5("zz".repeat(16)).is_err());
        assert!("sha512:00".parse::<ContentHash>().is_err());
        assert!(SHA256_HEX.parse::<ContentHash>().is_err());
    }

    #[test]
    fn digest_is_lowercased() {
        let hash = ContentHash::md5("ABCDEF0123456789ABCDEF0123456789").unwrap();
        assert_eq!(hash.digest(), "abcdef0123456789abcdef0123456789");
    }
}
