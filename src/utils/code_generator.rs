//! Short code generation.
//!
//! A code is the first `length` hex characters of `SHA-256(url ++ nonce)`.
//! The nonce changes on every call, so the same URL shortened twice gets two
//! different codes. Only a short prefix of the digest is kept, so collisions
//! are possible; the store's uniqueness constraint catches them and the caller
//! retries with a fresh nonce (see
//! [`MappingService::shorten`](crate::application::services::MappingService::shorten)).

use chrono::Utc;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU64, Ordering};

/// Default code length.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Shortest code length accepted by [`HashCodeGenerator::new`].
pub const MIN_CODE_LENGTH: usize = 4;

/// Longest code length: a SHA-256 digest is 64 hex characters.
pub const MAX_CODE_LENGTH: usize = 64;

/// Produces candidate short codes for a URL.
///
/// Implementations are pure: they never touch storage and never check for
/// collisions.
#[cfg_attr(test, mockall::automock)]
pub trait CodeGenerator: Send + Sync {
    fn generate(&self, url: &str) -> String;
}

/// Supplies a fresh nonce per generated code.
pub trait NonceSource: Send + Sync {
    fn next_nonce(&self) -> u128;
}

/// Sequence shared by every [`ClockNonce`] in the process.
static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Nonce built from wall-clock nanoseconds and a process-wide sequence.
///
/// The sequence keeps nonces distinct when two calls land on the same clock
/// reading, even across separate `ClockNonce` values.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClockNonce;

impl ClockNonce {
    pub fn new() -> Self {
        Self
    }
}

impl NonceSource for ClockNonce {
    fn next_nonce(&self) -> u128 {
        let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default() as u64;
        let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
        (u128::from(nanos) << 64) | u128::from(seq)
    }
}

/// Derives a code from a URL and a nonce.
///
/// `length` is clamped to the digest's hex length.
pub fn derive_code(url: &str, nonce: u128, length: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hasher.update(nonce.to_string().as_bytes());
    let digest = hex::encode(hasher.finalize());

    digest[..length.min(MAX_CODE_LENGTH)].to_string()
}

/// SHA-256 based [`CodeGenerator`].
#[derive(Debug)]
pub struct HashCodeGenerator<N: NonceSource = ClockNonce> {
    length: usize,
    nonce: N,
}

impl HashCodeGenerator<ClockNonce> {
    /// Creates a generator emitting codes of `length` hex characters.
    ///
    /// # Errors
    ///
    /// Returns an error if `length` is outside
    /// [`MIN_CODE_LENGTH`]..=[`MAX_CODE_LENGTH`].
    pub fn new(length: usize) -> Result<Self, InvalidCodeLength> {
        Self::with_nonce(length, ClockNonce::new())
    }
}

impl Default for HashCodeGenerator<ClockNonce> {
    fn default() -> Self {
        Self {
            length: DEFAULT_CODE_LENGTH,
            nonce: ClockNonce::new(),
        }
    }
}

impl<N: NonceSource> HashCodeGenerator<N> {
    pub fn with_nonce(length: usize, nonce: N) -> Result<Self, InvalidCodeLength> {
        if !(MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&length) {
            return Err(InvalidCodeLength(length));
        }
        Ok(Self { length, nonce })
    }
}

impl<N: NonceSource> CodeGenerator for HashCodeGenerator<N> {
    fn generate(&self, url: &str) -> String {
        derive_code(url, self.nonce.next_nonce(), self.length)
    }
}

/// Rejected code length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("code length must be between 4 and 64, got {0}")]
pub struct InvalidCodeLength(pub usize);
