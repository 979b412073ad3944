//! Shared, normalized base URL for the node RPC endpoint.
//!
//! [`EndpointRegistry`] is a cloneable handle: every clone points at the same
//! cell, so whoever owns the client can hand a clone to another component and
//! redirect all subsequent requests without rebuilding the client.

use std::sync::{Arc, PoisonError, RwLock};

/// Base URL used whenever a candidate normalizes to nothing.
pub const DEFAULT_RPC_URL: &str = "http://localhost:26657";

/// Normalizes a candidate base URL.
///
/// Surrounding whitespace is trimmed and trailing slashes are stripped. A
/// candidate that ends up empty (blank, or made only of slashes) becomes
/// [`DEFAULT_RPC_URL`].
pub fn normalize_base_url(candidate: &str) -> String {
    let trimmed = candidate.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return DEFAULT_RPC_URL.to_string();
    }
    trimmed.to_string()
}

#[derive(Debug, Clone)]
pub struct EndpointRegistry {
    base_url: Arc<RwLock<String>>,
}

impl Default for EndpointRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_RPC_URL)
    }
}

impl EndpointRegistry {
    pub fn new(initial: &str) -> Self {
        Self {
            base_url: Arc::new(RwLock::new(normalize_base_url(initial))),
        }
    }

    /// Returns the current base URL.
    pub fn get(&self) -> String {
        // The stored string is replaced in a single move, so a poisoned lock
        // still guards a complete value.
        self.base_url.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Normalizes `candidate` and replaces the stored base URL.
    pub fn set(&self, candidate: &str) {
        let normalized = normalize_base_url(candidate);
        *self.base_url.write().unwrap_or_else(PoisonError::into_inner) = normalized;
    }
}
