use std::fmt::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use rand::Rng;

/// Server-issued, server-verified CSRF tokens for the contact form.
///
/// Tokens are random, single-use, and expire after a TTL. Verification
/// consumes the token, so a replayed submission fails even inside the TTL.
#[derive(Clone)]
pub struct CsrfTokenStore {
    tokens: Arc<DashMap<String, Instant>>,
    ttl: Duration,
}

impl CsrfTokenStore {
    pub fn new(ttl: Duration) -> Self {
        CsrfTokenStore {
            tokens: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Issues a fresh token and records its issue time.
    pub fn issue(&self) -> String {
        let bytes: [u8; 32] = rand::thread_rng().r#gen();
        let token = bytes.iter().fold(String::with_capacity(64), |mut out, b| {
            let _ = write!(out, "{:02x}", b);
            out
        });

        self.tokens.insert(token.clone(), Instant::now());
        token
    }

    /// Consumes `token`. Returns true only for a known, unexpired token.
    pub fn verify(&self, token: &str) -> bool {
        match self.tokens.remove(token) {
            Some((_, issued_at)) => issued_at.elapsed() < self.ttl,
            None => false,
        }
    }

    /// Removes tokens past their TTL. Returns the number removed.
    pub fn purge_expired(&self) -> usize {
        let before = self.tokens.len();
        let ttl = self.ttl;
        self.tokens.retain(|_, issued_at| issued_at.elapsed() < ttl);
        before - self.tokens.len()
    }
}
