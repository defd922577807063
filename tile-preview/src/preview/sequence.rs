//! Ordering of asynchronous timestamp requests.

/// Identifies one issued request. Later requests always get greater tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

/// Issues request tokens and tells whether a token is still the latest one.
///
/// A response is applied only if its token is current, so a slow response for an older
/// selection can never overwrite the result of a newer one.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: u64,
}

impl RequestSequencer {
    /// Issues a new token, invalidating all earlier ones.
    pub fn issue(&mut self) -> RequestToken {
        self.latest += 1;
        RequestToken(self.latest)
    }

    /// Whether `token` is the most recently issued one.
    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest == token.0
    }
}
