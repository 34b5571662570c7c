//! The origin allow-list.

/// Immutable set of origins permitted to receive permissive CORS headers.
///
/// Built once at startup from config and shared read-only across request
/// handlers. Membership is exact string equality against the inbound
/// `Origin` header value: `https://app.example.com` does not match
/// `https://app.example.com/`, `HTTPS://app.example.com`, or any wildcard.
#[derive(Debug, Clone, Default)]
pub struct OriginAllowList {
    origins: Vec<String>,
}

impl OriginAllowList {
    pub fn new(origins: Vec<String>) -> Self {
        Self { origins }
    }

    /// Exact-match membership check.
    pub fn contains(&self, origin: &str) -> bool {
        self.origins.iter().any(|allowed| allowed == origin)
    }

    pub fn len(&self) -> usize {
        self.origins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }
}
