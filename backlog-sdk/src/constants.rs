// ABOUTME: Centralized constants for the Backlog SDK
// ABOUTME: Contains API paths, timeouts, and list limits

/// HTTP and request timeouts
pub mod timeouts {
    use std::time::Duration;

    /// Default timeout for HTTP requests
    pub const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
}

/// Backlog API paths
pub mod urls {
    /// Path appended to the space URL for every API call
    pub const API_BASE_PATH: &str = "/api/v2";

    /// Name of the credential parameter sent with every request
    pub const API_KEY_PARAM: &str = "apiKey";

    pub const USER_AGENT: &str = concat!("bl-cli/", env!("CARGO_PKG_VERSION"));
}

/// Result caps for list endpoints
pub mod limits {
    pub const DEFAULT_COUNT: u32 = 20;
    pub const MAX_COUNT: u32 = 100;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_timeout_constants() {
        assert_eq!(timeouts::HTTP_REQUEST_TIMEOUT, Duration::from_secs(30));
    }

    #[test]
    fn test_url_constants() {
        assert_eq!(urls::API_BASE_PATH, "/api/v2");
        assert_eq!(urls::API_KEY_PARAM, "apiKey");
        assert!(urls::USER_AGENT.starts_with("bl-cli/"));
    }

    #[test]
    fn test_limits() {
        assert_eq!(limits::DEFAULT_COUNT, 20);
        assert_eq!(limits::MAX_COUNT, 100);
    }
}
