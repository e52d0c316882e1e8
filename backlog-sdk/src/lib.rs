// ABOUTME: Backlog SDK library providing a typed REST client for the Backlog API
// ABOUTME: Includes authentication, resource operations, name resolution and error types

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use secrecy::SecretString;
use url::Url;

mod builder;
pub mod constants;
pub mod error;
mod issues;
pub mod models;
pub mod patch;
mod projects;
pub mod resolver;
mod transport;
mod users;

#[cfg(test)]
mod test_helpers;

pub use builder::{BacklogClientConfig, BacklogClientConfigBuilder};
pub use error::BacklogError;
pub use issues::{clamp_count, CreateIssueOptions, IssueUpdate, ListIssuesOptions, SortOrder};
pub use models::{
    Category, ChangeLog, Comment, Issue, IssueType, Milestone, Priority, Project, Resource,
    ResourceReference, Status, User,
};
pub use patch::Patch;
pub use resolver::{find_id, ResourceKind};
pub use transport::Params;

pub type Result<T> = std::result::Result<T, BacklogError>;

/// Authenticated client for a single Backlog space
pub struct BacklogClient {
    http: reqwest::Client,
    space_url: String,
    base_url: String,
    api_key: SecretString,
}

impl BacklogClient {
    /// Create a client with default settings for the given space and key
    pub fn new(space_url: &str, api_key: &str) -> Result<Self> {
        Self::builder()
            .space_url(space_url)
            .api_key(SecretString::new(api_key.to_string().into_boxed_str()))
            .build()
    }

    pub(crate) fn from_config(config: BacklogClientConfig) -> Result<Self> {
        let space_url = normalize_space_url(&config.space_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).map_err(|e| {
                BacklogError::Configuration(format!("Invalid user agent: {}", e))
            })?,
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                BacklogError::Configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            http,
            base_url: format!("{}{}", space_url, constants::urls::API_BASE_PATH),
            space_url,
            api_key: config.api_key,
        })
    }

    /// Space URL without a trailing slash
    pub fn space_url(&self) -> &str {
        &self.space_url
    }

    /// Browser URL for an issue
    pub fn issue_url(&self, issue_key: &str) -> String {
        format!("{}/view/{}", self.space_url, issue_key)
    }
}

/// Trim whitespace and trailing slashes from a space URL and check it parses.
pub fn normalize_space_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(BacklogError::Configuration(
            "Space URL must not be empty".to_string(),
        ));
    }

    let parsed = Url::parse(trimmed)
        .map_err(|e| BacklogError::Configuration(format!("Invalid space URL: {}", e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(BacklogError::Configuration(format!(
            "Space URL must use http or https, got '{}'",
            parsed.scheme()
        )));
    }

    Ok(trimmed.to_string())
}
