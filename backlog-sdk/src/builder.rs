// ABOUTME: Builder pattern implementation for BacklogClient configuration
// ABOUTME: Provides type-safe configuration with compile-time validation

use crate::constants::{timeouts, urls};
use crate::error::BacklogError;
use crate::BacklogClient;
use secrecy::SecretString;
use std::time::Duration;
use typed_builder::TypedBuilder;

#[derive(Debug, TypedBuilder)]
#[builder(build_method(into = Result<BacklogClient, BacklogError>))]
pub struct BacklogClientConfig {
    #[builder(setter(into))]
    pub space_url: String,

    pub api_key: SecretString,

    #[builder(default = timeouts::HTTP_REQUEST_TIMEOUT)]
    pub timeout: Duration,

    #[builder(default = urls::USER_AGENT.to_string(), setter(into))]
    pub user_agent: String,
}

impl From<BacklogClientConfig> for Result<BacklogClient, BacklogError> {
    fn from(config: BacklogClientConfig) -> Self {
        BacklogClient::from_config(config)
    }
}

impl BacklogClient {
    pub fn builder() -> BacklogClientConfigBuilder<((), (), (), ())> {
        BacklogClientConfig::builder()
    }
}
