// ABOUTME: Authenticated request execution and uniform error decoding for the Backlog API
// ABOUTME: Encodes parameters as query strings for reads and form bodies for writes

use reqwest::Method;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::constants::urls::API_KEY_PARAM;
use crate::error::BacklogError;
use crate::{BacklogClient, Result};

/// Ordered request parameters. Repeated keys are kept, which is how
/// array filters such as `statusId[]` are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    pairs: Vec<(String, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        self.pairs.push((key.into(), value.to_string()));
        self
    }

    pub fn push_opt<V: ToString>(&mut self, key: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.push(key, value);
        }
        self
    }

    pub fn push_all<I, V>(&mut self, key: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        for value in values {
            self.push(key, value);
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Pairs sorted by key. The sort is stable, so repeated keys keep
    /// their insertion order.
    pub fn sorted_pairs(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<(&str, &str)> = self
            .pairs
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        pairs.sort_by(|a, b| a.0.cmp(b.0));
        pairs
    }

    /// `application/x-www-form-urlencoded` rendering of [`Params::sorted_pairs`]
    pub fn encode(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.sorted_pairs())
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    errors: Vec<ApiErrorEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiErrorEntry {
    message: String,
    #[serde(default)]
    code: i64,
    #[serde(default)]
    more_info: Option<String>,
}

/// Map an error response body to the most specific error available
pub(crate) fn decode_error(status: u16, body: &[u8]) -> BacklogError {
    let first = serde_json::from_slice::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.errors.into_iter().next());

    match first {
        Some(entry) => {
            if let Some(more_info) = entry.more_info.as_deref().filter(|s| !s.is_empty()) {
                tracing::debug!(more_info, "Backlog error details");
            }
            BacklogError::Api {
                status,
                message: entry.message,
                code: entry.code,
            }
        }
        None => BacklogError::Status(status),
    }
}

/// Percent-encode a key or ID so it occupies exactly one path segment.
/// `.` and `..` are rejected since URL parsing would resolve them even
/// when encoded.
pub(crate) fn path_segment(raw: &str) -> Result<String> {
    if raw.is_empty() || raw == "." || raw == ".." {
        return Err(BacklogError::invalid_input(format!(
            "'{}' is not a valid issue or project key",
            raw
        )));
    }
    Ok(url::form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('+', "%20"))
}

pub(crate) fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(body)?)
}

impl BacklogClient {
    /// Execute one authenticated request and return the raw response body.
    ///
    /// GET sends every parameter plus the API key in the query string.
    /// POST and PATCH send the parameters as a form body and the API key
    /// in the query string. Nothing is retried.
    pub async fn execute(&self, method: Method, path: &str, params: &Params) -> Result<Vec<u8>> {
        let url = format!("{}{}", self.base_url, path);
        let api_key = self.api_key.expose_secret();
        let pairs = params.sorted_pairs();

        let request = if method == Method::GET {
            let mut query = pairs;
            query.push((API_KEY_PARAM, api_key));
            self.http.get(&url).query(&query)
        } else if method == Method::POST || method == Method::PATCH {
            self.http
                .request(method.clone(), &url)
                .query(&[(API_KEY_PARAM, api_key)])
                .form(&pairs)
        } else {
            return Err(BacklogError::Configuration(format!(
                "Unsupported HTTP method: {}",
                method
            )));
        };

        tracing::debug!(%method, path, params = params.len(), "sending Backlog request");

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        tracing::debug!(status, bytes = body.len(), "received Backlog response");

        if status >= 400 {
            return Err(decode_error(status, &body));
        }

        Ok(body.to_vec())
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str, params: &Params) -> Result<T> {
        let body = self.execute(Method::GET, path, params).await?;
        decode(&body)
    }

    pub(crate) async fn post<T: DeserializeOwned>(&self, path: &str, params: &Params) -> Result<T> {
        let body = self.execute(Method::POST, path, params).await?;
        decode(&body)
    }

    pub(crate) async fn patch<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &Params,
    ) -> Result<T> {
        let body = self.execute(Method::PATCH, path, params).await?;
        decode(&body)
    }
}
