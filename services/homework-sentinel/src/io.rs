//! HTTP client abstraction for testability

use std::time::Duration;

use async_trait::async_trait;

/// HTTP response from a request
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Abstraction over HTTP client for dependency injection
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait HttpClient: Send + Sync {
    /// Send a GET request with extra headers and query parameters
    async fn get(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        query: &[(&str, &str)],
    ) -> crate::Result<HttpResponse>;

    /// Send a POST request with form-encoded body
    async fn post_form(&self, url: &str, params: &[(&str, &str)]) -> crate::Result<HttpResponse>;
}

/// Production HTTP client using reqwest
#[derive(Default)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Client whose requests give up after `timeout`
    pub fn with_timeout(timeout: Duration) -> crate::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| crate::SentinelError::Config(format!("Building HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

async fn into_response(
    method: &str,
    url: &reqwest::Url,
    response: reqwest::Response,
) -> crate::Result<HttpResponse> {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .map_err(|e| crate::SentinelError::Http(format!("Reading response body: {}", e)))?;

    tracing::debug!(
        "{} {} -> {} ({} bytes)",
        method,
        url.path(),
        status,
        body.len()
    );
    Ok(HttpResponse { status, body })
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        query: &[(&str, &str)],
    ) -> crate::Result<HttpResponse> {
        let url = reqwest::Url::parse_with_params(url, query)
            .map_err(|e| crate::SentinelError::Http(format!("Invalid URL {}: {}", url, e)))?;
        tracing::debug!("GET {}", url.path());

        let mut request = self.client.get(url.clone());
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let response = request
            .send()
            .await
            .map_err(|e| crate::SentinelError::Http(format!("GET {} failed: {}", url, e)))?;

        into_response("GET", &url, response).await
    }

    async fn post_form(&self, url: &str, params: &[(&str, &str)]) -> crate::Result<HttpResponse> {
        let url = reqwest::Url::parse(url)
            .map_err(|e| crate::SentinelError::Http(format!("Invalid URL {}: {}", url, e)))?;
        // The path may embed a bot token, so only the host is logged
        tracing::debug!("POST {}", url.host_str().unwrap_or_default());

        let response = self
            .client
            .post(url.clone())
            .form(params)
            .send()
            .await
            .map_err(|e| {
                crate::SentinelError::Http(format!(
                    "POST to {} failed: {}",
                    url.host_str().unwrap_or_default(),
                    e.without_url()
                ))
            })?;

        into_response("POST", &url, response).await
    }
}
