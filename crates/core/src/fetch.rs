//! Content fetching from URLs, files, and stdin.
//!
//! This module provides functions for retrieving HTML content from
//! HTTP/HTTPS URLs, local files, and standard input. Every network request
//! runs with a timeout and a bounded number of retries.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::{Client, Response};
use url::Url;

use crate::{Qa2TexError, Result};

/// HTTP client configuration for fetching pages and images.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Custom User-Agent string.
    pub user_agent: String,
    /// How many times a failed request is retried.
    ///
    /// Only timeouts, connection failures and 5xx responses are retried.
    pub retries: u32,
    /// Delay before the first retry, in milliseconds. Grows linearly.
    pub retry_delay_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: 30,
            user_agent: "Mozilla/5.0 (compatible; qa2tex/1.0)".to_string(),
            retries: 2,
            retry_delay_ms: 500,
        }
    }
}

/// Builds a client honoring the configured timeout and User-Agent.
pub fn build_client(config: &FetchConfig) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout))
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(Qa2TexError::HttpError)
}

/// Parses and validates an absolute http(s) URL.
pub fn parse_url(url: &str) -> Result<Url> {
    let parsed_url = Url::parse(url).map_err(|e| Qa2TexError::InvalidUrl(e.to_string()))?;

    if !matches!(parsed_url.scheme(), "http" | "https") {
        return Err(Qa2TexError::InvalidUrl(
            "URL must include a scheme (http:// or https://)".to_string(),
        ));
    }

    Ok(parsed_url)
}

/// Sends a GET request, retrying transient failures.
///
/// Returns the first successful response. Client errors (4xx) fail
/// immediately; the last transient error is returned once retries run out.
pub async fn get_with_retry(client: &Client, url: &Url, config: &FetchConfig) -> Result<Response> {
    let mut attempt = 0;

    loop {
        let outcome = client
            .get(url.clone())
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .and_then(Response::error_for_status);

        let err = match outcome {
            Ok(response) => return Ok(response),
            Err(e) => e,
        };

        let transient = err.is_timeout() || err.is_connect() || err.status().is_some_and(|s| s.is_server_error());

        if !transient || attempt >= config.retries {
            return Err(if err.is_timeout() {
                Qa2TexError::Timeout { timeout: config.timeout }
            } else {
                Qa2TexError::HttpError(err)
            });
        }

        attempt += 1;
        tracing::debug!(%url, attempt, error = %err, "retrying request");
        tokio::time::sleep(Duration::from_millis(config.retry_delay_ms * u64::from(attempt))).await;
    }
}

/// Fetches HTML content from a URL.
///
/// A non-success status (such as a 404 page) is an error.
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<String> {
    let parsed_url = parse_url(url)?;
    let client = build_client(config)?;
    let response = get_with_retry(&client, &parsed_url, config).await?;
    let content = response.text().await?;

    Ok(content)
}

/// Reads HTML content from a local file.
///
/// Callers should validate and sanitize the path when accepting user input.
pub fn fetch_file(path: &str) -> Result<String> {
    let path_buf = PathBuf::from(path);

    if !path_buf.exists() {
        Err(Qa2TexError::FileNotFound(path_buf))
    } else {
        fs::read_to_string(&path_buf).map_err(Qa2TexError::from)
    }
}

/// Reads HTML content from standard input until EOF.
pub fn fetch_stdin() -> Result<String> {
    use std::io::{self, Read};

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(Qa2TexError::from)?;

    Ok(buffer)
}
