//! Shared HTTP plumbing for upstream providers
//!
//! Every provider call goes through [`get_json`], which applies the per-call
//! timeout and classifies transport, status and parse failures into
//! [`SkycastError::Upstream`].

use std::fmt;
use std::time::{Duration, Instant};

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::{Result, SkycastError};

const USER_AGENT: &str = concat!("Skycast/", env!("CARGO_PKG_VERSION"));
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Upstream endpoints the pipeline talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    OpenWeatherGeocoding,
    GoogleGeocoding,
    OpenWeatherCurrent,
    OpenWeatherForecast,
    OpenWeatherAirQuality,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Provider::OpenWeatherGeocoding => "OpenWeatherMap geocoding",
            Provider::GoogleGeocoding => "Google geocoding",
            Provider::OpenWeatherCurrent => "OpenWeatherMap current weather",
            Provider::OpenWeatherForecast => "OpenWeatherMap forecast",
            Provider::OpenWeatherAirQuality => "OpenWeatherMap air quality",
        };
        f.write_str(name)
    }
}

/// Build the HTTP client shared by all providers of one pipeline
pub fn build_client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| SkycastError::config(format!("Failed to create HTTP client: {e}")))
}

/// Perform a GET and decode the JSON body, classifying every failure.
#[instrument(skip(client, url), fields(url = %redact(url)))]
pub async fn get_json<T: DeserializeOwned>(
    client: &Client,
    provider: Provider,
    url: &str,
    timeout: Duration,
) -> Result<T> {
    let start = Instant::now();

    let response = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| {
            let message = if e.is_timeout() {
                format!("timed out after {}ms", timeout.as_millis())
            } else {
                format!("network error: {e}")
            };
            warn!("{} call failed: {}", provider, message);
            SkycastError::upstream(provider, None, message)
        })?;

    let status = response.status();
    debug!(
        "{} responded {} in {:.3}s",
        provider,
        status,
        start.elapsed().as_secs_f64()
    );

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = format!(
            "HTTP {} {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown error"),
            truncate(&body, MAX_ERROR_BODY_CHARS)
        );
        warn!("{} returned non-success status: {}", provider, message);
        return Err(SkycastError::upstream(
            provider,
            Some(status.as_u16()),
            message,
        ));
    }

    let body = response.text().await.map_err(|e| {
        SkycastError::upstream(
            provider,
            Some(status.as_u16()),
            format!("failed to read body: {e}"),
        )
    })?;

    serde_json::from_str(&body).map_err(|e| {
        warn!("Failed to parse {} response: {}", provider, e);
        SkycastError::upstream(
            provider,
            Some(status.as_u16()),
            format!(
                "unexpected response body ({e}): {}",
                truncate(&body, MAX_ERROR_BODY_CHARS)
            ),
        )
    })
}

const SECRET_PARAMS: [&str; 2] = ["appid", "key"];

/// Strip credentials from a URL before it reaches the logs.
///
/// Input that does not parse as a URL loses its whole query string.
pub fn redact(url: &str) -> String {
    let Ok(mut parsed) = reqwest::Url::parse(url) else {
        return url.split('?').next().unwrap_or_default().to_string();
    };
    if parsed.query().is_none() {
        return parsed.to_string();
    }

    let pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .map(|(key, value)| {
            if SECRET_PARAMS.iter().any(|s| key.eq_ignore_ascii_case(s)) {
                (key.into_owned(), "***".to_string())
            } else {
                (key.into_owned(), value.into_owned())
            }
        })
        .collect();
    parsed.query_pairs_mut().clear().extend_pairs(pairs);
    parsed.to_string()
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{cut}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_hides_api_keys() {
        let url = "https://api.example.com/data?lat=1&lon=2&appid=secret123";
        assert_eq!(redact(url), "https://api.example.com/data?lat=1&lon=2&appid=***");

        let url = "https://maps.example.com/geocode/json?address=Paris&key=abc";
        assert_eq!(redact(url), "https://maps.example.com/geocode/json?address=Paris&key=***");

        assert_eq!(redact("https://example.com/health"), "https://example.com/health");
    }

    #[test]
    fn test_redact_repeated_and_encoded_params() {
        let url = "https://maps.example.com/geocode/json?q=a%3Db&key=x%3Dy&KEY=second&appid";
        assert_eq!(
            redact(url),
            "https://maps.example.com/geocode/json?q=a%3Db&key=***&KEY=***&appid=***"
        );
    }

    #[test]
    fn test_redact_unparseable_drops_query() {
        assert_eq!(redact("not a url?appid=secret"), "not a url");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 4), "abcd...");
    }

    #[test]
    fn test_provider_display() {
        assert_eq!(Provider::GoogleGeocoding.to_string(), "Google geocoding");
    }
}
