//! HTTP transport for remote collectors
//!
//! POSTs a JSON array of events to `{address}/events`. Address problems are
//! configuration errors raised at construction time; transport problems at
//! delivery time are reported as outcomes for the batching sink's retry
//! policy.

use super::batched::Transport;
use crate::core::{LogEvent, LoggerError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use url::Url;

const EVENTS_PATH: &str = "/events";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Strip a trailing path separator so concatenation with the events sub-path
/// is unambiguous.
///
/// # Errors
///
/// Returns [`LoggerError::InvalidConfiguration`] if the address is empty.
pub fn normalize_address(address: &str) -> Result<String> {
    if address.is_empty() {
        return Err(LoggerError::config(
            "HttpTransport",
            "collector address may not be empty",
        ));
    }
    Ok(address.trim_end_matches('/').to_string())
}

pub struct HttpTransport {
    client: reqwest::Client,
    address: String,
    events_url: Url,
}

impl HttpTransport {
    /// Create a transport for the given collector address.
    ///
    /// The address must be an absolute URL; a trailing slash is stripped.
    /// Misconfiguration fails here, never at first use.
    pub fn new(address: &str) -> Result<Self> {
        let address = normalize_address(address)?;
        let events_url = Url::parse(&format!("{}{}", address, EVENTS_PATH)).map_err(|e| {
            LoggerError::config("HttpTransport", format!("invalid collector URL: {}", e))
        })?;

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| {
                LoggerError::config("HttpTransport", format!("failed to build client: {}", e))
            })?;

        Ok(Self {
            client,
            address,
            events_url,
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, events: &[LogEvent]) -> Result<()> {
        let body: Vec<Value> = events.iter().map(LogEvent::to_json).collect();

        let response = self
            .client
            .post(self.events_url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| LoggerError::delivery(&self.address, 1, e.to_string()))?;

        if !response.status().is_success() {
            return Err(LoggerError::delivery(
                &self.address,
                1,
                format!("HTTP {}", response.status().as_u16()),
            ));
        }
        Ok(())
    }

    fn endpoint(&self) -> &str {
        &self.address
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LogEventLevel, MessageTemplate};
    use std::collections::HashMap;

    #[test]
    fn test_rejects_an_empty_address() {
        assert!(HttpTransport::new("").is_err());
        assert!(matches!(
            normalize_address(""),
            Err(LoggerError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_strips_trailing_slash() {
        let transport = HttpTransport::new("https://test/").unwrap();
        assert_eq!(transport.address(), "https://test");
        assert_eq!(transport.events_url.as_str(), "https://test/events");
    }

    #[test]
    fn test_rejects_a_relative_address() {
        assert!(HttpTransport::new("not-a-url").is_err());
    }

    #[tokio::test]
    async fn test_posts_a_json_event_array() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/events")
            .match_header("content-type", "application/json")
            .with_status(201)
            .create_async()
            .await;

        let transport = HttpTransport::new(&server.url()).unwrap();
        let template = MessageTemplate::parse("Test {word}").unwrap();
        let properties = template.bind_properties(&[serde_json::json!("banana")]);
        let events = vec![LogEvent::new(LogEventLevel::INFORMATION, template, properties)];

        transport.send(&events).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_reports_http_failure_as_an_outcome() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/events")
            .with_status(503)
            .create_async()
            .await;

        let transport = HttpTransport::new(&server.url()).unwrap();
        let template = MessageTemplate::parse("Test").unwrap();
        let events = vec![LogEvent::new(
            LogEventLevel::INFORMATION,
            template,
            HashMap::new(),
        )];

        let err = transport.send(&events).await.unwrap_err();
        assert!(matches!(err, LoggerError::DeliveryFailure { .. }));
    }
}
