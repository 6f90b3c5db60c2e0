//! Client and decorator configuration types.

use std::borrow::Cow;
use std::time::Duration;

use http::header::{AUTHORIZATION, COOKIE, HeaderName, PROXY_AUTHORIZATION, SET_COOKIE};

/// Configuration for the HTTP transport.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Time allowed for the response head to arrive.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    timeout: Option<Duration>,
}

impl ClientConfigBuilder {
    /// Set the request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> ClientConfig {
        let defaults = ClientConfig::default();
        ClientConfig {
            timeout: self.timeout.unwrap_or(defaults.timeout),
        }
    }
}

/// What the debug decorator does when a body stream fails while it is being
/// captured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CaptureFailure {
    /// Panic. A body stream failing under inspection is treated as a broken
    /// transport contract.
    #[default]
    Abort,
    /// Log the failure at error severity and keep going. The body handed
    /// downstream yields the bytes read so far, then the original error.
    Skip,
}

/// Configuration for [`DebugDump`](crate::middleware::DebugDump).
#[derive(Debug, Clone)]
pub struct DebugConfig {
    /// Component name attached to every log record.
    pub component: Cow<'static, str>,
    /// Headers whose values are replaced by `<redacted>` in dumps.
    pub redacted_headers: Vec<HeaderName>,
    /// Behavior when a body stream fails during capture.
    pub capture_failure: CaptureFailure,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            component: Cow::Borrowed("http/debug"),
            redacted_headers: vec![AUTHORIZATION, PROXY_AUTHORIZATION, COOKIE, SET_COOKIE],
            capture_failure: CaptureFailure::Abort,
        }
    }
}

impl DebugConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> DebugConfigBuilder {
        DebugConfigBuilder::default()
    }

    /// Returns `true` if values of this header are hidden in dumps.
    #[must_use]
    pub fn is_redacted(&self, name: &HeaderName) -> bool {
        self.redacted_headers.contains(name)
    }
}

/// Builder for [`DebugConfig`].
#[derive(Debug, Clone, Default)]
pub struct DebugConfigBuilder {
    component: Option<Cow<'static, str>>,
    redacted_headers: Option<Vec<HeaderName>>,
    extra_redacted: Vec<HeaderName>,
    capture_failure: Option<CaptureFailure>,
}

impl DebugConfigBuilder {
    /// Set the component name attached to log records.
    #[must_use]
    pub fn component(mut self, component: impl Into<Cow<'static, str>>) -> Self {
        self.component = Some(component.into());
        self
    }

    /// Hide values of one more header, on top of the defaults.
    #[must_use]
    pub fn redact(mut self, name: HeaderName) -> Self {
        self.extra_redacted.push(name);
        self
    }

    /// Drop the default redaction list. Headers added with
    /// [`redact`](Self::redact) and values marked sensitive stay hidden.
    #[must_use]
    pub fn no_default_redaction(mut self) -> Self {
        self.redacted_headers = Some(Vec::new());
        self
    }

    /// Set the capture failure behavior.
    #[must_use]
    pub const fn capture_failure(mut self, policy: CaptureFailure) -> Self {
        self.capture_failure = Some(policy);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> DebugConfig {
        let defaults = DebugConfig::default();
        let mut redacted_headers = self
            .redacted_headers
            .unwrap_or(defaults.redacted_headers);
        for name in self.extra_redacted {
            if !redacted_headers.contains(&name) {
                redacted_headers.push(name);
            }
        }

        DebugConfig {
            component: self.component.unwrap_or(defaults.component),
            redacted_headers,
            capture_failure: self.capture_failure.unwrap_or(defaults.capture_failure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn builder_overrides() {
        let config = ClientConfig::builder()
            .timeout(Duration::from_secs(60))
            .build();

        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[test]
    fn default_debug_config() {
        let config = DebugConfig::default();
        assert_eq!(config.component, "http/debug");
        assert_eq!(config.capture_failure, CaptureFailure::Abort);
        assert!(config.is_redacted(&AUTHORIZATION));
        assert!(config.is_redacted(&SET_COOKIE));
        assert!(!config.is_redacted(&http::header::CONTENT_TYPE));
    }

    #[test]
    fn debug_builder_overrides() {
        let config = DebugConfig::builder()
            .component("billing/http")
            .redact(HeaderName::from_static("x-api-key"))
            .redact(AUTHORIZATION)
            .capture_failure(CaptureFailure::Skip)
            .build();

        assert_eq!(config.component, "billing/http");
        assert_eq!(config.capture_failure, CaptureFailure::Skip);
        assert!(config.is_redacted(&HeaderName::from_static("x-api-key")));
        assert_eq!(
            config
                .redacted_headers
                .iter()
                .filter(|name| **name == AUTHORIZATION)
                .count(),
            1
        );
    }

    #[test]
    fn debug_builder_without_defaults() {
        let config = DebugConfig::builder()
            .no_default_redaction()
            .redact(HeaderName::from_static("x-api-key"))
            .build();

        assert!(!config.is_redacted(&AUTHORIZATION));
        assert!(config.is_redacted(&HeaderName::from_static("x-api-key")));
    }
}
