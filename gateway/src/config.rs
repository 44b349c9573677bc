use derive_builder::Builder;
use reqwest::Url;
use std::fmt;
use std::time::Duration;

/// Public REST endpoint of the exchange.
pub const DEFAULT_BASE_URL: &str = "https://revx.revolut.com/api/1.0";
/// Environment variable holding the API key.
pub const CREDENTIAL_ENV: &str = "REVOLUTX_API_KEY";
/// Environment variable overriding [`DEFAULT_BASE_URL`].
pub const BASE_URL_ENV: &str = "REVOLUTX_API_URL";
/// Header carrying the API key on authenticated operations.
pub const CREDENTIAL_HEADER: &str = "X-API-KEY";

const DEFAULT_USER_AGENT: &str = concat!("revx-gateway/", env!("CARGO_PKG_VERSION"));

/// Exchange API key.
///
/// Never printed: `Debug` is redacted and no log line includes it.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Empty and whitespace-only keys count as no key at all.
    pub fn from_optional(key: Option<String>) -> Option<Self> {
        key.map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .map(Self)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Process-wide gateway settings, read once at startup.
#[derive(Builder, Clone, Debug)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct GatewayConfig {
    /// Base URL every operation path is appended to
    #[builder(setter(into), default = "DEFAULT_BASE_URL.to_string()")]
    pub base_url: String,
    /// API key for private operations
    #[builder(default)]
    pub credential: Option<Credential>,
    /// Per-request deadline handed to the HTTP client (none by default)
    #[builder(default)]
    pub request_timeout: Option<Duration>,
    /// User agent sent on every request
    #[builder(setter(into), default = "DEFAULT_USER_AGENT.to_string()")]
    pub user_agent: String,
}

impl GatewayConfig {
    pub fn builder() -> GatewayConfigBuilder {
        GatewayConfigBuilder::default()
    }
}

impl GatewayConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(base_url) = &self.base_url {
            let url = Url::parse(base_url).map_err(|e| format!("invalid base URL '{base_url}': {e}"))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(format!(
                    "invalid base URL '{base_url}': expected an http or https scheme"
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::builder().build().unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.credential.is_none());
        assert!(config.request_timeout.is_none());
        assert!(config.user_agent.starts_with("revx-gateway/"));
    }

    #[test]
    fn test_rejects_bad_base_url() {
        assert!(GatewayConfig::builder().base_url("not a url").build().is_err());
        assert!(GatewayConfig::builder()
            .base_url("ftp://example.com")
            .build()
            .is_err());
    }

    #[test]
    fn test_blank_credential_is_absent() {
        assert!(Credential::from_optional(None).is_none());
        assert!(Credential::from_optional(Some("   ".into())).is_none());
        let key = Credential::from_optional(Some(" abc ".into())).unwrap();
        assert_eq!(key.expose(), "abc");
    }

    #[test]
    fn test_credential_debug_is_redacted() {
        let key = Credential::new("super-secret");
        assert!(!format!("{key:?}").contains("super-secret"));
        let config = GatewayConfig::builder()
            .credential(Some(key))
            .build()
            .unwrap();
        assert!(!format!("{config:?}").contains("super-secret"));
    }
}
