use reqwest::{Client, ClientBuilder};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;
use crate::error::DrugscopeError;

/// Hosts every drugscope deployment talks to.
const DEFAULT_ALLOWED_HOSTS: &[&str] = &[
    "pubchem.ncbi.nlm.nih.gov", // PubChem PUG-REST
];

/// An HTTP client capped to an allowlist of hosts.
///
/// The registry and prediction clients share this type; anything outside the
/// allowlist is refused before a connection is attempted.
#[derive(Debug, Clone)]
pub struct SandboxClient {
    client: Client,
    allowlist: HashSet<String>,
}

impl SandboxClient {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Creates a client with the default allowlist and the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self, DrugscopeError> {
        let client = ClientBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("drugscope/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DrugscopeError::Config(format!("Failed to build HTTP client: {}", e)))?;

        let allowlist = DEFAULT_ALLOWED_HOSTS.iter().map(|h| h.to_string()).collect();

        Ok(Self { client, allowlist })
    }

    /// Appends an exact hostname to the allowlist.
    pub fn allow_domain(&mut self, domain: &str) {
        self.allowlist.insert(domain.to_ascii_lowercase());
    }

    /// Appends the host of `base_url` to the allowlist.
    pub fn allow_base_url(&mut self, base_url: &str) -> Result<(), DrugscopeError> {
        let parsed = Url::parse(base_url)
            .map_err(|e| DrugscopeError::Config(format!("Invalid base URL {}: {}", base_url, e)))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| DrugscopeError::Config(format!("Base URL has no host: {}", base_url)))?;
        self.allow_domain(host);
        Ok(())
    }

    /// Builder-style variant of [`allow_base_url`](Self::allow_base_url).
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, DrugscopeError> {
        self.allow_base_url(base_url)?;
        Ok(self)
    }

    /// Validates if a URL is permitted under the current policy.
    pub fn is_allowed(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        let Some(host) = parsed.host_str() else {
            return false;
        };
        // Exact match or a subdomain of an allowed host
        self.allowlist
            .iter()
            .any(|allowed| host == allowed || host.ends_with(&format!(".{}", allowed)))
    }

    fn check(&self, url: &str) -> Result<(), DrugscopeError> {
        if self.is_allowed(url) {
            Ok(())
        } else {
            Err(DrugscopeError::Security(format!("domain not in allowlist for URL {}", url)))
        }
    }

    pub fn get(&self, url: &str) -> Result<reqwest::RequestBuilder, DrugscopeError> {
        self.check(url)?;
        Ok(self.client.get(url))
    }

    pub fn post(&self, url: &str) -> Result<reqwest::RequestBuilder, DrugscopeError> {
        self.check(url)?;
        Ok(self.client.post(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pubchem_allowed_by_default() {
        let client = SandboxClient::new(SandboxClient::DEFAULT_TIMEOUT).unwrap();
        assert!(client.is_allowed("https://pubchem.ncbi.nlm.nih.gov/rest/pug/compound/cid/2244/PNG"));
        assert!(!client.is_allowed("https://example.com/predict"));
        assert!(!client.is_allowed("not a url"));
    }

    #[test]
    fn test_backend_host_added_from_base_url() {
        let client = SandboxClient::new(SandboxClient::DEFAULT_TIMEOUT)
            .unwrap()
            .with_base_url("http://localhost:8000")
            .unwrap();
        assert!(client.is_allowed("http://localhost:8000/predict"));
        assert!(client.get("http://localhost:8000/").is_ok());
    }

    #[test]
    fn test_lookalike_host_rejected() {
        let client = SandboxClient::new(SandboxClient::DEFAULT_TIMEOUT).unwrap();
        assert!(!client.is_allowed("https://evilpubchem.ncbi.nlm.nih.gov.attacker.io/"));
        assert!(matches!(
            client.post("https://attacker.io/"),
            Err(DrugscopeError::Security(_))
        ));
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let mut client = SandboxClient::new(SandboxClient::DEFAULT_TIMEOUT).unwrap();
        assert!(matches!(client.allow_base_url("::nope"), Err(DrugscopeError::Config(_))));
    }
}
