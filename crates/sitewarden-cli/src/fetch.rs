//! Page snapshot fetching
//!
//! Validates user-supplied page URLs before fetching so the analyzer
//! cannot be pointed at loopback, link-local, or cloud metadata
//! addresses, then downloads the HTML snapshot the pipeline inspects.

use std::net::IpAddr;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Page URL validation errors
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("URL scheme '{0}' is not allowed, only http and https are permitted")]
    InvalidScheme(String),

    #[error("Host '{0}' is blocked: internal/private addresses are not allowed")]
    BlockedHost(String),

    #[error("URL must have a host")]
    MissingHost,
}

/// Hostnames that should never be fetched as pages
const BLOCKED_HOSTNAMES: &[&str] = &[
    "localhost",
    "localhost.localdomain",
    // Cloud metadata services
    "metadata.google.internal",
    "metadata.goog",
    "169.254.169.254",
];

/// Validate a page URL before fetching.
///
/// `allow_private` permits loopback and RFC 1918 addresses for
/// development against local test pages.
pub fn validate_page_url(url_str: &str, allow_private: bool) -> Result<Url, FetchError> {
    let url = Url::parse(url_str)?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(FetchError::InvalidScheme(scheme.to_string())),
    }

    let host = url.host_str().ok_or(FetchError::MissingHost)?;

    if !allow_private {
        let host_lower = host.to_lowercase();
        for blocked in BLOCKED_HOSTNAMES {
            if host_lower == *blocked || host_lower.ends_with(&format!(".{}", blocked)) {
                return Err(FetchError::BlockedHost(host.to_string()));
            }
        }
    }

    if let Ok(ip) = host.parse::<IpAddr>() {
        if !allow_private && (is_loopback(&ip) || is_private_ip(&ip)) {
            return Err(FetchError::BlockedHost(host.to_string()));
        }
        // Link-local covers the cloud metadata endpoint
        if is_link_local(&ip) {
            return Err(FetchError::BlockedHost(host.to_string()));
        }
    }

    Ok(url)
}

/// Download a page snapshot
pub async fn fetch_page(url: &Url, timeout: Duration) -> anyhow::Result<String> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("sitewarden/", env!("CARGO_PKG_VERSION")))
        .build()?;

    debug!(url = %url, "fetching page snapshot");
    let response = client.get(url.clone()).send().await?;

    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("page fetch failed: {}", status);
    }

    Ok(response.text().await?)
}

fn is_loopback(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_loopback(),
        IpAddr::V6(v6) => v6.is_loopback(),
    }
}

fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_private()
                // 100.64.0.0/10 (Carrier-grade NAT)
                || (v4.octets()[0] == 100 && (v4.octets()[1] & 0xC0) == 64)
                // 0.0.0.0/8 (current network)
                || v4.octets()[0] == 0
        }
        IpAddr::V6(v6) => {
            // fc00::/7 (Unique Local Address)
            (v6.segments()[0] & 0xfe00) == 0xfc00
        }
    }
}

fn is_link_local(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.octets()[0] == 169 && v4.octets()[1] == 254,
        IpAddr::V6(v6) => (v6.segments()[0] & 0xffc0) == 0xfe80,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_http_and_https_allowed() {
        assert!(validate_page_url("https://example.com/login", false).is_ok());
        assert!(validate_page_url("http://example.com", false).is_ok());
    }

    #[test]
    fn test_other_schemes_blocked() {
        let result = validate_page_url("file:///etc/passwd", false);
        assert!(matches!(result, Err(FetchError::InvalidScheme(_))));

        let result = validate_page_url("ftp://example.com", false);
        assert!(matches!(result, Err(FetchError::InvalidScheme(_))));
    }

    #[test]
    fn test_localhost_blocked_by_default() {
        let result = validate_page_url("http://localhost:8080", false);
        assert!(matches!(result, Err(FetchError::BlockedHost(_))));

        let result = validate_page_url("http://127.0.0.1", false);
        assert!(matches!(result, Err(FetchError::BlockedHost(_))));
    }

    #[test]
    fn test_private_ranges_blocked_by_default() {
        for url in [
            "http://10.0.0.1",
            "http://192.168.1.1",
            "http://172.16.0.1",
        ] {
            let result = validate_page_url(url, false);
            assert!(matches!(result, Err(FetchError::BlockedHost(_))), "{}", url);
        }
    }

    #[test]
    fn test_metadata_endpoint_always_blocked() {
        let result = validate_page_url("http://169.254.169.254/latest/meta-data/", false);
        assert!(result.is_err());

        // Link-local stays blocked even with --allow-private
        let result = validate_page_url("http://169.254.169.254/", true);
        assert!(result.is_err());
    }

    #[test]
    fn test_allow_private_permits_localhost() {
        assert!(validate_page_url("http://localhost:3000/page", true).is_ok());
        assert!(validate_page_url("http://192.168.1.10/page", true).is_ok());
    }
}
