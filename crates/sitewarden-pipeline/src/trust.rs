//! Trusted-site check
//!
//! Substring containment between the current hostname and each
//! allowlist entry, both with one leading `www.` stripped. This is
//! deliberately permissive so that subdomains of a trusted domain stay
//! trusted, and knowingly over-permissive: a hostname that merely
//! *contains* a trusted domain (`google.com.evil.net`) also matches.
//! Tightening it to suffix-label matching would silently change which
//! pages get analyzed for existing allowlists.

/// Whether `domain` matches any entry in `trusted`
pub fn is_trusted(domain: &str, trusted: &[String]) -> bool {
    let domain = strip_www(domain);
    trusted.iter().any(|entry| {
        let entry = strip_www(entry);
        !entry.is_empty() && domain.contains(entry)
    })
}

/// Strip one leading `www.` if present
fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}
