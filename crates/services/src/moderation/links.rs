//! Link extraction.
//!
//! Candidates are found with a loose pattern and then kept only if they parse
//! as a well-formed URL with a fully-qualified host.

use once_cell::sync::Lazy;
use regex::Regex;
use url::{Host, Url};

/// `scheme://...`, `www.*`, or bare `host.tld[/path]`.
static LINK_CANDIDATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(https?://[^\s]+)|(www\.[^\s]+)|([^\s]+\.[a-z]{2,}(?:/[^\s]*)?)")
        .expect("LINK_CANDIDATE regex")
});

const MAX_URL_LENGTH: usize = 2083;
const MAX_LABEL_LENGTH: usize = 63;
const REMOVED_MARKER: &str = "[LINK REMOVED]";

/// Every link in `text`, in order of appearance. Duplicates are kept.
pub fn extract_links(text: &str) -> Vec<String> {
    LINK_CANDIDATE
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|candidate| is_well_formed_url(candidate))
        .map(str::to_string)
        .collect()
}

pub fn has_links(text: &str) -> bool {
    LINK_CANDIDATE
        .find_iter(text)
        .any(|m| is_well_formed_url(m.as_str()))
}

/// Replaces the first occurrence of each extracted link with a marker.
pub fn remove_links(text: &str) -> String {
    extract_links(text)
        .iter()
        .fold(text.to_string(), |acc, link| {
            acc.replacen(link.as_str(), REMOVED_MARKER, 1)
        })
}

fn is_well_formed_url(candidate: &str) -> bool {
    let lower = candidate.to_ascii_lowercase();
    let absolute = if lower.starts_with("http://") || lower.starts_with("https://") {
        candidate.to_string()
    } else {
        format!("http://{candidate}")
    };

    if absolute.len() > MAX_URL_LENGTH {
        return false;
    }

    let Ok(url) = Url::parse(&absolute) else {
        return false;
    };

    if !matches!(url.scheme(), "http" | "https" | "ftp") {
        return false;
    }

    match url.host() {
        Some(Host::Domain(domain)) => is_fqdn(domain),
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => true,
        None => false,
    }
}

/// At least two labels of `[a-z0-9-]`, alphabetic (or punycode) TLD of two
/// or more chars. Underscores never appear in a host name.
fn is_fqdn(domain: &str) -> bool {
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && label.len() <= MAX_LABEL_LENGTH
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
    });

    let tld = labels[labels.len() - 1];
    let tld_ok = tld.len() >= 2
        && (tld.chars().all(|c| c.is_ascii_alphabetic()) || tld.starts_with("xn--"));

    labels_ok && tld_ok
}
