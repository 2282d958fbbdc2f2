//! URL canonicalization for evidence deduplication
//!
//! Two citations are the same evidence iff their canonical URLs are equal.
//! The rule: lower-case scheme and host, drop default ports and fragments,
//! and strip known tracking query parameters only. Other parameters keep
//! their original order and encoding.

use crate::DomainError;
use url::Url;

/// Query keys that never identify content
const TRACKING_KEYS: &[&str] = &[
    "fbclid", "gclid", "dclid", "msclkid", "yclid", "mc_cid", "mc_eid", "igshid", "_ga", "_gl",
    "ref_src", "ref_url",
];

/// Canonicalize an evidence URL
///
/// # Errors
///
/// Returns [`DomainError::InvalidUrl`] for unparsable URLs, URLs without a
/// host, and schemes other than `http`/`https`.
///
/// # Examples
///
/// ```
/// use concord_domain::canonicalize_url;
///
/// let url = canonicalize_url("HTTPS://Www.Reuters.com:443/world?id=7&utm_source=x#top").unwrap();
/// assert_eq!(url, "https://www.reuters.com/world?id=7");
/// ```
pub fn canonicalize_url(raw: &str) -> Result<String, DomainError> {
    let invalid = |reason: String| DomainError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };

    let mut url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme '{}'", other))),
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }

    url.set_fragment(None);

    if let Some(query) = url.query() {
        let kept: Vec<&str> = query
            .split('&')
            .filter(|segment| !segment.is_empty() && !is_tracking_segment(segment))
            .collect();
        if kept.is_empty() {
            url.set_query(None);
        } else {
            let rebuilt = kept.join("&");
            url.set_query(Some(&rebuilt));
        }
    }

    Ok(url.to_string())
}

fn is_tracking_segment(segment: &str) -> bool {
    let key = segment.split('=').next().unwrap_or_default().to_ascii_lowercase();
    key.starts_with("utm_") || TRACKING_KEYS.contains(&key.as_str())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: canonicalization is idempotent
        #[test]
        fn test_canonical_is_fixed_point(
            host in "[a-zA-Z]{1,10}\\.(com|org|GOV)",
            path in "(/[a-z0-9]{0,6}){0,3}",
            keep in proptest::collection::vec("[a-z]{1,4}=[0-9]{1,3}", 0..3),
            track in proptest::collection::vec("utm_[a-z]{1,5}=[a-z]{1,3}", 0..3),
        ) {
            let mut params = keep.clone();
            params.extend(track);
            let query = if params.is_empty() {
                String::new()
            } else {
                format!("?{}", params.join("&"))
            };
            let raw = format!("https://{}{}{}", host, path, query);

            let once = canonicalize_url(&raw).unwrap();
            let twice = canonicalize_url(&once).unwrap();
            prop_assert_eq!(&once, &twice);
            prop_assert!(!once.contains("utm_"));
            prop_assert_eq!(once.contains('?'), !keep.is_empty());
        }
    }
}
