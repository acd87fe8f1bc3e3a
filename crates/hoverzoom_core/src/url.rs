//! Validity checks for preview candidate URLs.
//!
//! A candidate is accepted only if it resolves, relative to the document's
//! location, to an `http` or `https` URL. Data URIs, `javascript:` links and
//! anything malformed are rejected.

use url::Url;

use crate::error::UrlError;

/// Parse `candidate` relative to `base` and check its scheme.
pub fn parse_image_url(candidate: &str, base: &str) -> Result<Url, UrlError> {
    let candidate = candidate.trim();
    if candidate.is_empty() {
        return Err(UrlError::Empty);
    }

    let parsed = match Url::parse(base) {
        Ok(base) => base.join(candidate),
        Err(_) => Url::parse(candidate),
    }
    .map_err(|source| UrlError::Unparsable {
        url: candidate.to_string(),
        source,
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(UrlError::DisallowedScheme {
            scheme: scheme.to_string(),
        }),
    }
}

/// Whether `candidate` is a usable image URL for a document at `base`.
pub fn is_valid_image_url(candidate: &str, base: &str) -> bool {
    parse_image_url(candidate, base).is_ok()
}
