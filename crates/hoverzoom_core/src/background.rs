//! Extraction of image URLs from CSS `background-image` values.

use once_cell::sync::Lazy;
use regex::Regex;

static CSS_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)url\(['"]?(.*?)['"]?\)"#).expect("valid CSS url regex"));

/// First `url(...)` reference in a computed `background-image` value.
///
/// Returns `None` for `none`, empty values, gradients and empty references.
pub fn extract_background_url(css: &str) -> Option<String> {
    let css = css.trim();
    if css.is_empty() || css == "none" {
        return None;
    }
    CSS_URL
        .captures(css)
        .and_then(|captures| captures.get(1))
        .map(|url| url.as_str())
        .filter(|url| !url.is_empty())
        .map(str::to_string)
}
