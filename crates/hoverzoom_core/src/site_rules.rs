//! Per-site URL rewrite rules.
//!
//! Image hosts often serve thumbnails from a URL that differs from the
//! original only by a size token. Each [`SiteRule`] recognizes one host and
//! rewrites such URLs to the largest variant. New hosts are supported by
//! registering another rule on the [`SiteRuleRegistry`].

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::LOG_PREFIX;

/// Size segments in Sina image paths, e.g. `/mw690/` or `/thumb150/`.
static SINA_SIZE_SEGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)/(thumb\w*|square|bmiddle|mw\d+|orj\d+)/").expect("valid Sina size regex")
});

/// The `name=` size parameter on Twitter media URLs.
static TWITTER_NAME_PARAM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"name=[a-zA-Z0-9_]+").expect("valid Twitter name regex"));

/// A host-specific rewrite from a thumbnail URL to its full-size form.
///
/// Rewrites must be idempotent: rewriting an already rewritten URL returns
/// `None` or the same URL.
pub trait SiteRule {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Whether this rule is responsible for `url`.
    fn matches(&self, url: &str) -> bool;

    /// The rewritten URL, or `None` if `url` is already in its final form.
    fn rewrite(&self, url: &str) -> Option<String>;
}

/// Sina image CDN: `/mw690/`, `/thumb150/`, `/orj360/`... become `/large/`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SinaImageRule;

impl SiteRule for SinaImageRule {
    fn name(&self) -> &'static str {
        "sina"
    }

    fn matches(&self, url: &str) -> bool {
        url.contains("sinaimg.cn")
    }

    fn rewrite(&self, url: &str) -> Option<String> {
        if url.contains("/large/") {
            return None;
        }
        let rewritten = SINA_SIZE_SEGMENT.replacen(url, 1, "/large/");
        (rewritten != url).then(|| rewritten.into_owned())
    }
}

/// Twitter media: the `name=` size parameter becomes `name=orig`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwitterMediaRule;

impl SiteRule for TwitterMediaRule {
    fn name(&self) -> &'static str {
        "twitter"
    }

    fn matches(&self, url: &str) -> bool {
        url.contains("pbs.twimg.com/media/")
    }

    fn rewrite(&self, url: &str) -> Option<String> {
        let rewritten = TWITTER_NAME_PARAM.replacen(url, 1, "name=orig");
        if rewritten != url {
            return Some(rewritten.into_owned());
        }
        if url.contains("name=orig") {
            return None;
        }
        let separator = if url.contains('?') { '&' } else { '?' };
        Some(format!("{url}{separator}name=orig"))
    }
}

/// Ordered list of site rules. The first rule that matches a URL decides.
pub struct SiteRuleRegistry {
    rules: Vec<Box<dyn SiteRule>>,
}

impl SiteRuleRegistry {
    /// An empty registry that passes every URL through unchanged.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Registry with the built-in host rules.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(SinaImageRule);
        registry.register(TwitterMediaRule);
        registry
    }

    /// Append a rule. Rules registered earlier take precedence.
    pub fn register(&mut self, rule: impl SiteRule + 'static) {
        self.rules.push(Box::new(rule));
    }

    /// Names of the registered rules, in evaluation order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|rule| rule.name())
    }

    /// Rewrite `url` with the first matching rule.
    ///
    /// Returns `url` unchanged when no rule matches or the matching rule has
    /// nothing to do.
    pub fn apply(&self, url: &str) -> String {
        let Some(rule) = self.rules.iter().find(|rule| rule.matches(url)) else {
            return url.to_string();
        };
        match rule.rewrite(url) {
            Some(rewritten) => {
                log::debug!(
                    "{LOG_PREFIX} {} rule rewrote {} -> {}",
                    rule.name(),
                    url,
                    rewritten
                );
                rewritten
            }
            None => url.to_string(),
        }
    }
}

impl Default for SiteRuleRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for SiteRuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
