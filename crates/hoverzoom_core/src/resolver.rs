//! Best-guess full-size URL for a hovered image.
//!
//! Resolution order:
//! 1. site rewrite of the observed URL (see [`SiteRuleRegistry`])
//! 2. the first "full-size" attribute on the source element holding a valid URL
//! 3. for an `<img>` inside a link, the link target when it points at an image file
//! 4. the rewritten (or untouched) observed URL
//!
//! Steps 2 and 3 take precedence over step 1 when they find something.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::HoverZoomConfig;
use crate::site_rules::SiteRuleRegistry;
use crate::url::parse_image_url;
use crate::LOG_PREFIX;

static DIRECT_IMAGE_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\.(jpeg|jpg|gif|png|webp|bmp)(\?|$)").expect("valid image link regex")
});

/// Read access to the element that supplied a candidate URL.
pub trait AttributeLookup {
    /// Value of attribute `name`, if present.
    fn attribute(&self, name: &str) -> Option<String>;

    /// Whether the element is an `<img>`.
    fn is_image(&self) -> bool;

    /// Target of the closest enclosing hyperlink, if any.
    fn enclosing_link_href(&self) -> Option<String>;
}

/// Maps an observed image URL to the largest variant we can find.
#[derive(Debug)]
pub struct UrlResolver {
    rules: SiteRuleRegistry,
    high_res_attributes: Vec<String>,
}

impl UrlResolver {
    pub fn new(rules: SiteRuleRegistry, high_res_attributes: Vec<String>) -> Self {
        Self {
            rules,
            high_res_attributes,
        }
    }

    /// Resolver with the built-in site rules and the configured attributes.
    pub fn from_config(config: &HoverZoomConfig) -> Self {
        Self::new(
            SiteRuleRegistry::with_defaults(),
            config.high_res_attributes.clone(),
        )
    }

    /// Register an additional site rule after the built-in ones.
    pub fn rules_mut(&mut self) -> &mut SiteRuleRegistry {
        &mut self.rules
    }

    /// Resolve `raw_url`, observed on `source`, for a document at `base`.
    pub fn resolve(&self, raw_url: &str, source: &dyn AttributeLookup, base: &str) -> String {
        let rewritten = self.rules.apply(raw_url);

        if let Some(url) = self.scan_attributes(source, base) {
            return url;
        }
        if let Some(url) = self.link_target(source, base) {
            return url;
        }

        if rewritten == raw_url {
            log::debug!("{LOG_PREFIX} No higher resolution source found, using {raw_url}");
        }
        rewritten
    }

    fn scan_attributes(&self, source: &dyn AttributeLookup, base: &str) -> Option<String> {
        self.high_res_attributes.iter().find_map(|attr| {
            let value = source.attribute(attr)?;
            let url = parse_image_url(&value, base).ok()?;
            log::debug!("{LOG_PREFIX} Found high-res URL in {attr}: {url}");
            Some(url.into())
        })
    }

    fn link_target(&self, source: &dyn AttributeLookup, base: &str) -> Option<String> {
        if !source.is_image() {
            return None;
        }
        let href = source.enclosing_link_href()?;
        let url = parse_image_url(&href, base).ok()?;
        if !DIRECT_IMAGE_LINK.is_match(url.as_str()) {
            return None;
        }
        log::debug!("{LOG_PREFIX} Found high-res URL in parent link: {url}");
        Some(url.into())
    }
}

impl Default for UrlResolver {
    fn default() -> Self {
        Self::from_config(&HoverZoomConfig::default())
    }
}
