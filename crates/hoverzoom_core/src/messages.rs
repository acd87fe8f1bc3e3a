//! User-facing banner text.

use serde::{Deserialize, Serialize};

/// Language of the on/off banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    English,
    Chinese,
}

impl Locale {
    /// Pick a locale from a BCP 47 tag such as `navigator.language`.
    pub fn from_language_tag(tag: &str) -> Self {
        let primary = tag.split(['-', '_']).next().unwrap_or_default();
        if primary.eq_ignore_ascii_case("zh") {
            Locale::Chinese
        } else {
            Locale::English
        }
    }
}

/// Banner text announcing the new active state.
pub fn toggle_message(locale: Locale, active: bool) -> &'static str {
    match (locale, active) {
        (Locale::English, true) => "Image hover zoom enabled",
        (Locale::English, false) => "Image hover zoom disabled",
        (Locale::Chinese, true) => "图片悬浮放大功能已开启",
        (Locale::Chinese, false) => "图片悬浮放大功能已关闭",
    }
}
