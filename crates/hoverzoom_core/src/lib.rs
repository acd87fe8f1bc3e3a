//! HoverZoom core - platform-independent logic for floating image previews.
//!
//! Everything here is plain Rust: URL heuristics, preview geometry, the toggle
//! shortcut, and the [`PreviewController`] state machine. The controller talks
//! to the page through the [`HostPage`] trait so the browser adapter and the
//! tests can each supply their own host.

pub mod background;
pub mod config;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod host;
pub mod messages;
pub mod resolver;
pub mod site_rules;
pub mod toggle;
pub mod url;

pub use config::{HoverZoomConfig, LogLevel};
pub use controller::{Generation, KeyOutcome, PreviewController, PreviewPhase};
pub use error::{ConfigError, UrlError};
pub use geometry::{Point, Size, Viewport};
pub use host::{ElementKind, HostPage, LoadRequest};
pub use messages::Locale;
pub use resolver::UrlResolver;
pub use site_rules::{SiteRule, SiteRuleRegistry};
pub use toggle::{KeyInput, ToggleShortcut};

/// Prefix for every developer-facing log line.
pub const LOG_PREFIX: &str = "[HoverZoom]";
