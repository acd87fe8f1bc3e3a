//! Keyboard shortcut that switches previews on and off.

/// The parts of a keyboard event the shortcut looks at.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyInput {
    /// Control modifier held
    pub ctrl: bool,
    /// Layout-dependent key value, e.g. `"q"` or `"Q"`
    pub key: String,
    /// Physical key code, e.g. `"KeyQ"`
    pub code: String,
}

impl KeyInput {
    pub fn new(ctrl: bool, key: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            ctrl,
            key: key.into(),
            code: code.into(),
        }
    }
}

/// Ctrl + letter shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleShortcut {
    /// Letter matched case-insensitively against the key value
    pub key: char,
    /// Physical key code, matched regardless of keyboard layout
    pub code: &'static str,
}

impl Default for ToggleShortcut {
    fn default() -> Self {
        // Ctrl+Q
        Self {
            key: 'q',
            code: "KeyQ",
        }
    }
}

impl ToggleShortcut {
    /// Whether `input` triggers the toggle.
    pub fn matches(&self, input: &KeyInput) -> bool {
        if !input.ctrl {
            return false;
        }
        let mut chars = input.key.chars();
        let key_matches = matches!(
            (chars.next(), chars.next()),
            (Some(c), None) if c.eq_ignore_ascii_case(&self.key)
        );
        key_matches || input.code == self.code
    }
}
