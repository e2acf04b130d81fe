//! Utility functions for markup attribute handling.

use htmldocx_core::Colour;
use once_cell::sync::Lazy;
use regex::Regex;

static BACKGROUND_DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:^|;)\s*background(?:-color)?\s*:\s*([^;!]+)")
        .expect("valid background regex")
});

/// Background colour declared in an inline `style` attribute
pub fn background_from_style(style: &str) -> Option<Colour> {
    BACKGROUND_DECLARATION
        .captures_iter(style)
        .filter_map(|caps| caps.get(1))
        .filter_map(|value| Colour::parse(value.as_str()))
        .last()
}

/// Check if text carries no visible content
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Check if a source points at a remote resource
pub fn is_remote_source(src: &str) -> bool {
    let lower = src.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
