//! Crate-level error types.

use std::fmt;

/// Errors produced by the widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetError {
    /// The bootstrap `<script>` element was not found on the page.
    MissingBootstrapScript {
        /// Element id that was looked up.
        id: String,
    },
    /// The bootstrap script's `src` could not be turned into a trusted
    /// origin.
    InvalidScriptSource {
        /// Raw `src` attribute value (empty when absent).
        src: String,
        /// Why it was rejected.
        reason: String,
    },
    /// A product link carried no usable target URL.
    InvalidProductLink {
        /// Raw `href` attribute value (empty when absent).
        href: String,
        /// Why it was rejected.
        reason: String,
    },
    /// TOML/JSON config parsing failure.
    ConfigParse(String),
    /// The DOM backend rejected an operation.
    Dom(String),
}

impl fmt::Display for WidgetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingBootstrapScript { id } => {
                write!(f, "bootstrap script #{id} not found")
            }
            Self::InvalidScriptSource { src, reason } => {
                write!(f, "invalid bootstrap script source '{src}': {reason}")
            }
            Self::InvalidProductLink { href, reason } => {
                write!(f, "invalid product link '{href}': {reason}")
            }
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::Dom(msg) => write!(f, "DOM error: {msg}"),
        }
    }
}

impl std::error::Error for WidgetError {}

impl From<toml::de::Error> for WidgetError {
    fn from(e: toml::de::Error) -> Self {
        Self::ConfigParse(e.to_string())
    }
}

impl From<serde_json::Error> for WidgetError {
    fn from(e: serde_json::Error) -> Self {
        Self::ConfigParse(e.to_string())
    }
}
