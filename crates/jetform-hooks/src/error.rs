//! Hook error types.

use std::fmt;

/// Errors raised while running a hook.
#[derive(Debug)]
pub enum HookError {
    /// No hook is registered under this name.
    UnknownHook(String),
    /// A required `data-*` attribute is absent.
    MissingData {
        /// Element selector of the chart.
        chart: &'static str,
        /// Missing attribute.
        attribute: &'static str,
    },
    /// `data-buckets` is not the expected JSON.
    BadData(serde_json::Error),
    /// `<meta name="captcha-sitekey">` is absent.
    MissingSiteKey,
    /// The external renderer failed.
    Render(String),
}

impl fmt::Display for HookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownHook(name) => write!(f, "unknown hook '{name}'"),
            Self::MissingData { chart, attribute } => {
                write!(f, "{chart} has no {attribute}")
            }
            Self::BadData(e) => write!(f, "invalid chart data: {e}"),
            Self::MissingSiteKey => write!(f, "captcha sitekey meta missing"),
            Self::Render(msg) => write!(f, "render failed: {msg}"),
        }
    }
}

impl std::error::Error for HookError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::BadData(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for HookError {
    fn from(e: serde_json::Error) -> Self {
        Self::BadData(e)
    }
}
