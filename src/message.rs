//! Cross-window message protocol between the host page and the checkout
//! iframe.
//!
//! Payloads are plain objects `{action, url?}`. The deployed checkout sends
//! namespaced actions (`jf:closepopup`); the bare names are accepted too.
//! Anything that doesn't parse is ignored by the host.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A recognised message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum Message {
    /// Close every open overlay.
    #[serde(rename = "closepopup", alias = "jf:closepopup")]
    ClosePopup,
    /// Navigate the top-level browsing context.
    #[serde(rename = "openurl", alias = "jf:openurl")]
    OpenUrl {
        /// Destination. Missing or empty means no navigation.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
}

impl Message {
    /// Interpret a raw payload. Returns `None` for non-objects, missing or
    /// unknown actions and wrongly-typed fields.
    #[must_use]
    pub fn parse(data: &Value) -> Option<Self> {
        if !data.is_object() {
            return None;
        }
        Self::deserialize(data).ok()
    }

    /// Serialize to the JSON object posted across windows.
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
