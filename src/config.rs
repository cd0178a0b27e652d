//! Widget configuration: the host-page contract (selectors, ids, class
//! names) plus a couple of behaviour switches.
//!
//! All fields use `#[serde(default)]` so a partial TOML or JSON document
//! (e.g. only overriding `script_id`) works.

use serde::{Deserialize, Serialize};

use crate::error::WidgetError;

/// Host-page contract and behaviour switches for [`crate::WidgetController`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WidgetConfig {
    /// Id of the `<script>` element that loaded the widget. Its `src`
    /// determines the trusted message origin.
    pub script_id: String,
    /// CSS selector matching product links.
    pub link_selector: String,
    /// Attribute on a product link holding its display style.
    pub display_style_attribute: String,
    /// Class given to every wrapper element. Also used to find wrappers
    /// left over from a previous `init`.
    pub wrapper_class: String,
    /// Class given to every iframe element.
    pub iframe_class: String,
    /// Id of the injected `<style>` element.
    pub style_id: String,
    /// Text of the alert shown when the bootstrap script is missing.
    pub missing_script_alert: String,
    /// Whether `init` injects the widget stylesheet into `<head>`.
    pub inject_styles: bool,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            script_id: "jetform-widget-js".into(),
            link_selector: "a.jetform-button".into(),
            display_style_attribute: "data-display-style".into(),
            wrapper_class: "jf-iframe-wrapper".into(),
            iframe_class: "jf-iframe".into(),
            style_id: "jetform-style".into(),
            missing_script_alert:
                "Script widget JetForm tidak dipasang dengan benar!".into(),
            inject_styles: true,
        }
    }
}

impl WidgetConfig {
    /// Parse a config from TOML. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::ConfigParse`] on malformed TOML or a field of
    /// the wrong type.
    pub fn from_toml_str(s: &str) -> Result<Self, WidgetError> {
        Ok(toml::from_str(s)?)
    }

    /// Parse a config from JSON. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::ConfigParse`] on malformed JSON or a field of
    /// the wrong type.
    pub fn from_json_str(s: &str) -> Result<Self, WidgetError> {
        Ok(serde_json::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = WidgetConfig::from_toml_str(
            "script_id = \"my-widget\"\ninject_styles = false\n",
        )
        .unwrap();
        assert_eq!(cfg.script_id, "my-widget");
        assert!(!cfg.inject_styles);
        assert_eq!(cfg.link_selector, "a.jetform-button");
        assert_eq!(cfg.wrapper_class, "jf-iframe-wrapper");
    }

    #[test]
    fn json_config_parses() {
        let cfg =
            WidgetConfig::from_json_str(r#"{"link_selector": "a.buy"}"#)
                .unwrap();
        assert_eq!(cfg.link_selector, "a.buy");
        assert_eq!(cfg.script_id, "jetform-widget-js");
    }

    #[test]
    fn bad_toml_is_config_error() {
        let err = WidgetConfig::from_toml_str("script_id = [").unwrap_err();
        assert!(matches!(err, WidgetError::ConfigParse(_)));
    }
}
