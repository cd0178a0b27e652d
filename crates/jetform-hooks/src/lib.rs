//! LiveView hooks for the JetForm dashboard.
//!
//! Chart hooks turn an element's `data-buckets` into ApexCharts options;
//! the captcha hook mounts Turnstile with the page's sitekey. Both external
//! libraries sit behind [`chart::ChartRenderer`] and
//! [`captcha::CaptchaRenderer`], so the hooks run without a browser in
//! tests. The `web` feature adds the wasm adapters.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::wildcard_imports))]

pub mod captcha;
pub mod chart;
pub mod error;
pub mod hooks;
#[cfg(feature = "web")]
pub mod web;

pub use error::HookError;
pub use hooks::{HookContext, HookSet};
