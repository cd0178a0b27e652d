// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Function signature hygiene
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
// Tests use unwrap freely and glob-import their parent module.
#![cfg_attr(
    test,
    allow(clippy::unwrap_used, clippy::wildcard_imports)
)]

//! Embeddable checkout widget for JetForm product links.
//!
//! Host pages mark product links with `a.jetform-button` and load the
//! widget through `<script id="jetform-widget-js">`. For each link the
//! widget builds a wrapper and an iframe: overlay links open a modal on
//! click, embed links are replaced inline at startup. The checkout iframe
//! talks back with `postMessage` (`closepopup`, `openurl`), accepted only
//! from the script's own origin.
//!
//! # Key entry points
//!
//! - [`WidgetController`] - lifecycle of every wrapper and the message
//!   handler
//! - [`dom::Document`] / [`dom::Window`] - the host seams the controller is
//!   built on
//! - [`headless`] - in-memory host for tests and server-side checks
//! - [`WidgetConfig`] - host-page contract (selectors, ids, classes)
//!
//! With the `web` feature the crate also provides the `web-sys` backend and
//! the `#[wasm_bindgen]` exports (`initWidget`, `initWithConfig`).

pub mod config;
pub mod controller;
pub mod dom;
pub mod error;
pub mod headless;
pub mod link;
pub mod message;
pub mod state;
pub mod style;
#[cfg(feature = "web")]
pub mod web;

pub use config::WidgetConfig;
pub use controller::{InitSummary, WidgetController};
pub use error::WidgetError;
pub use message::Message;
pub use state::{DisplayStyle, WrapperState};
