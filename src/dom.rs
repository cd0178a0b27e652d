//! Host-environment seams injected into [`crate::WidgetController`].
//!
//! [`Document`] covers element lookup, creation and mutation; [`Window`]
//! covers the page URL, top-level navigation, alerts and the message
//! channel. Backends deliver DOM events back to the controller as
//! [`WidgetEvent`]s and honour the returned [`EventOutcome`].

use serde_json::Value;

use crate::error::WidgetError;
use crate::state::WrapperId;

/// Element-level events a backend must route back to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listener {
    /// `click` on a product link.
    LinkClick(WrapperId),
    /// `load` on an iframe.
    IframeLoad(WrapperId),
    /// `click` on an overlay wrapper.
    WrapperClick(WrapperId),
}

impl Listener {
    /// DOM event type name.
    #[must_use]
    pub fn event_type(self) -> &'static str {
        match self {
            Self::LinkClick(_) | Self::WrapperClick(_) => "click",
            Self::IframeLoad(_) => "load",
        }
    }

    /// The event delivered when this listener fires.
    #[must_use]
    pub fn event(self) -> WidgetEvent {
        match self {
            Self::LinkClick(id) => WidgetEvent::LinkClicked(id),
            Self::IframeLoad(id) => WidgetEvent::IframeLoaded(id),
            Self::WrapperClick(id) => WidgetEvent::WrapperClicked(id),
        }
    }
}

/// An event delivered to [`crate::WidgetController::handle`].
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
    /// A product link was activated.
    LinkClicked(WrapperId),
    /// An iframe fired `load`.
    IframeLoaded(WrapperId),
    /// An overlay wrapper was clicked.
    WrapperClicked(WrapperId),
    /// A cross-window message arrived.
    Message {
        /// Origin reported by the browser for the sender.
        origin: String,
        /// Structured-clone payload, converted to JSON.
        data: Value,
    },
}

/// What the backend should do with the native event after dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Let the browser's default action run.
    Proceed,
    /// Call `preventDefault()`.
    PreventDefault,
}

/// DOM access used by the controller.
pub trait Document {
    /// Element handle. Cheap to clone.
    type Element: Clone;

    /// `getElementById`.
    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// `querySelectorAll`, in document order.
    fn query_all(
        &self,
        selector: &str,
    ) -> Result<Vec<Self::Element>, WidgetError>;

    /// Read an attribute.
    fn attribute(&self, el: &Self::Element, name: &str) -> Option<String>;

    /// Write an attribute.
    fn set_attribute(
        &mut self,
        el: &Self::Element,
        name: &str,
        value: &str,
    ) -> Result<(), WidgetError>;

    /// Create a detached element.
    fn create_element(&mut self, tag: &str)
        -> Result<Self::Element, WidgetError>;

    /// Append `child` to `<body>`.
    fn append_to_body(&mut self, child: &Self::Element)
        -> Result<(), WidgetError>;

    /// Append `child` to `<head>`.
    fn append_to_head(&mut self, child: &Self::Element)
        -> Result<(), WidgetError>;

    /// Append `child` to `parent`.
    fn append_child(
        &mut self,
        parent: &Self::Element,
        child: &Self::Element,
    ) -> Result<(), WidgetError>;

    /// Detach an element from the tree.
    fn remove(&mut self, el: &Self::Element);

    /// Set the element's text content.
    fn set_text(&mut self, el: &Self::Element, text: &str);

    /// Hide the element (`style.display = "none"`).
    fn hide(&mut self, el: &Self::Element) -> Result<(), WidgetError>;

    /// Attach a listener that delivers `listener.event()` to the
    /// controller.
    fn listen(
        &mut self,
        el: &Self::Element,
        listener: Listener,
    ) -> Result<(), WidgetError>;

    /// Detach every listener attached through [`Document::listen`].
    fn unlisten_all(&mut self);
}

/// Window-level access used by the controller.
pub trait Window {
    /// `location.href`.
    fn location_href(&self) -> String;

    /// `window.open(url, "_top")`.
    fn open_top(&mut self, url: &str) -> Result<(), WidgetError>;

    /// `window.alert(message)`. Blocking in browsers.
    fn alert(&mut self, message: &str);

    /// Start delivering `message` events as [`WidgetEvent::Message`].
    fn listen_messages(&mut self) -> Result<(), WidgetError>;
}
