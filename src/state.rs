//! Typed per-wrapper state and the CSS class vocabulary derived from it.

/// How a product link presents its iframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayStyle {
    /// Modal over the page, opened on click, dismissible.
    #[default]
    Overlay,
    /// Inline in page flow, loaded at `init`, never dismissed.
    Embed,
}

impl DisplayStyle {
    /// Parse the display-style attribute. Anything other than `embed`
    /// (including a missing attribute) is an overlay.
    #[must_use]
    pub fn from_attribute(value: Option<&str>) -> Self {
        match value {
            Some("embed") => Self::Embed,
            _ => Self::Overlay,
        }
    }

    /// Value of the `mode` query parameter sent to the iframe.
    #[must_use]
    pub fn mode(self) -> &'static str {
        match self {
            Self::Overlay => "popup",
            Self::Embed => "embed",
        }
    }
}

/// Lifecycle of one wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapperState {
    /// Nothing shown.
    #[default]
    Idle,
    /// `src` assigned, waiting for the iframe's load event.
    Loading,
    /// Iframe document loaded and visible.
    Loaded,
}

impl WrapperState {
    /// Class added to the wrapper for this state, if any.
    #[must_use]
    pub fn class(self) -> Option<&'static str> {
        match self {
            Self::Idle => None,
            Self::Loading => Some("loading"),
            Self::Loaded => Some("loaded"),
        }
    }

    /// idle → loading.
    #[must_use]
    pub fn begin_loading(self) -> Option<Self> {
        match self {
            Self::Idle => Some(Self::Loading),
            Self::Loading | Self::Loaded => None,
        }
    }

    /// loading → loaded.
    #[must_use]
    pub fn finish_loading(self) -> Option<Self> {
        match self {
            Self::Loading => Some(Self::Loaded),
            Self::Idle | Self::Loaded => None,
        }
    }

    /// loaded → idle. Only overlay wrappers can close.
    #[must_use]
    pub fn close(self, style: DisplayStyle) -> Option<Self> {
        match (self, style) {
            (Self::Loaded, DisplayStyle::Overlay) => Some(Self::Idle),
            _ => None,
        }
    }
}

/// Modifier class carried by embed wrappers.
pub const EMBED_CLASS: &str = "embed";

/// Build the wrapper's `class` attribute from its base class, style and
/// state.
#[must_use]
pub fn wrapper_class_list(
    base: &str,
    style: DisplayStyle,
    state: WrapperState,
) -> String {
    let mut classes = vec![base];
    if let Some(class) = state.class() {
        classes.push(class);
    }
    if style == DisplayStyle::Embed {
        classes.push(EMBED_CLASS);
    }
    classes.join(" ")
}

/// Identifies a wrapper across `init` runs. Events carrying an id from an
/// earlier generation refer to wrappers that no longer exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WrapperId {
    /// `init` run that created the wrapper.
    pub generation: u32,
    /// Position of the product link in document order.
    pub index: usize,
}
