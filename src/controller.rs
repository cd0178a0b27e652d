//! The widget controller: wrapper/iframe lifecycle and the host side of
//! the message protocol.
//!
//! The controller owns its [`Document`] and [`Window`] and keeps one
//! [`WrapperState`] per product link. Class lists on the wrapper elements
//! are written from that state and never read back.

use serde_json::Value;

use crate::config::WidgetConfig;
use crate::dom::{Document, EventOutcome, Listener, WidgetEvent, Window};
use crate::error::WidgetError;
use crate::link::{self, TargetUrl};
use crate::message::Message;
use crate::state::{wrapper_class_list, DisplayStyle, WrapperId, WrapperState};
use crate::style;

/// Result of a successful [`WidgetController::init`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitSummary {
    /// Wrappers created, one per accepted product link.
    pub wrappers: usize,
    /// Product links skipped for lack of a usable `href`.
    pub skipped_links: usize,
    /// Origin messages are accepted from, if one could be derived.
    pub trusted_origin: Option<String>,
}

/// One product link with its wrapper and iframe.
#[derive(Debug)]
struct Wrapper<E> {
    link: E,
    element: E,
    iframe: E,
    style: DisplayStyle,
    /// Source assigned to the iframe when loading starts.
    src: String,
    state: WrapperState,
}

/// Drives overlay/embed iframes for every product link on a page.
pub struct WidgetController<D: Document, W: Window> {
    document: D,
    window: W,
    config: WidgetConfig,
    trusted_origin: Option<String>,
    wrappers: Vec<Wrapper<D::Element>>,
    /// Bumped on every `init`; events tagged with an older value are stale.
    generation: u32,
    listening_messages: bool,
    style_injected: bool,
}

// ── Construction ─────────────────────────────────────────────────────────

impl<D: Document, W: Window> WidgetController<D, W> {
    /// Create a controller. Nothing touches the page until
    /// [`init`](Self::init).
    #[must_use]
    pub fn new(document: D, window: W, config: WidgetConfig) -> Self {
        Self {
            document,
            window,
            config,
            trusted_origin: None,
            wrappers: Vec::new(),
            generation: 0,
            listening_messages: false,
            style_injected: false,
        }
    }

    /// The injected document.
    #[must_use]
    pub fn document(&self) -> &D {
        &self.document
    }

    /// The injected window.
    #[must_use]
    pub fn window(&self) -> &W {
        &self.window
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    /// Origin messages are accepted from.
    #[must_use]
    pub fn trusted_origin(&self) -> Option<&str> {
        self.trusted_origin.as_deref()
    }

    /// Number of wrappers created by the last `init`.
    #[must_use]
    pub fn wrapper_count(&self) -> usize {
        self.wrappers.len()
    }

    /// State of every wrapper, in product-link order.
    #[must_use]
    pub fn states(&self) -> Vec<WrapperState> {
        self.wrappers.iter().map(|w| w.state).collect()
    }

    /// Id of the wrapper at `index` in the current generation.
    #[must_use]
    pub fn wrapper_id(&self, index: usize) -> Option<WrapperId> {
        (index < self.wrappers.len()).then_some(WrapperId {
            generation: self.generation,
            index,
        })
    }
}

// ── Initialization ───────────────────────────────────────────────────────

impl<D: Document, W: Window> WidgetController<D, W> {
    /// Discover product links and build their wrappers, replacing any
    /// wrappers from an earlier run.
    ///
    /// A missing bootstrap script or an unusable link is reported and
    /// skipped; only DOM backend failures abort.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::Dom`] when the document rejects a query or a
    /// mutation, or when the message listener cannot be registered.
    pub fn init(&mut self) -> Result<InitSummary, WidgetError> {
        self.generation = self.generation.wrapping_add(1);
        let page_url = self.window.location_href();
        self.trusted_origin = self.resolve_trusted_origin(&page_url);
        let referrer = link::forwarded_referrer(&page_url);

        self.teardown()?;
        if self.config.inject_styles {
            self.inject_styles()?;
        }

        let links = self.document.query_all(&self.config.link_selector)?;
        let mut skipped_links = 0;
        for link_el in links {
            let href =
                self.document.attribute(&link_el, "href").unwrap_or_default();
            let target = match TargetUrl::parse(&href, &page_url) {
                Ok(target) => target,
                Err(e) => {
                    log::warn!("Skipping product link: {e}");
                    skipped_links += 1;
                    continue;
                }
            };
            let style = DisplayStyle::from_attribute(
                self.document
                    .attribute(&link_el, &self.config.display_style_attribute)
                    .as_deref(),
            );
            self.build_wrapper(link_el, &target, style, &referrer)?;
        }

        if !self.listening_messages {
            self.window.listen_messages()?;
            self.listening_messages = true;
        }

        log::info!(
            "Widget initialized: {} wrapper(s), {} skipped",
            self.wrappers.len(),
            skipped_links
        );
        Ok(InitSummary {
            wrappers: self.wrappers.len(),
            skipped_links,
            trusted_origin: self.trusted_origin.clone(),
        })
    }

    /// Replace the configuration, removing the wrappers built under the old
    /// one. Call [`init`](Self::init) afterwards to rebuild.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::Dom`] if the old wrappers cannot be queried.
    pub fn reconfigure(
        &mut self,
        config: WidgetConfig,
    ) -> Result<(), WidgetError> {
        if config == self.config {
            return Ok(());
        }
        self.teardown()?;
        let restyle = config.style_id != self.config.style_id
            || config.wrapper_class != self.config.wrapper_class
            || config.iframe_class != self.config.iframe_class;
        if restyle && self.style_injected {
            if let Some(el) = self.document.element_by_id(&self.config.style_id)
            {
                self.document.remove(&el);
            }
            self.style_injected = false;
        }
        self.config = config;
        Ok(())
    }

    fn resolve_trusted_origin(&mut self, page_url: &str) -> Option<String> {
        let Some(script) = self.document.element_by_id(&self.config.script_id)
        else {
            let err = WidgetError::MissingBootstrapScript {
                id: self.config.script_id.clone(),
            };
            log::warn!("{err}");
            self.window.alert(&self.config.missing_script_alert);
            return None;
        };
        let src = self.document.attribute(&script, "src").unwrap_or_default();
        match link::trusted_origin(&src, page_url) {
            Ok(origin) => Some(origin),
            Err(e) => {
                log::warn!("{e}; cross-window messages will be ignored");
                None
            }
        }
    }

    /// Drop every wrapper on the page and every listener from the last run.
    fn teardown(&mut self) -> Result<(), WidgetError> {
        self.document.unlisten_all();
        let selector = format!(".{}", self.config.wrapper_class);
        for el in self.document.query_all(&selector)? {
            self.document.remove(&el);
        }
        self.wrappers.clear();
        Ok(())
    }

    fn inject_styles(&mut self) -> Result<(), WidgetError> {
        if self.style_injected
            || self.document.element_by_id(&self.config.style_id).is_some()
        {
            return Ok(());
        }
        let el = self.document.create_element("style")?;
        self.document.set_attribute(&el, "id", &self.config.style_id)?;
        self.document.set_text(
            &el,
            &style::stylesheet(
                &self.config.wrapper_class,
                &self.config.iframe_class,
            ),
        );
        self.document.append_to_head(&el)?;
        self.style_injected = true;
        Ok(())
    }

    fn build_wrapper(
        &mut self,
        link_el: D::Element,
        target: &TargetUrl,
        style: DisplayStyle,
        referrer: &str,
    ) -> Result<(), WidgetError> {
        let index = self.wrappers.len();
        let id = WrapperId {
            generation: self.generation,
            index,
        };

        let element = self.document.create_element("div")?;
        self.document.set_attribute(
            &element,
            "class",
            &wrapper_class_list(
                &self.config.wrapper_class,
                style,
                WrapperState::Idle,
            ),
        )?;
        self.document.append_to_body(&element)?;

        let iframe = self.document.create_element("iframe")?;
        self.document.set_attribute(&iframe, "data-src", target.as_str())?;
        self.document
            .set_attribute(&iframe, "class", &self.config.iframe_class)?;
        self.document.append_child(&element, &iframe)?;
        // Attached after insertion: the about:blank load fired on insert
        // carries no src and would be ignored anyway.
        self.document.listen(&iframe, Listener::IframeLoad(id))?;

        match style {
            DisplayStyle::Embed => {}
            DisplayStyle::Overlay => {
                self.document.listen(&link_el, Listener::LinkClick(id))?;
                self.document.listen(&element, Listener::WrapperClick(id))?;
            }
        }

        self.wrappers.push(Wrapper {
            link: link_el,
            element,
            iframe,
            style,
            src: target.iframe_src(referrer, style),
            state: WrapperState::Idle,
        });

        if style == DisplayStyle::Embed {
            self.begin_loading(index)?;
        }
        Ok(())
    }
}

// ── Events ───────────────────────────────────────────────────────────────

impl<D: Document, W: Window> WidgetController<D, W> {
    /// Handle one DOM event. Failures are logged; events for wrappers of an
    /// earlier `init` are ignored.
    pub fn handle(&mut self, event: WidgetEvent) -> EventOutcome {
        let result = match event {
            WidgetEvent::LinkClicked(id) => match self.current(id) {
                Some(index) => self
                    .begin_loading(index)
                    .map(|()| EventOutcome::PreventDefault),
                None => Ok(EventOutcome::Proceed),
            },
            WidgetEvent::IframeLoaded(id) => self
                .current(id)
                .map_or(Ok(()), |i| self.iframe_loaded(i))
                .map(|()| EventOutcome::Proceed),
            WidgetEvent::WrapperClicked(id) => self
                .current(id)
                .map_or(Ok(()), |i| self.close(i))
                .map(|()| EventOutcome::Proceed),
            WidgetEvent::Message { origin, data } => self
                .message(&origin, &data)
                .map(|()| EventOutcome::Proceed),
        };
        result.unwrap_or_else(|e| {
            log::error!("Widget event failed: {e}");
            EventOutcome::Proceed
        })
    }

    /// Close every open overlay. Embed wrappers stay as they are.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::Dom`] if a wrapper's class cannot be updated.
    pub fn close_all(&mut self) -> Result<(), WidgetError> {
        for index in 0..self.wrappers.len() {
            self.close(index)?;
        }
        Ok(())
    }

    fn current(&self, id: WrapperId) -> Option<usize> {
        (id.generation == self.generation && id.index < self.wrappers.len())
            .then_some(id.index)
    }

    fn begin_loading(&mut self, index: usize) -> Result<(), WidgetError> {
        let Some(wrapper) = self.wrappers.get(index) else {
            return Ok(());
        };
        let Some(next) = wrapper.state.begin_loading() else {
            return Ok(());
        };
        self.document.set_attribute(&wrapper.iframe, "src", &wrapper.src)?;
        self.set_state(index, next)
    }

    fn iframe_loaded(&mut self, index: usize) -> Result<(), WidgetError> {
        let Some(wrapper) = self.wrappers.get(index) else {
            return Ok(());
        };
        let src = self.document.attribute(&wrapper.iframe, "src");
        if src.as_deref().map_or(true, str::is_empty) {
            return Ok(());
        }
        if wrapper.style == DisplayStyle::Embed {
            self.document.hide(&wrapper.link)?;
        }
        match wrapper.state.finish_loading() {
            Some(next) => self.set_state(index, next),
            None => Ok(()),
        }
    }

    fn close(&mut self, index: usize) -> Result<(), WidgetError> {
        let Some(wrapper) = self.wrappers.get(index) else {
            return Ok(());
        };
        match wrapper.state.close(wrapper.style) {
            Some(next) => self.set_state(index, next),
            None => Ok(()),
        }
    }

    fn message(
        &mut self,
        origin: &str,
        data: &Value,
    ) -> Result<(), WidgetError> {
        if self.trusted_origin.as_deref() != Some(origin) {
            log::trace!("Dropping message from untrusted origin {origin}");
            return Ok(());
        }
        match Message::parse(data) {
            Some(Message::ClosePopup) => self.close_all(),
            Some(Message::OpenUrl { url: Some(url) }) if !url.is_empty() => {
                log::info!("Opening {url} in top window");
                self.window.open_top(&url)
            }
            _ => {
                log::trace!("Ignoring message {data}");
                Ok(())
            }
        }
    }

    /// Record a new state and write the derived class list.
    fn set_state(
        &mut self,
        index: usize,
        state: WrapperState,
    ) -> Result<(), WidgetError> {
        let Some(wrapper) = self.wrappers.get_mut(index) else {
            return Ok(());
        };
        wrapper.state = state;
        let classes = wrapper_class_list(
            &self.config.wrapper_class,
            wrapper.style,
            state,
        );
        self.document.set_attribute(&wrapper.element, "class", &classes)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::headless::{HeadlessDocument, HeadlessWindow, NodeId};

    const PAGE: &str = "https://shop.test/promo?utm=1";
    const REFERRER: &str = "https%3A%2F%2Fshop.test%2Fpromo%3Futm%3D1";
    const CDN: &str = "https://cdn.jetform.test";

    type Controller = WidgetController<HeadlessDocument, HeadlessWindow>;

    struct Page {
        doc: HeadlessDocument,
        links: Vec<NodeId>,
    }

    impl Page {
        fn new() -> Self {
            let mut doc = HeadlessDocument::new();
            let head = doc.head();
            let _ = doc.append(
                head,
                "script",
                &[
                    ("id", "jetform-widget-js"),
                    ("src", "https://cdn.jetform.test/js/widget.js"),
                ],
            );
            Self {
                doc,
                links: Vec::new(),
            }
        }

        fn without_script() -> Self {
            Self {
                doc: HeadlessDocument::new(),
                links: Vec::new(),
            }
        }

        fn link(mut self, href: &str, style: Option<&str>) -> Self {
            let body = self.doc.body();
            let mut attrs = vec![("class", "jetform-button"), ("href", href)];
            if let Some(style) = style {
                attrs.push(("data-display-style", style));
            }
            self.links.push(self.doc.append(body, "a", &attrs));
            self
        }

        fn controller(self) -> (Controller, Vec<NodeId>) {
            let c = WidgetController::new(
                self.doc,
                HeadlessWindow::new(PAGE),
                WidgetConfig::default(),
            );
            (c, self.links)
        }
    }

    fn fire(
        c: &mut Controller,
        el: NodeId,
        event_type: &str,
    ) -> Vec<EventOutcome> {
        let events = c.document().dispatch(el, event_type);
        events.into_iter().map(|e| c.handle(e)).collect()
    }

    fn wrappers(c: &Controller) -> Vec<NodeId> {
        c.document().select(".jf-iframe-wrapper").unwrap()
    }

    fn iframe_of(c: &Controller, wrapper: NodeId) -> NodeId {
        c.document().children(wrapper)[0]
    }

    fn message(c: &mut Controller, origin: &str, data: Value) {
        let _ = c.handle(WidgetEvent::Message {
            origin: origin.into(),
            data,
        });
    }

    /// Open the overlay at `index` and finish loading it.
    fn open(c: &mut Controller, links: &[NodeId], index: usize) {
        let _ = fire(c, links[index], "click");
        let iframe = iframe_of(c, wrappers(c)[index]);
        let _ = fire(c, iframe, "load");
    }

    #[test]
    fn one_wrapper_per_product_link() {
        let mut page = Page::new()
            .link("https://x.test/a", None)
            .link("https://x.test/b", Some("embed"));
        let body = page.doc.body();
        let _ = page.doc.append(body, "a", &[("href", "https://x.test/c")]);
        let _ = page.doc.append(body, "div", &[("class", "jetform-button")]);
        let (mut c, _) = page.controller();

        let summary = c.init().unwrap();
        assert_eq!(summary.wrappers, 2);
        assert_eq!(summary.trusted_origin.as_deref(), Some(CDN));

        let ws = wrappers(&c);
        assert_eq!(ws.len(), 2);
        for w in ws {
            assert_eq!(c.document().children(w).len(), 1);
            assert_eq!(c.document().tag(iframe_of(&c, w)), Some("iframe"));
        }
        assert_eq!(c.document().select("iframe.jf-iframe").unwrap().len(), 2);
    }

    #[test]
    fn wrapper_order_matches_link_order() {
        let (mut c, _) = Page::new()
            .link("https://x.test/a", None)
            .link("https://x.test/b", None)
            .controller();
        let _ = c.init().unwrap();
        let sources: Vec<_> = wrappers(&c)
            .into_iter()
            .map(|w| {
                let iframe = iframe_of(&c, w);
                c.document().attr(iframe, "data-src").unwrap().to_owned()
            })
            .collect();
        assert_eq!(sources, ["https://x.test/a", "https://x.test/b"]);
    }

    #[test]
    fn repeated_init_does_not_accumulate() {
        let (mut c, links) = Page::new()
            .link("https://x.test/a", None)
            .link("https://x.test/b", Some("embed"))
            .controller();
        for _ in 0..3 {
            let _ = c.init().unwrap();
        }
        assert_eq!(wrappers(&c).len(), 2);
        assert_eq!(c.wrapper_count(), 2);
        // html, head, body, script, two links, one style, two wrapper
        // divs and their iframes.
        assert_eq!(c.document().node_count(), 11);
        assert_eq!(c.window().message_listeners, 1);
        assert_eq!(c.document().listeners_on(links[0]).len(), 1);
        let styles = c.document().select("style#jetform-style").unwrap();
        assert_eq!(styles.len(), 1);
    }

    #[test]
    fn embed_loads_immediately() {
        let (mut c, links) =
            Page::new().link("https://x.test/p", Some("embed")).controller();
        let _ = c.init().unwrap();

        let w = wrappers(&c)[0];
        let iframe = iframe_of(&c, w);
        assert_eq!(
            c.document().attr(iframe, "src").unwrap(),
            format!("https://x.test/p?referrer={REFERRER}&mode=embed")
        );
        assert_eq!(c.states(), [WrapperState::Loading]);
        assert!(c.document().has_class(w, "loading"));
        assert!(c.document().has_class(w, "embed"));
        assert!(c.document().listeners_on(links[0]).is_empty());
        assert!(c.document().listeners_on(w).is_empty());
        assert!(!c.document().is_hidden(links[0]));

        let _ = fire(&mut c, iframe, "load");
        assert_eq!(c.states(), [WrapperState::Loaded]);
        assert!(c.document().has_class(w, "loaded"));
        assert!(!c.document().has_class(w, "loading"));
        assert!(c.document().is_hidden(links[0]));
    }

    #[test]
    fn overlay_click_starts_loading() {
        let (mut c, links) =
            Page::new().link("https://x.test/p?ref=abc", None).controller();
        let _ = c.init().unwrap();
        let w = wrappers(&c)[0];
        let iframe = iframe_of(&c, w);
        assert_eq!(c.document().attr(iframe, "src"), None);
        assert_eq!(c.states(), [WrapperState::Idle]);

        let outcomes = fire(&mut c, links[0], "click");
        assert_eq!(outcomes, [EventOutcome::PreventDefault]);
        assert_eq!(
            c.document().attr(iframe, "src").unwrap(),
            format!("https://x.test/p?ref=abc&referrer={REFERRER}&mode=popup")
        );
        assert!(c.document().has_class(w, "loading"));

        let _ = fire(&mut c, iframe, "load");
        assert_eq!(c.states(), [WrapperState::Loaded]);
        assert!(!c.document().is_hidden(links[0]));
    }

    #[test]
    fn load_without_src_is_ignored() {
        let (mut c, _) =
            Page::new().link("https://x.test/p", None).controller();
        let _ = c.init().unwrap();
        let iframe = iframe_of(&c, wrappers(&c)[0]);
        let _ = fire(&mut c, iframe, "load");
        assert_eq!(c.states(), [WrapperState::Idle]);
    }

    #[test]
    fn clicking_overlay_closes_it() {
        let (mut c, links) =
            Page::new().link("https://x.test/p", None).controller();
        let _ = c.init().unwrap();
        let w = wrappers(&c)[0];

        // A click while still loading does nothing.
        let _ = fire(&mut c, links[0], "click");
        let _ = fire(&mut c, w, "click");
        assert_eq!(c.states(), [WrapperState::Loading]);

        let iframe = iframe_of(&c, w);
        let _ = fire(&mut c, iframe, "load");
        let _ = fire(&mut c, w, "click");
        assert_eq!(c.states(), [WrapperState::Idle]);
        assert!(!c.document().has_class(w, "loaded"));

        // Reopening reloads the iframe.
        open(&mut c, &links, 0);
        assert_eq!(c.states(), [WrapperState::Loaded]);
    }

    #[test]
    fn closepopup_from_trusted_origin_closes_overlays_only() {
        let (mut c, links) = Page::new()
            .link("https://x.test/a", None)
            .link("https://x.test/b", None)
            .link("https://x.test/c", Some("embed"))
            .controller();
        let _ = c.init().unwrap();
        open(&mut c, &links, 0);
        let _ = fire(&mut c, links[1], "click");
        let embed_iframe = iframe_of(&c, wrappers(&c)[2]);
        let _ = fire(&mut c, embed_iframe, "load");
        assert_eq!(
            c.states(),
            [WrapperState::Loaded, WrapperState::Loading, WrapperState::Loaded]
        );

        message(&mut c, CDN, json!({"action": "closepopup"}));
        assert_eq!(
            c.states(),
            [WrapperState::Idle, WrapperState::Loading, WrapperState::Loaded]
        );
    }

    #[test]
    fn messages_from_other_origins_are_dropped() {
        let (mut c, links) =
            Page::new().link("https://x.test/a", None).controller();
        let _ = c.init().unwrap();
        open(&mut c, &links, 0);

        message(&mut c, "https://evil.test", json!({"action": "closepopup"}));
        message(
            &mut c,
            "https://evil.test",
            json!({"action": "openurl", "url": "https://y.test"}),
        );
        assert_eq!(c.states(), [WrapperState::Loaded]);
        assert!(c.window().navigations.is_empty());
    }

    #[test]
    fn namespaced_closepopup_is_honoured() {
        let (mut c, links) =
            Page::new().link("https://x.test/a", None).controller();
        let _ = c.init().unwrap();
        open(&mut c, &links, 0);
        message(&mut c, CDN, json!({"action": "jf:closepopup"}));
        assert_eq!(c.states(), [WrapperState::Idle]);
    }

    #[test]
    fn openurl_navigates_top_window() {
        let (mut c, _) =
            Page::new().link("https://x.test/a", None).controller();
        let _ = c.init().unwrap();

        message(&mut c, CDN, json!({"action": "openurl"}));
        message(&mut c, CDN, json!({"action": "openurl", "url": ""}));
        assert!(c.window().navigations.is_empty());

        message(
            &mut c,
            CDN,
            json!({"action": "openurl", "url": "https://y.test"}),
        );
        assert_eq!(c.window().navigations, ["https://y.test"]);
    }

    #[test]
    fn unknown_actions_are_ignored() {
        let (mut c, links) =
            Page::new().link("https://x.test/a", None).controller();
        let _ = c.init().unwrap();
        open(&mut c, &links, 0);
        message(&mut c, CDN, json!({"action": "resize", "height": 300}));
        message(&mut c, CDN, json!("closepopup"));
        assert_eq!(c.states(), [WrapperState::Loaded]);
        assert!(c.window().navigations.is_empty());
    }

    #[test]
    fn missing_script_alerts_and_continues() {
        let (mut c, _) = Page::without_script()
            .link("https://x.test/a", None)
            .controller();
        let summary = c.init().unwrap();
        assert_eq!(summary.wrappers, 1);
        assert_eq!(summary.trusted_origin, None);
        assert_eq!(
            c.window().alerts,
            ["Script widget JetForm tidak dipasang dengan benar!"]
        );

        // With no trusted origin every message is dropped, even "null".
        open_and_message(&mut c, "null");
        assert_eq!(c.states(), [WrapperState::Loaded]);
    }

    fn open_and_message(c: &mut Controller, origin: &str) {
        let links = c.document().select("a.jetform-button").unwrap();
        open(c, &links, 0);
        message(c, origin, json!({"action": "closepopup"}));
    }

    #[test]
    fn links_without_href_are_skipped() {
        let mut page = Page::new().link("https://x.test/a", None);
        let body = page.doc.body();
        let _ = page.doc.append(body, "a", &[("class", "jetform-button")]);
        let (mut c, _) = page.controller();
        let summary = c.init().unwrap();
        assert_eq!(summary.wrappers, 1);
        assert_eq!(summary.skipped_links, 1);
    }

    #[test]
    fn stale_events_from_previous_init_are_ignored() {
        let (mut c, links) =
            Page::new().link("https://x.test/a", None).controller();
        let _ = c.init().unwrap();
        let stale = c.wrapper_id(0).unwrap();
        let _ = c.init().unwrap();

        assert_eq!(
            c.handle(WidgetEvent::LinkClicked(stale)),
            EventOutcome::Proceed
        );
        assert_eq!(c.states(), [WrapperState::Idle]);

        assert_eq!(
            fire(&mut c, links[0], "click"),
            [EventOutcome::PreventDefault]
        );
        assert_eq!(c.states(), [WrapperState::Loading]);
    }

    #[test]
    fn stylesheet_can_be_disabled() {
        let page = Page::new().link("https://x.test/a", None);
        let mut c = WidgetController::new(
            page.doc,
            HeadlessWindow::new(PAGE),
            WidgetConfig {
                inject_styles: false,
                ..WidgetConfig::default()
            },
        );
        let _ = c.init().unwrap();
        assert!(c.document().select("style").unwrap().is_empty());
    }

    #[test]
    fn stylesheet_lands_in_head() {
        let (mut c, _) = Page::new().controller();
        let _ = c.init().unwrap();
        let style = c.document().select("style#jetform-style").unwrap()[0];
        assert!(c.document().children(c.document().head()).contains(&style));
        let css = c.document().text(style).unwrap();
        assert!(css.contains(".jf-iframe-wrapper.loading"));
    }

    #[test]
    fn reconfigure_drops_old_wrappers() {
        let mut page = Page::new().link("https://x.test/a", None);
        let body = page.doc.body();
        let buy = page.doc.append(
            body,
            "a",
            &[("class", "buy"), ("href", "https://x.test/b")],
        );
        let (mut c, links) = page.controller();
        let _ = c.init().unwrap();
        assert_eq!(wrappers(&c).len(), 1);

        c.reconfigure(WidgetConfig {
            link_selector: "a.buy".into(),
            wrapper_class: "buy-wrapper".into(),
            ..WidgetConfig::default()
        })
        .unwrap();
        assert!(wrappers(&c).is_empty());
        assert!(c.document().listeners_on(links[0]).is_empty());

        let summary = c.init().unwrap();
        assert_eq!(summary.wrappers, 1);
        assert_eq!(c.document().select(".buy-wrapper").unwrap().len(), 1);
        assert_eq!(fire(&mut c, buy, "click"), [EventOutcome::PreventDefault]);
        let style = c.document().select("style").unwrap();
        assert_eq!(style.len(), 1);
        assert!(c.document().text(style[0]).unwrap().contains(".buy-wrapper"));
    }
}
