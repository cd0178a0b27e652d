//! Browser backend on `web-sys` and the wasm entry points.
//!
//! The page holds a single controller in a thread-local
//! `Rc<RefCell<..>>`. Listeners keep a `Weak` handle to it and deliver
//! [`WidgetEvent`]s through [`deliver`]; an event that arrives while the
//! controller is already borrowed is dropped.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::config::WidgetConfig;
use crate::controller::WidgetController;
use crate::dom::{Document, EventOutcome, Listener, WidgetEvent, Window};
use crate::error::WidgetError;

type Controller = WidgetController<WebDocument, WebWindow>;
type Shared = Rc<RefCell<Controller>>;
type Handle = Weak<RefCell<Controller>>;

thread_local! {
    static WIDGET: RefCell<Option<Shared>> = const { RefCell::new(None) };
}

impl From<WidgetError> for JsValue {
    fn from(e: WidgetError) -> Self {
        Self::from_str(&e.to_string())
    }
}

fn js_err(e: &JsValue) -> WidgetError {
    WidgetError::Dom(e.as_string().unwrap_or_else(|| format!("{e:?}")))
}

/// Convert a structured-clone payload to JSON. Values JSON can't express
/// become `null`.
fn js_to_json(value: &JsValue) -> Value {
    js_sys::JSON::stringify(value)
        .ok()
        .and_then(|s| s.as_string())
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or(Value::Null)
}

fn deliver(handle: &Handle, event: WidgetEvent) -> EventOutcome {
    let Some(shared) = handle.upgrade() else {
        return EventOutcome::Proceed;
    };
    let Ok(mut controller) = shared.try_borrow_mut() else {
        log::debug!("Widget busy, dropping {event:?}");
        return EventOutcome::Proceed;
    };
    controller.handle(event)
}

// ── Document ─────────────────────────────────────────────────────────────

struct Attached {
    target: web_sys::EventTarget,
    event_type: &'static str,
    callback: Closure<dyn FnMut(web_sys::Event)>,
}

/// [`Document`] over the page's `web_sys::Document`.
pub struct WebDocument {
    document: web_sys::Document,
    handle: Handle,
    listeners: Vec<Attached>,
}

impl WebDocument {
    fn new(document: web_sys::Document, handle: Handle) -> Self {
        Self {
            document,
            handle,
            listeners: Vec::new(),
        }
    }
}

impl Drop for WebDocument {
    fn drop(&mut self) {
        self.unlisten_all();
    }
}

impl Document for WebDocument {
    type Element = web_sys::Element;

    fn element_by_id(&self, id: &str) -> Option<web_sys::Element> {
        self.document.get_element_by_id(id)
    }

    fn query_all(
        &self,
        selector: &str,
    ) -> Result<Vec<web_sys::Element>, WidgetError> {
        let list = self
            .document
            .query_selector_all(selector)
            .map_err(|e| js_err(&e))?;
        Ok((0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
            .collect())
    }

    fn attribute(&self, el: &web_sys::Element, name: &str) -> Option<String> {
        el.get_attribute(name)
    }

    fn set_attribute(
        &mut self,
        el: &web_sys::Element,
        name: &str,
        value: &str,
    ) -> Result<(), WidgetError> {
        el.set_attribute(name, value).map_err(|e| js_err(&e))
    }

    fn create_element(
        &mut self,
        tag: &str,
    ) -> Result<web_sys::Element, WidgetError> {
        self.document.create_element(tag).map_err(|e| js_err(&e))
    }

    fn append_to_body(
        &mut self,
        child: &web_sys::Element,
    ) -> Result<(), WidgetError> {
        let body = self
            .document
            .body()
            .ok_or_else(|| WidgetError::Dom("document has no body".into()))?;
        let _ = body.append_child(child).map_err(|e| js_err(&e))?;
        Ok(())
    }

    fn append_to_head(
        &mut self,
        child: &web_sys::Element,
    ) -> Result<(), WidgetError> {
        let head = self
            .document
            .head()
            .ok_or_else(|| WidgetError::Dom("document has no head".into()))?;
        let _ = head.append_child(child).map_err(|e| js_err(&e))?;
        Ok(())
    }

    fn append_child(
        &mut self,
        parent: &web_sys::Element,
        child: &web_sys::Element,
    ) -> Result<(), WidgetError> {
        let _ = parent.append_child(child).map_err(|e| js_err(&e))?;
        Ok(())
    }

    fn remove(&mut self, el: &web_sys::Element) {
        el.remove();
    }

    fn set_text(&mut self, el: &web_sys::Element, text: &str) {
        el.set_text_content(Some(text));
    }

    fn hide(&mut self, el: &web_sys::Element) -> Result<(), WidgetError> {
        match el.dyn_ref::<web_sys::HtmlElement>() {
            Some(html) => html
                .style()
                .set_property("display", "none")
                .map_err(|e| js_err(&e)),
            None => self.set_attribute(el, "style", "display: none"),
        }
    }

    fn listen(
        &mut self,
        el: &web_sys::Element,
        listener: Listener,
    ) -> Result<(), WidgetError> {
        let handle = self.handle.clone();
        let event = listener.event();
        let callback = Closure::<dyn FnMut(web_sys::Event)>::new(
            move |evt: web_sys::Event| {
                if deliver(&handle, event.clone())
                    == EventOutcome::PreventDefault
                {
                    evt.prevent_default();
                }
            },
        );
        el.add_event_listener_with_callback(
            listener.event_type(),
            callback.as_ref().unchecked_ref(),
        )
        .map_err(|e| js_err(&e))?;
        self.listeners.push(Attached {
            target: el.clone().into(),
            event_type: listener.event_type(),
            callback,
        });
        Ok(())
    }

    fn unlisten_all(&mut self) {
        for attached in self.listeners.drain(..) {
            let _ = attached.target.remove_event_listener_with_callback(
                attached.event_type,
                attached.callback.as_ref().unchecked_ref(),
            );
        }
    }
}

// ── Window ───────────────────────────────────────────────────────────────

/// [`Window`] over the page's `web_sys::Window`.
pub struct WebWindow {
    window: web_sys::Window,
    handle: Handle,
    on_message: Option<Closure<dyn FnMut(web_sys::MessageEvent)>>,
}

impl WebWindow {
    fn new(window: web_sys::Window, handle: Handle) -> Self {
        Self {
            window,
            handle,
            on_message: None,
        }
    }
}

impl Drop for WebWindow {
    fn drop(&mut self) {
        if let Some(callback) = self.on_message.take() {
            let _ = self.window.remove_event_listener_with_callback(
                "message",
                callback.as_ref().unchecked_ref(),
            );
        }
    }
}

impl Window for WebWindow {
    fn location_href(&self) -> String {
        self.window.location().href().unwrap_or_default()
    }

    fn open_top(&mut self, url: &str) -> Result<(), WidgetError> {
        let _ = self
            .window
            .open_with_url_and_target(url, "_top")
            .map_err(|e| js_err(&e))?;
        Ok(())
    }

    fn alert(&mut self, message: &str) {
        if let Err(e) = self.window.alert_with_message(message) {
            log::warn!("alert failed: {}", js_err(&e));
        }
    }

    fn listen_messages(&mut self) -> Result<(), WidgetError> {
        if self.on_message.is_some() {
            return Ok(());
        }
        let handle = self.handle.clone();
        let callback = Closure::<dyn FnMut(web_sys::MessageEvent)>::new(
            move |evt: web_sys::MessageEvent| {
                let _ = deliver(
                    &handle,
                    WidgetEvent::Message {
                        origin: evt.origin(),
                        data: js_to_json(&evt.data()),
                    },
                );
            },
        );
        self.window
            .add_event_listener_with_callback(
                "message",
                callback.as_ref().unchecked_ref(),
            )
            .map_err(|e| js_err(&e))?;
        self.on_message = Some(callback);
        Ok(())
    }
}

// ── Entry points ─────────────────────────────────────────────────────────

/// Module start: install logging and run `init` with the default config.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    if let Err(e) = install(None) {
        log::error!("Widget init failed: {e}");
    }
}

/// (Re)scan the page for product links with the current config.
///
/// # Errors
///
/// Rejects when the page has no window, document or body.
#[wasm_bindgen(js_name = initWidget)]
pub fn init() -> Result<(), JsValue> {
    install(None).map_err(JsValue::from)
}

/// (Re)scan the page with a config object. Missing fields use defaults.
///
/// # Errors
///
/// Rejects on a config that does not match `WidgetConfig`.
#[wasm_bindgen(js_name = initWithConfig)]
pub fn init_with_config(config: &JsValue) -> Result<(), JsValue> {
    let json = js_sys::JSON::stringify(config)?
        .as_string()
        .unwrap_or_default();
    let config = WidgetConfig::from_json_str(&json)?;
    install(Some(config)).map_err(JsValue::from)
}

fn install(config: Option<WidgetConfig>) -> Result<(), WidgetError> {
    let shared = match WIDGET.with(|slot| slot.borrow().clone()) {
        Some(shared) => shared,
        None => {
            let shared = create()?;
            WIDGET.with(|slot| *slot.borrow_mut() = Some(Rc::clone(&shared)));
            shared
        }
    };
    let mut controller = shared
        .try_borrow_mut()
        .map_err(|_| WidgetError::Dom("widget is busy".into()))?;
    if let Some(config) = config {
        controller.reconfigure(config)?;
    }
    let _ = controller.init()?;
    Ok(())
}

fn create() -> Result<Shared, WidgetError> {
    let window = web_sys::window()
        .ok_or_else(|| WidgetError::Dom("no global window".into()))?;
    let document = window
        .document()
        .ok_or_else(|| WidgetError::Dom("no document".into()))?;
    Ok(Rc::new_cyclic(|handle: &Handle| {
        RefCell::new(WidgetController::new(
            WebDocument::new(document, handle.clone()),
            WebWindow::new(window, handle.clone()),
            WidgetConfig::default(),
        ))
    }))
}
