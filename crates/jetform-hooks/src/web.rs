//! Browser adapters: ApexCharts and Turnstile behind the renderer traits,
//! and a `Hooks` object for the LiveView socket.
//!
//! Both libraries are handed in by the page script (`new Hooks(ApexCharts,
//! turnstile)`) instead of being looked up as globals.

use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::captcha::CaptchaRenderer;
use crate::chart::{ChartRenderer, ChartSpec, Dataset};
use crate::error::HookError;
use crate::hooks::{HookContext, HookSet};

fn js_err(e: &JsValue) -> HookError {
    HookError::Render(e.as_string().unwrap_or_else(|| format!("{e:?}")))
}

fn document() -> Result<web_sys::Document, HookError> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| HookError::Render("no document".into()))
}

/// Call `target[name](...args)`.
fn call_method(
    target: &JsValue,
    name: &str,
    args: &Array,
) -> Result<JsValue, HookError> {
    let method: Function = Reflect::get(target, &JsValue::from_str(name))
        .map_err(|e| js_err(&e))?
        .dyn_into()
        .map_err(|_| HookError::Render(format!("{name} is not a function")))?;
    method.apply(target, args).map_err(|e| js_err(&e))
}

/// [`ChartRenderer`] over the `ApexCharts` constructor.
pub struct ApexRenderer {
    constructor: Function,
}

impl ChartRenderer for ApexRenderer {
    fn render(
        &mut self,
        selector: &str,
        spec: &ChartSpec,
    ) -> Result<(), HookError> {
        let el = document()?
            .query_selector(selector)
            .map_err(|e| js_err(&e))?
            .ok_or_else(|| HookError::Render(format!("{selector} not found")))?;
        let options = js_sys::JSON::parse(&spec.options.to_string())
            .map_err(|e| js_err(&e))?;
        if spec.round_tooltip {
            let formatter =
                Closure::<dyn Fn(f64) -> f64>::new(|v: f64| v.round());
            let y = Object::new();
            let _ = Reflect::set(
                &y,
                &"formatter".into(),
                &formatter.into_js_value(),
            )
            .map_err(|e| js_err(&e))?;
            let tooltip = Object::new();
            let _ = Reflect::set(&tooltip, &"y".into(), &y)
                .map_err(|e| js_err(&e))?;
            let _ = Reflect::set(&options, &"tooltip".into(), &tooltip)
                .map_err(|e| js_err(&e))?;
        }
        let chart = Reflect::construct(
            &self.constructor,
            &Array::of2(&el, &options),
        )
        .map_err(|e| js_err(&e))?;
        let _ = call_method(&chart, "render", &Array::new())?;
        Ok(())
    }
}

/// [`CaptchaRenderer`] over the `turnstile` object.
pub struct TurnstileRenderer {
    turnstile: JsValue,
}

impl CaptchaRenderer for TurnstileRenderer {
    fn render(
        &mut self,
        selector: &str,
        sitekey: &str,
    ) -> Result<(), HookError> {
        let params = Object::new();
        let _ = Reflect::set(&params, &"sitekey".into(), &sitekey.into())
            .map_err(|e| js_err(&e))?;
        let _ = call_method(
            &self.turnstile,
            "render",
            &Array::of2(&selector.into(), &params),
        )?;
        Ok(())
    }
}

/// Hook dispatcher exported to JavaScript.
#[wasm_bindgen]
pub struct Hooks {
    inner: HookSet<ApexRenderer, TurnstileRenderer>,
}

#[wasm_bindgen]
impl Hooks {
    /// Bind the hooks to the page's `ApexCharts` and `turnstile`.
    #[wasm_bindgen(constructor)]
    pub fn new(apex_charts: Function, turnstile: JsValue) -> Self {
        Self {
            inner: HookSet::new(
                ApexRenderer {
                    constructor: apex_charts,
                },
                TurnstileRenderer { turnstile },
            ),
        }
    }

    /// Run `mounted()` of hook `name` for element `el`.
    ///
    /// # Errors
    ///
    /// Rejects with the hook error's message.
    pub fn mounted(
        &mut self,
        name: &str,
        el: &web_sys::HtmlElement,
    ) -> Result<(), JsValue> {
        let ctx = context(el);
        self.inner
            .mounted(name, &ctx)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Run `updated()` of hook `name` for element `el`.
    ///
    /// # Errors
    ///
    /// Rejects with the hook error's message.
    pub fn updated(
        &mut self,
        name: &str,
        el: &web_sys::HtmlElement,
    ) -> Result<(), JsValue> {
        let ctx = context(el);
        self.inner
            .updated(name, &ctx)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

fn context(el: &web_sys::HtmlElement) -> HookContext {
    let data = el.dataset();
    let sitekey = document()
        .ok()
        .and_then(|d| d.query_selector("meta[name='captcha-sitekey']").ok())
        .flatten()
        .and_then(|meta| meta.get_attribute("content"));
    HookContext {
        dataset: Dataset {
            buckets: data.get("buckets"),
            height: data.get("height"),
        },
        sitekey,
    }
}
