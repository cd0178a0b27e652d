//! LiveView hook dispatch.
//!
//! LiveView calls `mounted`/`updated` on a hook object named by the
//! element's `phx-hook`. [`HookSet`] maps those names onto chart and
//! captcha renders using the capabilities it was built with.

use crate::captcha::{self, CaptchaRenderer};
use crate::chart::{ChartKind, ChartRenderer, Dataset};
use crate::error::HookError;

/// Hook name of the captcha mount.
pub const CAPTCHA_HOOK: &str = "RenderCaptcha";

/// Everything a hook reads from the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookContext {
    /// `data-*` attributes of the hook element.
    pub dataset: Dataset,
    /// Content of `<meta name="captcha-sitekey">`.
    pub sitekey: Option<String>,
}

/// The dashboard's hooks, bound to explicit renderers.
pub struct HookSet<C, K> {
    charts: C,
    captcha: K,
}

impl<C: ChartRenderer, K: CaptchaRenderer> HookSet<C, K> {
    /// Bind hooks to their renderers.
    #[must_use]
    pub fn new(charts: C, captcha: K) -> Self {
        Self { charts, captcha }
    }

    /// The chart renderer.
    #[must_use]
    pub fn charts(&self) -> &C {
        &self.charts
    }

    /// The captcha renderer.
    #[must_use]
    pub fn captcha(&self) -> &K {
        &self.captcha
    }

    /// `mounted()` of hook `name`.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::UnknownHook`] for an unregistered name, or
    /// the error from building or rendering the hook.
    pub fn mounted(
        &mut self,
        name: &str,
        ctx: &HookContext,
    ) -> Result<(), HookError> {
        if name == CAPTCHA_HOOK {
            return captcha::render_captcha(
                &mut self.captcha,
                ctx.sitekey.as_deref(),
            );
        }
        let kind = ChartKind::from_hook_name(name)
            .ok_or_else(|| HookError::UnknownHook(name.to_owned()))?;
        self.render_chart(kind, ctx)
    }

    /// `updated()` of hook `name`. Hooks without an update handler do
    /// nothing.
    ///
    /// # Errors
    ///
    /// Same as [`mounted`](Self::mounted).
    pub fn updated(
        &mut self,
        name: &str,
        ctx: &HookContext,
    ) -> Result<(), HookError> {
        if name == CAPTCHA_HOOK {
            return Ok(());
        }
        let kind = ChartKind::from_hook_name(name)
            .ok_or_else(|| HookError::UnknownHook(name.to_owned()))?;
        if !kind.renders_on_update() {
            return Ok(());
        }
        self.render_chart(kind, ctx)
    }

    fn render_chart(
        &mut self,
        kind: ChartKind,
        ctx: &HookContext,
    ) -> Result<(), HookError> {
        let spec = kind.spec(&ctx.dataset)?;
        log::debug!("Rendering {}", kind.selector());
        self.charts.render(kind.selector(), &spec)
    }
}
