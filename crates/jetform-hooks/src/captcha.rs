//! Captcha widget mount.

use crate::error::HookError;

/// Container the captcha is rendered into.
pub const CAPTCHA_SELECTOR: &str = "#cf-turnstile";

/// Renders a captcha widget (Turnstile in production).
pub trait CaptchaRenderer {
    /// Render into the element matching `selector` with the given sitekey.
    fn render(&mut self, selector: &str, sitekey: &str)
        -> Result<(), HookError>;
}

/// Render the captcha with the page's sitekey.
///
/// # Errors
///
/// Returns [`HookError::MissingSiteKey`] without a sitekey, or the
/// renderer's error.
pub fn render_captcha<R: CaptchaRenderer + ?Sized>(
    renderer: &mut R,
    sitekey: Option<&str>,
) -> Result<(), HookError> {
    let sitekey = sitekey
        .filter(|k| !k.is_empty())
        .ok_or(HookError::MissingSiteKey)?;
    renderer.render(CAPTCHA_SELECTOR, sitekey)
}
