//! URL handling: trusted origin, forwarded referrer and iframe sources.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::Url;

use crate::error::WidgetError;
use crate::state::DisplayStyle;

/// Characters `encodeURIComponent` leaves alone, removed from the escape
/// set.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Query parameter carrying the host page URL.
pub const REFERRER_PARAM: &str = "referrer";

/// Percent-encode like `encodeURIComponent`.
#[must_use]
pub fn encode_component(s: &str) -> String {
    utf8_percent_encode(s, URI_COMPONENT).to_string()
}

/// Serialized origin of the bootstrap script, used to filter messages.
///
/// `src` is resolved against `page_url` so relative script paths work.
/// Opaque origins (`data:`, `blob:` without host, ...) are rejected since
/// they serialize as `"null"`, the same origin a sandboxed frame reports.
///
/// # Errors
///
/// Returns [`WidgetError::InvalidScriptSource`] for an empty, unparsable or
/// opaque source.
pub fn trusted_origin(
    src: &str,
    page_url: &str,
) -> Result<String, WidgetError> {
    let invalid = |reason: String| WidgetError::InvalidScriptSource {
        src: src.to_owned(),
        reason,
    };
    if src.is_empty() {
        return Err(invalid("missing src".into()));
    }
    let url = resolve(src, page_url).map_err(|e| invalid(e.to_string()))?;
    let origin = url.origin();
    if !origin.is_tuple() {
        return Err(invalid("opaque origin".into()));
    }
    Ok(origin.ascii_serialization())
}

/// Encoded `referrer` value for the page at `page_url`.
///
/// When the page itself was opened with a non-empty `referrer` parameter,
/// its value replaces the page URL, so the original referrer survives a hop
/// through a landing page. An empty one is stripped and the page URL is
/// sent instead.
#[must_use]
pub fn forwarded_referrer(page_url: &str) -> String {
    let Ok(mut url) = Url::parse(page_url) else {
        return encode_component(page_url);
    };
    let (inherited, rest): (Vec<_>, Vec<_>) = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .partition(|(key, _)| key == REFERRER_PARAM);
    if inherited.is_empty() {
        return encode_component(page_url);
    }
    if let Some((_, value)) = inherited.iter().find(|(_, v)| !v.is_empty()) {
        return encode_component(value);
    }
    if rest.is_empty() {
        url.set_query(None);
    } else {
        let _ = url.query_pairs_mut().clear().extend_pairs(rest);
    }
    encode_component(url.as_str())
}

/// A product link's target, resolved to an absolute URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetUrl {
    href: String,
    has_params: bool,
}

impl TargetUrl {
    /// Resolve the link's `href` against the page URL.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::InvalidProductLink`] when the href is empty or
    /// does not resolve to a URL.
    pub fn parse(href: &str, page_url: &str) -> Result<Self, WidgetError> {
        if href.trim().is_empty() {
            return Err(WidgetError::InvalidProductLink {
                href: href.to_owned(),
                reason: "missing href".into(),
            });
        }
        let url = resolve(href, page_url).map_err(|e| {
            WidgetError::InvalidProductLink {
                href: href.to_owned(),
                reason: e.to_string(),
            }
        })?;
        let has_params = url.query_pairs().next().is_some();
        // Keep the author's spelling when it was already absolute.
        let href = if Url::parse(href).is_ok() {
            href.to_owned()
        } else {
            url.into()
        };
        Ok(Self { href, has_params })
    }

    /// Target URL as written on the link (or resolved, if it was relative).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.href
    }

    /// Iframe source: the target with `referrer` and `mode` appended.
    ///
    /// The separator is `?` when the target has no query parameters yet and
    /// `&` otherwise. Parameters go before any `#fragment`.
    #[must_use]
    pub fn iframe_src(&self, referrer: &str, style: DisplayStyle) -> String {
        let (base, fragment) = match self.href.split_once('#') {
            Some((base, fragment)) => (base, Some(fragment)),
            None => (self.href.as_str(), None),
        };
        let separator = if self.has_params {
            "&"
        } else if base.ends_with('?') {
            ""
        } else {
            "?"
        };
        let mut src = format!(
            "{base}{separator}{REFERRER_PARAM}={referrer}&mode={}",
            style.mode()
        );
        if let Some(fragment) = fragment {
            src.push('#');
            src.push_str(fragment);
        }
        src
    }
}

fn resolve(input: &str, page_url: &str) -> Result<Url, url::ParseError> {
    match Url::parse(input) {
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse(page_url)?.join(input)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "https://shop.test/landing?utm=1";

    #[test]
    fn encodes_like_encode_uri_component() {
        assert_eq!(
            encode_component("https://a.test/p?x=1&y=(2)"),
            "https%3A%2F%2Fa.test%2Fp%3Fx%3D1%26y%3D(2)"
        );
        assert_eq!(encode_component("a b~*'!"), "a%20b~*'!");
    }

    #[test]
    fn trusted_origin_from_absolute_and_relative_src() {
        assert_eq!(
            trusted_origin("https://cdn.jetform.test/js/widget.js", PAGE)
                .unwrap(),
            "https://cdn.jetform.test"
        );
        assert_eq!(
            trusted_origin("/js/widget.js", PAGE).unwrap(),
            "https://shop.test"
        );
        assert_eq!(
            trusted_origin("http://cdn.test:8080/w.js", PAGE).unwrap(),
            "http://cdn.test:8080"
        );
    }

    #[test]
    fn trusted_origin_rejects_opaque_and_empty() {
        assert!(matches!(
            trusted_origin("data:text/javascript,1", PAGE),
            Err(WidgetError::InvalidScriptSource { .. })
        ));
        assert!(trusted_origin("", PAGE).is_err());
    }

    #[test]
    fn referrer_is_encoded_page_url() {
        assert_eq!(
            forwarded_referrer(PAGE),
            "https%3A%2F%2Fshop.test%2Flanding%3Futm%3D1"
        );
    }

    #[test]
    fn inherited_referrer_is_forwarded() {
        assert_eq!(
            forwarded_referrer(
                "https://shop.test/landing\
                 ?referrer=https%3A%2F%2Fblog.test%2F&utm=1"
            ),
            "https%3A%2F%2Fblog.test%2F"
        );
    }

    #[test]
    fn empty_inherited_referrer_falls_back_to_page() {
        assert_eq!(
            forwarded_referrer("https://shop.test/landing?referrer=&utm=1"),
            "https%3A%2F%2Fshop.test%2Flanding%3Futm%3D1"
        );
        assert_eq!(
            forwarded_referrer("https://shop.test/landing?referrer="),
            "https%3A%2F%2Fshop.test%2Flanding"
        );
    }

    #[test]
    fn embed_src_without_query() {
        let target = TargetUrl::parse("https://x.test/p", PAGE).unwrap();
        assert_eq!(
            target.iframe_src("R", DisplayStyle::Embed),
            "https://x.test/p?referrer=R&mode=embed"
        );
    }

    #[test]
    fn popup_src_with_existing_query() {
        let target =
            TargetUrl::parse("https://x.test/p?ref=abc", PAGE).unwrap();
        assert_eq!(
            target.iframe_src("R", DisplayStyle::Overlay),
            "https://x.test/p?ref=abc&referrer=R&mode=popup"
        );
    }

    #[test]
    fn src_keeps_fragment_last_and_handles_bare_question_mark() {
        let target = TargetUrl::parse("https://x.test/p#buy", PAGE).unwrap();
        assert_eq!(
            target.iframe_src("R", DisplayStyle::Overlay),
            "https://x.test/p?referrer=R&mode=popup#buy"
        );
        let target = TargetUrl::parse("https://x.test/p?", PAGE).unwrap();
        assert_eq!(
            target.iframe_src("R", DisplayStyle::Overlay),
            "https://x.test/p?referrer=R&mode=popup"
        );
    }

    #[test]
    fn relative_href_resolves_against_page() {
        let target = TargetUrl::parse("/p/ebook", PAGE).unwrap();
        assert_eq!(target.as_str(), "https://shop.test/p/ebook");
    }

    #[test]
    fn empty_href_is_rejected() {
        assert!(matches!(
            TargetUrl::parse("  ", PAGE),
            Err(WidgetError::InvalidProductLink { .. })
        ));
    }
}
