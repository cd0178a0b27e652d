//! Stylesheet injected by the widget.
//!
//! Maps the state vocabulary onto visuals: idle wrappers collapse to
//! nothing, `loading` dims the page and shows a label, `loaded` gives the
//! iframe the full viewport, and `embed` keeps the wrapper in page flow.

/// Render the widget stylesheet for the given wrapper and iframe classes.
#[must_use]
pub fn stylesheet(wrapper: &str, iframe: &str) -> String {
    format!(
        r".{wrapper} {{
  align-items: center;
  background: rgba(0, 0, 0, 0);
  cursor: pointer;
  display: flex;
  justify-content: center;
  left: 0;
  position: fixed;
  top: 0;
  transition: background 0.3s linear;
  z-index: 99998;
}}
.{wrapper}.loaded,
.{wrapper}.loading {{
  background: rgba(0, 0, 0, 0.6);
  height: 100%;
  width: 100%;
}}
.{wrapper}.embed {{
  background: transparent;
  cursor: initial;
  display: block;
  height: 573px;
  margin: 0 auto;
  max-width: 1024px;
  position: initial;
}}
.{wrapper}.embed.loading {{
  height: 50px;
  width: 100px;
}}
.{wrapper}.loading:before {{
  align-items: center;
  color: #fff;
  content: 'Loading...';
  display: flex;
  justify-content: center;
  padding: 10px 50px;
}}
.{wrapper}.embed.loading:before {{
  display: none;
}}
.{wrapper}.loaded .{iframe} {{
  height: 100%;
  width: 100%;
}}
.{iframe} {{
  border: none;
  height: 0;
  width: 0;
  z-index: 2;
}}
"
    )
}
