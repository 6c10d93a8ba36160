//! `Host` over the browser DOM.

use log::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CssStyleDeclaration, Element, HtmlElement, SvgElement, Window};

use vizij_scroll_core::{Host, Rect, StyleSink};

pub struct DomHost {
    window: Window,
    root: Element,
    scrolling: Element,
}

impl DomHost {
    pub fn new() -> Result<Self, JsError> {
        let window = web_sys::window().ok_or_else(|| JsError::new("no global `window`"))?;
        let document = window
            .document()
            .ok_or_else(|| JsError::new("window has no document"))?;
        let root = document
            .document_element()
            .ok_or_else(|| JsError::new("document has no root element"))?;
        let scrolling = document
            .scrolling_element()
            .unwrap_or_else(|| root.clone());
        Ok(Self {
            window,
            root,
            scrolling,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Element whose `scrollTop` drives every instance.
    pub fn set_scrolling_element(&mut self, elem: Element) {
        self.scrolling = elem;
    }

    /// Milliseconds on the same clock as `requestAnimationFrame` timestamps.
    pub fn now(&self) -> f64 {
        self.window.performance().map(|p| p.now()).unwrap_or(0.0)
    }

    fn write(&self, elem: &Element, key: &str, value: &str) {
        let Some(style) = inline_style(elem) else {
            warn!("cannot style <{}>: not an HTML or SVG element", elem.tag_name());
            return;
        };
        if let Err(err) = style.set_property(key, value) {
            warn!("failed to set `{key}: {value}`: {err:?}");
        }
    }
}

fn inline_style(elem: &Element) -> Option<CssStyleDeclaration> {
    if let Some(html) = elem.dyn_ref::<HtmlElement>() {
        return Some(html.style());
    }
    elem.dyn_ref::<SvgElement>().map(SvgElement::style)
}

fn js_number(value: Result<JsValue, JsValue>) -> f64 {
    value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
}

impl Host for DomHost {
    type Element = Element;

    fn scroll_top(&self) -> f64 {
        f64::from(self.scrolling.scroll_top())
    }

    fn viewport_height(&self) -> f64 {
        let inner = js_number(self.window.inner_height());
        if inner > 0.0 {
            inner
        } else {
            js_number(self.window.outer_height())
        }
    }

    fn bounding_rect(&self, elem: &Element) -> Option<Rect> {
        if !elem.is_connected() {
            return None;
        }
        let rect = elem.get_bounding_client_rect();
        Some(Rect::new(rect.top(), rect.height()))
    }

    fn set_property(&mut self, sink: StyleSink<'_, Element>, key: &str, value: &str) {
        match sink {
            StyleSink::Element(elem) => self.write(elem, key, value),
            StyleSink::Root => self.write(&self.root, key, value),
        }
    }
}
