#![forbid(unsafe_code)]

//! DOM-backed render environment.
//!
//! Containers are absolutely positioned `<div>`s, drawables are `<canvas>`
//! elements painted through their 2D context. Every node the engine creates
//! carries its local id in the `data-ring` attribute, which is how
//! `find_child` recognizes it again after the surrogate cache is reset.

use vcon_core::color::Rgba;
use vcon_core::geometry::PixelRect;
use vcon_render::{RenderEnvironment, SurfaceError};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlElement};

/// Attribute holding a node's structural marker.
pub const MARKER_ATTR: &str = "data-ring";

#[derive(Debug, Clone)]
pub struct DomEnvironment {
    document: Document,
}

impl DomEnvironment {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// Environment for the page's own document.
    pub fn from_window() -> Result<Self, SurfaceError> {
        web_sys::window()
            .and_then(|window| window.document())
            .map(Self::new)
            .ok_or_else(|| SurfaceError::Environment("no document".into()))
    }

    fn create_marked(&self, tag: &str, marker: &str) -> Result<Element, SurfaceError> {
        let element = self.document.create_element(tag).map_err(js_error)?;
        element
            .set_attribute(MARKER_ATTR, marker)
            .map_err(js_error)?;
        if let Some(html) = element.dyn_ref::<HtmlElement>() {
            let style = html.style();
            style
                .set_property("position", "absolute")
                .map_err(js_error)?;
            style.set_property("left", "0px").map_err(js_error)?;
            style.set_property("top", "0px").map_err(js_error)?;
        }
        Ok(element)
    }
}

fn js_error(err: JsValue) -> SurfaceError {
    SurfaceError::Environment(
        err.as_string()
            .unwrap_or_else(|| format!("{err:?}")),
    )
}

fn set_styles(node: &Element, styles: &[(&str, String)]) {
    let Some(html) = node.dyn_ref::<HtmlElement>() else {
        return;
    };
    let style = html.style();
    for (name, value) in styles {
        if let Err(err) = style.set_property(name, value) {
            vcon_core::warn!(property = *name, error = ?err, "style update failed");
        }
    }
}

impl RenderEnvironment for DomEnvironment {
    type Handle = Element;

    fn lookup_root(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn find_child(&self, parent: &Element, marker: &str) -> Option<Element> {
        let children = parent.children();
        (0..children.length())
            .filter_map(|i| children.item(i))
            .find(|child| child.get_attribute(MARKER_ATTR).as_deref() == Some(marker))
    }

    fn create_container(&mut self, marker: &str) -> Result<Element, SurfaceError> {
        self.create_marked("div", marker)
    }

    fn create_drawable(
        &mut self,
        marker: &str,
        width: u32,
        height: u32,
    ) -> Result<Element, SurfaceError> {
        let element = self.create_marked("canvas", marker)?;
        let canvas = element
            .dyn_ref::<HtmlCanvasElement>()
            .ok_or_else(|| SurfaceError::Environment("canvas element expected".into()))?;
        canvas.set_width(width);
        canvas.set_height(height);
        Ok(element)
    }

    fn attach(&mut self, parent: &Element, child: &Element) {
        if let Err(err) = parent.append_child(child) {
            vcon_core::warn!(error = ?err, "DOM attach failed");
        }
    }

    fn set_position(&mut self, node: &Element, left: i32, top: i32) {
        set_styles(
            node,
            &[("left", format!("{left}px")), ("top", format!("{top}px"))],
        );
    }

    fn set_size(&mut self, node: &Element, width: u32, height: u32) {
        set_styles(
            node,
            &[
                ("width", format!("{width}px")),
                ("height", format!("{height}px")),
                ("position", "relative".to_owned()),
                ("overflow", "hidden".to_owned()),
            ],
        );
    }

    fn fill_rect(&mut self, drawable: &Element, rect: PixelRect, color: Rgba) {
        let Some(canvas) = drawable.dyn_ref::<HtmlCanvasElement>() else {
            return;
        };
        let context = match canvas.get_context("2d") {
            Ok(Some(context)) => context,
            Ok(None) => return,
            Err(err) => {
                vcon_core::warn!(error = ?err, "2d context unavailable");
                return;
            }
        };
        let Ok(context) = context.dyn_into::<CanvasRenderingContext2d>() else {
            return;
        };
        context.set_fill_style_str(&color.to_css());
        context.fill_rect(
            f64::from(rect.x),
            f64::from(rect.y),
            f64::from(rect.width),
            f64::from(rect.height),
        );
    }
}
