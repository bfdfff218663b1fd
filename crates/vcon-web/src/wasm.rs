#![forbid(unsafe_code)]

use wasm_bindgen::prelude::*;

use crate::console::{Console, ConsoleError};
use crate::dom::DomEnvironment;

fn to_js(err: ConsoleError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

/// Scrollable character display mounted under a DOM element.
///
/// ```js
/// const display = new VconDisplay("screen", '{"display_width": 640}');
/// display.paintText(0, 0, "#00ff00", "READY");
/// display.pan(0, 16);
/// ```
#[wasm_bindgen]
pub struct VconDisplay {
    console: Option<Console<DomEnvironment>>,
}

#[wasm_bindgen]
impl VconDisplay {
    /// Build the ring under the element with id `root_id`.
    ///
    /// `settings_json` is an optional JSON object of display settings.
    #[wasm_bindgen(constructor)]
    pub fn new(root_id: &str, settings_json: Option<String>) -> Result<VconDisplay, JsValue> {
        let env = DomEnvironment::from_window()
            .map_err(|err| to_js(ConsoleError::Surface(err)))?;
        let console = Console::from_json(env, root_id, settings_json.as_deref().unwrap_or(""))
            .map_err(to_js)?;
        Ok(Self {
            console: Some(console),
        })
    }

    fn console(&mut self) -> Result<&mut Console<DomEnvironment>, JsValue> {
        self.console
            .as_mut()
            .ok_or_else(|| js_sys::Error::new("display destroyed").into())
    }

    /// Fill a rectangle in viewport pixels with a `#rrggbb` colour.
    #[wasm_bindgen(js_name = fillRect)]
    pub fn fill_rect(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        color: &str,
    ) -> Result<(), JsValue> {
        self.console()?
            .fill_rect(x, y, width, height, color)
            .map_err(to_js)
    }

    /// Paint text from character cell `(col, row)`; returns glyphs drawn.
    #[wasm_bindgen(js_name = paintText)]
    pub fn paint_text(
        &mut self,
        col: u32,
        row: u32,
        color: &str,
        text: &str,
    ) -> Result<u32, JsValue> {
        let painted = self
            .console()?
            .paint_text(col, row, color, text)
            .map_err(to_js)?;
        Ok(u32::try_from(painted).unwrap_or(u32::MAX))
    }

    /// Scroll by `(dx, dy)` pixels.
    pub fn pan(&mut self, dx: i32, dy: i32) -> Result<(), JsValue> {
        self.console()?.pan(dx, dy).map_err(to_js)
    }

    #[wasm_bindgen(js_name = canvasX)]
    pub fn canvas_x(&self) -> i32 {
        self.console.as_ref().map_or(0, Console::canvas_x)
    }

    #[wasm_bindgen(js_name = canvasY)]
    pub fn canvas_y(&self) -> i32 {
        self.console.as_ref().map_or(0, Console::canvas_y)
    }

    #[wasm_bindgen(js_name = topLeftIndex)]
    pub fn top_left_index(&self) -> u32 {
        self.console
            .as_ref()
            .map_or(0, |console| console.top_left_index() as u32)
    }

    /// Remove the ring from the page and release every handle.
    pub fn destroy(&mut self) {
        if let Some(mut console) = self.console.take()
            && let Ok(container) = console.container()
        {
            container.remove();
        }
    }
}
