/// GLScene Web - WASM host driving a scene inside a WebGL2 canvas
///
/// Resources are fetched with XMLHttpRequest and `<img>` elements; the page
/// calls `render` from its `requestAnimationFrame` loop.
use glscene_core::{BaseScene, ResourceDescriptor, Scene, SceneConfig};
use log::LevelFilter;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

pub mod console;
pub mod context;
pub mod transport;

pub use context::WebGlContext;
pub use transport::{WebImage, WebTransport};

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
pub struct WebRenderer {
    scene: BaseScene,
    context: Option<WebGlContext>,
}

#[wasm_bindgen]
impl WebRenderer {
    /// Create a renderer, optionally from a TOML scene config.
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<String>) -> Result<WebRenderer, JsValue> {
        let config = match config {
            Some(text) => SceneConfig::from_toml_str(&text).map_err(to_js)?,
            None => SceneConfig::default(),
        };

        Ok(WebRenderer {
            scene: BaseScene::from_config(config, Rc::new(WebTransport)),
            context: None,
        })
    }

    /// Initialize the renderer with a canvas element
    pub fn init(&mut self, canvas_id: &str) -> Result<(), JsValue> {
        self.context = Some(WebGlContext::from_canvas_id(canvas_id).map_err(to_js)?);
        Ok(())
    }

    pub fn add_resource(&mut self, name: &str, uri: &str) {
        self.scene.add_resource(ResourceDescriptor::new(name, uri));
    }

    /// Configure GL state and start downloading resources.
    pub fn start(&mut self) -> Result<(), JsValue> {
        let context = self
            .context
            .as_mut()
            .ok_or_else(|| JsValue::from_str("call init() before start()"))?;
        Scene::start(&mut self.scene, context);
        Ok(())
    }

    /// Render a frame
    pub fn render(&mut self) -> Result<(), JsValue> {
        let context = self
            .context
            .as_mut()
            .ok_or_else(|| JsValue::from_str("call init() before render()"))?;
        Scene::update(&mut self.scene, context);
        Ok(())
    }

    pub fn end(&mut self) {
        Scene::end(&mut self.scene);
    }

    pub fn is_loaded(&self) -> bool {
        self.scene.is_load_complete()
    }

    /// Fraction of resources that have reported back, in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        let state = self.scene.load_state();
        if state.total == 0 {
            return if state.is_complete { 1.0 } else { 0.0 };
        }
        state.completed as f32 / state.total as f32
    }

    /// Text of a loaded data resource, if any.
    pub fn resource_text(&self, name: &str) -> Option<String> {
        self.scene
            .resources()
            .find(name)
            .and_then(|descriptor| descriptor.payload.text())
            .map(str::to_string)
    }
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console::init(LevelFilter::Info);
    Ok(())
}
