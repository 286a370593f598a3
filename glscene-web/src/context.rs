/// WebGL2 implementation of the graphics context
use glscene_core::{Capability, ClearMask, GlSceneError, GraphicsContext, Result};
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, WebGl2RenderingContext as Gl};

pub struct WebGlContext {
    gl: Gl,
}

impl WebGlContext {
    pub fn new(gl: Gl) -> Self {
        Self { gl }
    }

    /// Acquire a WebGL2 context from the canvas with the given element id.
    pub fn from_canvas_id(canvas_id: &str) -> Result<Self> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| GlSceneError::Context("no document".to_string()))?;

        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| GlSceneError::Context(format!("no element #{canvas_id}")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| GlSceneError::Context(format!("#{canvas_id} is not a canvas")))?;

        let gl = canvas
            .get_context("webgl2")
            .map_err(|err| GlSceneError::Context(format!("{err:?}")))?
            .ok_or_else(|| GlSceneError::Context("webgl2 not supported".to_string()))?
            .dyn_into::<Gl>()
            .map_err(|_| GlSceneError::Context("unexpected context type".to_string()))?;

        Ok(Self::new(gl))
    }

    pub fn gl(&self) -> &Gl {
        &self.gl
    }
}

fn capability_enum(capability: Capability) -> u32 {
    match capability {
        Capability::DepthTest => Gl::DEPTH_TEST,
        Capability::Blend => Gl::BLEND,
        Capability::CullFace => Gl::CULL_FACE,
    }
}

fn clear_bits(mask: ClearMask) -> u32 {
    let mut bits = 0;
    if mask.color {
        bits |= Gl::COLOR_BUFFER_BIT;
    }
    if mask.depth {
        bits |= Gl::DEPTH_BUFFER_BIT;
    }
    bits
}

impl GraphicsContext for WebGlContext {
    fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.gl.clear_color(r, g, b, a);
    }

    fn clear_depth(&mut self, depth: f32) {
        self.gl.clear_depth(depth);
    }

    fn enable(&mut self, capability: Capability) {
        self.gl.enable(capability_enum(capability));
    }

    fn clear(&mut self, mask: ClearMask) {
        self.gl.clear(clear_bits(mask));
    }
}
