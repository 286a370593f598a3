/// Capabilities a scene needs from the host's rendering context
use nalgebra::Matrix4;

use crate::geometry::Mesh;

/// Server-side capabilities toggled through [`GraphicsContext::enable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    DepthTest,
    Blend,
    CullFace,
}

/// Buffers cleared by [`GraphicsContext::clear`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClearMask {
    pub color: bool,
    pub depth: bool,
}

impl ClearMask {
    pub const COLOR: ClearMask = ClearMask {
        color: true,
        depth: false,
    };
    pub const DEPTH: ClearMask = ClearMask {
        color: false,
        depth: true,
    };
    pub const ALL: ClearMask = ClearMask {
        color: true,
        depth: true,
    };
}

impl std::ops::BitOr for ClearMask {
    type Output = ClearMask;

    fn bitor(self, rhs: ClearMask) -> ClearMask {
        ClearMask {
            color: self.color || rhs.color,
            depth: self.depth || rhs.depth,
        }
    }
}

/// The host's rendering context. Scenes receive it explicitly on every call
/// that touches render state; they never create or own it.
pub trait GraphicsContext {
    fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32);
    fn clear_depth(&mut self, depth: f32);
    fn enable(&mut self, capability: Capability);
    fn clear(&mut self, mask: ClearMask);
}

/// Something holding resources that must be given back when a scene ends.
pub trait Release {
    fn release(&mut self);
}

/// A renderable object tracked by a scene.
pub trait Entity: Release {
    fn mesh(&self) -> Option<&Mesh> {
        None
    }

    fn model_matrix(&self) -> Matrix4<f32> {
        Matrix4::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_mask_union() {
        assert_eq!(ClearMask::COLOR | ClearMask::DEPTH, ClearMask::ALL);
        assert_eq!(ClearMask::default() | ClearMask::COLOR, ClearMask::COLOR);
    }
}
