//! GLScene Core Library - platform-free scene, geometry and transform logic
//!
//! Hosts supply a [`Transport`] for IO and a [`GraphicsContext`] for render
//! state; everything here runs on the host's single event-loop thread.

pub mod camera;
pub mod config;
pub mod error;
pub mod fetch;
pub mod geometry;
pub mod graphics;
pub mod loader;
pub mod resource;
pub mod scene;
pub mod transport;
pub mod view_matrix;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use camera::{Camera, ProjectionMode};
pub use config::{ResourceEntry, SceneConfig};
pub use error::{GlSceneError, Result};
pub use fetch::{HttpRequest, HttpResponse, ImageRequest, ImageResponse};
pub use geometry::{cylinder, Mesh, PolygonMesh, Triangle, Vertex};
pub use graphics::{Capability, ClearMask, Entity, GraphicsContext, Release};
pub use loader::{LoadCoordinator, LoadPhase, LoadProgress, LoadState};
pub use resource::{
    DecodedImage, ImageHandle, ResourceDescriptor, ResourceKind, ResourcePayload,
    ResourceRegistry,
};
pub use scene::{pump_resources, BaseScene, ResourceRef, Scene, ScenePhase};
pub use transport::{
    HttpMethod, HttpResponder, ImageLoadError, ImageResponder, ImageResult, RequestHandle,
    Transport, TransportRequest, TransportResponse,
};
