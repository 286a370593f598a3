/// Demo scene: a cylinder whose dimensions come from a downloaded resource
use glscene_core::{
    cylinder, BaseScene, Entity, Mesh, Release, ResourcePayload, Scene, SceneConfig, Transport,
};
use log::{info, warn};
use nalgebra::{Matrix4, Vector3};
use serde::Deserialize;
use std::rc::Rc;

/// Name of the resource holding [`CylinderParams`] as TOML
pub const CYLINDER_RESOURCE: &str = "cylinder";

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CylinderParams {
    pub points: usize,
    pub radius: f32,
    pub height: f32,
}

impl Default for CylinderParams {
    fn default() -> Self {
        Self {
            points: 32,
            radius: 1.0,
            height: 2.0,
        }
    }
}

pub struct MeshEntity {
    name: String,
    mesh: Mesh,
    model: Matrix4<f32>,
}

impl MeshEntity {
    pub fn new(name: impl Into<String>, mesh: Mesh, model: Matrix4<f32>) -> Self {
        Self {
            name: name.into(),
            mesh,
            model,
        }
    }
}

impl Release for MeshEntity {
    fn release(&mut self) {
        info!("releasing {} ({} triangles)", self.name, self.mesh.triangles.len());
        self.mesh.triangles.clear();
    }
}

impl Entity for MeshEntity {
    fn mesh(&self) -> Option<&Mesh> {
        Some(&self.mesh)
    }

    fn model_matrix(&self) -> Matrix4<f32> {
        self.model
    }
}

/// Rotation applied on top of every entity's model matrix
#[derive(Debug, Clone, Copy, Default)]
pub struct Orientation {
    pub pitch: f32,
    pub yaw: f32,
}

impl Orientation {
    pub fn rotate(&mut self, pitch: f32, yaw: f32) {
        self.pitch += pitch;
        self.yaw += yaw;
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::new_rotation(Vector3::new(0.0, self.yaw, 0.0))
            * Matrix4::new_rotation(Vector3::new(self.pitch, 0.0, 0.0))
    }
}

pub struct CylinderScene {
    base: BaseScene,
    params: Option<CylinderParams>,
    pub orientation: Orientation,
}

impl CylinderScene {
    pub fn new(config: SceneConfig, transport: Rc<dyn Transport>) -> Self {
        Self {
            base: BaseScene::from_config(config, transport),
            params: None,
            orientation: Orientation {
                pitch: std::f32::consts::FRAC_PI_2 - 0.3,
                yaw: 0.0,
            },
        }
    }

    /// Parameters the cylinder was built with, once loading finished.
    pub fn params(&self) -> Option<CylinderParams> {
        self.params
    }

    fn read_params(&self) -> CylinderParams {
        let Some(descriptor) = self.base.resources().find(CYLINDER_RESOURCE) else {
            return CylinderParams::default();
        };

        match &descriptor.payload {
            ResourcePayload::Data(bytes) => {
                let parsed: Result<CylinderParams, String> = std::str::from_utf8(bytes)
                    .map_err(|e| e.to_string())
                    .and_then(|text| toml::from_str(text).map_err(|e| e.to_string()));
                parsed.unwrap_or_else(|err| {
                    warn!("invalid {CYLINDER_RESOURCE} resource, using defaults: {err}");
                    CylinderParams::default()
                })
            }
            other => {
                warn!("{CYLINDER_RESOURCE} resource unavailable ({other:?}), using defaults");
                CylinderParams::default()
            }
        }
    }
}

impl Scene for CylinderScene {
    fn base(&self) -> &BaseScene {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseScene {
        &mut self.base
    }

    fn on_load_complete(&mut self) {
        for descriptor in self.base.resources() {
            if let Some(image) = descriptor.payload.image() {
                info!("{}: {}x{} image", descriptor.name, image.width(), image.height());
            }
        }

        let params = self.read_params();
        info!("building cylinder {params:?}");
        let mesh = cylinder(params.points, params.radius, params.height).to_mesh();
        self.base
            .add_entity(Box::new(MeshEntity::new("cylinder", mesh, Matrix4::identity())));
        self.params = Some(params);

        self.base.mark_load_complete();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::AsciiRenderer;
    use crate::transport::FileTransport;
    use glscene_core::ResourceEntry;

    fn scene_with(files: &[(&str, &str)], resources: &[(&str, &str)]) -> (Rc<FileTransport>, CylinderScene) {
        let root = std::env::temp_dir().join(format!(
            "glscene-scene-{}-{}",
            std::process::id(),
            files.len() * 10 + resources.len()
        ));
        std::fs::create_dir_all(&root).unwrap();
        for (name, content) in files {
            std::fs::write(root.join(name), content).unwrap();
        }

        let mut config = SceneConfig::default();
        config.resources = resources
            .iter()
            .map(|(name, uri)| ResourceEntry {
                name: name.to_string(),
                uri: uri.to_string(),
            })
            .collect();

        let transport = Rc::new(FileTransport::new(root));
        let scene = CylinderScene::new(config, transport.clone() as Rc<dyn Transport>);
        (transport, scene)
    }

    #[test]
    fn test_params_come_from_resource() {
        let (transport, mut scene) = scene_with(
            &[("cyl.toml", "points = 9\nradius = 0.5")],
            &[(CYLINDER_RESOURCE, "cyl.toml")],
        );
        let mut gl = AsciiRenderer::new(20, 10);

        scene.start(&mut gl);
        assert!(scene.params().is_none());

        transport.pump();
        scene.update(&mut gl);

        let params = scene.params().unwrap();
        assert_eq!(params.points, 9);
        assert_eq!(params.radius, 0.5);
        assert_eq!(params.height, 2.0);

        let entity = &scene.base().entities()[0];
        // 9 points round up to 10, giving 8 triangles
        assert_eq!(entity.mesh().unwrap().triangles.len(), 8);
    }

    #[test]
    fn test_missing_resource_falls_back_to_defaults() {
        let (transport, mut scene) = scene_with(&[], &[(CYLINDER_RESOURCE, "absent.toml")]);
        let mut gl = AsciiRenderer::new(20, 10);

        scene.start(&mut gl);
        transport.pump();
        scene.update(&mut gl);

        assert_eq!(scene.params(), Some(CylinderParams::default()));
        assert_eq!(scene.base().resources().failed_count(), 1);
    }

    #[test]
    fn test_end_releases_cylinder() {
        let (_transport, mut scene) = scene_with(&[], &[]);
        let mut gl = AsciiRenderer::new(20, 10);

        // nothing to load, the cylinder is built during start
        scene.start(&mut gl);
        assert_eq!(scene.base().entities().len(), 1);

        scene.end();
        assert!(scene.base().entities().is_empty());
    }
}
