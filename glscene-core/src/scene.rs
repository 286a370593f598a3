//! Scene lifecycle: resources are fetched at start, counted as they come
//! back, and the scene is told once when the whole batch has finished.
//!
//! ```text
//! Created -> Starting -> Loading -> Ready -> Active -> Ended
//! ```
//!
//! Concrete scenes embed a [`BaseScene`] and implement [`Scene`], overriding
//! only the hooks they need.

use std::rc::Rc;

use log::{debug, info, warn};
use nalgebra::Matrix4;

use crate::config::SceneConfig;
use crate::fetch::{HttpRequest, HttpResponse, ImageRequest, ImageResponse};
use crate::graphics::{Capability, ClearMask, Entity, GraphicsContext, Release};
use crate::loader::{LoadCoordinator, LoadProgress, LoadState};
use crate::resource::{ResourceDescriptor, ResourceKind, ResourcePayload, ResourceRegistry};
use crate::transport::{HttpMethod, Transport};
use crate::view_matrix;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenePhase {
    Created,
    Starting,
    Loading,
    Ready,
    Active,
    Ended,
}

/// Identifies the descriptor an in-flight fetch belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    pub index: usize,
    pub name: String,
}

enum PendingFetch {
    Http(HttpRequest<ResourceRef>),
    Image(ImageRequest<ResourceRef>),
}

enum FetchCompletion {
    Http(HttpResponse<ResourceRef>),
    Image(ImageResponse<ResourceRef>),
}

impl PendingFetch {
    fn poll(&mut self) -> Option<FetchCompletion> {
        match self {
            PendingFetch::Http(request) => request.poll().map(FetchCompletion::Http),
            PendingFetch::Image(request) => request.poll().map(FetchCompletion::Image),
        }
    }
}

/// State and behaviour shared by every scene.
pub struct BaseScene {
    transport: Rc<dyn Transport>,
    config: SceneConfig,
    resources: ResourceRegistry,
    coordinator: LoadCoordinator,
    pending: Vec<PendingFetch>,
    entities: Vec<Box<dyn Entity>>,
    shaders: Vec<Box<dyn Release>>,
    projection_matrix: Matrix4<f32>,
    orthographic_matrix: Matrix4<f32>,
    view_matrix: Matrix4<f32>,
    load_complete: bool,
    phase: ScenePhase,
}

impl BaseScene {
    pub fn new(transport: Rc<dyn Transport>) -> Self {
        Self::from_config(SceneConfig::default(), transport)
    }

    /// Create a scene with the configured projection settings and resources.
    pub fn from_config(config: SceneConfig, transport: Rc<dyn Transport>) -> Self {
        let mut resources = ResourceRegistry::new();
        for entry in &config.resources {
            resources.add(ResourceDescriptor::new(entry.name.as_str(), entry.uri.as_str()));
        }

        Self {
            transport,
            config,
            resources,
            coordinator: LoadCoordinator::new(),
            pending: Vec::new(),
            entities: Vec::new(),
            shaders: Vec::new(),
            projection_matrix: Matrix4::identity(),
            orthographic_matrix: Matrix4::identity(),
            view_matrix: Matrix4::identity(),
            load_complete: false,
            phase: ScenePhase::Created,
        }
    }

    /// Register a resource to download at start. Adding after start has no
    /// effect on the batch already in flight.
    pub fn add_resource(&mut self, descriptor: ResourceDescriptor) {
        if self.phase != ScenePhase::Created {
            warn!("resource {} added after start will not be fetched", descriptor.name);
        }
        self.resources.add(descriptor);
    }

    pub fn resources(&self) -> &ResourceRegistry {
        &self.resources
    }

    pub fn add_entity(&mut self, entity: Box<dyn Entity>) {
        self.entities.push(entity);
    }

    pub fn entities(&self) -> &[Box<dyn Entity>] {
        &self.entities
    }

    pub fn add_shader(&mut self, shader: Box<dyn Release>) {
        self.shaders.push(shader);
    }

    pub fn shader_count(&self) -> usize {
        self.shaders.len()
    }

    pub fn projection_matrix(&self) -> &Matrix4<f32> {
        &self.projection_matrix
    }

    pub fn orthographic_matrix(&self) -> &Matrix4<f32> {
        &self.orthographic_matrix
    }

    pub fn view_matrix(&self) -> &Matrix4<f32> {
        &self.view_matrix
    }

    pub fn set_view_matrix(&mut self, view: Matrix4<f32>) {
        self.view_matrix = view;
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn phase(&self) -> ScenePhase {
        self.phase
    }

    /// Set once every resource has reported back and it is safe to begin
    /// updating the scene.
    pub fn is_load_complete(&self) -> bool {
        self.load_complete
    }

    pub fn load_state(&self) -> LoadState {
        self.coordinator.state()
    }

    /// Build the transforms, configure the context and dispatch one fetch per
    /// registered resource.
    ///
    /// Returns [`LoadProgress::Complete`] when there is nothing to load.
    pub fn start(&mut self, gl: &mut dyn GraphicsContext) -> LoadProgress {
        if self.phase != ScenePhase::Created {
            warn!("scene started twice, ignoring");
            return LoadProgress::AlreadyComplete;
        }
        self.phase = ScenePhase::Starting;

        let p = self.config.projection;
        let o = self.config.orthographic;
        self.projection_matrix = view_matrix::perspective(p.fov_y, p.aspect, p.near, p.far);
        self.orthographic_matrix = view_matrix::orthographic(o.width, o.height, o.near, o.far);
        self.view_matrix = Matrix4::identity();

        let [r, g, b, a] = self.config.clear_color;
        gl.clear_color(r, g, b, a);
        gl.clear_depth(1.0);
        gl.enable(Capability::DepthTest);
        gl.enable(Capability::Blend);

        info!("starting scene, fetching {} resources", self.resources.len());
        for (index, descriptor) in self.resources.iter().enumerate() {
            let resource = ResourceRef {
                index,
                name: descriptor.name.clone(),
            };

            let fetch = match descriptor.kind() {
                ResourceKind::Image => {
                    let mut request = ImageRequest::new(self.transport.clone());
                    request.load(descriptor.uri.as_str(), resource);
                    PendingFetch::Image(request)
                }
                ResourceKind::Binary => {
                    let mut request = HttpRequest::new(self.transport.clone());
                    request.send_request(HttpMethod::Get, descriptor.uri.as_str(), None, resource, true);
                    PendingFetch::Http(request)
                }
            };
            self.pending.push(fetch);
        }

        let progress = self.coordinator.begin(self.resources.len());
        if !progress.just_completed() {
            self.phase = ScenePhase::Loading;
        }
        progress
    }

    /// Apply every fetch result that has arrived since the last call.
    /// Returns `true` when this call finished the batch.
    pub fn poll_resources(&mut self) -> bool {
        let mut completions = Vec::new();
        self.pending.retain_mut(|fetch| match fetch.poll() {
            Some(completion) => {
                completions.push(completion);
                false
            }
            None => true,
        });

        let mut finished = false;
        for completion in completions {
            finished |= self.complete_resource(completion);
        }
        finished
    }

    fn complete_resource(&mut self, completion: FetchCompletion) -> bool {
        let (resource, payload) = match completion {
            FetchCompletion::Http(response) => {
                let payload = if response.is_success() {
                    ResourcePayload::Data(response.body)
                } else {
                    warn!(
                        "resource {} failed with status {}",
                        response.state.name, response.status_code
                    );
                    ResourcePayload::Failed
                };
                (response.state, payload)
            }
            FetchCompletion::Image(response) => {
                let payload = match response.image {
                    Ok(image) => ResourcePayload::Image(image),
                    Err(err) => {
                        warn!("resource {} failed: {err}", response.state.name);
                        ResourcePayload::Failed
                    }
                };
                (response.state, payload)
            }
        };

        match self.resources.get_mut(resource.index) {
            Some(descriptor) => {
                debug!("resource {} loaded: {:?}", descriptor.name, payload);
                descriptor.payload = payload;
            }
            None => warn!("completion for unknown resource {}", resource.name),
        }

        self.coordinator.record_completion().just_completed()
    }

    /// Base `OnLoadComplete` behaviour.
    pub fn mark_load_complete(&mut self) {
        self.load_complete = true;
        if matches!(self.phase, ScenePhase::Starting | ScenePhase::Loading) {
            self.phase = ScenePhase::Ready;
        }
        info!(
            "scene ready: {} loaded, {} failed",
            self.resources.loaded_count(),
            self.resources.failed_count()
        );
    }

    /// Per-frame base behaviour: clear the color and depth buffers.
    pub fn update(&mut self, gl: &mut dyn GraphicsContext) {
        if self.phase == ScenePhase::Ready {
            self.phase = ScenePhase::Active;
        }
        gl.clear(ClearMask::COLOR | ClearMask::DEPTH);
    }

    /// Release every tracked entity and shader. Not guarded against being
    /// called twice; a second call finds nothing left to release.
    pub fn end(&mut self) {
        info!(
            "ending scene, releasing {} entities and {} shaders",
            self.entities.len(),
            self.shaders.len()
        );
        for mut entity in self.entities.drain(..) {
            entity.release();
        }
        for mut shader in self.shaders.drain(..) {
            shader.release();
        }
        self.phase = ScenePhase::Ended;
    }
}

/// Lifecycle hooks of a scene.
pub trait Scene {
    fn base(&self) -> &BaseScene;
    fn base_mut(&mut self) -> &mut BaseScene;

    fn start(&mut self, gl: &mut dyn GraphicsContext) {
        if self.base_mut().start(gl).just_completed() {
            self.on_load_complete();
        }
    }

    /// Called once per rendered frame.
    fn update(&mut self, gl: &mut dyn GraphicsContext) {
        pump_resources(self);
        self.base_mut().update(gl);
    }

    fn end(&mut self) {
        self.base_mut().end();
    }

    /// Called exactly once, when every resource has reported back. Scenes
    /// overriding this should call [`BaseScene::mark_load_complete`].
    fn on_load_complete(&mut self) {
        self.base_mut().mark_load_complete();
    }
}

/// Apply arrived fetch results and fire `on_load_complete` if they finished
/// the batch. For scenes that override [`Scene::update`].
pub fn pump_resources<S: Scene + ?Sized>(scene: &mut S) {
    if scene.base_mut().poll_resources() {
        scene.on_load_complete();
    }
}

impl Scene for BaseScene {
    fn base(&self) -> &BaseScene {
        self
    }

    fn base_mut(&mut self) -> &mut BaseScene {
        self
    }
}
