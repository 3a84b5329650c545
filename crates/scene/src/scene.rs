use std::collections::BTreeMap;

use cubefield_common::{Color4, FrameTime, NodeId};
use cubefield_input::CameraAction;
use glam::Vec3;

use crate::camera::Camera;
use crate::light::HemisphericLight;
use crate::material::Material;
use crate::mesh::Mesh;

/// Opaque option map handed through from the host configuration.
pub type OptionsMap = serde_json::Map<String, serde_json::Value>;

/// Handle for a resource the scene waits on before it reports ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(pub u64);

/// Counts for debug output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneSummary {
    pub meshes: usize,
    pub materials: usize,
    pub lights: usize,
    pub cameras: usize,
    pub pending_resources: usize,
    pub frame_index: Option<u64>,
}

/// The scene graph for one mount: cameras, lights, meshes and materials,
/// plus readiness tracking and per-frame timing.
#[derive(Debug)]
pub struct Scene {
    options: OptionsMap,
    pub clear_color: Color4,
    meshes: BTreeMap<NodeId, Mesh>,
    materials: BTreeMap<NodeId, Material>,
    lights: BTreeMap<NodeId, HemisphericLight>,
    cameras: BTreeMap<NodeId, Camera>,
    active_camera: Option<NodeId>,
    controls_attached: bool,

    pending: BTreeMap<ResourceId, String>,
    next_resource: u64,
    ready_notified: bool,

    frame: Option<FrameTime>,
    camera_actions: Vec<CameraAction>,
    camera_movement: Vec3,
}

impl Scene {
    /// Create an empty scene. `options` are kept verbatim.
    pub fn new(options: OptionsMap) -> Self {
        Self {
            options,
            clear_color: Color4::new(0.2, 0.2, 0.3, 1.0),
            meshes: BTreeMap::new(),
            materials: BTreeMap::new(),
            lights: BTreeMap::new(),
            cameras: BTreeMap::new(),
            active_camera: None,
            controls_attached: false,
            pending: BTreeMap::new(),
            next_resource: 0,
            ready_notified: false,
            frame: None,
            camera_actions: Vec::new(),
            camera_movement: Vec3::ZERO,
        }
    }

    pub fn options(&self) -> &OptionsMap {
        &self.options
    }

    // --- Readiness ---

    /// Register a resource that must resolve before the scene is ready.
    pub fn add_pending_resource(&mut self, label: impl Into<String>) -> ResourceId {
        let id = ResourceId(self.next_resource);
        self.next_resource += 1;
        let label = label.into();
        tracing::debug!(resource = id.0, %label, "scene resource pending");
        self.pending.insert(id, label);
        id
    }

    /// Mark a pending resource as loaded. Returns false for unknown ids.
    pub fn resolve_resource(&mut self, id: ResourceId) -> bool {
        match self.pending.remove(&id) {
            Some(label) => {
                tracing::debug!(resource = id.0, %label, remaining = self.pending.len(), "scene resource ready");
                true
            }
            None => false,
        }
    }

    pub fn pending_resources(&self) -> impl Iterator<Item = (ResourceId, &str)> {
        self.pending.iter().map(|(id, label)| (*id, label.as_str()))
    }

    pub fn is_ready(&self) -> bool {
        self.pending.is_empty()
    }

    /// One-shot "became ready" notification: true the first time it is
    /// called while the scene is ready, false on every other call.
    pub fn take_ready_notification(&mut self) -> bool {
        if self.ready_notified || !self.is_ready() {
            return false;
        }
        self.ready_notified = true;
        true
    }

    // --- Frame timing ---

    /// Record the timing of the frame about to be updated and drawn.
    pub fn begin_frame(&mut self, frame: FrameTime) {
        self.frame = Some(frame);
    }

    pub fn frame_time(&self) -> Option<&FrameTime> {
        self.frame.as_ref()
    }

    /// Milliseconds since the previous frame; 0 before the first frame.
    pub fn delta_time_ms(&self) -> f64 {
        self.frame.map(|f| f.delta_ms()).unwrap_or(0.0)
    }

    // --- Meshes & materials ---

    pub fn add_mesh(&mut self, mesh: Mesh) -> NodeId {
        let id = NodeId::new();
        self.meshes.insert(id, mesh);
        id
    }

    pub fn remove_mesh(&mut self, id: NodeId) -> Option<Mesh> {
        self.meshes.remove(&id)
    }

    pub fn mesh(&self, id: NodeId) -> Option<&Mesh> {
        self.meshes.get(&id)
    }

    pub fn mesh_mut(&mut self, id: NodeId) -> Option<&mut Mesh> {
        self.meshes.get_mut(&id)
    }

    pub fn meshes(&self) -> &BTreeMap<NodeId, Mesh> {
        &self.meshes
    }

    pub fn find_mesh(&self, name: &str) -> Option<NodeId> {
        self.meshes
            .iter()
            .find(|(_, m)| m.name == name)
            .map(|(id, _)| *id)
    }

    pub fn add_material(&mut self, material: impl Into<Material>) -> NodeId {
        let id = NodeId::new();
        self.materials.insert(id, material.into());
        id
    }

    pub fn material(&self, id: NodeId) -> Option<&Material> {
        self.materials.get(&id)
    }

    pub fn material_mut(&mut self, id: NodeId) -> Option<&mut Material> {
        self.materials.get_mut(&id)
    }

    pub fn materials(&self) -> &BTreeMap<NodeId, Material> {
        &self.materials
    }

    /// The material a mesh draws with, if it names one that exists.
    pub fn material_of(&self, mesh: &Mesh) -> Option<&Material> {
        mesh.material.and_then(|id| self.materials.get(&id))
    }

    // --- Lights ---

    pub fn add_light(&mut self, light: HemisphericLight) -> NodeId {
        let id = NodeId::new();
        self.lights.insert(id, light);
        id
    }

    pub fn light_mut(&mut self, id: NodeId) -> Option<&mut HemisphericLight> {
        self.lights.get_mut(&id)
    }

    pub fn lights(&self) -> &BTreeMap<NodeId, HemisphericLight> {
        &self.lights
    }

    // --- Cameras ---

    /// Add a camera. The first camera added becomes the active one.
    pub fn add_camera(&mut self, camera: Camera) -> NodeId {
        let id = NodeId::new();
        self.cameras.insert(id, camera);
        if self.active_camera.is_none() {
            self.active_camera = Some(id);
        }
        id
    }

    pub fn set_active_camera(&mut self, id: NodeId) -> bool {
        if self.cameras.contains_key(&id) {
            self.active_camera = Some(id);
            true
        } else {
            false
        }
    }

    pub fn active_camera(&self) -> Option<&Camera> {
        self.active_camera.and_then(|id| self.cameras.get(&id))
    }

    pub fn active_camera_mut(&mut self) -> Option<&mut Camera> {
        self.active_camera.and_then(|id| self.cameras.get_mut(&id))
    }

    pub fn camera_mut(&mut self, id: NodeId) -> Option<&mut Camera> {
        self.cameras.get_mut(&id)
    }

    /// Let host pointer/keyboard input drive the active camera.
    pub fn attach_control(&mut self) {
        self.controls_attached = true;
    }

    pub fn detach_control(&mut self) {
        self.controls_attached = false;
        self.camera_actions.clear();
        self.camera_movement = Vec3::ZERO;
    }

    pub fn controls_attached(&self) -> bool {
        self.controls_attached
    }

    // --- Camera input ---

    /// Queue a discrete camera action; dropped when controls are detached.
    pub fn queue_camera_action(&mut self, action: CameraAction) {
        if self.controls_attached && !action.is_noop() {
            self.camera_actions.push(action);
        }
    }

    /// Set the held movement direction applied every frame.
    pub fn set_camera_movement(&mut self, direction: Vec3) {
        if self.controls_attached {
            self.camera_movement = direction;
        }
    }

    /// Apply queued input to the active camera, using the current frame delta.
    pub fn apply_camera_input(&mut self) {
        let dt = self.frame.map(|f| f.delta_secs()).unwrap_or(0.0);
        let mut actions = std::mem::take(&mut self.camera_actions);
        if self.camera_movement != Vec3::ZERO {
            actions.push(CameraAction::Move(self.camera_movement));
        }
        if actions.is_empty() {
            return;
        }
        if let Some(camera) = self.active_camera_mut() {
            for action in &actions {
                camera.apply(action, dt);
            }
        }
    }

    pub fn summary(&self) -> SceneSummary {
        SceneSummary {
            meshes: self.meshes.len(),
            materials: self.materials.len(),
            lights: self.lights.len(),
            cameras: self.cameras.len(),
            pending_resources: self.pending.len(),
            frame_index: self.frame.map(|f| f.frame_index),
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(OptionsMap::new())
    }
}
