use std::cell::RefCell;
use std::fmt::Write;
use std::rc::Rc;

use cubefield_scene::{Material, ResourceId, Scene, Shape};

use crate::config::{SurfaceConfig, SurfaceSize};
use crate::engine::{Engine, EngineError, SurfaceError, SurfaceProvider};

/// Something a headless engine did, or a note a caller added to its log.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Created { width: u32, height: u32 },
    ResourceResolved,
    Resized { width: u32, height: u32 },
    Drew { frame_index: Option<u64> },
    Disposed,
    Note(String),
}

/// Shared, append-only journal of engine activity.
///
/// The surface hands the same log to every engine it creates, so callers can
/// inspect activity after engines were moved into a view or dropped.
#[derive(Debug, Default)]
pub struct EngineLog {
    events: RefCell<Vec<EngineEvent>>,
    last_frame: RefCell<String>,
}

impl EngineLog {
    pub fn record(&self, event: EngineEvent) {
        self.events.borrow_mut().push(event);
    }

    pub fn note(&self, text: impl Into<String>) {
        self.record(EngineEvent::Note(text.into()));
    }

    pub fn events(&self) -> Vec<EngineEvent> {
        self.events.borrow().clone()
    }

    fn count(&self, pred: impl Fn(&EngineEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| pred(e)).count()
    }

    pub fn engines_created(&self) -> usize {
        self.count(|e| matches!(e, EngineEvent::Created { .. }))
    }

    pub fn draws(&self) -> usize {
        self.count(|e| matches!(e, EngineEvent::Drew { .. }))
    }

    pub fn resizes(&self) -> usize {
        self.count(|e| matches!(e, EngineEvent::Resized { .. }))
    }

    pub fn disposals(&self) -> usize {
        self.count(|e| matches!(e, EngineEvent::Disposed))
    }

    /// Text rendering of the most recent frame.
    pub fn last_frame(&self) -> String {
        self.last_frame.borrow().clone()
    }
}

/// A drawable surface with no window behind it.
#[derive(Debug)]
pub struct HeadlessSurface {
    size: SurfaceSize,
    pending_resources: usize,
    unavailable: bool,
    log: Rc<EngineLog>,
}

impl HeadlessSurface {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            pending_resources: 0,
            unavailable: false,
            log: Rc::new(EngineLog::default()),
        }
    }

    /// Engines built on this surface make the scene wait for `n` resources,
    /// resolving one per frame tick.
    pub fn with_pending_resources(mut self, n: usize) -> Self {
        self.pending_resources = n;
        self
    }

    /// Engine creation fails, as when no drawing context can be obtained.
    pub fn failing(mut self) -> Self {
        self.unavailable = true;
        self
    }

    pub fn set_size(&mut self, size: SurfaceSize) {
        self.size = size;
    }

    pub fn log(&self) -> Rc<EngineLog> {
        self.log.clone()
    }
}

impl SurfaceProvider for HeadlessSurface {
    type Engine = HeadlessEngine;

    fn surface_size(&self) -> SurfaceSize {
        self.size
    }

    fn create_engine(&mut self, config: &SurfaceConfig) -> Result<HeadlessEngine, SurfaceError> {
        if self.unavailable {
            return Err(SurfaceError::Unavailable("headless surface disabled".into()));
        }
        let (width, height) = config.render_size(self.size);
        self.log.record(EngineEvent::Created { width, height });
        Ok(HeadlessEngine {
            log: self.log.clone(),
            config: config.clone(),
            render_size: (width, height),
            to_register: self.pending_resources,
            pending: Vec::new(),
            disposed: false,
        })
    }
}

/// Engine that "draws" a scene as a text summary into its log.
#[derive(Debug)]
pub struct HeadlessEngine {
    log: Rc<EngineLog>,
    config: SurfaceConfig,
    render_size: (u32, u32),
    to_register: usize,
    pending: Vec<ResourceId>,
    disposed: bool,
}

impl HeadlessEngine {
    pub fn render_size(&self) -> (u32, u32) {
        self.render_size
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl Engine for HeadlessEngine {
    fn attach(&mut self, scene: &mut Scene) {
        for i in 0..self.to_register {
            self.pending
                .push(scene.add_pending_resource(format!("headless resource {i}")));
        }
        // resolve in registration order
        self.pending.reverse();
    }

    fn poll_resources(&mut self, scene: &mut Scene) {
        if let Some(id) = self.pending.pop() {
            scene.resolve_resource(id);
            self.log.record(EngineEvent::ResourceResolved);
        }
    }

    fn resize(&mut self, size: SurfaceSize) {
        let (width, height) = self.config.render_size(size);
        self.render_size = (width, height);
        self.log.record(EngineEvent::Resized { width, height });
    }

    fn draw(&mut self, scene: &Scene) -> Result<(), EngineError> {
        if self.disposed {
            return Err(EngineError::Disposed);
        }
        *self.log.last_frame.borrow_mut() = describe_scene(scene, self.render_size);
        self.log.record(EngineEvent::Drew {
            frame_index: scene.frame_time().map(|f| f.frame_index),
        });
        Ok(())
    }

    fn dispose(&mut self) {
        if !self.disposed {
            self.disposed = true;
            self.log.record(EngineEvent::Disposed);
        }
    }
}

/// Meshes beyond this count are summarised instead of listed.
const MAX_LISTED_MESHES: usize = 16;

/// Human-readable description of a scene as it would be drawn.
pub fn describe_scene(scene: &Scene, render_size: (u32, u32)) -> String {
    let summary = scene.summary();
    let mut out = String::new();
    let frame = summary
        .frame_index
        .map(|i| i.to_string())
        .unwrap_or_else(|| "-".into());
    let _ = writeln!(
        out,
        "=== Scene (frame={frame}, {}x{}) ===",
        render_size.0, render_size.1
    );
    let _ = writeln!(
        out,
        "Meshes: {}  Materials: {}  Lights: {}  Cameras: {}",
        summary.meshes, summary.materials, summary.lights, summary.cameras
    );
    if let Some(camera) = scene.active_camera() {
        let p = camera.position();
        let _ = writeln!(
            out,
            "Camera: {} at ({:.1}, {:.1}, {:.1})",
            camera.name(),
            p.x,
            p.y,
            p.z
        );
    }
    for light in scene.lights().values() {
        let _ = writeln!(out, "Light: {} intensity={:.2}", light.name, light.intensity);
    }

    if summary.meshes > MAX_LISTED_MESHES {
        let boxes = scene
            .meshes()
            .values()
            .filter(|m| matches!(m.shape, Shape::Box { .. }))
            .count();
        let _ = writeln!(
            out,
            "  {boxes} boxes, {} grounds",
            summary.meshes - boxes
        );
        return out;
    }

    for (id, mesh) in scene.meshes() {
        let p = mesh.transform.position;
        let material = match scene.material_of(mesh) {
            Some(Material::Standard(m)) => format!(
                "diffuse=({:.2}, {:.2}, {:.2})",
                m.diffuse.r, m.diffuse.g, m.diffuse.b
            ),
            Some(Material::Grid(m)) => format!("grid ratio={}", m.grid_ratio),
            None => "default".into(),
        };
        let _ = writeln!(
            out,
            "  [{}] {} pos=({:.2}, {:.2}, {:.2}) rot_y={:.3} {material}",
            id.short(),
            mesh.name,
            p.x,
            p.y,
            p.z,
            mesh.transform.rotation.y
        );
    }
    out
}
