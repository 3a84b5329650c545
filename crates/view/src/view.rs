use std::sync::Arc;
use std::time::Instant;

use cubefield_common::{FrameClock, FrameTime};
use cubefield_scene::Scene;

use crate::config::{SurfaceConfig, SurfaceSize};
use crate::engine::{Engine, EngineError, SurfaceError, SurfaceProvider};

/// The two callbacks a scene view drives.
///
/// `Context` is built fresh at every mount and handed to both callbacks, so
/// anything `on_render` needs from `on_scene_ready` travels through it.
pub trait SceneScript {
    type Context: Default;

    /// Populate the scene. Runs exactly once per mount, once the scene is ready.
    fn on_scene_ready(&mut self, scene: &mut Scene, ctx: &mut Self::Context);

    /// Per-frame update. Runs before every draw, never before `on_scene_ready`.
    fn on_render(&mut self, scene: &mut Scene, ctx: &mut Self::Context) {
        let _ = (scene, ctx);
    }
}

/// Lifecycle state of a scene view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Unmounted,
    /// Mounted; waiting for the scene's resources.
    ReadyPending,
    /// Mounted; `on_scene_ready` has run and frames are drawn.
    Rendering,
    /// A previous mount was torn down.
    Disposed,
}

/// What a single frame tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// Nothing is mounted.
    Idle,
    /// Still waiting for scene resources.
    Pending,
    /// The scene became ready on this tick and `on_scene_ready` ran.
    BecameReady,
    /// `on_render` ran and the frame was drawn.
    Rendered(FrameTime),
}

/// Everything owned by one mount. Dropping it disposes the engine.
struct Mounted<E: Engine, C> {
    config: Arc<SurfaceConfig>,
    engine: E,
    scene: Scene,
    context: C,
    clock: FrameClock,
    ready: bool,
    disposed: bool,
}

impl<E: Engine, C> Mounted<E, C> {
    fn teardown(&mut self) {
        if !self.disposed {
            self.disposed = true;
            self.engine.dispose();
            tracing::info!("engine disposed");
        }
    }
}

impl<E: Engine, C> Drop for Mounted<E, C> {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Binds a drawable surface, an engine and a scene to a mount lifecycle and
/// drives a script through it.
///
/// The host calls [`SceneView::frame`] once per display refresh for as long
/// as [`SceneView::is_running`] holds, forwards window resizes to
/// [`SceneView::resize`], and calls [`SceneView::unmount`] (or drops the view)
/// when the surface goes away.
pub struct SceneView<P: SurfaceProvider, S: SceneScript> {
    provider: P,
    script: S,
    mounted: Option<Mounted<P::Engine, S::Context>>,
    was_mounted: bool,
}

impl<P: SurfaceProvider, S: SceneScript> SceneView<P, S> {
    pub fn new(provider: P, script: S) -> Self {
        Self {
            provider,
            script,
            mounted: None,
            was_mounted: false,
        }
    }

    /// Mount with `config`. A config with the same `Arc` identity as the
    /// current one is a no-op; any other config tears the current mount down
    /// first and builds a new surface engine and scene.
    pub fn mount(&mut self, config: Arc<SurfaceConfig>, now: Instant) -> Result<(), SurfaceError> {
        if let Some(current) = &self.mounted {
            if Arc::ptr_eq(&current.config, &config) {
                tracing::trace!("mount with unchanged config ignored");
                return Ok(());
            }
            tracing::info!("surface config changed, remounting");
        }
        self.unmount();

        let _span = tracing::info_span!("mount").entered();
        let size = self.provider.surface_size();
        let mut engine = self.provider.create_engine(&config)?;
        let mut scene = Scene::new(config.scene_options.clone());
        engine.attach(&mut scene);

        let mut mounted = Mounted {
            config,
            engine,
            scene,
            context: S::Context::default(),
            clock: FrameClock::starting_at(now),
            ready: false,
            disposed: false,
        };
        tracing::info!(
            width = size.width,
            height = size.height,
            scale_factor = size.scale_factor,
            "scene view mounted"
        );

        if mounted.scene.take_ready_notification() {
            tracing::debug!("scene ready at mount");
            self.script
                .on_scene_ready(&mut mounted.scene, &mut mounted.context);
            mounted.ready = true;
            mounted.clock.reset(now);
        } else {
            tracing::debug!(
                pending = mounted.scene.summary().pending_resources,
                "scene not ready, waiting"
            );
        }

        self.mounted = Some(mounted);
        self.was_mounted = true;
        Ok(())
    }

    /// Tear down the current mount, if any. Safe to call repeatedly.
    pub fn unmount(&mut self) {
        if let Some(mut mounted) = self.mounted.take() {
            mounted.teardown();
            tracing::info!("scene view unmounted");
        }
    }

    /// Run one tick of the frame loop at host time `now`.
    pub fn frame(&mut self, now: Instant) -> Result<FrameOutcome, EngineError> {
        let Some(m) = self.mounted.as_mut() else {
            return Ok(FrameOutcome::Idle);
        };

        if !m.ready {
            m.engine.poll_resources(&mut m.scene);
            if !m.scene.take_ready_notification() {
                return Ok(FrameOutcome::Pending);
            }
            tracing::debug!("scene became ready");
            self.script.on_scene_ready(&mut m.scene, &mut m.context);
            m.ready = true;
            m.clock.reset(now);
            return Ok(FrameOutcome::BecameReady);
        }

        let ft = m.clock.tick(now);
        let _span = tracing::trace_span!("frame", index = ft.frame_index).entered();
        m.scene.begin_frame(ft);
        self.script.on_render(&mut m.scene, &mut m.context);
        m.scene.apply_camera_input();
        m.engine.draw(&m.scene)?;
        Ok(FrameOutcome::Rendered(ft))
    }

    /// Forward a host resize signal to the mounted engine, immediately.
    pub fn resize(&mut self, size: SurfaceSize) {
        match self.mounted.as_mut() {
            Some(m) => {
                tracing::debug!(width = size.width, height = size.height, "surface resized");
                m.engine.resize(size);
            }
            None => tracing::trace!("resize ignored, nothing mounted"),
        }
    }

    pub fn state(&self) -> ViewState {
        match &self.mounted {
            Some(m) if m.ready => ViewState::Rendering,
            Some(_) => ViewState::ReadyPending,
            None if self.was_mounted => ViewState::Disposed,
            None => ViewState::Unmounted,
        }
    }

    /// Whether the host should keep scheduling frame ticks.
    pub fn is_running(&self) -> bool {
        self.mounted.is_some()
    }

    pub fn config(&self) -> Option<&Arc<SurfaceConfig>> {
        self.mounted.as_ref().map(|m| &m.config)
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.mounted.as_ref().map(|m| &m.scene)
    }

    pub fn scene_mut(&mut self) -> Option<&mut Scene> {
        self.mounted.as_mut().map(|m| &mut m.scene)
    }

    pub fn context(&self) -> Option<&S::Context> {
        self.mounted.as_ref().map(|m| &m.context)
    }

    pub fn engine(&self) -> Option<&P::Engine> {
        self.mounted.as_ref().map(|m| &m.engine)
    }

    pub fn script(&self) -> &S {
        &self.script
    }

    pub fn script_mut(&mut self) -> &mut S {
        &mut self.script
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{EngineEvent, EngineLog, HeadlessSurface};
    use cubefield_scene::Mesh;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    /// Records callback order into the same log the headless engine writes to.
    struct Recorder {
        log: Rc<EngineLog>,
        ready_calls: Rc<RefCell<u32>>,
    }

    #[derive(Default)]
    struct RecorderCtx {
        populated: bool,
        renders: u32,
    }

    impl SceneScript for Recorder {
        type Context = RecorderCtx;

        fn on_scene_ready(&mut self, scene: &mut Scene, ctx: &mut RecorderCtx) {
            *self.ready_calls.borrow_mut() += 1;
            scene.add_mesh(Mesh::cube("box", 1.0));
            ctx.populated = true;
            self.log.note("ready");
        }

        fn on_render(&mut self, _scene: &mut Scene, ctx: &mut RecorderCtx) {
            assert!(ctx.populated, "on_render before on_scene_ready");
            ctx.renders += 1;
            self.log.note("render");
        }
    }

    fn view_with(surface: HeadlessSurface) -> (SceneView<HeadlessSurface, Recorder>, Rc<EngineLog>, Rc<RefCell<u32>>) {
        let log = surface.log();
        let ready_calls = Rc::new(RefCell::new(0));
        let script = Recorder {
            log: log.clone(),
            ready_calls: ready_calls.clone(),
        };
        (SceneView::new(surface, script), log, ready_calls)
    }

    fn headless() -> HeadlessSurface {
        HeadlessSurface::new(SurfaceSize::new(800, 600, 1.0))
    }

    #[test]
    fn synchronous_readiness_fires_during_mount() {
        let (mut view, _log, ready) = view_with(headless());
        let t0 = Instant::now();
        view.mount(Arc::new(SurfaceConfig::default()), t0).unwrap();
        assert_eq!(*ready.borrow(), 1);
        assert_eq!(view.state(), ViewState::Rendering);

        for i in 1..=5 {
            view.frame(t0 + Duration::from_millis(16 * i)).unwrap();
        }
        assert_eq!(*ready.borrow(), 1);
        assert_eq!(view.context().map(|c| c.renders), Some(5));
    }

    #[test]
    fn asynchronous_readiness_fires_once_and_gates_rendering() {
        let (mut view, log, ready) = view_with(headless().with_pending_resources(3));
        let t0 = Instant::now();
        view.mount(Arc::new(SurfaceConfig::default()), t0).unwrap();
        assert_eq!(*ready.borrow(), 0);
        assert_eq!(view.state(), ViewState::ReadyPending);

        let mut outcomes = Vec::new();
        for i in 1..=6 {
            outcomes.push(view.frame(t0 + Duration::from_millis(16 * i)).unwrap());
        }
        assert_eq!(outcomes[0], FrameOutcome::Pending);
        assert_eq!(outcomes[1], FrameOutcome::Pending);
        assert_eq!(outcomes[2], FrameOutcome::BecameReady);
        assert!(matches!(outcomes[3], FrameOutcome::Rendered(_)));
        assert_eq!(*ready.borrow(), 1);

        // no draw and no render before readiness
        let events = log.events();
        let ready_at = events
            .iter()
            .position(|e| *e == EngineEvent::Note("ready".into()))
            .unwrap();
        assert!(events[..ready_at].iter().all(|e| !matches!(
            e,
            EngineEvent::Drew { .. } | EngineEvent::Note(_)
        )));
        assert_eq!(log.draws(), 3);
    }

    #[test]
    fn render_completes_before_each_draw() {
        let (mut view, log, _) = view_with(headless());
        let t0 = Instant::now();
        view.mount(Arc::new(SurfaceConfig::default()), t0).unwrap();
        for i in 1..=4 {
            view.frame(t0 + Duration::from_millis(10 * i)).unwrap();
        }
        let per_frame: Vec<EngineEvent> = log
            .events()
            .into_iter()
            .filter(|e| match e {
                EngineEvent::Drew { .. } => true,
                EngineEvent::Note(n) => n == "render",
                _ => false,
            })
            .collect();
        assert_eq!(per_frame.len(), 8);
        for pair in per_frame.chunks(2) {
            assert_eq!(pair[0], EngineEvent::Note("render".into()));
            assert!(matches!(pair[1], EngineEvent::Drew { .. }));
        }
    }

    #[test]
    fn frame_delta_is_measured_not_assumed() {
        let (mut view, _, _) = view_with(headless());
        let t0 = Instant::now();
        view.mount(Arc::new(SurfaceConfig::default()), t0).unwrap();
        let FrameOutcome::Rendered(a) = view.frame(t0 + Duration::from_millis(16)).unwrap() else {
            panic!("expected a rendered frame");
        };
        let FrameOutcome::Rendered(b) = view.frame(t0 + Duration::from_millis(66)).unwrap() else {
            panic!("expected a rendered frame");
        };
        assert_eq!(a.delta, Duration::from_millis(16));
        assert_eq!(b.delta, Duration::from_millis(50));
        assert!((view.scene().unwrap().delta_time_ms() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn unmount_disposes_once_and_stops_resize() {
        let (mut view, log, _) = view_with(headless());
        view.mount(Arc::new(SurfaceConfig::default()), Instant::now()).unwrap();
        view.resize(SurfaceSize::new(1024, 768, 1.0));
        assert_eq!(log.resizes(), 1);

        view.unmount();
        view.unmount();
        assert_eq!(log.disposals(), 1);
        assert_eq!(view.state(), ViewState::Disposed);

        view.resize(SurfaceSize::new(640, 480, 1.0));
        assert_eq!(log.resizes(), 1);
        assert_eq!(view.frame(Instant::now()).unwrap(), FrameOutcome::Idle);
        assert!(!view.is_running());
    }

    #[test]
    fn every_resize_signal_recomputes() {
        let (mut view, log, _) = view_with(headless());
        view.mount(Arc::new(SurfaceConfig::default()), Instant::now()).unwrap();
        for w in [100, 200, 300, 300] {
            view.resize(SurfaceSize::new(w, 100, 1.0));
        }
        assert_eq!(log.resizes(), 4);
    }

    #[test]
    fn dropping_the_view_disposes_the_engine() {
        let (mut view, log, _) = view_with(headless());
        view.mount(Arc::new(SurfaceConfig::default()), Instant::now()).unwrap();
        drop(view);
        assert_eq!(log.disposals(), 1);
    }

    #[test]
    fn unmount_before_mount_is_harmless() {
        let (mut view, log, _) = view_with(headless());
        view.unmount();
        assert_eq!(view.state(), ViewState::Unmounted);
        assert_eq!(log.disposals(), 0);
    }

    #[test]
    fn same_config_identity_does_not_remount() {
        let (mut view, log, ready) = view_with(headless());
        let config = Arc::new(SurfaceConfig::default());
        view.mount(config.clone(), Instant::now()).unwrap();
        view.mount(config, Instant::now()).unwrap();
        assert_eq!(log.engines_created(), 1);
        assert_eq!(*ready.borrow(), 1);
    }

    #[test]
    fn new_config_tears_down_before_rebuilding() {
        let (mut view, log, ready) = view_with(headless());
        view.mount(Arc::new(SurfaceConfig::default()), Instant::now()).unwrap();
        // equal contents, different identity
        view.mount(Arc::new(SurfaceConfig::default()), Instant::now()).unwrap();

        assert_eq!(*ready.borrow(), 2);
        assert_eq!(log.engines_created(), 2);
        assert_eq!(log.disposals(), 1);

        let events = log.events();
        let disposed_at = events
            .iter()
            .position(|e| *e == EngineEvent::Disposed)
            .unwrap();
        let second_created_at = events
            .iter()
            .enumerate()
            .filter(|(_, e)| matches!(e, EngineEvent::Created { .. }))
            .nth(1)
            .map(|(i, _)| i)
            .unwrap();
        assert!(disposed_at < second_created_at);
        assert_eq!(view.scene().map(|s| s.summary().meshes), Some(1));
    }

    #[test]
    fn mount_failure_leaves_view_unmounted() {
        let (mut view, log, ready) = view_with(headless().failing());
        let err = view
            .mount(Arc::new(SurfaceConfig::default()), Instant::now())
            .unwrap_err();
        assert!(matches!(err, SurfaceError::Unavailable(_)));
        assert_eq!(view.state(), ViewState::Unmounted);
        assert_eq!(*ready.borrow(), 0);
        assert_eq!(log.disposals(), 0);
    }

    #[test]
    fn resize_follows_the_mount_guard() {
        let (mut failed, failed_log, _) = view_with(headless().failing());
        assert!(failed.mount(Arc::new(SurfaceConfig::default()), Instant::now()).is_err());
        failed.resize(SurfaceSize::new(800, 600, 1.0));
        assert_eq!(failed_log.resizes(), 0);

        let (mut view, log, _) = view_with(headless());
        view.mount(Arc::new(SurfaceConfig::default()), Instant::now()).unwrap();
        view.mount(Arc::new(SurfaceConfig::default()), Instant::now()).unwrap();
        view.resize(SurfaceSize::new(800, 600, 1.0));
        assert_eq!(log.resizes(), 1);
    }
}
