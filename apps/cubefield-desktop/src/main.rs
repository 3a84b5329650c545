use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use cubefield_input::{CameraAction, MoveKey, PointerButton, PointerState};
use cubefield_render_wgpu::WindowSurface;
use cubefield_script::{CubeFieldConfig, DemoScript, SceneKind, DEFAULT_RPM};
use cubefield_view::{SceneView, SurfaceConfig, SurfaceProvider};
use glam::Vec2;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

/// Pixels of touchpad scroll counted as one wheel line.
const PIXELS_PER_LINE: f64 = 40.0;

#[derive(Parser)]
#[command(name = "cubefield-desktop", about = "Spinning box in a field of cubes")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scene to show: `cubefield` or `basic`
    #[arg(long, default_value = "cubefield")]
    scene: SceneKind,

    /// Number of cubes in the field
    #[arg(long, default_value_t = 2000)]
    cubes: usize,

    /// RNG seed for a reproducible layout
    #[arg(long)]
    seed: Option<u64>,

    /// Spin speed of the reference box, in revolutions per minute
    #[arg(long, default_value_t = DEFAULT_RPM)]
    rpm: f64,

    /// Surface configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Disable multisampling regardless of the configuration file
    #[arg(long)]
    no_antialias: bool,
}

impl Cli {
    fn surface_config(&self) -> Result<SurfaceConfig> {
        let mut config = match &self.config {
            Some(path) => SurfaceConfig::from_json_file(path)?,
            None => SurfaceConfig::default(),
        };
        if self.no_antialias {
            config.antialias = false;
        }
        Ok(config)
    }

    fn script(&self) -> DemoScript {
        DemoScript::new(
            self.scene,
            CubeFieldConfig {
                cube_count: self.cubes,
                seed: self.seed,
                rpm: self.rpm,
                ..CubeFieldConfig::default()
            },
        )
    }
}

fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Left),
        MouseButton::Middle => Some(PointerButton::Middle),
        MouseButton::Right => Some(PointerButton::Right),
        _ => None,
    }
}

fn move_key(key: KeyCode) -> Option<MoveKey> {
    match key {
        KeyCode::KeyW => Some(MoveKey::Forward),
        KeyCode::KeyS => Some(MoveKey::Backward),
        KeyCode::KeyA => Some(MoveKey::Left),
        KeyCode::KeyD => Some(MoveKey::Right),
        KeyCode::Space => Some(MoveKey::Up),
        KeyCode::ControlLeft => Some(MoveKey::Down),
        _ => None,
    }
}

struct DesktopApp {
    config: Arc<SurfaceConfig>,
    script: Option<DemoScript>,
    view: Option<SceneView<WindowSurface, DemoScript>>,
    pointer: PointerState,
    error: Option<anyhow::Error>,
}

impl DesktopApp {
    fn new(config: SurfaceConfig, script: DemoScript) -> Self {
        Self {
            config: Arc::new(config),
            script: Some(script),
            view: None,
            pointer: PointerState::new(),
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        tracing::error!("{err:#}");
        self.error = Some(err);
        event_loop.exit();
    }

    fn camera_action(&mut self, action: Option<CameraAction>) {
        let Some(action) = action else {
            return;
        };
        if let Some(scene) = self.view.as_mut().and_then(|v| v.scene_mut()) {
            scene.queue_camera_action(action);
        }
    }

    fn sync_movement(&mut self) {
        let movement = self.pointer.movement();
        if let Some(scene) = self.view.as_mut().and_then(|v| v.scene_mut()) {
            scene.set_camera_movement(movement);
        }
    }

    fn resize(&mut self) {
        if let Some(view) = &mut self.view {
            let size = view.provider().surface_size();
            view.resize(size);
        }
    }
}

impl ApplicationHandler for DesktopApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.view.is_some() {
            return;
        }
        let Some(script) = self.script.take() else {
            return;
        };

        let attrs = Window::default_attributes()
            .with_title(format!("Cubefield ({})", script.kind()))
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => return self.fail(event_loop, anyhow::anyhow!("failed to create window: {e}")),
        };

        let mut view = SceneView::new(WindowSurface::new(window), script);
        if let Err(e) = view.mount(self.config.clone(), Instant::now()) {
            return self.fail(event_loop, e.into());
        }
        view.provider().request_redraw();
        self.view = Some(view);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                if let Some(view) = &mut self.view {
                    view.unmount();
                }
                event_loop.exit();
            }
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => self.resize(),
            WindowEvent::ModifiersChanged(modifiers) => {
                self.pointer.set_shift(modifiers.state().shift_key());
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                if let Some(key) = move_key(key) {
                    self.pointer.key(key, state == ElementState::Pressed);
                    self.sync_movement();
                }
            }
            WindowEvent::Focused(false) => {
                self.pointer = PointerState::new();
                self.sync_movement();
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(button) = pointer_button(button) {
                    self.pointer.button(button, state == ElementState::Pressed);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let action = self
                    .pointer
                    .cursor_moved(Vec2::new(position.x as f32, position.y as f32));
                self.camera_action(action);
            }
            WindowEvent::CursorLeft { .. } => self.pointer.cursor_left(),
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => (p.y / PIXELS_PER_LINE) as f32,
                };
                let action = self.pointer.wheel(lines);
                self.camera_action(action);
            }
            WindowEvent::PinchGesture { delta, .. } => {
                let action = self.pointer.pinch(delta as f32);
                self.camera_action(action);
            }
            WindowEvent::RedrawRequested => {
                let Some(view) = &mut self.view else {
                    return;
                };
                if let Err(e) = view.frame(Instant::now()) {
                    tracing::error!("frame failed: {e}");
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(view) = &self.view {
            if view.is_running() {
                view.provider().request_redraw();
            }
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    let config = cli.surface_config()?;
    tracing::info!(
        scene = %cli.scene,
        antialias = config.antialias,
        adapt_to_device_ratio = config.adapt_to_device_ratio,
        "cubefield-desktop starting"
    );

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = DesktopApp::new(config, cli.script());
    event_loop.run_app(&mut app)?;

    if let Some(view) = &mut app.view {
        view.unmount();
    }
    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults() {
        let cli = Cli::parse_from(["cubefield-desktop"]);
        assert_eq!(cli.scene, SceneKind::CubeField);
        assert_eq!(cli.cubes, 2000);
        assert_eq!(cli.rpm, 10.0);
        assert!(cli.seed.is_none());
        assert!(cli.surface_config().unwrap().antialias);
    }

    #[test]
    fn no_antialias_overrides_config() {
        let cli = Cli::parse_from(["cubefield-desktop", "--no-antialias", "--scene", "basic"]);
        assert!(!cli.surface_config().unwrap().antialias);
        assert_eq!(cli.script().kind(), SceneKind::Basic);
    }

    #[test]
    fn key_and_button_mapping() {
        assert_eq!(move_key(KeyCode::KeyW), Some(MoveKey::Forward));
        assert_eq!(move_key(KeyCode::KeyQ), None);
        assert_eq!(pointer_button(MouseButton::Middle), Some(PointerButton::Middle));
        assert_eq!(pointer_button(MouseButton::Back), None);
    }
}
