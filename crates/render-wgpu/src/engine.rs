use std::sync::Arc;

use cubefield_scene::Scene;
use cubefield_view::{Engine, EngineError, SurfaceConfig, SurfaceError, SurfaceProvider, SurfaceSize};
use winit::window::Window;

use crate::gpu::SceneRenderer;
use crate::options::WgpuEngineOptions;

/// Multisample count used when antialiasing is requested and supported.
const MSAA_SAMPLES: u32 = 4;

#[derive(Debug, thiserror::Error)]
pub enum WgpuError {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible GPU adapter found")]
    NoAdapter,
    #[error("failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported texture format")]
    NoSurfaceFormat,
    #[error("GPU out of memory")]
    OutOfMemory,
}

impl From<WgpuError> for SurfaceError {
    fn from(err: WgpuError) -> Self {
        match err {
            WgpuError::NoAdapter | WgpuError::CreateSurface(_) | WgpuError::NoSurfaceFormat => {
                SurfaceError::Unavailable(err.to_string())
            }
            other => SurfaceError::Backend(Box::new(other)),
        }
    }
}

/// A winit window as a drawable surface.
pub struct WindowSurface {
    window: Arc<Window>,
}

impl WindowSurface {
    pub fn new(window: Arc<Window>) -> Self {
        Self { window }
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
}

impl SurfaceProvider for WindowSurface {
    type Engine = WgpuEngine;

    fn surface_size(&self) -> SurfaceSize {
        let size = self.window.inner_size();
        SurfaceSize::new(size.width, size.height, self.window.scale_factor())
    }

    fn create_engine(&mut self, config: &SurfaceConfig) -> Result<WgpuEngine, SurfaceError> {
        let size = self.surface_size();
        Ok(WgpuEngine::new(self.window.clone(), config, size)?)
    }
}

struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_config: wgpu::SurfaceConfiguration,
    renderer: SceneRenderer,
}

impl GpuState {
    fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.surface_config);
    }

    fn aspect(&self) -> f32 {
        self.surface_config.width as f32 / self.surface_config.height.max(1) as f32
    }
}

/// Engine drawing scenes into a window through wgpu.
pub struct WgpuEngine {
    config: SurfaceConfig,
    options: WgpuEngineOptions,
    gpu: Option<GpuState>,
}

impl WgpuEngine {
    pub fn new(window: Arc<Window>, config: &SurfaceConfig, size: SurfaceSize) -> Result<Self, WgpuError> {
        let options = WgpuEngineOptions::from_map(&config.engine_options);
        let (width, height) = config.render_size(size);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: options.power_preference,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or(WgpuError::NoAdapter)?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("cubefield_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first())
            .copied()
            .ok_or(WgpuError::NoSurfaceFormat)?;

        let mut usage = wgpu::TextureUsages::RENDER_ATTACHMENT;
        if options.preserve_drawing_buffer {
            if caps.usages.contains(wgpu::TextureUsages::COPY_SRC) {
                usage |= wgpu::TextureUsages::COPY_SRC;
            } else {
                tracing::warn!("surface cannot be read back, preserveDrawingBuffer ignored");
            }
        }

        let surface_config = wgpu::SurfaceConfiguration {
            usage,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let depth_format = options.depth_format();
        let msaa_ok = adapter
            .get_texture_format_features(format)
            .flags
            .sample_count_supported(MSAA_SAMPLES)
            && adapter
                .get_texture_format_features(depth_format)
                .flags
                .sample_count_supported(MSAA_SAMPLES);
        let sample_count = match (config.antialias, msaa_ok) {
            (true, true) => MSAA_SAMPLES,
            (true, false) => {
                tracing::warn!("adapter lacks {MSAA_SAMPLES}x multisampling, antialiasing disabled");
                1
            }
            (false, _) => 1,
        };

        let renderer = SceneRenderer::new(&device, format, depth_format, sample_count, width, height);

        tracing::info!(
            backend = adapter.get_info().backend.to_str(),
            adapter = %adapter.get_info().name,
            ?format,
            sample_count,
            width,
            height,
            "wgpu engine created"
        );

        Ok(Self {
            config: config.clone(),
            options,
            gpu: Some(GpuState {
                surface,
                device,
                queue,
                surface_config,
                renderer,
            }),
        })
    }

    pub fn options(&self) -> &WgpuEngineOptions {
        &self.options
    }

    /// Current drawing-buffer size, or `None` once disposed.
    pub fn render_size(&self) -> Option<(u32, u32)> {
        self.gpu
            .as_ref()
            .map(|g| (g.surface_config.width, g.surface_config.height))
    }

    pub fn sample_count(&self) -> Option<u32> {
        self.gpu.as_ref().map(|g| g.renderer.sample_count())
    }
}

impl Engine for WgpuEngine {
    fn resize(&mut self, size: SurfaceSize) {
        let (width, height) = self.config.render_size(size);
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        gpu.surface_config.width = width;
        gpu.surface_config.height = height;
        gpu.reconfigure();
        gpu.renderer.resize(&gpu.device, width, height);
        tracing::debug!(width, height, "drawing buffer resized");
    }

    fn draw(&mut self, scene: &Scene) -> Result<(), EngineError> {
        let gpu = self.gpu.as_mut().ok_or(EngineError::Disposed)?;

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::debug!("surface lost or outdated, reconfiguring");
                gpu.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                tracing::warn!("surface timed out, frame skipped");
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                return Err(EngineError::Backend(Box::new(WgpuError::OutOfMemory)));
            }
            Err(e) => return Err(EngineError::Backend(Box::new(e))),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let aspect = gpu.aspect();
        gpu.renderer
            .render(&gpu.device, &gpu.queue, &view, scene, aspect);
        output.present();
        Ok(())
    }

    fn dispose(&mut self) {
        if self.gpu.take().is_some() {
            tracing::debug!("GPU resources released");
        }
    }
}
