//! # Graphics Resources Builder
//!
//! This module handles the creation of the graphics resources required by the
//! editor: the window, the WebGPU device and surface, and the shader and
//! texture files the renderer consumes.
//!
//! The main components are:
//! - `Graphics`: Holds all graphics-related resources
//! - `GraphicsBuilder`: Helper for asynchronous graphics initialization
//! - `MaybeGraphics`: Represents the various states of graphics initialization

use std::{path::Path, sync::Arc};

use anyhow::Context;
use log::info;
use wgpu::{Adapter, Device, Queue, Surface, SurfaceConfiguration};
use winit::{
    dpi::PhysicalSize,
    event_loop::{ActiveEventLoop, EventLoopProxy},
    window::Window,
};

use crate::engine_state::{rendering::RenderAssets, voxels::tile::TextureKind};

use super::viewer_config::{ViewerConfig, WindowConfig};

/// The user event carrying the result of graphics initialization.
pub type GraphicsEvent = anyhow::Result<Graphics>;

/// Contains all graphics-related resources required by the application.
///
/// It's created during application initialization and handed to the engine
/// state, which takes ownership of everything but the window.
pub struct Graphics {
    pub window: Arc<Window>,
    pub surface: Surface<'static>,
    pub surface_config: SurfaceConfiguration,
    pub adapter: Adapter,
    pub device: Device,
    pub queue: Queue,
    pub assets: RenderAssets,
}

fn create_window(event_loop: &ActiveEventLoop, config: &WindowConfig) -> anyhow::Result<Arc<Window>> {
    let window_attrs = Window::default_attributes()
        .with_title(config.title.clone())
        .with_inner_size(PhysicalSize::new(config.width, config.height));

    let window = event_loop
        .create_window(window_attrs)
        .context("failed to create the window")?;
    Ok(Arc::new(window))
}

/// Asynchronously creates and initializes all required graphics resources.
///
/// # Arguments
/// * `window` - The window to create the surface for
/// * `shader_dir` - Directory holding `object.wgsl`, `ui.wgsl` and `blit.wgsl`
/// * `texture_dir` - Directory holding one image per texture kind
async fn create_graphics(
    window: Arc<Window>,
    shader_dir: &Path,
    texture_dir: &Path,
) -> anyhow::Result<Graphics> {
    // The instance is a handle to our GPU
    // Backends::PRIMARY => Vulkan + Metal + DX12 + Browser WebGPU
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::PRIMARY,
        flags: wgpu::InstanceFlags::empty(),
        backend_options: wgpu::BackendOptions::from_env_or_default(),
        ..Default::default()
    });

    let surface = instance
        .create_surface(window.clone())
        .context("failed to create a surface for the window")?;

    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        })
        .await
        .context("no compatible graphics adapter")?;

    let adapter_info = adapter.get_info();
    info!(
        "Using adapter {} ({:?}, {:?})",
        adapter_info.name, adapter_info.backend, adapter_info.device_type
    );

    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            label: None,
            memory_hints: wgpu::MemoryHints::MemoryUsage,
            trace: wgpu::Trace::Off,
        })
        .await
        .context("failed to create the graphics device")?;

    let size = window.inner_size();

    let surface_caps = surface.get_capabilities(&adapter);
    let surface_format = surface_caps
        .formats
        .iter()
        .find(|f| f.is_srgb())
        .or_else(|| surface_caps.formats.first())
        .copied()
        .context("the surface reports no supported formats")?;
    let alpha_mode = surface_caps
        .alpha_modes
        .first()
        .copied()
        .unwrap_or(wgpu::CompositeAlphaMode::Auto);
    let surface_config = wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format: surface_format,
        width: size.width.max(1),
        height: size.height.max(1),
        // Fifo is always supported and waits for vertical sync.
        present_mode: wgpu::PresentMode::Fifo,
        alpha_mode,
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    };
    surface.configure(&device, &surface_config);

    let assets = load_render_assets(shader_dir, texture_dir)?;

    Ok(Graphics {
        window,
        surface,
        surface_config,
        adapter,
        device,
        queue,
        assets,
    })
}

/// Reads the three shaders and every texture file.
fn load_render_assets(shader_dir: &Path, texture_dir: &Path) -> anyhow::Result<RenderAssets> {
    let read_shader = |name: &str| {
        let path = shader_dir.join(name);
        std::fs::read_to_string(&path).with_context(|| format!("failed to read shader {}", path.display()))
    };

    let textures = TextureKind::all()
        .into_iter()
        .map(|kind| {
            let path = texture_dir.join(kind.file_name());
            std::fs::read(&path)
                .map(|bytes| (kind, bytes))
                .with_context(|| format!("failed to read texture {}", path.display()))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(RenderAssets {
        object_shader: read_shader("object.wgsl")?,
        ui_shader: read_shader("ui.wgsl")?,
        blit_shader: read_shader("blit.wgsl")?,
        textures,
    })
}

/// Helper struct for managing the asynchronous initialization of graphics resources.
pub struct GraphicsBuilder {
    event_loop_proxy: Option<EventLoopProxy<GraphicsEvent>>,
}

/// Represents the possible states of the graphics initialization process.
pub enum MaybeGraphics {
    /// State during asynchronous graphics initialization
    Builder(GraphicsBuilder),

    /// State when graphics resources are fully initialized and ready for use
    Graphics(Graphics),

    /// State after graphics resources have been moved to another owner
    Moved,
}

impl GraphicsBuilder {
    /// Creates a new GraphicsBuilder with the specified event loop proxy.
    ///
    /// # Arguments
    /// * `event_loop_proxy` - Used to send the initialized graphics resources back to the main thread
    pub fn new(event_loop_proxy: EventLoopProxy<GraphicsEvent>) -> Self {
        Self {
            event_loop_proxy: Some(event_loop_proxy),
        }
    }

    /// Creates the window and graphics resources and sends them to the event loop.
    ///
    /// Failures are sent as well, so the application can report them and exit.
    ///
    /// # Arguments
    /// * `event_loop` - The active event loop used to create the window
    /// * `config` - Window size and title plus the asset directories
    pub fn build_and_send(&mut self, event_loop: &ActiveEventLoop, config: &ViewerConfig) {
        let Some(event_loop_proxy) = self.event_loop_proxy.take() else {
            // event_loop_proxy is already spent - we already constructed Graphics
            return;
        };

        let graphics = create_window(event_loop, &config.window).and_then(|window| {
            pollster::block_on(create_graphics(window, &config.shader_dir, &config.texture_dir))
        });

        if event_loop_proxy.send_event(graphics).is_err() {
            log::error!("Event loop closed before graphics initialization finished");
        }
    }
}
