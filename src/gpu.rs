//! Core GPU context and device management.
//!
//! This module provides [`GpuContext`], the struct that holds every wgpu object
//! the demos draw with: the surface presenting to the window, the device that
//! creates resources, the queue that receives work, and the surface
//! configuration that tracks the window size.
//!
//! # Initialization
//!
//! A `GpuContext` is created from a winit [`Window`] and performs all of the
//! wgpu boilerplate: instance creation, adapter selection, device/queue
//! creation and surface configuration. Failures come back as
//! [`Error`](crate::Error) values of kind `Initialization`.
//!
//! # Frames
//!
//! [`GpuContext::acquire_frame`] wraps `get_current_texture` and turns surface
//! errors into a [`FrameAcquire`] the loop can act on: lost or outdated
//! surfaces are reconfigured, timeouts skip the frame, and running out of
//! memory is fatal.
//!
//! [`Window`]: winit::window::Window

use std::sync::Arc;
use winit::window::Window;

use crate::error::{Error, Result};

/// Depth format shared by [`DepthTarget`] and every depth-tested pipeline.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Core GPU context holding wgpu resources.
///
/// All fields are public to allow direct access to wgpu APIs when needed.
/// The context is created once at startup and passed by reference to every
/// pass. Dropping it releases the device and the surface.
pub struct GpuContext {
    /// The surface for presenting rendered frames to the window.
    pub surface: wgpu::Surface<'static>,
    /// The logical GPU device for creating resources and pipelines.
    pub device: wgpu::Device,
    /// The command queue for submitting work to the GPU.
    pub queue: wgpu::Queue,
    /// Current surface configuration (format, size, present mode).
    pub config: wgpu::SurfaceConfiguration,
}

/// Outcome of asking the surface for the next frame.
pub enum FrameAcquire {
    /// A texture is ready to render into and present.
    Ready(wgpu::SurfaceTexture),
    /// Nothing to draw this time around (surface reconfigured, timeout, or zero-sized).
    Skip,
    /// The surface cannot recover; the loop should exit.
    Fatal,
}

impl GpuContext {
    /// Create a new GPU context from a winit window.
    ///
    /// 1. Creates a wgpu instance with primary backends (Vulkan, Metal, DX12)
    /// 2. Creates a surface for the window
    /// 3. Requests an adapter that can present to that surface
    /// 4. Creates the logical device and command queue
    /// 5. Configures the surface with a linear (non-sRGB) format and Fifo (vsync) present mode
    pub fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))?;

        let info = adapter.get_info();
        log::info!("using adapter '{}' ({:?})", info.name, info.backend);

        let (device, queue) =
            pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
                label: Some("Firstlight Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            }))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format =
            choose_surface_format(&surface_caps.formats).ok_or(Error::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        log::info!(
            "surface configured: {}x{} {:?}",
            config.width,
            config.height,
            config.format
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
        })
    }

    /// Resize the surface to new dimensions.
    ///
    /// Call this when the window is resized. Ignores zero-sized dimensions
    /// to avoid wgpu validation errors (which can occur during window minimize).
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            log::debug!("resizing surface to {width}x{height}");
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Returns the current surface width in pixels.
    pub fn width(&self) -> u32 {
        self.config.width
    }

    /// Returns the current surface height in pixels.
    pub fn height(&self) -> u32 {
        self.config.height
    }

    /// Returns the current aspect ratio (width / height).
    pub fn aspect(&self) -> f32 {
        self.config.width as f32 / self.config.height as f32
    }

    /// Fetches the next surface texture, recovering from what can be recovered.
    pub fn acquire_frame(&self) -> FrameAcquire {
        match self.surface.get_current_texture() {
            Ok(frame) => FrameAcquire::Ready(frame),
            Err(err) => {
                match err {
                    wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                        log::debug!("surface {err}, reconfiguring");
                        self.surface.configure(&self.device, &self.config);
                    }
                    wgpu::SurfaceError::OutOfMemory => log::error!("surface failed: {err}"),
                    _ => log::warn!("skipping frame: {err}"),
                }
                surface_error_action(&err)
            }
        }
    }
}

/// Picks the surface format: the first non-sRGB one, else the first listed.
///
/// Colors written to a linear format reach the screen as written; an `*Srgb`
/// format gamma-encodes them on store.
fn choose_surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .find(|f| !f.is_srgb())
        .or_else(|| formats.first())
        .copied()
}

fn surface_error_action(err: &wgpu::SurfaceError) -> FrameAcquire {
    match err {
        wgpu::SurfaceError::OutOfMemory => FrameAcquire::Fatal,
        wgpu::SurfaceError::Lost
        | wgpu::SurfaceError::Outdated
        | wgpu::SurfaceError::Timeout
        | wgpu::SurfaceError::Other => FrameAcquire::Skip,
    }
}

/// A depth buffer that follows the surface size.
pub struct DepthTarget {
    view: wgpu::TextureView,
    size: (u32, u32),
}

impl DepthTarget {
    pub fn new(gpu: &GpuContext) -> Self {
        Self {
            view: Self::create_view(gpu),
            size: (gpu.width(), gpu.height()),
        }
    }

    fn create_view(gpu: &GpuContext) -> wgpu::TextureView {
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: gpu.width(),
                height: gpu.height(),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    /// Recreates the depth texture if the surface size changed.
    pub fn ensure_size(&mut self, gpu: &GpuContext) {
        if self.size != (gpu.width(), gpu.height()) {
            self.view = Self::create_view(gpu);
            self.size = (gpu.width(), gpu.height());
        }
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_format_prefers_non_srgb() {
        use wgpu::TextureFormat::{Bgra8Unorm, Bgra8UnormSrgb, Rgba8UnormSrgb};

        assert_eq!(
            choose_surface_format(&[Bgra8UnormSrgb, Bgra8Unorm]),
            Some(Bgra8Unorm)
        );
        assert_eq!(choose_surface_format(&[Bgra8Unorm]), Some(Bgra8Unorm));
        assert_eq!(
            choose_surface_format(&[Rgba8UnormSrgb]),
            Some(Rgba8UnormSrgb)
        );
        assert_eq!(choose_surface_format(&[]), None);
    }

    #[test]
    fn only_out_of_memory_is_fatal() {
        assert!(matches!(
            surface_error_action(&wgpu::SurfaceError::OutOfMemory),
            FrameAcquire::Fatal
        ));
        for err in [
            wgpu::SurfaceError::Lost,
            wgpu::SurfaceError::Outdated,
            wgpu::SurfaceError::Timeout,
            wgpu::SurfaceError::Other,
        ] {
            assert!(matches!(surface_error_action(&err), FrameAcquire::Skip));
        }
    }
}
