use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::effect_pass::EffectPass;
use crate::error::{Error, Result};
use crate::gpu::{DepthTarget, FrameAcquire, GpuContext};
use crate::logging::{LoggingConfig, init_logging};
use crate::mesh::Vertex;
use crate::mesh_pass::MeshPass;

/// Context provided during app setup, after the window and GPU exist.
pub struct SetupContext<'a> {
    pub gpu: &'a GpuContext,
}

impl SetupContext<'_> {
    /// Build a fullscreen effect from separate vertex and fragment sources.
    pub fn effect<U: bytemuck::Pod>(
        &self,
        label: &str,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<EffectPass<U>> {
        EffectPass::new(self.gpu, label, vertex_source, fragment_source)
    }

    /// Build a depth-tested mesh pass. Needs [`AppConfig::depth`] enabled.
    pub fn mesh_pass(
        &self,
        label: &str,
        vertex_source: &str,
        fragment_source: &str,
        vertices: &[Vertex],
    ) -> Result<MeshPass> {
        MeshPass::new(self.gpu, label, vertex_source, fragment_source, vertices)
    }

    /// Surface width in pixels.
    pub fn width(&self) -> u32 {
        self.gpu.width()
    }

    /// Surface height in pixels.
    pub fn height(&self) -> u32 {
        self.gpu.height()
    }
}

/// Context provided each frame for rendering.
///
/// `pass` has already been cleared to [`AppConfig::clear_color`] (and to depth
/// 1.0 when depth is enabled); draw into it and return.
pub struct Frame<'a, 'pass> {
    /// GPU context for uploads.
    pub gpu: &'a GpuContext,
    /// The frame's render pass targeting the window surface.
    pub pass: &'a mut wgpu::RenderPass<'pass>,
    /// Total elapsed time in seconds.
    pub time: f32,
    /// Delta time since last frame in seconds.
    pub dt: f32,
    /// Number of frames drawn before this one.
    pub frame_index: u64,
}

impl Frame<'_, '_> {
    /// Current frames per second.
    pub fn fps(&self) -> f32 {
        if self.dt > 0.0 { 1.0 / self.dt } else { 0.0 }
    }

    /// Screen width in pixels.
    pub fn width(&self) -> u32 {
        self.gpu.width()
    }

    /// Screen height in pixels.
    pub fn height(&self) -> u32 {
        self.gpu.height()
    }

    /// Width over height.
    pub fn aspect(&self) -> f32 {
        self.gpu.aspect()
    }
}

/// Configuration for the app window.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub clear_color: wgpu::Color,
    /// Attach a depth buffer to every frame's render pass.
    pub depth: bool,
    pub log: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Firstlight".to_string(),
            width: 800,
            height: 600,
            clear_color: wgpu::Color {
                r: 0.1,
                g: 0.1,
                b: 0.1,
                a: 1.0,
            },
            depth: false,
            log: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn clear_color(mut self, r: f64, g: f64, b: f64, a: f64) -> Self {
        self.clear_color = wgpu::Color { r, g, b, a };
        self
    }

    pub fn depth(mut self, enabled: bool) -> Self {
        self.depth = enabled;
        self
    }

    pub fn log(mut self, log: LoggingConfig) -> Self {
        self.log = log;
        self
    }
}

/// Run an app with the default configuration.
///
/// # Example
/// ```ignore
/// firstlight::run(|ctx| {
///     let effect = ctx.effect::<SphereUniforms>("Sphere", VERTEX, FRAGMENT)?;
///
///     Ok(move |frame: &mut Frame| {
///         effect.render(frame.gpu, frame.pass, &SphereUniforms::default());
///     })
/// })
/// ```
pub fn run<S, F>(setup: S) -> Result<()>
where
    S: FnOnce(&SetupContext) -> Result<F> + 'static,
    F: FnMut(&mut Frame) + 'static,
{
    run_with_config(AppConfig::default(), setup)
}

/// Run an app with a custom configuration.
///
/// Opens the window, creates the GPU context, calls `setup` once, then calls
/// the returned frame closure once per redraw until the window is closed.
/// Any failure before the first frame closes the window and is returned.
pub fn run_with_config<S, F>(config: AppConfig, setup: S) -> Result<()>
where
    S: FnOnce(&SetupContext) -> Result<F> + 'static,
    F: FnMut(&mut Frame) + 'static,
{
    init_logging(config.log.clone());

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = FirstlightApp {
        state: AppState::Pending {
            config,
            setup: Box::new(move |ctx: &SetupContext| -> Result<FrameFn> {
                let frame_fn = setup(ctx)?;
                Ok(Box::new(frame_fn))
            }),
        },
        error: None,
    };

    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

type FrameFn = Box<dyn FnMut(&mut Frame)>;
type SetupFn = Box<dyn FnOnce(&SetupContext) -> Result<FrameFn>>;

struct FirstlightApp {
    state: AppState,
    error: Option<Error>,
}

enum AppState {
    Pending { config: AppConfig, setup: SetupFn },
    Running(Box<Running>),
    Stopped,
}

struct Running {
    window: Arc<Window>,
    gpu: GpuContext,
    depth: Option<DepthTarget>,
    clear_color: wgpu::Color,
    frame_fn: FrameFn,
    start_time: Instant,
    last_frame: Instant,
    frame_index: u64,
}

impl Running {
    fn start(event_loop: &ActiveEventLoop, config: AppConfig, setup: SetupFn) -> Result<Self> {
        let window_attrs = WindowAttributes::default()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let gpu = GpuContext::new(window.clone())?;
        let depth = config.depth.then(|| DepthTarget::new(&gpu));

        let frame_fn = setup(&SetupContext { gpu: &gpu })?;
        log::info!("'{}' ready", config.title);

        window.request_redraw();

        Ok(Self {
            window,
            gpu,
            depth,
            clear_color: config.clear_color,
            frame_fn,
            start_time: Instant::now(),
            last_frame: Instant::now(),
            frame_index: 0,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
        if let Some(depth) = &mut self.depth {
            depth.ensure_size(&self.gpu);
        }
    }

    /// Draws one frame. Returns `false` if the surface is unusable.
    fn redraw(&mut self) -> bool {
        let output = match self.gpu.acquire_frame() {
            FrameAcquire::Ready(output) => output,
            FrameAcquire::Skip => {
                self.window.request_redraw();
                return true;
            }
            FrameAcquire::Fatal => return false,
        };

        let now = Instant::now();
        let time = self.start_time.elapsed().as_secs_f32();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Frame Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: self.depth.as_ref().map(|depth| {
                    wgpu::RenderPassDepthStencilAttachment {
                        view: depth.view(),
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let mut frame = Frame {
                gpu: &self.gpu,
                pass: &mut render_pass,
                time,
                dt,
                frame_index: self.frame_index,
            };

            (self.frame_fn)(&mut frame);
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        self.frame_index += 1;
        self.window.request_redraw();
        true
    }
}

impl FirstlightApp {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: Error) {
        log::error!("{err}");
        self.error = Some(err);
        self.state = AppState::Stopped;
        event_loop.exit();
    }
}

impl ApplicationHandler for FirstlightApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !matches!(self.state, AppState::Pending { .. }) {
            return;
        }

        let AppState::Pending { config, setup } =
            std::mem::replace(&mut self.state, AppState::Stopped)
        else {
            return;
        };

        match Running::start(event_loop, config, setup) {
            Ok(running) => self.state = AppState::Running(Box::new(running)),
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let AppState::Running(running) = &mut self.state else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("window closed after {} frames", running.frame_index);
                // Drop GPU resources before the window goes away.
                self.state = AppState::Stopped;
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                running.resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested if !running.redraw() => {
                log::error!("surface lost beyond recovery, exiting");
                self.state = AppState::Stopped;
                event_loop.exit();
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_800_by_600_dark_grey() {
        let config = AppConfig::default();
        assert_eq!((config.width, config.height), (800, 600));
        assert_eq!(config.clear_color.r, 0.1);
        assert_eq!(config.clear_color.a, 1.0);
        assert!(!config.depth);
    }

    #[test]
    fn builder_overrides() {
        let config = AppConfig::new()
            .title("Rotating Cube")
            .size(1024, 768)
            .clear_color(0.0, 0.0, 0.0, 1.0)
            .depth(true);

        assert_eq!(config.title, "Rotating Cube");
        assert_eq!((config.width, config.height), (1024, 768));
        assert_eq!(config.clear_color, wgpu::Color::BLACK);
        assert!(config.depth);
    }
}
