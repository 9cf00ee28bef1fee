//! # Firstlight
//!
//! **Small, typed building blocks for a first triangle, a first cube and a
//! first ray.**
//!
//! Open a window, compile a vertex and a fragment shader, link them, upload
//! vertices once and draw every frame from a single closure. The camera and
//! transform math is written out by hand in [`transform`] so every matrix the
//! GPU sees can be read and tested on the host.
//!
//! ## Quick Start
//!
//! ```no_run
//! use firstlight::*;
//!
//! fn main() -> Result<()> {
//!     let config = AppConfig::new().title("Rotating Cube").depth(true);
//!
//!     run_with_config(config, |ctx| {
//!         let cube = ctx.mesh_pass("Cube", VERTEX, FRAGMENT, &CUBE_VERTICES)?;
//!         let camera = Camera::default();
//!         let mut spin = Spin::new(Matrix4::IDENTITY, 0.01);
//!
//!         Ok(move |frame: &mut Frame| {
//!             let mvp = ModelViewProjection::new(
//!                 spin.step(),
//!                 camera.view_matrix(),
//!                 camera.projection_matrix(frame.aspect()),
//!                 [1.0, 0.5, 0.2, 1.0],
//!             );
//!             cube.render(frame.gpu, frame.pass, &mvp);
//!         })
//!     })
//! }
//! # const VERTEX: &str = "";
//! # const FRAGMENT: &str = "";
//! ```
//!
//! ## Layout
//!
//! - [`transform`] and [`Bounce`]/[`Spin`] are pure math, usable without a GPU.
//! - [`Shader`] and [`Program`] compile and link WGSL, reporting failures as [`Error`].
//! - [`EffectPass`] draws a fullscreen quad; [`MeshPass`] draws depth-tested geometry.
//! - [`run`] owns the window and the loop.
//!
//! Set `RUST_LOG=debug` to see surface, pipeline and resize events.

mod app;
mod camera;
mod effect_pass;
mod error;
mod frame_state;
mod gpu;
mod logging;
mod mesh;
mod mesh_pass;
mod program;
pub mod raycast;
mod shader;
pub mod transform;

pub use app::{AppConfig, Frame, SetupContext, run, run_with_config};
pub use camera::Camera;
pub use effect_pass::{EffectPass, SphereUniforms};
pub use error::{Error, ErrorKind, Result};
pub use frame_state::{Bounce, Spin};
pub use gpu::{DEPTH_FORMAT, DepthTarget, FrameAcquire, GpuContext};
pub use logging::{LoggingConfig, init_logging};
pub use mesh::{CUBE_VERTICES, Mesh, QUAD_INDICES, QUAD_VERTICES, Vertex};
pub use mesh_pass::{MeshPass, ModelViewProjection};
pub use program::{Program, ProgramLayout};
pub use shader::{Shader, ShaderStage};
pub use transform::Matrix4;

// Re-export glam math types for convenience
pub use glam::{Mat4, Vec2, Vec3};
