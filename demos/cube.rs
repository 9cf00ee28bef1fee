//! Rotating cube - hand-built model, view and projection matrices.

use firstlight::{
    AppConfig, CUBE_VERTICES, Camera, Frame, Matrix4, ModelViewProjection, Spin, run_with_config,
};

const CUBE_COLOR: [f32; 4] = [1.0, 0.5, 0.2, 1.0];

fn main() -> firstlight::Result<()> {
    let config = AppConfig::new()
        .title("Rotating Cube")
        .size(800, 600)
        .depth(true);

    run_with_config(config, |ctx| {
        let cube = ctx.mesh_pass(
            "Cube",
            include_str!("shaders/cube.vert.wgsl"),
            include_str!("shaders/cube.frag.wgsl"),
            &CUBE_VERTICES,
        )?;

        let camera = Camera::default();
        let mut spin = Spin::new(Matrix4::IDENTITY, 0.01);

        Ok(move |frame: &mut Frame| {
            let uniforms = ModelViewProjection::new(
                spin.step(),
                camera.view_matrix(),
                camera.projection_matrix(frame.aspect()),
                CUBE_COLOR,
            );
            cube.render(frame.gpu, frame.pass, &uniforms);

            if frame.frame_index.is_multiple_of(600) {
                log::debug!("frame {}: {:.0} fps", frame.frame_index, frame.fps());
            }
        })
    })
}
