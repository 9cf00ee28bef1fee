//! Ray traced sphere bouncing left and right - all shading in one fragment shader.

use firstlight::{AppConfig, Bounce, Frame, SphereUniforms, run_with_config};

fn main() -> firstlight::Result<()> {
    let config = AppConfig::new().title("Ray Tracing Sphere").size(800, 600);

    run_with_config(config, |ctx| {
        let sphere = ctx.effect::<SphereUniforms>(
            "Sphere",
            include_str!("shaders/fullscreen.vert.wgsl"),
            include_str!("shaders/sphere.frag.wgsl"),
        )?;

        let mut x = Bounce::sphere();

        Ok(move |frame: &mut Frame| {
            let uniforms = SphereUniforms {
                resolution: [frame.width() as f32, frame.height() as f32],
                center: [x.step(), 0.0],
                ..Default::default()
            };
            sphere.render(frame.gpu, frame.pass, &uniforms);
        })
    })
}
