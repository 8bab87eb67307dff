//! Software-rasterizer demo.
//!
//! With no argument, draws two depth-tested triangles with interpolated
//! vertex colors. With a mesh path, rasterizes the OBJ with the
//! Blinn-Phong shader pair. Saves `raster.png`.

use anyhow::Result;
use lume_core::{load_obj, Display};
use lume_math::{Camera, Mat4, Vec3, Vec4};
use lume_raster::{
    fs_blinn_phong, fs_identity, vs_blinn_phong, vs_color, Object, Rasterizer, ShaderProgram,
};
use lume_viewer::HeadlessDisplay;

const WORKERS: usize = 4;

fn draw_triangles(raster: &mut Rasterizer) -> Result<()> {
    let mut object = Object::new();
    // Two overlapping triangles at different depths
    object.set_attribs(
        0,
        &[
            Vec4::new(-0.8, -0.6, 0.2, 1.0),
            Vec4::new(0.6, -0.7, 0.2, 1.0),
            Vec4::new(-0.1, 0.8, 0.2, 1.0),
            Vec4::new(-0.4, -0.2, 0.5, 1.0),
            Vec4::new(0.9, -0.1, 0.5, 1.0),
            Vec4::new(0.4, 0.9, 0.5, 1.0),
        ],
    );
    object.set_attribs(
        1,
        &[
            Vec4::new(1.0, 0.0, 0.0, 1.0),
            Vec4::new(0.0, 1.0, 0.0, 1.0),
            Vec4::new(0.0, 0.0, 1.0, 1.0),
            Vec4::new(1.0, 1.0, 0.0, 1.0),
            Vec4::new(1.0, 1.0, 0.0, 1.0),
            Vec4::new(1.0, 1.0, 0.0, 1.0),
        ],
    );
    object.set_indices(&[[0, 1, 2], [3, 4, 5]]);

    let program = ShaderProgram::new(vs_color, fs_identity);
    raster.draw(&object, &program)?;
    Ok(())
}

fn draw_mesh(raster: &mut Rasterizer, path: &str) -> Result<()> {
    let mesh = load_obj(path)?;
    let center = mesh.center();
    let size = mesh.size().max(1e-3);

    let mut object = Object::new();
    object.set_attribs(0, &mesh.positions);
    object.set_attribs(1, mesh.normals.as_deref().unwrap_or(&[]));
    let indices: Vec<[u32; 3]> = mesh
        .indices
        .chunks_exact(3)
        .map(|f| [f[0], f[1], f[2]])
        .collect();
    object.set_indices(&indices);

    let camera = Camera::new(
        center + Vec3::new(0.0, 0.35 * size, 1.2 * size),
        center,
        raster.width() as f32 / raster.height() as f32,
    );

    let mut program = ShaderProgram::new(vs_blinn_phong, fs_blinn_phong);
    program.set_uniform("model", Mat4::IDENTITY);
    program.set_uniform("view", camera.view_matrix());
    program.set_uniform("projection", camera.projection_matrix());
    program.set_uniform("lightPos", center + Vec3::new(size, 1.5 * size, size));
    program.set_uniform("viewPos", camera.position);
    program.set_uniform("lightColor", Vec3::ONE);
    program.set_uniform("ambientColor", Vec3::new(0.15, 0.1, 0.1));
    program.set_uniform("diffuseColor", Vec3::new(0.7, 0.3, 0.3));
    program.set_uniform("specularColor", Vec3::splat(0.7));
    program.set_uniform("phongExponent", 32.0f32);

    raster.draw(&object, &program)?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let mut raster = Rasterizer::new(640, 480, WORKERS)?;
    raster.enable_depth_test();
    raster.clear(Vec4::new(0.1, 0.1, 0.12, 1.0));

    match std::env::args().nth(1) {
        Some(path) => draw_mesh(&mut raster, &path)?,
        None => draw_triangles(&mut raster)?,
    }

    let mut display = HeadlessDisplay::new(1);
    while !display.should_quit() {
        display.present(
            &raster.framebuffer().as_rgba_bytes(),
            raster.width(),
            raster.height(),
        );
    }

    display.save_last("raster.png")
}
