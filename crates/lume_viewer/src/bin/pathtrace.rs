//! Progressive path-tracing demo.
//!
//! Renders a Cornell-style box lit by an emissive panel, accumulating
//! one sample per pixel per frame until the display quits or the sample
//! target is reached, then runs the denoise pass and saves `path.png`.

use anyhow::Result;
use lume_core::Display;
use lume_math::{Aabb, Camera, Vec3};
use lume_tracer::{
    render_path_frame, Accumulator, ImageBuffer, Light, Material, Object, Scene, Shape,
};
use lume_viewer::HeadlessDisplay;

const SAMPLES: u32 = 64;

fn cornell_box(width: u32, height: u32) -> Scene {
    let mut scene = Scene::new(width, height);
    scene.camera = Camera::new(
        Vec3::new(0.0, 1.0, 3.4),
        Vec3::new(0.0, 1.0, 0.0),
        width as f32 / height as f32,
    )
    .with_fov_y(55.0_f32.to_radians());
    scene.background = Vec3::ZERO;

    let white = Material::Diffuse {
        albedo: Vec3::splat(0.73),
    };

    // Walls
    scene.add_object(Object::new(
        Shape::Plane {
            point: Vec3::ZERO,
            normal: Vec3::Y,
        },
        white.clone(),
    ));
    scene.add_object(Object::new(
        Shape::Plane {
            point: Vec3::new(0.0, 2.0, 0.0),
            normal: -Vec3::Y,
        },
        white.clone(),
    ));
    scene.add_object(Object::new(
        Shape::Plane {
            point: Vec3::new(0.0, 0.0, -1.5),
            normal: Vec3::Z,
        },
        white.clone(),
    ));
    scene.add_object(Object::new(
        Shape::Plane {
            point: Vec3::new(-1.5, 0.0, 0.0),
            normal: Vec3::X,
        },
        Material::Diffuse {
            albedo: Vec3::new(0.65, 0.05, 0.05),
        },
    ));
    scene.add_object(Object::new(
        Shape::Plane {
            point: Vec3::new(1.5, 0.0, 0.0),
            normal: -Vec3::X,
        },
        Material::Diffuse {
            albedo: Vec3::new(0.12, 0.45, 0.15),
        },
    ));

    // Ceiling light panel
    scene.add_object(Object::new(
        Shape::Box(Aabb::from_points(
            Vec3::new(-0.5, 1.95, -0.8),
            Vec3::new(0.5, 2.0, -0.2),
        )),
        Material::Emissive {
            radiance: Vec3::splat(4.0),
        },
    ));

    // Contents
    scene.add_object(Object::new(
        Shape::Sphere {
            center: Vec3::new(-0.6, 0.45, -0.6),
            radius: 0.45,
        },
        Material::Metallic {
            f0: Vec3::splat(0.9),
        },
    ));
    scene.add_object(Object::new(
        Shape::Sphere {
            center: Vec3::new(0.6, 0.45, -0.2),
            radius: 0.45,
        },
        Material::Transparent { ior: 1.5 },
    ));

    // The path tracer hits the panel directly, but a point light keeps
    // the Whitted comparison renderable with the same scene.
    scene.add_light(Light::new(Vec3::new(0.0, 1.9, -0.5), Vec3::ONE, 4.0));

    scene
}

fn main() -> Result<()> {
    env_logger::init();

    let (width, height) = (320u32, 240u32);
    let scene = cornell_box(width, height);

    let mut accumulator = Accumulator::new(width, height);
    let mut display = HeadlessDisplay::new(SAMPLES);

    // One sample per pixel per frame; the quit poll runs between
    // frames, never mid-render.
    while !display.should_quit() {
        let sample = accumulator.count();
        let frame = render_path_frame(&scene, 0xC0FF_EE00 ^ sample as u64);
        accumulator.add_frame(&frame, &scene.camera);

        let preview = ImageBuffer::from_pixels(width, height, accumulator.pixels().to_vec());
        display.present(&preview.to_rgba(), width, height);

        if sample % 8 == 0 {
            log::info!("sample {}/{SAMPLES}", sample + 1);
        }
    }

    accumulator.denoise();
    let final_image = ImageBuffer::from_pixels(width, height, accumulator.pixels().to_vec());
    let mut display = HeadlessDisplay::new(1);
    display.present(&final_image.to_rgba(), width, height);

    display.save_last("path.png")
}
