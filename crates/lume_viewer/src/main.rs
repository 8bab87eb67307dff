//! Ray-traced showcase.
//!
//! With no argument, renders a material showcase (glass, metal,
//! diffuse, normal-shaded spheres on a plane). With a mesh path,
//! ray-traces the OBJ under a Blinn-Phong material. Saves `trace.png`.

use anyhow::Result;
use lume_core::{load_obj, Display};
use lume_math::{Camera, Vec3};
use lume_tracer::{render, Light, Material, Object, Scene, Shape};
use lume_viewer::HeadlessDisplay;
use std::sync::Arc;

fn showcase_scene(width: u32, height: u32) -> Scene {
    let mut scene = Scene::new(width, height);
    scene.camera = Camera::new(Vec3::new(0.0, 1.0, 4.0), Vec3::new(0.0, 0.5, -1.0), width as f32 / height as f32)
        .with_fov_y(60.0_f32.to_radians());
    scene.background = Vec3::new(0.05, 0.05, 0.1);

    // Ground
    scene.add_object(Object::new(
        Shape::Plane {
            point: Vec3::new(0.0, -0.5, 0.0),
            normal: Vec3::Y,
        },
        Material::Diffuse {
            albedo: Vec3::new(0.7, 0.7, 0.7),
        },
    ));

    scene.add_object(Object::new(
        Shape::Sphere {
            center: Vec3::new(-2.2, 0.5, -1.0),
            radius: 1.0,
        },
        Material::Diffuse {
            albedo: Vec3::new(0.8, 0.3, 0.3),
        },
    ));
    scene.add_object(Object::new(
        Shape::Sphere {
            center: Vec3::new(0.0, 0.5, -1.0),
            radius: 1.0,
        },
        Material::Transparent { ior: 1.5 },
    ));
    scene.add_object(Object::new(
        Shape::Sphere {
            center: Vec3::new(2.2, 0.5, -1.0),
            radius: 1.0,
        },
        Material::Metallic {
            f0: Vec3::new(0.95, 0.64, 0.54), // copper-ish
        },
    ));
    scene.add_object(Object::new(
        Shape::Sphere {
            center: Vec3::new(0.0, 0.5, -4.0),
            radius: 1.0,
        },
        Material::BlinnPhong {
            ambient: Vec3::new(0.1, 0.1, 0.3),
            diffuse: Vec3::new(0.2, 0.2, 0.8),
            specular: Vec3::splat(0.8),
            reflective: Vec3::splat(0.2),
            shininess: 64.0,
        },
    ));

    scene.add_light(Light::new(Vec3::new(4.0, 6.0, 4.0), Vec3::ONE, 60.0));
    scene.add_light(Light::new(Vec3::new(-5.0, 4.0, 1.0), Vec3::new(1.0, 0.9, 0.8), 30.0));

    scene
}

fn mesh_scene(path: &str, width: u32, height: u32) -> Result<Scene> {
    let mesh = load_obj(path)?;
    let center = mesh.center();
    let size = mesh.size().max(1e-3);

    let mut scene = Scene::new(width, height);
    scene.camera = Camera::new(
        center + Vec3::new(0.0, 0.35 * size, 1.2 * size),
        center,
        width as f32 / height as f32,
    );
    scene.background = Vec3::new(0.05, 0.05, 0.1);

    scene.add_object(Object::new(
        Shape::Plane {
            point: Vec3::new(0.0, mesh.bounds.min.y, 0.0),
            normal: Vec3::Y,
        },
        Material::Diffuse {
            albedo: Vec3::splat(0.6),
        },
    ));
    scene.add_object(Object::new(
        Shape::Mesh(Arc::new(mesh)),
        Material::BlinnPhong {
            ambient: Vec3::new(0.2, 0.1, 0.1),
            diffuse: Vec3::new(0.7, 0.3, 0.3),
            specular: Vec3::splat(0.6),
            reflective: Vec3::ZERO,
            shininess: 32.0,
        },
    ));

    scene.add_light(Light::new(
        center + Vec3::new(size, 1.5 * size, size),
        Vec3::ONE,
        4.0 * size * size,
    ));

    Ok(scene)
}

fn main() -> Result<()> {
    env_logger::init();

    let (width, height) = (640u32, 480u32);
    let scene = match std::env::args().nth(1) {
        Some(path) => mesh_scene(&path, width, height)?,
        None => showcase_scene(width, height),
    };

    log::info!(
        "tracing {} objects, {} lights at {width}x{height}",
        scene.objects.len(),
        scene.lights.len()
    );

    let mut display = HeadlessDisplay::new(1);
    while !display.should_quit() {
        let image = render(&scene);
        display.present(&image.to_rgba(), scene.width, scene.height);
    }

    display.save_last("trace.png")
}
