//! Shader program abstraction and the built-in shader set.
//!
//! A vertex shader reads the uniforms and one vertex's input
//! attributes, writes output attributes for interpolation, and returns
//! the clip-space position. A fragment shader reads the uniforms and
//! one fragment's interpolated attributes and returns an RGBA color.

use crate::attribs::Attribs;
use crate::uniforms::Uniforms;
use glam::{Mat3, Mat4, Vec3, Vec4};

pub type VertexShader = fn(&Uniforms, &Attribs, &mut Attribs) -> Vec4;
pub type FragmentShader = fn(&Uniforms, &Attribs) -> Vec4;

/// A vertex shader, a fragment shader, and their uniforms.
///
/// Created once and reused across draw calls; uniforms are mutated
/// between draws via `set_uniform`.
#[derive(Clone)]
pub struct ShaderProgram {
    pub vs: VertexShader,
    pub fs: FragmentShader,
    pub uniforms: Uniforms,
}

impl ShaderProgram {
    pub fn new(vs: VertexShader, fs: FragmentShader) -> Self {
        Self {
            vs,
            fs,
            uniforms: Uniforms::new(),
        }
    }

    /// Set the value of a uniform variable.
    pub fn set_uniform<T: crate::uniforms::UniformItem>(&mut self, name: &str, value: T) {
        self.uniforms.set(name, value);
    }
}

// Built-in vertex shaders.
//
// Slot conventions: 0 = position, 1 = normal or color.

/// Pass the position through unchanged.
pub fn vs_identity(_uniforms: &Uniforms, input: &Attribs, _out: &mut Attribs) -> Vec4 {
    input.get::<Vec4>(0)
}

/// Apply the `transform` uniform to the position.
pub fn vs_transform(uniforms: &Uniforms, input: &Attribs, _out: &mut Attribs) -> Vec4 {
    let vertex = input.get::<Vec4>(0);
    let transform = uniforms.get::<Mat4>("transform");
    transform * vertex
}

/// Forward the per-vertex color in slot 1 for interpolation.
pub fn vs_color(_uniforms: &Uniforms, input: &Attribs, out: &mut Attribs) -> Vec4 {
    let vertex = input.get::<Vec4>(0);
    let color = input.get::<Vec4>(1);
    out.set(0, color);
    vertex
}

/// `vs_color` with the `transform` uniform applied to the position.
pub fn vs_color_transform(uniforms: &Uniforms, input: &Attribs, out: &mut Attribs) -> Vec4 {
    let vertex = input.get::<Vec4>(0);
    let color = input.get::<Vec4>(1);
    let transform = uniforms.get::<Mat4>("transform");
    out.set(0, color);
    transform * vertex
}

/// Blinn-Phong vertex stage.
///
/// Expects `model`, `view`, and `projection` uniforms; emits the
/// world-space position in out slot 0 and the world-space normal in
/// out slot 1 for per-fragment lighting.
pub fn vs_blinn_phong(uniforms: &Uniforms, input: &Attribs, out: &mut Attribs) -> Vec4 {
    let vertex = input.get::<Vec3>(0);
    let normal = input.get::<Vec3>(1);

    let model = uniforms.get::<Mat4>("model");
    let view = uniforms.get::<Mat4>("view");
    let projection = uniforms.get::<Mat4>("projection");

    let world_pos = model.transform_point3(vertex);
    let world_normal = Mat3::from_mat4(model).inverse().transpose() * normal;

    out.set(0, world_pos);
    out.set(1, world_normal);

    projection * view * model * Vec4::new(vertex.x, vertex.y, vertex.z, 1.0)
}

// Built-in fragment shaders.

/// Fill every fragment with the `color` uniform.
pub fn fs_constant(uniforms: &Uniforms, _input: &Attribs) -> Vec4 {
    uniforms.get::<Vec4>("color")
}

/// Output the interpolated color from slot 0.
pub fn fs_identity(_uniforms: &Uniforms, input: &Attribs) -> Vec4 {
    input.get::<Vec4>(0)
}

/// Blinn-Phong fragment stage.
///
/// Expects `lightPos`, `viewPos`, `lightColor`, `ambientColor`,
/// `diffuseColor`, `specularColor`, and `phongExponent`. Lighting math
/// runs in gamma-corrected space (colors raised to 2.2 on input, the
/// result restored with 1/2.2).
pub fn fs_blinn_phong(uniforms: &Uniforms, input: &Attribs) -> Vec4 {
    let light_pos = uniforms.get::<Vec3>("lightPos");
    let view_pos = uniforms.get::<Vec3>("viewPos");

    let intensity = uniforms.get::<Vec3>("lightColor").powf(2.2);
    let ka = uniforms.get::<Vec3>("ambientColor").powf(2.2);
    let kd = uniforms.get::<Vec3>("diffuseColor").powf(2.2);
    let ks = uniforms.get::<Vec3>("specularColor").powf(2.2);
    let exponent = uniforms.get::<f32>("phongExponent");

    let frag_pos = input.get::<Vec3>(0);
    let n = input.get::<Vec3>(1).normalize_or_zero();

    let l = (light_pos - frag_pos).normalize_or_zero();
    let v = (view_pos - frag_pos).normalize_or_zero();
    let h = (v + l).normalize_or_zero();

    let diffuse = intensity * kd * n.dot(l).max(0.0);
    let specular = intensity * ks * n.dot(h).max(0.0).powf(exponent);

    let result = (ka + diffuse + specular).powf(1.0 / 2.2);
    Vec4::new(result.x, result.y, result.z, 1.0)
}
