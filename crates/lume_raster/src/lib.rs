//! Lume Raster - software triangle rasterization.
//!
//! A CPU rasterizer with the classic programmable-pipeline split:
//! vertex/fragment shader callbacks, typed per-vertex attributes with
//! perspective-correct interpolation, a depth-tested framebuffer, and a
//! fixed-size worker pool that rasterizes disjoint pixel bands in
//! parallel.

mod attribs;
mod framebuffer;
mod object;
mod raster;
mod shader;
mod uniforms;

pub use attribs::{AttribValue, Attribs};
pub use framebuffer::{pack_color, Framebuffer};
pub use object::Object;
pub use raster::{DrawError, Rasterizer};
pub use shader::{
    fs_blinn_phong, fs_constant, fs_identity, vs_blinn_phong, vs_color, vs_color_transform,
    vs_identity, vs_transform, FragmentShader, ShaderProgram, VertexShader,
};
pub use uniforms::{UniformItem, UniformValue, Uniforms};

/// Re-export common math types from lume_math
pub use lume_math::{Mat3, Mat4, Vec2, Vec3, Vec4};
