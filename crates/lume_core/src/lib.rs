//! Lume Core - renderer-agnostic geometry and asset loading.
//!
//! This crate provides:
//!
//! - **Mesh geometry**: `Mesh` with positions, optional normals, and a
//!   triangle index buffer
//! - **Asset loading**: OBJ parsing via `load_obj`
//! - **Display collaborator**: the `Display` trait the render loops
//!   talk to, one `should_quit`/`present` pair per frame

pub mod display;
pub mod mesh;
pub mod obj;

// Re-export commonly used types
pub use display::Display;
pub use mesh::Mesh;
pub use obj::{load_obj, LoadError};
