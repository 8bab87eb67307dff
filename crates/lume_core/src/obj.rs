//! OBJ mesh loading.
//!
//! Thin wrapper over `tobj` that produces a [`Mesh`]. Faces are
//! triangulated on load and indices re-packed with a single shared
//! index per vertex.

use std::path::Path;

use lume_math::Vec3;
use thiserror::Error;

use crate::mesh::Mesh;

/// Errors that can occur while loading a mesh file.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read OBJ file: {0}")]
    Obj(#[from] tobj::LoadError),

    #[error("no models found in OBJ file")]
    NoModels,

    #[error("model '{0}' has no triangles")]
    NoTriangles(String),
}

/// Load the first model of an OBJ file as a mesh.
///
/// Normals are taken from the file when present, otherwise computed as
/// smooth vertex normals. A load failure aborts scene construction;
/// callers propagate the error rather than rendering an empty mesh.
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh, LoadError> {
    let (models, _materials) = tobj::load_obj(
        path.as_ref(),
        &tobj::LoadOptions {
            single_index: true,
            triangulate: true,
            ..Default::default()
        },
    )?;

    let model = models.first().ok_or(LoadError::NoModels)?;
    let raw = &model.mesh;
    if raw.indices.is_empty() {
        return Err(LoadError::NoTriangles(model.name.clone()));
    }
    if models.len() > 1 {
        log::warn!(
            "OBJ contains {} models, loading only '{}'",
            models.len(),
            model.name
        );
    }

    let positions: Vec<Vec3> = raw
        .positions
        .chunks_exact(3)
        .map(|p| Vec3::new(p[0], p[1], p[2]))
        .collect();

    let normals = if raw.normals.is_empty() {
        None
    } else {
        Some(
            raw.normals
                .chunks_exact(3)
                .map(|n| Vec3::new(n[0], n[1], n[2]))
                .collect(),
        )
    };

    let mut mesh = Mesh::new(positions, raw.indices.clone(), normals);
    mesh.ensure_normals();

    log::info!(
        "Loaded '{}': {} vertices, {} triangles",
        model.name,
        mesh.vertex_count(),
        mesh.triangle_count()
    );

    Ok(mesh)
}
