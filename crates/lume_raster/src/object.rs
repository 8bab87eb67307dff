//! Vertex buffers and triangle indices for draw calls.

use crate::attribs::{AttribValue, Attribs};
use glam::Vec4;

/// A drawable object: one dense float buffer per attribute slot plus a
/// triangle index buffer. All slots index the same vertex list.
#[derive(Clone, Debug, Default)]
pub struct Object {
    buffers: Vec<Vec<f32>>,
    dims: Vec<u8>,
    indices: Vec<[u32; 3]>,
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the data of one vertex attribute slot.
    ///
    /// `data` holds one value per vertex; the slot's dimension is taken
    /// from the value type. Replaces any previous buffer in the slot.
    pub fn set_attribs<T: AttribValue>(&mut self, slot: usize, data: &[T]) {
        if self.buffers.len() <= slot {
            self.buffers.resize(slot + 1, Vec::new());
            self.dims.resize(slot + 1, 0);
        }

        let dim = T::DIM as usize;
        let mut buffer = Vec::with_capacity(data.len() * dim);
        for value in data {
            let v = value.to_vec4();
            buffer.extend_from_slice(&v.to_array()[..dim]);
        }

        self.buffers[slot] = buffer;
        self.dims[slot] = T::DIM;
    }

    /// Set the triangle index buffer.
    pub fn set_indices(&mut self, indices: &[[u32; 3]]) {
        self.indices = indices.to_vec();
    }

    pub fn indices(&self) -> &[[u32; 3]] {
        &self.indices
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Number of attribute slots with data.
    pub fn attrib_count(&self) -> usize {
        self.buffers.len()
    }

    /// Declared dimension of a slot; 0 if the slot is empty.
    pub fn dim(&self, slot: usize) -> u8 {
        self.dims.get(slot).copied().unwrap_or(0)
    }

    /// Number of vertices, derived from slot 0 (the position slot).
    pub fn vertex_count(&self) -> usize {
        match (self.buffers.first(), self.dims.first()) {
            (Some(buffer), Some(&dim)) if dim > 0 => buffer.len() / dim as usize,
            _ => 0,
        }
    }

    /// Gather all slots of one vertex into an `Attribs`.
    ///
    /// The caller must have bounds-checked `vertex` against
    /// `vertex_count()`; slots shorter than the position buffer read as
    /// zero.
    pub(crate) fn vertex_attribs(&self, vertex: usize) -> Attribs {
        let mut attribs = Attribs::new();
        for (slot, buffer) in self.buffers.iter().enumerate() {
            let dim = self.dims[slot] as usize;
            if dim == 0 {
                continue;
            }

            let start = vertex * dim;
            let mut v = [0.0f32; 4];
            if let Some(components) = buffer.get(start..start + dim) {
                v[..dim].copy_from_slice(components);
            }
            attribs.set_raw(slot, Vec4::from_array(v), dim as u8);
        }
        attribs
    }
}
