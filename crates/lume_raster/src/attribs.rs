//! Typed per-vertex attribute storage.
//!
//! One `Attribs` holds the interpolable values of a single vertex (or
//! fragment). Every slot stores a `Vec4` plus the dimension it was
//! declared with, so a `set` of a `Vec2` followed by a `get::<Vec3>`
//! can be flagged instead of silently reading garbage.

use glam::{Vec2, Vec3, Vec4};

mod sealed {
    pub trait Sealed {}
    impl Sealed for f32 {}
    impl Sealed for glam::Vec2 {}
    impl Sealed for glam::Vec3 {}
    impl Sealed for glam::Vec4 {}
}

/// Value types storable in an attribute slot: `f32`, `Vec2`, `Vec3`, `Vec4`.
pub trait AttribValue: sealed::Sealed + Copy {
    /// Number of meaningful components (1-4).
    const DIM: u8;

    fn from_vec4(v: Vec4) -> Self;
    fn to_vec4(self) -> Vec4;
}

impl AttribValue for f32 {
    const DIM: u8 = 1;

    fn from_vec4(v: Vec4) -> Self {
        v.x
    }

    fn to_vec4(self) -> Vec4 {
        Vec4::new(self, 0.0, 0.0, 0.0)
    }
}

impl AttribValue for Vec2 {
    const DIM: u8 = 2;

    fn from_vec4(v: Vec4) -> Self {
        Vec2::new(v.x, v.y)
    }

    fn to_vec4(self) -> Vec4 {
        Vec4::new(self.x, self.y, 0.0, 0.0)
    }
}

impl AttribValue for Vec3 {
    const DIM: u8 = 3;

    fn from_vec4(v: Vec4) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }

    fn to_vec4(self) -> Vec4 {
        Vec4::new(self.x, self.y, self.z, 0.0)
    }
}

impl AttribValue for Vec4 {
    const DIM: u8 = 4;

    fn from_vec4(v: Vec4) -> Self {
        v
    }

    fn to_vec4(self) -> Vec4 {
        self
    }
}

/// The attributes of one vertex, keyed by small slot index.
///
/// Slot 0 is the position by convention, slot 1 the normal or color.
#[derive(Clone, Debug, Default)]
pub struct Attribs {
    values: Vec<Vec4>,
    dims: Vec<u8>,
}

impl Attribs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slots that have been set (highest index + 1).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Declared dimension of a slot; 0 if the slot was never set.
    pub fn dim(&self, index: usize) -> u8 {
        self.dims.get(index).copied().unwrap_or(0)
    }

    /// Typed read of a slot.
    ///
    /// A dimension mismatch is fatal in debug builds and a logged,
    /// truncated best-effort read in release builds.
    pub fn get<T: AttribValue>(&self, index: usize) -> T {
        check_dimension(index, self.dim(index), T::DIM);
        T::from_vec4(self.values.get(index).copied().unwrap_or(Vec4::ZERO))
    }

    /// Typed write of a slot, recording the value's dimension.
    pub fn set<T: AttribValue>(&mut self, index: usize, value: T) {
        self.expand(index);
        self.dims[index] = T::DIM;
        self.values[index] = value.to_vec4();
    }

    /// Raw slot read, no dimension check. Used by the interpolator.
    pub(crate) fn raw(&self, index: usize) -> Vec4 {
        self.values.get(index).copied().unwrap_or(Vec4::ZERO)
    }

    /// Raw slot write with an explicit dimension.
    pub(crate) fn set_raw(&mut self, index: usize, value: Vec4, dim: u8) {
        self.expand(index);
        self.dims[index] = dim;
        self.values[index] = value;
    }

    fn expand(&mut self, index: usize) {
        if self.values.len() <= index {
            self.values.resize(index + 1, Vec4::ZERO);
            self.dims.resize(index + 1, 0);
        }
    }
}

fn check_dimension(index: usize, actual: u8, requested: u8) {
    if actual != requested {
        debug_assert!(
            false,
            "attribute {index} has dimension {actual} but was accessed as dimension {requested}"
        );
        log::warn!(
            "attribute {index} has dimension {actual} but was accessed as dimension {requested}"
        );
    }
}
