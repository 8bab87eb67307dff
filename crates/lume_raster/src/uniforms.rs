//! Shader-program-wide constants, looked up by name.

use std::collections::HashMap;

use glam::{Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};

/// A uniform value of any supported type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Int(i32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat2(Mat2),
    Mat3(Mat3),
    Mat4(Mat4),
}

mod sealed {
    pub trait Sealed {}
}

/// Types storable as uniforms.
pub trait UniformItem: sealed::Sealed + Copy + Default {
    fn into_value(self) -> UniformValue;
    fn from_value(value: &UniformValue) -> Option<Self>;
}

macro_rules! uniform_item {
    ($ty:ty, $variant:ident) => {
        impl sealed::Sealed for $ty {}

        impl UniformItem for $ty {
            fn into_value(self) -> UniformValue {
                UniformValue::$variant(self)
            }

            fn from_value(value: &UniformValue) -> Option<Self> {
                match value {
                    UniformValue::$variant(v) => Some(*v),
                    _ => None,
                }
            }
        }
    };
}

uniform_item!(f32, Float);
uniform_item!(i32, Int);
uniform_item!(Vec2, Vec2);
uniform_item!(Vec3, Vec3);
uniform_item!(Vec4, Vec4);
uniform_item!(Mat2, Mat2);
uniform_item!(Mat3, Mat3);
uniform_item!(Mat4, Mat4);

/// All uniform variables of one shader program.
#[derive(Clone, Debug, Default)]
pub struct Uniforms {
    values: HashMap<String, UniformValue>,
}

impl Uniforms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a uniform, replacing any previous value under the name.
    pub fn set<T: UniformItem>(&mut self, name: &str, value: T) {
        self.values.insert(name.to_owned(), value.into_value());
    }

    /// Typed lookup by name.
    ///
    /// A missing name or a stored value of a different type is
    /// non-fatal: it logs a warning and yields the type's default, so a
    /// misconfigured shader draws wrong rather than aborting the frame.
    pub fn get<T: UniformItem>(&self, name: &str) -> T {
        match self.values.get(name) {
            Some(value) => T::from_value(value).unwrap_or_else(|| {
                log::warn!("uniform '{name}' accessed with mismatched type");
                T::default()
            }),
            None => {
                log::warn!("uniform '{name}' was never set");
                T::default()
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }
}
