//! Position + rotation value type used for both local and world space.
//!
//! Composition in this crate is purely additive: a child's world position is
//! its local position plus the parent's world position, and the same for
//! rotation. The parent's rotation does not revolve the child's offset.

use std::ops::{Add, Sub};

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// A 2D transform made of a position and a rotation in degrees.
///
/// `Default` is the identity: position `(0, 0)` and rotation `0`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    /// Position in world units.
    pub position: Vector2<f32>,
    /// Signed rotation in degrees.
    pub rotation_degrees: f32,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform2D {
    /// The identity transform.
    pub fn identity() -> Self {
        Self {
            position: Vector2::zeros(),
            rotation_degrees: 0.0,
        }
    }

    /// Create a transform from its components.
    pub fn new(x: f32, y: f32, rotation_degrees: f32) -> Self {
        Self {
            position: Vector2::new(x, y),
            rotation_degrees,
        }
    }

    /// Create a transform with only a position.
    pub fn from_position(position: Vector2<f32>) -> Self {
        Self {
            position,
            rotation_degrees: 0.0,
        }
    }

    /// Create a transform with only a rotation.
    pub fn from_rotation(rotation_degrees: f32) -> Self {
        Self {
            position: Vector2::zeros(),
            rotation_degrees,
        }
    }

    /// Apply this (local) transform on top of `parent_world`.
    pub fn compose(self, parent_world: Transform2D) -> Transform2D {
        self + parent_world
    }

    /// The local transform that, composed with `parent_world`, yields `self`.
    pub fn relative_to(self, parent_world: Transform2D) -> Transform2D {
        self - parent_world
    }

    /// Componentwise comparison with a tolerance.
    pub fn approx_eq(&self, other: &Transform2D, epsilon: f32) -> bool {
        (self.position.x - other.position.x).abs() < epsilon
            && (self.position.y - other.position.y).abs() < epsilon
            && (self.rotation_degrees - other.rotation_degrees).abs() < epsilon
    }
}

impl Add for Transform2D {
    type Output = Transform2D;

    fn add(self, rhs: Transform2D) -> Transform2D {
        Transform2D {
            position: self.position + rhs.position,
            rotation_degrees: self.rotation_degrees + rhs.rotation_degrees,
        }
    }
}

impl Sub for Transform2D {
    type Output = Transform2D;

    fn sub(self, rhs: Transform2D) -> Transform2D {
        Transform2D {
            position: self.position - rhs.position,
            rotation_degrees: self.rotation_degrees - rhs.rotation_degrees,
        }
    }
}
