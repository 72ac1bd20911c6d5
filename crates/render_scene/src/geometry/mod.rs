//! Geometry primitives and ray intersection tests
//!
//! Pure math used by scene queries:
//!
//! - [`Ray`], [`Triangle`] - query primitives
//! - [`Aabb`] - broadphase bounding volume
//! - [`intersect`] - ray/AABB slab test and Möller-Trumbore ray/triangle test

mod aabb;
mod primitives;
pub mod intersect;

pub use aabb::Aabb;
pub use primitives::{Ray, Triangle};
