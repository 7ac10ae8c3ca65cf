#![warn(missing_docs)]

//! Ray tracing core for the raybatch kernel.
//!
//! This crate owns the geometry-independent tracing machinery:
//!
//! - [`Ray`] - ray representation with precomputed AABB-test reciprocals
//! - [`intersect_triangle`] - Möller–Trumbore ray-triangle intersection
//! - [`Bvh`] - SAH-built bounding volume hierarchy with nearest-first
//!   closest-hit traversal
//!
//! Scenes flatten their registered meshes into tagged [`Primitive`]s, build
//! a [`Bvh`] once, and answer each ray of a batch with
//! [`Bvh::trace_closest`].

mod ray;
pub mod bvh;
pub mod triangle;

pub use bvh::{Bvh, Hit, Primitive};
pub use ray::Ray;
pub use triangle::{intersect_triangle, TriangleHit};
