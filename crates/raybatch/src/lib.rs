#![warn(missing_docs)]

//! raybatch — batched nearest-hit ray queries over triangle and element
//! meshes.
//!
//! A [`Device`] represents a tracing backend instance, a [`Scene`] aggregates
//! geometry attached to one device, and meshes registered through
//! [`TriangleMesh`] / [`ElementMesh`] become queryable the moment a
//! [`RayBatch`] is run against the scene:
//!
//! - [`Scene::intersect`] - hit primitive id per ray, `-1` on miss
//! - [`Scene::distance`] - distance to the nearest hit per ray
//! - [`Scene::query`] - structured records: geometry id, primitive id,
//!   primitive-local `(u, v)`, and distance
//!
//! # Example
//!
//! ```
//! use raybatch::{RayBatch, Scene, TriangleMesh};
//!
//! # fn main() -> Result<(), raybatch::Error> {
//! let mesh = TriangleMesh::from_soup(&[
//!     [3.0, -1.0, -1.0],
//!     [3.0, 1.0, -1.0],
//!     [3.0, -1.0, 1.0],
//! ])?;
//! let mut scene = Scene::default();
//! scene.attach(&mesh);
//!
//! let batch = RayBatch::new(&[[0.0, -0.2, -0.2]], &[[1.0, 0.0, 0.0]])?;
//! let hits = scene.query(&batch);
//! assert_eq!(hits.geom_id, vec![0]);
//! assert!((hits.tfar[0] - 3.0).abs() < 1e-5);
//! # Ok(())
//! # }
//! ```

pub use raybatch_math;
pub use raybatch_mesh;
pub use raybatch_trace;

mod device;
mod error;
mod query;
mod scene;

pub use device::Device;
pub use error::{Error, MeshError, Result};
pub use query::{HitRecords, RayBatch, MISS_ID};
pub use scene::Scene;

pub use raybatch_math::MISS_TFAR;
pub use raybatch_mesh::{ElementKind, ElementMesh, Mesh, TriangleMesh};
