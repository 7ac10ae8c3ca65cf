//! Scene: geometry aggregation and batched queries.

use log::debug;
use raybatch_mesh::Mesh;
use raybatch_trace::{Bvh, Primitive, Ray};

use crate::device::Device;
use crate::query::{HitRecords, RayBatch, MISS_ID};

/// A collection of geometries attached to a device, answering batched
/// nearest-hit ray queries.
///
/// Meshes are registered with [`Scene::attach`], which assigns geometry ids
/// sequentially from 0. The acceleration structure is built lazily on the
/// first query after a registration; queries on an unmodified scene are
/// deterministic, so repeating a query yields bit-identical results.
#[derive(Debug)]
pub struct Scene {
    device: Device,
    prims: Vec<Primitive>,
    num_geometries: u32,
    bvh: Option<Bvh>,
}

impl Scene {
    /// Create a scene bound to the given device.
    pub fn new(device: Device) -> Self {
        Self {
            device,
            prims: Vec::new(),
            num_geometries: 0,
            bvh: None,
        }
    }

    /// The device this scene is bound to.
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Number of geometries registered so far.
    pub fn num_geometries(&self) -> u32 {
        self.num_geometries
    }

    /// Register a mesh, returning its geometry id.
    ///
    /// Ids start at 0 and follow registration order. Invalidates the
    /// acceleration structure; the next query rebuilds it.
    pub fn attach<M: Mesh>(&mut self, mesh: &M) -> u32 {
        let geom_id = self.num_geometries;
        let vertices = mesh.vertices();
        for (prim_id, tri) in mesh.triangles().iter().enumerate() {
            self.prims.push(Primitive {
                a: vertices[tri[0] as usize],
                b: vertices[tri[1] as usize],
                c: vertices[tri[2] as usize],
                geom_id,
                prim_id: prim_id as u32,
            });
        }
        self.num_geometries += 1;
        self.bvh = None;
        geom_id
    }

    /// Build the acceleration structure if a registration invalidated it.
    pub fn commit(&mut self) {
        if self.bvh.is_none() {
            debug!(
                "committing scene on {}: {} geometries, {} triangles",
                self.device,
                self.num_geometries,
                self.prims.len()
            );
            self.bvh = Some(Bvh::build(self.prims.clone()));
        }
    }

    fn bvh(&mut self) -> &Bvh {
        self.commit();
        self.bvh.as_ref().unwrap()
    }

    /// Nearest-hit query reporting the hit primitive id per ray, [`MISS_ID`]
    /// for rays that hit nothing.
    pub fn intersect(&mut self, batch: &RayBatch) -> Vec<i32> {
        let bvh = self.bvh();
        batch
            .origins()
            .iter()
            .zip(batch.directions())
            .enumerate()
            .map(|(i, (origin, direction))| {
                let ray = Ray::new(*origin, *direction);
                match bvh.trace_closest(&ray, batch.bound(i)) {
                    Some(hit) => hit.prim_id as i32,
                    None => MISS_ID,
                }
            })
            .collect()
    }

    /// Nearest-hit query reporting the distance to the hit per ray. Misses
    /// report the ray's far bound, or the miss sentinel when unbounded.
    pub fn distance(&mut self, batch: &RayBatch) -> Vec<f32> {
        let bvh = self.bvh();
        batch
            .origins()
            .iter()
            .zip(batch.directions())
            .enumerate()
            .map(|(i, (origin, direction))| {
                let ray = Ray::new(*origin, *direction);
                match bvh.trace_closest(&ray, batch.bound(i)) {
                    Some(hit) => hit.t,
                    None => batch.miss_tfar(i),
                }
            })
            .collect()
    }

    /// Full nearest-hit query: geometry id, primitive id, primitive-local
    /// `(u, v)` coordinates, and distance for every ray of the batch.
    pub fn query(&mut self, batch: &RayBatch) -> HitRecords {
        let bvh = self.bvh();
        let mut records = HitRecords::with_capacity(batch.len());
        for (i, (origin, direction)) in batch.origins().iter().zip(batch.directions()).enumerate()
        {
            let ray = Ray::new(*origin, *direction);
            match bvh.trace_closest(&ray, batch.bound(i)) {
                Some(hit) => {
                    records.geom_id.push(hit.geom_id as i32);
                    records.prim_id.push(hit.prim_id as i32);
                    records.u.push(hit.u);
                    records.v.push(hit.v);
                    records.tfar.push(hit.t);
                }
                None => {
                    records.geom_id.push(MISS_ID);
                    records.prim_id.push(MISS_ID);
                    records.u.push(0.0);
                    records.v.push(0.0);
                    records.tfar.push(batch.miss_tfar(i));
                }
            }
        }
        records
    }
}

impl Default for Scene {
    /// Create a scene with an implicitly created device.
    fn default() -> Self {
        Self::new(Device::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raybatch_mesh::TriangleMesh;

    #[test]
    fn test_geometry_ids_sequential() {
        let tri = TriangleMesh::from_soup(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
        ])
        .unwrap();
        let mut scene = Scene::default();
        assert_eq!(scene.attach(&tri), 0);
        assert_eq!(scene.attach(&tri), 1);
        assert_eq!(scene.num_geometries(), 2);
    }

    #[test]
    fn test_attach_after_query_rebuilds() {
        let near = TriangleMesh::from_soup(&[
            [2.0, -1.0, -1.0],
            [2.0, 3.0, -1.0],
            [2.0, -1.0, 3.0],
        ])
        .unwrap();
        let nearer = TriangleMesh::from_soup(&[
            [1.0, -1.0, -1.0],
            [1.0, 3.0, -1.0],
            [1.0, -1.0, 3.0],
        ])
        .unwrap();

        let mut scene = Scene::default();
        scene.attach(&near);
        let batch = RayBatch::new(&[[0.0, 0.2, 0.2]], &[[1.0, 0.0, 0.0]]).unwrap();
        assert!((scene.distance(&batch)[0] - 2.0).abs() < 1e-5);

        scene.attach(&nearer);
        assert!((scene.distance(&batch)[0] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_empty_scene_misses() {
        let mut scene = Scene::default();
        let batch = RayBatch::new(&[[0.0; 3]], &[[1.0, 0.0, 0.0]]).unwrap();
        assert_eq!(scene.intersect(&batch), vec![MISS_ID]);
    }
}
