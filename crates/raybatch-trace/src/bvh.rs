//! Bounding Volume Hierarchy over triangle primitives.
//!
//! Uses Surface Area Heuristic (SAH) bucket splits for construction and a
//! nearest-first traversal for closest-hit queries.

use log::debug;
use raybatch_math::{Aabb3, Point3};

use crate::triangle::intersect_triangle;
use crate::Ray;

const LEAF_SIZE: usize = 4;
const NUM_BUCKETS: usize = 12;

/// A triangle primitive owned by the hierarchy, tagged with the geometry and
/// primitive ids it was registered under.
#[derive(Debug, Clone, Copy)]
pub struct Primitive {
    /// First vertex.
    pub a: Point3,
    /// Second vertex.
    pub b: Point3,
    /// Third vertex.
    pub c: Point3,
    /// Id of the geometry this triangle belongs to.
    pub geom_id: u32,
    /// Index of this triangle within its geometry.
    pub prim_id: u32,
}

impl Primitive {
    fn aabb(&self) -> Aabb3 {
        let mut aabb = Aabb3::empty();
        aabb.include_point(&self.a);
        aabb.include_point(&self.b);
        aabb.include_point(&self.c);
        aabb
    }
}

/// Closest-hit result of a traced ray.
#[derive(Debug, Clone, Copy)]
pub struct Hit {
    /// Parameter along the ray, in units of the ray direction.
    pub t: f32,
    /// Barycentric u coordinate on the hit triangle.
    pub u: f32,
    /// Barycentric v coordinate on the hit triangle.
    pub v: f32,
    /// Geometry id of the hit triangle.
    pub geom_id: u32,
    /// Primitive id of the hit triangle within its geometry.
    pub prim_id: u32,
}

/// A BVH node - either a leaf with primitive indices or an internal node.
#[derive(Debug, Clone)]
enum BvhNode {
    Leaf {
        aabb: Aabb3,
        prims: Vec<usize>,
    },
    Internal {
        aabb: Aabb3,
        left: Box<BvhNode>,
        right: Box<BvhNode>,
    },
}

impl BvhNode {
    fn aabb(&self) -> &Aabb3 {
        match self {
            BvhNode::Leaf { aabb, .. } => aabb,
            BvhNode::Internal { aabb, .. } => aabb,
        }
    }
}

/// Bounding Volume Hierarchy for accelerated closest-hit queries over a
/// triangle set.
#[derive(Debug, Clone)]
pub struct Bvh {
    root: Option<BvhNode>,
    prims: Vec<Primitive>,
}

impl Bvh {
    /// Build a BVH over the given primitives using SAH construction.
    pub fn build(prims: Vec<Primitive>) -> Self {
        let mut entries: Vec<(usize, Aabb3, Point3)> = prims
            .iter()
            .enumerate()
            .map(|(i, prim)| {
                let aabb = prim.aabb();
                (i, aabb, aabb.center())
            })
            .collect();

        let root = if entries.is_empty() {
            None
        } else {
            Some(build_node(&mut entries))
        };
        debug!("built bvh over {} triangles", prims.len());

        Self { root, prims }
    }

    /// Number of primitives in the hierarchy.
    pub fn num_primitives(&self) -> usize {
        self.prims.len()
    }

    /// Trace a ray and return the closest hit with `t < t_max`, if any.
    ///
    /// Children are visited nearest-first and only strictly closer hits
    /// replace the current best, so results are reproducible for a fixed
    /// hierarchy.
    pub fn trace_closest(&self, ray: &Ray, t_max: f32) -> Option<Hit> {
        let mut closest: Option<Hit> = None;
        let mut closest_t = t_max;

        if let Some(ref root) = self.root {
            self.trace_node(ray, root, &mut closest, &mut closest_t);
        }

        closest
    }

    fn trace_node(
        &self,
        ray: &Ray,
        node: &BvhNode,
        closest: &mut Option<Hit>,
        closest_t: &mut f32,
    ) {
        match node {
            BvhNode::Leaf { aabb, prims } => {
                if let Some((t_min, _)) = ray.intersect_aabb(aabb) {
                    // Early out if AABB entry is beyond current closest
                    if t_min >= *closest_t {
                        return;
                    }

                    for &index in prims {
                        let prim = &self.prims[index];
                        if let Some(hit) = intersect_triangle(ray, &prim.a, &prim.b, &prim.c) {
                            if hit.t < *closest_t {
                                *closest_t = hit.t;
                                *closest = Some(Hit {
                                    t: hit.t,
                                    u: hit.u,
                                    v: hit.v,
                                    geom_id: prim.geom_id,
                                    prim_id: prim.prim_id,
                                });
                            }
                        }
                    }
                }
            }
            BvhNode::Internal { aabb, left, right } => {
                if let Some((t_min, _)) = ray.intersect_aabb(aabb) {
                    if t_min >= *closest_t {
                        return;
                    }

                    // Visit children in order of AABB entry distance
                    let left_t = ray.intersect_aabb(left.aabb()).map(|(t, _)| t);
                    let right_t = ray.intersect_aabb(right.aabb()).map(|(t, _)| t);

                    match (left_t, right_t) {
                        (Some(lt), Some(rt)) => {
                            if lt <= rt {
                                self.trace_node(ray, left, closest, closest_t);
                                self.trace_node(ray, right, closest, closest_t);
                            } else {
                                self.trace_node(ray, right, closest, closest_t);
                                self.trace_node(ray, left, closest, closest_t);
                            }
                        }
                        (Some(_), None) => self.trace_node(ray, left, closest, closest_t),
                        (None, Some(_)) => self.trace_node(ray, right, closest, closest_t),
                        (None, None) => {}
                    }
                }
            }
        }
    }
}

/// Build a BVH node recursively using SAH bucket splits.
fn build_node(entries: &mut [(usize, Aabb3, Point3)]) -> BvhNode {
    let mut bounds = Aabb3::empty();
    for (_, aabb, _) in entries.iter() {
        bounds.include(aabb);
    }

    if entries.len() <= LEAF_SIZE {
        return BvhNode::Leaf {
            aabb: bounds,
            prims: entries.iter().map(|(i, _, _)| *i).collect(),
        };
    }

    let (best_axis, best_pos) = find_best_split(entries, &bounds);
    let mut mid = partition(entries, best_axis, best_pos);

    // Fallback to a median split when the SAH partition degenerates
    if mid == 0 || mid == entries.len() {
        mid = entries.len() / 2;
    }

    let (left_entries, right_entries) = entries.split_at_mut(mid);

    BvhNode::Internal {
        aabb: bounds,
        left: Box::new(build_node(left_entries)),
        right: Box::new(build_node(right_entries)),
    }
}

/// Find the best split axis and position using SAH.
fn find_best_split(entries: &[(usize, Aabb3, Point3)], bounds: &Aabb3) -> (usize, f32) {
    let extent = [
        bounds.max.x - bounds.min.x,
        bounds.max.y - bounds.min.y,
        bounds.max.z - bounds.min.z,
    ];
    let total_area = bounds.surface_area();

    let mut best_cost = f32::INFINITY;
    let mut best_axis = 0;
    let mut best_pos = 0.0;

    for axis in 0..3 {
        if extent[axis] < 1e-10 {
            continue;
        }
        let axis_min = bounds.min[axis];

        let mut bucket_counts = [0usize; NUM_BUCKETS];
        let mut bucket_bounds = [Aabb3::empty(); NUM_BUCKETS];

        for (_, aabb, centroid) in entries {
            let b = ((centroid[axis] - axis_min) / extent[axis] * NUM_BUCKETS as f32) as usize;
            let b = b.min(NUM_BUCKETS - 1);
            bucket_counts[b] += 1;
            bucket_bounds[b].include(aabb);
        }

        for split in 1..NUM_BUCKETS {
            let mut left_count = 0;
            let mut left_bounds = Aabb3::empty();
            for i in 0..split {
                left_count += bucket_counts[i];
                if bucket_counts[i] > 0 {
                    left_bounds.include(&bucket_bounds[i]);
                }
            }

            let mut right_count = 0;
            let mut right_bounds = Aabb3::empty();
            for i in split..NUM_BUCKETS {
                right_count += bucket_counts[i];
                if bucket_counts[i] > 0 {
                    right_bounds.include(&bucket_bounds[i]);
                }
            }

            if left_count == 0 || right_count == 0 {
                continue;
            }

            // SAH cost: traversal + P(left) * N_left + P(right) * N_right
            let cost = 0.125
                + left_bounds.surface_area() / total_area * left_count as f32
                + right_bounds.surface_area() / total_area * right_count as f32;

            if cost < best_cost {
                best_cost = cost;
                best_axis = axis;
                best_pos = axis_min + (split as f32 / NUM_BUCKETS as f32) * extent[axis];
            }
        }
    }

    (best_axis, best_pos)
}

/// Partition entries by centroid along an axis.
fn partition(entries: &mut [(usize, Aabb3, Point3)], axis: usize, pos: f32) -> usize {
    let mut left = 0;
    let mut right = entries.len();

    while left < right {
        if entries[left].2[axis] < pos {
            left += 1;
        } else {
            right -= 1;
            entries.swap(left, right);
        }
    }

    left
}

#[cfg(test)]
mod tests {
    use super::*;
    use raybatch_math::Vec3;

    fn quad_at_x(x: f32) -> Vec<Primitive> {
        let verts = [
            Point3::new(x, -1.0, -1.0),
            Point3::new(x, 1.0, -1.0),
            Point3::new(x, -1.0, 1.0),
            Point3::new(x, 1.0, 1.0),
        ];
        vec![
            Primitive {
                a: verts[0],
                b: verts[1],
                c: verts[2],
                geom_id: 0,
                prim_id: 0,
            },
            Primitive {
                a: verts[1],
                b: verts[3],
                c: verts[2],
                geom_id: 0,
                prim_id: 1,
            },
        ]
    }

    #[test]
    fn test_empty_bvh() {
        let bvh = Bvh::build(Vec::new());
        let ray = Ray::new(Point3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(bvh.trace_closest(&ray, f32::INFINITY).is_none());
    }

    #[test]
    fn test_trace_hit_and_miss() {
        let bvh = Bvh::build(quad_at_x(3.0));
        let hit_ray = Ray::new(Point3::new(0.0, 0.2, 0.2), Vec3::new(1.0, 0.0, 0.0));
        let hit = bvh.trace_closest(&hit_ray, f32::INFINITY).unwrap();
        assert!((hit.t - 3.0).abs() < 1e-5);
        assert_eq!(hit.geom_id, 0);

        let miss_ray = Ray::new(Point3::new(0.0, 5.0, 0.2), Vec3::new(1.0, 0.0, 0.0));
        assert!(bvh.trace_closest(&miss_ray, f32::INFINITY).is_none());
    }

    #[test]
    fn test_nearest_of_two_planes() {
        let mut prims = quad_at_x(5.0);
        prims.extend(quad_at_x(2.0).into_iter().map(|mut p| {
            p.geom_id = 1;
            p
        }));
        let bvh = Bvh::build(prims);

        let ray = Ray::new(Point3::new(0.0, 0.2, 0.2), Vec3::new(1.0, 0.0, 0.0));
        let hit = bvh.trace_closest(&ray, f32::INFINITY).unwrap();
        assert!((hit.t - 2.0).abs() < 1e-5);
        assert_eq!(hit.geom_id, 1);
    }

    #[test]
    fn test_t_max_cuts_off_hit() {
        let bvh = Bvh::build(quad_at_x(3.0));
        let ray = Ray::new(Point3::new(0.0, 0.2, 0.2), Vec3::new(1.0, 0.0, 0.0));
        assert!(bvh.trace_closest(&ray, 2.5).is_none());
        assert!(bvh.trace_closest(&ray, 3.5).is_some());
    }

    #[test]
    fn test_large_triangle_set_builds_internal_nodes() {
        let mut prims = Vec::new();
        for i in 0..64 {
            let x = i as f32;
            prims.push(Primitive {
                a: Point3::new(x, 0.0, 0.0),
                b: Point3::new(x, 1.0, 0.0),
                c: Point3::new(x, 0.0, 1.0),
                geom_id: 0,
                prim_id: i,
            });
        }
        let bvh = Bvh::build(prims);
        assert_eq!(bvh.num_primitives(), 64);

        let ray = Ray::new(Point3::new(-1.0, 0.25, 0.25), Vec3::new(1.0, 0.0, 0.0));
        let hit = bvh.trace_closest(&ray, f32::INFINITY).unwrap();
        assert_eq!(hit.prim_id, 0);
        assert!((hit.t - 1.0).abs() < 1e-5);
    }
}
