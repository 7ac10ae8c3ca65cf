//! Ray-triangle intersection (Möller–Trumbore).

use raybatch_math::Point3;

use crate::Ray;

/// Determinants below this magnitude are treated as a ray parallel to the
/// triangle plane.
const DET_EPSILON: f32 = 1e-12;

/// Result of a ray-triangle intersection.
#[derive(Debug, Clone, Copy)]
pub struct TriangleHit {
    /// Parameter along the ray, in units of the ray direction.
    pub t: f32,
    /// Barycentric coordinate along the first edge (`b - a`).
    pub u: f32,
    /// Barycentric coordinate along the second edge (`c - a`).
    pub v: f32,
}

/// Intersect a ray with the triangle `(a, b, c)`.
///
/// Returns `Some(hit)` for an intersection at `t >= 0`, `None` if the ray is
/// parallel to the triangle, the intersection lies outside it, or it lies
/// behind the origin. Hits exactly on an edge or vertex are accepted, so a
/// ray crossing an edge shared by two triangles reports against both.
pub fn intersect_triangle(ray: &Ray, a: &Point3, b: &Point3, c: &Point3) -> Option<TriangleHit> {
    let e1 = b - a;
    let e2 = c - a;

    let p = ray.direction.cross(&e2);
    let det = e1.dot(&p);
    if det.abs() < DET_EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;

    let s = ray.origin - a;
    let u = s.dot(&p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&e1);
    let v = ray.direction.dot(&q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = e2.dot(&q) * inv_det;
    if t < 0.0 {
        return None;
    }

    Some(TriangleHit { t, u, v })
}
