//! Ray batches and structured query results.

use raybatch_math::{Point3, Vec3, MISS_TFAR};

use crate::error::{Error, Result};

/// Id value reported for rays that hit nothing.
pub const MISS_ID: i32 = -1;

/// A batch of N rays: origins, directions, and an optional far bound.
///
/// Directions are used as supplied, without normalization; every distance in
/// the query results is measured in units of the corresponding direction
/// vector. Rays are unbounded unless a max distance is set.
#[derive(Debug, Clone)]
pub struct RayBatch {
    origins: Vec<Point3>,
    directions: Vec<Vec3>,
    bounds: Option<Vec<f32>>,
}

impl RayBatch {
    /// Create a batch from parallel origin and direction arrays.
    ///
    /// Returns [`Error::BatchLengthMismatch`] if the arrays differ in length.
    pub fn new(origins: &[[f32; 3]], directions: &[[f32; 3]]) -> Result<Self> {
        if origins.len() != directions.len() {
            return Err(Error::BatchLengthMismatch {
                origins: origins.len(),
                directions: directions.len(),
            });
        }
        Ok(Self {
            origins: origins
                .iter()
                .map(|o| Point3::new(o[0], o[1], o[2]))
                .collect(),
            directions: directions
                .iter()
                .map(|d| Vec3::new(d[0], d[1], d[2]))
                .collect(),
            bounds: None,
        })
    }

    /// Bound every ray of the batch by the same max distance.
    pub fn with_max_distance(mut self, t_max: f32) -> Self {
        self.bounds = Some(vec![t_max; self.origins.len()]);
        self
    }

    /// Bound each ray individually.
    ///
    /// Returns [`Error::MaxDistanceLength`] if the array length does not
    /// match the batch.
    pub fn with_max_distances(mut self, t_max: &[f32]) -> Result<Self> {
        if t_max.len() != self.origins.len() {
            return Err(Error::MaxDistanceLength {
                expected: self.origins.len(),
                got: t_max.len(),
            });
        }
        self.bounds = Some(t_max.to_vec());
        Ok(self)
    }

    /// Number of rays in the batch.
    pub fn len(&self) -> usize {
        self.origins.len()
    }

    /// Whether the batch holds no rays.
    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }

    pub(crate) fn origins(&self) -> &[Point3] {
        &self.origins
    }

    pub(crate) fn directions(&self) -> &[Vec3] {
        &self.directions
    }

    /// Far bound for ray `i`, infinite when unbounded.
    pub(crate) fn bound(&self, i: usize) -> f32 {
        match &self.bounds {
            Some(bounds) => bounds[i],
            None => f32::INFINITY,
        }
    }

    /// Distance to report for ray `i` when it hits nothing: its explicit
    /// bound, or the miss sentinel for unbounded rays.
    pub(crate) fn miss_tfar(&self, i: usize) -> f32 {
        match &self.bounds {
            Some(bounds) => bounds[i],
            None => MISS_TFAR,
        }
    }
}

/// Structured result of a full query: five parallel arrays indexed by ray.
#[derive(Debug, Clone)]
pub struct HitRecords {
    /// Geometry id hit per ray, [`MISS_ID`] for misses.
    pub geom_id: Vec<i32>,
    /// Primitive id within the hit geometry, [`MISS_ID`] for misses.
    pub prim_id: Vec<i32>,
    /// Primitive-local u coordinate of the hit, 0 for misses.
    pub u: Vec<f32>,
    /// Primitive-local v coordinate of the hit, 0 for misses.
    pub v: Vec<f32>,
    /// Distance to the hit, or the ray's far bound / miss sentinel.
    pub tfar: Vec<f32>,
}

impl HitRecords {
    pub(crate) fn with_capacity(n: usize) -> Self {
        Self {
            geom_id: Vec::with_capacity(n),
            prim_id: Vec::with_capacity(n),
            u: Vec::with_capacity(n),
            v: Vec::with_capacity(n),
            tfar: Vec::with_capacity(n),
        }
    }

    /// Number of rays the records cover.
    pub fn len(&self) -> usize {
        self.geom_id.len()
    }

    /// Whether the records cover no rays.
    pub fn is_empty(&self) -> bool {
        self.geom_id.is_empty()
    }

    /// Whether ray `i` hit anything.
    pub fn is_hit(&self, i: usize) -> bool {
        self.geom_id[i] >= 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_length_mismatch() {
        let err = RayBatch::new(&[[0.0; 3]; 2], &[[1.0, 0.0, 0.0]]).unwrap_err();
        assert!(matches!(
            err,
            Error::BatchLengthMismatch {
                origins: 2,
                directions: 1
            }
        ));
    }

    #[test]
    fn test_max_distance_length_mismatch() {
        let batch = RayBatch::new(&[[0.0; 3]; 2], &[[1.0, 0.0, 0.0]; 2]).unwrap();
        let err = batch.with_max_distances(&[1.0]).unwrap_err();
        assert!(matches!(
            err,
            Error::MaxDistanceLength {
                expected: 2,
                got: 1
            }
        ));
    }

    #[test]
    fn test_unbounded_miss_uses_sentinel() {
        let batch = RayBatch::new(&[[0.0; 3]], &[[1.0, 0.0, 0.0]]).unwrap();
        assert_eq!(batch.bound(0), f32::INFINITY);
        assert_eq!(batch.miss_tfar(0), MISS_TFAR);
    }

    #[test]
    fn test_broadcast_bound() {
        let batch = RayBatch::new(&[[0.0; 3]; 3], &[[1.0, 0.0, 0.0]; 3])
            .unwrap()
            .with_max_distance(25.0);
        for i in 0..3 {
            assert_eq!(batch.bound(i), 25.0);
            assert_eq!(batch.miss_tfar(i), 25.0);
        }
    }
}
