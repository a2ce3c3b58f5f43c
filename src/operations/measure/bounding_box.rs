use crate::error::Result;
use crate::math::Point3;
use crate::scene::{SceneStore, SolidId};

/// An axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point3,
    /// Maximum corner of the bounding box.
    pub max: Point3,
}

impl Aabb {
    /// Extent along one axis (0 = x, 1 = y, 2 = z).
    #[must_use]
    pub fn extent(&self, axis: usize) -> f64 {
        self.max[axis] - self.min[axis]
    }

    /// Height along the placement (z) axis.
    #[must_use]
    pub fn z_height(&self) -> f64 {
        self.extent(2)
    }

    /// Center point of the box.
    #[must_use]
    pub fn center(&self) -> Point3 {
        Point3::from((self.min.coords + self.max.coords) * 0.5)
    }
}

/// Computes the world-space bounding box of a solid.
///
/// Measured on the solid's transformed local-box corners, so a rotated solid
/// reports the conservative box of its rotated bounds.
pub struct BoundingBox {
    solid: SolidId,
}

impl BoundingBox {
    /// Creates a new `BoundingBox` query.
    #[must_use]
    pub fn new(solid: SolidId) -> Self {
        Self { solid }
    }

    /// Executes the query, returning the AABB.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid is not in the store.
    pub fn execute(&self, store: &SceneStore) -> Result<Aabb> {
        let corners = store.solid(self.solid)?.world_corners();
        let mut min = corners[0];
        let mut max = corners[0];
        for c in &corners[1..] {
            for i in 0..3 {
                min[i] = min[i].min(c[i]);
                max[i] = max[i].max(c[i]);
            }
        }
        Ok(Aabb { min, max })
    }
}
