use crate::math::{Point3, UnitQuaternion, Vector3};

use super::mesh::TriMesh;

slotmap::new_key_type! {
    /// Unique identifier for a solid in the scene store.
    pub struct SolidId;
}

/// A closed mesh plus its uncommitted world transform.
///
/// Rotation is applied about the origin before translation. Either component
/// can be baked into the vertex data independently, mirroring the split
/// rotation/translation commits the placement policies rely on to avoid
/// compounding pivot errors.
#[derive(Debug, Clone)]
pub struct SolidData {
    /// Mesh geometry in local coordinates.
    pub mesh: TriMesh,
    /// Pending rotation about the origin.
    pub rotation: UnitQuaternion,
    /// Pending translation, applied after rotation.
    pub translation: Vector3,
}

impl SolidData {
    /// Wraps a mesh with an identity transform.
    #[must_use]
    pub fn new(mesh: TriMesh) -> Self {
        Self {
            mesh,
            rotation: UnitQuaternion::identity(),
            translation: Vector3::zeros(),
        }
    }

    /// Transforms a local point into world space.
    #[must_use]
    pub fn world_point(&self, p: &Point3) -> Point3 {
        self.rotation * p + self.translation
    }

    /// The eight local bounding-box corners in world space.
    ///
    /// World extents are measured on these transformed corners rather than
    /// on every vertex, so a rotated solid reports the (conservative) box of
    /// its rotated local bounds.
    #[must_use]
    pub fn world_corners(&self) -> [Point3; 8] {
        self.mesh.local_corners().map(|c| self.world_point(&c))
    }

    /// All vertex positions in world space.
    #[must_use]
    pub fn world_positions(&self) -> Vec<Point3> {
        self.mesh
            .positions
            .iter()
            .map(|p| self.world_point(p))
            .collect()
    }

    /// Bakes the pending rotation into the vertex data.
    pub fn commit_rotation(&mut self) {
        if self.rotation == UnitQuaternion::identity() {
            return;
        }
        let rot = self.rotation;
        for p in &mut self.mesh.positions {
            *p = rot * *p;
        }
        self.rotation = UnitQuaternion::identity();
    }

    /// Bakes the pending translation into the vertex data.
    pub fn commit_translation(&mut self) {
        let t = self.translation;
        if t == Vector3::zeros() {
            return;
        }
        for p in &mut self.mesh.positions {
            *p += t;
        }
        self.translation = Vector3::zeros();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn unit_box() -> TriMesh {
        // Two triangles are enough for bounds tests.
        TriMesh::new(
            vec![
                Point3::new(-0.5, -0.5, -0.5),
                Point3::new(0.5, 0.5, 0.5),
                Point3::new(0.5, -0.5, -0.5),
            ],
            vec![[0, 1, 2]],
        )
    }

    #[test]
    fn commit_rotation_bakes_and_resets() {
        let mut solid = SolidData::new(unit_box());
        solid.rotation = UnitQuaternion::from_euler_angles(0.0, 0.0, FRAC_PI_2);
        solid.commit_rotation();

        assert_eq!(solid.rotation, UnitQuaternion::identity());
        // (-0.5, -0.5, -0.5) rotated 90 deg about z -> (0.5, -0.5, -0.5)
        assert_relative_eq!(solid.mesh.positions[0].x, 0.5, epsilon = 1e-12);
        assert_relative_eq!(solid.mesh.positions[0].y, -0.5, epsilon = 1e-12);
    }

    #[test]
    fn commit_translation_bakes_and_resets() {
        let mut solid = SolidData::new(unit_box());
        solid.translation = Vector3::new(0.0, 0.0, 3.0);
        solid.commit_translation();

        assert_eq!(solid.translation, Vector3::zeros());
        assert_relative_eq!(solid.mesh.positions[0].z, 2.5, epsilon = 1e-12);
    }

    #[test]
    fn world_corners_follow_transform() {
        let mut solid = SolidData::new(unit_box());
        solid.translation = Vector3::new(10.0, 0.0, 0.0);

        let xs: Vec<f64> = solid.world_corners().iter().map(|c| c.x).collect();
        let min = xs.iter().copied().fold(f64::INFINITY, f64::min);
        let max = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert_relative_eq!(min, 9.5, epsilon = 1e-12);
        assert_relative_eq!(max, 10.5, epsilon = 1e-12);
    }
}
