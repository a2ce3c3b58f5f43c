use crate::error::Result;
use crate::scene::{SceneStore, SolidId};

use super::BoundingBox;

/// Planar diameters of a solid: for each axis pair, the larger of the two
/// bounding extents in that pair.
#[derive(Debug, Clone, Copy)]
pub struct PlanarDiameters {
    /// max(x extent, y extent)
    pub xy: f64,
    /// max(x extent, z extent)
    pub xz: f64,
    /// max(y extent, z extent)
    pub yz: f64,
}

impl PlanarDiameters {
    /// The overall aggregate size metric: the largest planar diameter.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.xy.max(self.xz).max(self.yz)
    }
}

/// Measures the planar diameters of a solid in world space.
pub struct PlanarDiameter {
    solid: SolidId,
}

impl PlanarDiameter {
    /// Creates a new `PlanarDiameter` query.
    #[must_use]
    pub fn new(solid: SolidId) -> Self {
        Self { solid }
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid is not in the store.
    pub fn execute(&self, store: &SceneStore) -> Result<PlanarDiameters> {
        let aabb = BoundingBox::new(self.solid).execute(store)?;
        let x = aabb.extent(0);
        let y = aabb.extent(1);
        let z = aabb.extent(2);
        Ok(PlanarDiameters {
            xy: x.max(y),
            xz: x.max(z),
            yz: y.max(z),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::factory::{HexagonalColumn, MonomerFactory};
    use approx::assert_relative_eq;

    #[test]
    fn column_planar_diameters() {
        let mut store = SceneStore::new();
        // Length 10, radius 1: x extent 2, y extent sqrt(3), z extent 10.
        let solid = HexagonalColumn::new(10.0, 1.0)
            .unwrap()
            .instantiate(&mut store)
            .unwrap();

        let d = PlanarDiameter::new(solid).execute(&store).unwrap();
        assert_relative_eq!(d.xy, 2.0, epsilon = 1e-12);
        assert_relative_eq!(d.xz, 10.0, epsilon = 1e-12);
        assert_relative_eq!(d.yz, 10.0, epsilon = 1e-12);
        assert_relative_eq!(d.max(), 10.0, epsilon = 1e-12);
    }
}
